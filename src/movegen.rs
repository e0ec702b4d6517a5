/*
 * jieqi, a Jieqi (revealed chess) rules engine and expectimax search
 *
 * This program is free software: you can redistribute it and/or modify it
 * under the terms of the GNU General Public License as published by the Free
 * Software Foundation, either version 3 of the License, or (at your option)
 * any later version.
 *
 * This program is distributed in the hope that it will be useful, but WITHOUT
 * ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or
 * FITNESS FOR A PARTICULAR PURPOSE. See the GNU General Public License for
 * more details.
 *
 * You should have received a copy of the GNU General Public License along
 * with this program. If not, see <https://www.gnu.org/licenses/>.
 */

//! Per-piece pseudo-legal generation and the legality filter (`spec.md`
//! §4.2). A Hidden piece moves according to the positional kind its starting
//! square implies ([`crate::defs::Piece::movement_kind`]); only Advisor and
//! Elephant gain an extra own-side/own-palace confinement while Hidden.

pub mod util;

use arrayvec::ArrayVec;

use crate::board::{Board, Move};
use crate::defs::{Colour, Piece, PieceKind, Position};
use util::{step, Offset, DIAGONAL, HORSE_LEAPS, ORTHOGONAL};

/// An upper bound on legal moves in any reachable Jieqi position, comfortably
/// above the branching factor of a fully-developed board.
const MAX_MOVES: usize = 160;

/// A fixed-capacity move buffer, avoiding per-call heap allocation in the
/// search's hot path (`spec.md` §9 "Move generation style").
pub type MoveList = ArrayVec<Move, MAX_MOVES>;

fn candidate_move(piece: &Piece, to: Position) -> Move {
    if piece.is_hidden() {
        Move::pending_reveal(piece.position, to)
    } else {
        Move::quiet(piece.position, to)
    }
}

fn push_if_open(board: &Board, piece: &Piece, to: Position, out: &mut MoveList) {
    if board.at(to).is_some_and(|occupant| occupant.colour == piece.colour) {
        return;
    }
    out.push(candidate_move(piece, to));
}

fn stepper_moves(board: &Board, piece: &Piece, offsets: &[Offset], out: &mut MoveList) {
    for &offset in offsets {
        if let Some(to) = step(piece.position, offset) {
            push_if_open(board, piece, to, out);
        }
    }
}

fn king_moves(board: &Board, piece: &Piece, out: &mut MoveList) {
    for &offset in &ORTHOGONAL {
        if let Some(to) = step(piece.position, offset) {
            if to.in_own_palace(piece.colour) {
                push_if_open(board, piece, to, out);
            }
        }
    }
}

fn advisor_moves(board: &Board, piece: &Piece, out: &mut MoveList) {
    for &offset in &DIAGONAL {
        let Some(to) = step(piece.position, offset) else { continue };
        if piece.is_hidden() && !to.in_own_palace(piece.colour) {
            continue;
        }
        push_if_open(board, piece, to, out);
    }
}

fn elephant_moves(board: &Board, piece: &Piece, out: &mut MoveList) {
    for &offset in &DIAGONAL {
        let Some(mid) = step(piece.position, offset) else { continue };
        if board.at(mid).is_some() {
            continue;
        }
        let Some(to) = step(mid, offset) else { continue };
        if piece.is_hidden() && !to.on_own_side(piece.colour) {
            continue;
        }
        push_if_open(board, piece, to, out);
    }
}

fn horse_moves(board: &Board, piece: &Piece, out: &mut MoveList) {
    for &(leap, leg) in &HORSE_LEAPS {
        let Some(leg_square) = step(piece.position, leg) else { continue };
        if board.at(leg_square).is_some() {
            continue;
        }
        if let Some(to) = step(piece.position, leap) {
            push_if_open(board, piece, to, out);
        }
    }
}

fn rook_moves(board: &Board, piece: &Piece, out: &mut MoveList) {
    for &offset in &ORTHOGONAL {
        for to in util::ray(piece.position, offset) {
            match board.at(to) {
                None => out.push(candidate_move(piece, to)),
                Some(occupant) => {
                    if occupant.colour != piece.colour {
                        out.push(candidate_move(piece, to));
                    }
                    break;
                }
            }
        }
    }
}

fn cannon_moves(board: &Board, piece: &Piece, out: &mut MoveList) {
    for &offset in &ORTHOGONAL {
        let mut screened = false;
        for to in util::ray(piece.position, offset) {
            match board.at(to) {
                None if !screened => out.push(candidate_move(piece, to)),
                None => {}
                Some(occupant) => {
                    if screened {
                        if occupant.colour != piece.colour {
                            out.push(candidate_move(piece, to));
                        }
                        break;
                    }
                    screened = true;
                }
            }
        }
    }
}

fn pawn_moves(board: &Board, piece: &Piece, out: &mut MoveList) {
    let forward: Offset = match piece.colour {
        Colour::Red => (1, 0),
        Colour::Black => (-1, 0),
    };
    stepper_moves(board, piece, &[forward], out);
    if !piece.position.on_own_side(piece.colour) {
        stepper_moves(board, piece, &[(0, 1), (0, -1)], out);
    }
}

/// Pseudo-legal moves for every `side` piece on the board: on-board, not
/// landing on a friendly piece, obeying each kind's movement rule, but not
/// yet filtered for leaving the mover's own King in check.
#[must_use]
pub fn pseudo_legal_moves(board: &Board, side: Colour) -> MoveList {
    let mut out = MoveList::new();
    for piece in board.pieces().filter(|p| p.colour == side) {
        match piece.movement_kind() {
            PieceKind::King => king_moves(board, piece, &mut out),
            PieceKind::Advisor => advisor_moves(board, piece, &mut out),
            PieceKind::Elephant => elephant_moves(board, piece, &mut out),
            PieceKind::Horse => horse_moves(board, piece, &mut out),
            PieceKind::Rook => rook_moves(board, piece, &mut out),
            PieceKind::Cannon => cannon_moves(board, piece, &mut out),
            PieceKind::Pawn => pawn_moves(board, piece, &mut out),
        }
    }
    out
}

/// Whether any `by_colour` piece's pseudo-legal move set includes landing on
/// `target`. Attack tests reuse the ordinary movement rules with the colour
/// inverted (`spec.md` §4.2).
#[must_use]
pub fn is_attacked(board: &Board, target: Position, by_colour: Colour) -> bool {
    pseudo_legal_moves(board, by_colour).iter().any(|mv| mv.to == target)
}

/// Legal moves for `side`: pseudo-legal moves that, after a tentative
/// `apply`/`undo`, leave the mover's own King un-attacked and the two Kings
/// not face-to-face (`spec.md` §4.2 "Legality filter").
#[must_use]
pub fn legal_moves(board: &Board, side: Colour) -> MoveList {
    let mut board = board.clone();
    let mut out = MoveList::new();
    for mv in pseudo_legal_moves(&board, side) {
        let outcome = board.apply_unchecked(mv);
        let ok = !board.in_check(side) && !board.kings_face_to_face();
        board.undo(mv, outcome);
        if ok {
            out.push(mv);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jfn;

    #[test]
    fn horse_blocked_by_leg() {
        let board = jfn::parse_unchecked("9/9/9/9/9/4h4/4R4/9/9/4k3K -:- r r").unwrap().board;
        let moves = pseudo_legal_moves(&board, Colour::Black);
        assert!(!moves.iter().any(|m| m.from == Position::new(5, 4) && m.to == Position::new(7, 3)));
    }

    #[test]
    fn cannon_requires_exactly_one_screen_to_capture() {
        let board = jfn::parse_unchecked("9/9/9/9/4c4/4R4/4R4/9/9/4K1k2 -:- r r").unwrap().board;
        let moves = pseudo_legal_moves(&board, Colour::Black);
        let to_nearest = Position::new(6, 4);
        let to_farthest = Position::new(5, 4);
        assert!(!moves.iter().any(|m| m.to == to_nearest));
        assert!(!moves.iter().any(|m| m.to == to_farthest));
    }

    #[test]
    fn king_confined_to_palace() {
        let board = jfn::parse_unchecked("9/9/9/9/9/9/9/9/9/4K4 -:- r r").unwrap().board;
        let moves = pseudo_legal_moves(&board, Colour::Red);
        assert!(moves.iter().all(|m| m.to.in_own_palace(Colour::Red)));
    }

    #[test]
    fn pawn_cannot_step_sideways_before_crossing_river() {
        let board = jfn::parse_unchecked("9/9/9/9/9/9/4P4/9/9/4K3k -:- r r").unwrap().board;
        let moves = pseudo_legal_moves(&board, Colour::Red);
        let pawn_moves: Vec<_> = moves.iter().filter(|m| m.from == Position::new(3, 4)).collect();
        assert_eq!(pawn_moves.len(), 1);
        assert_eq!(pawn_moves[0].to, Position::new(4, 4));
    }

    #[test]
    fn legal_moves_excludes_self_check() {
        let board = jfn::parse_unchecked("4k4/9/9/9/9/9/9/9/9/3rK4 -:- r r").unwrap().board;
        let legal = legal_moves(&board, Colour::Red);
        assert!(legal.iter().all(|m| m.to != Position::new(0, 4)));
    }
}
