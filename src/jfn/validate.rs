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

//! The eight consistency invariants from `spec.md` §4.3, checked against an
//! already structurally-parsed [`Board`].

use crate::board::Board;
use crate::defs::{initial_allotment, Colour, PieceKind, ALL_KINDS};
use crate::error::JfnError;

fn colour_name(colour: Colour) -> &'static str {
    match colour {
        Colour::Red => "red",
        Colour::Black => "black",
    }
}

pub fn validate(board: &Board, turn: Colour, viewer: Colour) -> Result<(), JfnError> {
    for &colour in &[Colour::Red, Colour::Black] {
        check_king_count(board, colour)?;
        check_allotment(board, colour)?;
        check_hidden_bound(board, colour)?;
        check_piece_total(board, colour)?;
        check_captured_visibility(board, colour, viewer)?;
    }
    if board.kings_face_to_face() {
        return Err(JfnError::KingsFaceToFace);
    }
    if board.in_check(turn.flip()) {
        return Err(JfnError::OpponentInCheck);
    }
    Ok(())
}

fn check_king_count(board: &Board, colour: Colour) -> Result<(), JfnError> {
    let found = board.pieces().filter(|p| p.colour == colour && p.true_kind == PieceKind::King).count();
    if found != 1 {
        return Err(JfnError::KingCount { colour: colour_name(colour), found });
    }
    Ok(())
}

fn check_allotment(board: &Board, colour: Colour) -> Result<(), JfnError> {
    // A still-hidden piece's true kind is unknown to a JFN reader, so only
    // revealed on-board pieces can be checked against the per-kind allotment.
    for &kind in &ALL_KINDS {
        let found =
            board.pieces().filter(|p| p.colour == colour && !p.is_hidden() && p.true_kind == kind).count()
                as u8;
        let max = initial_allotment(kind);
        if found > max {
            return Err(JfnError::AllotmentExceeded {
                kind: kind.to_string(),
                colour: colour_name(colour),
                found,
                max,
            });
        }
    }
    Ok(())
}

fn check_hidden_bound(board: &Board, colour: Colour) -> Result<(), JfnError> {
    let hidden = board.pieces().filter(|p| p.colour == colour && p.is_hidden()).count();
    let revealed = board.pieces().filter(|p| p.colour == colour && !p.is_hidden()).count();
    if hidden > 16 - revealed.min(16) {
        return Err(JfnError::HiddenCountExceeded { colour: colour_name(colour) });
    }
    Ok(())
}

fn check_piece_total(board: &Board, colour: Colour) -> Result<(), JfnError> {
    let on_board = board.pieces().filter(|p| p.colour == colour).count();
    let captured = board.captured(colour).len();
    let total = on_board + captured;
    if total != 16 {
        return Err(JfnError::PieceCountMismatch { colour: colour_name(colour), found: total as u8 });
    }
    Ok(())
}

fn check_captured_visibility(board: &Board, colour: Colour, viewer: Colour) -> Result<(), JfnError> {
    for entry in board.captured(colour) {
        if !entry.was_hidden {
            continue;
        }
        if colour == viewer && entry.true_kind.is_some() {
            return Err(JfnError::IllegalCapturedVisibility { colour: colour_name(colour) });
        }
        if colour != viewer && entry.true_kind.is_none() {
            return Err(JfnError::IllegalCapturedVisibility { colour: colour_name(colour) });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defs::{Piece, PieceState, Position};
    use crate::jfn::parse;

    #[test]
    fn rejects_two_red_kings() {
        let s = "4k4/9/9/9/9/9/9/9/9/3KK4 -:- r r";
        assert!(matches!(parse(s), Err(JfnError::KingCount { .. })));
    }

    #[test]
    fn rejects_opponent_in_check() {
        // Start from a valid full-army position, relocate the one piece
        // blocking the e-file off it, and turn the other into a rook -
        // both in place, so the 16-per-colour total never moves. Black (not
        // to move) ends up in check from the red rook.
        let s = "xxxxkxxxx/9/1x5x1/x1x1x1x1x/9/9/X1X1X1X1X/1X5X1/9/XXXXKXXXX -:- r r";
        let mut board = parse(s).unwrap().board;
        let blocker = board.remove(Position::new(6, 4)).unwrap();
        board.place(Position::new(6, 1), blocker);
        board.place(Position::new(3, 4), Piece {
            colour: Colour::Red,
            true_kind: PieceKind::Rook,
            state: PieceState::Revealed,
            position: Position::new(3, 4),
        });
        assert!(matches!(validate(&board, Colour::Red, Colour::Red), Err(JfnError::OpponentInCheck)));
    }

    #[test]
    fn rejects_kings_face_to_face() {
        // Same relocation trick, but clear the whole e-file and bring the
        // black king down onto it instead of adding a rook.
        let s = "xxxxkxxxx/9/1x5x1/x1x1x1x1x/9/9/X1X1X1X1X/1X5X1/9/XXXXKXXXX -:- r r";
        let mut board = parse(s).unwrap().board;
        let black_blocker = board.remove(Position::new(6, 4)).unwrap();
        board.place(Position::new(6, 1), black_blocker);
        let red_blocker = board.remove(Position::new(3, 4)).unwrap();
        board.place(Position::new(3, 1), red_blocker);
        let black_king = board.remove(Position::new(9, 4)).unwrap();
        board.place(Position::new(7, 4), black_king);
        assert!(matches!(validate(&board, Colour::Red, Colour::Red), Err(JfnError::KingsFaceToFace)));
    }

    #[test]
    fn rejects_viewer_captured_own_piece_as_known() {
        // A red viewer's own captured entry written lowercase claims red
        // knows a piece it lost while hidden, which only the capturer would.
        let mut board = Board::empty();
        board.push_captured(Colour::Red, crate::defs::CapturedEntry {
            true_kind: Some(PieceKind::Pawn),
            was_hidden: true,
        });
        assert!(matches!(
            check_captured_visibility(&board, Colour::Red, Colour::Red),
            Err(JfnError::IllegalCapturedVisibility { .. })
        ));
    }

    #[test]
    fn accepts_opponent_captured_entry_known_to_viewer() {
        let mut board = Board::empty();
        board.push_captured(Colour::Black, crate::defs::CapturedEntry {
            true_kind: Some(PieceKind::Pawn),
            was_hidden: true,
        });
        assert!(check_captured_visibility(&board, Colour::Black, Colour::Red).is_ok());
    }
}
