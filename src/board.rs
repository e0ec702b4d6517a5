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

//! The board: a dense 90-cell mailbox (`spec.md` §9's recommended
//! representation over bitboards), the captured-piece ledgers and the
//! `apply`/`undo` pair that every other component scopes its mutations
//! through (`spec.md` §4.1, §5).

use std::fmt::{self, Display, Formatter};

use oorandom::Rand64;
use serde::{Deserialize, Serialize};

use crate::defs::{
    can_be_hidden, initial_hidden_allotment, CapturedEntry, Colour, Piece, PieceKind, PieceState,
    Position, ALL_KINDS, BOARD_SQUARES,
};
use crate::error::MoveError;
use crate::movegen;

/// A move as produced by the generator or parsed from move text (`spec.md`
/// §4.3 "Move string"). `reveal` records whether the move text carried the
/// `+` prefix. `revealed_kind` is `None` on a freshly-generated candidate (the
/// identity is not yet decided) and must be filled in, from the move text's
/// `=<KIND>` suffix or by a search chance-node hypothesis, before the move
/// can be applied.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Move {
    pub from: Position,
    pub to: Position,
    pub reveal: bool,
    pub revealed_kind: Option<PieceKind>,
}

impl Move {
    #[must_use]
    pub const fn quiet(from: Position, to: Position) -> Self {
        Self { from, to, reveal: false, revealed_kind: None }
    }

    #[must_use]
    pub const fn pending_reveal(from: Position, to: Position) -> Self {
        Self { from, to, reveal: true, revealed_kind: None }
    }

    #[must_use]
    pub const fn reveal(from: Position, to: Position, kind: PieceKind) -> Self {
        Self { from, to, reveal: true, revealed_kind: Some(kind) }
    }

    /// Parses `<+><from><to><=KIND>?`, e.g. `"e4e5"` or `"+a0a1=P"`.
    pub fn parse(s: &str) -> Result<Self, MoveError> {
        let (base, suffix) = s.split_once('=').map_or((s, None), |(b, k)| (b, Some(k)));
        let (reveal, rest) = base.strip_prefix('+').map_or((false, base), |r| (true, r));
        if rest.len() != 4 {
            return Err(MoveError::Malformed(s.to_owned()));
        }
        let from =
            Position::from_algebraic(&rest[0..2]).ok_or_else(|| MoveError::Malformed(s.to_owned()))?;
        let to =
            Position::from_algebraic(&rest[2..4]).ok_or_else(|| MoveError::Malformed(s.to_owned()))?;
        let revealed_kind = match suffix {
            None => None,
            Some(k) => {
                let mut chars = k.chars();
                let kind = chars
                    .next()
                    .and_then(PieceKind::from_char)
                    .ok_or_else(|| MoveError::Malformed(s.to_owned()))?;
                if chars.next().is_some() {
                    return Err(MoveError::Malformed(s.to_owned()));
                }
                Some(kind)
            }
        };
        if !reveal && revealed_kind.is_some() {
            return Err(MoveError::Malformed(s.to_owned()));
        }
        Ok(Self { from, to, reveal, revealed_kind })
    }
}

impl Display for Move {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.reveal {
            f.write_str("+")?;
        }
        write!(f, "{}{}", self.from, self.to)?;
        if let Some(kind) = self.revealed_kind {
            write!(f, "={kind}")?;
        }
        Ok(())
    }
}

/// What an [`Board::apply_unchecked`] call needs [`Board::undo`] to reverse:
/// the captured piece, if any, and the mover's true kind before the move (it
/// only ever changes across a reveal).
#[derive(Clone, Copy, Debug)]
pub struct ApplyOutcome {
    pub captured: Option<Piece>,
    prior_true_kind: PieceKind,
}

/// The dense board plus the per-colour captured-piece ledgers. `turn` is
/// tracked here for convenience but is never flipped by [`Board::apply`];
/// callers flip it explicitly (`spec.md` §9).
#[derive(Clone, Debug, PartialEq)]
pub struct Board {
    squares: [Option<Piece>; BOARD_SQUARES],
    captured: [Vec<CapturedEntry>; 2],
    turn: Colour,
}

impl Colour {
    /// Index into the two-element arrays keyed by colour.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Red => 0,
            Self::Black => 1,
        }
    }
}

impl Board {
    /// An empty board with no pieces, red to move.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            squares: [None; BOARD_SQUARES],
            captured: [Vec::new(), Vec::new()],
            turn: Colour::Red,
        }
    }

    /// The standard Jieqi starting position: kings revealed in the palace
    /// centre, every other piece hidden on its standard square with its true
    /// identity drawn uniformly from that colour's own 15-piece bag
    /// (`spec.md` §3 "Lifecycle"). The true identities exist in this board
    /// from the moment of dealing (`spec.md` §3 "known to the engine"); a
    /// JFN-parsed board, by contrast, never carries them for still-hidden
    /// squares, since the text format has no way to encode them (`spec.md`
    /// §4.3).
    #[must_use]
    pub fn new_random_initial(rng: &mut Rand64) -> Self {
        let mut board = Self::empty();
        for &colour in &[Colour::Red, Colour::Black] {
            let back = colour.back_rank();
            let (near, far) = match colour {
                Colour::Red => (back, back + 2),
                Colour::Black => (back, back - 2),
            };
            board.place(Position::new(back, 4), Piece {
                colour,
                true_kind: PieceKind::King,
                state: PieceState::Revealed,
                position: Position::new(back, 4),
            });

            let mut bag: Vec<PieceKind> = Vec::with_capacity(15);
            for &kind in &ALL_KINDS {
                if can_be_hidden(kind) {
                    for _ in 0..initial_hidden_allotment(kind) {
                        bag.push(kind);
                    }
                }
            }
            shuffle(rng, &mut bag);

            let mut squares = vec![
                Position::new(near, 0),
                Position::new(near, 1),
                Position::new(near, 2),
                Position::new(near, 3),
                Position::new(near, 5),
                Position::new(near, 6),
                Position::new(near, 7),
                Position::new(near, 8),
                Position::new(far, 1),
                Position::new(far, 7),
            ];
            let pawn_row = match colour {
                Colour::Red => 3,
                Colour::Black => 6,
            };
            for col in [0, 2, 4, 6, 8] {
                squares.push(Position::new(pawn_row, col));
            }
            debug_assert_eq!(squares.len(), 15);

            for (pos, kind) in squares.into_iter().zip(bag) {
                board.place(pos, Piece { colour, true_kind: kind, state: PieceState::Hidden, position: pos });
            }
        }
        board
    }

    #[must_use]
    pub fn turn(&self) -> Colour {
        self.turn
    }

    pub fn set_turn(&mut self, colour: Colour) {
        self.turn = colour;
    }

    #[must_use]
    pub fn at(&self, pos: Position) -> Option<&Piece> {
        self.squares[pos.index()].as_ref()
    }

    pub fn place(&mut self, pos: Position, piece: Piece) {
        self.squares[pos.index()] = Some(piece);
    }

    pub fn remove(&mut self, pos: Position) -> Option<Piece> {
        self.squares[pos.index()].take()
    }

    /// All pieces on the board, in square order. Used by the perspective
    /// projection, evaluators and the JFN encoder.
    pub fn pieces(&self) -> impl Iterator<Item = &Piece> {
        self.squares.iter().filter_map(Option::as_ref)
    }

    #[must_use]
    pub fn captured(&self, colour: Colour) -> &[CapturedEntry] {
        &self.captured[colour.index()]
    }

    pub fn push_captured(&mut self, colour: Colour, entry: CapturedEntry) {
        self.captured[colour.index()].push(entry);
    }

    fn pop_captured(&mut self, colour: Colour) -> Option<CapturedEntry> {
        self.captured[colour.index()].pop()
    }

    #[must_use]
    pub fn king_position(&self, colour: Colour) -> Option<Position> {
        self.pieces()
            .find(|p| p.colour == colour && p.true_kind == PieceKind::King)
            .map(|p| p.position)
    }

    /// Whether the two kings share a file with no piece between them
    /// (`spec.md` §4.2 "face-to-face").
    #[must_use]
    pub fn kings_face_to_face(&self) -> bool {
        let (Some(red), Some(black)) =
            (self.king_position(Colour::Red), self.king_position(Colour::Black))
        else {
            return false;
        };
        if red.col != black.col {
            return false;
        }
        let (lo, hi) = (red.row.min(black.row), red.row.max(black.row));
        !((lo + 1)..hi).any(|row| self.at(Position::new(row, red.col)).is_some())
    }

    /// Whether `colour`'s king is attacked by any opposing piece.
    #[must_use]
    pub fn in_check(&self, colour: Colour) -> bool {
        let Some(king_pos) = self.king_position(colour) else {
            return false;
        };
        movegen::is_attacked(self, king_pos, colour.flip())
    }

    /// Applies `mv` without checking it against the legal-move set. Used by
    /// the legality filter (which must try moves that may turn out illegal)
    /// and by the search, which only ever applies moves it generated itself.
    ///
    /// If `mv.reveal` and `mv.revealed_kind` is `Some`, the mover's true kind
    /// is overwritten with it (a submitted reveal-move, or a search chance
    /// node exploring a hypothesis); otherwise the mover's existing true
    /// kind is kept (an omniscient in-memory board whose true identities
    /// were already fixed at deal time).
    pub(crate) fn apply_unchecked(&mut self, mv: Move) -> ApplyOutcome {
        let mut mover = self.remove(mv.from).expect("apply_unchecked: empty source square");
        let prior_true_kind = mover.true_kind;
        let captured = self.remove(mv.to);
        if mv.reveal {
            if let Some(kind) = mv.revealed_kind {
                mover.true_kind = kind;
            }
            mover.state = PieceState::Revealed;
        }
        mover.position = mv.to;
        self.place(mv.to, mover);
        if let Some(captured_piece) = captured {
            self.push_captured(captured_piece.colour, CapturedEntry {
                true_kind: Some(captured_piece.true_kind),
                was_hidden: captured_piece.is_hidden(),
            });
        }
        ApplyOutcome { captured, prior_true_kind }
    }

    /// The inverse of [`Board::apply_unchecked`] / [`Board::apply`]: restores
    /// the moved piece to `mv.from` (un-revealing it and restoring its prior
    /// true kind if `mv.reveal`), and restores the captured piece to `mv.to`
    /// along with its ledger entry.
    pub fn undo(&mut self, mv: Move, outcome: ApplyOutcome) {
        let mut mover = self.remove(mv.to).expect("undo: destination square empty");
        if mv.reveal {
            mover.state = PieceState::Hidden;
            mover.true_kind = outcome.prior_true_kind;
        }
        mover.position = mv.from;
        self.place(mv.from, mover);
        if let Some(captured_piece) = outcome.captured {
            self.pop_captured(captured_piece.colour);
            self.place(mv.to, captured_piece);
        }
    }

    /// The checked, public form of move application (`spec.md` §4.1):
    /// verifies `mv` is in the current legal-move set for `self.turn()`
    /// before mutating. Does not flip `turn`. Returns the captured piece, if
    /// any.
    pub fn apply(&mut self, mv: Move) -> Result<Option<Piece>, MoveError> {
        let Some(mover) = self.at(mv.from) else {
            return Err(MoveError::NoMovablePiece);
        };
        if mover.colour != self.turn {
            return Err(MoveError::NoMovablePiece);
        }
        if mv.reveal && !mover.is_hidden() {
            return Err(MoveError::AlreadyRevealed);
        }
        if !mv.reveal && mover.is_hidden() {
            return Err(MoveError::MustReveal);
        }
        let legal = movegen::legal_moves(self, self.turn);
        if !legal.iter().any(|&m| m.from == mv.from && m.to == mv.to && m.reveal == mv.reveal) {
            return Err(MoveError::NotLegal);
        }
        if mv.reveal && mv.revealed_kind.is_none() {
            return Err(MoveError::RevealKindRequired);
        }
        Ok(self.apply_unchecked(mv).captured)
    }

    /// A cheap, deterministic hash of the board contents (not the ledger or
    /// turn), used by the repetition-avoidance selector and the battle
    /// driver's position-count map (`spec.md` §4.5, §4.8). Two boards with
    /// the same piece placement and face-state hash identically regardless
    /// of true identity of still-hidden pieces, matching the JFN board field
    /// (hidden pieces render as the same `X`/`x` regardless of identity).
    #[must_use]
    pub fn board_hash(&self) -> u64 {
        let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
        for (index, square) in self.squares.iter().enumerate() {
            let tag: u64 = match square {
                None => 0,
                Some(p) if p.is_hidden() => 1 + p.colour.index() as u64,
                Some(p) => 3 + p.colour.index() as u64 * 8 + kind_tag(p.true_kind),
            };
            hash ^= (index as u64).wrapping_mul(0x0100_0000_01b3) ^ tag;
            hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
        }
        hash
    }
}

const fn kind_tag(kind: PieceKind) -> u64 {
    match kind {
        PieceKind::King => 0,
        PieceKind::Advisor => 1,
        PieceKind::Elephant => 2,
        PieceKind::Horse => 3,
        PieceKind::Rook => 4,
        PieceKind::Cannon => 5,
        PieceKind::Pawn => 6,
    }
}

fn shuffle<T>(rng: &mut Rand64, items: &mut [T]) {
    for i in (1..items.len()).rev() {
        let j = (rng.rand_u64() % (i as u64 + 1)) as usize;
        items.swap(i, j);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jfn;

    #[test]
    fn apply_then_undo_is_bit_identical() {
        let mut board = jfn::parse_unchecked("4k4/9/9/9/4c4/4R4/9/9/9/4K4 -:- r r").unwrap().board;
        let before = board.clone();
        let mv = Move::quiet(Position::new(3, 4), Position::new(4, 4));
        let outcome = board.apply_unchecked(mv);
        assert!(outcome.captured.is_some());
        board.undo(mv, outcome);
        assert_eq!(board.board_hash(), before.board_hash());
        assert_eq!(board.captured(Colour::Black).len(), before.captured(Colour::Black).len());
    }

    #[test]
    fn reveal_move_flips_state_and_sets_declared_kind() {
        let mut board =
            jfn::parse("xxxxkxxxx/9/1x5x1/x1x1x1x1x/9/9/X1X1X1X1X/1X5X1/9/XXXXKXXXX -:- r r")
                .unwrap()
                .board;
        let from = Position::new(0, 0);
        let mv = Move::reveal(from, Position::new(1, 0), PieceKind::Pawn);
        board.apply_unchecked(mv);
        let piece = board.at(Position::new(1, 0)).unwrap();
        assert_eq!(piece.state, PieceState::Revealed);
        assert_eq!(piece.true_kind, PieceKind::Pawn);
    }

    #[test]
    fn reveal_then_undo_restores_hidden_placeholder() {
        let mut board =
            jfn::parse("xxxxkxxxx/9/1x5x1/x1x1x1x1x/9/9/X1X1X1X1X/1X5X1/9/XXXXKXXXX -:- r r")
                .unwrap()
                .board;
        let from = Position::new(0, 0);
        let placeholder = board.at(from).unwrap().true_kind;
        let mv = Move::reveal(from, Position::new(1, 0), PieceKind::Horse);
        let outcome = board.apply_unchecked(mv);
        board.undo(mv, outcome);
        let piece = board.at(from).unwrap();
        assert_eq!(piece.state, PieceState::Hidden);
        assert_eq!(piece.true_kind, placeholder);
    }

    #[test]
    fn kings_face_to_face_detected() {
        let mut board = Board::empty();
        board.place(Position::new(0, 4), Piece {
            colour: Colour::Red,
            true_kind: PieceKind::King,
            state: PieceState::Revealed,
            position: Position::new(0, 4),
        });
        board.place(Position::new(9, 4), Piece {
            colour: Colour::Black,
            true_kind: PieceKind::King,
            state: PieceState::Revealed,
            position: Position::new(9, 4),
        });
        assert!(board.kings_face_to_face());
    }

    #[test]
    fn move_parse_round_trips_reveal_suffix() {
        let mv = Move::parse("+a0b1=P").unwrap();
        assert!(mv.reveal);
        assert_eq!(mv.revealed_kind, Some(PieceKind::Pawn));
        assert_eq!(mv.to_string(), "+a0b1=P");
    }
}
