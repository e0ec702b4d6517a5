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

//! Core enumerations and value types shared by every other module: colours,
//! piece kinds, board positions and the per-colour hidden-piece allotment.

use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};

/// One of the two sides.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Colour {
    /// Red, moving first, occupying rows 0-4.
    Red,
    /// Black, occupying rows 5-9.
    Black,
}

/// A piece's true identity. The starting square of a hidden piece maps to one
/// of these (see [`PieceKind::for_start_square`]); a revealed piece's
/// movement is this value directly.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum PieceKind {
    /// Always revealed; never occupies a hidden square.
    King,
    Advisor,
    Elephant,
    Horse,
    Rook,
    Cannon,
    Pawn,
}

/// The seven [`PieceKind`]s in a fixed order, used to index per-kind arrays
/// and to iterate the hidden-pool allotment deterministically.
pub const ALL_KINDS: [PieceKind; 7] = [
    PieceKind::King,
    PieceKind::Advisor,
    PieceKind::Elephant,
    PieceKind::Horse,
    PieceKind::Rook,
    PieceKind::Cannon,
    PieceKind::Pawn,
];

/// The starting count of each kind per side: `{K:1, A:2, E:2, H:2, R:2, C:2,
/// P:5}` (`spec.md` §3, §4.3 invariant 3).
#[must_use]
pub const fn initial_allotment(kind: PieceKind) -> u8 {
    match kind {
        PieceKind::King => 1,
        PieceKind::Advisor
        | PieceKind::Elephant
        | PieceKind::Horse
        | PieceKind::Rook
        | PieceKind::Cannon => 2,
        PieceKind::Pawn => 5,
    }
}

/// The allotment of kinds that start face-down (everything but the king):
/// `{A:2, E:2, H:2, R:2, C:2, P:5}`, the initial hidden pool from `spec.md`
/// §3.
#[must_use]
pub const fn initial_hidden_allotment(kind: PieceKind) -> u8 {
    match kind {
        PieceKind::King => 0,
        other => initial_allotment(other),
    }
}

/// Whether a piece may ever be face-down. Only the king is always revealed.
#[must_use]
pub const fn can_be_hidden(kind: PieceKind) -> bool {
    !matches!(kind, PieceKind::King)
}

impl Display for PieceKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let c = match self {
            Self::King => 'K',
            Self::Advisor => 'A',
            Self::Elephant => 'E',
            Self::Horse => 'H',
            Self::Rook => 'R',
            Self::Cannon => 'C',
            Self::Pawn => 'P',
        };
        write!(f, "{c}")
    }
}

impl PieceKind {
    /// Parses an uppercase kind letter (`K/A/E/H/R/C/P`).
    #[must_use]
    pub fn from_char(c: char) -> Option<Self> {
        Some(match c.to_ascii_uppercase() {
            'K' => Self::King,
            'A' => Self::Advisor,
            'E' => Self::Elephant,
            'H' => Self::Horse,
            'R' => Self::Rook,
            'C' => Self::Cannon,
            'P' => Self::Pawn,
            _ => return None,
        })
    }

    /// The movement kind of a hidden piece sitting on `pos`, derived from the
    /// standard Xiangqi starting layout (`spec.md` §3 "Movement kind").
    /// Returns `None` for squares no piece starts on.
    #[must_use]
    pub fn for_start_square(pos: Position) -> Option<Self> {
        let row = match pos.colour_of_back_rank() {
            Colour::Red => pos.row,
            Colour::Black => 9 - pos.row,
        };
        match (row, pos.col) {
            (0, 0 | 8) => Some(Self::Rook),
            (0, 1 | 7) => Some(Self::Horse),
            (0, 2 | 6) => Some(Self::Elephant),
            (0, 3 | 5) => Some(Self::Advisor),
            (0, 4) => Some(Self::King),
            (2, 1 | 7) => Some(Self::Cannon),
            (3, 0 | 2 | 4 | 6 | 8) => Some(Self::Pawn),
            _ => None,
        }
    }
}

impl Colour {
    /// The other colour.
    #[must_use]
    pub const fn flip(self) -> Self {
        match self {
            Self::Red => Self::Black,
            Self::Black => Self::Red,
        }
    }

    /// Red's back rank is row 0, Black's is row 9 (`spec.md` §3).
    #[must_use]
    pub const fn back_rank(self) -> u8 {
        match self {
            Self::Red => 0,
            Self::Black => 9,
        }
    }

    /// Whether `row` is on this colour's side of the river (`spec.md`
    /// glossary "River").
    #[must_use]
    pub const fn owns_row(self, row: u8) -> bool {
        match self {
            Self::Red => row <= 4,
            Self::Black => row >= 5,
        }
    }
}

impl Display for Colour {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Red => "red",
            Self::Black => "black",
        })
    }
}

/// A square on the 10x9 board: `row` in `0..=9` (0 is Red's back rank, 9 is
/// Black's), `col` in `0..=8`.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub row: u8,
    pub col: u8,
}

/// The board's total square count, `10 * 9`.
pub const BOARD_SQUARES: usize = 90;

impl Position {
    /// Builds a position without checking bounds; used only where `row`/`col`
    /// are already known to be in range (board construction, move
    /// generation).
    #[must_use]
    pub const fn new(row: u8, col: u8) -> Self {
        Self { row, col }
    }

    /// `true` iff both coordinates are on the 10x9 board.
    #[must_use]
    pub const fn in_bounds(self) -> bool {
        self.row <= 9 && self.col <= 8
    }

    /// Flattened index into a 90-element board array.
    #[must_use]
    pub const fn index(self) -> usize {
        self.row as usize * 9 + self.col as usize
    }

    /// Inverse of [`Position::index`].
    #[must_use]
    pub const fn from_index(index: usize) -> Self {
        Self::new((index / 9) as u8, (index % 9) as u8)
    }

    /// Whether this square lies in either side's palace (`spec.md` §3).
    #[must_use]
    pub const fn in_palace(self) -> bool {
        self.col >= 3 && self.col <= 5 && (self.row <= 2 || self.row >= 7)
    }

    /// Whether this square lies in `colour`'s own palace.
    #[must_use]
    pub const fn in_own_palace(self, colour: Colour) -> bool {
        self.col >= 3
            && self.col <= 5
            && match colour {
                Colour::Red => self.row <= 2,
                Colour::Black => self.row >= 7,
            }
    }

    /// Whether this square is on `colour`'s own side of the river.
    #[must_use]
    pub const fn on_own_side(self, colour: Colour) -> bool {
        colour.owns_row(self.row)
    }

    /// Which colour's back two ranks (the starting ranks) this square falls
    /// in, used to resolve [`PieceKind::for_start_square`]. Only meaningful
    /// for squares a piece actually starts on in the standard layout.
    const fn colour_of_back_rank(self) -> Colour {
        if self.row <= 4 {
            Colour::Red
        } else {
            Colour::Black
        }
    }

    /// Parses algebraic square notation: a column letter `a..=i` followed by
    /// a row digit `0..=9` (`spec.md` §4.3 "Move string").
    #[must_use]
    pub fn from_algebraic(s: &str) -> Option<Self> {
        let mut chars = s.chars();
        let col_char = chars.next()?;
        let row_char = chars.next()?;
        if chars.next().is_some() {
            return None;
        }
        if !('a'..='i').contains(&col_char) {
            return None;
        }
        let col = col_char as u8 - b'a';
        let row = row_char.to_digit(10)? as u8;
        let pos = Self::new(row, col);
        pos.in_bounds().then_some(pos)
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", (b'a' + self.col) as char, self.row)
    }
}

/// Whether a piece on the board is face-down or has been flipped.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum PieceState {
    Hidden,
    Revealed,
}

/// A piece occupying a square: its owner, true identity, face state and
/// location (`spec.md` §3 "Piece").
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Piece {
    pub colour: Colour,
    pub true_kind: PieceKind,
    pub state: PieceState,
    pub position: Position,
}

impl Piece {
    /// The kind this piece currently moves as: its positional kind while
    /// [`PieceState::Hidden`], its true kind once [`PieceState::Revealed`]
    /// (`spec.md` §3 "Movement kind").
    #[must_use]
    pub fn movement_kind(&self) -> PieceKind {
        match self.state {
            PieceState::Revealed => self.true_kind,
            PieceState::Hidden => {
                PieceKind::for_start_square(self.position).unwrap_or(self.true_kind)
            }
        }
    }

    #[must_use]
    pub const fn is_hidden(&self) -> bool {
        matches!(self.state, PieceState::Hidden)
    }
}

/// One entry in a colour's captured-piece ledger (`spec.md` §3
/// "Captured-ledger"). `true_kind` is `None` when the viewer never learned the
/// piece's identity.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct CapturedEntry {
    pub true_kind: Option<PieceKind>,
    pub was_hidden: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_square_kinds_match_standard_layout() {
        assert_eq!(PieceKind::for_start_square(Position::new(0, 0)), Some(PieceKind::Rook));
        assert_eq!(PieceKind::for_start_square(Position::new(0, 4)), Some(PieceKind::King));
        assert_eq!(PieceKind::for_start_square(Position::new(2, 1)), Some(PieceKind::Cannon));
        assert_eq!(PieceKind::for_start_square(Position::new(3, 4)), Some(PieceKind::Pawn));
        assert_eq!(PieceKind::for_start_square(Position::new(9, 0)), Some(PieceKind::Rook));
        assert_eq!(PieceKind::for_start_square(Position::new(7, 7)), Some(PieceKind::Cannon));
        assert_eq!(PieceKind::for_start_square(Position::new(5, 4)), None);
    }

    #[test]
    fn algebraic_round_trips() {
        let pos = Position::new(4, 2);
        assert_eq!(pos.to_string(), "c4");
        assert_eq!(Position::from_algebraic("c4"), Some(pos));
        assert_eq!(Position::from_algebraic("j4"), None);
        assert_eq!(Position::from_algebraic("a99"), None);
    }

    #[test]
    fn palace_and_side_predicates() {
        assert!(Position::new(1, 4).in_own_palace(Colour::Red));
        assert!(!Position::new(3, 4).in_own_palace(Colour::Red));
        assert!(Position::new(8, 3).in_own_palace(Colour::Black));
        assert!(Position::new(4, 0).on_own_side(Colour::Red));
        assert!(!Position::new(5, 0).on_own_side(Colour::Red));
    }
}
