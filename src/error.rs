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

//! Error kinds surfaced to callers (`spec.md` §7). Parse/validation failures
//! propagate as [`JfnError`]; rejected moves propagate as [`MoveError`].
//! Neither search-time underruns nor "no legal moves" are errors - those are
//! handled as data by [`crate::search`] and [`crate::battle`] respectively.

use std::fmt::{self, Display, Formatter};

/// A JFN string failed to parse, or parsed but violated one of the
/// consistency invariants in `spec.md` §4.3.
#[derive(Debug, Eq, PartialEq)]
pub enum JfnError {
    /// Wrong number of whitespace-separated fields.
    WrongFieldCount { found: usize },
    /// The board field did not have exactly 10 ranks.
    WrongRankCount { found: usize },
    /// A rank did not sum to exactly 9 columns.
    WrongColumnCount { rank_from_top: usize, found: usize },
    /// A character in the board field is not a valid piece letter, `X`/`x` or
    /// digit.
    UnknownBoardChar { ch: char },
    /// The captured field was not of the form `<red>:<black>`.
    MalformedCapturedField,
    /// A character in the captured field is not a valid kind letter or `?`.
    UnknownCapturedChar { ch: char },
    /// The turn or viewer field was not `r`/`b`.
    UnknownColourChar { ch: char },
    /// Exactly one king of each colour is required.
    KingCount { colour: &'static str, found: usize },
    /// A kind's on-board count exceeds `spec.md` §4.3 invariant 3's
    /// allotment.
    AllotmentExceeded { kind: String, colour: &'static str, found: u8, max: u8 },
    /// Hidden count for a colour exceeds `16 - revealed count` (invariant 4).
    HiddenCountExceeded { colour: &'static str },
    /// On-board plus captured does not total 16 for some colour (invariant
    /// 5).
    PieceCountMismatch { colour: &'static str, found: u8 },
    /// The two kings share a file with nothing between them (invariant 6).
    KingsFaceToFace,
    /// The side not to move is in check (invariant 7).
    OpponentInCheck,
    /// The captured field used a letter case the viewer is not entitled to
    /// (invariant 8).
    IllegalCapturedVisibility { colour: &'static str },
}

impl Display for JfnError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::WrongFieldCount { found } => {
                write!(f, "expected 4 whitespace-separated fields, found {found}")
            }
            Self::WrongRankCount { found } => write!(f, "expected 10 ranks, found {found}"),
            Self::WrongColumnCount { rank_from_top, found } => write!(
                f,
                "rank {rank_from_top} (counted from the top) has {found} columns, expected 9"
            ),
            Self::UnknownBoardChar { ch } => write!(f, "unknown board character '{ch}'"),
            Self::MalformedCapturedField => {
                write!(f, "captured field must be '<red_lost>:<black_lost>'")
            }
            Self::UnknownCapturedChar { ch } => write!(f, "unknown captured-field character '{ch}'"),
            Self::UnknownColourChar { ch } => write!(f, "expected 'r' or 'b', found '{ch}'"),
            Self::KingCount { colour, found } => {
                write!(f, "expected exactly one {colour} king, found {found}")
            }
            Self::AllotmentExceeded { kind, colour, found, max } => write!(
                f,
                "{colour} has {found} on-board pieces of kind {kind}, exceeding the allotment of {max}"
            ),
            Self::HiddenCountExceeded { colour } => {
                write!(f, "{colour} hidden count exceeds 16 minus its revealed count")
            }
            Self::PieceCountMismatch { colour, found } => write!(
                f,
                "{colour} on-board plus captured pieces total {found}, expected 16"
            ),
            Self::KingsFaceToFace => write!(f, "the two kings face each other with nothing between"),
            Self::OpponentInCheck => write!(f, "the side not to move is in check"),
            Self::IllegalCapturedVisibility { colour } => write!(
                f,
                "the {colour} captured entries use a letter case the viewer is not entitled to"
            ),
        }
    }
}

impl std::error::Error for JfnError {}

/// An attempt to apply a move that is not in the mover's legal-move set
/// (`spec.md` §7 kind 2).
#[derive(Debug, Eq, PartialEq)]
pub enum MoveError {
    /// The move string itself could not be parsed.
    Malformed(String),
    /// Source square is empty or holds the opponent's piece.
    NoMovablePiece,
    /// A reveal-move was attempted against a piece that is already revealed.
    AlreadyRevealed,
    /// A plain move was attempted against a piece that is still hidden.
    MustReveal,
    /// The move does not appear in the current legal-move set.
    NotLegal,
    /// A reveal-move was submitted without the `=<KIND>` suffix that names
    /// the revealed identity, and the board has no pre-existing true kind to
    /// fall back on.
    RevealKindRequired,
}

impl Display for MoveError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Malformed(s) => write!(f, "malformed move string '{s}'"),
            Self::NoMovablePiece => write!(f, "no piece of the side to move on the source square"),
            Self::AlreadyRevealed => write!(f, "cannot reveal a piece that is already revealed"),
            Self::MustReveal => write!(f, "a hidden piece's first move must be a reveal-move"),
            Self::NotLegal => write!(f, "move is not in the current legal-move set"),
            Self::RevealKindRequired => {
                write!(f, "reveal-move is missing the '=<KIND>' revealed-identity suffix")
            }
        }
    }
}

impl std::error::Error for MoveError {}
