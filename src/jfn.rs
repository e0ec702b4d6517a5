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

//! JFN: the perspective-dependent textual position encoding (`spec.md`
//! §4.3). A JFN string never carries the true identity of a still-hidden
//! piece - not even the owner's own - so [`ParsedPosition::board`] is a
//! viewer's projection, not the engine's omniscient in-memory board; a
//! battle-driver-owned [`crate::board::Board`] dealt by
//! [`crate::board::Board::new_random_initial`] is the only thing that ever
//! carries real hidden identities.

pub mod generate;
pub mod parse;
pub mod validate;

use crate::board::Board;
use crate::defs::Colour;
use crate::error::JfnError;

/// The result of parsing a JFN string: the board it describes plus the two
/// colour fields (`spec.md` §3 "Game state").
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedPosition {
    pub board: Board,
    pub turn: Colour,
    pub viewer: Colour,
}

/// Parses and fully validates a JFN string (`spec.md` §4.3 invariants 1-8).
pub fn parse(s: &str) -> Result<ParsedPosition, JfnError> {
    parse::parse(s)
}

/// Parses a JFN string without checking the eight invariants. See
/// [`parse::parse_unchecked`] for when this is appropriate.
pub fn parse_unchecked(s: &str) -> Result<ParsedPosition, JfnError> {
    parse::parse_unchecked(s)
}

/// Encodes `board` as seen by `viewer`, with `turn` to move (`spec.md`
/// §4.3). Deterministic: encoding the same state for the same viewer always
/// produces the same string.
#[must_use]
pub fn generate(board: &Board, turn: Colour, viewer: Colour) -> String {
    generate::generate(board, turn, viewer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_preserves_the_string() {
        let s = "4k4/9/9/9/4c4/4R4/9/9/9/4K4 -:- r r";
        let parsed = parse_unchecked(s).unwrap();
        assert_eq!(generate(&parsed.board, parsed.turn, parsed.viewer), s);
    }

    #[test]
    fn validate_after_round_trip_agrees_with_validate_before() {
        let s = "xxxxkxxxx/9/1x5x1/x1x1x1x1x/9/9/X1X1X1X1X/1X5X1/9/XXXXKXXXX -:- r r";
        let parsed = parse(s).unwrap();
        let encoded = generate(&parsed.board, parsed.turn, parsed.viewer);
        assert!(parse(&encoded).is_ok());
    }
}
