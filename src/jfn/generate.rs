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

//! The generate half of `spec.md` §4.3: deterministic given the state and
//! viewer.

use std::fmt::Write as _;

use crate::board::Board;
use crate::defs::{CapturedEntry, Colour, Position};

pub fn generate(board: &Board, turn: Colour, viewer: Colour) -> String {
    format!(
        "{} {} {} {}",
        encode_board(board),
        encode_captured(board, viewer),
        encode_colour(turn),
        encode_colour(viewer)
    )
}

fn encode_colour(colour: Colour) -> char {
    match colour {
        Colour::Red => 'r',
        Colour::Black => 'b',
    }
}

fn encode_board(board: &Board) -> String {
    let mut ranks = Vec::with_capacity(10);
    for row in (0..=9).rev() {
        let mut rank = String::with_capacity(9);
        let mut empties = 0u8;
        for col in 0..9 {
            match board.at(Position::new(row, col)) {
                None => empties += 1,
                Some(piece) => {
                    if empties > 0 {
                        let _ = write!(rank, "{empties}");
                        empties = 0;
                    }
                    rank.push(square_char(piece));
                }
            }
        }
        if empties > 0 {
            let _ = write!(rank, "{empties}");
        }
        ranks.push(rank);
    }
    ranks.join("/")
}

fn square_char(piece: &crate::defs::Piece) -> char {
    if piece.is_hidden() {
        match piece.colour {
            Colour::Red => 'X',
            Colour::Black => 'x',
        }
    } else {
        let c = piece.true_kind.to_string().chars().next().unwrap_or('?');
        match piece.colour {
            Colour::Red => c.to_ascii_uppercase(),
            Colour::Black => c.to_ascii_lowercase(),
        }
    }
}

fn encode_captured(board: &Board, viewer: Colour) -> String {
    format!(
        "{}:{}",
        encode_captured_half(board.captured(Colour::Red), Colour::Red, viewer),
        encode_captured_half(board.captured(Colour::Black), Colour::Black, viewer)
    )
}

fn encode_captured_half(entries: &[CapturedEntry], colour: Colour, viewer: Colour) -> String {
    if entries.is_empty() {
        return "-".to_owned();
    }
    let mut out = String::with_capacity(entries.len());
    for entry in entries {
        let ch = match (entry.was_hidden, colour == viewer) {
            (false, _) => entry_letter(entry).to_ascii_uppercase(),
            (true, true) => '?',
            (true, false) => entry_letter(entry).to_ascii_lowercase(),
        };
        out.push(ch);
    }
    out
}

fn entry_letter(entry: &CapturedEntry) -> char {
    entry.true_kind.map_or('?', |k| k.to_string().chars().next().unwrap_or('?'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jfn::parse_unchecked;

    #[test]
    fn hides_opponent_victim_identity_from_the_victim() {
        let mut board = Board::empty();
        board.push_captured(Colour::Red, CapturedEntry { true_kind: Some(crate::defs::PieceKind::Pawn), was_hidden: true });
        let encoded = encode_captured(&board, Colour::Red);
        assert_eq!(encoded, "?:-");
        let encoded_for_opponent = encode_captured(&board, Colour::Black);
        assert_eq!(encoded_for_opponent, "p:-");
    }

    #[test]
    fn scenario_capture_ledger_shows_uppercase_for_revealed_capture() {
        let s = "4k4/9/9/9/4c4/4R4/9/9/9/4K4 -:- r r";
        let parsed = parse_unchecked(s).unwrap();
        let mut board = parsed.board;
        let mv = crate::board::Move::quiet(Position::new(3, 4), Position::new(4, 4));
        board.apply(mv).unwrap();
        let encoded = encode_captured(&board, Colour::Red);
        assert_eq!(encoded, "-:C");
    }
}
