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

//! Square-stepping helpers shared by the per-piece generators in
//! [`crate::movegen`]: ray walking for sliding pieces and the fixed offset
//! tables for steppers (king, advisor, elephant, horse).

use crate::defs::Position;

/// A `(row_delta, col_delta)` offset, applied with checked arithmetic so a
/// step off the board's edge is simply rejected rather than wrapping.
pub type Offset = (i8, i8);

/// One step in each of the four orthogonal directions.
pub const ORTHOGONAL: [Offset; 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

/// One step in each of the four diagonal directions.
pub const DIAGONAL: [Offset; 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

/// The eight horse-leap offsets, paired with the orthogonal "leg" square that
/// must be empty for that leap to be legal.
pub const HORSE_LEAPS: [(Offset, Offset); 8] = [
    ((2, 1), (1, 0)),
    ((2, -1), (1, 0)),
    ((-2, 1), (-1, 0)),
    ((-2, -1), (-1, 0)),
    ((1, 2), (0, 1)),
    ((-1, 2), (0, 1)),
    ((1, -2), (0, -1)),
    ((-1, -2), (0, -1)),
];

/// Applies `offset` to `pos`, returning `None` if the result would leave the
/// board (checked on signed arithmetic, since positions are unsigned).
#[must_use]
pub fn step(pos: Position, offset: Offset) -> Option<Position> {
    let row = i16::from(pos.row) + i16::from(offset.0);
    let col = i16::from(pos.col) + i16::from(offset.1);
    if !(0..=9).contains(&row) || !(0..=8).contains(&col) {
        return None;
    }
    let candidate = Position::new(row as u8, col as u8);
    candidate.in_bounds().then_some(candidate)
}

/// Walks from `pos` in the direction of unit `offset`, yielding every square
/// up to and including the board edge, in order. Used by rook/cannon
/// generation to find blockers.
pub fn ray(pos: Position, offset: Offset) -> impl Iterator<Item = Position> {
    std::iter::successors(step(pos, offset), move |&p| step(p, offset))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ray_stops_at_edge() {
        let squares: Vec<Position> = ray(Position::new(0, 0), (0, 1)).collect();
        assert_eq!(squares.len(), 8);
        assert_eq!(squares.last(), Some(&Position::new(0, 8)));
    }

    #[test]
    fn step_off_board_is_none() {
        assert_eq!(step(Position::new(0, 0), (-1, 0)), None);
        assert_eq!(step(Position::new(9, 8), (1, 0)), None);
    }
}
