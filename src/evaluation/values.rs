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

//! Static piece values and positional bonuses (`spec.md` §4.6).

use crate::defs::PieceKind;

/// The baseline material value of `kind`, in centipawn-style units.
#[must_use]
pub const fn piece_value(kind: PieceKind) -> i32 {
    match kind {
        PieceKind::King => 10_000,
        PieceKind::Rook => 900,
        PieceKind::Cannon => 450,
        PieceKind::Horse => 400,
        PieceKind::Elephant | PieceKind::Advisor => 200,
        PieceKind::Pawn => 100,
    }
}

/// The bonus added for a pawn that has crossed the river, where it gains
/// sideways mobility (`spec.md` §4.6, glossary "River").
pub const CROSSED_RIVER_PAWN_BONUS: i32 = 50;

/// The mobility term's weight per legal-move-count difference (`spec.md`
/// §4.6: `5 * (|moves(side)| - |moves(¬side)|)`).
pub const MOBILITY_WEIGHT: i32 = 5;

/// The magnitude of the in-check penalty/bonus (`spec.md` §4.6).
pub const CHECK_BONUS: i32 = 100;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn king_outweighs_everything_else() {
        assert!(piece_value(PieceKind::King) > piece_value(PieceKind::Rook) * 10);
    }
}
