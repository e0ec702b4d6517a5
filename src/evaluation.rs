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

//! Static position evaluation (`spec.md` §4.6). The search treats every
//! [`Evaluator`] as an opaque side-relative scoring function; named
//! strategies live in [`strategies`].

pub mod strategies;
pub mod values;

use crate::board::Board;
use crate::defs::Colour;
use crate::movegen;
use values::{piece_value, CHECK_BONUS, CROSSED_RIVER_PAWN_BONUS, MOBILITY_WEIGHT};

/// A side-relative static evaluator: positive favours `side` (`spec.md` §9
/// "all evaluators return side-relative scores").
pub trait Evaluator: Send + Sync {
    fn evaluate(&self, board: &Board, side: Colour) -> i32;
}

/// The material value this evaluator attributes to a single piece, used by
/// both [`material_balance`] and the reveal-aware override in
/// [`strategies::RevealAware`]. A hidden piece is valued by the movement
/// kind its square implies - the only thing about it that is public - never
/// by its true kind, which nobody (not even its owner) yet knows.
#[must_use]
pub fn positional_piece_value(board: &Board, side: Colour) -> i32 {
    let mut total = 0;
    for piece in board.pieces().filter(|p| p.colour == side) {
        total += piece_value(piece.movement_kind());
        if piece.movement_kind() == crate::defs::PieceKind::Pawn && !piece.position.on_own_side(side)
        {
            total += CROSSED_RIVER_PAWN_BONUS;
        }
    }
    total
}

/// `material(side) - material(¬side)` using [`positional_piece_value`].
#[must_use]
pub fn material_balance(board: &Board, side: Colour) -> i32 {
    positional_piece_value(board, side) - positional_piece_value(board, side.flip())
}

/// The mobility term: `5 * (|moves(side)| - |moves(¬side)|)`.
#[must_use]
pub fn mobility_balance(board: &Board, side: Colour) -> i32 {
    let own = movegen::legal_moves(board, side).len() as i32;
    let opp = movegen::legal_moves(board, side.flip()).len() as i32;
    MOBILITY_WEIGHT * (own - opp)
}

/// The in-check term: `-CHECK_BONUS` if `side` is in check, `+CHECK_BONUS`
/// if the opponent is, `0` otherwise (both are never simultaneously true).
#[must_use]
pub fn check_balance(board: &Board, side: Colour) -> i32 {
    let mut score = 0;
    if board.in_check(side) {
        score -= CHECK_BONUS;
    }
    if board.in_check(side.flip()) {
        score += CHECK_BONUS;
    }
    score
}

/// The default evaluator (`spec.md` §4.6): material + mobility + check,
/// valuing hidden pieces by their positional kind.
#[must_use]
pub fn baseline_score(board: &Board, side: Colour) -> i32 {
    material_balance(board, side) + mobility_balance(board, side) + check_balance(board, side)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jfn;

    #[test]
    fn baseline_favours_material_advantage() {
        let board = jfn::parse_unchecked("4k4/9/9/9/4c4/4R4/9/9/9/4K4 -:- r r").unwrap().board;
        assert!(baseline_score(&board, Colour::Red) > 0);
        assert!(baseline_score(&board, Colour::Black) < 0);
    }

    #[test]
    fn check_balance_penalises_the_checked_side() {
        let board = jfn::parse_unchecked("4k4/9/9/9/9/4R4/9/9/9/4K4 -:- b b").unwrap().board;
        assert_eq!(check_balance(&board, Colour::Black), -100);
        assert_eq!(check_balance(&board, Colour::Red), 100);
    }
}
