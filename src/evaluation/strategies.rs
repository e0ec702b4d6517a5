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

//! Named [`Evaluator`] implementations (`spec.md` §4.6). `random` and
//! `greedy` need no bespoke evaluator - they pair [`Baseline`] with a
//! zero/one-ply search, wired up in [`crate::strategy`] - so only the
//! evaluators with their own scoring bias live here.

use crate::board::Board;
use crate::defs::{Colour, PieceKind};
use crate::evaluation::values::{piece_value, CHECK_BONUS};
use crate::evaluation::{baseline_score, Evaluator};
use crate::movegen;
use crate::perspective;

/// Material + mobility + check, valuing every hidden piece by its positional
/// kind. The default evaluator behind `it2`/`it3`/`muses`/`muses2`.
#[derive(Clone, Copy, Debug, Default)]
pub struct Baseline;

impl Evaluator for Baseline {
    fn evaluate(&self, board: &Board, side: Colour) -> i32 {
        baseline_score(board, side)
    }
}

/// [`Baseline`], but a hidden piece contributes its expectation under the
/// hidden pool rather than a flat positional value: `sum(P(kind) *
/// piece_value(kind))` over the kinds still possible for that square, from
/// `side`'s own point of view.
///
/// `side` doubles as the viewer for [`perspective::hidden_pool`] - the
/// natural reading of "the evaluator's belief while it is `side`'s turn to
/// decide a move", since the trait only ever hands the evaluator one colour
/// to score from.
#[derive(Clone, Copy, Debug, Default)]
pub struct RevealAware;

impl RevealAware {
    fn expected_hidden_value(board: &Board, colour: Colour, viewer: Colour) -> i32 {
        let pool = perspective::hidden_pool(board, colour, viewer);
        if pool.total() == 0 {
            return piece_value(PieceKind::Pawn);
        }
        pool.probabilities().map(|(kind, p)| p * f64::from(piece_value(kind))).sum::<f64>().round()
            as i32
    }

    fn material(board: &Board, side: Colour, viewer: Colour) -> i32 {
        let mut total = 0;
        for piece in board.pieces().filter(|p| p.colour == side) {
            total += if piece.is_hidden() {
                Self::expected_hidden_value(board, side, viewer)
            } else {
                piece_value(piece.true_kind)
            };
        }
        total
    }
}

impl Evaluator for RevealAware {
    fn evaluate(&self, board: &Board, side: Colour) -> i32 {
        let material = Self::material(board, side, side) - Self::material(board, side.flip(), side);
        let mobility = crate::evaluation::mobility_balance(board, side);
        let check = crate::evaluation::check_balance(board, side);
        material + mobility + check
    }
}

/// The total positional value of every piece of `colour` that `attacker`
/// attacks (`movegen::is_attacked` reused with the sides swapped, as it is
/// throughout move generation).
fn attacked_value(board: &Board, colour: Colour, attacker: Colour) -> i32 {
    board
        .pieces()
        .filter(|p| p.colour == colour && movegen::is_attacked(board, p.position, attacker))
        .map(|p| piece_value(p.movement_kind()))
        .sum()
}

/// `Baseline` plus a bonus for material `side` threatens to capture and an
/// extra bonus on top of the check term, mirroring
/// `aggressive_ai.py`'s preference for captures and checks over quiet
/// improvement.
#[derive(Clone, Copy, Debug, Default)]
pub struct Aggressive;

impl Evaluator for Aggressive {
    fn evaluate(&self, board: &Board, side: Colour) -> i32 {
        let threatened = attacked_value(board, side.flip(), side);
        let extra_check = i32::from(board.in_check(side.flip())) * CHECK_BONUS;
        baseline_score(board, side) + threatened / 2 + extra_check
    }
}

/// `Baseline` minus a penalty for `side`'s own material currently hanging,
/// mirroring `defensive_ai.py`'s aversion to positions a reply could punish.
#[derive(Clone, Copy, Debug, Default)]
pub struct Defensive;

impl Evaluator for Defensive {
    fn evaluate(&self, board: &Board, side: Colour) -> i32 {
        let hanging = attacked_value(board, side, side.flip());
        baseline_score(board, side) - (hanging * 4) / 5
    }
}
