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

//! Iterative-deepening expectimax (`spec.md` §4.7). The tree has three node
//! kinds: MAX/MIN choice nodes with standard alpha-beta, and CHANCE nodes at
//! a reveal-move, whose value is the probability-weighted sum over the
//! mover's own hidden pool. The search never samples a chance outcome; it
//! enumerates every kind the pool still gives nonzero weight to.

use std::time::Duration;

use crate::board::{Board, Move};
use crate::defs::Colour;
use crate::evaluation::Evaluator;

/// The node-kind logic: [`expectimax::search_node`] and the chance-node
/// resolution it delegates reveal-moves to.
pub mod expectimax;
/// The root loop that drives [`expectimax`] one depth deeper each pass.
pub mod iterative_deepening;
/// The soft wall-clock deadline iterative deepening checks between passes.
pub mod time;

/// How many root moves [`SearchReport::ranked`] keeps, by default.
pub const DEFAULT_TOP_N: usize = 20;
/// A depth past which a jieqi search is never going to finish in practice;
/// the time budget is almost always what actually stops it.
pub const DEFAULT_MAX_DEPTH: u8 = 64;

/// A magnitude comfortably larger than any material-based evaluation, used to
/// score a won or lost position. Offsetting it by the remaining search depth
/// makes the search prefer a shallower win and a deeper loss, the usual
/// distance-to-mate idea applied to Jieqi's king-capture and
/// no-legal-moves-loses terminal conditions.
pub const WIN_SCORE: i32 = 1_000_000;

/// A search budget: how long to keep deepening, and a hard depth cap.
#[derive(Clone, Copy, Debug)]
pub struct Limits {
    pub time_limit: Duration,
    pub max_depth: u8,
}

impl Limits {
    #[must_use]
    pub fn new(time_limit: Duration) -> Self {
        Self { time_limit, max_depth: DEFAULT_MAX_DEPTH }
    }
}

/// One root move and the score the search settled on for it, from the
/// searching side's perspective.
#[derive(Clone, Copy, Debug)]
pub struct RankedMove {
    pub mv: Move,
    pub score: i32,
}

/// The result of a completed search call, including the per-depth stats a
/// battle report wants alongside the move (`spec.md` §4.7, §4.8).
#[derive(Clone, Debug)]
pub struct SearchReport {
    /// Root moves sorted by score descending, capped at the caller's `N`.
    pub ranked: Vec<RankedMove>,
    pub nodes: u64,
    pub depth: u8,
    pub elapsed: Duration,
}

impl SearchReport {
    #[must_use]
    pub fn nps(&self) -> u64 {
        let micros = self.elapsed.as_micros().max(1) as u64;
        self.nodes * 1_000_000 / micros
    }

    #[must_use]
    pub fn best(&self) -> Option<Move> {
        self.ranked.first().map(|r| r.mv)
    }
}

/// A named searcher: an [`Evaluator`] plus the knobs the strategy registry
/// (`spec.md` §6) exposes per name. `noise` perturbs leaf evaluations by up
/// to `±noise`, seeded per call, giving strategies like `muses`/`muses2`
/// varied but reproducible play without the search itself ever sampling a
/// chance outcome (`spec.md` §4.7 "Determinism").
pub struct Searcher {
    pub evaluator: Box<dyn Evaluator>,
    pub top_n: usize,
    pub noise: i32,
}

impl Searcher {
    #[must_use]
    pub fn new(evaluator: Box<dyn Evaluator>) -> Self {
        Self { evaluator, top_n: DEFAULT_TOP_N, noise: 0 }
    }

    #[must_use]
    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }

    #[must_use]
    pub fn with_noise(mut self, noise: i32) -> Self {
        self.noise = noise;
        self
    }

    /// Runs iterative deepening from `board` on behalf of `side`, seeded by
    /// `seed` for reproducible noise.
    #[must_use]
    pub fn search(&self, board: &Board, side: Colour, limits: Limits, seed: u64) -> SearchReport {
        iterative_deepening::run(self, board, side, limits, seed)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::defs::Position;
    use crate::evaluation::strategies::Baseline;
    use crate::jfn;

    #[test]
    fn finds_the_only_winning_capture() {
        // Red's rook can take black's king outright; even a shallow search
        // should prefer it over any quiet move.
        let s = "4k4/9/9/9/4R4/9/9/9/9/4K4 -:- r r";
        let board = jfn::parse_unchecked(s).unwrap().board;
        let searcher = Searcher::new(Box::new(Baseline));
        let report = searcher.search(&board, Colour::Red, Limits::new(Duration::from_millis(50)), 1);
        let best = report.best().expect("red has legal moves");
        assert_eq!(best.from, Position::new(5, 4));
        assert_eq!(best.to, Position::new(9, 4));
    }

    #[test]
    fn never_returns_no_move_when_legal_moves_exist() {
        let mut rng = oorandom::Rand64::new(3);
        let board = Board::new_random_initial(&mut rng);
        let searcher = Searcher::new(Box::new(Baseline));
        let report = searcher.search(&board, Colour::Red, Limits::new(Duration::from_millis(1)), 9);
        assert!(report.best().is_some());
    }
}
