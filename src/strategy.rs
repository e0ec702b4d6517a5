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

//! The strategy registry (`spec.md` §6): a process-wide, append-only table
//! mapping a name to a searcher factory. It is the one legitimate piece of
//! global mutable state the crate carries (`spec.md` §9), and it is built
//! once at first use and never mutated afterward.

use std::collections::HashMap;

use lazy_static::lazy_static;
use oorandom::Rand64;

use crate::board::Board;
use crate::defs::Colour;
use crate::evaluation::strategies::{Aggressive, Baseline, Defensive, RevealAware};
use crate::evaluation::Evaluator;
use crate::movegen;
use crate::search::{Limits, RankedMove, SearchReport, Searcher};

/// A playable strategy: something that can rank a board's legal moves and
/// score a position, without the battle driver needing to know whether it is
/// backed by a real search or something simpler.
pub trait Strategy: Send + Sync {
    fn search(&self, board: &Board, side: Colour, limits: Limits, seed: u64) -> SearchReport;
    fn evaluate(&self, board: &Board, side: Colour) -> i32;

    /// Overrides how many ranked root moves [`Strategy::search`] reports, the
    /// `N` of `spec.md` §4.7 (`EngineConfig::candidate_count`). Strategies
    /// with no such notion (e.g. [`RandomStrategy`], which always reports
    /// exactly one move) keep their default behaviour.
    #[must_use]
    fn with_top_n(self: Box<Self>, _top_n: usize) -> Box<dyn Strategy>;
}

impl Strategy for Searcher {
    fn search(&self, board: &Board, side: Colour, limits: Limits, seed: u64) -> SearchReport {
        Searcher::search(self, board, side, limits, seed)
    }

    fn evaluate(&self, board: &Board, side: Colour) -> i32 {
        self.evaluator.evaluate(board, side)
    }

    fn with_top_n(self: Box<Self>, top_n: usize) -> Box<dyn Strategy> {
        Box::new(Searcher { top_n, ..*self })
    }
}

/// `random_ai.py`'s strategy: ignore evaluation entirely and play a uniformly
/// random legal move (`spec.md`'s `examples/original_source/ai/random_ai.py`,
/// via SPEC_FULL.md §4.6a). Reported scores are all `0` since nothing is
/// actually compared; `evaluate` still delegates to `Baseline` so battle
/// records have a meaningful `eval_before`/`eval_after` to log.
#[derive(Clone, Copy, Debug, Default)]
pub struct RandomStrategy;

impl Strategy for RandomStrategy {
    fn search(&self, board: &Board, side: Colour, _limits: Limits, seed: u64) -> SearchReport {
        let moves = movegen::legal_moves(board, side);
        let mut ranked = Vec::with_capacity(moves.len());
        if !moves.is_empty() {
            let mut rng = Rand64::new(seed.into());
            let pick = (rng.rand_u64() % moves.len() as u64) as usize;
            ranked.push(RankedMove { mv: moves[pick], score: 0 });
        }
        SearchReport { ranked, nodes: 0, depth: 0, elapsed: std::time::Duration::ZERO }
    }

    fn evaluate(&self, board: &Board, side: Colour) -> i32 {
        Baseline.evaluate(board, side)
    }

    fn with_top_n(self: Box<Self>, _top_n: usize) -> Box<dyn Strategy> {
        self
    }
}

fn expectimax(evaluator: impl crate::evaluation::Evaluator + 'static) -> Box<dyn Strategy> {
    Box::new(Searcher::new(Box::new(evaluator)))
}

fn expectimax_noisy(evaluator: impl crate::evaluation::Evaluator + 'static, noise: i32) -> Box<dyn Strategy> {
    Box::new(Searcher::new(Box::new(evaluator)).with_noise(noise))
}

lazy_static! {
    static ref REGISTRY: HashMap<&'static str, fn() -> Box<dyn Strategy>> = {
        let mut m: HashMap<&'static str, fn() -> Box<dyn Strategy>> = HashMap::new();
        m.insert("random", || Box::new(RandomStrategy));
        // `greedy`: a one-ply baseline search already plays the best
        // immediate capture available, with no need for a duplicate
        // capture-bonus term in the evaluator.
        m.insert("greedy", || {
            Box::new(Searcher::new(Box::new(Baseline)).with_top_n(1))
        });
        m.insert("aggressive", || expectimax(Aggressive));
        m.insert("defensive", || expectimax(Defensive));
        // it2/it3/muses/muses2 share one expectimax searcher parameterised
        // by evaluator and noise (SPEC_FULL.md §4.7a).
        m.insert("it2", || expectimax(Baseline));
        m.insert("it3", || expectimax(RevealAware));
        m.insert("muses", || expectimax(Aggressive));
        m.insert("muses2", || expectimax_noisy(Defensive, 30));
        m
    };
}

/// Every name the registry currently knows, in no particular order.
#[must_use]
pub fn names() -> Vec<&'static str> {
    REGISTRY.keys().copied().collect()
}

/// Builds a fresh [`Strategy`] instance for `name`, or `None` if it is not
/// registered.
#[must_use]
pub fn build(name: &str) -> Option<Box<dyn Strategy>> {
    REGISTRY.get(name).map(|factory| factory())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_name_the_test_suite_relies_on_is_registered() {
        for name in ["random", "greedy", "aggressive", "defensive", "muses", "muses2", "it2", "it3"] {
            assert!(build(name).is_some(), "missing strategy: {name}");
        }
    }

    #[test]
    fn an_unknown_name_returns_none() {
        assert!(build("not-a-real-strategy").is_none());
    }

    #[test]
    fn random_strategy_always_returns_a_legal_move_when_one_exists() {
        let mut rng = Rand64::new(4);
        let board = Board::new_random_initial(&mut rng);
        let strategy = RandomStrategy;
        let report = strategy.search(&board, Colour::Red, Limits::new(std::time::Duration::ZERO), 5);
        assert!(report.best().is_some());
    }

    #[test]
    fn with_top_n_narrows_a_searchers_ranked_list() {
        let mut rng = Rand64::new(7);
        let board = Board::new_random_initial(&mut rng);
        let strategy = build("it2").expect("it2 is always registered").with_top_n(1);
        let report = strategy.search(&board, Colour::Red, Limits::new(std::time::Duration::from_millis(20)), 1);
        assert!(report.ranked.len() <= 1, "expected at most 1 ranked move, got {}", report.ranked.len());
    }

    #[test]
    fn with_top_n_on_random_strategy_is_a_no_op() {
        let report = Box::new(RandomStrategy)
            .with_top_n(1)
            .search(&Board::empty(), Colour::Red, Limits::new(std::time::Duration::ZERO), 1);
        assert!(report.ranked.is_empty());
    }
}
