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

//! The root loop: one [`expectimax::root_search`] pass per depth, stopping
//! once the time budget is spent. `spec.md` §4.7 calls the budget soft - an
//! iteration already in flight always runs to completion, it is only the
//! decision to *start* another one that checks the clock - and the depth 1
//! pass always runs regardless of the budget, so a call never comes back
//! with no move when legal moves exist (`spec.md` §7, time-budget
//! underrun).

use oorandom::Rand64;

use super::time::Deadline;
use super::{expectimax, Limits, SearchReport, Searcher};
use crate::board::Board;
use crate::defs::Colour;

pub fn run(searcher: &Searcher, board: &Board, side: Colour, limits: Limits, seed: u64) -> SearchReport {
    let deadline = Deadline::starting_now(limits.time_limit);
    let mut rng = Rand64::new(seed.into());
    let mut scratch = board.clone();

    let mut nodes_total = 0_u64;
    let mut last = None;
    let mut depth = 1_u8;
    loop {
        if depth > limits.max_depth {
            break;
        }
        if depth > 1 && deadline.is_expired() {
            break;
        }

        let mut nodes_this_depth = 0_u64;
        let ranked =
            expectimax::root_search(searcher, &mut scratch, side, depth, &mut nodes_this_depth, &mut rng);
        nodes_total += nodes_this_depth;
        last = Some((ranked, depth));

        if deadline.is_expired() {
            break;
        }
        depth += 1;
    }

    let (mut ranked, depth) =
        last.expect("depth 1 always runs to completion regardless of the time budget");
    ranked.truncate(searcher.top_n);
    SearchReport { ranked, nodes: nodes_total, depth, elapsed: deadline.elapsed() }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::evaluation::strategies::Baseline;

    #[test]
    fn a_zero_time_budget_still_completes_depth_one() {
        let mut rng = Rand64::new(11);
        let board = Board::new_random_initial(&mut rng);
        let searcher = Searcher::new(Box::new(Baseline));
        let report = run(&searcher, &board, Colour::Red, Limits::new(Duration::ZERO), 1);
        assert_eq!(report.depth, 1);
        assert!(!report.ranked.is_empty());
    }

    #[test]
    fn ranked_moves_are_sorted_descending() {
        let mut rng = Rand64::new(12);
        let board = Board::new_random_initial(&mut rng);
        let searcher = Searcher::new(Box::new(Baseline));
        let report = run(&searcher, &board, Colour::Red, Limits::new(Duration::from_millis(20)), 2);
        for pair in report.ranked.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
    }
}
