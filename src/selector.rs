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

//! The repetition-avoidance selector (`spec.md` §4.5). The engine would
//! rather give up a little material than walk into a draw it believes it is
//! not worse in.

use std::collections::HashMap;

use crate::board::Move;

/// The default repetition threshold `T` (`spec.md` §4.5, §4.8).
pub const DEFAULT_THRESHOLD: u32 = 3;

/// One root candidate paired with the board hash it would lead to, in score
/// order (descending).
#[derive(Clone, Copy, Debug)]
pub struct Candidate {
    pub mv: Move,
    pub resulting_hash: u64,
}

fn is_risky(position_count: &HashMap<u64, u32>, hash: u64, threshold: u32) -> bool {
    position_count.get(&hash).copied().unwrap_or(0) + 1 >= threshold
}

/// Picks a move from `candidates` (already sorted by score descending):
/// skip a candidate whose resulting position is at the repetition threshold
/// as long as a later candidate remains; otherwise take it. If every
/// candidate would trigger the threshold, the first is returned anyway.
///
/// # Panics
///
/// Panics if `candidates` is empty; callers only reach the selector once the
/// search has confirmed at least one legal move exists.
#[must_use]
pub fn select(candidates: &[Candidate], position_count: &HashMap<u64, u32>, threshold: u32) -> Move {
    assert!(!candidates.is_empty(), "select: no candidates to choose from");

    if candidates.iter().all(|c| is_risky(position_count, c.resulting_hash, threshold)) {
        return candidates[0].mv;
    }

    for (i, candidate) in candidates.iter().enumerate() {
        let later_exists = i + 1 < candidates.len();
        if !is_risky(position_count, candidate.resulting_hash, threshold) || !later_exists {
            return candidate.mv;
        }
    }
    unreachable!("the loop above always returns once a non-risky candidate or the last is reached")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defs::Position;

    fn mv(n: u8) -> Move {
        Move::quiet(Position::new(0, 0), Position::new(n, 0))
    }

    #[test]
    fn scenario_repetition_avoidance_skips_to_the_third_candidate() {
        let candidates = [
            Candidate { mv: mv(1), resulting_hash: 1 },
            Candidate { mv: mv(2), resulting_hash: 2 },
            Candidate { mv: mv(3), resulting_hash: 3 },
        ];
        let mut position_count = HashMap::new();
        position_count.insert(1, 2);
        position_count.insert(2, 2);
        // hash 3 is unseen, so count defaults to 0 and 0 + 1 < 3.
        let chosen = select(&candidates, &position_count, DEFAULT_THRESHOLD);
        assert_eq!(chosen, mv(3));
    }

    #[test]
    fn returns_a_non_risky_alternative_even_when_the_top_candidate_is_risky() {
        let candidates = [
            Candidate { mv: mv(1), resulting_hash: 1 },
            Candidate { mv: mv(2), resulting_hash: 2 },
        ];
        let mut position_count = HashMap::new();
        position_count.insert(1, 2);
        let chosen = select(&candidates, &position_count, DEFAULT_THRESHOLD);
        assert_eq!(chosen, mv(2));
    }

    #[test]
    fn falls_back_to_the_first_candidate_when_all_are_risky() {
        let candidates = [
            Candidate { mv: mv(1), resulting_hash: 1 },
            Candidate { mv: mv(2), resulting_hash: 2 },
        ];
        let mut position_count = HashMap::new();
        position_count.insert(1, 2);
        position_count.insert(2, 5);
        let chosen = select(&candidates, &position_count, DEFAULT_THRESHOLD);
        assert_eq!(chosen, mv(1));
    }

    #[test]
    fn a_single_non_risky_candidate_is_returned() {
        let candidates = [Candidate { mv: mv(1), resulting_hash: 1 }];
        let chosen = select(&candidates, &HashMap::new(), DEFAULT_THRESHOLD);
        assert_eq!(chosen, mv(1));
    }
}
