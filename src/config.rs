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

//! Configuration for a single search call and for a battle run. Defaults
//! match the CLI surface defaults (`spec.md` §6: `--time` 0.2s/ply,
//! `--max-moves` 200).

use std::time::Duration;

use crate::search::{Limits, DEFAULT_MAX_DEPTH, DEFAULT_TOP_N};
use crate::selector::DEFAULT_THRESHOLD;

/// Knobs for one `Searcher::search` call.
#[derive(Clone, Debug)]
pub struct EngineConfig {
    pub time_limit: Duration,
    pub max_depth: u8,
    /// The `N` of `spec.md` §4.7: how many ranked root moves a report keeps.
    pub candidate_count: usize,
    /// `None` means "pick a seed from the OS"; callers that need
    /// reproducible noise (`muses`/`muses2`) pass a fixed value instead.
    pub seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            time_limit: Duration::from_millis(200),
            max_depth: DEFAULT_MAX_DEPTH,
            candidate_count: DEFAULT_TOP_N,
            seed: None,
        }
    }
}

impl EngineConfig {
    #[must_use]
    pub fn limits(&self) -> Limits {
        Limits { time_limit: self.time_limit, max_depth: self.max_depth }
    }
}

/// Knobs for one battle between two named strategies (`spec.md` §4.8, §6).
#[derive(Clone, Debug)]
pub struct BattleConfig {
    pub max_moves: u32,
    pub repetition_threshold: u32,
    pub red_strategy: String,
    pub black_strategy: String,
}

impl BattleConfig {
    #[must_use]
    pub fn new(red_strategy: impl Into<String>, black_strategy: impl Into<String>) -> Self {
        Self {
            max_moves: 200,
            repetition_threshold: DEFAULT_THRESHOLD,
            red_strategy: red_strategy.into(),
            black_strategy: black_strategy.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_config_defaults_match_the_cli_surface() {
        let config = EngineConfig::default();
        assert_eq!(config.time_limit, Duration::from_millis(200));
        assert_eq!(config.candidate_count, DEFAULT_TOP_N);
    }

    #[test]
    fn battle_config_defaults_match_the_cli_surface() {
        let config = BattleConfig::new("it2", "it3");
        assert_eq!(config.max_moves, 200);
        assert_eq!(config.repetition_threshold, 3);
    }
}
