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

//! A Jieqi (revealed chess, "dark chess" on a Xiangqi board) rules engine:
//! legal move generation over a board of face-down pieces, the JFN text
//! encoding of a position, an expectimax search that reasons about a hidden
//! piece's identity as a probability distribution rather than peeking at it,
//! and a battle driver that plays named strategies against each other.

// Test code favours `unwrap()`/bare assertions for readability over the
// `Result`-propagating style the crate otherwise holds itself to, and
// `panic_in_result_fn` has no meaning once a test has no `Result` to return.
#![cfg_attr(
    test,
    allow(clippy::unwrap_used, clippy::missing_assert_message, clippy::panic_in_result_fn)
)]

#[cfg(test)]
mod bench;

pub mod battle;
pub mod board;
pub mod config;
pub mod defs;
pub mod error;
pub mod evaluation;
pub mod jfn;
pub mod movegen;
pub mod perspective;
pub mod search;
pub mod selector;
pub mod strategy;
