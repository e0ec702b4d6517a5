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

//! The recursive half of the search: [`search_node`] for MAX/MIN choice
//! nodes, plus the chance-node resolution it delegates reveal-moves to for
//! the implicit CHANCE node that sits between choosing a reveal-move and
//! landing on a resulting position.

use oorandom::Rand64;

use super::{Searcher, WIN_SCORE};
use crate::board::{Board, Move};
use crate::defs::{Colour, PieceKind};
use crate::movegen;
use crate::perspective;

/// A plain negamax search over the legal moves of `side`, alpha-beta pruned.
/// Reveal-moves are resolved through the chance-node handling below rather
/// than applied directly, since their destination kind is not yet decided.
pub fn search_node(
    searcher: &Searcher,
    board: &mut Board,
    side: Colour,
    depth: u8,
    mut alpha: i32,
    beta: i32,
    nodes: &mut u64,
    rng: &mut Rand64,
) -> i32 {
    *nodes += 1;
    if depth == 0 {
        return leaf_value(searcher, board, side, rng);
    }

    let moves = movegen::legal_moves(board, side);
    if moves.is_empty() {
        // No legal reply: `side` loses (spec.md's "stalemate = loss"
        // Xiangqi convention). Prefer the loss to land as deep as possible.
        return -WIN_SCORE - i32::from(depth);
    }

    let mut best = i32::MIN;
    for mv in moves {
        let value = chance_resolved_value(searcher, board, side, mv, depth, alpha, beta, nodes, rng);
        best = best.max(value);
        alpha = alpha.max(best);
        if alpha >= beta {
            break;
        }
    }
    best
}

/// The value of `mover` playing `mv`, from `mover`'s perspective.
///
/// A quiet move (or a move by an already-revealed piece) is a single
/// deterministic continuation. A reveal-move is a CHANCE node: `mover`
/// cannot see its own hidden piece's true kind any more than an opponent
/// can, so the value is the probability-weighted average over every kind
/// still possible in `mover`'s own hidden pool, skipping any hypothesis that
/// would leave `mover` in check or the kings face to face (a reveal cannot
/// retroactively change the move's shape, but it can make the resulting
/// position illegal).
#[allow(clippy::too_many_arguments)]
fn chance_resolved_value(
    searcher: &Searcher,
    board: &mut Board,
    mover: Colour,
    mv: Move,
    depth: u8,
    alpha: i32,
    beta: i32,
    nodes: &mut u64,
    rng: &mut Rand64,
) -> i32 {
    if !mv.reveal {
        return apply_and_recurse(searcher, board, mover, mv, depth, alpha, beta, nodes, rng);
    }

    let pool = perspective::hidden_pool(board, mover, mover);
    let mut weighted_sum = 0.0_f64;
    let mut total_weight = 0.0_f64;
    for (kind, probability) in pool.probabilities() {
        let concrete = Move::reveal(mv.from, mv.to, kind);
        let outcome = board.apply_unchecked(concrete);
        let legal = !board.in_check(mover) && !board.kings_face_to_face();
        if legal {
            let value = match outcome.captured {
                Some(captured) if captured.true_kind == PieceKind::King => {
                    WIN_SCORE + i32::from(depth)
                }
                _ => -search_node(
                    searcher,
                    board,
                    mover.flip(),
                    depth - 1,
                    -beta,
                    -alpha,
                    nodes,
                    rng,
                ),
            };
            weighted_sum += probability * f64::from(value);
            total_weight += probability;
        }
        board.undo(concrete, outcome);
    }

    if total_weight <= 0.0 {
        // Every hypothesis turned out illegal - should not arise in a
        // reachable position, since the moving piece itself is always
        // consistent with at least its own kind, but fall back to a static
        // read rather than panic if it somehow does.
        return searcher.evaluator.evaluate(board, mover);
    }
    (weighted_sum / total_weight).round() as i32
}

#[allow(clippy::too_many_arguments)]
fn apply_and_recurse(
    searcher: &Searcher,
    board: &mut Board,
    mover: Colour,
    mv: Move,
    depth: u8,
    alpha: i32,
    beta: i32,
    nodes: &mut u64,
    rng: &mut Rand64,
) -> i32 {
    let outcome = board.apply_unchecked(mv);
    let value = match outcome.captured {
        Some(captured) if captured.true_kind == PieceKind::King => WIN_SCORE + i32::from(depth),
        _ => -search_node(searcher, board, mover.flip(), depth - 1, -beta, -alpha, nodes, rng),
    };
    board.undo(mv, outcome);
    value
}

fn leaf_value(searcher: &Searcher, board: &Board, side: Colour, rng: &mut Rand64) -> i32 {
    let base = searcher.evaluator.evaluate(board, side);
    if searcher.noise == 0 {
        return base;
    }
    let span = u64::from(2 * searcher.noise as u32 + 1);
    let jitter = (rng.rand_u64() % span) as i32 - searcher.noise;
    base + jitter
}

/// Evaluates every legal root move of `side` to `depth` and returns them
/// ranked by score descending. Reveal-moves go through the same chance-node
/// resolution as at any other node, so the reported score is already the
/// chance-weighted expectation.
pub fn root_search(
    searcher: &Searcher,
    board: &mut Board,
    side: Colour,
    depth: u8,
    nodes: &mut u64,
    rng: &mut Rand64,
) -> Vec<super::RankedMove> {
    let moves = movegen::legal_moves(board, side);
    let mut alpha = -WIN_SCORE - i32::from(DEPTH_HEADROOM);
    let beta = WIN_SCORE + i32::from(DEPTH_HEADROOM);
    let mut ranked = Vec::with_capacity(moves.len());
    for mv in moves {
        let score = chance_resolved_value(searcher, board, side, mv, depth, alpha, beta, nodes, rng);
        ranked.push(super::RankedMove { mv, score });
        alpha = alpha.max(score);
    }
    ranked.sort_by(|a, b| b.score.cmp(&a.score));
    ranked
}

/// Room above [`WIN_SCORE`] the root alpha/beta window allows for the
/// depth-based mate-distance offset, so a deep forced win never overflows
/// past the window's bound.
const DEPTH_HEADROOM: u8 = u8::MAX;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defs::Position;
    use crate::evaluation::strategies::Baseline;
    use crate::jfn;

    fn searcher() -> Searcher {
        Searcher::new(Box::new(Baseline))
    }

    #[test]
    fn root_search_ranks_the_mating_capture_first() {
        let s = "4k4/9/9/9/4R4/9/9/9/9/4K4 -:- r r";
        let mut board = jfn::parse_unchecked(s).unwrap().board;
        let mut nodes = 0;
        let mut rng = Rand64::new(0);
        let ranked = root_search(&searcher(), &mut board, Colour::Red, 1, &mut nodes, &mut rng);
        let best = ranked.first().expect("red has legal moves");
        assert_eq!(best.mv.from, Position::new(5, 4));
        assert_eq!(best.mv.to, Position::new(9, 4));
        assert!(best.score > WIN_SCORE);
    }

    #[test]
    fn a_depth_one_search_never_panics_on_a_near_empty_board() {
        let s = "3k5/9/9/9/9/9/9/9/9/5K3 -:- r r";
        let mut board = jfn::parse_unchecked(s).unwrap().board;
        let mut nodes = 0;
        let mut rng = Rand64::new(0);
        let score = search_node(
            &searcher(),
            &mut board,
            Colour::Red,
            1,
            i32::MIN + 1,
            i32::MAX - 1,
            &mut nodes,
            &mut rng,
        );
        assert!(score.abs() < WIN_SCORE);
    }
}
