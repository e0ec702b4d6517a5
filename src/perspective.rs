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

//! The per-viewer projection of a board and the hidden-pool bookkeeping that
//! makes belief inference possible (`spec.md` §4.4). A board square's
//! hidden-ness is viewer-independent (nobody, not even the owner, knows an
//! unrevealed piece's identity); only the captured ledger's letter case
//! depends on `viewer`, matching [`crate::jfn::generate`].

use crate::board::Board;
use crate::defs::{initial_allotment, CapturedEntry, Colour, PieceKind, ALL_KINDS};

/// The multiset of kinds still consistent with a colour's hidden-on-board
/// pieces, from one viewer's perspective (`spec.md` §4.4).
#[derive(Clone, Copy, Debug, Default)]
pub struct HiddenPool {
    counts: [u32; ALL_KINDS.len()],
}

fn kind_index(kind: PieceKind) -> usize {
    ALL_KINDS.iter().position(|&k| k == kind).expect("PieceKind is always one of ALL_KINDS")
}

impl HiddenPool {
    #[must_use]
    pub fn get(&self, kind: PieceKind) -> u32 {
        self.counts[kind_index(kind)]
    }

    fn set(&mut self, kind: PieceKind, value: u32) {
        self.counts[kind_index(kind)] = value;
    }

    #[must_use]
    pub fn total(&self) -> u32 {
        self.counts.iter().sum()
    }

    /// `(kind, probability)` for every kind with non-zero count, normalised
    /// to sum to 1. Empty if the pool is empty (no hidden pieces remain).
    pub fn probabilities(&self) -> impl Iterator<Item = (PieceKind, f64)> + '_ {
        let total = f64::from(self.total());
        ALL_KINDS
            .iter()
            .copied()
            .filter(move |&k| self.get(k) > 0)
            .map(move |k| (k, f64::from(self.get(k)) / total))
    }
}

/// Whether a captured-ledger entry belonging to `colour` is known to
/// `viewer`: known if it was revealed before capture (common knowledge), or
/// if `viewer` is the opposing colour (the capturer always learns what it
/// takes) - never known if `colour == viewer`, since nobody knows the
/// identity of their own still-hidden pieces even after losing one.
#[must_use]
pub fn known_to_viewer(entry: &CapturedEntry, colour: Colour, viewer: Colour) -> bool {
    !entry.was_hidden || colour != viewer
}

/// The hidden pool of `colour`'s pieces as `viewer` can compute it: the
/// initial allotment minus every revealed-on-board piece of that colour
/// minus every captured piece of that colour whose kind `viewer` knows
/// (`spec.md` §4.4).
#[must_use]
pub fn hidden_pool(board: &Board, colour: Colour, viewer: Colour) -> HiddenPool {
    let mut pool = HiddenPool::default();
    for &kind in &ALL_KINDS {
        if kind == PieceKind::King {
            continue;
        }
        let revealed_on_board = board
            .pieces()
            .filter(|p| p.colour == colour && !p.is_hidden() && p.true_kind == kind)
            .count() as u32;
        let known_captured = board
            .captured(colour)
            .iter()
            .filter(|e| known_to_viewer(e, colour, viewer) && e.true_kind == Some(kind))
            .count() as u32;
        let remaining = initial_allotment(kind).saturating_sub(
            u8::try_from(revealed_on_board + known_captured).unwrap_or(u8::MAX),
        );
        pool.set(kind, u32::from(remaining));
    }
    pool
}

/// One piece as `viewer` sees it: hidden pieces never expose `true_kind`
/// regardless of who owns them (`spec.md` §4.4).
#[derive(Clone, Copy, Debug)]
pub struct ViewedPiece {
    pub colour: Colour,
    pub position: crate::defs::Position,
    pub movement_kind: PieceKind,
    pub true_kind: Option<PieceKind>,
}

/// The full per-viewer projection of `board`: every piece with its hidden
/// identity masked, and the captured ledgers with viewer-specific letter-case
/// visibility already applied (`spec.md` §4.4).
#[must_use]
pub fn view(board: &Board, viewer: Colour) -> Vec<ViewedPiece> {
    board
        .pieces()
        .map(|p| ViewedPiece {
            colour: p.colour,
            position: p.position,
            movement_kind: p.movement_kind(),
            true_kind: (!p.is_hidden()).then_some(p.true_kind),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Board;
    use oorandom::Rand64;

    #[test]
    fn initial_pool_matches_the_starting_allotment() {
        let mut rng = Rand64::new(1);
        let board = Board::new_random_initial(&mut rng);
        let pool = hidden_pool(&board, Colour::Red, Colour::Red);
        assert_eq!(pool.get(PieceKind::Pawn), 5);
        assert_eq!(pool.get(PieceKind::Rook), 2);
        assert_eq!(pool.total(), 15);
    }

    #[test]
    fn scenario_hidden_pool_after_reveal() {
        use crate::board::Move;
        use crate::defs::Position;

        let s = "xxxxkxxxx/9/1x5x1/x1x1x1x1x/9/9/X1X1X1X1X/1X5X1/9/XXXXKXXXX -:- r r";
        let mut board = crate::jfn::parse(s).unwrap().board;
        let mv = Move::reveal(Position::new(0, 0), Position::new(1, 0), PieceKind::Rook);
        board.apply(mv).unwrap();
        let pool = hidden_pool(&board, Colour::Red, Colour::Red);
        assert_eq!(pool.get(PieceKind::Rook), 1);
        assert_eq!(pool.get(PieceKind::Pawn), 5);
    }

    #[test]
    fn own_loss_is_never_known_even_if_the_board_is_omniscient() {
        let mut board = Board::empty();
        board.push_captured(
            Colour::Red,
            CapturedEntry { true_kind: Some(PieceKind::Pawn), was_hidden: true },
        );
        assert!(!known_to_viewer(&board.captured(Colour::Red)[0], Colour::Red, Colour::Red));
        assert!(known_to_viewer(&board.captured(Colour::Red)[0], Colour::Red, Colour::Black));
    }

    #[test]
    fn quantitative_reveal_distribution_matches_expected_bounds() {
        let mut rng = Rand64::new(42);
        let mut pawn = 0;
        let mut rook = 0;
        for _ in 0..1000 {
            let board = Board::new_random_initial(&mut rng);
            let pool = hidden_pool(&board, Colour::Red, Colour::Red);
            let total = f64::from(pool.total());
            let draw = (rng.rand_u64() as f64 / u64::MAX as f64) * total;
            let mut acc = 0.0;
            let mut drawn = PieceKind::Pawn;
            for (kind, _) in pool.probabilities() {
                acc += f64::from(pool.get(kind));
                if draw < acc {
                    drawn = kind;
                    break;
                }
            }
            if drawn == PieceKind::Pawn {
                pawn += 1;
            } else if drawn == PieceKind::Rook {
                rook += 1;
            }
        }
        let pawn_rate = f64::from(pawn) / 1000.0;
        let rook_rate = f64::from(rook) / 1000.0;
        assert!((0.25..=0.45).contains(&pawn_rate), "pawn rate {pawn_rate}");
        assert!((0.08..=0.20).contains(&rook_rate), "rook rate {rook_rate}");
    }
}
