#![cfg(test)]

use lazy_static::lazy_static;

use crate::board::Board;
use crate::defs::Colour;
use crate::jfn;
use crate::movegen;

/// A hand-verified move-tree node count from a fully-revealed position (no
/// hidden pieces, so there is no reveal ambiguity for [`perft`] to resolve):
/// a correctness check on [`movegen::legal_moves`] and the `apply`/`undo`
/// pair it is built on, the Jieqi analogue of the teacher's chess perft
/// suite.
#[derive(Clone, Copy)]
struct PerftCase {
    jfn: &'static str,
    side: Colour,
    depth: u8,
    nodes: u64,
}

lazy_static! {
    static ref PERFT_CASES: Vec<PerftCase> = vec![
        // Two bare kings on the same file: each has three palace-adjacent
        // squares, but the one that keeps them on the same file with
        // nothing between is a flying-general violation and is filtered.
        PerftCase { jfn: "4k4/9/9/9/9/9/9/9/9/4K4 -:- r r", side: Colour::Red, depth: 1, nodes: 2 },
        PerftCase { jfn: "4k4/9/9/9/9/9/9/9/9/4K4 -:- r r", side: Colour::Red, depth: 2, nodes: 4 },
        // A revealed rook in open space plus a king whose own palace moves
        // never share a file with the lone opposing king, so nothing here
        // gets filtered by the legality check.
        PerftCase {
            jfn: "k8/9/9/9/9/4R4/9/9/9/4K4 -:- r r",
            side: Colour::Red,
            depth: 1,
            nodes: 19,
        },
    ];
}

fn perft(board: &Board, side: Colour, depth: u8) -> u64 {
    if depth == 0 {
        return 1;
    }
    let mut nodes = 0;
    for mv in movegen::legal_moves(board, side) {
        let mut scratch = board.clone();
        let outcome = scratch.apply_unchecked(mv);
        nodes += perft(&scratch, side.flip(), depth - 1);
        scratch.undo(mv, outcome);
    }
    nodes
}

#[test]
fn perft_matches_hand_counted_node_totals() {
    for case in PERFT_CASES.iter() {
        let board = jfn::parse_unchecked(case.jfn).unwrap().board;
        let counted = perft(&board, case.side, case.depth);
        assert_eq!(
            counted, case.nodes,
            "perft({}, depth {}) = {counted}, expected {}",
            case.jfn, case.depth, case.nodes
        );
    }
}
