//! Perft testing module.
//!
//! Implements the **perft (performance test)** routine used to validate move
//! generation correctness by counting the leaf nodes reachable from a given
//! position at a fixed depth. Because `Position::make_move` already rejects
//! and unwinds moves that leave the mover's king in check, perft itself only
//! has to walk the pseudo-legal move list and skip what `make_move` refused.

use std::time::Instant;

use crate::board::Position;
use crate::moves::MoveList;
use crate::movegen::generate_all_moves;

/// Counts leaf nodes at `depth` plies from `pos`. `depth == 0` counts the
/// current position itself as one node.
pub fn perft(pos: &mut Position, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }

    let mut list = MoveList::new();
    generate_all_moves(pos, &mut list);

    let mut nodes = 0;
    for &m in list.iter() {
        if pos.make_move(m) {
            nodes += perft(pos, depth - 1);
            pos.unmake_move(m);
        }
    }
    nodes
}

/// Runs perft at `depth`, printing a per-root-move breakdown (the "divide"
/// variant used to localize move generation bugs).
pub fn divide(pos: &mut Position, depth: u32) -> u64 {
    let mut list = MoveList::new();
    generate_all_moves(pos, &mut list);

    let mut total = 0;
    for &m in list.iter() {
        if pos.make_move(m) {
            let nodes = if depth == 0 { 1 } else { perft(pos, depth - 1) };
            pos.unmake_move(m);
            println!("{}: {}", m.to_uci(), nodes);
            total += nodes;
        }
    }
    println!("\nTotal: {}", total);
    total
}

/// Runs perft at `depth` and reports nodes/sec, for ad-hoc benchmarking.
pub fn perft_bench(pos: &mut Position, depth: u32) -> u64 {
    let start = Instant::now();
    let nodes = perft(pos, depth);
    let elapsed = start.elapsed().as_secs_f64();
    let nps = if elapsed > 0.0 { nodes as f64 / elapsed } else { 0.0 };

    println!("Depth: {}", depth);
    println!("Nodes: {}", nodes);
    println!("Time: {:.3} s", elapsed);
    println!("NPS: {:.0}", nps);

    nodes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn startpos_perft_1() {
        let mut pos = Position::startpos();
        assert_eq!(perft(&mut pos, 1), 20);
    }

    #[test]
    fn startpos_perft_2() {
        let mut pos = Position::startpos();
        assert_eq!(perft(&mut pos, 2), 400);
    }

    #[test]
    fn startpos_perft_3() {
        let mut pos = Position::startpos();
        assert_eq!(perft(&mut pos, 3), 8902);
    }

    #[test]
    #[ignore]
    fn startpos_perft_4() {
        let mut pos = Position::startpos();
        assert_eq!(perft(&mut pos, 4), 197_281);
    }

    #[test]
    fn kiwipete_perft_1() {
        let mut pos = Position::new();
        pos.from_fen("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1").unwrap();
        assert_eq!(perft(&mut pos, 1), 48);
    }

    #[test]
    #[ignore]
    fn kiwipete_perft_2() {
        let mut pos = Position::new();
        pos.from_fen("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1").unwrap();
        assert_eq!(perft(&mut pos, 2), 2039);
    }
}
