//! Cross-module perft scenarios: position parsing, move generation, and
//! make/unmake wired together end to end through the public API.

use wyrm::board::Position;
use wyrm::perft::perft;

fn pos_from(fen: &str) -> Position {
    let mut pos = Position::new();
    pos.from_fen(fen).unwrap();
    pos
}

#[test]
fn startpos_depths_1_to_3() {
    let mut pos = Position::startpos();
    assert_eq!(perft(&mut pos, 1), 20);
    assert_eq!(perft(&mut pos, 2), 400);
    assert_eq!(perft(&mut pos, 3), 8_902);
}

#[test]
#[ignore]
fn startpos_depth_4() {
    let mut pos = Position::startpos();
    assert_eq!(perft(&mut pos, 4), 197_281);
}

#[test]
#[ignore]
fn startpos_depth_5() {
    let mut pos = Position::startpos();
    assert_eq!(perft(&mut pos, 5), 4_865_609);
}

#[test]
fn kiwipete_depths_1_to_2() {
    let mut pos = pos_from("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1");
    assert_eq!(perft(&mut pos, 1), 48);
    assert_eq!(perft(&mut pos, 2), 2_039);
}

#[test]
#[ignore]
fn kiwipete_depth_3() {
    let mut pos = pos_from("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1");
    assert_eq!(perft(&mut pos, 3), 97_862);
}

#[test]
fn endgame_position_depths_1_to_3() {
    let mut pos = pos_from("8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1");
    assert_eq!(perft(&mut pos, 1), 14);
    assert_eq!(perft(&mut pos, 2), 191);
    assert_eq!(perft(&mut pos, 3), 2_812);
}

#[test]
#[ignore]
fn endgame_position_depth_4() {
    let mut pos = pos_from("8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1");
    assert_eq!(perft(&mut pos, 4), 43_238);
}

#[test]
fn promotion_heavy_position_depths_1_to_2() {
    let mut pos = pos_from("r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2pP/R2Q1RK1 w kq - 0 1");
    assert_eq!(perft(&mut pos, 1), 6);
    assert_eq!(perft(&mut pos, 2), 264);
}

#[test]
#[ignore]
fn promotion_heavy_position_depth_3() {
    let mut pos = pos_from("r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2pP/R2Q1RK1 w kq - 0 1");
    assert_eq!(perft(&mut pos, 3), 9_467);
}

#[test]
fn castling_rights_edge_case_depths_1_to_2() {
    let mut pos = pos_from("rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8");
    assert_eq!(perft(&mut pos, 1), 44);
    assert_eq!(perft(&mut pos, 2), 1_486);
}

#[test]
#[ignore]
fn castling_rights_edge_case_depth_3() {
    let mut pos = pos_from("rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8");
    assert_eq!(perft(&mut pos, 3), 62_379);
}
