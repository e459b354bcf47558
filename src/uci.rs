//! UCI read/write loop.
//!
//! Line-oriented, whitespace-trimmed, matching `Jabberook.c`'s `uci_loop`:
//! `uci`/`isready`/`ucinewgame`/`position`/`go`/`stop`/`quit`, plus the
//! non-standard `go perft <n>` developer command `perft.rs` exists to
//! support.

use std::sync::mpsc::Receiver;

use crate::clock::{self, PollResult, TimeControl};
use crate::engine::Engine;
use crate::perft::{divide, perft_bench};

const ENGINE_NAME: &str = "wyrm";
const ENGINE_AUTHOR: &str = "wyrm contributors";

pub fn run() {
    let rx = clock::spawn_stdin_reader();
    let mut engine = Engine::new();

    loop {
        match clock::next_command(&rx) {
            PollResult::Quit => break,
            PollResult::Stop => {
                // A bare `stop` with no search running is a no-op.
            }
            PollResult::None => {}
            PollResult::Other(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                let mut tokens = line.split_whitespace();
                match tokens.next() {
                    Some("uci") => {
                        println!("id name {ENGINE_NAME}");
                        println!("id author {ENGINE_AUTHOR}");
                        println!("uciok");
                    }
                    Some("isready") => println!("readyok"),
                    Some("ucinewgame") => engine.new_game(),
                    Some("position") => handle_position(&mut engine, tokens),
                    Some("go") => handle_go(&mut engine, tokens, &rx),
                    Some("quit") => break,
                    // Illegal/unknown UCI input is ignored silently.
                    _ => {}
                }
            }
        }
    }
}

fn handle_position<'a>(engine: &mut Engine, tokens: impl Iterator<Item = &'a str>) {
    let tokens: Vec<&str> = tokens.collect();
    let moves_at = tokens.iter().position(|&t| t == "moves");
    let (setup, rest) = match moves_at {
        Some(idx) => (&tokens[..idx], &tokens[idx + 1..]),
        None => (&tokens[..], &[][..]),
    };

    match setup.first() {
        Some(&"startpos") => engine.set_start_position(),
        Some(&"fen") => {
            let fen = setup[1..].join(" ");
            if engine.set_position_fen(&fen).is_err() {
                eprintln!("info string invalid FEN, resetting to start position: {fen}");
                engine.set_start_position();
            }
        }
        _ => return,
    }

    for &mv in rest {
        if !engine.apply_uci_move(mv) {
            break;
        }
    }
}

fn handle_go<'a>(engine: &mut Engine, tokens: impl Iterator<Item = &'a str>, rx: &Receiver<String>) {
    let tokens: Vec<&str> = tokens.collect();

    if tokens.first() == Some(&"perft") {
        if let Some(depth_str) = tokens.get(1) {
            if let Ok(depth) = depth_str.parse::<u32>() {
                divide(&mut engine.position, depth);
            }
        }
        return;
    }
    if tokens.first() == Some(&"bench") {
        if let Some(depth_str) = tokens.get(1) {
            if let Ok(depth) = depth_str.parse::<u32>() {
                perft_bench(&mut engine.position, depth);
            }
        }
        return;
    }

    let tc = parse_go_tokens(&tokens);
    let result = engine.go(tc, Some(rx));

    if let Some(best) = result.best_move {
        println!("bestmove {}", best.to_uci());
    } else {
        println!("bestmove 0000");
    }
}

fn parse_go_tokens(tokens: &[&str]) -> TimeControl {
    let mut tc = TimeControl::default();
    let mut i = 0;
    while i < tokens.len() {
        match tokens[i] {
            "wtime" => {
                tc.white_time_ms = tokens.get(i + 1).and_then(|s| s.parse().ok());
                i += 2;
            }
            "btime" => {
                tc.black_time_ms = tokens.get(i + 1).and_then(|s| s.parse().ok());
                i += 2;
            }
            "winc" => {
                tc.white_inc_ms = tokens.get(i + 1).and_then(|s| s.parse().ok()).unwrap_or(0);
                i += 2;
            }
            "binc" => {
                tc.black_inc_ms = tokens.get(i + 1).and_then(|s| s.parse().ok()).unwrap_or(0);
                i += 2;
            }
            "movestogo" => {
                tc.moves_to_go = tokens.get(i + 1).and_then(|s| s.parse().ok());
                i += 2;
            }
            "movetime" => {
                tc.move_time_ms = tokens.get(i + 1).and_then(|s| s.parse().ok());
                i += 2;
            }
            "depth" => {
                tc.depth = tokens.get(i + 1).and_then(|s| s.parse().ok());
                i += 2;
            }
            "infinite" => {
                tc.infinite = true;
                i += 1;
            }
            _ => i += 1,
        }
    }
    tc
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_wtime_btime_and_increments() {
        let tokens: Vec<&str> = "wtime 60000 btime 55000 winc 1000 binc 500".split_whitespace().collect();
        let tc = parse_go_tokens(&tokens);
        assert_eq!(tc.white_time_ms, Some(60000));
        assert_eq!(tc.black_time_ms, Some(55000));
        assert_eq!(tc.white_inc_ms, 1000);
        assert_eq!(tc.black_inc_ms, 500);
    }

    #[test]
    fn parses_depth_and_infinite() {
        let tokens: Vec<&str> = "depth 6".split_whitespace().collect();
        let tc = parse_go_tokens(&tokens);
        assert_eq!(tc.depth, Some(6));

        let tokens: Vec<&str> = "infinite".split_whitespace().collect();
        let tc = parse_go_tokens(&tokens);
        assert!(tc.infinite);
    }
}
