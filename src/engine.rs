//! Ties position state and search-global bookkeeping into one object,
//! constructed once and owned by the UCI loop, per the original's
//! "everything lives in one process-wide struct" design collapsed into a
//! single owned value instead of statics.

use std::sync::mpsc::Receiver;

use crate::board::Position;
use crate::clock::{Deadline, TimeControl};
use crate::movegen::generate_all_moves;
use crate::moves::{Move, MoveList};
use crate::search::{Limits, SearchResult, Searcher};

pub struct Engine {
    pub position: Position,
    /// True until the first `go` after construction or `ucinewgame`, used to
    /// pick the `movestogo = 120` rule for the first move of a game.
    first_move: bool,
}

impl Engine {
    pub fn new() -> Self {
        Self { position: Position::startpos(), first_move: true }
    }

    pub fn new_game(&mut self) {
        self.position = Position::startpos();
        self.first_move = true;
    }

    pub fn set_position_fen(&mut self, fen: &str) -> Result<(), &'static str> {
        self.position.from_fen(fen)
    }

    pub fn set_start_position(&mut self) {
        self.position.set_startpos();
    }

    /// Applies one UCI long-algebraic move (e.g. `e2e4`, `e7e8q`) by
    /// matching it against the pseudo-legal move list. Returns `false` if no
    /// generated move matches, per spec: parsing stops at the first
    /// unmatched token and already-applied moves are kept.
    pub fn apply_uci_move(&mut self, uci_move: &str) -> bool {
        let Some(m) = self.find_move(uci_move) else { return false };
        self.position.make_move(m)
    }

    fn find_move(&self, uci_move: &str) -> Option<Move> {
        let bytes = uci_move.as_bytes();
        if bytes.len() < 4 {
            return None;
        }
        let from = crate::types::parse_square(&uci_move[0..2])?;
        let to = crate::types::parse_square(&uci_move[2..4])?;
        let promo_char = uci_move.chars().nth(4);

        let mut moves = MoveList::new();
        generate_all_moves(&self.position, &mut moves);

        moves.iter().copied().find(|m| {
            if m.source() != from || m.dest() != to {
                return false;
            }
            match (m.promoted(), promo_char) {
                (Some(p), Some(c)) => p.to_char().to_ascii_lowercase() == c.to_ascii_lowercase(),
                (None, None) => true,
                _ => false,
            }
        })
    }

    /// Runs one iterative-deepening search under the given time control and
    /// returns the result, prefixing the budget with the first-move rule.
    pub fn go(&mut self, tc: TimeControl, rx: Option<&Receiver<String>>) -> SearchResult {
        use crate::types::Color;

        let white_to_move = self.position.side_to_move() == Color::White;
        let budget = tc.budget_ms(white_to_move, self.first_move);
        self.first_move = false;

        let deadline = match budget {
            Some(ms) => Deadline::new(Some(ms)),
            None => Deadline::infinite(),
        };

        let max_depth = tc.depth.unwrap_or(64);
        let mut searcher = Searcher::new(rx, deadline);
        searcher.iterative_deepening(&mut self.position, Limits { max_depth, move_time_ms: tc.move_time_ms })
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}
