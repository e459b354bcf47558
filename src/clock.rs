//! Time control and cooperative stdin polling.
//!
//! The original engine polls a non-blocking OS read of stdin from inside the
//! search loop (`input_waiting`/`read_input`/`communicate`). Rust's standard
//! library has no portable non-blocking stdin read, so the same bridge is
//! built instead with a dedicated reader thread and a channel: one thread
//! blocks on `stdin().lines()` forever and forwards whatever it reads, while
//! both the idle UCI loop and the search's periodic check consume from the
//! same channel. This keeps the search itself single-threaded; only line
//! reading happens off the main thread.

use std::io::BufRead;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;
use std::time::Instant;

/// Spawns the background stdin reader. Call once at startup.
pub fn spawn_stdin_reader() -> Receiver<String> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            match line {
                Ok(line) => {
                    if tx.send(line).is_err() {
                        break;
                    }
                }
                Err(_) => break,
            }
        }
    });
    rx
}

/// Outcome of a non-blocking poll of the stdin channel.
pub enum PollResult {
    /// Nothing waiting.
    None,
    /// A `stop` line arrived.
    Stop,
    /// A `quit` line arrived, or the reader thread hung up.
    Quit,
    /// Some other line arrived; only meaningful when polled from the idle
    /// UCI loop, not from inside search.
    Other(String),
}

/// Non-blocking check for a `stop`/`quit` command, used by the search's
/// periodic node-count check. Any other line received here is silently
/// dropped: the UCI protocol has nothing else useful to say mid-search once
/// pondering is out of scope.
pub fn poll_for_stop(rx: &Receiver<String>) -> bool {
    loop {
        match rx.try_recv() {
            Ok(line) => {
                let cmd = line.trim();
                if cmd == "stop" || cmd == "quit" {
                    return true;
                }
                // keep draining in case several lines queued up
            }
            Err(TryRecvError::Empty) => return false,
            Err(TryRecvError::Disconnected) => return true,
        }
    }
}

/// Blocking receive used by the idle UCI loop between searches.
pub fn next_command(rx: &Receiver<String>) -> PollResult {
    match rx.recv() {
        Ok(line) => {
            let cmd = line.trim();
            match cmd {
                "quit" => PollResult::Quit,
                "stop" => PollResult::Stop,
                _ => PollResult::Other(line),
            }
        }
        Err(_) => PollResult::Quit,
    }
}

/// Wall-clock deadline for iterative deepening's time control. `None` means
/// search until told to stop (`go infinite`, or no time info given).
pub struct Deadline {
    start: Instant,
    limit_ms: Option<u64>,
}

impl Deadline {
    pub fn new(limit_ms: Option<u64>) -> Self {
        Self { start: Instant::now(), limit_ms }
    }

    pub fn infinite() -> Self {
        Self::new(None)
    }

    #[inline(always)]
    pub fn elapsed_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }

    #[inline(always)]
    pub fn expired(&self) -> bool {
        match self.limit_ms {
            Some(limit) => self.elapsed_ms() >= limit,
            None => false,
        }
    }
}

/// Time budget allocated to one `go` command, grounded in the original
/// engine's `parse_go`: `time_budget = clock/movestogo - 150ms + inc`, with
/// `movestogo` defaulting to 120 on the first move of a game and to 15 once
/// the counter reaches zero on subsequent moves.
#[derive(Copy, Clone, Debug, Default)]
pub struct TimeControl {
    pub white_time_ms: Option<u64>,
    pub black_time_ms: Option<u64>,
    pub white_inc_ms: u64,
    pub black_inc_ms: u64,
    pub moves_to_go: Option<u64>,
    pub move_time_ms: Option<u64>,
    pub depth: Option<u32>,
    pub infinite: bool,
}

impl TimeControl {
    /// Computes the budget in milliseconds for the side to move, or `None`
    /// for an unbounded search (`go infinite`, `go depth N`, or no clock info).
    pub fn budget_ms(&self, white_to_move: bool, is_first_move: bool) -> Option<u64> {
        if self.infinite {
            return None;
        }
        if let Some(move_time) = self.move_time_ms {
            return Some(move_time);
        }

        let (time_left, inc) = if white_to_move { (self.white_time_ms?, self.white_inc_ms) } else { (self.black_time_ms?, self.black_inc_ms) };

        let movestogo = self.moves_to_go.unwrap_or(if is_first_move { 120 } else { 15 }).max(1);

        let per_move = time_left / movestogo;
        let budget = per_move.saturating_sub(150).saturating_add(inc);
        Some(budget.max(1))
    }
}
