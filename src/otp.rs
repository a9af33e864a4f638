//! OTP entry widget model.
//!
//! Six single-digit cells with focus-linked auto-advance, auto-submit when
//! all six are filled, and a 60-second resend cooldown. The rendering layer
//! is not here; this is the state the widget drives.

use std::future::Future;

use tracing::debug;

pub const OTP_LEN: usize = 6;

/// Seconds between resend attempts.
pub const RESEND_COOLDOWN_SECS: u32 = 60;

/// Result reported by the injected verify function.
#[derive(Debug, Clone)]
pub struct VerifyOutcome {
    pub success: bool,
    pub message: Option<String>,
}

/// State of the six input cells.
///
/// Invariants: focus is always a valid cell index; completion is reported
/// exactly once per complete fill (a clear re-arms it).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OtpInput {
    cells: [Option<char>; OTP_LEN],
    focus: usize,
    fired: bool,
}

impl Default for OtpInput {
    fn default() -> Self {
        Self::new()
    }
}

impl OtpInput {
    pub fn new() -> Self {
        Self {
            cells: [None; OTP_LEN],
            focus: 0,
            fired: false,
        }
    }

    pub fn focus(&self) -> usize {
        self.focus
    }

    pub fn cell(&self, index: usize) -> Option<char> {
        self.cells.get(index).copied().flatten()
    }

    pub fn is_complete(&self) -> bool {
        self.cells.iter().all(|c| c.is_some())
    }

    /// Concatenated code, left to right, once all six cells are filled.
    pub fn code(&self) -> Option<String> {
        if self.is_complete() {
            Some(self.cells.iter().flatten().collect())
        } else {
            None
        }
    }

    /// Type one digit into the focused cell. Focus advances to the next
    /// cell; the completed code is returned exactly once, on the keystroke
    /// that fills the last empty cell.
    ///
    /// Non-digit input is ignored.
    pub fn enter(&mut self, ch: char) -> Option<String> {
        if !ch.is_ascii_digit() {
            return None;
        }

        self.cells[self.focus] = Some(ch);
        if self.focus < OTP_LEN - 1 {
            self.focus += 1;
        }

        if self.is_complete() && !self.fired {
            self.fired = true;
            return self.code();
        }
        None
    }

    /// Backspace: a filled cell is emptied in place; an empty cell moves
    /// focus one to the left (no-op at cell 0).
    pub fn backspace(&mut self) {
        if self.cells[self.focus].is_some() {
            self.cells[self.focus] = None;
            self.fired = false;
        } else if self.focus > 0 {
            self.focus -= 1;
        }
    }

    /// Empty every cell and return focus to cell 0.
    pub fn clear(&mut self) {
        self.cells = [None; OTP_LEN];
        self.focus = 0;
        self.fired = false;
    }

    /// Drive the injected verifier with a completed code. On a reported
    /// failure the cells are cleared and focus returns to cell 0; on
    /// success the cells keep their values. Transport-level errors leave
    /// the cells intact so the user can retry as-is.
    pub async fn submit<F, Fut, E>(&mut self, code: String, verify: F) -> Result<VerifyOutcome, E>
    where
        F: FnOnce(String) -> Fut,
        Fut: Future<Output = Result<VerifyOutcome, E>>,
    {
        let outcome = verify(code).await?;
        if !outcome.success {
            debug!("otp rejected, clearing cells");
            self.clear();
        }
        Ok(outcome)
    }
}

/// Resend cooldown: starts at 60, ticks down once a second, and only at
/// zero does the resend control become available again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResendCountdown {
    remaining: u32,
}

impl Default for ResendCountdown {
    fn default() -> Self {
        Self::new()
    }
}

impl ResendCountdown {
    /// A fresh countdown, already running (resend starts disabled).
    pub fn new() -> Self {
        Self {
            remaining: RESEND_COOLDOWN_SECS,
        }
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn can_resend(&self) -> bool {
        self.remaining == 0
    }

    /// One second elapses. Returns the new remaining value.
    pub fn tick(&mut self) -> u32 {
        self.remaining = self.remaining.saturating_sub(1);
        self.remaining
    }

    /// Restart the cooldown after a successful resend.
    pub fn reset(&mut self) {
        self.remaining = RESEND_COOLDOWN_SECS;
    }

    /// Async driver: one-second ticks until expiry. Dropping the future
    /// cancels the timer; the caller keeps at most one of these alive.
    pub async fn run(&mut self) {
        let mut interval = tokio::time::interval(std::time::Duration::from_secs(1));
        // The first tick of a tokio interval is immediate.
        interval.tick().await;
        while self.remaining > 0 {
            interval.tick().await;
            self.tick();
        }
    }
}
