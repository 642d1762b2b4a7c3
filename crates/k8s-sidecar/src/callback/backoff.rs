use std::time::Duration;

use tokio::time::Instant;

/// Exponential backoff bounded by a total elapsed-time budget.
///
/// The clock starts when the backoff is created. No delay is handed out that
/// would end past the budget, so the whole retry sequence has a hard ceiling.
#[derive(Debug)]
pub struct ExponentialBackoff {
    current_interval: Duration,
    multiplier: f64,
    max_interval: Duration,
    max_elapsed: Duration,
    started: Instant,
}

impl ExponentialBackoff {
    pub fn new(
        initial_interval: Duration,
        multiplier: f64,
        max_interval: Duration,
        max_elapsed: Duration,
    ) -> Self {
        Self {
            current_interval: initial_interval,
            multiplier,
            max_interval,
            max_elapsed,
            started: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Time left in the budget, zero once it is spent.
    pub fn remaining(&self) -> Duration {
        self.max_elapsed.saturating_sub(self.elapsed())
    }

    /// Returns the delay before the next attempt, or `None` when retrying
    /// should stop.
    pub fn next_backoff(&mut self) -> Option<Duration> {
        let delay = self.current_interval;
        if self.elapsed() + delay > self.max_elapsed {
            return None;
        }

        let grown = self.current_interval.as_secs_f64() * self.multiplier;
        self.current_interval = Duration::try_from_secs_f64(grown)
            .map(|next| next.min(self.max_interval))
            .unwrap_or(self.max_interval);

        Some(delay)
    }
}
