use std::time::Duration;

use super::types::CallOutcome;

/// Default number of attempts per call.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
/// Base delay for exponential backoff: 1s, 2s, 4s, ...
pub const DEFAULT_BASE_DELAY: Duration = Duration::from_secs(1);

/// What to do after an attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryStep {
    /// Hand the outcome to the caller.
    Finish,
    /// Wait, then try again.
    Retry(Duration),
    /// Transient failure with no attempts left.
    GiveUp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    base_delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Delay after the given (zero-based) attempt: `base_delay * 2^attempt`.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 2u32.checked_pow(attempt).unwrap_or(u32::MAX);
        self.base_delay.saturating_mul(factor)
    }

    pub fn next_step(&self, outcome: &CallOutcome, attempt: u32) -> RetryStep {
        match outcome {
            CallOutcome::Success(_) | CallOutcome::PermanentFailure(_) => RetryStep::Finish,
            CallOutcome::TransientFailure(_) if attempt + 1 < self.max_attempts => {
                RetryStep::Retry(self.delay_for(attempt))
            }
            CallOutcome::TransientFailure(_) => RetryStep::GiveUp,
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ATTEMPTS, DEFAULT_BASE_DELAY)
    }
}
