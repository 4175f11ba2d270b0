//! Failed-login bookkeeping for the account lockout policy.

use std::collections::HashMap;
use std::fmt;
use std::sync::Mutex;

/// Remaining login attempts, rendered as `1 attempt` / `2 attempts`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttemptsLeft(pub u32);

impl fmt::Display for AttemptsLeft {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 == 1 {
            write!(f, "1 attempt")
        } else {
            write!(f, "{} attempts", self.0)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptOutcome {
    Remaining(AttemptsLeft),
    Exhausted,
}

/// Per-username countdown of consecutive wrong passwords.
///
/// Counters live in memory only; a restart gives every account a fresh set
/// of attempts.
pub struct LoginAttempts {
    max_attempts: u32,
    failures: Mutex<HashMap<String, u32>>,
}

impl LoginAttempts {
    #[must_use]
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            failures: Mutex::new(HashMap::new()),
        }
    }

    #[must_use]
    pub const fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn record_failure(&self, username: &str) -> AttemptOutcome {
        let mut failures = self
            .failures
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);

        let count = failures.entry(username.to_string()).or_insert(0);
        *count = (*count + 1).min(self.max_attempts);

        if *count >= self.max_attempts {
            AttemptOutcome::Exhausted
        } else {
            AttemptOutcome::Remaining(AttemptsLeft(self.max_attempts - *count))
        }
    }

    pub fn reset(&self, username: &str) {
        self.failures
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .remove(username);
    }

    #[must_use]
    pub fn remaining(&self, username: &str) -> u32 {
        let failures = self
            .failures
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        self.max_attempts - failures.get(username).copied().unwrap_or(0)
    }
}
