//! Sliding-window rate limiter for vote submission.
//!
//! Windows are per key and slide continuously: an attempt counts against
//! the key for exactly `window_secs` from the moment it was admitted, so
//! capacity frees up one attempt at a time rather than all at once.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use outlast_types::Timestamp;

pub const DEFAULT_WINDOW_SECS: u64 = 12 * 60 * 60;
pub const DEFAULT_MAX_ATTEMPTS: usize = 2;

pub struct RateLimiter {
    window_secs: u64,
    max_attempts: usize,
    // Admitted timestamps per key, oldest first.
    attempts: Mutex<HashMap<String, VecDeque<u64>>>,
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW_SECS, DEFAULT_MAX_ATTEMPTS)
    }
}

impl RateLimiter {
    pub fn new(window_secs: u64, max_attempts: usize) -> Self {
        assert!(window_secs > 0 && max_attempts > 0);
        Self {
            window_secs,
            max_attempts,
            attempts: Mutex::new(HashMap::new()),
        }
    }

    /// Admit or reject one attempt for `key` at `now`.
    ///
    /// On rejection returns the number of seconds until the oldest
    /// in-window attempt expires, after which one slot opens up. Admitted
    /// attempts are recorded immediately, so check-and-record is a single
    /// operation under the lock.
    pub fn check(&self, key: &str, now: Timestamp) -> Result<(), u64> {
        let now = now.as_secs();
        let cutoff = now.saturating_sub(self.window_secs);
        let mut attempts = self.attempts.lock().unwrap_or_else(|e| e.into_inner());

        // Drop keys whose most recent attempt has aged out, so idle keys
        // do not accumulate.
        attempts.retain(|_, entries| entries.back().is_some_and(|&t| t > cutoff));

        let entries = attempts.entry(key.to_string()).or_default();
        while entries.front().is_some_and(|&t| t <= cutoff) {
            entries.pop_front();
        }

        if entries.len() >= self.max_attempts {
            // Front is the oldest in-window attempt.
            let oldest = *entries.front().unwrap_or(&now);
            return Err((oldest + self.window_secs).saturating_sub(now));
        }
        entries.push_back(now);
        Ok(())
    }

    #[cfg(test)]
    fn tracked_keys(&self) -> usize {
        self.attempts.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}
