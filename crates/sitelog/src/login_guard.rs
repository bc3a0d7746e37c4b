//! Failed-login rate limiting per client IP
//!
//! Counts failed logins inside a sliding window and blocks the IP for a
//! lockout period once the count reaches the configured maximum. Expired
//! blocks are lifted lazily the next time the IP is checked.

use std::collections::VecDeque;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use tracing::{debug, info, instrument};

use sitelog_core::{Clock, SystemClock};

/// Default failures allowed inside one window
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;

/// Configuration for the login guard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoginGuardConfig {
    /// Failures within `window` that trigger a block
    pub max_attempts: u32,
    /// Sliding window failures are counted in
    pub window: Duration,
    /// How long a block lasts
    pub lockout: Duration,
}

impl Default for LoginGuardConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            window: Duration::minutes(15),
            lockout: Duration::minutes(30),
        }
    }
}

impl LoginGuardConfig {
    /// Copy with a zero attempt count replaced by the default
    pub fn normalized(self) -> Self {
        Self {
            max_attempts: if self.max_attempts < 1 {
                DEFAULT_MAX_ATTEMPTS
            } else {
                self.max_attempts
            },
            ..self
        }
    }
}

/// Result of recording a failed login
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginAttempt {
    /// More failures are allowed before a block
    Allowed { remaining: u32 },
    /// The IP is blocked until the given time
    Blocked { until: DateTime<Utc> },
}

/// Tracks failed logins and blocks abusive IPs
pub struct LoginGuard {
    config: LoginGuardConfig,
    clock: Arc<dyn Clock>,
    /// Failure times inside the current window, oldest first
    failures: DashMap<String, VecDeque<DateTime<Utc>>>,
    /// Active blocks and when they end
    blocks: DashMap<String, DateTime<Utc>>,
}

impl Default for LoginGuard {
    fn default() -> Self {
        Self::new(LoginGuardConfig::default())
    }
}

impl LoginGuard {
    /// Create a guard using the system clock
    pub fn new(config: LoginGuardConfig) -> Self {
        Self {
            config: config.normalized(),
            clock: Arc::new(SystemClock),
            failures: DashMap::new(),
            blocks: DashMap::new(),
        }
    }

    /// Use a specific clock
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Get the effective configuration
    pub fn config(&self) -> &LoginGuardConfig {
        &self.config
    }

    /// Record a failed login from `ip`
    #[instrument(skip(self))]
    pub fn record_failure(&self, ip: &str) -> LoginAttempt {
        let now = self.clock.now_utc();

        if let Some(until) = self.active_block(ip, now) {
            return LoginAttempt::Blocked { until };
        }

        let window_start = now - self.config.window;
        let attempts = {
            let mut failures = self.failures.entry(ip.to_string()).or_default();
            while failures.front().is_some_and(|at| *at <= window_start) {
                failures.pop_front();
            }
            failures.push_back(now);
            failures.len()
        };

        let max = self.config.max_attempts as usize;
        if attempts >= max {
            let until = now + self.config.lockout;
            self.failures.remove(ip);
            self.blocks.insert(ip.to_string(), until);
            info!(%until, attempts, "Blocked IP after failed logins");
            LoginAttempt::Blocked { until }
        } else {
            let remaining = (max - attempts) as u32;
            debug!(attempts, remaining, "Recorded failed login");
            LoginAttempt::Allowed { remaining }
        }
    }

    /// Check whether `ip` is currently blocked
    pub fn is_blocked(&self, ip: &str) -> bool {
        self.active_block(ip, self.clock.now_utc()).is_some()
    }

    /// Reset the failure count after a successful login
    ///
    /// An active block stays in place.
    pub fn record_success(&self, ip: &str) {
        self.failures.remove(ip);
    }

    /// Lift a block early; returns true if one was active
    pub fn unblock(&self, ip: &str) -> bool {
        let now = self.clock.now_utc();
        self.failures.remove(ip);
        match self.blocks.remove(ip) {
            Some((_, until)) => until > now,
            None => false,
        }
    }

    /// All active blocks, soonest to expire first
    pub fn blocked(&self) -> Vec<(String, DateTime<Utc>)> {
        let now = self.clock.now_utc();
        self.blocks.retain(|_, until| *until > now);

        let mut blocked: Vec<(String, DateTime<Utc>)> = self
            .blocks
            .iter()
            .map(|entry| (entry.key().clone(), *entry.value()))
            .collect();
        blocked.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(&b.0)));
        blocked
    }

    fn active_block(&self, ip: &str, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let until = *self.blocks.get(ip)?;
        if until > now {
            Some(until)
        } else {
            self.blocks.remove_if(ip, |_, until| *until <= now);
            debug!(ip, "Block expired");
            None
        }
    }
}
