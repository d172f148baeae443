//! Rate Limiter Module
//!
//! Per-client fixed-window admission control, configured per route class.
//! State lives in process memory; a restart resets every window.

mod window;

use std::sync::Arc;

use dashmap::DashMap;

pub use window::{Admission, RateWindow};

use crate::clock::SharedClock;
use crate::config::Config;
use crate::error::{AppError, Result};

// == Route Class ==
/// Throttling class of a route. Each class has its own windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouteClass {
    General,
    Search,
    Auth,
}

impl RouteClass {
    pub fn as_str(self) -> &'static str {
        match self {
            RouteClass::General => "general",
            RouteClass::Search => "search",
            RouteClass::Auth => "auth",
        }
    }
}

// == Limit Policy ==
/// Budget of one route class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LimitPolicy {
    pub window_ms: u64,
    pub max_requests: u32,
    /// Message returned with the rejection
    pub message: &'static str,
}

impl LimitPolicy {
    const MINUTE_MS: u64 = 60 * 1000;

    pub fn general() -> Self {
        Self {
            window_ms: 15 * Self::MINUTE_MS,
            max_requests: 100,
            message: "Too many requests from this IP, please try again later",
        }
    }

    pub fn search() -> Self {
        Self {
            window_ms: 5 * Self::MINUTE_MS,
            max_requests: 50,
            message: "Search rate limit exceeded",
        }
    }

    pub fn auth() -> Self {
        Self {
            window_ms: 60 * Self::MINUTE_MS,
            max_requests: 5,
            message: "Too many authentication attempts, please try again later",
        }
    }
}

// == Limiter Config ==
/// Policies for all route classes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LimiterConfig {
    pub general: LimitPolicy,
    pub search: LimitPolicy,
    pub auth: LimitPolicy,
}

impl Default for LimiterConfig {
    fn default() -> Self {
        Self {
            general: LimitPolicy::general(),
            search: LimitPolicy::search(),
            auth: LimitPolicy::auth(),
        }
    }
}

impl LimiterConfig {
    /// Defaults with the general class taken from the environment config.
    pub fn from_config(config: &Config) -> Self {
        let mut limits = Self::default();
        limits.general.window_ms = config
            .rate_limit_window_mins
            .saturating_mul(LimitPolicy::MINUTE_MS);
        limits.general.max_requests = config.rate_limit_max;
        limits
    }

    pub fn policy(&self, class: RouteClass) -> &LimitPolicy {
        match class {
            RouteClass::General => &self.general,
            RouteClass::Search => &self.search,
            RouteClass::Auth => &self.auth,
        }
    }
}

// == Rate Limiter ==
/// Shared fixed-window limiter.
///
/// The map's entry guard locks the shard holding a key, which makes each
/// read-modify-write of a window atomic under concurrent bursts.
#[derive(Debug, Clone)]
pub struct RateLimiter {
    windows: Arc<DashMap<(String, RouteClass), RateWindow>>,
    limits: Arc<LimiterConfig>,
    clock: SharedClock,
}

impl RateLimiter {
    pub fn new(limits: LimiterConfig, clock: SharedClock) -> Self {
        Self {
            windows: Arc::new(DashMap::new()),
            limits: Arc::new(limits),
            clock,
        }
    }

    /// Counts one request from `client_key` against `class`.
    pub fn check(&self, client_key: &str, class: RouteClass) -> Admission {
        let policy = self.limits.policy(class);
        let now = self.clock.now_ms();

        let mut window = self
            .windows
            .entry((client_key.to_string(), class))
            .or_insert_with(|| RateWindow {
                window_start: now,
                count: 0,
            });
        window.record(now, policy.window_ms, policy.max_requests)
    }

    /// Admits the request or returns [`AppError::RateLimited`].
    pub fn admit(&self, client_key: &str, class: RouteClass) -> Result<()> {
        match self.check(client_key, class) {
            Admission::Allowed => Ok(()),
            Admission::Rejected { retry_after_ms } => {
                tracing::warn!(
                    client = %client_key,
                    class = class.as_str(),
                    retry_after_ms,
                    "rate limit exceeded"
                );
                Err(AppError::RateLimited {
                    message: self.limits.policy(class).message.to_string(),
                    retry_after_ms,
                })
            }
        }
    }

    /// Drops windows that have already ended and returns how many went.
    pub fn sweep(&self) -> usize {
        let now = self.clock.now_ms();
        let before = self.windows.len();
        let limits = &self.limits;
        self.windows
            .retain(|(_, class), window| !window.has_ended(now, limits.policy(*class).window_ms));
        before.saturating_sub(self.windows.len())
    }

    /// Number of (client, class) windows currently tracked.
    pub fn tracked_windows(&self) -> usize {
        self.windows.len()
    }
}
