//! Caller context consumed by ingestion: who is submitting, and when.

use chrono::{DateTime, Utc};

/// Identity of the caller, as known to the session/auth layer.
pub trait SessionContext {
    /// Login of the authenticated user, `None` for anonymous callers.
    fn current_login(&self) -> Option<String>;
}

/// A caller without an authenticated user.
#[derive(Debug, Clone, Copy, Default)]
pub struct Anonymous;

impl SessionContext for Anonymous {
    fn current_login(&self) -> Option<String> {
        None
    }
}

/// A caller authenticated as a fixed login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticLogin(pub String);

impl SessionContext for StaticLogin {
    fn current_login(&self) -> Option<String> {
        Some(self.0.clone())
    }
}

impl SessionContext for Option<String> {
    fn current_login(&self) -> Option<String> {
        self.clone()
    }
}

/// Source of ingestion timestamps.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that always reads the same instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}
