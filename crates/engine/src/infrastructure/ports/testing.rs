//! Testability ports for injecting time and randomness.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

// =============================================================================
// Testability Ports
// =============================================================================

#[cfg_attr(test, mockall::automock)]
pub trait ClockPort: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Source of generated identifiers.
#[cfg_attr(test, mockall::automock)]
pub trait RandomPort: Send + Sync {
    fn gen_uuid(&self) -> Uuid;
}

impl<C: ClockPort + ?Sized> ClockPort for Arc<C> {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }
}
