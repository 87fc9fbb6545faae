//! Port traits for infrastructure boundaries.
//!
//! These are the ONLY abstractions in the engine. Everything else is concrete types.
//! Ports exist for:
//! - Campaign persistence (could swap files -> browser storage)
//! - Clock/Random (for testing)

mod error;
mod storage;
mod testing;

// =============================================================================
// Storage Port
// =============================================================================
pub use storage::StorageProvider;

// =============================================================================
// Test-Only Mocks (only available during test builds)
// =============================================================================
#[cfg(test)]
pub use storage::MockStorageProvider;

#[cfg(test)]
pub use testing::{MockClockPort, MockRandomPort};

// =============================================================================
// Testing Ports
// =============================================================================
pub use testing::{ClockPort, RandomPort};

// =============================================================================
// Error Types
// =============================================================================
pub use error::StorageError;
