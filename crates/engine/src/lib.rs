//! Lanternlog engine library.
//!
//! Persistence, import/export and the command-line driver for a campaign
//! document validated by `lanternlog-domain`.
//!
//! ## Structure
//!
//! - `infrastructure/` - Ports, storage adapters, clock, configuration, debouncing
//! - `stores/` - The read-migrate-validate-merge-write path for the campaign
//! - `use_cases/` - Debounced saves, import and export
//! - `app` - Application composition

pub mod app;
pub mod infrastructure;
pub mod stores;
pub mod use_cases;

pub use app::App;
