//! Infrastructure - ports and the adapters behind them.
//!
//! - `ports` - storage, clock and id generation boundaries
//! - `storage` - memory and file-backed storage adapters
//! - `clock` - system and manual clocks, UUID generation
//! - `config` - environment configuration
//! - `debounce` - clock-driven coalescing of rapid updates

pub mod clock;
pub mod config;
pub mod debounce;
pub mod ports;
pub mod storage;
