//! Shared utilities for the gold-backed token ledger.

pub mod logging;

pub use logging::{init_logging, LogFormat};
