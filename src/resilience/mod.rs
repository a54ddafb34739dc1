//! Resilience directive subsystem.
//!
//! # Data Flow
//! ```text
//! GlobalSettings.proxy_next_upstream + retry_non_idempotent
//!     → retries.rs (merged proxy_next_upstream conditions)
//! ```

pub mod retries;

pub use retries::build_next_upstream;
