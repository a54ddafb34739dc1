//! Routing model subsystem.
//!
//! # Data Flow
//! ```text
//! snapshot file (TOML/JSON) or control-plane handoff
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (structural checks)
//!     → RoutingModel (validated, immutable)
//!     → read by every synthesis function
//!
//! On change:
//!     watcher.rs detects change
//!     → loader.rs loads new snapshot
//!     → validation.rs validates
//!     → snapshot replaced wholesale
//!     → next render pass sees the new model
//! ```
//!
//! # Design Decisions
//! - A snapshot is immutable once loaded; changes require a full reload
//! - All fields have defaults to allow minimal snapshots
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;
pub mod watcher;

pub use schema::{
    Backend, GlobalSettings, LimitZone, ListenPorts, ListenerConfig, Location, RateLimitSpec,
    RoutingModel, Server,
};
