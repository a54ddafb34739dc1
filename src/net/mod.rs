//! Network directive subsystem.
//!
//! # Data Flow
//! ```text
//! ListenerConfig + server hostname
//!     → listener.rs (listen lines per address, per family)
//!
//! GlobalSettings.resolvers
//!     → resolver.rs (resolver line)
//! ```

pub mod listener;
pub mod resolver;

pub use listener::{build_http_listener, build_https_listener, ListenerKind};
pub use resolver::build_resolvers;
