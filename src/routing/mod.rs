//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Server.locations[]
//!     → location.rs (enforce_regex_modifier over all locations)
//!     → location.rs (match clause per location)
//!     → protocol.rs (directive + scheme for the backend protocol)
//!     → location.rs (rewrite + passthrough directive text)
//! ```
//!
//! # Design Decisions
//! - Backend protocol is a closed enum; invalid tags fail at load time
//! - Rendering never mutates the model
//! - Deterministic: same location always renders the same text

pub mod location;
pub mod protocol;

pub use location::{build_location, build_proxy_pass, enforce_regex_modifier, UPSTREAM_BALANCER};
pub use protocol::BackendProtocol;
