//! Proxy directive synthesis.
//!
//! Turns a routing model snapshot (virtual hosts, locations, backends and
//! global settings) into the configuration fragments a reverse proxy
//! loads: `listen` lines, passthrough directives, rate limit zones, auth
//! sub-locations, custom error locations and the rest.
//!
//! # Architecture Overview
//!
//! ```text
//!   model file ──▶ config::loader ──▶ RoutingModel ──▶ engine::Synthesizer
//!        │                                                    │
//!        └── config::watcher (reload on change)               ▼
//!                                                      RenderedConfig
//!                                                    (text or JSON)
//!
//!   Builders used by the engine:
//!     net          listen, resolver
//!     routing      location clauses, passthrough, protocol
//!     security     rate limits, auth, deny variables, modsecurity
//!     resilience   next-upstream retry conditions
//!     http         custom error locations
//!     lua          shared dictionaries, Lua settings tables
//!     observability  tracing directives, logging, metrics
//!     format       byte sizes, IP literals, quoting, header names
//! ```

// Core subsystems
pub mod config;
pub mod engine;
pub mod error;
pub mod routing;

// Directive builders
pub mod format;
pub mod http;
pub mod lua;
pub mod net;
pub mod resilience;
pub mod security;

// Cross-cutting concerns
pub mod observability;

pub use config::schema::RoutingModel;
pub use engine::{RenderedConfig, Synthesizer};
pub use error::{ModelError, ProtocolError};
