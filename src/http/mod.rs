//! HTTP error handling subsystem.
//!
//! # Data Flow
//! ```text
//! Server.locations[] (default backend, custom error codes)
//!     → custom_errors.rs (codes grouped per default backend)
//!     → one internal error location per backend
//! ```

pub mod custom_errors;

pub use custom_errors::{
    build_custom_error_deps, build_custom_error_locations_per_server, CustomErrorDeps,
    ErrorLocation,
};
