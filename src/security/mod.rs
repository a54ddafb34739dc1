//! Security directive subsystem.
//!
//! # Data Flow
//! ```text
//! All servers:
//!     → rate_limit.rs (limit key variables, deduplicated zone declarations)
//!     → modsecurity.rs (module loading decision)
//!
//! Per location:
//!     → rate_limit.rs (limit directives in precedence order)
//!     → auth.rs (auth sub-location, response headers, sign-in URL)
//!     → deny.rs (stable deny variable via the slug cache)
//! ```
//!
//! # Design Decisions
//! - The slug cache is the only state that outlives a render pass
//! - Everything else is a pure function of the snapshot

pub mod auth;
pub mod deny;
pub mod modsecurity;
pub mod rate_limit;

pub use auth::{build_auth_location, should_apply_global_auth};
pub use deny::{build_deny_variable, build_whitelist_geo, deny_rule_key, SlugCache};
pub use rate_limit::{
    build_rate_limit, build_rate_limit_variables, build_rate_limit_zones, filter_rate_limits,
};
