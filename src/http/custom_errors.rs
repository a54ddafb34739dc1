//! Custom error location aggregation.
//!
//! # Responsibilities
//! - Group custom HTTP error codes by the default backend serving them
//! - Deduplicate and sort codes per backend
//!
//! # Design Decisions
//! - One error location per backend, not per route
//! - `BTreeMap`/`BTreeSet` give sorted output without a separate sort pass

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::config::schema::Server;

/// Error codes served by one default backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorLocation {
    pub upstream_name: String,
    pub codes: Vec<u16>,
}

/// Inputs for rendering one custom error block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CustomErrorDeps {
    pub upstream_name: String,
    pub error_codes: Vec<u16>,
    pub enable_metrics: bool,
}

pub fn build_custom_error_deps(
    upstream_name: &str,
    error_codes: &[u16],
    enable_metrics: bool,
) -> CustomErrorDeps {
    CustomErrorDeps {
        upstream_name: upstream_name.to_string(),
        error_codes: error_codes.to_vec(),
        enable_metrics,
    }
}

/// Error locations of a server, sorted by backend name then code.
pub fn build_custom_error_locations_per_server(server: &Server) -> Vec<ErrorLocation> {
    let mut codes_by_upstream: BTreeMap<&str, BTreeSet<u16>> = BTreeMap::new();

    for loc in &server.locations {
        codes_by_upstream
            .entry(loc.default_backend_upstream_name.as_str())
            .or_default()
            .extend(loc.custom_http_errors.iter().copied());
    }

    codes_by_upstream
        .into_iter()
        .map(|(upstream, codes)| ErrorLocation {
            upstream_name: upstream.to_string(),
            codes: codes.into_iter().collect(),
        })
        .collect()
}
