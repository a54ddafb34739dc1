//! Rate limit zones and per-location limit directives.
//!
//! # Responsibilities
//! - Declare each `limit_conn_zone` / `limit_req_zone` once across servers
//! - Emit the limit directives of a single location in precedence order
//! - List the distinct rate limit specs by id
//! - Define the `$limit_<id>` key each zone counts on
//!
//! # Design Decisions
//! - Zones are deduplicated on their rendered text. Two locations sharing a
//!   zone name with different sizes produce two declarations
//! - Output is sorted so repeated renders are byte-identical

use std::collections::{BTreeSet, HashSet};

use crate::config::schema::{Location, RateLimitSpec, Server};

/// Zone declarations for every positive limit in every location.
pub fn build_rate_limit_zones(servers: &[Server]) -> Vec<String> {
    let mut zones = BTreeSet::new();

    for loc in servers.iter().flat_map(|s| s.locations.iter()) {
        let rl = &loc.rate_limit;

        if rl.connections.limit > 0 {
            zones.insert(format!(
                "limit_conn_zone $limit_{} zone={}:{}m;",
                rl.id, rl.connections.name, rl.connections.shared_size
            ));
        }

        if rl.rpm.limit > 0 {
            zones.insert(format!(
                "limit_req_zone $limit_{} zone={}:{}m rate={}r/m;",
                rl.id, rl.rpm.name, rl.rpm.shared_size, rl.rpm.limit
            ));
        }

        if rl.rps.limit > 0 {
            zones.insert(format!(
                "limit_req_zone $limit_{} zone={}:{}m rate={}r/s;",
                rl.id, rl.rps.name, rl.rps.shared_size, rl.rps.limit
            ));
        }
    }

    zones.into_iter().collect()
}

/// Limit directives for one location: connections, RPS, RPM, then the
/// response rate settings. Zero limits are skipped.
pub fn build_rate_limit(location: &Location) -> Vec<String> {
    let rl = &location.rate_limit;
    let mut limits = Vec::new();

    if rl.connections.limit > 0 {
        limits.push(format!(
            "limit_conn {} {};",
            rl.connections.name, rl.connections.limit
        ));
    }

    if rl.rps.limit > 0 {
        limits.push(format!(
            "limit_req zone={} burst={} nodelay;",
            rl.rps.name, rl.rps.burst
        ));
    }

    if rl.rpm.limit > 0 {
        limits.push(format!(
            "limit_req zone={} burst={} nodelay;",
            rl.rpm.name, rl.rpm.burst
        ));
    }

    if rl.limit_rate_after > 0 {
        limits.push(format!("limit_rate_after {}k;", rl.limit_rate_after));
    }

    if rl.limit_rate > 0 {
        limits.push(format!("limit_rate {}k;", rl.limit_rate));
    }

    limits
}

/// Distinct rate limit specs by id, first occurrence wins. Specs without
/// an id are skipped.
pub fn filter_rate_limits(servers: &[Server]) -> Vec<&RateLimitSpec> {
    let mut found = HashSet::new();

    servers
        .iter()
        .flat_map(|s| s.locations.iter())
        .map(|loc| &loc.rate_limit)
        .filter(|&rl| !rl.id.is_empty() && found.insert(rl.id.as_str()))
        .collect()
}

/// `geo` and `map` blocks defining `$limit_<id>` for every distinct spec.
/// Whitelisted clients map to an empty key, which no zone counts.
pub fn build_rate_limit_variables(servers: &[Server], zone_variable: &str) -> Vec<String> {
    filter_rate_limits(servers)
        .into_iter()
        .map(|rl| {
            let id = &rl.id;
            let mut out = format!("geo $remote_addr $whitelist_{id} {{\n    default 0;\n");
            for cidr in &rl.whitelist {
                out.push_str(&format!("    {cidr} 1;\n"));
            }
            out.push_str(&format!(
                "}}\nmap $whitelist_{id} $limit_{id} {{\n    0 {zone_variable};\n    1 \"\";\n}}"
            ));
            out
        })
        .collect()
}
