//! Shared fixtures for integration tests.

use std::io::Write;
use std::path::PathBuf;

use directive_synth::config::schema::{
    Backend, LimitZone, Location, RateLimitSpec, RoutingModel, Server,
};

/// A location forwarding `path` to `backend`.
#[allow(dead_code)]
pub fn location(path: &str, backend: &str) -> Location {
    Location {
        path: path.into(),
        backend: backend.into(),
        ..Default::default()
    }
}

/// A server with the given locations.
#[allow(dead_code)]
pub fn server(hostname: &str, locations: Vec<Location>) -> Server {
    Server {
        hostname: hostname.into(),
        locations,
        ..Default::default()
    }
}

/// An RPS limit shared under `id`.
#[allow(dead_code)]
pub fn rps_limit(id: &str, limit: u32) -> RateLimitSpec {
    RateLimitSpec {
        id: id.into(),
        rps: LimitZone {
            name: format!("{id}_rps"),
            limit,
            burst: limit * 5,
            shared_size: 5,
        },
        ..Default::default()
    }
}

/// A model with one backend per name.
#[allow(dead_code)]
pub fn model(servers: Vec<Server>, backends: &[&str]) -> RoutingModel {
    RoutingModel {
        servers,
        backends: backends
            .iter()
            .map(|name| Backend {
                name: name.to_string(),
                ssl_passthrough: false,
            })
            .collect(),
        ..Default::default()
    }
}

/// Write `content` to a file named `name` inside a fresh temp dir.
/// The dir is returned so it outlives the test body.
#[allow(dead_code)]
pub fn write_model(name: &str, content: &str) -> (tempfile::TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(name);
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(content.as_bytes()).unwrap();
    (dir, path)
}

/// Minimal valid TOML snapshot with a single host.
#[allow(dead_code)]
pub fn toml_model(hostname: &str) -> String {
    format!(
        r#"
[[servers]]
hostname = "{hostname}"

[[servers.locations]]
path = "/"
backend = "web-80"

[[backends]]
name = "web-80"
"#
    )
}
