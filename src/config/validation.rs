//! Routing model validation.
//!
//! # Responsibilities
//! - Structural checks the synthesis engine assumes have passed
//! - Referential integrity (locations reference existing backends)
//! - Value ranges (ports non-zero)
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Pure function: RoutingModel → Result<(), Vec<ValidationError>>
//! - Malformed directive values (byte sizes, headers) are not rejected here;
//!   synthesis omits them so one bad route cannot block a reload

use std::collections::HashSet;

use thiserror::Error;

use crate::config::schema::RoutingModel;

/// A single semantic problem in a routing model.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("duplicate server hostname {0:?}")]
    DuplicateServer(String),

    #[error("duplicate location {path:?} in server {server:?}")]
    DuplicateLocation { server: String, path: String },

    #[error("location {path:?} in server {server:?} references unknown backend {backend:?}")]
    UnknownBackend {
        server: String,
        path: String,
        backend: String,
    },

    #[error("{0} port must be non-zero")]
    InvalidPort(&'static str),

    #[error("location {path:?} in server {server:?} sets a rate limit without an id")]
    MissingRateLimitId { server: String, path: String },
}

/// Validate a snapshot, collecting every problem found.
pub fn validate_model(model: &RoutingModel) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let ports = model.listener.ports;
    for (name, port) in [("http", ports.http), ("https", ports.https), ("ssl_proxy", ports.ssl_proxy)] {
        if port == 0 {
            errors.push(ValidationError::InvalidPort(name));
        }
    }

    let backends: HashSet<&str> = model.backends.iter().map(|b| b.name.as_str()).collect();
    let mut hostnames = HashSet::new();

    for server in &model.servers {
        if !hostnames.insert(server.hostname.as_str()) {
            errors.push(ValidationError::DuplicateServer(server.hostname.clone()));
        }

        let mut paths = HashSet::new();
        for loc in &server.locations {
            if !paths.insert(loc.path.as_str()) {
                errors.push(ValidationError::DuplicateLocation {
                    server: server.hostname.clone(),
                    path: loc.path.clone(),
                });
            }

            if !loc.backend.is_empty() && !backends.contains(loc.backend.as_str()) {
                errors.push(ValidationError::UnknownBackend {
                    server: server.hostname.clone(),
                    path: loc.path.clone(),
                    backend: loc.backend.clone(),
                });
            }

            let rl = &loc.rate_limit;
            let limited = rl.connections.limit > 0 || rl.rps.limit > 0 || rl.rpm.limit > 0;
            if limited && rl.id.is_empty() {
                errors.push(ValidationError::MissingRateLimitId {
                    server: server.hostname.clone(),
                    path: loc.path.clone(),
                });
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::{Backend, LimitZone, Location, Server};

    fn location(path: &str, backend: &str) -> Location {
        Location {
            path: path.into(),
            backend: backend.into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_valid_model() {
        let model = RoutingModel {
            servers: vec![Server {
                hostname: "foo.bar".into(),
                locations: vec![location("/", "web"), location("/api", "")],
                ..Default::default()
            }],
            backends: vec![Backend {
                name: "web".into(),
                ssl_passthrough: false,
            }],
            ..Default::default()
        };
        assert_eq!(validate_model(&model), Ok(()));
        assert_eq!(validate_model(&RoutingModel::default()), Ok(()));
    }

    #[test]
    fn test_collects_all_errors() {
        let mut model = RoutingModel {
            servers: vec![
                Server {
                    hostname: "foo.bar".into(),
                    locations: vec![location("/", "web"), location("/", "missing")],
                    ..Default::default()
                },
                Server {
                    hostname: "foo.bar".into(),
                    ..Default::default()
                },
            ],
            backends: vec![Backend {
                name: "web".into(),
                ssl_passthrough: false,
            }],
            ..Default::default()
        };
        model.listener.ports.https = 0;

        let errors = validate_model(&model).unwrap_err();
        assert_eq!(
            errors,
            vec![
                ValidationError::InvalidPort("https"),
                ValidationError::DuplicateLocation {
                    server: "foo.bar".into(),
                    path: "/".into(),
                },
                ValidationError::UnknownBackend {
                    server: "foo.bar".into(),
                    path: "/".into(),
                    backend: "missing".into(),
                },
                ValidationError::DuplicateServer("foo.bar".into()),
            ]
        );
    }

    #[test]
    fn test_rate_limit_requires_id() {
        let mut limited = location("/api", "");
        limited.rate_limit.rps = LimitZone {
            name: "api_rps".into(),
            limit: 10,
            burst: 50,
            shared_size: 5,
        };
        let model = RoutingModel {
            servers: vec![Server {
                hostname: "foo.bar".into(),
                locations: vec![limited],
                ..Default::default()
            }],
            ..Default::default()
        };
        assert_eq!(
            validate_model(&model),
            Err(vec![ValidationError::MissingRateLimitId {
                server: "foo.bar".into(),
                path: "/api".into(),
            }])
        );

        let mut model = model;
        model.servers[0].locations[0].rate_limit.id = "api".into();
        assert_eq!(validate_model(&model), Ok(()));
    }
}
