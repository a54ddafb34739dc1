//! Location match clauses and passthrough directives.
//!
//! # Responsibilities
//! - Decide between literal and case-insensitive regex match clauses
//! - Select the passthrough directive and scheme for a backend protocol
//! - Prepend rewrite and forwarded-prefix directives when a route rewrites
//!
//! # Design Decisions
//! - One regex location in a server switches every location to regex
//!   matching, otherwise literal paths would shadow them
//! - TLS passthrough on the backend overrides the declared protocol scheme
//! - An empty rewrite target never rewrites

use crate::config::schema::{Backend, Location};
use crate::observability::metrics;

/// Upstream name every passthrough directive points at. The balancer
/// picks the real endpoint at request time.
pub const UPSTREAM_BALANCER: &str = "upstream_balancer";

/// True when the location rewrites to a non-empty target other than its
/// own path.
pub fn needs_rewrite(location: &Location) -> bool {
    !location.rewrite.target.is_empty() && location.rewrite.target != location.path
}

/// True when any location of a server rewrites or asks for regex paths.
pub fn enforce_regex_modifier(locations: &[Location]) -> bool {
    locations
        .iter()
        .any(|loc| needs_rewrite(loc) || loc.rewrite.use_regex)
}

/// Strip a leading `~*` modifier from a location clause.
pub fn strip_location_modifier(path: &str) -> &str {
    path.trim_start_matches(['~', '*', ' '])
}

/// Match clause for a `location` block.
pub fn build_location(location: &Location, enforce_regex: bool) -> String {
    let path = if location.path.is_empty() {
        tracing::warn!(backend = %location.backend, "location without a path, using /");
        metrics::record_fallback("location_path");
        "/"
    } else {
        location.path.as_str()
    };

    if enforce_regex {
        format!(r#"~* "^{path}""#)
    } else {
        path.to_string()
    }
}

/// Passthrough directive for a location, preceded by a `rewrite` line when
/// the location rewrites its path. `backend` is the pool the location
/// references, if the model has it.
pub fn build_proxy_pass(backend: Option<&Backend>, location: &Location) -> String {
    let proto = location.backend_protocol;
    let directive = proto.pass_directive();
    let mut scheme = proto.scheme();

    match backend {
        Some(backend) if backend.ssl_passthrough => scheme = proto.passthrough_scheme(),
        Some(_) => {}
        None => {
            tracing::debug!(
                backend = %location.backend,
                path = %location.path,
                "location backend not found, keeping declared protocol"
            );
        }
    }

    let pass = format!("{directive} {scheme}{UPSTREAM_BALANCER};");

    if !needs_rewrite(location) {
        return pass;
    }

    let mut out = format!(
        "rewrite \"(?i){}\" {} break;\n",
        location.path, location.rewrite.target
    );
    if !location.x_forwarded_prefix.is_empty() {
        out.push_str(&format!(
            "proxy_set_header X-Forwarded-Prefix \"{}\";\n",
            location.x_forwarded_prefix
        ));
    }
    out.push_str(&pass);
    out
}

/// Header-setting directive matching the passthrough directive.
pub fn proxy_set_header(location: &Location) -> &'static str {
    if location.backend_protocol.is_grpc() {
        "grpc_set_header"
    } else {
        "proxy_set_header"
    }
}

pub fn build_upstream_name(location: &Location) -> &str {
    &location.backend
}

pub fn is_location_allowed(location: &Location) -> bool {
    location.denied.is_none()
}

/// True when the location path starts with any entry of a comma-separated
/// list. Blank entries are ignored.
pub fn is_location_in_location_list(location: &Location, raw_list: &str) -> bool {
    raw_list
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .any(|item| location.path.starts_with(item))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::{RewriteConfig, RoutingModel};
    use crate::routing::protocol::BackendProtocol;

    const BACKEND: &str = "upstream-name";

    struct Case {
        name: &'static str,
        path: &'static str,
        target: &'static str,
        location: &'static str,
        proxy_pass: &'static str,
        x_forwarded_prefix: &'static str,
        secure_backend: bool,
        enforce_regex: bool,
    }

    const CASES: &[Case] = &[
        Case {
            name: "when secure backend enabled",
            path: "/",
            target: "/",
            location: "/",
            proxy_pass: "proxy_pass https://upstream_balancer;",
            x_forwarded_prefix: "",
            secure_backend: true,
            enforce_regex: false,
        },
        Case {
            name: "invalid redirect / to /",
            path: "/",
            target: "/",
            location: "/",
            proxy_pass: "proxy_pass http://upstream_balancer;",
            x_forwarded_prefix: "",
            secure_backend: false,
            enforce_regex: false,
        },
        Case {
            name: "redirect / to /jenkins",
            path: "/",
            target: "/jenkins",
            location: r#"~* "^/""#,
            proxy_pass: "rewrite \"(?i)/\" /jenkins break;\nproxy_pass http://upstream_balancer;",
            x_forwarded_prefix: "",
            secure_backend: false,
            enforce_regex: true,
        },
        Case {
            name: "add the X-Forwarded-Prefix header",
            path: "/there",
            target: "/something",
            location: r#"~* "^/there""#,
            proxy_pass: "rewrite \"(?i)/there\" /something break;\nproxy_set_header X-Forwarded-Prefix \"/there\";\nproxy_pass http://upstream_balancer;",
            x_forwarded_prefix: "/there",
            secure_backend: false,
            enforce_regex: true,
        },
        Case {
            name: "regex modifier without rewrite on this location",
            path: "/something",
            target: "/something",
            location: r#"~* "^/something""#,
            proxy_pass: "proxy_pass http://upstream_balancer;",
            x_forwarded_prefix: "",
            secure_backend: false,
            enforce_regex: true,
        },
    ];

    fn location_for(case: &Case) -> Location {
        Location {
            path: case.path.into(),
            backend: BACKEND.into(),
            backend_protocol: if case.secure_backend {
                BackendProtocol::Https
            } else {
                BackendProtocol::Http
            },
            rewrite: RewriteConfig {
                target: case.target.into(),
                ..Default::default()
            },
            x_forwarded_prefix: case.x_forwarded_prefix.into(),
            ..Default::default()
        }
    }

    fn proxy_pass(ssl_passthrough: bool, loc: &Location) -> String {
        let model = RoutingModel {
            backends: vec![Backend {
                name: BACKEND.into(),
                ssl_passthrough,
            }],
            ..Default::default()
        };
        build_proxy_pass(model.backend(&loc.backend), loc)
    }

    #[test]
    fn test_build_location() {
        for case in CASES {
            let loc = location_for(case);
            assert_eq!(build_location(&loc, case.enforce_regex), case.location, "{}", case.name);
        }
    }

    #[test]
    fn test_build_location_empty_path() {
        let loc = Location {
            path: String::new(),
            ..Default::default()
        };
        assert_eq!(build_location(&loc, false), "/");
    }

    #[test]
    fn test_build_proxy_pass() {
        for case in CASES {
            let loc = location_for(case);
            assert_eq!(proxy_pass(false, &loc), case.proxy_pass, "{}", case.name);
        }
    }

    #[test]
    fn test_empty_target_never_rewrites() {
        let loc = Location {
            path: "/app".into(),
            backend: BACKEND.into(),
            ..Default::default()
        };
        assert!(!needs_rewrite(&loc));
        assert_eq!(
            proxy_pass(false, &loc),
            "proxy_pass http://upstream_balancer;"
        );
    }

    #[test]
    fn test_protocol_directives() {
        let cases = [
            (BackendProtocol::Grpc, "grpc_pass grpc://upstream_balancer;"),
            (BackendProtocol::Grpcs, "grpc_pass grpcs://upstream_balancer;"),
            (BackendProtocol::Ajp, "ajp_pass upstream_balancer;"),
            (BackendProtocol::Fcgi, "fastcgi_pass upstream_balancer;"),
        ];
        for (proto, expected) in cases {
            let loc = Location {
                backend: BACKEND.into(),
                backend_protocol: proto,
                ..Default::default()
            };
            assert_eq!(proxy_pass(false, &loc), expected);
        }
    }

    #[test]
    fn test_ssl_passthrough_forces_secure_scheme() {
        let cases = [
            (BackendProtocol::Http, "proxy_pass https://upstream_balancer;"),
            (BackendProtocol::Grpcs, "grpc_pass grpcs://upstream_balancer;"),
            (BackendProtocol::Grpc, "grpc_pass https://upstream_balancer;"),
        ];
        for (proto, expected) in cases {
            let loc = Location {
                backend: BACKEND.into(),
                backend_protocol: proto,
                ..Default::default()
            };
            assert_eq!(proxy_pass(true, &loc), expected);
        }

        // passthrough on another backend does not leak
        let loc = Location {
            backend: "other".into(),
            ..Default::default()
        };
        assert_eq!(
            proxy_pass(true, &loc),
            "proxy_pass http://upstream_balancer;"
        );
    }

    #[test]
    fn test_enforce_regex_modifier() {
        assert!(!enforce_regex_modifier(&[]));

        let plain = Location {
            path: "/ok".into(),
            ..Default::default()
        };
        assert!(!enforce_regex_modifier(&[plain.clone()]));

        let rewritten = Location {
            path: "/ok".into(),
            rewrite: RewriteConfig {
                target: "/alright".into(),
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(enforce_regex_modifier(&[plain.clone(), rewritten]));

        let regex = Location {
            path: "/ok".into(),
            rewrite: RewriteConfig {
                use_regex: true,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(enforce_regex_modifier(&[plain, regex]));
    }

    #[test]
    fn test_strip_location_modifier() {
        assert_eq!(strip_location_modifier("~*ok.com"), "ok.com");
        assert_eq!(strip_location_modifier("~* /api"), "/api");
        assert_eq!(strip_location_modifier("/plain"), "/plain");
    }

    #[test]
    fn test_proxy_set_header() {
        let grpc = Location {
            backend_protocol: BackendProtocol::Grpc,
            ..Default::default()
        };
        assert_eq!(proxy_set_header(&grpc), "grpc_set_header");
        assert_eq!(proxy_set_header(&Location::default()), "proxy_set_header");
    }

    #[test]
    fn test_upstream_name_and_allowed() {
        let mut loc = Location {
            backend: BACKEND.into(),
            ..Default::default()
        };
        assert_eq!(build_upstream_name(&loc), BACKEND);
        assert!(is_location_allowed(&loc));

        loc.denied = Some("blacklisted".into());
        assert!(!is_location_allowed(&loc));
    }

    #[test]
    fn test_location_in_location_list() {
        let loc = Location {
            path: "/match".into(),
            ..Default::default()
        };
        let cases = [
            ("/match", true),
            (",/match", true),
            ("/dontmatch", false),
            (",/dontmatch", false),
            ("/dontmatch,/match", true),
            ("/dontmatch, /match", true),
            ("/dontmatch,/dontmatcheither", false),
            ("", false),
        ];
        for (list, expected) in cases {
            assert_eq!(is_location_in_location_list(&loc, list), expected, "list={list:?}");
        }
    }
}
