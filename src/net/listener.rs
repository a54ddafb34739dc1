//! `listen` directive construction.
//!
//! # Responsibilities
//! - One `listen` line per bind address, per address family
//! - Plain listeners on the HTTP port, secure ones on the HTTPS or
//!   passthrough port
//! - Attach `default_server`, `reuseport` and `backlog` to the catch-all
//!   server only
//!
//! # Design Decisions
//! - Empty IPv4 bind list means "every address" (bare port)
//! - Empty IPv6 bind list means `[::]`
//! - Never fails: absent settings fall back to `ListenerConfig::default()`

use crate::config::schema::{ListenerConfig, DEFAULT_SERVER_NAME};
use crate::format::format_ip;

const IPV6_ANY: &str = "[::]";

/// Which port family a listener is rendered for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListenerKind {
    Plain,
    Secure,
}

/// `listen` lines for the plain HTTP port.
pub fn build_http_listener(config: &ListenerConfig, hostname: &str) -> String {
    build_listener(config, hostname, ListenerKind::Plain)
}

/// `listen` lines for the secure port.
pub fn build_https_listener(config: &ListenerConfig, hostname: &str) -> String {
    build_listener(config, hostname, ListenerKind::Secure)
}

/// `listen` lines for one port family, IPv4 first, then IPv6 when enabled.
pub fn build_listener(config: &ListenerConfig, hostname: &str, kind: ListenerKind) -> String {
    let common = common_listen_options(config, hostname);

    let mut out: Vec<String> = ipv4_addresses(config)
        .iter()
        .map(|addr| listen_line(config, addr, &common, kind))
        .collect();

    if config.ipv6_enabled {
        out.extend(
            ipv6_addresses(config)
                .iter()
                .map(|addr| listen_line(config, addr, &common, kind)),
        );
    }

    tracing::trace!(hostname, ?kind, lines = out.len(), "listeners built");
    out.join("\n")
}

/// Options valid only once per port, reserved for the catch-all server.
fn common_listen_options(config: &ListenerConfig, hostname: &str) -> Vec<String> {
    if hostname != DEFAULT_SERVER_NAME {
        return Vec::new();
    }

    let mut out = vec!["default_server".to_string()];
    if config.reuse_port {
        out.push("reuseport".to_string());
    }
    if config.backlog_size > 0 {
        out.push(format!("backlog={}", config.backlog_size));
    }
    out
}

fn ipv4_addresses(config: &ListenerConfig) -> Vec<String> {
    if config.bind_address_ipv4.is_empty() {
        vec![String::new()]
    } else {
        config.bind_address_ipv4.clone()
    }
}

fn ipv6_addresses(config: &ListenerConfig) -> Vec<String> {
    if config.bind_address_ipv6.is_empty() {
        vec![IPV6_ANY.to_string()]
    } else {
        config
            .bind_address_ipv6
            .iter()
            .map(|addr| format_ip(addr))
            .collect()
    }
}

fn listen_line(
    config: &ListenerConfig,
    address: &str,
    common: &[String],
    kind: ListenerKind,
) -> String {
    let (port, proxy_protocol) = match kind {
        ListenerKind::Plain => (config.ports.http, config.use_proxy_protocol),
        ListenerKind::Secure if config.ssl_passthrough_enabled => (config.ports.ssl_proxy, true),
        ListenerKind::Secure => (config.ports.https, config.use_proxy_protocol),
    };

    let mut parts = vec!["listen".to_string()];
    if address.is_empty() {
        parts.push(port.to_string());
    } else {
        parts.push(format!("{address}:{port}"));
    }

    if proxy_protocol {
        parts.push("proxy_protocol".to_string());
    }
    parts.extend(common.iter().cloned());

    if kind == ListenerKind::Secure {
        parts.push("ssl".to_string());
        if config.use_http2 {
            parts.push("http2".to_string());
        }
    }

    format!("{};", parts.join(" "))
}
