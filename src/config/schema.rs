//! Routing model schema definitions.
//!
//! This module defines the complete snapshot the synthesis engine consumes.
//! All types derive Serde traits so a snapshot can be loaded from a file or
//! handed over already assembled by the control-plane collaborator.

use std::collections::BTreeMap;
use std::net::IpAddr;

use serde::{Deserialize, Serialize};

use crate::routing::protocol::BackendProtocol;

/// Hostname of the catch-all server.
pub const DEFAULT_SERVER_NAME: &str = "_";

/// Root snapshot of the routing model.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct RoutingModel {
    /// Deployment-wide settings.
    pub settings: GlobalSettings,

    /// Listener ports and bind options.
    pub listener: ListenerConfig,

    /// Virtual hosts, in render order.
    pub servers: Vec<Server>,

    /// Upstream pools referenced by locations.
    pub backends: Vec<Backend>,
}

impl RoutingModel {
    /// Look up a backend by name.
    pub fn backend(&self, name: &str) -> Option<&Backend> {
        self.backends.iter().find(|b| b.name == name)
    }
}

/// Deployment-wide settings shared by every server.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct GlobalSettings {
    /// External auth URL applied to locations that opt into global auth.
    pub global_external_auth_url: String,

    /// Space-separated `proxy_next_upstream` conditions.
    pub proxy_next_upstream: String,

    /// Retry non-idempotent requests (POST, LOCK, PATCH) on the next upstream.
    pub retry_non_idempotent: bool,

    /// Header carrying the original client address.
    pub forwarded_for_header: String,

    /// Trust `X-Forwarded-*` headers from the client.
    pub use_forwarded_headers: bool,

    /// Status code used for HTTP to HTTPS redirects.
    pub http_redirect_code: u16,

    /// Comma-separated path prefixes exempt from TLS redirects.
    pub no_tls_redirect_locations: String,

    /// DNS resolvers for the `resolver` directive.
    pub resolvers: Vec<IpAddr>,

    /// Drop IPv6 resolvers and answers.
    pub disable_ipv6_dns: bool,

    /// Lua shared dictionary sizes in megabytes, keyed by dictionary name.
    pub lua_shared_dicts: BTreeMap<String, u32>,

    /// Disable the Lua WAF even where locations request it.
    pub disable_lua_resty_waf: bool,

    /// Load ModSecurity for every server.
    pub enable_modsecurity: bool,

    /// Tracing collector settings.
    pub opentracing: OpentracingConfig,

    /// Emit metrics for custom error locations.
    pub enable_metrics: bool,

    /// Key of rate-limited clients that are not whitelisted.
    pub limit_conn_zone_variable: String,
}

impl Default for GlobalSettings {
    fn default() -> Self {
        Self {
            global_external_auth_url: String::new(),
            proxy_next_upstream: "error timeout".to_string(),
            retry_non_idempotent: false,
            forwarded_for_header: "X-Forwarded-For".to_string(),
            use_forwarded_headers: false,
            http_redirect_code: 308,
            no_tls_redirect_locations: "/.well-known/acme-challenge".to_string(),
            resolvers: Vec::new(),
            disable_ipv6_dns: false,
            lua_shared_dicts: BTreeMap::new(),
            disable_lua_resty_waf: false,
            enable_modsecurity: false,
            opentracing: OpentracingConfig::default(),
            enable_metrics: false,
            limit_conn_zone_variable: "$binary_remote_addr".to_string(),
        }
    }
}

/// Tracing collector hosts. The first non-empty one wins, in field order.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct OpentracingConfig {
    pub enabled: bool,
    pub zipkin_collector_host: String,
    pub jaeger_collector_host: String,
    pub datadog_collector_host: String,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ListenerConfig {
    /// Port assignments.
    pub ports: ListenPorts,

    /// IPv4 bind addresses. Empty means every address.
    pub bind_address_ipv4: Vec<String>,

    /// IPv6 bind addresses. Empty means `[::]`.
    pub bind_address_ipv6: Vec<String>,

    /// Expect the PROXY protocol header on every connection.
    pub use_proxy_protocol: bool,

    /// Set `reuseport` on the default server.
    pub reuse_port: bool,

    /// Enable HTTP/2 on secure listeners.
    pub use_http2: bool,

    /// Render IPv6 listeners alongside IPv4 ones.
    pub ipv6_enabled: bool,

    /// TLS passthrough is handled in front of the proxy, which then
    /// receives secure traffic on the `ssl_proxy` port.
    pub ssl_passthrough_enabled: bool,

    /// Accept queue length for the default server.
    pub backlog_size: u32,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            ports: ListenPorts::default(),
            bind_address_ipv4: Vec::new(),
            bind_address_ipv6: Vec::new(),
            use_proxy_protocol: false,
            reuse_port: true,
            use_http2: true,
            ipv6_enabled: true,
            ssl_passthrough_enabled: false,
            backlog_size: 511,
        }
    }
}

/// Port numbers the proxy listens on.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct ListenPorts {
    pub http: u16,
    pub https: u16,
    /// Secure port used behind TLS passthrough.
    pub ssl_proxy: u16,
}

impl Default for ListenPorts {
    fn default() -> Self {
        Self {
            http: 80,
            https: 443,
            ssl_proxy: 442,
        }
    }
}

/// A virtual host.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct Server {
    /// Hostname, or `_` for the catch-all server.
    pub hostname: String,

    /// Routes, in render order.
    pub locations: Vec<Location>,

    /// PEM file of the server certificate. Empty when the server has no TLS.
    pub ssl_cert_pem: String,
}

impl Default for Server {
    fn default() -> Self {
        Self {
            hostname: DEFAULT_SERVER_NAME.to_string(),
            locations: Vec::new(),
            ssl_cert_pem: String::new(),
        }
    }
}

impl Server {
    pub fn is_default(&self) -> bool {
        self.hostname == DEFAULT_SERVER_NAME
    }
}

/// A path-scoped route within a server.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct Location {
    /// Path pattern.
    pub path: String,

    /// Name of the backend this route forwards to.
    pub backend: String,

    /// Protocol spoken to the backend.
    pub backend_protocol: BackendProtocol,

    pub rewrite: RewriteConfig,

    /// Value for the `X-Forwarded-Prefix` header when rewriting.
    pub x_forwarded_prefix: String,

    pub rate_limit: RateLimitSpec,

    pub external_auth: ExternalAuthConfig,

    /// Apply the global external auth URL when no local one is set.
    pub enable_global_auth: bool,

    /// Status codes intercepted and served by the default backend.
    pub custom_http_errors: Vec<u16>,

    /// Upstream serving custom error pages for this route.
    pub default_backend_upstream_name: String,

    /// Reason the route is denied. `None` means allowed.
    pub denied: Option<String>,

    /// Client CIDRs allowed to reach the route. Empty allows everyone.
    pub whitelist_source_range: Vec<String>,

    /// `client_max_body_size` value (offset syntax).
    pub proxy_body_size: String,

    /// `proxy_buffer_size` value (size syntax).
    pub proxy_buffer_size: String,

    /// Keep the listener port in redirects.
    pub use_port_in_redirects: bool,

    /// Lua WAF mode. Empty disables it.
    pub waf_mode: String,

    /// ModSecurity enabled for this route.
    pub modsecurity_enabled: bool,

    pub influxdb: InfluxDbConfig,
}

impl Default for Location {
    fn default() -> Self {
        Self {
            path: "/".to_string(),
            backend: String::new(),
            backend_protocol: BackendProtocol::default(),
            rewrite: RewriteConfig::default(),
            x_forwarded_prefix: String::new(),
            rate_limit: RateLimitSpec::default(),
            external_auth: ExternalAuthConfig::default(),
            enable_global_auth: true,
            custom_http_errors: Vec::new(),
            default_backend_upstream_name: String::new(),
            denied: None,
            whitelist_source_range: Vec::new(),
            proxy_body_size: "1m".to_string(),
            proxy_buffer_size: "4k".to_string(),
            use_port_in_redirects: false,
            waf_mode: String::new(),
            modsecurity_enabled: false,
            influxdb: InfluxDbConfig::default(),
        }
    }
}

/// Rewrite settings of a location.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct RewriteConfig {
    /// Target path. Empty means no rewrite.
    pub target: String,

    /// Treat the location path as a regular expression.
    pub use_regex: bool,

    /// Redirect to HTTPS when the server has a certificate.
    pub ssl_redirect: bool,

    /// Redirect to HTTPS even without a certificate.
    pub force_ssl_redirect: bool,
}

/// Per-location rate limits.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq, Hash)]
#[serde(default)]
pub struct RateLimitSpec {
    /// Key shared by locations whose zones must collapse into one.
    pub id: String,

    pub connections: LimitZone,
    pub rps: LimitZone,
    pub rpm: LimitZone,

    /// Response rate in kilobytes per second. Zero disables it.
    pub limit_rate: u32,

    /// Kilobytes sent before `limit_rate` applies. Zero disables it.
    pub limit_rate_after: u32,

    /// Client CIDRs exempt from the connection and request limits.
    pub whitelist: Vec<String>,
}

/// One shared-memory limit zone.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq, Hash)]
#[serde(default)]
pub struct LimitZone {
    pub name: String,
    pub limit: u32,
    pub burst: u32,
    /// Zone size in megabytes.
    pub shared_size: u32,
}

/// External authentication settings of a location.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct ExternalAuthConfig {
    pub url: String,
    pub signin_url: String,
    /// Auth response headers copied onto the proxied request.
    pub response_headers: Vec<String>,
}

/// InfluxDB request metrics for a location.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct InfluxDbConfig {
    pub enabled: bool,
    pub server_name: String,
    pub host: String,
    pub port: String,
    pub measurement: String,
}

/// A named upstream pool.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct Backend {
    pub name: String,

    /// Secure traffic reaches this backend untouched; forces an https or
    /// grpcs scheme regardless of the location protocol.
    pub ssl_passthrough: bool,
}
