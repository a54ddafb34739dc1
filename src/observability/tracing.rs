//! Distributed tracing and request metrics directives.
//!
//! # Responsibilities
//! - Load the configured tracer plugin
//! - Pick the context propagation directive per backend protocol
//! - Emit per-location InfluxDB reporting
//!
//! # Design Decisions
//! - Collector precedence is zipkin, then jaeger, then datadog
//! - Disabled tracing renders nothing at all

use crate::config::schema::{InfluxDbConfig, Location, OpentracingConfig};

const TRACER_CONFIG: &str = "/etc/nginx/opentracing.json";

/// `opentracing_load_tracer` line for the first configured collector,
/// terminated with CRLF. Empty when tracing is disabled.
pub fn build_opentracing(cfg: &OpentracingConfig) -> String {
    if !cfg.enabled {
        return String::new();
    }

    let plugin = if !cfg.zipkin_collector_host.is_empty() {
        Some("/usr/local/lib/libzipkin_opentracing.so")
    } else if !cfg.jaeger_collector_host.is_empty() {
        Some("/usr/local/lib/libjaegertracing_plugin.so")
    } else if !cfg.datadog_collector_host.is_empty() {
        Some("/usr/local/lib/libdd_opentracing.so")
    } else {
        tracing::debug!("opentracing enabled without a collector host");
        None
    };

    let mut out = String::new();
    if let Some(plugin) = plugin {
        out.push_str(&format!("opentracing_load_tracer {plugin} {TRACER_CONFIG};"));
    }
    out.push_str("\r\n");
    out
}

/// Context propagation directive for a location.
pub fn opentracing_propagate_context(location: &Location) -> &'static str {
    if location.backend_protocol.is_grpc() {
        "opentracing_grpc_propagate_context"
    } else {
        "opentracing_propagate_context"
    }
}

/// Single-line `influxdb` directive, or empty when disabled.
pub fn build_influxdb(cfg: &InfluxDbConfig) -> String {
    if !cfg.enabled {
        return String::new();
    }

    format!(
        "influxdb server_name={} host={} port={} measurement={} enabled=true;",
        cfg.server_name, cfg.host, cfg.port, cfg.measurement
    )
}
