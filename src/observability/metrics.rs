//! Metrics collection.
//!
//! # Metrics
//! - `directive_render_total` (counter): rendered servers
//! - `directive_fallbacks_total` (counter): defaulted directives, by kind
//! - `directive_slug_cache_entries` (gauge): deny-variable slugs minted
//!
//! # Design Decisions
//! - Recorded through the `metrics` facade; the host process installs an
//!   exporter if it wants one
//! - Labels are static strings to keep cardinality bounded

/// Record one rendered server block.
pub fn record_render() {
    ::metrics::counter!("directive_render_total").increment(1);
}

/// Record a directive that fell back to its default.
pub fn record_fallback(kind: &'static str) {
    ::metrics::counter!("directive_fallbacks_total", "kind" => kind).increment(1);
}

/// Record the current slug cache size.
pub fn record_slug_cache_size(size: usize) {
    ::metrics::gauge!("directive_slug_cache_entries").set(size as f64);
}
