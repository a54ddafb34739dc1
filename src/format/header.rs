//! Header name normalization for directive variables.

/// Lower-case a header name and swap `-` for `_`, the form used in
/// `$http_*` and `$upstream_http_*` variable names.
pub fn normalize_header_name(header: &str) -> String {
    header.to_lowercase().replace('-', "_")
}

/// Variable holding the incoming forwarded-for header.
pub fn build_forwarded_for(header: &str) -> String {
    format!("$http_{}", normalize_header_name(header))
}
