//! External authentication directives.
//!
//! # Responsibilities
//! - Derive the internal sub-location path that delegates to the auth service
//! - Decide when the global auth URL applies to a location
//! - Copy auth response headers onto the proxied request
//! - Append the return-to parameter to sign-in URLs
//!
//! # Design Decisions
//! - Sub-location paths are derived from the location path alone, so they
//!   are stable across reloads and collision-free between paths
//! - URL-safe base64 without padding keeps the path free of `/`, `+`, `=`

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use url::form_urlencoded;

use crate::config::schema::Location;
use crate::format::normalize_header_name;

const AUTH_LOCATION_PREFIX: &str = "/_external-auth-";
const REDIRECT_PARAM: &str = "rd";
const REDIRECT_VALUE: &str = "$pass_access_scheme://$http_host$escaped_request_uri";

/// True only when the location has no auth URL of its own, a global URL
/// exists and the location opts into global auth.
pub fn should_apply_global_auth(location: &Location, global_auth_url: &str) -> bool {
    location.external_auth.url.is_empty()
        && !global_auth_url.is_empty()
        && location.enable_global_auth
}

/// Internal auth sub-location path, or empty when no auth URL applies.
pub fn build_auth_location(location: &Location, global_auth_url: &str) -> String {
    if location.external_auth.url.is_empty()
        && !should_apply_global_auth(location, global_auth_url)
    {
        return String::new();
    }

    let encoded = URL_SAFE_NO_PAD.encode(location.path.as_bytes());
    format!("{AUTH_LOCATION_PREFIX}{encoded}")
}

/// `auth_request_set` / `proxy_set_header` pairs for each auth response
/// header, numbered by position.
pub fn build_auth_response_headers(headers: &[String]) -> Vec<String> {
    headers
        .iter()
        .enumerate()
        .flat_map(|(i, h)| {
            [
                format!(
                    "auth_request_set $authHeader{i} $upstream_http_{};",
                    normalize_header_name(h)
                ),
                format!("proxy_set_header '{h}' $authHeader{i};"),
            ]
        })
        .collect()
}

/// Sign-in URL carrying the original request as the `rd` parameter,
/// unless one is already present. Relative URLs are accepted.
pub fn build_auth_sign_url(sign_url: &str) -> String {
    let query = sign_url
        .split_once('?')
        .map(|(_, rest)| rest.split('#').next().unwrap_or_default())
        .unwrap_or_default();
    let query_pairs: Vec<(String, String)> = form_urlencoded::parse(query.as_bytes())
        .into_owned()
        .collect();

    if query_pairs.is_empty() {
        return format!("{sign_url}?{REDIRECT_PARAM}={REDIRECT_VALUE}");
    }

    if query_pairs
        .iter()
        .any(|(k, v)| k == REDIRECT_PARAM && !v.is_empty())
    {
        return sign_url.to_string();
    }

    format!("{sign_url}&{REDIRECT_PARAM}={REDIRECT_VALUE}")
}
