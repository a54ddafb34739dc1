//! Lua integration directives.
//!
//! # Responsibilities
//! - Size the Lua shared dictionaries
//! - Render deployment and location settings as Lua table literals
//! - Decide whether the Lua WAF is configured for a location
//!
//! # Design Decisions
//! - Dictionary sizes come from settings, with fixed defaults
//! - `waf_storage` is only declared when some location uses the WAF

use crate::config::schema::{GlobalSettings, Location, RoutingModel, Server};
use crate::routing::location::is_location_in_location_list;

const CONFIGURATION_DATA_MB: u32 = 15;
const CERTIFICATE_DATA_MB: u32 = 16;
const WAF_STORAGE_MB: u32 = 64;

/// True when the WAF is not disabled globally and the location sets a mode.
pub fn should_configure_lua_resty_waf(disable_lua_resty_waf: bool, mode: &str) -> bool {
    !disable_lua_resty_waf && !mode.is_empty()
}

/// `lua_shared_dict` declarations, one per line.
pub fn build_lua_shared_dictionaries(
    settings: &GlobalSettings,
    servers: &[Server],
    disable_lua_resty_waf: bool,
) -> String {
    let size_of = |name: &str, default: u32| {
        settings
            .lua_shared_dicts
            .get(name)
            .copied()
            .unwrap_or(default)
    };

    let mut out = vec![
        format!(
            "lua_shared_dict configuration_data {}M",
            size_of("configuration_data", CONFIGURATION_DATA_MB)
        ),
        format!(
            "lua_shared_dict certificate_data {}M",
            size_of("certificate_data", CERTIFICATE_DATA_MB)
        ),
    ];

    let waf_in_use = servers
        .iter()
        .flat_map(|s| s.locations.iter())
        .any(|loc| !loc.waf_mode.is_empty());
    if !disable_lua_resty_waf && waf_in_use {
        out.push(format!("lua_shared_dict waf_storage {WAF_STORAGE_MB}M"));
    }

    format!("{};", out.join(";\n"))
}

/// Deployment-wide settings as a Lua table.
pub fn config_for_lua(model: &RoutingModel) -> String {
    format!(
        "{{\n  use_forwarded_headers = {},\n  is_ssl_passthrough_enabled = {},\n  http_redirect_code = {},\n  listen_ports = {{ ssl_proxy = \"{}\", https = \"{}\" }},\n}}",
        model.settings.use_forwarded_headers,
        model.listener.ssl_passthrough_enabled,
        model.settings.http_redirect_code,
        model.listener.ports.ssl_proxy,
        model.listener.ports.https,
    )
}

/// Redirect settings of a location as a Lua table.
pub fn location_config_for_lua(
    location: &Location,
    server: &Server,
    settings: &GlobalSettings,
) -> String {
    let force_ssl_redirect = (location.rewrite.force_ssl_redirect
        || (!server.ssl_cert_pem.is_empty() && location.rewrite.ssl_redirect))
        && !is_location_in_location_list(location, &settings.no_tls_redirect_locations);

    format!(
        "{{\n  force_ssl_redirect = {},\n  use_port_in_redirects = {},\n}}",
        force_ssl_redirect, location.use_port_in_redirects
    )
}
