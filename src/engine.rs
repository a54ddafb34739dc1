//! Directive synthesis engine.
//!
//! # Responsibilities
//! - Walk a routing model snapshot and call every directive builder
//! - Collect the results into serializable fragment bundles
//! - Render the bundles as a configuration outline for inspection
//!
//! # Design Decisions
//! - The engine owns the deny-variable slug cache; everything else is
//!   recomputed from the snapshot on each render
//! - Byte sizes that fail validation are omitted so the proxy default
//!   applies, never rendered verbatim
//!
//! # Data Flow
//! ```text
//! RoutingModel
//!     → HttpFragments   (limit keys, zones, geo blocks, resolver, lua, tracing)
//!     → ServerFragments (listeners, error locations)
//!         → LocationFragments (match clause, pass, auth, limits, ...)
//! ```

use std::fmt;

use serde::Serialize;

use crate::config::schema::{Location, RoutingModel, Server};
use crate::format::{build_forwarded_for, is_valid_byte_size, quote};
use crate::http::{build_custom_error_deps, build_custom_error_locations_per_server, CustomErrorDeps};
use crate::lua::{
    build_lua_shared_dictionaries, config_for_lua, location_config_for_lua,
    should_configure_lua_resty_waf,
};
use crate::net::{build_http_listener, build_https_listener, build_resolvers};
use crate::observability::metrics;
use crate::observability::tracing::{
    build_influxdb, build_opentracing, opentracing_propagate_context,
};
use crate::resilience::build_next_upstream;
use crate::routing::location::{
    build_upstream_name, is_location_allowed, proxy_set_header, UPSTREAM_BALANCER,
};
use crate::routing::{build_location, build_proxy_pass, enforce_regex_modifier};
use crate::security::auth::{build_auth_response_headers, build_auth_sign_url};
use crate::security::modsecurity::should_load_modsecurity_module;
use crate::security::{
    build_auth_location, build_deny_variable, build_rate_limit, build_rate_limit_variables,
    build_rate_limit_zones, build_whitelist_geo, deny_rule_key, should_apply_global_auth, SlugCache,
};

/// Directives that live in the `http` context.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HttpFragments {
    /// `geo`/`map` pairs defining the `$limit_<id>` keys the zones count on.
    pub rate_limit_variables: Vec<String>,
    pub rate_limit_zones: Vec<String>,
    pub whitelist_geo: Vec<String>,
    pub resolver: String,
    pub lua_shared_dicts: String,
    pub config_for_lua: String,
    pub opentracing: String,
    pub load_modsecurity: bool,
    pub next_upstream: String,
    pub forwarded_for: String,
}

/// Directives of one virtual host.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServerFragments {
    pub hostname: String,
    pub http_listen: String,
    pub https_listen: Option<String>,
    pub error_locations: Vec<CustomErrorDeps>,
    pub locations: Vec<LocationFragments>,
}

/// External auth wiring of one location.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuthFragments {
    /// Internal sub-location the request is delegated to.
    pub location: String,
    pub url: String,
    pub response_headers: Vec<String>,
    pub sign_in: Option<String>,
}

/// Directives of one location block.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationFragments {
    pub match_clause: String,
    pub upstream_name: String,
    pub denied: Option<String>,
    pub deny_variable: Option<String>,
    pub proxy_pass: String,
    pub set_header: String,
    pub auth: Option<AuthFragments>,
    pub rate_limits: Vec<String>,
    pub error_pages: Vec<String>,
    pub client_max_body_size: Option<String>,
    pub proxy_buffer_size: Option<String>,
    pub propagate_context: Option<String>,
    pub influxdb: String,
    pub lua_waf: bool,
    pub lua_config: String,
}

/// Complete render of a snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedConfig {
    pub http: HttpFragments,
    pub servers: Vec<ServerFragments>,
}

/// Turns routing model snapshots into directive fragments.
///
/// Cloning a synthesizer shares its slug cache, so deny variables stay
/// stable across every clone for the lifetime of the process.
#[derive(Debug, Clone, Default)]
pub struct Synthesizer {
    slugs: SlugCache,
}

impl Synthesizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn slug_cache(&self) -> &SlugCache {
        &self.slugs
    }

    /// Render the whole snapshot.
    pub fn render(&self, model: &RoutingModel) -> RenderedConfig {
        if tracing::enabled!(tracing::Level::DEBUG) {
            match serde_json::to_string(model) {
                Ok(json) => tracing::debug!(model = %json, "rendering snapshot"),
                Err(e) => tracing::debug!(error = %e, "snapshot not serializable"),
            }
        }

        let servers: Vec<ServerFragments> = model
            .servers
            .iter()
            .map(|server| self.render_server(model, server))
            .collect();

        let http = self.render_http(model);

        tracing::debug!(
            servers = servers.len(),
            zones = http.rate_limit_zones.len(),
            "rendered routing model"
        );

        RenderedConfig { http, servers }
    }

    /// Directives shared by all servers.
    pub fn render_http(&self, model: &RoutingModel) -> HttpFragments {
        let settings = &model.settings;

        let whitelist_geo = model
            .servers
            .iter()
            .flat_map(|s| s.locations.iter().map(move |loc| (s, loc)))
            .filter(|(_, loc)| !loc.whitelist_source_range.is_empty())
            .map(|(server, loc)| {
                build_whitelist_geo(
                    &self.deny_variable(server, loc),
                    &loc.whitelist_source_range,
                )
            })
            .collect();

        HttpFragments {
            rate_limit_variables: build_rate_limit_variables(
                &model.servers,
                &settings.limit_conn_zone_variable,
            ),
            rate_limit_zones: build_rate_limit_zones(&model.servers),
            whitelist_geo,
            resolver: build_resolvers(&settings.resolvers, settings.disable_ipv6_dns),
            lua_shared_dicts: build_lua_shared_dictionaries(
                settings,
                &model.servers,
                settings.disable_lua_resty_waf,
            ),
            config_for_lua: config_for_lua(model),
            opentracing: build_opentracing(&settings.opentracing),
            load_modsecurity: should_load_modsecurity_module(settings, &model.servers),
            next_upstream: format!(
                "proxy_next_upstream {};",
                build_next_upstream(&settings.proxy_next_upstream, settings.retry_non_idempotent)
            ),
            forwarded_for: build_forwarded_for(&settings.forwarded_for_header),
        }
    }

    /// Directives of one server, locations in model order.
    pub fn render_server(&self, model: &RoutingModel, server: &Server) -> ServerFragments {
        let enforce_regex = enforce_regex_modifier(&server.locations);

        let locations = server
            .locations
            .iter()
            .map(|loc| self.render_location(model, server, loc, enforce_regex))
            .collect();

        let https_listen = (!server.ssl_cert_pem.is_empty() || server.is_default())
            .then(|| build_https_listener(&model.listener, &server.hostname));

        let error_locations = build_custom_error_locations_per_server(server)
            .into_iter()
            .map(|el| {
                build_custom_error_deps(&el.upstream_name, &el.codes, model.settings.enable_metrics)
            })
            .collect();

        metrics::record_render();

        ServerFragments {
            hostname: server.hostname.clone(),
            http_listen: build_http_listener(&model.listener, &server.hostname),
            https_listen,
            error_locations,
            locations,
        }
    }

    fn render_location(
        &self,
        model: &RoutingModel,
        server: &Server,
        location: &Location,
        enforce_regex: bool,
    ) -> LocationFragments {
        let settings = &model.settings;
        let upstream_name = build_upstream_name(location).to_string();

        let deny_variable = (!location.whitelist_source_range.is_empty())
            .then(|| self.deny_variable(server, location));

        let error_pages = location
            .custom_http_errors
            .iter()
            .map(|code| {
                format!(
                    "error_page {code} = @custom_{}_{code};",
                    location.default_backend_upstream_name
                )
            })
            .collect();

        let propagate_context = settings
            .opentracing
            .enabled
            .then(|| format!("{};", opentracing_propagate_context(location)));

        LocationFragments {
            match_clause: build_location(location, enforce_regex),
            upstream_name,
            denied: if is_location_allowed(location) {
                None
            } else {
                location.denied.clone()
            },
            deny_variable,
            proxy_pass: build_proxy_pass(model.backend(&location.backend), location),
            set_header: proxy_set_header(location).to_string(),
            auth: build_auth(location, &settings.global_external_auth_url),
            rate_limits: build_rate_limit(location),
            error_pages,
            client_max_body_size: byte_size_directive(
                "client_max_body_size",
                &location.proxy_body_size,
                true,
            ),
            proxy_buffer_size: byte_size_directive(
                "proxy_buffer_size",
                &location.proxy_buffer_size,
                false,
            ),
            propagate_context,
            influxdb: build_influxdb(&location.influxdb),
            lua_waf: should_configure_lua_resty_waf(
                settings.disable_lua_resty_waf,
                &location.waf_mode,
            ),
            lua_config: location_config_for_lua(location, server, settings),
        }
    }

    fn deny_variable(&self, server: &Server, location: &Location) -> String {
        build_deny_variable(
            &self.slugs,
            &deny_rule_key(&server.hostname, &location.path),
        )
    }
}

fn build_auth(location: &Location, global_auth_url: &str) -> Option<AuthFragments> {
    let auth_location = build_auth_location(location, global_auth_url);
    if auth_location.is_empty() {
        return None;
    }

    let url = if should_apply_global_auth(location, global_auth_url) {
        global_auth_url.to_string()
    } else {
        location.external_auth.url.clone()
    };

    let sign_in = (!location.external_auth.signin_url.is_empty())
        .then(|| build_auth_sign_url(&location.external_auth.signin_url));

    Some(AuthFragments {
        location: auth_location,
        url,
        response_headers: build_auth_response_headers(&location.external_auth.response_headers),
        sign_in,
    })
}

/// Directive for a byte size, or `None` when the value is unset or invalid.
/// Only an invalid value counts as a fallback.
fn byte_size_directive(name: &'static str, value: &str, is_offset: bool) -> Option<String> {
    let value = value.trim();
    if is_valid_byte_size(value, is_offset) {
        return Some(format!("{name} {value};"));
    }

    if !value.is_empty() {
        tracing::warn!(directive = name, value, "invalid byte size, using proxy default");
        metrics::record_fallback(name);
    }
    None
}

const INDENT: &str = "    ";

fn write_block(f: &mut fmt::Formatter<'_>, depth: usize, text: &str) -> fmt::Result {
    for line in text.lines().filter(|l| !l.trim().is_empty()) {
        writeln!(f, "{}{}", INDENT.repeat(depth), line.trim_end())?;
    }
    Ok(())
}

impl fmt::Display for HttpFragments {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for vars in &self.rate_limit_variables {
            write_block(f, 0, vars)?;
        }
        for zone in &self.rate_limit_zones {
            writeln!(f, "{zone}")?;
        }
        for geo in &self.whitelist_geo {
            write_block(f, 0, geo)?;
        }
        write_block(f, 0, &self.resolver)?;
        write_block(f, 0, &self.lua_shared_dicts)?;
        write_block(f, 0, &self.opentracing)?;
        if self.load_modsecurity {
            writeln!(f, "load_module /etc/nginx/modules/ngx_http_modsecurity_module.so;")?;
        }
        writeln!(f, "{}", self.next_upstream)
    }
}

impl fmt::Display for LocationFragments {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{INDENT}location {} {{", self.match_clause)?;

        if let Some(reason) = &self.denied {
            writeln!(f, "{INDENT}{INDENT}# Location denied. Reason: {}", quote(reason))?;
            writeln!(f, "{INDENT}{INDENT}return 503;")?;
            return writeln!(f, "{INDENT}}}");
        }

        if let Some(var) = &self.deny_variable {
            writeln!(f, "{INDENT}{INDENT}if ({var}) {{ return 403; }}")?;
        }

        if let Some(auth) = &self.auth {
            writeln!(f, "{INDENT}{INDENT}auth_request {};", auth.location)?;
            for line in &auth.response_headers {
                writeln!(f, "{INDENT}{INDENT}{line}")?;
            }
            if let Some(sign_in) = &auth.sign_in {
                writeln!(f, "{INDENT}{INDENT}error_page 401 = {sign_in};")?;
            }
        }

        for limit in &self.rate_limits {
            writeln!(f, "{INDENT}{INDENT}{limit}")?;
        }
        if !self.error_pages.is_empty() {
            writeln!(f, "{INDENT}{INDENT}proxy_intercept_errors on;")?;
            for page in &self.error_pages {
                writeln!(f, "{INDENT}{INDENT}{page}")?;
            }
        }
        for size in [&self.client_max_body_size, &self.proxy_buffer_size]
            .into_iter()
            .flatten()
        {
            writeln!(f, "{INDENT}{INDENT}{size}")?;
        }
        if let Some(propagate) = &self.propagate_context {
            writeln!(f, "{INDENT}{INDENT}{propagate}")?;
        }
        write_block(f, 2, &self.influxdb)?;
        writeln!(
            f,
            "{INDENT}{INDENT}set $proxy_upstream_name {};",
            quote(&self.upstream_name)
        )?;
        write_block(f, 2, &self.proxy_pass)?;
        writeln!(f, "{INDENT}}}")
    }
}

impl fmt::Display for ServerFragments {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "server {{")?;
        writeln!(f, "{INDENT}server_name {};", self.hostname)?;
        write_block(f, 1, &self.http_listen)?;
        if let Some(https) = &self.https_listen {
            write_block(f, 1, https)?;
        }

        for loc in &self.locations {
            if let Some(auth) = &loc.auth {
                writeln!(f, "{INDENT}location = {} {{", auth.location)?;
                writeln!(f, "{INDENT}{INDENT}internal;")?;
                writeln!(f, "{INDENT}{INDENT}proxy_pass {};", auth.url)?;
                writeln!(f, "{INDENT}}}")?;
            }
            write!(f, "{loc}")?;
        }

        for errors in &self.error_locations {
            for code in &errors.error_codes {
                writeln!(f, "{INDENT}location @custom_{}_{code} {{", errors.upstream_name)?;
                writeln!(f, "{INDENT}{INDENT}internal;")?;
                writeln!(f, "{INDENT}{INDENT}proxy_intercept_errors off;")?;
                writeln!(f, "{INDENT}{INDENT}proxy_set_header X-Code {code};")?;
                writeln!(
                    f,
                    "{INDENT}{INDENT}set $proxy_upstream_name {};",
                    quote(&errors.upstream_name)
                )?;
                writeln!(f, "{INDENT}{INDENT}proxy_pass http://{UPSTREAM_BALANCER};")?;
                if errors.enable_metrics {
                    writeln!(f, "{INDENT}{INDENT}log_by_lua_block {{ monitor.call() }}")?;
                }
                writeln!(f, "{INDENT}}}")?;
            }
        }

        writeln!(f, "}}")
    }
}

impl fmt::Display for RenderedConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.http)?;
        for server in &self.servers {
            writeln!(f)?;
            write!(f, "{server}")?;
        }
        Ok(())
    }
}
