//! ModSecurity module loading.

use crate::config::schema::{GlobalSettings, Server};

/// True when ModSecurity is enabled globally or on any location.
pub fn should_load_modsecurity_module(settings: &GlobalSettings, servers: &[Server]) -> bool {
    settings.enable_modsecurity
        || servers
            .iter()
            .flat_map(|s| s.locations.iter())
            .any(|loc| loc.modsecurity_enabled)
}
