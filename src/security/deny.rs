//! Deny-rule variable names backed by a process-lifetime slug cache.

use std::sync::Arc;

use dashmap::DashMap;
use rand::Rng;

use crate::observability::metrics;

const SLUG_LEN: usize = 32;
const LETTERS: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Maps deny-rule identities to short random slugs.
///
/// Slugs keep variable names under the variable bucket size limit. An entry
/// is minted once per key and never evicted: the running process keys
/// runtime state on these names across reloads. Clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct SlugCache {
    inner: Arc<DashMap<String, String>>,
}

impl SlugCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Slug for `key`, minting one on first use.
    ///
    /// The shard lock is held across lookup and insert, so concurrent
    /// callers with the same key always observe the same slug.
    pub fn slug(&self, key: &str) -> String {
        if let Some(existing) = self.inner.get(key) {
            return existing.value().clone();
        }

        let slug = self
            .inner
            .entry(key.to_string())
            .or_insert_with(random_slug)
            .value()
            .clone();

        metrics::record_slug_cache_size(self.inner.len());
        tracing::debug!(key, "minted deny variable slug");
        slug
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

fn random_slug() -> String {
    let mut rng = rand::thread_rng();
    (0..SLUG_LEN)
        .map(|_| LETTERS[rng.gen_range(0..LETTERS.len())] as char)
        .collect()
}

/// Deny variable for a rule identity, e.g. `<host>_<path>`.
pub fn build_deny_variable(cache: &SlugCache, key: &str) -> String {
    format!("$deny_{}", cache.slug(key))
}

/// Identity of the deny rule attached to a location of a server.
pub fn deny_rule_key(hostname: &str, path: &str) -> String {
    format!("{hostname}_{path}")
}

/// `geo` block setting `deny_variable` to 1 for every client outside
/// `source_ranges`.
pub fn build_whitelist_geo(deny_variable: &str, source_ranges: &[String]) -> String {
    let mut out = format!("geo $remote_addr {deny_variable} {{\n    default 1;\n");
    for cidr in source_ranges {
        out.push_str(&format!("    {cidr} 0;\n"));
    }
    out.push('}');
    out
}
