//! `resolver` directive construction.

use std::net::IpAddr;

use crate::format::format_addr;

/// `resolver` line for the given name servers, or empty when there are
/// none. IPv6 servers are dropped and `ipv6=off` appended when IPv6 DNS
/// is disabled.
pub fn build_resolvers(resolvers: &[IpAddr], disable_ipv6: bool) -> String {
    if resolvers.is_empty() {
        return String::new();
    }

    let mut parts = vec!["resolver".to_string()];
    for ns in resolvers {
        let is_v6 = match ns {
            IpAddr::V4(_) => false,
            IpAddr::V6(v6) => v6.to_ipv4_mapped().is_none(),
        };
        if is_v6 && disable_ipv6 {
            continue;
        }
        parts.push(format_addr(ns));
    }
    parts.push("valid=30s".to_string());

    if disable_ipv6 {
        parts.push("ipv6=off".to_string());
    }

    format!("{};", parts.join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolvers() -> Vec<IpAddr> {
        vec![
            "192.0.0.1".parse().unwrap(),
            "2001:db8:1234:0000:0000:0000:0000:0000".parse().unwrap(),
        ]
    }

    #[test]
    fn test_build_resolvers() {
        assert_eq!(build_resolvers(&[], false), "");
        assert_eq!(
            build_resolvers(&resolvers(), false),
            "resolver 192.0.0.1 [2001:db8:1234::] valid=30s;"
        );
        assert_eq!(
            build_resolvers(&resolvers(), true),
            "resolver 192.0.0.1 valid=30s ipv6=off;"
        );
    }
}
