//! IP literal formatting.

use std::net::IpAddr;

/// Wrap IPv6 literals in brackets. IPv4 addresses and anything that does
/// not parse as an address are returned unchanged.
pub fn format_ip(input: &str) -> String {
    match input.parse::<IpAddr>() {
        Ok(IpAddr::V6(_)) => format!("[{input}]"),
        _ => input.to_string(),
    }
}

/// Render a parsed address, bracketing IPv6 and printing it in its
/// canonical compressed form.
pub fn format_addr(addr: &IpAddr) -> String {
    match addr {
        IpAddr::V4(v4) => v4.to_string(),
        IpAddr::V6(v6) => match v6.to_ipv4_mapped() {
            Some(v4) => v4.to_string(),
            None => format!("[{v6}]"),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_ip() {
        let cases = [
            ("127.0.0.1", "127.0.0.1"),
            ("8.8.8.8", "8.8.8.8"),
            ("::1", "[::1]"),
            ("2001:4860:4860::8888", "[2001:4860:4860::8888]"),
            ("nonsense", "nonsense"),
            ("", ""),
        ];
        for (input, expected) in cases {
            assert_eq!(format_ip(input), expected, "input={input:?}");
        }
    }

    #[test]
    fn test_format_addr() {
        let v6: IpAddr = "2001:db8:1234:0000:0000:0000:0000:0000".parse().unwrap();
        assert_eq!(format_addr(&v6), "[2001:db8:1234::]");

        let mapped: IpAddr = "::ffff:10.0.0.1".parse().unwrap();
        assert_eq!(format_addr(&mapped), "10.0.0.1");
    }
}
