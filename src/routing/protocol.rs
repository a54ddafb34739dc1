//! Backend protocols and their passthrough directives.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ProtocolError;

/// Protocol a location speaks to its backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BackendProtocol {
    #[default]
    Http,
    Https,
    Grpc,
    Grpcs,
    Ajp,
    Fcgi,
}

impl BackendProtocol {
    /// Directive forwarding a request to the upstream.
    pub fn pass_directive(self) -> &'static str {
        match self {
            Self::Http | Self::Https => "proxy_pass",
            Self::Grpc | Self::Grpcs => "grpc_pass",
            Self::Ajp => "ajp_pass",
            Self::Fcgi => "fastcgi_pass",
        }
    }

    /// Scheme prefixed to the upstream name. AJP and FastCGI take none.
    pub fn scheme(self) -> &'static str {
        match self {
            Self::Http => "http://",
            Self::Https => "https://",
            Self::Grpc => "grpc://",
            Self::Grpcs => "grpcs://",
            Self::Ajp | Self::Fcgi => "",
        }
    }

    /// Scheme used when the backend terminates TLS itself.
    pub fn passthrough_scheme(self) -> &'static str {
        match self {
            Self::Grpcs => "grpcs://",
            _ => "https://",
        }
    }

    pub fn is_grpc(self) -> bool {
        matches!(self, Self::Grpc | Self::Grpcs)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Http => "HTTP",
            Self::Https => "HTTPS",
            Self::Grpc => "GRPC",
            Self::Grpcs => "GRPCS",
            Self::Ajp => "AJP",
            Self::Fcgi => "FCGI",
        }
    }
}

impl fmt::Display for BackendProtocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BackendProtocol {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "HTTP" => Ok(Self::Http),
            "HTTPS" => Ok(Self::Https),
            "GRPC" => Ok(Self::Grpc),
            "GRPCS" => Ok(Self::Grpcs),
            "AJP" => Ok(Self::Ajp),
            "FCGI" => Ok(Self::Fcgi),
            _ => Err(ProtocolError(s.to_string())),
        }
    }
}
