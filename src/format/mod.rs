//! Directive formatting utilities.
//!
//! Stateless helpers shared by every synthesis module. Each one is total:
//! malformed input yields a safe value (unchanged text, `false`), never a
//! panic.

pub mod byte_size;
pub mod escape;
pub mod header;
pub mod ip;

pub use byte_size::is_valid_byte_size;
pub use escape::{escape_literal_dollar, quote};
pub use header::{build_forwarded_for, normalize_header_name};
pub use ip::{format_addr, format_ip};
