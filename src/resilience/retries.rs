//! Next-upstream retry conditions.
//!
//! # Responsibilities
//! - Normalize the space-separated `proxy_next_upstream` condition list
//! - Merge the global "retry non-idempotent" switch with the in-list token
//!
//! # Design Decisions
//! - `non_idempotent` appears at most once, always last
//! - Empty tokens from repeated spaces are dropped

const NON_IDEMPOTENT: &str = "non_idempotent";

/// Condition list for `proxy_next_upstream`. Either the flag or the token
/// in `next_upstream` enables retrying non-idempotent requests.
pub fn build_next_upstream(next_upstream: &str, retry_non_idempotent: bool) -> String {
    let mut retry_non_idempotent = retry_non_idempotent;
    let mut codes: Vec<&str> = Vec::new();

    for token in next_upstream.split(' ') {
        if token == NON_IDEMPOTENT {
            retry_non_idempotent = true;
        } else if !token.is_empty() {
            codes.push(token);
        }
    }

    if retry_non_idempotent {
        codes.push(NON_IDEMPOTENT);
    }

    codes.join(" ")
}
