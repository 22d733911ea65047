//! The `identity` module turns an externally issued JWT into the identity a
//! connection carries: a stable user id and a display name.
//!
//! Tokens are HS256-signed with the configured `server.jwt_secret`. The hub
//! only verifies them; `issue_token` exists for the developer CLI and tests.

mod claims;

pub use claims::{Claims, Identity, issue_token, verify_token};

#[cfg(test)]
mod tests;
