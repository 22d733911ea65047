//! The `utils` module provides the pieces shared by every other module of
//! `chathub`: the crate-wide error type and logging setup.

pub mod error;
pub mod logging;

pub use error::{HubError, Result};
