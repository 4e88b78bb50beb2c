//! Shared types for the Nightbot SDK workspace
//!
//! `Secret` keeps tokens and client secrets out of Debug output and logs;
//! `Error` covers configuration loading for binaries built on the SDK.

mod error;
mod secret;

pub use error::{Error, Result};
pub use secret::Secret;
