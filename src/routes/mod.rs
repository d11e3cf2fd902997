//! HTTP route handlers.
//!
//! The page at `/` drives the JSON endpoints in [`suppressions`]; [`health`]
//! reports cache freshness for readiness probes.

pub mod health;
pub mod index;
pub mod suppressions;
