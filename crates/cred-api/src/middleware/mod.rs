//! # HTTP Middleware
//!
//! Cross-cutting layers applied to every route. Authentication lives in
//! [`crate::auth`] because it is applied per route, not globally.

pub mod metrics;
