//! # Route Modules
//!
//! | Prefix           | Module           | Auth              |
//! |------------------|------------------|-------------------|
//! | `/credentials/*` | [`credentials`]  | API key on writes |
//! | `/api-keys`      | [`api_keys`]     | Admin token       |
//! | `/heartbeat`, `/health/*`, `/metrics` | [`health`] | None |

pub mod api_keys;
pub mod credentials;
pub mod health;
