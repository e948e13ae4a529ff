//! # API Shared
//!
//! Shared definitions for the rotation scheduling APIs.
//!
//! Contains:
//! - Request/response DTOs with OpenAPI schemas (`dto` module)
//! - Shared services like `HealthService`
//! - API-key and caller-role helpers
//!
//! Used by `api-rest` and the `rota` CLI so both surfaces report results the same way.

pub mod auth;
pub mod dto;
pub mod health;

pub use dto::*;
pub use health::HealthService;
