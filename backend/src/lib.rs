//! Multi-tenant scratch & win lead backend.
//!
//! Hexagonal layout: [`domain`] holds the model, ports and services,
//! [`inbound`] the actix HTTP adapter and [`outbound`] the PostgreSQL,
//! in-memory and Resend adapters.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use middleware::Trace;
