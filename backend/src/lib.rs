//! Cash Points backend library modules.
//!
//! The crate follows a hexagonal layout: `domain` holds entities, pure
//! derivation logic, ports, and services; `inbound` adapts HTTP requests to
//! driving ports; `outbound` adapts driven ports to PostgreSQL and the
//! Telegram Bot API; `server` wires the two sides together.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod outbound;
pub mod server;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
