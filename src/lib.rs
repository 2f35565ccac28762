//! Universal SSL gateway library.
//!
//! A small HTTP gateway that verifies Cloudflare credentials and enables
//! Universal SSL on a zone, accepting either a Global API Key (with the
//! account email) or a scoped API token.

pub mod auth;
pub mod cloudflare;
pub mod config;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod security;

pub use config::schema::GatewayConfig;
pub use error::GatewayError;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
