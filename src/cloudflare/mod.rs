//! Cloudflare API subsystem.
//!
//! # Data Flow
//! ```text
//! validated request (Credential [+ SslEnableRequest])
//!     → client.rs (resolve auth, one outbound call)
//!     → types.rs (envelope decoding, GatewayResult normalization)
//!     → http layer (serializes GatewayResult)
//! ```

pub mod client;
pub mod types;

pub use client::CloudflareGateway;
pub use types::{AccountIdentity, CertificateAuthority, GatewayResult, SslEnableRequest};
