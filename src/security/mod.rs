//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request:
//!     → headers.rs (OPTIONS short-circuit)
//!     → body size limit (http::server, from `security.max_body_size`)
//!     → Pass to routing
//!
//! Outgoing JSON response:
//!     → headers.rs (CORS headers)
//! ```

pub mod headers;

pub use headers::{apply_cors, preflight_middleware};
