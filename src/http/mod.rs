//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware: request ID, trace, timeout)
//!     → security::headers (OPTIONS short-circuit)
//!     → handlers.rs (per-endpoint state machine)
//!         → request.rs (parse & validate body)
//!         → cloudflare client (one outbound call)
//!         → response.rs (JSON envelope + CORS)
//!     → frontend.rs (HTML for every unmatched route)
//! ```

pub mod frontend;
pub mod handlers;
pub mod request;
pub mod response;
pub mod server;

pub use request::{MakeRequestUuid, X_REQUEST_ID};
pub use server::{AppState, HttpServer};
