//! Forwarding subsystem.
//!
//! # Data Flow
//! ```text
//! axum Request
//!     → request.rs (InboundRequest: buffered, immutable)
//!     → request.rs (OutboundRequest: base + path + query, filtered headers)
//!     → forwarder.rs (single upstream exchange, bounded deadline)
//!     → response.rs (UpstreamResponse) or error.rs (GatewayError)
//!     → http::response::GatewayResponse
//! ```
//!
//! # Design Decisions
//! - Nothing here outlives one request-response cycle
//! - Payloads are opaque bytes; any content type passes through unchanged
//! - All per-request failures stop at the forwarder boundary

pub mod error;
pub mod forwarder;
pub mod request;
pub mod response;

pub use error::GatewayError;
pub use forwarder::{Forwarder, Phase};
pub use request::{InboundRequest, OutboundRequest};
pub use response::UpstreamResponse;
