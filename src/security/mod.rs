//! Header hygiene between the caller, the gateway and the upstream.
//!
//! # Design Decisions
//! - Connection-scoped headers are never relayed in either direction
//! - Everything else passes through untouched; the gateway does no auth

pub mod headers;
