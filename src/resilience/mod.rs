//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Upstream client construction:
//!     → timeouts.rs (connect + total deadline)
//!     → redirects.rs (bounded redirect following)
//! ```
//!
//! # Design Decisions
//! - Timeouts are non-negotiable; every upstream call has a deadline
//! - Exactly one attempt per inbound request: no retries, no circuit breaking,
//!   so a flaky upstream is visible to the caller as-is

pub mod redirects;
pub mod timeouts;

pub use redirects::redirect_policy;
pub use timeouts::TimeoutPolicy;
