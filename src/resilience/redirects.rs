//! Redirect policy for upstream calls.
//!
//! Redirects are followed transparently, but never more than a fixed number
//! of hops; a misbehaving upstream that redirects in a loop ends in a 502.

use reqwest::redirect::Policy;

/// Build the client redirect policy. A cap of zero hands 3xx responses back verbatim.
pub fn redirect_policy(max_redirects: usize) -> Policy {
    if max_redirects == 0 {
        Policy::none()
    } else {
        Policy::limited(max_redirects)
    }
}
