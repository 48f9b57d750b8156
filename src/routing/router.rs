//! Route lookup.
//!
//! # Responsibilities
//! - Store compiled routes in registration order
//! - Look up the matching route for a request path
//! - Return matched route or explicit no-match
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - O(n) path prefix scan (acceptable for typical route counts)
//! - Explicit `None` rather than silent default; the caller answers 404
//! - The path is passed through untouched: upstreams expect the full original path

use crate::config::RouteConfig;
use crate::routing::matcher::PathPrefixMatcher;

/// A compiled route.
#[derive(Debug, Clone)]
pub struct Route {
    pub name: String,
    pub matcher: PathPrefixMatcher,
    pub upstream_base_url: String,
}

/// Result of a successful lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteMatch<'a> {
    pub name: &'a str,
    pub upstream_base_url: &'a str,
    pub rewritten_path: &'a str,
}

/// Static prefix router.
#[derive(Debug, Clone, Default)]
pub struct Router {
    routes: Vec<Route>,
}

impl Router {
    /// Compile routes from configuration, keeping registration order.
    pub fn from_config(configs: &[RouteConfig]) -> Self {
        let routes = configs
            .iter()
            .map(|config| Route {
                name: config.name.clone(),
                matcher: PathPrefixMatcher::new(config.path_prefix.clone()),
                upstream_base_url: config.upstream.clone(),
            })
            .collect();

        Self { routes }
    }

    /// Find the first registered route whose prefix matches `path`.
    pub fn match_path<'a>(&'a self, path: &'a str) -> Option<RouteMatch<'a>> {
        self.routes
            .iter()
            .find(|route| route.matcher.matches(path))
            .map(|route| RouteMatch {
                name: &route.name,
                upstream_base_url: &route.upstream_base_url,
                rewritten_path: path,
            })
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }
}
