//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (tracing, request ID, inbound deadline)
//! - Bind server to listener
//! - Dispatch requests to the routing engine
//! - Hand matched requests to the forwarder
//! - Observability (metrics, correlation IDs)

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::State,
    http::Request,
    response::{IntoResponse, Response},
    routing::{any, get},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::GatewayConfig;
use crate::error::Error;
use crate::health::{healthz, HEALTH_PATH};
use crate::http::request::{propagate_request_id_layer, set_request_id_layer, RequestIdExt};
use crate::http::response::GatewayResponse;
use crate::observability::metrics;
use crate::proxy::{Forwarder, GatewayError, InboundRequest};
use crate::routing::Router as ProxyRouter;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub router: Arc<ProxyRouter>,
    pub forwarder: Forwarder,
    pub max_body_bytes: usize,
}

/// HTTP server for the gateway.
pub struct HttpServer {
    router: Router,
    config: GatewayConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given (already validated) configuration.
    pub fn new(config: GatewayConfig) -> Result<Self, Error> {
        let proxy_router = Arc::new(ProxyRouter::from_config(&config.routes));
        let forwarder = Forwarder::new(&config.upstream)?;

        for route in proxy_router.routes() {
            tracing::info!(
                route = %route.name,
                prefix = %route.matcher.prefix(),
                upstream = %route.upstream_base_url,
                "Route registered"
            );
        }

        let state = AppState {
            router: proxy_router,
            forwarder,
            max_body_bytes: config.listener.max_body_bytes,
        };

        let router = Self::build_router(&config, state);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &GatewayConfig, state: AppState) -> Router {
        let middleware = ServiceBuilder::new()
            .layer(set_request_id_layer())
            .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                tracing::info_span!(
                    "request",
                    request_id = %request.request_id(),
                    method = %request.method(),
                    uri = %request.uri(),
                )
            }))
            .layer(propagate_request_id_layer())
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.listener.request_timeout_secs,
            )));

        Router::new()
            .route(HEALTH_PATH, get(healthz))
            .route("/{*path}", any(gateway_handler))
            .route("/", any(gateway_handler))
            .with_state(state)
            .layer(middleware)
    }

    /// The fully layered application, for driving in-process.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until `shutdown` fires, then drain in-flight requests.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            routes = self.config.routes.len(),
            "HTTP server starting"
        );

        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }
}

/// Main gateway handler.
/// Looks up the route, buffers the request and forwards it.
async fn gateway_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start_time = Instant::now();
    let request_id = request.request_id().to_string();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    // 1. Match Route
    let Some(route) = state.router.match_path(&path) else {
        tracing::warn!(request_id = %request_id, method = %method, path = %path, "No route matched");
        metrics::record_request(method.as_str(), 404, "none", start_time);
        return GatewayResponse::from(GatewayError::RouteNotFound(path.clone())).into_response();
    };

    tracing::debug!(
        request_id = %request_id,
        method = %method,
        path = %path,
        route = %route.name,
        upstream = %route.upstream_base_url,
        "Proxying request"
    );

    // 2. Buffer the inbound request
    let inbound = match InboundRequest::from_http(request, state.max_body_bytes).await {
        Ok(inbound) => inbound,
        Err(err) => {
            tracing::warn!(request_id = %request_id, route = %route.name, error = %err, "Rejected request body");
            metrics::record_request(method.as_str(), err.status().as_u16(), route.name, start_time);
            return GatewayResponse::from(err).into_response();
        }
    };

    // 3. Forward
    let response = state.forwarder.forward(&inbound, route).await;

    let status = response.status.as_u16();
    metrics::record_request(method.as_str(), status, route.name, start_time);
    tracing::info!(
        request_id = %request_id,
        method = %method,
        path = %path,
        route = %route.name,
        status = status,
        elapsed_ms = start_time.elapsed().as_millis() as u64,
        "Request completed"
    );

    response.into_response()
}
