//! Failure injection: unreachable, slow, broken and looping upstreams.

use std::time::{Duration, Instant};

use axum::http::StatusCode;
use axum::response::Redirect;
use axum::routing::get;
use serde_json::{json, Value};

mod common;
use common::{
    client, gateway_config, route, start_gateway, start_raw_backend, start_silent_backend,
    start_upstream, unused_addr,
};
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;

#[tokio::test]
async fn test_unreachable_upstream_is_502() {
    let dead = unused_addr().await;
    let (gateway, shutdown) = start_gateway(gateway_config(vec![route("orders", "/orders", dead)])).await;

    let res = client()
        .post(format!("http://{gateway}/orders"))
        .header("content-type", "application/json")
        .body(r#"{"item":"book"}"#)
        .send()
        .await
        .expect("gateway must answer, not drop the connection");

    assert_eq!(res.status(), 502);
    assert_eq!(res.headers()["content-type"], "application/json");
    let body: Value = res.json().await.unwrap();
    assert_eq!(body, json!({"error": "upstream unavailable", "status": 502}));

    shutdown.trigger();
}

#[tokio::test]
async fn test_caller_disconnect_aborts_upstream_exchange() {
    let (silent, received, closed) = start_silent_backend().await;

    let mut config = gateway_config(vec![route("users", "/users", silent)]);
    config.upstream.request_timeout_secs = 20;
    config.listener.request_timeout_secs = 30;
    let (gateway, shutdown) = start_gateway(config).await;

    let mut caller = TcpStream::connect(gateway).await.unwrap();
    caller
        .write_all(b"GET /users/1 HTTP/1.1\r\nHost: gateway\r\n\r\n")
        .await
        .unwrap();

    tokio::time::timeout(Duration::from_secs(2), received)
        .await
        .expect("request should reach the upstream")
        .unwrap();
    tokio::time::sleep(Duration::from_millis(300)).await;
    drop(caller);

    // well inside the 20s upstream deadline
    let read = tokio::time::timeout(Duration::from_secs(3), closed)
        .await
        .expect("upstream connection should close once the caller leaves")
        .unwrap();
    assert_eq!(read.unwrap(), 0);

    shutdown.trigger();
}

#[tokio::test]
async fn test_slow_upstream_is_504() {
    let slow = start_upstream(axum::Router::new().fallback(|| async {
        tokio::time::sleep(Duration::from_secs(3)).await;
        "too late"
    }))
    .await;

    let mut config = gateway_config(vec![route("users", "/users", slow)]);
    config.upstream.request_timeout_secs = 1;
    config.listener.request_timeout_secs = 5;
    let (gateway, shutdown) = start_gateway(config).await;

    let start = Instant::now();
    let res = client().get(format!("http://{gateway}/users/1")).send().await.unwrap();

    assert_eq!(res.status(), 504);
    assert!(start.elapsed() < Duration::from_secs(3));
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "upstream timeout");

    shutdown.trigger();
}

#[tokio::test]
async fn test_malformed_upstream_response_is_502() {
    let broken = start_raw_backend(b"THIS IS NOT HTTP\r\n\r\n").await;
    let (gateway, shutdown) = start_gateway(gateway_config(vec![route("users", "/users", broken)])).await;

    let res = client().get(format!("http://{gateway}/users")).send().await.unwrap();

    assert_eq!(res.status(), 502);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["status"], 502);

    shutdown.trigger();
}

#[tokio::test]
async fn test_truncated_upstream_body_is_502() {
    let truncated =
        start_raw_backend(b"HTTP/1.1 200 OK\r\nContent-Length: 100\r\nConnection: close\r\n\r\nshort").await;
    let (gateway, shutdown) = start_gateway(gateway_config(vec![route("users", "/users", truncated)])).await;

    let res = client().get(format!("http://{gateway}/users")).send().await.unwrap();

    assert_eq!(res.status(), 502);

    shutdown.trigger();
}

#[tokio::test]
async fn test_redirects_are_followed() {
    let users = start_upstream(
        axum::Router::new()
            .route("/users/old", get(|| async { Redirect::temporary("/users/new") }))
            .route("/users/new", get(|| async { "moved here" })),
    )
    .await;
    let (gateway, shutdown) = start_gateway(gateway_config(vec![route("users", "/users", users)])).await;

    let res = client().get(format!("http://{gateway}/users/old")).send().await.unwrap();

    assert_eq!(res.status(), 200);
    assert_eq!(res.text().await.unwrap(), "moved here");

    shutdown.trigger();
}

#[tokio::test]
async fn test_redirect_loop_is_cut_off() {
    let users = start_upstream(
        axum::Router::new().route("/users/loop", get(|| async { Redirect::temporary("/users/loop") })),
    )
    .await;
    let (gateway, shutdown) = start_gateway(gateway_config(vec![route("users", "/users", users)])).await;

    let res = client().get(format!("http://{gateway}/users/loop")).send().await.unwrap();

    assert_eq!(res.status(), 502);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "too many upstream redirects");

    shutdown.trigger();
}

#[tokio::test]
async fn test_redirects_relayed_when_following_disabled() {
    let users = start_upstream(
        axum::Router::new().route("/users/old", get(|| async { Redirect::temporary("/users/new") })),
    )
    .await;
    let mut config = gateway_config(vec![route("users", "/users", users)]);
    config.upstream.max_redirects = 0;
    let (gateway, shutdown) = start_gateway(config).await;

    let res = client().get(format!("http://{gateway}/users/old")).send().await.unwrap();

    assert_eq!(res.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(res.headers()["location"], "/users/new");

    shutdown.trigger();
}

#[tokio::test]
async fn test_oversized_body_is_413() {
    let users = unused_addr().await;
    let mut config = gateway_config(vec![route("users", "/users", users)]);
    config.listener.max_body_bytes = 16;
    let (gateway, shutdown) = start_gateway(config).await;

    let res = client()
        .post(format!("http://{gateway}/users"))
        .body(vec![b'x'; 1024])
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 413);

    shutdown.trigger();
}
