//! GlusterFS management REST client tests
//!
//! Exercises the client against an in-process HTTP server speaking the
//! management API envelope.

mod common;

use std::collections::HashSet;
use std::sync::Arc;

use assert_matches::assert_matches;
use hyper::{Method, StatusCode};
use parking_lot::Mutex;

use common::{listing, ok, rejected, MockServer};
use gluster_volume::domain::ports::{ClusterManager, Peer};
use gluster_volume::rest::DEFAULT_BRICK_BASE;
use gluster_volume::{Error, GlusterRestClient};

fn client(server: &MockServer) -> GlusterRestClient {
    GlusterRestClient::new(&server.url, DEFAULT_BRICK_BASE).unwrap()
}

#[tokio::test]
async fn test_volume_exists_matches_listing() {
    let server = MockServer::start(|req| match req.path.as_str() {
        "/api/1.0/volumes" => (StatusCode::OK, listing(&["vol1"])),
        _ => (StatusCode::NOT_FOUND, rejected("not found")),
    })
    .await;
    let client = client(&server);

    assert!(client.volume_exists("vol1").await.unwrap());
    assert!(!client.volume_exists("vol2").await.unwrap());
    assert!(!client.volume_exists("VOL1").await.unwrap());

    let requests = server.requests();
    assert_eq!(requests.len(), 3);
    assert!(requests.iter().all(|r| r.method == Method::GET));
}

#[tokio::test]
async fn test_volume_exists_with_empty_listing() {
    let server = MockServer::start(|_| (StatusCode::OK, r#"{"ok":true,"err":"","data":null}"#.into())).await;

    assert!(!client(&server).volume_exists("vol1").await.unwrap());
}

#[tokio::test]
async fn test_volume_exists_listing_rejected_is_error() {
    let server = MockServer::start(|_| (StatusCode::OK, rejected("glusterd down"))).await;

    let err = client(&server).volume_exists("vol1").await.unwrap_err();
    assert_eq!(err.server_message(), Some("glusterd down"));
}

#[tokio::test]
async fn test_volume_exists_undecodable_body_is_error() {
    let server = MockServer::start(|_| (StatusCode::OK, "<html>proxy error</html>".into())).await;

    let err = client(&server).volume_exists("vol1").await.unwrap_err();
    assert_matches!(err, Error::RestResponseParse(_));
}

#[tokio::test]
async fn test_create_volume_posts_bricks() {
    let server = MockServer::start(|req| {
        if req.method == Method::POST && req.path == "/api/1.0/volume/vol1" && !req.body.is_empty() {
            (StatusCode::OK, ok())
        } else {
            (StatusCode::OK, rejected("unknown HTTP method"))
        }
    })
    .await;

    client(&server)
        .create_volume("vol1", &[Peer::new("host1"), Peer::with_port("host2", 24007)])
        .await
        .unwrap();

    let posts = server.requests_with(Method::POST);
    assert_eq!(posts.len(), 1);
    let body = posts[0].json();
    assert_eq!(body["name"], "vol1");
    assert_eq!(body["bricks"][0], "host1:/mnt/vol1");
    assert_eq!(body["bricks"][1], "host2:/mnt/vol1");
    assert_eq!(body["replica"], 2);
    assert_eq!(body["transport"], "tcp");
    assert_eq!(body["start"], true);
}

#[tokio::test]
async fn test_create_volume_rejected_carries_server_message() {
    let server = MockServer::start(|_| (StatusCode::OK, rejected("quorum not met"))).await;

    let err = client(&server)
        .create_volume("vol1", &[Peer::new("host1")])
        .await
        .unwrap_err();

    assert_eq!(err.server_message(), Some("quorum not met"));
}

#[tokio::test]
async fn test_create_volume_rejected_with_error_status() {
    let server = MockServer::start(|_| {
        (StatusCode::INTERNAL_SERVER_ERROR, rejected("brick already in use"))
    })
    .await;

    let err = client(&server)
        .create_volume("vol1", &[Peer::new("host1")])
        .await
        .unwrap_err();

    assert_eq!(err.server_message(), Some("brick already in use"));
}

#[tokio::test]
async fn test_stop_volume_puts_stop() {
    let server = MockServer::start(|req| {
        if req.method == Method::PUT && req.path == "/api/1.0/volume/vol1/stop" {
            (StatusCode::OK, ok())
        } else {
            (StatusCode::OK, rejected("unknown HTTP method"))
        }
    })
    .await;

    client(&server).stop_volume("vol1").await.unwrap();
    assert_eq!(server.requests_with(Method::PUT).len(), 1);
}

#[tokio::test]
async fn test_stop_volume_rejected() {
    let server = MockServer::start(|_| (StatusCode::OK, rejected("volume not started"))).await;

    let err = client(&server).stop_volume("vol1").await.unwrap_err();
    assert_matches!(err, Error::RestRejected { ref operation, .. } if operation == "stop");
    assert_eq!(err.server_message(), Some("volume not started"));
}

#[tokio::test]
async fn test_created_volume_is_listed() {
    let volumes = Arc::new(Mutex::new(HashSet::new()));
    let state = volumes.clone();
    let server = MockServer::start(move |req| {
        if req.method == Method::GET && req.path == "/api/1.0/volumes" {
            let names: Vec<String> = state.lock().iter().cloned().collect();
            let names: Vec<&str> = names.iter().map(String::as_str).collect();
            (StatusCode::OK, listing(&names))
        } else if req.method == Method::POST {
            let name = req.path.trim_start_matches("/api/1.0/volume/").to_string();
            state.lock().insert(name);
            (StatusCode::OK, ok())
        } else {
            (StatusCode::OK, rejected("unsupported"))
        }
    })
    .await;
    let client = client(&server);

    assert!(!client.volume_exists("vol1").await.unwrap());
    client.create_volume("vol1", &[Peer::new("host1")]).await.unwrap();
    assert!(client.volume_exists("vol1").await.unwrap());
    assert_eq!(volumes.lock().len(), 1);
}
