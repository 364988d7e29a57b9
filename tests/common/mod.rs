//! In-process stand-in for the GlusterFS management REST API.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use http_body_util::{BodyExt, Full};
use hyper::body::{Bytes, Incoming};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Method, Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use parking_lot::Mutex;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use gluster_volume::domain::ports::CommandRunner;
use gluster_volume::Result;

/// A request as seen by the mock server.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub body: Vec<u8>,
}

impl RecordedRequest {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).expect("request body is JSON")
    }
}

/// HTTP server answering every request through a handler closure.
pub struct MockServer {
    pub url: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    handle: JoinHandle<()>,
}

impl MockServer {
    pub async fn start<F>(handler: F) -> Self
    where
        F: Fn(&RecordedRequest) -> (StatusCode, String) + Send + Sync + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());
        let handler = Arc::new(handler);
        let requests = Arc::new(Mutex::new(Vec::new()));

        let recorded = requests.clone();
        let handle = tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                let handler = handler.clone();
                let recorded = recorded.clone();

                tokio::spawn(async move {
                    let service = service_fn(move |req: Request<Incoming>| {
                        let handler = handler.clone();
                        let recorded = recorded.clone();
                        async move {
                            let method = req.method().clone();
                            let path = req.uri().path().to_string();
                            let body = req.into_body().collect().await?.to_bytes().to_vec();
                            let request = RecordedRequest { method, path, body };

                            let (status, body) = (handler.as_ref())(&request);
                            recorded.lock().push(request);

                            let response = Response::builder()
                                .status(status)
                                .header("Content-Type", "application/json")
                                .body(Full::new(Bytes::from(body)))
                                .unwrap();
                            Ok::<_, hyper::Error>(response)
                        }
                    });

                    let _ = http1::Builder::new()
                        .serve_connection(TokioIo::new(stream), service)
                        .await;
                });
            }
        });

        Self {
            url,
            requests,
            handle,
        }
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().clone()
    }

    pub fn requests_with(&self, method: Method) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.method == method)
            .collect()
    }
}

impl Drop for MockServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// JSON envelope bodies.
pub fn ok() -> String {
    r#"{"ok":true,"err":""}"#.to_string()
}

pub fn rejected(err: &str) -> String {
    serde_json::json!({ "ok": false, "err": err }).to_string()
}

pub fn listing(names: &[&str]) -> String {
    let data: Vec<_> = names.iter().map(|n| serde_json::json!({ "name": n })).collect();
    serde_json::json!({ "ok": true, "err": "", "data": data }).to_string()
}

/// Command runner recording what would have been executed.
#[derive(Default)]
pub struct RecordingRunner {
    pub commands: Mutex<Vec<String>>,
}

#[async_trait]
impl CommandRunner for RecordingRunner {
    async fn run(&self, command: &str, _timeout: Duration) -> Result<()> {
        self.commands.lock().push(command.to_string());
        Ok(())
    }
}
