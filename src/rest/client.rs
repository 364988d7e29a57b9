//! GlusterFS management REST client
//!
//! Stateless wrapper around the cluster's management API. Each call is a
//! single request/response cycle with no caching and no retry.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use super::envelope::{CreateVolumeRequest, Envelope, VolumeList};
use crate::domain::ports::{ClusterManager, ClusterManagerFactory, Peer};
use crate::error::{Error, Result};
use crate::metrics;

/// API version prefix of the management endpoints.
pub const DEFAULT_API_PREFIX: &str = "/api/1.0";

/// Directory on each peer under which bricks are created.
pub const DEFAULT_BRICK_BASE: &str = "/mnt/";

/// Per-request timeout.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Client for the GlusterFS management REST API.
#[derive(Clone)]
pub struct GlusterRestClient {
    base_url: String,
    api_prefix: String,
    brick_base: String,
    client: Client,
}

impl GlusterRestClient {
    /// Create a client for `base_url` that places bricks under `brick_base`.
    pub fn new(base_url: impl Into<String>, brick_base: impl Into<String>) -> Result<Self> {
        Self::with_timeout(base_url, brick_base, DEFAULT_REQUEST_TIMEOUT)
    }

    /// Create a client with a custom per-request timeout.
    pub fn with_timeout(
        base_url: impl Into<String>,
        brick_base: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let base_url = base_url.into();
        reqwest::Url::parse(&base_url)
            .map_err(|e| Error::Config(format!("Invalid REST URL '{}': {}", base_url, e)))?;

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_prefix: DEFAULT_API_PREFIX.to_string(),
            brick_base: brick_base.into(),
            client,
        })
    }

    /// Override the API prefix (default `/api/1.0`).
    pub fn with_api_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.api_prefix = prefix.into().trim_end_matches('/').to_string();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn volumes_url(&self) -> String {
        format!("{}{}/volumes", self.base_url, self.api_prefix)
    }

    fn volume_url(&self, name: &str) -> String {
        format!(
            "{}{}/volume/{}",
            self.base_url,
            self.api_prefix,
            urlencoding::encode(name)
        )
    }

    /// Brick string for every peer: `host:<brick_base>/<name>`.
    pub fn bricks(&self, name: &str, peers: &[Peer]) -> Vec<String> {
        let base = self.brick_base.trim_end_matches('/');
        peers
            .iter()
            .map(|peer| format!("{}:{}/{}", peer.host, base, name))
            .collect()
    }

    /// List all volumes known to the cluster.
    #[instrument(skip(self))]
    pub async fn list_volumes(&self) -> Result<VolumeList> {
        let result = self.fetch_volumes().await;
        metrics::record_rest_request("list", result.is_ok());
        result
    }

    async fn fetch_volumes(&self) -> Result<VolumeList> {
        let url = self.volumes_url();
        debug!("Listing GlusterFS volumes: {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(Error::RestConnection)?;

        let envelope: Envelope<VolumeList> = Self::decode(response, "list").await?;
        let volumes = envelope.into_result().into_result("list")?;
        Ok(volumes.unwrap_or_default())
    }

    async fn post_volume(&self, name: &str, peers: &[Peer]) -> Result<()> {
        let body = CreateVolumeRequest {
            name: name.to_string(),
            bricks: self.bricks(name, peers),
            replica: peers.len(),
            transport: "tcp".to_string(),
            start: true,
            force: true,
        };
        let url = self.volume_url(name);
        debug!("Creating GlusterFS volume at {} with bricks {:?}", url, body.bricks);

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(Error::RestConnection)?;

        let envelope: Envelope<serde_json::Value> = Self::decode(response, "create").await?;
        envelope.into_result().into_result("create").map(|_| ())
    }

    async fn put_stop(&self, name: &str) -> Result<()> {
        let url = format!("{}/stop", self.volume_url(name));
        debug!("Stopping GlusterFS volume at {}", url);

        let response = self
            .client
            .put(&url)
            .send()
            .await
            .map_err(Error::RestConnection)?;

        let envelope: Envelope<serde_json::Value> = Self::decode(response, "stop").await?;
        envelope.into_result().into_result("stop").map(|_| ())
    }

    /// Decode the envelope regardless of the HTTP status; the server reports
    /// failures through `ok`/`err`.
    async fn decode<T: DeserializeOwned>(response: Response, operation: &str) -> Result<Envelope<T>> {
        let status = response.status();
        let body = response.text().await.map_err(Error::RestConnection)?;

        serde_json::from_str(&body).map_err(|e| {
            Error::RestResponseParse(format!("{} (HTTP {}): {}", operation, status, e))
        })
    }
}

impl std::fmt::Debug for GlusterRestClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GlusterRestClient")
            .field("base_url", &self.base_url)
            .field("api_prefix", &self.api_prefix)
            .field("brick_base", &self.brick_base)
            .finish()
    }
}

#[async_trait]
impl ClusterManager for GlusterRestClient {
    #[instrument(skip(self))]
    async fn volume_exists(&self, name: &str) -> Result<bool> {
        let volumes = self.list_volumes().await?;
        Ok(volumes.iter().any(|volume| volume.name == name))
    }

    #[instrument(skip(self, peers), fields(peer_count = peers.len()))]
    async fn create_volume(&self, name: &str, peers: &[Peer]) -> Result<()> {
        let result = self.post_volume(name, peers).await;
        metrics::record_rest_request("create", result.is_ok());
        result
    }

    #[instrument(skip(self))]
    async fn stop_volume(&self, name: &str) -> Result<()> {
        let result = self.put_stop(name).await;
        metrics::record_rest_request("stop", result.is_ok());
        result
    }
}

/// Builds a fresh [`GlusterRestClient`] for every mount.
#[derive(Debug, Clone)]
pub struct RestClientFactory {
    brick_base: String,
    timeout: Duration,
}

impl RestClientFactory {
    pub fn new(brick_base: impl Into<String>, timeout: Duration) -> Self {
        Self {
            brick_base: brick_base.into(),
            timeout,
        }
    }
}

impl Default for RestClientFactory {
    fn default() -> Self {
        Self::new(DEFAULT_BRICK_BASE, DEFAULT_REQUEST_TIMEOUT)
    }
}

impl ClusterManagerFactory for RestClientFactory {
    fn connect(&self, rest_url: &str) -> Result<Box<dyn ClusterManager>> {
        let client = GlusterRestClient::with_timeout(rest_url, self.brick_base.clone(), self.timeout)?;
        Ok(Box::new(client))
    }
}
