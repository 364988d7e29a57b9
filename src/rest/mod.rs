//! GlusterFS management REST API
//!
//! - [`envelope`] - wire types and the tagged `ApiResult`
//! - [`client`] - the HTTP client implementing the `ClusterManager` port

pub mod client;
pub mod envelope;

pub use client::{GlusterRestClient, RestClientFactory, DEFAULT_API_PREFIX, DEFAULT_BRICK_BASE};
pub use envelope::{ApiResult, CreateVolumeRequest, Envelope, VolumeEntry, VolumeList};
