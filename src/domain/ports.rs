//! Domain Ports (Port/Adapter Pattern)
//!
//! This module defines the abstractions the reconciliation logic depends on.
//! Infrastructure adapters implement these traits to provide concrete
//! implementations.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      Domain Layer                            │
//! │  ┌─────────────────────────────────────────────────────┐    │
//! │  │                    Ports (Traits)                    │    │
//! │  │ ClusterManager │ CommandRunner │ EventPublisher     │    │
//! │  │                 VolumeDriver (host hooks)            │    │
//! │  └─────────────────────────────────────────────────────┘    │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   Infrastructure Layer                       │
//! │  ┌─────────────────────────────────────────────────────┐    │
//! │  │                  Adapters (Impls)                    │    │
//! │  │ GlusterRestClient │ ShellCommandRunner │ Logging... │    │
//! │  └─────────────────────────────────────────────────────┘    │
//! └─────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;

use super::events::DomainEvent;
use crate::error::Result;

// =============================================================================
// Value Objects
// =============================================================================

/// A storage cluster node, used as a brick target and volfile server.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Peer {
    pub host: String,
    pub port: Option<u16>,
}

impl Peer {
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: None,
        }
    }

    pub fn with_port(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port: Some(port),
        }
    }
}

impl std::fmt::Display for Peer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.port {
            Some(port) => write!(f, "{}:{}", self.host, port),
            None => write!(f, "{}", self.host),
        }
    }
}

/// Parsed volume URI: which peers serve the volume and which volume to mount.
///
/// `volume_path` may carry a sub-directory (`vol/sub`); the cluster volume
/// itself is the first segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VolumeUri {
    pub peers: Vec<Peer>,
    pub volume_path: String,
}

impl VolumeUri {
    /// Name of the cluster volume.
    pub fn volume_name(&self) -> &str {
        self.volume_path
            .split('/')
            .next()
            .unwrap_or(&self.volume_path)
    }
}

/// Volume descriptor handed over by the host framework.
///
/// Owned by the framework; the driver only reads it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VolumeDescriptor {
    pub name: String,
    pub options: HashMap<String, String>,
}

impl VolumeDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            options: HashMap::new(),
        }
    }

    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }

    pub fn option(&self, key: &str) -> Option<&str> {
        self.options.get(key).map(String::as_str)
    }
}

/// Local mount point selected by the host framework.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountSpec {
    pub path: PathBuf,
}

impl MountSpec {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Mount request as received from the Docker daemon.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MountRequest {
    pub name: String,
    pub id: String,
}

/// Mount response returned to the Docker daemon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountResponse {
    pub mountpoint: PathBuf,
}

/// Outcome of making sure a volume exists in the cluster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VolumeState {
    /// The volume was already listed by the cluster
    Existing,
    /// The volume was absent and has just been created
    Created,
}

impl std::fmt::Display for VolumeState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VolumeState::Existing => write!(f, "existing"),
            VolumeState::Created => write!(f, "created"),
        }
    }
}

// =============================================================================
// Cluster Management Port
// =============================================================================

/// Port for the storage cluster's management API.
///
/// Every call is an independent round trip; implementations hold no state
/// beyond their endpoint and perform no retries.
#[async_trait]
pub trait ClusterManager: Send + Sync {
    /// Check whether a volume with exactly this name exists.
    ///
    /// An error means the state is unknown, never "absent".
    async fn volume_exists(&self, name: &str) -> Result<bool>;

    /// Create a volume replicated across the given peers.
    async fn create_volume(&self, name: &str, peers: &[Peer]) -> Result<()>;

    /// Stop a volume.
    async fn stop_volume(&self, name: &str) -> Result<()>;
}

/// Builds a `ClusterManager` for a management endpoint.
///
/// The driver asks for a fresh client on every mount so that nothing is
/// shared between invocations.
pub trait ClusterManagerFactory: Send + Sync {
    fn connect(&self, rest_url: &str) -> Result<Box<dyn ClusterManager>>;
}

// =============================================================================
// Command Execution Port
// =============================================================================

/// Port for running an external command such as `glusterfs`.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run a shell command, failing on non-zero exit or once `timeout` expires.
    async fn run(&self, command: &str, timeout: Duration) -> Result<()>;
}

// =============================================================================
// Driver Hooks Port
// =============================================================================

/// Capability hooks the host volume framework invokes.
#[async_trait]
pub trait VolumeDriver: Send + Sync {
    /// Make the volume available at the mount point.
    async fn on_mount_volume(
        &self,
        volume: &VolumeDescriptor,
        mount: &MountSpec,
        request: &MountRequest,
    ) -> Result<MountResponse>;

    /// Directory name the framework should use for this volume's mount.
    fn mount_name(&self, volume: &VolumeDescriptor) -> Result<String>;
}

// =============================================================================
// Event Publisher Port
// =============================================================================

/// Port for publishing domain events.
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Publish a domain event.
    async fn publish(&self, event: DomainEvent) -> Result<()>;

    /// Publish multiple events in order.
    async fn publish_all(&self, events: Vec<DomainEvent>) -> Result<()> {
        for event in events {
            self.publish(event).await?;
        }
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================
