//! Domain Layer
//!
//! # Architecture
//!
//! The domain layer is organized into:
//!
//! - **Ports** (`ports.rs`) - Trait abstractions for the cluster API, command
//!   execution, event publishing and the host framework's driver hooks
//! - **Events** (`events.rs`) - Domain events for audit and testing
//!
//! # Usage
//!
//! ```ignore
//! use gluster_volume::domain::ports::{ClusterManager, Peer};
//!
//! async fn ensure<C: ClusterManager>(cluster: &C, name: &str, peers: &[Peer]) -> Result<()> {
//!     if !cluster.volume_exists(name).await? {
//!         cluster.create_volume(name, peers).await?;
//!     }
//!     Ok(())
//! }
//! ```

pub mod events;
pub mod ports;

pub use events::DomainEvent;
pub use ports::{
    ClusterManager, ClusterManagerFactory, CommandRunner, EventPublisher, MountRequest,
    MountResponse, MountSpec, Peer, VolumeDescriptor, VolumeDriver, VolumeState, VolumeUri,
};
