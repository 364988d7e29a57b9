//! GlusterFS Volume Driver
//!
//! Exposes GlusterFS volumes as Docker volumes. Before a volume is mounted the
//! driver asks the cluster's management REST API whether it exists and, if it
//! does not, creates it across the peers named in the volume URI.
//!
//! # Architecture
//!
//! ```text
//! Host framework ──▶ GlusterDriver (reconcile) ──▶ GlusterRestClient ──▶ management API
//!                            │
//!                            └──▶ CommandRunner ──▶ glusterfs <args> <mountpoint>
//! ```
//!
//! The plugin socket protocol, mount-table bookkeeping and daemonization are
//! provided by the host framework; this crate supplies the driver hooks.
//!
//! # Modules
//!
//! - [`adapters`] - Command runner and event publishers implementing domain ports
//! - [`domain`] - Ports, value objects and events
//! - [`driver`] - Mount reconciler, volume URI parsing, configuration
//! - [`error`] - Error types
//! - [`metrics`] - Prometheus counters
//! - [`rest`] - GlusterFS management REST client

pub mod adapters;
pub mod domain;
pub mod driver;
pub mod error;
pub mod metrics;
pub mod rest;

// Re-export commonly used types
pub use domain::ports::{ClusterManager, VolumeDriver};
pub use driver::{DriverConfig, GlusterDriver};
pub use error::{Error, Result};
pub use rest::GlusterRestClient;
