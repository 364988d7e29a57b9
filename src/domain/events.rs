//! Domain Events
//!
//! Immutable records of what happened while reconciling a mount. Used for
//! audit logging and for asserting behaviour in tests.
//!
//! # Example
//!
//! ```ignore
//! let event = DomainEvent::volume_created("data", &peers);
//! event_publisher.publish(event).await?;
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ports::Peer;

/// Domain event representing a significant occurrence in the driver.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum DomainEvent {
    /// The cluster was asked whether a volume exists.
    VolumeChecked {
        volume_name: String,
        exists: bool,
        timestamp: DateTime<Utc>,
    },

    /// A volume was created across peers.
    VolumeCreated {
        volume_name: String,
        peers: Vec<String>,
        timestamp: DateTime<Utc>,
    },

    /// Volume creation was refused or failed.
    VolumeCreationFailed {
        volume_name: String,
        reason: String,
        timestamp: DateTime<Utc>,
    },

    /// A volume was mounted locally.
    VolumeMounted {
        volume_name: String,
        mountpoint: String,
        timestamp: DateTime<Utc>,
    },

    /// The mount attempt was aborted.
    MountFailed {
        volume_name: String,
        mountpoint: String,
        reason: String,
        timestamp: DateTime<Utc>,
    },

    /// A volume was stopped.
    VolumeStopped {
        volume_name: String,
        timestamp: DateTime<Utc>,
    },
}

impl DomainEvent {
    pub fn volume_checked(volume_name: &str, exists: bool) -> Self {
        DomainEvent::VolumeChecked {
            volume_name: volume_name.to_string(),
            exists,
            timestamp: Utc::now(),
        }
    }

    pub fn volume_created(volume_name: &str, peers: &[Peer]) -> Self {
        DomainEvent::VolumeCreated {
            volume_name: volume_name.to_string(),
            peers: peers.iter().map(ToString::to_string).collect(),
            timestamp: Utc::now(),
        }
    }

    pub fn volume_creation_failed(volume_name: &str, reason: impl Into<String>) -> Self {
        DomainEvent::VolumeCreationFailed {
            volume_name: volume_name.to_string(),
            reason: reason.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn volume_mounted(volume_name: &str, mountpoint: &str) -> Self {
        DomainEvent::VolumeMounted {
            volume_name: volume_name.to_string(),
            mountpoint: mountpoint.to_string(),
            timestamp: Utc::now(),
        }
    }

    pub fn mount_failed(volume_name: &str, mountpoint: &str, reason: impl Into<String>) -> Self {
        DomainEvent::MountFailed {
            volume_name: volume_name.to_string(),
            mountpoint: mountpoint.to_string(),
            reason: reason.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn volume_stopped(volume_name: &str) -> Self {
        DomainEvent::VolumeStopped {
            volume_name: volume_name.to_string(),
            timestamp: Utc::now(),
        }
    }

    /// Get the event timestamp.
    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            DomainEvent::VolumeChecked { timestamp, .. } => *timestamp,
            DomainEvent::VolumeCreated { timestamp, .. } => *timestamp,
            DomainEvent::VolumeCreationFailed { timestamp, .. } => *timestamp,
            DomainEvent::VolumeMounted { timestamp, .. } => *timestamp,
            DomainEvent::MountFailed { timestamp, .. } => *timestamp,
            DomainEvent::VolumeStopped { timestamp, .. } => *timestamp,
        }
    }

    /// Get the event type name.
    pub fn event_type(&self) -> &'static str {
        match self {
            DomainEvent::VolumeChecked { .. } => "VolumeChecked",
            DomainEvent::VolumeCreated { .. } => "VolumeCreated",
            DomainEvent::VolumeCreationFailed { .. } => "VolumeCreationFailed",
            DomainEvent::VolumeMounted { .. } => "VolumeMounted",
            DomainEvent::MountFailed { .. } => "MountFailed",
            DomainEvent::VolumeStopped { .. } => "VolumeStopped",
        }
    }

    /// Name of the cluster volume the event is about.
    pub fn volume_name(&self) -> &str {
        match self {
            DomainEvent::VolumeChecked { volume_name, .. }
            | DomainEvent::VolumeCreated { volume_name, .. }
            | DomainEvent::VolumeCreationFailed { volume_name, .. }
            | DomainEvent::VolumeMounted { volume_name, .. }
            | DomainEvent::MountFailed { volume_name, .. }
            | DomainEvent::VolumeStopped { volume_name, .. } => volume_name,
        }
    }
}
