//! Mount Reconciler
//!
//! Makes sure the requested GlusterFS volume exists, creating it across its
//! peers when the cluster does not list it, then mounts it locally.
//!
//! ```text
//! parse voluri ──▶ volume_exists ──▶ create_volume (if absent) ──▶ glusterfs mount
//!      │                │                    │                         │
//!      └── abort ◀──────┴──── abort ◀────────┴────────── abort ◀───────┘
//! ```
//!
//! Every step is terminal on failure. An unknown existence state aborts the
//! mount rather than being read as "absent", so a volume is never created
//! twice because the cluster was briefly unreachable.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, error, info, instrument, warn};

use super::config::DriverConfig;
use super::uri::{mount_args, parse_volume_uri};
use crate::adapters::{CompositeEventPublisher, LoggingEventPublisher, ShellCommandRunner};
use crate::domain::events::DomainEvent;
use crate::domain::ports::{
    ClusterManagerFactory, CommandRunner, EventPublisher, MountRequest, MountResponse, MountSpec,
    VolumeDescriptor, VolumeDriver, VolumeState, VolumeUri,
};
use crate::error::{Error, Result};
use crate::metrics;
use crate::rest::RestClientFactory;

/// Descriptor option holding the volume URI.
pub const VOLURI_OPTION: &str = "voluri";

/// Descriptor option overriding the management endpoint.
pub const REST_OPTION: &str = "rest";

/// GlusterFS implementation of the host framework's driver hooks.
pub struct GlusterDriver {
    config: DriverConfig,
    clusters: Arc<dyn ClusterManagerFactory>,
    runner: Arc<dyn CommandRunner>,
    events: Arc<dyn EventPublisher>,
}

impl GlusterDriver {
    /// Create a driver talking to the real management API and mounting
    /// through `sh -c glusterfs ...`. Events are logged.
    pub fn new(config: DriverConfig) -> Result<Self> {
        Self::with_event_sinks(config, Vec::new())
    }

    /// Like [`GlusterDriver::new`], also delivering every event to `sinks`.
    pub fn with_event_sinks(
        config: DriverConfig,
        sinks: Vec<Arc<dyn EventPublisher>>,
    ) -> Result<Self> {
        let clusters = RestClientFactory::new(config.brick_base.clone(), config.rest_timeout);
        let events = sinks.into_iter().fold(
            CompositeEventPublisher::new().with_publisher(LoggingEventPublisher::info_level()),
            CompositeEventPublisher::with_shared,
        );
        Self::with_components(
            config,
            Arc::new(clusters),
            Arc::new(ShellCommandRunner::default()),
            Arc::new(events),
        )
    }

    /// Create a driver from explicit collaborators.
    pub fn with_components(
        config: DriverConfig,
        clusters: Arc<dyn ClusterManagerFactory>,
        runner: Arc<dyn CommandRunner>,
        events: Arc<dyn EventPublisher>,
    ) -> Result<Self> {
        config.validate()?;
        debug!(
            "Init gluster driver at {}, UniqName: {}",
            config.root.display(),
            config.mount_uniq_name
        );
        Ok(Self {
            config,
            clusters,
            runner,
            events,
        })
    }

    pub fn config(&self) -> &DriverConfig {
        &self.config
    }

    /// Management endpoint for a volume: its `rest` option or the default.
    pub fn rest_url<'a>(&'a self, volume: &'a VolumeDescriptor) -> &'a str {
        volume
            .option(REST_OPTION)
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .unwrap_or(&self.config.default_rest_url)
    }

    /// Shell command mounting `uri` at `mountpoint`.
    pub fn mount_command(uri: &VolumeUri, mountpoint: &str) -> String {
        format!("glusterfs {} {}", mount_args(uri), shell_quote(mountpoint))
    }

    /// Check that the volume exists and create it across its peers if not.
    #[instrument(skip(self, uri), fields(volume = %uri.volume_name()))]
    pub async fn ensure_volume(&self, rest_url: &str, uri: &VolumeUri) -> Result<VolumeState> {
        debug!("gluster REST API {}", rest_url);
        let cluster = self.clusters.connect(rest_url)?;
        let name = uri.volume_name();

        debug!("Checking if gluster volume {} exists", name);
        let exists = match cluster.volume_exists(name).await {
            Ok(exists) => exists,
            Err(e) => {
                warn!("Unable to check if gluster volume exists, {}", e);
                return Err(e);
            }
        };
        self.publish(DomainEvent::volume_checked(name, exists)).await;

        if exists {
            return Ok(VolumeState::Existing);
        }

        debug!("Creating gluster volume {} ...", name);
        if let Err(e) = cluster.create_volume(name, &uri.peers).await {
            error!("Unable to create gluster volume, {}", e);
            metrics::record_creation(false);
            self.publish(DomainEvent::volume_creation_failed(name, e.to_string()))
                .await;
            return Err(e);
        }

        metrics::record_creation(true);
        self.publish(DomainEvent::volume_created(name, &uri.peers)).await;
        debug!("Gluster volume {} successfully created", name);
        Ok(VolumeState::Created)
    }

    /// Stop a volume through the management API.
    #[instrument(skip(self))]
    pub async fn stop_volume(&self, rest_url: &str, name: &str) -> Result<()> {
        let cluster = self.clusters.connect(rest_url)?;
        cluster.stop_volume(name).await?;
        self.publish(DomainEvent::volume_stopped(name)).await;
        info!("Gluster volume {} stopped", name);
        Ok(())
    }

    async fn mount(&self, volume: &VolumeDescriptor, mount: &MountSpec) -> Result<(String, VolumeState)> {
        let raw = volume
            .option(VOLURI_OPTION)
            .ok_or_else(|| Error::MissingOption(VOLURI_OPTION.to_string()))?;
        let uri = parse_volume_uri(raw)?;
        let name = uri.volume_name().to_string();
        let mountpoint = mount.path().display().to_string();

        let outcome = async {
            let state = self.ensure_volume(self.rest_url(volume), &uri).await?;
            let command = Self::mount_command(&uri, &mountpoint);
            self.runner.run(&command, self.config.mount_timeout).await?;
            Ok::<_, Error>(state)
        }
        .await;

        match outcome {
            Ok(state) => {
                self.publish(DomainEvent::volume_mounted(&name, &mountpoint)).await;
                Ok((name, state))
            }
            Err(e) => {
                self.publish(DomainEvent::mount_failed(&name, &mountpoint, e.to_string()))
                    .await;
                Err(e)
            }
        }
    }

    async fn publish(&self, event: DomainEvent) {
        if let Err(e) = self.events.publish(event).await {
            warn!("Failed to publish driver event: {}", e);
        }
    }
}

impl std::fmt::Debug for GlusterDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GlusterDriver")
            .field("config", &self.config)
            .finish()
    }
}

#[async_trait]
impl VolumeDriver for GlusterDriver {
    #[instrument(skip(self, volume, request), fields(volume = %volume.name, path = %mount.path.display()))]
    async fn on_mount_volume(
        &self,
        volume: &VolumeDescriptor,
        mount: &MountSpec,
        request: &MountRequest,
    ) -> Result<MountResponse> {
        debug!("Mount request {} for {}", request.id, request.name);
        let result = self.mount(volume, mount).await;
        metrics::record_mount(result.is_ok());

        let (name, state) = result?;
        info!("Mounted gluster volume {} ({}) at {}", name, state, mount.path.display());
        Ok(MountResponse {
            mountpoint: mount.path.clone(),
        })
    }

    fn mount_name(&self, volume: &VolumeDescriptor) -> Result<String> {
        let raw = volume
            .option(VOLURI_OPTION)
            .map(|uri| uri.trim().trim_matches('"'))
            .filter(|uri| !uri.is_empty())
            .ok_or_else(|| Error::MissingOption(VOLURI_OPTION.to_string()))?;
        parse_volume_uri(raw)?;

        let name = if self.config.mount_uniq_name {
            raw
        } else {
            volume.name.trim()
        };
        if name.is_empty() {
            return Err(Error::Config("volume name is empty".to_string()));
        }
        Ok(urlencoding::encode(name).into_owned())
    }
}

/// Single-quote a value for `sh`.
fn shell_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', "'\\''"))
}
