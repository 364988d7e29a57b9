//! Driver configuration

use std::path::PathBuf;
use std::time::Duration;

use crate::error::{Error, Result};
use crate::rest::DEFAULT_BRICK_BASE;

/// Config schema version understood by this driver.
pub const CONFIG_VERSION: u32 = 2;

/// Where the host framework keeps driver state.
pub const DEFAULT_CONFIG_FOLDER: &str = "/etc/docker-volumes/gluster/";

/// Root directory under which volumes are mounted.
pub const DEFAULT_ROOT: &str = "/var/lib/docker-volumes/gluster";

/// Management endpoint used when a volume has no `rest` option.
pub const DEFAULT_REST_URL: &str = "http://localhost:9000";

/// Bound on a single mount command.
pub const DEFAULT_MOUNT_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration for the GlusterFS driver
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriverConfig {
    /// Config schema version (passed through to the host framework)
    pub version: u32,

    /// Mount root
    pub root: PathBuf,

    /// Config storage folder (passed through to the host framework)
    pub folder: PathBuf,

    /// Name mount directories after the volume URI instead of the volume name
    pub mount_uniq_name: bool,

    /// Kill a mount command after this long
    pub mount_timeout: Duration,

    /// Management endpoint when the volume does not specify one
    pub default_rest_url: String,

    /// Brick directory on each peer
    pub brick_base: String,

    /// Per-request timeout for the management API
    pub rest_timeout: Duration,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            root: PathBuf::from(DEFAULT_ROOT),
            folder: PathBuf::from(DEFAULT_CONFIG_FOLDER),
            mount_uniq_name: false,
            mount_timeout: DEFAULT_MOUNT_TIMEOUT,
            default_rest_url: DEFAULT_REST_URL.to_string(),
            brick_base: DEFAULT_BRICK_BASE.to_string(),
            rest_timeout: Duration::from_secs(30),
        }
    }
}

impl DriverConfig {
    /// Reject settings the driver cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.mount_timeout.is_zero() {
            return Err(Error::Config("mount timeout must be greater than zero".into()));
        }
        if self.rest_timeout.is_zero() {
            return Err(Error::Config("REST timeout must be greater than zero".into()));
        }
        if self.default_rest_url.trim().is_empty() {
            return Err(Error::Config("default REST URL must not be empty".into()));
        }
        if self.brick_base.trim().is_empty() {
            return Err(Error::Config("brick base must not be empty".into()));
        }
        Ok(())
    }
}
