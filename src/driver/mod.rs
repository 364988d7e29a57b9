//! GlusterFS Volume Driver
//!
//! The hooks the host volume framework calls:
//!
//! - [`reconciler`] - `GlusterDriver`: ensure the volume exists, then mount it
//! - [`uri`] - volume URI parsing and `glusterfs` mount arguments
//! - [`config`] - typed driver configuration

pub mod config;
pub mod reconciler;
pub mod uri;

pub use config::DriverConfig;
pub use reconciler::{GlusterDriver, REST_OPTION, VOLURI_OPTION};
pub use uri::{mount_args, parse_volume_uri};
