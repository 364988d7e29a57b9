//! GlusterFS Volume Driver CLI
//!
//! Operator entry points around the driver hooks: mount a volume the way the
//! host framework would, or query and manage volumes through the management
//! REST API.
//!
//! ```text
//! gluster-volume mount node1,node2:/data /mnt/data
//! gluster-volume exists data
//! gluster-volume create data node1 node2
//! gluster-volume stop data
//! gluster-volume mount-name shared node1,node2:/data
//! ```

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing::{error, info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use gluster_volume::adapters::InMemoryEventCollector;
use gluster_volume::domain::ports::{
    ClusterManager, EventPublisher, MountRequest, MountSpec, VolumeDescriptor, VolumeDriver,
};
use gluster_volume::driver::config::{
    DEFAULT_CONFIG_FOLDER, DEFAULT_REST_URL, DEFAULT_ROOT, CONFIG_VERSION,
};
use gluster_volume::driver::{parse_volume_uri, REST_OPTION, VOLURI_OPTION};
use gluster_volume::rest::DEFAULT_BRICK_BASE;
use gluster_volume::{metrics, DriverConfig, GlusterDriver, GlusterRestClient, Result};

// =============================================================================
// CLI Arguments
// =============================================================================

/// GlusterFS volume driver - create cluster volumes on demand and mount them
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Management REST API URL used when a volume does not set `rest`
    #[arg(long, env = "GLUSTER_REST_URL", default_value = DEFAULT_REST_URL)]
    rest_url: String,

    /// Mount root
    #[arg(long, env = "DRIVER_ROOT", default_value = DEFAULT_ROOT)]
    root: PathBuf,

    /// Config storage folder
    #[arg(long, env = "CONFIG_FOLDER", default_value = DEFAULT_CONFIG_FOLDER)]
    config_folder: PathBuf,

    /// Name mount directories after the volume URI
    #[arg(long, env = "MOUNT_UNIQ_NAME")]
    mount_uniq_name: bool,

    /// Mount command timeout in seconds
    #[arg(long, env = "MOUNT_TIMEOUT_SECONDS", default_value = "30")]
    mount_timeout_seconds: u64,

    /// Management API request timeout in seconds
    #[arg(long, env = "REST_TIMEOUT_SECONDS", default_value = "30")]
    rest_timeout_seconds: u64,

    /// Brick directory on each peer
    #[arg(long, env = "BRICK_BASE", default_value = DEFAULT_BRICK_BASE)]
    brick_base: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Output logs as JSON
    #[arg(long, env = "LOG_JSON")]
    log_json: bool,

    /// Print driver metrics after the command
    #[arg(long)]
    print_metrics: bool,

    /// Print the driver events of this run as JSON lines after the command
    #[arg(long)]
    print_events: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Ensure the volume exists, then mount it
    Mount {
        /// Volume URI, `<peer>[,<peer>...]:<volume>`
        voluri: String,
        /// Local mount point
        mountpoint: PathBuf,
        /// Management REST API URL for this volume
        #[arg(long)]
        rest: Option<String>,
        /// Docker volume name
        #[arg(long, default_value = "")]
        name: String,
    },
    /// Report whether a volume exists
    Exists { name: String },
    /// Create a volume across peers unless it already exists
    Create {
        name: String,
        #[arg(required = true)]
        peers: Vec<String>,
    },
    /// Stop a volume
    Stop { name: String },
    /// Print the mount directory name for a volume
    MountName { name: String, voluri: String },
}

impl Args {
    fn driver_config(&self) -> DriverConfig {
        DriverConfig {
            version: CONFIG_VERSION,
            root: self.root.clone(),
            folder: self.config_folder.clone(),
            mount_uniq_name: self.mount_uniq_name,
            mount_timeout: Duration::from_secs(self.mount_timeout_seconds),
            default_rest_url: self.rest_url.clone(),
            brick_base: self.brick_base.clone(),
            rest_timeout: Duration::from_secs(self.rest_timeout_seconds),
        }
    }
}

// =============================================================================
// Main
// =============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&args);

    let events = Arc::new(InMemoryEventCollector::new());
    let driver = if args.print_events {
        let sink: Arc<dyn EventPublisher> = events.clone();
        GlusterDriver::with_event_sinks(args.driver_config(), vec![sink])?
    } else {
        GlusterDriver::new(args.driver_config())?
    };
    info!("GlusterFS driver ready (REST {})", args.rest_url);

    let result = run(&args, &driver).await;
    if let Err(e) = &result {
        error!("{}", e);
    }

    for event in events.events() {
        match serde_json::to_string(&event) {
            Ok(line) => println!("{}", line),
            Err(e) => error!("Unable to encode event: {}", e),
        }
    }

    if args.print_metrics {
        print!("{}", metrics::render()?);
    }
    result
}

async fn run(args: &Args, driver: &GlusterDriver) -> Result<()> {
    match &args.command {
        Command::Mount {
            voluri,
            mountpoint,
            rest,
            name,
        } => {
            let mut volume = VolumeDescriptor::new(name.clone()).with_option(VOLURI_OPTION, voluri);
            if let Some(rest) = rest {
                volume = volume.with_option(REST_OPTION, rest);
            }
            let request = MountRequest {
                name: name.clone(),
                id: String::new(),
            };

            let response = driver
                .on_mount_volume(&volume, &MountSpec::new(mountpoint), &request)
                .await?;
            println!("{}", response.mountpoint.display());
        }
        Command::Exists { name } => {
            let client = GlusterRestClient::with_timeout(
                &args.rest_url,
                args.brick_base.clone(),
                Duration::from_secs(args.rest_timeout_seconds),
            )?;
            println!("{}", client.volume_exists(name).await?);
        }
        Command::Create { name, peers } => {
            let uri = parse_volume_uri(&format!("{}:{}", peers.join(","), name))?;
            let state = driver.ensure_volume(&args.rest_url, &uri).await?;
            println!("{}", state);
        }
        Command::Stop { name } => {
            driver.stop_volume(&args.rest_url, name).await?;
        }
        Command::MountName { name, voluri } => {
            let volume = VolumeDescriptor::new(name.clone()).with_option(VOLURI_OPTION, voluri);
            println!("{}", driver.mount_name(&volume)?);
        }
    }
    Ok(())
}

// =============================================================================
// Logging Setup
// =============================================================================

fn init_logging(args: &Args) {
    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let filter = EnvFilter::from_default_env()
        .add_directive(level.into())
        .add_directive("hyper=warn".parse().expect("static directive"))
        .add_directive("reqwest=warn".parse().expect("static directive"));

    // Logs go to stderr; stdout carries command output.
    if args.log_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .init();
    }
}
