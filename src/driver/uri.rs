//! Volume URI parsing
//!
//! A volume URI names the peers serving a volume and the volume to mount:
//!
//! ```text
//! node1,node2:24007:/data/projects
//! └────── peers ──────┘ └─ volume path ─┘
//! ```
//!
//! The last `:` separates the peer list from the volume path, so peers may
//! carry a port. A leading `/` on the volume path is optional.

use crate::domain::ports::{Peer, VolumeUri};
use crate::error::{Error, Result};

/// Parse a volume URI. No network or mount side effect happens before this
/// succeeds.
///
/// The volume name (first path segment) is used as a REST path segment and a
/// brick directory, so `.`/`..` segments and names not starting with an
/// alphanumeric or `_` are rejected. An all-digit volume name is rejected too:
/// `node1:24007` would otherwise read as volume `24007` on peer `node1`.
pub fn parse_volume_uri(raw: &str) -> Result<VolumeUri> {
    let uri = raw.trim().trim_matches('"');
    let invalid = |reason: &str| Error::InvalidVolumeUri {
        uri: raw.to_string(),
        reason: reason.to_string(),
    };

    let (peer_list, volume_path) = uri
        .rsplit_once(':')
        .ok_or_else(|| invalid("expected <peers>:<volume>"))?;

    let volume_path = volume_path.trim_start_matches('/').trim_end_matches('/');
    if volume_path.is_empty() {
        return Err(invalid("missing volume name"));
    }
    if !volume_path.chars().all(is_volume_char) || volume_path.contains("//") {
        return Err(invalid("volume name contains invalid characters"));
    }
    if volume_path.split('/').any(|segment| segment == "." || segment == "..") {
        return Err(invalid("volume path contains a dot segment"));
    }
    let volume_name = volume_path.split('/').next().unwrap_or(volume_path);
    if !volume_name.starts_with(|c: char| c.is_ascii_alphanumeric() || c == '_') {
        return Err(invalid("volume name must start with a letter, digit or '_'"));
    }
    if volume_name.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid("volume name is all digits, missing ':' after the peer port?"));
    }

    let peers = peer_list
        .split(',')
        .map(|peer| parse_peer(peer).map_err(|reason| invalid(&reason)))
        .collect::<Result<Vec<_>>>()?;

    Ok(VolumeUri {
        peers,
        volume_path: volume_path.to_string(),
    })
}

fn parse_peer(raw: &str) -> std::result::Result<Peer, String> {
    let (host, port) = match raw.split_once(':') {
        Some((host, port)) => {
            let port: u16 = port
                .parse()
                .map_err(|_| format!("invalid port in peer '{}'", raw))?;
            if port == 0 {
                return Err(format!("invalid port in peer '{}'", raw));
            }
            (host, Some(port))
        }
        None => (raw, None),
    };

    if host.is_empty() {
        return Err("empty peer address".to_string());
    }
    if !host.chars().all(is_host_char) {
        return Err(format!("invalid peer address '{}'", raw));
    }

    Ok(Peer {
        host: host.to_string(),
        port,
    })
}

fn is_host_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '.' || c == '-'
}

fn is_volume_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | '/')
}

/// Arguments for `glusterfs` selecting the volfile and its servers.
pub fn mount_args(uri: &VolumeUri) -> String {
    let servers = uri
        .peers
        .iter()
        .map(|peer| format!("-s '{}'", peer))
        .collect::<Vec<_>>()
        .join(" ");
    format!("--volfile-id='{}' {}", uri.volume_path, servers)
}
