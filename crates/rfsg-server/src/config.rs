//! Server configuration.
//!
//! Settings are layered with figment: built-in defaults, then an optional
//! TOML file, then `RFSG_` environment variables (nested keys split on `__`,
//! e.g. `RFSG_GRPC__PORT=50051`).

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use rfsg_core::limits::DEFAULT_MAX_MESSAGE_SIZE;
use rfsg_core::{InMemorySessionRepository, ViSession};
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};

/// Config file read when no path is given.
pub const DEFAULT_CONFIG_PATH: &str = "config/rfsg.toml";

/// Default gRPC port.
pub const DEFAULT_PORT: u16 = 31763;

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "RFSG_";

/// Complete daemon configuration.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// gRPC listener settings.
    pub grpc: GrpcSettings,
    /// Driver backend selection.
    pub driver: DriverSettings,
    /// Driver sessions exposed to clients by name.
    pub sessions: Vec<SessionEntry>,
}

/// gRPC listener settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct GrpcSettings {
    /// Interface to listen on. Defaults to loopback.
    pub bind_address: IpAddr,
    /// TCP port to listen on.
    pub port: u16,
    /// Largest request accepted, in bytes. Waveforms can be large.
    pub max_decoding_message_size: usize,
}

impl Default for GrpcSettings {
    fn default() -> Self {
        Self {
            bind_address: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: DEFAULT_PORT,
            max_decoding_message_size: DEFAULT_MAX_MESSAGE_SIZE,
        }
    }
}

impl GrpcSettings {
    /// Address the server binds.
    pub fn bind_socket(&self) -> SocketAddr {
        SocketAddr::new(self.bind_address, self.port)
    }
}

/// Which [`RfsgLibrary`](rfsg_core::RfsgLibrary) implementation to run against.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DriverKind {
    /// In-process simulated driver.
    #[default]
    Mock,
    /// The NI-RFSG runtime library.
    Ni,
}

/// Driver backend selection.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DriverSettings {
    /// Backend to load.
    pub kind: DriverKind,
    /// Overrides the platform default library name for [`DriverKind::Ni`].
    pub library_path: Option<PathBuf>,
}

/// A named driver session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionEntry {
    /// Name clients use in requests.
    pub name: String,
    /// Driver handle of an already open session.
    pub handle: ViSession,
}

impl ServerSettings {
    /// Layered configuration sources, lowest precedence first.
    ///
    /// `path` defaults to [`DEFAULT_CONFIG_PATH`]; a missing file is skipped.
    pub fn figment(path: Option<&Path>) -> Figment {
        let path = path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_PATH));
        let mut figment = Figment::from(Serialized::defaults(ServerSettings::default()));

        if path.exists() {
            figment = figment.merge(Toml::file(path));
        } else {
            tracing::warn!(
                path = %path.display(),
                "Config file not found (using defaults/env overrides)"
            );
        }

        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Extract settings from [`figment`](Self::figment).
    pub fn load(path: Option<&Path>) -> Result<Self, figment::Error> {
        Self::figment(path).extract()
    }

    /// Session map seeded from the configured entries.
    pub fn session_repository(&self) -> InMemorySessionRepository {
        self.sessions
            .iter()
            .map(|entry| (entry.name.clone(), entry.handle))
            .collect()
    }
}
