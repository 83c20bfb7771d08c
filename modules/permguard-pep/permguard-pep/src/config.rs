//! Connection settings for the PDP client.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, bail};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use serde::{Deserialize, Serialize};

/// Prefix of environment variables overriding the configuration,
/// e.g. `PERMGUARD_PEP_PORT=9095`.
pub const ENV_PREFIX: &str = "PERMGUARD_PEP_";

/// PDP client configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PdpClientConfig {
    /// PDP host name or address.
    pub host: String,

    pub port: u16,

    /// Use TLS (native root certificates) for the connection.
    pub use_tls: bool,

    /// Timeout for establishing a connection.
    #[serde(with = "crate::humantime_serde")]
    pub connect_timeout: Duration,

    /// Deadline applied to each authorization check.
    #[serde(with = "crate::humantime_serde")]
    pub rpc_timeout: Duration,

    /// Extra connection attempts after the first one fails.
    pub connect_retries: u32,

    /// Backoff unit; attempt `n` waits `n * base_backoff`.
    #[serde(with = "crate::humantime_serde")]
    pub base_backoff: Duration,

    #[serde(with = "crate::humantime_serde")]
    pub max_backoff: Duration,
}

impl Default for PdpClientConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_owned(),
            port: 9094,
            use_tls: false,
            connect_timeout: Duration::from_secs(10),
            rpc_timeout: Duration::from_secs(30),
            connect_retries: 3,
            base_backoff: Duration::from_millis(100),
            max_backoff: Duration::from_secs(5),
        }
    }
}

impl PdpClientConfig {
    /// Configuration pointing at `host:port` with default timeouts.
    #[must_use]
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_tls(mut self, use_tls: bool) -> Self {
        self.use_tls = use_tls;
        self
    }

    /// Load the configuration: defaults, then the YAML file (if given), then
    /// `PERMGUARD_PEP_*` environment variables.
    ///
    /// # Errors
    ///
    /// Fails if the file does not exist or any layer holds an unknown key or
    /// a malformed value.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(path) = path {
            if !path.is_file() {
                bail!("PDP client config file not found: {}", path.display());
            }
            figment = figment.merge(Yaml::file(path));
        }

        figment
            .merge(Env::prefixed(ENV_PREFIX))
            .extract()
            .context("invalid PDP client configuration")
    }

    /// `http://host:port`, or `https://` when TLS is enabled.
    #[must_use]
    pub fn endpoint_uri(&self) -> String {
        let scheme = if self.use_tls { "https" } else { "http" };
        format!("{scheme}://{}:{}", self.host, self.port)
    }
}
