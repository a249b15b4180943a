use std::env;
use std::fmt::{self, Debug, Formatter};
use std::io;
use std::net::SocketAddr;
use std::path::Path;

use log::LevelFilter;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::fs::File;
use tokio::io::AsyncReadExt;

macro_rules! from_environment {
    ($config:expr, $($key:expr, $name:tt),*$(,)?) => {{
        $(
            {
                if let Ok(value) = env::var($key) {
                    if let Ok(value) = value.parse() {
                        $config.$name = value;
                    }
                }
            }
        )*
    }};
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub loglevel: LevelFilter,
    pub bind: SocketAddr,

    pub challonge: Challonge,
}

impl Config {
    pub async fn from_file<P>(path: P) -> Result<Self, ConfigError>
    where
        P: AsRef<Path>,
    {
        let mut file = File::open(path).await?;

        let mut buf = Vec::new();
        file.read_to_end(&mut buf).await?;

        Ok(toml::from_slice(&buf)?)
    }

    pub fn with_environment(mut self) -> Self {
        from_environment!(self, "CHALLONGE_VIEWER_LOGLEVEL", loglevel);

        // PORT replaces only the port, keeping the configured interface.
        if let Ok(value) = env::var("PORT") {
            if let Ok(port) = value.parse() {
                self.bind.set_port(port);
            }
        }

        self.challonge = self.challonge.with_environment();

        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            loglevel: LevelFilter::Info,
            bind: SocketAddr::new([0, 0, 0, 0].into(), 3000),
            challonge: Challonge::default(),
        }
    }
}

/// Upstream Challonge api settings.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Challonge {
    pub url: String,
    /// The account api key. Requests against the data routes fail until one
    /// is configured.
    pub api_key: Option<String>,
}

impl Challonge {
    pub fn with_environment(mut self) -> Self {
        from_environment!(self, "CHALLONGE_API_URL", url);

        if let Ok(value) = env::var("CHALLONGE_API_KEY") {
            self.api_key = Some(value);
        }

        self
    }
}

impl Default for Challonge {
    fn default() -> Self {
        Self {
            url: String::from("https://api.challonge.com/v1"),
            api_key: None,
        }
    }
}

// The api key never appears in debug output (the config is logged at
// startup).
impl Debug for Challonge {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Challonge")
            .field("url", &self.url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Toml(#[from] toml::de::Error),
}
