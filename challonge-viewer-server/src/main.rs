mod config;
mod html;
mod http;
mod logger;
mod state;

use std::io;
use std::path::PathBuf;

use clap::Parser;
use hyper::StatusCode;
use serde_json::Value;
use thiserror::Error;
use tokio::sync::watch;

use crate::config::{Config, ConfigError};
use crate::state::State;

#[derive(Debug, Parser)]
#[clap(version, about = "Renders Challonge tournaments as static html pages")]
struct Args {
    /// Path to the config file.
    #[clap(short, long, default_value = "config.toml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // A missing config file is fine, everything can come from the
    // environment or the defaults.
    let config = match Config::from_file(&args.config).await {
        Ok(config) => config,
        Err(ConfigError::Io(err)) if err.kind() == io::ErrorKind::NotFound => Config::default(),
        Err(err) => return Err(err.into()),
    };
    let config = config.with_environment();

    logger::init(config.loglevel);

    log::info!("Using config: {:?}", config);

    let (shutdown_tx, shutdown_rx) = watch::channel(());

    tokio::task::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                log::info!("Shutting down");
                let _ = shutdown_tx.send(());
            }
            Err(err) => log::error!("Failed to listen for shutdown signal: {}", err),
        }
    });

    let bind = config.bind;
    let state = State::new(config, shutdown_rx);

    http::bind(bind, state).await?;

    Ok(())
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("missing challonge api credentials")]
    MissingCredentials,
    #[error("not found")]
    NotFound,
    #[error("upstream error: {}", .0.status)]
    Upstream(UpstreamError),
}

/// An error response passed through from the upstream api.
#[derive(Clone, Debug)]
pub struct UpstreamError {
    /// The status code the upstream answered with, relayed to the client.
    pub status: StatusCode,
    /// The error payload embedded into the response body.
    pub error: Value,
}
