use std::ops::Deref;
use std::sync::Arc;

use challonge_viewer_api::Client;
use tokio::sync::watch;

use crate::config::Config;
use crate::Error;

#[derive(Clone, Debug)]
pub struct State(Arc<StateInner>);

impl State {
    pub fn new(config: Config, shutdown_rx: watch::Receiver<()>) -> Self {
        let mut challonge = Client::new(config.challonge.url.clone());
        if let Some(api_key) = config.challonge.api_key.clone() {
            challonge = challonge.with_api_key(api_key);
        }

        Self(Arc::new(StateInner {
            config,
            challonge,
            shutdown_rx,
        }))
    }
}

impl Deref for State {
    type Target = StateInner;

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[derive(Debug)]
pub struct StateInner {
    pub config: Config,
    pub challonge: Client,
    pub shutdown_rx: watch::Receiver<()>,
}

impl StateInner {
    /// Returns the configured api key.
    ///
    /// The key is checked per request, not at startup. The server comes up
    /// without one and every data route fails with
    /// [`Error::MissingCredentials`] until a key is configured.
    pub fn api_key(&self) -> Result<&str, Error> {
        match &self.config.challonge.api_key {
            Some(api_key) => Ok(api_key),
            None => Err(Error::MissingCredentials),
        }
    }
}
