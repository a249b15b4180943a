//! Client bindings for the Challonge v1 REST api.
//!
//! Challonge wraps every record in a single-key envelope, e.g.
//! `{"tournament": {...}}` for tournaments. The clients in this crate unwrap
//! those envelopes and hand back the inner records.
//!
//! All consumed endpoints are read-only. Requests are authenticated by
//! appending the account api key as the `api_key` query parameter; a client
//! built without a key sends unauthenticated requests.
pub mod id;
pub mod tournaments;

mod http;

use std::fmt::{self, Debug, Formatter};

use hyper::StatusCode;
use thiserror::Error;

use self::http::{HttpClient, Request, RequestBuilder, Response};
use self::tournaments::TournamentsClient;

#[derive(Clone)]
pub struct Client {
    base_url: String,
    api_key: Option<String>,
    http: HttpClient,
}

impl Client {
    /// Creates a new `Client` sending requests to the api root `base_url`.
    pub fn new<T>(base_url: T) -> Self
    where
        T: Into<String>,
    {
        Self {
            base_url: base_url.into(),
            api_key: None,
            http: HttpClient::default(),
        }
    }

    /// Attaches the account api key appended to every request.
    pub fn with_api_key<T>(mut self, api_key: T) -> Self
    where
        T: Into<String>,
    {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn tournaments(&self) -> TournamentsClient<'_> {
        TournamentsClient::new(self)
    }

    pub(crate) fn request(&self) -> RequestBuilder {
        RequestBuilder::new(&self.base_url, self.api_key.as_deref())
    }

    pub(crate) async fn send(&self, request: Request) -> Result<Response> {
        self.http.send(request).await
    }
}

// The api key never appears in debug output.
impl Debug for Client {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// The transport failed before a response arrived.
    #[error(transparent)]
    Http(#[from] hyper::Error),
    #[error(transparent)]
    InvalidUri(#[from] hyper::http::uri::InvalidUri),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    /// The upstream api answered, but with a non-2xx status code.
    #[error(transparent)]
    BadStatus(#[from] StatusError),
}

impl Error {
    /// Returns the status code the upstream api answered with, or `None` if
    /// no response arrived at all.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::BadStatus(err) => Some(err.status),
            _ => None,
        }
    }
}

/// A response with a non-2xx status code.
#[derive(Clone, Debug, Error)]
#[error("upstream api responded with status {status}")]
pub struct StatusError {
    pub status: StatusCode,
    /// The raw response body, possibly empty.
    pub body: String,
}
