use hyper::client::HttpConnector;
use hyper::{body, Body, Uri};
use hyper_tls::HttpsConnector;
use serde::de::DeserializeOwned;

use crate::{Result, StatusError};

/// The connection pool shared by all requests of a [`Client`].
///
/// [`Client`]: crate::Client
#[derive(Clone, Debug)]
pub(crate) struct HttpClient {
    inner: hyper::Client<HttpsConnector<HttpConnector>>,
}

impl HttpClient {
    pub(crate) async fn send(&self, request: Request) -> Result<Response> {
        log::debug!("GET {}", request.endpoint());

        let uri: Uri = request.uri.parse()?;

        // Every endpoint this crate consumes is read-only.
        let req = hyper::Request::get(uri).body(Body::empty()).unwrap();

        let resp = self.inner.request(req).await?;

        Ok(Response { inner: resp })
    }
}

impl Default for HttpClient {
    fn default() -> Self {
        Self {
            inner: hyper::Client::builder().build(HttpsConnector::new()),
        }
    }
}

/// A single request against the Challonge api.
#[derive(Clone, Debug)]
pub struct Request {
    uri: String,
}

impl Request {
    /// Returns the uri without the query string. The query carries the api
    /// key and stays out of log output.
    fn endpoint(&self) -> &str {
        match self.uri.split_once('?') {
            Some((endpoint, _)) => endpoint,
            None => &self.uri,
        }
    }
}

#[derive(Clone, Debug)]
pub struct RequestBuilder {
    inner: Request,
    api_key: Option<String>,
}

impl RequestBuilder {
    pub(crate) fn new(base_url: &str, api_key: Option<&str>) -> Self {
        Self {
            inner: Request {
                uri: String::from(base_url),
            },
            api_key: api_key.map(String::from),
        }
    }

    /// Appends `path` to the request uri.
    pub fn uri(mut self, path: &str) -> Self {
        self.inner.uri.push_str(path);
        self
    }

    /// Consumes the builder, appending the `api_key` query parameter if the
    /// client carries a key.
    pub fn build(mut self) -> Request {
        if let Some(api_key) = self.api_key {
            self.inner.uri.push_str("?api_key=");
            self.inner.uri.push_str(&api_key);
        }

        self.inner
    }
}

impl From<RequestBuilder> for Request {
    fn from(builder: RequestBuilder) -> Self {
        builder.build()
    }
}

#[derive(Debug)]
pub struct Response {
    inner: hyper::Response<Body>,
}

impl Response {
    /// Deserializes the response body as json.
    ///
    /// # Errors
    ///
    /// Returns a [`StatusError`] carrying the raw body if the upstream
    /// answered with a non-2xx status code, or an error if the body cannot be
    /// read or deserialized.
    pub async fn json<T>(self) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let status = self.inner.status();

        let bytes = body::to_bytes(self.inner.into_body()).await?;

        if !status.is_success() {
            return Err(StatusError {
                status,
                body: String::from_utf8_lossy(&bytes).into_owned(),
            }
            .into());
        }

        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[cfg(test)]
mod tests {
    use super::RequestBuilder;

    #[test]
    fn test_request_builder() {
        let req = RequestBuilder::new("https://api.challonge.com/v1", None)
            .uri("/tournaments.json")
            .build();

        assert_eq!(req.uri, "https://api.challonge.com/v1/tournaments.json");
    }

    #[test]
    fn test_request_builder_api_key() {
        let req = RequestBuilder::new("https://api.challonge.com/v1", Some("s3cr3t"))
            .uri("/tournaments/demo/matches.json")
            .build();

        assert_eq!(
            req.uri,
            "https://api.challonge.com/v1/tournaments/demo/matches.json?api_key=s3cr3t"
        );
    }

    #[test]
    fn test_request_endpoint_hides_api_key() {
        let req = RequestBuilder::new("https://api.challonge.com/v1", Some("s3cr3t"))
            .uri("/tournaments.json")
            .build();

        // The full uri carries the key, the logged form must not.
        assert!(req.uri.contains("api_key=s3cr3t"));
        assert_eq!(req.endpoint(), "https://api.challonge.com/v1/tournaments.json");
    }

    #[test]
    fn test_request_endpoint_without_query() {
        let req = RequestBuilder::new("https://api.challonge.com/v1", None)
            .uri("/tournaments.json")
            .build();

        assert_eq!(req.endpoint(), "https://api.challonge.com/v1/tournaments.json");
    }
}
