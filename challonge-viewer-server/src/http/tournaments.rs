use hyper::{Method, StatusCode};
use serde_json::Value;

use challonge_viewer_api::Error as ApiError;

use crate::html;
use crate::http::{Request, RequestUri, Response, Result};
use crate::{Error, UpstreamError};

pub async fn route(req: Request, mut uri: RequestUri<'_>) -> Result {
    match uri.take_str() {
        None if req.method() == Method::GET => list(req).await,
        Some(tournament) if !tournament.is_empty() => {
            match (uri.take_str(), uri.take_str()) {
                (Some("matches"), None) if req.method() == Method::GET => {
                    matches(req, tournament).await
                }
                _ => Err(Error::NotFound),
            }
        }
        _ => Err(Error::NotFound),
    }
}

async fn list(req: Request) -> Result {
    req.state().api_key()?;

    let tournaments = req
        .state()
        .challonge
        .tournaments()
        .list()
        .await
        .map_err(|err| upstream(err, "Failed to fetch tournaments"))?;

    log::debug!("Fetched {} tournaments", tournaments.len());

    Ok(Response::ok().html(html::tournament_index(&tournaments)))
}

async fn matches(req: Request, id: &str) -> Result {
    req.state().api_key()?;

    let fallback = "Failed to fetch matches";

    let challonge = req.state().challonge.tournaments();

    // The three upstream calls run strictly one after another; the first
    // failure aborts the remaining ones.
    let tournament = challonge
        .get(id)
        .await
        .map_err(|err| upstream(err, fallback))?;

    let matches = challonge
        .matches(id)
        .list()
        .await
        .map_err(|err| upstream(err, fallback))?;

    let participants = challonge
        .participants(id)
        .list()
        .await
        .map_err(|err| upstream(err, fallback))?;

    log::debug!(
        "Fetched {} matches and {} participants for tournament {}",
        matches.len(),
        participants.len(),
        tournament.id
    );

    Ok(Response::ok().html(html::match_list(&tournament, &matches, &participants)))
}

/// Converts an api error into the [`Error::Upstream`] answered to the client.
///
/// If the upstream responded, its status code is kept and its payload is
/// re-embedded as the error value; `fallback` fills in for an empty payload
/// or a request that never got a response (which reports as 500).
fn upstream(err: ApiError, fallback: &str) -> Error {
    log::error!("Upstream request failed: {}", err);

    match err {
        ApiError::BadStatus(err) if !err.body.is_empty() => {
            let error =
                serde_json::from_str(&err.body).unwrap_or_else(|_| Value::String(err.body));

            Error::Upstream(UpstreamError {
                status: err.status,
                error,
            })
        }
        ApiError::BadStatus(err) => Error::Upstream(UpstreamError {
            status: err.status,
            error: Value::String(fallback.to_owned()),
        }),
        _ => Error::Upstream(UpstreamError {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            error: Value::String(fallback.to_owned()),
        }),
    }
}
