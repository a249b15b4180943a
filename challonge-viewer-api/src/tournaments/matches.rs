use serde::{Deserialize, Serialize};

use crate::id::{MatchId, ParticipantId};
use crate::{Client, Result};

/// A single match within a tournament bracket.
///
/// The player and winner fields stay `None` until the bracket has progressed
/// far enough for the slot to be decided.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Match {
    pub id: MatchId,
    /// The bracket round. Negative for lower-bracket rounds.
    pub round: i64,
    pub player1_id: Option<ParticipantId>,
    pub player2_id: Option<ParticipantId>,
    pub winner_id: Option<ParticipantId>,
    #[serde(default)]
    pub scores_csv: Option<String>,
    /// The match lifecycle state, e.g. `pending`, `open` or `complete`.
    pub state: String,
}

/// The single-key envelope every match record is wrapped in.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MatchEnvelope {
    #[serde(rename = "match")]
    pub inner: Match,
}

pub struct MatchesClient<'a> {
    client: &'a Client,
    tournament: &'a str,
}

impl<'a> MatchesClient<'a> {
    pub(crate) fn new(client: &'a Client, tournament: &'a str) -> Self {
        Self { client, tournament }
    }

    /// Returns all matches of the tournament, in the order the upstream api
    /// lists them.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn list(&self) -> Result<Vec<Match>> {
        let req = self
            .client
            .request()
            .uri(&format!("/tournaments/{}/matches.json", self.tournament))
            .build();

        let envelopes: Vec<MatchEnvelope> = self.client.send(req).await?.json().await?;

        Ok(envelopes.into_iter().map(|env| env.inner).collect())
    }
}
