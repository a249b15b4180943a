use serde::{Deserialize, Serialize};

use crate::id::ParticipantId;
use crate::{Client, Result};

/// A single tournament participant.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Participant {
    pub id: ParticipantId,
    /// The display name. May be `None` or empty for participants invited by
    /// email that have not signed up yet.
    #[serde(default)]
    pub name: Option<String>,
}

/// The single-key envelope every participant record is wrapped in.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ParticipantEnvelope {
    pub participant: Participant,
}

pub struct ParticipantsClient<'a> {
    client: &'a Client,
    tournament: &'a str,
}

impl<'a> ParticipantsClient<'a> {
    pub(crate) fn new(client: &'a Client, tournament: &'a str) -> Self {
        Self { client, tournament }
    }

    /// Returns all participants of the tournament.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn list(&self) -> Result<Vec<Participant>> {
        let req = self
            .client
            .request()
            .uri(&format!(
                "/tournaments/{}/participants.json",
                self.tournament
            ))
            .build();

        let envelopes: Vec<ParticipantEnvelope> = self.client.send(req).await?.json().await?;

        Ok(envelopes.into_iter().map(|env| env.participant).collect())
    }
}
