pub mod matches;
pub mod participants;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::id::TournamentId;
use crate::{Client, Result};

use self::matches::MatchesClient;
use self::participants::ParticipantsClient;

/// A single tournament record.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Tournament {
    pub id: TournamentId,
    pub name: String,
    /// The bracket format, e.g. `single elimination`.
    pub tournament_type: String,
    pub created_at: DateTime<FixedOffset>,
    #[serde(default)]
    pub game_name: Option<String>,
    pub full_challonge_url: String,
}

/// The single-key envelope every tournament record is wrapped in.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TournamentEnvelope {
    pub tournament: Tournament,
}

pub struct TournamentsClient<'a> {
    client: &'a Client,
}

impl<'a> TournamentsClient<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// Returns all tournaments owned by the account the api key belongs to,
    /// in the order the upstream api lists them.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn list(&self) -> Result<Vec<Tournament>> {
        let req = self.client.request().uri("/tournaments.json").build();

        let envelopes: Vec<TournamentEnvelope> = self.client.send(req).await?.json().await?;

        Ok(envelopes.into_iter().map(|env| env.tournament).collect())
    }

    /// Returns the tournament identified by `tournament`, which is either a
    /// numeric id or a url slug.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn get(&self, tournament: &str) -> Result<Tournament> {
        let req = self
            .client
            .request()
            .uri(&format!("/tournaments/{}.json", tournament))
            .build();

        let envelope: TournamentEnvelope = self.client.send(req).await?.json().await?;

        Ok(envelope.tournament)
    }

    pub fn matches(&self, tournament: &'a str) -> MatchesClient<'a> {
        MatchesClient::new(self.client, tournament)
    }

    pub fn participants(&self, tournament: &'a str) -> ParticipantsClient<'a> {
        ParticipantsClient::new(self.client, tournament)
    }
}

#[cfg(test)]
mod tests {
    use super::{Tournament, TournamentEnvelope};

    #[test]
    fn test_tournament_deserialize() {
        let input = r#"
        {
            "tournament": {
                "id": 3953832,
                "name": "Spring Cup",
                "tournament_type": "single elimination",
                "created_at": "2024-06-09T12:30:00.000-04:00",
                "game_name": "Chess",
                "full_challonge_url": "https://challonge.com/springcup",
                "state": "complete",
                "participants_count": 8
            }
        }
        "#;

        let envelope: TournamentEnvelope = serde_json::from_str(input).unwrap();
        let tournament = envelope.tournament;

        assert_eq!(tournament.id, 3953832);
        assert_eq!(tournament.name, "Spring Cup");
        assert_eq!(tournament.tournament_type, "single elimination");
        assert_eq!(tournament.game_name.as_deref(), Some("Chess"));
        assert_eq!(
            tournament.full_challonge_url,
            "https://challonge.com/springcup"
        );
    }

    #[test]
    fn test_tournament_deserialize_null_game() {
        let input = r#"
        {
            "id": 1,
            "name": "Test",
            "tournament_type": "round robin",
            "created_at": "2023-01-31T08:00:00+01:00",
            "game_name": null,
            "full_challonge_url": "https://challonge.com/test"
        }
        "#;

        let tournament: Tournament = serde_json::from_str(input).unwrap();

        assert!(tournament.game_name.is_none());
    }
}
