//! Static html rendering.
//!
//! Pages are assembled by plain string concatenation. Every upstream-supplied
//! value passes through [`escape`] before it is embedded.

use std::collections::HashMap;

use chrono::{DateTime, FixedOffset};

use challonge_viewer_api::id::ParticipantId;
use challonge_viewer_api::tournaments::matches::Match;
use challonge_viewer_api::tournaments::participants::Participant;
use challonge_viewer_api::tournaments::Tournament;

const STYLE: &str = "body { font-family: sans-serif; margin: 2em; } \
table { border-collapse: collapse; } \
th, td { border: 1px solid #999; padding: 4px 10px; text-align: left; } \
th { background: #eee; } \
.winner { font-weight: bold; color: #06862d; }";

fn document(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n\
         <style>{}</style>\n</head>\n<body>\n{}</body>\n</html>\n",
        title, STYLE, body
    )
}

/// Renders the tournament overview page.
///
/// Rows keep the order the upstream api listed the tournaments in; an empty
/// listing renders a page with only the header row.
pub fn tournament_index(tournaments: &[Tournament]) -> String {
    let mut body = String::from(
        "<h1>Tournaments</h1>\n<table>\n\
         <tr><th>Name</th><th>Type</th><th>Game</th><th>Created</th><th>Matches</th></tr>\n",
    );

    for tournament in tournaments {
        let game = match &tournament.game_name {
            Some(game) => escape(game),
            None => String::from("N/A"),
        };

        body.push_str(&format!(
            "<tr><td><a href=\"{}\" target=\"_blank\" rel=\"noopener\">{}</a></td>\
             <td>{}</td><td>{}</td><td>{}</td>\
             <td><a href=\"/tournaments/{}/matches\">View matches</a></td></tr>\n",
            escape(&tournament.full_challonge_url),
            escape(&tournament.name),
            escape(&tournament.tournament_type),
            game,
            format_created_at(&tournament.created_at),
            tournament.id,
        ));
    }

    body.push_str("</table>\n");

    document("Tournaments", &body)
}

/// Renders the match listing page of a single tournament.
///
/// Player names come from the participant lookup built here. A slot renders
/// as `TBD` when its id is still null, is unknown to the lookup, or maps to
/// an empty name. The side whose id equals the winner id is marked with the
/// `winner` class.
pub fn match_list(
    tournament: &Tournament,
    matches: &[Match],
    participants: &[Participant],
) -> String {
    let mut names: HashMap<ParticipantId, &str> = HashMap::with_capacity(participants.len());
    for participant in participants {
        if let Some(name) = participant.name.as_deref().filter(|name| !name.is_empty()) {
            names.insert(participant.id, name);
        }
    }

    let mut body = format!(
        "<p><a href=\"/tournaments\">Back to tournaments</a></p>\n<h1>{}</h1>\n<table>\n\
         <tr><th>Round</th><th>Player 1</th><th>Player 2</th><th>Score</th><th>State</th></tr>\n",
        escape(&tournament.name),
    );

    for m in matches {
        body.push_str(&format!(
            "<tr><td>Round {}</td>{}{}<td>{}</td><td>{}</td></tr>\n",
            m.round,
            player_cell(m.player1_id, m.winner_id, &names),
            player_cell(m.player2_id, m.winner_id, &names),
            format_score(m.scores_csv.as_deref()),
            escape(&capitalize(&m.state)),
        ));
    }

    body.push_str("</table>\n");

    document(&format!("{} - Matches", escape(&tournament.name)), &body)
}

fn player_cell(
    player: Option<ParticipantId>,
    winner: Option<ParticipantId>,
    names: &HashMap<ParticipantId, &str>,
) -> String {
    let name = player.and_then(|id| names.get(&id).copied()).unwrap_or("TBD");

    let class = match (player, winner) {
        (Some(player), Some(winner)) if player == winner => " class=\"winner\"",
        _ => "",
    };

    format!("<td{}>{}</td>", class, escape(name))
}

fn format_score(scores_csv: Option<&str>) -> String {
    match scores_csv {
        Some(scores) if !scores.is_empty() => escape(scores),
        _ => String::from("-"),
    }
}

/// Formats a creation timestamp as an unpadded en-US short date, e.g.
/// `6/9/2024`.
fn format_created_at(created_at: &DateTime<FixedOffset>) -> String {
    created_at.format("%-m/%-d/%Y").to_string()
}

fn capitalize(value: &str) -> String {
    let mut chars = value.chars();

    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Replaces the five html metacharacters in `value` with entities.
pub fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());

    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            ch => out.push(ch),
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use chrono::DateTime;

    use challonge_viewer_api::tournaments::matches::Match;
    use challonge_viewer_api::tournaments::participants::Participant;
    use challonge_viewer_api::tournaments::Tournament;

    use super::{escape, format_created_at, format_score, match_list, tournament_index};

    fn tournament(id: u64, name: &str, game_name: Option<&str>) -> Tournament {
        Tournament {
            id: id.into(),
            name: name.to_owned(),
            tournament_type: String::from("single elimination"),
            created_at: DateTime::parse_from_rfc3339("2024-06-09T12:30:00-04:00").unwrap(),
            game_name: game_name.map(String::from),
            full_challonge_url: format!("https://challonge.com/t{}", id),
        }
    }

    fn participant(id: u64, name: &str) -> Participant {
        Participant {
            id: id.into(),
            name: Some(name.to_owned()),
        }
    }

    fn open_match(player1: u64, player2: u64) -> Match {
        Match {
            id: 1.into(),
            round: 1,
            player1_id: Some(player1.into()),
            player2_id: Some(player2.into()),
            winner_id: None,
            scores_csv: None,
            state: String::from("open"),
        }
    }

    #[test]
    fn test_tournament_index() {
        let tournaments = [
            tournament(1, "Spring Cup", Some("Chess")),
            tournament(2, "Summer Cup", None),
            tournament(3, "Autumn Cup", Some("Go")),
        ];

        let html = tournament_index(&tournaments);

        // One row per tournament plus the header row, in upstream order.
        assert_eq!(html.matches("<tr>").count(), 4);
        let spring = html.find("Spring Cup").unwrap();
        let summer = html.find("Summer Cup").unwrap();
        let autumn = html.find("Autumn Cup").unwrap();
        assert!(spring < summer && summer < autumn);

        assert!(html.contains("<td>N/A</td>"));
        assert!(html.contains("6/9/2024"));
        assert!(html.contains("href=\"https://challonge.com/t1\""));
        assert!(html.contains("href=\"/tournaments/2/matches\""));
    }

    #[test]
    fn test_tournament_index_empty() {
        let html = tournament_index(&[]);

        assert_eq!(html.matches("<tr>").count(), 1);
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("</table>"));
    }

    #[test]
    fn test_tournament_index_idempotent() {
        let tournaments = [tournament(1, "Spring Cup", Some("Chess"))];

        assert_eq!(tournament_index(&tournaments), tournament_index(&tournaments));
    }

    #[test]
    fn test_tournament_index_escapes_values() {
        let tournaments = [tournament(1, "<b>Rigged & \"Fun\"</b>", None)];

        let html = tournament_index(&tournaments);

        assert!(html.contains("&lt;b&gt;Rigged &amp; &quot;Fun&quot;&lt;/b&gt;"));
        assert!(!html.contains("<b>Rigged"));
    }

    #[test]
    fn test_match_list_marks_winner() {
        let mut m = open_match(1, 2);
        m.winner_id = Some(1.into());
        m.scores_csv = Some(String::from("2-1"));
        m.state = String::from("complete");

        let participants = [participant(1, "Alice"), participant(2, "Bob")];

        let html = match_list(&tournament(1, "Spring Cup", None), &[m], &participants);

        assert!(html.contains("<td class=\"winner\">Alice</td>"));
        assert!(html.contains("<td>Bob</td>"));
        assert!(html.contains("<td>2-1</td>"));
        assert!(html.contains("<td>Complete</td>"));
        assert!(html.contains("<td>Round 1</td>"));
    }

    #[test]
    fn test_match_list_no_winner() {
        let participants = [participant(1, "Alice"), participant(2, "Bob")];

        let html = match_list(
            &tournament(1, "Spring Cup", None),
            &[open_match(1, 2)],
            &participants,
        );

        assert!(!html.contains("class=\"winner\""));
        assert!(html.contains("<td>-</td>"));
        assert!(html.contains("<td>Open</td>"));
    }

    #[test]
    fn test_match_list_winner_matches_neither_side() {
        let mut m = open_match(1, 2);
        m.winner_id = Some(3.into());
        m.state = String::from("complete");

        let participants = [participant(1, "Alice"), participant(2, "Bob")];

        let html = match_list(&tournament(1, "Spring Cup", None), &[m], &participants);

        // A winner id naming neither slot marks nobody.
        assert!(!html.contains("class=\"winner\""));
        assert!(html.contains("<td>Alice</td>"));
        assert!(html.contains("<td>Bob</td>"));
    }

    #[test]
    fn test_match_list_unknown_players_render_tbd() {
        let mut m = open_match(1, 2);
        m.player2_id = None;
        m.state = String::from("pending");

        // Participant 1 exists but has no usable name, participant 2 is
        // absent from the listing entirely.
        let participants = [Participant {
            id: 1.into(),
            name: None,
        }];

        let html = match_list(&tournament(1, "Spring Cup", None), &[m], &participants);

        assert_eq!(html.matches("<td>TBD</td>").count(), 2);
        assert!(html.contains("<td>Pending</td>"));
    }

    #[test]
    fn test_match_list_negative_round() {
        let mut m = open_match(1, 2);
        m.round = -2;

        let html = match_list(&tournament(1, "Spring Cup", None), &[m], &[]);

        assert!(html.contains("<td>Round -2</td>"));
    }

    #[test]
    fn test_match_list_empty() {
        let participants = [participant(1, "Alice"), participant(2, "Bob")];

        let html = match_list(&tournament(1, "Spring Cup", None), &[], &participants);

        // Only the header row renders when there are no matches.
        assert_eq!(html.matches("<tr>").count(), 1);
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<h1>Spring Cup</h1>"));
        assert!(html.contains("</table>"));
    }

    #[test]
    fn test_format_score() {
        assert_eq!(format_score(Some("3-2")), "3-2");
        assert_eq!(format_score(Some("")), "-");
        assert_eq!(format_score(None), "-");
    }

    #[test]
    fn test_format_created_at() {
        let date = DateTime::parse_from_rfc3339("2024-06-09T12:30:00-04:00").unwrap();
        assert_eq!(format_created_at(&date), "6/9/2024");

        let date = DateTime::parse_from_rfc3339("2023-12-31T23:59:59+01:00").unwrap();
        assert_eq!(format_created_at(&date), "12/31/2023");
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape("Alice & Bob"), "Alice &amp; Bob");
        assert_eq!(escape("<script>'\"</script>"), "&lt;script&gt;&#39;&quot;&lt;/script&gt;");
        assert_eq!(escape("plain"), "plain");
    }
}
