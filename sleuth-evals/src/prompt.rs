//! Ranking prompt construction.

use std::path::Path;

use sleuth_transcripts::{RoleAssignment, parse_players_line, trailing_players_line};

use crate::error::{Error, Result};

/// The question every ranking prompt asks.
pub const RANKING_QUESTION: &str =
    "Rank the players in order of most likely to be in the deceptive role.";

const GAME_DESCRIPTION: &str = "The game of Mafia is a social deduction game where players \
try to identify the members of the mafia among them. The names given are aliases and not \
the real player names.\nThe following is a transcript from the first round of a particular \
session of Mafia.";

const ANSWER_FORMAT: &str = "Please only answer in the following format:
Session: session_number
Rank:
<Player Name>
<Player Name>
...
<Player Name>

Actually likely to be Mafia: <Player Names or 'none'>";

/// A transcript file split into its body and trailing players line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptFile {
    pub name: String,
    /// Everything before the players line.
    pub body: String,
    /// The players line exactly as written in the file.
    pub players_line: String,
    pub players: RoleAssignment,
}

impl TranscriptFile {
    /// Read a transcript from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self::parse(name, &contents, path)
    }

    fn parse(name: String, contents: &str, path: &Path) -> Result<Self> {
        if contents.trim().is_empty() {
            return Err(Error::EmptySource(path.to_path_buf()));
        }
        let players_line = trailing_players_line(contents)
            .ok_or_else(|| {
                Error::MalformedTranscript(format!("{name}: last line is not a 'Players:' line"))
            })?
            .trim()
            .to_string();
        let players = parse_players_line(&players_line)
            .map_err(|e| Error::MalformedTranscript(format!("{name}: {e}")))?;

        let body_end = contents.rfind(players_line.as_str()).unwrap_or(contents.len());
        let body = contents[..body_end].trim_end().to_string();

        Ok(Self {
            name,
            body,
            players_line,
            players,
        })
    }
}

/// Build the prompt asking a model to rank the players of `transcript`.
#[must_use]
pub fn build_prompt(transcript: &TranscriptFile) -> String {
    let players: Vec<&str> = transcript.players.players().collect();
    format!(
        "{GAME_DESCRIPTION}\nFile: {name}\nTranscript:\n{body}\nThe players are: {players}\n{RANKING_QUESTION}\n\n{ANSWER_FORMAT}\n",
        name = transcript.name,
        body = transcript.body,
        players = players.join(", "),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRANSCRIPT: &str = "Player_Q: hi\nPlayer_B: hello\nPlayer_Q votes for Player_B!\nPlayers: ['Player_Q:town', 'Player_B:mafia']\n";

    fn parse(contents: &str) -> Result<TranscriptFile> {
        TranscriptFile::parse(
            "session_1_anonymized.txt".to_string(),
            contents,
            Path::new("session_1_anonymized.txt"),
        )
    }

    #[test]
    fn parse_splits_body_and_players_line() {
        let transcript = parse(TRANSCRIPT).unwrap();
        assert_eq!(
            transcript.body,
            "Player_Q: hi\nPlayer_B: hello\nPlayer_Q votes for Player_B!"
        );
        assert_eq!(
            transcript.players_line,
            "Players: ['Player_Q:town', 'Player_B:mafia']"
        );
        assert_eq!(transcript.players.len(), 2);
    }

    #[test]
    fn empty_transcript_is_empty_source() {
        assert!(matches!(parse("  \n"), Err(Error::EmptySource(_))));
    }

    #[test]
    fn transcript_without_players_line_is_malformed() {
        let err = parse("Player_Q: hi\n").unwrap_err();
        assert!(matches!(err, Error::MalformedTranscript(_)));
    }

    #[test]
    fn prompt_contains_transcript_players_and_format() {
        let prompt = build_prompt(&parse(TRANSCRIPT).unwrap());

        assert!(prompt.starts_with("The game of Mafia"));
        assert!(prompt.contains("File: session_1_anonymized.txt\nTranscript:\nPlayer_Q: hi"));
        assert!(prompt.contains("The players are: Player_Q, Player_B\n"));
        assert!(prompt.contains(RANKING_QUESTION));
        assert!(prompt.contains("Actually likely to be Mafia:"));
        // Roles must never leak into the prompt.
        assert!(!prompt.contains("mafia']"));
    }

    #[test]
    fn load_reads_file_name_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session_4.txt");
        std::fs::write(&path, TRANSCRIPT).unwrap();

        let transcript = TranscriptFile::load(&path).unwrap();
        assert_eq!(transcript.name, "session_4.txt");
    }
}
