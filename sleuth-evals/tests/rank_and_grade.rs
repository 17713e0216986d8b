//! Integration tests: rank a transcripts folder with a scripted model, then
//! grade the results file it produced.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use sleuth_evals::{
    Error, FailureKind, GradeOptions, RankOutcome, RankerConfig, RankingMode, ScanScope,
    grade_results, rank_transcripts, split_blocks,
};
use sleuth_models::providers::{GenerateRequest, GenerateResponse, ModelProvider, Usage};

/// Answers each prompt with the canned response for the file it mentions.
struct ScriptedProvider {
    answers: HashMap<String, String>,
    prepared: Mutex<Vec<String>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedProvider {
    fn new(answers: &[(&str, &str)]) -> Self {
        Self {
            answers: answers
                .iter()
                .map(|(file, answer)| (file.to_string(), answer.to_string()))
                .collect(),
            prepared: Mutex::new(Vec::new()),
            prompts: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl ModelProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn generate(&self, request: GenerateRequest) -> sleuth_models::Result<GenerateResponse> {
        self.prompts.lock().unwrap().push(request.prompt.clone());
        let answer = self
            .answers
            .iter()
            .find(|(file, _)| request.prompt.contains(&format!("File: {file}\n")))
            .map(|(_, answer)| answer.clone())
            .ok_or_else(|| sleuth_models::Error::ProviderApi("no scripted answer".to_string()))?;
        Ok(GenerateResponse {
            text: answer,
            usage: Usage::new(0, 0),
        })
    }

    async fn prepare(&self, model: &str) -> sleuth_models::Result<()> {
        self.prepared.lock().unwrap().push(model.to_string());
        Ok(())
    }
}

const SESSION_1: &str = "Daniel: morning all\nMaria: I think Sam is quiet\nSam votes for Maria!\nPlayers: ['Daniel:town', 'Maria:town', 'Sam:mafia']\n";
const SESSION_1_ANON: &str = "Player_C: morning all\nPlayer_K: I think Player_T is quiet\nPlayer_T votes for Player_K!\nPlayers: ['Player_C:town', 'Player_K:town', 'Player_T:mafia']\n";
const SESSION_2: &str = "Ann: hello\nBob: hi\nPlayers: ['Ann:mafia', 'Bob:town', 'Cid:town']\n";

fn write_transcripts(dir: &std::path::Path) {
    std::fs::write(dir.join("session_1.txt"), SESSION_1).unwrap();
    std::fs::write(dir.join("session_1_anonymized.txt"), SESSION_1_ANON).unwrap();
    std::fs::write(dir.join("session_2.txt"), SESSION_2).unwrap();
    std::fs::write(dir.join("broken.txt"), "no players line here\n").unwrap();
}

#[tokio::test]
async fn ranked_folder_grades_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    write_transcripts(dir.path());
    let provider = ScriptedProvider::new(&[
        ("session_1.txt", "Session: 1\nRank:\nSam\nDaniel\nMaria\n\nActually likely to be Mafia: Sam"),
        (
            "session_1_anonymized.txt",
            "Session: 1\nRank:\nPlayer_C\n\n\n\nPlayer_T\nPlayer_K\n",
        ),
        ("session_2.txt", "Session: 2\nRank:\nBob\nCid"),
    ]);
    let config = RankerConfig {
        model: "llama3.2".to_string(),
        pull: true,
        results_path: dir.path().join("ranks.txt"),
    };

    let report = rank_transcripts(&provider, dir.path(), &config).await.unwrap();

    assert_eq!(*provider.prepared.lock().unwrap(), vec!["llama3.2"]);
    assert_eq!(report.ranked(), 3);
    assert_eq!(
        report.outcomes[0],
        RankOutcome::Failed {
            file: "broken.txt".to_string(),
            reason: "malformed transcript: broken.txt: last line is not a 'Players:' line"
                .to_string(),
        }
    );

    let contents = std::fs::read_to_string(&config.results_path).unwrap();
    assert_eq!(split_blocks(&contents).len(), 3);
    assert!(contents.starts_with("File: session_1.txt\nSession: 1\nRank:\nSam"));

    let answers_only = GradeOptions {
        mode: RankingMode::FirstMention,
        scope: ScanScope::Response,
    };
    let graded = grade_results(&config.results_path, answers_only).unwrap();
    let scored = graded.scored();
    assert_eq!(scored.len(), 2);

    // Sam first of three.
    assert_eq!(scored[0].source_file, "session_1.txt");
    assert_eq!(scored[0].score, 0.0);
    // Player_T second of three; the blank run was folded so the block held.
    assert!(scored[1].was_anonymized);
    assert_eq!(scored[1].ranking, vec!["Player_C", "Player_T", "Player_K"]);
    assert!((scored[1].score - 100.0 / 3.0).abs() < 1e-9);

    let failures = graded.failures();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].kind, FailureKind::UnrankedDeceptive);
    assert_eq!(failures[0].source_file.as_deref(), Some("session_2.txt"));

    assert_eq!(graded.mean_by_variant(false), Some(0.0));
    let mean = graded.mean_score().unwrap();
    assert!((mean - 50.0 / 3.0).abs() < 1e-9);

    // Over whole blocks the players line names Ann, so session 2 scores last.
    let whole_blocks = GradeOptions {
        mode: RankingMode::FirstMention,
        scope: ScanScope::Block,
    };
    let graded = grade_results(&config.results_path, whole_blocks).unwrap();
    assert!(graded.failures().is_empty());
    let scored = graded.scored();
    assert_eq!(scored[2].ranking, vec!["Bob", "Cid", "Ann"]);
    assert!((scored[2].score - 200.0 / 3.0).abs() < 1e-9);
    assert!((graded.mean_score().unwrap() - 100.0 / 3.0).abs() < 1e-9);
}

#[tokio::test]
async fn prompts_never_reveal_roles() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("session_1.txt"), SESSION_1).unwrap();
    let provider = ScriptedProvider::new(&[("session_1.txt", "Sam")]);
    let config = RankerConfig {
        model: "m".to_string(),
        pull: false,
        results_path: dir.path().join("ranks.txt"),
    };

    rank_transcripts(&provider, dir.path(), &config).await.unwrap();

    assert!(provider.prepared.lock().unwrap().is_empty());
    let prompts = provider.prompts.lock().unwrap();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains("The players are: Daniel, Maria, Sam"));
    assert!(!prompts[0].contains("Sam:mafia"));
}

#[tokio::test]
async fn rerun_overwrites_results() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("session_1.txt"), SESSION_1).unwrap();
    let provider = ScriptedProvider::new(&[("session_1.txt", "Sam")]);
    let config = RankerConfig {
        model: "m".to_string(),
        pull: false,
        results_path: dir.path().join("ranks.txt"),
    };

    rank_transcripts(&provider, dir.path(), &config).await.unwrap();
    rank_transcripts(&provider, dir.path(), &config).await.unwrap();

    let contents = std::fs::read_to_string(&config.results_path).unwrap();
    assert_eq!(split_blocks(&contents).len(), 1);
}

#[test]
fn grading_a_missing_results_file_is_empty_source() {
    let dir = tempfile::tempdir().unwrap();
    let err = grade_results(&dir.path().join("ranks.txt"), GradeOptions::default()).unwrap_err();
    assert!(matches!(err, Error::EmptySource(_)));
}

#[test]
fn malformed_block_does_not_stop_the_batch() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ranks.txt");
    let contents = [
        "File: session_1.txt\nRank:\nA\nB\nC\nD\nPlayers: ['A:town', 'B:mafia', 'C:town', 'D:town']",
        "File: session_2.txt\nRank:\nA\nB",
        "File: session_3.txt\nRank:\nA B C D\nPlayers: {'A': 'mafia', 'B': 'town', 'C': 'town', 'D': 'mafia'}",
    ]
    .join("\n\n\n")
        + "\n\n\n";
    std::fs::write(&path, contents).unwrap();

    let report = grade_results(&path, GradeOptions::default()).unwrap();

    let scores: Vec<f64> = report.scored().iter().map(|o| o.score).collect();
    assert_eq!(scores, vec![25.0, 37.5]);
    assert_eq!(report.failures()[0].index, 1);
    assert_eq!(report.failures()[0].kind, FailureKind::MalformedBlock);
    assert_eq!(report.mean_score(), Some(31.25));
}
