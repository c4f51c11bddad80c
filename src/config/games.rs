use std::collections::HashSet;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use anyhow::Result;
use log::info;
use serde::{Deserialize, Serialize};

use crate::domain::Diagnostic;
use crate::errors::LeaderboardError;
use crate::parsing::parse_points_line;

/// One benchmarked game and its weight in the overall ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    pub id: String,
    pub name: String,
    pub weight: f64,
    /// Score file name inside the data directory, `<id>_results.txt` if unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    /// Short alias accepted by the weight override file, e.g. `A1`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl GameConfig {
    pub fn new(id: &str, name: &str, weight: f64) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            weight,
            file: None,
            code: None,
        }
    }

    pub fn file_name(&self) -> String {
        self.file
            .clone()
            .unwrap_or_else(|| format!("{}_results.txt", self.id))
    }

    fn answers_to(&self, key: &str) -> bool {
        self.id == key || self.code.as_deref() == Some(key)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum GameConfigDocument {
    Wrapped { games: Vec<GameConfig> },
    Bare(Vec<GameConfig>),
}

/// Parse and validate a game configuration document.
pub fn parse_game_configs(json: &str) -> Result<Vec<GameConfig>, LeaderboardError> {
    let document: GameConfigDocument = serde_json::from_str(json).map_err(|e| {
        LeaderboardError::invalid_config(format!("game configuration is not valid: {}", e))
    })?;

    let games = match document {
        GameConfigDocument::Wrapped { games } => games,
        GameConfigDocument::Bare(games) => games,
    };

    validate_games(&games)?;
    Ok(games)
}

pub fn load_game_configs(path: &Path) -> Result<Vec<GameConfig>> {
    let json = fs::read_to_string(path).map_err(|e| LeaderboardError::io(path, e))?;
    let games = parse_game_configs(&json)?;
    info!("Loaded {} games from {}", games.len(), path.display());
    Ok(games)
}

pub fn validate_games(games: &[GameConfig]) -> Result<(), LeaderboardError> {
    if games.is_empty() {
        return Err(LeaderboardError::invalid_config("game list is empty"));
    }

    let mut seen = HashSet::new();
    for game in games {
        if game.id.trim().is_empty() {
            return Err(LeaderboardError::invalid_config("game with empty id"));
        }
        if !seen.insert(game.id.as_str()) {
            return Err(LeaderboardError::invalid_config(format!(
                "duplicate game id {:?}",
                game.id
            )));
        }
        validate_weight(&game.id, game.weight)?;
    }

    Ok(())
}

fn validate_weight(game_id: &str, weight: f64) -> Result<(), LeaderboardError> {
    if !weight.is_finite() || weight < 0.0 {
        return Err(LeaderboardError::invalid_config(format!(
            "game {:?} has invalid weight {}",
            game_id, weight
        )));
    }
    Ok(())
}

/// Apply `<game id or code> - <weight>` lines on top of the configured weights.
pub fn apply_weight_overrides(
    games: &mut [GameConfig],
    source: &str,
    text: &str,
) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();

    for (idx, line) in text.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let (key, weight) = match parse_points_line(trimmed) {
            Ok(parsed) => parsed,
            Err(reason) => {
                diagnostics.push(Diagnostic::malformed(source, idx + 1, trimmed, &reason).emit());
                continue;
            }
        };

        match games.iter_mut().find(|g| g.answers_to(&key)) {
            Some(game) => {
                info!("Weight override: {} {} -> {}", game.id, game.weight, weight);
                game.weight = weight;
            }
            None => diagnostics.push(Diagnostic::UnknownWeightKey { key }.emit()),
        }
    }

    diagnostics
}

/// Read the optional override file. A missing file leaves weights untouched.
pub fn load_weight_overrides(games: &mut [GameConfig], path: &Path) -> Result<Vec<Diagnostic>> {
    match fs::read_to_string(path) {
        Ok(text) => Ok(apply_weight_overrides(games, &path.display().to_string(), &text)),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            info!("No weight overrides at {}, using configured weights", path.display());
            Ok(Vec::new())
        }
        Err(e) => Err(LeaderboardError::io(path, e).into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONFIG: &str = r#"{
        "games": [
            {"id": "game1", "name": "Chess", "weight": 2.0, "code": "A1"},
            {"id": "game2", "name": "Go", "weight": 1, "file": "go.txt"}
        ]
    }"#;

    #[test]
    fn test_parse_wrapped_document() {
        let games = parse_game_configs(CONFIG).unwrap();
        assert_eq!(games.len(), 2);
        assert_eq!(games[0].weight, 2.0);
        assert_eq!(games[0].file_name(), "game1_results.txt");
        assert_eq!(games[1].file_name(), "go.txt");
    }

    #[test]
    fn test_parse_bare_list() {
        let games = parse_game_configs(r#"[{"id": "g", "name": "G", "weight": 0}]"#).unwrap();
        assert_eq!(games[0].weight, 0.0);
    }

    #[test]
    fn test_rejects_invalid_configs() {
        let cases = [
            r#"{"games": []}"#,
            r#"{"games": [{"id": "g", "name": "G", "weight": -1}]}"#,
            r#"{"games": [{"id": "g", "name": "G", "weight": "heavy"}]}"#,
            r#"{"games": [
                {"id": "g", "name": "G", "weight": 1},
                {"id": "g", "name": "H", "weight": 1}
            ]}"#,
            r#"{"games": [{"id": " ", "name": "G", "weight": 1}]}"#,
            "not json",
        ];
        for case in cases {
            let err = parse_game_configs(case).unwrap_err();
            assert!(matches!(err, LeaderboardError::InvalidConfig(_)), "case {}", case);
        }
    }

    #[test]
    fn test_weight_overrides_by_id_and_code() {
        let mut games = parse_game_configs(CONFIG).unwrap();
        let diagnostics =
            apply_weight_overrides(&mut games, "weights", "A1 - 5\ngame2 - 0.5\nA9 - 3\nbroken\n");

        assert_eq!(games[0].weight, 5.0);
        assert_eq!(games[1].weight, 0.5);
        assert_eq!(diagnostics.len(), 2);
        assert!(matches!(&diagnostics[0], Diagnostic::UnknownWeightKey { key } if key == "A9"));
        assert!(matches!(&diagnostics[1], Diagnostic::MalformedLine { line_number: 4, .. }));
    }

    #[test]
    fn test_missing_override_file_is_fine() {
        let mut games = parse_game_configs(CONFIG).unwrap();
        let path = std::env::temp_dir().join("arena_leaderboard_no_such_weights.txt");
        let diagnostics = load_weight_overrides(&mut games, &path).unwrap();
        assert!(diagnostics.is_empty());
        assert_eq!(games[0].weight, 2.0);
    }
}
