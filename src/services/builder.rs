use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;

use log::info;

use crate::config::games::validate_games;
use crate::config::{GameConfig, RankingSettings};
use crate::domain::{Diagnostic, GameId, GameResult, LeaderboardDocument};
use crate::errors::LeaderboardError;
use crate::normalization::NameNormalizer;
use crate::parsing::parse_score_bytes;
use crate::ranking::{aggregate_overall, rank_game};

/// Raw score file bytes for one game, or the place they were expected.
/// Bytes are decoded line by line so one bad line cannot sink the game.
#[derive(Debug, Clone, PartialEq)]
pub enum ScoreInput {
    Loaded { label: String, content: Vec<u8> },
    Missing { path: PathBuf },
}

impl ScoreInput {
    pub fn text(label: &str, content: &str) -> Self {
        ScoreInput::Loaded {
            label: label.to_string(),
            content: content.as_bytes().to_vec(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BuildReport {
    pub document: LeaderboardDocument,
    pub diagnostics: Vec<Diagnostic>,
    pub games_built: usize,
    pub games_skipped: usize,
}

/// Runs parse -> normalize -> rank -> aggregate over one set of inputs.
/// Holds only read-only rules and settings; every call starts from scratch.
#[derive(Debug, Clone)]
pub struct LeaderboardBuilder {
    normalizer: NameNormalizer,
    settings: RankingSettings,
}

impl LeaderboardBuilder {
    pub fn new(normalizer: NameNormalizer, settings: RankingSettings) -> Self {
        Self {
            normalizer,
            settings,
        }
    }

    pub fn build(
        &self,
        games: &[GameConfig],
        inputs: &HashMap<GameId, ScoreInput>,
    ) -> Result<BuildReport, LeaderboardError> {
        validate_games(games)?;

        let usable = games
            .iter()
            .filter(|g| matches!(inputs.get(&g.id), Some(ScoreInput::Loaded { .. })))
            .count();
        if usable == 0 {
            return Err(LeaderboardError::NoUsableInput {
                configured: games.len(),
            });
        }

        let mut diagnostics = Vec::new();
        let mut results: HashMap<GameId, Vec<GameResult>> = HashMap::new();
        let mut skipped = 0;

        for game in games {
            match inputs.get(&game.id) {
                Some(ScoreInput::Loaded { label, content }) => {
                    let standings = self.build_game(game, label, content, &mut diagnostics);
                    results.insert(game.id.clone(), standings);
                }
                missing => {
                    let path = match missing {
                        Some(ScoreInput::Missing { path }) => Some(path.clone()),
                        _ => None,
                    };
                    diagnostics.push(
                        Diagnostic::MissingGameFile {
                            game_id: game.id.clone(),
                            path,
                        }
                        .emit(),
                    );
                    skipped += 1;
                }
            }
        }

        let overall = aggregate_overall(games, &results);

        let mut by_game: BTreeMap<GameId, Vec<GameResult>> = games
            .iter()
            .map(|g| (g.id.clone(), Vec::new()))
            .collect();
        by_game.extend(results);

        Ok(BuildReport {
            document: LeaderboardDocument {
                overall,
                games: by_game,
            },
            diagnostics,
            games_built: games.len() - skipped,
            games_skipped: skipped,
        })
    }

    fn build_game(
        &self,
        game: &GameConfig,
        label: &str,
        content: &[u8],
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Vec<GameResult> {
        let parsed = parse_score_bytes(label, content);
        diagnostics.extend(parsed.diagnostics);

        let records: Vec<_> = parsed
            .records
            .into_iter()
            .map(|r| self.normalizer.normalize_record(r))
            .collect();

        let standings = rank_game(&records, &self.settings);
        info!(
            "  {} ({}): {} rows -> {} models",
            game.id,
            game.name,
            records.len(),
            standings.len()
        );
        standings
    }
}
