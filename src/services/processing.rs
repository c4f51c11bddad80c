use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;

use anyhow::{Context, Result};
use colored::Colorize;
use log::info;

use super::builder::{BuildReport, LeaderboardBuilder, ScoreInput};
use super::publish::publish_atomically;
use crate::config::{self, AppConfig, GameConfig};
use crate::domain::GameId;
use crate::errors::{LeaderboardError, read_context};
use crate::normalization::NameNormalizer;

const SUMMARY_ROWS: usize = 10;

/// Reads configuration and score files, builds the leaderboard and
/// publishes it. Nothing is kept between runs.
pub struct BuildService {
    config: AppConfig,
}

impl BuildService {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn run(&self) -> Result<BuildReport> {
        info!("=== Starting Leaderboard Build ===");

        let paths = &self.config.paths;
        let mut games = config::load_game_configs(&paths.config_file)?;
        let mut diagnostics = config::load_weight_overrides(&mut games, &paths.weights_file)?;
        info!("  → {} games configured", games.len());

        let rules = config::load_rules(&paths.rules_file)?;
        let normalizer = NameNormalizer::new(&rules)?;
        info!("  → {} normalization rules", normalizer.rule_count());

        let inputs = self.read_score_inputs(&games)?;
        let builder = LeaderboardBuilder::new(normalizer, self.config.ranking.clone());
        let mut report = builder.build(&games, &inputs)?;
        info!(
            "  → Built {} games, skipped {}",
            report.games_built, report.games_skipped
        );

        let json = report
            .document
            .to_json()
            .context("Failed to serialize leaderboard document")?;
        publish_atomically(&paths.output_file, &(json + "\n"))?;

        diagnostics.append(&mut report.diagnostics);
        report.diagnostics = diagnostics;

        info!("=== Build Complete ===");
        Ok(report)
    }

    fn read_score_inputs(&self, games: &[GameConfig]) -> Result<HashMap<GameId, ScoreInput>> {
        let mut inputs = HashMap::new();

        for game in games {
            let path = self.config.paths.data_dir.join(game.file_name());
            let input = match fs::read(&path) {
                Ok(content) => ScoreInput::Loaded {
                    label: path.display().to_string(),
                    content,
                },
                Err(e) if e.kind() == ErrorKind::NotFound => ScoreInput::Missing { path },
                Err(e) => {
                    return Err(anyhow::Error::new(LeaderboardError::io(&path, e))
                        .context(read_context(&path)));
                }
            };
            inputs.insert(game.id.clone(), input);
        }

        Ok(inputs)
    }
}

/// Human readable summary of a finished build.
pub fn render_summary(report: &BuildReport) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n", "Overall ranking".bold()));
    out.push_str(&format!("{:>4}  {:<40} {:>8}  {:>5}\n", "#", "Model", "Score", "Games"));

    for (idx, entry) in report.document.overall.iter().take(SUMMARY_ROWS).enumerate() {
        let line = format!(
            "{:>4}  {:<40} {:>8.2}  {:>5}",
            idx + 1,
            entry.model,
            entry.overall_score,
            entry.games_counted
        );
        if idx == 0 {
            out.push_str(&format!("{}\n", line.green()));
        } else {
            out.push_str(&format!("{}\n", line));
        }
    }

    let remaining = report.document.overall.len().saturating_sub(SUMMARY_ROWS);
    if remaining > 0 {
        out.push_str(&format!("      … and {} more\n", remaining));
    }

    out.push_str(&format!(
        "\n{} games built, {} skipped\n",
        report.games_built, report.games_skipped
    ));
    if !report.diagnostics.is_empty() {
        out.push_str(&format!(
            "{}\n",
            format!("{} warnings:", report.diagnostics.len()).yellow()
        ));
        for diagnostic in &report.diagnostics {
            out.push_str(&format!("  - {}\n", diagnostic));
        }
    }
    out
}
