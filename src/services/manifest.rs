use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use anyhow::{Context, Result};
use chrono::{DateTime, Local, NaiveDateTime};
use log::{debug, info};
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::publish::publish_atomically;
use crate::config::{self, AppConfig};
use crate::domain::GameId;
use crate::errors::LeaderboardError;

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const STAMP_FORMAT: &str = "%Y%m%d_%H%M%S";
const LATEST_RUN_NAME: &str = "Latest Results";

static RESULT_FILE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<game>.+?)_results(?:_(?P<stamp>\d{8}_\d{6}))?\.txt$")
        .unwrap_or_else(|e| panic!("result file pattern is invalid: {e}"))
});

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunEntry {
    pub name: String,
    pub date: String,
    pub files: BTreeMap<GameId, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunManifest {
    pub runs: Vec<RunEntry>,
}

struct RunCandidate {
    sort_key: NaiveDateTime,
    entry: RunEntry,
}

/// Index the result sets found in `runs_dir`, newest first.
///
/// `<game>_results.txt` files form the "latest" run, dated by the newest
/// file; `<game>_results_YYYYMMDD_HHMMSS.txt` files form one run per stamp.
pub fn scan_runs(runs_dir: &Path, game_ids: &[GameId]) -> Result<RunManifest> {
    let known: HashSet<&str> = game_ids.iter().map(String::as_str).collect();
    let entries = fs::read_dir(runs_dir).map_err(|e| LeaderboardError::io(runs_dir, e))?;

    let mut latest: BTreeMap<GameId, String> = BTreeMap::new();
    let mut latest_modified: Option<NaiveDateTime> = None;
    let mut stamped: BTreeMap<NaiveDateTime, BTreeMap<GameId, String>> = BTreeMap::new();

    for entry in entries {
        let entry = entry.map_err(|e| LeaderboardError::io(runs_dir, e))?;
        let file_name = entry.file_name().to_string_lossy().into_owned();

        let Some(caps) = RESULT_FILE.captures(&file_name) else {
            continue;
        };
        let game = caps["game"].to_string();
        if !known.contains(game.as_str()) {
            debug!("Ignoring {} (unknown game {})", file_name, game);
            continue;
        }

        match caps.name("stamp") {
            Some(stamp) => match NaiveDateTime::parse_from_str(stamp.as_str(), STAMP_FORMAT) {
                Ok(when) => {
                    stamped.entry(when).or_default().insert(game, file_name);
                }
                Err(_) => debug!("Ignoring {} (bad timestamp)", file_name),
            },
            None => {
                let modified = modified_time(&entry.path())?;
                latest_modified = latest_modified.max(Some(modified));
                latest.insert(game, file_name);
            }
        }
    }

    let mut candidates: Vec<RunCandidate> = stamped
        .into_iter()
        .map(|(when, files)| RunCandidate {
            sort_key: when,
            entry: RunEntry {
                name: format!("Run {}", when.format(DATE_FORMAT)),
                date: when.format(DATE_FORMAT).to_string(),
                files,
            },
        })
        .collect();

    if let Some(modified) = latest_modified {
        candidates.push(RunCandidate {
            sort_key: modified,
            entry: RunEntry {
                name: LATEST_RUN_NAME.to_string(),
                date: modified.format(DATE_FORMAT).to_string(),
                files: latest,
            },
        });
    }

    candidates.sort_by(|a, b| b.sort_key.cmp(&a.sort_key));
    Ok(RunManifest {
        runs: candidates.into_iter().map(|c| c.entry).collect(),
    })
}

fn modified_time(path: &Path) -> Result<NaiveDateTime> {
    let modified = fs::metadata(path)
        .and_then(|m| m.modified())
        .map_err(|e| LeaderboardError::io(path, e))?;
    Ok(DateTime::<Local>::from(modified).naive_local())
}

pub struct ManifestService {
    config: AppConfig,
}

impl ManifestService {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn run(&self) -> Result<RunManifest> {
        let paths = &self.config.paths;
        info!("Scanning {}...", paths.runs_dir.display());

        let games = config::load_game_configs(&paths.config_file)?;
        let game_ids: Vec<GameId> = games.into_iter().map(|g| g.id).collect();
        let manifest = scan_runs(&paths.runs_dir, &game_ids)?;

        for run in &manifest.runs {
            info!("  Found: {} ({}, {} games)", run.name, run.date, run.files.len());
        }

        let json = serde_json::to_string_pretty(&manifest).context("Failed to serialize manifest")?;
        publish_atomically(&paths.manifest_file, &(json + "\n"))?;
        info!("Updated {} with {} runs", paths.manifest_file.display(), manifest.runs.len());
        Ok(manifest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir()
            .join(format!("arena_leaderboard_{}_{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn ids(names: &[&str]) -> Vec<GameId> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_groups_stamped_runs_newest_first() {
        let dir = scratch_dir("manifest_stamped");
        for name in [
            "game1_results_20240101_120000.txt",
            "game2_results_20240101_120000.txt",
            "game1_results_20240305_080910.txt",
            "game9_results_20250101_000000.txt",
            "notes.md",
        ] {
            fs::write(dir.join(name), "a - 1").unwrap();
        }

        let manifest = scan_runs(&dir, &ids(&["game1", "game2"])).unwrap();

        assert_eq!(manifest.runs.len(), 2);
        assert_eq!(manifest.runs[0].date, "2024-03-05 08:09:10");
        assert_eq!(manifest.runs[0].files.len(), 1);
        assert_eq!(manifest.runs[1].name, "Run 2024-01-01 12:00:00");
        assert_eq!(manifest.runs[1].files["game2"], "game2_results_20240101_120000.txt");

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_latest_set_is_listed() {
        let dir = scratch_dir("manifest_latest");
        fs::write(dir.join("game1_results.txt"), "a - 1").unwrap();
        fs::write(dir.join("game1_results_20000101_000000.txt"), "a - 1").unwrap();

        let manifest = scan_runs(&dir, &ids(&["game1", "game2"])).unwrap();

        assert_eq!(manifest.runs[0].name, LATEST_RUN_NAME);
        assert_eq!(manifest.runs[0].files["game1"], "game1_results.txt");
        assert!(!manifest.runs[0].files.contains_key("game2"));
        assert_eq!(manifest.runs.len(), 2);

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_missing_runs_dir_is_an_error() {
        let dir = std::env::temp_dir().join("arena_leaderboard_no_such_runs_dir");
        assert!(scan_runs(&dir, &ids(&["game1"])).is_err());
    }
}
