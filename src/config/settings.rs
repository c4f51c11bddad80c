use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// How repeated rows of one canonical model inside a single game are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MergePolicy {
    /// Every row counts: points, games, wins, losses and draws are summed.
    #[default]
    Sum,
    /// Only the row with the highest per-match score represents the model.
    Best,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RankingSettings {
    pub scale_min: f64,
    pub scale_max: f64,
    /// Normalized value given to every model when a cohort has no spread.
    pub flat_cohort_value: f64,
    pub merge_policy: MergePolicy,
}

impl Default for RankingSettings {
    fn default() -> Self {
        Self {
            scale_min: 0.0,
            scale_max: 100.0,
            flat_cohort_value: 50.0,
            merge_policy: MergePolicy::Sum,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PathSettings {
    pub config_file: PathBuf,
    pub rules_file: PathBuf,
    pub weights_file: PathBuf,
    pub data_dir: PathBuf,
    pub output_file: PathBuf,
    pub runs_dir: PathBuf,
    pub manifest_file: PathBuf,
}

impl Default for PathSettings {
    fn default() -> Self {
        Self {
            config_file: PathBuf::from("config/games.json"),
            rules_file: PathBuf::from("config/normalization.json"),
            weights_file: PathBuf::from("config/game_weights.txt"),
            data_dir: PathBuf::from("data/leaderboards"),
            output_file: PathBuf::from("data/leaderboard.json"),
            runs_dir: PathBuf::from("data/runs"),
            manifest_file: PathBuf::from("data/runs.json"),
        }
    }
}

impl PathSettings {
    /// Defaults, overridden by `LEADERBOARD_*` environment variables.
    pub fn from_env() -> Self {
        let mut paths = Self::default();
        override_from_env(&mut paths.config_file, "LEADERBOARD_CONFIG");
        override_from_env(&mut paths.rules_file, "LEADERBOARD_RULES");
        override_from_env(&mut paths.weights_file, "LEADERBOARD_WEIGHTS");
        override_from_env(&mut paths.data_dir, "LEADERBOARD_DATA_DIR");
        override_from_env(&mut paths.output_file, "LEADERBOARD_OUTPUT");
        override_from_env(&mut paths.runs_dir, "LEADERBOARD_RUNS_DIR");
        override_from_env(&mut paths.manifest_file, "LEADERBOARD_MANIFEST");
        paths
    }
}

fn override_from_env(target: &mut PathBuf, key: &str) {
    if let Ok(value) = std::env::var(key) {
        if !value.is_empty() {
            *target = PathBuf::from(value);
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub paths: PathSettings,
    pub ranking: RankingSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            paths: PathSettings::default(),
            ranking: RankingSettings::default(),
        }
    }
}

impl AppConfig {
    pub fn new() -> Self {
        Self {
            paths: PathSettings::from_env(),
            ranking: RankingSettings::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_ranking_scale() {
        let settings = RankingSettings::default();
        assert_eq!(settings.scale_min, 0.0);
        assert_eq!(settings.scale_max, 100.0);
        assert_eq!(settings.flat_cohort_value, 50.0);
        assert_eq!(settings.merge_policy, MergePolicy::Sum);
    }

    #[test]
    fn test_merge_policy_deserializes_lowercase() {
        let policy: MergePolicy = serde_json::from_str("\"best\"").unwrap();
        assert_eq!(policy, MergePolicy::Best);
    }
}
