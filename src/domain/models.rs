use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub type ModelName = String;
pub type GameId = String;

/// Match counters carried by scoreboard table rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchStats {
    pub games: u32,
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
}

impl MatchStats {
    /// A plain `<name> - <points>` line counts as one match with no outcome.
    pub fn single_match() -> Self {
        Self {
            games: 1,
            ..Self::default()
        }
    }

    pub fn add(&mut self, other: &MatchStats) {
        self.games = self.games.saturating_add(other.games);
        self.wins = self.wins.saturating_add(other.wins);
        self.losses = self.losses.saturating_add(other.losses);
        self.draws = self.draws.saturating_add(other.draws);
    }
}

/// One parsed line of a score file, model name as written.
#[derive(Debug, Clone, PartialEq)]
pub struct RawScoreRecord {
    pub model: String,
    pub points: f64,
    pub stats: Option<MatchStats>,
}

/// A record whose model has been mapped to its canonical name.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedRecord {
    pub model: ModelName,
    pub points: f64,
    pub stats: Option<MatchStats>,
}

impl NormalizedRecord {
    pub fn match_stats(&self) -> MatchStats {
        self.stats.unwrap_or_else(MatchStats::single_match)
    }

    /// Points per match for this row.
    pub fn score(&self) -> f64 {
        per_match(self.points, self.match_stats().games)
    }
}

/// Ranked standing of one model within one game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameResult {
    pub model: ModelName,
    #[serde(rename = "games")]
    pub games_played: u32,
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
    pub points: f64,
    pub normalized: f64,
    pub score: f64,
}

/// Weighted standing of one model across every game it appeared in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverallEntry {
    pub model: ModelName,
    pub overall_score: f64,
    #[serde(rename = "games_played")]
    pub games_counted: usize,
    pub game_scores: BTreeMap<GameId, f64>,
}

/// The published artifact consumed by the rendering layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardDocument {
    pub overall: Vec<OverallEntry>,
    pub games: BTreeMap<GameId, Vec<GameResult>>,
}

impl LeaderboardDocument {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

pub fn per_match(points: f64, games: u32) -> f64 {
    if games == 0 {
        0.0
    } else {
        points / games as f64
    }
}
