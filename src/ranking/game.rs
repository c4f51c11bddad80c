use std::collections::BTreeMap;

use log::debug;

use super::scaling::rescale_cohort;
use super::standing_order;
use crate::config::settings::{MergePolicy, RankingSettings};
use crate::domain::{GameResult, MatchStats, ModelName, NormalizedRecord, per_match};

#[derive(Debug, Clone, Copy, Default)]
struct ModelTotals {
    points: f64,
    stats: MatchStats,
}

/// Collapse every record of one game into a ranked standing per model.
pub fn rank_game(records: &[NormalizedRecord], settings: &RankingSettings) -> Vec<GameResult> {
    let totals = match settings.merge_policy {
        MergePolicy::Sum => sum_by_model(records),
        MergePolicy::Best => best_by_model(records),
    };
    debug!("{} records merged into {} models", records.len(), totals.len());

    let raw_points: Vec<f64> = totals.values().map(|t| t.points).collect();
    let normalized = rescale_cohort(&raw_points, settings);

    let mut results: Vec<GameResult> = totals
        .into_iter()
        .zip(normalized)
        .map(|((model, totals), normalized)| build_result(model, totals, normalized))
        .collect();

    results.sort_by(|a, b| {
        standing_order(
            (a.normalized, a.points, a.model.as_str()),
            (b.normalized, b.points, b.model.as_str()),
        )
    });
    results
}

fn sum_by_model(records: &[NormalizedRecord]) -> BTreeMap<ModelName, ModelTotals> {
    let mut totals: BTreeMap<ModelName, ModelTotals> = BTreeMap::new();
    for record in records {
        let entry = totals.entry(record.model.clone()).or_default();
        entry.points += record.points;
        entry.stats.add(&record.match_stats());
    }
    totals
}

fn best_by_model(records: &[NormalizedRecord]) -> BTreeMap<ModelName, ModelTotals> {
    let mut best: BTreeMap<ModelName, &NormalizedRecord> = BTreeMap::new();
    for record in records {
        // ties keep the first row seen
        let replace = best
            .get(&record.model)
            .is_none_or(|current| record.score() > current.score());
        if replace {
            best.insert(record.model.clone(), record);
        }
    }

    best.into_iter()
        .map(|(model, record)| {
            let totals = ModelTotals {
                points: record.points,
                stats: record.match_stats(),
            };
            (model, totals)
        })
        .collect()
}

fn build_result(model: ModelName, totals: ModelTotals, normalized: f64) -> GameResult {
    GameResult {
        model,
        games_played: totals.stats.games,
        wins: totals.stats.wins,
        losses: totals.stats.losses,
        draws: totals.stats.draws,
        points: totals.points,
        normalized,
        score: per_match(totals.points, totals.stats.games),
    }
}
