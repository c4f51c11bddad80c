use std::collections::{BTreeMap, HashMap};

use log::{debug, info};

use super::standing_order;
use crate::config::GameConfig;
use crate::domain::{GameId, GameResult, ModelName, OverallEntry};

#[derive(Debug, Default)]
struct WeightedTotals {
    weighted_sum: f64,
    total_weight: f64,
    raw_points: f64,
    game_scores: BTreeMap<GameId, f64>,
}

/// Weighted mean of each model's normalized scores over the games it played.
///
/// Games a model is absent from add nothing to either sum. A model whose
/// games all carry weight 0 has no defined mean and is left out.
pub fn aggregate_overall(
    configs: &[GameConfig],
    results: &HashMap<GameId, Vec<GameResult>>,
) -> Vec<OverallEntry> {
    let mut totals: BTreeMap<ModelName, WeightedTotals> = BTreeMap::new();

    for game in configs {
        let Some(standings) = results.get(&game.id) else {
            continue;
        };

        for standing in standings {
            let entry = totals.entry(standing.model.clone()).or_default();
            entry.weighted_sum += standing.normalized * game.weight;
            entry.total_weight += game.weight;
            entry.raw_points += standing.points;
            entry.game_scores.insert(game.id.clone(), standing.normalized);
        }
    }

    let mut overall: Vec<(OverallEntry, f64)> = totals
        .into_iter()
        .filter_map(|(model, totals)| build_entry(model, totals))
        .collect();

    overall.sort_by(|(a, a_points), (b, b_points)| {
        standing_order(
            (a.overall_score, *a_points, a.model.as_str()),
            (b.overall_score, *b_points, b.model.as_str()),
        )
    });

    info!("Overall ranking covers {} models", overall.len());
    overall.into_iter().map(|(entry, _)| entry).collect()
}

fn build_entry(model: ModelName, totals: WeightedTotals) -> Option<(OverallEntry, f64)> {
    if totals.total_weight <= 0.0 {
        debug!("{} only appears in zero-weight games, left out of overall", model);
        return None;
    }

    let entry = OverallEntry {
        overall_score: totals.weighted_sum / totals.total_weight,
        games_counted: totals.game_scores.len(),
        game_scores: totals.game_scores,
        model,
    };
    Some((entry, totals.raw_points))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn standing(model: &str, normalized: f64, points: f64) -> GameResult {
        GameResult {
            model: model.to_string(),
            games_played: 1,
            wins: 0,
            losses: 0,
            draws: 0,
            points,
            normalized,
            score: points,
        }
    }

    fn results(entries: Vec<(&str, Vec<GameResult>)>) -> HashMap<GameId, Vec<GameResult>> {
        entries
            .into_iter()
            .map(|(id, standings)| (id.to_string(), standings))
            .collect()
    }

    #[test]
    fn test_weighted_mean_across_games() {
        let configs = vec![GameConfig::new("g1", "One", 2.0), GameConfig::new("g2", "Two", 1.0)];
        let results = results(vec![
            ("g1", vec![standing("m", 80.0, 8.0)]),
            ("g2", vec![standing("m", 50.0, 5.0)]),
        ]);

        let overall = aggregate_overall(&configs, &results);
        assert_eq!(overall.len(), 1);
        assert!((overall[0].overall_score - 70.0).abs() < 1e-9);
        assert_eq!(overall[0].games_counted, 2);
        assert_eq!(overall[0].game_scores["g1"], 80.0);
    }

    #[test]
    fn test_absent_game_excluded_from_both_sums() {
        let configs = vec![
            GameConfig::new("g1", "One", 1.0),
            GameConfig::new("g2", "Two", 3.0),
            GameConfig::new("g3", "Three", 2.0),
        ];
        let results = results(vec![
            ("g1", vec![standing("full", 100.0, 3.0), standing("partial", 40.0, 1.0)]),
            ("g2", vec![standing("full", 20.0, 1.0)]),
            ("g3", vec![standing("full", 50.0, 2.0), standing("partial", 70.0, 3.0)]),
        ]);

        let overall = aggregate_overall(&configs, &results);
        let full = overall.iter().find(|e| e.model == "full").unwrap();
        let partial = overall.iter().find(|e| e.model == "partial").unwrap();

        assert!((full.overall_score - (100.0 + 60.0 + 100.0) / 6.0).abs() < 1e-9);
        assert!((partial.overall_score - (40.0 + 140.0) / 3.0).abs() < 1e-9);
        assert_eq!(partial.games_counted, 2);
    }

    #[test]
    fn test_zero_weight_game_contributes_nothing() {
        let configs = vec![GameConfig::new("g1", "One", 1.0), GameConfig::new("g2", "Two", 0.0)];
        let results = results(vec![
            ("g1", vec![standing("a", 60.0, 6.0)]),
            ("g2", vec![standing("a", 0.0, 0.0), standing("only_g2", 100.0, 9.0)]),
        ]);

        let overall = aggregate_overall(&configs, &results);
        assert_eq!(overall.len(), 1);
        assert_eq!(overall[0].model, "a");
        assert_eq!(overall[0].overall_score, 60.0);
        assert_eq!(overall[0].games_counted, 2);
    }

    #[test]
    fn test_sorted_descending_with_tie_breaks() {
        let configs = vec![GameConfig::new("g1", "One", 1.0)];
        let results = results(vec![(
            "g1",
            vec![
                standing("b", 50.0, 5.0),
                standing("a", 50.0, 5.0),
                standing("c", 50.0, 7.0),
                standing("top", 90.0, 1.0),
            ],
        )]);

        let overall = aggregate_overall(&configs, &results);
        let names: Vec<&str> = overall.iter().map(|e| e.model.as_str()).collect();
        assert_eq!(names, vec!["top", "c", "a", "b"]);
    }

    #[test]
    fn test_games_missing_from_results_are_ignored() {
        let configs = vec![GameConfig::new("g1", "One", 1.0), GameConfig::new("g2", "Two", 5.0)];
        let results = results(vec![("g1", vec![standing("a", 30.0, 1.0)])]);

        let overall = aggregate_overall(&configs, &results);
        assert_eq!(overall[0].overall_score, 30.0);
    }
}
