use crate::config::settings::RankingSettings;

/// Rescale a cohort of raw scores onto `[scale_min, scale_max]`, anchored to
/// the cohort's own minimum and maximum.
pub fn rescale_cohort(values: &[f64], settings: &RankingSettings) -> Vec<f64> {
    if values.is_empty() {
        return Vec::new();
    }

    let (min, max) = calculate_bounds(values);
    let range = max - min;

    if range == 0.0 {
        return vec![settings.flat_cohort_value; values.len()];
    }

    values
        .iter()
        .map(|&value| transform_value(value, min, range, settings))
        .collect()
}

fn calculate_bounds(values: &[f64]) -> (f64, f64) {
    values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), &v| {
            (min.min(v), max.max(v))
        })
}

fn transform_value(value: f64, min: f64, range: f64, settings: &RankingSettings) -> f64 {
    let fraction = (value - min) / range;
    settings.scale_min + fraction * (settings.scale_max - settings.scale_min)
}
