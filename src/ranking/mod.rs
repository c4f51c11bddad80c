pub mod game;
pub mod overall;
pub mod scaling;

use std::cmp::Ordering;

pub use game::rank_game;
pub use overall::aggregate_overall;
pub use scaling::rescale_cohort;

/// Leaderboard order: higher score first, then more raw points, then
/// model name ascending.
pub fn standing_order(a: (f64, f64, &str), b: (f64, f64, &str)) -> Ordering {
    b.0.total_cmp(&a.0)
        .then_with(|| b.1.total_cmp(&a.1))
        .then_with(|| a.2.cmp(b.2))
}
