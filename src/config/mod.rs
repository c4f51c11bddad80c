pub mod games;
pub mod rules;
pub mod settings;

pub use games::{GameConfig, load_game_configs, load_weight_overrides, parse_game_configs};
pub use rules::{RuleSpec, load_rules};
pub use settings::{AppConfig, MergePolicy, PathSettings, RankingSettings};
