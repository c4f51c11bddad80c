pub mod builder;
pub mod manifest;
pub mod processing;
pub mod publish;
pub mod server;

pub use builder::{BuildReport, LeaderboardBuilder, ScoreInput};
pub use manifest::{ManifestService, RunManifest};
pub use processing::{BuildService, render_summary};
pub use server::ServerService;
