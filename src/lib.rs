pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod errors;
pub mod normalization;
pub mod parsing;
pub mod ranking;
pub mod services;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::Shell;
use cli::Cli;

use crate::cli::{BuildArgs, Command, ManifestArgs};
use crate::config::settings::AppConfig;
use crate::services::{BuildService, ManifestService, ServerService, render_summary};

pub fn interpret() -> Command {
    let cli = Cli::parse();
    cli.command
}

pub fn handle_build(args: &BuildArgs) -> Result<()> {
    let config = build_config(AppConfig::new(), args);
    let service = BuildService::new(config);
    let report = service.run()?;
    print!("{}", render_summary(&report));
    Ok(())
}

pub fn handle_manifest(args: &ManifestArgs) -> Result<()> {
    let config = manifest_config(AppConfig::new(), args);
    let service = ManifestService::new(config);
    let manifest = service.run()?;
    println!("Indexed {} runs", manifest.runs.len());
    Ok(())
}

pub fn handle_serve(port: u16) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        let config = AppConfig::new();
        let service = ServerService::new(port, config);
        service.run().await
    })
}

pub fn handle_completions(shell: Shell) -> Result<()> {
    let mut command = Cli::command();
    let name = command.get_name().to_string();
    clap_complete::generate(shell, &mut command, name, &mut std::io::stdout());
    Ok(())
}

fn build_config(mut config: AppConfig, args: &BuildArgs) -> AppConfig {
    let paths = &mut config.paths;
    if let Some(path) = &args.config {
        paths.config_file = path.clone();
    }
    if let Some(path) = &args.rules {
        paths.rules_file = path.clone();
    }
    if let Some(path) = &args.weights {
        paths.weights_file = path.clone();
    }
    if let Some(path) = &args.data_dir {
        paths.data_dir = path.clone();
    }
    if let Some(path) = &args.output {
        paths.output_file = path.clone();
    }
    if let Some(merge) = args.merge {
        config.ranking.merge_policy = merge.into();
    }
    config
}

fn manifest_config(mut config: AppConfig, args: &ManifestArgs) -> AppConfig {
    if let Some(path) = &args.config {
        config.paths.config_file = path.clone();
    }
    if let Some(path) = &args.runs_dir {
        config.paths.runs_dir = path.clone();
    }
    if let Some(path) = &args.output {
        config.paths.manifest_file = path.clone();
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::MergeArg;
    use crate::config::MergePolicy;
    use std::path::PathBuf;

    #[test]
    fn test_cli_flags_override_settings() {
        let args = BuildArgs {
            data_dir: Some(PathBuf::from("elsewhere")),
            merge: Some(MergeArg::Best),
            ..BuildArgs::default()
        };
        let config = build_config(AppConfig::default(), &args);

        assert_eq!(config.paths.data_dir, PathBuf::from("elsewhere"));
        assert_eq!(config.paths.output_file, PathBuf::from("data/leaderboard.json"));
        assert_eq!(config.ranking.merge_policy, MergePolicy::Best);
    }

    #[test]
    fn test_manifest_flags_override_settings() {
        let args = ManifestArgs {
            runs_dir: Some(PathBuf::from("archive")),
            ..ManifestArgs::default()
        };
        let config = manifest_config(AppConfig::default(), &args);
        assert_eq!(config.paths.runs_dir, PathBuf::from("archive"));
        assert_eq!(config.paths.manifest_file, PathBuf::from("data/runs.json"));
    }
}
