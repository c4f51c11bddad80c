use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use anyhow::Result;
use log::info;
use serde::{Deserialize, Serialize};

use crate::errors::LeaderboardError;

/// A declarative name rewrite: every match of `pattern` becomes `replacement`
/// (dropped when the replacement is empty).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleSpec {
    pub pattern: String,
    #[serde(default)]
    pub replacement: String,
}

impl RuleSpec {
    pub fn drop(pattern: &str) -> Self {
        Self {
            pattern: pattern.to_string(),
            replacement: String::new(),
        }
    }

    /// Quantization and serving tags, then `:<n>` agent slot suffixes.
    pub fn defaults() -> Vec<RuleSpec> {
        vec![
            RuleSpec::drop("-fp8-speedy"),
            RuleSpec::drop("-fp8"),
            RuleSpec::drop(r":\d+$"),
        ]
    }
}

#[derive(Debug, Deserialize)]
struct RulesDocument {
    rules: Vec<RuleSpec>,
}

pub fn parse_rules(json: &str) -> Result<Vec<RuleSpec>, LeaderboardError> {
    let document: RulesDocument = serde_json::from_str(json).map_err(|e| {
        LeaderboardError::invalid_config(format!("normalization rules are not valid: {}", e))
    })?;
    Ok(document.rules)
}

/// Load rules from `path`, falling back to [`RuleSpec::defaults`] when absent.
pub fn load_rules(path: &Path) -> Result<Vec<RuleSpec>> {
    match fs::read_to_string(path) {
        Ok(json) => {
            let rules = parse_rules(&json)?;
            info!("Loaded {} normalization rules from {}", rules.len(), path.display());
            Ok(rules)
        }
        Err(e) if e.kind() == ErrorKind::NotFound => {
            info!("No rules file at {}, using built-in normalization rules", path.display());
            Ok(RuleSpec::defaults())
        }
        Err(e) => Err(LeaderboardError::io(path, e).into()),
    }
}
