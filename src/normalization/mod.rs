use log::{debug, warn};
use regex::Regex;

use crate::config::rules::RuleSpec;
use crate::domain::{NormalizedRecord, RawScoreRecord};
use crate::errors::LeaderboardError;

const MAX_PASSES: usize = 16;

#[derive(Debug, Clone)]
struct NormalizationRule {
    pattern: Regex,
    replacement: String,
}

/// Maps variant model identifiers (quantization tags, agent slots) onto
/// one canonical name. Rules run in order, repeatedly, until the name
/// stops changing.
#[derive(Debug, Clone)]
pub struct NameNormalizer {
    rules: Vec<NormalizationRule>,
}

impl NameNormalizer {
    pub fn new(specs: &[RuleSpec]) -> Result<Self, LeaderboardError> {
        let rules = specs
            .iter()
            .map(|spec| {
                let pattern = Regex::new(&spec.pattern).map_err(|e| {
                    LeaderboardError::invalid_config(format!(
                        "normalization pattern {:?}: {}",
                        spec.pattern, e
                    ))
                })?;
                Ok(NormalizationRule {
                    pattern,
                    replacement: spec.replacement.clone(),
                })
            })
            .collect::<Result<Vec<_>, LeaderboardError>>()?;

        Ok(Self { rules })
    }

    pub fn with_defaults() -> Result<Self, LeaderboardError> {
        Self::new(&RuleSpec::defaults())
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    pub fn normalize(&self, raw: &str) -> String {
        let original = raw.trim();
        let mut name = original.to_string();

        for _ in 0..MAX_PASSES {
            let next = self.apply_once(&name);
            if next == name {
                return finish(original, name);
            }
            name = next;
        }

        warn!("normalization of {:?} did not settle after {} passes", raw, MAX_PASSES);
        finish(original, name)
    }

    pub fn normalize_record(&self, record: RawScoreRecord) -> NormalizedRecord {
        let model = self.normalize(&record.model);
        if model != record.model {
            debug!("normalized {:?} -> {:?}", record.model, model);
        }
        NormalizedRecord {
            model,
            points: record.points,
            stats: record.stats,
        }
    }

    fn apply_once(&self, name: &str) -> String {
        let mut current = name.to_string();
        for rule in &self.rules {
            current = rule
                .pattern
                .replace_all(&current, rule.replacement.as_str())
                .into_owned();
        }
        current.trim().to_string()
    }
}

// A name consisting only of variant tags keeps its raw form.
fn finish(original: &str, normalized: String) -> String {
    if normalized.is_empty() {
        original.to_string()
    } else {
        normalized
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defaults() -> NameNormalizer {
        NameNormalizer::with_defaults().unwrap()
    }

    #[test]
    fn test_strips_known_variant_tags() {
        let normalizer = defaults();
        assert_eq!(normalizer.normalize("GPT-X-fp8"), "GPT-X");
        assert_eq!(normalizer.normalize("GPT-X-fp8-speedy"), "GPT-X");
        assert_eq!(normalizer.normalize("qwen3-32b-fp8:2"), "qwen3-32b");
        assert_eq!(normalizer.normalize("llama:1"), "llama");
        assert_eq!(normalizer.normalize("Claude-Y"), "Claude-Y");
    }

    #[test]
    fn test_idempotent_on_assorted_inputs() {
        let normalizer = defaults();
        let inputs = [
            "", "   ", ":1", "-fp8", "a:1:2", "x-fp8-fp8:3", "model-fp8-speedy:12",
            "weird  name :7 ", "ünïcode-fp8", "-fp8-speedy-fp8",
        ];
        for input in inputs {
            let once = normalizer.normalize(input);
            assert_eq!(normalizer.normalize(&once), once, "input {:?}", input);
        }
    }

    #[test]
    fn test_tag_only_name_keeps_raw_form() {
        assert_eq!(defaults().normalize("-fp8"), "-fp8");
        assert_eq!(defaults().normalize(""), "");
    }

    #[test]
    fn test_custom_rules_extend_defaults() {
        let mut specs = RuleSpec::defaults();
        specs.push(RuleSpec {
            pattern: "-awq$".to_string(),
            replacement: String::new(),
        });
        specs.push(RuleSpec {
            pattern: "^openai/".to_string(),
            replacement: String::new(),
        });
        let normalizer = NameNormalizer::new(&specs).unwrap();

        assert_eq!(normalizer.normalize("openai/gpt-9-awq:1"), "gpt-9");
    }

    #[test]
    fn test_replacement_rules() {
        let specs = vec![RuleSpec {
            pattern: "(?i)^claude".to_string(),
            replacement: "Claude".to_string(),
        }];
        let normalizer = NameNormalizer::new(&specs).unwrap();
        assert_eq!(normalizer.normalize("CLAUDE-y"), "Claude-y");
        assert_eq!(normalizer.normalize("Claude-y"), "Claude-y");
    }

    #[test]
    fn test_invalid_pattern_is_config_error() {
        let specs = vec![RuleSpec {
            pattern: "(unclosed".to_string(),
            replacement: String::new(),
        }];
        let err = NameNormalizer::new(&specs).unwrap_err();
        assert!(matches!(err, LeaderboardError::InvalidConfig(_)));
    }
}
