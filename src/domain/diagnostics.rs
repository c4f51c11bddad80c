use std::fmt;
use std::path::PathBuf;

/// A recoverable problem met while building. The build continues past it.
#[derive(Debug, Clone, PartialEq)]
pub enum Diagnostic {
    MalformedLine {
        source: String,
        line_number: usize,
        content: String,
        reason: String,
    },
    MissingGameFile {
        game_id: String,
        path: Option<PathBuf>,
    },
    UnknownWeightKey {
        key: String,
    },
}

impl Diagnostic {
    pub fn malformed(source: &str, line_number: usize, content: &str, reason: &str) -> Self {
        Diagnostic::MalformedLine {
            source: source.to_string(),
            line_number,
            content: content.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Log at warn level and hand the value back for collection.
    pub fn emit(self) -> Self {
        log::warn!("{}", self);
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::MalformedLine {
                source,
                line_number,
                content,
                reason,
            } => write!(
                f,
                "{}:{}: skipped malformed line {:?} ({})",
                source, line_number, content, reason
            ),
            Diagnostic::MissingGameFile { game_id, path } => match path {
                Some(path) => write!(
                    f,
                    "game {}: score file {} not found, game skipped",
                    game_id,
                    path.display()
                ),
                None => write!(f, "game {}: no score input, game skipped", game_id),
            },
            Diagnostic::UnknownWeightKey { key } => {
                write!(f, "weight override for unknown game {:?} ignored", key)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_line_display() {
        let diagnostic = Diagnostic::malformed("game1", 3, "oops", "missing points");
        assert_eq!(
            diagnostic.to_string(),
            "game1:3: skipped malformed line \"oops\" (missing points)"
        );
    }

    #[test]
    fn test_missing_file_display_names_path() {
        let diagnostic = Diagnostic::MissingGameFile {
            game_id: "game2".to_string(),
            path: Some(PathBuf::from("data/game2_results.txt")),
        };
        assert!(diagnostic.to_string().contains("data/game2_results.txt"));
    }
}
