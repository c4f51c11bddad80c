//! Score file parsing.
//!
//! Two line shapes are understood:
//!
//! * `<name> - <points>`, with any amount of whitespace around the hyphen;
//! * scoreboard rows `Agent | Games | Wins | Losses | Draws | Points | Score`.
//!
//! Malformed lines never abort a file; they are skipped and reported.

mod table;

use std::sync::LazyLock;

use log::debug;
use regex::Regex;

use crate::domain::{Diagnostic, RawScoreRecord};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

static POINTS_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<name>.*\S)\s*-\s*(?P<points>\d+(?:\.\d+)?)$")
        .unwrap_or_else(|e| panic!("points line pattern is invalid: {e}"))
});

/// Records recovered from one file plus everything that had to be skipped.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ParsedScores {
    pub records: Vec<RawScoreRecord>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Parse the full text of one score file. `source` labels diagnostics.
pub fn parse_scores(source: &str, text: &str) -> ParsedScores {
    parse_score_bytes(source, text.as_bytes())
}

/// Parse raw score file bytes. A leading byte order mark is ignored and a
/// line that is not valid UTF-8 is reported like any other malformed line.
pub fn parse_score_bytes(source: &str, bytes: &[u8]) -> ParsedScores {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    let mut parsed = ParsedScores::default();

    for (idx, raw) in bytes.split(|b| *b == b'\n').enumerate() {
        let line_number = idx + 1;
        let line = match std::str::from_utf8(raw) {
            Ok(line) => line,
            Err(_) => {
                let lossy = String::from_utf8_lossy(raw);
                parsed.diagnostics.push(
                    Diagnostic::malformed(source, line_number, lossy.trim(), "not valid UTF-8")
                        .emit(),
                );
                continue;
            }
        };

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let outcome = if trimmed.contains('|') {
            table::parse_row(trimmed)
        } else {
            parse_points_line(trimmed).map(|(model, points)| {
                Some(RawScoreRecord {
                    model,
                    points,
                    stats: None,
                })
            })
        };

        match outcome {
            Ok(Some(record)) => {
                debug!("{}:{}: {} -> {}", source, line_number, record.model, record.points);
                parsed.records.push(record);
            }
            Ok(None) => {}
            Err(reason) => parsed
                .diagnostics
                .push(Diagnostic::malformed(source, line_number, trimmed, &reason).emit()),
        }
    }

    parsed
}

/// Split a trimmed `<name> - <points>` line. The name is returned trimmed.
pub fn parse_points_line(line: &str) -> Result<(String, f64), String> {
    let caps = POINTS_LINE
        .captures(line.trim())
        .ok_or_else(|| "expected `<name> - <points>`".to_string())?;

    let name = caps["name"].trim();
    if name.is_empty() {
        return Err("empty name".to_string());
    }
    if name.ends_with('-') {
        return Err("name ends with the delimiter".to_string());
    }

    let points = caps["points"]
        .parse::<f64>()
        .map_err(|e| format!("invalid points: {e}"))?;
    if !points.is_finite() {
        return Err("points out of range".to_string());
    }

    Ok((name.to_string(), points))
}
