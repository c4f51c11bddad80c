use crate::domain::{MatchStats, RawScoreRecord};

const COLUMNS: usize = 7;

/// Parse one pipe-separated scoreboard row.
///
/// `Ok(None)` marks rows that carry no data (header, markdown rule).
pub(super) fn parse_row(line: &str) -> Result<Option<RawScoreRecord>, String> {
    if is_rule(line) {
        return Ok(None);
    }

    let mut cells: Vec<&str> = line.split('|').map(str::trim).collect();
    // `| a | b |` style rows carry empty outer cells
    if cells.first() == Some(&"") {
        cells.remove(0);
    }
    if cells.last() == Some(&"") {
        cells.pop();
    }

    if cells.len() != COLUMNS {
        return Err(format!("expected {} columns, found {}", COLUMNS, cells.len()));
    }
    if cells[0].eq_ignore_ascii_case("agent") {
        return Ok(None);
    }
    if cells[0].is_empty() {
        return Err("empty agent name".to_string());
    }

    let stats = MatchStats {
        games: parse_count(cells[1], "games")?,
        wins: parse_count(cells[2], "wins")?,
        losses: parse_count(cells[3], "losses")?,
        draws: parse_count(cells[4], "draws")?,
    };
    let points = parse_number(cells[5], "points")?;
    // the file's own score column is validated but recomputed downstream
    parse_number(cells[6], "score")?;

    Ok(Some(RawScoreRecord {
        model: cells[0].to_string(),
        points,
        stats: Some(stats),
    }))
}

fn is_rule(line: &str) -> bool {
    line.chars().all(|c| matches!(c, '|' | '-' | ':' | '+' | ' ' | '\t'))
}

fn parse_count(cell: &str, column: &str) -> Result<u32, String> {
    cell.parse::<u32>()
        .map_err(|_| format!("{} is not a count: {:?}", column, cell))
}

fn parse_number(cell: &str, column: &str) -> Result<f64, String> {
    match cell.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(format!("{} is not a number: {:?}", column, cell)),
    }
}
