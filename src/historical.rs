use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

const COL_HOME_TEAM: &str = "HomeTeam";
const COL_AWAY_TEAM: &str = "AwayTeam";
const COL_HOME_GOALS: &str = "FTHG";
const COL_AWAY_GOALS: &str = "FTAG";

/// One finished match from the historical feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    pub home_team: String,
    pub away_team: String,
    pub home_goals: u32,
    pub away_goals: u32,
}

/// Parses a football-data style results CSV.
///
/// Feeds routinely carry trailing blank lines, postponed matches without a score and the
/// odd truncated row; all of those are dropped instead of failing the whole file.
pub fn parse_results_csv(raw: &str) -> Vec<MatchResult> {
    let mut lines = raw.lines();
    let Some(header) = lines.next() else {
        return Vec::new();
    };
    let columns: Vec<&str> = header
        .trim_start_matches('\u{feff}')
        .split(',')
        .map(str::trim)
        .collect();

    let find = |name: &str| columns.iter().position(|c| *c == name);
    let (Some(home_idx), Some(away_idx), Some(hg_idx), Some(ag_idx)) = (
        find(COL_HOME_TEAM),
        find(COL_AWAY_TEAM),
        find(COL_HOME_GOALS),
        find(COL_AWAY_GOALS),
    ) else {
        tracing::warn!("results csv is missing one of HomeTeam/AwayTeam/FTHG/FTAG");
        return Vec::new();
    };

    let mut out = Vec::new();
    let mut skipped = 0usize;
    for line in lines {
        let values: Vec<&str> = line.split(',').collect();
        if values.len() < columns.len() {
            skipped += 1;
            continue;
        }
        let row = parse_row(
            values[home_idx],
            values[away_idx],
            values[hg_idx],
            values[ag_idx],
        );
        match row {
            Some(r) => out.push(r),
            None => skipped += 1,
        }
    }

    if skipped > 0 {
        tracing::debug!(skipped, kept = out.len(), "dropped malformed result rows");
    }
    out
}

/// Parses a JSON array of results. Scores may be numbers or numeric strings.
pub fn parse_results_json(raw: &str) -> Result<Vec<MatchResult>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(Vec::new());
    }
    let v: Value = serde_json::from_str(trimmed).context("invalid results json")?;
    let arr = v
        .as_array()
        .ok_or_else(|| anyhow::anyhow!("results json must be an array"))?;

    let out: Vec<MatchResult> = arr.iter().filter_map(parse_result_value).collect();
    if out.len() < arr.len() {
        tracing::debug!(
            skipped = arr.len() - out.len(),
            kept = out.len(),
            "dropped malformed result entries"
        );
    }
    Ok(out)
}

fn parse_result_value(v: &Value) -> Option<MatchResult> {
    let home = v.get("home_team")?.as_str()?;
    let away = v.get("away_team")?.as_str()?;
    let home_goals = goals_from_value(v.get("home_goals")?)?;
    let away_goals = goals_from_value(v.get("away_goals")?)?;
    let home = home.trim();
    let away = away.trim();
    if home.is_empty() || away.is_empty() {
        return None;
    }
    Some(MatchResult {
        home_team: home.to_string(),
        away_team: away.to_string(),
        home_goals,
        away_goals,
    })
}

fn goals_from_value(v: &Value) -> Option<u32> {
    match v {
        Value::Number(n) => n.as_u64().and_then(|g| u32::try_from(g).ok()),
        Value::String(s) => parse_goals(s),
        _ => None,
    }
}

fn parse_row(home: &str, away: &str, home_goals: &str, away_goals: &str) -> Option<MatchResult> {
    let home = home.trim();
    let away = away.trim();
    if home.is_empty() || away.is_empty() {
        return None;
    }
    Some(MatchResult {
        home_team: home.to_string(),
        away_team: away.to_string(),
        home_goals: parse_goals(home_goals)?,
        away_goals: parse_goals(away_goals)?,
    })
}

fn parse_goals(raw: &str) -> Option<u32> {
    raw.trim().parse::<u32>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV: &str = "Div,Date,HomeTeam,AwayTeam,FTHG,FTAG,FTR\n\
E0,16/08/2024,Man United,Fulham,1,0,H\n\
E0,17/08/2024,Ipswich,Liverpool,0,2,A\n\
E0,17/08/2024,Arsenal,Wolves,,,\n\
E0,17/08/2024,Everton,Brighton,x,3,A\n\
E0,17/08/2024,Newcastle\n\
E0,17/08/2024,,Southampton,1,0,H\n\
\n";

    #[test]
    fn csv_keeps_valid_rows_in_order() {
        let rows = parse_results_csv(CSV);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].home_team, "Man United");
        assert_eq!(rows[0].home_goals, 1);
        assert_eq!(rows[1].away_team, "Liverpool");
        assert_eq!(rows[1].away_goals, 2);
    }

    #[test]
    fn csv_without_required_columns_is_empty() {
        assert!(parse_results_csv("Div,Date,Home,Away\nE0,x,A,B\n").is_empty());
        assert!(parse_results_csv("").is_empty());
    }

    #[test]
    fn negative_scores_are_rejected() {
        let raw = "HomeTeam,AwayTeam,FTHG,FTAG\nA,B,-1,0\nA,B,2,1\n";
        let rows = parse_results_csv(raw);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].home_goals, 2);
    }

    #[test]
    fn json_accepts_numbers_and_numeric_strings() {
        let raw = r#"[
            {"home_team": "A", "away_team": "B", "home_goals": 2, "away_goals": "1"},
            {"home_team": "C", "away_team": "D", "home_goals": "two", "away_goals": 1},
            {"home_team": "E", "home_goals": 0, "away_goals": 0}
        ]"#;
        let rows = parse_results_json(raw).expect("array should parse");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].away_goals, 1);
    }

    #[test]
    fn json_null_is_empty_and_object_is_error() {
        assert!(parse_results_json("null").expect("null parses").is_empty());
        assert!(parse_results_json("{\"a\": 1}").is_err());
    }
}
