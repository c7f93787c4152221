use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDateTime;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::ModelConfig;
use crate::leagues::league_name;
use crate::markets::Market;
use crate::odds::{Odds, synthesize_odds};
use crate::prediction::{Prediction, predict};
use crate::team_stats::TeamStats;
use crate::value_bets::{ValueBet, find_value_bets};

const CONFIDENCE_BASE: u32 = 50;
const CONFIDENCE_HISTORY_CAP: u32 = 30;
const CONFIDENCE_VALUE_CAP: u32 = 20;
const CONFIDENCE_MAX: u32 = 95;

/// An upcoming fixture supplied by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fixture {
    pub id: String,
    pub league: String,
    pub home_team: String,
    pub away_team: String,
    #[serde(default)]
    pub kickoff: Option<NaiveDateTime>,
    /// Bookmaker quotes, when the caller has them.
    #[serde(default)]
    pub offered_odds: BTreeMap<Market, f64>,
}

/// A fixture with its prediction, prices and value bets. The unit the slip builder consumes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredMatch {
    pub id: String,
    pub league: String,
    pub league_name: String,
    pub home_team: String,
    pub away_team: String,
    pub kickoff: Option<NaiveDateTime>,
    pub prediction: Prediction,
    pub odds: Odds,
    /// Best edge first.
    pub value_bets: Vec<ValueBet>,
    pub confidence: u32,
}

impl ScoredMatch {
    pub fn label(&self) -> String {
        format!("{} vs {}", self.home_team, self.away_team)
    }

    pub fn involves(&self, team: &str) -> bool {
        self.home_team == team || self.away_team == team
    }
}

/// Grows with the home side's recorded history and with the number of value bets found.
pub fn confidence(home: &TeamStats, value_bets: usize) -> u32 {
    let history = home.played.saturating_mul(2).min(CONFIDENCE_HISTORY_CAP);
    let value = u32::try_from(value_bets)
        .unwrap_or(u32::MAX)
        .saturating_mul(5)
        .min(CONFIDENCE_VALUE_CAP);
    (CONFIDENCE_BASE + history + value).min(CONFIDENCE_MAX)
}

pub fn score_fixture(
    fixture: &Fixture,
    stats: &HashMap<String, TeamStats>,
    cfg: &ModelConfig,
) -> Option<ScoredMatch> {
    let (Some(home), Some(away)) = (
        stats.get(fixture.home_team.trim()),
        stats.get(fixture.away_team.trim()),
    ) else {
        tracing::warn!(
            fixture = %fixture.id,
            home = %fixture.home_team,
            away = %fixture.away_team,
            "no history for one of the teams, skipping fixture"
        );
        return None;
    };

    let prediction = predict(home, away, cfg);
    let odds = synthesize_odds(&prediction, cfg).with_offered(&fixture.offered_odds);
    let value_bets = find_value_bets(&prediction, &odds, cfg.min_value_edge);
    let confidence = confidence(home, value_bets.len());

    if !value_bets.is_empty() {
        tracing::debug!(
            fixture = %fixture.id,
            count = value_bets.len(),
            best = %value_bets[0].market,
            "value bets found"
        );
    }

    Some(ScoredMatch {
        id: fixture.id.clone(),
        league: fixture.league.clone(),
        league_name: league_name(&fixture.league).to_string(),
        home_team: home.name.clone(),
        away_team: away.name.clone(),
        kickoff: fixture.kickoff,
        prediction,
        odds,
        value_bets,
        confidence,
    })
}

/// Scores every fixture in parallel; output keeps input order and drops unknown teams.
pub fn score_fixtures(
    fixtures: &[Fixture],
    stats: &HashMap<String, TeamStats>,
    cfg: &ModelConfig,
) -> Vec<ScoredMatch> {
    fixtures
        .par_iter()
        .map(|f| score_fixture(f, stats, cfg))
        .collect::<Vec<_>>()
        .into_iter()
        .flatten()
        .collect()
}
