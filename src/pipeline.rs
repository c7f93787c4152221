use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::config::AppConfig;
use crate::historical::MatchResult;
use crate::scoring::{Fixture, ScoredMatch, score_fixtures};
use crate::slips::{Slip, build_slips};
use crate::team_stats::build_team_stats;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub teams_tracked: usize,
    pub total_matches: usize,
    pub value_bets_found: usize,
    pub leagues_processed: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    pub matches: Vec<ScoredMatch>,
    pub slips: Vec<Slip>,
    pub summary: RunSummary,
}

/// Aggregates history, scores the fixtures and builds one slip per configured tier.
pub fn run_pipeline(records: &[MatchResult], fixtures: &[Fixture], cfg: &AppConfig) -> RunReport {
    let stats = build_team_stats(records);
    tracing::debug!(
        results = records.len(),
        teams = stats.len(),
        "team stats aggregated"
    );

    let matches = score_fixtures(fixtures, &stats, &cfg.model);
    let slips = build_slips(&matches, &cfg.tiers);

    let summary = RunSummary {
        teams_tracked: stats.len(),
        total_matches: matches.len(),
        value_bets_found: matches.iter().map(|m| m.value_bets.len()).sum(),
        leagues_processed: matches
            .iter()
            .map(|m| m.league.as_str())
            .collect::<BTreeSet<_>>()
            .len(),
    };
    tracing::info!(
        fixtures = fixtures.len(),
        scored = summary.total_matches,
        value_bets = summary.value_bets_found,
        leagues = summary.leagues_processed,
        "run complete"
    );

    RunReport {
        matches,
        slips,
        summary,
    }
}
