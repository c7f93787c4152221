use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::historical::MatchResult;

/// Number of recent results kept for the form index.
pub const FORM_WINDOW: usize = 5;

// Most recent first.
const FORM_WEIGHTS: [f64; FORM_WINDOW] = [1.5, 1.3, 1.1, 0.9, 0.7];

const FORM_INDEX_MIN: f64 = 0.7;
const FORM_INDEX_SPAN: f64 = 0.6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FormResult {
    #[serde(rename = "W")]
    Win,
    #[serde(rename = "D")]
    Draw,
    #[serde(rename = "L")]
    Loss,
}

impl FormResult {
    pub fn from_score(goals_for: u32, goals_against: u32) -> Self {
        if goals_for > goals_against {
            FormResult::Win
        } else if goals_for < goals_against {
            FormResult::Loss
        } else {
            FormResult::Draw
        }
    }

    pub fn points(self) -> f64 {
        match self {
            FormResult::Win => 3.0,
            FormResult::Draw => 1.0,
            FormResult::Loss => 0.0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TeamStats {
    pub name: String,
    #[serde(default)]
    pub played: u32,
    #[serde(default)]
    pub home_played: u32,
    #[serde(default)]
    pub away_played: u32,
    #[serde(default)]
    pub wins: u32,
    #[serde(default)]
    pub draws: u32,
    #[serde(default)]
    pub losses: u32,
    #[serde(default)]
    pub goals_for: u32,
    #[serde(default)]
    pub goals_against: u32,
    #[serde(default)]
    pub home_goals_for: u32,
    #[serde(default)]
    pub home_goals_against: u32,
    #[serde(default)]
    pub away_goals_for: u32,
    #[serde(default)]
    pub away_goals_against: u32,
    /// Last results, most recent first.
    #[serde(default)]
    pub form: Vec<FormResult>,
}

impl TeamStats {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn avg_goals_home(&self) -> f64 {
        per_match(self.home_goals_for, self.home_played)
    }

    pub fn avg_goals_away(&self) -> f64 {
        per_match(self.away_goals_for, self.away_played)
    }

    pub fn avg_conceded_home(&self) -> f64 {
        per_match(self.home_goals_against, self.home_played)
    }

    pub fn avg_conceded_away(&self) -> f64 {
        per_match(self.away_goals_against, self.away_played)
    }

    /// Recency-weighted form in `[0.7, 1.3]`; 1.0 when no results are known.
    pub fn form_index(&self) -> f64 {
        if self.form.is_empty() {
            return 1.0;
        }

        let mut weighted_points = 0.0;
        let mut max_points = 0.0;
        for (result, weight) in self.form.iter().zip(FORM_WEIGHTS) {
            weighted_points += result.points() * weight;
            max_points += FormResult::Win.points() * weight;
        }

        FORM_INDEX_MIN + (weighted_points / max_points.max(1.0)) * FORM_INDEX_SPAN
    }

    fn record(&mut self, goals_for: u32, goals_against: u32, at_home: bool) {
        self.played += 1;
        self.goals_for += goals_for;
        self.goals_against += goals_against;
        if at_home {
            self.home_played += 1;
            self.home_goals_for += goals_for;
            self.home_goals_against += goals_against;
        } else {
            self.away_played += 1;
            self.away_goals_for += goals_for;
            self.away_goals_against += goals_against;
        }

        let result = FormResult::from_score(goals_for, goals_against);
        match result {
            FormResult::Win => self.wins += 1,
            FormResult::Draw => self.draws += 1,
            FormResult::Loss => self.losses += 1,
        }
        self.form.insert(0, result);
        self.form.truncate(FORM_WINDOW);
    }
}

fn per_match(goals: u32, played: u32) -> f64 {
    goals as f64 / played.max(1) as f64
}

/// Folds chronologically ordered results into per-team aggregates.
///
/// Order matters: the last record seen for a team becomes the head of its form. Records
/// with a blank team name are skipped.
pub fn build_team_stats<'a, I>(records: I) -> HashMap<String, TeamStats>
where
    I: IntoIterator<Item = &'a MatchResult>,
{
    records
        .into_iter()
        .fold(HashMap::new(), |mut teams: HashMap<String, TeamStats>, r| {
            let home = r.home_team.trim();
            let away = r.away_team.trim();
            if home.is_empty() || away.is_empty() {
                tracing::debug!(?r, "skipping result without both team names");
                return teams;
            }

            teams
                .entry(home.to_string())
                .or_insert_with(|| TeamStats::new(home))
                .record(r.home_goals, r.away_goals, true);
            teams
                .entry(away.to_string())
                .or_insert_with(|| TeamStats::new(away))
                .record(r.away_goals, r.home_goals, false);
            teams
        })
}
