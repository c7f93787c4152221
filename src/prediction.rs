use serde::{Deserialize, Serialize};

use crate::config::ModelConfig;
use crate::markets::Market;
use crate::team_stats::TeamStats;

/// Goals per side covered by the score grid (0..=MAX_GOALS).
pub const MAX_GOALS: usize = 6;
// Likely-score search is limited to 0..=4 per side.
const LIKELY_SCORE_MAX: usize = 4;

const HOME_XG_MIN: f64 = 0.5;
const HOME_XG_MAX: f64 = 4.0;
const AWAY_XG_MIN: f64 = 0.3;
const AWAY_XG_MAX: f64 = 3.5;

/// Outcome and goal-market probabilities for one fixture, in whole percent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub home_win: u32,
    pub draw: u32,
    pub away_win: u32,
    pub over_05: u32,
    pub over_15: u32,
    pub over_25: u32,
    pub btts: u32,
    pub likely_score: (u32, u32),
    pub home_xg: f64,
    pub away_xg: f64,
}

/// Joint probability of every scoreline up to `MAX_GOALS` goals per side.
#[derive(Debug, Clone)]
pub struct ScoreGrid {
    cells: [[f64; MAX_GOALS + 1]; MAX_GOALS + 1],
}

impl ScoreGrid {
    /// Treats home and away goals as independent Poisson counts.
    pub fn from_rates(lambda_home: f64, lambda_away: f64) -> Self {
        let pmf_h = poisson_pmf(lambda_home);
        let pmf_a = poisson_pmf(lambda_away);
        let mut cells = [[0.0; MAX_GOALS + 1]; MAX_GOALS + 1];
        for (h, p_h) in pmf_h.iter().enumerate() {
            for (a, p_a) in pmf_a.iter().enumerate() {
                cells[h][a] = p_h * p_a;
            }
        }
        Self { cells }
    }

    pub fn cell(&self, home_goals: usize, away_goals: usize) -> f64 {
        self.cells
            .get(home_goals)
            .and_then(|row| row.get(away_goals))
            .copied()
            .unwrap_or(0.0)
    }

    fn sum_where(&self, keep: impl Fn(usize, usize) -> bool) -> f64 {
        let mut total = 0.0;
        for (h, row) in self.cells.iter().enumerate() {
            for (a, p) in row.iter().enumerate() {
                if keep(h, a) {
                    total += p;
                }
            }
        }
        total
    }

    /// Home/draw/away renormalised over the grid so the three sum to one.
    pub fn outcome_probs(&self) -> (f64, f64, f64) {
        let p_home = self.sum_where(|h, a| h > a);
        let p_draw = self.sum_where(|h, a| h == a);
        let p_away = self.sum_where(|h, a| h < a);

        let sum = p_home + p_draw + p_away;
        if sum > 0.0 {
            (p_home / sum, p_draw / sum, p_away / sum)
        } else {
            (1.0 / 3.0, 1.0 / 3.0, 1.0 / 3.0)
        }
    }

    /// Probability of strictly more than `line` total goals.
    pub fn over(&self, line: f64) -> f64 {
        self.sum_where(|h, a| (h + a) as f64 > line)
    }

    pub fn both_teams_score(&self) -> f64 {
        self.sum_where(|h, a| h > 0 && a > 0)
    }

    /// Most probable scoreline with at most four goals per side; (1, 1) on an all-zero grid.
    pub fn likely_score(&self) -> (u32, u32) {
        let mut best = 0.0;
        let mut score = (1, 1);
        for h in 0..=LIKELY_SCORE_MAX {
            for a in 0..=LIKELY_SCORE_MAX {
                if self.cells[h][a] > best {
                    best = self.cells[h][a];
                    score = (h as u32, a as u32);
                }
            }
        }
        score
    }
}

impl Prediction {
    pub fn from_rates(lambda_home: f64, lambda_away: f64) -> Self {
        let grid = ScoreGrid::from_rates(lambda_home, lambda_away);
        let (p_home, p_draw, p_away) = grid.outcome_probs();

        Self {
            home_win: percent(p_home),
            draw: percent(p_draw),
            away_win: percent(p_away),
            over_05: percent(grid.over(0.5)),
            over_15: percent(grid.over(1.5)),
            over_25: percent(grid.over(2.5)),
            btts: percent(grid.both_teams_score()),
            likely_score: grid.likely_score(),
            home_xg: lambda_home,
            away_xg: lambda_away,
        }
    }

    /// Model probability of `market`, in whole percent.
    pub fn market_probability(&self, market: Market) -> u32 {
        match market {
            Market::Home => self.home_win,
            Market::Draw => self.draw,
            Market::Away => self.away_win,
            Market::Over15 => self.over_15,
            Market::Under15 => 100u32.saturating_sub(self.over_15),
            Market::Over25 => self.over_25,
            Market::Under25 => 100u32.saturating_sub(self.over_25),
            Market::BttsYes => self.btts,
            Market::BttsNo => 100u32.saturating_sub(self.btts),
            Market::HomeOrDraw => self.home_win + self.draw,
            Market::HomeOrAway => self.home_win + self.away_win,
            Market::DrawOrAway => self.draw + self.away_win,
        }
    }
}

/// Expected goals for both sides, clamped to plausible ranges.
pub fn expected_goals(home: &TeamStats, away: &TeamStats, cfg: &ModelConfig) -> (f64, f64) {
    let home_attack = home.avg_goals_home() * home.form_index();
    let away_defense = away.avg_conceded_away();
    let away_attack = away.avg_goals_away() * away.form_index();
    let home_defense = home.avg_conceded_home();

    let league_avg = cfg.avg_goals / 2.0;

    let lambda_home = (home_attack / league_avg)
        * (away_defense / league_avg)
        * league_avg
        * cfg.home_advantage;
    let lambda_away =
        (away_attack / league_avg) * (home_defense / league_avg) * league_avg * cfg.away_factor;

    (
        clamp(lambda_home, HOME_XG_MIN, HOME_XG_MAX),
        clamp(lambda_away, AWAY_XG_MIN, AWAY_XG_MAX),
    )
}

pub fn predict(home: &TeamStats, away: &TeamStats, cfg: &ModelConfig) -> Prediction {
    let (lambda_home, lambda_away) = expected_goals(home, away, cfg);
    Prediction::from_rates(lambda_home, lambda_away)
}

fn poisson_pmf(lambda: f64) -> [f64; MAX_GOALS + 1] {
    let mut out = [0.0; MAX_GOALS + 1];
    let lambda = lambda.max(0.0);
    out[0] = (-lambda).exp();
    for k in 1..=MAX_GOALS {
        out[k] = out[k - 1] * lambda / k as f64;
    }
    out
}

fn percent(p: f64) -> u32 {
    (p * 100.0).round().clamp(0.0, 100.0) as u32
}

fn clamp(v: f64, lo: f64, hi: f64) -> f64 {
    v.max(lo).min(hi)
}
