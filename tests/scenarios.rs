use std::collections::HashMap;

use slipwise::config::{AppConfig, ModelConfig};
use slipwise::historical::MatchResult;
use slipwise::markets::Market;
use slipwise::pipeline::run_pipeline;
use slipwise::prediction::{Prediction, ScoreGrid, expected_goals, predict};
use slipwise::scoring::{Fixture, score_fixtures};
use slipwise::slips::{MarketRule, SlipTier, build_slips};
use slipwise::team_stats::FormResult::{Draw, Loss, Win};
use slipwise::team_stats::TeamStats;

fn strong_home() -> TeamStats {
    TeamStats {
        played: 10,
        home_played: 10,
        home_goals_for: 18,
        home_goals_against: 6,
        form: vec![Win, Win, Win, Draw, Win],
        ..TeamStats::new("Home")
    }
}

fn weak_away() -> TeamStats {
    TeamStats {
        played: 10,
        away_played: 10,
        away_goals_for: 8,
        away_goals_against: 14,
        form: vec![Loss, Draw, Loss, Loss, Win],
        ..TeamStats::new("Away")
    }
}

fn fixture(id: &str, home: &str, away: &str) -> Fixture {
    Fixture {
        id: id.to_string(),
        league: "I1".to_string(),
        home_team: home.to_string(),
        away_team: away.to_string(),
        kickoff: None,
        offered_odds: Default::default(),
    }
}

#[test]
fn in_form_home_side_against_leaky_away_side() {
    let cfg = ModelConfig {
        avg_goals: 2.7,
        home_advantage: 1.35,
        ..ModelConfig::default()
    };
    let (lambda_home, lambda_away) = expected_goals(&strong_home(), &weak_away(), &cfg);
    assert!((0.5..=4.0).contains(&lambda_home));
    assert!(lambda_home > lambda_away + 1.0);

    let pred = predict(&strong_home(), &weak_away(), &cfg);
    assert!(pred.home_win > pred.draw);
    assert!(pred.draw > pred.away_win);
    assert_eq!(pred.home_xg, lambda_home);
}

#[test]
fn symmetric_strengths_centre_on_a_draw() {
    // Independent Poisson with equal rates splits wins evenly; the modal scoreline is a draw.
    let pred = Prediction::from_rates(1.3, 1.3);
    assert_eq!(pred.home_win, pred.away_win);
    assert_eq!(pred.likely_score.0, pred.likely_score.1);

    let grid = ScoreGrid::from_rates(1.3, 1.3);
    let (h, a) = pred.likely_score;
    let best = grid.cell(h as usize, a as usize);
    for hg in 0..=4 {
        for ag in 0..=4 {
            assert!(grid.cell(hg, ag) <= best);
        }
    }

    for lambda in [0.6, 0.9, 1.3, 1.7, 2.2] {
        let p = Prediction::from_rates(lambda, lambda);
        assert_eq!(p.home_win, p.away_win, "λ={lambda}");
        assert_eq!(p.likely_score.0, p.likely_score.1, "λ={lambda}");
    }
}

#[test]
fn two_fixtures_sharing_a_team_fill_only_one_slot() {
    let mut stats = HashMap::new();
    for name in ["Inter", "Milan", "Roma"] {
        let t = TeamStats {
            played: 8,
            home_played: 4,
            away_played: 4,
            home_goals_for: 8,
            home_goals_against: 4,
            away_goals_for: 6,
            away_goals_against: 5,
            ..TeamStats::new(name)
        };
        stats.insert(name.to_string(), t);
    }
    let fixtures = vec![fixture("1", "Inter", "Milan"), fixture("2", "Roma", "Inter")];
    let pool = score_fixtures(&fixtures, &stats, &ModelConfig::default());
    assert_eq!(pool.len(), 2);

    let tier = SlipTier {
        name: "double".to_string(),
        target_count: 2,
        odds_ceiling: None,
        cumulative_target: None,
        stake: 1.0,
        expected_win_rate: 0.0,
        rules: vec![MarketRule::market(Market::Over15)],
        fill_rules: vec![MarketRule::market(Market::BttsYes)],
    };
    let slips = build_slips(&pool, &[tier]);
    assert_eq!(slips[0].len(), 1);
    assert!(!slips[0].is_complete());
}

#[test]
fn sparse_history_degrades_instead_of_failing() {
    let records = vec![MatchResult {
        home_team: "Lone".to_string(),
        away_team: "Other".to_string(),
        home_goals: 0,
        away_goals: 0,
    }];
    // "Other" has never played at home, "Lone" never away.
    let report = run_pipeline(
        &records,
        &[fixture("x", "Other", "Lone")],
        &AppConfig::default(),
    );
    assert_eq!(report.matches.len(), 1);
    let p = &report.matches[0].prediction;
    assert_eq!(p.home_xg, 0.5);
    assert_eq!(p.away_xg, 0.3);
    assert_eq!(report.slips.len(), 3);
}

#[test]
fn custom_model_constants_move_the_prediction() {
    let base = predict(&strong_home(), &weak_away(), &ModelConfig::default());
    let flat = predict(
        &strong_home(),
        &weak_away(),
        &ModelConfig {
            home_advantage: 1.01,
            ..ModelConfig::default()
        },
    );
    assert!(flat.home_xg < base.home_xg);
    assert!(flat.home_win <= base.home_win);
}
