use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use slipwise::config::{AppConfig, ModelConfig};
use slipwise::historical::MatchResult;
use slipwise::markets::Market;
use slipwise::odds::synthesize_odds;
use slipwise::pipeline::run_pipeline;
use slipwise::prediction::predict;
use slipwise::scoring::Fixture;
use slipwise::team_stats::{FormResult, TeamStats};
use slipwise::value_bets::{find_value_bets, is_value};

fn random_team(rng: &mut StdRng, name: &str) -> TeamStats {
    let home_played = rng.gen_range(0..20);
    let away_played = rng.gen_range(0..20);
    let form_len = rng.gen_range(0..=5);
    let form = (0..form_len)
        .map(|_| match rng.gen_range(0..3) {
            0 => FormResult::Win,
            1 => FormResult::Draw,
            _ => FormResult::Loss,
        })
        .collect();
    TeamStats {
        played: home_played + away_played,
        home_played,
        away_played,
        home_goals_for: rng.gen_range(0..=home_played * 4),
        home_goals_against: rng.gen_range(0..=home_played * 4),
        away_goals_for: rng.gen_range(0..=away_played * 4),
        away_goals_against: rng.gen_range(0..=away_played * 4),
        form,
        ..TeamStats::new(name)
    }
}

fn random_model(rng: &mut StdRng) -> ModelConfig {
    ModelConfig {
        home_advantage: rng.gen_range(1.01..1.6),
        avg_goals: rng.gen_range(1.8..3.6),
        bookmaker_margin: rng.gen_range(1.01..1.12),
        ..ModelConfig::default()
    }
}

#[test]
fn outcome_percentages_sum_to_hundred() {
    let mut rng = StdRng::seed_from_u64(11);
    for _ in 0..2_000 {
        let home = random_team(&mut rng, "H");
        let away = random_team(&mut rng, "A");
        let cfg = random_model(&mut rng);
        let pred = predict(&home, &away, &cfg);
        let sum = pred.home_win + pred.draw + pred.away_win;
        assert!((99..=101).contains(&sum), "{pred:?}");
        for p in [pred.over_05, pred.over_15, pred.over_25, pred.btts] {
            assert!(p <= 100);
        }
        assert!((0.5..=4.0).contains(&pred.home_xg));
        assert!((0.3..=3.5).contains(&pred.away_xg));
    }
}

#[test]
fn synthesized_odds_stay_within_bounds() {
    let mut rng = StdRng::seed_from_u64(12);
    for _ in 0..2_000 {
        let cfg = random_model(&mut rng);
        let pred = predict(
            &random_team(&mut rng, "H"),
            &random_team(&mut rng, "A"),
            &cfg,
        );
        let odds = synthesize_odds(&pred, &cfg);
        // Double chances can reach 101% after rounding.
        let floor = (100.0 / 101.0 * cfg.bookmaker_margin * 100.0).round() / 100.0;
        for (market, price) in odds.iter() {
            assert!(price <= cfg.max_odds, "{market}: {price}");
            assert!(price >= floor, "{market}: {price}");
        }
    }
}

#[test]
fn value_flag_matches_edge_threshold() {
    let min_edge = 0.03;
    for pct in 1..=99u32 {
        let p = pct as f64 / 100.0;
        let break_even = (1.0 + min_edge) / p;
        for delta in [-0.05, -0.01, 0.01, 0.05] {
            let odds = break_even + delta;
            assert_eq!(is_value(p, odds, min_edge), delta > 0.0, "p={p} odds={odds}");
        }
    }
}

#[test]
fn value_bets_are_exactly_the_markets_over_threshold() {
    let mut rng = StdRng::seed_from_u64(13);
    for _ in 0..500 {
        let cfg = ModelConfig::default();
        let pred = predict(
            &random_team(&mut rng, "H"),
            &random_team(&mut rng, "A"),
            &cfg,
        );
        let odds = synthesize_odds(&pred, &cfg);
        let bets = find_value_bets(&pred, &odds, cfg.min_value_edge);
        let flagged: HashSet<Market> = bets.iter().map(|b| b.market).collect();
        for market in Market::VALUE_CANDIDATES {
            let p = pred.market_probability(market) as f64 / 100.0;
            let price = odds.get(market).expect("all markets priced");
            assert_eq!(
                flagged.contains(&market),
                p * price - 1.0 > cfg.min_value_edge,
                "{market}"
            );
        }
    }
}

fn random_league(rng: &mut StdRng, teams: usize) -> (Vec<MatchResult>, Vec<Fixture>) {
    let names: Vec<String> = (0..teams).map(|i| format!("Team {i}")).collect();
    let mut records = Vec::new();
    for _ in 0..teams * 6 {
        let h = rng.gen_range(0..teams);
        let mut a = rng.gen_range(0..teams);
        if a == h {
            a = (a + 1) % teams;
        }
        records.push(MatchResult {
            home_team: names[h].clone(),
            away_team: names[a].clone(),
            home_goals: rng.gen_range(0..5),
            away_goals: rng.gen_range(0..4),
        });
    }
    // Deliberately overlapping fixtures so team reuse is actually exercised.
    let fixtures = (0..teams * 2)
        .map(|i| {
            let h = rng.gen_range(0..teams);
            let a = (h + 1 + rng.gen_range(0..teams - 1)) % teams;
            Fixture {
                id: format!("f{i}"),
                league: if i % 2 == 0 { "E0" } else { "I1" }.to_string(),
                home_team: names[h].clone(),
                away_team: names[a].clone(),
                kickoff: None,
                offered_odds: Default::default(),
            }
        })
        .collect();
    (records, fixtures)
}

#[test]
fn random_pools_never_put_a_team_on_a_slip_twice() {
    let mut rng = StdRng::seed_from_u64(14);
    let cfg = AppConfig::default();
    for _ in 0..100 {
        let (records, fixtures) = random_league(&mut rng, 12);
        let report = run_pipeline(&records, &fixtures, &cfg);
        for slip in &report.slips {
            for (i, a) in slip.selections.iter().enumerate() {
                for b in &slip.selections[i + 1..] {
                    assert_ne!(a.match_id, b.match_id);
                    for team in [&a.home_team, &a.away_team] {
                        assert_ne!(team, &b.home_team, "{}", slip.tier);
                        assert_ne!(team, &b.away_team, "{}", slip.tier);
                    }
                }
            }
        }
    }
}

#[test]
fn pipeline_is_deterministic_on_random_input() {
    let mut rng = StdRng::seed_from_u64(15);
    let (records, fixtures) = random_league(&mut rng, 16);
    let cfg = AppConfig::default();
    let first = run_pipeline(&records, &fixtures, &cfg);
    for _ in 0..5 {
        assert_eq!(run_pipeline(&records, &fixtures, &cfg), first);
    }
}
