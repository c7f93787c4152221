use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use slipwise::config::ModelConfig;
use slipwise::odds::synthesize_odds;
use slipwise::prediction::{expected_goals, predict};
use slipwise::team_stats::TeamStats;
use slipwise::value_bets::find_value_bets;

#[derive(Debug, serde::Deserialize)]
struct PredictCase {
    home: TeamStats,
    away: TeamStats,
    #[serde(default)]
    model: Option<ModelConfig>,
}

fn main() -> anyhow::Result<()> {
    let path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("tests/fixtures/predict_case.json"));

    let raw =
        fs::read_to_string(&path).with_context(|| format!("read case {}", path.display()))?;
    let case: PredictCase = serde_json::from_str(&raw).context("invalid case json")?;
    let cfg = case.model.unwrap_or_default();
    cfg.validate()?;

    // One fixture, no history files: handy for tuning the model constants by hand.
    let (lambda_home, lambda_away) = expected_goals(&case.home, &case.away, &cfg);
    let pred = predict(&case.home, &case.away, &cfg);
    let odds = synthesize_odds(&pred, &cfg);
    let value_bets = find_value_bets(&pred, &odds, cfg.min_value_edge);

    println!("{} vs {}", case.home.name, case.away.name);
    println!(
        "Form: {:.3} / {:.3}",
        case.home.form_index(),
        case.away.form_index()
    );
    println!("xG: {lambda_home:.2} - {lambda_away:.2}");
    println!("Home: {}%", pred.home_win);
    println!("Draw: {}%", pred.draw);
    println!("Away: {}%", pred.away_win);
    println!(
        "Over 1.5/2.5: {}% / {}%   BTTS: {}%",
        pred.over_15, pred.over_25, pred.btts
    );
    println!(
        "Likely score: {}-{}",
        pred.likely_score.0, pred.likely_score.1
    );

    println!("Odds:");
    for (market, price) in odds.iter() {
        println!("  {:<10} {price:.2}", market.label());
    }

    if value_bets.is_empty() {
        println!("No value bets");
    } else {
        println!("Value bets:");
        for vb in &value_bets {
            println!(
                "  {:<10} @ {:.2}  p={}%  edge +{}%",
                vb.market.label(),
                vb.odds,
                vb.probability,
                vb.edge
            );
        }
    }

    Ok(())
}
