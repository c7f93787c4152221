use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;

use slipwise::config::AppConfig;
use slipwise::historical::{MatchResult, parse_results_csv, parse_results_json};
use slipwise::logging::init_logging;
use slipwise::pipeline::{RunReport, run_pipeline};
use slipwise::scoring::Fixture;

#[derive(Debug, Parser)]
#[command(name = "slipwise", about = "Football predictions and risk-tiered betting slips")]
struct Cli {
    /// Historical results, football-data CSV or a JSON array.
    #[arg(long, env = "SLIPWISE_RESULTS")]
    results: PathBuf,

    /// Upcoming fixtures as a JSON array.
    #[arg(long, env = "SLIPWISE_FIXTURES")]
    fixtures: PathBuf,

    /// Optional JSON config with model constants and slip tiers.
    #[arg(long, env = "SLIPWISE_CONFIG")]
    config: Option<PathBuf>,

    /// Print the full report as JSON instead of the summary.
    #[arg(long)]
    json: bool,

    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let cfg = AppConfig::load(cli.config.as_deref())?;
    let records = load_results(&cli.results)?;
    let fixtures = load_fixtures(&cli.fixtures)?;

    let report = run_pipeline(&records, &fixtures, &cfg);

    if cli.json {
        let out = serde_json::json!({
            "generated_at": chrono::Utc::now().to_rfc3339(),
            "report": report,
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&out).context("serialize report")?
        );
    } else {
        print_summary(&report);
    }
    Ok(())
}

fn load_results(path: &Path) -> Result<Vec<MatchResult>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("read results {}", path.display()))?;
    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));
    if is_json {
        parse_results_json(&raw).with_context(|| format!("parse results {}", path.display()))
    } else {
        Ok(parse_results_csv(&raw))
    }
}

fn load_fixtures(path: &Path) -> Result<Vec<Fixture>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("read fixtures {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parse fixtures {}", path.display()))
}

fn print_summary(report: &RunReport) {
    let s = &report.summary;
    println!(
        "Matches analysed: {} ({} leagues, {} teams tracked)",
        s.total_matches, s.leagues_processed, s.teams_tracked
    );
    println!("Value bets found: {}", s.value_bets_found);

    for m in &report.matches {
        let p = &m.prediction;
        println!(
            "  [{}] {}: 1 {}% X {}% 2 {}%  O2.5 {}%  BTTS {}%  xG {:.2}-{:.2}  likely {}-{}  conf {}",
            m.league_name,
            m.label(),
            p.home_win,
            p.draw,
            p.away_win,
            p.over_25,
            p.btts,
            p.home_xg,
            p.away_xg,
            p.likely_score.0,
            p.likely_score.1,
            m.confidence,
        );
    }

    for slip in &report.slips {
        println!();
        println!(
            "Slip {}: {}/{} selections @ {:.2}  stake {:.2} -> {:.2}{}",
            slip.tier,
            slip.len(),
            slip.target_count,
            slip.total_odds,
            slip.stake,
            slip.potential_winnings,
            if slip.is_complete() { "" } else { "  (short)" },
        );
        for sel in &slip.selections {
            let edge = sel
                .edge
                .map(|e| format!(" +{e}%"))
                .unwrap_or_default();
            println!(
                "  {} [{}]: {} @ {:.2} ({}%{})",
                sel.fixture_label(),
                sel.league_name,
                sel.market,
                sel.odds,
                sel.probability,
                edge
            );
        }
    }
}
