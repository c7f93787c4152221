use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::ModelConfig;
use crate::markets::Market;
use crate::prediction::Prediction;

/// Decimal prices keyed by market.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Odds(BTreeMap<Market, f64>);

impl Odds {
    pub fn get(&self, market: Market) -> Option<f64> {
        self.0.get(&market).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Market, f64)> + '_ {
        self.0.iter().map(|(m, p)| (*m, *p))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Replaces synthesized prices with bookmaker quotes where one is offered.
    /// Quotes at or below 1.0 are ignored.
    pub fn with_offered(mut self, offered: &BTreeMap<Market, f64>) -> Self {
        for (market, price) in offered {
            if price.is_finite() && *price > 1.0 {
                self.0.insert(*market, *price);
            }
        }
        self
    }
}

impl FromIterator<(Market, f64)> for Odds {
    fn from_iter<T: IntoIterator<Item = (Market, f64)>>(iter: T) -> Self {
        Odds(iter.into_iter().collect())
    }
}

/// Fair price for a whole-percent probability plus the bookmaker margin, capped.
pub fn price_for_percent(pct: u32, cfg: &ModelConfig) -> f64 {
    if pct == 0 {
        return cfg.max_odds;
    }
    let raw = (100.0 / pct as f64) * cfg.bookmaker_margin;
    round2(raw).min(cfg.max_odds)
}

pub fn synthesize_odds(pred: &Prediction, cfg: &ModelConfig) -> Odds {
    Market::ALL
        .iter()
        .map(|m| (*m, price_for_percent(pred.market_probability(*m), cfg)))
        .collect()
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}
