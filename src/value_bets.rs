use serde::{Deserialize, Serialize};

use crate::markets::Market;
use crate::odds::Odds;
use crate::prediction::Prediction;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueBet {
    pub market: Market,
    pub odds: f64,
    /// Model probability, whole percent.
    pub probability: u32,
    /// Expected return above break-even, whole percent.
    pub edge: i32,
}

/// Expected profit per unit staked: `p * odds - 1`.
pub fn edge(probability: f64, odds: f64) -> f64 {
    probability * odds - 1.0
}

pub fn is_value(probability: f64, odds: f64, min_edge: f64) -> bool {
    edge(probability, odds) > min_edge
}

/// Markets whose model probability beats the price by more than `min_edge`,
/// best edge first. Ties keep market order.
pub fn find_value_bets(pred: &Prediction, odds: &Odds, min_edge: f64) -> Vec<ValueBet> {
    let mut out: Vec<ValueBet> = Market::VALUE_CANDIDATES
        .iter()
        .filter_map(|market| {
            let price = odds.get(*market)?;
            let pct = pred.market_probability(*market);
            let p = pct as f64 / 100.0;
            if !is_value(p, price, min_edge) {
                return None;
            }
            Some(ValueBet {
                market: *market,
                odds: price,
                probability: pct,
                edge: (edge(p, price) * 100.0).round() as i32,
            })
        })
        .collect();

    out.sort_by(|a, b| b.edge.cmp(&a.edge));
    out
}
