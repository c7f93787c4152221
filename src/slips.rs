//! Greedy construction of risk-tiered betting slips.
//!
//! Every tier walks the same ranked pool. A fixture is accepted through the first
//! [`MarketRule`] it satisfies, as long as neither of its teams is already on the slip.
//! The walk is a fold over [`SlipAccumulator`], so it stays deterministic for a given
//! pool order and tier list.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::markets::Market;
use crate::scoring::ScoredMatch;

/// Which market a rule offers for a fixture.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarketPick {
    Market(Market),
    /// The fixture's highest-edge value bet, whatever market it is.
    TopValueBet,
}

/// One entry of a tier's market-preference list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketRule {
    pub pick: MarketPick,
    /// Model probability (percent) must be strictly above this.
    #[serde(default)]
    pub min_probability: Option<u32>,
    #[serde(default)]
    pub min_odds: Option<f64>,
    #[serde(default)]
    pub max_odds: Option<f64>,
    /// Rule only applies while the slip holds fewer selections than this.
    #[serde(default)]
    pub max_prior_selections: Option<usize>,
}

impl MarketRule {
    pub fn market(market: Market) -> Self {
        Self {
            pick: MarketPick::Market(market),
            min_probability: None,
            min_odds: None,
            max_odds: None,
            max_prior_selections: None,
        }
    }

    pub fn top_value_bet() -> Self {
        Self {
            pick: MarketPick::TopValueBet,
            min_probability: None,
            min_odds: None,
            max_odds: None,
            max_prior_selections: None,
        }
    }

    pub fn above(mut self, pct: u32) -> Self {
        self.min_probability = Some(pct);
        self
    }

    pub fn odds_at_least(mut self, odds: f64) -> Self {
        self.min_odds = Some(odds);
        self
    }

    pub fn odds_at_most(mut self, odds: f64) -> Self {
        self.max_odds = Some(odds);
        self
    }

    pub fn while_fewer_than(mut self, selections: usize) -> Self {
        self.max_prior_selections = Some(selections);
        self
    }

    /// The selection this rule would make for `m` on a slip that already holds `selected` picks.
    pub fn evaluate(&self, m: &ScoredMatch, selected: usize) -> Option<Selection> {
        if self
            .max_prior_selections
            .is_some_and(|limit| selected >= limit)
        {
            return None;
        }

        let (market, odds, probability, edge) = match self.pick {
            MarketPick::Market(market) => {
                let odds = m.odds.get(market)?;
                let edge = m
                    .value_bets
                    .iter()
                    .find(|vb| vb.market == market)
                    .map(|vb| vb.edge);
                (market, odds, m.prediction.market_probability(market), edge)
            }
            MarketPick::TopValueBet => {
                let vb = m.value_bets.first()?;
                (vb.market, vb.odds, vb.probability, Some(vb.edge))
            }
        };

        if self.min_probability.is_some_and(|min| probability <= min) {
            return None;
        }
        if self.min_odds.is_some_and(|min| odds < min) {
            return None;
        }
        if self.max_odds.is_some_and(|max| odds > max) {
            return None;
        }

        Some(Selection {
            match_id: m.id.clone(),
            league_name: m.league_name.clone(),
            home_team: m.home_team.clone(),
            away_team: m.away_team.clone(),
            market,
            odds,
            probability,
            edge,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OddsRange {
    pub min: f64,
    pub max: f64,
}

impl OddsRange {
    pub fn contains(&self, odds: f64) -> bool {
        odds >= self.min && odds <= self.max
    }
}

/// Configuration of one slip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlipTier {
    pub name: String,
    pub target_count: usize,
    /// Stop adding selections once the running product has gone past this.
    #[serde(default)]
    pub odds_ceiling: Option<f64>,
    /// Total odds the tier aims for; reported, not enforced.
    #[serde(default)]
    pub cumulative_target: Option<OddsRange>,
    pub stake: f64,
    /// Historical hit rate in percent, carried through for reporting.
    #[serde(default)]
    pub expected_win_rate: f64,
    pub rules: Vec<MarketRule>,
    /// Second pass over the pool for slips still short after `rules`.
    #[serde(default)]
    pub fill_rules: Vec<MarketRule>,
}

pub fn default_tiers() -> Vec<SlipTier> {
    vec![
        SlipTier {
            name: "safe".to_string(),
            target_count: 3,
            odds_ceiling: None,
            cumulative_target: None,
            stake: 4.0,
            expected_win_rate: 45.0,
            rules: vec![
                MarketRule::market(Market::HomeOrDraw)
                    .above(78)
                    .odds_at_most(1.50),
                MarketRule::market(Market::Over15).above(78).odds_at_most(1.40),
            ],
            fill_rules: vec![MarketRule::market(Market::Over15).above(72)],
        },
        SlipTier {
            name: "medium".to_string(),
            target_count: 5,
            odds_ceiling: None,
            cumulative_target: None,
            stake: 3.0,
            expected_win_rate: 20.0,
            rules: vec![
                MarketRule::top_value_bet()
                    .odds_at_least(1.40)
                    .odds_at_most(2.20),
                MarketRule::market(Market::Over25).above(55).odds_at_most(2.00),
            ],
            fill_rules: vec![MarketRule::market(Market::BttsYes).above(52)],
        },
        SlipTier {
            name: "jackpot".to_string(),
            target_count: 15,
            odds_ceiling: Some(2500.0),
            cumulative_target: Some(OddsRange {
                min: 1000.0,
                max: 2500.0,
            }),
            stake: 1.0,
            expected_win_rate: 0.1,
            rules: vec![
                MarketRule::market(Market::Over15).above(78).while_fewer_than(6),
                MarketRule::market(Market::HomeOrDraw)
                    .above(75)
                    .while_fewer_than(10),
                MarketRule::market(Market::Over25).above(58),
                MarketRule::market(Market::BttsYes).above(55),
            ],
            fill_rules: Vec::new(),
        },
    ]
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    pub match_id: String,
    pub league_name: String,
    pub home_team: String,
    pub away_team: String,
    pub market: Market,
    pub odds: f64,
    /// Model probability, whole percent.
    pub probability: u32,
    #[serde(default)]
    pub edge: Option<i32>,
}

impl Selection {
    pub fn fixture_label(&self) -> String {
        format!("{} vs {}", self.home_team, self.away_team)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slip {
    pub tier: String,
    pub selections: Vec<Selection>,
    pub target_count: usize,
    pub stake: f64,
    pub expected_win_rate: f64,
    #[serde(default)]
    pub cumulative_target: Option<OddsRange>,
    pub total_odds: f64,
    pub potential_winnings: f64,
}

impl Slip {
    fn new(tier: &SlipTier, selections: Vec<Selection>) -> Self {
        let total_odds = selections.iter().map(|s| s.odds).product::<f64>();
        Self {
            tier: tier.name.clone(),
            target_count: tier.target_count,
            stake: tier.stake,
            expected_win_rate: tier.expected_win_rate,
            cumulative_target: tier.cumulative_target,
            potential_winnings: total_odds * tier.stake,
            total_odds,
            selections,
        }
    }

    pub fn len(&self) -> usize {
        self.selections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selections.is_empty()
    }

    pub fn is_complete(&self) -> bool {
        self.selections.len() >= self.target_count
    }

    pub fn within_target(&self) -> bool {
        self.cumulative_target
            .is_none_or(|range| range.contains(self.total_odds))
    }
}

/// Running state while a tier walks the pool.
#[derive(Debug, Clone)]
pub struct SlipAccumulator {
    pub selections: Vec<Selection>,
    pub used_teams: HashSet<String>,
    pub cumulative_odds: f64,
}

impl Default for SlipAccumulator {
    fn default() -> Self {
        Self {
            selections: Vec::new(),
            used_teams: HashSet::new(),
            cumulative_odds: 1.0,
        }
    }
}

impl SlipAccumulator {
    pub fn is_closed(&self, tier: &SlipTier) -> bool {
        self.selections.len() >= tier.target_count
            || tier
                .odds_ceiling
                .is_some_and(|ceiling| self.cumulative_odds > ceiling)
    }

    pub fn admits(&self, m: &ScoredMatch) -> bool {
        !self.used_teams.contains(&m.home_team) && !self.used_teams.contains(&m.away_team)
    }

    fn push(&mut self, selection: Selection) {
        self.cumulative_odds *= selection.odds;
        self.used_teams.insert(selection.home_team.clone());
        self.used_teams.insert(selection.away_team.clone());
        self.selections.push(selection);
    }
}

/// Considers one fixture for the slip under `rules`.
pub fn step(
    mut acc: SlipAccumulator,
    m: &ScoredMatch,
    tier: &SlipTier,
    rules: &[MarketRule],
) -> SlipAccumulator {
    if acc.is_closed(tier) {
        return acc;
    }
    if !acc.admits(m) {
        tracing::trace!(tier = %tier.name, fixture = %m.id, "team already on slip");
        return acc;
    }
    let picked = rules
        .iter()
        .find_map(|rule| rule.evaluate(m, acc.selections.len()));
    if let Some(selection) = picked {
        acc.push(selection);
    }
    acc
}

/// Orders the pool by value-bet count, then confidence, both descending. Ties keep input order.
pub fn rank_pool(pool: &[ScoredMatch]) -> Vec<&ScoredMatch> {
    let mut ranked: Vec<&ScoredMatch> = pool.iter().collect();
    ranked.sort_by(|a, b| {
        b.value_bets
            .len()
            .cmp(&a.value_bets.len())
            .then_with(|| b.confidence.cmp(&a.confidence))
    });
    ranked
}

pub fn build_slip(ranked: &[&ScoredMatch], tier: &SlipTier) -> Slip {
    let walk = |acc: SlipAccumulator, rules: &[MarketRule]| {
        ranked
            .iter()
            .fold(acc, |acc, m| step(acc, m, tier, rules))
    };

    let mut acc = walk(SlipAccumulator::default(), tier.rules.as_slice());
    if !tier.fill_rules.is_empty() {
        acc = walk(acc, tier.fill_rules.as_slice());
    }
    Slip::new(tier, acc.selections)
}

pub fn build_slips(pool: &[ScoredMatch], tiers: &[SlipTier]) -> Vec<Slip> {
    let ranked = rank_pool(pool);
    tiers
        .iter()
        .map(|tier| {
            let slip = build_slip(&ranked, tier);
            if slip.is_complete() {
                tracing::info!(
                    tier = %slip.tier,
                    selections = slip.len(),
                    total_odds = slip.total_odds,
                    "slip built"
                );
            } else {
                tracing::warn!(
                    tier = %slip.tier,
                    selections = slip.len(),
                    target = slip.target_count,
                    "slip shorter than target"
                );
            }
            slip
        })
        .collect()
}
