use std::collections::HashSet;
use std::env;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::slips::{SlipTier, default_tiers};

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{name} must be a finite number, got {value}")]
    NotFinite { name: &'static str, value: f64 },

    #[error("{name} must be greater than {min}, got {value}")]
    TooSmall {
        name: &'static str,
        min: f64,
        value: f64,
    },

    #[error("tier '{0}' needs a target count of at least one selection")]
    EmptyTarget(String),

    #[error("tier '{0}' has no market rules")]
    NoRules(String),

    #[error("tier '{0}' needs a positive stake")]
    InvalidStake(String),

    #[error("tier name '{0}' is used more than once")]
    DuplicateTier(String),
}

/// Tunable constants for the prediction, odds and value-bet stages.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Multiplier applied to the home side's expected goals.
    pub home_advantage: f64,
    /// Multiplier applied to the away side's expected goals.
    pub away_factor: f64,
    /// League-wide average total goals per match.
    pub avg_goals: f64,
    /// Minimum edge (fraction) for a market to count as value.
    pub min_value_edge: f64,
    pub bookmaker_margin: f64,
    pub max_odds: f64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            home_advantage: 1.35,
            away_factor: 0.9,
            avg_goals: 2.7,
            min_value_edge: 0.03,
            bookmaker_margin: 1.05,
            max_odds: 20.0,
        }
    }
}

impl ModelConfig {
    /// Overrides fields from `SLIPWISE_*` variables. Unparseable values are ignored.
    pub fn apply_env(&mut self) {
        override_f64(&mut self.home_advantage, "SLIPWISE_HOME_ADVANTAGE");
        override_f64(&mut self.away_factor, "SLIPWISE_AWAY_FACTOR");
        override_f64(&mut self.avg_goals, "SLIPWISE_AVG_GOALS");
        override_f64(&mut self.min_value_edge, "SLIPWISE_MIN_VALUE_EDGE");
        override_f64(&mut self.bookmaker_margin, "SLIPWISE_BOOKMAKER_MARGIN");
        override_f64(&mut self.max_odds, "SLIPWISE_MAX_ODDS");
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let fields = [
            ("home_advantage", self.home_advantage),
            ("away_factor", self.away_factor),
            ("avg_goals", self.avg_goals),
            ("min_value_edge", self.min_value_edge),
            ("bookmaker_margin", self.bookmaker_margin),
            ("max_odds", self.max_odds),
        ];
        for (name, value) in fields {
            if !value.is_finite() {
                return Err(ConfigError::NotFinite { name, value });
            }
        }

        require_above("home_advantage", self.home_advantage, 1.0)?;
        require_above("bookmaker_margin", self.bookmaker_margin, 1.0)?;
        require_above("avg_goals", self.avg_goals, 0.0)?;
        require_above("away_factor", self.away_factor, 0.0)?;
        require_above("max_odds", self.max_odds, 1.0)?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default = "default_tiers")]
    pub tiers: Vec<SlipTier>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            model: ModelConfig::default(),
            tiers: default_tiers(),
        }
    }
}

impl AppConfig {
    /// Reads the JSON config at `path` (defaults when absent), applies env overrides and
    /// validates the result.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut cfg = match path {
            Some(path) => {
                let raw = fs::read_to_string(path)
                    .with_context(|| format!("read config {}", path.display()))?;
                Self::from_json(&raw)
                    .with_context(|| format!("parse config {}", path.display()))?
            }
            None => Self::default(),
        };
        cfg.model.apply_env();
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        let cfg = serde_json::from_str::<AppConfig>(raw).context("invalid config json")?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.model.validate()?;

        let mut names = HashSet::new();
        for tier in &self.tiers {
            if !names.insert(tier.name.as_str()) {
                return Err(ConfigError::DuplicateTier(tier.name.clone()));
            }
            if tier.target_count == 0 {
                return Err(ConfigError::EmptyTarget(tier.name.clone()));
            }
            if tier.rules.is_empty() {
                return Err(ConfigError::NoRules(tier.name.clone()));
            }
            if !(tier.stake.is_finite() && tier.stake > 0.0) {
                return Err(ConfigError::InvalidStake(tier.name.clone()));
            }
        }
        Ok(())
    }
}

fn require_above(name: &'static str, value: f64, min: f64) -> Result<(), ConfigError> {
    if value > min {
        Ok(())
    } else {
        Err(ConfigError::TooSmall { name, min, value })
    }
}

fn override_f64(slot: &mut f64, key: &str) {
    if let Some(v) = env::var(key)
        .ok()
        .and_then(|raw| raw.trim().parse::<f64>().ok())
    {
        *slot = v;
    }
}
