use std::fmt;

use serde::{Deserialize, Serialize};

/// Betting markets priced for every fixture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Market {
    #[serde(rename = "home")]
    Home,
    #[serde(rename = "draw")]
    Draw,
    #[serde(rename = "away")]
    Away,
    #[serde(rename = "over15")]
    Over15,
    #[serde(rename = "under15")]
    Under15,
    #[serde(rename = "over25")]
    Over25,
    #[serde(rename = "under25")]
    Under25,
    #[serde(rename = "btts_yes")]
    BttsYes,
    #[serde(rename = "btts_no")]
    BttsNo,
    #[serde(rename = "dc1x")]
    HomeOrDraw,
    #[serde(rename = "dc12")]
    HomeOrAway,
    #[serde(rename = "dcx2")]
    DrawOrAway,
}

impl Market {
    pub const ALL: [Market; 12] = [
        Market::Home,
        Market::Draw,
        Market::Away,
        Market::Over15,
        Market::Under15,
        Market::Over25,
        Market::Under25,
        Market::BttsYes,
        Market::BttsNo,
        Market::HomeOrDraw,
        Market::HomeOrAway,
        Market::DrawOrAway,
    ];

    /// Markets screened for value, in reporting order.
    pub const VALUE_CANDIDATES: [Market; 10] = [
        Market::Home,
        Market::Draw,
        Market::Away,
        Market::Over25,
        Market::Under25,
        Market::Over15,
        Market::BttsYes,
        Market::BttsNo,
        Market::HomeOrDraw,
        Market::DrawOrAway,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Market::Home => "1",
            Market::Draw => "X",
            Market::Away => "2",
            Market::Over15 => "Over 1.5",
            Market::Under15 => "Under 1.5",
            Market::Over25 => "Over 2.5",
            Market::Under25 => "Under 2.5",
            Market::BttsYes => "BTTS Yes",
            Market::BttsNo => "BTTS No",
            Market::HomeOrDraw => "DC 1X",
            Market::HomeOrAway => "DC 12",
            Market::DrawOrAway => "DC X2",
        }
    }
}

impl fmt::Display for Market {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
