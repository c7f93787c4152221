pub mod config;
pub mod historical;
pub mod leagues;
pub mod logging;
pub mod markets;
pub mod odds;
pub mod pipeline;
pub mod prediction;
pub mod scoring;
pub mod slips;
pub mod team_stats;
pub mod value_bets;
