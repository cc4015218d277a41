//! Session configuration and the economy multipliers that research mutates.

use serde::{Deserialize, Serialize};

/// Global per-session multipliers.
///
/// Every colony and ship reads these; completed technologies raise them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EconomyRates {
    /// Research points per research lab per day
    pub research_per_lab: f64,
    /// Build points per factory per day
    pub production_per_factory: f64,
    /// Build points per shipyard per day
    pub production_per_shipyard: f64,
    /// Fuel produced per operating refinery per day
    pub refining_efficiency: f64,
    /// Tons mined per mine per day (scaled by accessibility)
    pub mining_per_mine: f64,
    /// Money earned per financial centre per day
    pub money_per_financial_centre: i64,
    /// Ship speed in system units per scaled second
    pub ship_speed: f32,
    /// Survey points removed per scaled second
    pub survey_speed: f64,
}

impl Default for EconomyRates {
    fn default() -> Self {
        Self {
            research_per_lab: 20.0,
            production_per_factory: 75.0,
            production_per_shipyard: 75.0,
            refining_efficiency: 2000.0,
            mining_per_mine: 4.0,
            money_per_financial_centre: 5,
            ship_speed: 20.0,
            survey_speed: 50.0,
        }
    }
}

/// Configuration for starting a new session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    pub player_name: String,
    /// Seed for galaxy generation and every later random draw
    pub seed: u64,
    pub starting_money: i64,
    pub rates: EconomyRates,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            player_name: "Player".to_string(),
            seed: 0,
            starting_money: 10_000_000,
            rates: EconomyRates::default(),
        }
    }
}

impl SessionConfig {
    pub fn with_player(mut self, name: impl Into<String>) -> Self {
        self.player_name = name.into();
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}
