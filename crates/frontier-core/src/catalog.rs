//! Immutable game catalogs: buildings, ship specs and technologies.
//!
//! A [`Catalog`] is built once per process (or per session) and shared as
//! `Arc<Catalog>`. Nothing in the simulation mutates it; research changes
//! [`EconomyRates`] instead.

use crate::components::{ResourceVector, ShipKind};
use crate::config::EconomyRates;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Building kinds, in cargo order-code order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BuildingKind {
    FuelRefinery,
    Mine,
    AutomatedMine,
    ResearchLab,
    Factory,
    Shipyard,
    Leisure,
    FinancialCentre,
}

impl BuildingKind {
    pub const ALL: [BuildingKind; 8] = [
        BuildingKind::FuelRefinery,
        BuildingKind::Mine,
        BuildingKind::AutomatedMine,
        BuildingKind::ResearchLab,
        BuildingKind::Factory,
        BuildingKind::Shipyard,
        BuildingKind::Leisure,
        BuildingKind::FinancialCentre,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn name(self) -> &'static str {
        match self {
            BuildingKind::FuelRefinery => "Fuel Refinery",
            BuildingKind::Mine => "Mine",
            BuildingKind::AutomatedMine => "Automated Mine",
            BuildingKind::ResearchLab => "Research Lab",
            BuildingKind::Factory => "Factory",
            BuildingKind::Shipyard => "Shipyard",
            BuildingKind::Leisure => "Leisure",
            BuildingKind::FinancialCentre => "Financial Centre",
        }
    }
}

impl fmt::Display for BuildingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A building the factories can construct
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Buildable {
    pub kind: BuildingKind,
    /// Workers needed to staff one building
    pub worker_population: f64,
    pub money: i64,
    pub build_points: f64,
    pub required: ResourceVector,
}

impl Buildable {
    pub fn name(&self) -> &'static str {
        self.kind.name()
    }
}

/// Construction cost and capacities of one ship kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShipSpec {
    pub kind: ShipKind,
    pub cost: ResourceVector,
    pub fuel_capacity: f64,
    /// Tons of minerals for cargo ships, colonists for colony ships, 0 otherwise
    pub hold_capacity: f64,
}

/// What completing a technology does to the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TechEffect {
    MoneyGrant,
    ShipSpeed,
    MiningSpeed,
    ResearchSpeed,
    RefinerySpeed,
    Economy,
    SurveySpeed,
    FactoryProduction,
    ShipyardProduction,
}

impl TechEffect {
    /// Apply the effect once with magnitude `value`.
    pub fn apply(self, value: f64, rates: &mut EconomyRates, money: &mut i64) {
        match self {
            TechEffect::MoneyGrant => *money += value as i64,
            TechEffect::ShipSpeed => rates.ship_speed += value as f32,
            TechEffect::MiningSpeed => rates.mining_per_mine += value,
            TechEffect::ResearchSpeed => rates.research_per_lab += value,
            TechEffect::RefinerySpeed => rates.refining_efficiency += value,
            TechEffect::Economy => rates.money_per_financial_centre += value as i64,
            TechEffect::SurveySpeed => rates.survey_speed += value,
            TechEffect::FactoryProduction => rates.production_per_factory += value,
            TechEffect::ShipyardProduction => rates.production_per_shipyard += value,
        }
    }

    pub fn describe(self, value: f64) -> String {
        let label = match self {
            TechEffect::MoneyGrant => "Money",
            TechEffect::ShipSpeed => "Speed of ships",
            TechEffect::MiningSpeed => "Mining speed per mine per day",
            TechEffect::ResearchSpeed => "Research speed per lab per day",
            TechEffect::RefinerySpeed => "Fuel refined per refinery per day",
            TechEffect::Economy => "Money per financial center per day",
            TechEffect::SurveySpeed => "Survey speed",
            TechEffect::FactoryProduction => "Factory Production Pts per factory per day",
            TechEffect::ShipyardProduction => "Shipyard Production Pts per shipyard per day",
        };
        format!("{} : {:+}", label, value)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Technology {
    pub name: String,
    pub description: String,
    /// Research points needed
    pub cost: f64,
    /// Name of the technology that must be researched first
    pub prerequisite: Option<String>,
    pub effect: TechEffect,
    pub value: f64,
}

impl Technology {
    fn new(
        name: &str,
        description: &str,
        cost: f64,
        prerequisite: Option<&str>,
        effect: TechEffect,
        value: f64,
    ) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            cost,
            prerequisite: prerequisite.map(str::to_string),
            effect,
            value,
        }
    }

    /// Description followed by the effect line
    pub fn full_description(&self) -> String {
        format!("{}\n{}", self.description, self.effect.describe(self.value))
    }
}

/// Error building a catalog from external data
#[derive(Debug)]
pub enum CatalogError {
    Parse(serde_json::Error),
    Invalid(String),
}

impl std::fmt::Display for CatalogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogError::Parse(e) => write!(f, "Catalog parse error: {}", e),
            CatalogError::Invalid(msg) => write!(f, "Invalid catalog: {}", msg),
        }
    }
}

impl std::error::Error for CatalogError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CatalogError::Parse(e) => Some(e),
            CatalogError::Invalid(_) => None,
        }
    }
}

impl From<serde_json::Error> for CatalogError {
    fn from(e: serde_json::Error) -> Self {
        CatalogError::Parse(e)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    /// Buildings in selection-index order
    pub buildables: Vec<Buildable>,
    pub ships: Vec<ShipSpec>,
    pub technologies: Vec<Technology>,
    /// Shipyard points needed for any ship
    pub build_points_per_ship: f64,
}

impl Catalog {
    /// Parse and validate a catalog from JSON.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let catalog: Catalog = serde_json::from_str(json)?;
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn to_json(&self) -> Result<String, CatalogError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    fn validate(&self) -> Result<(), CatalogError> {
        for kind in ShipKind::ALL {
            let count = self.ships.iter().filter(|s| s.kind == kind).count();
            if count != 1 {
                return Err(CatalogError::Invalid(format!(
                    "expected one spec for {:?} ships, found {}",
                    kind, count
                )));
            }
        }

        let mut names = HashSet::new();
        for tech in &self.technologies {
            if !names.insert(tech.name.as_str()) {
                return Err(CatalogError::Invalid(format!("duplicate technology {}", tech.name)));
            }
        }
        for tech in &self.technologies {
            if let Some(prereq) = &tech.prerequisite {
                if !names.contains(prereq.as_str()) {
                    return Err(CatalogError::Invalid(format!(
                        "{} requires unknown technology {}",
                        tech.name, prereq
                    )));
                }
            }
        }

        if self.build_points_per_ship <= 0.0 {
            return Err(CatalogError::Invalid("build_points_per_ship must be positive".into()));
        }
        Ok(())
    }

    pub fn buildable(&self, index: usize) -> Option<&Buildable> {
        self.buildables.get(index)
    }

    pub fn buildable_of(&self, kind: BuildingKind) -> Option<&Buildable> {
        self.buildables.iter().find(|b| b.kind == kind)
    }

    /// Workers needed per building of `kind`, 0 if it is not buildable
    pub fn worker_population(&self, kind: BuildingKind) -> f64 {
        self.buildable_of(kind).map_or(0.0, |b| b.worker_population)
    }

    pub fn ship(&self, kind: ShipKind) -> Option<&ShipSpec> {
        self.ships.iter().find(|s| s.kind == kind)
    }

    pub fn technology(&self, index: usize) -> Option<&Technology> {
        self.technologies.get(index)
    }

    pub fn technology_index(&self, name: &str) -> Option<usize> {
        self.technologies.iter().position(|t| t.name == name)
    }

    /// The built-in game catalog
    pub fn standard() -> Self {
        use BuildingKind::*;

        let buildable = |kind, workers: f64, money, points: f64, required: [f64; 8]| Buildable {
            kind,
            worker_population: workers,
            money,
            build_points: points,
            required: ResourceVector::new(required),
        };

        let buildables = vec![
            buildable(AutomatedMine, 0.0, 100_000, 20_000.0, [1000.0, 0.0, 0.0, 3000.0, 0.0, 0.0, 0.0, 0.0]),
            buildable(Factory, 125_000.0, 100_000, 35_000.0, [10000.0, 100.0, 2500.0, 0.0, 750.0, 0.0, 0.0, 0.0]),
            buildable(FuelRefinery, 80_000.0, 100_000, 30_000.0, [1000.0, 0.0, 0.0, 0.0, 750.0, 750.0, 0.0, 750.0]),
            buildable(Leisure, 60_000.0, 100_000, 5_000.0, [1000.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1500.0]),
            buildable(Mine, 75_000.0, 100_000, 15_000.0, [2500.0, 0.0, 0.0, 1000.0, 0.0, 0.0, 0.0, 0.0]),
            buildable(ResearchLab, 150_000.0, 200_000, 60_000.0, [10000.0, 0.0, 0.0, 0.0, 5000.0, 0.0, 0.0, 0.0]),
            buildable(Shipyard, 125_000.0, 100_000, 50_000.0, [1000.0, 5000.0, 0.0, 0.0, 0.0, 200.0, 0.0, 0.0]),
            buildable(FinancialCentre, 50_000.0, 1_000, 10_000.0, [2000.0, 250.0, 0.0, 0.0, 0.0, 200.0, 0.0, 0.0]),
        ];

        let ship = |kind, cost: [f64; 8], fuel_capacity, hold_capacity| ShipSpec {
            kind,
            cost: ResourceVector::new(cost),
            fuel_capacity,
            hold_capacity,
        };

        let ships = vec![
            ship(ShipKind::Cargo, [20000.0, 100.0, 2500.0, 0.0, 750.0, 120.0, 6000.0, 0.0], 1e6, 100_000.0),
            ship(ShipKind::Colony, [20000.0, 100.0, 2500.0, 0.0, 8000.0, 0.0, 5000.0, 0.0], 1e6, 100_000.0),
            ship(ShipKind::Survey, [20000.0, 100.0, 2500.0, 0.0, 750.0, 0.0, 3000.0, 3000.0], 1e6, 0.0),
            ship(ShipKind::Tanker, [20000.0, 100.0, 2500.0, 0.0, 750.0, 240.0, 5000.0, 0.0], 1e7, 0.0),
        ];

        Self {
            buildables,
            ships,
            technologies: standard_technologies(),
            build_points_per_ship: 10_000.0,
        }
    }
}

fn standard_technologies() -> Vec<Technology> {
    use TechEffect::*;
    let t = Technology::new;

    vec![
        // Funds
        t("Space Exploration Grant I", "Appeal to homeworld governments for space program funding.", 100.0, None, MoneyGrant, 1_000_000.0),
        t("Space Exploration Grant II", "Launch an effort to raise investment in the space exploration and resource mining business.", 10_000.0, None, MoneyGrant, 1_000_000.0),
        t("Space Exploration Grant III", "Perform an international funding campaign with large multinationals and investor groups to generate new capital.", 300_000.0, None, MoneyGrant, 50_000_000.0),
        // Ship speed
        t("Spaceship Speed I", "Improved ion drives for new spaceship engines. Instantly increases the speed of all ships you own.", 1_000.0, None, ShipSpeed, 100.0),
        t("Spaceship Speed II", "Primitive fusion reactor drives. Instantly increases the speed of all ships you own.", 10_000.0, Some("Spaceship Speed I"), ShipSpeed, 100.0),
        t("Spaceship Speed III", "Improved fusion reactor drives. Instantly increases the speed of all ships you own.", 50_000.0, Some("Spaceship Speed II"), ShipSpeed, 100.0),
        t("Spaceship Speed IV", "Advanced fusion reactor drives. Instantly increases the speed of all ships you own.", 125_000.0, Some("Spaceship Speed III"), ShipSpeed, 100.0),
        t("Spaceship Speed V", "Primitive anti-matter reactor drives. Instantly increases the speed of all ships you own.", 300_000.0, Some("Spaceship Speed IV"), ShipSpeed, 100.0),
        t("Spaceship Speed VI", "More efficient and powerful anti-matter engines for every ship.", 500_000.0, Some("Spaceship Speed V"), ShipSpeed, 100.0),
        // Mining
        t("Improved Mining I", "Improve how your colonies locate suitable minerals for mining.", 500.0, None, MiningSpeed, 0.5),
        t("Improved Mining II", "Computer-aided mining raises the rate of extraction.", 25_000.0, Some("Improved Mining I"), MiningSpeed, 0.5),
        t("Improved Mining III", "Automate critical stages of the mining sector to improve efficiency and mineral yield.", 250_000.0, Some("Improved Mining II"), MiningSpeed, 0.5),
        t("Improved Mining IV", "Breakthroughs in resource location and mineral refinement.", 750_000.0, Some("Improved Mining III"), MiningSpeed, 1.0),
        t("Improved Mining V", "Improved mining methods increase yield and efficiency.", 1_000_000.0, Some("Improved Mining IV"), MiningSpeed, 1.0),
        // Refining
        t("Refining Efficiency I", "Advanced fuel refining practices reduce waste and increase yield per Sorium per refinery.", 1_500.0, None, RefinerySpeed, 4_000.0),
        t("Refining Efficiency II", "Breakthroughs in Sorium chemistry increase the fuel production rate of refineries.", 250_000.0, Some("Refining Efficiency I"), RefinerySpeed, 5_000.0),
        t("Refining Efficiency III", "Quicker, more efficient Sorium refinement dramatically improves fuel yield.", 500_000.0, Some("Refining Efficiency II"), RefinerySpeed, 5_000.0),
        // Survey
        t("Survey Speed I", "Improved gravitational and geological sensors speed up surveys of planets and jump points.", 50_000.0, None, SurveySpeed, 25.0),
        t("Survey Speed II", "Advanced precision sensors speed up surveys of planets and jump points.", 100_000.0, Some("Survey Speed I"), SurveySpeed, 25.0),
        t("Survey Speed III", "Quantum precision sensors speed up surveys of planets and jump points.", 250_000.0, Some("Survey Speed II"), SurveySpeed, 25.0),
        // Research
        t("Research Speed I", "Restructure research facilities to focus on relevant space technologies.", 100_000.0, None, ResearchSpeed, 10.0),
        t("Research Speed II", "Self-learning systems greatly expand the capability of research facilities.", 500_000.0, Some("Research Speed I"), ResearchSpeed, 10.0),
        t("Research Speed III", "Orbital research projects provide greater insight on astrophysics and propulsion.", 750_000.0, Some("Research Speed II"), ResearchSpeed, 10.0),
        t("Research Speed IV", "Expand the budget.", 1_000_000.0, Some("Research Speed III"), ResearchSpeed, 10.0),
        // Factory production
        t("Factory Production I", "Reliable mineral shipments let factories produce goods faster.", 50_000.0, None, FactoryProduction, 5.0),
        t("Factory Production II", "Restructure factories for greater efficiency.", 750_000.0, Some("Factory Production I"), FactoryProduction, 10.0),
        t("Factory Production III", "", 1_000_000.0, Some("Factory Production II"), FactoryProduction, 15.0),
        t("Factory Production IV", "Streamlined assembly lines reduce production times.", 1_500_000.0, Some("Factory Production III"), FactoryProduction, 15.0),
        // Shipyard production
        t("Shipyard Production I", "Reorganize shipyards to improve shipbuilding efficiency.", 50_000.0, None, ShipyardProduction, 5.0),
        t("Shipyard Production II", "Coordinate shipyard complexes across colonies to produce ships faster.", 250_000.0, Some("Shipyard Production I"), ShipyardProduction, 10.0),
        t("Shipyard Production III", "Streamline the shipbuilding production line.", 1_000_000.0, Some("Shipyard Production II"), ShipyardProduction, 10.0),
        t("Shipyard Production IV", "Prefabricate ship components separately to speed up shipyards.", 2_500_000.0, Some("Shipyard Production III"), ShipyardProduction, 15.0),
        t("Shipyard Production V", "Better transportation and logistics for shipyard supply chains.", 50_000_000.0, Some("Shipyard Production IV"), ShipyardProduction, 15.0),
        // Economy
        t("Civilian Economy Expansion I", "Promote investment in the industrial sector with emphasis on space expansion.", 80_000.0, None, Economy, 2.0),
        t("Civilian Economy Expansion II", "Promote economic growth in the mining and fuel refining businesses.", 250_000.0, Some("Civilian Economy Expansion I"), Economy, 2.0),
        t("Civilian Economy Expansion III", "Encourage growth in the spaceship building business.", 750_000.0, Some("Civilian Economy Expansion II"), Economy, 3.0),
        t("Civilian Economy Expansion IV", "Establish new industries such as asteroid mining and space tourism.", 1_500_000.0, Some("Civilian Economy Expansion III"), Economy, 3.0),
        t("Civilian Economy Expansion V", "Trade between colonies in different star systems drives growth and profit.", 3_000_000.0, Some("Civilian Economy Expansion IV"), Economy, 4.0),
    ]
}
