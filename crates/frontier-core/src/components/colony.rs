//! Colony state: population, stockpiles, infrastructure and build queues.
//!
//! Daily advancement lives in [`crate::systems::production`]; this module
//! holds the state, the derived production figures and the transfer
//! operations ships use.

use super::minerals::{Mineral, ResourceVector};
use super::ship::ShipKind;
use crate::catalog::{BuildingKind, Catalog};
use crate::config::EconomyRates;
use crate::constants::*;
use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// Building counts, indexed by [`BuildingKind`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Infrastructure(pub [u32; 8]);

impl Infrastructure {
    pub fn total(&self) -> u64 {
        self.0.iter().map(|c| *c as u64).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (BuildingKind, u32)> + '_ {
        BuildingKind::ALL.iter().map(move |k| (*k, self.0[k.index()]))
    }
}

impl Index<BuildingKind> for Infrastructure {
    type Output = u32;
    fn index(&self, kind: BuildingKind) -> &u32 {
        &self.0[kind.index()]
    }
}

impl IndexMut<BuildingKind> for Infrastructure {
    fn index_mut(&mut self, kind: BuildingKind) -> &mut u32 {
        &mut self.0[kind.index()]
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Colony {
    /// Name of the planet the colony sits on
    pub name: String,
    pub system: usize,
    pub planet: usize,
    pub homeworld: bool,
    pub habitable: bool,
    /// Mining only happens on surveyed colonies
    pub surveyed: bool,
    /// People living here. f64 keeps the daily growth step exact to well
    /// below one person at any reachable population.
    pub population: f64,
    pub stockpiles: ResourceVector,
    pub fuel: f64,
    pub infrastructure: Infrastructure,
    pub factory_project: Option<BuildingKind>,
    pub remaining_factory_points: f64,
    pub shipyard_project: Option<ShipKind>,
    pub remaining_shipyard_points: f64,
    pub refinery_active: bool,
}

impl Colony {
    /// An empty outpost on a newly claimed planet
    pub fn new(name: impl Into<String>, system: usize, planet: usize, habitable: bool, surveyed: bool) -> Self {
        Self {
            name: name.into(),
            system,
            planet,
            homeworld: false,
            habitable,
            surveyed,
            population: 0.0,
            stockpiles: ResourceVector::ZERO,
            fuel: 0.0,
            infrastructure: Infrastructure::default(),
            factory_project: None,
            remaining_factory_points: 0.0,
            shipyard_project: None,
            remaining_shipyard_points: 0.0,
            refinery_active: true,
        }
    }

    /// The player's starting colony
    pub fn homeworld(name: impl Into<String>, system: usize, planet: usize) -> Self {
        let mut colony = Self::new(name, system, planet, true, true);
        colony.homeworld = true;
        colony.population = HOMEWORLD_STARTING_POPULATION;
        colony.stockpiles = ResourceVector::splat(HOMEWORLD_STARTING_STOCKPILE);

        let infra = &mut colony.infrastructure;
        infra[BuildingKind::AutomatedMine] = 20;
        infra[BuildingKind::Factory] = 10;
        infra[BuildingKind::FinancialCentre] = 10;
        infra[BuildingKind::FuelRefinery] = 10;
        infra[BuildingKind::Leisure] = 40;
        infra[BuildingKind::Mine] = 100;
        infra[BuildingKind::ResearchLab] = 10;
        infra[BuildingKind::Shipyard] = 5;
        colony
    }

    // ── Derived figures ────────────────────────────────────────────────

    /// Workers needed to staff every building
    pub fn required_population(&self, catalog: &Catalog) -> f64 {
        self.infrastructure
            .iter()
            .map(|(kind, count)| count as f64 * catalog.worker_population(kind))
            .sum()
    }

    pub fn happiness(&self) -> f64 {
        self.infrastructure[BuildingKind::Leisure] as f64 - (self.population / UNHAPPINESS_DIVISOR).floor()
    }

    /// Multiplier in [0.01, 1] applied to population-dependent production
    pub fn population_efficiency(&self, catalog: &Catalog) -> f64 {
        let required = self.required_population(catalog);
        if required <= 0.0 {
            return 1.0;
        }

        let happiness = self.happiness();
        let happiness_factor = if happiness > 0.0 {
            1.0
        } else {
            1.0 - happiness.clamp(UNHAPPINESS_PENALTY, 0.0) / UNHAPPINESS_PENALTY
        };

        if self.population >= required {
            happiness_factor
        } else {
            (self.population / required * happiness_factor).clamp(MIN_POPULATION_EFFICIENCY, 1.0)
        }
    }

    /// Tons per day before accessibility; automated mines ignore staffing
    pub fn mining_production(&self, catalog: &Catalog, rates: &EconomyRates) -> f64 {
        let mines = self.infrastructure[BuildingKind::Mine] as f64;
        let automated = self.infrastructure[BuildingKind::AutomatedMine] as f64;
        self.population_efficiency(catalog) * mines * rates.mining_per_mine + automated * rates.mining_per_mine
    }

    pub fn factory_production(&self, catalog: &Catalog, rates: &EconomyRates) -> f64 {
        self.population_efficiency(catalog)
            * self.infrastructure[BuildingKind::Factory] as f64
            * rates.production_per_factory
    }

    pub fn shipyard_production(&self, catalog: &Catalog, rates: &EconomyRates) -> f64 {
        self.population_efficiency(catalog)
            * self.infrastructure[BuildingKind::Shipyard] as f64
            * rates.production_per_shipyard
    }

    pub fn research_production(&self, catalog: &Catalog, rates: &EconomyRates) -> f64 {
        self.population_efficiency(catalog)
            * self.infrastructure[BuildingKind::ResearchLab] as f64
            * rates.research_per_lab
    }

    /// Days until the building project completes
    pub fn factory_eta(&self, catalog: &Catalog, rates: &EconomyRates) -> Option<u32> {
        self.factory_project?;
        eta_days(self.remaining_factory_points, self.factory_production(catalog, rates))
    }

    /// Days until the ship project completes
    pub fn shipyard_eta(&self, catalog: &Catalog, rates: &EconomyRates) -> Option<u32> {
        self.shipyard_project?;
        eta_days(self.remaining_shipyard_points, self.shipyard_production(catalog, rates))
    }

    // ── Ship transfers ─────────────────────────────────────────────────

    /// Hand out up to `max` fuel; returns what was given.
    pub fn refuel(&mut self, max: f64) -> f64 {
        let fuel = max.max(0.0).min(self.fuel);
        self.fuel -= fuel;
        fuel
    }

    pub fn unload_fuel(&mut self, fuel: f64) {
        self.fuel += fuel.max(0.0);
    }

    /// Board up to `max` colonists. Fractional population is never boarded.
    pub fn load_colonists(&mut self, max: u64) -> u64 {
        let available = self.population.max(0.0).floor();
        let boarded = if (max as f64) < available { max } else { available as u64 };
        self.population -= boarded as f64;
        boarded
    }

    pub fn unload_colonists(&mut self, colonists: u64) {
        self.population += colonists as f64;
    }

    /// Move up to `amount` of one mineral out of the stockpile.
    pub fn load_minerals(&mut self, amount: f64, mineral: Mineral) -> f64 {
        let moved = amount.max(0.0).min(self.stockpiles[mineral]);
        self.stockpiles[mineral] -= moved;
        moved
    }

    pub fn unload_all_minerals(&mut self, minerals: &ResourceVector) {
        self.stockpiles.add(minerals);
    }

    /// Add a building (`drop`) or take one away for transport.
    pub fn change_building(&mut self, kind: BuildingKind, drop: bool) {
        let count = &mut self.infrastructure[kind];
        if drop {
            *count += 1;
        } else if *count == 0 {
            log::error!("Tried to remove a {} from {} but none are present", kind, self.name);
        } else {
            *count -= 1;
        }
    }
}

fn eta_days(remaining: f64, production: f64) -> Option<u32> {
    if production <= 0.0 {
        return None;
    }
    let days = (remaining / production).ceil();
    (days <= MAX_ETA_DAYS).then(|| days.max(0.0) as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outpost() -> Colony {
        Colony::new("Test II", 0, 1, true, true)
    }

    #[test]
    fn test_homeworld_defaults() {
        let colony = Colony::homeworld("Earth", 0, 2);
        assert_eq!(colony.population, 50_000_000.0);
        assert_eq!(colony.infrastructure[BuildingKind::AutomatedMine], 20);
        assert_eq!(colony.infrastructure[BuildingKind::Factory], 10);
        assert_eq!(colony.infrastructure[BuildingKind::ResearchLab], 10);
        assert_eq!(colony.infrastructure.total(), 205);
        assert!(colony.surveyed && colony.habitable && colony.homeworld);
        assert!(colony.refinery_active);
    }

    #[test]
    fn test_efficiency_without_buildings_is_full() {
        let catalog = Catalog::standard();
        let colony = outpost();
        assert_eq!(colony.required_population(&catalog), 0.0);
        assert_eq!(colony.population_efficiency(&catalog), 1.0);
    }

    #[test]
    fn test_efficiency_scales_with_staffing() {
        let catalog = Catalog::standard();
        let mut colony = outpost();
        colony.infrastructure[BuildingKind::Mine] = 2; // 150 000 workers
        colony.infrastructure[BuildingKind::Leisure] = 1;
        colony.population = 75_000.0;
        assert!((colony.population_efficiency(&catalog) - 75_000.0 / 210_000.0).abs() < 1e-12);

        colony.population = 10.0;
        assert_eq!(colony.population_efficiency(&catalog), MIN_POPULATION_EFFICIENCY);
    }

    #[test]
    fn test_unhappiness_penalty() {
        let catalog = Catalog::standard();
        let mut colony = outpost();
        colony.infrastructure[BuildingKind::Mine] = 1;
        // 50M people, no leisure: happiness -10, factor 0.5
        colony.population = 50_000_000.0;
        assert_eq!(colony.happiness(), -10.0);
        assert!((colony.population_efficiency(&catalog) - 0.5).abs() < 1e-12);

        // Past the penalty floor nothing is produced by staffed buildings
        colony.population = 200_000_000.0;
        assert_eq!(colony.population_efficiency(&catalog), 0.0);
    }

    #[test]
    fn test_homeworld_production_figures() {
        let catalog = Catalog::standard();
        let rates = EconomyRates::default();
        let colony = Colony::homeworld("Earth", 0, 0);
        // happiness = 40 - 10 = 30, 50M >= 14.575M required
        assert_eq!(colony.population_efficiency(&catalog), 1.0);
        assert_eq!(colony.factory_production(&catalog, &rates), 750.0);
        assert_eq!(colony.shipyard_production(&catalog, &rates), 375.0);
        assert_eq!(colony.research_production(&catalog, &rates), 200.0);
        assert_eq!(colony.mining_production(&catalog, &rates), 480.0);
    }

    #[test]
    fn test_eta() {
        let catalog = Catalog::standard();
        let rates = EconomyRates::default();
        let mut colony = Colony::homeworld("Earth", 0, 0);
        assert_eq!(colony.factory_eta(&catalog, &rates), None);

        colony.factory_project = Some(BuildingKind::Mine);
        colony.remaining_factory_points = 15_000.0;
        assert_eq!(colony.factory_eta(&catalog, &rates), Some(20));

        colony.remaining_factory_points = 1_000_000.0;
        assert_eq!(colony.factory_eta(&catalog, &rates), None);

        colony.infrastructure[BuildingKind::Factory] = 0;
        colony.remaining_factory_points = 10.0;
        assert_eq!(colony.factory_eta(&catalog, &rates), None);
    }

    #[test]
    fn test_refuel_bounded_by_stockpile() {
        let mut colony = outpost();
        colony.fuel = 500.0;
        assert_eq!(colony.refuel(200.0), 200.0);
        assert_eq!(colony.refuel(1_000.0), 300.0);
        assert_eq!(colony.fuel, 0.0);
        colony.unload_fuel(50.0);
        assert_eq!(colony.fuel, 50.0);
    }

    #[test]
    fn test_load_colonists_truncates_fraction() {
        let mut colony = outpost();
        colony.population = 10.75;
        assert_eq!(colony.load_colonists(100), 10);
        assert!((colony.population - 0.75).abs() < 1e-12);

        colony.population = 1_000.5;
        assert_eq!(colony.load_colonists(300), 300);
        assert!((colony.population - 700.5).abs() < 1e-12);

        colony.unload_colonists(300);
        assert!((colony.population - 1_000.5).abs() < 1e-12);
    }

    #[test]
    fn test_mineral_transfers() {
        let mut colony = outpost();
        colony.stockpiles[Mineral::Sorium] = 40.0;
        assert_eq!(colony.load_minerals(100.0, Mineral::Sorium), 40.0);
        assert_eq!(colony.stockpiles[Mineral::Sorium], 0.0);

        colony.unload_all_minerals(&ResourceVector::splat(2.0));
        assert_eq!(colony.stockpiles.total(), 16.0);
    }

    #[test]
    fn test_change_building_never_underflows() {
        let mut colony = outpost();
        colony.change_building(BuildingKind::Mine, false);
        assert_eq!(colony.infrastructure[BuildingKind::Mine], 0);
        colony.change_building(BuildingKind::Mine, true);
        colony.change_building(BuildingKind::Mine, true);
        colony.change_building(BuildingKind::Mine, false);
        assert_eq!(colony.infrastructure[BuildingKind::Mine], 1);
    }
}
