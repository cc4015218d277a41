//! Read-only projections of a session for rendering.
//!
//! Everything here is `Serialize` so a driver can dump it as JSON.

use serde::Serialize;

use crate::catalog::BuildingKind;
use crate::components::*;
use crate::engine::{CommandError, PlayerSession};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColonySummary {
    pub index: usize,
    pub name: String,
    pub system: usize,
    pub planet: usize,
    pub homeworld: bool,
    pub habitable: bool,
    pub surveyed: bool,
    pub population: f64,
    pub required_population: f64,
    pub happiness: f64,
    pub efficiency: f64,
    pub infrastructure: Vec<(BuildingKind, u32)>,
    pub stockpiles: ResourceVector,
    pub fuel: f64,
    pub refinery_active: bool,
    pub factory_project: Option<BuildingKind>,
    pub remaining_factory_points: f64,
    /// Days left, None when unknown
    pub factory_eta: Option<u32>,
    pub shipyard_project: Option<ShipKind>,
    pub remaining_shipyard_points: f64,
    pub shipyard_eta: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShipReport {
    pub index: usize,
    pub name: String,
    pub kind: ShipKind,
    pub system: usize,
    pub orbiting: Option<PointRef>,
    pub position: Vec2,
    pub fuel: f64,
    pub fuel_capacity: f64,
    pub condition: f32,
    pub flagged_for_destruction: bool,
    /// Multi-line status text
    pub info: String,
    /// One line per queued order, front first
    pub orders: Vec<String>,
    pub planning_system: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanetView {
    pub index: usize,
    pub name: String,
    pub position: Vec2,
    pub mass: f64,
    pub habitable: bool,
    pub surveyed: bool,
    pub survey_points: f64,
    pub colony: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JumpPointView {
    pub index: usize,
    pub name: String,
    pub position: Vec2,
    pub surveyed: bool,
    pub survey_points: f64,
    pub link: JumpLink,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SystemView {
    pub index: usize,
    pub name: String,
    pub star: String,
    pub planets: Vec<PlanetView>,
    pub jump_points: Vec<JumpPointView>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GalaxyView {
    pub systems: Vec<SystemView>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResearchEntry {
    pub index: usize,
    pub name: String,
    pub description: String,
    pub cost: f64,
    pub remaining: f64,
    pub prerequisite: Option<String>,
    pub researched: bool,
    /// Prerequisite met and not yet researched
    pub available: bool,
    pub current: bool,
}

impl PlayerSession {
    pub fn colony_summary(&self, index: usize) -> Option<ColonySummary> {
        let colony = self.colonies.get(index)?;
        let catalog = self.catalog();
        Some(ColonySummary {
            index,
            name: colony.name.clone(),
            system: colony.system,
            planet: colony.planet,
            homeworld: colony.homeworld,
            habitable: colony.habitable,
            surveyed: colony.surveyed,
            population: colony.population,
            required_population: colony.required_population(catalog),
            happiness: colony.happiness(),
            efficiency: colony.population_efficiency(catalog),
            infrastructure: colony.infrastructure.iter().collect(),
            stockpiles: colony.stockpiles,
            fuel: colony.fuel,
            refinery_active: colony.refinery_active,
            factory_project: colony.factory_project,
            remaining_factory_points: colony.remaining_factory_points,
            factory_eta: colony.factory_eta(catalog, &self.rates),
            shipyard_project: colony.shipyard_project,
            remaining_shipyard_points: colony.remaining_shipyard_points,
            shipyard_eta: colony.shipyard_eta(catalog, &self.rates),
        })
    }

    pub fn colony_summaries(&self) -> Vec<ColonySummary> {
        (0..self.colonies.len()).filter_map(|i| self.colony_summary(i)).collect()
    }

    pub fn ship_report(&self, index: usize) -> Option<ShipReport> {
        let entity = *self.roster.get(index)?;
        let mut query = self
            .fleet
            .query_one::<(&Hull, &Navigation, &OrderQueue, &Payload)>(entity)
            .ok()?;
        let (hull, nav, orders, payload) = query.get()?;

        Some(ShipReport {
            index,
            name: hull.name.clone(),
            kind: hull.kind,
            system: nav.system,
            orbiting: nav.orbiting,
            position: nav.position,
            fuel: hull.fuel,
            fuel_capacity: hull.fuel_capacity,
            condition: hull.condition,
            flagged_for_destruction: hull.flagged_for_destruction,
            info: self.ship_info(hull, nav, orders, payload),
            orders: orders
                .iter()
                .map(|o| o.action.describe(self.galaxy.point_name(o.target)))
                .collect(),
            planning_system: self.planned_system(nav, orders),
        })
    }

    pub fn ship_reports(&self) -> Vec<ShipReport> {
        (0..self.roster.len()).filter_map(|i| self.ship_report(i)).collect()
    }

    /// The system a ship will be in once its queue has run.
    pub fn planning_system(&self, ship: usize) -> Result<usize, CommandError> {
        let entity = self.ship_entity(ship)?;
        let mut query = self
            .fleet
            .query_one::<(&Navigation, &OrderQueue)>(entity)
            .map_err(|_| CommandError::NoSuchShip(ship))?;
        let (nav, orders) = query.get().ok_or(CommandError::NoSuchShip(ship))?;
        Ok(self.planned_system(nav, orders))
    }

    fn planned_system(&self, nav: &Navigation, orders: &OrderQueue) -> usize {
        orders.iter().fold(nav.system, |_, order| match (order.action, order.target) {
            (OrderAction::Travel, PointRef::JumpPoint { system, index }) => self
                .galaxy
                .jump_point(system, index)
                .filter(|jp| jp.point.surveyed)
                .and_then(|jp| jp.destination())
                .map_or(order.system, |(dest, _)| dest),
            _ => order.system,
        })
    }

    fn ship_info(&self, hull: &Hull, nav: &Navigation, orders: &OrderQueue, payload: &Payload) -> String {
        let system_name = self.galaxy.system(nav.system).map_or("", |s| s.name.as_str());
        let orbit = nav
            .orbiting
            .map(|p| format!(", {}", self.galaxy.point_name(p)))
            .unwrap_or_default();

        let mut info = format!(
            "Name: {}         Ship Type: {}\nFuel: {} / {}         Condition {}%\nSystem: {}{}",
            hull.name,
            hull.kind.type_name(),
            group_thousands(hull.fuel, 0),
            group_thousands(hull.fuel_capacity, 0),
            group_thousands(hull.condition as f64, 1),
            system_name,
            orbit
        );

        match payload {
            Payload::Cargo(hold) => {
                let loaded = match hold.building {
                    Some(kind) => format!("Building Aboard: {}", kind),
                    None if hold.cargo_points() < 0.01 => "Nothing loaded.".to_string(),
                    None => format!("Minerals loaded: {}", hold.minerals),
                };
                info.push_str(&format!(
                    "\n{}\nCapacity: 1 Building or {} tons of minerals.",
                    loaded, hold.capacity
                ));
            }
            Payload::Colony(hold) => {
                info.push_str(&format!("\nColonists {} / {}", hold.colonists, hold.capacity));
            }
            Payload::Survey => {
                info.push_str(&format!(
                    "\nPlayer Survey Speed: {} pts/day",
                    group_thousands(self.rates.survey_speed, 1)
                ));
                if let Some(order) = orders.front().filter(|o| o.action == OrderAction::Survey) {
                    if let Some(point) = self.galaxy.point(order.target) {
                        info.push_str(&format!(
                            "\nCurrently surveying {}, pts remaining: {}",
                            point.name, point.survey_points
                        ));
                    }
                }
            }
            Payload::Tanker => {}
        }
        info
    }

    pub fn galaxy_view(&self) -> GalaxyView {
        let systems = self
            .galaxy
            .systems
            .iter()
            .map(|system| SystemView {
                index: system.index,
                name: system.name.clone(),
                star: system.star.point.name.clone(),
                planets: system
                    .planets
                    .iter()
                    .enumerate()
                    .map(|(index, planet)| PlanetView {
                        index,
                        name: planet.point.name.clone(),
                        position: planet.position(),
                        mass: planet.mass,
                        habitable: planet.habitable,
                        surveyed: planet.point.surveyed,
                        survey_points: planet.point.survey_points,
                        colony: planet.colony,
                    })
                    .collect(),
                jump_points: system
                    .jump_points
                    .iter()
                    .map(|jp| JumpPointView {
                        index: jp.index,
                        name: jp.point.name.clone(),
                        position: jp.position,
                        surveyed: jp.point.surveyed,
                        survey_points: jp.point.survey_points,
                        link: jp.link,
                    })
                    .collect(),
            })
            .collect();
        GalaxyView { systems }
    }

    pub fn research_entries(&self) -> Vec<ResearchEntry> {
        self.catalog()
            .technologies
            .iter()
            .enumerate()
            .map(|(index, tech)| {
                let researched = self.research.is_researched(&tech.name);
                let unlocked = tech
                    .prerequisite
                    .as_deref()
                    .map_or(true, |p| self.research.is_researched(p));
                ResearchEntry {
                    index,
                    name: tech.name.clone(),
                    description: tech.full_description(),
                    cost: tech.cost,
                    remaining: self.research.progress.get(index).copied().unwrap_or(tech.cost),
                    prerequisite: tech.prerequisite.clone(),
                    researched,
                    available: unlocked && !researched,
                    current: self.research.current == Some(index),
                }
            })
            .collect()
    }
}

/// Format with comma thousands separators, e.g. `1,000,000` or `99.9`.
pub fn group_thousands(value: f64, decimals: usize) -> String {
    let text = format!("{:.*}", decimals, value.abs());
    let (whole, fraction) = match text.split_once('.') {
        Some((w, f)) => (w, Some(f)),
        None => (text.as_str(), None),
    };

    let mut grouped = String::with_capacity(text.len() + whole.len() / 3 + 1);
    if value < 0.0 && text.chars().any(|c| c != '0' && c != '.') {
        grouped.push('-');
    }
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    if let Some(fraction) = fraction {
        grouped.push('.');
        grouped.push_str(fraction);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::config::SessionConfig;
    use crate::notify::NullSink;
    use std::sync::Arc;

    fn session() -> PlayerSession {
        PlayerSession::new(
            SessionConfig::default().with_seed(3),
            Arc::new(Catalog::standard()),
            Box::new(NullSink),
        )
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(0.0, 0), "0");
        assert_eq!(group_thousands(999.0, 0), "999");
        assert_eq!(group_thousands(1_000_000.0, 0), "1,000,000");
        assert_eq!(group_thousands(12_345.678, 1), "12,345.7");
        assert_eq!(group_thousands(-4_200.0, 0), "-4,200");
        assert_eq!(group_thousands(100.0, 1), "100.0");
    }

    #[test]
    fn test_homeworld_summary() {
        let session = session();
        let summary = session.colony_summary(0).expect("homeworld");
        assert!(summary.homeworld);
        assert_eq!(summary.population, 50_000_000.0);
        assert_eq!(summary.happiness, 30.0);
        assert_eq!(summary.efficiency, 1.0);
        assert_eq!(summary.factory_eta, None);
        assert_eq!(summary.infrastructure.len(), 8);
        assert!(session.colony_summary(1).is_none());
    }

    #[test]
    fn test_ship_report_info() {
        let mut session = session();
        session.spawn_ship(0, ShipKind::Colony).expect("ship");
        let home = session.colonies[0].name.clone();
        let system = session.galaxy.systems[0].name.clone();

        let report = session.ship_report(0).expect("ship");
        assert_eq!(
            report.info,
            format!(
                "Name: Colony Ship (C-1)         Ship Type: Colony Ship\n\
                 Fuel: 0 / 1,000,000         Condition 100.0%\n\
                 System: {}, {}\n\
                 Colonists 0 / 100000",
                system, home
            )
        );
        assert!(report.orders.is_empty());
    }

    #[test]
    fn test_cargo_report_lists_orders() {
        let mut session = session();
        session.spawn_ship(0, ShipKind::Cargo).expect("ship");
        let planet = session.colonies[0].planet;
        let home = PointRef::Planet { system: 0, planet };
        session.add_order(0, PointRef::Star { system: 0 }, 0, 0).expect("travel");
        session.add_order(0, home, 16, 0).expect("load sorium");

        let report = session.ship_report(0).expect("ship");
        let name = &session.colonies[0].name;
        assert_eq!(
            report.orders,
            vec![
                format!("Go to {}", session.galaxy.point_name(PointRef::Star { system: 0 })),
                format!("Go to {}", name),
                format!("Load a mineral : Sorium at {}", name),
            ]
        );
        assert!(report.info.ends_with("Nothing loaded.\nCapacity: 1 Building or 100000 tons of minerals."));
    }

    #[test]
    fn test_planning_system_follows_jump() {
        let mut session = session();
        session.spawn_ship(0, ShipKind::Survey).expect("ship");
        assert_eq!(session.planning_system(0), Ok(0));

        let index = session.galaxy.systems[0]
            .jump_points
            .iter()
            .position(|jp| jp.will_connect)
            .expect("flagged jump point");
        let jp = PointRef::JumpPoint { system: 0, index };
        session.add_order(0, jp, 0, 0).expect("travel");
        assert_eq!(session.planning_system(0), Ok(0));

        let mut sink = NullSink;
        session.galaxy.survey(jp, &mut session.rng, &mut sink);
        assert_eq!(session.planning_system(0), Ok(1));
        assert_eq!(session.planning_system(4), Err(CommandError::NoSuchShip(4)));
    }

    #[test]
    fn test_galaxy_and_research_views() {
        let session = session();
        let view = session.galaxy_view();
        assert_eq!(view.systems.len(), 1);
        assert_eq!(view.systems[0].jump_points.len(), 8);
        assert!(view.systems[0].jump_points.iter().all(|jp| jp.link == JumpLink::Unknown));
        assert!(view.systems[0].planets.iter().any(|p| p.colony == Some(0)));

        let entries = session.research_entries();
        assert_eq!(entries.len(), session.catalog().technologies.len());
        assert!(entries.iter().any(|e| e.available));
        assert!(entries.iter().filter(|e| e.prerequisite.is_some()).all(|e| !e.available));
        assert!(serde_json::to_string(&view).is_ok());
    }
}
