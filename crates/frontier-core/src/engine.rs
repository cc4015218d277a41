//! Player session - the root aggregate that owns one game and advances it
//!
//! The driver calls [`PlayerSession::advance_frame`] every frame. Continuous
//! work (orbits, ship orders) runs per frame; the economy runs once per
//! in-game day when the accumulated clock crosses midnight.

use hecs::{Entity, World};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use crate::catalog::Catalog;
use crate::components::*;
use crate::config::{EconomyRates, SessionConfig};
use crate::constants::{DAYS_PER_MONTH, HOURS_PER_DAY, SECONDS_PER_HOUR};
use crate::galaxy::Galaxy;
use crate::notify::NotificationSink;
use crate::persistence::{deserialize_fleet, load_session, save_session, serialize_fleet, SaveData, SaveError};
use crate::systems::*;

/// In-game calendar plus the time multiplier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameClock {
    pub month: u32,
    /// 1 - 30
    pub day: u32,
    /// 0 - 23
    pub hour: u32,
    /// Time multiplier; 0 pauses the game
    pub time_mode: u32,
    /// Scaled seconds not yet turned into an hour
    accumulator: f32,
}

impl Default for GameClock {
    fn default() -> Self {
        Self {
            month: 1,
            day: 1,
            hour: 0,
            time_mode: 1,
            accumulator: 0.0,
        }
    }
}

impl GameClock {
    /// Add a frame and return how many hour boundaries it crossed.
    pub fn accumulate(&mut self, delta_seconds: f32) -> u32 {
        if self.time_mode == 0 {
            return 0;
        }
        self.accumulator += delta_seconds.max(0.0) * self.time_mode as f32;
        let hours = (self.accumulator / SECONDS_PER_HOUR).floor();
        self.accumulator -= hours * SECONDS_PER_HOUR;
        hours as u32
    }

    /// Step one hour. Returns true when a new day started.
    pub fn advance_hour(&mut self) -> bool {
        self.hour += 1;
        if self.hour < HOURS_PER_DAY {
            return false;
        }
        self.hour = 0;
        self.day += 1;
        if self.day > DAYS_PER_MONTH {
            self.day = 1;
            self.month += 1;
        }
        true
    }
}

/// Research selection and progress, indexed like the catalog's technologies
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResearchState {
    pub current: Option<usize>,
    /// Research points still needed per technology
    pub progress: Vec<f64>,
    /// Names of researched technologies
    pub completed: Vec<String>,
}

impl ResearchState {
    pub fn new(catalog: &Catalog) -> Self {
        Self {
            current: None,
            progress: catalog.technologies.iter().map(|t| t.cost).collect(),
            completed: Vec::new(),
        }
    }

    pub fn is_researched(&self, name: &str) -> bool {
        self.completed.iter().any(|n| n == name)
    }
}

/// A driver command that referred to something that does not exist.
///
/// Player mistakes (no money, no colony at the target) are not errors; they
/// are reported through the notification sink.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandError {
    NoSuchColony(usize),
    NoSuchBuildable(usize),
    NoSuchShip(usize),
    NoSuchTechnology(usize),
    NoSuchPoint(PointRef),
    InvalidOrderCode { kind: ShipKind, code: u32 },
    SystemMismatch { target: PointRef, system: usize },
    MissingShipSpec(ShipKind),
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandError::NoSuchColony(i) => write!(f, "no colony with index {}", i),
            CommandError::NoSuchBuildable(i) => write!(f, "no buildable with index {}", i),
            CommandError::NoSuchShip(i) => write!(f, "no ship with index {}", i),
            CommandError::NoSuchTechnology(i) => write!(f, "no technology with index {}", i),
            CommandError::NoSuchPoint(p) => write!(f, "point {:?} does not exist", p),
            CommandError::InvalidOrderCode { kind, code } => {
                write!(f, "order code {} is not valid for a {}", code, kind.type_name())
            }
            CommandError::SystemMismatch { target, system } => {
                write!(f, "target {:?} is not in system {}", target, system)
            }
            CommandError::MissingShipSpec(kind) => write!(f, "catalog has no spec for {:?}", kind),
        }
    }
}

impl std::error::Error for CommandError {}

/// One player's game
pub struct PlayerSession {
    pub name: String,
    pub(crate) catalog: Arc<Catalog>,
    pub galaxy: Galaxy,
    pub colonies: Vec<Colony>,
    /// Ship entities; see `roster` for their driver-facing order
    pub(crate) fleet: World,
    pub(crate) roster: Vec<Entity>,
    pub rates: EconomyRates,
    pub money: i64,
    pub clock: GameClock,
    pub research: ResearchState,
    pub selected_colony: usize,
    /// Ships ever built, used for naming
    pub(crate) ships_built: u32,
    pub(crate) rng: ChaCha8Rng,
    pub(crate) sink: Box<dyn NotificationSink>,
}

impl PlayerSession {
    /// Start a new game seeded from `config.seed`.
    pub fn new(config: SessionConfig, catalog: Arc<Catalog>, sink: Box<dyn NotificationSink>) -> Self {
        let rng = ChaCha8Rng::seed_from_u64(config.seed);
        Self::with_rng(config, catalog, sink, rng)
    }

    /// Start a new game drawing from an existing random stream.
    pub fn with_rng(
        config: SessionConfig,
        catalog: Arc<Catalog>,
        mut sink: Box<dyn NotificationSink>,
        mut rng: ChaCha8Rng,
    ) -> Self {
        let (mut galaxy, home) = Galaxy::new(&mut rng);
        let home_ref = PointRef::Planet {
            system: 0,
            planet: home,
        };

        let home_name = galaxy.point_name(home_ref).to_string();
        let homeworld = Colony::homeworld(home_name.clone(), 0, home);
        if let Some(planet) = galaxy.planet_mut(0, home) {
            planet.colony = Some(0);
        }
        sink.notify(&format!("Home world established on {}", home_name));
        galaxy.survey(home_ref, &mut rng, sink.as_mut());
        log::info!("New session for {} with homeworld {}", config.player_name, home_name);

        Self {
            name: config.player_name,
            research: ResearchState::new(&catalog),
            catalog,
            galaxy,
            colonies: vec![homeworld],
            fleet: World::new(),
            roster: Vec::new(),
            rates: config.rates,
            money: config.starting_money,
            clock: GameClock::default(),
            selected_colony: 0,
            ships_built: 0,
            rng,
            sink,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Replace the notification sink, returning the old one.
    pub fn set_sink(&mut self, sink: Box<dyn NotificationSink>) -> Box<dyn NotificationSink> {
        std::mem::replace(&mut self.sink, sink)
    }

    // ----- Clock -------------------------------------------------------

    pub fn set_time_mode(&mut self, multiplier: u32) {
        self.clock.time_mode = multiplier;
    }

    pub fn is_paused(&self) -> bool {
        self.clock.time_mode == 0
    }

    /// Run one frame: continuous motion and orders, then any hour
    /// boundaries the frame crossed. Returns whether a ship was removed.
    pub fn advance_frame(&mut self, delta_seconds: f32) -> bool {
        if self.is_paused() {
            return false;
        }
        let removed = self.tick(delta_seconds);
        for _ in 0..self.clock.accumulate(delta_seconds) {
            self.on_hour_boundary();
        }
        removed
    }

    /// Move planets and execute ship orders, then sweep destroyed ships.
    pub fn tick(&mut self, delta_seconds: f32) -> bool {
        if self.is_paused() {
            return false;
        }
        self.galaxy.advance_orbits(delta_seconds, self.clock.time_mode);

        let mut ctx = OrderContext {
            galaxy: &mut self.galaxy,
            colonies: &mut self.colonies,
            rates: &self.rates,
            time_mode: self.clock.time_mode,
            delta_seconds,
            rng: &mut self.rng,
            sink: self.sink.as_mut(),
        };
        order_system(&mut self.fleet, &self.roster, &mut ctx);

        let removed = sweep_destroyed(&mut self.fleet, &mut self.roster);
        if removed {
            self.sink.refresh_view();
        }
        removed
    }

    /// Advance the calendar one hour, running the daily update at midnight.
    pub fn on_hour_boundary(&mut self) {
        if self.clock.advance_hour() {
            self.daily_update();
        }
    }

    /// Economy and research for one day.
    pub fn daily_update(&mut self) {
        let ctx = ProductionContext {
            catalog: self.catalog.as_ref(),
            rates: &self.rates,
        };

        let mut research_points = 0.0;
        let mut finished_ships = Vec::new();
        for (index, colony) in self.colonies.iter_mut().enumerate() {
            research_points += colony.research_production(ctx.catalog, ctx.rates);

            let Some(planet) = self.galaxy.planet_mut(colony.system, colony.planet) else {
                log::error!("Colony {} sits on a missing planet", colony.name);
                continue;
            };
            let report = colony_daily_update(colony, &mut planet.minerals, ctx, &mut self.money, self.sink.as_mut());
            if let Some(kind) = report.completed_ship {
                finished_ships.push((index, kind));
            }
        }

        for (colony, kind) in finished_ships {
            if let Err(e) = self.spawn_ship(colony, kind) {
                log::error!("Could not launch finished ship: {}", e);
            }
        }
        self.advance_research(research_points);
    }

    fn advance_research(&mut self, points: f64) {
        let Some(index) = self.research.current else {
            return;
        };
        let Some(tech) = self.catalog.technology(index) else {
            log::error!("Current research index {} is out of range", index);
            self.research.current = None;
            return;
        };
        if self.research.is_researched(&tech.name) {
            self.research.current = None;
            return;
        }
        let Some(progress) = self.research.progress.get_mut(index) else {
            log::error!("No research progress entry for {}", tech.name);
            return;
        };

        *progress -= points;
        if *progress > 0.0 {
            return;
        }
        *progress = 0.0;
        tech.effect.apply(tech.value, &mut self.rates, &mut self.money);
        self.research.completed.push(tech.name.clone());
        self.research.current = None;
        log::info!("Researched {}", tech.name);
        self.sink.notify(&format!("Research for {} completed.", tech.name));
    }

    // ----- Colonies ----------------------------------------------------

    pub fn colony(&self, index: usize) -> Option<&Colony> {
        self.colonies.get(index)
    }

    fn colony_mut(&mut self, index: usize) -> Result<&mut Colony, CommandError> {
        self.colonies.get_mut(index).ok_or_else(|| {
            log::warn!("Command for missing colony {}", index);
            CommandError::NoSuchColony(index)
        })
    }

    /// Start a building project from the catalog's buildable list.
    pub fn select_building(&mut self, colony: usize, buildable: usize) -> Result<(), CommandError> {
        let building = self
            .catalog
            .buildable(buildable)
            .ok_or(CommandError::NoSuchBuildable(buildable))?;
        let target = self.colonies.get_mut(colony).ok_or(CommandError::NoSuchColony(colony))?;
        select_building(target, building, &mut self.money, self.sink.as_mut());
        Ok(())
    }

    /// Start a ship project, or cancel the current one with `None`.
    pub fn set_shipyard_project(&mut self, colony: usize, kind: Option<ShipKind>) -> Result<(), CommandError> {
        let target = self.colonies.get_mut(colony).ok_or(CommandError::NoSuchColony(colony))?;
        select_ship_project(target, kind, &self.catalog, self.sink.as_mut());
        Ok(())
    }

    /// Flip the refinery switch. Returns the new state.
    pub fn toggle_refinery(&mut self, colony: usize) -> Result<bool, CommandError> {
        let colony = self.colony_mut(colony)?;
        colony.refinery_active = !colony.refinery_active;
        Ok(colony.refinery_active)
    }

    pub fn select_colony(&mut self, index: usize) -> Result<(), CommandError> {
        if index >= self.colonies.len() {
            return Err(CommandError::NoSuchColony(index));
        }
        self.selected_colony = index;
        Ok(())
    }

    /// Found an empty colony on a planet.
    ///
    /// Returns the colony index; an already colonized planet returns its
    /// existing colony.
    pub fn establish_colony(&mut self, point: PointRef) -> Result<Option<usize>, CommandError> {
        if !self.galaxy.contains(point) {
            return Err(CommandError::NoSuchPoint(point));
        }
        let PointRef::Planet { system, planet } = point else {
            self.sink.notify("Colonies can only be established on planets.");
            return Ok(None);
        };

        let index = self.colonies.len();
        let Some(body) = self.galaxy.planet_mut(system, planet) else {
            return Err(CommandError::NoSuchPoint(point));
        };
        if let Some(existing) = body.colony {
            return Ok(Some(existing));
        }

        body.colony = Some(index);
        let colony = Colony::new(body.point.name.clone(), system, planet, body.habitable, body.point.surveyed);
        self.sink.notify(&format!("A colony has been established on {}", colony.name));
        log::info!("Colony {} established on {}", index, colony.name);
        self.colonies.push(colony);
        Ok(Some(index))
    }

    // ----- Fleet -------------------------------------------------------

    pub fn ship_count(&self) -> usize {
        self.roster.len()
    }

    pub fn ship_entity(&self, index: usize) -> Result<Entity, CommandError> {
        self.roster.get(index).copied().ok_or_else(|| {
            log::warn!("Command for missing ship {}", index);
            CommandError::NoSuchShip(index)
        })
    }

    /// Launch a new ship orbiting a colony's planet. Returns its ship index.
    pub fn spawn_ship(&mut self, colony: usize, kind: ShipKind) -> Result<usize, CommandError> {
        let (system, planet) = {
            let c = self.colonies.get(colony).ok_or(CommandError::NoSuchColony(colony))?;
            (c.system, c.planet)
        };
        let spec = self.catalog.ship(kind).ok_or(CommandError::MissingShipSpec(kind))?;
        let at = PointRef::Planet { system, planet };
        let position = self.galaxy.position(at).ok_or(CommandError::NoSuchPoint(at))?;

        self.ships_built += 1;
        let hull = Hull::new(kind.ship_name(self.ships_built), spec);
        log::info!("Launched {} at {}", hull.name, self.galaxy.point_name(at));
        let nav = Navigation {
            system,
            orbiting: Some(at),
            position,
        };
        let entity = self.fleet.spawn((hull, nav, OrderQueue::default(), Payload::empty(spec)));
        self.roster.push(entity);
        Ok(self.roster.len() - 1)
    }

    /// Queue an order on a ship using the driver's numeric order code.
    pub fn add_order(&mut self, ship: usize, target: PointRef, code: u32, system: usize) -> Result<(), CommandError> {
        if target.system() != system {
            return Err(CommandError::SystemMismatch { target, system });
        }
        if !self.galaxy.contains(target) {
            return Err(CommandError::NoSuchPoint(target));
        }
        let entity = self.ship_entity(ship)?;

        let kind = self
            .fleet
            .get::<&Hull>(entity)
            .map(|hull| hull.kind)
            .map_err(|_| CommandError::NoSuchShip(ship))?;
        let action = kind
            .decode(code)
            .ok_or(CommandError::InvalidOrderCode { kind, code })?;

        let mut orders = self
            .fleet
            .get::<&mut OrderQueue>(entity)
            .map_err(|_| CommandError::NoSuchShip(ship))?;
        orders.push(Order { target, action, system });
        Ok(())
    }

    /// Remove the most recently queued order.
    pub fn delete_last_order(&mut self, ship: usize) -> Result<Option<Order>, CommandError> {
        let entity = self.ship_entity(ship)?;
        let mut orders = self
            .fleet
            .get::<&mut OrderQueue>(entity)
            .map_err(|_| CommandError::NoSuchShip(ship))?;
        Ok(orders.pop_back())
    }

    /// Flag a ship for removal at the end of the next frame.
    pub fn abandon_ship(&mut self, ship: usize) -> Result<(), CommandError> {
        let entity = self.ship_entity(ship)?;
        let mut hull = self
            .fleet
            .get::<&mut Hull>(entity)
            .map_err(|_| CommandError::NoSuchShip(ship))?;
        hull.flagged_for_destruction = true;
        log::info!("{} abandoned", hull.name);
        Ok(())
    }

    // ----- Research ----------------------------------------------------

    /// Pick the technology to research next.
    pub fn set_current_research(&mut self, index: usize) -> Result<(), CommandError> {
        let tech = self
            .catalog
            .technology(index)
            .ok_or(CommandError::NoSuchTechnology(index))?;

        if self.research.is_researched(&tech.name) {
            self.sink.notify(&format!("{} has already been researched.", tech.name));
            return Ok(());
        }
        if let Some(prerequisite) = &tech.prerequisite {
            if !self.research.is_researched(prerequisite) {
                self.sink
                    .notify(&format!("{} requires {} to be researched first.", tech.name, prerequisite));
                return Ok(());
            }
        }
        self.research.current = Some(index);
        Ok(())
    }

    // ----- Persistence -------------------------------------------------

    /// Save the session to a writer
    pub fn save<W: std::io::Write>(&self, writer: W) -> Result<(), SaveError> {
        let data = SaveData {
            player_name: self.name.clone(),
            galaxy: self.galaxy.clone(),
            colonies: self.colonies.clone(),
            ships: serialize_fleet(&self.fleet, &self.roster),
            rates: self.rates.clone(),
            money: self.money,
            clock: self.clock.clone(),
            research: self.research.clone(),
            selected_colony: self.selected_colony,
            ships_built: self.ships_built,
            rng: self.rng.clone(),
        };
        save_session(writer, &data)
    }

    /// Load a session saved against the same catalog
    pub fn load<R: std::io::Read>(
        reader: R,
        catalog: Arc<Catalog>,
        sink: Box<dyn NotificationSink>,
    ) -> Result<Self, SaveError> {
        let data = load_session(reader)?;
        if data.research.progress.len() != catalog.technologies.len() {
            return Err(SaveError::CatalogMismatch {
                expected: catalog.technologies.len(),
                found: data.research.progress.len(),
            });
        }

        let mut fleet = World::new();
        let roster = deserialize_fleet(&mut fleet, data.ships);
        log::info!("Loaded session for {} with {} ships", data.player_name, roster.len());

        Ok(Self {
            name: data.player_name,
            catalog,
            galaxy: data.galaxy,
            colonies: data.colonies,
            fleet,
            roster,
            rates: data.rates,
            money: data.money,
            clock: data.clock,
            research: data.research,
            selected_colony: data.selected_colony,
            ships_built: data.ships_built,
            rng: data.rng,
            sink,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::BuildingKind;
    use crate::notify::MessageLog;

    fn session() -> (PlayerSession, MessageLog) {
        let log = MessageLog::new();
        let session = PlayerSession::new(
            SessionConfig::default().with_seed(7),
            Arc::new(Catalog::standard()),
            Box::new(log.clone()),
        );
        (session, log)
    }

    fn run_days(session: &mut PlayerSession, days: u32) {
        for _ in 0..days * HOURS_PER_DAY {
            session.on_hour_boundary();
        }
    }

    #[test]
    fn test_new_session() {
        let (session, log) = session();
        let home = &session.colonies[0];
        assert_eq!(session.money, 10_000_000);
        assert_eq!(home.population, 50_000_000.0);
        assert_eq!(home.infrastructure[BuildingKind::AutomatedMine], 20);
        assert_eq!(home.infrastructure[BuildingKind::Factory], 10);
        assert_eq!(home.infrastructure[BuildingKind::ResearchLab], 10);
        assert_eq!(session.galaxy.len(), 1);
        assert!(session.galaxy.planet(0, home.planet).expect("home").point.surveyed);

        let messages = log.messages();
        assert_eq!(messages[0], format!("Home world established on {}", home.name));
        assert!(messages[1].starts_with(&format!("{} surveyed!", home.name)));
    }

    #[test]
    fn test_same_seed_same_galaxy() {
        let (a, _) = session();
        let (b, _) = session();
        assert_eq!(a.galaxy.systems[0].name, b.galaxy.systems[0].name);
        assert_eq!(a.colonies[0].planet, b.colonies[0].planet);
    }

    #[test]
    fn test_clock_rollover() {
        let mut clock = GameClock::default();
        for _ in 0..23 {
            assert!(!clock.advance_hour());
        }
        assert!(clock.advance_hour());
        assert_eq!((clock.month, clock.day, clock.hour), (1, 2, 0));

        clock.day = 30;
        clock.hour = 23;
        assert!(clock.advance_hour());
        assert_eq!((clock.month, clock.day), (2, 1));
    }

    #[test]
    fn test_accumulate_hours() {
        let mut clock = GameClock::default();
        assert_eq!(clock.accumulate(0.2), 2);
        assert_eq!(clock.accumulate(0.05), 0);
        assert_eq!(clock.accumulate(0.05), 1);

        clock.time_mode = 4;
        assert_eq!(clock.accumulate(0.1), 4);

        clock.time_mode = 0;
        assert_eq!(clock.accumulate(10.0), 0);
    }

    #[test]
    fn test_paused_session_does_nothing() {
        let (mut session, _) = session();
        session.set_time_mode(0);
        let before = session.galaxy.systems[0].planets[0].orbital_phase;

        assert!(!session.advance_frame(5.0));
        assert_eq!(session.clock.hour, 0);
        assert_eq!(session.galaxy.systems[0].planets[0].orbital_phase, before);
    }

    #[test]
    fn test_frames_drive_the_calendar() {
        let (mut session, _) = session();
        for _ in 0..24 {
            session.advance_frame(0.1);
        }
        assert_eq!((session.clock.day, session.clock.hour), (2, 0));
    }

    #[test]
    fn test_daily_economy_runs_at_midnight() {
        let (mut session, _) = session();
        let population = session.colonies[0].population;
        run_days(&mut session, 1);

        assert_eq!(session.colonies[0].population, population * 1.0004 + 1.0);
        // 10 financial centres at 5, 205 buildings of upkeep
        assert_eq!(session.money, 10_000_000 + 50 - 205);
    }

    #[test]
    fn test_select_building_and_complete() {
        let (mut session, log) = session();
        log.drain();
        session.select_building(0, 4).expect("mine");
        assert_eq!(session.money, 9_900_000);

        // 750 factory points per day against 15000
        run_days(&mut session, 20);
        assert_eq!(session.colonies[0].infrastructure[BuildingKind::Mine], 101);
        assert!(log.messages().iter().any(|m| m.starts_with("Mine was constructed on")));
    }

    #[test]
    fn test_bad_indices_are_errors() {
        let (mut session, log) = session();
        log.drain();
        assert_eq!(session.select_building(3, 0), Err(CommandError::NoSuchColony(3)));
        assert_eq!(session.select_building(0, 42), Err(CommandError::NoSuchBuildable(42)));
        assert_eq!(session.abandon_ship(0), Err(CommandError::NoSuchShip(0)));
        assert_eq!(session.set_current_research(500), Err(CommandError::NoSuchTechnology(500)));
        assert!(log.is_empty());
    }

    #[test]
    fn test_shipyard_launches_ship() {
        let (mut session, log) = session();
        session.set_shipyard_project(0, Some(ShipKind::Survey)).expect("colony");

        // 375 shipyard points per day against 10000
        run_days(&mut session, 27);
        assert_eq!(session.ship_count(), 1);
        assert!(log.messages().iter().any(|m| m.starts_with("Survey ship was constructed on")));

        let entity = session.ship_entity(0).expect("ship");
        let hull = session.fleet.get::<&Hull>(entity).expect("hull");
        assert_eq!(hull.name, "Surveyor (C-1)");
    }

    #[test]
    fn test_add_order_validates() {
        let (mut session, _) = session();
        session.spawn_ship(0, ShipKind::Tanker).expect("ship");
        let home = PointRef::Planet {
            system: 0,
            planet: session.colonies[0].planet,
        };

        assert_eq!(
            session.add_order(0, home, 3, 0),
            Err(CommandError::InvalidOrderCode { kind: ShipKind::Tanker, code: 3 })
        );
        assert_eq!(
            session.add_order(0, home, 2, 1),
            Err(CommandError::SystemMismatch { target: home, system: 1 })
        );
        session.add_order(0, home, 2, 0).expect("dump fuel");

        let entity = session.ship_entity(0).expect("ship");
        assert_eq!(session.fleet.get::<&OrderQueue>(entity).expect("orders").len(), 2);
        assert_eq!(session.delete_last_order(0).expect("ship").map(|o| o.action), Some(OrderAction::DumpFuel));
    }

    #[test]
    fn test_abandon_removes_on_next_frame() {
        let (mut session, log) = session();
        session.spawn_ship(0, ShipKind::Cargo).expect("ship");
        session.spawn_ship(0, ShipKind::Survey).expect("ship");
        session.abandon_ship(0).expect("ship");

        assert!(session.tick(0.01));
        assert_eq!(session.ship_count(), 1);
        assert_eq!(log.refreshes(), 1);
    }

    #[test]
    fn test_ship_lost_in_open_space() {
        let (mut session, log) = session();
        session.spawn_ship(0, ShipKind::Cargo).expect("ship");
        session.spawn_ship(0, ShipKind::Tanker).expect("ship");
        let entity = session.ship_entity(0).expect("ship");
        if let Ok(mut nav) = session.fleet.get::<&mut Navigation>(entity) {
            nav.orbiting = None;
        }
        if let Ok(mut hull) = session.fleet.get::<&mut Hull>(entity) {
            hull.condition = 0.001;
        }
        log.drain();

        assert!(session.tick(0.1));
        assert_eq!(session.ship_count(), 1);
        assert_eq!(
            log.messages(),
            vec!["Cargo Ship (C-1) condition has degraded to destruction. Ship was abandoned.".to_string()]
        );
        let survivor = session.ship_report(0).expect("tanker");
        assert_eq!(survivor.name, "Tanker (C-2)");
    }

    #[test]
    fn test_establish_colony() {
        let (mut session, log) = session();
        log.drain();
        let home = session.colonies[0].planet;
        let other = if home == 0 { 1 } else { 0 };

        let index = session
            .establish_colony(PointRef::Planet { system: 0, planet: other })
            .expect("planet");
        assert_eq!(index, Some(1));
        assert_eq!(session.colonies[1].population, 0.0);
        assert_eq!(session.galaxy.colony_at(PointRef::Planet { system: 0, planet: other }), Some(1));

        // Second attempt returns the same colony
        let again = session
            .establish_colony(PointRef::Planet { system: 0, planet: other })
            .expect("planet");
        assert_eq!(again, Some(1));
        assert_eq!(session.colonies.len(), 2);

        assert_eq!(session.establish_colony(PointRef::Star { system: 0 }), Ok(None));
        assert_eq!(log.len(), 2);
    }

    #[test]
    fn test_research_prerequisites_and_completion() {
        let (mut session, log) = session();
        log.drain();
        let catalog = Arc::clone(&session.catalog);
        let first = catalog
            .technologies
            .iter()
            .position(|t| t.prerequisite.is_none())
            .expect("root technology");
        let follow_up = catalog
            .technologies
            .iter()
            .position(|t| t.prerequisite.as_deref() == Some(catalog.technologies[first].name.as_str()))
            .expect("dependent technology");

        session.set_current_research(follow_up).expect("tech");
        assert_eq!(session.research.current, None);
        assert_eq!(log.len(), 1);

        session.set_current_research(first).expect("tech");
        assert_eq!(session.research.current, Some(first));

        let cost = catalog.technologies[first].cost;
        let daily = session.colonies[0].research_production(&catalog, &session.rates);
        let days = (cost / daily).ceil() as u32 + 1;
        run_days(&mut session, days);

        assert!(session.research.is_researched(&catalog.technologies[first].name));
        assert_eq!(session.research.current, None);
        assert_eq!(session.research.progress[first], 0.0);
        assert!(log
            .messages()
            .contains(&format!("Research for {} completed.", catalog.technologies[first].name)));

        session.set_current_research(first).expect("tech");
        assert_eq!(session.research.current, None);
    }
}
