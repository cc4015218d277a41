//! End-to-end scenarios driven through the public session API.
//!
//! Each test starts a seeded session, issues driver commands and advances
//! the clock, then checks the resulting state and notifications.

use frontier_core::prelude::*;
use std::sync::Arc;

// ── Helpers ────────────────────────────────────────────────────────────

const SORIUM_LOAD: u32 = 16;
const UNLOAD_MINERALS: u32 = 19;
const TRAVEL: u32 = 0;
const REFUEL: u32 = 1;
const SURVEY: u32 = 2;

fn new_session(seed: u64) -> (PlayerSession, MessageLog) {
    let log = MessageLog::new();
    let session = PlayerSession::new(
        SessionConfig::default().with_player("Tester").with_seed(seed),
        Arc::new(Catalog::standard()),
        Box::new(log.clone()),
    );
    (session, log)
}

fn home_ref(session: &PlayerSession) -> PointRef {
    PointRef::Planet {
        system: 0,
        planet: session.colonies[0].planet,
    }
}

/// Tick until the ship's queue is empty; panics if it never empties.
fn run_orders(session: &mut PlayerSession, ship: usize, delta: f32, max_ticks: usize) {
    for _ in 0..max_ticks {
        let report = session.ship_report(ship).expect("ship exists");
        if report.orders.is_empty() {
            return;
        }
        session.tick(delta);
    }
    panic!("orders did not finish in {} ticks", max_ticks);
}

fn run_days(session: &mut PlayerSession, days: u32) {
    for _ in 0..days * 24 {
        session.on_hour_boundary();
    }
}

// ── Scenario A: new session ────────────────────────────────────────────

#[test]
fn new_session_defaults() {
    let (session, log) = new_session(1);
    let home = session.colony_summary(0).expect("homeworld");

    assert_eq!(session.name, "Tester");
    assert_eq!(session.money, 10_000_000);
    assert_eq!(home.population, 50_000_000.0);
    let count = |kind| home.infrastructure.iter().find(|(k, _)| *k == kind).map(|(_, n)| *n);
    assert_eq!(count(BuildingKind::AutomatedMine), Some(20));
    assert_eq!(count(BuildingKind::Factory), Some(10));
    assert_eq!(count(BuildingKind::ResearchLab), Some(10));
    assert!(home.surveyed && home.habitable);
    assert_eq!(session.ship_count(), 0);
    assert!(log.messages()[0].starts_with("Home world established on"));
}

#[test]
fn same_seed_same_game() {
    let (mut a, _) = new_session(77);
    let (mut b, _) = new_session(77);
    for _ in 0..240 {
        a.advance_frame(0.1);
        b.advance_frame(0.1);
    }
    assert_eq!(a.galaxy_view(), b.galaxy_view());
    assert_eq!(a.colony_summaries(), b.colony_summaries());
    assert_eq!(a.money, b.money);
}

// ── Scenario B: building selection ─────────────────────────────────────

#[test]
fn select_mine_pays_up_front() {
    let (mut session, log) = new_session(2);
    log.drain();
    session.select_building(0, 4).expect("mine");

    let home = session.colony_summary(0).expect("homeworld");
    assert_eq!(session.money, 9_900_000);
    assert_eq!(home.stockpiles[Mineral::Duranium], 77_500.0);
    assert_eq!(home.stockpiles[Mineral::Corundium], 79_000.0);
    assert_eq!(home.factory_project, Some(BuildingKind::Mine));
    assert_eq!(home.remaining_factory_points, 15_000.0);
    assert_eq!(home.factory_eta, Some(20));
    assert!(log.is_empty());

    // Second selection of the same kind changes nothing
    session.select_building(0, 4).expect("mine");
    assert_eq!(session.money, 9_900_000);
    assert_eq!(session.colony_summary(0).expect("homeworld").stockpiles, home.stockpiles);
}

#[test]
fn insufficient_money_is_refused_with_one_message() {
    let (mut session, log) = new_session(2);
    log.drain();
    session.money = 50;
    let before = session.colony_summary(0).expect("homeworld");

    session.select_building(0, 5).expect("lab");
    assert_eq!(session.money, 50);
    assert_eq!(session.colony_summary(0).expect("homeworld"), before);
    assert_eq!(log.messages(), vec!["Insufficient money for Research Lab".to_string()]);
}

#[test]
fn population_grows_daily() {
    let (mut session, _) = new_session(3);
    let population = session.colonies[0].population;
    run_days(&mut session, 1);
    assert_eq!(session.colonies[0].population, population * 1.0004 + 1.0);
}

// ── Scenario C: cargo transfer conserves minerals ──────────────────────

#[test]
fn cargo_run_moves_sorium_between_colonies() {
    let (mut session, _) = new_session(4);
    let home = home_ref(&session);
    let other_planet = if session.colonies[0].planet == 0 { 1 } else { 0 };
    let other = PointRef::Planet {
        system: 0,
        planet: other_planet,
    };
    let target_colony = session.establish_colony(other).expect("planet").expect("colony");

    session.colonies[0].fuel = 1_000_000.0;
    let ship = session.spawn_ship(0, ShipKind::Cargo).expect("ship");
    session.add_order(ship, home, REFUEL, 0).expect("refuel");
    session.add_order(ship, home, SORIUM_LOAD, 0).expect("load");
    session.add_order(ship, other, TRAVEL, 0).expect("travel");
    session.add_order(ship, other, UNLOAD_MINERALS, 0).expect("unload");

    let home_before = session.colonies[0].stockpiles[Mineral::Sorium];
    let other_before = session.colonies[target_colony].stockpiles[Mineral::Sorium];

    session.set_time_mode(10);
    run_orders(&mut session, ship, 0.1, 5_000);

    let loaded = home_before - session.colonies[0].stockpiles[Mineral::Sorium];
    let delivered = session.colonies[target_colony].stockpiles[Mineral::Sorium] - other_before;
    assert_eq!(loaded, 80_000.0);
    assert_eq!(delivered, loaded);

    let report = session.ship_report(ship).expect("ship");
    assert_eq!(report.orbiting, Some(other));
    assert!(report.fuel >= 0.0);
    assert!(report.info.contains("Nothing loaded."));
}

// ── Scenario D: surveying a flagged jump point ─────────────────────────

#[test]
fn survey_flagged_jump_point_opens_new_system() {
    let (mut session, log) = new_session(5);
    let index = session.galaxy.systems[0]
        .jump_points
        .iter()
        .position(|jp| jp.will_connect)
        .expect("flagged jump point");
    let jump_point = PointRef::JumpPoint { system: 0, index };

    session.colonies[0].fuel = 1_000_000.0;
    let ship = session.spawn_ship(0, ShipKind::Survey).expect("ship");
    session.add_order(ship, home_ref(&session), REFUEL, 0).expect("refuel");
    session.add_order(ship, jump_point, SURVEY, 0).expect("survey");
    log.drain();

    session.set_time_mode(10);
    run_orders(&mut session, ship, 0.1, 5_000);

    assert_eq!(session.galaxy.len(), 2);
    let surveyed = session.galaxy.jump_point(0, index).expect("jump point");
    assert!(surveyed.point.surveyed);
    assert_eq!(surveyed.destination(), Some((1, 0)));

    let entry = session.galaxy.jump_point(1, 0).expect("entry point");
    assert!(entry.point.surveyed);
    assert_eq!(entry.destination(), Some((0, index)));
    assert_eq!(entry.point.name, format!("Jump Point #1 to {}", session.galaxy.systems[0].name));

    let new_name = &session.galaxy.systems[1].name;
    assert!(log.messages().contains(&format!("A new system has been discovered: {}", new_name)));
    assert!(log.refreshes() >= 1);

    // Travelling through now lands the ship in the new system
    session.add_order(ship, jump_point, TRAVEL, 0).expect("travel");
    assert_eq!(session.planning_system(ship), Ok(1));
    run_orders(&mut session, ship, 0.1, 100);
    let report = session.ship_report(ship).expect("ship");
    assert_eq!(report.system, 1);
    assert_eq!(report.orbiting, Some(PointRef::JumpPoint { system: 1, index: 0 }));
}

// ── Scenario E: wear destroys a ship ───────────────────────────────────

#[test]
fn worn_out_ship_is_removed_with_one_message() {
    let (mut session, log) = new_session(6);
    let ship = session.spawn_ship(0, ShipKind::Tanker).expect("ship");
    session.add_order(ship, PointRef::Star { system: 0 }, TRAVEL, 0).expect("travel");
    log.drain();

    // One tick to reach the star, one more wears the hull out
    session.set_time_mode(1_000);
    assert!(!session.tick(1.0));
    assert_eq!(session.ship_report(ship).expect("ship").orbiting, Some(PointRef::Star { system: 0 }));
    assert!(session.tick(1.0));

    assert_eq!(session.ship_count(), 0);
    assert_eq!(
        log.messages(),
        vec!["Tanker (C-1) condition has degraded to destruction. Ship was abandoned.".to_string()]
    );
    assert!(!session.tick(1.0));
}

// ── Persistence ────────────────────────────────────────────────────────

#[test]
fn saved_game_resumes() {
    let (mut session, _) = new_session(8);
    session.select_building(0, 1).expect("factory");
    session.spawn_ship(0, ShipKind::Colony).expect("ship");
    run_days(&mut session, 3);

    let mut buffer = Vec::new();
    session.save(&mut buffer).expect("save");
    let mut loaded = PlayerSession::load(&buffer[..], Arc::new(Catalog::standard()), Box::new(NullSink))
        .expect("load");

    run_days(&mut session, 5);
    run_days(&mut loaded, 5);
    assert_eq!(loaded.colony_summaries(), session.colony_summaries());
    assert_eq!(loaded.ship_reports(), session.ship_reports());
    assert_eq!(loaded.money, session.money);
}
