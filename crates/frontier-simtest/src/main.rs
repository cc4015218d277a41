//! Frontier Headless Simulation Harness
//!
//! Drives seeded sessions through the end-to-end scenarios and checks the
//! resulting state. Runs entirely in-process, no rendering or input.
//!
//! Usage:
//!   cargo run -p frontier-simtest
//!   cargo run -p frontier-simtest -- --verbose
//!   cargo run -p frontier-simtest -- --seed 7 --json

use frontier_core::prelude::*;
use serde::Serialize;
use std::sync::Arc;

// Driver order codes
const TRAVEL: u32 = 0;
const REFUEL: u32 = 1;
const SURVEY: u32 = 2;
const SORIUM_LOAD: u32 = 16;
const UNLOAD_MINERALS: u32 = 19;

/// Frame length used by every scenario (one in-game hour per frame at 1x)
const FRAME: f32 = 0.1;

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

impl TestResult {
    fn check(name: &str, passed: bool, detail: impl Into<String>) -> Self {
        TestResult {
            name: name.into(),
            passed,
            detail: detail.into(),
        }
    }
}

/// Final state dumped with `--json`
#[derive(Serialize)]
struct Snapshot {
    seed: u64,
    money: i64,
    date: (u32, u32, u32),
    galaxy: GalaxyView,
    colonies: Vec<ColonySummary>,
    ships: Vec<ShipReport>,
    research: Vec<ResearchEntry>,
}

struct Options {
    verbose: bool,
    json: bool,
    seed: u64,
}

fn parse_args() -> Options {
    let args: Vec<String> = std::env::args().collect();
    let seed = args
        .iter()
        .position(|a| a == "--seed")
        .and_then(|i| args.get(i + 1))
        .and_then(|s| s.parse().ok())
        .unwrap_or(42);
    Options {
        verbose: args.iter().any(|a| a == "--verbose"),
        json: args.iter().any(|a| a == "--json"),
        seed,
    }
}

fn main() {
    let options = parse_args();
    println!("=== Frontier Simulation Harness (seed {}) ===\n", options.seed);

    let mut results = Vec::new();

    // 1. Catalog validation
    results.extend(validate_catalog(options.verbose));

    // 2. New session defaults
    results.extend(validate_new_session(options.seed, options.verbose));

    // 3. Colony economy
    results.extend(validate_economy(options.seed, options.verbose));

    // 4. Cargo transfer
    results.extend(validate_cargo_transfer(options.seed, options.verbose));

    // 5. Surveying and exploration
    results.extend(validate_survey(options.seed, options.verbose));

    // 6. Ship wear
    results.extend(validate_wear(options.seed, options.verbose));

    // 7. Save/load
    results.extend(validate_persistence(options.seed, options.verbose));

    // 8. Long run soak
    let (soak_results, soak_session) = run_soak(options.seed, options.verbose);
    results.extend(soak_results);

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || options.verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!("\n=== RESULT: {}/{} passed, {} failed ===", passed, total, failed);

    if options.json {
        let snapshot = Snapshot {
            seed: options.seed,
            money: soak_session.money,
            date: (soak_session.clock.month, soak_session.clock.day, soak_session.clock.hour),
            galaxy: soak_session.galaxy_view(),
            colonies: soak_session.colony_summaries(),
            ships: soak_session.ship_reports(),
            research: soak_session.research_entries(),
        };
        match serde_json::to_string_pretty(&snapshot) {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("Failed to serialize snapshot: {}", e),
        }
    }

    if failed > 0 {
        std::process::exit(1);
    }
}

// ── Helpers ─────────────────────────────────────────────────────────────

fn new_session(seed: u64) -> (PlayerSession, MessageLog) {
    let log = MessageLog::new();
    let session = PlayerSession::new(
        SessionConfig::default().with_player("Harness").with_seed(seed),
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

/// Tick until the ship's queue empties. Returns the number of ticks, or
/// `None` if the ship vanished or the limit was hit.
fn run_orders(session: &mut PlayerSession, ship: usize, max_ticks: usize) -> Option<usize> {
    for ticks in 0..max_ticks {
        if session.ship_report(ship)?.orders.is_empty() {
            return Some(ticks);
        }
        session.tick(FRAME);
    }
    None
}

fn run_days(session: &mut PlayerSession, days: u32) {
    for _ in 0..days * 24 {
        session.on_hour_boundary();
    }
}

// ── 1. Catalog ──────────────────────────────────────────────────────────

fn validate_catalog(verbose: bool) -> Vec<TestResult> {
    println!("--- Catalog ---");
    let mut results = Vec::new();
    let catalog = Catalog::standard();

    results.push(TestResult::check(
        "catalog_buildables",
        catalog.buildables.len() == BuildingKind::ALL.len(),
        format!("{} buildables", catalog.buildables.len()),
    ));

    let missing_specs: Vec<_> = ShipKind::ALL
        .iter()
        .filter(|kind| catalog.ship(**kind).is_none())
        .collect();
    results.push(TestResult::check(
        "catalog_ship_specs",
        missing_specs.is_empty(),
        format!("missing specs: {:?}", missing_specs),
    ));

    let dangling: Vec<_> = catalog
        .technologies
        .iter()
        .filter_map(|t| t.prerequisite.as_deref())
        .filter(|p| catalog.technology_index(p).is_none())
        .collect();
    results.push(TestResult::check(
        "catalog_prerequisites_resolve",
        dangling.is_empty(),
        format!("{} technologies, {} dangling prerequisites", catalog.technologies.len(), dangling.len()),
    ));

    let round_trip = catalog.to_json().and_then(|json| Catalog::from_json(&json));
    results.push(match round_trip {
        Ok(parsed) => TestResult::check("catalog_json", parsed == catalog, "catalog survives JSON"),
        Err(e) => TestResult::check("catalog_json", false, format!("JSON error: {}", e)),
    });

    if verbose {
        for tech in &catalog.technologies {
            println!("    {}", tech.full_description());
        }
    }
    results
}

// ── 2. New session ──────────────────────────────────────────────────────

fn validate_new_session(seed: u64, verbose: bool) -> Vec<TestResult> {
    println!("--- New Session ---");
    let mut results = Vec::new();
    let (session, log) = new_session(seed);

    let Some(home) = session.colony_summary(0) else {
        results.push(TestResult::check("session_homeworld", false, "no homeworld colony"));
        return results;
    };
    if verbose {
        println!("    Homeworld {} in {}", home.name, session.galaxy.systems[0].name);
    }

    results.push(TestResult::check(
        "session_homeworld",
        home.homeworld && home.habitable && home.surveyed,
        format!("{} population {}", home.name, group_thousands(home.population, 0)),
    ));
    results.push(TestResult::check(
        "session_money",
        session.money == 10_000_000,
        format!("money {}", session.money),
    ));
    results.push(TestResult::check(
        "session_single_system",
        session.galaxy.len() == 1 && session.galaxy.systems[0].jump_points.len() == 8,
        format!("{} systems", session.galaxy.len()),
    ));
    results.push(TestResult::check(
        "session_announced",
        log.messages().iter().any(|m| m.starts_with("Home world established on")),
        format!("{} messages", log.len()),
    ));

    let (other, _) = new_session(seed);
    results.push(TestResult::check(
        "session_deterministic",
        other.galaxy_view() == session.galaxy_view(),
        "same seed generates the same galaxy",
    ));
    results
}

// ── 3. Economy ──────────────────────────────────────────────────────────

fn validate_economy(seed: u64, _verbose: bool) -> Vec<TestResult> {
    println!("--- Colony Economy ---");
    let mut results = Vec::new();
    let (mut session, log) = new_session(seed);
    log.drain();

    let outcome = session.select_building(0, 4);
    let home = session.colony_summary(0);
    results.push(TestResult::check(
        "economy_select_mine",
        outcome.is_ok()
            && session.money == 9_900_000
            && home.as_ref().and_then(|h| h.factory_eta) == Some(20),
        format!("money {}, eta {:?}", session.money, home.and_then(|h| h.factory_eta)),
    ));

    let (mut broke, broke_log) = new_session(seed);
    broke_log.drain();
    broke.money = 50;
    let _ = broke.select_building(0, 5);
    results.push(TestResult::check(
        "economy_insufficient_money",
        broke.money == 50 && broke_log.messages() == vec!["Insufficient money for Research Lab".to_string()],
        format!("{:?}", broke_log.messages()),
    ));

    let population = session.colonies[0].population;
    let sorium = session.colonies[0].stockpiles[Mineral::Sorium];
    run_days(&mut session, 20);
    let infra = session.colony_summary(0).map(|c| c.infrastructure).unwrap_or_default();
    let mines = infra
        .iter()
        .find(|(kind, _)| *kind == BuildingKind::Mine)
        .map(|(_, n)| *n)
        .unwrap_or(0);
    results.push(TestResult::check(
        "economy_mine_completes",
        mines == 1,
        format!("{} mines after 20 days", mines),
    ));
    results.push(TestResult::check(
        "economy_population_grows",
        session.colonies[0].population > population,
        format!("population {}", group_thousands(session.colonies[0].population, 0)),
    ));
    results.push(TestResult::check(
        "economy_mining",
        session.colonies[0].stockpiles[Mineral::Sorium] >= sorium,
        format!("sorium {}", group_thousands(session.colonies[0].stockpiles[Mineral::Sorium], 0)),
    ));
    results
}

// ── 4. Cargo transfer ───────────────────────────────────────────────────

fn validate_cargo_transfer(seed: u64, verbose: bool) -> Vec<TestResult> {
    println!("--- Cargo Transfer ---");
    let mut results = Vec::new();
    let (mut session, _) = new_session(seed);

    let home = home_ref(&session);
    let other = PointRef::Planet {
        system: 0,
        planet: if session.colonies[0].planet == 0 { 1 } else { 0 },
    };
    let target = match session.establish_colony(other) {
        Ok(Some(index)) => index,
        other => {
            results.push(TestResult::check("cargo_setup", false, format!("no second colony: {:?}", other)));
            return results;
        }
    };

    session.colonies[0].fuel = 1_000_000.0;
    let queued = session.spawn_ship(0, ShipKind::Cargo).and_then(|ship| {
        session.add_order(ship, home, REFUEL, 0)?;
        session.add_order(ship, home, SORIUM_LOAD, 0)?;
        session.add_order(ship, other, TRAVEL, 0)?;
        session.add_order(ship, other, UNLOAD_MINERALS, 0)?;
        Ok(ship)
    });
    let ship = match queued {
        Ok(ship) => ship,
        Err(e) => {
            results.push(TestResult::check("cargo_setup", false, e.to_string()));
            return results;
        }
    };

    let before = session.colonies[0].stockpiles[Mineral::Sorium] + session.colonies[target].stockpiles[Mineral::Sorium];
    session.set_time_mode(10);
    let ticks = run_orders(&mut session, ship, 5_000);
    let after = session.colonies[0].stockpiles[Mineral::Sorium] + session.colonies[target].stockpiles[Mineral::Sorium];

    results.push(TestResult::check(
        "cargo_orders_complete",
        ticks.is_some(),
        format!("finished in {:?} ticks", ticks),
    ));
    results.push(TestResult::check(
        "cargo_conserves_minerals",
        (before - after).abs() < 1e-6,
        format!("sorium before {} after {}", before, after),
    ));
    if let Some(report) = session.ship_report(ship) {
        if verbose {
            println!("{}", report.info);
        }
        results.push(TestResult::check(
            "cargo_fuel_non_negative",
            report.fuel >= 0.0,
            format!("fuel {:.1}", report.fuel),
        ));
    }
    results
}

// ── 5. Survey ───────────────────────────────────────────────────────────

fn validate_survey(seed: u64, verbose: bool) -> Vec<TestResult> {
    println!("--- Survey & Exploration ---");
    let mut results = Vec::new();
    let (mut session, log) = new_session(seed);

    let flagged = session.galaxy.systems[0].jump_points.iter().position(|jp| jp.will_connect);
    let Some(index) = flagged else {
        results.push(TestResult::check("survey_flagged_jump_point", false, "no flagged jump point"));
        return results;
    };
    let jump_point = PointRef::JumpPoint { system: 0, index };

    session.colonies[0].fuel = 1_000_000.0;
    let home = home_ref(&session);
    let queued = session.spawn_ship(0, ShipKind::Survey).and_then(|ship| {
        session.add_order(ship, home, REFUEL, 0)?;
        session.add_order(ship, jump_point, SURVEY, 0)?;
        Ok(ship)
    });
    let ship = match queued {
        Ok(ship) => ship,
        Err(e) => {
            results.push(TestResult::check("survey_setup", false, e.to_string()));
            return results;
        }
    };
    log.drain();

    session.set_time_mode(10);
    let ticks = run_orders(&mut session, ship, 5_000);
    results.push(TestResult::check(
        "survey_completes",
        ticks.is_some(),
        format!("finished in {:?} ticks", ticks),
    ));
    results.push(TestResult::check(
        "survey_discovers_system",
        session.galaxy.len() == 2,
        format!("{} systems known", session.galaxy.len()),
    ));

    let linked = session
        .galaxy
        .jump_point(0, index)
        .and_then(|jp| jp.destination())
        .and_then(|(system, entry)| session.galaxy.jump_point(system, entry))
        .and_then(|jp| jp.destination());
    results.push(TestResult::check(
        "survey_link_symmetric",
        linked == Some((0, index)),
        format!("back link {:?}", linked),
    ));

    let jumped = session
        .add_order(ship, jump_point, TRAVEL, 0)
        .ok()
        .and_then(|_| run_orders(&mut session, ship, 500))
        .and_then(|_| session.ship_report(ship))
        .map(|report| report.system);
    results.push(TestResult::check(
        "survey_jump_transit",
        jumped == Some(1),
        format!("ship in system {:?}", jumped),
    ));

    if verbose {
        for message in log.messages() {
            println!("    > {}", message);
        }
    }
    results
}

// ── 6. Wear ─────────────────────────────────────────────────────────────

fn validate_wear(seed: u64, _verbose: bool) -> Vec<TestResult> {
    println!("--- Ship Wear ---");
    let mut results = Vec::new();
    let (mut session, log) = new_session(seed);

    let queued = session
        .spawn_ship(0, ShipKind::Tanker)
        .and_then(|ship| session.add_order(ship, PointRef::Star { system: 0 }, TRAVEL, 0));
    if let Err(e) = queued {
        results.push(TestResult::check("wear_setup", false, e.to_string()));
        return results;
    }
    log.drain();

    session.set_time_mode(1_000);
    session.tick(1.0);
    let removed = session.tick(1.0);
    results.push(TestResult::check(
        "wear_destroys_ship",
        removed && session.ship_count() == 0,
        format!("{} ships left", session.ship_count()),
    ));
    results.push(TestResult::check(
        "wear_single_notice",
        log.len() == 1,
        format!("{:?}", log.messages()),
    ));
    results
}

// ── 7. Persistence ──────────────────────────────────────────────────────

fn validate_persistence(seed: u64, _verbose: bool) -> Vec<TestResult> {
    println!("--- Save/Load ---");
    let mut results = Vec::new();
    let (mut session, _) = new_session(seed);
    let _ = session.select_building(0, 1);
    let _ = session.spawn_ship(0, ShipKind::Colony);
    run_days(&mut session, 3);

    let mut buffer = Vec::new();
    if let Err(e) = session.save(&mut buffer) {
        results.push(TestResult::check("save_write", false, e.to_string()));
        return results;
    }
    results.push(TestResult::check(
        "save_write",
        !buffer.is_empty(),
        format!("{} bytes", buffer.len()),
    ));

    match PlayerSession::load(&buffer[..], Arc::new(Catalog::standard()), Box::new(NullSink)) {
        Ok(mut loaded) => {
            run_days(&mut session, 5);
            run_days(&mut loaded, 5);
            results.push(TestResult::check(
                "save_resumes_identically",
                loaded.colony_summaries() == session.colony_summaries()
                    && loaded.ship_reports() == session.ship_reports()
                    && loaded.money == session.money,
                "loaded game matches after 5 more days",
            ));
        }
        Err(e) => results.push(TestResult::check("save_resumes_identically", false, e.to_string())),
    }
    results
}

// ── 8. Soak ─────────────────────────────────────────────────────────────

fn run_soak(seed: u64, verbose: bool) -> (Vec<TestResult>, PlayerSession) {
    println!("--- 90 Day Soak ---");
    let mut results = Vec::new();
    let (mut session, log) = new_session(seed);

    let _ = session.select_building(0, 0);
    let _ = session.set_shipyard_project(0, Some(ShipKind::Survey));
    let _ = session.set_current_research(0);
    session.colonies[0].fuel = 5_000_000.0;

    let frames = 90 * 24;
    for _ in 0..frames {
        // Give any idle surveyor a fresh target
        for ship in 0..session.ship_count() {
            let Some(report) = session.ship_report(ship) else { continue };
            if report.kind != ShipKind::Survey || !report.orders.is_empty() {
                continue;
            }
            let target = session.galaxy.systems[report.system]
                .jump_points
                .iter()
                .position(|jp| !jp.point.surveyed)
                .map(|index| PointRef::JumpPoint {
                    system: report.system,
                    index,
                });
            if let Some(target) = target {
                let home = home_ref(&session);
                if report.system == 0 && report.fuel < report.fuel_capacity / 2.0 {
                    let _ = session.add_order(ship, home, REFUEL, 0);
                }
                let _ = session.add_order(ship, target, SURVEY, report.system);
            }
        }
        session.advance_frame(FRAME);
    }

    results.push(TestResult::check(
        "soak_calendar",
        session.clock.month == 4 && session.clock.day == 1,
        format!("month {} day {}", session.clock.month, session.clock.day),
    ));

    let negative_stock = session
        .colonies
        .iter()
        .any(|c| c.stockpiles.iter().any(|(_, amount)| amount < 0.0) || c.fuel < 0.0);
    results.push(TestResult::check(
        "soak_stockpiles_non_negative",
        !negative_stock,
        format!("{} colonies", session.colonies.len()),
    ));

    let reports = session.ship_reports();
    let bad_ships: Vec<_> = reports
        .iter()
        .filter(|r| r.fuel < 0.0 || r.condition < 0.0 || r.condition > 100.0)
        .map(|r| r.name.clone())
        .collect();
    results.push(TestResult::check(
        "soak_ship_bounds",
        bad_ships.is_empty(),
        format!("{} ships, out of bounds: {:?}", reports.len(), bad_ships),
    ));

    let links_ok = session.galaxy.systems.iter().enumerate().all(|(system, s)| {
        s.jump_points.iter().enumerate().all(|(index, jp)| match jp.destination() {
            Some((to, entry)) => {
                session.galaxy.jump_point(to, entry).and_then(|back| back.destination()) == Some((system, index))
            }
            None => true,
        })
    });
    results.push(TestResult::check(
        "soak_links_symmetric",
        links_ok,
        format!("{} systems explored", session.galaxy.len()),
    ));

    if verbose {
        println!(
            "    money {}, {} ships, {} notifications",
            session.money,
            reports.len(),
            log.len()
        );
    }
    (results, session)
}
