//! Production system - project selection and the daily colony update

use crate::catalog::{Buildable, BuildingKind, Catalog};
use crate::components::{Colony, Mineral, Minerals, ResourceVector, ShipKind};
use crate::config::EconomyRates;
use crate::constants::{DAILY_POP_GROWTH, DAILY_POP_GROWTH_FLAT, PER_BUILDING_UPKEEP};
use crate::notify::NotificationSink;

/// Read-only inputs shared by every colony's daily update
#[derive(Debug, Clone, Copy)]
pub struct ProductionContext<'a> {
    pub catalog: &'a Catalog,
    pub rates: &'a EconomyRates,
}

/// What one colony produced in a day
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DailyReport {
    pub completed_building: Option<BuildingKind>,
    /// A ship the session must now spawn at the colony
    pub completed_ship: Option<ShipKind>,
    pub mined: ResourceVector,
    pub fuel_refined: f64,
    /// Net change in money (income minus upkeep)
    pub money_delta: i64,
}

/// Start a building project, paying for it up front.
///
/// Returns whether a new project was started. Refusals leave the colony and
/// the treasury untouched and emit one notification.
pub fn select_building(
    colony: &mut Colony,
    building: &Buildable,
    money: &mut i64,
    sink: &mut dyn NotificationSink,
) -> bool {
    if colony.factory_project == Some(building.kind) {
        return false;
    }

    if *money < building.money {
        sink.notify(&format!("Insufficient money for {}", building.name()));
        return false;
    }
    if !colony.stockpiles.is_sufficient(&building.required) {
        sink.notify(&format!("Insufficient resources for {}", building.name()));
        return false;
    }

    colony.stockpiles.deduct(&building.required);
    *money -= building.money;
    colony.factory_project = Some(building.kind);
    colony.remaining_factory_points = building.build_points;
    log::debug!("{} started building a {}", colony.name, building.name());
    true
}

/// Start (or with `None`, cancel) a ship project.
///
/// Minerals are paid at selection. Cancelling does not refund them.
pub fn select_ship_project(
    colony: &mut Colony,
    kind: Option<ShipKind>,
    catalog: &Catalog,
    sink: &mut dyn NotificationSink,
) -> bool {
    if colony.shipyard_project == kind {
        return false;
    }

    let Some(kind) = kind else {
        colony.shipyard_project = None;
        return true;
    };

    let Some(spec) = catalog.ship(kind) else {
        log::error!("No ship spec for {:?}", kind);
        return false;
    };

    if !colony.stockpiles.is_sufficient(&spec.cost) {
        sink.notify(&format!("Insufficient resources! Costs: {}", spec.cost));
        return false;
    }

    colony.stockpiles.deduct(&spec.cost);
    colony.shipyard_project = Some(kind);
    colony.remaining_shipyard_points = catalog.build_points_per_ship;
    true
}

/// Advance a colony by one day.
///
/// `reserve` is the planet's mineable reserve; mining draws from it.
pub fn colony_daily_update(
    colony: &mut Colony,
    reserve: &mut Minerals,
    ctx: ProductionContext<'_>,
    money: &mut i64,
    sink: &mut dyn NotificationSink,
) -> DailyReport {
    let mut report = DailyReport::default();

    // Population growth
    if colony.population > 0.0 {
        colony.population = colony.population * DAILY_POP_GROWTH + DAILY_POP_GROWTH_FLAT;
    }

    // Factory
    if let Some(kind) = colony.factory_project {
        colony.remaining_factory_points -= colony.factory_production(ctx.catalog, ctx.rates);
        if colony.remaining_factory_points <= 0.0 {
            log::info!("Finished construction of {} on {}", kind, colony.name);
            sink.notify(&format!("{} was constructed on {}", kind, colony.name));
            colony.infrastructure[kind] += 1;
            colony.remaining_factory_points = 0.0;
            colony.factory_project = None;
            report.completed_building = Some(kind);
        }
    }

    // Shipyard
    if let Some(kind) = colony.shipyard_project {
        colony.remaining_shipyard_points -= colony.shipyard_production(ctx.catalog, ctx.rates);
        if colony.remaining_shipyard_points <= 0.0 {
            log::info!("Finished construction of {:?} ship on {}", kind, colony.name);
            sink.notify(&format!("{} ship was constructed on {}", kind.short_name(), colony.name));
            colony.remaining_shipyard_points = 0.0;
            colony.shipyard_project = None;
            report.completed_ship = Some(kind);
        }
    }

    // Mining
    if colony.surveyed {
        let mined = reserve.mine_tick(colony.mining_production(ctx.catalog, ctx.rates));
        colony.stockpiles.add(&mined);
        report.mined = mined;
    }

    // Refining
    if colony.refinery_active {
        let refineries = colony.infrastructure[BuildingKind::FuelRefinery] as f64;
        let operating = colony.stockpiles[Mineral::Sorium].floor().min(refineries).max(0.0);
        colony.stockpiles[Mineral::Sorium] -= operating;
        report.fuel_refined = ctx.rates.refining_efficiency * operating;
        colony.fuel += report.fuel_refined;
    }

    // Treasury
    let income = colony.infrastructure[BuildingKind::FinancialCentre] as i64 * ctx.rates.money_per_financial_centre;
    let upkeep = colony.infrastructure.total() as i64 * PER_BUILDING_UPKEEP;
    report.money_delta = income - upkeep;
    *money += report.money_delta;

    report
}
