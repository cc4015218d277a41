//! Order system - executes each ship's active order once per frame
//!
//! Per ship and per tick:
//! 1. Skip ships already flagged for destruction
//! 2. Drop an active order whose target needs a colony but has none
//! 3. Wear the hull away from colonies, repair it when docked at one
//! 4. Run the front order (travel, refuel or a kind-specific action)
//!
//! Flagged ships stay in the world until [`sweep_destroyed`] runs at the end
//! of the frame.

use crate::components::{
    Colony, Hull, Navigation, Order, OrderAction, OrderQueue, Payload, PointKind, PointRef,
    ResourceVector, ShipKind,
};
use crate::config::EconomyRates;
use crate::constants::*;
use crate::galaxy::Galaxy;
use crate::notify::NotificationSink;
use hecs::{Entity, World};
use rand::Rng;

/// Everything outside the ship that an order may read or change
pub struct OrderContext<'a, R: Rng> {
    pub galaxy: &'a mut Galaxy,
    pub colonies: &'a mut [Colony],
    pub rates: &'a EconomyRates,
    pub time_mode: u32,
    /// Real seconds since the last frame
    pub delta_seconds: f32,
    pub rng: &'a mut R,
    pub sink: &'a mut dyn NotificationSink,
}

impl<R: Rng> OrderContext<'_, R> {
    /// Frame time scaled by the time multiplier
    fn scaled_delta(&self) -> f32 {
        self.delta_seconds * self.time_mode as f32
    }
}

/// Mutable view of one ship's components
pub struct ShipMut<'s> {
    pub hull: &'s mut Hull,
    pub nav: &'s mut Navigation,
    pub orders: &'s mut OrderQueue,
    pub payload: &'s mut Payload,
}

impl ShipMut<'_> {
    /// Complete the front order. With `change_orbit` the ship ends up
    /// orbiting the order's target.
    fn cycle(&mut self, change_orbit: bool) {
        if let Some(order) = self.orders.pop_front() {
            if change_orbit {
                self.nav.orbiting = Some(order.target);
            }
        }
    }
}

/// Run one frame of orders for every ship in roster order.
pub fn order_system<R: Rng>(world: &mut World, roster: &[Entity], ctx: &mut OrderContext<'_, R>) {
    for &entity in roster {
        let Ok((hull, nav, orders, payload)) =
            world.query_one_mut::<(&mut Hull, &mut Navigation, &mut OrderQueue, &mut Payload)>(entity)
        else {
            log::warn!("Ship {:?} is missing from the fleet world", entity);
            continue;
        };
        let mut ship = ShipMut {
            hull,
            nav,
            orders,
            payload,
        };
        update_ship(&mut ship, ctx);
    }
}

/// Remove flagged ships from the world and the roster.
///
/// Returns whether anything was removed.
pub fn sweep_destroyed(world: &mut World, roster: &mut Vec<Entity>) -> bool {
    let doomed: Vec<Entity> = roster
        .iter()
        .copied()
        .filter(|e| {
            world
                .get::<&Hull>(*e)
                .map(|hull| hull.flagged_for_destruction)
                .unwrap_or(false)
        })
        .collect();

    for entity in &doomed {
        let _ = world.despawn(*entity);
    }
    roster.retain(|e| !doomed.contains(e));
    !doomed.is_empty()
}

/// Advance a single ship by one frame.
pub fn update_ship<R: Rng>(ship: &mut ShipMut<'_>, ctx: &mut OrderContext<'_, R>) {
    if ship.hull.flagged_for_destruction {
        return;
    }

    verify_front_order(ship, ctx);
    if update_condition(ship, ctx) {
        return;
    }

    let Some(order) = ship.orders.front().copied() else {
        // Idle ships follow whatever they orbit
        if let Some(position) = ship.nav.orbiting.and_then(|p| ctx.galaxy.position(p)) {
            ship.nav.position = position;
        }
        return;
    };

    if order.target.system() != ship.nav.system {
        log::warn!(
            "{} has an order for system {} while in system {}, dropping it",
            ship.hull.name,
            order.target.system(),
            ship.nav.system
        );
        ship.cycle(false);
        return;
    }

    match order.action {
        OrderAction::Travel => travel(ship, order, ctx),
        OrderAction::Refuel => refuel(ship, order, ctx),
        OrderAction::Survey => survey(ship, order, ctx),
        OrderAction::DumpFuel => dump_fuel(ship, order, ctx),
        OrderAction::LoadColonists | OrderAction::UnloadColonists => colonists(ship, order, ctx),
        OrderAction::LoadBuilding(_)
        | OrderAction::UnloadBuilding
        | OrderAction::LoadMineral(_)
        | OrderAction::UnloadMinerals => cargo(ship, order, ctx),
    }
}

fn verify_front_order<R: Rng>(ship: &mut ShipMut<'_>, ctx: &OrderContext<'_, R>) {
    let Some(order) = ship.orders.front() else {
        return;
    };
    if order.action.requires_colony() && ctx.galaxy.colony_at(order.target).is_none() {
        log::debug!("{} skipping order without a colony at its target", ship.hull.name);
        ship.cycle(true);
    }
}

/// Returns true if the ship was lost this frame.
fn update_condition<R: Rng>(ship: &mut ShipMut<'_>, ctx: &mut OrderContext<'_, R>) -> bool {
    let docked_at_colony = ship
        .nav
        .orbiting
        .and_then(|p| ctx.galaxy.colony_at(p))
        .is_some();

    if docked_at_colony {
        ship.hull.condition = MAX_SHIP_CONDITION;
        return false;
    }

    let wear = SHIP_DEGRADATION_PER_SECOND * ctx.scaled_delta();
    ship.hull.condition = (ship.hull.condition - wear).max(0.0);

    if ship.hull.condition <= 0.0 {
        log::info!("Ship {} lost to wear", ship.hull.name);
        ctx.sink.notify(&format!(
            "{} condition has degraded to destruction. Ship was abandoned.",
            ship.hull.name
        ));
        ship.hull.flagged_for_destruction = true;
        return true;
    }
    false
}

fn travel<R: Rng>(ship: &mut ShipMut<'_>, order: Order, ctx: &mut OrderContext<'_, R>) {
    let Some(destination) = ctx.galaxy.position(order.target) else {
        log::warn!("{} ordered to a point that does not exist", ship.hull.name);
        ship.cycle(false);
        return;
    };

    if ship.nav.orbiting != Some(order.target) {
        let mut step = ctx.rates.ship_speed * ctx.scaled_delta();
        if ship.hull.fuel <= 0.0 || ship.hull.condition <= 0.0 {
            step /= EMPTY_FUEL_PENALTY;
        }
        ship.nav.position = ship.nav.position.move_towards(destination, step);

        // Burn is tied to real time, not the multiplier
        if ship.hull.fuel > 0.0 {
            ship.hull.fuel -= ctx.delta_seconds as f64 * FUEL_CONSUMPTION_PER_SECOND;
        }
        ship.hull.fuel = ship.hull.fuel.max(0.0);
    }

    let arrived = ship.nav.orbiting == Some(order.target)
        || ship.nav.position.distance(&destination) < ARRIVAL_DISTANCE;
    if !arrived {
        ship.nav.orbiting = None;
        return;
    }

    let PointRef::JumpPoint { system, index } = order.target else {
        ship.cycle(true);
        return;
    };
    let Some(jump_point) = ctx.galaxy.jump_point(system, index) else {
        ship.cycle(false);
        return;
    };

    if !jump_point.point.surveyed {
        if ship.hull.kind != ShipKind::Survey {
            log::error!("{} tried to go through an unsurveyed jump point", ship.hull.name);
        }
        ship.cycle(true);
        return;
    }

    let Some((dest_system, dest_index)) = jump_point.destination() else {
        // Dead end
        ship.cycle(true);
        return;
    };

    let exit = PointRef::JumpPoint {
        system: dest_system,
        index: dest_index,
    };
    let Some(exit_position) = ctx.galaxy.position(exit) else {
        log::error!("Jump point {:?} links to missing {:?}", order.target, exit);
        ship.cycle(true);
        return;
    };

    log::debug!("{} jumped from system {} to {}", ship.hull.name, system, dest_system);
    ship.nav.system = dest_system;
    ship.nav.orbiting = Some(exit);
    ship.nav.position = exit_position;
    ctx.sink.refresh_view();
    ship.cycle(false);
}

fn refuel<R: Rng>(ship: &mut ShipMut<'_>, order: Order, ctx: &mut OrderContext<'_, R>) {
    let anchor = *ship.nav.orbiting.get_or_insert(order.target);
    if anchor.kind() != PointKind::Planet {
        ship.cycle(true);
        return;
    }

    match colony_mut(ctx.galaxy, ctx.colonies, anchor) {
        Some(colony) => {
            let wanted = ship.hull.fuel_capacity - ship.hull.fuel;
            ship.hull.fuel += colony.refuel(wanted);
        }
        None => ctx.sink.notify(&format!(
            "No colony on {} for {} to refuel at!",
            ctx.galaxy.point_name(order.target),
            ship.hull.name
        )),
    }
    ship.cycle(true);
}

fn survey<R: Rng>(ship: &mut ShipMut<'_>, order: Order, ctx: &mut OrderContext<'_, R>) {
    let survey_rate = ctx.rates.survey_speed * ctx.scaled_delta() as f64;
    let Some(point) = ctx.galaxy.point_mut(order.target) else {
        ship.cycle(false);
        return;
    };

    if point.surveyed {
        point.survey_points = 0.0;
        ship.cycle(true);
        return;
    }

    point.survey_points -= survey_rate;
    if point.survey_points > 0.0 {
        return;
    }
    point.survey_points = 0.0;

    ctx.galaxy.survey(order.target, &mut *ctx.rng, &mut *ctx.sink);
    if let Some(colony) = colony_mut(ctx.galaxy, ctx.colonies, order.target) {
        colony.surveyed = true;
    }
    ship.cycle(true);
}

fn dump_fuel<R: Rng>(ship: &mut ShipMut<'_>, order: Order, ctx: &mut OrderContext<'_, R>) {
    let anchor = *ship.nav.orbiting.get_or_insert(order.target);
    if anchor.kind() == PointKind::Planet {
        match colony_mut(ctx.galaxy, ctx.colonies, anchor) {
            Some(colony) => {
                let half = ship.hull.fuel * 0.5;
                colony.unload_fuel(half);
                ship.hull.fuel -= half;
            }
            None => ctx.sink.notify(&format!(
                "No colony on {} for {} to unload fuel at!",
                ctx.galaxy.point_name(order.target),
                ship.hull.name
            )),
        }
    }
    ship.cycle(true);
}

fn colonists<R: Rng>(ship: &mut ShipMut<'_>, order: Order, ctx: &mut OrderContext<'_, R>) {
    let place = ctx.galaxy.point_name(order.target).to_string();
    let Some(colony) = colony_mut(ctx.galaxy, ctx.colonies, order.target) else {
        let verb = match order.action {
            OrderAction::UnloadColonists => "unload",
            _ => "load",
        };
        ctx.sink.notify(&format!(
            "No colony on {} for {} to {} colonists at!",
            place, ship.hull.name, verb
        ));
        ship.cycle(true);
        return;
    };

    match (&mut *ship.payload, order.action) {
        (Payload::Colony(hold), OrderAction::LoadColonists) => {
            let room = hold.capacity.saturating_sub(hold.colonists);
            hold.colonists += colony.load_colonists(room);
        }
        (Payload::Colony(hold), OrderAction::UnloadColonists) => {
            if colony.habitable {
                colony.unload_colonists(hold.colonists);
                hold.colonists = 0;
            } else {
                ctx.sink.notify(&format!("Cannot unload colonists on {} (unhabitable).", place));
            }
        }
        _ => log::error!("{} cannot carry colonists", ship.hull.name),
    }
    ship.cycle(true);
}

fn cargo<R: Rng>(ship: &mut ShipMut<'_>, order: Order, ctx: &mut OrderContext<'_, R>) {
    let Some(colony) = colony_mut(ctx.galaxy, ctx.colonies, order.target) else {
        ctx.sink.notify(&format!(
            "No colony on {} for {} to load/unload at!",
            ctx.galaxy.point_name(order.target),
            ship.hull.name
        ));
        ship.cycle(true);
        return;
    };

    let Payload::Cargo(hold) = &mut *ship.payload else {
        log::error!("{} has no cargo hold", ship.hull.name);
        ship.cycle(true);
        return;
    };

    match order.action {
        OrderAction::LoadBuilding(kind) => {
            // A building takes the whole hold
            let hold_empty = hold.building.is_none() && hold.minerals.is_empty();
            if hold_empty && colony.infrastructure[kind] > 0 {
                colony.change_building(kind, false);
                hold.building = Some(kind);
            }
        }
        OrderAction::UnloadBuilding => {
            if let Some(kind) = hold.building.take() {
                colony.change_building(kind, true);
            }
        }
        OrderAction::LoadMineral(mineral) => {
            let loaded = colony.load_minerals(hold.free_capacity(), mineral);
            hold.minerals[mineral] += loaded;
        }
        OrderAction::UnloadMinerals => {
            colony.unload_all_minerals(&hold.minerals);
            hold.minerals = ResourceVector::ZERO;
        }
        _ => {}
    }
    ship.cycle(true);
}

/// The colony on the planet at `point`, if any
fn colony_mut<'c>(galaxy: &Galaxy, colonies: &'c mut [Colony], point: PointRef) -> Option<&'c mut Colony> {
    let index = galaxy.colony_at(point)?;
    let colony = colonies.get_mut(index);
    if colony.is_none() {
        log::error!("Planet {:?} points at missing colony {}", point, index);
    }
    colony
}
