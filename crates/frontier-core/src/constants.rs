//! Fixed game rules shared by every session.
//!
//! Tunable starting values (money, production rates, seed) live in
//! [`crate::config`]; everything here is a rule of the game itself.

// ── Clock ───────────────────────────────────────────────────────────────

/// Real-world seconds per in-game hour at time multiplier 1.
pub const SECONDS_PER_HOUR: f32 = 0.1;
/// Hours in an in-game day (hours run 0..=23).
pub const HOURS_PER_DAY: u32 = 24;
/// Days in an in-game month (days run 1..=30).
pub const DAYS_PER_MONTH: u32 = 30;

// ── Galaxy generation ───────────────────────────────────────────────────

/// Largest absolute X coordinate for objects inside a system.
pub const MAX_COORDINATE_X: f32 = 325.0;
/// Largest absolute Y coordinate for objects inside a system.
pub const MAX_COORDINATE_Y: f32 = 325.0;
/// Jump points generated per system.
pub const JUMP_POINTS_PER_SYSTEM: usize = 8;
/// Chance that surveying a plain jump point discovers a new system.
pub const NEW_SYSTEM_GENERATION_CHANCE: f32 = 0.2;
/// Chance for any generated planet to be habitable.
pub const HABITABLE_PLANET_GENERATION_CHANCE: f32 = 0.1;
/// Orbit radius the first planet's spacing is added to.
pub const FIRST_ORBIT_DISTANCE: f32 = 20.0;
/// Random jitter (+/-) applied to the spacing between planet orbits.
pub const ORBIT_SPACING_JITTER: f32 = 10.0;
/// Planet masses are drawn from `[0, MAX_PLANET_MASS)`.
pub const MAX_PLANET_MASS: f64 = 100.0;
/// Impact of planet mass on mineral richness.
pub const MINERAL_SIZE_FACTOR: f64 = 100_000.0;

// ── Surveying ───────────────────────────────────────────────────────────

/// Survey points needed to resolve a jump point.
pub const JUMP_POINT_SURVEY_POINTS: f64 = 200.0;
/// Survey points needed per unit of planet mass.
pub const PLANET_SURVEY_POINTS_PER_MASS: f64 = 30.0;

// ── Colonies ────────────────────────────────────────────────────────────

/// Population that generates one point of unhappiness.
pub const UNHAPPINESS_DIVISOR: f64 = 5_000_000.0;
/// Happiness at which the full productivity penalty applies.
pub const UNHAPPINESS_PENALTY: f64 = -20.0;
/// Understaffed colonies never drop below this efficiency.
pub const MIN_POPULATION_EFFICIENCY: f64 = 0.01;
/// Daily multiplicative population growth.
pub const DAILY_POP_GROWTH: f64 = 1.0004;
/// Flat daily population increase, lets tiny colonies regrow.
pub const DAILY_POP_GROWTH_FLAT: f64 = 1.0;
/// Daily money upkeep per building of any kind.
pub const PER_BUILDING_UPKEEP: i64 = 1;
/// Production ETAs above this many days are reported as unknown.
pub const MAX_ETA_DAYS: f64 = 999.0;
/// Starting population of the homeworld.
pub const HOMEWORLD_STARTING_POPULATION: f64 = 50_000_000.0;
/// Starting stockpile of every mineral on the homeworld.
pub const HOMEWORLD_STARTING_STOCKPILE: f64 = 80_000.0;

// ── Ships ───────────────────────────────────────────────────────────────

/// Fuel burned per real-world second while a ship is under way.
pub const FUEL_CONSUMPTION_PER_SECOND: f64 = 700.0;
/// Speed divisor for ships without fuel.
pub const EMPTY_FUEL_PENALTY: f32 = 5.0;
/// Condition lost per scaled second away from a colony.
pub const SHIP_DEGRADATION_PER_SECOND: f32 = 0.1;
/// Condition of a freshly built or freshly serviced ship.
pub const MAX_SHIP_CONDITION: f32 = 100.0;
/// A ship closer than this to its destination has arrived.
pub const ARRIVAL_DISTANCE: f32 = 3.0;
