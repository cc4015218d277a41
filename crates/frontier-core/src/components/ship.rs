//! Spaceship components: Hull, Navigation, OrderQueue and the kind-specific Payload.
//!
//! A ship entity in the fleet world carries all four components.

use super::common::Vec2;
use super::minerals::{Mineral, ResourceVector, MINERAL_COUNT};
use super::space::PointRef;
use crate::catalog::{BuildingKind, ShipSpec};
use crate::constants::MAX_SHIP_CONDITION;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Number of building kinds a cargo ship can carry
const BUILDING_KINDS: u32 = BuildingKind::ALL.len() as u32;

/// First cargo order code after the building loads
const CARGO_UNLOAD_BUILDING: u32 = 2 + BUILDING_KINDS;
const CARGO_FIRST_MINERAL: u32 = CARGO_UNLOAD_BUILDING + 1;
const CARGO_UNLOAD_MINERALS: u32 = CARGO_FIRST_MINERAL + MINERAL_COUNT as u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShipKind {
    Cargo,
    Colony,
    Survey,
    Tanker,
}

impl ShipKind {
    pub const ALL: [ShipKind; 4] = [ShipKind::Cargo, ShipKind::Colony, ShipKind::Survey, ShipKind::Tanker];

    pub fn short_name(self) -> &'static str {
        match self {
            ShipKind::Cargo => "Cargo",
            ShipKind::Colony => "Colony",
            ShipKind::Survey => "Survey",
            ShipKind::Tanker => "Tanker",
        }
    }

    /// Type name shown in ship info
    pub fn type_name(self) -> &'static str {
        match self {
            ShipKind::Cargo => "Cargo Ship",
            ShipKind::Colony => "Colony Ship",
            ShipKind::Survey => "Survey Ship",
            ShipKind::Tanker => "Tanker Ship",
        }
    }

    /// Name given to the `serial`-th ship built in a session
    pub fn ship_name(self, serial: u32) -> String {
        let prefix = match self {
            ShipKind::Cargo => "Cargo Ship",
            ShipKind::Colony => "Colony Ship",
            ShipKind::Survey => "Surveyor",
            ShipKind::Tanker => "Tanker",
        };
        format!("{} (C-{})", prefix, serial)
    }

    /// Interpret a driver order code for this kind of ship.
    pub fn decode(self, code: u32) -> Option<OrderAction> {
        match code {
            0 => return Some(OrderAction::Travel),
            1 => return Some(OrderAction::Refuel),
            _ => {}
        }
        match self {
            ShipKind::Cargo => match code {
                c if c < CARGO_UNLOAD_BUILDING => {
                    BuildingKind::from_index((c - 2) as usize).map(OrderAction::LoadBuilding)
                }
                CARGO_UNLOAD_BUILDING => Some(OrderAction::UnloadBuilding),
                c if c < CARGO_UNLOAD_MINERALS => {
                    Mineral::from_index((c - CARGO_FIRST_MINERAL) as usize).map(OrderAction::LoadMineral)
                }
                CARGO_UNLOAD_MINERALS => Some(OrderAction::UnloadMinerals),
                _ => None,
            },
            ShipKind::Colony => match code {
                2 => Some(OrderAction::LoadColonists),
                3 => Some(OrderAction::UnloadColonists),
                _ => None,
            },
            ShipKind::Survey => (code == 2).then_some(OrderAction::Survey),
            ShipKind::Tanker => (code == 2).then_some(OrderAction::DumpFuel),
        }
    }

    /// Every order this kind understands, in code order
    pub fn actions(self) -> Vec<OrderAction> {
        (0..=CARGO_UNLOAD_MINERALS).filter_map(|code| self.decode(code)).collect()
    }
}

/// A decoded order type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderAction {
    Travel,
    Refuel,
    LoadBuilding(BuildingKind),
    UnloadBuilding,
    LoadMineral(Mineral),
    UnloadMinerals,
    LoadColonists,
    UnloadColonists,
    Survey,
    /// Hand half of the tanker's fuel to the colony
    DumpFuel,
}

impl OrderAction {
    /// Numeric order code, the inverse of [`ShipKind::decode`]
    pub fn code(self) -> u32 {
        match self {
            OrderAction::Travel => 0,
            OrderAction::Refuel => 1,
            OrderAction::LoadBuilding(kind) => 2 + kind.index() as u32,
            OrderAction::UnloadBuilding => CARGO_UNLOAD_BUILDING,
            OrderAction::LoadMineral(m) => CARGO_FIRST_MINERAL + m.index() as u32,
            OrderAction::UnloadMinerals => CARGO_UNLOAD_MINERALS,
            OrderAction::LoadColonists => 2,
            OrderAction::UnloadColonists => 3,
            OrderAction::Survey => 2,
            OrderAction::DumpFuel => 2,
        }
    }

    /// Whether the target must hold a colony for the order to make sense
    pub fn requires_colony(self) -> bool {
        !matches!(self, OrderAction::Travel | OrderAction::Refuel | OrderAction::Survey)
    }

    pub fn describe(self, place: &str) -> String {
        match self {
            OrderAction::Travel => format!("Go to {}", place),
            OrderAction::Refuel => format!("Refuel at {}", place),
            OrderAction::LoadBuilding(kind) => format!("Load a {} at {}", kind, place),
            OrderAction::UnloadBuilding => format!("Unload building at {}", place),
            OrderAction::LoadMineral(m) => format!("Load a mineral : {} at {}", m, place),
            OrderAction::UnloadMinerals => format!("Unload all minerals at {}", place),
            OrderAction::LoadColonists => format!("Load colonists at {}", place),
            OrderAction::UnloadColonists => format!("Unload colonists at {}", place),
            OrderAction::Survey => format!("Survey {}", place),
            OrderAction::DumpFuel => format!("Unload 50% of Fuel at {}", place),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub target: PointRef,
    pub action: OrderAction,
    /// System the order was issued for
    pub system: usize,
}

impl Order {
    pub fn new(target: PointRef, action: OrderAction) -> Self {
        Self {
            target,
            action,
            system: target.system(),
        }
    }
}

/// Hull component - identity, fuel and wear of a ship
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hull {
    pub name: String,
    pub kind: ShipKind,
    pub fuel: f64,
    pub fuel_capacity: f64,
    /// Condition percentage (0 - 100)
    pub condition: f32,
    /// Set once, when condition hits 0 or the ship is abandoned
    pub flagged_for_destruction: bool,
}

impl Hull {
    /// A freshly built ship. Tanks start empty; the first order is usually a refuel.
    pub fn new(name: impl Into<String>, spec: &ShipSpec) -> Self {
        Self {
            name: name.into(),
            kind: spec.kind,
            fuel: 0.0,
            fuel_capacity: spec.fuel_capacity,
            condition: MAX_SHIP_CONDITION,
            flagged_for_destruction: false,
        }
    }
}

/// Navigation component - where a ship is
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Navigation {
    pub system: usize,
    /// None while in open space
    pub orbiting: Option<PointRef>,
    pub position: Vec2,
}

/// Pending orders; the front order is the active one
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderQueue(pub VecDeque<Order>);

impl OrderQueue {
    /// Queue an order, inserting a travel leg first when the ship would not
    /// already be at the target.
    pub fn push(&mut self, order: Order) {
        if order.action != OrderAction::Travel {
            let already_there = self.0.back().map_or(false, |last| last.target == order.target);
            if !already_there {
                self.0.push_back(Order {
                    action: OrderAction::Travel,
                    ..order
                });
            }
        }
        self.0.push_back(order);
    }

    pub fn front(&self) -> Option<&Order> {
        self.0.front()
    }

    pub fn pop_front(&mut self) -> Option<Order> {
        self.0.pop_front()
    }

    pub fn pop_back(&mut self) -> Option<Order> {
        self.0.pop_back()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Order> {
        self.0.iter()
    }
}

/// Mineral hold of a cargo ship. Holds one building or minerals, never both.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CargoHold {
    pub minerals: ResourceVector,
    pub building: Option<BuildingKind>,
    pub capacity: f64,
}

impl CargoHold {
    /// Used capacity; a building fills the whole hold
    pub fn cargo_points(&self) -> f64 {
        match self.building {
            Some(_) => self.capacity,
            None => self.minerals.0.iter().map(|m| m.ceil()).sum(),
        }
    }

    pub fn free_capacity(&self) -> f64 {
        (self.capacity - self.cargo_points()).max(0.0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ColonistHold {
    pub colonists: u64,
    pub capacity: u64,
}

/// Payload component - the kind-specific state of a ship
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Payload {
    Cargo(CargoHold),
    Colony(ColonistHold),
    Survey,
    Tanker,
}

impl Payload {
    pub fn empty(spec: &ShipSpec) -> Self {
        match spec.kind {
            ShipKind::Cargo => Payload::Cargo(CargoHold {
                capacity: spec.hold_capacity,
                ..Default::default()
            }),
            ShipKind::Colony => Payload::Colony(ColonistHold {
                colonists: 0,
                capacity: spec.hold_capacity as u64,
            }),
            ShipKind::Survey => Payload::Survey,
            ShipKind::Tanker => Payload::Tanker,
        }
    }
}
