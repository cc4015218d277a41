//! Component definitions for the simulation.
//!
//! Components are pure data structs. Ships live as entities in the fleet
//! world; colonies and star systems are owned directly by the session.
//! Behavior lives in systems.

mod colony;
mod common;
mod minerals;
mod ship;
mod space;

pub use colony::*;
pub use common::*;
pub use minerals::*;
pub use ship::*;
pub use space::*;
