//! Systems - logic that operates on components

mod orders;
mod production;

pub use orders::*;
pub use production::*;
