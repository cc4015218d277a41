//! Frontier Core - Space Colonization Simulation Engine
//!
//! A single-player 4X simulation core: procedurally generated star systems
//! linked by jump points, colonies with a daily economy, and a fleet of
//! ships that carry out queued orders.
//!
//! # Architecture
//!
//! - **Components**: Pure data (colonies, planets, jump points, ship parts)
//! - **Systems**: Logic that advances components (daily production, ship orders)
//! - **Fleet**: Ships are entities in a `hecs` world, one per ship, carrying
//!   `Hull`, `Navigation`, `OrderQueue` and `Payload` components
//! - **Session**: [`engine::PlayerSession`] owns everything and drives the clock
//!
//! Player-facing events go to a [`notify::NotificationSink`]; diagnostics go
//! to the `log` facade.
//!
//! # Example
//!
//! ```rust,no_run
//! use frontier_core::prelude::*;
//! use std::sync::Arc;
//!
//! let mut session = PlayerSession::new(
//!     SessionConfig::default().with_seed(42),
//!     Arc::new(Catalog::standard()),
//!     Box::new(|message: &str| println!("{}", message)),
//! );
//!
//! // Run simulation
//! loop {
//!     session.advance_frame(1.0 / 60.0); // 60 FPS
//! }
//! ```

pub mod catalog;
pub mod components;
pub mod config;
pub mod constants;
pub mod engine;
pub mod galaxy;
pub mod generation;
pub mod notify;
pub mod persistence;
pub mod queries;
pub mod systems;

/// Commonly used types for convenient importing
pub mod prelude {
    pub use crate::catalog::{BuildingKind, Catalog};
    pub use crate::components::*;
    pub use crate::config::{EconomyRates, SessionConfig};
    pub use crate::engine::{CommandError, PlayerSession};
    pub use crate::galaxy::Galaxy;
    pub use crate::notify::{MessageLog, NotificationSink, NullSink};
    pub use crate::queries::*;
}
