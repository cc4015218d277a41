//! Star systems and the surveyable points inside them.

use super::common::Vec2;
use super::minerals::Minerals;
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;

/// Shared identity and survey state of anything a ship can fly to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub name: String,
    pub surveyed: bool,
    /// Remaining survey effort before the point resolves
    pub survey_points: f64,
}

impl Point {
    pub fn new(name: impl Into<String>, survey_points: f64) -> Self {
        Self {
            name: name.into(),
            surveyed: false,
            survey_points,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PointKind {
    Star,
    Planet,
    JumpPoint,
}

/// Stable address of a point in the galaxy.
///
/// Orders and orbit targets hold these instead of references, so a ship
/// never keeps a borrow into the galaxy between ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PointRef {
    Star { system: usize },
    Planet { system: usize, planet: usize },
    JumpPoint { system: usize, index: usize },
}

impl PointRef {
    pub fn system(&self) -> usize {
        match *self {
            PointRef::Star { system }
            | PointRef::Planet { system, .. }
            | PointRef::JumpPoint { system, .. } => system,
        }
    }

    pub fn kind(&self) -> PointKind {
        match self {
            PointRef::Star { .. } => PointKind::Star,
            PointRef::Planet { .. } => PointKind::Planet,
            PointRef::JumpPoint { .. } => PointKind::JumpPoint,
        }
    }
}

/// The root body of a system, fixed at the origin
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Star {
    pub point: Point,
    pub mass: f64,
}

/// A body orbiting the system's star
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Planet {
    pub point: Point,
    pub mass: f64,
    pub orbit_distance: f32,
    /// Slows the orbit; larger is slower (1 - 5)
    pub orbital_factor: f32,
    /// Position along the orbit in [0, 1)
    pub orbital_phase: f32,
    pub minerals: Minerals,
    pub habitable: bool,
    /// Index into the session's colony list
    pub colony: Option<usize>,
}

impl Planet {
    pub fn position(&self) -> Vec2 {
        let angle = TAU * self.orbital_phase;
        Vec2::new(
            self.orbit_distance * angle.sin(),
            self.orbit_distance * angle.cos(),
        )
    }

    /// Advance along the orbit by one frame.
    pub fn advance_orbit(&mut self, delta_seconds: f32, time_mode: u32) {
        let period = self.orbital_factor * self.orbit_distance;
        if period <= 0.0 {
            return;
        }
        self.orbital_phase += delta_seconds / period * time_mode as f32 / 2.0;
        self.orbital_phase = self.orbital_phase.rem_euclid(1.0);
    }
}

/// Survey outcome of a jump point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JumpLink {
    /// Not surveyed yet
    Unknown,
    /// Surveyed, leads nowhere
    DeadEnd,
    Connected { system: usize, jump_point: usize },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JumpPoint {
    pub point: Point,
    /// Position within the system's jump point list
    pub index: usize,
    pub position: Vec2,
    /// Guarantees a new system when surveyed
    pub will_connect: bool,
    pub link: JumpLink,
}

impl JumpPoint {
    pub fn unsurveyed_name(index: usize) -> String {
        format!("Jump Point #{} (UNSURVEYED)", index + 1)
    }

    pub fn connected_name(index: usize, system_name: &str) -> String {
        format!("Jump Point #{} to {}", index + 1, system_name)
    }

    pub fn dead_end_name(index: usize) -> String {
        format!("Jump Point #{} (empty)", index + 1)
    }

    pub fn destination(&self) -> Option<(usize, usize)> {
        match self.link {
            JumpLink::Connected { system, jump_point } => Some((system, jump_point)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StarSystem {
    /// Stable index in the galaxy
    pub index: usize,
    pub name: String,
    pub star: Star,
    pub planets: Vec<Planet>,
    pub jump_points: Vec<JumpPoint>,
}

impl StarSystem {
    /// Index of the jump point leading to `system`, if any
    pub fn jump_point_to(&self, system: usize) -> Option<usize> {
        self.jump_points
            .iter()
            .position(|jp| matches!(jp.link, JumpLink::Connected { system: s, .. } if s == system))
    }
}
