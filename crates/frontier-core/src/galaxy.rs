//! The galaxy: every star system discovered so far.
//!
//! The jump point graph only grows. Surveying a jump point either appends a
//! new system linked back through it or marks it a permanent dead end.

use crate::components::{JumpLink, JumpPoint, Mineral, Planet, Point, PointRef, StarSystem, Vec2};
use crate::generation::{generate_home_system, generate_offshoot_system, Origin};
use crate::notify::NotificationSink;
use crate::constants::NEW_SYSTEM_GENERATION_CHANCE;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// What a completed survey revealed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurveyOutcome {
    AlreadySurveyed,
    /// The jump point led to a brand-new system at this index
    NewSystem(usize),
    DeadEnd,
    Minerals(Vec<Mineral>),
    NotSurveyable,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Galaxy {
    pub systems: Vec<StarSystem>,
    /// Every system name used so far
    pub names: HashSet<String>,
}

impl Galaxy {
    /// A galaxy holding only the home system. Returns the homeworld planet index.
    pub fn new(rng: &mut impl Rng) -> (Self, usize) {
        let mut names = HashSet::new();
        let (home, planet) = generate_home_system(&mut names, rng);
        (
            Self {
                systems: vec![home],
                names,
            },
            planet,
        )
    }

    pub fn len(&self) -> usize {
        self.systems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.systems.is_empty()
    }

    pub fn system(&self, index: usize) -> Option<&StarSystem> {
        self.systems.get(index)
    }

    pub fn planet(&self, system: usize, planet: usize) -> Option<&Planet> {
        self.systems.get(system)?.planets.get(planet)
    }

    pub fn planet_mut(&mut self, system: usize, planet: usize) -> Option<&mut Planet> {
        self.systems.get_mut(system)?.planets.get_mut(planet)
    }

    pub fn jump_point(&self, system: usize, index: usize) -> Option<&JumpPoint> {
        self.systems.get(system)?.jump_points.get(index)
    }

    /// Whether `point` names something that exists
    pub fn contains(&self, point: PointRef) -> bool {
        self.point(point).is_some()
    }

    pub fn point(&self, point: PointRef) -> Option<&Point> {
        let system = self.systems.get(point.system())?;
        match point {
            PointRef::Star { .. } => Some(&system.star.point),
            PointRef::Planet { planet, .. } => system.planets.get(planet).map(|p| &p.point),
            PointRef::JumpPoint { index, .. } => system.jump_points.get(index).map(|j| &j.point),
        }
    }

    pub fn point_mut(&mut self, point: PointRef) -> Option<&mut Point> {
        let system = self.systems.get_mut(point.system())?;
        match point {
            PointRef::Star { .. } => Some(&mut system.star.point),
            PointRef::Planet { planet, .. } => system.planets.get_mut(planet).map(|p| &mut p.point),
            PointRef::JumpPoint { index, .. } => system.jump_points.get_mut(index).map(|j| &mut j.point),
        }
    }

    /// Display name of a point, empty if it does not exist
    pub fn point_name(&self, point: PointRef) -> &str {
        self.point(point).map_or("", |p| p.name.as_str())
    }

    /// Current coordinates of a point within its system
    pub fn position(&self, point: PointRef) -> Option<Vec2> {
        match point {
            PointRef::Star { system } => self.systems.get(system).map(|_| Vec2::ZERO),
            PointRef::Planet { system, planet } => self.planet(system, planet).map(Planet::position),
            PointRef::JumpPoint { system, index } => self.jump_point(system, index).map(|j| j.position),
        }
    }

    /// Colony index on the planet at `point`, if any
    pub fn colony_at(&self, point: PointRef) -> Option<usize> {
        match point {
            PointRef::Planet { system, planet } => self.planet(system, planet)?.colony,
            _ => None,
        }
    }

    /// Move every planet along its orbit.
    pub fn advance_orbits(&mut self, delta_seconds: f32, time_mode: u32) {
        for planet in self.systems.iter_mut().flat_map(|s| s.planets.iter_mut()) {
            planet.advance_orbit(delta_seconds, time_mode);
        }
    }

    /// Resolve a finished survey of `point`.
    pub fn survey(
        &mut self,
        point: PointRef,
        rng: &mut impl Rng,
        sink: &mut dyn NotificationSink,
    ) -> SurveyOutcome {
        match point {
            PointRef::Star { .. } => {
                sink.notify("Cannot survey stars. No minerals are present on stars.");
                SurveyOutcome::NotSurveyable
            }
            PointRef::Planet { system, planet } => self.survey_planet(system, planet, sink),
            PointRef::JumpPoint { system, index } => self.survey_jump_point(system, index, rng, sink),
        }
    }

    fn survey_planet(&mut self, system: usize, planet: usize, sink: &mut dyn NotificationSink) -> SurveyOutcome {
        let Some(body) = self.planet_mut(system, planet) else {
            log::warn!("Survey of missing planet {} in system {}", planet, system);
            return SurveyOutcome::NotSurveyable;
        };

        body.point.surveyed = true;
        body.point.survey_points = 0.0;
        let present = body.minerals.present();

        if present.is_empty() {
            sink.notify(&format!("{} surveyed! No resources were found.", body.point.name));
        } else {
            let names: Vec<&str> = present.iter().map(|m| m.name()).collect();
            sink.notify(&format!("{} surveyed! Resources found: {}", body.point.name, names.join(", ")));
        }
        SurveyOutcome::Minerals(present)
    }

    fn survey_jump_point(
        &mut self,
        system: usize,
        index: usize,
        rng: &mut impl Rng,
        sink: &mut dyn NotificationSink,
    ) -> SurveyOutcome {
        let Some(jp) = self.jump_point(system, index) else {
            log::warn!("Survey of missing jump point {} in system {}", index, system);
            return SurveyOutcome::NotSurveyable;
        };
        if jp.point.surveyed {
            return SurveyOutcome::AlreadySurveyed;
        }

        let connects = jp.will_connect || rng.gen::<f32>() <= NEW_SYSTEM_GENERATION_CHANCE;
        let system_name = self.systems[system].name.clone();

        let outcome = if connects {
            sink.notify(&format!("Jump point surveyed in {}. New system was found.", system_name));

            let new_index = self.systems.len();
            let origin = Origin {
                system,
                system_name: &system_name,
                jump_point: index,
            };
            let new_system = generate_offshoot_system(new_index, origin, &mut self.names, rng);
            let new_name = new_system.name.clone();
            self.systems.push(new_system);

            let jp = &mut self.systems[system].jump_points[index];
            jp.link = JumpLink::Connected {
                system: new_index,
                jump_point: 0,
            };
            jp.point.name = JumpPoint::connected_name(index, &new_name);

            log::info!("New system {} discovered from {}", new_name, system_name);
            sink.notify(&format!("A new system has been discovered: {}", new_name));
            sink.refresh_view();
            SurveyOutcome::NewSystem(new_index)
        } else {
            sink.notify(&format!(
                "Jump point surveyed in {}. No new system was discovered.",
                system_name
            ));
            let jp = &mut self.systems[system].jump_points[index];
            jp.link = JumpLink::DeadEnd;
            jp.point.name = JumpPoint::dead_end_name(index);
            SurveyOutcome::DeadEnd
        };

        let jp = &mut self.systems[system].jump_points[index];
        jp.point.surveyed = true;
        jp.point.survey_points = 0.0;
        outcome
    }
}
