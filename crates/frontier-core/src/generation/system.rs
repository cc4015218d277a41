//! Star system generation - the home system and offshoots found through jump points

use crate::components::{
    JumpLink, JumpPoint, Minerals, Planet, Point, Star, StarSystem, Vec2,
};
use crate::constants::*;
use rand::Rng;
use std::collections::HashSet;

use super::names::{generate_system_name, planet_name};

/// The jump point a new system was discovered through
#[derive(Debug, Clone)]
pub struct Origin<'a> {
    pub system: usize,
    pub system_name: &'a str,
    pub jump_point: usize,
}

/// Generate the starting system (always index 0).
///
/// Returns the system and the index of its guaranteed habitable planet,
/// which carries homeworld-grade minerals.
pub fn generate_home_system(used_names: &mut HashSet<String>, rng: &mut impl Rng) -> (StarSystem, usize) {
    let name = generate_system_name(used_names, rng);
    let num_planets = rng.gen_range(6..=7);
    let home = rng.gen_range(0..num_planets);

    let planets = generate_planets(&name, num_planets, Some(home), rng);
    let jump_points = generate_jump_points(None, rng);

    log::debug!("Generated home system {} with {} planets, homeworld #{}", name, num_planets, home + 1);

    let system = StarSystem {
        index: 0,
        star: make_star(&name),
        name,
        planets,
        jump_points,
    };
    (system, home)
}

/// Generate a new system reached from `origin`.
///
/// Jump point 0 of the new system is pre-surveyed and links back to the
/// origin; the caller is responsible for linking the origin forward.
pub fn generate_offshoot_system(
    index: usize,
    origin: Origin<'_>,
    used_names: &mut HashSet<String>,
    rng: &mut impl Rng,
) -> StarSystem {
    let name = generate_system_name(used_names, rng);
    let num_planets = rng.gen_range(1..=7);

    let planets = generate_planets(&name, num_planets, None, rng);
    let jump_points = generate_jump_points(Some(&origin), rng);

    log::debug!("Generated system {} (#{}) from {}", name, index, origin.system_name);

    StarSystem {
        index,
        star: make_star(&name),
        name,
        planets,
        jump_points,
    }
}

fn make_star(system_name: &str) -> Star {
    Star {
        point: Point::new(system_name, 0.0),
        mass: 0.0,
    }
}

fn generate_planets(
    system_name: &str,
    count: usize,
    guaranteed_habitable: Option<usize>,
    rng: &mut impl Rng,
) -> Vec<Planet> {
    let spacing = MAX_COORDINATE_X / count as f32;
    let mut orbit_distance = FIRST_ORBIT_DISTANCE;

    (0..count)
        .map(|i| {
            orbit_distance += rng.gen_range(spacing - ORBIT_SPACING_JITTER..spacing + ORBIT_SPACING_JITTER);
            let mass = rng.gen_range(0.0..MAX_PLANET_MASS);
            let homeworld = guaranteed_habitable == Some(i);
            let orbital_factor = rng.gen_range(1.0..5.0);
            let orbital_phase = rng.gen_range(0.0..1.0);
            let minerals = Minerals::randomized(mass, homeworld, rng);
            let habitable = homeworld || rng.gen::<f32>() < HABITABLE_PLANET_GENERATION_CHANCE;

            Planet {
                point: Point::new(planet_name(system_name, i), mass * PLANET_SURVEY_POINTS_PER_MASS),
                mass,
                orbit_distance,
                orbital_factor,
                orbital_phase,
                minerals,
                habitable,
                colony: None,
            }
        })
        .collect()
}

fn generate_jump_points(origin: Option<&Origin<'_>>, rng: &mut impl Rng) -> Vec<JumpPoint> {
    let guaranteed = rng.gen_range(1..JUMP_POINTS_PER_SYSTEM - 1);

    (0..JUMP_POINTS_PER_SYSTEM)
        .map(|i| {
            let position = Vec2::new(
                rng.gen_range(-MAX_COORDINATE_X..=MAX_COORDINATE_X),
                rng.gen_range(-MAX_COORDINATE_Y..=MAX_COORDINATE_Y),
            );

            match origin {
                Some(origin) if i == 0 => JumpPoint {
                    point: Point {
                        name: JumpPoint::connected_name(i, origin.system_name),
                        surveyed: true,
                        survey_points: 0.0,
                    },
                    index: i,
                    position,
                    will_connect: false,
                    link: JumpLink::Connected {
                        system: origin.system,
                        jump_point: origin.jump_point,
                    },
                },
                _ => JumpPoint {
                    point: Point::new(JumpPoint::unsurveyed_name(i), JUMP_POINT_SURVEY_POINTS),
                    index: i,
                    position,
                    will_connect: i == guaranteed,
                    link: JumpLink::Unknown,
                },
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_generate_home_system() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let mut names = HashSet::new();
        let (system, home) = generate_home_system(&mut names, &mut rng);

        assert_eq!(system.index, 0);
        assert!((6..=7).contains(&system.planets.len()));
        assert!(home < system.planets.len());
        assert!(system.planets[home].habitable);
        assert_eq!(system.jump_points.len(), JUMP_POINTS_PER_SYSTEM);
        assert!(names.contains(&system.name));
        assert_eq!(system.star.point.name, system.name);
    }

    #[test]
    fn test_orbits_increase_outward() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let mut names = HashSet::new();
        for _ in 0..20 {
            let (system, _) = generate_home_system(&mut names, &mut rng);
            for pair in system.planets.windows(2) {
                assert!(pair[1].orbit_distance > pair[0].orbit_distance);
            }
            for planet in &system.planets {
                assert!(planet.mass >= 0.0 && planet.mass < MAX_PLANET_MASS);
                assert_eq!(planet.point.survey_points, planet.mass * PLANET_SURVEY_POINTS_PER_MASS);
            }
        }
    }

    #[test]
    fn test_exactly_one_guaranteed_connection() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut names = HashSet::new();
        for _ in 0..20 {
            let (system, _) = generate_home_system(&mut names, &mut rng);
            let flagged: Vec<usize> = system
                .jump_points
                .iter()
                .filter(|jp| jp.will_connect)
                .map(|jp| jp.index)
                .collect();
            assert_eq!(flagged.len(), 1);
            assert!(flagged[0] >= 1 && flagged[0] < JUMP_POINTS_PER_SYSTEM - 1);
        }
    }

    #[test]
    fn test_offshoot_links_back() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let mut names = HashSet::new();
        let (home, _) = generate_home_system(&mut names, &mut rng);
        let origin = Origin {
            system: 0,
            system_name: &home.name,
            jump_point: 4,
        };
        let system = generate_offshoot_system(1, origin, &mut names, &mut rng);

        assert_eq!(system.index, 1);
        assert!((1..=7).contains(&system.planets.len()));
        assert_ne!(system.name, home.name);

        let entry = &system.jump_points[0];
        assert!(entry.point.surveyed);
        assert!(!entry.will_connect);
        assert_eq!(entry.link, JumpLink::Connected { system: 0, jump_point: 4 });
        assert_eq!(entry.point.name, format!("Jump Point #1 to {}", home.name));
        assert!(system.jump_points[1..].iter().all(|jp| !jp.point.surveyed));
    }

    #[test]
    fn test_jump_points_inside_bounds() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let mut names = HashSet::new();
        let (system, _) = generate_home_system(&mut names, &mut rng);
        for jp in &system.jump_points {
            assert!(jp.position.x.abs() <= MAX_COORDINATE_X);
            assert!(jp.position.y.abs() <= MAX_COORDINATE_Y);
        }
    }
}
