//! Save/Load functionality for persisting a player session
//!
//! Uses bincode for binary serialization. The file is a format version
//! followed by one [`SaveData`] record. Ships are stored as component
//! records in roster order and respawned into a fresh fleet world on load.

use hecs::{Entity, World};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};

use crate::components::*;
use crate::config::EconomyRates;
use crate::engine::{GameClock, ResearchState};
use crate::galaxy::Galaxy;

/// Version number for save file format (increment when format changes)
const SAVE_VERSION: u32 = 1;

/// Serializable snapshot of a session
#[derive(Serialize, Deserialize)]
pub struct SaveData {
    pub player_name: String,
    pub galaxy: Galaxy,
    pub colonies: Vec<Colony>,
    /// Ships in roster order
    pub ships: Vec<SerializableShip>,
    pub rates: EconomyRates,
    pub money: i64,
    pub clock: GameClock,
    pub research: ResearchState,
    pub selected_colony: usize,
    pub ships_built: u32,
    /// Random stream position, so a loaded game continues identically
    pub rng: ChaCha8Rng,
}

/// All components of one ship entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SerializableShip {
    pub hull: Hull,
    pub navigation: Navigation,
    pub orders: OrderQueue,
    pub payload: Payload,
}

/// Extract the fleet into serializable form
pub(crate) fn serialize_fleet(world: &World, roster: &[Entity]) -> Vec<SerializableShip> {
    let mut ships = Vec::with_capacity(roster.len());
    for &entity in roster {
        let Ok(mut query) = world.query_one::<(&Hull, &Navigation, &OrderQueue, &Payload)>(entity) else {
            log::warn!("Roster entry {:?} has no entity, skipping", entity);
            continue;
        };
        if let Some((hull, navigation, orders, payload)) = query.get() {
            ships.push(SerializableShip {
                hull: hull.clone(),
                navigation: navigation.clone(),
                orders: orders.clone(),
                payload: payload.clone(),
            });
        }
    }
    ships
}

/// Spawn saved ships into `world`, returning the new roster
pub(crate) fn deserialize_fleet(world: &mut World, ships: Vec<SerializableShip>) -> Vec<Entity> {
    ships
        .into_iter()
        .map(|ship| world.spawn((ship.hull, ship.navigation, ship.orders, ship.payload)))
        .collect()
}

/// Write a save file
pub fn save_session<W: Write>(mut writer: W, data: &SaveData) -> Result<(), SaveError> {
    bincode::serialize_into(&mut writer, &SAVE_VERSION)?;
    bincode::serialize_into(&mut writer, data)?;
    writer.flush()?;
    Ok(())
}

/// Read a save file
pub fn load_session<R: Read>(mut reader: R) -> Result<SaveData, SaveError> {
    let version: u32 = bincode::deserialize_from(&mut reader)?;
    if version != SAVE_VERSION {
        return Err(SaveError::VersionMismatch {
            expected: SAVE_VERSION,
            found: version,
        });
    }
    Ok(bincode::deserialize_from(reader)?)
}

/// Errors that can occur during save/load
#[derive(Debug)]
pub enum SaveError {
    Io(std::io::Error),
    Bincode(Box<bincode::ErrorKind>),
    VersionMismatch { expected: u32, found: u32 },
    /// The save was made against a catalog with a different technology list
    CatalogMismatch { expected: usize, found: usize },
}

impl From<std::io::Error> for SaveError {
    fn from(e: std::io::Error) -> Self {
        SaveError::Io(e)
    }
}

impl From<Box<bincode::ErrorKind>> for SaveError {
    fn from(e: Box<bincode::ErrorKind>) -> Self {
        SaveError::Bincode(e)
    }
}

impl std::fmt::Display for SaveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SaveError::Io(e) => write!(f, "IO error: {}", e),
            SaveError::Bincode(e) => write!(f, "Serialization error: {}", e),
            SaveError::VersionMismatch { expected, found } => {
                write!(
                    f,
                    "Save version mismatch: expected {}, found {}",
                    expected, found
                )
            }
            SaveError::CatalogMismatch { expected, found } => {
                write!(
                    f,
                    "Save has progress for {} technologies, catalog has {}",
                    found, expected
                )
            }
        }
    }
}

impl std::error::Error for SaveError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SaveError::Io(e) => Some(e),
            SaveError::Bincode(e) => Some(e.as_ref()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::config::SessionConfig;
    use crate::engine::PlayerSession;
    use crate::notify::{MessageLog, NullSink};
    use std::sync::Arc;

    fn new_session(seed: u64) -> PlayerSession {
        PlayerSession::new(
            SessionConfig::default().with_seed(seed),
            Arc::new(Catalog::standard()),
            Box::new(NullSink),
        )
    }

    #[test]
    fn test_save_load_roundtrip() {
        let mut session = new_session(11);
        session.spawn_ship(0, ShipKind::Survey).expect("ship");
        session.spawn_ship(0, ShipKind::Cargo).expect("ship");
        session.add_order(0, PointRef::JumpPoint { system: 0, index: 2 }, 2, 0).expect("survey");
        session.select_building(0, 0).expect("auto mine");
        for _ in 0..30 {
            session.advance_frame(0.1);
        }

        let mut save_buffer = Vec::new();
        session.save(&mut save_buffer).expect("Save failed");

        let catalog = Arc::new(Catalog::standard());
        let loaded = PlayerSession::load(&save_buffer[..], catalog, Box::new(NullSink)).expect("Load failed");

        assert_eq!(loaded.money, session.money);
        assert_eq!(loaded.clock, session.clock);
        assert_eq!(loaded.research, session.research);
        assert_eq!(loaded.galaxy.len(), session.galaxy.len());
        assert_eq!(loaded.colony_summaries(), session.colony_summaries());
        assert_eq!(loaded.ship_reports(), session.ship_reports());
    }

    #[test]
    fn test_loaded_session_continues_identically() {
        let mut session = new_session(5);
        let mut save_buffer = Vec::new();
        session.save(&mut save_buffer).expect("Save failed");
        let mut loaded =
            PlayerSession::load(&save_buffer[..], Arc::new(Catalog::standard()), Box::new(MessageLog::new()))
                .expect("Load failed");

        let mut sink = NullSink;
        for index in 0..8 {
            let jp = PointRef::JumpPoint { system: 0, index };
            let a = session.galaxy.survey(jp, &mut session.rng, &mut sink);
            let b = loaded.galaxy.survey(jp, &mut loaded.rng, &mut sink);
            assert_eq!(a, b);
        }
        let names: Vec<_> = session.galaxy.systems.iter().map(|s| s.name.clone()).collect();
        let loaded_names: Vec<_> = loaded.galaxy.systems.iter().map(|s| s.name.clone()).collect();
        assert_eq!(names, loaded_names);
    }

    #[test]
    fn test_version_mismatch() {
        let mut buffer = Vec::new();
        bincode::serialize_into(&mut buffer, &99u32).expect("header");
        let result = load_session(&buffer[..]);
        assert!(matches!(
            result,
            Err(SaveError::VersionMismatch { expected: 1, found: 99 })
        ));
    }

    #[test]
    fn test_catalog_mismatch() {
        let session = new_session(1);
        let mut save_buffer = Vec::new();
        session.save(&mut save_buffer).expect("Save failed");

        let mut catalog = Catalog::standard();
        catalog.technologies.truncate(3);
        let result = PlayerSession::load(&save_buffer[..], Arc::new(catalog), Box::new(NullSink));
        assert!(matches!(result, Err(SaveError::CatalogMismatch { expected: 3, .. })));
    }

    #[test]
    fn test_truncated_file() {
        let session = new_session(1);
        let mut save_buffer = Vec::new();
        session.save(&mut save_buffer).expect("Save failed");
        save_buffer.truncate(save_buffer.len() / 2);
        assert!(matches!(load_session(&save_buffer[..]), Err(SaveError::Bincode(_))));
    }
}
