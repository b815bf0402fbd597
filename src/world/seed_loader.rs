//! JSON seed files for world content, so rooms, echoes and NPC dialogue can be
//! edited without recompiling.
//!
//! ```json
//! {
//!   "rooms": [
//!     { "id": "canyon", "name": "Box Canyon", "desc": "Red rock.",
//!       "exits": [{ "key": "east", "to": "main_street" }],
//!       "echo": { "echoes": ["A hawk cries."], "echo_rate": 30, "echo_chance": 0.5 } }
//!   ],
//!   "npcs": [
//!     { "id": "outlaw", "name": "an outlaw", "location": "canyon", "friendly": false }
//!   ],
//!   "characters": []
//! }
//! ```

use std::fs;
use std::path::Path;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::world::errors::WorldError;
use crate::world::state::WorldSeed;
use crate::world::types::{AccountLink, CharacterRecord, EchoConfig, NpcRecord, RoomRecord};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExitSeed {
    pub key: String,
    pub to: String,
}

/// Echo settings as written in a seed; omitted rate and chance fall back to
/// the configured defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EchoSeed {
    #[serde(default)]
    pub echoes: Vec<String>,
    #[serde(default)]
    pub echo_rate: Option<u64>,
    #[serde(default)]
    pub echo_chance: Option<f64>,
}

impl EchoSeed {
    pub fn resolve(self, defaults: &EchoConfig) -> EchoConfig {
        EchoConfig {
            echoes: self.echoes,
            echo_rate: self.echo_rate.unwrap_or(defaults.echo_rate),
            echo_chance: self.echo_chance.unwrap_or(defaults.echo_chance),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomSeed {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub desc: String,
    #[serde(default)]
    pub exits: Vec<ExitSeed>,
    #[serde(default)]
    pub echo: Option<EchoSeed>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NpcSeed {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default = "default_true")]
    pub friendly: bool,
    /// Omitted means the stock lines.
    #[serde(default)]
    pub friendly_lines: Option<Vec<String>>,
    #[serde(default)]
    pub aggressive_lines: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CharacterSeed {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub location: Option<String>,
    /// Account username; present means player-controlled.
    #[serde(default)]
    pub account: Option<String>,
    #[serde(default)]
    pub screenreader: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorldSeedFile {
    #[serde(default)]
    pub rooms: Vec<RoomSeed>,
    #[serde(default)]
    pub npcs: Vec<NpcSeed>,
    #[serde(default)]
    pub characters: Vec<CharacterSeed>,
}

fn default_true() -> bool {
    true
}

impl RoomSeed {
    pub fn into_record(self, echo_defaults: &EchoConfig) -> RoomRecord {
        let mut room = RoomRecord::new(&self.id, &self.name, &self.desc);
        for exit in self.exits {
            room = room.with_exit(&exit.key, &exit.to);
        }
        room.echo = self.echo.map(|e| e.resolve(echo_defaults));
        room
    }
}

impl From<NpcSeed> for NpcRecord {
    fn from(seed: NpcSeed) -> Self {
        let mut npc = NpcRecord::new(&seed.id, &seed.name);
        npc.character.location = seed.location;
        npc.friendly = seed.friendly;
        if let Some(lines) = seed.friendly_lines {
            npc.friendly_lines = lines;
        }
        if let Some(lines) = seed.aggressive_lines {
            npc.aggressive_lines = lines;
        }
        npc
    }
}

impl From<CharacterSeed> for CharacterRecord {
    fn from(seed: CharacterSeed) -> Self {
        let mut character = CharacterRecord::new(&seed.id, &seed.name);
        character.location = seed.location;
        character.account = seed.account.map(|username| AccountLink {
            username,
            screenreader: seed.screenreader,
        });
        character
    }
}

impl WorldSeedFile {
    pub fn into_seed(self, echo_defaults: &EchoConfig) -> WorldSeed {
        let now = Utc::now();
        WorldSeed {
            rooms: self
                .rooms
                .into_iter()
                .map(|r| r.into_record(echo_defaults).with_created_at(now))
                .collect(),
            characters: self.characters.into_iter().map(Into::into).collect(),
            npcs: self.npcs.into_iter().map(Into::into).collect(),
        }
    }
}

pub fn parse_world_seed(
    contents: &str,
    origin: &str,
    echo_defaults: &EchoConfig,
) -> Result<WorldSeed, WorldError> {
    let file: WorldSeedFile = serde_json::from_str(contents).map_err(|source| WorldError::Seed {
        path: origin.to_string(),
        source,
    })?;
    let seed = file.into_seed(echo_defaults);
    validate_echoes(&seed, origin)?;
    Ok(seed)
}

fn validate_echoes(seed: &WorldSeed, origin: &str) -> Result<(), WorldError> {
    for room in &seed.rooms {
        let Some(echo) = &room.echo else {
            continue;
        };
        let reason = if echo.echo_rate == 0 {
            "echo_rate must be positive"
        } else if !(0.0..=1.0).contains(&echo.echo_chance) {
            "echo_chance must be within 0.0..=1.0"
        } else {
            continue;
        };
        return Err(WorldError::InvalidSeed {
            path: origin.to_string(),
            reason: format!("room {}: {}", room.id, reason),
        });
    }
    Ok(())
}

/// Load a world seed from a JSON file.
pub fn load_world_seed<P: AsRef<Path>>(
    path: P,
    echo_defaults: &EchoConfig,
) -> Result<WorldSeed, WorldError> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;
    parse_world_seed(&contents, &path.display().to_string(), echo_defaults)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn omitted_fields_take_defaults() {
        let seed = parse_world_seed(
            r#"{
                "rooms": [{ "id": "canyon", "name": "Box Canyon", "echo": { "echoes": ["Echo!"] } }],
                "npcs": [{ "id": "mute", "name": "Mute", "friendly_lines": [] }]
            }"#,
            "inline",
            &EchoConfig::default(),
        )
        .unwrap();

        let echo = seed.rooms[0].echo.as_ref().unwrap();
        assert_eq!(echo.echo_rate, 42);
        assert!((echo.echo_chance - 0.3).abs() < f64::EPSILON);

        let npc = &seed.npcs[0];
        assert!(npc.friendly);
        assert!(npc.friendly_lines.is_empty());
        assert_eq!(npc.aggressive_lines.len(), 2);
    }

    #[test]
    fn bad_json_reports_origin() {
        let err = parse_world_seed("{ rooms: ", "broken.json", &EchoConfig::default()).unwrap_err();
        assert!(err.to_string().contains("broken.json"));
    }

    #[test]
    fn configured_echo_defaults_fill_gaps() {
        let defaults = EchoConfig {
            echoes: Vec::new(),
            echo_rate: 10,
            echo_chance: 0.9,
        };
        let seed = parse_world_seed(
            r#"{ "rooms": [{ "id": "c", "name": "C", "echo": { "echoes": ["x"], "echo_rate": 5 } }] }"#,
            "inline",
            &defaults,
        )
        .unwrap();
        let echo = seed.rooms[0].echo.as_ref().unwrap();
        assert_eq!(echo.echo_rate, 5);
        assert!((echo.echo_chance - 0.9).abs() < f64::EPSILON);
    }

    #[test]
    fn zero_echo_rate_is_rejected() {
        let err = parse_world_seed(
            r#"{ "rooms": [{ "id": "c", "name": "C", "echo": { "echoes": ["x"], "echo_rate": 0 } }] }"#,
            "zero.json",
            &EchoConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, WorldError::InvalidSeed { .. }));
        assert!(err.to_string().contains("room c: echo_rate"));
    }

    #[test]
    fn out_of_range_echo_chance_is_rejected() {
        let err = parse_world_seed(
            r#"{ "rooms": [{ "id": "c", "name": "C", "echo": { "echo_chance": 1.5 } }] }"#,
            "chance.json",
            &EchoConfig::default(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("echo_chance"));
    }
}
