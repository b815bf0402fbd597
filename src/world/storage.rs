use std::path::{Path, PathBuf};

use log::info;
use sled::IVec;

use crate::world::errors::WorldError;
use crate::world::state::{canonical_world_seed, World, WorldSeed};
use crate::world::types::{
    CharacterRecord, NpcRecord, RoomRecord, CHARACTER_SCHEMA_VERSION, NPC_SCHEMA_VERSION,
    ROOM_SCHEMA_VERSION,
};

const TREE_PRIMARY: &str = "tumbleweed";

const ROOM_PREFIX: &str = "rooms:";
const CHARACTER_PREFIX: &str = "characters:";
const NPC_PREFIX: &str = "npcs:";

/// Helper builder so tests can easily create throwaway stores with custom paths.
pub struct WorldStoreBuilder {
    path: PathBuf,
    ensure_world_seed: bool,
}

impl WorldStoreBuilder {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ensure_world_seed: true,
        }
    }

    /// Skip inserting the canonical town on open.
    pub fn without_world_seed(mut self) -> Self {
        self.ensure_world_seed = false;
        self
    }

    pub fn open(self) -> Result<WorldStore, WorldError> {
        WorldStore::open_with_options(self.path, self.ensure_world_seed)
    }
}

/// Sled-backed attribute storage for rooms, characters and NPCs.
pub struct WorldStore {
    _db: sled::Db,
    primary: sled::Tree,
}

impl WorldStore {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, WorldError> {
        Self::open_with_options(path, true)
    }

    fn open_with_options<P: AsRef<Path>>(path: P, seed_world: bool) -> Result<Self, WorldError> {
        let path_ref = path.as_ref();
        std::fs::create_dir_all(path_ref)?;
        let db = sled::open(path_ref)?;
        let primary = db.open_tree(TREE_PRIMARY)?;
        let store = Self { _db: db, primary };
        if seed_world {
            store.seed_world_if_needed()?;
        }
        Ok(store)
    }

    fn serialize<T: serde::Serialize>(value: &T) -> Result<Vec<u8>, WorldError> {
        Ok(bincode::serialize(value)?)
    }

    fn deserialize<T: serde::de::DeserializeOwned>(bytes: IVec) -> Result<T, WorldError> {
        Ok(bincode::deserialize::<T>(&bytes)?)
    }

    fn key(prefix: &str, id: &str) -> Vec<u8> {
        format!("{}{}", prefix, id).into_bytes()
    }

    fn put<T: serde::Serialize>(&self, key: Vec<u8>, value: &T) -> Result<(), WorldError> {
        let bytes = Self::serialize(value)?;
        self.primary.insert(key, bytes)?;
        self.primary.flush()?;
        Ok(())
    }

    fn list_ids(&self, prefix: &str) -> Result<Vec<String>, WorldError> {
        let mut ids = Vec::new();
        for entry in self.primary.scan_prefix(prefix.as_bytes()) {
            let (key, _) = entry?;
            let text = String::from_utf8_lossy(&key);
            if let Some(id) = text.strip_prefix(prefix) {
                ids.push(id.to_string());
            }
        }
        Ok(ids)
    }

    pub fn put_room(&self, mut room: RoomRecord) -> Result<(), WorldError> {
        room.schema_version = ROOM_SCHEMA_VERSION;
        self.put(Self::key(ROOM_PREFIX, &room.id), &room)
    }

    pub fn get_room(&self, room_id: &str) -> Result<RoomRecord, WorldError> {
        let Some(bytes) = self.primary.get(Self::key(ROOM_PREFIX, room_id))? else {
            return Err(WorldError::NotFound(format!("room: {}", room_id)));
        };
        let record: RoomRecord = Self::deserialize(bytes)?;
        if record.schema_version != ROOM_SCHEMA_VERSION {
            return Err(WorldError::SchemaMismatch {
                entity: "room",
                expected: ROOM_SCHEMA_VERSION,
                found: record.schema_version,
            });
        }
        Ok(record)
    }

    pub fn list_room_ids(&self) -> Result<Vec<String>, WorldError> {
        self.list_ids(ROOM_PREFIX)
    }

    pub fn put_character(&self, mut character: CharacterRecord) -> Result<(), WorldError> {
        character.schema_version = CHARACTER_SCHEMA_VERSION;
        self.put(Self::key(CHARACTER_PREFIX, &character.id), &character)
    }

    pub fn get_character(&self, id: &str) -> Result<CharacterRecord, WorldError> {
        let Some(bytes) = self.primary.get(Self::key(CHARACTER_PREFIX, id))? else {
            return Err(WorldError::NotFound(format!("character: {}", id)));
        };
        let record: CharacterRecord = Self::deserialize(bytes)?;
        if record.schema_version != CHARACTER_SCHEMA_VERSION {
            return Err(WorldError::SchemaMismatch {
                entity: "character",
                expected: CHARACTER_SCHEMA_VERSION,
                found: record.schema_version,
            });
        }
        Ok(record)
    }

    pub fn list_character_ids(&self) -> Result<Vec<String>, WorldError> {
        self.list_ids(CHARACTER_PREFIX)
    }

    pub fn put_npc(&self, mut npc: NpcRecord) -> Result<(), WorldError> {
        npc.schema_version = NPC_SCHEMA_VERSION;
        self.put(Self::key(NPC_PREFIX, npc.id()), &npc)
    }

    pub fn get_npc(&self, id: &str) -> Result<NpcRecord, WorldError> {
        let Some(bytes) = self.primary.get(Self::key(NPC_PREFIX, id))? else {
            return Err(WorldError::NotFound(format!("npc: {}", id)));
        };
        let record: NpcRecord = Self::deserialize(bytes)?;
        if record.schema_version != NPC_SCHEMA_VERSION {
            return Err(WorldError::SchemaMismatch {
                entity: "npc",
                expected: NPC_SCHEMA_VERSION,
                found: record.schema_version,
            });
        }
        Ok(record)
    }

    pub fn list_npc_ids(&self) -> Result<Vec<String>, WorldError> {
        self.list_ids(NPC_PREFIX)
    }

    pub fn delete_npc(&self, id: &str) -> Result<(), WorldError> {
        self.primary.remove(Self::key(NPC_PREFIX, id))?;
        self.primary.flush()?;
        Ok(())
    }

    /// Insert every record of `seed`, overwriting same-id records.
    pub fn import_seed(&self, seed: WorldSeed) -> Result<usize, WorldError> {
        let mut inserted = 0usize;
        for room in seed.rooms {
            self.put_room(room)?;
            inserted += 1;
        }
        for character in seed.characters {
            self.put_character(character)?;
            inserted += 1;
        }
        for npc in seed.npcs {
            self.put_npc(npc)?;
            inserted += 1;
        }
        Ok(inserted)
    }

    pub fn seed_world_if_needed(&self) -> Result<usize, WorldError> {
        if self
            .primary
            .scan_prefix(ROOM_PREFIX.as_bytes())
            .next()
            .is_some()
        {
            return Ok(0);
        }
        let inserted = self.import_seed(canonical_world_seed(chrono::Utc::now()))?;
        info!("seeded canonical world ({} records)", inserted);
        Ok(inserted)
    }

    pub fn load_world(&self) -> Result<World, WorldError> {
        let mut seed = WorldSeed::default();
        for id in self.list_room_ids()? {
            seed.rooms.push(self.get_room(&id)?);
        }
        for id in self.list_character_ids()? {
            seed.characters.push(self.get_character(&id)?);
        }
        for id in self.list_npc_ids()? {
            seed.npcs.push(self.get_npc(&id)?);
        }
        Ok(World::from_seed(seed))
    }

    /// Persist every record currently in `world`.
    pub fn save_world(&self, world: &World) -> Result<(), WorldError> {
        for room in world.rooms() {
            self.put_room(room.clone())?;
        }
        for character in world.characters() {
            self.put_character(character.clone())?;
        }
        for npc in world.npcs() {
            self.put_npc(npc.clone())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::state::CANONICAL_ROOM_IDS;
    use tempfile::TempDir;

    #[test]
    fn store_round_trip_character() {
        let dir = TempDir::new().expect("tempdir");
        let store = WorldStoreBuilder::new(dir.path()).open().expect("store");
        let mut c = CharacterRecord::new("dusty", "Dusty").with_location("saloon");
        c.copper = 42;
        c.invite("red-riders");
        store.put_character(c.clone()).expect("put");
        let fetched = store.get_character("dusty").expect("get");
        assert_eq!(fetched, c);
    }

    #[test]
    fn seeding_world_only_happens_once() {
        let dir = TempDir::new().expect("tempdir");
        {
            let store = WorldStoreBuilder::new(dir.path()).open().expect("store");
            for room_id in CANONICAL_ROOM_IDS {
                store.get_room(room_id).expect("room present");
            }
        }
        let store = WorldStoreBuilder::new(dir.path())
            .without_world_seed()
            .open()
            .expect("reopen store");
        assert_eq!(store.seed_world_if_needed().expect("seed check"), 0);
    }

    #[test]
    fn missing_npc_is_not_found() {
        let dir = TempDir::new().expect("tempdir");
        let store = WorldStoreBuilder::new(dir.path())
            .without_world_seed()
            .open()
            .expect("store");
        assert!(matches!(store.get_npc("ghost"), Err(WorldError::NotFound(_))));
    }
}
