//! In-memory world: rooms and the characters and NPCs inside them, plus the
//! dispatch of arrival, look, and tick events to their hooks.

use std::collections::BTreeMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use log::{debug, info};
use rand::Rng;

use crate::logutil::escape_log;
use crate::world::character::format_say;
use crate::world::errors::WorldError;
use crate::world::minimap::MapStyle;
use crate::world::room::RoomDirectory;
use crate::world::ticker::{TickTarget, TickerHandler};
use crate::world::types::{CharacterRecord, EchoConfig, NpcRecord, RoomRecord};

pub const START_ROOM_ID: &str = "main_street";

/// Room ids created by [`canonical_world_seed`].
pub const CANONICAL_ROOM_IDS: &[&str] = &["main_street", "saloon", "livery", "canyon", "mesa"];

/// Delivers text to a single entity.
pub trait Messenger {
    fn deliver(&mut self, recipient_id: &str, text: &str);
}

/// A message handed to [`Outbox`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    pub recipient: String,
    pub text: String,
}

/// Messenger that just records what was sent.
#[derive(Debug, Default)]
pub struct Outbox {
    pub deliveries: Vec<Delivery>,
}

impl Outbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn for_recipient(&self, recipient: &str) -> Vec<&str> {
        self.deliveries
            .iter()
            .filter(|d| d.recipient == recipient)
            .map(|d| d.text.as_str())
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.deliveries.is_empty()
    }

    pub fn clear(&mut self) {
        self.deliveries.clear();
    }
}

impl Messenger for Outbox {
    fn deliver(&mut self, recipient_id: &str, text: &str) {
        self.deliveries.push(Delivery {
            recipient: recipient_id.to_string(),
            text: text.to_string(),
        });
    }
}

/// Everything needed to build a [`World`].
#[derive(Debug, Clone, Default)]
pub struct WorldSeed {
    pub rooms: Vec<RoomRecord>,
    pub characters: Vec<CharacterRecord>,
    pub npcs: Vec<NpcRecord>,
}

#[derive(Debug)]
pub struct World {
    rooms: BTreeMap<String, RoomRecord>,
    characters: BTreeMap<String, CharacterRecord>,
    npcs: BTreeMap<String, NpcRecord>,
    ticker: TickerHandler,
    style: MapStyle,
    show_map: bool,
}

impl Default for World {
    fn default() -> Self {
        Self {
            rooms: BTreeMap::new(),
            characters: BTreeMap::new(),
            npcs: BTreeMap::new(),
            ticker: TickerHandler::new(),
            style: MapStyle::default(),
            show_map: true,
        }
    }
}

impl RoomDirectory for World {
    fn room_display_name(&self, room_id: &str) -> Option<String> {
        self.rooms.room_display_name(room_id)
    }
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_seed(seed: WorldSeed) -> Self {
        let mut world = Self::new();
        for room in seed.rooms {
            world.insert_room(room);
        }
        for character in seed.characters {
            world.insert_character(character);
        }
        for npc in seed.npcs {
            world.insert_npc(npc);
        }
        info!(
            "world loaded: {} rooms, {} characters, {} npcs",
            world.rooms.len(),
            world.characters.len(),
            world.npcs.len()
        );
        world
    }

    pub fn with_style(mut self, style: MapStyle) -> Self {
        self.style = style;
        self
    }

    /// Turn the mini-map header on or off for every looker.
    pub fn with_map(mut self, show_map: bool) -> Self {
        self.show_map = show_map;
        self
    }

    pub fn insert_room(&mut self, room: RoomRecord) {
        self.rooms.insert(room.id.clone(), room);
    }

    pub fn insert_character(&mut self, character: CharacterRecord) {
        self.characters.insert(character.id.clone(), character);
    }

    pub fn insert_npc(&mut self, npc: NpcRecord) {
        self.npcs.insert(npc.id().to_string(), npc);
    }

    pub fn room(&self, id: &str) -> Option<&RoomRecord> {
        self.rooms.get(id)
    }

    pub fn character(&self, id: &str) -> Option<&CharacterRecord> {
        self.characters.get(id)
    }

    pub fn character_mut(&mut self, id: &str) -> Option<&mut CharacterRecord> {
        self.characters.get_mut(id)
    }

    pub fn npc(&self, id: &str) -> Option<&NpcRecord> {
        self.npcs.get(id)
    }

    pub fn rooms(&self) -> impl Iterator<Item = &RoomRecord> {
        self.rooms.values()
    }

    pub fn characters(&self) -> impl Iterator<Item = &CharacterRecord> {
        self.characters.values()
    }

    pub fn npcs(&self) -> impl Iterator<Item = &NpcRecord> {
        self.npcs.values()
    }

    pub fn ticker(&self) -> &TickerHandler {
        &self.ticker
    }

    /// Ids of everything located in `room_id`: characters first, then NPCs.
    pub fn contents(&self, room_id: &str) -> Vec<String> {
        let chars = self
            .characters
            .values()
            .filter(|c| c.location.as_deref() == Some(room_id))
            .map(|c| c.id.clone());
        let npcs = self
            .npcs
            .values()
            .filter(|n| n.location() == Some(room_id))
            .map(|n| n.id().to_string());
        chars.chain(npcs).collect()
    }

    fn npcs_in(&self, room_id: &str) -> impl Iterator<Item = &NpcRecord> + '_ {
        let room_id = room_id.to_string();
        self.npcs
            .values()
            .filter(move |n| n.location() == Some(room_id.as_str()))
    }

    fn display_name(&self, id: &str) -> Option<&str> {
        self.characters
            .get(id)
            .map(|c| c.key.as_str())
            .or_else(|| self.npcs.get(id).map(|n| n.key()))
    }

    /// Send `text` to every occupant of `room_id` except `exclude`.
    pub fn msg_contents(
        &self,
        room_id: &str,
        text: &str,
        exclude: Option<&str>,
        messenger: &mut dyn Messenger,
    ) -> usize {
        let mut sent = 0;
        for id in self.contents(room_id) {
            if exclude == Some(id.as_str()) {
                continue;
            }
            messenger.deliver(&id, text);
            sent += 1;
        }
        debug!("room {} <- {} ({} recipients)", room_id, escape_log(text), sent);
        sent
    }

    /// Move a character and fire the destination's receive hook.
    pub fn move_character<R: Rng + ?Sized>(
        &mut self,
        character_id: &str,
        destination: &str,
        rng: &mut R,
        messenger: &mut dyn Messenger,
    ) -> Result<(), WorldError> {
        if !self.rooms.contains_key(destination) {
            return Err(WorldError::NotFound(format!("room: {}", destination)));
        }
        let character = self
            .characters
            .get_mut(character_id)
            .ok_or_else(|| WorldError::NotFound(format!("character: {}", character_id)))?;
        character.location = Some(destination.to_string());
        debug!("{} -> {}", character_id, destination);

        let arriving = character.clone();
        self.at_object_receive(destination, &arriving, &mut *rng, messenger);
        Ok(())
    }

    /// Move an NPC. NPC arrivals never provoke dialogue.
    pub fn move_npc<R: Rng + ?Sized>(
        &mut self,
        npc_id: &str,
        destination: &str,
        rng: &mut R,
        messenger: &mut dyn Messenger,
    ) -> Result<(), WorldError> {
        if !self.rooms.contains_key(destination) {
            return Err(WorldError::NotFound(format!("room: {}", destination)));
        }
        let npc = self
            .npcs
            .get_mut(npc_id)
            .ok_or_else(|| WorldError::NotFound(format!("npc: {}", npc_id)))?;
        npc.character.location = Some(destination.to_string());

        let arriving = npc.character.clone();
        self.at_object_receive(destination, &arriving, &mut *rng, messenger);
        Ok(())
    }

    /// Room receive hook. A puppeted arrival is announced to every NPC in the
    /// room, each of which may say something.
    pub fn at_object_receive<R: Rng + ?Sized>(
        &self,
        room_id: &str,
        arriving: &CharacterRecord,
        rng: &mut R,
        messenger: &mut dyn Messenger,
    ) {
        if !arriving.is_player() {
            return;
        }
        for npc in self.npcs_in(room_id) {
            let Some(line) = npc.at_char_entered(arriving, &mut *rng) else {
                continue;
            };
            messenger.deliver(npc.id(), &format!("You say, \"{}\"", line));
            self.msg_contents(room_id, &format_say(npc.key(), &line), Some(npc.id()), messenger);
        }
    }

    /// What `looker_id` sees when looking at `room_id`.
    pub fn look(&self, room_id: &str, looker_id: &str) -> Result<String, WorldError> {
        let room = self
            .rooms
            .get(room_id)
            .ok_or_else(|| WorldError::NotFound(format!("room: {}", room_id)))?;
        let looker = self
            .characters
            .get(looker_id)
            .or_else(|| self.npcs.get(looker_id).map(|n| &n.character))
            .ok_or_else(|| WorldError::NotFound(format!("looker: {}", looker_id)))?;
        let contents = self.contents(room_id);
        let others: Vec<&str> = contents
            .iter()
            .filter(|id| id.as_str() != looker_id)
            .filter_map(|id| self.display_name(id))
            .collect();
        let style = self.show_map.then_some(&self.style);
        Ok(room.return_appearance(looker, self, style, &others))
    }

    /// Register every echoing room with the ticker. Returns how many started.
    pub fn start_echoes(&mut self) -> usize {
        let mut started = 0;
        for room in self.rooms.values() {
            if room.start_echo(&mut self.ticker) {
                started += 1;
            }
        }
        started
    }

    pub fn stop_echoes(&mut self) -> usize {
        let mut stopped = 0;
        for room in self.rooms.values() {
            if room.stop_echo(&mut self.ticker) {
                stopped += 1;
            }
        }
        stopped
    }

    pub fn start_echo(&mut self, room_id: &str) -> bool {
        match self.rooms.get(room_id) {
            Some(room) => room.start_echo(&mut self.ticker),
            None => false,
        }
    }

    pub fn stop_echo(&mut self, room_id: &str) -> bool {
        match self.rooms.get(room_id) {
            Some(room) => room.stop_echo(&mut self.ticker),
            None => false,
        }
    }

    /// Advance the ticker and run every callback that came due. Returns the
    /// number of echoes broadcast.
    pub fn tick<R: Rng + ?Sized>(
        &mut self,
        elapsed: Duration,
        rng: &mut R,
        messenger: &mut dyn Messenger,
    ) -> usize {
        let mut echoed = 0;
        for target in self.ticker.advance(elapsed) {
            match target {
                TickTarget::Echo { room_id } => {
                    let Some(room) = self.rooms.get(&room_id) else {
                        continue;
                    };
                    if let Some(phrase) = room.send_echo(&mut *rng) {
                        self.msg_contents(&room_id, &phrase, None, messenger);
                        echoed += 1;
                    }
                }
            }
        }
        echoed
    }
}

/// Frontier town used by `init` and tests.
pub fn canonical_world_seed(now: DateTime<Utc>) -> WorldSeed {
    let rooms = vec![
        RoomRecord::new(
            "main_street",
            "Main Street",
            "A rutted dirt road runs between false-fronted buildings. Tumbleweeds drift past the hitching posts.",
        )
        .with_exit("north", "saloon")
        .with_exit("east", "livery")
        .with_exit("west", "canyon")
        .with_created_at(now),
        RoomRecord::new(
            "saloon",
            "the Silver Spur Saloon",
            "Sawdust covers the floorboards and a piano sits silent in the corner.",
        )
        .with_exit("south", "main_street")
        .with_created_at(now),
        RoomRecord::new(
            "livery",
            "the Livery Stable",
            "Horses shift in their stalls. The smell of hay and leather hangs in the air.",
        )
        .with_exit("west", "main_street")
        .with_created_at(now),
        RoomRecord::new(
            "canyon",
            "Box Canyon",
            "Red rock walls rise on every side, throwing back every sound.",
        )
        .with_exit("east", "main_street")
        .with_exit("up", "mesa")
        .with_echo(EchoConfig {
            echoes: vec![
                "A hawk's cry echoes off the canyon walls.".to_string(),
                "Pebbles skitter down from somewhere above.".to_string(),
                "The wind moans through a crack in the rock.".to_string(),
            ],
            ..EchoConfig::default()
        })
        .with_created_at(now),
        RoomRecord::new(
            "mesa",
            "the Mesa",
            "Flat ground stretches to a hard blue horizon.",
        )
        .with_exit("down", "canyon")
        .with_created_at(now),
    ];

    let npcs = vec![
        NpcRecord::new("barkeep", "Barkeep").with_location("saloon"),
        NpcRecord::new("outlaw", "a scowling outlaw")
            .hostile()
            .with_location("canyon"),
    ];

    WorldSeed {
        rooms,
        characters: Vec::new(),
        npcs,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::types::AccountLink;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn world() -> World {
        World::from_seed(canonical_world_seed(Utc::now()))
    }

    #[test]
    fn canonical_seed_has_every_room() {
        let w = world();
        for id in CANONICAL_ROOM_IDS {
            assert!(w.room(id).is_some(), "missing {}", id);
        }
        for room in w.rooms() {
            for exit in &room.exits {
                assert!(w.room(&exit.destination).is_some());
            }
        }
    }

    #[test]
    fn contents_lists_characters_then_npcs() {
        let mut w = world();
        w.insert_character(CharacterRecord::new("p1", "Dusty").with_location("saloon"));
        assert_eq!(w.contents("saloon"), vec!["p1", "barkeep"]);
        assert!(w.contents("mesa").is_empty());
    }

    #[test]
    fn move_to_missing_room_fails() {
        let mut w = world();
        w.insert_character(CharacterRecord::new("p1", "Dusty"));
        let mut rng = StdRng::seed_from_u64(1);
        let mut out = Outbox::new();
        let err = w.move_character("p1", "nowhere", &mut rng, &mut out);
        assert!(matches!(err, Err(WorldError::NotFound(_))));
    }

    #[test]
    fn player_arrival_gets_greeted() {
        let mut w = world();
        w.insert_character(
            CharacterRecord::new("p1", "Dusty").with_account(AccountLink::new("dusty")),
        );
        let mut rng = StdRng::seed_from_u64(9);
        let mut out = Outbox::new();
        w.move_character("p1", "saloon", &mut rng, &mut out).unwrap();

        let heard = out.for_recipient("p1");
        assert_eq!(heard.len(), 1);
        assert!(heard[0].starts_with("Barkeep says, \""));
        assert_eq!(out.for_recipient("barkeep").len(), 1);
    }
}
