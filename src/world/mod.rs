//! Frontier game world: characters, NPCs that greet arrivals, rooms with an
//! ASCII mini-map, and rooms that echo on a ticker.
//!
//! Records live in [`types`]; behaviors are implemented on them in
//! [`character`], [`room`], [`minimap`] and [`echo`]. [`state::World`] wires
//! them together and plays the part of the event dispatcher.

pub mod character;
pub mod echo;
pub mod errors;
pub mod minimap;
pub mod room;
pub mod seed_loader;
pub mod state;
pub mod storage;
pub mod ticker;
pub mod types;

pub use character::format_say;
pub use errors::WorldError;
pub use minimap::{render_minimap, wants_minimap, MapStyle, MiniMap};
pub use room::{format_appearance, RoomDirectory, DESC_INDENT};
pub use seed_loader::{load_world_seed, parse_world_seed};
pub use state::{
    canonical_world_seed, Delivery, Messenger, Outbox, World, WorldSeed, CANONICAL_ROOM_IDS,
    START_ROOM_ID,
};
pub use storage::{WorldStore, WorldStoreBuilder};
pub use ticker::{TickTarget, Ticker, TickerHandler};
pub use types::*;
