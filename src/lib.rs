//! # Tumbleweed - frontier MUD world behaviors
//!
//! Entity behaviors for a small text-based western: characters with a stat
//! bag and posse invitations, NPCs that greet (or threaten) arriving players,
//! rooms that describe their exits and draw a 7x7 ASCII mini-map, and echoing
//! rooms that occasionally broadcast a random phrase on a ticker.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use rand::thread_rng;
//! use tumbleweed::world::{
//!     canonical_world_seed, AccountLink, CharacterRecord, Outbox, World,
//! };
//!
//! let mut world = World::from_seed(canonical_world_seed(chrono::Utc::now()));
//! world.insert_character(
//!     CharacterRecord::new("dusty", "Dusty").with_account(AccountLink::new("dusty")),
//! );
//!
//! let mut outbox = Outbox::new();
//! world.move_character("dusty", "saloon", &mut thread_rng(), &mut outbox)?;
//! println!("{}", world.look("saloon", "dusty")?);
//! # Ok::<(), tumbleweed::world::WorldError>(())
//! ```
//!
//! ## Module Organization
//!
//! - [`world`] - records, hooks, mini-map, ticker, sled storage and JSON seeds
//! - [`config`] - TOML configuration
//! - [`logutil`] - single-line log escaping
//! - [`server`] - async ticker loop

pub mod config;
pub mod logutil;
pub mod server;
pub mod world;
