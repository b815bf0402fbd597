//! Room display hooks: description with exit sentences, mini-map header, and
//! final appearance assembly.

use std::collections::{BTreeMap, HashMap};

use log::warn;

use crate::world::minimap::{render_minimap, MapStyle};
use crate::world::types::{CharacterRecord, RoomRecord};

/// Indentation placed before every room description.
pub const DESC_INDENT: &str = "     ";

/// Resolves a room id to the name shown to players.
pub trait RoomDirectory {
    fn room_display_name(&self, room_id: &str) -> Option<String>;
}

impl RoomDirectory for HashMap<String, RoomRecord> {
    fn room_display_name(&self, room_id: &str) -> Option<String> {
        self.get(room_id).map(|r| r.key.clone())
    }
}

impl RoomDirectory for BTreeMap<String, RoomRecord> {
    fn room_display_name(&self, room_id: &str) -> Option<String> {
        self.get(room_id).map(|r| r.key.clone())
    }
}

impl RoomRecord {
    /// One sentence per exit, joined by single spaces.
    pub fn exit_sentences(&self, directory: &dyn RoomDirectory) -> String {
        self.exits
            .iter()
            .map(|exit| {
                let name = directory
                    .room_display_name(&exit.destination)
                    .unwrap_or_else(|| {
                        warn!(
                            "room {} exit {} points at unknown room {}",
                            self.id, exit.key, exit.destination
                        );
                        exit.destination.clone()
                    });
                format!("To the {}, you see {}.", exit.key, name)
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Indented base description followed by the exit sentences.
    pub fn get_display_desc(&self, directory: &dyn RoomDirectory) -> String {
        format!(
            "{}{} {}",
            DESC_INDENT,
            self.desc,
            self.exit_sentences(directory)
        )
    }

    /// Mini-map header; empty for NPCs and screen-reader users.
    pub fn get_display_header(&self, looker: &CharacterRecord, style: &MapStyle) -> String {
        render_minimap(looker, &self.id, &self.exits, style)
    }

    /// Full text shown on `look`. `style: None` turns the mini-map off.
    pub fn return_appearance(
        &self,
        looker: &CharacterRecord,
        directory: &dyn RoomDirectory,
        style: Option<&MapStyle>,
        others: &[&str],
    ) -> String {
        let mut out = String::new();
        let header = style
            .map(|style| self.get_display_header(looker, style))
            .unwrap_or_default();
        if !header.is_empty() {
            out.push_str(&header);
            out.push('\n');
        }
        out.push_str(&self.key);
        out.push('\n');
        out.push_str(&self.get_display_desc(directory));
        if !others.is_empty() {
            out.push_str("\nAlso here: ");
            out.push_str(&others.join(", "));
            out.push('.');
        }
        format_appearance(&out)
    }
}

/// Trim trailing whitespace only; the description indent must survive.
pub fn format_appearance(appearance: &str) -> String {
    appearance.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::types::AccountLink;

    fn directory() -> HashMap<String, RoomRecord> {
        let mut rooms = HashMap::new();
        for (id, key) in [("saloon", "the Saloon"), ("street", "Main Street")] {
            rooms.insert(id.to_string(), RoomRecord::new(id, key, ""));
        }
        rooms
    }

    #[test]
    fn desc_lists_each_exit() {
        let room = RoomRecord::new("street", "Main Street", "Dust blows by.")
            .with_exit("north", "saloon")
            .with_exit("south", "street");
        assert_eq!(
            room.get_display_desc(&directory()),
            "     Dust blows by. To the north, you see the Saloon. To the south, you see Main Street."
        );
    }

    #[test]
    fn desc_without_exits_keeps_trailing_space_until_formatted() {
        let room = RoomRecord::new("street", "Main Street", "Quiet.");
        let desc = room.get_display_desc(&directory());
        assert_eq!(desc, "     Quiet. ");
        assert_eq!(format_appearance(&desc), "     Quiet.");
    }

    #[test]
    fn unknown_destination_falls_back_to_id() {
        let room = RoomRecord::new("street", "Main Street", "Dust.").with_exit("portal", "void");
        assert!(room
            .get_display_desc(&directory())
            .ends_with("To the portal, you see void."));
    }

    #[test]
    fn appearance_for_player_starts_with_map() {
        let room = RoomRecord::new("street", "Main Street", "Dust.").with_exit("north", "saloon");
        let looker = CharacterRecord::new("p", "Dusty").with_account(AccountLink::new("dusty"));
        let text = room.return_appearance(&looker, &directory(), Some(&MapStyle::default()), &["Barkeep"]);
        assert!(text.starts_with("  +-----+"));
        assert!(text.contains("\nMain Street\n     Dust."));
        assert!(text.ends_with("Also here: Barkeep."));
    }

    #[test]
    fn appearance_for_npc_has_no_map() {
        let room = RoomRecord::new("street", "Main Street", "Dust.");
        let looker = CharacterRecord::new("n", "Barkeep");
        let text = room.return_appearance(&looker, &directory(), Some(&MapStyle::default()), &[]);
        assert_eq!(text, "Main Street\n     Dust.");
    }

    #[test]
    fn disabled_map_is_skipped_for_players_too() {
        let room = RoomRecord::new("street", "Main Street", "Dust.");
        let looker = CharacterRecord::new("p", "Dusty").with_account(AccountLink::new("dusty"));
        let text = room.return_appearance(&looker, &directory(), None, &[]);
        assert_eq!(text, "Main Street\n     Dust.");
    }
}
