//! Character and NPC behaviors: posse invitations and arrival dialogue.

use log::debug;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::world::types::{CharacterRecord, NpcRecord};

impl CharacterRecord {
    /// Record an invitation to join `posse`. Duplicate invitations are ignored.
    pub fn invite(&mut self, posse: &str) {
        if !self.invites.iter().any(|p| p == posse) {
            self.invites.push(posse.to_string());
        }
    }

    /// Join `posse` if an invitation for it is pending. Returns false otherwise.
    pub fn accept_invite(&mut self, posse: &str) -> bool {
        let Some(pos) = self.invites.iter().position(|p| p == posse) else {
            return false;
        };
        self.invites.remove(pos);
        self.posse = Some(posse.to_string());
        self.posse_permission = false;
        true
    }

    pub fn decline_invite(&mut self, posse: &str) -> bool {
        let before = self.invites.len();
        self.invites.retain(|p| p != posse);
        before != self.invites.len()
    }

    pub fn leave_posse(&mut self) {
        self.posse = None;
        self.posse_permission = false;
    }
}

impl NpcRecord {
    /// The lines this NPC draws from given its current temperament.
    pub fn current_lines(&self) -> &[String] {
        if self.friendly {
            &self.friendly_lines
        } else {
            &self.aggressive_lines
        }
    }

    /// Arrival hook: a player-controlled `arriving` character walked in.
    ///
    /// Returns the line the NPC says, picked uniformly, or `None` when the
    /// line set for its temperament is empty.
    pub fn at_char_entered<R: Rng + ?Sized>(
        &self,
        arriving: &CharacterRecord,
        rng: &mut R,
    ) -> Option<String> {
        let line = self.current_lines().choose(rng)?;
        debug!(
            "npc {} reacts to {} (friendly={})",
            self.id(),
            arriving.id,
            self.friendly
        );
        Some(line.clone())
    }
}

/// Format a `say` as heard by the room.
pub fn format_say(speaker: &str, line: &str) -> String {
    format!("{} says, \"{}\"", speaker, line)
}
