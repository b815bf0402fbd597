//! Echoing rooms: occasionally broadcast a random phrase to everyone inside.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::world::ticker::{TickTarget, Ticker};
use crate::world::types::{EchoConfig, RoomRecord};

impl EchoConfig {
    /// Roll for an echo. `None` when there are no phrases or the roll misses.
    pub fn roll<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<String> {
        if self.echoes.is_empty() {
            return None;
        }
        if rng.gen::<f64>() >= self.echo_chance {
            return None;
        }
        self.echoes.choose(rng).cloned()
    }
}

impl RoomRecord {
    pub fn echo_target(&self) -> TickTarget {
        TickTarget::Echo {
            room_id: self.id.clone(),
        }
    }

    /// Tick callback. Returns the phrase to broadcast to the room, if any.
    /// Rooms without echo settings never echo.
    pub fn send_echo<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<String> {
        self.echo.as_ref()?.roll(rng)
    }

    /// Register this room's echo callback. Returns false for non-echoing rooms
    /// and when the ticker refuses the interval.
    pub fn start_echo(&self, ticker: &mut dyn Ticker) -> bool {
        let Some(echo) = &self.echo else {
            return false;
        };
        ticker.add(echo.echo_rate, self.echo_target())
    }

    /// Deregister the callback added by [`RoomRecord::start_echo`].
    pub fn stop_echo(&self, ticker: &mut dyn Ticker) -> bool {
        let Some(echo) = &self.echo else {
            return false;
        };
        ticker.remove(echo.echo_rate, &self.echo_target())
    }
}
