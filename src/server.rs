//! Async driver for the world ticker.
//!
//! The loop owns the world for its lifetime; every `resolution` it measures the
//! real time since the previous pass, advances the ticker by that much and
//! broadcasts whatever echoes come due. It stops when `shutdown` resolves
//! (Ctrl-C in the binary, a timer in tests).

use std::future::Future;
use std::time::Duration;

use log::{debug, info};
use rand::Rng;
use tokio::time::{interval, Instant, MissedTickBehavior};

use crate::logutil::escape_log;
use crate::world::{Messenger, World};

/// Messenger for headless runs: every delivery becomes a log line.
#[derive(Debug, Default)]
pub struct LogMessenger {
    pub delivered: usize,
}

impl Messenger for LogMessenger {
    fn deliver(&mut self, recipient_id: &str, text: &str) {
        self.delivered += 1;
        info!("-> {}: {}", recipient_id, escape_log(text));
    }
}

/// Summary of a finished ticker run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickerRun {
    pub passes: u64,
    pub echoes: usize,
}

pub async fn run_ticker<R, F>(
    world: &mut World,
    resolution: Duration,
    rng: &mut R,
    messenger: &mut dyn Messenger,
    shutdown: F,
) -> TickerRun
where
    R: Rng + ?Sized,
    F: Future<Output = ()>,
{
    let started = world.start_echoes();
    info!(
        "ticker loop running ({} echoing room(s), resolution {:?})",
        started, resolution
    );

    let mut periodic = interval(resolution);
    periodic.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut last = Instant::now();
    let mut run = TickerRun {
        passes: 0,
        echoes: 0,
    };

    tokio::pin!(shutdown);
    loop {
        tokio::select! {
            _ = periodic.tick() => {
                let now = Instant::now();
                let elapsed = now.duration_since(last);
                last = now;
                run.passes += 1;
                let echoed = world.tick(elapsed, &mut *rng, &mut *messenger);
                if echoed > 0 {
                    debug!("pass {}: {} echo(es)", run.passes, echoed);
                }
                run.echoes += echoed;
            }
            _ = &mut shutdown => {
                info!("Received shutdown signal");
                break;
            }
        }
    }

    world.stop_echoes();
    info!(
        "ticker loop stopped after {} passes, {} echo(es)",
        run.passes, run.echoes
    );
    run
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::{CharacterRecord, EchoConfig, Outbox, RoomRecord};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[tokio::test]
    async fn loop_echoes_and_unregisters_on_shutdown() {
        let mut world = World::new();
        world.insert_room(RoomRecord::new("canyon", "Box Canyon", "").with_echo(EchoConfig {
            echoes: vec!["Echo!".to_string()],
            echo_rate: 1,
            echo_chance: 1.0,
        }));
        world.insert_character(CharacterRecord::new("p1", "Dusty").with_location("canyon"));

        let mut rng = StdRng::seed_from_u64(5);
        let mut outbox = Outbox::new();
        let run = run_ticker(
            &mut world,
            Duration::from_millis(50),
            &mut rng,
            &mut outbox,
            tokio::time::sleep(Duration::from_millis(1300)),
        )
        .await;

        assert!(run.echoes >= 1);
        assert_eq!(outbox.for_recipient("p1").len(), run.echoes);
        assert!(world.ticker().is_empty());
    }
}
