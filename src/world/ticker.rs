//! Periodic-callback registry.
//!
//! Subscriptions are keyed by `(interval, target)`, the same pair used to add
//! and remove them. The registry does not own a clock: the caller feeds it
//! elapsed time (from a tokio interval in the server loop, or synthetic steps
//! in tests) and dispatches whatever comes due.

use std::collections::BTreeMap;
use std::time::Duration;

use log::{debug, info, warn};

/// What a tick should poke.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TickTarget {
    /// Fire `send_echo` on the echoing room with this id.
    Echo { room_id: String },
}

/// Seam through which entities register periodic callbacks.
pub trait Ticker {
    /// Subscribe `target` to fire every `interval_secs`. Adding the same pair
    /// twice keeps one subscription. Returns whether the pair is subscribed
    /// afterwards.
    fn add(&mut self, interval_secs: u64, target: TickTarget) -> bool;

    /// Drop the subscription for exactly this pair. Returns whether one existed.
    fn remove(&mut self, interval_secs: u64, target: &TickTarget) -> bool;
}

#[derive(Debug, Clone, Default)]
struct Subscription {
    since_last: Duration,
}

/// In-process ticker.
#[derive(Debug, Default)]
pub struct TickerHandler {
    subscriptions: BTreeMap<(u64, TickTarget), Subscription>,
}

impl TickerHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.subscriptions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }

    pub fn contains(&self, interval_secs: u64, target: &TickTarget) -> bool {
        self.subscriptions
            .contains_key(&(interval_secs, target.clone()))
    }

    /// Advance every subscription by `elapsed` and return the targets that
    /// came due, once per firing, ordered by interval then target.
    pub fn advance(&mut self, elapsed: Duration) -> Vec<TickTarget> {
        let mut due = Vec::new();
        for ((interval_secs, target), sub) in self.subscriptions.iter_mut() {
            let period = Duration::from_secs(*interval_secs);
            sub.since_last += elapsed;
            while sub.since_last >= period {
                sub.since_last -= period;
                due.push(target.clone());
            }
        }
        if !due.is_empty() {
            debug!("ticker: {} callback(s) due", due.len());
        }
        due
    }
}

impl Ticker for TickerHandler {
    fn add(&mut self, interval_secs: u64, target: TickTarget) -> bool {
        if interval_secs == 0 {
            warn!("ticker: refusing zero interval for {:?}", target);
            return false;
        }
        info!("ticker: add {:?} every {}s", target, interval_secs);
        self.subscriptions
            .entry((interval_secs, target))
            .or_default();
        true
    }

    fn remove(&mut self, interval_secs: u64, target: &TickTarget) -> bool {
        let removed = self
            .subscriptions
            .remove(&(interval_secs, target.clone()))
            .is_some();
        if removed {
            info!("ticker: remove {:?} ({}s)", target, interval_secs);
        }
        removed
    }
}
