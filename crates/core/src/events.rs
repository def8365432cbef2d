use serde::{Deserialize, Serialize};

/// Observer notifications emitted by decision entry points. Hosts that
/// never drain the bus get a no-op sink; the search and kernel hot
/// paths emit nothing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Event {
    CombatDecided {
        action: String,
        value: f64,
        explored: usize,
        cache_hits: usize,
    },
    LootDecided {
        index: usize,
        score: f64,
        considered: usize,
    },
}

#[derive(Debug, Default)]
pub struct EventBus {
    queue: Vec<Event>,
}

impl EventBus {
    pub fn push(&mut self, event: Event) {
        self.queue.push(event);
    }

    pub fn drain(&mut self) -> impl Iterator<Item = Event> + '_ {
        self.queue.drain(..)
    }
}
