//! Adaptive room sequence.
//!
//! The sequence only grows. Each new room is prepended, so the room added
//! last is played first and the chain extends backward. A new room is drawn
//! from templates not yet in the sequence; once every template is used, any
//! template except the current head may be drawn, so no room follows itself.

use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;
use tracing::debug;

use crate::rooms::TemplateRegistry;

#[derive(Debug, Clone)]
pub struct AdaptiveSequence {
    rooms: Vec<&'static str>,
    rng: Xoshiro256PlusPlus,
}

impl AdaptiveSequence {
    pub fn new(seed: u64) -> Self {
        Self {
            rooms: Vec::new(),
            rng: Xoshiro256PlusPlus::seed_from_u64(seed),
        }
    }

    /// Prepend rooms until the sequence holds `total` entries
    pub fn grow_to(&mut self, total: usize, registry: &TemplateRegistry) {
        while self.rooms.len() < total {
            let Some(id) = self.pick(registry) else {
                return;
            };
            debug!(room = id, len = self.rooms.len() + 1, "adaptive sequence grew");
            self.rooms.insert(0, id);
        }
    }

    fn pick(&mut self, registry: &TemplateRegistry) -> Option<&'static str> {
        let unused: Vec<&'static str> = registry
            .iter()
            .map(|t| t.id)
            .filter(|id| !self.rooms.contains(id))
            .collect();

        let pool = if unused.is_empty() {
            let head = self.rooms.first().copied();
            let others: Vec<&'static str> =
                registry.iter().map(|t| t.id).filter(|&id| Some(id) != head).collect();
            if others.is_empty() {
                registry.ids()
            } else {
                others
            }
        } else {
            unused
        };

        if pool.is_empty() {
            return None;
        }
        Some(pool[self.rng.gen_range(0..pool.len())])
    }

    pub fn rooms(&self) -> &[&'static str] {
        &self.rooms
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    /// Forget the sequence; the RNG stream continues
    pub fn clear(&mut self) {
        self.rooms.clear();
    }
}
