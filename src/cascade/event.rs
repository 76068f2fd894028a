//! Cascade output: the wave-labelled replay log.
//!
//! The log is presentation metadata. Discarding it never changes the game;
//! a renderer uses `wave` as a delay multiplier to stage the explosions.

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

use crate::board::Position;
use crate::core::PlayerId;

/// What happened to a cell during a cascade step.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventKind {
    /// The cell hit capacity, reset to empty and fed its neighbours.
    Exploded { owner: PlayerId, power: u32 },
    /// A neighbour's explosion took the cell over.
    Captured {
        from: Position,
        previous_owner: Option<PlayerId>,
    },
    /// A neighbour's explosion added power to a cell it already owned.
    Reinforced { from: Position },
}

/// One entry in the replay log.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CascadeEvent {
    pub cell: Position,
    /// BFS depth of the explosion that produced this event.
    pub wave: u32,
    pub kind: EventKind,
}

impl CascadeEvent {
    #[must_use]
    pub fn is_explosion(&self) -> bool {
        matches!(self.kind, EventKind::Exploded { .. })
    }

    /// Source cell when this event is a capture.
    #[must_use]
    pub fn captured_from(&self) -> Option<Position> {
        match self.kind {
            EventKind::Captured { from, .. } => Some(from),
            _ => None,
        }
    }
}

/// Per-cell animation cue, keyed by coordinate in [`CascadeReport::hints`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnimationHint {
    /// Cell emptied by its own explosion.
    Burst { wave: u32 },
    /// Ownership flew in from a neighbouring explosion.
    FlyIn { from: Position, wave: u32 },
    /// Same owner, power bumped in place.
    Pulse { from: Position, wave: u32 },
}

impl From<&CascadeEvent> for AnimationHint {
    fn from(event: &CascadeEvent) -> Self {
        let wave = event.wave;
        match event.kind {
            EventKind::Exploded { .. } => AnimationHint::Burst { wave },
            EventKind::Captured { from, .. } => AnimationHint::FlyIn { from, wave },
            EventKind::Reinforced { from } => AnimationHint::Pulse { from, wave },
        }
    }
}

/// Everything a cascade did, in processing order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CascadeReport {
    events: Vec<CascadeEvent>,
    explosions: usize,
    dequeues: usize,
    last_wave: Option<u32>,
}

impl CascadeReport {
    pub(crate) fn push(&mut self, event: CascadeEvent) {
        if event.is_explosion() {
            self.explosions += 1;
            self.last_wave = Some(self.last_wave.map_or(event.wave, |w| w.max(event.wave)));
        }
        self.events.push(event);
    }

    pub(crate) fn record_dequeue(&mut self) -> usize {
        self.dequeues += 1;
        self.dequeues
    }

    #[must_use]
    pub fn events(&self) -> &[CascadeEvent] {
        &self.events
    }

    pub fn into_events(self) -> Vec<CascadeEvent> {
        self.events
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Number of cells that exploded.
    #[must_use]
    pub fn explosions(&self) -> usize {
        self.explosions
    }

    /// Number of queue entries processed.
    #[must_use]
    pub fn dequeues(&self) -> usize {
        self.dequeues
    }

    /// Number of distinct waves (0 when nothing exploded).
    #[must_use]
    pub fn wave_count(&self) -> u32 {
        self.last_wave.map_or(0, |w| w + 1)
    }

    /// Events belonging to one wave, in processing order.
    pub fn events_in_wave(&self, wave: u32) -> impl Iterator<Item = &CascadeEvent> {
        self.events.iter().filter(move |e| e.wave == wave)
    }

    /// Every cell the cascade touched, sorted row-major without repeats.
    #[must_use]
    pub fn changed_cells(&self) -> Vec<Position> {
        let unique: FxHashSet<Position> = self.events.iter().map(|e| e.cell).collect();
        let mut cells: Vec<Position> = unique.into_iter().collect();
        cells.sort_unstable();
        cells
    }

    /// Latest animation cue per cell.
    #[must_use]
    pub fn hints(&self) -> FxHashMap<Position, AnimationHint> {
        self.events
            .iter()
            .map(|e| (e.cell, AnimationHint::from(e)))
            .collect()
    }
}
