use core::time::Duration;
use serde::{Deserialize, Serialize};

use crate::*;

/// Points awarded for each resolved cascade iteration, regardless of its size.
pub const POINTS_PER_RESOLUTION: u32 = 10;

const FEVER_PER_TILE: f32 = 0.05;
const FEVER_DECAY_PER_SEC: f32 = 0.1;

/// Running score and fever gauge, fed from [`BoardEvent`]s.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreBoard {
    score: u32,
    fever: f32,
    removed: u32,
}

impl ScoreBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    /// Fever gauge fill in `0.0..=1.0`.
    pub fn fever(&self) -> f32 {
        self.fever
    }

    pub fn removed(&self) -> u32 {
        self.removed
    }

    pub fn apply(&mut self, event: &BoardEvent) {
        if let BoardEvent::ScoreChanged(removed) = *event {
            self.score = self.score.saturating_add(POINTS_PER_RESOLUTION);
            self.removed = self.removed.saturating_add(removed.into());
            self.fever = (f32::from(removed) * FEVER_PER_TILE).clamp(0.0, 1.0);
        }
    }

    pub fn decay(&mut self, elapsed: Duration) {
        self.fever = (self.fever - elapsed.as_secs_f32() * FEVER_DECAY_PER_SEC).max(0.0);
    }

    pub fn reset_fever(&mut self) {
        self.fever = 0.0;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
