use alloc::vec::Vec;
use core::time::Duration;
use serde::{Deserialize, Serialize};

use crate::*;

/// Position in world units, as used by the presentation layer.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn lerp(self, other: Point, t: f32) -> Point {
        Point {
            x: self.x + (other.x - self.x) * t,
            y: self.y + (other.y - self.y) * t,
        }
    }
}

/// Linear movement of one tile over a fixed duration.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Motion {
    pub tile: TileId,
    pub from: Point,
    pub to: Point,
    pub duration: Duration,
}

impl Motion {
    /// Interpolated position after `elapsed`; settles on `to` once the duration is over.
    pub fn position_at(&self, elapsed: Duration) -> Point {
        if self.duration.is_zero() || elapsed >= self.duration {
            return self.to;
        }
        let t = elapsed.as_secs_f32() / self.duration.as_secs_f32();
        self.from.lerp(self.to, t.clamp(0.0, 1.0))
    }
}

/// Work the presentation must finish before the engine may advance again.
#[derive(Clone, Debug, PartialEq)]
pub enum Step {
    /// Play all motions concurrently; advance only after every one of them completed.
    Animate(Vec<Motion>),
    /// Pacing delay between cascade phases.
    Wait(Duration),
    /// Nothing is in flight.
    Stable,
}

impl Step {
    pub const fn is_stable(&self) -> bool {
        matches!(self, Self::Stable)
    }

    /// Wall time the step takes when played back.
    pub fn duration(&self) -> Duration {
        match self {
            Self::Animate(motions) => motions
                .iter()
                .map(|motion| motion.duration)
                .max()
                .unwrap_or_default(),
            Self::Wait(duration) => *duration,
            Self::Stable => Duration::ZERO,
        }
    }
}

/// Presentation hook driving the engine's suspension points.
pub trait AnimationDriver {
    /// Plays `motions` in parallel and returns once all of them are complete.
    fn animate(&mut self, motions: &[Motion]);

    fn wait(&mut self, duration: Duration);
}

/// Driver that completes every animation and delay immediately.
#[derive(Copy, Clone, Debug, Default)]
pub struct InstantDriver;

impl AnimationDriver for InstantDriver {
    fn animate(&mut self, _motions: &[Motion]) {}

    fn wait(&mut self, _duration: Duration) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn motion(ms: u64) -> Motion {
        Motion {
            tile: TileId(0),
            from: Point::new(0.0, 8.0),
            to: Point::new(0.0, 0.0),
            duration: Duration::from_millis(ms),
        }
    }

    #[test]
    fn position_interpolates_linearly_and_settles() {
        let motion = motion(200);
        assert_eq!(motion.position_at(Duration::ZERO), Point::new(0.0, 8.0));
        assert_eq!(motion.position_at(Duration::from_millis(100)), Point::new(0.0, 4.0));
        assert_eq!(motion.position_at(Duration::from_millis(500)), Point::new(0.0, 0.0));
    }

    #[test]
    fn zero_duration_motion_jumps_to_target() {
        assert_eq!(motion(0).position_at(Duration::ZERO), Point::new(0.0, 0.0));
    }

    #[test]
    fn animate_step_lasts_as_long_as_slowest_motion() {
        let step = Step::Animate(vec![motion(150), motion(200)]);
        assert_eq!(step.duration(), Duration::from_millis(200));
        assert_eq!(Step::Animate(vec![]).duration(), Duration::ZERO);
        assert!(Step::Stable.is_stable());
    }
}
