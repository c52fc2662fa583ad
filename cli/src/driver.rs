use std::thread;
use std::time::Duration;

use match3_core::{AnimationDriver, Motion};

/// Plays steps back in wall time, scaled by `speed`. A speed of zero skips all waiting.
#[derive(Copy, Clone, Debug)]
pub struct PacedDriver {
    speed: f32,
}

impl PacedDriver {
    pub fn new(speed: f32) -> Self {
        Self {
            speed: speed.max(0.0),
        }
    }

    fn scaled(&self, duration: Duration) -> Option<Duration> {
        if self.speed == 0.0 {
            return None;
        }
        Duration::try_from_secs_f32(duration.as_secs_f32() / self.speed).ok()
    }
}

impl AnimationDriver for PacedDriver {
    fn animate(&mut self, motions: &[Motion]) {
        let longest = motions
            .iter()
            .map(|motion| motion.duration)
            .max()
            .unwrap_or_default();
        for motion in motions {
            log::trace!(
                "tile {:?}: ({:.1}, {:.1}) -> ({:.1}, {:.1})",
                motion.tile,
                motion.from.x,
                motion.from.y,
                motion.to.x,
                motion.to.y
            );
        }
        if let Some(duration) = self.scaled(longest) {
            thread::sleep(duration);
        }
    }

    fn wait(&mut self, duration: Duration) {
        if let Some(duration) = self.scaled(duration) {
            thread::sleep(duration);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_speed_never_sleeps() {
        let driver = PacedDriver::new(0.0);
        assert_eq!(driver.scaled(Duration::from_secs(5)), None);
    }

    #[test]
    fn speed_scales_durations() {
        let driver = PacedDriver::new(2.0);
        let scaled = driver.scaled(Duration::from_millis(200)).unwrap();
        assert!(scaled > Duration::from_millis(99) && scaled < Duration::from_millis(101));
    }

    #[test]
    fn tiny_speed_does_not_overflow() {
        let driver = PacedDriver::new(1e-30);
        assert_eq!(driver.scaled(Duration::from_millis(200)), None);
    }
}
