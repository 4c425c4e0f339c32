//! Obstacle spawning and the difficulty ramp
//!
//! The spawner owns the spawn interval and a seeded RNG. Each timer tick
//! rolls a horizontal position and a fall speed; the session turns the roll
//! into an entity.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::tuning::Tuning;

/// Spawn interval and its ramp parameters (milliseconds)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpawnConfig {
    pub interval_ms: u32,
    pub floor_ms: u32,
    pub step_ms: u32,
}

impl SpawnConfig {
    pub fn new(interval_ms: u32, floor_ms: u32, step_ms: u32) -> Self {
        Self {
            interval_ms,
            floor_ms,
            step_ms,
        }
    }

    /// Apply one ramp step: `max(floor, interval - step)`.
    ///
    /// Returns true if the interval changed (the timer then needs re-arming).
    pub fn ramp(&mut self) -> bool {
        let next = self.interval_ms.saturating_sub(self.step_ms).max(self.floor_ms);
        let changed = next != self.interval_ms;
        self.interval_ms = next;
        changed
    }
}

/// Where and how fast a new obstacle falls
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnRoll {
    pub x: f32,
    pub y: f32,
    pub speed: f32,
}

#[derive(Debug, Clone)]
pub struct Spawner {
    pub config: SpawnConfig,
    rng: Pcg32,
}

impl Spawner {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            config: SpawnConfig::new(
                tuning.spawn_interval_ms,
                tuning.spawn_interval_floor_ms,
                tuning.spawn_interval_step_ms,
            ),
            rng: Pcg32::seed_from_u64(tuning.seed),
        }
    }

    /// Roll the next obstacle: x in `[margin, width - margin]`, speed in the fall range
    pub fn roll(&mut self, tuning: &Tuning) -> SpawnRoll {
        let x = self.uniform(tuning.spawn_margin, tuning.width - tuning.spawn_margin);
        let speed = self.uniform(tuning.fall_speed_min, tuning.fall_speed_max);
        SpawnRoll {
            x,
            y: tuning.spawn_y,
            speed,
        }
    }

    /// Uniform draw in `[lo, hi]`. Collapses to `lo` on an empty or
    /// non-finite range instead of panicking.
    fn uniform(&mut self, lo: f32, hi: f32) -> f32 {
        if !(lo.is_finite() && hi.is_finite()) || hi <= lo {
            return if lo.is_finite() { lo } else { 0.0 };
        }
        self.rng.random_range(lo..=hi)
    }
}
