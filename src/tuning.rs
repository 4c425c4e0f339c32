//! Data-driven game balance
//!
//! Every gameplay number the simulation reads lives here, so a session can be
//! rebalanced from JSON without touching code. Missing fields fall back to
//! the defaults in `crate::consts`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Error raised while loading tuning data
#[derive(Debug, Clone, PartialEq)]
pub enum TuningError {
    /// JSON could not be parsed
    Parse(String),
    /// A field holds a value the simulation cannot run with
    Invalid { field: &'static str, reason: String },
}

impl fmt::Display for TuningError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(msg) => write!(f, "tuning parse error: {msg}"),
            Self::Invalid { field, reason } => write!(f, "invalid tuning `{field}`: {reason}"),
        }
    }
}

impl std::error::Error for TuningError {}

/// Gameplay balance values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// RNG seed for obstacle placement and speed
    pub seed: u64,

    // === Playfield ===
    pub width: f32,
    pub height: f32,

    // === Player ===
    pub player_width: f32,
    pub player_height: f32,
    /// Distance from the bottom edge to the player's centre
    pub player_bottom_offset: f32,
    pub player_speed: f32,
    pub pointer_gain: f32,
    pub steer_margin: f32,

    // === Falling entities ===
    pub obstacle_width: f32,
    pub obstacle_height: f32,
    pub bonus_width: f32,
    pub bonus_height: f32,
    pub spawn_margin: f32,
    pub spawn_y: f32,
    pub fall_speed_min: f32,
    pub fall_speed_max: f32,
    pub obstacle_despawn_margin: f32,
    pub bonus_despawn_margin: f32,

    // === Lives ===
    pub start_lives: u32,
    pub max_lives: u32,

    // === Spawn ramp (ms) ===
    pub spawn_interval_ms: u32,
    pub spawn_interval_floor_ms: u32,
    pub spawn_interval_step_ms: u32,

    // === Phase delays (ms) ===
    pub death_delay_ms: u32,
    pub game_over_delay_ms: u32,

    // === Cosmetic ===
    pub background_scroll: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            seed: 0x5EED_1A9E,

            width: WIDTH,
            height: HEIGHT,

            player_width: PLAYER_WIDTH,
            player_height: PLAYER_HEIGHT,
            player_bottom_offset: PLAYER_BOTTOM_OFFSET,
            player_speed: PLAYER_SPEED,
            pointer_gain: POINTER_GAIN,
            steer_margin: STEER_MARGIN,

            obstacle_width: OBSTACLE_WIDTH,
            obstacle_height: OBSTACLE_HEIGHT,
            bonus_width: BONUS_WIDTH,
            bonus_height: BONUS_HEIGHT,
            spawn_margin: SPAWN_MARGIN,
            spawn_y: SPAWN_Y,
            fall_speed_min: FALL_SPEED_MIN,
            fall_speed_max: FALL_SPEED_MAX,
            obstacle_despawn_margin: OBSTACLE_DESPAWN_MARGIN,
            bonus_despawn_margin: BONUS_DESPAWN_MARGIN,

            start_lives: START_LIVES,
            max_lives: MAX_LIVES,

            spawn_interval_ms: SPAWN_INTERVAL_MS,
            spawn_interval_floor_ms: SPAWN_INTERVAL_FLOOR_MS,
            spawn_interval_step_ms: SPAWN_INTERVAL_STEP_MS,

            death_delay_ms: DEATH_DELAY_MS,
            game_over_delay_ms: GAME_OVER_DELAY_MS,

            background_scroll: BACKGROUND_SCROLL,
        }
    }
}

impl Tuning {
    /// Default balance with a specific seed
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }

    /// Parse and validate tuning from JSON (partial objects allowed)
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Self =
            serde_json::from_str(json).map_err(|e| TuningError::Parse(e.to_string()))?;
        tuning.validate()?;
        log::info!("Loaded tuning (seed {})", tuning.seed);
        Ok(tuning)
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String, TuningError> {
        serde_json::to_string_pretty(self).map_err(|e| TuningError::Parse(e.to_string()))
    }

    /// Check that every value is usable by the simulation
    pub fn validate(&self) -> Result<(), TuningError> {
        let positive = [
            ("width", self.width),
            ("height", self.height),
            ("player_width", self.player_width),
            ("player_height", self.player_height),
            ("obstacle_width", self.obstacle_width),
            ("obstacle_height", self.obstacle_height),
            ("bonus_width", self.bonus_width),
            ("bonus_height", self.bonus_height),
        ];
        for (field, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(invalid(field, format!("must be positive, got {value}")));
            }
        }

        let finite = [
            ("player_bottom_offset", self.player_bottom_offset),
            ("player_speed", self.player_speed),
            ("pointer_gain", self.pointer_gain),
            ("steer_margin", self.steer_margin),
            ("spawn_margin", self.spawn_margin),
            ("spawn_y", self.spawn_y),
            ("fall_speed_min", self.fall_speed_min),
            ("fall_speed_max", self.fall_speed_max),
            ("obstacle_despawn_margin", self.obstacle_despawn_margin),
            ("bonus_despawn_margin", self.bonus_despawn_margin),
            ("background_scroll", self.background_scroll),
        ];
        for (field, value) in finite {
            if !value.is_finite() {
                return Err(invalid(field, format!("must be finite, got {value}")));
            }
        }

        if self.player_speed < 0.0 || self.pointer_gain < 0.0 {
            return Err(invalid("player_speed", "steering values must be non-negative"));
        }
        if self.fall_speed_min < 0.0 {
            return Err(invalid(
                "fall_speed_min",
                format!("must be non-negative, got {}", self.fall_speed_min),
            ));
        }
        if self.fall_speed_max < self.fall_speed_min {
            return Err(invalid(
                "fall_speed_max",
                format!(
                    "range is inverted ({} < {})",
                    self.fall_speed_max, self.fall_speed_min
                ),
            ));
        }
        if self.spawn_margin < 0.0 || self.spawn_margin * 2.0 > self.width {
            return Err(invalid(
                "spawn_margin",
                format!("must fit inside half the width, got {}", self.spawn_margin),
            ));
        }
        if self.steer_margin < 0.0 || self.steer_margin * 2.0 > self.width {
            return Err(invalid(
                "steer_margin",
                format!("must fit inside half the width, got {}", self.steer_margin),
            ));
        }
        if self.max_lives == 0 {
            return Err(invalid("max_lives", "must be at least 1"));
        }
        if self.start_lives == 0 {
            return Err(invalid("start_lives", "must be at least 1"));
        }
        if self.start_lives > self.max_lives {
            return Err(invalid(
                "start_lives",
                format!("{} exceeds max_lives {}", self.start_lives, self.max_lives),
            ));
        }
        if self.spawn_interval_ms == 0 {
            return Err(invalid("spawn_interval_ms", "must be non-zero"));
        }
        if self.spawn_interval_floor_ms == 0 {
            return Err(invalid("spawn_interval_floor_ms", "must be non-zero"));
        }
        if self.spawn_interval_step_ms == 0 {
            return Err(invalid("spawn_interval_step_ms", "must be non-zero"));
        }

        Ok(())
    }

    /// Fixed y of the player's centre
    pub fn player_y(&self) -> f32 {
        self.height - self.player_bottom_offset
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> TuningError {
    TuningError::Invalid {
        field,
        reason: reason.into(),
    }
}
