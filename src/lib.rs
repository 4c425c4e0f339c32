//! Lane Dodge - a lane-avoidance arcade game core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (spawning, movement, collisions, lives, session phases)
//! - `platform`: Presentation/navigation seams the host implements
//! - `tuning`: Data-driven game balance

pub mod platform;
pub mod sim;
pub mod tuning;

pub use platform::{HeadlessPlatform, Platform, Scene, SpriteHandle, SpriteKind};
pub use tuning::{Tuning, TuningError};

/// Game configuration defaults (mirrored by `Tuning::default`)
pub mod consts {
    /// Playfield dimensions
    pub const WIDTH: f32 = 800.0;
    pub const HEIGHT: f32 = 600.0;

    /// Player car - fixed row near the bottom
    pub const PLAYER_WIDTH: f32 = 40.0;
    pub const PLAYER_HEIGHT: f32 = 80.0;
    pub const PLAYER_BOTTOM_OFFSET: f32 = 80.0;
    /// Horizontal steering speed (pixels/s)
    pub const PLAYER_SPEED: f32 = 300.0;
    /// Pointer follow gain (velocity per pixel of error)
    pub const POINTER_GAIN: f32 = 8.0;
    /// Pointer targets are clamped this far from the edges
    pub const STEER_MARGIN: f32 = 48.0;

    /// Falling entity boxes
    pub const OBSTACLE_WIDTH: f32 = 48.0;
    pub const OBSTACLE_HEIGHT: f32 = 80.0;
    pub const BONUS_WIDTH: f32 = 48.0;
    pub const BONUS_HEIGHT: f32 = 80.0;

    /// Obstacles spawn this far from either edge so they are never cut off
    pub const SPAWN_MARGIN: f32 = 48.0;
    /// Spawn row, above the visible area
    pub const SPAWN_Y: f32 = -80.0;
    /// Fall speed range (pixels/s)
    pub const FALL_SPEED_MIN: f32 = 240.0;
    pub const FALL_SPEED_MAX: f32 = 420.0;

    /// Despawn thresholds below the playfield
    pub const OBSTACLE_DESPAWN_MARGIN: f32 = 80.0;
    pub const BONUS_DESPAWN_MARGIN: f32 = 50.0;

    /// Lives
    pub const START_LIVES: u32 = 3;
    pub const MAX_LIVES: u32 = 5;

    /// Spawn interval ramp (milliseconds)
    pub const SPAWN_INTERVAL_MS: u32 = 3000;
    pub const SPAWN_INTERVAL_FLOOR_MS: u32 = 4000;
    pub const SPAWN_INTERVAL_STEP_MS: u32 = 200;

    /// Session phase delays (milliseconds)
    pub const DEATH_DELAY_MS: u32 = 1000;
    pub const GAME_OVER_DELAY_MS: u32 = 3000;

    /// Background scroll per frame (cosmetic)
    pub const BACKGROUND_SCROLL: f32 = 2.2;

    /// HUD life icon layout
    pub const HUD_ORIGIN_X: f32 = 16.0;
    pub const HUD_ORIGIN_Y: f32 = 16.0;
    pub const HUD_SPACING: f32 = 36.0;

    /// Terminal message
    pub const GAME_OVER_TEXT: &str = "GameOver";
}

/// Convert a millisecond frame delta to seconds
#[inline]
pub fn ms_to_secs(elapsed_ms: f32) -> f32 {
    elapsed_ms / 1000.0
}
