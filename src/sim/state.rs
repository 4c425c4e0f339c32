//! Game state and core simulation types
//!
//! Everything a session mutates lives in [`GameState`]; nothing is global.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::Aabb;
use super::lives::LifeState;
use super::registry::EntityRegistry;
use super::spawner::Spawner;
use crate::platform::SpriteHandle;
use crate::tuning::Tuning;

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    /// Active gameplay: spawning, movement, collisions, input
    Playing,
    /// Lives ran out, waiting to show the GameOver banner
    Dying,
    /// Banner shown, waiting to hand control back to the menu
    GameOver,
}

/// Stable entity identifier, allocated in increasing order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(pub u32);

/// What happens when a falling entity reaches the player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityKind {
    /// Costs a life
    Obstacle,
    /// Restores a life (up to the max); leaving the screen ramps difficulty
    Bonus,
}

/// A falling entity (obstacle or bonus vehicle)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub kind: EntityKind,
    /// Sprite centre
    pub pos: Vec2,
    /// Fall speed in pixels/second (never negative)
    pub speed: f32,
    pub size: Vec2,
    /// Host sprite, if the platform created one
    #[serde(skip)]
    pub sprite: Option<SpriteHandle>,
}

impl Entity {
    pub fn bounds(&self) -> Aabb {
        Aabb::from_center(self.pos, self.size)
    }
}

/// The player's car
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub size: Vec2,
    /// Horizontal velocity from the last steering update (pixels/s)
    pub vel_x: f32,
    pub alive: bool,
    #[serde(skip)]
    pub sprite: Option<SpriteHandle>,
}

impl Player {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            pos: Vec2::new(tuning.width / 2.0, tuning.player_y()),
            size: Vec2::new(tuning.player_width, tuning.player_height),
            vel_x: 0.0,
            alive: true,
            sprite: None,
        }
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::from_center(self.pos, self.size)
    }
}

/// Something that happened during a frame or timer callback
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    ObstacleSpawned { id: EntityId, x: f32, speed: f32 },
    BonusSpawned { id: EntityId, x: f32, speed: f32 },
    ObstacleHit { id: EntityId },
    BonusCollected { id: EntityId, life_gained: bool },
    /// Entity fell past the bottom without touching the player
    EntityMissed { id: EntityId, kind: EntityKind },
    LifeLost { remaining: u32 },
    LifeGained { current: u32 },
    SpawnIntervalChanged { interval_ms: u32 },
    PlayerDied,
    GameOverShown,
    ReturnedToMenu,
}

/// Read-only snapshot for HUD/debug display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionStatus {
    pub current_lives: u32,
    pub max_lives: u32,
    pub phase: SessionPhase,
    pub obstacles: usize,
    pub bonuses: usize,
    pub spawn_interval_ms: u32,
    pub background_offset: f32,
    pub menu_requested: bool,
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Balance values this session runs with
    pub tuning: Tuning,
    pub phase: SessionPhase,
    pub player: Player,
    /// Live obstacles and bonus vehicles
    pub entities: EntityRegistry,
    pub lives: LifeState,
    pub spawner: Spawner,
    /// Tiled background scroll (cosmetic, keeps moving after death)
    pub background_offset: f32,
    /// Frame time accumulated while the session exists (ms)
    pub elapsed_ms: f64,
    /// Set once the menu hand-off has been requested
    pub menu_requested: bool,
    /// Events since the host last drained them
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Fresh state. Lives start at zero; the session fills them in on start.
    pub fn new(tuning: Tuning) -> Self {
        Self {
            phase: SessionPhase::Playing,
            player: Player::new(&tuning),
            entities: EntityRegistry::new(),
            lives: LifeState::new(tuning.max_lives),
            spawner: Spawner::new(&tuning),
            background_offset: 0.0,
            elapsed_ms: 0.0,
            menu_requested: false,
            events: Vec::new(),
            tuning,
        }
    }

    pub fn status(&self) -> SessionStatus {
        SessionStatus {
            current_lives: self.lives.current(),
            max_lives: self.lives.max(),
            phase: self.phase,
            obstacles: self.entities.count(EntityKind::Obstacle),
            bonuses: self.entities.count(EntityKind::Bonus),
            spawn_interval_ms: self.spawner.config.interval_ms,
            background_offset: self.background_offset,
            menu_requested: self.menu_requested,
        }
    }

    #[inline]
    pub fn is_playing(&self) -> bool {
        self.phase == SessionPhase::Playing
    }
}
