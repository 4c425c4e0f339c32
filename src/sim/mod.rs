//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time only advances through the frame delta and the session clock
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies beyond the `Platform` trait

pub mod collision;
pub mod geometry;
pub mod lives;
pub mod movement;
pub mod registry;
pub mod spawner;
pub mod state;
pub mod tick;
pub mod timer;

pub use collision::{Contact, player_contacts};
pub use geometry::{Aabb, intersects};
pub use lives::{HudIcon, LifeState};
pub use movement::FrameInput;
pub use registry::EntityRegistry;
pub use spawner::{SpawnConfig, SpawnRoll, Spawner};
pub use state::{
    Entity, EntityId, EntityKind, GameEvent, GameState, Player, SessionPhase,
    SessionStatus,
};
pub use tick::{Session, TimerTag};
pub use timer::{TimerHandle, Timers};
