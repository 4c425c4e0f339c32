//! Movement integration
//!
//! Falling entities move by their own stored speed, the player steers
//! horizontally, and the background scrolls a fixed amount per frame.

use super::registry::EntityRegistry;
use super::state::{Entity, EntityKind, Player};
use crate::tuning::Tuning;

/// Derived input signals for one frame
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameInput {
    /// Steer left (keyboard)
    pub left: bool,
    /// Steer right (keyboard)
    pub right: bool,
    /// Pointer x to follow when no key is held
    pub pointer_x: Option<f32>,
}

/// `y += speed * dt` for every entity
pub fn integrate_entities(entities: &mut EntityRegistry, dt_secs: f32) {
    for entity in entities.iter_mut() {
        entity.pos.y += entity.speed * dt_secs;
    }
}

/// Update the player's horizontal velocity from input and integrate it.
///
/// Keys win over the pointer; left wins over right. The player is kept
/// fully inside the playfield.
pub fn steer_player(player: &mut Player, input: &FrameInput, tuning: &Tuning, dt_secs: f32) {
    let speed = tuning.player_speed;
    player.vel_x = if input.left {
        -speed
    } else if input.right {
        speed
    } else if let Some(target) = input.pointer_x {
        let target = target.clamp(tuning.steer_margin, tuning.width - tuning.steer_margin);
        ((target - player.pos.x) * tuning.pointer_gain).clamp(-speed, speed)
    } else {
        0.0
    };

    let half = player.size.x / 2.0;
    player.pos.x = (player.pos.x + player.vel_x * dt_secs).clamp(half, (tuning.width - half).max(half));
}

/// Remove entities that fell past their despawn line, in id order
pub fn sweep_offscreen(entities: &mut EntityRegistry, tuning: &Tuning) -> Vec<Entity> {
    let obstacle_line = tuning.height + tuning.obstacle_despawn_margin;
    let bonus_line = tuning.height + tuning.bonus_despawn_margin;
    entities.remove_where(|e| match e.kind {
        EntityKind::Obstacle => e.pos.y > obstacle_line,
        EntityKind::Bonus => e.pos.y > bonus_line,
    })
}

/// Next background offset (scrolls regardless of session phase)
#[inline]
pub fn scroll_background(offset: f32, tuning: &Tuning) -> f32 {
    offset - tuning.background_scroll
}
