//! Lives and the HUD icon row
//!
//! `icons.len() == current` holds after every public call. Icons are kept
//! as records even when the platform has no sprite for them.

use glam::Vec2;

use crate::consts::{HUD_ORIGIN_X, HUD_ORIGIN_Y, HUD_SPACING};
use crate::platform::{Platform, SpriteHandle, SpriteKind};

/// One life token in the HUD
#[derive(Debug, Clone, PartialEq)]
pub struct HudIcon {
    pub slot: u32,
    pub pos: Vec2,
    pub sprite: Option<SpriteHandle>,
}

#[derive(Debug, Clone)]
pub struct LifeState {
    current: u32,
    max: u32,
    icons: Vec<HudIcon>,
}

impl LifeState {
    /// Empty life state; call [`LifeState::reset`] to fill it
    pub fn new(max: u32) -> Self {
        Self {
            current: 0,
            max,
            icons: Vec::new(),
        }
    }

    #[inline]
    pub fn current(&self) -> u32 {
        self.current
    }

    #[inline]
    pub fn max(&self) -> u32 {
        self.max
    }

    pub fn icons(&self) -> &[HudIcon] {
        &self.icons
    }

    /// Screen position of HUD slot `slot`
    pub fn slot_position(slot: u32) -> Vec2 {
        Vec2::new(HUD_ORIGIN_X + slot as f32 * HUD_SPACING, HUD_ORIGIN_Y)
    }

    /// Replace all icons with `count` fresh ones (clamped to max)
    pub fn reset(&mut self, count: u32, platform: &mut dyn Platform) {
        self.clear(platform);
        let count = count.min(self.max);
        for _ in 0..count {
            self.push_icon(platform);
        }
        self.current = count;
    }

    /// Remove a life and the newest icon.
    ///
    /// Returns true only on the call that brings lives to zero.
    pub fn lose_life(&mut self, platform: &mut dyn Platform) -> bool {
        if self.current == 0 {
            return false;
        }
        self.current -= 1;
        if let Some(sprite) = self.icons.pop().and_then(|icon| icon.sprite) {
            platform.destroy_sprite(sprite);
        }
        self.current == 0
    }

    /// Add a life if below max. Returns whether one was added.
    pub fn gain_life(&mut self, platform: &mut dyn Platform) -> bool {
        if self.current >= self.max {
            return false;
        }
        self.push_icon(platform);
        self.current += 1;
        true
    }

    /// Destroy every icon without touching the count (used on death, when
    /// the count is already zero)
    pub fn clear(&mut self, platform: &mut dyn Platform) {
        for icon in self.icons.drain(..) {
            if let Some(sprite) = icon.sprite {
                platform.destroy_sprite(sprite);
            }
        }
    }

    fn push_icon(&mut self, platform: &mut dyn Platform) {
        let slot = self.icons.len() as u32;
        let pos = Self::slot_position(slot);
        let sprite = platform.create_sprite(SpriteKind::HudIcon, pos);
        self.icons.push(HudIcon { slot, pos, sprite });
    }
}
