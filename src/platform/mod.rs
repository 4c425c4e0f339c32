//! Platform abstraction layer
//!
//! The simulation never draws or navigates by itself. It talks to the host
//! through [`Platform`]:
//! - Sprite creation/movement/destruction for the player, falling entities and HUD icons
//! - Terminal messages
//! - Background scroll offset
//! - Scene navigation
//!
//! Every capability except `navigate_to` has a default no-op, so a host that
//! lacks one simply degrades. `create_sprite` returning `None` is also fine:
//! the simulation keeps its own state and skips the visual side effect.

use std::collections::BTreeMap;

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Opaque handle to a host-side sprite
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SpriteHandle(pub u32);

/// What a sprite depicts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpriteKind {
    Player,
    Obstacle,
    Bonus,
    HudIcon,
}

/// Scenes outside the gameplay core
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Scene {
    Menu,
}

/// Host services consumed by the simulation
pub trait Platform {
    /// Create a sprite at `pos`. `None` means the host has no visual for it.
    fn create_sprite(&mut self, _kind: SpriteKind, _pos: Vec2) -> Option<SpriteHandle> {
        None
    }

    /// Move an existing sprite
    fn move_sprite(&mut self, _handle: SpriteHandle, _pos: Vec2) {}

    /// Destroy a sprite. Unknown handles must be ignored.
    fn destroy_sprite(&mut self, _handle: SpriteHandle) {}

    /// Show a centred message (used for the GameOver banner)
    fn show_message(&mut self, _text: &str, _pos: Vec2) {}

    /// Scroll the tiled background
    fn set_background_offset(&mut self, _offset: f32) {}

    /// Hand control to another scene
    fn navigate_to(&mut self, scene: Scene);
}

/// In-memory platform for headless runs and tests
///
/// Tracks live sprites so callers can check the simulation cleans up after
/// itself, and records messages and navigation requests in order.
#[derive(Debug, Default)]
pub struct HeadlessPlatform {
    next_handle: u32,
    /// Live sprites by handle
    pub sprites: BTreeMap<SpriteHandle, (SpriteKind, Vec2)>,
    /// Messages shown, oldest first
    pub messages: Vec<String>,
    /// Scenes requested, oldest first
    pub navigations: Vec<Scene>,
    /// Latest background offset
    pub background_offset: f32,
    /// Destroy calls for handles that were not live
    pub stale_destroys: u32,
    /// When false, `create_sprite` returns `None` (no rendering available)
    pub sprites_enabled: bool,
}

impl HeadlessPlatform {
    pub fn new() -> Self {
        Self {
            sprites_enabled: true,
            ..Default::default()
        }
    }

    /// Headless host that cannot create sprites at all
    pub fn without_sprites() -> Self {
        Self::default()
    }

    /// Number of live sprites of a kind
    pub fn count(&self, kind: SpriteKind) -> usize {
        self.sprites.values().filter(|(k, _)| *k == kind).count()
    }
}

impl Platform for HeadlessPlatform {
    fn create_sprite(&mut self, kind: SpriteKind, pos: Vec2) -> Option<SpriteHandle> {
        if !self.sprites_enabled {
            return None;
        }
        self.next_handle += 1;
        let handle = SpriteHandle(self.next_handle);
        self.sprites.insert(handle, (kind, pos));
        Some(handle)
    }

    fn move_sprite(&mut self, handle: SpriteHandle, pos: Vec2) {
        if let Some(entry) = self.sprites.get_mut(&handle) {
            entry.1 = pos;
        }
    }

    fn destroy_sprite(&mut self, handle: SpriteHandle) {
        if self.sprites.remove(&handle).is_none() {
            self.stale_destroys += 1;
        }
    }

    fn show_message(&mut self, text: &str, _pos: Vec2) {
        self.messages.push(text.to_string());
    }

    fn set_background_offset(&mut self, offset: f32) {
        self.background_offset = offset;
    }

    fn navigate_to(&mut self, scene: Scene) {
        log::info!("Navigating to {:?}", scene);
        self.navigations.push(scene);
    }
}
