//! Session driver and phase machine
//!
//! Two independent schedules drive a session:
//! - [`Session::on_frame`], called by the host once per rendered frame
//!   (scroll, steering, movement, collisions, despawn)
//! - the session's own [`Timers`], advanced by [`Session::advance_clock`]
//!   (obstacle spawns and the delayed Dying -> GameOver -> Menu hand-off)
//!
//! They only share the entity registry and life state inside [`GameState`].

use glam::Vec2;

use super::collision::player_contacts;
use super::movement::{
    FrameInput, integrate_entities, scroll_background, steer_player, sweep_offscreen,
};
use super::state::{EntityId, EntityKind, GameEvent, GameState, SessionPhase, SessionStatus};
use super::timer::{TimerHandle, Timers};
use crate::consts::GAME_OVER_TEXT;
use crate::ms_to_secs;
use crate::platform::{Platform, Scene, SpriteKind};
use crate::tuning::Tuning;

/// What a session timer does when it fires
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerTag {
    /// Repeating obstacle spawn
    Spawn,
    /// One-shot Dying -> GameOver
    ShowGameOver,
    /// One-shot GameOver -> Menu
    ReturnToMenu,
}

/// One play-through, from scene entry to the menu hand-off
#[derive(Debug, Clone)]
pub struct Session {
    state: GameState,
    timers: Timers<TimerTag>,
    spawn_timer: Option<TimerHandle>,
}

impl Session {
    /// Enter the game scene: create the player, fill the HUD and arm the spawn timer
    pub fn start(tuning: Tuning, platform: &mut dyn Platform) -> Self {
        let mut state = GameState::new(tuning);
        state.player.sprite = platform.create_sprite(SpriteKind::Player, state.player.pos);
        let start_lives = state.tuning.start_lives;
        state.lives.reset(start_lives, platform);

        let mut session = Self {
            state,
            timers: Timers::new(),
            spawn_timer: None,
        };
        session.arm_spawn_timer();
        log::info!(
            "Session started (seed {}, lives {}/{}, spawn every {} ms)",
            session.state.tuning.seed,
            session.state.lives.current(),
            session.state.lives.max(),
            session.state.spawner.config.interval_ms
        );
        session
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn status(&self) -> SessionStatus {
        self.state.status()
    }

    pub fn current_lives(&self) -> u32 {
        self.state.lives.current()
    }

    pub fn max_lives(&self) -> u32 {
        self.state.lives.max()
    }

    pub fn phase(&self) -> SessionPhase {
        self.state.phase
    }

    /// Take all events recorded since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.state.events)
    }

    /// Convenience for hosts with a single loop: one frame, then the clock
    pub fn update(&mut self, elapsed_ms: f32, input: &FrameInput, platform: &mut dyn Platform) {
        self.on_frame(elapsed_ms, input, platform);
        self.advance_clock(elapsed_ms, platform);
    }

    /// Per-frame update: scroll, steer, move, collide, despawn
    pub fn on_frame(&mut self, elapsed_ms: f32, input: &FrameInput, platform: &mut dyn Platform) {
        let elapsed_ms = sanitize_elapsed(elapsed_ms);
        let state = &mut self.state;
        state.elapsed_ms += f64::from(elapsed_ms);

        state.background_offset = scroll_background(state.background_offset, &state.tuning);
        platform.set_background_offset(state.background_offset);

        if !state.is_playing() {
            return;
        }

        let dt = ms_to_secs(elapsed_ms);
        steer_player(&mut state.player, input, &state.tuning, dt);
        if let Some(sprite) = state.player.sprite {
            platform.move_sprite(sprite, state.player.pos);
        }

        integrate_entities(&mut state.entities, dt);
        for entity in state.entities.iter() {
            if let Some(sprite) = entity.sprite {
                platform.move_sprite(sprite, entity.pos);
            }
        }

        // Collisions see post-move positions
        let contacts = player_contacts(&state.player.bounds(), &state.entities);
        for contact in contacts {
            match contact.kind {
                EntityKind::Obstacle => self.hit_obstacle(contact.id, platform),
                EntityKind::Bonus => self.collect_bonus(contact.id, platform),
            }
        }

        self.despawn_offscreen(platform);
    }

    /// Advance the session clock, dispatching every timer that comes due
    pub fn advance_clock(&mut self, elapsed_ms: f32, platform: &mut dyn Platform) {
        let until = self.timers.now_ms() + f64::from(sanitize_elapsed(elapsed_ms));
        while let Some(tag) = self.timers.pop_due(until) {
            match tag {
                TimerTag::Spawn => {
                    self.on_timer_tick(platform);
                }
                TimerTag::ShowGameOver => self.enter_game_over(platform),
                TimerTag::ReturnToMenu => self.return_to_menu(platform),
            }
        }
        self.timers.set_now(until);
    }

    /// Spawn-timer callback: create one obstacle while playing
    pub fn on_timer_tick(&mut self, platform: &mut dyn Platform) -> Option<EntityId> {
        let state = &mut self.state;
        if !state.is_playing() {
            log::trace!("Spawn tick outside Playing ignored");
            return None;
        }

        let roll = state.spawner.roll(&state.tuning);
        let pos = Vec2::new(roll.x, roll.y);
        let size = Vec2::new(state.tuning.obstacle_width, state.tuning.obstacle_height);
        let id = state.entities.add(EntityKind::Obstacle, pos, roll.speed, size);
        let sprite = platform.create_sprite(SpriteKind::Obstacle, pos);
        if let Some(entity) = state.entities.get_mut(id) {
            entity.sprite = sprite;
        }

        log::debug!("Spawned obstacle {:?} at x={:.1} ({:.0} px/s)", id, roll.x, roll.speed);
        state.events.push(GameEvent::ObstacleSpawned {
            id,
            x: roll.x,
            speed: roll.speed,
        });
        Some(id)
    }

    /// External bonus-vehicle generator entry point. Falls at `speed` px/s.
    pub fn spawn_bonus(&mut self, x: f32, speed: f32, platform: &mut dyn Platform) -> Option<EntityId> {
        let state = &mut self.state;
        if !state.is_playing() {
            return None;
        }

        let pos = Vec2::new(x, state.tuning.spawn_y);
        let size = Vec2::new(state.tuning.bonus_width, state.tuning.bonus_height);
        let id = state.entities.add(EntityKind::Bonus, pos, speed, size);
        let sprite = platform.create_sprite(SpriteKind::Bonus, pos);
        let speed = match state.entities.get_mut(id) {
            Some(entity) => {
                entity.sprite = sprite;
                entity.speed
            }
            None => speed.max(0.0),
        };

        log::debug!("Spawned bonus {:?} at x={:.1} ({:.0} px/s)", id, x, speed);
        state.events.push(GameEvent::BonusSpawned { id, x, speed });
        Some(id)
    }

    /// Remove a life. Enters Dying when lives reach zero. No-op outside Playing.
    pub fn lose_life(&mut self, platform: &mut dyn Platform) {
        if !self.state.is_playing() {
            return;
        }
        let depleted = self.state.lives.lose_life(platform);
        let remaining = self.state.lives.current();
        log::debug!("Life lost, {} remaining", remaining);
        self.state.events.push(GameEvent::LifeLost { remaining });
        if depleted {
            self.enter_dying(platform);
        }
    }

    /// Add a life if below max. No-op outside Playing.
    pub fn gain_life(&mut self, platform: &mut dyn Platform) -> bool {
        if !self.state.is_playing() {
            return false;
        }
        let gained = self.state.lives.gain_life(platform);
        if gained {
            let current = self.state.lives.current();
            log::debug!("Life gained, now {}", current);
            self.state.events.push(GameEvent::LifeGained { current });
        }
        gained
    }

    fn hit_obstacle(&mut self, id: EntityId, platform: &mut dyn Platform) {
        if !self.state.is_playing() {
            return;
        }
        let Some(entity) = self.state.entities.remove(id) else {
            log::trace!("Stale obstacle {:?}", id);
            return;
        };
        if let Some(sprite) = entity.sprite {
            platform.destroy_sprite(sprite);
        }
        log::debug!("Obstacle {:?} hit the player", id);
        self.state.events.push(GameEvent::ObstacleHit { id });
        self.lose_life(platform);
    }

    fn collect_bonus(&mut self, id: EntityId, platform: &mut dyn Platform) {
        if !self.state.is_playing() {
            return;
        }
        let Some(entity) = self.state.entities.remove(id) else {
            log::trace!("Stale bonus {:?}", id);
            return;
        };
        if let Some(sprite) = entity.sprite {
            platform.destroy_sprite(sprite);
        }
        let life_gained = self.gain_life(platform);
        log::debug!("Bonus {:?} collected (life gained: {})", id, life_gained);
        self.state
            .events
            .push(GameEvent::BonusCollected { id, life_gained });
    }

    fn despawn_offscreen(&mut self, platform: &mut dyn Platform) {
        let gone = sweep_offscreen(&mut self.state.entities, &self.state.tuning);
        for entity in gone {
            if let Some(sprite) = entity.sprite {
                platform.destroy_sprite(sprite);
            }
            self.state.events.push(GameEvent::EntityMissed {
                id: entity.id,
                kind: entity.kind,
            });
            if entity.kind == EntityKind::Bonus {
                self.ramp_difficulty();
            }
        }
    }

    /// A bonus vehicle got away: shorten the spawn interval and re-arm
    fn ramp_difficulty(&mut self) {
        let config = &mut self.state.spawner.config;
        let before = config.interval_ms;
        if config.ramp() {
            let interval_ms = config.interval_ms;
            log::debug!("Spawn interval {} -> {} ms", before, interval_ms);
            self.state
                .events
                .push(GameEvent::SpawnIntervalChanged { interval_ms });
        }
        // Re-armed even at the floor, restarting the current period
        self.arm_spawn_timer();
    }

    /// (Re)arm the repeating spawn timer with the current interval
    fn arm_spawn_timer(&mut self) {
        if let Some(old) = self.spawn_timer.take() {
            self.timers.cancel(old);
        }
        let interval = self.state.spawner.config.interval_ms;
        self.spawn_timer = Some(self.timers.schedule_repeating(interval, TimerTag::Spawn));
    }

    fn enter_dying(&mut self, platform: &mut dyn Platform) {
        if self.state.phase != SessionPhase::Playing {
            return;
        }
        log::info!("Player died after {:.0} ms", self.state.elapsed_ms);
        self.state.phase = SessionPhase::Dying;

        if let Some(handle) = self.spawn_timer.take() {
            self.timers.cancel(handle);
        }
        for entity in self.state.entities.clear() {
            if let Some(sprite) = entity.sprite {
                platform.destroy_sprite(sprite);
            }
        }
        self.state.player.alive = false;
        if let Some(sprite) = self.state.player.sprite.take() {
            platform.destroy_sprite(sprite);
        }
        self.state.lives.clear(platform);

        self.state.events.push(GameEvent::PlayerDied);
        self.timers
            .schedule_once(self.state.tuning.death_delay_ms, TimerTag::ShowGameOver);
    }

    fn enter_game_over(&mut self, platform: &mut dyn Platform) {
        if self.state.phase != SessionPhase::Dying {
            return;
        }
        log::info!("Game over");
        self.state.phase = SessionPhase::GameOver;
        let center = Vec2::new(self.state.tuning.width / 2.0, self.state.tuning.height / 2.0);
        platform.show_message(GAME_OVER_TEXT, center);
        self.state.events.push(GameEvent::GameOverShown);
        self.timers
            .schedule_once(self.state.tuning.game_over_delay_ms, TimerTag::ReturnToMenu);
    }

    fn return_to_menu(&mut self, platform: &mut dyn Platform) {
        if self.state.phase != SessionPhase::GameOver || self.state.menu_requested {
            return;
        }
        self.state.menu_requested = true;
        self.state.events.push(GameEvent::ReturnedToMenu);
        platform.navigate_to(Scene::Menu);
    }

    /// Pending timers (spawn plus any scheduled phase change)
    pub fn pending_timers(&self) -> usize {
        self.timers.pending()
    }
}

/// Negative or non-finite frame deltas count as zero
fn sanitize_elapsed(elapsed_ms: f32) -> f32 {
    if elapsed_ms.is_finite() && elapsed_ms > 0.0 {
        elapsed_ms
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::HeadlessPlatform;

    fn start() -> (Session, HeadlessPlatform) {
        let mut platform = HeadlessPlatform::new();
        let session = Session::start(Tuning::with_seed(12345), &mut platform);
        (session, platform)
    }

    /// Put an obstacle right on top of the player
    fn drop_on_player(session: &mut Session, kind: EntityKind) -> EntityId {
        let pos = session.state.player.pos;
        session
            .state
            .entities
            .add(kind, pos, 0.0, Vec2::new(48.0, 80.0))
    }

    #[test]
    fn test_start_sets_up_scene() {
        let (session, platform) = start();
        assert_eq!(session.phase(), SessionPhase::Playing);
        assert_eq!(session.current_lives(), 3);
        assert_eq!(session.max_lives(), 5);
        assert_eq!(platform.count(SpriteKind::Player), 1);
        assert_eq!(platform.count(SpriteKind::HudIcon), 3);
        assert_eq!(session.pending_timers(), 1);
    }

    #[test]
    fn test_spawn_timer_creates_obstacles() {
        let (mut session, mut platform) = start();
        session.advance_clock(2999.0, &mut platform);
        assert_eq!(session.status().obstacles, 0);
        session.advance_clock(1.0, &mut platform);
        assert_eq!(session.status().obstacles, 1);
        session.advance_clock(6000.0, &mut platform);
        assert_eq!(session.status().obstacles, 3);
        assert_eq!(platform.count(SpriteKind::Obstacle), 3);

        let spawned = session
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::ObstacleSpawned { .. }))
            .count();
        assert_eq!(spawned, 3);
    }

    #[test]
    fn test_obstacle_falls_and_despawns_without_life_loss() {
        let (mut session, mut platform) = start();
        let id = session.on_timer_tick(&mut platform).unwrap();
        // Move the player out of the lane
        let x = session.state.entities.get(id).unwrap().pos.x;
        session.state.player.pos.x = if x > 400.0 { 20.0 } else { 780.0 };

        for _ in 0..300 {
            session.on_frame(16.0, &FrameInput::default(), &mut platform);
        }
        assert!(!session.state.entities.contains(id));
        assert_eq!(session.current_lives(), 3);
        assert_eq!(platform.count(SpriteKind::Obstacle), 0);
    }

    #[test]
    fn test_obstacle_hit_costs_one_life() {
        let (mut session, mut platform) = start();
        let id = drop_on_player(&mut session, EntityKind::Obstacle);
        session.on_frame(16.0, &FrameInput::default(), &mut platform);
        assert_eq!(session.current_lives(), 2);
        assert!(!session.state.entities.contains(id));

        // Nothing left to hit
        session.on_frame(16.0, &FrameInput::default(), &mut platform);
        assert_eq!(session.current_lives(), 2);
    }

    #[test]
    fn test_simultaneous_hits_each_count() {
        let (mut session, mut platform) = start();
        drop_on_player(&mut session, EntityKind::Obstacle);
        drop_on_player(&mut session, EntityKind::Obstacle);
        session.on_frame(16.0, &FrameInput::default(), &mut platform);
        assert_eq!(session.current_lives(), 1);
        assert_eq!(session.state.lives.icons().len(), 1);
    }

    #[test]
    fn test_hits_after_death_in_same_frame_are_ignored() {
        let (mut session, mut platform) = start();
        for _ in 0..5 {
            drop_on_player(&mut session, EntityKind::Obstacle);
        }
        drop_on_player(&mut session, EntityKind::Bonus);
        session.on_frame(16.0, &FrameInput::default(), &mut platform);

        assert_eq!(session.phase(), SessionPhase::Dying);
        assert_eq!(session.current_lives(), 0);
        let events = session.drain_events();
        let hits = events
            .iter()
            .filter(|e| matches!(e, GameEvent::ObstacleHit { .. }))
            .count();
        assert_eq!(hits, 3);
        assert!(!events.iter().any(|e| matches!(e, GameEvent::BonusCollected { .. })));
        assert_eq!(events.iter().filter(|e| **e == GameEvent::PlayerDied).count(), 1);
    }

    #[test]
    fn test_bonus_restores_life_up_to_max() {
        let (mut session, mut platform) = start();
        for _ in 0..3 {
            drop_on_player(&mut session, EntityKind::Bonus);
            session.on_frame(16.0, &FrameInput::default(), &mut platform);
        }
        assert_eq!(session.current_lives(), 5);
        assert_eq!(platform.count(SpriteKind::HudIcon), 5);
        assert!(session.state.entities.is_empty());

        let events = session.drain_events();
        assert_eq!(
            events.last(),
            Some(&GameEvent::BonusCollected {
                id: EntityId(3),
                life_gained: false
            })
        );
    }

    #[test]
    fn test_bonus_escape_ramps_and_rearms() {
        let (mut session, mut platform) = start();
        session.advance_clock(2000.0, &mut platform);
        session.spawn_bonus(20.0, 420.0, &mut platform).unwrap();

        // Fall to y > 650 from -80 at 420 px/s: ~1.74 s
        for _ in 0..120 {
            session.on_frame(16.0, &FrameInput::default(), &mut platform);
        }
        assert_eq!(session.status().bonuses, 0);
        assert_eq!(session.status().spawn_interval_ms, 4000);

        // Re-armed at t=2000 with a 4000 ms period: old 3000 ms tick never fires
        session.advance_clock(3999.0, &mut platform);
        assert_eq!(session.status().obstacles, 0);
        session.advance_clock(1.0, &mut platform);
        assert_eq!(session.status().obstacles, 1);
        assert_eq!(session.pending_timers(), 1);
    }

    #[test]
    fn test_escape_at_floor_rearms_without_interval_event() {
        let (mut session, mut platform) = start();
        session.ramp_difficulty();
        assert_eq!(session.status().spawn_interval_ms, 4000);
        session.drain_events();

        session.advance_clock(3000.0, &mut platform);
        session.ramp_difficulty();
        assert!(session.drain_events().is_empty());
        assert_eq!(session.status().spawn_interval_ms, 4000);

        // Period restarted at t=3000
        session.advance_clock(3999.0, &mut platform);
        assert_eq!(session.status().obstacles, 0);
        session.advance_clock(1.0, &mut platform);
        assert_eq!(session.status().obstacles, 1);
    }

    #[test]
    fn test_death_sequence() {
        let (mut session, mut platform) = start();
        session.on_timer_tick(&mut platform);
        session.spawn_bonus(100.0, 100.0, &mut platform);
        for _ in 0..3 {
            session.lose_life(&mut platform);
        }
        assert_eq!(session.phase(), SessionPhase::Dying);
        assert!(session.state.entities.is_empty());
        assert!(platform.sprites.is_empty());
        assert!(!session.state.player.alive);
        // Spawn timer gone, only the game-over delay pending
        assert_eq!(session.pending_timers(), 1);

        session.advance_clock(999.0, &mut platform);
        assert_eq!(session.phase(), SessionPhase::Dying);
        session.advance_clock(1.0, &mut platform);
        assert_eq!(session.phase(), SessionPhase::GameOver);
        assert_eq!(platform.messages, vec!["GameOver".to_string()]);

        session.advance_clock(3000.0, &mut platform);
        assert_eq!(platform.navigations, vec![Scene::Menu]);
        assert!(session.status().menu_requested);

        session.advance_clock(100_000.0, &mut platform);
        assert_eq!(platform.navigations.len(), 1);
        assert_eq!(session.pending_timers(), 0);
    }

    #[test]
    fn test_life_calls_ignored_after_death() {
        let (mut session, mut platform) = start();
        for _ in 0..3 {
            session.lose_life(&mut platform);
        }
        session.drain_events();
        session.lose_life(&mut platform);
        assert!(!session.gain_life(&mut platform));
        assert_eq!(session.current_lives(), 0);
        assert!(session.drain_events().is_empty());
    }

    #[test]
    fn test_background_scrolls_after_death() {
        let (mut session, mut platform) = start();
        for _ in 0..3 {
            session.lose_life(&mut platform);
        }
        let before = session.status().background_offset;
        session.on_frame(16.0, &FrameInput::default(), &mut platform);
        assert!(session.status().background_offset < before);
        assert_eq!(platform.background_offset, session.status().background_offset);
    }

    #[test]
    fn test_spawns_stop_outside_playing() {
        let (mut session, mut platform) = start();
        for _ in 0..3 {
            session.lose_life(&mut platform);
        }
        assert!(session.on_timer_tick(&mut platform).is_none());
        assert!(session.spawn_bonus(100.0, 200.0, &mut platform).is_none());
        assert!(session.state.entities.is_empty());
    }

    #[test]
    fn test_bad_elapsed_is_ignored() {
        let (mut session, mut platform) = start();
        session.on_frame(f32::NAN, &FrameInput { right: true, ..Default::default() }, &mut platform);
        session.on_frame(-50.0, &FrameInput { right: true, ..Default::default() }, &mut platform);
        assert_eq!(session.state.player.pos.x, 400.0);
        session.advance_clock(f32::INFINITY, &mut platform);
        assert_eq!(session.status().obstacles, 0);
    }

    #[test]
    fn test_runs_without_sprites() {
        let mut platform = HeadlessPlatform::without_sprites();
        let mut session = Session::start(Tuning::default(), &mut platform);
        drop_on_player(&mut session, EntityKind::Obstacle);
        session.update(16.0, &FrameInput::default(), &mut platform);
        assert_eq!(session.current_lives(), 2);
        assert_eq!(session.state.lives.icons().len(), 2);
    }

    #[test]
    fn test_determinism() {
        let mut p1 = HeadlessPlatform::new();
        let mut p2 = HeadlessPlatform::new();
        let mut s1 = Session::start(Tuning::with_seed(99999), &mut p1);
        let mut s2 = Session::start(Tuning::with_seed(99999), &mut p2);

        let inputs = [
            FrameInput { pointer_x: Some(100.0), ..Default::default() },
            FrameInput { left: true, ..Default::default() },
            FrameInput::default(),
        ];
        for i in 0..2000 {
            let input = &inputs[i % inputs.len()];
            s1.update(16.0, input, &mut p1);
            s2.update(16.0, input, &mut p2);
        }

        assert_eq!(s1.status(), s2.status());
        assert_eq!(s1.drain_events(), s2.drain_events());
    }
}
