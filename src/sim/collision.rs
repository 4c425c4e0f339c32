//! Player-vs-entity collision detection
//!
//! Detection only reports overlaps; the session decides what each overlap
//! costs or grants and removes the entity.

use super::geometry::{Aabb, intersects};
use super::registry::EntityRegistry;
use super::state::{EntityId, EntityKind};

/// A single overlap found this frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Contact {
    pub id: EntityId,
    pub kind: EntityKind,
}

/// All entities overlapping `player`, in registry (id) order
pub fn player_contacts(player: &Aabb, entities: &EntityRegistry) -> Vec<Contact> {
    entities
        .iter()
        .filter(|e| intersects(player, &e.bounds()))
        .map(|e| Contact {
            id: e.id,
            kind: e.kind,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    fn size() -> Vec2 {
        Vec2::new(48.0, 80.0)
    }

    #[test]
    fn test_contacts_in_id_order() {
        let player = Aabb::from_center(Vec2::new(400.0, 520.0), Vec2::new(40.0, 80.0));
        let mut reg = EntityRegistry::new();
        let far = reg.add(EntityKind::Obstacle, Vec2::new(100.0, 520.0), 300.0, size());
        let bonus = reg.add(EntityKind::Bonus, Vec2::new(410.0, 460.0), 150.0, size());
        let hit = reg.add(EntityKind::Obstacle, Vec2::new(390.0, 500.0), 300.0, size());

        let contacts = player_contacts(&player, &reg);
        assert_eq!(
            contacts,
            vec![
                Contact { id: bonus, kind: EntityKind::Bonus },
                Contact { id: hit, kind: EntityKind::Obstacle },
            ]
        );
        assert!(!contacts.iter().any(|c| c.id == far));
    }

    #[test]
    fn test_entity_above_player_misses() {
        let player = Aabb::from_center(Vec2::new(400.0, 520.0), Vec2::new(40.0, 80.0));
        let mut reg = EntityRegistry::new();
        // Bottom edge at y = 479, player top at 480
        reg.add(EntityKind::Obstacle, Vec2::new(400.0, 439.0), 300.0, size());
        assert!(player_contacts(&player, &reg).is_empty());
    }
}
