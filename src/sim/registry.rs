//! Entity registry
//!
//! Holds every live obstacle and bonus vehicle. Entities are kept in id
//! order so iteration (and therefore collision handling) is deterministic.

use glam::Vec2;

use super::state::{Entity, EntityId, EntityKind};

#[derive(Debug, Clone)]
pub struct EntityRegistry {
    entities: Vec<Entity>,
    next_id: u32,
}

impl Default for EntityRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self {
            entities: Vec::new(),
            next_id: 1,
        }
    }

    /// Register a new entity and return its id. Negative speeds are clamped to 0.
    pub fn add(&mut self, kind: EntityKind, pos: Vec2, speed: f32, size: Vec2) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        self.entities.push(Entity {
            id,
            kind,
            pos,
            speed: speed.max(0.0),
            size,
            sprite: None,
        });
        id
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.index_of(id).map(|i| &self.entities[i])
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.index_of(id).map(move |i| &mut self.entities[i])
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.index_of(id).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Entity> {
        self.entities.iter_mut()
    }

    /// Remove one entity. Unknown ids return `None`.
    pub fn remove(&mut self, id: EntityId) -> Option<Entity> {
        self.index_of(id).map(|i| self.entities.remove(i))
    }

    /// Remove every entity matching `pred`, returning them in id order
    pub fn remove_where(&mut self, mut pred: impl FnMut(&Entity) -> bool) -> Vec<Entity> {
        let mut removed = Vec::new();
        let mut kept = Vec::with_capacity(self.entities.len());
        for entity in self.entities.drain(..) {
            if pred(&entity) {
                removed.push(entity);
            } else {
                kept.push(entity);
            }
        }
        self.entities = kept;
        removed
    }

    /// Remove everything, returning the removed entities
    pub fn clear(&mut self) -> Vec<Entity> {
        std::mem::take(&mut self.entities)
    }

    pub fn count(&self, kind: EntityKind) -> usize {
        self.entities.iter().filter(|e| e.kind == kind).count()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    fn index_of(&self, id: EntityId) -> Option<usize> {
        // Ids are pushed in increasing order and removals keep order
        self.entities.binary_search_by_key(&id, |e| e.id).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn size() -> Vec2 {
        Vec2::new(48.0, 80.0)
    }

    #[test]
    fn test_add_get_remove() {
        let mut reg = EntityRegistry::new();
        let a = reg.add(EntityKind::Obstacle, Vec2::new(100.0, -80.0), 300.0, size());
        let b = reg.add(EntityKind::Bonus, Vec2::new(200.0, -80.0), 150.0, size());
        assert_ne!(a, b);
        assert_eq!(reg.len(), 2);
        assert_eq!(reg.count(EntityKind::Obstacle), 1);
        assert_eq!(reg.get(b).map(|e| e.kind), Some(EntityKind::Bonus));

        assert!(reg.remove(a).is_some());
        assert!(reg.remove(a).is_none());
        assert!(!reg.contains(a));
        assert!(reg.contains(b));
    }

    #[test]
    fn test_negative_speed_clamped() {
        let mut reg = EntityRegistry::new();
        let id = reg.add(EntityKind::Bonus, Vec2::ZERO, -50.0, size());
        assert_eq!(reg.get(id).unwrap().speed, 0.0);
    }

    #[test]
    fn test_remove_where_keeps_order() {
        let mut reg = EntityRegistry::new();
        let ids: Vec<_> = (0..5)
            .map(|i| reg.add(EntityKind::Obstacle, Vec2::new(0.0, i as f32 * 100.0), 1.0, size()))
            .collect();

        let removed = reg.remove_where(|e| e.pos.y >= 300.0);
        assert_eq!(removed.iter().map(|e| e.id).collect::<Vec<_>>(), vec![ids[3], ids[4]]);
        assert_eq!(reg.iter().map(|e| e.id).collect::<Vec<_>>(), ids[..3].to_vec());
        assert!(reg.get(ids[1]).is_some());
    }

    #[test]
    fn test_clear_returns_all() {
        let mut reg = EntityRegistry::new();
        reg.add(EntityKind::Obstacle, Vec2::ZERO, 1.0, size());
        reg.add(EntityKind::Bonus, Vec2::ZERO, 1.0, size());
        assert_eq!(reg.clear().len(), 2);
        assert!(reg.is_empty());
        // Ids are never reused
        let next = reg.add(EntityKind::Obstacle, Vec2::ZERO, 1.0, size());
        assert_eq!(next, EntityId(3));
    }
}
