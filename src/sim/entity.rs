//! Entity registry
//!
//! Owns every entity on the board. Ids are handed out in increasing order and
//! never reused, so the backing `Vec` stays sorted by id and iteration order is
//! stable.

use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Stable entity handle shared with the physics bridge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u32);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Player,
    /// Static, always active, never moves
    Platform,
    Pickup,
    Hazard,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub kind: EntityKind,
    pub pos: Vec2,
    /// Inactive entities keep their id but take no part in reactions
    pub active: bool,
}

impl Entity {
    pub fn is_static(&self) -> bool {
        self.kind == EntityKind::Platform
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Registry {
    entities: Vec<Entity>,
    next_id: u32,
}

impl Registry {
    pub fn new() -> Self {
        Self {
            entities: Vec::new(),
            next_id: 1,
        }
    }

    /// Create an active entity and return its id
    pub fn spawn(&mut self, kind: EntityKind, pos: Vec2) -> EntityId {
        let id = EntityId(self.next_id.max(1));
        self.next_id = id.0 + 1;
        self.entities.push(Entity {
            id,
            kind,
            pos,
            active: true,
        });
        id
    }

    fn index_of(&self, id: EntityId) -> Option<usize> {
        self.entities.binary_search_by_key(&id, |e| e.id).ok()
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.index_of(id).map(|i| &self.entities[i])
    }

    /// Mutable access for non-static entities only
    fn get_dynamic_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        let entity = self.index_of(id).map(|i| &mut self.entities[i])?;
        if entity.is_static() {
            log::debug!("Refusing to mutate platform {id}");
            return None;
        }
        Some(entity)
    }

    pub fn kind_of(&self, id: EntityId) -> Option<EntityKind> {
        self.get(id).map(|e| e.kind)
    }

    pub fn position(&self, id: EntityId) -> Option<Vec2> {
        self.get(id).map(|e| e.pos)
    }

    pub fn is_active(&self, id: EntityId) -> bool {
        self.get(id).is_some_and(|e| e.active)
    }

    /// Move an entity. Returns false for unknown ids and platforms.
    pub fn set_position(&mut self, id: EntityId, pos: Vec2) -> bool {
        match self.get_dynamic_mut(id) {
            Some(entity) => {
                entity.pos = pos;
                true
            }
            None => false,
        }
    }

    /// Toggle presence. Returns false for unknown ids and platforms.
    pub fn set_active(&mut self, id: EntityId, active: bool) -> bool {
        match self.get_dynamic_mut(id) {
            Some(entity) => {
                entity.active = active;
                true
            }
            None => false,
        }
    }

    /// Remove an entity for good. Platforms cannot be removed.
    pub fn despawn(&mut self, id: EntityId) -> Option<Entity> {
        let index = self.index_of(id)?;
        if self.entities[index].is_static() {
            log::debug!("Refusing to despawn platform {id}");
            return None;
        }
        Some(self.entities.remove(index))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter()
    }

    pub fn of_kind(&self, kind: EntityKind) -> impl Iterator<Item = &Entity> {
        self.entities.iter().filter(move |e| e.kind == kind)
    }

    pub fn count_active(&self, kind: EntityKind) -> usize {
        self.of_kind(kind).filter(|e| e.active).count()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}
