//! Physics bridge
//!
//! The physics engine is an external service. The core tells it which group
//! pairs to check, commands bodies, and reacts to the events it reports after
//! each step. Nothing in here integrates motion or detects overlap.

use std::collections::BTreeMap;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entity::{EntityId, EntityKind};

/// Collision group; one per entity kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Group {
    Player,
    Platforms,
    Pickups,
    Hazards,
}

impl From<EntityKind> for Group {
    fn from(kind: EntityKind) -> Self {
        match kind {
            EntityKind::Player => Group::Player,
            EntityKind::Platform => Group::Platforms,
            EntityKind::Pickup => Group::Pickups,
            EntityKind::Hazard => Group::Hazards,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CheckMode {
    /// Solid contact, resolved by the bridge
    Collide,
    /// Pass-through, reported as [`PhysicsEvent::Overlap`]
    Overlap,
}

/// A group pair the bridge must check every step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PairCheck {
    pub a: Group,
    pub b: Group,
    pub mode: CheckMode,
}

impl PairCheck {
    pub const fn collide(a: Group, b: Group) -> Self {
        Self {
            a,
            b,
            mode: CheckMode::Collide,
        }
    }

    pub const fn overlap(a: Group, b: Group) -> Self {
        Self {
            a,
            b,
            mode: CheckMode::Overlap,
        }
    }

    /// Same pair and mode, in either order
    pub fn matches(&self, other: &PairCheck) -> bool {
        self.mode == other.mode
            && ((self.a == other.a && self.b == other.b) || (self.a == other.b && self.b == other.a))
    }
}

/// Per-body setup passed when a body is created
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BodyProps {
    pub scale: Vec2,
    pub bounce: f32,
    pub collide_world_bounds: bool,
    /// Immovable (platforms)
    pub is_static: bool,
}

impl BodyProps {
    pub fn fixed(scale: Vec2) -> Self {
        Self {
            scale,
            bounce: 0.0,
            collide_world_bounds: false,
            is_static: true,
        }
    }

    pub fn dynamic(bounce: f32, collide_world_bounds: bool) -> Self {
        Self {
            scale: Vec2::ONE,
            bounce,
            collide_world_bounds,
            is_static: false,
        }
    }

    pub fn with_scale(mut self, scale: Vec2) -> Self {
        self.scale = scale;
        self
    }
}

/// What the bridge reports after a step
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PhysicsEvent {
    /// Body position after motion was resolved
    Moved { id: EntityId, pos: Vec2 },
    /// Whether the body is resting on something below it
    Contact { id: EntityId, grounded: bool },
    /// Two bodies of an overlap pair intersect
    Overlap { a: EntityId, b: EntityId },
}

/// The external physics service
pub trait PhysicsBridge {
    fn add_body(&mut self, id: EntityId, group: Group, pos: Vec2, props: BodyProps);
    fn register(&mut self, check: PairCheck);

    /// Freeze all motion and collision resolution
    fn pause(&mut self);
    fn resume(&mut self);
    fn is_paused(&self) -> bool;

    fn set_velocity(&mut self, id: EntityId, vel: Vec2);
    fn set_velocity_x(&mut self, id: EntityId, vx: f32);
    fn set_velocity_y(&mut self, id: EntityId, vy: f32);
    fn set_position(&mut self, id: EntityId, pos: Vec2);

    /// Re-enable a disabled body at `pos` and make it visible
    fn enable_body(&mut self, id: EntityId, pos: Vec2);
    /// Take a body out of the simulation and hide it
    fn disable_body(&mut self, id: EntityId);
    fn destroy_body(&mut self, id: EntityId);

    /// Advance one step and report what happened
    fn step(&mut self, dt: f32) -> Vec<PhysicsEvent>;
}

/// Body as recorded by [`HeadlessBridge`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub group: Group,
    pub pos: Vec2,
    pub vel: Vec2,
    pub props: BodyProps,
    pub enabled: bool,
}

/// Bridge with no physics of its own.
///
/// Records every command so tests and the scripted host can inspect them, and
/// reports events that were queued with [`HeadlessBridge::queue`]. While
/// paused, `step` drops the queue and reports nothing.
#[derive(Debug, Clone, Default)]
pub struct HeadlessBridge {
    bodies: BTreeMap<EntityId, Body>,
    checks: Vec<PairCheck>,
    paused: bool,
    pending: Vec<PhysicsEvent>,
    steps: u64,
}

impl HeadlessBridge {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an event for the next `step`
    pub fn queue(&mut self, event: PhysicsEvent) {
        self.pending.push(event);
    }

    pub fn body(&self, id: EntityId) -> Option<&Body> {
        self.bodies.get(&id)
    }

    pub fn bodies_in(&self, group: Group) -> impl Iterator<Item = (EntityId, &Body)> {
        self.bodies
            .iter()
            .filter(move |(_, b)| b.group == group)
            .map(|(id, b)| (*id, b))
    }

    pub fn checks(&self) -> &[PairCheck] {
        &self.checks
    }

    pub fn is_registered(&self, check: PairCheck) -> bool {
        self.checks.iter().any(|c| c.matches(&check))
    }

    /// Steps taken while not paused
    pub fn steps(&self) -> u64 {
        self.steps
    }

    fn with_body(&mut self, id: EntityId, f: impl FnOnce(&mut Body)) {
        match self.bodies.get_mut(&id) {
            Some(body) => f(body),
            None => log::debug!("Bridge command for unknown body {id}"),
        }
    }
}

impl PhysicsBridge for HeadlessBridge {
    fn add_body(&mut self, id: EntityId, group: Group, pos: Vec2, props: BodyProps) {
        self.bodies.insert(
            id,
            Body {
                group,
                pos,
                vel: Vec2::ZERO,
                props,
                enabled: true,
            },
        );
    }

    fn register(&mut self, check: PairCheck) {
        if !self.is_registered(check) {
            self.checks.push(check);
        }
    }

    fn pause(&mut self) {
        self.paused = true;
    }

    fn resume(&mut self) {
        self.paused = false;
    }

    fn is_paused(&self) -> bool {
        self.paused
    }

    fn set_velocity(&mut self, id: EntityId, vel: Vec2) {
        self.with_body(id, |b| b.vel = vel);
    }

    fn set_velocity_x(&mut self, id: EntityId, vx: f32) {
        self.with_body(id, |b| b.vel.x = vx);
    }

    fn set_velocity_y(&mut self, id: EntityId, vy: f32) {
        self.with_body(id, |b| b.vel.y = vy);
    }

    fn set_position(&mut self, id: EntityId, pos: Vec2) {
        self.with_body(id, |b| b.pos = pos);
    }

    fn enable_body(&mut self, id: EntityId, pos: Vec2) {
        self.with_body(id, |b| {
            b.pos = pos;
            b.enabled = true;
        });
    }

    fn disable_body(&mut self, id: EntityId) {
        self.with_body(id, |b| {
            b.vel = Vec2::ZERO;
            b.enabled = false;
        });
    }

    fn destroy_body(&mut self, id: EntityId) {
        self.bodies.remove(&id);
    }

    fn step(&mut self, _dt: f32) -> Vec<PhysicsEvent> {
        if self.paused {
            if !self.pending.is_empty() {
                log::debug!("Bridge paused, dropping {} queued events", self.pending.len());
                self.pending.clear();
            }
            return Vec::new();
        }

        self.steps += 1;
        let events = std::mem::take(&mut self.pending);
        for event in &events {
            if let PhysicsEvent::Moved { id, pos } = *event {
                self.with_body(id, |b| b.pos = pos);
            }
        }
        events
    }
}
