//! Gameplay simulation module
//!
//! All gameplay rules live here. This module must stay host-agnostic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - Physics, display and animation reached only through traits

pub mod controller;
pub mod entity;
pub mod physics;
pub mod reactions;
pub mod round;
pub mod score;
pub mod state;
pub mod tick;

#[cfg(test)]
pub(crate) mod test_support;

pub use controller::{Facing, MotionCommand, TickInput, drive};
pub use entity::{Entity, EntityId, EntityKind, Registry};
pub use physics::{
    Body, BodyProps, CheckMode, Group, HeadlessBridge, PairCheck, PhysicsBridge, PhysicsEvent,
};
pub use reactions::{on_hazard_overlap, on_pickup_overlap};
pub use round::{ResetSubscription, handle_confirm};
pub use score::{ScoreDisplay, ScoreTracker};
pub use state::{
    Animator, GameEvent, GameState, HazardPool, PAIR_CHECKS, Pickup, PickupSet, Player,
    RngState, RoundPhase, Services,
};
pub use tick::tick;
