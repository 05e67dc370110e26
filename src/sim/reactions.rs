//! Collision reaction engine
//!
//! Handlers for the overlaps the physics bridge reports. They never look for
//! overlaps themselves; stale or out-of-phase reports are ignored.

use glam::Vec2;
use rand::Rng;

use super::entity::{EntityId, EntityKind};
use super::physics::BodyProps;
use super::round;
use super::state::{GameEvent, GameState, Services, spawn_with_body};
use crate::consts::HAZARD_SCALE;

/// Player touched a pickup: score it, hide it, and if it was the last one
/// bring the set back and drop a hazard.
pub fn on_pickup_overlap(
    state: &mut GameState,
    services: &mut Services,
    pickup: EntityId,
    events: &mut Vec<GameEvent>,
) {
    if !state.is_playing() {
        log::debug!("Round over, ignoring pickup {pickup}");
        return;
    }
    if !state.pickups.contains(pickup) || !state.registry.is_active(pickup) {
        log::debug!("Stale overlap with pickup {pickup}");
        return;
    }

    let score = state
        .score
        .add(state.settings.tuning.pickup_value, services.display);
    state.registry.set_active(pickup, false);
    services.physics.disable_body(pickup);
    log::debug!("Collected {pickup}, score {score}");
    events.push(GameEvent::PickupCollected { id: pickup, score });

    if state.pickups.all_collected(&state.registry) {
        let y = state.settings.tuning.pickup_respawn_y;
        state
            .pickups
            .reactivate_all(&mut state.registry, services.physics, y);
        events.push(GameEvent::PickupsRespawned);

        let (id, pos, vel) = spawn_hazard(state, services);
        events.push(GameEvent::HazardSpawned { id, pos, vel });
    }
}

/// Player touched a hazard while playing: the round ends
pub fn on_hazard_overlap(
    state: &mut GameState,
    services: &mut Services,
    hazard: EntityId,
    events: &mut Vec<GameEvent>,
) {
    if !state.is_playing() {
        log::debug!("Round already over, ignoring hazard {hazard}");
        return;
    }
    if !state.hazards.contains(hazard) || !state.registry.is_active(hazard) {
        log::debug!("Stale overlap with hazard {hazard}");
        return;
    }

    round::end_round(state, services, hazard, events);
}

/// Horizontal spawn point on the half of the arena away from the player.
/// The split and both ranges use whole pixels.
pub fn hazard_spawn_x(player_x: f32, midpoint: f32, arena_width: f32, rng: &mut impl Rng) -> f32 {
    let mid = midpoint.round() as i32;
    let width = arena_width.round() as i32;
    let (lo, hi) = if player_x < mid as f32 { (mid, width) } else { (0, mid) };
    rng.random_range(lo.min(hi)..=lo.max(hi)) as f32
}

/// Drop one hazard on the far side of the player
fn spawn_hazard(state: &mut GameState, services: &mut Services) -> (EntityId, Vec2, Vec2) {
    let tuning = &state.settings.tuning;
    let mut rng = state.rng_state.next_rng();

    let player_x = state.player_pos().x;
    let x = hazard_spawn_x(player_x, tuning.midpoint(), tuning.arena_width, &mut rng);
    let drift = tuning.hazard_max_drift.abs().round() as i32;
    let vx = rng.random_range(-drift..=drift) as f32;

    let pos = Vec2::new(x, tuning.hazard_spawn_y);
    let vel = Vec2::new(vx, tuning.hazard_fall_speed);
    let bounce = state.settings.layout.hazard_bounce;

    let id = spawn_with_body(
        &mut state.registry,
        services.physics,
        EntityKind::Hazard,
        pos,
        BodyProps::dynamic(bounce, true).with_scale(HAZARD_SCALE.into()),
    );
    services.physics.set_velocity(id, vel);
    state.hazards.push(id);

    log::info!(
        "Hazard {id} dropped at ({x}, {}) with velocity ({vx}, {}); {} on board",
        pos.y,
        vel.y,
        state.hazards.len()
    );
    (id, pos, vel)
}
