//! Round state machine
//!
//! `Playing -> Ended` on hazard contact, `Ended -> Playing` through the reset
//! protocol. The reset is driven by a one-shot subscription that exists only
//! while the round is over: it is created when the round ends and taken when
//! the confirm edge arrives, so one Ended episode resets at most once.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::controller::Facing;
use super::entity::EntityId;
use super::state::{GameEvent, GameState, RoundPhase, Services};

/// Pending reset handler, armed when the round ends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResetSubscription {
    /// Tick at which the round ended
    pub armed_at: u64,
}

/// Hazard contact: freeze everything and wait for confirm
pub(crate) fn end_round(
    state: &mut GameState,
    services: &mut Services,
    hazard: EntityId,
    events: &mut Vec<GameEvent>,
) {
    state.phase = RoundPhase::Ended;
    services.physics.pause();

    state.player.hit = true;
    state.player.facing = Facing::Idle;
    services.animator.set_hit(true);
    services.animator.play(Facing::Idle);

    if state.reset_listener.is_none() {
        state.reset_listener = Some(ResetSubscription {
            armed_at: state.time_ticks,
        });
    }

    log::info!(
        "Round ended at tick {} by hazard {hazard}, score {}",
        state.time_ticks,
        state.score.value()
    );
    events.push(GameEvent::PlayerHit { hazard });
}

/// Confirm edge while the round is over. Returns true if the round was reset.
pub fn handle_confirm(
    state: &mut GameState,
    services: &mut Services,
    events: &mut Vec<GameEvent>,
) -> bool {
    let Some(subscription) = state.reset_listener.take() else {
        log::debug!("Confirm with no reset pending");
        return false;
    };

    log::debug!("Reset armed at tick {} fired", subscription.armed_at);
    reset_round(state, services);
    events.push(GameEvent::RoundReset);
    true
}

/// The full-board reset
fn reset_round(state: &mut GameState, services: &mut Services) {
    services.physics.resume();

    state.phase = RoundPhase::Playing;
    state.player.hit = false;
    services.animator.set_hit(false);

    let start = state.settings.layout.player_start;
    let player = state.player.id;
    state.registry.set_position(player, start);
    services.physics.set_position(player, start);
    services.physics.set_velocity(player, Vec2::ZERO);
    state.player.vel = Vec2::ZERO;

    state.score.reset(services.display);

    let destroyed = state
        .hazards
        .destroy_all(&mut state.registry, services.physics);

    let y = state.settings.tuning.pickup_reset_y;
    state
        .pickups
        .reactivate_all(&mut state.registry, services.physics, y);

    log::info!("Round reset, {destroyed} hazards cleared");
}
