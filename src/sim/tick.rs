//! Fixed timestep simulation tick
//!
//! One call runs the whole loop for a tick: controller, physics step, then
//! reactions to whatever the bridge reported.

use super::controller::{self, MotionCommand, TickInput};
use super::entity::EntityKind;
use super::physics::PhysicsEvent;
use super::reactions;
use super::round;
use super::state::{GameEvent, GameState, RoundPhase, Services};

/// Advance the game by one tick and return what happened
pub fn tick(state: &mut GameState, input: &TickInput, services: &mut Services) -> Vec<GameEvent> {
    let mut events = Vec::new();

    // While the round is over only the reset trigger is accepted
    if state.phase == RoundPhase::Ended {
        if input.confirm {
            round::handle_confirm(state, services, &mut events);
        }
        return events;
    }

    state.time_ticks += 1;

    let command = controller::drive(input, state.player.grounded, &state.settings.tuning);
    apply_motion(state, services, &command);

    let reports = services.physics.step(state.settings.tuning.sim_dt);
    for (i, report) in reports.iter().enumerate() {
        if state.phase == RoundPhase::Ended {
            log::debug!("Round over, dropping {} remaining reports", reports.len() - i);
            break;
        }
        handle_report(state, services, *report, &mut events);
    }

    events
}

fn apply_motion(state: &mut GameState, services: &mut Services, command: &MotionCommand) {
    let player = state.player.id;

    services.physics.set_velocity_x(player, command.velocity_x);
    state.player.vel.x = command.velocity_x;
    if let Some(impulse) = command.jump_impulse {
        services.physics.set_velocity_y(player, impulse);
        state.player.vel.y = impulse;
    }

    state.player.facing = command.facing;
    services.animator.play(command.facing);
}

fn handle_report(
    state: &mut GameState,
    services: &mut Services,
    report: PhysicsEvent,
    events: &mut Vec<GameEvent>,
) {
    match report {
        PhysicsEvent::Moved { id, pos } => {
            state.registry.set_position(id, pos);
        }
        PhysicsEvent::Contact { id, grounded } => {
            if id == state.player.id {
                state.player.grounded = grounded;
            }
        }
        PhysicsEvent::Overlap { a, b } => {
            let player = state.player.id;
            let other = if a == player {
                b
            } else if b == player {
                a
            } else {
                log::debug!("Overlap {a}/{b} does not involve the player");
                return;
            };

            match state.registry.kind_of(other) {
                Some(EntityKind::Pickup) => reactions::on_pickup_overlap(state, services, other, events),
                Some(EntityKind::Hazard) => reactions::on_hazard_overlap(state, services, other, events),
                kind => log::debug!("Ignoring player overlap with {other} ({kind:?})"),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use super::*;
    use crate::sim::controller::Facing;
    use crate::sim::physics::PhysicsBridge;
    use crate::sim::test_support::Harness;

    fn held(move_left: bool, move_right: bool, jump: bool) -> TickInput {
        TickInput {
            move_left,
            move_right,
            jump,
            ..Default::default()
        }
    }

    fn ground(h: &mut Harness, grounded: bool) {
        let id = h.state.player.id;
        h.step_with(&[PhysicsEvent::Contact { id, grounded }]);
    }

    #[test]
    fn test_tick_drives_player_velocity() {
        let mut h = Harness::new();
        let player = h.state.player.id;

        h.tick(held(true, true, false));
        assert_eq!(h.bridge.body(player).unwrap().vel.x, -200.0);
        assert_eq!(h.reel.played.last(), Some(&Facing::Left));

        h.tick(held(false, true, false));
        assert_eq!(h.bridge.body(player).unwrap().vel.x, 200.0);

        h.tick(TickInput::default());
        assert_eq!(h.bridge.body(player).unwrap().vel.x, 0.0);
        assert_eq!(h.state.player.facing, Facing::Idle);
    }

    #[test]
    fn test_jump_uses_reported_ground_contact() {
        let mut h = Harness::new();
        let player = h.state.player.id;

        // Not grounded yet: no impulse
        h.tick(held(false, false, true));
        assert_eq!(h.bridge.body(player).unwrap().vel.y, 0.0);

        ground(&mut h, true);
        h.tick(held(false, false, true));
        assert_eq!(h.bridge.body(player).unwrap().vel.y, -700.0);

        // Airborne: the request is ignored
        ground(&mut h, false);
        h.bridge.set_velocity_y(player, -300.0);
        h.tick(held(false, false, true));
        assert_eq!(h.bridge.body(player).unwrap().vel.y, -300.0);
    }

    #[test]
    fn test_ended_ignores_movement() {
        let mut h = Harness::new();
        h.collect_all();
        let hazard = h.state.hazards.iter().next().unwrap();
        h.touch(hazard);
        let ticks = h.state.time_ticks;
        let player = h.state.player.id;
        let played = h.reel.played.len();

        let events = h.tick(held(true, false, true));
        assert!(events.is_empty());
        assert_eq!(h.state.time_ticks, ticks);
        assert_eq!(h.reel.played.len(), played);
        assert_eq!(h.bridge.body(player).unwrap().vel.x, 0.0);
    }

    #[test]
    fn test_reports_after_hit_are_dropped() {
        let mut h = Harness::new();
        h.collect_all();
        let hazard = h.state.hazards.iter().next().unwrap();
        let player = h.state.player.id;
        let star = h.pickup_ids()[0];

        let events = h.step_with(&[
            PhysicsEvent::Overlap { a: hazard, b: player },
            PhysicsEvent::Overlap { a: player, b: star },
        ]);
        assert_eq!(events, vec![GameEvent::PlayerHit { hazard }]);
        assert!(h.state.registry.is_active(star));
        assert_eq!(h.state.score.value(), 130);
    }

    #[test]
    fn test_overlap_order_does_not_matter() {
        let mut h = Harness::new();
        let player = h.state.player.id;
        let star = h.pickup_ids()[3];

        let events = h.step_with(&[PhysicsEvent::Overlap { a: star, b: player }]);
        assert_eq!(events.len(), 1);
        assert!(!h.state.registry.is_active(star));
    }

    #[test]
    fn test_non_player_overlaps_ignored() {
        let mut h = Harness::new();
        let ids = h.pickup_ids();
        let events = h.step_with(&[PhysicsEvent::Overlap { a: ids[0], b: ids[1] }]);
        assert!(events.is_empty());
        assert_eq!(h.state.pickups.active_count(&h.state.registry), 13);
    }

    #[test]
    fn test_moved_reports_update_registry() {
        let mut h = Harness::new();
        h.move_player(Vec2::new(40.0, 700.0));
        assert_eq!(h.state.player_pos(), Vec2::new(40.0, 700.0));
    }

    #[test]
    fn test_full_cycle_then_play_again() {
        let mut h = Harness::new();
        h.collect_all();
        let hazard = h.state.hazards.iter().next().unwrap();
        h.touch(hazard);
        assert!(h.bridge.is_paused());

        h.confirm();
        assert!(!h.bridge.is_paused());

        let steps = h.bridge.steps();
        let events = h.touch(h.pickup_ids()[0]);
        assert_eq!(h.bridge.steps(), steps + 1);
        assert_eq!(
            events,
            vec![GameEvent::PickupCollected {
                id: h.pickup_ids()[0],
                score: 10
            }]
        );
    }

    #[test]
    fn test_determinism() {
        // Same seed, same inputs: hazards land in the same place
        let mut h1 = Harness::new();
        let mut h2 = Harness::new();

        for h in [&mut h1, &mut h2] {
            h.move_player(Vec2::new(700.0, 600.0));
            h.collect_all();
            h.move_player(Vec2::new(100.0, 600.0));
            h.collect_all();
        }

        let spots = |h: &Harness| -> Vec<Vec2> {
            h.state
                .hazards
                .iter()
                .filter_map(|id| h.state.registry.position(id))
                .collect()
        };
        assert_eq!(spots(&h1), spots(&h2));
    }
}
