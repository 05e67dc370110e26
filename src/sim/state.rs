//! Game state and core simulation types
//!
//! Everything needed to resume or inspect a round lives in [`GameState`].
//! The external collaborators (physics, score display, animation) are handed
//! in per call through [`Services`].

use glam::Vec2;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::controller::Facing;
use super::entity::{EntityId, EntityKind, Registry};
use super::physics::{BodyProps, Group, PairCheck, PhysicsBridge};
use super::round::ResetSubscription;
use super::score::{ScoreDisplay, ScoreTracker};
use crate::consts::*;
use crate::settings::Settings;

/// Current phase of the round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RoundPhase {
    /// Active gameplay
    #[default]
    Playing,
    /// Player touched a hazard; physics frozen until reset
    Ended,
}

/// Events emitted during a tick, for sound/UI layers
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    PickupCollected { id: EntityId, score: u32 },
    /// Whole pickup set reactivated after being cleared
    PickupsRespawned,
    HazardSpawned { id: EntityId, pos: Vec2, vel: Vec2 },
    PlayerHit { hazard: EntityId },
    RoundReset,
}

/// Animation playback collaborator
pub trait Animator {
    /// Called every tick with the direction the player is shown facing
    fn play(&mut self, facing: Facing);
    /// Hit tint on/off
    fn set_hit(&mut self, hit: bool);
}

/// External collaborators borrowed for the duration of one call
pub struct Services<'a> {
    pub physics: &'a mut dyn PhysicsBridge,
    pub display: &'a mut dyn ScoreDisplay,
    pub animator: &'a mut dyn Animator,
}

/// The player character
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub id: EntityId,
    /// Last commanded velocity
    pub vel: Vec2,
    /// Resting on a platform, as last reported by the bridge
    pub grounded: bool,
    /// Set when a hazard ends the round
    pub hit: bool,
    pub facing: Facing,
}

/// A pickup and the column it belongs to
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Pickup {
    pub id: EntityId,
    pub home_x: f32,
}

/// Fixed set of pickups laid out at round start
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PickupSet {
    pickups: Vec<Pickup>,
}

impl PickupSet {
    pub fn iter(&self) -> impl Iterator<Item = &Pickup> {
        self.pickups.iter()
    }

    pub fn len(&self) -> usize {
        self.pickups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pickups.is_empty()
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.pickups.iter().any(|p| p.id == id)
    }

    pub fn active_count(&self, registry: &Registry) -> usize {
        self.pickups.iter().filter(|p| registry.is_active(p.id)).count()
    }

    /// True once every pickup has been collected
    pub fn all_collected(&self, registry: &Registry) -> bool {
        self.pickups.iter().all(|p| !registry.is_active(p.id))
    }

    /// Bring every pickup back at its home column and height `y`
    pub fn reactivate_all(&self, registry: &mut Registry, physics: &mut dyn PhysicsBridge, y: f32) {
        for pickup in &self.pickups {
            let pos = Vec2::new(pickup.home_x, y);
            registry.set_position(pickup.id, pos);
            registry.set_active(pickup.id, true);
            physics.enable_body(pickup.id, pos);
        }
    }
}

/// Hazards dropped so far this round
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HazardPool {
    hazards: Vec<EntityId>,
}

impl HazardPool {
    pub fn iter(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.hazards.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.hazards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hazards.is_empty()
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.hazards.contains(&id)
    }

    pub fn push(&mut self, id: EntityId) {
        self.hazards.push(id);
    }

    /// Destroy every hazard in registry and bridge. Returns how many went.
    pub fn destroy_all(&mut self, registry: &mut Registry, physics: &mut dyn PhysicsBridge) -> usize {
        let count = self.hazards.len();
        for id in self.hazards.drain(..) {
            registry.despawn(id);
            physics.destroy_body(id);
        }
        count
    }
}

/// RNG state wrapper for serialization
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
    pub stream: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed, stream: 0 }
    }

    /// Fresh generator for the next draw; each call uses a new stream
    pub fn next_rng(&mut self) -> Pcg32 {
        let rng = Pcg32::new(self.seed, self.stream);
        self.stream = self.stream.wrapping_add(1);
        rng
    }
}

/// Register an entity and give it a body in the group for its kind
pub(crate) fn spawn_with_body(
    registry: &mut Registry,
    physics: &mut dyn PhysicsBridge,
    kind: EntityKind,
    pos: Vec2,
    props: BodyProps,
) -> EntityId {
    let id = registry.spawn(kind, pos);
    physics.add_body(id, Group::from(kind), pos, props);
    id
}

/// Group pairs the bridge checks for the whole session
pub const PAIR_CHECKS: [PairCheck; 6] = [
    PairCheck::collide(Group::Player, Group::Platforms),
    PairCheck::collide(Group::Pickups, Group::Platforms),
    PairCheck::overlap(Group::Pickups, Group::Player),
    PairCheck::collide(Group::Hazards, Group::Platforms),
    PairCheck::overlap(Group::Hazards, Group::Player),
    PairCheck::collide(Group::Hazards, Group::Hazards),
];

/// Complete game state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub settings: Settings,
    /// RNG state for hazard placement
    pub rng_state: RngState,
    pub registry: Registry,
    pub player: Player,
    pub pickups: PickupSet,
    pub hazards: HazardPool,
    pub score: ScoreTracker,
    pub phase: RoundPhase,
    /// Live only while the round is over and waiting for confirm
    pub reset_listener: Option<ResetSubscription>,
    /// Simulation tick counter (frozen while Ended)
    pub time_ticks: u64,
}

impl GameState {
    /// Build the board, create its bodies and register the pair checks
    pub fn new(settings: Settings, services: &mut Services) -> Self {
        let settings = settings.sanitized();
        let mut registry = Registry::new();
        let layout = &settings.layout;

        for platform in &layout.platforms {
            spawn_with_body(
                &mut registry,
                services.physics,
                EntityKind::Platform,
                platform.pos(),
                BodyProps::fixed(platform.scale()),
            );
        }

        let player_id = spawn_with_body(
            &mut registry,
            services.physics,
            EntityKind::Player,
            layout.player_start,
            BodyProps::dynamic(layout.player_bounce, true).with_scale(PLAYER_SCALE.into()),
        );

        let mut pickups = PickupSet::default();
        for pos in layout.pickups.positions() {
            let id = spawn_with_body(
                &mut registry,
                services.physics,
                EntityKind::Pickup,
                pos,
                BodyProps::dynamic(layout.pickup_bounce, false).with_scale(PICKUP_SCALE.into()),
            );
            pickups.pickups.push(Pickup { id, home_x: pos.x });
        }

        for check in PAIR_CHECKS {
            services.physics.register(check);
        }

        let score = ScoreTracker::new();
        services.display.set_score_text(&score.value().to_string());
        services.animator.play(Facing::Idle);

        log::info!(
            "Board ready: {} platforms, {} pickups, seed {}",
            layout.platforms.len(),
            pickups.len(),
            settings.seed
        );

        Self {
            rng_state: RngState::new(settings.seed),
            registry,
            player: Player {
                id: player_id,
                vel: Vec2::ZERO,
                grounded: false,
                hit: false,
                facing: Facing::Idle,
            },
            pickups,
            hazards: HazardPool::default(),
            score,
            phase: RoundPhase::Playing,
            reset_listener: None,
            time_ticks: 0,
            settings,
        }
    }

    pub fn player_pos(&self) -> Vec2 {
        self.registry
            .position(self.player.id)
            .unwrap_or(self.settings.layout.player_start)
    }

    pub fn is_playing(&self) -> bool {
        self.phase == RoundPhase::Playing
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::physics::HeadlessBridge;
    use crate::sim::test_support::{Hud, Reel};

    #[test]
    fn test_new_builds_sample_board() {
        let mut bridge = HeadlessBridge::new();
        let mut hud = Hud::default();
        let mut reel = Reel::default();
        let state = GameState::new(
            Settings::default(),
            &mut Services {
                physics: &mut bridge,
                display: &mut hud,
                animator: &mut reel,
            },
        );

        assert_eq!(state.phase, RoundPhase::Playing);
        assert_eq!(state.pickups.len(), 13);
        assert_eq!(state.pickups.active_count(&state.registry), 13);
        assert!(state.hazards.is_empty());
        assert_eq!(state.registry.count_active(EntityKind::Platform), 4);
        assert_eq!(state.player_pos(), Vec2::new(512.0, 600.0));
        assert_eq!(hud.shown, vec!["0"]);

        assert_eq!(bridge.bodies_in(Group::Pickups).count(), 13);
        assert_eq!(bridge.bodies_in(Group::Platforms).count(), 4);
        assert_eq!(bridge.body(state.player.id).unwrap().group, Group::Player);
        for check in PAIR_CHECKS {
            assert!(bridge.is_registered(check));
        }
    }

    #[test]
    fn test_new_sanitizes_settings() {
        let settings = Settings::from_json(
            r#"{ "tuning": { "hazard_max_drift": -200.0, "arena_width": -5.0 } }"#,
        )
        .unwrap();
        let mut bridge = HeadlessBridge::new();
        let mut hud = Hud::default();
        let mut reel = Reel::default();
        let state = GameState::new(
            settings,
            &mut Services {
                physics: &mut bridge,
                display: &mut hud,
                animator: &mut reel,
            },
        );

        assert_eq!(state.settings.tuning.hazard_max_drift, 200.0);
        assert_eq!(state.settings.tuning.arena_width, ARENA_WIDTH);
    }

    #[test]
    fn test_rng_streams_differ_but_replay() {
        use rand::Rng;

        let mut a = RngState::new(42);
        let mut b = RngState::new(42);
        let first: u32 = a.next_rng().random();
        let second: u32 = a.next_rng().random();
        assert_ne!(first, second);

        assert_eq!(b.next_rng().random::<u32>(), first);
        assert_eq!(b.next_rng().random::<u32>(), second);
    }
}
