//! Recording fakes shared by the simulation unit tests

use glam::Vec2;

use super::controller::{Facing, TickInput};
use super::entity::EntityId;
use super::physics::{HeadlessBridge, PhysicsEvent};
use super::score::ScoreDisplay;
use super::state::{Animator, GameEvent, GameState, Services};
use super::tick::tick;
use crate::settings::Settings;

#[derive(Debug, Default)]
pub struct Hud {
    pub shown: Vec<String>,
}

impl ScoreDisplay for Hud {
    fn set_score_text(&mut self, text: &str) {
        self.shown.push(text.to_string());
    }
}

#[derive(Debug, Default)]
pub struct Reel {
    pub played: Vec<Facing>,
    pub hit: bool,
}

impl Animator for Reel {
    fn play(&mut self, facing: Facing) {
        self.played.push(facing);
    }

    fn set_hit(&mut self, hit: bool) {
        self.hit = hit;
    }
}

/// A game wired to the headless bridge and recording fakes
pub struct Harness {
    pub state: GameState,
    pub bridge: HeadlessBridge,
    pub hud: Hud,
    pub reel: Reel,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_settings(Settings::default())
    }

    pub fn with_settings(settings: Settings) -> Self {
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
        Self {
            state,
            bridge,
            hud,
            reel,
        }
    }

    /// Run `f` with the collaborators borrowed as [`Services`]
    pub fn with_services<R>(&mut self, f: impl FnOnce(&mut GameState, &mut Services) -> R) -> R {
        let mut services = Services {
            physics: &mut self.bridge,
            display: &mut self.hud,
            animator: &mut self.reel,
        };
        f(&mut self.state, &mut services)
    }

    pub fn tick(&mut self, input: TickInput) -> Vec<GameEvent> {
        self.with_services(|state, services| tick(state, &input, services))
    }

    /// Queue events for the bridge's next step, then tick with idle input
    pub fn step_with(&mut self, events: &[PhysicsEvent]) -> Vec<GameEvent> {
        for event in events {
            self.bridge.queue(*event);
        }
        self.tick(TickInput::default())
    }

    pub fn pickup_ids(&self) -> Vec<EntityId> {
        self.state.pickups.iter().map(|p| p.id).collect()
    }

    pub fn touch(&mut self, other: EntityId) -> Vec<GameEvent> {
        let player = self.state.player.id;
        self.step_with(&[PhysicsEvent::Overlap { a: player, b: other }])
    }

    pub fn move_player(&mut self, pos: Vec2) {
        let id = self.state.player.id;
        self.step_with(&[PhysicsEvent::Moved { id, pos }]);
    }

    /// Collect every active pickup, one tick each
    pub fn collect_all(&mut self) -> Vec<GameEvent> {
        let mut events = Vec::new();
        for id in self.pickup_ids() {
            if self.state.registry.is_active(id) {
                events.extend(self.touch(id));
            }
        }
        events
    }

    pub fn confirm(&mut self) -> Vec<GameEvent> {
        self.tick(TickInput {
            confirm: true,
            ..Default::default()
        })
    }
}
