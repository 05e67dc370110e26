//! Starfall headless host
//!
//! Replays a scripted session against the headless physics bridge and prints
//! a JSON summary of the final state. Usage:
//!
//! ```text
//! starfall [settings.json] [script.json]
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use starfall::Settings;
use starfall::sim::{
    Animator, EntityId, Facing, GameEvent, GameState, HeadlessBridge, PhysicsEvent, RoundPhase,
    ScoreDisplay, Services, TickInput, tick,
};

/// Something the scripted "physics" reports during a step
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "cue", rename_all = "snake_case")]
enum Cue {
    MovePlayer { x: f32, y: f32 },
    Grounded { grounded: bool },
    TouchPickup { index: usize },
    TouchHazard { index: usize },
    /// Player overlaps every active pickup in one step
    SweepPickups,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
struct ScriptStep {
    input: TickInput,
    cues: Vec<Cue>,
    /// Run this step this many times (0 counts as 1)
    repeat: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct Script {
    steps: Vec<ScriptStep>,
}

#[derive(Debug, Serialize)]
struct Summary {
    ticks: u64,
    phase: RoundPhase,
    score: u32,
    hazards: usize,
    active_pickups: usize,
    resets: usize,
    hits: usize,
}

/// Logs score updates instead of drawing them
struct ConsoleHud;

impl ScoreDisplay for ConsoleHud {
    fn set_score_text(&mut self, text: &str) {
        log::info!("Score: {text}");
    }
}

/// Logs animation changes
#[derive(Default)]
struct ConsoleAnimator {
    current: Option<Facing>,
}

impl Animator for ConsoleAnimator {
    fn play(&mut self, facing: Facing) {
        if self.current != Some(facing) {
            log::debug!("Animation: {}", facing.as_str());
            self.current = Some(facing);
        }
    }

    fn set_hit(&mut self, hit: bool) {
        log::debug!("Hit tint {}", if hit { "on" } else { "off" });
    }
}

fn load_script(path: &Path) -> Result<Script, Box<dyn std::error::Error>> {
    let json = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&json)?)
}

/// Walk about, clear the board twice, get hit, reset, confirm again
fn builtin_script() -> Script {
    let step = |input: TickInput, cues: Vec<Cue>, repeat: u32| ScriptStep {
        input,
        cues,
        repeat,
    };
    let right = TickInput {
        move_right: true,
        ..Default::default()
    };
    let jump = TickInput {
        jump: true,
        ..Default::default()
    };
    let confirm = TickInput {
        confirm: true,
        ..Default::default()
    };

    Script {
        steps: vec![
            step(TickInput::default(), vec![Cue::Grounded { grounded: true }], 1),
            step(right, vec![], 30),
            step(jump, vec![Cue::Grounded { grounded: false }], 1),
            step(
                TickInput::default(),
                vec![Cue::MovePlayer { x: 300.0, y: 600.0 }],
                1,
            ),
            step(TickInput::default(), vec![Cue::SweepPickups], 1),
            step(
                TickInput::default(),
                vec![Cue::MovePlayer { x: 800.0, y: 600.0 }],
                1,
            ),
            step(TickInput::default(), vec![Cue::SweepPickups], 1),
            step(TickInput::default(), vec![Cue::TouchHazard { index: 0 }], 1),
            step(right, vec![], 10),
            step(confirm, vec![], 1),
            step(confirm, vec![], 1),
            step(TickInput::default(), vec![Cue::TouchPickup { index: 0 }], 1),
        ],
    }
}

/// Translate a cue into bridge events for the current board
fn resolve(state: &GameState, cue: &Cue) -> Vec<PhysicsEvent> {
    let player = state.player.id;
    let touch = |other: EntityId| PhysicsEvent::Overlap { a: player, b: other };

    match *cue {
        Cue::MovePlayer { x, y } => vec![PhysicsEvent::Moved {
            id: player,
            pos: glam::Vec2::new(x, y),
        }],
        Cue::Grounded { grounded } => vec![PhysicsEvent::Contact {
            id: player,
            grounded,
        }],
        Cue::TouchPickup { index } => state
            .pickups
            .iter()
            .nth(index)
            .map(|p| touch(p.id))
            .into_iter()
            .collect(),
        Cue::TouchHazard { index } => state.hazards.iter().nth(index).map(touch).into_iter().collect(),
        Cue::SweepPickups => state
            .pickups
            .iter()
            .filter(|p| state.registry.is_active(p.id))
            .map(|p| touch(p.id))
            .collect(),
    }
}

fn run(settings: Settings, script: &Script) -> Summary {
    let mut bridge = HeadlessBridge::new();
    let mut hud = ConsoleHud;
    let mut animator = ConsoleAnimator::default();

    let mut state = GameState::new(
        settings,
        &mut Services {
            physics: &mut bridge,
            display: &mut hud,
            animator: &mut animator,
        },
    );
    let mut events: Vec<GameEvent> = Vec::new();

    for step in &script.steps {
        for _ in 0..step.repeat.max(1) {
            for cue in &step.cues {
                for report in resolve(&state, cue) {
                    bridge.queue(report);
                }
            }

            let mut services = Services {
                physics: &mut bridge,
                display: &mut hud,
                animator: &mut animator,
            };
            events.extend(tick(&mut state, &step.input, &mut services));
        }
    }

    for event in &events {
        log::debug!("{event:?}");
    }

    Summary {
        ticks: state.time_ticks,
        phase: state.phase,
        score: state.score.value(),
        hazards: state.hazards.len(),
        active_pickups: state.pickups.active_count(&state.registry),
        resets: events.iter().filter(|e| matches!(e, GameEvent::RoundReset)).count(),
        hits: events
            .iter()
            .filter(|e| matches!(e, GameEvent::PlayerHit { .. }))
            .count(),
    }
}

fn main() {
    #[cfg(not(target_arch = "wasm32"))]
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Starfall (headless) starting...");

    let args: Vec<String> = std::env::args().skip(1).collect();
    let settings = Settings::load(args.first().map(Path::new));

    let script = match args.get(1) {
        Some(path) => match load_script(Path::new(path)) {
            Ok(script) => script,
            Err(e) => {
                log::error!("Could not load script {path}: {e}");
                std::process::exit(1);
            }
        },
        None => builtin_script(),
    };

    let summary = run(settings, &script);
    match serde_json::to_string_pretty(&summary) {
        Ok(json) => println!("{json}"),
        Err(e) => {
            log::error!("Could not write summary: {e}");
            std::process::exit(1);
        }
    }
}
