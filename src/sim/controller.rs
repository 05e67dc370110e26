//! Player controller: input signals to a motion command

use serde::{Deserialize, Serialize};

use crate::settings::Tuning;

/// Which way the player is animated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Facing {
    Left,
    Right,
    /// Facing the camera ("turn" frame)
    #[default]
    Idle,
}

impl Facing {
    pub fn as_str(&self) -> &'static str {
        match self {
            Facing::Left => "left",
            Facing::Right => "right",
            Facing::Idle => "idle",
        }
    }
}

/// Pre-sampled input for one tick. Missing signals are `false`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TickInput {
    pub move_left: bool,
    pub move_right: bool,
    /// Jump key (space)
    pub jump: bool,
    /// Up key, also jumps
    pub up: bool,
    /// Edge-triggered confirm (enter); only meaningful while the round is over
    pub confirm: bool,
}

impl TickInput {
    pub fn jump_requested(&self) -> bool {
        self.jump || self.up
    }
}

/// What the controller wants the physics bridge to do this tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MotionCommand {
    pub velocity_x: f32,
    /// Upward impulse (negative y), only when a jump was accepted
    pub jump_impulse: Option<f32>,
    pub facing: Facing,
}

/// Resolve input into motion. Left wins when both directions are held; jumps
/// are only accepted while grounded.
pub fn drive(input: &TickInput, grounded: bool, tuning: &Tuning) -> MotionCommand {
    let (velocity_x, facing) = if input.move_left {
        (-tuning.walk_speed, Facing::Left)
    } else if input.move_right {
        (tuning.walk_speed, Facing::Right)
    } else {
        (0.0, Facing::Idle)
    };

    let jump_impulse = (input.jump_requested() && grounded).then_some(-tuning.jump_speed);

    MotionCommand {
        velocity_x,
        jump_impulse,
        facing,
    }
}
