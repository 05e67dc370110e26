//! Starfall - gameplay core of a single-screen platformer
//!
//! Core modules:
//! - `sim`: Tick-driven gameplay state machine (entities, reactions, rounds)
//! - `settings`: Data-driven tuning and board layout
//!
//! Rendering, audio, input polling and the physics engine itself live outside
//! this crate and are reached through the traits in [`sim::physics`],
//! [`sim::score`] and [`sim::tick`].

pub mod settings;
pub mod sim;

pub use settings::{Layout, Settings, Tuning};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;

    /// Arena width; hazards spawn on the opposite side of its midpoint
    pub const ARENA_WIDTH: f32 = 1024.0;

    /// Player horizontal speed (units/s)
    pub const WALK_SPEED: f32 = 200.0;
    /// Jump impulse magnitude (applied upward, i.e. negative y)
    pub const JUMP_SPEED: f32 = 700.0;
    /// Canonical player start position
    pub const PLAYER_START: (f32, f32) = (512.0, 600.0);
    pub const PLAYER_BOUNCE: f32 = 0.15;
    pub const PLAYER_SCALE: (f32, f32) = (1.25, 1.25);

    /// Score awarded per pickup
    pub const PICKUP_VALUE: u32 = 10;
    /// Pickups on the board (grid of `PICKUP_COUNT` along x)
    pub const PICKUP_COUNT: usize = 13;
    pub const PICKUP_START_X: f32 = 30.0;
    pub const PICKUP_STEP_X: f32 = 80.0;
    /// Y used when the full set respawns mid-round (they fall again)
    pub const PICKUP_RESPAWN_Y: f32 = 0.0;
    /// Y used by the round reset
    pub const PICKUP_RESET_Y: f32 = 16.0;
    pub const PICKUP_BOUNCE: f32 = 0.2;
    /// Pickups are only stretched horizontally
    pub const PICKUP_SCALE: (f32, f32) = (1.4, 1.0);

    /// Hazard spawn height
    pub const HAZARD_SPAWN_Y: f32 = 16.0;
    /// Downward component of a new hazard's velocity
    pub const HAZARD_FALL_SPEED: f32 = 80.0;
    /// Max absolute horizontal velocity of a new hazard
    pub const HAZARD_MAX_DRIFT: f32 = 200.0;
    pub const HAZARD_BOUNCE: f32 = 1.0;
    pub const HAZARD_SCALE: (f32, f32) = (1.5, 1.5);
}
