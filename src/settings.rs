//! Game settings: tuning constants and the board layout
//!
//! Loaded from a JSON file by the host. Every field has a default so a
//! partial file only overrides what it names.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Movement, scoring and spawn tunables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Horizontal player speed
    pub walk_speed: f32,
    /// Jump impulse magnitude
    pub jump_speed: f32,
    /// Score per pickup
    pub pickup_value: u32,
    /// Arena width (hazard side split at half of this)
    pub arena_width: f32,
    pub hazard_spawn_y: f32,
    pub hazard_fall_speed: f32,
    /// Hazard horizontal velocity is drawn from `[-drift, drift]`
    pub hazard_max_drift: f32,
    /// Pickup y after the whole set is collected
    pub pickup_respawn_y: f32,
    /// Pickup y after a round reset
    pub pickup_reset_y: f32,
    /// Fixed timestep handed to the physics bridge
    pub sim_dt: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            walk_speed: WALK_SPEED,
            jump_speed: JUMP_SPEED,
            pickup_value: PICKUP_VALUE,
            arena_width: ARENA_WIDTH,
            hazard_spawn_y: HAZARD_SPAWN_Y,
            hazard_fall_speed: HAZARD_FALL_SPEED,
            hazard_max_drift: HAZARD_MAX_DRIFT,
            pickup_respawn_y: PICKUP_RESPAWN_Y,
            pickup_reset_y: PICKUP_RESET_Y,
            sim_dt: SIM_DT,
        }
    }
}

impl Tuning {
    /// X coordinate splitting the arena into left and right halves
    pub fn midpoint(&self) -> f32 {
        self.arena_width / 2.0
    }
}

/// A static platform, positioned by its center and scaled from the base sprite
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlatformSpec {
    pub x: f32,
    pub y: f32,
    pub scale_x: f32,
    pub scale_y: f32,
}

impl PlatformSpec {
    pub const fn new(x: f32, y: f32, scale_x: f32, scale_y: f32) -> Self {
        Self {
            x,
            y,
            scale_x,
            scale_y,
        }
    }

    pub fn pos(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    pub fn scale(&self) -> Vec2 {
        Vec2::new(self.scale_x, self.scale_y)
    }
}

/// Regular horizontal grid of pickups
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PickupGrid {
    pub count: usize,
    pub start_x: f32,
    pub y: f32,
    pub step_x: f32,
}

impl Default for PickupGrid {
    fn default() -> Self {
        Self {
            count: PICKUP_COUNT,
            start_x: PICKUP_START_X,
            y: PICKUP_RESPAWN_Y,
            step_x: PICKUP_STEP_X,
        }
    }
}

impl PickupGrid {
    /// Home positions, left to right
    pub fn positions(&self) -> impl Iterator<Item = Vec2> + '_ {
        (0..self.count).map(|i| Vec2::new(self.start_x + self.step_x * i as f32, self.y))
    }
}

/// Board layout: where everything starts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Layout {
    pub player_start: Vec2,
    pub pickups: PickupGrid,
    pub platforms: Vec<PlatformSpec>,
    pub player_bounce: f32,
    pub pickup_bounce: f32,
    pub hazard_bounce: f32,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            player_start: Vec2::new(PLAYER_START.0, PLAYER_START.1),
            pickups: PickupGrid::default(),
            platforms: vec![
                // Ground
                PlatformSpec::new(512.0, 752.0, 3.0, 1.0),
                // Ledges
                PlatformSpec::new(256.0, 600.0, 0.6, 1.0),
                PlatformSpec::new(768.0, 600.0, 0.6, 1.0),
                PlatformSpec::new(512.0, 450.0, 0.6, 1.0),
            ],
            player_bounce: PLAYER_BOUNCE,
            pickup_bounce: PICKUP_BOUNCE,
            hazard_bounce: HAZARD_BOUNCE,
        }
    }
}

/// Everything a round needs to start
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Seed for hazard placement
    pub seed: u64,
    pub tuning: Tuning,
    pub layout: Layout,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: 0x5EED,
            tuning: Tuning::default(),
            layout: Layout::default(),
        }
    }
}

impl Settings {
    /// Parse settings from JSON text
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Read and parse a settings file
    pub fn load_from(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let json = std::fs::read_to_string(path)?;
        Ok(Self::from_json(&json)?.sanitized())
    }

    /// Load settings, falling back to defaults if the file is missing or bad
    pub fn load(path: Option<&Path>) -> Self {
        if let Some(path) = path {
            match Self::load_from(path) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    return settings;
                }
                Err(e) => log::warn!("Could not load {}: {e}", path.display()),
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Clamp values the simulation cannot work with
    pub fn sanitized(mut self) -> Self {
        if self.layout.pickups.count == 0 {
            log::warn!("Pickup count must be at least 1, using 1");
            self.layout.pickups.count = 1;
        }
        if !(self.tuning.arena_width >= 2.0) {
            log::warn!("Arena width {} too small, using default", self.tuning.arena_width);
            self.tuning.arena_width = ARENA_WIDTH;
        }
        self.tuning.hazard_max_drift = self.tuning.hazard_max_drift.abs();
        if !(self.tuning.sim_dt > 0.0) {
            self.tuning.sim_dt = SIM_DT;
        }
        self
    }
}
