//! Application configuration
//!
//! Configuration is loaded from multiple sources with the following priority (lowest to highest):
//! 1. `config/default.toml` (version controlled)
//! 2. `config/user.toml` (gitignored, user overrides)
//! 3. Environment variables (`CUBEVIEW_SECTION__KEY`)

use cubeview_core::{FaceId, ProjectionMode, ShadingSettings};
use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::f64::consts::SQRT_2;
use std::path::Path;

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Cube geometry
    #[serde(default)]
    pub cube: CubeConfig,
    /// Rendering configuration
    #[serde(default)]
    pub render: RenderConfig,
    /// Input configuration
    #[serde(default)]
    pub input: InputConfig,
    /// Debug configuration
    #[serde(default)]
    pub debug: DebugConfig,
}

impl AppConfig {
    /// Load configuration from default locations
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from a specific config directory
    pub fn load_from<P: AsRef<Path>>(config_dir: P) -> Result<Self, ConfigError> {
        let config_dir = config_dir.as_ref();
        let default_path = config_dir.join("default.toml");
        let user_path = config_dir.join("user.toml");

        let mut figment = Figment::new();

        if default_path.exists() {
            figment = figment.merge(Toml::file(&default_path));
        }

        if user_path.exists() {
            figment = figment.merge(Toml::file(&user_path));
        }

        // CUBEVIEW_CUBE__SIDE=30 -> cube.side = 30
        figment = figment.merge(Env::prefixed("CUBEVIEW_").split("__"));

        figment.extract().map_err(ConfigError::from)
    }
}

/// Cube geometry, in world units (one unit per terminal column)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CubeConfig {
    /// Edge length
    pub side: f64,
    /// Distance from the cube center to the screen plane
    pub screen_distance: f64,
    /// Distance from the cube center to the eye; the larger it is, the
    /// weaker the perspective
    pub eye_distance: f64,
}

impl Default for CubeConfig {
    fn default() -> Self {
        let side = 24.0;
        let screen_distance = side / SQRT_2 + 1.0;
        Self {
            side,
            screen_distance,
            eye_distance: screen_distance + 2.0 * side,
        }
    }
}

/// Rendering configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Start in orthographic or perspective mode
    pub projection: ProjectionMode,
    /// Fill faces with their colors
    pub coloring: bool,
    /// Draw the shading overlay
    pub shading: bool,
    /// Shading grid and light
    pub shading_settings: ShadingSettings,
    /// Background color [r, g, b]
    pub background: [u8; 3],
    /// Face edge color [r, g, b]
    pub outline: [u8; 3],
    /// Fill color per face
    pub face_colors: FaceColors,
    /// Frame rate cap
    pub target_fps: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            projection: ProjectionMode::Perspective,
            coloring: true,
            shading: true,
            shading_settings: ShadingSettings::default(),
            background: [255, 122, 0],
            outline: [0, 0, 0],
            face_colors: FaceColors::default(),
            target_fps: 30,
        }
    }
}

/// Fill color of each face, named after the unrotated cube
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FaceColors {
    pub front: [u8; 3],
    pub top: [u8; 3],
    pub back: [u8; 3],
    pub bottom: [u8; 3],
    pub left: [u8; 3],
    pub right: [u8; 3],
}

impl FaceColors {
    pub fn get(&self, face: FaceId) -> [u8; 3] {
        match face {
            FaceId::Front => self.front,
            FaceId::Top => self.top,
            FaceId::Back => self.back,
            FaceId::Bottom => self.bottom,
            FaceId::Left => self.left,
            FaceId::Right => self.right,
        }
    }
}

impl Default for FaceColors {
    fn default() -> Self {
        Self {
            front: [255, 0, 0],
            top: [0, 255, 0],
            back: [0, 0, 255],
            bottom: [255, 255, 0],
            left: [255, 0, 255],
            right: [0, 255, 255],
        }
    }
}

/// Input configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Held arrow keys rotate by `side / key_step_divisor` per frame
    pub key_step_divisor: f64,
    /// Distance added or removed per zoom key press
    pub zoom_step: f64,
    /// Zooming in stops once the screen distance would drop below this
    pub min_screen_distance: f64,
    /// Interval over which mouse drags are accumulated into one rotation
    pub drag_sample_ms: u64,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            key_step_divisor: 50.0,
            zoom_step: 6.0,
            min_screen_distance: -6.0,
            drag_sample_ms: 1000 / 7,
        }
    }
}

/// Debug configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugConfig {
    /// Log filter (error, warn, info, debug, trace, or env_logger directives)
    pub log_level: String,
    /// Write logs here instead of stderr, which the alternate screen hides
    pub log_file: Option<String>,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
            log_file: None,
        }
    }
}

/// Configuration error
#[derive(Debug)]
pub struct ConfigError {
    message: String,
}

impl From<figment::Error> for ConfigError {
    fn from(e: figment::Error) -> Self {
        ConfigError {
            message: e.to_string(),
        }
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Configuration error: {}", self.message)
    }
}

impl std::error::Error for ConfigError {}
