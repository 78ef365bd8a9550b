use anyhow::Context;
use config::{Config, File, FileFormat};
use serde::Deserialize;
use tracing::info;

const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Physical platform parameters.
#[derive(Debug, Clone, Deserialize)]
pub struct RobotSettings {
    /// Wheel radius (m).
    pub wheel_radius: f64,
    /// Distance between the wheel centers (m).
    pub wheel_separation: f64,
}

/// Velocity saturation limits.
#[derive(Debug, Clone, Deserialize)]
pub struct LimitSettings {
    /// Maximum linear velocity magnitude (m/s).
    pub max_linear_velocity: f64,
    /// Maximum angular velocity magnitude (rad/s).
    pub max_angular_velocity: f64,
}

/// Potential-field gains.
#[derive(Debug, Clone, Deserialize)]
pub struct ControllerSettings {
    pub k_att: f64,
    pub k_rep: f64,
    pub k_lin: f64,
    pub k_ang: f64,
}

/// Laser scanner parameters.
#[derive(Debug, Clone, Deserialize)]
pub struct SensorSettings {
    /// Sensing range (m); obstacles beyond it exert no repulsion.
    pub range: f64,
    /// Number of beams per scan.
    pub beam_count: usize,
    /// Field of view (rad).
    pub fov: f64,
}

/// Occupancy grid parameters.
#[derive(Debug, Clone, Deserialize)]
pub struct GridSettings {
    /// Side length in cells.
    pub size: usize,
    /// Cell side length (m).
    pub cell_size: f64,
    /// Whether the world origin maps to the middle cell.
    pub centered: bool,
}

/// Navigation goal in the global frame.
#[derive(Debug, Clone, Deserialize)]
pub struct GoalSettings {
    pub x: f64,
    pub y: f64,
}

/// All configuration, fixed at process start.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub robot: RobotSettings,
    pub limits: LimitSettings,
    pub controller: ControllerSettings,
    pub sensor: SensorSettings,
    pub grid: GridSettings,
    pub goal: GoalSettings,
}

pub fn load_config() -> anyhow::Result<Settings> {
    info!("Attempting to load configuration from {}", DEFAULT_CONFIG_PATH);

    let settings = Config::builder()
        .add_source(File::new(DEFAULT_CONFIG_PATH, FileFormat::Toml).required(true))
        .build()
        .context("failed to read configuration")?
        .try_deserialize::<Settings>()
        .context("configuration is malformed")?;

    info!("Successfully loaded configuration: {:?}", settings);
    Ok(settings)
}
