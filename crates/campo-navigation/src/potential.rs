#![warn(missing_docs)]

//! Artificial-potential-field steering.
//!
//! Combines a unit attraction force toward the goal with an inverse-square
//! repulsion force away from sensed obstacles, projects the sum through the
//! De Luca–Oriolo heading-error regulator onto bounded linear/angular
//! velocities, and maps those to wheel speeds.

use core::ops::{Add, AddAssign};

use campo_kinematics::{DifferentialDrive, Twist, WheelSpeeds};
use tracing::trace;

use crate::map::WorldPoint;

/// One beam of a scan: bearing (rad) and measured range (m).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SensorReading {
    /// Beam angle in the sensor frame.
    pub angle: f64,
    /// Measured distance along the beam.
    pub distance: f64,
}

impl SensorReading {
    /// Creates a new reading.
    pub const fn new(angle: f64, distance: f64) -> Self {
        Self { angle, distance }
    }
}

/// A 2-D virtual force, summed by vector addition.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Force {
    /// x component.
    pub x: f64,
    /// y component.
    pub y: f64,
}

impl Force {
    /// Creates a new force vector.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean magnitude.
    pub fn norm(&self) -> f64 {
        (self.x * self.x + self.y * self.y).sqrt()
    }
}

impl Add for Force {
    type Output = Force;

    fn add(self, rhs: Force) -> Force {
        Force::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Force {
    fn add_assign(&mut self, rhs: Force) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

/// Gains and limits of the potential-field regulator.
///
/// All values are fixed at process start; there is no runtime mutation.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ControllerGains {
    /// Attraction constant. Carried for tuning parity with the reference
    /// constants; the attraction term itself stays a unit vector.
    pub k_att: f64,
    /// Repulsion constant.
    pub k_rep: f64,
    /// Linear control gain.
    pub k_lin: f64,
    /// Angular control gain.
    pub k_ang: f64,
    /// Maximum linear velocity magnitude (m/s).
    pub max_v: f64,
    /// Maximum angular velocity magnitude (rad/s).
    pub max_w: f64,
    /// Obstacles beyond this range exert no repulsion (m).
    pub sensing_range: f64,
}

/// Potential-field steering controller for a differential-drive platform.
///
/// Stateless across ticks: every command is recomputed from the inputs of
/// the current tick.
#[derive(Debug, Clone, Copy)]
pub struct PotentialFieldController {
    gains: ControllerGains,
    drive: DifferentialDrive,
}

impl PotentialFieldController {
    /// Creates a controller from gains and platform kinematics.
    pub const fn new(gains: ControllerGains, drive: DifferentialDrive) -> Self {
        Self { gains, drive }
    }

    /// The configured gains.
    pub fn gains(&self) -> &ControllerGains {
        &self.gains
    }

    /// Unit-vector attraction toward the goal.
    ///
    /// The magnitude is deliberately not scaled by distance, which keeps
    /// far-field attraction bounded. `None` when the goal is reached
    /// exactly, where the direction is undefined; callers hold position.
    pub fn attraction(&self, current: WorldPoint, goal: WorldPoint) -> Option<Force> {
        let err = Force::new(goal.x - current.x, goal.y - current.y);
        let norm = err.norm();
        if norm == 0.0 {
            return None;
        }
        Some(Force::new(err.x / norm, err.y / norm))
    }

    /// Accumulated repulsion from all obstacles sensed inside the range.
    ///
    /// For each reading with `distance < sensing_range` the standard
    /// inverse-square gradient `k_rep * (1/d²) * (1/d - 1/range) * (dv/d)`
    /// is added, with `dv` pointing from the obstacle to the robot. The
    /// term vanishes smoothly as `d` approaches the range boundary. A
    /// reading coincident with the robot (`d ≈ 0`) is a numerical
    /// singularity and is skipped as unsensable for this tick.
    pub fn repulsion(
        &self,
        current: WorldPoint,
        readings: &[SensorReading],
        obstacle_points: &[WorldPoint],
    ) -> Force {
        let range = self.gains.sensing_range;
        let mut f_rep = Force::default();
        for (reading, obstacle) in readings.iter().zip(obstacle_points) {
            if reading.distance >= range {
                continue;
            }
            let dv = Force::new(current.x - obstacle.x, current.y - obstacle.y);
            let d = dv.norm();
            if d <= f64::EPSILON {
                trace!(?obstacle, "skipping obstacle coincident with robot position");
                continue;
            }
            let magnitude = self.gains.k_rep * (1.0 / (d * d)) * (1.0 / d - 1.0 / range);
            f_rep += Force::new(magnitude * dv.x / d, magnitude * dv.y / d);
        }
        f_rep
    }

    /// Bounded velocity command for one tick.
    ///
    /// Sums attraction and repulsion, then applies the De Luca–Oriolo
    /// regulator: `v = k_lin·(fx·cosθ + fy·sinθ)`,
    /// `w = k_ang·(atan2(fy, fx) − θ)`, both saturated to the configured
    /// maxima. A reached goal yields the zero command (hold position).
    pub fn twist(
        &self,
        current: WorldPoint,
        heading: f64,
        goal: WorldPoint,
        readings: &[SensorReading],
        obstacle_points: &[WorldPoint],
    ) -> Twist {
        let Some(f_att) = self.attraction(current, goal) else {
            return Twist::default();
        };
        let f = f_att + self.repulsion(current, readings, obstacle_points);

        let v = self.gains.k_lin * (f.x * heading.cos() + f.y * heading.sin());
        let w = self.gains.k_ang * (f.y.atan2(f.x) - heading);
        trace!(fx = f.x, fy = f.y, v, w, "potential field command");

        Twist::new(v, w).clamped(self.gains.max_v, self.gains.max_w)
    }

    /// Wheel speeds for one tick: [`PotentialFieldController::twist`]
    /// followed by differential-drive inverse kinematics.
    pub fn step(
        &self,
        current: WorldPoint,
        heading: f64,
        goal: WorldPoint,
        readings: &[SensorReading],
        obstacle_points: &[WorldPoint],
    ) -> WheelSpeeds {
        let twist = self.twist(current, heading, goal, readings, obstacle_points);
        self.drive.inverse_kinematics(twist)
    }
}
