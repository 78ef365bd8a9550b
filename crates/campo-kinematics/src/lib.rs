#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]
#![doc = "A `no_std` library for 2D differential-drive robot kinematics."]
#![doc = ""]
#![doc = "This crate provides pose, velocity-command and wheel-speed types, forward and"]
#![doc = "inverse kinematics, and dead-reckoning pose updates from commanded speeds."]

use core::f64::consts::PI;
use core::fmt;
use libm::{cos, sin};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub mod error;
pub use error::KinematicsError;

/// A 2-D pose `(x, y, θ)` in meters and radians (θ measured counter-clockwise
/// from the x-axis in the world frame).
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Pose {
    /// World-frame x position (m).
    pub x: f64,
    /// World-frame y position (m).
    pub y: f64,
    /// Heading (rad), normalized to `[-PI, PI)`.
    pub theta: f64,
}

impl Pose {
    /// Construct a new pose.
    pub const fn new(x: f64, y: f64, theta: f64) -> Self {
        Pose { x, y, theta }
    }

    /// Normalize an angle to `[-PI, PI)`. Angles at `PI` map to `-PI`.
    pub fn normalize_angle(angle: f64) -> f64 {
        let a = angle % (2.0 * PI);
        if a >= PI {
            a - 2.0 * PI
        } else if a < -PI {
            a + 2.0 * PI
        } else {
            a
        }
    }
}

impl fmt::Display for Pose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(x: {:.2}, y: {:.2}, θ: {:.2} rad)", self.x, self.y, self.theta)
    }
}

/// A velocity command in the robot base frame: linear speed of the chassis
/// center and angular speed around the base z-axis.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Twist {
    /// Linear velocity (m/s) along the robot's x-axis.
    pub v: f64,
    /// Angular velocity (rad/s) around the robot's z-axis.
    pub w: f64,
}

impl Twist {
    /// Construct a new twist.
    pub const fn new(v: f64, w: f64) -> Self {
        Twist { v, w }
    }

    /// Saturate both components independently to the given magnitudes.
    ///
    /// This is a hard clamp, not a rescale: the direction of the clamped pair
    /// may differ from the unclamped pair's ratio.
    pub fn clamped(self, max_v: f64, max_w: f64) -> Self {
        Twist {
            v: self.v.clamp(-max_v, max_v),
            w: self.w.clamp(-max_w, max_w),
        }
    }
}

impl fmt::Display for Twist {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(v: {:.2} m/s, ω: {:.2} rad/s)", self.v, self.w)
    }
}

/// Left and right wheel angular velocities.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WheelSpeeds {
    /// Left wheel angular velocity (rad/s).
    pub omega_l: f64,
    /// Right wheel angular velocity (rad/s).
    pub omega_r: f64,
}

impl WheelSpeeds {
    /// Construct wheel speeds.
    pub const fn new(omega_l: f64, omega_r: f64) -> Self {
        WheelSpeeds { omega_l, omega_r }
    }
}

impl fmt::Display for WheelSpeeds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(ωL: {:.2} rad/s, ωR: {:.2} rad/s)", self.omega_l, self.omega_r)
    }
}

/// Differential-drive kinematics helper.
///
/// Encapsulates the physical parameters of a two-wheeled platform (wheel
/// radius and axle length) and converts between chassis velocity commands and
/// per-wheel angular velocities.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DifferentialDrive {
    /// Wheel radius (m).
    wheel_radius: f64,
    /// Axle length, i.e. wheel separation (m).
    axle_length: f64,
}

impl DifferentialDrive {
    /// Construct a new differential-drive kinematics helper.
    ///
    /// # Errors
    ///
    /// Returns `Err(KinematicsError::InvalidWheelRadius)` if `wheel_radius` is
    /// not positive, `Err(KinematicsError::InvalidAxleLength)` if
    /// `axle_length` is not positive. Both are configuration errors and are
    /// meant to abort startup, not a tick.
    pub const fn new(wheel_radius: f64, axle_length: f64) -> Result<Self, KinematicsError> {
        if wheel_radius <= 0.0 {
            return Err(KinematicsError::InvalidWheelRadius("must be positive"));
        }
        if axle_length <= 0.0 {
            return Err(KinematicsError::InvalidAxleLength("must be positive"));
        }
        Ok(DifferentialDrive {
            wheel_radius,
            axle_length,
        })
    }

    /// Returns the wheel radius.
    pub fn wheel_radius(&self) -> f64 {
        self.wheel_radius
    }

    /// Returns the axle length.
    pub fn axle_length(&self) -> f64 {
        self.axle_length
    }

    /// Chassis velocities resulting from the given wheel speeds
    /// (forward kinematics).
    pub fn forward_kinematics(&self, wheel_speeds: WheelSpeeds) -> Twist {
        let v_l = wheel_speeds.omega_l * self.wheel_radius;
        let v_r = wheel_speeds.omega_r * self.wheel_radius;

        let v = (v_r + v_l) / 2.0;
        let w = (v_r - v_l) / self.axle_length;

        Twist::new(v, w)
    }

    /// Wheel speeds required to realize the given chassis velocities
    /// (inverse kinematics):
    ///
    /// `ωR = (2v + wL) / (2R)`, `ωL = (2v - wL) / (2R)`
    ///
    /// with `L` the axle length and `R` the wheel radius.
    pub fn inverse_kinematics(&self, twist: Twist) -> WheelSpeeds {
        let omega_r = (2.0 * twist.v + twist.w * self.axle_length) / (2.0 * self.wheel_radius);
        let omega_l = (2.0 * twist.v - twist.w * self.axle_length) / (2.0 * self.wheel_radius);

        WheelSpeeds::new(omega_l, omega_r)
    }

    /// Integrate a pose forward by `dt` seconds under constant chassis
    /// velocities. The resulting heading is normalized to `[-PI, PI)`.
    ///
    /// # Errors
    ///
    /// Returns `Err(KinematicsError::NegativeTimeDelta)` if `dt` is negative.
    pub fn update_pose(
        &self,
        current_pose: Pose,
        twist: Twist,
        dt: f64,
    ) -> Result<Pose, KinematicsError> {
        if dt < 0.0 {
            return Err(KinematicsError::NegativeTimeDelta("must be non-negative"));
        }

        let delta_x = twist.v * cos(current_pose.theta) * dt;
        let delta_y = twist.v * sin(current_pose.theta) * dt;
        let delta_theta = twist.w * dt;

        Ok(Pose {
            x: current_pose.x + delta_x,
            y: current_pose.y + delta_y,
            theta: Pose::normalize_angle(current_pose.theta + delta_theta),
        })
    }

    /// Convenience function to update a pose directly from wheel speeds.
    ///
    /// # Errors
    ///
    /// Returns `Err(KinematicsError::NegativeTimeDelta)` if `dt` is negative
    /// (propagated from [`DifferentialDrive::update_pose`]).
    pub fn update_pose_from_wheel_speeds(
        &self,
        current_pose: Pose,
        wheel_speeds: WheelSpeeds,
        dt: f64,
    ) -> Result<Pose, KinematicsError> {
        let twist = self.forward_kinematics(wheel_speeds);
        self.update_pose(current_pose, twist, dt)
    }
}

impl fmt::Display for DifferentialDrive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DifferentialDrive (r: {:.2} m, L: {:.2} m)", self.wheel_radius, self.axle_length)
    }
}
