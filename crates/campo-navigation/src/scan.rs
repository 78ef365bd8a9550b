#![warn(missing_docs)]

//! Sensing collaborator boundary: scan data, beam projection, the frame
//! transform seam, and the bounded retry policy for acquiring a
//! synchronized scan.

use std::time::Duration;

use campo_kinematics::Pose;
use tracing::debug;

use crate::error::NavigationError;
use crate::map::WorldPoint;
use crate::potential::SensorReading;

/// One laser scan: beam-index aligned range and angle sequences.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LaserScan {
    ranges: Vec<f64>,
    angles: Vec<f64>,
}

impl LaserScan {
    /// Creates a scan from paired sequences.
    ///
    /// # Errors
    ///
    /// Returns `Err(NavigationError::MismatchedScan)` when the sequences
    /// differ in length; beam alignment is meaningless otherwise.
    pub fn new(ranges: Vec<f64>, angles: Vec<f64>) -> Result<Self, NavigationError> {
        if ranges.len() != angles.len() {
            return Err(NavigationError::MismatchedScan(
                "range and angle sequences differ in length",
            ));
        }
        Ok(Self { ranges, angles })
    }

    /// Number of beams.
    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    /// Whether the scan has no beams.
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// The beams as (angle, distance) readings, in beam-index order.
    pub fn readings(&self) -> Vec<SensorReading> {
        self.angles
            .iter()
            .zip(&self.ranges)
            .map(|(&angle, &distance)| SensorReading::new(angle, distance))
            .collect()
    }

    /// Beam endpoints in the sensor frame: each measured range projected
    /// along its beam angle.
    pub fn project_local(&self) -> Vec<WorldPoint> {
        self.angles
            .iter()
            .zip(&self.ranges)
            .map(|(&angle, &distance)| {
                WorldPoint::new(distance * angle.cos(), distance * angle.sin())
            })
            .collect()
    }

    /// Beam endpoints in the sensor frame with every beam projected at a
    /// fixed range, regardless of the measured distance. Useful for sweeping
    /// the fully observable region (free-space evidence).
    pub fn project_local_at_range(&self, range: f64) -> Vec<WorldPoint> {
        self.angles
            .iter()
            .map(|&angle| WorldPoint::new(range * angle.cos(), range * angle.sin()))
            .collect()
    }
}

/// Narrow seam for re-expressing sensor-frame points in the global frame.
///
/// The controller and rasterizer never depend on how transforms are
/// computed; collaborators supply an implementation.
pub trait FrameTransform {
    /// Maps a point from the local (sensor) frame to the global frame.
    fn to_global(&self, p: WorldPoint) -> WorldPoint;
}

/// A planar rigid transform (rotation + translation), typically built from
/// the sensor's pose in the global frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlanarTransform {
    cos_theta: f64,
    sin_theta: f64,
    tx: f64,
    ty: f64,
}

impl PlanarTransform {
    /// Transform with the given translation and rotation angle.
    pub fn new(tx: f64, ty: f64, theta: f64) -> Self {
        Self {
            cos_theta: theta.cos(),
            sin_theta: theta.sin(),
            tx,
            ty,
        }
    }

    /// Transform placing the local frame at `pose` in the global frame.
    pub fn from_pose(pose: &Pose) -> Self {
        Self::new(pose.x, pose.y, pose.theta)
    }
}

impl FrameTransform for PlanarTransform {
    fn to_global(&self, p: WorldPoint) -> WorldPoint {
        WorldPoint::new(
            self.cos_theta * p.x - self.sin_theta * p.y + self.tx,
            self.sin_theta * p.x + self.cos_theta * p.y + self.ty,
        )
    }
}

/// Source of synchronized scans.
///
/// `poll` returns `None` while no time-matched range/angle pair is
/// available yet; callers retry via [`acquire_scan`].
pub trait ScanSource {
    /// The latest synchronized scan, if one exists.
    fn poll(&mut self) -> Option<LaserScan>;
}

/// Bounded retry/backoff acquisition of a synchronized scan.
///
/// Polls the source up to `attempts` times, sleeping `backoff` between
/// polls. `None` after the budget is exhausted means "do not command an
/// update this tick" for the caller, never an error.
pub async fn acquire_scan<S: ScanSource>(
    source: &mut S,
    attempts: u32,
    backoff: Duration,
) -> Option<LaserScan> {
    for attempt in 0..attempts {
        if let Some(scan) = source.poll() {
            return Some(scan);
        }
        debug!(attempt, "no synchronized scan yet");
        if attempt + 1 < attempts {
            tokio::time::sleep(backoff).await;
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::f64::consts::{FRAC_PI_2, PI};

    const EPSILON: f64 = 1e-9;

    #[test]
    fn test_mismatched_scan_rejected() {
        let result = LaserScan::new(vec![1.0, 2.0], vec![0.0]);
        assert!(matches!(result, Err(NavigationError::MismatchedScan(_))));
    }

    #[test]
    fn test_readings_keep_beam_order() {
        let scan = LaserScan::new(vec![1.0, 2.0], vec![-0.5, 0.5]).unwrap();
        let readings = scan.readings();
        assert_eq!(readings.len(), 2);
        assert_eq!(readings[0], SensorReading::new(-0.5, 1.0));
        assert_eq!(readings[1], SensorReading::new(0.5, 2.0));
    }

    #[test]
    fn test_projection_polar_to_planar() {
        let scan = LaserScan::new(vec![2.0, 1.0], vec![0.0, FRAC_PI_2]).unwrap();
        let points = scan.project_local();
        assert!((points[0].x - 2.0).abs() < EPSILON);
        assert!((points[0].y - 0.0).abs() < EPSILON);
        assert!((points[1].x - 0.0).abs() < EPSILON);
        assert!((points[1].y - 1.0).abs() < EPSILON);
    }

    #[test]
    fn test_projection_at_fixed_range_ignores_distances() {
        let scan = LaserScan::new(vec![0.3, 7.0], vec![0.0, PI]).unwrap();
        let points = scan.project_local_at_range(2.0);
        assert!((points[0].x - 2.0).abs() < EPSILON);
        assert!((points[1].x - (-2.0)).abs() < EPSILON);
    }

    #[test]
    fn test_planar_transform_identity() {
        let tf = PlanarTransform::from_pose(&Pose::default());
        let p = WorldPoint::new(1.5, -0.5);
        let q = tf.to_global(p);
        assert!((q.x - p.x).abs() < EPSILON);
        assert!((q.y - p.y).abs() < EPSILON);
    }

    #[test]
    fn test_planar_transform_rotates_then_translates() {
        // Sensor at (1, 2) facing +y: local +x maps to global +y.
        let tf = PlanarTransform::new(1.0, 2.0, FRAC_PI_2);
        let q = tf.to_global(WorldPoint::new(3.0, 0.0));
        assert!((q.x - 1.0).abs() < EPSILON);
        assert!((q.y - 5.0).abs() < EPSILON);
    }

    struct FlakySource {
        misses: u32,
    }

    impl ScanSource for FlakySource {
        fn poll(&mut self) -> Option<LaserScan> {
            if self.misses > 0 {
                self.misses -= 1;
                return None;
            }
            Some(LaserScan::new(vec![1.0], vec![0.0]).unwrap())
        }
    }

    #[tokio::test]
    async fn test_acquire_scan_retries_until_valid() {
        let mut source = FlakySource { misses: 2 };
        let scan = acquire_scan(&mut source, 5, Duration::from_millis(1)).await;
        assert!(scan.is_some());
    }

    #[tokio::test]
    async fn test_acquire_scan_gives_up_after_budget() {
        let mut source = FlakySource { misses: 10 };
        let scan = acquire_scan(&mut source, 3, Duration::from_millis(1)).await;
        assert!(scan.is_none());
    }
}
