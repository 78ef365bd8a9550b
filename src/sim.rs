//! In-process simulated world standing in for the sensing and actuation
//! collaborators: a scan source that casts beams against circular obstacles,
//! and a drive thread that integrates commanded wheel speeds into the true
//! pose.

use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use spin_sleep::SpinSleeper;
use tokio::sync::broadcast;
use tracing::{info, warn};

use campo_kinematics::{DifferentialDrive, Pose, WheelSpeeds};
use campo_navigation::scan::{LaserScan, ScanSource};

use crate::blackboard::{Blackboard, snapshot, touch_cmd};
use crate::bus::Topic;

/// A circular obstacle in the world (meters).
#[derive(Debug, Clone, Copy)]
pub struct Obstacle {
    pub x: f64,
    pub y: f64,
    pub radius: f64,
}

/// Simulated laser scanner reading the true pose off the blackboard.
pub struct SimScanSource {
    bb: Blackboard,
    obstacles: Arc<Vec<Obstacle>>,
    beam_count: usize,
    fov: f64,
    max_range: f64,
    warmup: u32,
}

impl SimScanSource {
    pub fn new(
        bb: Blackboard,
        obstacles: Arc<Vec<Obstacle>>,
        beam_count: usize,
        fov: f64,
        max_range: f64,
    ) -> Self {
        Self {
            bb,
            obstacles,
            beam_count,
            fov,
            max_range,
            // The driver needs a few polls before the range and angle
            // streams are in sync.
            warmup: 3,
        }
    }
}

impl ScanSource for SimScanSource {
    fn poll(&mut self) -> Option<LaserScan> {
        if self.warmup > 0 {
            self.warmup -= 1;
            return None;
        }

        let pose = snapshot(&self.bb).pose;
        let mut rng = rand::rng();
        let mut ranges = Vec::with_capacity(self.beam_count);
        let mut angles = Vec::with_capacity(self.beam_count);
        for i in 0..self.beam_count {
            let beam =
                -self.fov / 2.0 + self.fov * i as f64 / self.beam_count.saturating_sub(1).max(1) as f64;
            let world_angle = pose.theta + beam;

            let mut hit = self.max_range;
            for obstacle in self.obstacles.iter() {
                if let Some(t) = ray_circle(pose.x, pose.y, world_angle, obstacle) {
                    if t < hit {
                        hit = t;
                    }
                }
            }

            let noisy = (hit + rng.random_range(-0.005..0.005)).max(0.0);
            ranges.push(noisy);
            angles.push(beam);
        }

        LaserScan::new(ranges, angles).ok()
    }
}

/// Distance along the ray from `(ox, oy)` at `angle` to the first
/// intersection with the obstacle circle, if any.
fn ray_circle(ox: f64, oy: f64, angle: f64, obstacle: &Obstacle) -> Option<f64> {
    let dx = angle.cos();
    let dy = angle.sin();
    let fx = ox - obstacle.x;
    let fy = oy - obstacle.y;

    // |f + t*d|^2 = r^2 with |d| = 1.
    let b = 2.0 * (fx * dx + fy * dy);
    let c = fx * fx + fy * fy - obstacle.radius * obstacle.radius;
    let discriminant = b * b - 4.0 * c;
    if discriminant < 0.0 {
        return None;
    }

    let sqrt_disc = discriminant.sqrt();
    let t_near = (-b - sqrt_disc) / 2.0;
    let t_far = (-b + sqrt_disc) / 2.0;
    if t_near >= 0.0 {
        Some(t_near)
    } else if t_far >= 0.0 {
        Some(t_far)
    } else {
        None
    }
}

/// Spawns the actuation thread: applies the latest wheel command through
/// forward kinematics at a fixed cadence and publishes the resulting pose.
pub fn spawn_drive_thread(
    bb: Blackboard,
    drive: DifferentialDrive,
    pose_topic: Topic<Pose>,
    mut wheel_rx: broadcast::Receiver<Arc<WheelSpeeds>>,
) -> anyhow::Result<()> {
    std::thread::Builder::new().name("drive".into()).spawn(move || {
        info!("Drive thread started.");
        let sleeper = SpinSleeper::new(10_000);
        let dt = 0.01;
        let mut applied = WheelSpeeds::default();
        loop {
            if let Ok(cmd) = wheel_rx.try_recv() {
                applied = *cmd;
                touch_cmd(&bb);
            }

            let current = snapshot(&bb).pose;
            match drive.update_pose_from_wheel_speeds(current, applied, dt) {
                Ok(pose) => {
                    {
                        let mut g = bb.write();
                        g.pose = pose;
                        g.wheels = applied;
                    }
                    pose_topic.publish(pose);
                }
                Err(e) => warn!("Pose integration failed: {}", e),
            }

            sleeper.sleep(Duration::from_micros(10_000));
        }
    })?;
    Ok(())
}
