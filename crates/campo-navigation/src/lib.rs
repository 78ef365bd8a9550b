//! Reactive navigation for a differential-drive robot: potential-field
//! steering toward a goal and per-tick perceptual-field construction from
//! laser scans.

pub mod error;
pub mod map;
pub mod potential;
pub mod scan;

use std::{sync::Arc, time::Duration};

use tokio::sync::broadcast;
use tokio::time;
use tracing::{debug, info, warn};

use campo_kinematics::{Pose, WheelSpeeds};

use crate::map::{Grid, PerceptualField, WorldPoint, perceptual_field};
use crate::potential::PotentialFieldController;
use crate::scan::{FrameTransform, PlanarTransform, ScanSource, acquire_scan};

/// Retry budget for acquiring a synchronized scan within one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScanPolicy {
    /// Maximum number of polls per tick.
    pub attempts: u32,
    /// Sleep between polls.
    pub backoff: Duration,
}

impl Default for ScanPolicy {
    fn default() -> Self {
        ScanPolicy {
            attempts: 5,
            backoff: Duration::from_millis(10),
        }
    }
}

/// Control task: per tick, turn the freshest pose and scan into a wheel
/// command and a perceptual field.
///
/// Each tick acquires a synchronized scan (bounded retry per `policy`),
/// re-expresses the beam endpoints in the global frame, runs the
/// potential-field controller, and publishes the resulting `WheelSpeeds`;
/// independently the rasterized perceptual field is published for a mapping
/// consumer. A tick without a valid scan commands nothing.
///
/// # Arguments
/// * `initial_pose` - Pose assumed until the first broadcast update arrives.
/// * `goal` - Goal position in the global frame.
/// * `controller` - Configured potential-field controller.
/// * `grid` - Grid for perceptual-field rasterization.
/// * `scans` - Sensing collaborator.
/// * `policy` - Scan acquisition retry budget.
/// * `tick` - Control period.
/// * `pose_rx` - Broadcast receiver for `Arc<Pose>` updates.
/// * `wheel_tx` - Broadcast sender for computed `Arc<WheelSpeeds>` commands.
/// * `field_tx` - Broadcast sender for per-tick `Arc<PerceptualField>` sets.
#[allow(clippy::too_many_arguments)]
pub async fn run_control_task<S: ScanSource + Send>(
    initial_pose: Pose,
    goal: WorldPoint,
    controller: PotentialFieldController,
    grid: Grid,
    mut scans: S,
    policy: ScanPolicy,
    tick: Duration,
    pose_rx: &mut broadcast::Receiver<Arc<Pose>>,
    wheel_tx: broadcast::Sender<Arc<WheelSpeeds>>,
    field_tx: broadcast::Sender<Arc<PerceptualField>>,
) -> anyhow::Result<()> {
    info!(?goal, "Control task started.");
    let mut ticker = time::interval(tick);
    let mut current_pose_arc: Arc<Pose> = Arc::new(initial_pose);
    info!(initial_pose = ?current_pose_arc, "Control task initialized with pose");

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let Some(scan) = acquire_scan(&mut scans, policy.attempts, policy.backoff).await else {
                    warn!("No synchronized scan this tick; holding previous command.");
                    continue;
                };

                let pose = *current_pose_arc;
                let position = WorldPoint::new(pose.x, pose.y);

                // Beam endpoints, re-expressed in the global frame.
                let transform = PlanarTransform::from_pose(&pose);
                let endpoints: Vec<WorldPoint> = scan
                    .project_local()
                    .into_iter()
                    .map(|p| transform.to_global(p))
                    .collect();
                let readings = scan.readings();

                let wheels = controller.step(position, pose.theta, goal, &readings, &endpoints);
                debug!(
                    omega_l = wheels.omega_l,
                    omega_r = wheels.omega_r,
                    x = pose.x,
                    y = pose.y,
                    theta = pose.theta,
                    "Computed wheel command"
                );
                if wheel_tx.receiver_count() > 0 {
                    if let Err(e) = wheel_tx.send(Arc::new(wheels)) {
                        warn!("Failed to publish wheel command: {}", e);
                    }
                }

                let field = perceptual_field(&grid, position, &endpoints);
                debug!(cells = field.len(), "Rasterized perceptual field");
                if field_tx.receiver_count() > 0 {
                    if let Err(e) = field_tx.send(Arc::new(field)) {
                        warn!("Failed to publish perceptual field: {}", e);
                    }
                }
            }
            result = pose_rx.recv() => {
                match result {
                    Ok(new_pose_arc) => {
                        current_pose_arc = new_pose_arc;
                        debug!(new_pose = ?current_pose_arc, "New pose received in control task");
                    }
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        warn!("Pose receiver lagged by {} messages in control task.", n);
                        continue;
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        tracing::error!("Pose channel closed. Control task cannot continue.");
                        return Err(anyhow::anyhow!("Pose channel closed for control task"));
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::potential::ControllerGains;
    use crate::scan::LaserScan;
    use campo_kinematics::DifferentialDrive;

    struct FixedScans;

    impl ScanSource for FixedScans {
        fn poll(&mut self) -> Option<LaserScan> {
            Some(LaserScan::new(vec![1.4, 1.4, 1.4], vec![-0.5, 0.0, 0.5]).unwrap())
        }
    }

    struct NeverReady;

    impl ScanSource for NeverReady {
        fn poll(&mut self) -> Option<LaserScan> {
            None
        }
    }

    fn controller() -> PotentialFieldController {
        let gains = ControllerGains {
            k_att: 4.0,
            k_rep: 0.0005,
            k_lin: 0.07,
            k_ang: 0.15,
            max_v: 0.2,
            max_w: 0.8,
            sensing_range: 1.4,
        };
        PotentialFieldController::new(gains, DifferentialDrive::new(0.035, 0.23).unwrap())
    }

    #[tokio::test]
    async fn test_task_publishes_command_and_field() {
        let (pose_tx, mut pose_rx) = broadcast::channel::<Arc<Pose>>(4);
        let (wheel_tx, mut wheel_rx) = broadcast::channel::<Arc<WheelSpeeds>>(4);
        let (field_tx, mut field_rx) = broadcast::channel::<Arc<PerceptualField>>(4);
        let grid = Grid::new(32, 0.1, true).unwrap();

        let task = run_control_task(
            Pose::default(),
            WorldPoint::new(2.0, 0.0),
            controller(),
            grid,
            FixedScans,
            ScanPolicy::default(),
            Duration::from_millis(5),
            &mut pose_rx,
            wheel_tx,
            field_tx,
        );

        let received = async {
            let wheels = wheel_rx.recv().await.unwrap();
            assert!(wheels.omega_l.is_finite() && wheels.omega_r.is_finite());
            let field = field_rx.recv().await.unwrap();
            assert!(!field.is_empty());
        };

        tokio::select! {
            _ = task => panic!("control task ended unexpectedly"),
            _ = received => {}
        }
        drop(pose_tx);
    }

    #[tokio::test]
    async fn test_task_skips_tick_without_scan() {
        let (_pose_tx, mut pose_rx) = broadcast::channel::<Arc<Pose>>(4);
        let (wheel_tx, mut wheel_rx) = broadcast::channel::<Arc<WheelSpeeds>>(4);
        // Keep a sender alive so an empty channel reads as `Empty`, not
        // `Closed`, after the task future (owning `wheel_tx`) is dropped.
        let _wheel_tx = wheel_tx.clone();
        let (field_tx, _field_rx) = broadcast::channel::<Arc<PerceptualField>>(4);
        let grid = Grid::new(32, 0.1, true).unwrap();

        let policy = ScanPolicy {
            attempts: 1,
            backoff: Duration::from_millis(1),
        };
        let task = run_control_task(
            Pose::default(),
            WorldPoint::new(2.0, 0.0),
            controller(),
            grid,
            NeverReady,
            policy,
            Duration::from_millis(5),
            &mut pose_rx,
            wheel_tx,
            field_tx,
        );

        tokio::select! {
            _ = task => panic!("control task ended unexpectedly"),
            _ = tokio::time::sleep(Duration::from_millis(40)) => {}
        }
        // No command may have been issued for scanless ticks.
        assert!(matches!(
            wheel_rx.try_recv(),
            Err(broadcast::error::TryRecvError::Empty)
        ));
    }
}
