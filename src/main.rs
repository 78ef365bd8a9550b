mod blackboard;
mod bus;
mod config;
mod sim;

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Context;
use tokio::sync::broadcast;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use campo_kinematics::{DifferentialDrive, Pose, WheelSpeeds};
use campo_navigation::map::{Grid, PerceptualField, WorldPoint};
use campo_navigation::potential::{ControllerGains, PotentialFieldController};
use campo_navigation::{ScanPolicy, run_control_task};

use blackboard::{Blackboard, raise_fault, snapshot};
use bus::Topic;
use sim::{Obstacle, SimScanSource};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    info!("Campo Robotics started. Loading configuration...");
    let settings = config::load_config()?;

    let drive = DifferentialDrive::new(settings.robot.wheel_radius, settings.robot.wheel_separation)
        .context("invalid drive parameters")?;
    let grid = Grid::new(settings.grid.size, settings.grid.cell_size, settings.grid.centered)
        .context("invalid grid parameters")?;
    let gains = ControllerGains {
        k_att: settings.controller.k_att,
        k_rep: settings.controller.k_rep,
        k_lin: settings.controller.k_lin,
        k_ang: settings.controller.k_ang,
        max_v: settings.limits.max_linear_velocity,
        max_w: settings.limits.max_angular_velocity,
        sensing_range: settings.sensor.range,
    };
    let controller = PotentialFieldController::new(gains, drive);

    let bb: Blackboard = Arc::default();
    let pose_topic: Topic<Pose> = Topic::new(16);
    let wheel_topic: Topic<WheelSpeeds> = Topic::new(4);
    let field_topic: Topic<PerceptualField> = Topic::new(4);

    let obstacles = Arc::new(vec![
        Obstacle { x: 1.2, y: 0.6, radius: 0.15 },
        Obstacle { x: 1.9, y: 0.2, radius: 0.20 },
    ]);

    info!("Spawning drive thread...");
    sim::spawn_drive_thread(bb.clone(), drive, pose_topic.clone(), wheel_topic.subscribe())?;

    let scans = SimScanSource::new(
        bb.clone(),
        obstacles,
        settings.sensor.beam_count,
        settings.sensor.fov,
        settings.sensor.range,
    );

    let goal = WorldPoint::new(settings.goal.x, settings.goal.y);
    let mut pose_rx = pose_topic.subscribe();

    tokio::try_join!(
        run_control_task(
            snapshot(&bb).pose,
            goal,
            controller,
            grid,
            scans,
            ScanPolicy::default(),
            Duration::from_millis(50), // 20 Hz
            &mut pose_rx,
            wheel_topic.sender(),
            field_topic.sender(),
        ),
        watchdog(bb.clone(), wheel_topic.clone()),
        mapping_consumer(field_topic.subscribe()),
    )?;
    Ok(())
}

/// Commands a stop when no wheel command has been applied recently.
async fn watchdog(bb: Blackboard, wheel_topic: Topic<WheelSpeeds>) -> anyhow::Result<()> {
    info!("Watchdog task started.");
    let mut tick = tokio::time::interval(Duration::from_millis(25));
    loop {
        tick.tick().await;
        let state = snapshot(&bb);
        let age = Instant::now() - state.last_cmd_ts;
        if age > Duration::from_millis(250) {
            warn!(?age, applied = %state.wheels, "Wheel command timeout! Commanding stop.");
            wheel_topic.publish(WheelSpeeds::default());
            raise_fault(&bb, "wheel command timeout");
        }
    }
}

/// Stand-in for the external mapping consumer: merges per-tick occupancy
/// evidence and reports coverage. Persistent map fusion is out of scope for
/// the reactive core.
async fn mapping_consumer(
    mut field_rx: broadcast::Receiver<Arc<PerceptualField>>,
) -> anyhow::Result<()> {
    info!("Mapping consumer started.");
    let mut merged = PerceptualField::new();
    let mut ticks: u64 = 0;
    loop {
        match field_rx.recv().await {
            Ok(field) => {
                merged.extend(field.iter().copied());
                ticks += 1;
                if ticks % 100 == 0 {
                    info!(ticks, cells = merged.len(), "Occupancy evidence merged");
                }
            }
            Err(broadcast::error::RecvError::Lagged(n)) => {
                warn!("Field receiver lagged by {} messages.", n);
            }
            Err(broadcast::error::RecvError::Closed) => return Ok(()),
        }
    }
}
