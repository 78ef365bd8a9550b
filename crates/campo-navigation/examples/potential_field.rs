use campo_kinematics::{DifferentialDrive, Pose};
use campo_navigation::map::WorldPoint;
use campo_navigation::potential::{ControllerGains, PotentialFieldController, SensorReading};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Drives a simulated robot toward a goal past a single obstacle, printing
/// the pose at every step.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let gains = ControllerGains {
        k_att: 4.0,
        k_rep: 0.0005,
        k_lin: 0.07,
        k_ang: 0.15,
        max_v: 0.2,
        max_w: 45f64.to_radians(),
        sensing_range: 1.4,
    };
    let drive = DifferentialDrive::new(0.035, 0.23)?;
    let controller = PotentialFieldController::new(gains, drive);

    let goal = WorldPoint::new(3.0, 0.0);
    let obstacle = WorldPoint::new(1.5, 0.15);
    let mut pose = Pose::new(0.0, 0.0, 0.0);
    let dt = 0.1;

    info!(?goal, ?obstacle, "starting potential-field walk");
    for step in 0..400 {
        let position = WorldPoint::new(pose.x, pose.y);
        let dx = obstacle.x - pose.x;
        let dy = obstacle.y - pose.y;
        let distance = (dx * dx + dy * dy).sqrt();
        let angle = dy.atan2(dx) - pose.theta;
        let readings = [SensorReading::new(angle, distance)];

        let wheels = controller.step(position, pose.theta, goal, &readings, &[obstacle]);
        pose = drive.update_pose_from_wheel_speeds(pose, wheels, dt)?;

        if step % 20 == 0 {
            println!("step {:>3}: {}", step, pose);
        }

        let remaining = ((goal.x - pose.x).powi(2) + (goal.y - pose.y).powi(2)).sqrt();
        if remaining < 0.05 {
            println!("\nGoal reached after {} steps: {}", step, pose);
            return Ok(());
        }
    }

    println!("\nStopped before reaching the goal: {}", pose);
    Ok(())
}
