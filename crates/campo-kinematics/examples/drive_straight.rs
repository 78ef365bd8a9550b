use campo_kinematics::*;

fn main() {
    let wheel_radius = 0.035;
    let axle_length = 0.23;

    let mut current_pose = Pose::new(0.0, 0.0, 0.0);
    let wheel_speeds = WheelSpeeds::new(4.0, 4.0); // both wheels 4 rad/s
    let dt = 0.1; // time step in seconds
    let num_steps = 10;

    match DifferentialDrive::new(wheel_radius, axle_length) {
        Ok(drive) => {
            println!("Differential drive: {}", drive);
            println!("Commanded wheel speeds: {}", wheel_speeds);
            println!("Chassis twist: {}", drive.forward_kinematics(wheel_speeds));
            println!();

            for i in 0..num_steps {
                match drive.update_pose_from_wheel_speeds(current_pose, wheel_speeds, dt) {
                    Ok(new_pose) => {
                        current_pose = new_pose;
                        println!("Step {:>2}: Pose: {}", i + 1, current_pose);
                    }
                    Err(e) => {
                        eprintln!("Error during simulation step {}: {:?}", i + 1, e);
                        break;
                    }
                }
            }

            println!("\nFinal Pose: {}", current_pose);
        }
        Err(e) => {
            eprintln!("Failed to initialize kinematics: {:?}", e);
            eprintln!(
                "Please ensure wheel_radius ({}) and axle_length ({}) are positive.",
                wheel_radius, axle_length
            );
        }
    }
}
