use campo_navigation::map::{Grid, WorldPoint, perceptual_field};
use rand::Rng;

/// Builds the perceptual field of one randomized scan and prints the grid.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    let grid = Grid::new(20, 0.25, true)?;
    let robot = WorldPoint::new(0.0, 0.0);

    // A 180-degree fan of beams with jittered ranges.
    let mut rng = rand::rng();
    let beam_count = 36;
    let endpoints: Vec<WorldPoint> = (0..beam_count)
        .map(|i| {
            let angle = -std::f64::consts::FRAC_PI_2
                + std::f64::consts::PI * (i as f64) / (beam_count - 1) as f64;
            let range = rng.random_range(0.8..2.4);
            WorldPoint::new(range * angle.cos(), range * angle.sin())
        })
        .collect();

    let field = perceptual_field(&grid, robot, &endpoints);
    println!(
        "{} beams swept {} cells on a {}x{} grid:\n",
        beam_count,
        field.len(),
        grid.size(),
        grid.size()
    );

    let robot_cell = grid.cell_of(robot);
    for row in (0..grid.size()).rev() {
        let line: String = (0..grid.size())
            .map(|col| {
                if (col as i32, row as i32) == (robot_cell.x, robot_cell.y) {
                    'R'
                } else if field.contains(&(row, col)) {
                    '#'
                } else {
                    '.'
                }
            })
            .collect();
        println!("{}", line);
    }

    Ok(())
}
