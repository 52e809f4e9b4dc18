use image::{Rgb, RgbImage};
use raceline_navigation::astar::astar_search_windowed;
use raceline_navigation::{TrackConfig, TrackContext, WorldPoint};
use std::collections::HashSet;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Synthesize a small track: dark ring road on a light background
    let mut image = RgbImage::from_pixel(160, 160, Rgb([240, 240, 240]));
    for y in 0..160u32 {
        for x in 0..160u32 {
            let dx = x as f32 - 80.0;
            let dy = y as f32 - 80.0;
            let r = (dx * dx + dy * dy).sqrt();
            if (40.0..70.0).contains(&r) {
                image.put_pixel(x, y, Rgb([60, 60, 60]));
            }
        }
    }

    let context = TrackContext::new(&image, TrackConfig::default())?;
    let grid = context.grid();
    println!(
        "grid: {}x{} cells, {} walkable, {} checkpoints",
        grid.rows(),
        grid.cols(),
        grid.walkable_count(),
        context.checkpoints().len()
    );

    // Replan from one side of the ring to the other
    let start = WorldPoint::new(25.0, 80.0);
    let goal = WorldPoint::new(80.0, 25.0);
    let path = astar_search_windowed(grid, start, goal, 160);
    println!("route: {} waypoints", path.len());

    let route: HashSet<(usize, usize)> = path
        .iter()
        .map(|&p| {
            let cell = grid.world_to_cell(p);
            (cell.row, cell.col)
        })
        .collect();

    for row in 0..grid.rows() {
        for col in 0..grid.cols() {
            if route.contains(&(row, col)) {
                print!("* ");
            } else if grid.is_walkable(raceline_navigation::CellCoord::new(row, col)) {
                print!(". ");
            } else {
                print!("  ");
            }
        }
        println!();
    }

    Ok(())
}
