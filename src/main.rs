mod car; // brings `car.rs` in as `crate::car`
mod config; // brings `config.rs` in as `crate::config`

use crate::car::{Car, run_follow_task};
use anyhow::Context as _;
use raceline_navigation::TrackContext;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{self, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let app = config::load_config().context("cannot start without configuration")?;

    // A missing or unreadable track image is fatal: there is nothing to
    // navigate, so abort before answering anything.
    let image = image::open(&app.track.image)
        .with_context(|| format!("failed to load track image {}", app.track.image.display()))?
        .to_rgb8();

    let context = Arc::new(TrackContext::new(&image, app.engine.clone())?);
    let (spawn, checkpoints) = context.spawn_and_checkpoints();
    info!(
        spawn_x = spawn.x,
        spawn_y = spawn.y,
        checkpoints = checkpoints.len(),
        centerline_points = context.centerline().len(),
        "navigation context ready"
    );

    let period = Duration::from_millis(1000 / app.cars.tick_hz.max(1));
    let mut rng = rand::rng();

    let mut handles = Vec::new();
    for id in 0..app.cars.count {
        // the first car starts on the spawn point, the rest scatter
        let start = if id == 0 {
            context.spawn()
        } else {
            context
                .grid()
                .random_walkable_cell(&mut rng)
                .map(|cell| context.grid().cell_to_world(cell))
                .unwrap_or_else(|| context.spawn())
        };
        let car = Car::new(start, app.cars.max_speed);
        handles.push(tokio::spawn(run_follow_task(
            id,
            Arc::clone(&context),
            car,
            app.cars.ticks,
            period,
        )));
    }

    for (id, handle) in handles.into_iter().enumerate() {
        let car = handle.await.context("car task panicked")?;
        info!(
            car = id,
            x = car.x,
            y = car.y,
            checkpoints_reached = car.checkpoints_reached,
            "car finished"
        );
    }

    Ok(())
}
