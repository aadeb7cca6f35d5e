use anyhow::Context;
use clap::Parser;
use log::info;

use lane_dodge::simulation::{Direction, SimConfig, SimWorld};

/// Gap in pixels under which the autopilot looks for a better lane
const AUTOPILOT_LOOKAHEAD: f32 = 260.0;

#[derive(Parser)]
#[command(name = "lane_dodge")]
#[command(about = "Headless lane dodge traffic simulation")]
struct Cli {
    /// Number of simulation ticks to run
    #[arg(long, default_value = "1000")]
    ticks: u32,

    /// Time delta per tick in seconds
    #[arg(long, default_value = "0.016")]
    delta: f32,

    /// Seed for reproducible traffic
    #[arg(long)]
    seed: Option<u64>,

    /// Number of lanes
    #[arg(long, default_value = "3")]
    lanes: usize,

    /// Rows per generated board
    #[arg(long, default_value = "3")]
    rows: usize,

    /// Occupied cells per generated board
    #[arg(long, default_value = "3")]
    density: usize,

    /// Steer away from traffic automatically
    #[arg(long)]
    autopilot: bool,

    /// Print the road map once per simulated second
    #[arg(long)]
    map: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("warn,lane_dodge=info"),
    )
    .init();

    let cli = Cli::parse();
    run_headless(&cli)
}

/// Run the game in headless mode (no graphics)
fn run_headless(cli: &Cli) -> anyhow::Result<()> {
    let config = SimConfig {
        num_lanes: cli.lanes,
        rows_per_batch: cli.rows,
        density_per_batch: cli.density,
        seed: cli.seed,
        ..SimConfig::default()
    };
    let mut world = SimWorld::new(config).context("Invalid game configuration")?;

    println!("Running lane dodge in headless mode...");
    println!(
        "Ticks: {}, Delta: {}s, Autopilot: {}",
        cli.ticks, cli.delta, cli.autopilot
    );
    println!();

    // Calculate how many ticks equal 1 second of simulation time
    let ticks_per_second = (1.0 / cli.delta).ceil().max(1.0) as u32;

    let mut now_ms = 0.0;
    world.frame(now_ms);

    let mut tick = 0;
    'run: while tick < cli.ticks {
        let ticks_to_run = ticks_per_second.min(cli.ticks - tick);

        for _ in 0..ticks_to_run {
            tick += 1;
            if cli.autopilot {
                steer(&mut world);
            }
            now_ms += cli.delta as f64 * 1000.0;
            if world.frame(now_ms).is_none() {
                break 'run;
            }
        }

        println!(
            "--- After tick {} ({:.1}s simulated time) ---",
            tick,
            world.clock.elapsed_secs()
        );
        world.print_summary();
        if cli.map {
            world.draw_map();
        }
    }

    println!("=== Final State ===");
    world.print_summary();
    world.draw_map();

    let stats = &world.stats;
    info!("=== SIMULATION COMPLETE ===");
    info!("Elapsed time: {:.2}s", world.clock.elapsed_secs());
    info!("Final score: {}", world.current_score());
    info!("Batches generated: {}", stats.batches_generated);
    info!("Boards rejected: {}", stats.boards_rejected);
    info!("Cells normalized: {}", stats.cells_normalized);
    info!("Entities spawned: {}", stats.entities_spawned);
    info!("Entities passed: {}", stats.entities_passed);
    info!("Collisions: {}", stats.collisions);
    info!("Lives remaining: {}", world.lives_remaining());
    info!("Game over: {}", world.is_game_over());
    info!("Dodge rate: {:.1}%", stats.dodge_rate());

    Ok(())
}

/// Free road ahead of the player in `lane`, in pixels
fn clearance(world: &SimWorld, lane: usize) -> f32 {
    let player_bounds = world.player.bounds(&world.geometry);
    match world.pool.nearest_ahead(lane, player_bounds.bottom()) {
        Some(entity) => player_bounds.y - entity.bounds(world.geometry.scale).bottom(),
        None => f32::INFINITY,
    }
}

/// Move to the neighbouring lane with the most room when the current one closes up
fn steer(world: &mut SimWorld) {
    if world.player.is_turning {
        return;
    }

    let lane = world.player.lane_index;
    let current = clearance(world, lane);
    if current > AUTOPILOT_LOOKAHEAD {
        return;
    }

    let best = [Direction::Left, Direction::Right]
        .into_iter()
        .filter_map(|direction| {
            direction
                .step(lane, world.config.num_lanes)
                .map(|target| (direction, clearance(world, target)))
        })
        .filter(|(_, room)| *room > current)
        .max_by(|a, b| a.1.total_cmp(&b.1));

    if let Some((direction, _)) = best {
        world.request_lane_change(direction);
    }
}
