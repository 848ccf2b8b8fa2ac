//! Headless drone show host
//!
//! Runs the full show without a renderer: launches the formation, drives
//! the central loop (collision sweep plus completion clock) and lands
//! everything once the formation has held the sphere long enough.
//!
//! ```text
//! RUST_LOG=info cargo run --bin show-sim
//! cargo run --bin show-sim -- --config show.json --snapshot-every 200
//! ```

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};
use serde::de::DeserializeOwned;

use drone_show_core::{FormationConfig, ShowConfig, Swarm};

#[derive(Parser, Debug)]
#[command(name = "show-sim", about = "Run the drone light show without a renderer")]
struct Args {
    /// JSON show configuration; stock parameters when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// JSON launch formation; the stock 3x5 grid when omitted
    #[arg(short, long)]
    formation: Option<PathBuf>,

    /// Wall-clock limit in seconds (0 = fly until the show completes)
    #[arg(long, default_value_t = 0.0)]
    max_seconds: f32,

    /// Print a JSON snapshot to stdout every N passes (0 = never)
    #[arg(long, default_value_t = 0)]
    snapshot_every: u64,
}

fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("parsing {}", path.display()))
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config: ShowConfig = match &args.config {
        Some(path) => load_json(path)?,
        None => ShowConfig::default(),
    };
    let formation: FormationConfig = match &args.formation {
        Some(path) => load_json(path)?,
        None => FormationConfig::default(),
    };

    let mut swarm = Swarm::new(config, formation.unit_count());
    swarm.spawn_formation(&formation)?;

    let pass_interval = swarm.config().pass_interval();
    let started = Instant::now();
    let mut passes: u64 = 0;
    let mut collisions: usize = 0;

    loop {
        thread::sleep(pass_interval);
        collisions += swarm.run_collision_pass().len();
        passes += 1;

        if passes % 400 == 0 {
            let snapshot = swarm.snapshot();
            let reached = snapshot.units.iter().filter(|u| u.reached_rally).count();
            info!(
                "{reached}/{} drones on the rally sphere, {collisions} collisions so far",
                snapshot.units.len()
            );
        }
        if args.snapshot_every > 0 && passes % args.snapshot_every == 0 {
            println!("{}", swarm.snapshot().to_json()?);
        }

        if swarm.check_completion() {
            info!(
                "show complete after {:.1}s, {passes} passes, {collisions} collisions",
                started.elapsed().as_secs_f32()
            );
            break;
        }
        if args.max_seconds > 0.0 && started.elapsed().as_secs_f32() >= args.max_seconds {
            warn!("wall clock limit reached before show completion");
            break;
        }
    }

    swarm.request_stop();
    swarm.join_all()?;
    info!("all drones landed");
    Ok(())
}
