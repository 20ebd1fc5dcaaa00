//! Headless soak runner (default binary).
//!
//! Plays the simulator with the autoplay driver for a fixed number of frames
//! and prints a summary, or the final snapshot as JSON with `--json`.
//! Logging goes to stderr and is filtered through `RUST_LOG`.

use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use tetris_sim::autoplay::Autoplay;
use tetris_sim::core::Simulator;
use tetris_sim::soak::{load_config, log_filter, parse_soak_args, run_soak, USAGE};
use tetris_sim::types::VISIBLE_HEIGHT;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(std::env::var(EnvFilter::DEFAULT_ENV).ok().as_deref()))
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let opts = parse_soak_args(&args)?;
    if opts.help {
        println!("{}", USAGE);
        return Ok(());
    }

    let config = load_config(&opts)?;
    info!(
        seed = opts.seed,
        frames = opts.frames,
        das = config.das,
        arr = config.arr,
        are = config.are,
        "starting soak"
    );

    let mut sim = Simulator::with_config(opts.seed, config);
    let mut autoplay = Autoplay::new().with_hold(opts.hold);
    let report = run_soak(&mut sim, &mut autoplay, opts.frames);

    let snapshot = sim.snapshot();
    if opts.json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
        return Ok(());
    }

    for line in report.summary_lines() {
        println!("{}", line);
    }
    println!(
        "EPISODE {} SCORE {} LEVEL {} LINES {}",
        snapshot.episode_id, snapshot.score, snapshot.level, snapshot.lines
    );
    for row in snapshot.render_rows(VISIBLE_HEIGHT) {
        println!("|{}|", row);
    }
    Ok(())
}
