//! Headless soak runs: argument parsing, configuration loading and the run loop.

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use rand::Rng;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::autoplay::Autoplay;
use crate::core::{SimConfig, Simulator};
use crate::types::{LockEvent, FRAMES_PER_SECOND};

/// Ten minutes of play at 60 frames per second
pub const DEFAULT_FRAMES: u64 = 36_000;

pub const USAGE: &str = "usage: tetris-sim [--frames N] [--seed N] [--config PATH] [--json] [--no-hold]";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoakOptions {
    pub frames: u64,
    pub seed: u64,
    pub config_path: Option<PathBuf>,
    /// Print the final snapshot as JSON instead of the text summary
    pub json: bool,
    pub hold: bool,
    pub help: bool,
}

impl Default for SoakOptions {
    fn default() -> Self {
        Self {
            frames: DEFAULT_FRAMES,
            seed: 1,
            config_path: None,
            json: false,
            hold: true,
            help: false,
        }
    }
}

pub fn parse_soak_args(args: &[String]) -> Result<SoakOptions> {
    let mut opts = SoakOptions::default();
    let mut i = 0usize;
    while i < args.len() {
        match args[i].as_str() {
            "--frames" => {
                i += 1;
                let v = args
                    .get(i)
                    .ok_or_else(|| anyhow!("missing value for --frames"))?;
                opts.frames = v
                    .parse()
                    .map_err(|_| anyhow!("invalid --frames value: {}", v))?;
            }
            "--seed" => {
                i += 1;
                let v = args
                    .get(i)
                    .ok_or_else(|| anyhow!("missing value for --seed"))?;
                opts.seed = v
                    .parse()
                    .map_err(|_| anyhow!("invalid --seed value: {}", v))?;
            }
            "--config" => {
                i += 1;
                let v = args
                    .get(i)
                    .ok_or_else(|| anyhow!("missing value for --config"))?;
                opts.config_path = Some(PathBuf::from(v));
            }
            "--json" => opts.json = true,
            "--no-hold" => opts.hold = false,
            "-h" | "--help" => opts.help = true,
            other => {
                return Err(anyhow!("unknown argument: {}\n{}", other, USAGE));
            }
        }
        i += 1;
    }
    Ok(opts)
}

/// Timings from `--config` when given, otherwise from the environment.
pub fn load_config(opts: &SoakOptions) -> Result<SimConfig> {
    match &opts.config_path {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            SimConfig::from_json_str(&text)
                .with_context(|| format!("parsing config {}", path.display()))
        }
        None => SimConfig::from_env().context("reading TETRIS_SIM_* environment"),
    }
}

/// Log filter from `RUST_LOG`-style directives; `info` when unset, blank or invalid.
pub fn log_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .filter(|d| !d.trim().is_empty())
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}

/// Totals over a soak run, across episodes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SoakReport {
    pub frames: u64,
    pub pieces: u64,
    pub lines: u64,
    pub t_spins: u64,
    pub level_ups: u64,
    pub top_outs: u32,
    pub best_score: u32,
    episode_score: u32,
}

impl SoakReport {
    pub fn record(&mut self, event: &LockEvent) {
        self.pieces += 1;
        self.lines += event.lines_cleared as u64;
        self.t_spins += event.t_spin as u64;
        self.level_ups += event.level_up as u64;
        self.episode_score = self.episode_score.saturating_add(event.score_awarded);
    }

    /// The session reset after a top-out (on a commit or a hold swap).
    pub fn record_top_out(&mut self) {
        self.top_outs += 1;
        self.close_episode();
    }

    fn close_episode(&mut self) {
        self.best_score = self.best_score.max(self.episode_score);
        self.episode_score = 0;
    }

    pub fn summary_lines(&self) -> [String; 4] {
        let seconds = self.frames / FRAMES_PER_SECOND as u64;
        [
            format!("FRAMES {} ({}m{:02}s)", self.frames, seconds / 60, seconds % 60),
            format!("PIECES {} LINES {} TSPINS {}", self.pieces, self.lines, self.t_spins),
            format!("LEVEL UPS {} TOP OUTS {}", self.level_ups, self.top_outs),
            format!("BEST SCORE {}", self.best_score),
        ]
    }
}

/// Drive `sim` with `autoplay` for `frames` ticks.
pub fn run_soak<R: Rng>(sim: &mut Simulator<R>, autoplay: &mut Autoplay, frames: u64) -> SoakReport {
    let mut report = SoakReport::default();
    for _ in 0..frames {
        let input = autoplay.next_input(sim);
        let episode = sim.episode_id();
        if let Some(event) = sim.tick(input) {
            debug!(piece = sim.piece_id(), ?event, "lock");
            report.record(&event);
        }
        if sim.episode_id() != episode {
            report.record_top_out();
        }
        report.frames += 1;
    }
    report.close_episode();
    info!(
        pieces = report.pieces,
        lines = report.lines,
        top_outs = report.top_outs,
        best_score = report.best_score,
        "soak finished"
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PieceKind;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parse_defaults() {
        assert_eq!(parse_soak_args(&[]).unwrap(), SoakOptions::default());
    }

    #[test]
    fn parse_all_flags() {
        let opts = parse_soak_args(&args(&[
            "--frames", "600", "--seed", "42", "--config", "sim.json", "--json", "--no-hold",
        ]))
        .unwrap();
        assert_eq!(opts.frames, 600);
        assert_eq!(opts.seed, 42);
        assert_eq!(opts.config_path, Some(PathBuf::from("sim.json")));
        assert!(opts.json);
        assert!(!opts.hold);
    }

    #[test]
    fn parse_rejects_bad_input() {
        assert!(parse_soak_args(&args(&["--frames"])).is_err());
        assert!(parse_soak_args(&args(&["--seed", "abc"])).is_err());
        assert!(parse_soak_args(&args(&["--turbo"])).is_err());
    }

    #[test]
    fn log_filter_honours_directives() {
        assert_eq!(log_filter(Some("debug")).to_string(), "debug");
        assert_eq!(
            log_filter(Some("tetris_sim_core=trace")).to_string(),
            "tetris_sim_core=trace"
        );
        assert_eq!(log_filter(None).to_string(), "info");
        assert_eq!(log_filter(Some("  ")).to_string(), "info");
    }

    #[test]
    fn report_tracks_best_episode() {
        let event = |score_awarded, topped_out| LockEvent {
            kind: PieceKind::T,
            lines_cleared: 1,
            t_spin: true,
            score_awarded,
            level_up: false,
            topped_out,
        };
        let mut report = SoakReport::default();
        report.record(&event(300, false));
        report.record(&event(100, true));
        report.record_top_out();
        report.record(&event(50, false));
        report.close_episode();

        assert_eq!(report.pieces, 3);
        assert_eq!(report.lines, 3);
        assert_eq!(report.t_spins, 3);
        assert_eq!(report.top_outs, 1);
        assert_eq!(report.best_score, 400);
    }

    #[test]
    fn soak_runs_the_requested_frames() {
        let mut sim = Simulator::new(3);
        let mut autoplay = Autoplay::new();
        let report = run_soak(&mut sim, &mut autoplay, 600);
        assert_eq!(report.frames, 600);
        assert!(report.pieces > 0);
    }
}
