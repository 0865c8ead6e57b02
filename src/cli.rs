use std::path::PathBuf;
use std::time::Duration;

use clap::{ArgAction, Parser};
use simplelog::LevelFilter;
use worm::Rules;

/// Steer a worm around the terminal and eat the numbers.
#[derive(Debug, Parser)]
#[command(name = "worm", version)]
pub struct Cli {
    /// Seed for the target generator; every new game replays the same targets
    #[arg(long)]
    pub seed: Option<u64>,

    /// Number of steps the worm grows for at the start of a game
    #[arg(long, default_value_t = 0)]
    pub initial_growth: u32,

    /// Milliseconds between two moves of the worm
    #[arg(long, default_value_t = 150, value_parser = clap::value_parser!(u64).range(1..))]
    pub tick_ms: u64,

    /// Write a log to this file
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Log more detail, repeat for even more
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    pub fn rules(&self) -> Rules {
        Rules { initial_growth: self.initial_growth }
    }

    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    pub fn log_level(&self) -> LevelFilter {
        match self.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }
}
