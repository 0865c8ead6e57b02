mod cli;
mod game;
mod term;

use std::fs::File;

use anyhow::{Context, Result};
use clap::Parser;
use log::{error, info};
use simplelog::{Config, WriteLogger};

fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    // The terminal is in raw mode while playing, so logs can only go to a file
    if let Some(path) = &cli.log_file {
        let file = File::create(path)
            .with_context(|| format!("cannot create log file {}", path.display()))?;
        WriteLogger::init(cli.log_level(), Config::default(), file)
            .context("cannot install logger")?;
    }

    info!("starting worm with {:?}", cli);

    let mut game = game::WormGame::new(&cli).context("cannot open the terminal")?;
    let played = game.initialize().and_then(|_| game.run());
    let restored = game.shutdown();

    finish(played, restored)
}

/// A failed game is reported ahead of a failure to restore the terminal.
fn finish(played: Result<()>, restored: Result<()>) -> Result<()> {
    match (played, restored) {
        (Err(e), Err(restore_err)) => {
            error!("cannot restore the terminal: {:#}", restore_err);
            Err(e.context(format!("terminal not restored: {:#}", restore_err)))
        }
        (Err(e), Ok(())) => Err(e),
        (Ok(()), restored) => restored,
    }
}
