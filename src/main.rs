mod cli;
mod runner;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Command};
use runner::Runner;
use seega_core::engine::config::{EngineConfig, PlayerConfig};
use seega_core::engine::search::AlphaBetaEngine;
use seega_core::logic::game::GameState;
use std::path::Path;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;
    let engine = AlphaBetaEngine::new(Arc::new(config));

    match cli.command {
        Command::Play {
            light,
            dark,
            variants,
            max_plies,
            resume,
            save,
        } => {
            let state = match resume {
                Some(path) => load_state(&path)?,
                None => GameState::new(variants.into()),
            };
            let players = PlayerConfig { light, dark };
            info!(?light, ?dark, "starting game");

            let stdin = std::io::stdin().lock();
            let stdout = std::io::stdout().lock();
            let final_state = Runner::new(engine, players, max_plies, stdin, stdout).play(state)?;

            if let Some(path) = save {
                let json = serde_json::to_string_pretty(&final_state)?;
                std::fs::write(&path, json)
                    .with_context(|| format!("writing {}", path.display()))?;
                info!(path = %path.display(), "game saved");
            }
        }
        Command::Analyze { state, top } => {
            let state = load_state(&state)?;
            let mut engine = engine;
            println!("{}\n", state.board);
            for (rank, ranked) in engine.top_moves(&state, top).iter().enumerate() {
                println!(
                    "{}. {} ({:+.1}): {}",
                    rank + 1,
                    ranked.action,
                    ranked.score,
                    ranked.rationale
                );
            }
        }
    }
    Ok(())
}

fn load_config(cli: &Cli) -> Result<EngineConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            EngineConfig::load_from_json(&json)
                .with_context(|| format!("parsing {}", path.display()))?
        }
        None => EngineConfig::default(),
    };
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }
    if let Some(budget) = cli.budget_ms {
        config.time_budget_ms = (budget > 0).then_some(budget);
    }
    Ok(config)
}

fn load_state(path: &Path) -> Result<GameState> {
    let json =
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&json).with_context(|| format!("parsing {}", path.display()))
}
