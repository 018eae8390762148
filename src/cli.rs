//! Command-line interface for the seega binary.

use clap::{Args, Parser, Subcommand};
use seega_core::engine::config::{Controller, Difficulty};
use seega_core::logic::variants::VariantFlags;
use std::path::PathBuf;

/// Seega on a 7x7 board, against the engine or another human.
#[derive(Parser, Debug)]
#[command(name = "seega")]
#[command(about = "Play or analyse Seega games", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Engine tuning file (JSON scale factors)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Seed for the engine's random moves
    #[arg(long, global = true)]
    pub seed: Option<u64>,

    /// Per-move search budget in milliseconds (0 searches to full depth)
    #[arg(long, global = true)]
    pub budget_ms: Option<u64>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Play a game; each side is "human" or an engine difficulty
    Play {
        #[arg(long, default_value = "human", value_parser = parse_controller)]
        light: Controller,

        #[arg(long, default_value = "medium", value_parser = parse_controller)]
        dark: Controller,

        #[command(flatten)]
        variants: VariantArgs,

        /// Stop after this many actions
        #[arg(long, default_value = "600")]
        max_plies: usize,

        /// Continue from a saved game instead of starting fresh
        #[arg(long)]
        resume: Option<PathBuf>,

        /// Write the final state here as JSON
        #[arg(long)]
        save: Option<PathBuf>,
    },

    /// Rank the best actions in a saved position
    Analyze {
        /// Saved game state (JSON)
        state: PathBuf,

        /// Number of actions to show
        #[arg(short, long, default_value = "3")]
        top: usize,
    },
}

#[derive(Args, Debug, Clone, Copy)]
pub struct VariantArgs {
    /// The first move of the game must enter the center
    #[arg(long)]
    pub first_move_center: bool,

    /// Forbid shuttling one stone back and forth
    #[arg(long)]
    pub anti_shuttle: bool,

    /// A blocked player loses one stone instead of passing
    #[arg(long)]
    pub blockade_removal: bool,
}

impl From<VariantArgs> for VariantFlags {
    fn from(args: VariantArgs) -> Self {
        Self {
            first_move_must_enter_center: args.first_move_center,
            anti_shuttle: args.anti_shuttle,
            blockade_one_removal: args.blockade_removal,
        }
    }
}

pub fn parse_controller(s: &str) -> Result<Controller, String> {
    if s.trim().eq_ignore_ascii_case("human") {
        return Ok(Controller::Human);
    }
    s.parse::<Difficulty>().map(Controller::Ai)
}
