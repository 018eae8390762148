use crate::engine::config::DifficultyProfile;
use crate::logic::board::{Cell, Player};
use crate::logic::game::GameState;
use serde::{Deserialize, Serialize};
use std::fmt;

pub mod config;
pub mod eval;
pub mod search;
pub mod stalemate;
pub mod zobrist;

/// One decision of the acting player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    Place { cell: Cell },
    Move { from: Cell, to: Cell },
    EndChain,
    RemoveBlocked { cell: Cell },
    Pass,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Place { cell } => write!(f, "place {cell}"),
            Self::Move { from, to } => write!(f, "{from} -> {to}"),
            Self::EndChain => write!(f, "end chain"),
            Self::RemoveBlocked { cell } => write!(f, "remove {cell}"),
            Self::Pass => write!(f, "pass"),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub enum SearchLimit {
    Depth(u8),
    /// Iterative deepening up to `depth`, abandoned after `budget_ms`.
    Time { depth: u8, budget_ms: u64 },
}

impl SearchLimit {
    pub const fn max_depth(self) -> u8 {
        match self {
            Self::Depth(depth) | Self::Time { depth, .. } => depth,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SearchStats {
    /// Deepest fully completed iteration.
    pub depth: u8,
    pub nodes: u64,
    pub time_ms: u64,
    pub score: f64,
}

pub trait Evaluator {
    /// Score of `state` from `player`'s point of view.
    fn evaluate(&self, state: &GameState, player: Player) -> f64;
}

pub trait Searcher {
    fn search(
        &mut self,
        game_state: &GameState,
        profile: &DifficultyProfile,
        limit: SearchLimit,
        excluded_actions: &[Action],
    ) -> Option<(Action, SearchStats)>;
}
