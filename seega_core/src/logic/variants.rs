//! Optional rule variants chosen before a game starts.
//!
//! The flags are fixed for the whole game. Move-level rules (first move into
//! the center, anti-shuttle) are checked here; the blockade removal sub-mode
//! is driven by the phase machine in `game`.

use crate::logic::board::{is_center, Cell, Player};
use crate::logic::game::GameState;
use crate::logic::rules::MoveError;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VariantFlags {
    pub first_move_must_enter_center: bool,
    pub anti_shuttle: bool,
    pub blockade_one_removal: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VariantRule {
    FirstMoveCenter,
    AntiShuttle,
}

impl fmt::Display for VariantRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FirstMoveCenter => write!(f, "first-move-center"),
            Self::AntiShuttle => write!(f, "anti-shuttle"),
        }
    }
}

/// Move restrictions for one player, computed once and then applied to every
/// candidate step. Keeps move enumeration from rescanning the history per move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VariantGuard {
    center_only: bool,
    shuttle: Option<(Cell, Cell)>,
}

impl VariantGuard {
    pub fn for_player(state: &GameState, player: Player) -> Self {
        let flags = state.variants;
        Self {
            center_only: flags.first_move_must_enter_center && state.move_history.is_empty(),
            shuttle: if flags.anti_shuttle {
                shuttle_step(state, player)
            } else {
                None
            },
        }
    }

    pub fn check(&self, from: Cell, to: Cell) -> Result<(), MoveError> {
        if self.center_only && !is_center(to) {
            return Err(MoveError::VariantViolation(VariantRule::FirstMoveCenter));
        }
        if self.shuttle == Some((from, to)) {
            return Err(MoveError::VariantViolation(VariantRule::AntiShuttle));
        }
        Ok(())
    }

    pub fn permits(&self, from: Cell, to: Cell) -> bool {
        self.check(from, to).is_ok()
    }
}

pub fn check_move_variants(
    state: &GameState,
    player: Player,
    from: Cell,
    to: Cell,
) -> Result<(), MoveError> {
    VariantGuard::for_player(state, player).check(from, to)
}

/// The step that would be a fifth consecutive back-and-forth between the same
/// two cells, judged on `player`'s own last four moves.
fn shuttle_step(state: &GameState, player: Player) -> Option<(Cell, Cell)> {
    let mut recent = state
        .move_history
        .recent()
        .filter(|record| record.player == player)
        .take(4)
        .map(|record| (record.from, record.to));

    // Newest first: b->a, a->b, b->a, a->b
    let (b, a) = recent.next()?;
    let shuttled = [(a, b), (b, a), (a, b)]
        .into_iter()
        .all(|expected| recent.next() == Some(expected));
    shuttled.then_some((a, b))
}
