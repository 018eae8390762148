//! Whether an engine-controlled player should agree to, or propose, ending
//! the game as a stalemate. Decided from stone counts and mobility only.

use crate::engine::config::Difficulty;
use crate::logic::board::Player;
use crate::logic::game::{GameState, Phase, LOSS_THRESHOLD};
use crate::logic::rules::{count_stones, mobility};

/// Stones above the loss threshold, summed over both players, at or under
/// which the game counts as a low-material endgame.
const LOW_MATERIAL: i64 = 8;
const VERY_LOW_MATERIAL: i64 = 5;
const CLEARLY_LOSING: i64 = 3;
const OFFER_REPETITION: u32 = 4;

struct Balance {
    /// Own stones minus the opponent's.
    lead: i64,
    low_material: bool,
    very_low_material: bool,
    own_mobility: u32,
    opponent_mobility: u32,
}

impl Balance {
    fn of(state: &GameState, player: Player) -> Self {
        let own = i64::from(count_stones(state, player));
        let opponent = i64::from(count_stones(state, player.opposite()));
        let threshold = i64::from(LOSS_THRESHOLD);
        let material = (own - threshold) + (opponent - threshold);
        Self {
            lead: own - opponent,
            low_material: material <= LOW_MATERIAL,
            very_low_material: material <= VERY_LOW_MATERIAL,
            own_mobility: mobility(state, player),
            opponent_mobility: mobility(state, player.opposite()),
        }
    }
}

pub fn should_accept_stalemate(state: &GameState, player: Player, difficulty: Difficulty) -> bool {
    let b = Balance::of(state, player);
    if b.lead <= -CLEARLY_LOSING {
        return true;
    }
    if b.own_mobility == 0 && b.opponent_mobility > 0 {
        return true;
    }
    match difficulty {
        Difficulty::Beginner => b.lead <= -1 || b.low_material,
        Difficulty::Easy => b.lead <= -2 || (b.low_material && b.lead <= 0),
        Difficulty::Medium => b.lead <= -2 && b.low_material,
        Difficulty::Hard | Difficulty::Expert => false,
    }
}

pub fn should_offer_stalemate(state: &GameState, player: Player, difficulty: Difficulty) -> bool {
    if state.phase != Phase::Movement {
        return false;
    }
    let b = Balance::of(state, player);
    if b.lead >= CLEARLY_LOSING {
        return false;
    }
    if b.low_material && b.own_mobility <= 1 && b.opponent_mobility <= 1 {
        return true;
    }
    if state.move_repetition >= OFFER_REPETITION {
        return true;
    }
    // Weak tiers also give up a slightly lost ending.
    difficulty.is_weak() && (-2..=-1).contains(&b.lead) && b.very_low_material
}
