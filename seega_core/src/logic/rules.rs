use crate::logic::board::{in_bounds, is_center, orthogonal_neighbors, Board, Cell, Player};
use crate::logic::game::{GameState, Phase};
use crate::logic::variants::{VariantGuard, VariantRule};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MoveError {
    #[error("operation is not valid in the current phase")]
    WrongPhase,
    #[error("cell is outside the 7x7 board")]
    OutOfBounds,
    #[error("stones cannot be placed on the center cell")]
    CenterForbidden,
    #[error("cell is already occupied")]
    CellOccupied,
    #[error("there is no stone on the origin cell")]
    CellEmpty,
    #[error("the origin stone belongs to the opponent")]
    NotYourStone,
    #[error("stones move exactly one orthogonal step")]
    InvalidStepDistance,
    #[error("move breaks the {0} rule")]
    VariantViolation(VariantRule),
    #[error("blockade removal must target a stone of the blocked player")]
    InvalidBlockadeTarget,
    #[error("no chain capture is in progress")]
    NotInChainMode,
    #[error("no more stones may be placed this turn")]
    PlacementLimit,
    #[error("the side to move still has a legal move")]
    PassNotAllowed,
    #[error("the game is already over")]
    GameOver,
}

/// Checks a single placement target against the board, ignoring turn and phase.
pub fn validate_placement(board: &Board, cell: Cell) -> Result<(), MoveError> {
    if !in_bounds(cell) {
        return Err(MoveError::OutOfBounds);
    }
    if is_center(cell) {
        return Err(MoveError::CenterForbidden);
    }
    if board.get(cell).is_some() {
        return Err(MoveError::CellOccupied);
    }
    Ok(())
}

/// Checks a one-step move of the side to move, including phase, chain anchoring
/// and variant restrictions.
pub fn validate_step(state: &GameState, from: Cell, to: Cell) -> Result<(), MoveError> {
    match state.phase {
        Phase::Movement => {}
        Phase::Chain { origin } => {
            if from != origin {
                return Err(MoveError::NotInChainMode);
            }
        }
        Phase::Finished => return Err(MoveError::GameOver),
        Phase::Placement | Phase::Blockade { .. } => return Err(MoveError::WrongPhase),
    }

    let player = state.current;
    validate_geometry(&state.board, player, from, to)?;
    VariantGuard::for_player(state, player).check(from, to)
}

/// Ownership, emptiness and step distance, without phase or variant rules.
fn validate_geometry(board: &Board, player: Player, from: Cell, to: Cell) -> Result<(), MoveError> {
    if !in_bounds(from) || !in_bounds(to) {
        return Err(MoveError::OutOfBounds);
    }
    match board.get(from) {
        None => return Err(MoveError::CellEmpty),
        Some(owner) if owner != player => return Err(MoveError::NotYourStone),
        Some(_) => {}
    }
    if board.get(to).is_some() {
        return Err(MoveError::CellOccupied);
    }
    if from.manhattan(to) != 1 {
        return Err(MoveError::InvalidStepDistance);
    }
    Ok(())
}

/// Every empty non-center cell, while `player` still has stones to place.
pub fn legal_placements(state: &GameState, player: Player) -> Vec<Cell> {
    if state.phase != Phase::Placement || state.stones_to_place_for(player) == 0 {
        return Vec::new();
    }
    (0..crate::logic::board::NUM_CELLS)
        .map(Cell::from_index)
        .filter(|&cell| validate_placement(&state.board, cell).is_ok())
        .collect()
}

/// Empty orthogonal neighbours `origin` may step to. Empty unless `origin`
/// holds a stone of the side to move and the phase allows it to move.
pub fn legal_moves(state: &GameState, origin: Cell) -> Vec<Cell> {
    let allowed = match state.phase {
        Phase::Movement => true,
        Phase::Chain { origin: anchor } => anchor == origin,
        _ => false,
    };
    if !allowed || !state.board.is_owned_by(origin, state.current) {
        return Vec::new();
    }
    let guard = VariantGuard::for_player(state, state.current);
    destinations(&state.board, origin, guard).collect()
}

fn destinations(board: &Board, origin: Cell, guard: VariantGuard) -> impl Iterator<Item = Cell> + '_ {
    orthogonal_neighbors(origin).filter(move |&to| board.get(to).is_none() && guard.permits(origin, to))
}

/// Whether `player` could act if it were their turn: a placement during
/// Placement, otherwise a one-step move of any stone (the chain anchor is
/// ignored).
pub fn has_any_legal_move(state: &GameState, player: Player) -> bool {
    if state.phase == Phase::Placement {
        return !legal_placements(state, player).is_empty();
    }
    let guard = VariantGuard::for_player(state, player);
    state
        .board
        .stones_of(player)
        .any(|from| destinations(&state.board, from, guard).next().is_some())
}

pub fn count_stones(state: &GameState, player: Player) -> u32 {
    state.board.count(player)
}

/// Number of legal actions for `player`: placement cells during Placement,
/// otherwise the sum of per-stone step counts.
pub fn mobility(state: &GameState, player: Player) -> u32 {
    if state.phase == Phase::Placement {
        return u32::try_from(legal_placements(state, player).len()).unwrap_or(u32::MAX);
    }
    let guard = VariantGuard::for_player(state, player);
    let steps: usize = state
        .board
        .stones_of(player)
        .map(|from| destinations(&state.board, from, guard).count())
        .sum();
    u32::try_from(steps).unwrap_or(u32::MAX)
}
