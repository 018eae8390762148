use crate::logic::board::{in_bounds, is_center, Board, Cell, DIRECTIONS};
use crate::logic::game::GameState;
use crate::logic::rules::validate_step;

/// Custodian captures made by the stone standing on `cell`.
///
/// Each direction is walked independently: contiguous opponent stones are
/// collected until the first non-opponent cell, and the line is taken when
/// that cell holds a stone of the mover. The center stone is never collected
/// and ends the walk; a center stone of the mover still closes a line.
pub fn resolve_captures(board: &Board, cell: Cell) -> Vec<Cell> {
    let Some(player) = board.get(cell) else {
        return Vec::new();
    };
    let opponent = player.opposite();
    let mut captured = Vec::new();

    for (dr, dc) in DIRECTIONS {
        let mut line = Vec::new();
        let mut cursor = cell.offset(dr, dc);
        while let Some(next) = cursor {
            if is_center(next) || board.get(next) != Some(opponent) {
                break;
            }
            line.push(next);
            cursor = next.offset(dr, dc);
        }

        let closed = cursor.is_some_and(|end| in_bounds(end) && board.get(end) == Some(player));
        if !line.is_empty() && closed {
            captured.extend(line);
        }
    }
    captured
}

/// Captures `from -> to` would make, without touching `state`. Empty for an
/// illegal move.
pub fn preview_captures(state: &GameState, from: Cell, to: Cell) -> Vec<Cell> {
    if validate_step(state, from, to).is_err() {
        return Vec::new();
    }
    let mut board = state.board;
    board.move_stone(from, to);
    resolve_captures(&board, to)
}
