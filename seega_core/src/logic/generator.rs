use crate::engine::Action;
use crate::logic::board::{is_center, Player};
use crate::logic::game::{GameState, Phase};
use crate::logic::rules::{legal_moves, legal_placements};

/// Enumerates every action the acting player may take, in a stable order:
/// stones in row-major order, destinations in direction order.
#[derive(Debug, Clone, Copy, Default)]
pub struct MoveGenerator;

impl MoveGenerator {
    pub const fn new() -> Self {
        Self
    }

    pub fn generate(&self, state: &GameState) -> Vec<Action> {
        match state.phase {
            Phase::Finished => Vec::new(),
            Phase::Placement => legal_placements(state, state.current)
                .into_iter()
                .map(|cell| Action::Place { cell })
                .collect(),
            Phase::Movement => {
                // A stuck player only reaches Movement when no removal is due.
                let moves = self.stone_moves(state, state.current);
                if moves.is_empty() {
                    vec![Action::Pass]
                } else {
                    moves
                }
            }
            Phase::Chain { origin } => {
                let mut actions: Vec<Action> = legal_moves(state, origin)
                    .into_iter()
                    .map(|to| Action::Move { from: origin, to })
                    .collect();
                actions.push(Action::EndChain);
                actions
            }
            Phase::Blockade { blocked } => state
                .board
                .stones_of(blocked)
                .filter(|&cell| !is_center(cell))
                .map(|cell| Action::RemoveBlocked { cell })
                .collect(),
        }
    }

    fn stone_moves(&self, state: &GameState, player: Player) -> Vec<Action> {
        let mut moves = Vec::with_capacity(32);
        for from in state.board.stones_of(player) {
            moves.extend(
                legal_moves(state, from)
                    .into_iter()
                    .map(|to| Action::Move { from, to }),
            );
        }
        moves
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::board::{Board, Cell};
    use crate::logic::variants::VariantFlags;

    fn position(diagram: &str, flags: VariantFlags) -> GameState {
        GameState::from_board(Board::from_diagram(diagram).unwrap(), Player::Light, flags)
    }

    const STUCK: &str = "
        LDLLLLL
        DLDLLLL
        LDLDLLL
        LLD.DLL
        LLLDLLL
        LLLLLLL
        LLLLLLL";

    #[test]
    fn test_placement_actions() {
        let state = GameState::new(VariantFlags::default());
        let actions = MoveGenerator::new().generate(&state);
        assert_eq!(actions.len(), 48);
        assert_eq!(
            actions.first(),
            Some(&Action::Place {
                cell: Cell::new_unchecked(0, 0)
            })
        );
    }

    #[test]
    fn test_movement_actions_are_row_major() {
        let state = position(
            "
            LLLL...
            LLLL...
            .......
            .......
            ...DDDD
            ...DDDD
            .......",
            VariantFlags::default(),
        );
        let actions = MoveGenerator::new().generate(&state);
        assert_eq!(actions.len(), 6);
        assert_eq!(
            actions[..2],
            [
                Action::Move {
                    from: Cell::new_unchecked(0, 3),
                    to: Cell::new_unchecked(0, 4)
                },
                Action::Move {
                    from: Cell::new_unchecked(1, 0),
                    to: Cell::new_unchecked(2, 0)
                },
            ]
        );
        // Up, down, left, right.
        assert_eq!(
            actions[4..],
            [
                Action::Move {
                    from: Cell::new_unchecked(1, 3),
                    to: Cell::new_unchecked(2, 3)
                },
                Action::Move {
                    from: Cell::new_unchecked(1, 3),
                    to: Cell::new_unchecked(1, 4)
                },
            ]
        );
    }

    #[test]
    fn test_stuck_player_passes_without_blockade_variant() {
        let state = position(STUCK, VariantFlags::default());
        let generator = MoveGenerator::new();
        assert_eq!(generator.generate(&state), vec![Action::Pass]);
    }

    #[test]
    fn test_blockade_offers_removals() {
        let flags = VariantFlags {
            blockade_one_removal: true,
            ..VariantFlags::default()
        };
        let state = position(STUCK, flags);
        assert_eq!(state.phase, Phase::Blockade { blocked: Player::Light });
        assert_eq!(state.acting_player(), Player::Dark);

        let actions = MoveGenerator::new().generate(&state);
        assert_eq!(actions.len(), 40);
        assert!(actions
            .iter()
            .all(|a| matches!(a, Action::RemoveBlocked { cell } if state.board.is_owned_by(*cell, Player::Light))));
    }

    #[test]
    fn test_chain_actions_end_with_end_chain() {
        let state = position(
            "
            LLLL...
            LLLL...
            ...DL..
            ..L....
            ...DDDD
            ...DDDD
            .......",
            VariantFlags::default(),
        );
        let chain = state
            .apply_move(Cell::new_unchecked(1, 2), Cell::new_unchecked(2, 2))
            .unwrap();
        let actions = MoveGenerator::new().generate(&chain);
        assert_eq!(actions.last(), Some(&Action::EndChain));
        assert!(actions[..actions.len() - 1]
            .iter()
            .all(|a| matches!(a, Action::Move { from, .. } if *from == Cell::new_unchecked(2, 2))));
        // Up into the vacated (1,2), left to (2,1), right into the captured cell.
        assert_eq!(actions.len(), 4);
    }

    #[test]
    fn test_finished_game_has_no_actions() {
        let state = GameState::from_board(Board::new(), Player::Light, VariantFlags::default());
        assert!(state.is_over());
        assert!(MoveGenerator::new().generate(&state).is_empty());
    }
}
