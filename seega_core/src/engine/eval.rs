use crate::engine::config::EvalWeights;
use crate::engine::Evaluator;
use crate::logic::board::{is_center, orthogonal_neighbors, Board, Player, CENTER};
use crate::logic::eval_constants::{
    PST_POSITIONING, SAFETY_CENTER, SAFETY_PER_FRIENDLY_NEIGHBOR, WIN_SCORE,
};
use crate::logic::game::GameState;
use crate::logic::rules::mobility;

pub struct WeightedEvaluator {
    weights: EvalWeights,
}

impl WeightedEvaluator {
    pub const fn new(weights: EvalWeights) -> Self {
        Self { weights }
    }

    pub const fn weights(&self) -> &EvalWeights {
        &self.weights
    }
}

impl Evaluator for WeightedEvaluator {
    fn evaluate(&self, state: &GameState, player: Player) -> f64 {
        if let Some(outcome) = state.outcome {
            return match outcome.winner {
                Some(winner) if winner == player => WIN_SCORE,
                Some(_) => -WIN_SCORE,
                None => 0.0,
            };
        }

        let w = &self.weights;
        let opponent = player.opposite();
        let board = &state.board;

        let stones = f64::from(board.count(player)) - f64::from(board.count(opponent));

        let center = match board.get(CENTER) {
            Some(owner) if owner == player => 1.0,
            Some(_) => -1.0,
            None => 0.0,
        };

        let moves = f64::from(mobility(state, player)) - f64::from(mobility(state, opponent));
        let positioning = positioning(board, player) - positioning(board, opponent);
        let safety = safety(board, player) - safety(board, opponent);

        w.stone_count.mul_add(
            stones,
            w.center_control.mul_add(
                center,
                w.mobility
                    .mul_add(moves, w.positioning.mul_add(positioning, w.safety * safety)),
            ),
        )
    }
}

fn positioning(board: &Board, player: Player) -> f64 {
    board
        .stones_of(player)
        .filter_map(|cell| {
            PST_POSITIONING
                .get(usize::from(cell.row))
                .and_then(|row| row.get(usize::from(cell.col)))
        })
        .sum()
}

fn safety(board: &Board, player: Player) -> f64 {
    board
        .stones_of(player)
        .map(|cell| {
            if is_center(cell) {
                SAFETY_CENTER
            } else {
                let friends = orthogonal_neighbors(cell)
                    .filter(|&n| board.is_owned_by(n, player))
                    .count();
                #[allow(clippy::cast_precision_loss)]
                let friends = friends as f64;
                friends * SAFETY_PER_FRIENDLY_NEIGHBOR
            }
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::variants::VariantFlags;

    fn eval_single_term(weights: EvalWeights, diagram: &str) -> f64 {
        let board = Board::from_diagram(diagram).unwrap();
        let state = GameState::from_board(board, Player::Light, VariantFlags::default());
        WeightedEvaluator::new(weights).evaluate(&state, Player::Light)
    }

    fn only(f: impl FnOnce(&mut EvalWeights)) -> EvalWeights {
        let mut w = EvalWeights::uniform(0.0);
        f(&mut w);
        w
    }

    const BASE: &str = "
        LLLL...
        LLLL...
        .......
        ...L...
        ...DDDD
        ...DDDD
        .......";

    #[test]
    fn test_stone_difference() {
        let score = eval_single_term(only(|w| w.stone_count = 2.0), BASE);
        assert!((score - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_center_control() {
        let score = eval_single_term(only(|w| w.center_control = 4.0), BASE);
        assert!((score - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_evaluation_is_antisymmetric() {
        let board = Board::from_diagram(BASE).unwrap();
        let state = GameState::from_board(board, Player::Light, VariantFlags::default());
        let eval = WeightedEvaluator::new(EvalWeights::uniform(1.0));
        let light = eval.evaluate(&state, Player::Light);
        let dark = eval.evaluate(&state, Player::Dark);
        assert!((light + dark).abs() < 1e-9);
    }

    #[test]
    fn test_safety_counts_center_and_neighbours() {
        let board = Board::from_diagram(BASE).unwrap();
        // Light: center 5.0, plus the 2x4 block has 10 internal edges counted twice.
        assert!((safety(&board, Player::Light) - 15.0).abs() < 1e-9);
        assert!((safety(&board, Player::Dark) - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_decided_game_scores() {
        let board = Board::from_diagram(
            "
            DDDDDDD
            .......
            .......
            .......
            LLLLLLL
            LLL....
            .......",
        )
        .unwrap();
        let state = GameState::from_board(board, Player::Dark, VariantFlags::default());
        let eval = WeightedEvaluator::new(EvalWeights::uniform(1.0));
        assert!((eval.evaluate(&state, Player::Light) - WIN_SCORE).abs() < 1e-9);
        assert!((eval.evaluate(&state, Player::Dark) + WIN_SCORE).abs() < 1e-9);
    }
}
