#[cfg(test)]
mod tests {
    use seega_core::engine::config::{Difficulty, DifficultyProfile, EngineConfig};
    use seega_core::engine::eval::WeightedEvaluator;
    use seega_core::engine::search::{immediate_captures, AlphaBetaEngine};
    use seega_core::engine::{Evaluator, SearchLimit, Searcher};
    use seega_core::logic::board::{Board, Player};
    use seega_core::logic::game::GameState;
    use seega_core::logic::generator::MoveGenerator;
    use seega_core::logic::variants::VariantFlags;
    use std::sync::Arc;

    fn position(diagram: &str) -> GameState {
        GameState::from_board(
            Board::from_diagram(diagram).unwrap(),
            Player::Light,
            VariantFlags::default(),
        )
    }

    fn engine() -> AlphaBetaEngine {
        let config = EngineConfig {
            time_budget_ms: None,
            seed: Some(1),
            ..EngineConfig::default()
        };
        AlphaBetaEngine::new(Arc::new(config))
    }

    // Full-width minimax without pruning.
    fn brute_force(
        state: &GameState,
        depth: u8,
        root: Player,
        evaluator: &WeightedEvaluator,
    ) -> f64 {
        if depth == 0 || state.is_over() {
            return evaluator.evaluate(state, root);
        }
        let scores: Vec<f64> = MoveGenerator::new()
            .generate(state)
            .into_iter()
            .map(|action| {
                let child = state.apply_action(action).unwrap();
                brute_force(&child, depth - 1, root, evaluator)
            })
            .collect();
        if scores.is_empty() {
            return evaluator.evaluate(state, root);
        }
        if state.acting_player() == root {
            scores.into_iter().fold(f64::NEG_INFINITY, f64::max)
        } else {
            scores.into_iter().fold(f64::INFINITY, f64::min)
        }
    }

    fn brute_force_root(state: &GameState, depth: u8, profile: &DifficultyProfile) -> f64 {
        let evaluator = WeightedEvaluator::new(profile.weights);
        let root = state.acting_player();
        MoveGenerator::new()
            .generate(state)
            .into_iter()
            .map(|action| {
                let child = state.apply_action(action).unwrap();
                #[allow(clippy::cast_precision_loss)]
                let bonus = immediate_captures(state, action) as f64 * profile.weights.captures;
                brute_force(&child, depth - 1, root, &evaluator) + bonus
            })
            .fold(f64::NEG_INFINITY, f64::max)
    }

    const QUIET: &str = "
        LLLL...
        LLLL...
        .......
        .......
        ...DDDD
        ...DDDD
        .......";

    const TACTICAL: &str = "
        LLLL...
        LLLL...
        ...DL..
        ..L....
        ...DDDD
        ...DDDD
        .......";

    #[test]
    fn test_alpha_beta_matches_minimax() {
        for diagram in [QUIET, TACTICAL] {
            let state = position(diagram);
            for difficulty in [Difficulty::Easy, Difficulty::Expert] {
                let profile = DifficultyProfile::base(difficulty);
                for depth in 1..=3 {
                    let (_, stats) = engine()
                        .search(&state, &profile, SearchLimit::Depth(depth), &[])
                        .unwrap();
                    let expected = brute_force_root(&state, depth, &profile);
                    assert!(
                        (stats.score - expected).abs() < 1e-9,
                        "{difficulty} depth {depth}: {} != {expected}",
                        stats.score
                    );
                    assert_eq!(stats.depth, depth);
                }
            }
        }
    }

    #[test]
    fn test_best_move_takes_free_stone() {
        let state = position(
            "
            LLLL...
            LLLL...
            ...DL..
            .......
            ...DDDD
            ...DDDD
            L......",
        );
        let action = engine().best_move(&state, Difficulty::Hard).unwrap();
        let next = state.apply_action(action).unwrap();
        assert_eq!(next.captured_last_move.len(), 1);
    }

    #[test]
    fn test_engine_plays_whole_placement_phase() {
        let mut engine = engine();
        let mut state = GameState::new(VariantFlags::default());
        while state.stones_to_place != [0, 0] {
            let action = engine.best_move(&state, Difficulty::Easy).unwrap();
            state = state.apply_action(action).unwrap();
        }
        assert_eq!(state.board.empty_count(), 1);
        assert!(state.board.get(seega_core::logic::board::CENTER).is_none());
    }
}
