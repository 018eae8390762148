use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use seega_core::engine::Action;
use seega_core::logic::board::{Player, CENTER, NUM_CELLS};
use seega_core::logic::capture::preview_captures;
use seega_core::logic::game::{GameState, Phase};
use seega_core::logic::generator::MoveGenerator;
use seega_core::logic::variants::VariantFlags;

const MAX_PLIES: usize = 400;

fn flags_for(seed: u64) -> VariantFlags {
    VariantFlags {
        first_move_must_enter_center: seed % 2 == 0,
        anti_shuttle: seed % 3 == 0,
        blockade_one_removal: seed % 4 < 2,
    }
}

fn check_invariants(state: &GameState) {
    let light = state.board.count(Player::Light);
    let dark = state.board.count(Player::Dark);
    assert_eq!(
        light + dark + state.board.empty_count(),
        u32::try_from(NUM_CELLS).unwrap()
    );
    assert_eq!(state.board.zobrist_hash, state.board.calculate_hash());
    assert!(!state.captured_last_move.contains(&CENTER));
    if state.phase == Phase::Placement {
        assert!(state.board.is_empty(CENTER));
    }
}

/// Plays random legal actions from a fresh game and checks board-level
/// invariants after every step.
fn random_playout(seed: u64) {
    let mut rng = StdRng::seed_from_u64(seed);
    let generator = MoveGenerator::new();
    let mut state = GameState::new(flags_for(seed));

    for _ in 0..MAX_PLIES {
        if state.is_over() {
            break;
        }
        let actions = generator.generate(&state);
        let Some(&action) = actions.choose(&mut rng) else {
            break;
        };

        let next = state
            .apply_action(action)
            .unwrap_or_else(|e| panic!("seed {seed}: generated {action} rejected: {e}"));

        if let Action::Move { from, to } = action {
            let mut preview = preview_captures(&state, from, to);
            let mut applied = next.captured_last_move.clone();
            preview.sort();
            applied.sort();
            assert_eq!(preview, applied, "seed {seed}: preview differs for {action}");
        }

        check_invariants(&next);
        state = next;
    }
}

#[test]
fn test_random_playouts_keep_invariants() {
    for seed in 0..24 {
        random_playout(seed);
    }
}

#[test]
fn test_center_stone_survives_every_capture() {
    let mut rng = StdRng::seed_from_u64(99);
    let generator = MoveGenerator::new();
    for seed in 0..8 {
        let mut state = GameState::new(flags_for(seed));
        for _ in 0..MAX_PLIES {
            let actions = generator.generate(&state);
            let Some(&action) = actions.choose(&mut rng) else {
                break;
            };
            let owner_before = state.board.get(CENTER);
            let next = state.apply_action(action).unwrap();
            let moves_center = matches!(action, Action::Move { from, .. } if from == CENTER);
            if owner_before.is_some() && !moves_center {
                assert_eq!(next.board.get(CENTER), owner_before);
            }
            state = next;
        }
    }
}
