use crate::engine::config::{Difficulty, DifficultyProfile, EngineConfig};
use crate::engine::eval::WeightedEvaluator;
use crate::engine::{Action, Evaluator, SearchLimit, SearchStats, Searcher};
use crate::logic::board::{is_center, Player};
use crate::logic::capture::preview_captures;
use crate::logic::game::GameState;
use crate::logic::generator::MoveGenerator;
use crate::logic::rules::mobility;
use log::debug;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// A root action with its searched score and a short explanation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedMove {
    pub action: Action,
    pub score: f64,
    pub rationale: String,
}

/// Stones `action` removes from the board immediately.
pub fn immediate_captures(state: &GameState, action: Action) -> usize {
    match action {
        Action::Move { from, to } => preview_captures(state, from, to).len(),
        Action::RemoveBlocked { .. } => 1,
        Action::Place { .. } | Action::EndChain | Action::Pass => 0,
    }
}

#[allow(clippy::cast_precision_loss)]
fn capture_bonus(captures: usize, weight: f64) -> f64 {
    captures as f64 * weight
}

fn make_rng(seed: Option<u64>) -> StdRng {
    seed.map_or_else(StdRng::from_entropy, StdRng::seed_from_u64)
}

struct RootResult {
    best: Option<(Action, f64)>,
    complete: bool,
}

pub struct AlphaBetaEngine {
    config: Arc<EngineConfig>,
    generator: MoveGenerator,
    rng: StdRng,
    nodes_searched: u64,
    start_time: Option<Instant>,
    time_limit: Option<Duration>,
}

impl AlphaBetaEngine {
    pub fn new(config: Arc<EngineConfig>) -> Self {
        Self {
            rng: make_rng(config.seed),
            config,
            generator: MoveGenerator::new(),
            nodes_searched: 0,
            start_time: None,
            time_limit: None,
        }
    }

    /// The action `difficulty` would play, or `None` when nothing is legal.
    ///
    /// Weak tiers sometimes skip the search and play a uniformly random legal
    /// action. During placement this returns a single stone; ask again while
    /// the same player is still placing.
    pub fn best_move(&mut self, state: &GameState, difficulty: Difficulty) -> Option<Action> {
        if state.is_over() {
            return None;
        }
        let profile = self.config.profile(difficulty);
        let actions = self.generator.generate(state);
        if actions.is_empty() {
            return None;
        }

        let p = profile.random_move_probability.clamp(0.0, 1.0);
        if p > 0.0 && self.rng.gen_bool(p) {
            let action = actions.choose(&mut self.rng).copied();
            debug!("{difficulty} plays a random action: {action:?}");
            return action;
        }

        let limit = self.config.time_budget_ms.map_or(
            SearchLimit::Depth(profile.depth),
            |budget_ms| SearchLimit::Time {
                depth: profile.depth,
                budget_ms,
            },
        );
        self.search(state, &profile, limit, &[])
            .map(|(action, _)| action)
            .or_else(|| actions.first().copied())
    }

    /// The `k` best actions for the acting player under the strongest tier,
    /// best first, each with a rationale.
    pub fn top_moves(&mut self, state: &GameState, k: usize) -> Vec<RankedMove> {
        if k == 0 || state.is_over() {
            return Vec::new();
        }
        let profile = self.config.profile(Difficulty::Expert);
        let evaluator = WeightedEvaluator::new(profile.weights);
        let root = state.acting_player();
        self.start_clock(self.config.time_budget_ms);

        let candidates: Vec<(Action, GameState, usize)> = self
            .generator
            .generate(state)
            .into_iter()
            .filter_map(|action| {
                let child = state.apply_action(action).ok()?;
                Some((action, child, immediate_captures(state, action)))
            })
            .collect();

        // Shallowest pass is a plain evaluation, so there is always a result.
        let mut scores: Vec<f64> = candidates
            .iter()
            .map(|(_, child, captures)| {
                evaluator.evaluate(child, root) + capture_bonus(*captures, profile.weights.captures)
            })
            .collect();

        'deepening: for depth in 2..=self.config.analysis_depth {
            let mut deeper = Vec::with_capacity(candidates.len());
            for (_, child, captures) in &candidates {
                let Some(score) = self.minimax(
                    child,
                    depth - 1,
                    f64::NEG_INFINITY,
                    f64::INFINITY,
                    root,
                    &evaluator,
                ) else {
                    debug!("analysis stopped at depth {depth}");
                    break 'deepening;
                };
                deeper.push(score + capture_bonus(*captures, profile.weights.captures));
            }
            scores = deeper;
        }

        let mut ranked: Vec<RankedMove> = candidates
            .iter()
            .zip(scores)
            .map(|((action, child, captures), score)| RankedMove {
                action: *action,
                score,
                rationale: rationale(state, child, *action, *captures),
            })
            .collect();
        ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
        ranked.truncate(k);
        ranked
    }

    fn start_clock(&mut self, budget_ms: Option<u64>) {
        self.nodes_searched = 0;
        self.start_time = Some(Instant::now());
        self.time_limit = budget_ms.map(Duration::from_millis);
    }

    fn elapsed(&self) -> Duration {
        self.start_time.map(|t| t.elapsed()).unwrap_or_default()
    }

    #[allow(clippy::manual_is_multiple_of)]
    fn check_time(&self) -> bool {
        if let Some(limit) = self.time_limit {
            if self.nodes_searched % 1024 == 0 {
                return self.elapsed() > limit;
            }
        }
        false
    }

    fn search_root(
        &mut self,
        state: &GameState,
        root_actions: &[(Action, usize)],
        depth: u8,
        root: Player,
        evaluator: &WeightedEvaluator,
    ) -> RootResult {
        let capture_weight = evaluator.weights().captures;
        let mut alpha = f64::NEG_INFINITY;
        let beta = f64::INFINITY;
        let mut best: Option<(Action, f64)> = None;

        for &(action, captures) in root_actions {
            let Ok(child) = state.apply_action(action) else {
                continue;
            };
            let bonus = capture_bonus(captures, capture_weight);
            let Some(score) =
                self.minimax(&child, depth - 1, alpha - bonus, beta - bonus, root, evaluator)
            else {
                return RootResult {
                    best,
                    complete: false,
                };
            };

            let total = score + bonus;
            if !matches!(best, Some((_, b)) if total <= b) {
                best = Some((action, total));
            }
            alpha = alpha.max(total);
        }
        RootResult {
            best,
            complete: true,
        }
    }

    /// Plain minimax with alpha-beta bounds, scored from `root`'s side.
    /// `None` once the time budget is spent.
    fn minimax(
        &mut self,
        state: &GameState,
        depth: u8,
        mut alpha: f64,
        mut beta: f64,
        root: Player,
        evaluator: &WeightedEvaluator,
    ) -> Option<f64> {
        self.nodes_searched += 1;
        if self.check_time() {
            return None;
        }
        if depth == 0 || state.is_over() {
            return Some(evaluator.evaluate(state, root));
        }

        let actions = self.generator.generate(state);
        let maximizing = state.acting_player() == root;
        let mut best: Option<f64> = None;

        for action in actions {
            let Ok(child) = state.apply_action(action) else {
                continue;
            };
            let score = self.minimax(&child, depth - 1, alpha, beta, root, evaluator)?;
            if maximizing {
                let value = best.map_or(score, |b| b.max(score));
                best = Some(value);
                alpha = alpha.max(value);
            } else {
                let value = best.map_or(score, |b| b.min(score));
                best = Some(value);
                beta = beta.min(value);
            }
            if beta <= alpha {
                break;
            }
        }

        Some(best.unwrap_or_else(|| evaluator.evaluate(state, root)))
    }
}

impl Searcher for AlphaBetaEngine {
    fn search(
        &mut self,
        game_state: &GameState,
        profile: &DifficultyProfile,
        limit: SearchLimit,
        excluded_actions: &[Action],
    ) -> Option<(Action, SearchStats)> {
        let budget = match limit {
            SearchLimit::Depth(_) => None,
            SearchLimit::Time { budget_ms, .. } => Some(budget_ms),
        };
        self.start_clock(budget);
        let soft_limit = self.time_limit.map(|t| t.mul_f64(0.6));

        let evaluator = WeightedEvaluator::new(profile.weights);
        let root = game_state.acting_player();

        let mut root_actions: Vec<(Action, usize)> = self
            .generator
            .generate(game_state)
            .into_iter()
            .filter(|action| !excluded_actions.contains(action))
            .map(|action| (action, immediate_captures(game_state, action)))
            .collect();
        if root_actions.is_empty() {
            return None;
        }
        // Captures first; the sort is stable so equal counts keep board order.
        root_actions.sort_by_key(|&(_, captures)| Reverse(captures));

        let mut best: Option<(Action, f64)> = None;
        let mut final_depth = 0;

        for depth in 1..=limit.max_depth().max(1) {
            if depth > 1 && soft_limit.is_some_and(|sl| self.elapsed() > sl) {
                break;
            }

            let result = self.search_root(game_state, &root_actions, depth, root, &evaluator);
            if !result.complete {
                // An interrupted iteration only counts when nothing finished.
                if best.is_none() {
                    best = result.best;
                    final_depth = depth;
                }
                debug!("search interrupted at depth {depth}");
                break;
            }

            if let Some((action, score)) = result.best {
                debug!("depth {depth}: best {action} scores {score:.2}");
                best = Some((action, score));
                final_depth = depth;
                if let Some(pos) = root_actions.iter().position(|&(a, _)| a == action) {
                    let entry = root_actions.remove(pos);
                    root_actions.insert(0, entry);
                }
            }
        }

        let (action, score) = best.or_else(|| {
            // Out of time before the first root action finished.
            root_actions.first().and_then(|&(action, captures)| {
                let child = game_state.apply_action(action).ok()?;
                let bonus = capture_bonus(captures, profile.weights.captures);
                Some((action, evaluator.evaluate(&child, root) + bonus))
            })
        })?;

        let elapsed = self.elapsed();
        Some((
            action,
            SearchStats {
                depth: final_depth,
                nodes: self.nodes_searched,
                time_ms: u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
                score,
            },
        ))
    }
}

fn rationale(before: &GameState, after: &GameState, action: Action, captures: usize) -> String {
    let player = before.acting_player();
    let mut parts = Vec::new();

    match action {
        Action::Move { to, .. } => {
            if captures > 0 {
                let noun = if captures == 1 { "stone" } else { "stones" };
                parts.push(format!("captures {captures} {noun}"));
            }
            if is_center(to) {
                parts.push("enters the center".to_string());
            }
        }
        Action::Place { cell } => parts.push(format!("places at {cell}")),
        Action::EndChain => parts.push("ends the chain".to_string()),
        Action::RemoveBlocked { cell } => parts.push(format!("removes the blocked stone at {cell}")),
        Action::Pass => parts.push("passes".to_string()),
    }

    let delta = i64::from(mobility(after, player)) - i64::from(mobility(before, player));
    if delta != 0 {
        parts.push(format!("mobility {delta:+}"));
    }

    if parts.is_empty() {
        "quiet move".to_string()
    } else {
        parts.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::board::{Board, Cell};
    use crate::logic::variants::VariantFlags;

    fn engine(seed: u64) -> AlphaBetaEngine {
        let config = EngineConfig {
            time_budget_ms: None,
            analysis_depth: 2,
            seed: Some(seed),
            ..EngineConfig::default()
        };
        AlphaBetaEngine::new(Arc::new(config))
    }

    fn capture_position() -> GameState {
        let board = Board::from_diagram(
            "
            LLLL...
            LLLL...
            ...DL..
            .......
            ...DDDD
            ...DDDD
            L......",
        )
        .unwrap();
        GameState::from_board(board, Player::Light, VariantFlags::default())
    }

    #[test]
    fn test_search_prefers_capture() {
        let mut engine = engine(7);
        let state = capture_position();
        let profile = DifficultyProfile::base(Difficulty::Medium);
        let (action, stats) = engine
            .search(&state, &profile, SearchLimit::Depth(2), &[])
            .unwrap();
        assert_eq!(
            action,
            Action::Move {
                from: Cell::new_unchecked(1, 2),
                to: Cell::new_unchecked(2, 2)
            }
        );
        assert_eq!(stats.depth, 2);
        assert!(stats.nodes > 0);
    }

    #[test]
    fn test_excluded_actions_are_skipped() {
        let mut engine = engine(7);
        let state = capture_position();
        let profile = DifficultyProfile::base(Difficulty::Medium);
        let best = Action::Move {
            from: Cell::new_unchecked(1, 2),
            to: Cell::new_unchecked(2, 2),
        };
        let (action, _) = engine
            .search(&state, &profile, SearchLimit::Depth(1), &[best])
            .unwrap();
        assert_ne!(action, best);
    }

    #[test]
    fn test_nothing_to_search() {
        let mut engine = engine(7);
        let over = GameState::from_board(Board::new(), Player::Light, VariantFlags::default());
        assert_eq!(engine.best_move(&over, Difficulty::Expert), None);
        assert!(engine.top_moves(&over, 3).is_empty());
    }

    #[test]
    fn test_time_limited_search_still_answers() {
        let mut engine = engine(7);
        let state = capture_position();
        let profile = DifficultyProfile::base(Difficulty::Expert);
        let result = engine.search(
            &state,
            &profile,
            SearchLimit::Time {
                depth: 5,
                budget_ms: 0,
            },
            &[],
        );
        assert!(result.is_some());
    }

    #[test]
    fn test_top_moves_ranked_with_rationale() {
        let mut engine = engine(7);
        let state = capture_position();
        let ranked = engine.top_moves(&state, 3);
        assert_eq!(ranked.len(), 3);
        assert!(ranked.windows(2).all(|w| w[0].score >= w[1].score));
        assert_eq!(
            ranked[0].action,
            Action::Move {
                from: Cell::new_unchecked(1, 2),
                to: Cell::new_unchecked(2, 2)
            }
        );
        assert!(ranked[0].rationale.contains("captures 1 stone"));
    }

    #[test]
    fn test_seeded_random_tier_is_reproducible() {
        let state = GameState::new(VariantFlags::default());
        let pick = |seed| {
            let mut engine = engine(seed);
            (0..10)
                .map(|_| engine.best_move(&state, Difficulty::Beginner))
                .collect::<Vec<_>>()
        };
        assert_eq!(pick(42), pick(42));
        assert!(pick(42)
            .iter()
            .all(|a| matches!(a, Some(Action::Place { .. }))));
    }
}
