use crate::logic::board::Player;
use crate::logic::game::GameState;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Multipliers for the evaluation terms.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvalWeights {
    pub stone_count: f64,
    pub center_control: f64,
    pub mobility: f64,
    pub captures: f64,
    pub positioning: f64,
    pub safety: f64,
}

impl Default for EvalWeights {
    fn default() -> Self {
        Self::uniform(1.0)
    }
}

impl EvalWeights {
    pub const fn uniform(value: f64) -> Self {
        Self {
            stone_count: value,
            center_control: value,
            mobility: value,
            captures: value,
            positioning: value,
            safety: value,
        }
    }

    /// Component-wise product.
    #[must_use]
    pub fn scaled(self, scale: &Self) -> Self {
        Self {
            stone_count: self.stone_count * scale.stone_count,
            center_control: self.center_control * scale.center_control,
            mobility: self.mobility * scale.mobility,
            captures: self.captures * scale.captures,
            positioning: self.positioning * scale.positioning,
            safety: self.safety * scale.safety,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Beginner,
    Easy,
    Medium,
    Hard,
    Expert,
}

impl Difficulty {
    pub const ALL: [Self; 5] = [
        Self::Beginner,
        Self::Easy,
        Self::Medium,
        Self::Hard,
        Self::Expert,
    ];

    /// Beginner and Easy.
    pub const fn is_weak(self) -> bool {
        matches!(self, Self::Beginner | Self::Easy)
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Beginner => "beginner",
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
            Self::Expert => "expert",
        };
        f.write_str(name)
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|d| d.to_string().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown difficulty '{s}'"))
    }
}

/// Search depth, weights and random-move rate of one difficulty tier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DifficultyProfile {
    pub difficulty: Difficulty,
    pub depth: u8,
    pub weights: EvalWeights,
    /// Chance of playing a uniformly random legal action instead of searching.
    pub random_move_probability: f64,
}

impl DifficultyProfile {
    #[allow(clippy::match_same_arms)]
    pub const fn base(difficulty: Difficulty) -> Self {
        let (depth, weights, random_move_probability) = match difficulty {
            Difficulty::Beginner => (1, [10.0, 2.0, 0.5, 5.0, 0.1, 0.1], 0.6),
            Difficulty::Easy => (2, [10.0, 3.0, 1.0, 8.0, 0.2, 0.2], 0.3),
            Difficulty::Medium => (3, [12.0, 4.0, 1.5, 10.0, 0.3, 0.4], 0.0),
            Difficulty::Hard => (4, [15.0, 5.0, 2.0, 12.0, 0.4, 0.6], 0.0),
            Difficulty::Expert => (5, [18.0, 6.0, 2.5, 15.0, 0.5, 0.8], 0.0),
        };
        let [stone_count, center_control, mobility, captures, positioning, safety] = weights;
        Self {
            difficulty,
            depth,
            weights: EvalWeights {
                stone_count,
                center_control,
                mobility,
                captures,
                positioning,
                safety,
            },
            random_move_probability,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Wall-clock budget per search; `None` searches to full depth.
    pub time_budget_ms: Option<u64>,
    /// Depth used by `top_moves`.
    pub analysis_depth: u8,
    /// Seed for the random-move override; `None` seeds from the OS.
    pub seed: Option<u64>,
    pub weight_scale: EvalWeights,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            time_budget_ms: Some(2000),
            analysis_depth: 5,
            seed: None,
            weight_scale: EvalWeights::default(),
        }
    }
}

#[derive(Deserialize)]
struct EngineConfigJson {
    stone_count: Option<f32>,
    center_control: Option<f32>,
    mobility: Option<f32>,
    captures: Option<f32>,
    positioning: Option<f32>,
    safety: Option<f32>,

    time_budget_ms: Option<u64>,
    analysis_depth: Option<u8>,
    seed: Option<u64>,
}

impl EngineConfig {
    /// Reads a tuning file whose weight entries are scale factors over the
    /// built-in tiers. Missing entries keep their defaults.
    pub fn load_from_json(json_str: &str) -> Result<Self, serde_json::Error> {
        let json_config: EngineConfigJson = serde_json::from_str(json_str)?;
        let default = Self::default();
        let scale = default.weight_scale;

        Ok(Self {
            time_budget_ms: json_config.time_budget_ms.or(default.time_budget_ms),
            analysis_depth: json_config.analysis_depth.unwrap_or(default.analysis_depth),
            seed: json_config.seed,
            weight_scale: EvalWeights {
                stone_count: apply_scale(scale.stone_count, json_config.stone_count),
                center_control: apply_scale(scale.center_control, json_config.center_control),
                mobility: apply_scale(scale.mobility, json_config.mobility),
                captures: apply_scale(scale.captures, json_config.captures),
                positioning: apply_scale(scale.positioning, json_config.positioning),
                safety: apply_scale(scale.safety, json_config.safety),
            },
        })
    }

    /// The tier's profile with this config's weight scale applied.
    pub fn profile(&self, difficulty: Difficulty) -> DifficultyProfile {
        let base = DifficultyProfile::base(difficulty);
        DifficultyProfile {
            weights: base.weights.scaled(&self.weight_scale),
            ..base
        }
    }
}

fn apply_scale(default_val: f64, scale: Option<f32>) -> f64 {
    scale.map_or(default_val, |s| default_val * f64::from(s))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Controller {
    Human,
    Ai(Difficulty),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerConfig {
    pub light: Controller,
    pub dark: Controller,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            light: Controller::Human,
            dark: Controller::Ai(Difficulty::Medium),
        }
    }
}

impl PlayerConfig {
    pub const fn controller(&self, player: Player) -> Controller {
        match player {
            Player::Light => self.light,
            Player::Dark => self.dark,
        }
    }
}

/// Whether the player the game is waiting on is driven by the engine.
pub const fn is_ai_controlled(state: &GameState, players: &PlayerConfig) -> bool {
    matches!(players.controller(state.acting_player()), Controller::Ai(_))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::variants::VariantFlags;

    #[test]
    fn test_load_config_default() {
        let config = EngineConfig::load_from_json("{}").unwrap();
        assert_eq!(config.time_budget_ms, Some(2000));
        assert_eq!(config.analysis_depth, 5);
        assert_eq!(config.weight_scale, EvalWeights::uniform(1.0));
    }

    #[test]
    fn test_load_config_scaled() {
        let json = r#"{
            "stone_count": 1.5,
            "mobility": 0.5,
            "analysis_depth": 3
        }"#;
        let config = EngineConfig::load_from_json(json).unwrap();
        assert!((config.weight_scale.stone_count - 1.5).abs() < 1e-9);
        assert!((config.weight_scale.mobility - 0.5).abs() < 1e-9);
        assert!((config.weight_scale.safety - 1.0).abs() < 1e-9);
        assert_eq!(config.analysis_depth, 3);

        let hard = config.profile(Difficulty::Hard);
        assert!((hard.weights.stone_count - 22.5).abs() < 1e-9);
        assert!((hard.weights.mobility - 1.0).abs() < 1e-9);
        assert_eq!(hard.depth, 4);
    }

    #[test]
    fn test_load_config_invalid_json() {
        assert!(EngineConfig::load_from_json("{ invalid json }").is_err());
    }

    #[test]
    fn test_deserialize_absolute_config() {
        let json = r#"{
            "time_budget_ms": null,
            "weight_scale": { "captures": 2.0 }
        }"#;
        let config: EngineConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.time_budget_ms, None);
        assert!((config.weight_scale.captures - 2.0).abs() < 1e-9);
        assert!((config.weight_scale.positioning - 1.0).abs() < 1e-9);
        assert_eq!(config.analysis_depth, 5);
    }

    #[test]
    fn test_profiles_strengthen_with_difficulty() {
        let profiles = Difficulty::ALL.map(DifficultyProfile::base);
        for pair in profiles.windows(2) {
            assert!(pair[0].depth < pair[1].depth);
            assert!(pair[0].weights.stone_count <= pair[1].weights.stone_count);
        }
        assert!((profiles[0].random_move_probability - 0.6).abs() < 1e-9);
        assert!((profiles[1].random_move_probability - 0.3).abs() < 1e-9);
        assert!(profiles[2..].iter().all(|p| p.random_move_probability == 0.0));
    }

    #[test]
    fn test_difficulty_parsing() {
        assert_eq!("Expert".parse::<Difficulty>(), Ok(Difficulty::Expert));
        assert_eq!(" easy ".parse::<Difficulty>(), Ok(Difficulty::Easy));
        assert!("grandmaster".parse::<Difficulty>().is_err());
    }

    #[test]
    fn test_ai_control_follows_acting_player() {
        let players = PlayerConfig {
            light: Controller::Human,
            dark: Controller::Ai(Difficulty::Hard),
        };
        let state = GameState::new(VariantFlags::default());
        assert!(!is_ai_controlled(&state, &players));

        let mut blockade = state;
        blockade.phase = crate::logic::game::Phase::Blockade {
            blocked: Player::Light,
        };
        assert!(is_ai_controlled(&blockade, &players));
    }
}
