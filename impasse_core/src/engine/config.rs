use crate::engine::TimeBudget;
use crate::logic::eval_constants::{
    DOUBLES_PATHS_MAX, SCORE_WIN, SINGLES_PATHS_MAX, WEIGHT_CHECKERS_COUNT, WEIGHT_DOUBLES,
    WEIGHT_DOUBLES_PATHS, WEIGHT_SINGLES_PATHS,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    // Evaluation Parameters
    pub weight_checkers_count: i32,
    pub weight_doubles: i32,
    pub weight_doubles_paths: i32,
    pub weight_singles_paths: i32,
    pub doubles_paths_max: i32,
    pub singles_paths_max: i32,
    pub score_win: i32,

    // Search Parameters
    pub soft_time_ms: u64,
    pub hard_time_ms: u64,
    pub min_search_depth: u8,
    pub use_tt: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        let budget = TimeBudget::default();
        Self {
            weight_checkers_count: WEIGHT_CHECKERS_COUNT,
            weight_doubles: WEIGHT_DOUBLES,
            weight_doubles_paths: WEIGHT_DOUBLES_PATHS,
            weight_singles_paths: WEIGHT_SINGLES_PATHS,
            doubles_paths_max: DOUBLES_PATHS_MAX,
            singles_paths_max: SINGLES_PATHS_MAX,
            score_win: SCORE_WIN,

            soft_time_ms: budget.soft_ms,
            hard_time_ms: budget.hard_ms,
            min_search_depth: budget.min_depth,
            use_tt: true,
        }
    }
}

/// Tuning file: weights are multipliers of the defaults, everything else
/// is absolute.
#[derive(Deserialize)]
struct EngineConfigJson {
    weight_checkers_count: Option<f32>,
    weight_doubles: Option<f32>,
    weight_doubles_paths: Option<f32>,
    weight_singles_paths: Option<f32>,
    doubles_paths_max: Option<i32>,
    singles_paths_max: Option<i32>,
    score_win: Option<i32>,

    soft_time_ms: Option<u64>,
    hard_time_ms: Option<u64>,
    min_search_depth: Option<u8>,
    use_tt: Option<bool>,
}

impl EngineConfig {
    pub fn load_from_json(json_str: &str) -> Result<Self, serde_json::Error> {
        let json_config: EngineConfigJson = serde_json::from_str(json_str)?;
        let default = Self::default();

        Ok(Self {
            weight_checkers_count: apply_scale(
                default.weight_checkers_count,
                json_config.weight_checkers_count,
            ),
            weight_doubles: apply_scale(default.weight_doubles, json_config.weight_doubles),
            weight_doubles_paths: apply_scale(
                default.weight_doubles_paths,
                json_config.weight_doubles_paths,
            ),
            weight_singles_paths: apply_scale(
                default.weight_singles_paths,
                json_config.weight_singles_paths,
            ),
            doubles_paths_max: json_config
                .doubles_paths_max
                .unwrap_or(default.doubles_paths_max),
            singles_paths_max: json_config
                .singles_paths_max
                .unwrap_or(default.singles_paths_max),
            score_win: json_config.score_win.unwrap_or(default.score_win),

            soft_time_ms: json_config.soft_time_ms.unwrap_or(default.soft_time_ms),
            hard_time_ms: json_config.hard_time_ms.unwrap_or(default.hard_time_ms),
            min_search_depth: json_config
                .min_search_depth
                .unwrap_or(default.min_search_depth),
            use_tt: json_config.use_tt.unwrap_or(default.use_tt),
        })
    }

    pub const fn time_budget(&self) -> TimeBudget {
        TimeBudget {
            soft_ms: self.soft_time_ms,
            hard_ms: self.hard_time_ms,
            min_depth: self.min_search_depth,
        }
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn apply_scale(default_val: i32, scale: Option<f32>) -> i32 {
    scale.map_or(default_val, |s| (default_val as f32 * s) as i32)
}
