use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Expectimax search depth in rounds.
    pub horizon: u32,
    /// Rounds simulated by the greedy loot forecast.
    pub micro_rounds: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            horizon: 6,
            micro_rounds: 3,
        }
    }
}

/// Calibrated evaluator weights. Survival dominates progress, progress
/// dominates aggression, aggression dominates economy, economy
/// dominates threat. The search is tuned against these defaults;
/// change them together or not at all.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EvalWeights {
    pub death_score: f64,
    pub per_cleared_enemy: f64,
    pub enemy_slain_bonus: f64,
    pub slain_health_factor: f64,
    pub health: f64,
    pub armor: f64,
    pub empty_armor_penalty: f64,
    pub damage_dealt: f64,
    pub charge_empty_penalty: f64,
    pub charge_one_bonus: f64,
    pub charge_two_bonus: f64,
    pub charge_full_bonus: f64,
    pub stat_investment: f64,
    pub threat_per_atk: f64,
    pub low_hp_threshold: f64,
    pub low_hp_scale: f64,
}

impl Default for EvalWeights {
    fn default() -> Self {
        Self {
            death_score: -1_000_000.0,
            per_cleared_enemy: 20_000.0,
            enemy_slain_bonus: 35_000.0,
            slain_health_factor: 250.0,
            health: 300.0,
            armor: 120.0,
            empty_armor_penalty: 800.0,
            damage_dealt: 80.0,
            charge_empty_penalty: 120.0,
            charge_one_bonus: 35.0,
            charge_two_bonus: 60.0,
            charge_full_bonus: 90.0,
            stat_investment: 30.0,
            threat_per_atk: 25.0,
            low_hp_threshold: 0.35,
            low_hp_scale: 2_000.0,
        }
    }
}

/// Loot valuator weights: preference bias magnitudes, the micro-sim
/// deltas, and the heal guard rails.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LootWeights {
    pub weapon_bias: f64,
    pub stat_bias: f64,
    pub heal_bias: f64,
    pub charge_bias: f64,
    /// Build preference multiplier for scissor-flavored loot.
    pub scissor_build_multiplier: f64,
    /// Applied on top of the weapon bias for +1-power trinkets.
    pub minor_upgrade_multiplier: f64,
    pub ttk_weight: f64,
    pub survival_weight: f64,
    /// A heal at this health ratio or above is nearly worthless.
    pub near_full_threshold: f64,
    pub near_full_penalty: f64,
    /// Returned for a heal with no missing health; beyond any real score.
    pub full_heal_sentinel: f64,
    /// Replacement for non-finite scores.
    pub non_finite_sentinel: f64,
    pub future_floor_step: f64,
    pub future_floor_cap: f64,
}

impl Default for LootWeights {
    fn default() -> Self {
        Self {
            weapon_bias: 50.0,
            stat_bias: 40.0,
            heal_bias: 30.0,
            charge_bias: 40.0,
            scissor_build_multiplier: 0.7,
            minor_upgrade_multiplier: 0.35,
            ttk_weight: 1_200.0,
            survival_weight: 4_000.0,
            near_full_threshold: 0.9,
            near_full_penalty: -50_000.0,
            full_heal_sentinel: -1.0e9,
            non_finite_sentinel: -1.0e12,
            future_floor_step: 0.05,
            future_floor_cap: 0.4,
        }
    }
}
