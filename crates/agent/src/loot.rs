use crate::{evaluate_with, greedy_forecast, EngineConfig, EvalWeights, LootWeights};
use delve_core::{Fighter, LootOption, Move, RunState};

/// Projected value of accepting `loot` now, with the calibrated
/// default weights. Higher is better; see `score_loot_with`.
pub fn score_loot(state: &RunState, loot: &LootOption) -> f64 {
    score_loot_with(
        state,
        loot,
        &EngineConfig::default(),
        &EvalWeights::default(),
        &LootWeights::default(),
    )
}

/// Combines three signals: the evaluator delta from applying the loot,
/// a soft build-preference bias, and a short greedy forecast of the
/// fight with and without the boon. Heals carry guard rails (a heal at
/// full health is worse than anything else on the table), and the
/// result is scaled up slightly while many rooms remain.
pub fn score_loot_with(
    state: &RunState,
    loot: &LootOption,
    config: &EngineConfig,
    eval_weights: &EvalWeights,
    weights: &LootWeights,
) -> f64 {
    if matches!(loot, LootOption::Unknown) {
        return 0.0;
    }

    if let LootOption::Heal(_) = loot {
        if state.player.health.missing() < 1 {
            return weights.full_heal_sentinel;
        }
        if state.player.health.ratio() > weights.near_full_threshold {
            return weights.near_full_penalty;
        }
    }

    let mut boosted_state = state.clone();
    boosted_state.apply_loot(loot);

    let mut score = evaluate_with(&boosted_state, eval_weights) - evaluate_with(state, eval_weights);
    score += preference_bias(&state.player, loot, weights);

    let base = greedy_forecast(state, config.micro_rounds);
    let boosted = greedy_forecast(&boosted_state, config.micro_rounds);
    let delta_ttk = boosted.rounds_to_kill as f64 - base.rounds_to_kill as f64;
    let delta_survival = (boosted.player_alive as i8 - base.player_alive as i8) as f64;
    score += -weights.ttk_weight * delta_ttk + weights.survival_weight * delta_survival;

    let remaining = state.remaining_rooms() as f64;
    score *= 1.0 + (remaining * weights.future_floor_step).min(weights.future_floor_cap);

    if score.is_finite() {
        score
    } else {
        weights.non_finite_sentinel
    }
}

/// Normalized per-weapon desirability: `atk · clamp(charges, 1, 3) +
/// def / 2`, scaled by the strongest weapon so the best sits at 1.
fn weapon_preferences(player: &Fighter) -> [f64; 3] {
    let mut raw = [0.0f64; 3];
    for (slot, mv) in Move::ALL.into_iter().enumerate() {
        let stat = player.stat(mv);
        let charges = (stat.charges as f64).clamp(1.0, 3.0);
        raw[slot] = stat.atk as f64 * charges + stat.def as f64 * 0.5;
    }
    let top = raw.iter().copied().fold(0.0f64, f64::max);
    if top > 0.0 {
        for value in &mut raw {
            *value /= top;
        }
    }
    raw
}

fn preference_bias(player: &Fighter, loot: &LootOption, weights: &LootWeights) -> f64 {
    match *loot {
        LootOption::Heal(_) => weights.heal_bias * (1.0 - player.health.ratio()),
        LootOption::AddMaxHealth(_) => weights.stat_bias * (1.0 - player.health.ratio()),
        LootOption::AddMaxArmor(_) => {
            let armor_pref = player.armor.current as f64 / player.armor.max.max(1) as f64;
            weights.stat_bias * armor_pref
        }
        LootOption::GrantCharges { .. } => {
            let filled = (player.total_positive_charges() as f64 / 9.0).min(1.0);
            weights.charge_bias * (1.0 - filled)
        }
        LootOption::UpgradeRock(atk, def)
        | LootOption::UpgradePaper(atk, def)
        | LootOption::UpgradeScissor(atk, def) => {
            let mv = loot.upgraded_move().unwrap_or(Move::Rock);
            let slot = Move::ALL.iter().position(|m| *m == mv).unwrap_or(0);
            let mut pref = weapon_preferences(player)[slot];
            if mv == Move::Scissor {
                pref *= weights.scissor_build_multiplier;
            }
            // Quadratic in granted power: a +2 trinket is worth far
            // more than two +1 trinkets, and bare +1s are further
            // de-preferenced.
            let power = atk as f64 + def as f64 * 0.5;
            let mut bias = weights.weapon_bias * pref * (power * power) / 4.0;
            if atk + def <= 1 {
                bias *= weights.minor_upgrade_multiplier;
            }
            bias
        }
        LootOption::Unknown => 0.0,
    }
}
