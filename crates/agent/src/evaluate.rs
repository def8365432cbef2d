use crate::EvalWeights;
use delve_core::{Move, RunState};

/// Scores a snapshot with the calibrated default weights. Higher is
/// better; a dead player short-circuits to the death sentinel.
pub fn evaluate(state: &RunState) -> f64 {
    evaluate_with(state, &EvalWeights::default())
}

pub fn evaluate_with(state: &RunState, weights: &EvalWeights) -> f64 {
    if state.player.health.current <= 0 {
        return weights.death_score;
    }

    let mut score = weights.per_cleared_enemy * state.current_enemy_index as f64;

    // Branch exit: the current enemy is down (or the run is won), so
    // the remaining terms would only add noise to a settled round.
    let enemy = match state.current_enemy() {
        Some(enemy) if enemy.is_alive() => enemy,
        _ => {
            score += weights.enemy_slain_bonus;
            return score + weights.slain_health_factor * state.player.health.current as f64;
        }
    };

    score += weights.health * state.player.health.current as f64;
    score += weights.armor * state.player.armor.current as f64;
    if state.player.armor.current == 0 {
        score -= weights.empty_armor_penalty;
    }

    score += weights.damage_dealt * (enemy.health.max - enemy.health.current) as f64;

    for mv in Move::ALL {
        let stat = state.player.stat(mv);
        score += match stat.charges {
            c if c <= 0 => -weights.charge_empty_penalty,
            1 => weights.charge_one_bonus,
            2 => weights.charge_two_bonus,
            _ => weights.charge_full_bonus,
        };
        score += weights.stat_investment * (stat.atk + stat.def) as f64;
    }

    for mv in Move::ALL {
        let stat = enemy.stat(mv);
        if stat.usable() {
            score -= weights.threat_per_atk * stat.atk as f64;
        }
    }

    let ratio = state.player.health.ratio();
    if ratio < weights.low_hp_threshold {
        score -= (weights.low_hp_threshold - ratio) * weights.low_hp_scale;
    }

    score
}

#[cfg(test)]
mod tests {
    use super::*;
    use delve_core::{Fighter, Gauge, MoveStat};

    fn fighter(hp: i64, hp_max: i64) -> Fighter {
        Fighter {
            health: Gauge::new(hp, hp_max),
            armor: Gauge::new(2, 5),
            rock: MoveStat::new(4, 0, 2),
            paper: MoveStat::new(2, 2, 1),
            scissor: MoveStat::new(3, 1, 3),
        }
    }

    fn state() -> RunState {
        RunState {
            player: fighter(20, 20),
            enemies: vec![fighter(15, 20)],
            current_enemy_index: 0,
            loot_phase: false,
            loot_options: Vec::new(),
            total_rooms: None,
            current_room_index: None,
        }
    }

    #[test]
    fn dead_player_hits_the_sentinel() {
        let mut s = state();
        s.player.health.current = 0;
        assert_eq!(evaluate(&s), -1_000_000.0);
    }

    #[test]
    fn evaluation_is_deterministic_on_clones() {
        let s = state();
        assert_eq!(evaluate(&s), evaluate(&s.clone()));
    }

    #[test]
    fn slain_enemy_short_circuits_with_health_bonus() {
        let mut s = state();
        s.enemies[0].health.current = 0;
        assert_eq!(evaluate(&s), 35_000.0 + 250.0 * 20.0);
        s.current_enemy_index = 1;
        assert_eq!(evaluate(&s), 20_000.0 + 35_000.0 + 250.0 * 20.0);
    }

    #[test]
    fn term_by_term_matches_the_calibration() {
        let s = state();
        // Health 20, armor 2, enemy damage 5, charges 2/1/3,
        // investment (4+0)+(2+2)+(3+1), threat 4+2+3, no low-hp band.
        let expected = 300.0 * 20.0
            + 120.0 * 2.0
            + 80.0 * 5.0
            + (60.0 + 35.0 + 90.0)
            + 30.0 * 12.0
            - 25.0 * 9.0;
        assert_eq!(evaluate(&s), expected);
    }

    #[test]
    fn empty_armor_and_low_health_are_penalized() {
        let mut s = state();
        s.player.armor.current = 0;
        let base = evaluate(&s);
        let mut low = s.clone();
        low.player.health.current = 4; // ratio 0.2
        let drop = evaluate(&low);
        // 16 health points at 300 each, plus the risk-aversion band.
        assert_eq!(base - drop, 300.0 * 16.0 + (0.35 - 0.2) * 2_000.0);
    }

    #[test]
    fn drained_enemy_moves_do_not_threaten() {
        let mut s = state();
        let with_threat = evaluate(&s);
        s.enemies[0].rock.charges = 0;
        let without = evaluate(&s);
        assert_eq!(without - with_threat, 25.0 * 4.0);
    }
}
