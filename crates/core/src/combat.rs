use crate::{Fighter, Move, RunState, StateError, CHARGES_MAX};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum RoundResult {
    PlayerWin,
    EnemyWin,
    Tie,
}

/// Classifies one simultaneous exchange.
pub fn duel(player: Move, enemy: Move) -> RoundResult {
    if player == enemy {
        RoundResult::Tie
    } else if player.beats(enemy) {
        RoundResult::PlayerWin
    } else {
        RoundResult::EnemyWin
    }
}

/// What one round did, for traces and tests. The state itself carries
/// the authoritative outcome.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RoundReport {
    pub result: RoundResult,
    pub player_health_lost: i64,
    pub enemy_health_lost: i64,
}

impl RunState {
    /// Advances exactly one round against the current enemy.
    ///
    /// Resolution order: classify, compute damage and armor gain from
    /// the used move of each side, apply per fighter (absorption
    /// against round-start armor, health floored at zero, then the def
    /// gain clamped to max armor), finally update charges on both
    /// sides. The caller advances the enemy index afterwards; the
    /// kernel stays single-step.
    pub fn apply_round(
        &mut self,
        player_move: Move,
        enemy_move: Move,
    ) -> Result<RoundReport, StateError> {
        if self.loot_phase {
            return Err(StateError::LootPhaseActive);
        }
        let index = self.current_enemy_index;
        if !self.current_enemy().is_some_and(Fighter::is_alive) {
            return Err(StateError::NoCurrentEnemy(index));
        }

        let result = duel(player_move, enemy_move);
        let player_stat = *self.player.stat(player_move);
        let enemy_stat = *self.enemies[index].stat(enemy_move);

        // (incoming damage, armor gain) per side.
        let (player_hit, player_gain, enemy_hit, enemy_gain) = match result {
            RoundResult::Tie => (enemy_stat.atk, player_stat.def, player_stat.atk, enemy_stat.def),
            RoundResult::PlayerWin => (0, player_stat.def, player_stat.atk, 0),
            RoundResult::EnemyWin => (enemy_stat.atk, 0, 0, enemy_stat.def),
        };

        let player_health_lost = settle(&mut self.player, player_gain, player_hit);
        let enemy_health_lost = settle(&mut self.enemies[index], enemy_gain, enemy_hit);

        update_charges(&mut self.player, player_move);
        update_charges(&mut self.enemies[index], enemy_move);

        Ok(RoundReport {
            result,
            player_health_lost,
            enemy_health_lost,
        })
    }

    /// Post-round advancement: steps past the current enemy once its
    /// health reaches zero. Returns whether an advance happened.
    pub fn advance_fallen_enemy(&mut self) -> bool {
        match self.current_enemy() {
            Some(enemy) if !enemy.is_alive() => {
                self.current_enemy_index += 1;
                true
            }
            _ => false,
        }
    }
}

/// Absorption runs against the armor the fighter brought into the
/// round; the def gain lands afterwards and shields the next exchange.
/// Returns health lost.
fn settle(fighter: &mut Fighter, armor_gain: i64, incoming: i64) -> i64 {
    let absorbed = fighter.armor.deplete(incoming);
    let lost = fighter.health.deplete(incoming - absorbed);
    fighter.armor.gain(armor_gain);
    lost
}

/// The used move spends a charge (1 drops to the -1 cooldown); the two
/// unused moves regenerate (-1 wakes to 0, otherwise +1 up to the cap).
fn update_charges(fighter: &mut Fighter, used: Move) {
    for mv in Move::ALL {
        let stat = fighter.stat_mut(mv);
        if mv == used {
            if stat.charges > 1 {
                stat.charges -= 1;
            } else if stat.charges == 1 {
                stat.charges = -1;
            }
        } else if stat.charges == -1 {
            stat.charges = 0;
        } else if stat.charges >= 0 && stat.charges < CHARGES_MAX {
            stat.charges += 1;
        }
    }
}
