use crate::{Fighter, LootOption, CHARGES_MAX, CHARGES_MIN};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StateError {
    #[error("invalid state: {0}")]
    InvalidState(String),
    #[error("round applied during loot phase")]
    LootPhaseActive,
    #[error("no living enemy at index {0}")]
    NoCurrentEnemy(usize),
}

/// The full observable snapshot of a run. The engine never constructs
/// one of these on its own; hosts hand it a snapshot per decision and
/// search clones it per recursive frame.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunState {
    pub player: Fighter,
    pub enemies: Vec<Fighter>,
    pub current_enemy_index: usize,
    pub loot_phase: bool,
    #[serde(default)]
    pub loot_options: Vec<LootOption>,
    #[serde(default)]
    pub total_rooms: Option<u32>,
    #[serde(default)]
    pub current_room_index: Option<u32>,
}

impl RunState {
    pub fn current_enemy(&self) -> Option<&Fighter> {
        self.enemies.get(self.current_enemy_index)
    }

    pub fn current_enemy_mut(&mut self) -> Option<&mut Fighter> {
        self.enemies.get_mut(self.current_enemy_index)
    }

    pub fn is_terminal(&self) -> bool {
        !self.player.is_alive() || self.current_enemy_index >= self.enemies.len()
    }

    /// Rooms still ahead of the player, when the host supplied room
    /// bookkeeping. Used only by tiebreak heuristics.
    pub fn remaining_rooms(&self) -> u32 {
        match (self.total_rooms, self.current_room_index) {
            (Some(total), Some(index)) => total.saturating_sub(index),
            _ => 0,
        }
    }

    /// Checks the input invariants. The engine rejects bad snapshots
    /// instead of clamping them.
    pub fn validate(&self) -> Result<(), StateError> {
        validate_fighter(&self.player, "player")?;
        for (index, enemy) in self.enemies.iter().enumerate() {
            validate_fighter(enemy, &format!("enemy[{index}]"))?;
        }
        Ok(())
    }
}

fn validate_fighter(fighter: &Fighter, who: &str) -> Result<(), StateError> {
    for (gauge, name) in [(fighter.health, "health"), (fighter.armor, "armor")] {
        if gauge.current < 0 || gauge.max < 0 || gauge.current > gauge.max {
            return Err(StateError::InvalidState(format!(
                "{who}.{name} out of range: {}/{}",
                gauge.current, gauge.max
            )));
        }
    }
    for mv in crate::Move::ALL {
        let stat = fighter.stat(mv);
        if stat.charges < CHARGES_MIN || stat.charges > CHARGES_MAX {
            return Err(StateError::InvalidState(format!(
                "{who}.{} charges out of range: {}",
                mv.short_name(),
                stat.charges
            )));
        }
        if stat.atk < 0 || stat.def < 0 {
            return Err(StateError::InvalidState(format!(
                "{who}.{} has negative stats",
                mv.short_name()
            )));
        }
    }
    Ok(())
}
