use crate::{Action, Engine, EngineError, SearchStats};
use delve_core::{Event, EventBus, RunState};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Instant;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateScore {
    pub key: String,
    pub score: f64,
}

/// Everything a host needs to explain one decision after the fact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionRecord {
    pub phase: String,
    pub action: Action,
    pub value: f64,
    pub candidates: Vec<CandidateScore>,
    pub search: Option<SearchStats>,
    pub elapsed_ms: u64,
}

impl DecisionRecord {
    pub fn to_text_report(&self) -> String {
        let mut lines = vec![
            format!("phase: {}", self.phase),
            format!(
                "action: {} (value {:.1}, {} ms)",
                self.action.short_label(),
                self.value,
                self.elapsed_ms
            ),
        ];
        if let Some(stats) = &self.search {
            lines.push(format!(
                "search: horizon={} explored={} cache_hits={}",
                stats.horizon, stats.explored, stats.cache_hits
            ));
        }
        if !self.candidates.is_empty() {
            lines.push("candidates:".to_string());
            for candidate in &self.candidates {
                lines.push(format!("  {:<14} {:.1}", candidate.key, candidate.score));
            }
        }
        lines.join("\n")
    }
}

pub fn write_json(path: &Path, record: &DecisionRecord) -> Result<(), std::io::Error> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let body = serde_json::to_string_pretty(record).map_err(std::io::Error::other)?;
    fs::write(path, body)
}

impl Engine {
    /// `decide`, plus a record of what was considered. The plain
    /// `decide` path allocates none of this.
    pub fn decide_traced(
        &self,
        state: &RunState,
        events: &mut EventBus,
    ) -> Result<(Action, DecisionRecord), EngineError> {
        let started_at = Instant::now();
        state.validate()?;

        if state.loot_phase {
            let (index, score) = self.pick_loot(state).ok_or(EngineError::NoLegalAction)?;
            let candidates = state
                .loot_options
                .iter()
                .enumerate()
                .map(|(slot, option)| CandidateScore {
                    key: format!("loot:{slot} {option:?}"),
                    score: self.score_loot(state, option),
                })
                .collect();
            events.push(Event::LootDecided {
                index,
                score,
                considered: state.loot_options.len(),
            });
            let action = Action::PickLoot(index);
            return Ok((
                action,
                DecisionRecord {
                    phase: "loot".to_string(),
                    action,
                    value: score,
                    candidates,
                    search: None,
                    elapsed_ms: started_at.elapsed().as_millis() as u64,
                },
            ));
        }

        let outcome = self.pick_combat(state);
        let action = Action::from_move(outcome.chosen);
        events.push(Event::CombatDecided {
            action: action.short_label(),
            value: outcome.value,
            explored: outcome.stats.explored,
            cache_hits: outcome.stats.cache_hits,
        });
        let candidates = outcome
            .root_values
            .iter()
            .map(|(mv, score)| CandidateScore {
                key: Action::from_move(*mv).stable_key(),
                score: *score,
            })
            .collect();
        Ok((
            action,
            DecisionRecord {
                phase: "combat".to_string(),
                action,
                value: outcome.value,
                candidates,
                search: Some(outcome.stats),
                elapsed_ms: started_at.elapsed().as_millis() as u64,
            },
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use delve_core::{Fighter, Gauge, LootOption, MoveStat};

    fn state() -> RunState {
        let fighter = Fighter {
            health: Gauge::full(30),
            armor: Gauge::new(0, 5),
            rock: MoveStat::new(4, 0, 3),
            paper: MoveStat::new(3, 1, 3),
            scissor: MoveStat::new(5, 0, 3),
        };
        RunState {
            player: fighter.clone(),
            enemies: vec![fighter],
            current_enemy_index: 0,
            loot_phase: false,
            loot_options: Vec::new(),
            total_rooms: None,
            current_room_index: None,
        }
    }

    #[test]
    fn combat_trace_carries_all_root_candidates() {
        let engine = Engine::default();
        let mut events = EventBus::default();
        let (action, record) = engine.decide_traced(&state(), &mut events).unwrap();
        assert_eq!(record.action, action);
        assert_eq!(record.phase, "combat");
        assert_eq!(record.candidates.len(), 3);
        assert!(record.search.is_some());
        assert!(record.to_text_report().contains("candidates:"));
    }

    #[test]
    fn loot_trace_scores_every_offer() {
        let engine = Engine::default();
        let mut events = EventBus::default();
        let mut s = state();
        s.loot_phase = true;
        s.loot_options = vec![LootOption::Heal(10), LootOption::UpgradeRock(2, 0)];
        let (action, record) = engine.decide_traced(&s, &mut events).unwrap();
        assert_eq!(record.phase, "loot");
        assert_eq!(record.candidates.len(), 2);
        if let Action::PickLoot(index) = action {
            assert_eq!(record.value, record.candidates[index].score);
        } else {
            panic!("expected a loot pick, got {action:?}");
        }
    }
}
