use crate::{
    evaluate_with, pick_combat_with, score_loot_with, Action, EngineConfig, EngineError,
    EvalWeights, LootWeights, SearchOutcome,
};
use delve_core::{Event, EventBus, LootOption, RunState};

/// One decision engine: configuration plus the calibrated weight sets.
/// Pure and synchronous; every entry point takes a snapshot and
/// returns without touching shared state.
#[derive(Debug, Clone, Copy, Default)]
pub struct Engine {
    pub config: EngineConfig,
    pub eval_weights: EvalWeights,
    pub loot_weights: LootWeights,
}

impl Engine {
    pub fn new(config: EngineConfig, eval_weights: EvalWeights, loot_weights: LootWeights) -> Self {
        Self {
            config,
            eval_weights,
            loot_weights,
        }
    }

    pub fn evaluate(&self, state: &RunState) -> f64 {
        evaluate_with(state, &self.eval_weights)
    }

    pub fn score_loot(&self, state: &RunState, loot: &LootOption) -> f64 {
        score_loot_with(
            state,
            loot,
            &self.config,
            &self.eval_weights,
            &self.loot_weights,
        )
    }

    pub fn pick_combat(&self, state: &RunState) -> SearchOutcome {
        pick_combat_with(state, &self.config, &self.eval_weights)
    }

    /// Scores every offer in order; ties keep the lowest index.
    /// `None` only when there are no offers.
    pub fn pick_loot(&self, state: &RunState) -> Option<(usize, f64)> {
        let mut best: Option<(usize, f64)> = None;
        for (index, option) in state.loot_options.iter().enumerate() {
            let score = self.score_loot(state, option);
            if best.map_or(true, |(_, best_score)| score > best_score) {
                best = Some((index, score));
            }
        }
        best
    }

    /// The next action for this snapshot: a loot pick while the loot
    /// phase is open, otherwise the searched combat move (rock when
    /// nothing is legal or the run is already over).
    pub fn decide(&self, state: &RunState, events: &mut EventBus) -> Result<Action, EngineError> {
        state.validate()?;

        if state.loot_phase {
            let (index, score) = self.pick_loot(state).ok_or(EngineError::NoLegalAction)?;
            events.push(Event::LootDecided {
                index,
                score,
                considered: state.loot_options.len(),
            });
            return Ok(Action::PickLoot(index));
        }

        let outcome = self.pick_combat(state);
        let action = Action::from_move(outcome.chosen);
        events.push(Event::CombatDecided {
            action: action.short_label(),
            value: outcome.value,
            explored: outcome.stats.explored,
            cache_hits: outcome.stats.cache_hits,
        });
        Ok(action)
    }
}

/// `decide` with the calibrated defaults and a throwaway event sink.
pub fn decide(state: &RunState) -> Result<Action, EngineError> {
    Engine::default().decide(state, &mut EventBus::default())
}
