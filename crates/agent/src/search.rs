use crate::{evaluate_with, EngineConfig, EvalWeights};
use delve_core::{Fighter, Move, RunState};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt::Write as _;

/// Any child value below this is the evaluator's death sentinel
/// leaking up the tree; the branch holding it is certain death.
const LETHAL_THRESHOLD: f64 = -900_000.0;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SearchStats {
    pub explored: usize,
    pub cache_hits: usize,
    pub horizon: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchOutcome {
    pub chosen: Move,
    pub value: f64,
    /// Expectimax value of every legal root move, in exploration order.
    pub root_values: Vec<(Move, f64)>,
    pub stats: SearchStats,
}

/// Root-best combat move with the calibrated defaults.
pub fn pick_combat(state: &RunState) -> SearchOutcome {
    pick_combat_with(state, &EngineConfig::default(), &EvalWeights::default())
}

/// Expectimax over the combat kernel: the player maximizes, the enemy
/// is a uniform distribution over its legal moves, and any branch that
/// can reach certain death collapses to its worst lethal child instead
/// of the probability-weighted mean. Terminal snapshots (run over, no
/// legal move) fall back to rock with their evaluator score.
pub fn pick_combat_with(
    state: &RunState,
    config: &EngineConfig,
    weights: &EvalWeights,
) -> SearchOutcome {
    let mut root = state.clone();
    root.advance_fallen_enemy();

    let mut ctx = SearchCtx {
        weights,
        memo: HashMap::new(),
        explored: 0,
        cache_hits: 0,
    };
    let horizon = config.horizon.max(1);

    let legal = root.player.usable_moves();
    let (chosen, value, root_values) = if root.is_terminal() || legal.is_empty() {
        (Move::Rock, evaluate_with(&root, weights), Vec::new())
    } else {
        let scored = action_values(&root, &legal, horizon, &mut ctx);
        let (mv, value) = best_of(&scored).unwrap_or((Move::Rock, evaluate_with(&root, weights)));
        (mv, value, scored)
    };

    SearchOutcome {
        chosen,
        value,
        root_values,
        stats: SearchStats {
            explored: ctx.explored,
            cache_hits: ctx.cache_hits,
            horizon,
        },
    }
}

struct SearchCtx<'a> {
    weights: &'a EvalWeights,
    memo: HashMap<String, (Option<Move>, f64)>,
    explored: usize,
    cache_hits: usize,
}

fn search(state: &RunState, depth: u32, ctx: &mut SearchCtx<'_>) -> (Option<Move>, f64) {
    if depth == 0 || state.player.health.current == 0 || state.is_terminal() {
        return (None, evaluate_with(state, ctx.weights));
    }

    let key = canonical_key(state, depth);
    if let Some(hit) = ctx.memo.get(&key) {
        ctx.cache_hits += 1;
        return *hit;
    }
    ctx.explored += 1;

    let legal = state.player.usable_moves();
    let result = if legal.is_empty() {
        (Some(Move::Rock), evaluate_with(state, ctx.weights))
    } else {
        let scored = action_values(state, &legal, depth, ctx);
        match best_of(&scored) {
            Some((mv, value)) => (Some(mv), value),
            None => (None, evaluate_with(state, ctx.weights)),
        }
    };
    ctx.memo.insert(key, result);
    result
}

/// Values each legal player move at this node: children one level
/// deeper, uniform over the enemy's replies, lethal children collapse
/// the whole move to its worst such child.
fn action_values(
    state: &RunState,
    legal: &[Move],
    depth: u32,
    ctx: &mut SearchCtx<'_>,
) -> Vec<(Move, f64)> {
    let mut enemy_moves = state.enemies[state.current_enemy_index].usable_moves();
    if enemy_moves.is_empty() {
        enemy_moves.push(Move::Rock);
    }
    let probability = 1.0 / enemy_moves.len() as f64;

    let mut scored = Vec::with_capacity(legal.len());
    for &action in legal {
        let mut mean = 0.0;
        let mut worst_lethal = f64::INFINITY;
        let mut lethal = false;

        for &reply in &enemy_moves {
            let mut child = state.clone();
            if child.apply_round(action, reply).is_err() {
                continue;
            }
            child.advance_fallen_enemy();
            let (_, value) = search(&child, depth - 1, ctx);
            if value < LETHAL_THRESHOLD {
                lethal = true;
                worst_lethal = worst_lethal.min(value);
            } else {
                mean += value * probability;
            }
        }

        scored.push((action, if lethal { worst_lethal } else { mean }));
    }
    scored
}

/// Strict comparison keeps the earliest move on ties.
fn best_of(scored: &[(Move, f64)]) -> Option<(Move, f64)> {
    let mut best: Option<(Move, f64)> = None;
    for &(mv, value) in scored {
        if best.map_or(true, |(_, best_value)| value > best_value) {
            best = Some((mv, value));
        }
    }
    best
}

/// Stable fingerprint for memoization: depth, enemy index, and the
/// full combat-relevant state of the player and the current enemy.
/// Dead-enemy states collapse to a shorter terminal form.
pub fn canonical_key(state: &RunState, depth: u32) -> String {
    let mut key = String::with_capacity(96);
    let _ = write!(key, "d{depth}:i{}", state.current_enemy_index);
    match state.current_enemy() {
        Some(enemy) if enemy.is_alive() => {
            push_fighter(&mut key, &state.player);
            push_fighter(&mut key, enemy);
        }
        _ => {
            let _ = write!(key, ":end:{:.1}", state.player.health.current as f64);
        }
    }
    key
}

fn push_fighter(key: &mut String, fighter: &Fighter) {
    let _ = write!(
        key,
        "|{:.1},{}",
        fighter.health.current as f64, fighter.armor.current
    );
    for mv in Move::ALL {
        let stat = fighter.stat(mv);
        let _ = write!(key, ",{}:{}:{}", stat.charges, stat.atk, stat.def);
    }
}
