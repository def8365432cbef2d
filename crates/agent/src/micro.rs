use delve_core::{Fighter, Move, RunState};

/// Result of a short greedy forecast: how fast the enemy the sim
/// started against went down, and whether the player was still
/// standing at the end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MicroOutcome {
    /// Round number the starting enemy died on; `rounds + 1` when it
    /// survived the whole forecast.
    pub rounds_to_kill: u32,
    pub player_alive: bool,
}

/// The deterministic forecast policy: the legal move with the highest
/// atk, ties broken in enumeration order, rock when nothing is legal.
pub fn greedy_move(fighter: &Fighter) -> Move {
    let mut best: Option<Move> = None;
    for mv in Move::ALL {
        let stat = fighter.stat(mv);
        if !stat.usable() {
            continue;
        }
        match best {
            Some(current) if fighter.stat(current).atk >= stat.atk => {}
            _ => best = Some(mv),
        }
    }
    best.unwrap_or(Move::Rock)
}

/// Plays `rounds` rounds with both sides on the greedy policy,
/// advancing past kills. Used to estimate the marginal combat value of
/// a loot offer, so it runs on a scratch clone with loot phase lifted.
pub fn greedy_forecast(state: &RunState, rounds: u32) -> MicroOutcome {
    let mut sim = state.clone();
    sim.loot_phase = false;
    sim.advance_fallen_enemy();

    let target_index = sim.current_enemy_index;
    let mut rounds_to_kill = rounds + 1;

    for round in 1..=rounds {
        if sim.is_terminal() {
            break;
        }
        let player_move = greedy_move(&sim.player);
        let enemy_move = sim
            .current_enemy()
            .map(greedy_move)
            .unwrap_or(Move::Rock);
        if sim.apply_round(player_move, enemy_move).is_err() {
            break;
        }
        sim.advance_fallen_enemy();
        if rounds_to_kill > rounds && sim.current_enemy_index > target_index {
            rounds_to_kill = round;
        }
    }

    MicroOutcome {
        rounds_to_kill,
        player_alive: sim.player.is_alive(),
    }
}
