use delve_core::Move;
use serde::{Deserialize, Serialize};

/// What the engine tells the host to do next: play one of the three
/// combat moves, or take the i-th loot offer.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Action {
    MoveRock,
    MovePaper,
    MoveScissor,
    PickLoot(usize),
}

impl Action {
    pub fn from_move(mv: Move) -> Self {
        match mv {
            Move::Rock => Action::MoveRock,
            Move::Paper => Action::MovePaper,
            Move::Scissor => Action::MoveScissor,
        }
    }

    pub fn as_move(self) -> Option<Move> {
        match self {
            Action::MoveRock => Some(Move::Rock),
            Action::MovePaper => Some(Move::Paper),
            Action::MoveScissor => Some(Move::Scissor),
            Action::PickLoot(_) => None,
        }
    }

    pub fn stable_key(&self) -> String {
        match self {
            Action::MoveRock => "move:rock".to_string(),
            Action::MovePaper => "move:paper".to_string(),
            Action::MoveScissor => "move:scissor".to_string(),
            Action::PickLoot(index) => format!("loot:{index}"),
        }
    }

    pub fn short_label(&self) -> String {
        match self {
            Action::MoveRock => "rock".to_string(),
            Action::MovePaper => "paper".to_string(),
            Action::MoveScissor => "scissor".to_string(),
            Action::PickLoot(index) => format!("loot {index}"),
        }
    }
}
