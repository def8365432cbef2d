//! Core game model. Keep this crate free of IO and platform concerns.

pub mod combat;
pub mod events;
pub mod fighter;
pub mod loot;
pub mod state;

pub use combat::*;
pub use events::*;
pub use fighter::*;
pub use loot::*;
pub use state::*;
