// Domain layer: core game types and rules.

pub mod errors;
pub mod game;
pub mod ports;
pub mod rules;
pub mod state;

pub use errors::GameError;
pub use game::Game;
pub use ports::{GameOps, NumberGenerator};
pub use state::{GamePlayer, GameSnapshot, GameState, Player, RoundResult};
