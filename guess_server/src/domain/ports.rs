use crate::domain::errors::GameError;
use crate::domain::state::{GamePlayer, GameSnapshot, GameState, Player, RoundResult};

// Port for the source of drawn numbers.
pub trait NumberGenerator: Send {
    fn next(&mut self) -> i32;
}

// Port the engine drives a game through. The engine loop is the only caller,
// so implementations need no interior locking.
pub trait GameOps: Send {
    fn state(&self) -> GameState;
    fn get_ready(&mut self) -> Result<(), GameError>;
    fn start(&mut self) -> Result<(), GameError>;
    fn play_round(&mut self) -> Result<(), GameError>;
    fn nominate_winner(&mut self) -> Result<GamePlayer, GameError>;
    fn reset(&mut self) -> Result<(), GameError>;
    fn register_player(&mut self, player: &Player) -> Result<(), GameError>;
    fn check_player_exists(&self, name: &str) -> Result<(), GameError>;
    fn cancel(&mut self);
    fn add_waiting_players(&mut self) -> Result<Vec<GamePlayer>, GameError>;
    fn round_result(&self) -> RoundResult;
    fn snapshot(&self) -> GameSnapshot;
}
