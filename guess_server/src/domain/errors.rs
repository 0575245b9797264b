use super::rules::{MAX_NUM, MIN_NUM};
use thiserror::Error;

// Domain-level errors for game workflows.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("Invalid number: Choose a number between {min} - {max}", min = MIN_NUM, max = MAX_NUM)]
    InvalidNumber,
    #[error("Invalid name: There is already a player here with that name")]
    NameInUse,
    #[error("Invalid action: Not enough players in the game")]
    NotEnoughPlayers,
    #[error("Invalid action: Game is in progress")]
    InProgress,
    #[error("Invalid action: Game is complete")]
    GameComplete,
    #[error("Invalid state: No single winner nominated")]
    NoSingleWinner,
    #[error("Invalid action: Game has been cancelled")]
    Cancelled,
}
