// Use-case level inputs/outputs for the engine loop.

use crate::domain::{GamePlayer, GameSnapshot, Player, RoundResult};
use std::time::Duration;
use tokio::sync::oneshot;

/// External requests the engine serializes with its tick processing.
#[derive(Debug)]
pub enum Action {
    JoinGame {
        player: Player,
        reply: oneshot::Sender<ActionResponse>,
    },
    ObserveGame {
        reply: oneshot::Sender<GameSnapshot>,
    },
}

/// Result of an action returned to the original caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionResponse {
    pub success: bool,
    // Empty on success.
    pub message: String,
}

impl ActionResponse {
    pub fn ok() -> Self {
        Self {
            success: true,
            message: String::new(),
        }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// Everything the engine tells the outside world.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    PlayerJoined(Vec<GamePlayer>),
    PlayerLeft(GamePlayer),
    PlayedRound(RoundResult),
    GameCreated(GameSnapshot),
    GameStarted(u32),
    GameCompleted(GamePlayer),
    GameReady,
    GameWaiting,
    CountdownStarted(u32),
    CountingDown(u32),
    GameReset(GameSnapshot),
    PlayerRegistered(GameSnapshot),
}

impl Event {
    /// Human-readable tag used on the wire and in logs.
    pub fn label(&self) -> &'static str {
        match self {
            Event::PlayerJoined(_) => "Player Joined",
            Event::PlayerLeft(_) => "Player Left",
            Event::PlayedRound(_) => "Played Round",
            Event::GameCreated(_) => "Game Created",
            Event::GameStarted(_) => "Game Started",
            Event::GameCompleted(_) => "Game Completed",
            Event::GameReady => "Game Ready",
            Event::GameWaiting => "Game Waiting",
            Event::CountdownStarted(_) => "Countdown Started",
            Event::CountingDown(_) => "Counting Down",
            Event::GameReset(_) => "Game Reset",
            Event::PlayerRegistered(_) => "Player Registered",
        }
    }
}

/// Parameters that alter the behavior of the engine.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub tick_interval: Duration,
    // Countdown length in ticks before a ready game starts.
    pub waiting_count: u32,
    // Ticks come from `EngineHandle::tick` instead of a timer.
    pub manual_run: bool,
    pub action_capacity: usize,
    // Small on purpose: the engine should not run ahead of the broadcaster.
    pub event_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_secs(1),
            waiting_count: 10,
            manual_run: false,
            action_capacity: 64,
            event_capacity: 1,
        }
    }
}
