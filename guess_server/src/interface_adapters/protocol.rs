// Wire protocol DTOs and conversions for public game server messages.

use crate::domain::{GamePlayer, GameSnapshot, GameState, Player, RoundResult};
use crate::use_cases::Event;
use serde::{Deserialize, Serialize};

/// Body of `POST /join`.
#[derive(Debug, Clone, Deserialize)]
pub struct JoinGameRequest {
    pub name: String,
    pub first: i32,
    pub second: i32,
}

impl From<JoinGameRequest> for Player {
    fn from(request: JoinGameRequest) -> Self {
        Player::new(request.name, request.first, request.second)
    }
}

/// Envelope for every `POST /join` response, success or failure.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct JoinGameResponse {
    pub status: u16,
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
    pub detail: String,
}

/// One event as pushed to subscribers: `{"type": "...", "data": ...}`.
#[derive(Debug, Clone, Serialize)]
pub struct EventMessage {
    #[serde(rename = "type")]
    pub kind: &'static str,
    // Null for events without a payload.
    pub data: Option<EventData>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum EventData {
    Players(Vec<PlayerDto>),
    Player(PlayerDto),
    Round(RoundResultDto),
    Game(GameSnapshotDto),
    Count(u32),
}

impl From<&Event> for EventMessage {
    fn from(event: &Event) -> Self {
        let data = match event {
            Event::PlayerJoined(players) => Some(EventData::Players(
                players.iter().map(PlayerDto::from).collect(),
            )),
            Event::PlayerLeft(player) | Event::GameCompleted(player) => {
                Some(EventData::Player(player.into()))
            }
            Event::PlayedRound(result) => Some(EventData::Round(result.into())),
            Event::GameCreated(snapshot)
            | Event::GameReset(snapshot)
            | Event::PlayerRegistered(snapshot) => Some(EventData::Game(snapshot.into())),
            Event::GameStarted(count)
            | Event::CountdownStarted(count)
            | Event::CountingDown(count) => Some(EventData::Count(*count)),
            Event::GameReady | Event::GameWaiting => None,
        };

        Self {
            kind: event.label(),
            data,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PlayerDto {
    pub name: String,
    pub upper: i32,
    pub lower: i32,
    pub score: i32,
    pub winner: bool,
}

impl From<&GamePlayer> for PlayerDto {
    fn from(player: &GamePlayer) -> Self {
        Self {
            name: player.name.clone(),
            upper: player.upper,
            lower: player.lower,
            score: player.score,
            winner: player.winner,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RoundResultDto {
    pub round: u32,
    pub number: Option<i32>,
    pub leader_board: Vec<PlayerDto>,
}

impl From<&RoundResult> for RoundResultDto {
    fn from(result: &RoundResult) -> Self {
        Self {
            round: result.round,
            number: result.number,
            leader_board: result.leader_board.iter().map(PlayerDto::from).collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GameStateDto {
    Waiting,
    Ready,
    InProgress,
    Completed,
    Cancelled,
}

impl From<GameState> for GameStateDto {
    fn from(state: GameState) -> Self {
        match state {
            GameState::Waiting => GameStateDto::Waiting,
            GameState::Ready => GameStateDto::Ready,
            GameState::InProgress => GameStateDto::InProgress,
            GameState::Completed => GameStateDto::Completed,
            GameState::Cancelled => GameStateDto::Cancelled,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct GameSnapshotDto {
    pub state: GameStateDto,
    pub players: Vec<PlayerDto>,
    pub round: u32,
    pub numbers: Vec<i32>,
    pub top_score: i32,
    pub winner: Option<PlayerDto>,
    pub waiting: Vec<String>,
}

impl From<&GameSnapshot> for GameSnapshotDto {
    fn from(snapshot: &GameSnapshot) -> Self {
        Self {
            state: snapshot.state.into(),
            players: snapshot.players.iter().map(PlayerDto::from).collect(),
            round: snapshot.round,
            numbers: snapshot.numbers.clone(),
            top_score: snapshot.top_score,
            winner: snapshot.winner.as_ref().map(PlayerDto::from),
            waiting: snapshot.waiting.clone(),
        }
    }
}
