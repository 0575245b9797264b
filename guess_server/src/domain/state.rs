// Domain-level game entities and snapshot types.

/// Lifecycle of a single game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    Waiting,
    Ready,
    InProgress,
    Completed,
    Cancelled,
}

/// Registration input: a name and two numbers in any order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    pub name: String,
    pub first: i32,
    pub second: i32,
}

impl Player {
    pub fn new(name: impl Into<String>, first: i32, second: i32) -> Self {
        Self {
            name: name.into(),
            first,
            second,
        }
    }
}

/// A registered player's in-game record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GamePlayer {
    pub name: String,
    // Always >= lower; swapped at registration if needed.
    pub upper: i32,
    pub lower: i32,
    pub score: i32,
    pub winner: bool,
}

impl GamePlayer {
    pub fn from_choice(player: &Player) -> Self {
        Self {
            name: player.name.clone(),
            upper: player.first.max(player.second),
            lower: player.first.min(player.second),
            score: 0,
            winner: false,
        }
    }

    pub fn contains(&self, number: i32) -> bool {
        (self.lower..=self.upper).contains(&number)
    }
}

/// Ranked leaderboard produced after each round.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RoundResult {
    pub round: u32,
    pub number: Option<i32>,
    pub leader_board: Vec<GamePlayer>,
}

/// Read-only view of the whole game for broadcasts and diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSnapshot {
    pub state: GameState,
    pub round: u32,
    pub numbers: Vec<i32>,
    pub top_score: i32,
    pub winner: Option<GamePlayer>,
    // Roster in name order.
    pub players: Vec<GamePlayer>,
    // Names still in the waiting room.
    pub waiting: Vec<String>,
}
