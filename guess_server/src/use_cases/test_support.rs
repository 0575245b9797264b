use std::sync::{Arc, Mutex};

use crate::domain::rules::INITIAL_TOP_SCORE;
use crate::domain::{GameError, GameOps, GamePlayer, GameSnapshot, GameState, Player, RoundResult};

// How many times the engine called each game operation.
#[derive(Clone, Debug, Default)]
pub(crate) struct CallCounts {
    pub get_ready: usize,
    pub start: usize,
    pub play_round: usize,
    pub nominate_winner: usize,
    pub reset: usize,
    pub register_player: usize,
    pub add_waiting_players: usize,
    pub cancel: usize,
}

struct Script {
    state: GameState,
    round: u32,
    max_rounds: u32,
    fail_play_round: bool,
    calls: CallCounts,
}

// Scriptable game double: tests keep a clone to steer state and read counters
// while the engine owns the other.
#[derive(Clone)]
pub(crate) struct ScriptedGame {
    script: Arc<Mutex<Script>>,
}

impl ScriptedGame {
    pub(crate) fn new(max_rounds: u32) -> Self {
        Self {
            script: Arc::new(Mutex::new(Script {
                state: GameState::Waiting,
                round: 0,
                max_rounds,
                fail_play_round: false,
                calls: CallCounts::default(),
            })),
        }
    }

    pub(crate) fn failing_play_round(self) -> Self {
        self.script
            .lock()
            .expect("script mutex poisoned")
            .fail_play_round = true;
        self
    }

    pub(crate) fn set_state(&self, state: GameState) {
        self.script.lock().expect("script mutex poisoned").state = state;
    }

    pub(crate) fn calls(&self) -> CallCounts {
        self.script
            .lock()
            .expect("script mutex poisoned")
            .calls
            .clone()
    }

    fn with_script<T>(&self, f: impl FnOnce(&mut Script) -> T) -> T {
        let mut guard = self.script.lock().expect("script mutex poisoned");
        f(&mut guard)
    }
}

impl GameOps for ScriptedGame {
    fn state(&self) -> GameState {
        self.with_script(|s| s.state)
    }

    fn get_ready(&mut self) -> Result<(), GameError> {
        self.with_script(|s| s.calls.get_ready += 1);
        Ok(())
    }

    fn start(&mut self) -> Result<(), GameError> {
        self.with_script(|s| s.calls.start += 1);
        Ok(())
    }

    fn play_round(&mut self) -> Result<(), GameError> {
        self.with_script(|s| {
            s.calls.play_round += 1;
            if s.fail_play_round {
                return Err(GameError::GameComplete);
            }
            s.round += 1;
            if s.round >= s.max_rounds {
                s.state = GameState::Completed;
            }
            Ok(())
        })
    }

    fn nominate_winner(&mut self) -> Result<GamePlayer, GameError> {
        self.with_script(|s| s.calls.nominate_winner += 1);
        Ok(GamePlayer {
            name: "Scripted".to_string(),
            upper: 1,
            lower: 1,
            score: 0,
            winner: true,
        })
    }

    fn reset(&mut self) -> Result<(), GameError> {
        self.with_script(|s| s.calls.reset += 1);
        Ok(())
    }

    fn register_player(&mut self, _player: &Player) -> Result<(), GameError> {
        self.with_script(|s| s.calls.register_player += 1);
        Ok(())
    }

    fn check_player_exists(&self, _name: &str) -> Result<(), GameError> {
        Ok(())
    }

    fn cancel(&mut self) {
        self.with_script(|s| {
            s.calls.cancel += 1;
            s.state = GameState::Cancelled;
        });
    }

    fn add_waiting_players(&mut self) -> Result<Vec<GamePlayer>, GameError> {
        self.with_script(|s| s.calls.add_waiting_players += 1);
        Ok(Vec::new())
    }

    fn round_result(&self) -> RoundResult {
        self.with_script(|s| RoundResult {
            round: s.round,
            number: None,
            leader_board: Vec::new(),
        })
    }

    fn snapshot(&self) -> GameSnapshot {
        self.with_script(|s| GameSnapshot {
            state: s.state,
            round: s.round,
            numbers: Vec::new(),
            top_score: INITIAL_TOP_SCORE,
            winner: None,
            players: Vec::new(),
            waiting: Vec::new(),
        })
    }
}
