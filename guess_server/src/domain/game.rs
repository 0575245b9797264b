// Round-based range game: roster, scoring and the game state machine.

use crate::domain::errors::GameError;
use crate::domain::ports::{GameOps, NumberGenerator};
use crate::domain::rules::{
    EXACT_MATCH_SCORE, INITIAL_TOP_SCORE, INSIDE_BOUNDS_SCORE, INSTANT_WIN_SCORE, MAX_NUM,
    MAX_ROUNDS, MIN_NUM, MIN_PLAYERS_REQUIRED, OUT_OF_BOUNDS_SCORE,
};
use crate::domain::state::{GamePlayer, GameSnapshot, GameState, Player, RoundResult};
use std::collections::{BTreeMap, HashSet};

pub struct Game {
    state: GameState,
    // BTreeMap keeps scoring and tie-breaks in name order.
    players: BTreeMap<String, GamePlayer>,
    round: u32,
    numbers: Vec<i32>,
    top_score: i32,
    winner: Option<GamePlayer>,
    // Every name ever accepted; never cleared.
    registered: HashSet<String>,
    waiting_room: Vec<GamePlayer>,
    rng: Box<dyn NumberGenerator>,
}

impl Game {
    pub fn new(rng: impl NumberGenerator + 'static) -> Self {
        Self {
            state: GameState::Waiting,
            players: BTreeMap::new(),
            round: 0,
            numbers: Vec::with_capacity(MAX_ROUNDS as usize),
            top_score: INITIAL_TOP_SCORE,
            winner: None,
            registered: HashSet::new(),
            waiting_room: Vec::new(),
            rng: Box::new(rng),
        }
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn top_score(&self) -> i32 {
        self.top_score
    }

    pub fn player(&self, name: &str) -> Option<&GamePlayer> {
        self.players.get(name)
    }

    fn ensure_not_cancelled(&self) -> Result<(), GameError> {
        if self.state == GameState::Cancelled {
            return Err(GameError::Cancelled);
        }
        Ok(())
    }

    fn update_player_scores(&mut self, number: i32) {
        let mut top_score = INITIAL_TOP_SCORE;
        for player in self.players.values_mut() {
            player.score += score_delta(player, number);
            top_score = top_score.max(player.score);

            if player.score == INSTANT_WIN_SCORE && self.winner.is_none() {
                player.winner = true;
                self.winner = Some(player.clone());
                self.state = GameState::Completed;
            }
        }
        self.top_score = top_score;
    }

    fn crown(&mut self, name: &str) -> Result<GamePlayer, GameError> {
        let player = self
            .players
            .get_mut(name)
            .ok_or(GameError::NoSingleWinner)?;
        player.winner = true;
        Ok(player.clone())
    }
}

fn score_delta(player: &GamePlayer, number: i32) -> i32 {
    if number == player.upper || number == player.lower {
        EXACT_MATCH_SCORE
    } else if player.contains(number) {
        // Wide ranges earn less and can go negative.
        INSIDE_BOUNDS_SCORE - (player.upper - player.lower)
    } else {
        OUT_OF_BOUNDS_SCORE
    }
}

fn validate_choice(number: i32) -> Result<(), GameError> {
    if !(MIN_NUM..=MAX_NUM).contains(&number) {
        return Err(GameError::InvalidNumber);
    }
    Ok(())
}

// Keeps only the candidates whose key equals the maximum key among them.
fn retain_max_by<F>(candidates: Vec<&GamePlayer>, key: F) -> Vec<&GamePlayer>
where
    F: Fn(&GamePlayer) -> i32,
{
    let Some(best) = candidates.iter().map(|p| key(*p)).max() else {
        return candidates;
    };
    candidates.into_iter().filter(|p| key(*p) == best).collect()
}

impl GameOps for Game {
    fn state(&self) -> GameState {
        self.state
    }

    fn get_ready(&mut self) -> Result<(), GameError> {
        match self.state {
            GameState::InProgress => Err(GameError::InProgress),
            GameState::Cancelled => Err(GameError::Cancelled),
            GameState::Waiting if self.players.len() >= MIN_PLAYERS_REQUIRED => {
                self.state = GameState::Ready;
                Ok(())
            }
            _ => Ok(()),
        }
    }

    fn start(&mut self) -> Result<(), GameError> {
        self.ensure_not_cancelled()?;
        if self.state == GameState::InProgress {
            return Err(GameError::InProgress);
        }
        if self.players.len() < MIN_PLAYERS_REQUIRED {
            return Err(GameError::NotEnoughPlayers);
        }

        self.state = GameState::InProgress;
        self.round = 0;
        self.numbers.clear();
        Ok(())
    }

    fn play_round(&mut self) -> Result<(), GameError> {
        self.ensure_not_cancelled()?;
        if self.round >= MAX_ROUNDS {
            return Err(GameError::GameComplete);
        }

        let number = self.rng.next();
        self.update_player_scores(number);

        self.numbers.push(number);
        self.round += 1;
        if self.round >= MAX_ROUNDS {
            self.state = GameState::Completed;
        }
        Ok(())
    }

    fn nominate_winner(&mut self) -> Result<GamePlayer, GameError> {
        if let Some(winner) = &self.winner {
            return Ok(winner.clone());
        }

        // Score, then upper bound, then lower bound, then name.
        let top: Vec<&GamePlayer> = self
            .players
            .values()
            .filter(|p| p.score == self.top_score)
            .collect();
        let by_upper = retain_max_by(top, |p| p.upper);
        let by_lower = retain_max_by(by_upper, |p| p.lower);
        // Roster iterates in name order, so the first survivor is alphabetically smallest.
        let name = by_lower
            .first()
            .map(|p| p.name.clone())
            .ok_or(GameError::NoSingleWinner)?;

        self.crown(&name)
    }

    fn reset(&mut self) -> Result<(), GameError> {
        self.ensure_not_cancelled()?;
        self.round = 0;
        self.numbers.clear();
        self.state = GameState::Waiting;
        self.winner = None;
        for player in self.players.values_mut() {
            player.score = 0;
            player.winner = false;
        }
        Ok(())
    }

    fn register_player(&mut self, player: &Player) -> Result<(), GameError> {
        self.ensure_not_cancelled()?;
        self.check_player_exists(&player.name)?;
        validate_choice(player.first)?;
        validate_choice(player.second)?;

        self.registered.insert(player.name.clone());
        self.waiting_room.push(GamePlayer::from_choice(player));
        Ok(())
    }

    fn check_player_exists(&self, name: &str) -> Result<(), GameError> {
        if self.registered.contains(name) {
            return Err(GameError::NameInUse);
        }
        Ok(())
    }

    fn cancel(&mut self) {
        self.state = GameState::Cancelled;
    }

    fn add_waiting_players(&mut self) -> Result<Vec<GamePlayer>, GameError> {
        self.ensure_not_cancelled()?;
        if self.state == GameState::InProgress {
            return Err(GameError::InProgress);
        }

        let waiting = std::mem::take(&mut self.waiting_room);
        for player in &waiting {
            self.players.insert(player.name.clone(), player.clone());
        }
        Ok(waiting)
    }

    fn round_result(&self) -> RoundResult {
        let mut leader_board: Vec<GamePlayer> = self.players.values().cloned().collect();
        // Stable sort keeps name order among equal scores.
        leader_board.sort_by(|a, b| b.score.cmp(&a.score));

        RoundResult {
            round: self.round,
            number: self.numbers.last().copied(),
            leader_board,
        }
    }

    fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            state: self.state,
            round: self.round,
            numbers: self.numbers.clone(),
            top_score: self.top_score,
            winner: self.winner.clone(),
            players: self.players.values().cloned().collect(),
            waiting: self.waiting_room.iter().map(|p| p.name.clone()).collect(),
        }
    }
}
