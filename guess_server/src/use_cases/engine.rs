// Engine loop: the single owner of the game and the only producer of events.

use super::types::{Action, ActionResponse, EngineConfig, Event};
use crate::domain::{GameError, GameOps, GameSnapshot, GameState, Player};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{Interval, MissedTickBehavior};
use tracing::{debug, error, info, warn};

/// Errors returned by the engine loop or its handle.
#[derive(Debug, Error)]
pub enum EngineError {
    // A game operation failed in a state the engine considers unreachable.
    #[error("game invariant violated: {0}")]
    Invariant(GameError),
    #[error("event receiver dropped")]
    EventsClosed,
    #[error("engine is not running")]
    Closed,
    #[error("engine ticks on a timer; manual ticks are disabled")]
    NotManual,
}

/// Cloneable handle used by adapters and tests to talk to a running engine.
#[derive(Clone)]
pub struct EngineHandle {
    action_tx: mpsc::Sender<Action>,
    cancel_tx: mpsc::Sender<oneshot::Sender<()>>,
    // Present only when the engine was configured for manual ticking.
    tick_tx: Option<mpsc::Sender<()>>,
    running: Arc<AtomicBool>,
}

impl EngineHandle {
    pub async fn send(&self, action: Action) -> Result<(), EngineError> {
        self.action_tx
            .send(action)
            .await
            .map_err(|_| EngineError::Closed)
    }

    /// Registers a player and waits for the engine's verdict.
    pub async fn join(&self, player: Player) -> Result<ActionResponse, EngineError> {
        let (reply, response) = oneshot::channel();
        self.send(Action::JoinGame { player, reply }).await?;
        response.await.map_err(|_| EngineError::Closed)
    }

    pub async fn observe(&self) -> Result<GameSnapshot, EngineError> {
        let (reply, snapshot) = oneshot::channel();
        self.send(Action::ObserveGame { reply }).await?;
        snapshot.await.map_err(|_| EngineError::Closed)
    }

    /// Turns the engine once. Only valid for manually driven engines.
    pub async fn tick(&self) -> Result<(), EngineError> {
        let tick_tx = self.tick_tx.as_ref().ok_or(EngineError::NotManual)?;
        tick_tx.send(()).await.map_err(|_| EngineError::Closed)
    }

    /// Cancels the game and waits until the loop has acknowledged it.
    pub async fn cancel(&self) -> Result<(), EngineError> {
        let (done_tx, done_rx) = oneshot::channel();
        self.cancel_tx
            .send(done_tx)
            .await
            .map_err(|_| EngineError::Closed)?;
        done_rx.await.map_err(|_| EngineError::Closed)
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}

enum TickSource {
    Timer(Interval),
    Manual(mpsc::Receiver<()>),
}

impl TickSource {
    // False once no tick can ever arrive again.
    async fn tick(&mut self) -> bool {
        match self {
            TickSource::Timer(interval) => {
                interval.tick().await;
                true
            }
            TickSource::Manual(ticks) => ticks.recv().await.is_some(),
        }
    }
}

struct Inbox {
    actions: mpsc::Receiver<Action>,
    cancels: mpsc::Receiver<oneshot::Sender<()>>,
    ticks: TickSource,
}

// Engine-owned countdown gating Ready -> InProgress.
#[derive(Debug, Default)]
struct Countdown {
    count: u32,
    counting: bool,
}

impl Countdown {
    fn start(&mut self, waiting_count: u32) {
        self.reset(waiting_count);
        self.counting = true;
    }

    fn reset(&mut self, waiting_count: u32) {
        self.count = waiting_count;
        self.counting = false;
    }

    // Completing stops the countdown so a failed start begins a fresh one.
    fn complete(&mut self) -> bool {
        if self.counting && self.count <= 1 {
            self.counting = false;
            return true;
        }
        false
    }

    fn step(&mut self) {
        self.count = self.count.saturating_sub(1);
    }
}

struct EngineCore<G> {
    game: G,
    config: EngineConfig,
    event_tx: mpsc::Sender<Event>,
    running: Arc<AtomicBool>,
    countdown: Countdown,
}

/// Drives a game forward on ticks, serializing player actions in between.
pub struct Engine<G> {
    core: EngineCore<G>,
    inbox: Inbox,
}

impl<G> Engine<G>
where
    G: GameOps + 'static,
{
    /// Wires the engine channels; the returned receiver yields every emitted event.
    pub fn new(game: G, config: EngineConfig) -> (Self, EngineHandle, mpsc::Receiver<Event>) {
        let (action_tx, actions) = mpsc::channel::<Action>(config.action_capacity.max(1));
        let (cancel_tx, cancels) = mpsc::channel::<oneshot::Sender<()>>(1);
        let (event_tx, event_rx) = mpsc::channel::<Event>(config.event_capacity.max(1));

        let (tick_tx, ticks) = if config.manual_run {
            let (tick_tx, tick_rx) = mpsc::channel::<()>(1);
            (Some(tick_tx), TickSource::Manual(tick_rx))
        } else {
            let mut interval = tokio::time::interval(config.tick_interval);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            (None, TickSource::Timer(interval))
        };

        let running = Arc::new(AtomicBool::new(false));
        let countdown = Countdown {
            count: config.waiting_count,
            counting: false,
        };

        let engine = Engine {
            core: EngineCore {
                game,
                config,
                event_tx,
                running: running.clone(),
                countdown,
            },
            inbox: Inbox {
                actions,
                cancels,
                ticks,
            },
        };
        let handle = EngineHandle {
            action_tx,
            cancel_tx,
            tick_tx,
            running,
        };
        (engine, handle, event_rx)
    }

    /// Spawns the loop. The engine reports running as soon as this returns.
    pub fn start(self) -> JoinHandle<Result<(), EngineError>> {
        let Engine { mut core, mut inbox } = self;
        core.running.store(true, Ordering::SeqCst);
        info!(
            tick_ms = core.config.tick_interval.as_millis() as u64,
            waiting_count = core.config.waiting_count,
            manual = core.config.manual_run,
            "engine starting"
        );

        tokio::spawn(async move {
            let result = core.drive(&mut inbox).await;
            core.running.store(false, Ordering::SeqCst);
            match &result {
                Ok(()) => info!("engine stopped"),
                Err(e) => error!(error = %e, "engine stopped with error"),
            }
            result
        })
    }
}

impl<G> EngineCore<G>
where
    G: GameOps,
{
    async fn drive(&mut self, inbox: &mut Inbox) -> Result<(), EngineError> {
        loop {
            tokio::select! {
                open = inbox.ticks.tick() => {
                    if !open {
                        info!("every engine handle dropped; stopping");
                        return Ok(());
                    }
                    if !self.on_tick().await? {
                        return Ok(());
                    }
                }
                Some(action) = inbox.actions.recv() => {
                    self.on_action(action).await?;
                }
                Some(done) = inbox.cancels.recv() => {
                    self.game.cancel();
                    self.running.store(false, Ordering::SeqCst);
                    let _ = done.send(());
                    info!("engine cancelled");
                    return Ok(());
                }
            }
        }
    }

    // Takes `&mut self` so the loop future only needs `G: Send`.
    async fn emit(&mut self, event: Event) -> Result<(), EngineError> {
        debug!(event = event.label(), "emitting event");
        self.event_tx.send(event).await.map_err(|_| {
            warn!("event receiver dropped; stopping engine");
            EngineError::EventsClosed
        })
    }

    async fn merge_waiting_players(&mut self) -> Result<(), EngineError> {
        match self.game.add_waiting_players() {
            Ok(joined) if !joined.is_empty() => {
                info!(count = joined.len(), "players joined the game");
                self.emit(Event::PlayerJoined(joined)).await
            }
            Ok(_) => Ok(()),
            Err(e) => {
                debug!(error = %e, "waiting players not merged");
                Ok(())
            }
        }
    }

    // Returns false once the loop should exit.
    async fn on_tick(&mut self) -> Result<bool, EngineError> {
        match self.game.state() {
            GameState::Waiting => {
                self.merge_waiting_players().await?;
                if let Err(e) = self.game.get_ready() {
                    debug!(error = %e, "game not ready");
                }
                self.emit(Event::GameWaiting).await?;
            }
            GameState::Ready => {
                self.merge_waiting_players().await?;
                if !self.countdown.counting {
                    self.countdown.start(self.config.waiting_count);
                    info!(count = self.countdown.count, "countdown started");
                    self.emit(Event::CountdownStarted(self.countdown.count))
                        .await?;
                } else if self.countdown.complete() {
                    match self.game.start() {
                        Ok(()) => {
                            info!("game started");
                            self.emit(Event::GameStarted(self.countdown.count)).await?;
                        }
                        Err(e) => warn!(error = %e, "game failed to start; restarting countdown"),
                    }
                } else {
                    self.countdown.step();
                    self.emit(Event::CountingDown(self.countdown.count)).await?;
                }
            }
            GameState::InProgress => {
                self.game.play_round().map_err(|e| {
                    error!(error = %e, "failed to play round");
                    EngineError::Invariant(e)
                })?;
                let result = self.game.round_result();
                debug!(round = result.round, number = ?result.number, "round played");
                self.emit(Event::PlayedRound(result)).await?;
            }
            GameState::Completed => {
                let winner = self.game.nominate_winner().map_err(|e| {
                    error!(error = %e, "failed to nominate winner");
                    EngineError::Invariant(e)
                })?;
                info!(winner = %winner.name, score = winner.score, "game completed");
                self.emit(Event::GameCompleted(winner)).await?;

                self.game.reset().map_err(EngineError::Invariant)?;
                self.countdown.reset(self.config.waiting_count);
                self.emit(Event::GameReset(self.game.snapshot())).await?;
            }
            GameState::Cancelled => return Ok(false),
        }
        Ok(true)
    }

    async fn on_action(&mut self, action: Action) -> Result<(), EngineError> {
        match action {
            Action::JoinGame { player, reply } => match self.game.register_player(&player) {
                Err(e) => {
                    warn!(player = %player.name, error = %e, "unable to add player");
                    let _ = reply.send(ActionResponse::rejected(e.to_string()));
                }
                Ok(()) => {
                    info!(player = %player.name, "player registered");
                    let _ = reply.send(ActionResponse::ok());
                    self.emit(Event::PlayerRegistered(self.game.snapshot()))
                        .await?;
                }
            },
            Action::ObserveGame { reply } => {
                let _ = reply.send(self.game.snapshot());
            }
        }
        Ok(())
    }
}
