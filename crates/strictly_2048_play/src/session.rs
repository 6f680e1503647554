//! Single-writer session loop.
//!
//! One tokio task owns the game state and its RNG. Handles enqueue commands
//! over an unbounded channel and observers watch the published view.

use crate::config::GameConfig;
use crate::win::{WinStatus, WinTracker};
use derive_getters::Getters;
use derive_more::{Display, Error};
use rand::rngs::StdRng;
use strictly_2048::{GameEvent, GameState, SnapshotError};
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

/// What observers see after every command.
#[derive(Debug, Clone, PartialEq, Eq, Getters, derive_new::new)]
pub struct SessionView {
    /// Current game.
    state: GameState,
    /// Win status of the current game.
    win: WinStatus,
    /// Board-changing moves since the game started.
    moves: u64,
    /// Score that counts as a win.
    win_score: u64,
}

type Reply = oneshot::Sender<Result<(), SnapshotError>>;

enum Command {
    Event {
        event: GameEvent,
        reply: Option<Reply>,
    },
    KeepGoing,
    Shutdown(oneshot::Sender<GameState>),
}

/// The task side of a session.
pub struct GameSession {
    state: GameState,
    rng: StdRng,
    win: WinTracker,
    moves: u64,
    commands: mpsc::UnboundedReceiver<Command>,
    view: watch::Sender<SessionView>,
}

impl GameSession {
    /// Starts a session task with an empty board and returns its handle.
    ///
    /// Send [`GameEvent::StartGame`] or [`GameEvent::RestoreFromPersisted`]
    /// to put tiles on the board. Must be called inside a tokio runtime.
    #[instrument(skip(config), fields(rows = config.rows(), cols = config.cols()))]
    pub fn spawn(config: &GameConfig) -> SessionHandle {
        let mut rng = config.rng();
        let state = GameState::new(*config.rows(), *config.cols(), &mut rng);
        let win = WinTracker::new(*config.win_score());
        let (command_tx, commands) = mpsc::unbounded_channel();
        let (view, view_rx) = watch::channel(SessionView::new(
            state.clone(),
            win.status(),
            0,
            win.threshold(),
        ));

        let session = Self {
            state,
            rng,
            win,
            moves: 0,
            commands,
            view,
        };
        let task = tokio::spawn(session.run());
        info!("Session started");

        SessionHandle {
            commands: command_tx,
            view: view_rx,
            task,
        }
    }

    async fn run(mut self) {
        while let Some(command) = self.commands.recv().await {
            match command {
                Command::Event { event, reply } => {
                    let outcome = self.apply(&event);
                    if let Some(reply) = reply {
                        let _ = reply.send(outcome);
                    }
                }
                Command::KeepGoing => {
                    self.win.keep_going();
                    self.publish();
                }
                Command::Shutdown(reply) => {
                    info!(score = self.state.score(), "Session shutting down");
                    let _ = reply.send(self.state);
                    return;
                }
            }
        }
        debug!("All handles dropped, session ending");
    }

    #[instrument(skip(self), fields(event = %event))]
    fn apply(&mut self, event: &GameEvent) -> Result<(), SnapshotError> {
        let next = self
            .state
            .update(event, &mut self.rng)
            .inspect_err(|e| warn!(error = %e, "Event rejected"))?;

        match event {
            GameEvent::StartGame | GameEvent::RestoreFromPersisted(_) => {
                self.win.reset();
                self.moves = 0;
            }
            _ if next != self.state => self.moves += 1,
            _ => {}
        }

        self.state = next;
        self.win.observe(&self.state);
        self.publish();
        Ok(())
    }

    fn publish(&self) {
        self.view.send_replace(SessionView::new(
            self.state.clone(),
            self.win.status(),
            self.moves,
            self.win.threshold(),
        ));
    }
}

/// Client side of a running session.
pub struct SessionHandle {
    commands: mpsc::UnboundedSender<Command>,
    view: watch::Receiver<SessionView>,
    task: JoinHandle<()>,
}

impl SessionHandle {
    /// Enqueues `event` without waiting for it to be applied.
    pub fn send(&self, event: GameEvent) -> Result<(), SessionError> {
        debug!(%event, "Queueing event");
        self.commands
            .send(Command::Event { event, reply: None })
            .map_err(|_| SessionError::new("Session loop has stopped"))
    }

    /// Applies `event` and returns the view that resulted.
    ///
    /// # Errors
    ///
    /// Fails if the session has stopped or the event carries a malformed
    /// saved game. A rejected event leaves the game unchanged.
    #[instrument(skip(self, event), fields(event = %event))]
    pub async fn apply(&self, event: GameEvent) -> Result<SessionView, SessionError> {
        let (reply, outcome) = oneshot::channel();
        self.commands
            .send(Command::Event {
                event,
                reply: Some(reply),
            })
            .map_err(|_| SessionError::new("Session loop has stopped"))?;
        outcome
            .await
            .map_err(|_| SessionError::new("Session loop dropped the reply"))??;
        Ok(self.view())
    }

    /// Dismisses a pending win so play continues.
    pub fn keep_going(&self) -> Result<(), SessionError> {
        self.commands
            .send(Command::KeepGoing)
            .map_err(|_| SessionError::new("Session loop has stopped"))
    }

    /// A receiver notified after every command.
    pub fn subscribe(&self) -> watch::Receiver<SessionView> {
        self.view.clone()
    }

    /// The most recently published view.
    pub fn view(&self) -> SessionView {
        self.view.borrow().clone()
    }

    /// Stops the loop and returns the final game state.
    #[instrument(skip(self))]
    pub async fn shutdown(self) -> Result<GameState, SessionError> {
        let (reply, state) = oneshot::channel();
        self.commands
            .send(Command::Shutdown(reply))
            .map_err(|_| SessionError::new("Session loop has stopped"))?;
        let state = state
            .await
            .map_err(|_| SessionError::new("Session loop dropped the final state"))?;
        self.task
            .await
            .map_err(|e| SessionError::new(format!("Session task failed: {}", e)))?;
        Ok(state)
    }
}

/// Session error with location tracking.
#[derive(Debug, Clone, Display, Error)]
#[display("Session error: {} at {}:{}", message, file, line)]
pub struct SessionError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl SessionError {
    /// Creates a new session error with caller location tracking.
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}

impl From<SnapshotError> for SessionError {
    #[track_caller]
    fn from(err: SnapshotError) -> Self {
        Self::new(format!("Rejected saved game: {}", err.kind))
    }
}
