//! Async session actor.
//!
//! One tokio task owns the [`GameState`]. Commands arrive over an mpsc
//! channel, gravity comes from a `tokio::time::Interval`, and `select!`
//! serialises the two so every transition runs to completion before the next
//! starts. Each transition publishes a fresh [`GameSnapshot`] on a watch
//! channel.
//!
//! The bundled binary does not use this actor; it exists for embedding the
//! game in a tokio host.

use std::time::Duration;

use log::{debug, info};
use polytris_core::{GameSnapshot, GameState, LockEvent};
use polytris_types::{GameAction, GameConfig};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, Interval, MissedTickBehavior};

/// Pending command capacity before `send` waits
const COMMAND_BUFFER: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Action(GameAction),
    Shutdown,
}

/// Handle to a running session actor
#[derive(Debug)]
pub struct SessionHandle {
    commands: mpsc::Sender<Command>,
    snapshots: watch::Receiver<GameSnapshot>,
    events: mpsc::UnboundedReceiver<LockEvent>,
    task: JoinHandle<GameState>,
}

impl SessionHandle {
    /// Queue a player command. Returns false once the actor has stopped.
    pub async fn send(&self, action: GameAction) -> bool {
        self.commands.send(Command::Action(action)).await.is_ok()
    }

    /// Queue a command without waiting; false if the buffer is full or closed.
    pub fn try_send(&self, action: GameAction) -> bool {
        self.commands.try_send(Command::Action(action)).is_ok()
    }

    /// Latest published snapshot
    pub fn snapshot(&self) -> GameSnapshot {
        self.snapshots.borrow().clone()
    }

    /// Receiver that wakes on every published snapshot
    pub fn subscribe(&self) -> watch::Receiver<GameSnapshot> {
        self.snapshots.clone()
    }

    /// Next lock event, if one is waiting
    pub fn try_next_event(&mut self) -> Option<LockEvent> {
        self.events.try_recv().ok()
    }

    /// Stop the actor and hand back its final state.
    pub async fn shutdown(self) -> Option<GameState> {
        // A closed channel means the actor is already gone; join it anyway.
        let _ = self.commands.send(Command::Shutdown).await;
        self.task.await.ok()
    }
}

/// Start a session actor on the current tokio runtime.
pub fn spawn_session(config: GameConfig, seed: u64) -> SessionHandle {
    spawn_state(GameState::new(config, seed))
}

/// Drive an existing state on the current tokio runtime.
pub fn spawn_state(state: GameState) -> SessionHandle {
    let (cmd_tx, cmd_rx) = mpsc::channel(COMMAND_BUFFER);
    let (snap_tx, snap_rx) = watch::channel(state.snapshot());
    let (event_tx, event_rx) = mpsc::unbounded_channel();

    let task = tokio::spawn(run_session(state, cmd_rx, snap_tx, event_tx));

    SessionHandle {
        commands: cmd_tx,
        snapshots: snap_rx,
        events: event_rx,
        task,
    }
}

/// Gravity source for one round at one speed
struct Gravity {
    epoch: u32,
    interval_ms: u32,
    ticker: Interval,
}

impl Gravity {
    fn new(epoch: u32, interval_ms: u32) -> Self {
        let period = Duration::from_millis(u64::from(interval_ms.max(1)));
        let mut ticker = time::interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        Self {
            epoch,
            interval_ms,
            ticker,
        }
    }
}

/// Keep `gravity` in step with the state: none after game over, rebuilt when
/// the round or the speed changed.
fn refresh_gravity(gravity: &mut Option<Gravity>, state: &GameState) {
    if state.game_over() {
        if let Some(old) = gravity.take() {
            debug!("gravity for round {} stopped", old.epoch);
        }
        return;
    }

    let epoch = state.episode_id();
    let interval_ms = state.drop_interval_ms();
    let current = gravity
        .as_ref()
        .is_some_and(|g| g.epoch == epoch && g.interval_ms == interval_ms);
    if !current {
        debug!("gravity for round {} every {}ms", epoch, interval_ms);
        *gravity = Some(Gravity::new(epoch, interval_ms));
    }
}

async fn next_tick(gravity: &mut Option<Gravity>) {
    match gravity {
        Some(g) => {
            g.ticker.tick().await;
        }
        None => std::future::pending().await,
    }
}

async fn run_session(
    mut state: GameState,
    mut commands: mpsc::Receiver<Command>,
    snapshots: watch::Sender<GameSnapshot>,
    events: mpsc::UnboundedSender<LockEvent>,
) -> GameState {
    let mut gravity = None;
    refresh_gravity(&mut gravity, &state);
    info!("session actor started (seed {})", state.seed());

    loop {
        tokio::select! {
            cmd = commands.recv() => match cmd {
                Some(Command::Action(action)) => {
                    state.apply_action(action);
                }
                Some(Command::Shutdown) | None => break,
            },
            _ = next_tick(&mut gravity) => {
                state.tick();
            }
        }

        if let Some(event) = state.take_last_event() {
            // Nobody listening is fine.
            let _ = events.send(event);
        }
        refresh_gravity(&mut gravity, &state);
        snapshots.send_replace(state.snapshot());
    }

    info!("session actor stopped");
    state
}
