//! Synchronous session driver
//!
//! Owns the only [`GameState`] and the gravity timer that feeds it. Callers
//! pass the current [`Instant`] into every method, which keeps the driver free
//! of hidden clocks and easy to test.
//!
//! Timer lifecycle:
//! - acquired when a round enters play
//! - replaced whenever the drop interval or the round changes
//! - released on game over

use std::time::{Duration, Instant};

use log::debug;
use polytris_core::{GameSnapshot, GameState, LockEvent};
use polytris_types::{ConfigError, GameAction, GameConfig};

use crate::timer::GravityTimer;

#[derive(Debug)]
pub struct Session {
    state: GameState,
    timer: Option<GravityTimer>,
    pending_event: Option<LockEvent>,
}

impl Session {
    pub fn new(config: GameConfig, seed: u64, now: Instant) -> Self {
        Self::from_state(GameState::new(config, seed), now)
    }

    /// Validate `config` before starting.
    pub fn try_new(config: GameConfig, seed: u64, now: Instant) -> Result<Self, ConfigError> {
        Ok(Self::from_state(GameState::try_new(config, seed)?, now))
    }

    pub fn from_state(state: GameState, now: Instant) -> Self {
        let mut session = Self {
            state,
            timer: None,
            pending_event: None,
        };
        session.sync_timer(now);
        session
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn snapshot(&self) -> GameSnapshot {
        self.state.snapshot()
    }

    pub fn timer(&self) -> Option<&GravityTimer> {
        self.timer.as_ref()
    }

    /// Apply one player command.
    pub fn apply(&mut self, action: GameAction, now: Instant) -> bool {
        let changed = self.state.apply_action(action);
        self.after_transition(now);
        changed
    }

    /// Run a gravity tick if the live timer is due.
    ///
    /// A timer acquired for an earlier round is dropped instead of fired.
    pub fn poll_tick(&mut self, now: Instant) -> bool {
        let Some(timer) = self.timer.as_mut() else {
            return false;
        };
        if timer.epoch() != self.state.episode_id() {
            debug!("dropping stale gravity timer from round {}", timer.epoch());
            self.timer = None;
            self.sync_timer(now);
            return false;
        }
        if !timer.fire(now) {
            return false;
        }
        let ticked = self.state.tick();
        self.after_transition(now);
        ticked
    }

    /// How long until the next gravity tick; `None` when no timer is held.
    pub fn time_until_tick(&self, now: Instant) -> Option<Duration> {
        self.timer.as_ref().map(|t| t.time_until_due(now))
    }

    /// Take the last lock outcome, if any happened since the previous call.
    pub fn take_last_event(&mut self) -> Option<LockEvent> {
        self.pending_event.take()
    }

    fn after_transition(&mut self, now: Instant) {
        if let Some(event) = self.state.take_last_event() {
            self.pending_event = Some(event);
        }
        self.sync_timer(now);
    }

    fn sync_timer(&mut self, now: Instant) {
        if self.state.game_over() {
            if let Some(timer) = self.timer.take() {
                debug!("gravity timer for round {} released", timer.epoch());
            }
            return;
        }

        let epoch = self.state.episode_id();
        let interval = self.state.drop_interval_ms();
        if self.timer.is_some_and(|t| t.matches(epoch, interval)) {
            return;
        }
        debug!("gravity timer acquired: round {} every {}ms", epoch, interval);
        self.timer = Some(GravityTimer::new(epoch, interval, now));
    }
}
