use crate::config::{SessionConfig, WorldBounds};
use crate::engine::Point;
use crate::timer::{DelayedCall, RepositionTimer};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

/// Where a hotdog sits, in world coordinates
pub type Position = Point;

/// ┌──────────── Session State Machine ─────────────┐
/// │  start() ──► Running ──collect_item()──► Won   │
/// │                 ▲      (score ≥ threshold)  │  │
/// │                 └────────── restart() ──────┘  │
/// └────────────────────────────────────────────────┘
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SessionState {
    Running,
    Won,
}

/// What the win screen gets to show, frozen at the moment of winning
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WinSnapshot {
    pub score: u32,
    pub item_history: Vec<Position>,
}

/// Score, hotdog placement and the repositioning timer for one playthrough.
///
/// The host calls into it through a fixed set of handlers:
/// - `collect_item()`  : player touched the hotdog
/// - `timer_elapsed()` : the hotdog sat uncollected for a full delay
/// - `advance(dt)`     : time passed, drives the timers
/// - `restart()`       : fell off the world / win screen restart
pub struct GameSession<R: Rng = StdRng> {
    config: SessionConfig,
    bounds: WorldBounds,
    score: u32,
    item_history: Vec<Position>,
    active_item: Position,
    timer: RepositionTimer,
    grace: Option<DelayedCall>,
    state: SessionState,
    rng: R,
}

impl GameSession<StdRng> {
    pub fn start(config: SessionConfig, bounds: WorldBounds) -> Self {
        GameSession::with_rng(config, bounds, StdRng::from_entropy())
    }
}

impl<R: Rng> GameSession<R> {
    pub fn with_rng(config: SessionConfig, bounds: WorldBounds, rng: R) -> Self {
        let mut session = GameSession {
            config,
            bounds,
            score: 0,
            item_history: Vec::new(),
            active_item: Position::default(),
            timer: RepositionTimer::new(config.reposition_delay_ms),
            grace: None,
            state: SessionState::Running,
            rng,
        };
        session.place_item();
        session
    }

    /// Uniform over `[0, width] x [0, height]`, whole pixels.
    /// Platforms and the player are ignored, so a hotdog can land somewhere
    /// unreachable until the timer moves it again.
    pub fn place_item(&mut self) -> Position {
        let x = self.rng.gen_range(0..=self.bounds.width.max(0.0) as u32);
        let y = self.rng.gen_range(0..=self.bounds.height.max(0.0) as u32);
        self.active_item = Position {
            x: x as f32,
            y: y as f32,
        };
        self.active_item
    }

    /// Player and hotdog overlap. Returns the snapshot for the win screen on
    /// the collection that reaches the threshold.
    pub fn collect_item(&mut self) -> Option<WinSnapshot> {
        if self.state == SessionState::Won {
            return None;
        }
        self.score += 1;
        self.item_history.push(self.active_item);
        self.place_item();

        // fresh window for the next hotdog : G of immunity, then a full D
        self.timer.suspend();
        self.grace = Some(DelayedCall::new(self.config.grace_ms));
        self.timer.reset_delay(self.config.reposition_delay_ms);

        if self.score >= self.config.win_threshold {
            self.state = SessionState::Won;
            log!(
                "Session won with {} hotdogs ({} placements)",
                self.score,
                self.item_history.len()
            );
            return Some(self.snapshot());
        }
        None
    }

    /// The hotdog expired : it moves, nothing is scored
    pub fn timer_elapsed(&mut self) {
        if self.state == SessionState::Won {
            return;
        }
        self.item_history.push(self.active_item);
        self.place_item();
    }

    /// Drive the grace window and the repositioning timer, returns how many
    /// times the hotdog was moved
    pub fn advance(&mut self, dt_ms: f64) -> usize {
        if self.state == SessionState::Won {
            return 0;
        }
        let mut timer_dt = dt_ms;
        if let Some(grace) = self.grace.as_mut() {
            let remaining = grace.remaining_ms();
            if grace.tick(dt_ms) {
                self.grace = None;
                self.timer.resume();
                // only the part of the step after the grace window counts
                timer_dt = (dt_ms - remaining).max(0.0);
            }
        }
        let fired = self.timer.tick(timer_dt) as usize;
        for _ in 0..fired {
            self.timer_elapsed();
        }
        fired
    }

    /// Back to a fresh Running session. The old timer and any pending grace
    /// window are dropped with it.
    pub fn restart(&mut self) {
        self.score = 0;
        self.item_history.clear();
        self.timer = RepositionTimer::new(self.config.reposition_delay_ms);
        self.grace = None;
        self.state = SessionState::Running;
        self.place_item();
    }

    pub fn snapshot(&self) -> WinSnapshot {
        WinSnapshot {
            score: self.score,
            item_history: self.item_history.clone(),
        }
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn item_history(&self) -> &[Position] {
        &self.item_history
    }

    pub fn active_item(&self) -> Position {
        self.active_item
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_won(&self) -> bool {
        self.state == SessionState::Won
    }

    pub fn is_suspended(&self) -> bool {
        self.timer.is_suspended()
    }

    pub fn timer(&self) -> &RepositionTimer {
        &self.timer
    }

    pub fn bounds(&self) -> &WorldBounds {
        &self.bounds
    }
}
