//! Pure state transitions for a game session.
//!
//! [`reduce`] never touches timers or randomness. It returns the next state
//! plus the [`Effect`]s the caller must carry out; [`crate::game::Game`] is
//! the only place those effects are executed.

use std::time::Duration;

use tracing::debug;

use crate::geometry::Position;
use crate::session::{Phase, Session, Target};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timings {
    /// How long an untapped target stays up
    pub expiry: Duration,
    /// Pause before the next target after a tap
    pub tap_reshow: Duration,
    /// Pause before the next target after one ran off
    pub flee_reshow: Duration,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            expiry: Duration::from_millis(1500),
            tap_reshow: Duration::from_millis(500),
            flee_reshow: Duration::from_millis(300),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GameState {
    pub session: Session,
    pub target: Target,
}

impl GameState {
    pub fn phase(&self) -> Phase {
        self.session.phase()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Start,
    ShowTarget { position: Position, at: Duration },
    Tap { at: Duration },
    Miss,
    Expire,
    End,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    Expire,
    Reshow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Cancel whatever timer is pending
    CancelTimer,
    /// Replace the pending timer with a new one firing `after` from now
    Schedule { kind: TimerKind, after: Duration },
    /// Pick a position and dispatch [`Action::ShowTarget`]
    ShowTarget,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub state: GameState,
    pub effects: Vec<Effect>,
}

impl Transition {
    fn unchanged(state: &GameState, action: Action) -> Self {
        debug!(?action, phase = %state.phase(), visible = state.target.visible, "ignored action");
        Self {
            state: state.clone(),
            effects: Vec::new(),
        }
    }
}

pub fn reduce(state: &GameState, action: Action, timings: &Timings) -> Transition {
    let active = state.session.started;
    let visible = active && state.target.visible;

    match action {
        Action::Start => Transition {
            state: GameState {
                session: state.session.restarted(),
                target: Target::hidden(),
            },
            effects: vec![Effect::CancelTimer, Effect::ShowTarget],
        },
        Action::ShowTarget { position, at } if active => Transition {
            state: GameState {
                session: state.session.clone(),
                target: Target::shown(position, at),
            },
            effects: vec![Effect::Schedule {
                kind: TimerKind::Expire,
                after: timings.expiry,
            }],
        },
        Action::Tap { at } if visible => {
            let reaction = state
                .target
                .shown_at
                .map(|shown| at.saturating_sub(shown))
                .unwrap_or_default();
            let mut session = state.session.clone();
            session.record_hit(reaction);
            Transition {
                state: GameState {
                    session,
                    target: Target::hidden(),
                },
                effects: vec![Effect::Schedule {
                    kind: TimerKind::Reshow,
                    after: timings.tap_reshow,
                }],
            }
        }
        Action::Miss if active => {
            let mut session = state.session.clone();
            session.misses += 1;
            Transition {
                state: GameState {
                    session,
                    target: state.target,
                },
                effects: Vec::new(),
            }
        }
        Action::Expire if visible => {
            let mut session = state.session.clone();
            session.fled += 1;
            Transition {
                state: GameState {
                    session,
                    target: Target::hidden(),
                },
                effects: vec![Effect::Schedule {
                    kind: TimerKind::Reshow,
                    after: timings.flee_reshow,
                }],
            }
        }
        Action::End if active => Transition {
            state: GameState {
                session: state.session.ended(),
                target: Target::hidden(),
            },
            effects: vec![Effect::CancelTimer],
        },
        _ => Transition::unchanged(state, action),
    }
}
