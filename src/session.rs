use std::time::Duration;

use crate::geometry::Position;
use crate::util::{fastest, mean_ms, std_dev_ms};

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum Phase {
    Idle,
    Active,
}

/// Score keeping for the current play-through.
///
/// `high_score` outlives individual sessions: [`Session::restarted`] carries
/// it over while everything else starts from zero.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    pub score: u32,
    pub high_score: u32,
    pub started: bool,
    pub misses: u32,
    pub fled: u32,
    pub reactions: Vec<Duration>,
}

impl Session {
    pub fn phase(&self) -> Phase {
        if self.started {
            Phase::Active
        } else {
            Phase::Idle
        }
    }

    pub fn restarted(&self) -> Self {
        Self {
            high_score: self.high_score,
            started: true,
            ..Self::default()
        }
    }

    pub fn ended(&self) -> Self {
        Self {
            started: false,
            ..self.clone()
        }
    }

    pub fn record_hit(&mut self, reaction: Duration) {
        self.score += 1;
        self.high_score = self.high_score.max(self.score);
        self.reactions.push(reaction);
    }

    pub fn reaction_summary(&self) -> ReactionSummary {
        ReactionSummary {
            fastest: fastest(&self.reactions),
            mean_ms: mean_ms(&self.reactions),
            std_dev_ms: std_dev_ms(&self.reactions),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ReactionSummary {
    pub fastest: Option<Duration>,
    pub mean_ms: Option<f64>,
    pub std_dev_ms: Option<f64>,
}

/// The thing to click. Only meaningful while a session is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Target {
    pub position: Option<Position>,
    pub visible: bool,
    pub shown_at: Option<Duration>,
}

impl Target {
    pub fn shown(position: Position, at: Duration) -> Self {
        Self {
            position: Some(position),
            visible: true,
            shown_at: Some(at),
        }
    }

    pub fn hidden() -> Self {
        Self::default()
    }

    /// Position while visible
    pub fn live(&self) -> Option<Position> {
        if self.visible {
            self.position
        } else {
            None
        }
    }
}
