use std::time::Duration;

use rand::{rngs::StdRng, SeedableRng};
use tracing::{debug, info, trace};

use crate::geometry::{Geometry, Position, Viewport};
use crate::session::{Phase, ReactionSummary};
use crate::timer::{TimerHandle, TimerQueue};
use crate::transition::{reduce, Action, Effect, GameState, TimerKind, Timings};

/// What the view layer gets to see
#[derive(Debug, Clone, PartialEq)]
pub struct Signals {
    pub phase: Phase,
    pub score: u32,
    pub high_score: u32,
    /// Present only while the target is visible
    pub target: Option<Position>,
    pub misses: u32,
    pub fled: u32,
    pub reactions: ReactionSummary,
}

/// Owns the one mutable [`GameState`] and carries out the effects produced
/// by [`reduce`].
///
/// All times are offsets from a caller-chosen origin; the TUI uses the
/// instant the game was created.
#[derive(Debug)]
pub struct Game {
    state: GameState,
    timings: Timings,
    geometry: Geometry,
    viewport: Viewport,
    timers: TimerQueue<TimerKind>,
    pending: Option<TimerHandle>,
    rng: StdRng,
}

impl Game {
    pub fn new(geometry: Geometry, timings: Timings, viewport: Viewport) -> Self {
        Self::with_rng(geometry, timings, viewport, StdRng::from_entropy())
    }

    pub fn with_seed(geometry: Geometry, timings: Timings, viewport: Viewport, seed: u64) -> Self {
        Self::with_rng(geometry, timings, viewport, StdRng::seed_from_u64(seed))
    }

    fn with_rng(geometry: Geometry, timings: Timings, viewport: Viewport, rng: StdRng) -> Self {
        Self {
            state: GameState::default(),
            timings,
            geometry,
            viewport,
            timers: TimerQueue::new(),
            pending: None,
            rng,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    pub fn timings(&self) -> &Timings {
        &self.timings
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Takes effect from the next target onwards
    pub fn set_viewport(&mut self, viewport: Viewport) {
        if viewport != self.viewport {
            debug!(?viewport, fits = self.geometry.fits(viewport), "viewport changed");
            self.viewport = viewport;
        }
    }

    pub fn phase(&self) -> Phase {
        self.state.phase()
    }

    pub fn is_active(&self) -> bool {
        self.phase() == Phase::Active
    }

    /// Number of timers waiting to fire. Never more than one.
    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    pub fn next_deadline(&self) -> Option<Duration> {
        self.timers.next_due()
    }

    pub fn signals(&self) -> Signals {
        let session = &self.state.session;
        Signals {
            phase: session.phase(),
            score: session.score,
            high_score: session.high_score,
            target: self.state.target.live(),
            misses: session.misses,
            fled: session.fled,
            reactions: session.reaction_summary(),
        }
    }

    pub fn start(&mut self, now: Duration) {
        info!(high_score = self.state.session.high_score, "session started");
        self.dispatch(Action::Start, now);
    }

    pub fn end(&mut self, now: Duration) {
        if self.is_active() {
            info!(
                score = self.state.session.score,
                high_score = self.state.session.high_score,
                fled = self.state.session.fled,
                misses = self.state.session.misses,
                "session ended"
            );
        }
        self.dispatch(Action::End, now);
    }

    /// The target was tapped. Ignored unless a target is visible.
    pub fn tap(&mut self, now: Duration) {
        self.dispatch(Action::Tap { at: now }, now);
    }

    /// A click that missed the target
    pub fn miss(&mut self, now: Duration) {
        self.dispatch(Action::Miss, now);
    }

    /// A click at `point`. Returns true if it hit the target.
    pub fn tap_at(&mut self, point: Position, now: Duration) -> bool {
        let hit = self
            .state
            .target
            .live()
            .is_some_and(|target| self.geometry.hits(target, point));

        if hit {
            self.tap(now);
        } else {
            self.miss(now);
        }
        hit
    }

    /// Fire every timer due at or before `now`, in deadline order
    pub fn advance(&mut self, now: Duration) {
        while let Some((handle, due, kind)) = self.timers.pop_due(now) {
            if self.pending == Some(handle) {
                self.pending = None;
            }
            trace!(?kind, ?due, "timer fired");
            match kind {
                TimerKind::Expire => self.dispatch(Action::Expire, due),
                TimerKind::Reshow => self.show_target(due),
            }
        }
    }

    fn show_target(&mut self, now: Duration) {
        let position = self.geometry.random_position(self.viewport, &mut self.rng);
        self.dispatch(Action::ShowTarget { position, at: now }, now);
    }

    fn dispatch(&mut self, action: Action, now: Duration) {
        let transition = reduce(&self.state, action, &self.timings);
        self.state = transition.state;

        for effect in transition.effects {
            match effect {
                Effect::CancelTimer => self.cancel_pending(),
                Effect::Schedule { kind, after } => {
                    self.cancel_pending();
                    self.pending = Some(self.timers.schedule(now + after, kind));
                }
                Effect::ShowTarget => self.show_target(now),
            }
        }
    }

    fn cancel_pending(&mut self) {
        if let Some(handle) = self.pending.take() {
            self.timers.cancel(handle);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::PlacementBounds;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn game() -> Game {
        Game::with_seed(
            Geometry::default(),
            Timings::default(),
            Viewport::new(1000, 800),
            11,
        )
    }

    fn bounds() -> PlacementBounds {
        Geometry::default().bounds(Viewport::new(1000, 800))
    }

    #[test]
    fn start_shows_target_immediately() {
        let mut g = game();
        assert!(g.signals().target.is_none());

        g.start(ms(0));
        let target = g.signals().target.expect("target visible after start");
        assert!(bounds().contains(target));
        assert_eq!(g.pending_timers(), 1);
        assert_eq!(g.next_deadline(), Some(ms(1500)));
    }

    #[test]
    fn tap_hides_then_reshows_after_delay() {
        let mut g = game();
        g.start(ms(0));
        g.tap(ms(200));

        assert_eq!(g.signals().score, 1);
        assert!(g.signals().target.is_none());
        assert_eq!(g.next_deadline(), Some(ms(700)));

        g.advance(ms(699));
        assert!(g.signals().target.is_none());
        g.advance(ms(700));
        assert!(g.signals().target.is_some());
        assert_eq!(g.next_deadline(), Some(ms(2200)));
    }

    #[test]
    fn untapped_target_flees_and_returns() {
        let mut g = game();
        g.start(ms(0));

        g.advance(ms(1500));
        assert!(g.signals().target.is_none());
        assert_eq!(g.signals().fled, 1);

        g.advance(ms(1800));
        assert!(g.signals().target.is_some());
        assert_eq!(g.signals().score, 0);
    }

    #[test]
    fn late_advance_keeps_chained_deadlines() {
        let mut g = game();
        g.start(ms(0));

        // one big jump covers expiry at 1500 and reshow at 1800
        g.advance(ms(2000));
        assert!(g.signals().target.is_some());
        assert_eq!(g.state().target.shown_at, Some(ms(1800)));
        assert_eq!(g.next_deadline(), Some(ms(3300)));
    }

    #[test]
    fn end_cancels_pending_timer() {
        let mut g = game();
        g.start(ms(0));
        g.tap(ms(100));
        g.end(ms(150));

        assert_eq!(g.pending_timers(), 0);
        g.advance(ms(10_000));
        assert!(g.signals().target.is_none());
        assert_eq!(g.phase(), Phase::Idle);
    }

    #[test]
    fn restart_while_active_replaces_timer() {
        let mut g = game();
        g.start(ms(0));
        g.tap(ms(100));
        g.start(ms(200));

        assert_eq!(g.signals().score, 0);
        assert_eq!(g.signals().high_score, 1);
        assert_eq!(g.pending_timers(), 1);
        assert_eq!(g.next_deadline(), Some(ms(1700)));
    }

    #[test]
    fn tap_at_hits_and_misses() {
        let mut g = game();
        g.start(ms(0));
        let target = g.signals().target.unwrap();

        let outside = Position::new(target.x + 500, target.y);
        assert!(!g.tap_at(outside, ms(50)));
        assert_eq!(g.signals().misses, 1);
        assert!(g.signals().target.is_some());

        let inside = Position::new(target.x + 10, target.y + 10);
        assert!(g.tap_at(inside, ms(80)));
        assert_eq!(g.signals().score, 1);
        assert_eq!(g.signals().reactions.fastest, Some(ms(80)));
    }

    #[test]
    fn clicks_while_idle_change_nothing() {
        let mut g = game();
        assert!(!g.tap_at(Position::new(50, 150), ms(0)));
        g.tap(ms(0));
        assert_eq!(g.signals().misses, 0);
        assert_eq!(g.signals().score, 0);
    }

    #[test]
    fn seeded_games_are_reproducible() {
        let mut a = game();
        let mut b = game();
        a.start(ms(0));
        b.start(ms(0));
        assert_eq!(a.signals().target, b.signals().target);
    }

    #[test]
    fn viewport_change_applies_to_next_target() {
        let mut g = game();
        g.start(ms(0));
        g.set_viewport(Viewport::new(100, 100));
        g.tap(ms(10));
        g.advance(ms(510));
        assert_eq!(g.signals().target, Some(Position::new(20, 120)));
    }
}
