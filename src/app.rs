use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};

use crate::config::Config;
use crate::game::Game;
use crate::geometry::{CellScale, CellSpan, Geometry, Viewport};

/// What the event loop should do after handling an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Terminal-facing wrapper around [`Game`]: translates keys, clicks and
/// resizes into game operations.
#[derive(Debug)]
pub struct App {
    pub game: Game,
    pub scale: CellScale,
}

impl App {
    pub fn new(config: &Config, cols: u16, rows: u16, seed: Option<u64>) -> Self {
        let scale = config.cell_scale();
        let viewport = scale.viewport(cols, rows);
        let game = match seed {
            Some(seed) => Game::with_seed(config.geometry(), config.timings(), viewport, seed),
            None => Game::new(config.geometry(), config.timings(), viewport),
        };
        Self { game, scale }
    }

    pub fn geometry(&self) -> &Geometry {
        self.game.geometry()
    }

    pub fn viewport(&self) -> Viewport {
        self.game.viewport()
    }

    pub fn terminal_fits(&self) -> bool {
        self.geometry().fits(self.viewport())
    }

    /// Cells covered by the visible target
    pub fn target_cells(&self) -> Option<CellSpan> {
        let size = self.geometry().target_size;
        self.game
            .signals()
            .target
            .map(|position| self.scale.span(position, size))
    }

    pub fn on_key(&mut self, key: KeyEvent, now: Duration) -> Flow {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Flow::Quit;
        }

        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => return Flow::Quit,
            KeyCode::Char('s') | KeyCode::Enter => self.game.start(now),
            KeyCode::Char('e') => self.game.end(now),
            _ => {}
        }
        Flow::Continue
    }

    pub fn on_mouse(&mut self, mouse: MouseEvent, now: Duration) {
        if mouse.kind != MouseEventKind::Down(MouseButton::Left) || !self.game.is_active() {
            return;
        }

        let col = mouse.column as u32;
        let row = mouse.row as u32;
        match self.target_cells() {
            Some(span) if span.contains(col, row) => self.game.tap(now),
            _ => self.game.miss(now),
        }
    }

    pub fn on_resize(&mut self, cols: u16, rows: u16) {
        self.game.set_viewport(self.scale.viewport(cols, rows));
    }

    pub fn on_tick(&mut self, now: Duration) {
        self.game.advance(now);
    }
}
