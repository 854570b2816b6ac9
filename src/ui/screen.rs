use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget, Wrap},
};

use crate::{app::App, session::Phase, ui::render_target};

/// A UI Screen boundary: draws the body between header and footer
pub trait Screen {
    /// `frame` is the whole terminal (target coordinates are relative to it),
    /// `body` the space left between header and footer.
    fn render(&self, app: &App, frame: Rect, body: Rect, buf: &mut Buffer);
}

/// Between sessions: title, last session summary, size warning
pub struct IdleScreen;

impl Screen for IdleScreen {
    fn render(&self, app: &App, _frame: Rect, body: Rect, buf: &mut Buffer) {
        let signals = app.game.signals();
        let bold_style = Style::default().add_modifier(Modifier::BOLD);

        let mut lines = vec![
            Line::from(Span::styled(
                "catch the dog before it runs off",
                bold_style.fg(Color::Yellow),
            )),
            Line::from(""),
            Line::from(Span::styled(
                "press s to start",
                Style::default().add_modifier(Modifier::ITALIC),
            )),
        ];

        if let (Some(mean), Some(sd)) = (signals.reactions.mean_ms, signals.reactions.std_dev_ms) {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                format!("last run: {} caught   {mean:.0}ms avg   {sd:.0}ms sd", signals.score),
                Style::default().fg(Color::Cyan),
            )));
        }

        if !app.terminal_fits() {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                "terminal too small",
                bold_style.fg(Color::Red),
            )));
        }

        let height = lines.len() as u16;
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(body.height.saturating_sub(height) / 2),
                Constraint::Min(height),
            ])
            .split(body);

        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .render(chunks[1], buf);
    }
}

/// During a session: the dog, if it is out, plus the size warning
pub struct PlayScreen;

impl Screen for PlayScreen {
    fn render(&self, app: &App, frame: Rect, body: Rect, buf: &mut Buffer) {
        if let Some(span) = app.target_cells() {
            render_target(span, frame, body, buf);
        }

        if !app.terminal_fits() && body.height > 0 {
            let last_row = Rect {
                y: body.bottom() - 1,
                height: 1,
                ..body
            };
            Paragraph::new(Span::styled(
                "terminal too small",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ))
            .alignment(Alignment::Center)
            .render(last_row, buf);
        }
    }
}

/// Helper to construct the appropriate screen for the current phase
pub fn current_screen(phase: Phase) -> Box<dyn Screen> {
    match phase {
        Phase::Idle => Box::new(IdleScreen),
        Phase::Active => Box::new(PlayScreen),
    }
}
