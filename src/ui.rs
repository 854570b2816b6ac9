pub mod screen;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Widget},
    Frame,
};

use crate::{app::App, geometry::CellSpan, session::Phase, ui::screen::current_screen};

const HEADER_HEIGHT: u16 = 3;
const FOOTER_HEIGHT: u16 = 1;
const DOG_FACE: &str = "U・ᴥ・U";

pub fn draw(app: &App, f: &mut Frame) {
    f.render_widget(app, f.area());
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(HEADER_HEIGHT),
                Constraint::Min(0),
                Constraint::Length(FOOTER_HEIGHT),
            ])
            .split(area);

        render_header(self, chunks[0], buf);
        current_screen(self.game.phase()).render(self, area, chunks[1], buf);
        render_footer(self, chunks[2], buf);
    }
}

fn render_header(app: &App, area: Rect, buf: &mut Buffer) {
    let signals = app.game.signals();
    let bold_style = Style::default().add_modifier(Modifier::BOLD);
    let dim_style = Style::default().add_modifier(Modifier::DIM);

    let mut spans = vec![
        Span::styled(format!("score {}", signals.score), bold_style.fg(Color::Green)),
        Span::raw("   "),
        Span::styled(
            format!("high score {}", signals.high_score),
            bold_style.fg(Color::Yellow),
        ),
        Span::raw("   "),
        Span::styled(
            format!("fled {}   missed {}", signals.fled, signals.misses),
            dim_style,
        ),
    ];
    if let Some(fastest) = signals.reactions.fastest {
        spans.push(Span::raw("   "));
        spans.push(Span::styled(
            format!("best {}ms", fastest.as_millis()),
            Style::default().fg(Color::Cyan),
        ));
    }

    let title = match signals.phase {
        Phase::Idle => " dogtap ",
        Phase::Active => " dogtap - go! ",
    };
    Paragraph::new(Line::from(spans))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title(title))
        .render(area, buf);
}

fn render_footer(app: &App, area: Rect, buf: &mut Buffer) {
    let legend = match app.game.phase() {
        Phase::Idle => "(s)tart / (q)uit",
        Phase::Active => "click the dog / (s) restart / (e)nd / (q)uit",
    };
    Paragraph::new(Span::styled(
        legend,
        Style::default().add_modifier(Modifier::ITALIC),
    ))
    .render(area, buf);
}

/// Terminal rect for a target span, clipped to `area`
pub fn span_rect(span: CellSpan, area: Rect) -> Rect {
    let clamp = |v: u32| u16::try_from(v).unwrap_or(u16::MAX);
    Rect {
        x: area.x.saturating_add(clamp(span.col)),
        y: area.y.saturating_add(clamp(span.row)),
        width: clamp(span.cols),
        height: clamp(span.rows),
    }
    .intersection(area)
}

/// Draw the dog for `span` (relative to `frame`), never outside `clip`
pub fn render_target(span: CellSpan, frame: Rect, clip: Rect, buf: &mut Buffer) {
    let rect = span_rect(span, frame).intersection(clip);
    if rect.is_empty() {
        return;
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD));
    let inner = block.inner(rect);
    block.render(rect, buf);

    if inner.height > 0 {
        // vertically centre the face
        let face_area = Rect {
            y: inner.y + inner.height / 2,
            height: 1,
            ..inner
        };
        Paragraph::new(DOG_FACE)
            .alignment(Alignment::Center)
            .render(face_area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use ratatui::{backend::TestBackend, Terminal};
    use std::time::Duration;

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    fn app(cols: u16, rows: u16) -> App {
        App::new(&Config::default(), cols, rows, Some(9))
    }

    #[test]
    fn idle_screen_shows_prompt_and_scores() {
        let app = app(100, 40);
        let mut terminal = Terminal::new(TestBackend::new(100, 40)).unwrap();
        terminal.draw(|f| draw(&app, f)).unwrap();

        let content = buffer_text(&terminal);
        assert!(content.contains("score 0"));
        assert!(content.contains("high score 0"));
        assert!(content.contains("(s)tart"));
        assert!(!content.contains(DOG_FACE));
    }

    #[test]
    fn active_screen_draws_the_dog_where_it_is() {
        let mut app = app(100, 40);
        app.game.start(Duration::ZERO);
        let span = app.target_cells().unwrap();

        let mut terminal = Terminal::new(TestBackend::new(100, 40)).unwrap();
        terminal.draw(|f| draw(&app, f)).unwrap();

        let buffer = terminal.backend().buffer();
        let corner = &buffer[(span.col as u16, span.row as u16)];
        assert_eq!(corner.symbol(), "╭");
        assert!(buffer_text(&terminal).contains("(e)nd"));
    }

    #[test]
    fn hidden_target_is_not_drawn() {
        let mut app = app(100, 40);
        app.game.start(Duration::ZERO);
        app.game.tap(Duration::from_millis(100));

        let mut terminal = Terminal::new(TestBackend::new(100, 40)).unwrap();
        terminal.draw(|f| draw(&app, f)).unwrap();

        let content = buffer_text(&terminal);
        assert!(!content.contains('╭'));
        assert!(content.contains("score 1"));
    }

    #[test]
    fn small_terminal_shows_warning() {
        let app = app(20, 12);
        let mut terminal = Terminal::new(TestBackend::new(20, 12)).unwrap();
        terminal.draw(|f| draw(&app, f)).unwrap();
        assert!(buffer_text(&terminal).contains("too small"));
    }

    #[test]
    fn span_rect_is_clipped() {
        let area = Rect::new(0, 0, 20, 10);
        let span = CellSpan {
            col: 15,
            row: 8,
            cols: 10,
            rows: 5,
        };
        assert_eq!(span_rect(span, area), Rect::new(15, 8, 5, 2));

        let outside = CellSpan {
            col: 30,
            row: 0,
            cols: 2,
            rows: 2,
        };
        assert!(span_rect(outside, area).is_empty());
    }

    #[test]
    fn dog_never_covers_the_header() {
        // 60 units per row puts the lowest placement on row 2, inside the header
        let config = Config {
            cell_height: 60,
            ..Config::default()
        };
        let mut app = App::new(&config, 100, 7, Some(9));
        app.game.start(Duration::ZERO);
        let span = app.target_cells().unwrap();
        assert_eq!(span.row, 2);

        let mut terminal = Terminal::new(TestBackend::new(100, 7)).unwrap();
        terminal.draw(|f| draw(&app, f)).unwrap();

        let buffer = terminal.backend().buffer();
        assert_eq!(buffer[(span.col as u16, 2)].symbol(), "─");
        // clipped to the body, only the dog's border row survives
        assert!(["╭", "╰", "│"].contains(&buffer[(span.col as u16, 3)].symbol()));
        // the size warning stays visible mid-session
        assert!(buffer_text(&terminal).contains("too small"));
    }
}
