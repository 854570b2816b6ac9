use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use dogtap::{
    app::{App, Flow},
    app_dirs::AppDirs,
    config::{Config, ConfigStore, FileConfigStore},
    logging,
    runtime::{CrosstermEventSource, FixedTicker, GameEvent, GameEventSource, Runner, Ticker},
    ui,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    path::PathBuf,
    time::{Duration, Instant},
};

const TICK_RATE_MS: u64 = 25;

/// terminal reflex game: click the dog before it runs off
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A dog pops up somewhere in your terminal. Click it before it runs off. Every catch scores a point; the high score lasts until you quit."
)]
pub struct Cli {
    /// size of the dog, in game units
    #[clap(long)]
    target_size: Option<u32>,

    /// clear margin kept around the play area, in game units
    #[clap(long)]
    padding: Option<u32>,

    /// milliseconds before an untouched dog runs off
    #[clap(long)]
    expiry_ms: Option<u64>,

    /// milliseconds until the next dog after a catch
    #[clap(long)]
    tap_reshow_ms: Option<u64>,

    /// milliseconds until the next dog after one ran off
    #[clap(long)]
    flee_reshow_ms: Option<u64>,

    /// game units per terminal column
    #[clap(long)]
    cell_width: Option<u32>,

    /// game units per terminal row
    #[clap(long)]
    cell_height: Option<u32>,

    /// seed the position generator for a repeatable game
    #[clap(long)]
    seed: Option<u64>,

    /// where to write the log (defaults to the local state directory)
    #[clap(long)]
    log_file: Option<PathBuf>,

    /// persist the effective settings to the config file
    #[clap(long)]
    save_config: bool,
}

impl Cli {
    /// Layer command line overrides on top of the stored config
    fn apply_to(&self, base: Config) -> Config {
        Config {
            target_size: self.target_size.unwrap_or(base.target_size),
            padding: self.padding.unwrap_or(base.padding),
            expiry_ms: self.expiry_ms.unwrap_or(base.expiry_ms),
            tap_reshow_ms: self.tap_reshow_ms.unwrap_or(base.tap_reshow_ms),
            flee_reshow_ms: self.flee_reshow_ms.unwrap_or(base.flee_reshow_ms),
            cell_width: self.cell_width.unwrap_or(base.cell_width),
            cell_height: self.cell_height.unwrap_or(base.cell_height),
            ..base
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    if let Some(path) = cli.log_file.clone().or_else(AppDirs::log_path) {
        logging::init(&path)?;
    }

    let store = FileConfigStore::new();
    let config = cli.apply_to(store.load());
    if let Err(error) = config.validate() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::ValueValidation, error).exit();
    }
    if cli.save_config {
        store.save(&config)?;
        tracing::info!(path = %store.path().display(), "saved config");
    }
    tracing::info!(?config, seed = ?cli.seed, "starting");

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let size = terminal.size()?;
    let mut app = App::new(&config, size.width, size.height, cli.seed);
    let result = start_tui(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

fn start_tui<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<(), Box<dyn Error>> {
    let runner = Runner::new(
        CrosstermEventSource::new(),
        FixedTicker::new(Duration::from_millis(TICK_RATE_MS)),
    );
    run_loop(terminal, app, &runner, Instant::now())
}

/// Drive `app` from `runner` until a quit key arrives
fn run_loop<B: Backend, E: GameEventSource, T: Ticker>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    runner: &Runner<E, T>,
    origin: Instant,
) -> Result<(), Box<dyn Error>> {
    terminal.draw(|f| ui::draw(app, f))?;

    loop {
        let event = runner.step();
        let now = origin.elapsed();

        // timers fire on every pass; a steady input stream never yields Tick
        let before = app.game.signals();
        app.on_tick(now);

        let mut redraw = false;
        match event {
            GameEvent::Tick => {}
            GameEvent::Resize(cols, rows) => {
                app.on_resize(cols, rows);
                redraw = true;
            }
            GameEvent::Mouse(mouse) => app.on_mouse(mouse, now),
            GameEvent::Key(key) => {
                if app.on_key(key, now) == Flow::Quit {
                    app.game.end(now);
                    break;
                }
            }
        }

        if redraw || app.game.signals() != before {
            terminal.draw(|f| ui::draw(app, f))?;
        }
    }

    Ok(())
}
