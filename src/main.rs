use std::{
    io::{self, stdin},
    path::PathBuf,
    sync::Once,
    time::{Duration, Instant},
};

use anyhow::{Context, Result};
use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Frame, Terminal,
};
use tracing::{debug, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use wordrace::{
    app_dirs::AppDirs,
    config::{Config, ConfigStore, FileConfigStore, Overrides},
    controller::{Session, SessionEvent},
    highlight::HighlightTimers,
    input::{translate, Action},
    runtime::{CrosstermEventSource, FixedTicker, RaceEvent, RaceEventSource, Runner, Ticker},
    texts::{Difficulty, TextRotation},
    ui::SessionView,
};

/// typing speed test: only correct keystrokes get through
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A typing speed test that gates every keystroke against the sample text, highlights the word you are on, and scores words per minute, accuracy and mistakes."
)]
pub struct Cli {
    /// sample pool to draw sentences from
    #[clap(short = 'd', long, value_enum)]
    difficulty: Option<Difficulty>,

    /// how long the error flash stays up after a wrong key, in milliseconds
    #[clap(long)]
    highlight_ms: Option<u64>,

    /// read preferences from this file instead of the default location
    #[clap(short = 'c', long)]
    config: Option<PathBuf>,

    /// log filter used when RUST_LOG is unset (e.g. "debug", "wordrace=trace")
    #[clap(long)]
    log_level: Option<String>,
}

impl Cli {
    fn overrides(&self) -> Overrides {
        Overrides {
            difficulty: self.difficulty,
            highlight_ms: self.highlight_ms,
            log_level: self.log_level.clone(),
        }
    }

    fn load_config(&self) -> Config {
        let store = match &self.config {
            Some(path) => FileConfigStore::with_path(path),
            None => FileConfigStore::new(),
        };
        store.load().merged(self.overrides())
    }
}

#[derive(Debug)]
pub struct App {
    pub session: Session,
    pub timers: HighlightTimers,
}

impl App {
    pub fn new(config: &Config) -> Result<Self> {
        let rotation = TextRotation::embedded().context("loading sample texts")?;
        Ok(Self {
            session: Session::new(
                rotation,
                config.difficulty,
                Duration::from_millis(config.highlight_ms),
            ),
            timers: HighlightTimers::default(),
        })
    }

    pub fn dispatch(&mut self, event: SessionEvent, now: Instant) {
        let render = self.session.apply(event, now);
        if let Some(ticket) = render.highlight_ticket {
            self.timers.schedule(ticket);
        }
    }

    /// Fires the deferred highlight clears that have come due
    pub fn on_tick(&mut self, now: Instant) {
        for generation in self.timers.take_due(now) {
            self.session.apply(SessionEvent::ClearHighlight(generation), now);
        }
    }
}

fn configure_logging(config: &Config) -> Result<Option<WorkerGuard>> {
    let log_dir = AppDirs::log_dir();
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("creating log directory {}", log_dir.display()))?;

    let file_appender = tracing_appender::rolling::never(&log_dir, "wordrace.log");
    let (nb_writer, guard) = tracing_appender::non_blocking(file_appender);
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    match tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(nb_writer)
        .try_init()
    {
        Ok(_) => Ok(Some(guard)),
        // a subscriber is already installed; dropping the guard shuts our writer down
        Err(_) => Ok(None),
    }
}

fn install_panic_hook() {
    static HOOK: Once = Once::new();
    HOOK.call_once(|| {
        let default_panic = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            let _ = disable_raw_mode();
            let _ = execute!(io::stdout(), LeaveAlternateScreen);
            tracing::error!(target: "runtime.panic", ?info, "panic");
            default_panic(info);
        }));
    });
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let config = cli.load_config();
    let _log_guard = configure_logging(&config)?;
    install_panic_hook();
    info!(target: "runtime", ?config, "startup");

    let mut app = App::new(&config)?;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let runner = Runner::new(CrosstermEventSource::new(), FixedTicker::default());
    let result = start_tui(&mut terminal, &mut app, &runner);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    info!(target: "runtime", "shutdown");
    result
}

fn start_tui<B: Backend, E: RaceEventSource, T: Ticker>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    runner: &Runner<E, T>,
) -> Result<()> {
    terminal.draw(|f| ui(app, f))?;

    loop {
        let now = Instant::now();
        match runner.step() {
            RaceEvent::Tick => {
                let was_active = app.session.highlight().is_active();
                app.on_tick(now);
                // redraw while the clock runs or the flash just went out
                if (app.session.state().has_started() && !app.session.state().has_finished())
                    || was_active != app.session.highlight().is_active()
                {
                    terminal.draw(|f| ui(app, f))?;
                }
            }
            RaceEvent::Resize => {
                terminal.draw(|f| ui(app, f))?;
            }
            RaceEvent::Disconnected => {
                warn!(target: "runtime", "event source disconnected, leaving");
                break;
            }
            RaceEvent::Key(key) => {
                match translate(key, &app.session) {
                    Some(Action::Quit) => {
                        debug!(target: "runtime", "quit requested");
                        break;
                    }
                    Some(Action::Session(event)) => app.dispatch(event, now),
                    None => {}
                }
                terminal.draw(|f| ui(app, f))?;
            }
        }
    }

    Ok(())
}

fn ui(app: &App, f: &mut Frame) {
    let view = SessionView::new(&app.session, Instant::now());
    f.render_widget(&view, f.area());
}
