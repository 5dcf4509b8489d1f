mod ui;

use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use log::{info, warn};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    sync::Arc,
    time::{Duration, Instant},
};
use typespeed::{
    app_dirs::AppDirs,
    config::{Config, ConfigStore, FileConfigStore},
    controller::SessionController,
    logging,
    provider::{
        provider_or_unavailable, ChannelTextLoader, QuoteApiProvider, TextLoader, MAX_QUOTE_COUNT,
    },
    runtime::{AppEvent, AppEventSource, CrosstermEventSource, FixedTicker, Runner, Ticker},
    session::{TestDuration, Theme},
};

const TICK_RATE_MS: u64 = 100;

/// timed typing speed test with accuracy, cps and cpm results
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A timed typing speed test for the terminal. Type a paragraph of random quotes against the clock and get accuracy, characters per second and characters per minute."
)]
pub struct Cli {
    /// number of seconds to run the test
    #[clap(short = 's', long, value_enum)]
    secs: Option<TestDuration>,

    /// color theme
    #[clap(short = 't', long, value_enum)]
    theme: Option<Theme>,

    /// number of quotes joined into the sample paragraph
    #[clap(short = 'q', long, value_parser = clap::value_parser!(u16).range(1..=MAX_QUOTE_COUNT as i64))]
    quotes: Option<u16>,

    /// endpoint serving sample quotes as {"quotes": [{"quote": "..."}]}
    #[clap(long)]
    url: Option<String>,
}

impl Cli {
    /// Overlay command line flags onto the stored settings for this run
    fn apply(&self, mut config: Config) -> Config {
        if let Some(secs) = self.secs {
            config.duration = secs;
        }
        if let Some(theme) = self.theme {
            config.theme = theme;
        }
        if let Some(quotes) = self.quotes {
            config.quote_count = quotes as usize;
        }
        if let Some(url) = &self.url {
            config.quotes_url = url.clone();
        }
        config
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    Continue,
    Quit,
}

pub struct App {
    pub controller: SessionController,
    pub config: Config,
    store: Box<dyn ConfigStore>,
}

impl App {
    pub fn new(config: Config, loader: Box<dyn TextLoader>, store: Box<dyn ConfigStore>) -> Self {
        Self {
            controller: SessionController::new(config.duration, config.theme, loader),
            config,
            store,
        }
    }

    pub fn on_key(&mut self, key: KeyEvent) -> KeyOutcome {
        if key.kind == KeyEventKind::Release {
            return KeyOutcome::Continue;
        }

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => return KeyOutcome::Quit,
            KeyCode::Char('c') if ctrl => return KeyOutcome::Quit,
            KeyCode::Char('r') if ctrl => self.controller.reset(),
            KeyCode::Char('t') if ctrl => {
                self.controller.toggle_theme();
                self.config.theme = self.controller.session().theme();
                self.persist();
            }
            KeyCode::Char('d') if ctrl => {
                let next = self.controller.session().duration().next();
                if self.controller.set_duration(next) {
                    self.config.duration = next;
                    self.persist();
                }
            }
            KeyCode::Enter => self.controller.start(),
            KeyCode::Tab => self.controller.pause(),
            KeyCode::Backspace => self.erase_char(),
            KeyCode::Char(c) if !ctrl => self.type_char(c),
            _ => {}
        }
        KeyOutcome::Continue
    }

    fn type_char(&mut self, c: char) {
        let session = self.controller.session();
        // never type past the end of the reference text
        if session.typed_len() >= session.reference_len() {
            return;
        }
        let mut value = session.typed_input().to_owned();
        value.push(c);
        self.controller.on_keystroke(&value);
    }

    fn erase_char(&mut self) {
        let mut value = self.controller.session().typed_input().to_owned();
        if value.pop().is_some() {
            self.controller.on_keystroke(&value);
        }
    }

    fn persist(&self) {
        if let Err(e) = self.store.save(&self.config) {
            warn!("could not save config: {e}");
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    if let Some(path) = AppDirs::log_path() {
        // logging is best effort
        let _ = logging::init_file_logger(&path);
    }

    let store = FileConfigStore::new();
    let config = cli.apply(store.load());
    info!(
        "starting: {}s, {} theme, {} quotes from {}",
        config.duration.secs(),
        config.theme,
        config.quote_count,
        config.quotes_url
    );

    let provider = provider_or_unavailable(QuoteApiProvider::new(
        config.quotes_url.clone(),
        config.quote_count,
    ));

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let events = CrosstermEventSource::new();
    let loader = ChannelTextLoader::new(provider, events.sender());
    let mut app = App::new(config, Box::new(loader), Box::new(store));
    let runner = Runner::new(events, FixedTicker::new(Duration::from_millis(TICK_RATE_MS)));

    let result = start_tui(&mut terminal, &mut app, &runner);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen,)?;
    terminal.show_cursor()?;

    result
}

fn start_tui<B: Backend, E: AppEventSource, T: Ticker>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    runner: &Runner<E, T>,
) -> Result<(), Box<dyn Error>> {
    let mut last_step = Instant::now();

    loop {
        terminal.draw(|f| ui::draw(app, f))?;

        let event = runner.step();

        let now = Instant::now();
        app.controller.advance(now.duration_since(last_step));
        last_step = now;

        match event {
            AppEvent::Tick | AppEvent::Resize => {}
            AppEvent::TextLoaded { request, result } => {
                app.controller.on_text_loaded(request, result);
            }
            AppEvent::Key(key) => {
                if app.on_key(key) == KeyOutcome::Quit {
                    break;
                }
            }
        }
    }

    app.controller.unmount();
    info!("shutting down");
    Ok(())
}
