use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{DisableBracketedPaste, EnableBracketedPaste},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use harf::{
    app::App,
    app_dirs::AppDirs,
    config::{ConfigStore, FileConfigStore, Settings},
    engine::SessionEngine,
    history::SessionLog,
    leaderboard::Leaderboard,
    logging,
    passages::{PassageBank, PassageSource, Tier},
    runtime::{
        Clock, CrosstermEventSource, FixedTicker, HarfEventSource, Runner, ThreadClock, Ticker,
    },
    store::{self, MemoryStore, SqliteStore, Storage, LEADERBOARD_KEY},
    ui::leaderboard::entry_cells,
};
use log::LevelFilter;
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    io::{self, stdin, Write},
    path::{Path, PathBuf},
    time::Duration,
};

const REDRAW_INTERVAL_MS: u64 = 100;

/// timed arabic typing practice with live feedback and a local leaderboard
#[derive(Parser, Debug, Clone)]
#[clap(version, about)]
pub struct Cli {
    /// difficulty level to draw passages from
    #[clap(short = 't', long, value_enum)]
    tier: Option<Tier>,

    /// session length in seconds
    #[clap(short = 'd', long, value_parser = clap::value_parser!(u32).range(1..))]
    duration: Option<u32>,

    /// name recorded on the leaderboard
    #[clap(short = 'n', long)]
    name: Option<String>,

    /// path to the leaderboard database
    #[clap(long)]
    db: Option<PathBuf>,

    /// print the leaderboard and exit
    #[clap(long)]
    leaderboard: bool,

    /// log level written to the log file (overrides RUST_LOG)
    #[clap(long)]
    log_level: Option<LevelFilter>,
}

fn open_store(path: Option<&Path>) -> Box<dyn Storage> {
    let opened = match path {
        Some(path) => SqliteStore::open(path),
        None => SqliteStore::new(),
    };
    match opened {
        Ok(store) => Box::new(store),
        Err(e) => {
            log::error!("leaderboard database unavailable, results will not persist: {e}");
            Box::new(MemoryStore::new())
        }
    }
}

fn print_leaderboard<W: Write>(store: &dyn Storage, out: &mut W) -> io::Result<()> {
    let board = Leaderboard::from_entries(store::load_or(store, LEADERBOARD_KEY, Vec::new()));
    if board.is_empty() {
        return writeln!(out, "no sessions recorded yet");
    }

    let now = chrono::Local::now();
    writeln!(out, "#\tname\tscore\twords\tacc\tcpm\tlevel")?;
    for (rank, entry) in board.entries().iter().enumerate() {
        writeln!(out, "{}", entry_cells(rank, entry, now).join("\t"))?;
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if let Some(log_path) = AppDirs::log_path() {
        // the session still runs without a log file
        if let Err(e) = logging::init_file(&log_path, cli.log_level) {
            eprintln!("logging disabled, cannot open {}: {e}", log_path.display());
        }
    }

    let store = open_store(cli.db.as_deref());

    if cli.leaderboard {
        print_leaderboard(store.as_ref(), &mut io::stdout())?;
        return Ok(());
    }

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let config = FileConfigStore::new().load();
    let settings = Settings::resolve(
        cli.tier,
        cli.duration,
        cli.name.clone(),
        &config,
        store.as_ref(),
    );
    let bank = PassageBank::embedded()?;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let events = CrosstermEventSource::new();
    let clock = ThreadClock::new(events.sender());
    let mut engine = SessionEngine::new(bank, clock, settings.tier, settings.duration_secs);
    engine.set_player_name(settings.player_name);

    let mut app = App::new(engine, store, SessionLog::new());
    if let Some(name) = &cli.name {
        app.set_player_name(name);
    }

    let runner = Runner::new(
        events,
        FixedTicker::new(Duration::from_millis(REDRAW_INTERVAL_MS)),
    );
    let result = start_tui(&mut terminal, &mut app, &runner);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableBracketedPaste,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    result
}

fn start_tui<B, P, C, E, T>(
    terminal: &mut Terminal<B>,
    app: &mut App<P, C>,
    runner: &Runner<E, T>,
) -> Result<(), Box<dyn Error>>
where
    B: Backend,
    P: PassageSource,
    C: Clock,
    E: HarfEventSource,
    T: Ticker,
{
    terminal.draw(|f| f.render_widget(&*app, f.area()))?;

    while !app.should_quit {
        // Idle steps still redraw while running so the countdown stays live
        let redraw = app.handle_event(runner.step()) || app.engine.is_running();
        if redraw {
            terminal.draw(|f| f.render_widget(&*app, f.area()))?;
        }
    }

    Ok(())
}
