//! `lyricstamp` - record when each lyric line starts while a track plays.
//!
//! Usage: `lyricstamp [LYRICS_FILE] [--annotations FILE] [--resume FILE.lrcx]`

use crossterm::{
    event::{self, DisableBracketedPaste, EnableBracketedPaste},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use std::path::PathBuf;
use std::sync::Mutex;
use std::{io, panic, time::Duration};
use tracing_subscriber::EnvFilter;

use lyricstamp::app::{App, Collaborators};
use lyricstamp::config::Config;
use lyricstamp::constants::paths::LOG_FILE_NAME;
use lyricstamp::constants::ui::POLL_INTERVAL_MS;
use lyricstamp::error::{Error, Result};
use lyricstamp::player::AppleScriptPlayer;
use lyricstamp::sources::{
    AnnotationSource, ClipboardLineSource, CommandAnnotationSource, FileAnnotationSource, FileLineSource,
    FileSink, LineSource,
};
use lyricstamp::ui;

/// Command line arguments.
#[derive(Debug, Default)]
struct Args {
    lyrics: Option<PathBuf>,
    annotations: Option<PathBuf>,
    resume: Option<PathBuf>,
}

const USAGE: &str = "lyricstamp [LYRICS_FILE] [--annotations FILE] [--resume FILE.lrcx]";

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Args> {
    let mut parsed = Args::default();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--annotations" | "-a" => {
                let path = args.next().ok_or_else(|| Error::config("--annotations needs a file", USAGE))?;
                parsed.annotations = Some(PathBuf::from(path));
            }
            "--resume" | "-r" => {
                let path = args.next().ok_or_else(|| Error::config("--resume needs a file", USAGE))?;
                parsed.resume = Some(PathBuf::from(path));
            }
            flag if flag.starts_with('-') => {
                return Err(Error::config(format!("unknown option {flag}"), USAGE));
            }
            path => parsed.lyrics = Some(PathBuf::from(path)),
        }
    }
    Ok(parsed)
}

// Log to a file in the lyrics directory, the terminal belongs to the UI
fn init_logging(config: &Config) -> Result<()> {
    fs_err::create_dir_all(&config.lyrics_dir)?;
    let file = fs_err::OpenOptions::new()
        .create(true)
        .append(true)
        .open(config.lyrics_dir.join(LOG_FILE_NAME))?;

    let filter = EnvFilter::try_new(&config.log_filter).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file.into_parts().0))
        .with_ansi(false)
        .init();
    Ok(())
}

fn collaborators(config: &Config, args: Args) -> Collaborators {
    let mut line_sources: Vec<Box<dyn LineSource>> = Vec::new();
    if let Some(path) = args.lyrics {
        line_sources.push(Box::new(FileLineSource::new(path)));
    }
    line_sources.push(Box::new(ClipboardLineSource));

    let mut annotation_sources: Vec<Box<dyn AnnotationSource>> = Vec::new();
    if let Some(path) = args.annotations {
        annotation_sources.push(Box::new(FileAnnotationSource::new(path)));
    }
    if let Some(command) = &config.annotation_command {
        annotation_sources.push(Box::new(CommandAnnotationSource::new(command.clone())));
    }

    Collaborators {
        player: Box::new(AppleScriptPlayer::new(config.player_app.clone())),
        sink: Box::new(FileSink::new(config.lyrics_dir.clone())),
        line_sources,
        annotation_sources,
    }
}

// Helper function to ensure the terminal is cleaned up on exit
fn cleanup_terminal<B: Backend + io::Write>(terminal: &mut Terminal<B>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), DisableBracketedPaste, LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let mut args = parse_args(std::env::args().skip(1))?;
    let config = Config::load()?;
    init_logging(&config)?;
    tracing::info!(
        "Starting {} {} with player {:?}, saving to {}",
        config.app_name(),
        config.app_version(),
        config.player_app,
        config.lyrics_dir.display()
    );

    // Setup better panic handling that cleans up terminal first
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), DisableBracketedPaste, LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let resume = args.resume.take();
    let collaborators = collaborators(&config, args);
    let mut app = App::new(config, collaborators);
    if let Some(path) = resume {
        app.resume_from(&path)?;
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, app).await;

    // Restore terminal
    if let Err(e) = cleanup_terminal(&mut terminal) {
        eprintln!("Error cleaning up terminal: {e:?}");
    }

    if let Err(err) = &res {
        tracing::error!("Exiting after error: {err}");
    }
    res
}

async fn run_app<B: Backend>(terminal: &mut Terminal<B>, mut app: App) -> Result<()> {
    loop {
        terminal.draw(|f| ui::draw(f, &mut app))?;

        // Polling also redraws the session clock while nothing is pressed
        if event::poll(Duration::from_millis(POLL_INTERVAL_MS))? {
            if let event::Event::Key(key) = event::read()? {
                if key.kind == event::KeyEventKind::Press {
                    app.handle_key(key).await;
                }
            }
        } else {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }

        if app.should_quit() {
            break;
        }
    }
    tracing::info!("Quit");
    Ok(())
}
