// tunepipe - terminal music client
// Loads config and the library, then hands every input line to the session.

use anyhow::{Context, Result};
use clap::Parser;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;
use tracing_subscriber::fmt::writer::{BoxMakeWriter, MakeWriterExt};
use tracing_subscriber::EnvFilter;

use tunepipe::{
    CatalogClient, Config, LocalLibrary, MpvPlayer, NowPlaying, Player, PlaylistStore, Renderer, Session,
    TerminalRenderer,
};

#[derive(Parser)]
#[command(name = "tunepipe")]
#[command(about = "Search, queue and play music from the terminal")]
struct Args {
    /// Config file to use instead of the default location
    #[arg(long)]
    config: Option<PathBuf>,

    /// Enable developer logging (stderr + debug output)
    #[arg(long)]
    dev: bool,

    /// Rebuild the library index from the music directories
    #[arg(long)]
    rescan: bool,
}

fn init_logging(log_dir: &Path, dev: bool) -> Result<()> {
    std::fs::create_dir_all(log_dir)?;

    // Daily rotating file appender
    let file_appender = tracing_appender::rolling::daily(log_dir, "tunepipe.log");
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    let writer = if dev {
        BoxMakeWriter::new(file_writer.and(io::stderr))
    } else {
        BoxMakeWriter::new(file_writer)
    };

    let base_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,tunepipe=debug"));

    let subscriber = tracing_subscriber::fmt()
        .with_writer(writer)
        .with_target(true)
        .with_level(true)
        .with_ansi(false)
        .with_env_filter(base_filter)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    // Keep the writer alive for the whole run
    std::mem::forget(guard);

    Ok(())
}

fn load_library(config: &Config, rescan: bool) -> Result<LocalLibrary> {
    let path = config.library_path();
    if path.exists() && !rescan {
        return LocalLibrary::load(&path);
    }
    scan_library(config, &path)
}

#[cfg(feature = "scan")]
fn scan_library(config: &Config, path: &Path) -> Result<LocalLibrary> {
    println!("Scanning music directories...");
    let entries = tunepipe::library::LibraryScanner::new().scan_directories(&config.music_directories)?;
    let library = LocalLibrary::new(entries);
    library.save(path)?;
    println!("Found {} songs", library.len());
    Ok(library)
}

#[cfg(not(feature = "scan"))]
fn scan_library(_config: &Config, path: &Path) -> Result<LocalLibrary> {
    anyhow::bail!(
        "No library index at {} and this build cannot scan (enable the `scan` feature)",
        path.display()
    )
}

/// Returns `true` when the loop ended on Ctrl-C rather than end of input.
async fn run<C, P, R>(session: &mut Session<C, P, R>) -> Result<bool>
where
    C: CatalogClient,
    P: Player,
    R: Renderer,
{
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    session.start();

    loop {
        session.before_prompt();
        print!("> ");
        io::stdout().flush()?;

        let line = tokio::select! {
            line = lines.next_line() => line.context("Failed to read input")?,
            _ = tokio::signal::ctrl_c() => return Ok(true),
        };

        match line {
            Some(line) => session.transition(&line).await,
            None => return Ok(false),
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = Config::load(args.config.as_deref())?;
    config.prepare()?;
    init_logging(&config.log_dir(), args.dev)?;
    info!("tunepipe starting up");

    let library = load_library(&config, args.rescan)?;
    if library.is_empty() {
        let config_path = args.config.clone().unwrap_or_else(Config::config_path);
        println!("The library is empty. Check music_directories in {}", config_path.display());
    }

    let store = PlaylistStore::new(config.playlists_dir())
        .with_context(|| format!("Could not create {}", config.playlists_dir().display()))?;
    let player = MpvPlayer::from_config(&config.player);
    let renderer = TerminalRenderer::new(&config.ui);
    let now_playing = NowPlaying::new(config.now_playing_file.clone());

    let mut session = Session::new(library, player, renderer, store, now_playing);
    let interrupted = run(&mut session).await?;

    println!();
    info!("tunepipe exiting");

    if interrupted {
        // The stdin reader is still blocked on a read the runtime would wait for
        std::process::exit(0);
    }
    Ok(())
}
