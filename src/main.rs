//! playmatch - resolve spoken phrases against a music library.
//!
//! Usage:
//!   playmatch library.json "road trip" "21 by adele"
//!   playmatch library.sqlite --no-songs < phrases.txt
//!   playmatch library.json --config resolver.toml --json "xmas classics"
//!   playmatch library.json --play "hello by adele"

use anyhow::{Context, Result};
use clap::Parser;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::time::Instant;
use tracing::{info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use playmatch::config::ResolverConfig;
use playmatch::library::{FileLibrary, LibraryProvider};
use playmatch::models::Resolution;
use playmatch::playback::RecordingController;
use playmatch::progress::{create_spinner, format_duration, is_log_only, set_log_only};
use playmatch::session::{PlayOutcome, Session};

#[derive(Parser)]
#[command(name = "playmatch")]
#[command(about = "Resolve spoken phrases to songs, albums, artists and playlists")]
struct Args {
    /// Library snapshot (.json, or .sqlite/.db)
    library: PathBuf,

    /// Phrases to resolve; read from stdin, one per line, when omitted
    queries: Vec<String>,

    /// Do not index individual songs
    #[arg(long)]
    no_songs: bool,

    /// Resolver configuration (TOML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Hide the spinner for tail-friendly output
    #[arg(long)]
    log_only: bool,

    /// Print each resolution as a JSON object
    #[arg(long)]
    json: bool,

    /// Also locate each match in the library and report what would play
    #[arg(long)]
    play: bool,
}

fn print_resolution<W: Write>(out: &mut W, query: &str, resolution: Option<&Resolution>, json: bool) -> Result<()> {
    if json {
        writeln!(out, "{}", serde_json::to_string(&resolution)?)?;
        return Ok(());
    }
    match resolution {
        Some(resolution) => writeln!(out, "{}", resolution.trace_line())?,
        None => writeln!(out, "\"{}\" to nothing", query)?,
    }
    Ok(())
}

fn handle_query<P: LibraryProvider, W: Write>(
    session: &Session<P>,
    controller: &mut RecordingController,
    out: &mut W,
    query: &str,
    args: &Args,
) -> Result<()> {
    if !args.play {
        let resolution = session.resolve(query)?;
        return print_resolution(out, query, resolution.as_ref(), args.json);
    }

    let outcome = session.play(query, controller)?;
    // Dry run: only the outcome matters, not the recorded history
    controller.actions.clear();

    match outcome {
        PlayOutcome::Played { resolution, queue } => {
            print_resolution(out, query, Some(&resolution), args.json)?;
            if !args.json {
                writeln!(out, "  queued {} item(s)", queue.len())?;
            }
        }
        PlayOutcome::Stale { resolution } => {
            print_resolution(out, query, Some(&resolution), args.json)?;
            if !args.json {
                writeln!(out, "  no playable match, catalog rebuilt")?;
            }
        }
        PlayOutcome::NoMatch => print_resolution(out, query, None, args.json)?,
        PlayOutcome::Resumed => {}
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    set_log_only(args.log_only);

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "playmatch=info".into()))
        .with(fmt::layer().with_writer(io::stderr))
        .init();

    let mut config = ResolverConfig::load_or_default(args.config.as_deref())
        .context("Failed to load resolver configuration")?;
    if args.no_songs {
        config.include_songs = false;
    }

    let session = Session::new(FileLibrary::new(&args.library), config);

    let start = Instant::now();
    let spinner = create_spinner("Building catalog");
    let catalog = session
        .catalog()
        .with_context(|| format!("Failed to build catalog from {:?}", args.library))?;
    let stats = catalog.stats();
    spinner.finish_and_clear();
    if !is_log_only() {
        eprintln!(
            "Catalog ready in {}: {} songs, {} albums, {} artists, {} playlists",
            format_duration(start.elapsed()),
            stats.songs,
            stats.albums,
            stats.artists,
            stats.playlists
        );
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut controller = RecordingController::new();

    if !args.queries.is_empty() {
        for query in &args.queries {
            handle_query(&session, &mut controller, &mut out, query, &args)?;
        }
        return Ok(());
    }

    info!("Reading phrases from stdin");
    for line in io::stdin().lock().lines() {
        let line = line.context("Failed to read stdin")?;
        let query = line.trim();
        if query.is_empty() {
            warn!("Skipping empty phrase");
            continue;
        }
        handle_query(&session, &mut controller, &mut out, query, &args)?;
    }

    Ok(())
}
