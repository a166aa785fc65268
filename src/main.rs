use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

use photo_preheat::cache::{CachingManager, ThumbnailPreheater};
use photo_preheat::error::{IndexError, LibraryError, SettingsError};
use photo_preheat::logging::init_logging;
use photo_preheat::preheat::{GridLayout, Rect};
use photo_preheat::state::cursor::PhotoCursor;
use photo_preheat::state::import::{import_folder, ImportResult};
use photo_preheat::state::library::Library;
use photo_preheat::state::settings::Settings;

#[derive(Parser)]
#[command(name = "photo-preheat")]
#[command(about = "Catalog photos and replay thumbnail preheating for a scrolling grid", long_about = None)]
struct Cli {
    /// Catalog database (defaults to the user data directory)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Settings file (defaults to the user config directory)
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    /// Log window decisions at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Import every photo under a folder into the catalog
    Import { folder: PathBuf },
    /// Print how many photos the catalog holds
    Count,
    /// Mark photos whose files disappeared as deleted
    Verify,
    /// Replay scroll offsets through the preheat window
    Simulate {
        /// Width of the grid in points
        #[arg(long, default_value = "375")]
        width: f64,
        /// Height of the visible region in points
        #[arg(long, default_value = "667")]
        height: f64,
        /// Comma-separated vertical scroll offsets
        #[arg(long, value_delimiter = ',', default_value = "0")]
        offsets: Vec<f64>,
        /// Open the detail view at this position, swipe to the next photo
        /// and scroll the grid back to centre it
        #[arg(long)]
        focus: Option<usize>,
    },
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Library(#[from] LibraryError),
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error(transparent)]
    Index(#[from] IndexError),
    #[error("background import failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

fn open_library(db: Option<&PathBuf>) -> Result<Library, LibraryError> {
    match db {
        Some(path) => Library::open(path),
        None => Library::new(),
    }
}

/// Import on a blocking thread.
/// rusqlite::Connection is not Send, so the import opens its own connection.
async fn import_folder_async(
    folder: PathBuf,
    db: Option<PathBuf>,
) -> Result<ImportResult, CliError> {
    let result = tokio::task::spawn_blocking(move || {
        let library = open_library(db.as_ref())?;
        import_folder(&library, &folder)
    })
    .await??;
    Ok(result)
}

fn simulate(
    library: &Library,
    settings: &Settings,
    width: f64,
    height: f64,
    offsets: &[f64],
    focus: Option<usize>,
) -> Result<(), CliError> {
    let index = Arc::new(library.load_index()?);
    let layout = GridLayout::new(settings.grid, width, index.count());
    let target = layout.thumbnail_target_size();
    info!(photos = index.count(), %target, "simulating preheat window");

    let mut preheater =
        ThumbnailPreheater::new(index, CachingManager::new(), target, settings.preheat);
    preheater.appear();

    let mut last_visible = Rect::ZERO;
    for &offset in offsets {
        let visible = Rect::new(0.0, offset, width, height);
        let delta = preheater.scroll(visible, &layout);
        println!(
            "offset {:>8.1}: +{:<4} -{:<4} cached {}",
            offset,
            delta.added.len(),
            delta.removed.len(),
            preheater.controller().cached_count(target)
        );
        last_visible = visible;
    }

    if let Some(position) = focus {
        let mut cursor = PhotoCursor::new(position, preheater.tracker().index().count())?;
        let shown = cursor.next().unwrap_or(cursor.current());
        if let Some(offset) = layout.offset_centering(shown, height) {
            let visible = Rect::new(0.0, offset, width, height);
            let delta = preheater.scroll(visible, &layout);
            println!(
                "detail {:>5} -> {:<5}: offset {:.1} +{} -{}",
                position,
                shown,
                offset,
                delta.added.len(),
                delta.removed.len()
            );
            last_visible = visible;
        }
    }

    preheater.reconcile(last_visible, &layout);
    println!(
        "after reconcile: cached {}",
        preheater.controller().cached_count(target)
    );
    Ok(())
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::Import { folder } => {
            let result = import_folder_async(folder, cli.db).await?;
            println!(
                "Import complete! Added {} photos, skipped {} duplicates.",
                result.imported, result.skipped
            );
        }
        Command::Count => {
            let library = open_library(cli.db.as_ref())?;
            println!("{} photos in catalog", library.photo_count()?);
        }
        Command::Verify => {
            let library = open_library(cli.db.as_ref())?;
            println!("{} photos marked deleted", library.verify_files()?);
        }
        Command::Simulate {
            width,
            height,
            offsets,
            focus,
        } => {
            let settings = match &cli.settings {
                Some(path) => Settings::load_from(path)?,
                None => Settings::load()?,
            };
            let library = open_library(cli.db.as_ref())?;
            simulate(&library, &settings, width, height, &offsets, focus)?;
        }
    }
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
