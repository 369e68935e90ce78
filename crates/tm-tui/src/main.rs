//! Standalone TUI binary for Tablemate.

use std::path::PathBuf;
use std::process;

use clap::Parser;

use tm_core::Route;
use tm_tui::app::{AppContext, TuiApp};
use tm_tui::store::AppStore;

#[derive(Parser)]
#[command(name = "tm-tui", about = "Terminal tabletop companion", version)]
struct Args {
    /// Directory for persisted state (defaults to ~/.tablemate)
    #[arg(long)]
    data: Option<PathBuf>,

    /// Start on a specific page, as a route fragment (e.g. "cards",
    /// "deck-<id>", "run-template-<id>")
    #[arg(long, default_value = "dice")]
    page: String,

    /// RNG seed for deterministic sessions (entropy-seeded by default)
    #[arg(long)]
    seed: Option<u64>,
}

fn main() {
    let args = Args::parse();

    let data_dir = args.data.unwrap_or_else(default_data_dir);
    let store = AppStore::open_dir(data_dir);
    let ctx = AppContext::load(store, args.seed);

    let route = Route::parse(&args.page);
    let app = TuiApp::new(ctx, route);

    if let Err(e) = tm_tui::terminal::run(app) {
        eprintln!("error: {e}");
        process::exit(1);
    }
}

/// `~/.tablemate`, or `./.tablemate` when no home directory is set.
fn default_data_dir() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".tablemate")
}
