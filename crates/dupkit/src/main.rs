use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use dupkit::backend::BackendHandle;
use dupkit::logging;
use dupkit::settings::Settings;
use dupkit::ui::App;

#[derive(Parser)]
#[command(name = "dupkit")]
#[command(about = "A duplicate and similar-file result browser TUI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Path to settings file
    #[arg(short = 'c', long)]
    config: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Launch the interactive TUI against the real filesystem backend
    Browse,
    /// Launch the TUI against the demo backend (synthetic results, no
    /// filesystem scanning)
    Demo,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let settings_path = if let Some(config) = cli.config.as_deref() {
        PathBuf::from(shellexpand::tilde(config).to_string())
    } else {
        Settings::default_path()
    };

    let log_dir = settings_path
        .parent()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("Failed to create {}", log_dir.display()))?;
    let _log_guard = logging::init(&log_dir);

    let settings = Settings::load(&settings_path).context("Failed to load settings")?;

    let demo = matches!(cli.command, Some(Commands::Demo));
    let backend = BackendHandle::spawn(demo);

    let mut app = App::new(backend, settings);
    app.run().await
}
