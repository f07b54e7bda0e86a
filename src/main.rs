// playto - terminal client for the Playto community feed
//
// Architecture:
// - API client (reqwest): typed calls against the community backend
// - Controller: auth gate, optimistic like ledger, feed/thread state
// - TUI (ratatui): interactive feed, threads and leaderboard
// - Headless commands: one-shot reads and writes for scripts
// - Like completions flow back to the TUI over an mpsc channel

mod api;
mod cli;
mod config;
mod controller;
mod headless;
mod logging;
mod session;
mod tui;

use anyhow::Result;
use api::{CommunityApi, HttpApi};
use clap::Parser;
use cli::{Cli, Commands};
use config::Config;
use logging::{LogBuffer, LogSink};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Config management runs before anything reads the config file
    if let Some(Commands::Config {
        show,
        reset,
        edit,
        path,
    }) = cli.command
    {
        return cli::handle_config(show, reset, edit, path);
    }

    // Ensure config template exists (helps users discover options)
    Config::ensure_config_exists();
    let config = Config::load()?;

    // TUI mode captures logs to the buffer so they don't garble the display
    let interactive = cli.command.is_none() && config.enable_tui;
    let log_buffer = LogBuffer::new();
    let sink = if interactive {
        LogSink::Buffer(log_buffer.clone())
    } else {
        LogSink::Stderr
    };
    // Keep the guard alive so the file writer flushes on exit
    let _file_guard = logging::init(&config.logging, sink);

    tracing::debug!(api_url = %config.api_url, "playto {} starting", config::VERSION);

    match cli.command {
        Some(command) => headless::run(&config, command).await,
        None if interactive => {
            let api: Arc<dyn CommunityApi> =
                Arc::new(HttpApi::new(&config.api_url, config.request_timeout())?);
            tui::run_tui(&config, log_buffer, api).await
        }
        None => headless::run(&config, Commands::Feed).await,
    }
}
