// CLI module - command-line argument parsing and config handlers
//
// With no subcommand the TUI starts. Read and write subcommands run
// headless (see headless.rs); `config` manages the config file.

use crate::config::{Config, VERSION};
use crate::session::Login;
use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use std::io::Write;
use std::process::Command;

/// playto - terminal client for the Playto community feed
#[derive(Parser)]
#[command(name = "playto")]
#[command(version = VERSION)]
#[command(about = "Terminal client for the Playto community feed", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// How a write command signs in
#[derive(Args, Debug, Clone, Default)]
pub struct SignInArgs {
    /// Sign in as a guest with this display name
    #[arg(long, conflicts_with_all = ["user", "password"])]
    pub guest: Option<String>,

    /// Account username
    #[arg(long, requires = "password")]
    pub user: Option<String>,

    /// Account password
    #[arg(long, requires = "user")]
    pub password: Option<String>,
}

impl SignInArgs {
    pub fn resolve(self) -> Result<Login> {
        match (self.guest, self.user, self.password) {
            (Some(name), _, _) => Ok(Login::Guest(name)),
            (None, Some(user), Some(password)) => Ok(Login::Password { user, password }),
            _ => bail!("this command needs --guest <name> or --user <name> --password <pw>"),
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the post feed
    Feed,

    /// Print a post with its comment tree
    Thread {
        /// Post id
        id: u64,
    },

    /// Print the last 24h karma leaderboard
    Leaderboard,

    /// Publish a post
    Post {
        content: String,
        #[command(flatten)]
        sign_in: SignInArgs,
    },

    /// Like or unlike a post (or one of its comments)
    Like {
        /// Post id
        post: u64,
        /// Like this comment of the post instead
        #[arg(long)]
        comment: Option<u64>,
        #[command(flatten)]
        sign_in: SignInArgs,
    },

    /// Comment on a post, or reply to a comment with --parent
    Comment {
        /// Post id
        post: u64,
        content: String,
        /// Reply to this comment
        #[arg(long)]
        parent: Option<u64>,
        #[command(flatten)]
        sign_in: SignInArgs,
    },

    /// Delete a post (author or admin only)
    Delete {
        /// Post id
        post: u64,
        #[command(flatten)]
        sign_in: SignInArgs,
    },

    /// Manage configuration
    Config {
        /// Show effective configuration
        #[arg(long)]
        show: bool,

        /// Reset config file to defaults
        #[arg(long)]
        reset: bool,

        /// Open config file in $EDITOR
        #[arg(long)]
        edit: bool,

        /// Show config file path
        #[arg(long)]
        path: bool,
    },
}

pub fn handle_config(show: bool, reset: bool, edit: bool, path: bool) -> Result<()> {
    if path {
        handle_config_path()
    } else if show {
        handle_config_show()
    } else if reset {
        handle_config_reset()
    } else if edit {
        handle_config_edit()
    } else {
        println!("Usage: playto config [--show|--reset|--edit|--path]");
        println!();
        println!("Options:");
        println!("  --show    Display effective configuration");
        println!("  --reset   Reset config file to defaults");
        println!("  --edit    Open config file in $EDITOR");
        println!("  --path    Show config file path");
        Ok(())
    }
}

fn config_path() -> Result<std::path::PathBuf> {
    Config::config_path().context("Could not determine config path")
}

fn handle_config_path() -> Result<()> {
    println!("{}", config_path()?.display());
    Ok(())
}

fn handle_config_show() -> Result<()> {
    let config = Config::load()?;

    println!("# Effective configuration (env > file > defaults)");
    println!();
    println!("api_url = {:?}", config.api_url);
    println!("request_timeout_secs = {}", config.request_timeout_secs);
    println!("theme = {:?}", config.theme);
    println!("tui = {}", config.enable_tui);
    println!();
    println!("[logging]");
    println!("level = {:?}", config.logging.level);
    println!("file_enabled = {}", config.logging.file_enabled);
    println!("file_dir = {:?}", config.logging.file_dir.display().to_string());
    println!("file_rotation = {:?}", config.logging.file_rotation.as_str());
    println!("file_prefix = {:?}", config.logging.file_prefix);

    println!();
    let path = config_path()?;
    if path.exists() {
        println!("# Source: {}", path.display());
    } else {
        println!("# Source: defaults (no config file)");
    }
    Ok(())
}

fn handle_config_reset() -> Result<()> {
    let path = config_path()?;

    if path.exists() {
        eprint!(
            "Config file exists at {}. Overwrite? [y/N] ",
            path.display()
        );
        std::io::stderr().flush()?;

        let mut input = String::new();
        std::io::stdin().read_line(&mut input)?;

        if !input.trim().eq_ignore_ascii_case("y") {
            println!("Aborted.");
            return Ok(());
        }
    }

    Config::default()
        .save()
        .with_context(|| format!("Error writing config {}", path.display()))?;
    println!("Config reset to defaults: {}", path.display());
    Ok(())
}

fn handle_config_edit() -> Result<()> {
    let path = config_path()?;

    if !path.exists() {
        Config::ensure_config_exists();
        println!("Created new config file: {}", path.display());
    }

    let editor = std::env::var("EDITOR")
        .or_else(|_| std::env::var("VISUAL"))
        .unwrap_or_else(|_| {
            if cfg!(windows) {
                "notepad".to_string()
            } else {
                "nano".to_string()
            }
        });

    println!("Opening {} with {}", path.display(), editor);

    let status = Command::new(&editor).arg(&path).status().with_context(|| {
        format!(
            "Failed to launch editor '{}' (set $EDITOR to your preferred editor)",
            editor
        )
    })?;
    if !status.success() {
        bail!("Editor exited with status: {}", status);
    }
    Ok(())
}
