// TUI module - Terminal User Interface
//
// This module manages the terminal UI using ratatui. It handles:
// - Terminal initialization and cleanup
// - Event loop (keyboard input, timer ticks, settled likes)
// - Rendering the UI

pub mod app;
pub mod components;
pub mod input;
pub mod modal;
pub mod theme;
pub mod views;

use crate::api::CommunityApi;
use crate::config::Config;
use crate::controller::InteractionController;
use crate::logging::LogBuffer;
use anyhow::{Context, Result};
use app::{App, LikeCompletion, View};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use modal::{Modal, ModalAction};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::sync::Arc;
use std::time::Duration;
use theme::Theme;
use tokio::sync::mpsc;

/// Run the TUI
///
/// Sets up the terminal, runs the event loop, and restores the terminal
/// when done, even if the loop failed.
pub async fn run_tui(
    config: &Config,
    log_buffer: LogBuffer,
    api: Arc<dyn CommunityApi>,
) -> Result<()> {
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("Failed to setup terminal")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;

    let (like_tx, mut like_rx) = mpsc::channel(64);
    let ctl = InteractionController::new(api);
    let theme = Theme::by_name(&config.theme);
    tracing::debug!("Using {} theme", theme.name);
    let mut app = App::new(ctl, log_buffer, theme, like_tx);

    let result = run_event_loop(&mut terminal, &mut app, &mut like_rx).await;

    disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("Failed to restore terminal")?;
    terminal.show_cursor().context("Failed to show cursor")?;

    result
}

/// Main event loop
///
/// Waits on three sources with tokio::select!:
/// 1. Keyboard input
/// 2. Timer ticks (spinner, toast expiry)
/// 3. Like requests finishing in the background
async fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    like_rx: &mut mpsc::Receiver<LikeCompletion>,
) -> Result<()> {
    let mut tick_interval = tokio::time::interval(Duration::from_millis(200));

    terminal
        .draw(|f| views::draw(f, app))
        .context("Failed to draw terminal")?;
    app.refresh().await;

    loop {
        terminal
            .draw(|f| views::draw(f, app))
            .context("Failed to draw terminal")?;

        tokio::select! {
            input = async {
                if event::poll(Duration::from_millis(10)).unwrap_or(false) {
                    event::read().ok()
                } else {
                    None
                }
            } => {
                if let Some(Event::Key(key_event)) = input {
                    handle_key_event(app, key_event).await;
                }
            }

            _ = tick_interval.tick() => app.tick(),

            Some(done) = like_rx.recv() => app.settle_like(done),
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

/// Handle keyboard input
/// Layered dispatch: Modal → Global → View-specific
async fn handle_key_event(app: &mut App, key_event: KeyEvent) {
    if handle_modal_input(app, &key_event).await {
        return;
    }

    if key_event.kind == KeyEventKind::Release {
        app.handle_key_release(key_event.code);
        return;
    }
    if key_event.kind != KeyEventKind::Press {
        return;
    }

    let key = key_event.code;
    if !app.handle_key_press(key) {
        return;
    }

    if handle_global_keys(app, key) {
        return;
    }

    match key {
        KeyCode::Up | KeyCode::Char('k') => app.move_selection(-1),
        KeyCode::Down | KeyCode::Char('j') => app.move_selection(1),
        KeyCode::PageUp => app.move_selection(-10),
        KeyCode::PageDown => app.move_selection(10),
        KeyCode::Enter => app.open_selected().await,
        KeyCode::Esc | KeyCode::Backspace if app.view == View::Thread => app.back(),
        KeyCode::Char('l') => app.like_selected().await,
        KeyCode::Char('n') => app.compose_post(),
        KeyCode::Char('c') => app.compose_comment(),
        KeyCode::Char('d') => app.request_delete(),
        KeyCode::Char('i') => app.begin_sign_in(),
        KeyCode::Char('o') => app.sign_out().await,
        KeyCode::Char('r') => app.refresh().await,
        _ => {}
    }
}

/// Handle modal input - returns true if modal absorbed the input
async fn handle_modal_input(app: &mut App, key_event: &KeyEvent) -> bool {
    let Some(modal) = app.modal.as_mut() else {
        return false;
    };

    // Release events must still reach the InputHandler, otherwise keys stay
    // "pressed" after the modal closes
    if key_event.kind == KeyEventKind::Release {
        app.handle_key_release(key_event.code);
        return true;
    }
    if key_event.kind != KeyEventKind::Press {
        return true;
    }

    match modal.handle_input(key_event.code) {
        ModalAction::None => {}
        ModalAction::Close => app.modal = None,
        ModalAction::CancelSignIn => app.cancel_sign_in(),
        ModalAction::SignIn(login) => app.submit_sign_in(login).await,
        ModalAction::Submit(target, text) => app.submit_compose(target, text).await,
        ModalAction::Delete(post) => app.confirm_delete(post).await,
    }

    true
}

/// Handle global keys - returns true if handled
fn handle_global_keys(app: &mut App, key: KeyCode) -> bool {
    match key {
        KeyCode::Char('q') | KeyCode::Char('Q') => {
            app.should_quit = true;
            true
        }
        KeyCode::Char('?') => {
            app.modal = Some(Modal::Help);
            true
        }
        _ => false,
    }
}
