// Views module - screen-level rendering logic
//
// Each view fills the main content slot of the shell:
// - Feed: post list
// - Thread: one post with its comment tree
//
// The shell (title, side panels, status bar) is shared by both.

mod feed;
mod modal;
mod thread;

use super::app::{App, View};
use crate::tui::components::{leaderboard_panel, logs_panel, status_bar, title_bar};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Style;
use ratatui::widgets::Block;
use ratatui::Frame;

/// Leaderboard shows at most five rows plus borders
const LEADERBOARD_HEIGHT: u16 = 7;

/// Main UI render function - called on every frame
pub fn draw(f: &mut Frame, app: &App) {
    let bg_block = Block::default().style(Style::default().bg(app.theme.background));
    f.render_widget(bg_block, f.area());

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(8),
            Constraint::Length(2),
        ])
        .split(f.area());

    title_bar::render(f, rows[0], app);
    render_body(f, rows[1], app);
    status_bar::render(f, rows[2], app);

    if let Some(modal_state) = &app.modal {
        modal::render(f, modal_state, app);
    }

    // Toast draws over modals too
    if let Some(toast) = &app.toast {
        toast.render(f, f.area(), &app.theme);
    }
}

fn render_body(f: &mut Frame, area: Rect, app: &App) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
        .split(area);

    match app.view {
        View::Feed => feed::render(f, columns[0], app),
        View::Thread => thread::render(f, columns[0], app),
    }

    let side = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(LEADERBOARD_HEIGHT), Constraint::Min(3)])
        .split(columns[1]);

    leaderboard_panel::render(f, side[0], app.ctl.leaderboard(), &app.theme);

    let visible_logs = side[1].height.saturating_sub(2) as usize;
    logs_panel::render(f, side[1], &app.log_buffer.recent(visible_logs), &app.theme);
}
