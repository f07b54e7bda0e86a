// Status bar component
//
// Key hints for the current view.

use crate::tui::app::{App, View};
use ratatui::{
    layout::Rect,
    style::Style,
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let session_hint = if app.ctl.session().is_some() {
        "o sign out"
    } else {
        "i sign in"
    };

    let hints = match app.view {
        View::Feed => format!(
            " j/k move │ Enter open │ l like │ n new post │ d delete │ r refresh │ {} │ ? help │ q quit",
            session_hint
        ),
        View::Thread => format!(
            " j/k move │ Esc back │ l like │ c comment/reply │ d delete │ r refresh │ {} │ q quit",
            session_hint
        ),
    };

    let status = Paragraph::new(hints)
        .style(Style::default().fg(app.theme.status_bar))
        .block(Block::default().borders(Borders::TOP));

    f.render_widget(status, area);
}
