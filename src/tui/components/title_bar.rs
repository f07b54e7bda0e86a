// Title bar component
//
// App name, who is signed in, and a spinner while likes are in flight.

use crate::controller::{AuthState, PendingAction};
use crate::session::Role;
use crate::tui::app::App;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Shown instead of the identity; names the parked action while signing in
fn signed_out_label(state: AuthState, pending: Option<&PendingAction>) -> String {
    match (state, pending) {
        (AuthState::AwaitingCredential, Some(action)) => {
            format!(" ── sign in to {}", action.describe())
        }
        (AuthState::AwaitingCredential, None) => " ── signing in…".to_string(),
        _ => " ── not signed in".to_string(),
    }
}

pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let mut spans = vec![Span::styled(
        " 💬 Playto Community",
        Style::default().fg(theme.title).add_modifier(Modifier::BOLD),
    )];

    match app.ctl.session() {
        Some(session) => {
            spans.push(Span::styled(" ── ", Style::default().fg(theme.border)));
            spans.push(Span::styled(
                session.identity.clone(),
                Style::default().fg(theme.author),
            ));
            match session.role {
                Role::Admin => spans.push(Span::styled(
                    " (Admin)",
                    Style::default().fg(theme.admin).add_modifier(Modifier::BOLD),
                )),
                Role::Guest => {
                    spans.push(Span::styled(" (guest)", Style::default().fg(theme.muted)))
                }
                Role::Member => {}
            }
        }
        None => {
            let label = signed_out_label(app.ctl.auth_state(), app.ctl.pending());
            spans.push(Span::styled(label, Style::default().fg(theme.muted)));
        }
    }

    if let Some(spinner) = app.spinner_char() {
        spans.push(Span::styled(
            format!("  {} syncing likes", spinner),
            Style::default().fg(theme.muted),
        ));
    }

    let title = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(theme.border_type)
            .border_style(Style::default().fg(theme.title))
            .title_top(Line::from(" ? ").right_aligned()),
    );

    f.render_widget(title, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signed_out_label_names_pending_action() {
        let action = PendingAction::CreatePost {
            content: "hi".into(),
        };
        assert_eq!(
            signed_out_label(AuthState::AwaitingCredential, Some(&action)),
            format!(" ── sign in to {}", action.describe())
        );
        assert_eq!(
            signed_out_label(AuthState::AwaitingCredential, None),
            " ── signing in…"
        );
        assert_eq!(
            signed_out_label(AuthState::Anonymous, None),
            " ── not signed in"
        );
    }
}
