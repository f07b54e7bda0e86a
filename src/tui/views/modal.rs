// Modal overlay rendering
//
// Modals are rendered centered on top of the main content:
// - Help: keyboard shortcuts
// - Sign-in: guest name or username/password
// - Compose: new post, comment or reply
// - Confirm delete

use crate::tui::app::App;
use crate::tui::modal::{ComposeForm, Modal, SignInField, SignInForm};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

pub fn render(f: &mut Frame, modal: &Modal, app: &App) {
    match modal {
        Modal::Help => render_help(f, app),
        Modal::SignIn(form) => render_sign_in(f, form, app),
        Modal::Compose(form) => render_compose(f, form, app),
        Modal::ConfirmDelete(id) => render_confirm_delete(f, *id, app),
    }
}

/// Calculate centered rect for modal dialog
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(area.width), height.min(area.height))
}

fn frame<'a>(app: &App, title: impl Into<Line<'a>>, hint: &'a str) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.highlight))
        .border_type(app.theme.border_type)
        .title(title)
        .title_bottom(Line::from(hint).centered())
}

fn render_help(f: &mut Frame, app: &App) {
    let key_style = Style::default().fg(app.theme.author);
    let desc_style = Style::default().fg(app.theme.foreground);
    let header_style = Style::default()
        .fg(app.theme.highlight)
        .add_modifier(Modifier::BOLD);

    let kb = |key: &str, desc: &str| -> Line {
        Line::from(vec![
            Span::raw("    "),
            Span::styled(format!("{:<10}", key), key_style),
            Span::styled(desc.to_string(), desc_style),
        ])
    };

    let content = Text::from(vec![
        Line::raw(""),
        Line::from(Span::styled("  Navigation", header_style)),
        kb("↑/↓, j/k", "Move selection"),
        kb("Enter", "Open post"),
        kb("Esc", "Back to feed"),
        kb("r", "Refresh"),
        Line::raw(""),
        Line::from(Span::styled("  Actions", header_style)),
        kb("l", "Like / unlike selection"),
        kb("n", "New post"),
        kb("c", "Comment, or reply to selected"),
        kb("d", "Delete post (author/admin)"),
        Line::raw(""),
        Line::from(Span::styled("  Account", header_style)),
        kb("i", "Sign in"),
        kb("o", "Sign out"),
        Line::raw(""),
        Line::from(Span::styled("  General", header_style)),
        kb("?", "Toggle this help"),
        kb("q", "Quit"),
    ]);

    let area = centered_rect(48, 24, f.area());
    f.render_widget(Clear, area);
    let paragraph = Paragraph::new(content)
        .style(Style::default().bg(app.theme.background))
        .block(frame(app, " Help ", " Press ? or Esc to close "));
    f.render_widget(paragraph, area);
}

fn input_line<'a>(app: &App, label: &'a str, value: String, focused: bool) -> Line<'a> {
    let value_style = if focused {
        Style::default()
            .fg(app.theme.selection_fg)
            .bg(app.theme.selection)
    } else {
        Style::default().fg(app.theme.foreground)
    };
    let cursor = if focused { "▏" } else { " " };
    Line::from(vec![
        Span::styled(format!("  {:<10}", label), Style::default().fg(app.theme.muted)),
        Span::styled(format!("{}{}", value, cursor), value_style),
    ])
}

fn error_line<'a>(app: &App, error: &Option<String>) -> Line<'a> {
    match error {
        Some(message) => Line::from(Span::styled(
            format!("  {}", message),
            Style::default().fg(app.theme.error),
        )),
        None => Line::raw(""),
    }
}

fn render_sign_in(f: &mut Frame, form: &SignInForm, app: &App) {
    let focus = form.focus();
    let mut lines = Vec::new();

    if let Some(prompt) = &form.prompt {
        lines.push(Line::from(Span::styled(
            format!("  Sign in to {}", prompt),
            Style::default().fg(app.theme.foreground),
        )));
        lines.push(Line::raw(""));
    }

    let mode_style = |active: bool| {
        if active {
            Style::default()
                .fg(app.theme.highlight)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(app.theme.muted)
        }
    };
    lines.push(Line::from(vec![
        Span::raw("  "),
        Span::styled("[ Guest ]", mode_style(form.is_guest_mode())),
        Span::raw("  "),
        Span::styled("[ Account ]", mode_style(!form.is_guest_mode())),
    ]));
    lines.push(Line::raw(""));

    if form.is_guest_mode() {
        lines.push(input_line(app, "Name", form.guest_name.clone(), true));
    } else {
        lines.push(input_line(
            app,
            "Username",
            form.username.clone(),
            focus == SignInField::Username,
        ));
        lines.push(input_line(
            app,
            "Password",
            "•".repeat(form.password.chars().count()),
            focus == SignInField::Password,
        ));
    }
    lines.push(Line::raw(""));
    lines.push(error_line(app, &form.error));

    let area = centered_rect(54, lines.len() as u16 + 2, f.area());
    f.render_widget(Clear, area);
    let paragraph = Paragraph::new(lines)
        .style(Style::default().bg(app.theme.background))
        .block(frame(app, " Sign in ", " Enter submit · Tab switch · Esc cancel "));
    f.render_widget(paragraph, area);
}

fn render_compose(f: &mut Frame, form: &ComposeForm, app: &App) {
    let lines = vec![
        Line::from(Span::styled(
            format!("{}▏", form.text),
            Style::default().fg(app.theme.foreground),
        )),
        Line::raw(""),
        error_line(app, &form.error),
    ];

    let area = centered_rect(64, 9, f.area());
    f.render_widget(Clear, area);
    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .style(Style::default().bg(app.theme.background))
        .block(frame(app, form.title(), " Enter send · Esc discard "));
    f.render_widget(paragraph, area);
}

fn render_confirm_delete(f: &mut Frame, id: u64, app: &App) {
    let lines = vec![
        Line::raw(""),
        Line::from(Span::styled(
            format!("  Delete post #{}? This cannot be undone.", id),
            Style::default().fg(app.theme.foreground),
        )),
    ];

    let area = centered_rect(48, 5, f.area());
    f.render_widget(Clear, area);
    let paragraph = Paragraph::new(lines)
        .style(Style::default().bg(app.theme.background))
        .block(frame(app, " Confirm ", " y delete · n keep "));
    f.render_widget(paragraph, area);
}
