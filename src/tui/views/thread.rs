// Thread view
//
// The open post on top, then its comment tree flattened depth-first with
// two columns of indent per level.

use super::feed::post_header;
use crate::api::Comment;
use crate::controller::LikeState;
use crate::tui::app::App;
use crate::tui::components::formatters::{like_badge, time_ago, truncate};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

fn comment_line<'a>(
    app: &App,
    depth: usize,
    comment: &'a Comment,
    width: usize,
    now: chrono::DateTime<chrono::Utc>,
) -> Line<'a> {
    let theme = &app.theme;
    let likes = app
        .ctl
        .like_state(comment.key())
        .unwrap_or(LikeState::new(comment.likes_count, comment.is_liked));
    let indent = "  ".repeat(depth);
    let branch = if depth == 0 { "• " } else { "└ " };

    let prefix = format!(
        "{}{}{} · {} ",
        indent,
        branch,
        comment.author.username,
        time_ago(comment.created_at, now)
    );
    let badge = format!("  {}", like_badge(likes.count, likes.liked));
    let room = width.saturating_sub(prefix.chars().count() + badge.chars().count());

    Line::from(vec![
        Span::styled(indent, Style::default()),
        Span::styled(branch, Style::default().fg(theme.border)),
        Span::styled(
            comment.author.username.as_str(),
            Style::default().fg(theme.author),
        ),
        Span::styled(
            format!(" · {} ", time_ago(comment.created_at, now)),
            Style::default().fg(theme.muted),
        ),
        Span::styled(
            truncate(&comment.content.replace('\n', " "), room),
            Style::default().fg(theme.foreground),
        ),
        Span::styled(
            badge,
            Style::default().fg(if likes.liked { theme.liked } else { theme.muted }),
        ),
    ])
}

pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let Some(thread) = app.ctl.thread() else {
        let empty = Paragraph::new("Loading…").style(Style::default().fg(theme.muted));
        f.render_widget(empty, area);
        return;
    };

    let rows = app.thread_rows();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(theme.border_type)
        .border_style(Style::default().fg(theme.highlight))
        .title(format!(
            " Post #{} · {} comment{} ",
            thread.post.id,
            rows.len(),
            if rows.len() == 1 { "" } else { "s" }
        ))
        .title_bottom(Line::from(" Esc back ").right_aligned());

    let now = chrono::Utc::now();
    let width = area.width.saturating_sub(4) as usize;

    let mut post_lines = vec![post_header(app, &thread.post, now)];
    post_lines.extend(
        thread
            .post
            .content
            .lines()
            .map(|l| Line::from(Span::styled(format!("  {}", l), Style::default().fg(theme.foreground)))),
    );
    post_lines.push(Line::from(Span::styled(
        "─".repeat(width),
        Style::default().fg(theme.border),
    )));

    let mut items = vec![ListItem::new(post_lines)];
    if rows.is_empty() {
        items.push(ListItem::new(Line::from(Span::styled(
            "  No comments yet. Press c to start the discussion.",
            Style::default().fg(theme.muted).add_modifier(Modifier::ITALIC),
        ))));
    }
    items.extend(
        rows.iter()
            .map(|(depth, comment)| ListItem::new(comment_line(app, *depth, comment, width, now))),
    );

    let list = List::new(items).block(block).highlight_style(
        Style::default()
            .bg(theme.selection)
            .fg(theme.selection_fg),
    );

    let mut state = ListState::default().with_selected(Some(app.thread_selected));
    f.render_stateful_widget(list, area, &mut state);
}
