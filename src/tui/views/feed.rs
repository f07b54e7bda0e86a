// Feed view
//
// One two-line row per post: author, age and like badge, then the content
// truncated to the panel width. Like counts come from the controller's
// ledger so optimistic flips show immediately.

use crate::api::Post;
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

/// Like state to display: ledger first, wire value as fallback
pub(super) fn displayed_likes(app: &App, post: &Post) -> LikeState {
    app.ctl
        .like_state(post.key())
        .unwrap_or(LikeState::new(post.likes_count, post.is_liked))
}

pub(super) fn post_header<'a>(app: &App, post: &'a Post, now: chrono::DateTime<chrono::Utc>) -> Line<'a> {
    let theme = &app.theme;
    let likes = displayed_likes(app, post);
    let like_style = if likes.liked {
        Style::default().fg(theme.liked)
    } else {
        Style::default().fg(theme.muted)
    };

    let mut spans = vec![
        Span::styled(
            post.author.username.as_str(),
            Style::default().fg(theme.author).add_modifier(Modifier::BOLD),
        ),
    ];
    if post.author.is_staff {
        spans.push(Span::styled(" ★", Style::default().fg(theme.admin)));
    }
    spans.push(Span::styled(
        format!(" · {} · #{}  ", time_ago(post.created_at, now), post.id),
        Style::default().fg(theme.muted),
    ));
    spans.push(Span::styled(like_badge(likes.count, likes.liked), like_style));
    Line::from(spans)
}

pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(theme.border_type)
        .border_style(Style::default().fg(theme.highlight))
        .title(format!(" Feed ({}) ", app.ctl.feed().len()));

    if app.ctl.feed().is_empty() {
        let empty = Paragraph::new("No posts yet. Press n to write the first one.")
            .style(Style::default().fg(theme.muted))
            .block(block);
        f.render_widget(empty, area);
        return;
    }

    let now = chrono::Utc::now();
    let content_width = area.width.saturating_sub(4) as usize;
    let items: Vec<ListItem> = app
        .ctl
        .feed()
        .iter()
        .map(|post| {
            let body = Line::from(Span::styled(
                format!("  {}", truncate(&post.content.replace('\n', " "), content_width)),
                Style::default().fg(theme.foreground),
            ));
            ListItem::new(vec![post_header(app, post, now), body])
        })
        .collect();

    let list = List::new(items).block(block).highlight_style(
        Style::default()
            .bg(theme.selection)
            .fg(theme.selection_fg),
    );

    let mut state = ListState::default().with_selected(Some(app.feed_selected));
    f.render_stateful_widget(list, area, &mut state);
}
