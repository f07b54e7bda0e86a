// Leaderboard panel
//
// "Daily Top 5": karma earned in the last 24 hours, ranked by the server.

use crate::api::LeaderboardEntry;
use crate::tui::theme::Theme;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

const MEDALS: [&str; 3] = ["🥇", "🥈", "🥉"];

pub fn rows(entries: &[LeaderboardEntry]) -> Vec<String> {
    if entries.is_empty() {
        return vec!["No activity yet.".to_string()];
    }
    entries
        .iter()
        .take(5)
        .enumerate()
        .map(|(i, entry)| {
            let rank = MEDALS
                .get(i)
                .map(|m| m.to_string())
                .unwrap_or_else(|| format!("{}.", i + 1));
            format!("{} {:<16} {:>4} karma", rank, entry.username, entry.karma)
        })
        .collect()
}

pub fn render(f: &mut Frame, area: Rect, entries: &[LeaderboardEntry], theme: &Theme) {
    let style = if entries.is_empty() {
        Style::default().fg(theme.muted)
    } else {
        Style::default().fg(theme.foreground)
    };
    let lines: Vec<Line> = rows(entries)
        .into_iter()
        .map(|row| Line::from(Span::styled(row, style)))
        .collect();

    let panel = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(theme.border_type)
            .border_style(Style::default().fg(theme.border))
            .title(Span::styled(
                " Daily Top 5 ",
                Style::default().add_modifier(Modifier::BOLD),
            )),
    );

    f.render_widget(panel, area);
}
