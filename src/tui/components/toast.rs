//! Toast notification component
//!
//! A non-blocking overlay in the bottom-right corner that auto-dismisses.
//! Confirmations ("Post published") are short-lived; failures from
//! background actions use the error color and stay up longer.

use crate::tui::theme::Theme;
use ratatui::{
    layout::{Alignment, Rect},
    style::Style,
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};
use std::time::{Duration, Instant};
use unicode_width::UnicodeWidthStr;

const INFO_DURATION: Duration = Duration::from_secs(3);
const ERROR_DURATION: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Info,
    Error,
}

/// A toast notification that auto-dismisses
pub struct Toast {
    pub message: String,
    pub kind: ToastKind,
    created_at: Instant,
    duration: Duration,
}

impl Toast {
    pub fn new(message: impl Into<String>) -> Self {
        Self::with_kind(message, ToastKind::Info, INFO_DURATION)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::with_kind(message, ToastKind::Error, ERROR_DURATION)
    }

    fn with_kind(message: impl Into<String>, kind: ToastKind, duration: Duration) -> Self {
        Self {
            message: message.into(),
            kind,
            created_at: Instant::now(),
            duration,
        }
    }

    pub fn is_expired(&self) -> bool {
        self.created_at.elapsed() >= self.duration
    }

    /// Bottom-right box sized to the message's display width
    ///
    /// One text line plus borders, two cells off the edges, never wider
    /// than the frame allows.
    fn placement(&self, area: Rect) -> Rect {
        let text_width = UnicodeWidthStr::width(self.message.as_str());
        let width = (text_width.saturating_add(4))
            .min(area.width.saturating_sub(4) as usize) as u16;
        let height = 3;

        let x = area.right().saturating_sub(width + 2);
        let y = area.bottom().saturating_sub(height + 2);
        Rect::new(x, y, width, height)
    }

    pub fn render(&self, f: &mut Frame, area: Rect, theme: &Theme) {
        let toast_area = self.placement(area);
        let accent = match self.kind {
            ToastKind::Info => theme.highlight,
            ToastKind::Error => theme.error,
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(theme.border_type)
            .border_style(Style::default().fg(accent))
            .style(Style::default().bg(theme.background));

        let text = Paragraph::new(self.message.as_str())
            .alignment(Alignment::Center)
            .style(Style::default().fg(theme.foreground))
            .block(block);

        f.render_widget(Clear, toast_area);
        f.render_widget(text, toast_area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placement_uses_display_width() {
        let area = Rect::new(0, 0, 80, 24);
        // Two wide glyphs occupy four cells
        let toast = Toast::new("👍👍");
        assert_eq!(toast.placement(area), Rect::new(70, 19, 8, 3));
    }

    #[test]
    fn test_placement_fits_narrow_frames() {
        let area = Rect::new(0, 0, 20, 10);
        let toast = Toast::error("Like failed: network error: connection refused");
        let rect = toast.placement(area);
        assert_eq!(rect.width, 16);
        assert!(rect.right() <= area.right());
    }

    #[test]
    fn test_error_toasts_are_marked() {
        assert_eq!(Toast::new("Post deleted").kind, ToastKind::Info);
        assert_eq!(Toast::error("Failed to delete").kind, ToastKind::Error);
        assert!(!Toast::error("Failed to delete").is_expired());
    }
}
