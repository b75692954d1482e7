use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::theme;

pub struct StatusBar;

impl StatusBar {
    /// `mode` on the left; on the right either `message` (errors highlighted)
    /// or the key hints that fit.
    pub fn render(
        frame: &mut Frame,
        area: Rect,
        mode: &str,
        message: Option<(&str, bool)>,
        hints: &[&str],
        loading: bool,
    ) {
        let t = theme::current();
        let w = area.width as usize;

        let left = if loading {
            format!(" {} \u{2026} ", mode)
        } else {
            format!(" {} ", mode)
        };

        let (right, right_style) = match message {
            Some((msg, true)) => (format!(" {} ", msg), t.error),
            Some((msg, false)) => (format!(" {} ", msg), t.status),
            None => {
                let room = w.saturating_sub(left.len());
                let hint = hints
                    .iter()
                    .find(|h| h.len() + 1 <= room)
                    .copied()
                    .unwrap_or("");
                (format!("{} ", hint), t.status)
            }
        };

        let padding = " ".repeat(w.saturating_sub(left.chars().count() + right.chars().count()));

        let line = Line::from(vec![
            Span::styled(left, t.status),
            Span::styled(padding, t.status),
            Span::styled(right, right_style),
        ]);

        frame.render_widget(Paragraph::new(line).style(t.status), area);
    }
}
