use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::components::centered;
use crate::theme;

/// Yes/no question shown before destructive actions.
pub struct ConfirmPrompt;

impl ConfirmPrompt {
    pub fn render(frame: &mut Frame, area: Rect, question: &str) {
        let t = theme::current();
        let popup_area = centered(area, area.width.clamp(30, 50), 6);
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title(" Confirm ")
            .title_style(t.header)
            .borders(Borders::ALL)
            .border_style(t.error);
        let inner = block.inner(popup_area);
        frame.render_widget(block, popup_area);

        let key = Style::default().add_modifier(Modifier::BOLD);
        let lines = vec![
            Line::from(question.to_string()),
            Line::from(""),
            Line::from(vec![
                Span::styled("y", key),
                Span::styled(":Yes  ", t.dim),
                Span::styled("n", key),
                Span::styled("/", t.dim),
                Span::styled("Esc", key),
                Span::styled(":No", t.dim),
            ]),
        ];
        frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), inner);
    }
}
