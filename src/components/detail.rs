use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::components::centered;
use crate::theme;
use crate::todo::{task::parse_timestamp, Todo};

pub struct DetailPopup;

impl DetailPopup {
    pub fn render(frame: &mut Frame, area: Rect, todo: &Todo) {
        let t = theme::current();
        let popup_area = centered(area, area.width.clamp(30, 60), area.height.clamp(8, 18));
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title(format!(" {} ", todo.title))
            .title_style(t.header)
            .borders(Borders::ALL)
            .border_style(t.focus_border);

        let inner = block.inner(popup_area);
        frame.render_widget(block, popup_area);

        let mut lines: Vec<Line> = Vec::new();

        if let Some(name) = &todo.tag_name {
            lines.push(Line::from(vec![
                Span::styled(
                    "  ",
                    Style::default().bg(theme::tag_color(todo.tag_color.as_deref())),
                ),
                Span::raw(format!(" {}", name)),
            ]));
            lines.push(Line::from(""));
        }

        let status = if todo.is_done() { "Completed" } else { "Pending" };
        lines.push(field("Status: ", Span::raw(status)));
        lines.push(field(
            "Priority: ",
            Span::styled(todo.priority.to_string(), t.priority(todo.priority)),
        ));
        match todo.due() {
            Some(due) => lines.push(field(
                "Due: ",
                Span::raw(due.format("%A, %B %d, %Y %H:%M").to_string()),
            )),
            None => lines.push(field("Due: ", Span::styled("No date set", t.dim))),
        }
        if let Some(created) = todo.created_at.as_deref().and_then(parse_timestamp) {
            lines.push(field("Created: ", Span::raw(created.format("%Y-%m-%d %H:%M").to_string())));
        }
        if let Some(updated) = todo.updated_at.as_deref().and_then(parse_timestamp) {
            lines.push(field("Updated: ", Span::raw(updated.format("%Y-%m-%d %H:%M").to_string())));
        }

        if let Some(content) = todo.content.as_deref().filter(|c| !c.is_empty()) {
            lines.push(Line::from(""));
            for line in content.lines() {
                lines.push(Line::from(line.to_string()));
            }
        }

        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Space:Toggle e:Edit d:Delete Esc:Close",
            t.dim,
        )));

        frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
    }
}

fn field(label: &'static str, value: Span<'static>) -> Line<'static> {
    Line::from(vec![Span::styled(label, theme::current().dim), value])
}
