use chrono::NaiveDate;
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::components::todo_line;
use crate::theme;
use crate::todo::Todo;

/// Tasks due on the day selected in the calendar.
pub struct DayPanel;

impl DayPanel {
    pub fn render(
        frame: &mut Frame,
        area: Rect,
        date: NaiveDate,
        todos: &[&Todo],
        selected: usize,
    ) {
        let t = theme::current();
        let w = area.width as usize;

        let title = if w >= 30 {
            format!(" {} ", date.format("%A, %B %d, %Y"))
        } else if w >= 18 {
            format!(" {} ", date.format("%b %d, %Y"))
        } else {
            format!(" {} ", date.format("%m/%d"))
        };

        let count = match todos.len() {
            0 => String::new(),
            1 => " 1 task ".to_string(),
            n => format!(" {} tasks ", n),
        };

        let block = Block::default()
            .title(title)
            .title_style(t.header)
            .title_bottom(Line::from(Span::styled(count, t.dim)))
            .borders(Borders::ALL)
            .border_style(t.border);

        if todos.is_empty() {
            let inner = block.inner(area);
            frame.render_widget(block, area);
            frame.render_widget(Paragraph::new("Nothing due").style(t.dim), inner);
            return;
        }

        let inner_w = area.width.saturating_sub(2) as usize;
        let items: Vec<ListItem> = todos
            .iter()
            .enumerate()
            .map(|(i, todo)| {
                let time = todo
                    .due()
                    .map(|dt| dt.format("%H:%M ").to_string())
                    .unwrap_or_default();
                let mut line = todo_line(todo, inner_w.saturating_sub(time.len()), i == selected);
                line.spans.insert(0, Span::styled(time, t.dim));
                ListItem::new(line)
            })
            .collect();

        let mut state = ListState::default().with_selected(Some(selected));
        frame.render_stateful_widget(List::new(items).block(block), area, &mut state);
    }
}
