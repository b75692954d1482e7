use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::components::todo_line;
use crate::theme;
use crate::todo::{SortOrder, Todo};

pub struct TodoList;

impl TodoList {
    pub fn render(
        frame: &mut Frame,
        area: Rect,
        title: &str,
        todos: &[Todo],
        selected: usize,
        focused: bool,
        sort: SortOrder,
    ) {
        let t = theme::current();
        let w = area.width as usize;

        let title = if w >= 30 {
            format!(" {} ({}) ", title, todos.len())
        } else {
            format!(" {} ", title)
        };

        let block = Block::default()
            .title(title)
            .title_style(t.header)
            .title_bottom(Line::from(Span::styled(
                format!(" sort: {} ", sort.label()),
                t.dim,
            )))
            .borders(Borders::ALL)
            .border_style(if focused { t.focus_border } else { t.border });

        if todos.is_empty() {
            let inner = block.inner(area);
            frame.render_widget(block, area);
            let msg = Paragraph::new(vec![
                Line::from(Span::styled("No tasks", t.header)),
                Line::from(Span::styled("Press n to add one.", t.dim)),
            ]);
            frame.render_widget(msg, inner);
            return;
        }

        let inner_w = area.width.saturating_sub(2) as usize;

        let items: Vec<ListItem> = todos
            .iter()
            .enumerate()
            .map(|(i, todo)| {
                let highlighted = i == selected && focused;
                let mut line = todo_line(todo, inner_w.saturating_sub(18), highlighted);

                // Due date and tag if there's room
                let due = format!("  {}", todo.due_display());
                if line.width() + due.len() < inner_w {
                    line.spans.push(Span::styled(due, t.dim));
                }
                if let Some(tag) = &todo.tag_name {
                    let tag = format!("  #{}", tag);
                    if line.width() + tag.chars().count() < inner_w {
                        line.spans.push(Span::styled(
                            tag,
                            ratatui::style::Style::default()
                                .fg(theme::tag_color(todo.tag_color.as_deref())),
                        ));
                    }
                }
                ListItem::new(line)
            })
            .collect();

        // Keep the selection on screen for long lists.
        let mut state = ListState::default().with_selected(Some(selected));
        let list = List::new(items).block(block);
        frame.render_stateful_widget(list, area, &mut state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::todo::task::sample;
    use ratatui::{backend::TestBackend, Terminal};

    fn screen(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn renders_tasks_with_due_dates() {
        let mut terminal = Terminal::new(TestBackend::new(80, 8)).unwrap();
        let mut done = sample(2, "Pay rent", "2024-03-01T00:00:00");
        done.status = crate::todo::Status::Done;
        let todos = vec![sample(1, "Buy milk", "2024-02-15T09:00:00"), done];
        terminal
            .draw(|f| {
                TodoList::render(f, f.area(), "All tasks", &todos, 0, true, SortOrder::DueDate)
            })
            .unwrap();
        let text = screen(&terminal);
        assert!(text.contains("All tasks (2)"));
        assert!(text.contains("[ ] Buy milk"));
        assert!(text.contains("[x] Pay rent"));
        assert!(text.contains("2024-02-15 09:00"));
        assert!(text.contains("sort: due date"));
    }

    #[test]
    fn empty_list_shows_hint() {
        let mut terminal = Terminal::new(TestBackend::new(40, 6)).unwrap();
        terminal
            .draw(|f| TodoList::render(f, f.area(), "Completed", &[], 0, false, SortOrder::Created))
            .unwrap();
        assert!(screen(&terminal).contains("No tasks"));
    }
}
