pub mod confirm;
pub mod day_panel;
pub mod detail;
pub mod help;
pub mod month_view;
pub mod sidebar;
pub mod status_bar;
pub mod tag_form;
pub mod todo_form;
pub mod todo_list;

pub use confirm::ConfirmPrompt;
pub use day_panel::DayPanel;
pub use detail::DetailPopup;
pub use help::HelpPopup;
pub use month_view::MonthView;
pub use sidebar::{Sidebar, SidebarItem};
pub use status_bar::StatusBar;
pub use tag_form::{TagForm, TagFormState};
pub use todo_form::{TodoForm, TodoFormState};
pub use todo_list::TodoList;

use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};

use crate::theme;
use crate::todo::Todo;

/// A `w` x `h` rectangle centered in `area`, shrunk to fit.
pub fn centered(area: Rect, w: u16, h: u16) -> Rect {
    let w = w.min(area.width);
    let h = h.min(area.height);
    let x = area.x + (area.width.saturating_sub(w)) / 2;
    let y = area.y + (area.height.saturating_sub(h)) / 2;
    Rect::new(x, y, w, h)
}

/// Cut `s` to at most `max` characters, marking the cut with "...".
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else if max > 3 {
        let head: String = s.chars().take(max - 3).collect();
        format!("{}...", head)
    } else {
        s.chars().take(max).collect()
    }
}

/// Checkbox, title and tag swatch for one task, shared by the list views.
pub fn todo_line(todo: &Todo, width: usize, selected: bool) -> Line<'static> {
    let t = theme::current();
    let checkbox = if todo.is_done() { "[x]" } else { "[ ]" };
    let title_style = if selected {
        t.selected
    } else if todo.is_done() {
        t.done
    } else {
        Style::default()
    };

    let mut spans = vec![
        Span::styled(
            "\u{258c}",
            Style::default().fg(theme::tag_color(todo.tag_color.as_deref())),
        ),
        Span::styled(
            format!("{} ", checkbox),
            if selected { t.selected } else { Style::default() },
        ),
        Span::styled(truncate(&todo.title, width.saturating_sub(6)), title_style),
    ];
    let used: usize = spans.iter().map(|s| s.width()).sum();
    let badge = format!(" {}", todo.priority);
    if used + badge.len() < width {
        spans.push(Span::styled(badge, t.priority(todo.priority)));
    }
    Line::from(spans)
}
