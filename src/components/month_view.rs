use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use chrono::{Datelike, NaiveDate};

use crate::calendar::{CalendarCell, MonthRef};
use crate::components::truncate;
use crate::theme;

const DAY_NAMES: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

pub struct MonthView;

impl MonthView {
    /// Draw a prebuilt grid. Cells are laid out seven to a row in the
    /// order given.
    pub fn render(
        frame: &mut Frame,
        area: Rect,
        month: MonthRef,
        cells: &[CalendarCell],
        selected_date: NaiveDate,
        focused: bool,
    ) {
        let t = theme::current();
        let block = Block::default()
            .title(format!(" {} ", month.title()))
            .title_style(t.header)
            .borders(Borders::ALL)
            .border_style(if focused { t.focus_border } else { t.border });

        let inner = block.inner(area);
        frame.render_widget(block, area);

        if inner.width < 14 || inner.height < 3 || cells.is_empty() {
            return;
        }

        let weeks = cells.len().div_ceil(7);
        let mut row_constraints = vec![Constraint::Length(1)]; // day names
        for _ in 0..weeks {
            row_constraints.push(Constraint::Ratio(1, weeks as u32));
        }
        let rows = Layout::vertical(row_constraints).split(inner);
        let col_constraints = [Constraint::Ratio(1, 7); 7];

        let header_cols = Layout::horizontal(col_constraints).split(rows[0]);
        for (i, name) in DAY_NAMES.iter().enumerate() {
            frame.render_widget(
                Paragraph::new(Span::styled(*name, t.header)).centered(),
                header_cols[i],
            );
        }

        for (week, chunk) in cells.chunks(7).enumerate() {
            let cols = Layout::horizontal(col_constraints).split(rows[week + 1]);
            for (i, cell) in chunk.iter().enumerate() {
                render_cell(frame, cols[i], cell, cell.date == selected_date);
            }
        }
    }
}

fn render_cell(frame: &mut Frame, area: Rect, cell: &CalendarCell, selected: bool) {
    let t = theme::current();
    let w = area.width.saturating_sub(1) as usize;
    let h = area.height as usize;

    let day_style = if selected {
        t.selected.add_modifier(Modifier::BOLD)
    } else if cell.is_today {
        t.today
    } else if !cell.is_in_displayed_month {
        t.dim
    } else {
        Style::default()
    };

    let mut lines = vec![Line::from(Span::styled(
        format!("{:>2}", cell.date.day()),
        day_style,
    ))];

    // Rows left after the day number, one of them kept for "+N" when needed.
    let room = h.saturating_sub(1);
    let visible = cell.visible_tasks();
    let hidden = cell.overflow();
    let shown = if hidden > 0 || visible.len() > room {
        visible.len().min(room.saturating_sub(1))
    } else {
        visible.len()
    };

    for todo in &visible[..shown] {
        let style = if todo.is_done() {
            t.done
        } else {
            Style::default().fg(theme::tag_color(todo.tag_color.as_deref()))
        };
        lines.push(Line::from(Span::styled(truncate(&todo.title, w), style)));
    }
    let more = cell.tasks.len() - shown;
    if more > 0 && lines.len() < h {
        lines.push(Line::from(Span::styled(format!("+{}", more), t.dim)));
    }

    frame.render_widget(Paragraph::new(lines), area);
}
