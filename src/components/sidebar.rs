use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
    Frame,
};

use crate::components::truncate;
use crate::theme;
use crate::todo::{Tag, TagStats, TodoStats};
use crate::view::View;

/// A selectable row of the sidebar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SidebarItem {
    View(View),
    Tag(i64),
}

const VIEWS: [(&str, View); 4] = [
    ("All tasks", View::All),
    ("Upcoming", View::Pending),
    ("Completed", View::Completed),
    ("Calendar", View::Calendar),
];

impl SidebarItem {
    /// Fixed views first, then one row per tag.
    pub fn all(tags: &[Tag]) -> Vec<SidebarItem> {
        VIEWS
            .iter()
            .map(|(_, v)| SidebarItem::View(v.clone()))
            .chain(tags.iter().map(|t| SidebarItem::Tag(t.id)))
            .collect()
    }
}

pub struct Sidebar;

impl Sidebar {
    #[allow(clippy::too_many_arguments)]
    pub fn render(
        frame: &mut Frame,
        area: Rect,
        tags: &[Tag],
        active: &View,
        selected: usize,
        focused: bool,
        stats: Option<&TodoStats>,
        tag_stats: Option<&TagStats>,
    ) {
        let t = theme::current();
        let inner_w = area.width.saturating_sub(2) as usize;

        let block = Block::default()
            .title(" Tasks ")
            .title_style(t.header)
            .borders(Borders::ALL)
            .border_style(if focused { t.focus_border } else { t.border });

        let row_style = |i: usize, is_active: bool| {
            if i == selected && focused {
                t.selected
            } else if is_active {
                Style::default().add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            }
        };

        let mut items: Vec<ListItem> = Vec::new();
        for (i, (label, view)) in VIEWS.iter().enumerate() {
            let count = match (view, stats) {
                (View::All, Some(s)) => format!(" {}", s.total),
                (View::Pending, Some(s)) => format!(" {}", s.pending),
                (View::Completed, Some(s)) => format!(" {}", s.completed),
                _ => String::new(),
            };
            items.push(ListItem::new(Line::from(vec![
                Span::styled(format!(" {}", label), row_style(i, active == view)),
                Span::styled(count, t.dim),
            ])));
        }

        items.push(ListItem::new(Line::from("")));
        items.push(ListItem::new(Line::from(Span::styled(" Tags", t.header))));

        if tags.is_empty() {
            items.push(ListItem::new(Line::from(Span::styled(" none yet", t.dim))));
        }
        for (j, tag) in tags.iter().enumerate() {
            let i = VIEWS.len() + j;
            let is_active = *active == View::Tag(tag.id);
            let mut spans = vec![
                Span::styled(" \u{25cf} ", Style::default().fg(theme::tag_color(Some(&tag.color)))),
                Span::styled(
                    truncate(&tag.name, inner_w.saturating_sub(4)),
                    row_style(i, is_active),
                ),
            ];
            if let Some(s) = tag_stats.filter(|s| is_active && s.tag.id == tag.id) {
                let summary = format!(
                    " {}/{} {}%",
                    s.completed_todos, s.total_todos, s.completion_rate
                );
                if spans.iter().map(|s| s.width()).sum::<usize>() + summary.len() <= inner_w {
                    spans.push(Span::styled(summary, t.dim));
                }
            }
            items.push(ListItem::new(Line::from(spans)));
        }

        frame.render_widget(List::new(items).block(block), area);
    }
}
