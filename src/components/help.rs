use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::components::centered;
use crate::theme;

const SECTIONS: [(&str, &[(&str, &str)]); 4] = [
    (
        "Views",
        &[
            ("1/2/3/4", "All / Upcoming / Completed / Calendar"),
            ("Tab", "Switch sidebar / main pane"),
            ("/", "Search task titles"),
            ("s", "Cycle sort order"),
            ("r", "Reload"),
        ],
    ),
    (
        "Tasks",
        &[
            ("j/k", "Move selection"),
            ("Enter", "Show details"),
            ("Space", "Complete / reopen"),
            ("n / e", "New / edit task"),
            ("p", "Cycle priority"),
            ("d", "Delete task"),
        ],
    ),
    (
        "Calendar",
        &[
            ("hjkl", "Move day"),
            ("[ / ]", "Previous / next month"),
            ("t", "Jump to today"),
            ("J/K", "Move within the day's tasks"),
        ],
    ),
    (
        "Sidebar tags",
        &[
            ("N / e / d", "New / edit / delete tag"),
            ("f", "Find tag by name"),
        ],
    ),
];

pub struct HelpPopup;

impl HelpPopup {
    pub fn render(frame: &mut Frame, area: Rect) {
        let t = theme::current();
        let popup_area = centered(area, area.width.clamp(30, 56), area.height.clamp(12, 30));
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title(" Keybindings ")
            .title_style(t.header)
            .title_bottom(Line::from(Span::styled(format!(" theme: {} ", t.name), t.dim)))
            .borders(Borders::ALL)
            .border_style(t.focus_border);
        let inner = block.inner(popup_area);
        frame.render_widget(block, popup_area);

        let key_style = t.focus_border.add_modifier(Modifier::BOLD);
        let section_style = Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED);

        let mut lines = Vec::new();
        for (title, keys) in SECTIONS {
            lines.push(Line::from(Span::styled(title, section_style)));
            for (key, desc) in keys {
                lines.push(Line::from(vec![
                    Span::styled(format!("  {:<10}", key), key_style),
                    Span::raw(*desc),
                ]));
            }
            lines.push(Line::from(""));
        }
        lines.push(Line::from(vec![
            Span::styled("  q", key_style),
            Span::styled(" / ", t.dim),
            Span::styled("Esc       ", key_style),
            Span::raw("Quit / close popup"),
        ]));

        frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
    }
}
