use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::components::centered;
use crate::components::todo_form::render_field;
use crate::theme;
use crate::todo::{Tag, TagRequest};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum TagField {
    #[default]
    Name,
    Color,
}

#[derive(Debug, Clone, Default)]
pub struct TagFormState {
    pub editing: Option<i64>,
    pub name: String,
    pub color: String,
    pub active_field: TagField,
}

impl TagFormState {
    pub fn edit(tag: &Tag) -> Self {
        Self {
            editing: Some(tag.id),
            name: tag.name.clone(),
            color: tag.color.clone(),
            active_field: TagField::Name,
        }
    }

    pub fn toggle_field(&mut self) {
        self.active_field = match self.active_field {
            TagField::Name => TagField::Color,
            TagField::Color => TagField::Name,
        };
    }

    pub fn input_char(&mut self, c: char) {
        match self.active_field {
            TagField::Name => self.name.push(c),
            TagField::Color => self.color.push(c),
        }
    }

    pub fn backspace(&mut self) {
        match self.active_field {
            TagField::Name => {
                self.name.pop();
            }
            TagField::Color => {
                self.color.pop();
            }
        }
    }

    /// A blank color lets the server pick its default.
    pub fn to_request(&self) -> Result<TagRequest, &'static str> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err("Tag name is required");
        }
        let color = self.color.trim();
        let color = if color.is_empty() {
            None
        } else if color.starts_with('#') && theme::parse_color(color).is_some() {
            Some(color.to_lowercase())
        } else {
            return Err("Color must be #rrggbb");
        };
        Ok(TagRequest {
            name: name.to_string(),
            color,
        })
    }
}

pub struct TagForm;

impl TagForm {
    pub fn render(frame: &mut Frame, area: Rect, state: &TagFormState) {
        let t = theme::current();
        let form_area = centered(area, area.width.clamp(30, 44), 7);
        frame.render_widget(Clear, form_area);

        let title = if state.editing.is_some() { " Edit Tag " } else { " New Tag " };
        let block = Block::default()
            .title(title)
            .title_style(t.header)
            .borders(Borders::ALL)
            .border_style(t.focus_border);
        let inner = block.inner(form_area);
        frame.render_widget(block, form_area);

        let rows = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(inner);

        render_field(frame, rows[0], "Name:", &state.name, state.active_field == TagField::Name);
        render_field(frame, rows[1], "Color:", &state.color, state.active_field == TagField::Color);

        if let Some(color) = theme::parse_color(&state.color) {
            frame.render_widget(
                Paragraph::new(Span::styled("       ", Style::default().bg(color))),
                rows[2],
            );
        }

        let key = Style::default().add_modifier(Modifier::BOLD);
        let help = Line::from(vec![
            Span::styled("Tab", key),
            Span::styled(":Next ", t.dim),
            Span::styled("Enter", key),
            Span::styled(":Save ", t.dim),
            Span::styled("Esc", key),
            Span::styled(":Cancel", t.dim),
        ]);
        frame.render_widget(Paragraph::new(help), rows[3]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{backend::TestBackend, Terminal};

    #[test]
    fn blank_color_is_omitted() {
        let mut form = TagFormState::default();
        assert_eq!(form.to_request(), Err("Tag name is required"));
        form.name = " errands ".into();
        let req = form.to_request().unwrap();
        assert_eq!(req.name, "errands");
        assert_eq!(req.color, None);
    }

    #[test]
    fn color_must_be_hex() {
        let mut form = TagFormState::default();
        form.name = "x".into();
        form.color = "red".into();
        assert_eq!(form.to_request(), Err("Color must be #rrggbb"));
        form.color = "#AABBCC".into();
        assert_eq!(form.to_request().unwrap().color.as_deref(), Some("#aabbcc"));
    }

    #[test]
    fn typing_goes_to_active_field() {
        let tag = Tag { id: 4, name: "ho".into(), color: "#000000".into() };
        let mut form = TagFormState::edit(&tag);
        form.input_char('m');
        form.input_char('e');
        form.toggle_field();
        form.backspace();
        form.input_char('1');
        assert_eq!(form.name, "home");
        assert_eq!(form.color, "#000001");
        assert_eq!(form.editing, Some(4));
    }

    #[test]
    fn renders_while_typing_non_ascii_color() {
        let mut terminal = Terminal::new(TestBackend::new(60, 12)).unwrap();
        let mut form = TagFormState::default();
        form.name = "집안일".into();
        form.toggle_field();
        form.input_char('#');
        form.input_char('가');
        form.input_char('나');
        assert_eq!(form.color, "#가나");
        terminal.draw(|f| TagForm::render(f, f.area(), &form)).unwrap();
        assert_eq!(form.to_request(), Err("Color must be #rrggbb"));
    }
}
