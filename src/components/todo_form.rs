use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::components::centered;
use crate::theme;
use crate::todo::{tag, Priority, Status, Tag, Todo, TodoRequest};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FormField {
    Title,
    Content,
    Date,
    Time,
    Priority,
    Tag,
}

impl FormField {
    pub fn next(&self) -> Self {
        match self {
            FormField::Title => FormField::Content,
            FormField::Content => FormField::Date,
            FormField::Date => FormField::Time,
            FormField::Time => FormField::Priority,
            FormField::Priority => FormField::Tag,
            FormField::Tag => FormField::Title,
        }
    }

    pub fn prev(&self) -> Self {
        match self {
            FormField::Title => FormField::Tag,
            FormField::Content => FormField::Title,
            FormField::Date => FormField::Content,
            FormField::Time => FormField::Date,
            FormField::Priority => FormField::Time,
            FormField::Tag => FormField::Priority,
        }
    }
}

/// Editing buffer for the new/edit task popup.
#[derive(Debug, Clone)]
pub struct TodoFormState {
    /// `Some(id)` when editing an existing task.
    pub editing: Option<i64>,
    pub title: String,
    pub content: String,
    pub date: String,
    pub time: String,
    pub priority: Priority,
    pub status: Option<Status>,
    /// Index into the tag list.
    pub tag_index: Option<usize>,
    pub active_field: FormField,
}

impl TodoFormState {
    pub fn new(at: NaiveDateTime) -> Self {
        Self {
            editing: None,
            title: String::new(),
            content: String::new(),
            date: at.format("%Y-%m-%d").to_string(),
            time: at.format("%H:%M").to_string(),
            priority: Priority::Medium,
            status: None,
            tag_index: None,
            active_field: FormField::Title,
        }
    }

    /// Prefill from an existing task. Responses may omit `tagId`, so the tag
    /// is looked up by name when needed.
    pub fn edit(todo: &Todo, tags: &[Tag], fallback: NaiveDateTime) -> Self {
        let at = todo.due().unwrap_or(fallback);
        let tag_id = todo
            .tag_id
            .or_else(|| todo.tag_name.as_deref().and_then(|n| tag::id_by_name(tags, n)));
        Self {
            editing: Some(todo.id),
            title: todo.title.clone(),
            content: todo.content.clone().unwrap_or_default(),
            priority: todo.priority,
            status: Some(todo.status),
            tag_index: tag_id.and_then(|id| tags.iter().position(|t| t.id == id)),
            ..Self::new(at)
        }
    }

    pub fn parsed_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(self.date.trim(), "%Y-%m-%d").ok()
    }

    pub fn parsed_time(&self) -> Option<NaiveTime> {
        NaiveTime::parse_from_str(self.time.trim(), "%H:%M").ok()
    }

    pub fn input_char(&mut self, c: char) {
        match self.active_field {
            FormField::Title => self.title.push(c),
            FormField::Content => self.content.push(c),
            FormField::Date => self.date.push(c),
            FormField::Time => self.time.push(c),
            FormField::Priority | FormField::Tag => {}
        }
    }

    pub fn backspace(&mut self) {
        match self.active_field {
            FormField::Title => {
                self.title.pop();
            }
            FormField::Content => {
                self.content.pop();
            }
            FormField::Date => {
                self.date.pop();
            }
            FormField::Time => {
                self.time.pop();
            }
            FormField::Priority | FormField::Tag => {}
        }
    }

    /// Space on a choice field cycles it; elsewhere it is typed.
    pub fn space(&mut self, tag_count: usize) {
        match self.active_field {
            FormField::Priority => self.priority = self.priority.next(),
            FormField::Tag => self.next_tag(tag_count),
            _ => self.input_char(' '),
        }
    }

    pub fn next_tag(&mut self, total: usize) {
        if total > 0 {
            self.tag_index = Some(self.tag_index.map_or(0, |i| (i + 1) % total));
        }
    }

    /// Check the fields and build the request body.
    pub fn to_request(&self, tags: &[Tag]) -> Result<TodoRequest, &'static str> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err("Title is required");
        }
        let date = self.parsed_date().ok_or("Date must be YYYY-MM-DD")?;
        let time = self.parsed_time().ok_or("Time must be HH:MM")?;
        let tag = self
            .tag_index
            .and_then(|i| tags.get(i))
            .ok_or("Pick a tag")?;

        Ok(TodoRequest {
            title: title.to_string(),
            content: self.content.trim().to_string(),
            due_date: NaiveDateTime::new(date, time)
                .format("%Y-%m-%dT%H:%M:%S")
                .to_string(),
            priority: self.priority,
            status: self.status,
            tag_id: tag.id,
        })
    }
}

pub struct TodoForm;

impl TodoForm {
    pub fn render(frame: &mut Frame, area: Rect, state: &TodoFormState, tags: &[Tag]) {
        let t = theme::current();
        let form_area = centered(area, area.width.clamp(30, 56), area.height.clamp(10, 13));
        frame.render_widget(Clear, form_area);

        let title = if state.editing.is_some() { " Edit Task " } else { " New Task " };
        let block = Block::default()
            .title(title)
            .title_style(t.header)
            .borders(Borders::ALL)
            .border_style(t.focus_border);

        let inner = block.inner(form_area);
        frame.render_widget(block, form_area);

        let rows = Layout::vertical([
            Constraint::Length(1), // title
            Constraint::Length(1), // content
            Constraint::Length(1), // date
            Constraint::Length(1), // time
            Constraint::Length(1), // priority
            Constraint::Length(1), // tag
            Constraint::Length(1), // spacer
            Constraint::Length(1), // help
            Constraint::Min(0),
        ])
        .split(inner);

        let active = state.active_field;
        render_field(frame, rows[0], "Title:", &state.title, active == FormField::Title);
        render_field(frame, rows[1], "Notes:", &state.content, active == FormField::Content);
        render_field(frame, rows[2], "Date:", &state.date, active == FormField::Date);
        render_field(frame, rows[3], "Time:", &state.time, active == FormField::Time);
        render_field(
            frame,
            rows[4],
            "Prio:",
            &state.priority.to_string(),
            active == FormField::Priority,
        );

        let tag_name = state
            .tag_index
            .and_then(|i| tags.get(i))
            .map(|t| t.name.as_str())
            .unwrap_or("(none)");
        render_field(frame, rows[5], "Tag:", tag_name, active == FormField::Tag);

        let key = Style::default().add_modifier(Modifier::BOLD);
        let help = Line::from(vec![
            Span::styled("Tab", key),
            Span::styled(":Next ", t.dim),
            Span::styled("Space", key),
            Span::styled(":Cycle ", t.dim),
            Span::styled("Enter", key),
            Span::styled(":Save ", t.dim),
            Span::styled("Esc", key),
            Span::styled(":Cancel", t.dim),
        ]);
        frame.render_widget(Paragraph::new(help), rows[7]);
    }
}

pub(crate) fn render_field(frame: &mut Frame, area: Rect, label: &str, value: &str, active: bool) {
    let t = theme::current();
    let cursor = if active { "_" } else { "" };
    let style = if active { t.focus_border } else { Style::default() };

    let spans = vec![
        Span::styled(format!("{:<7}", label), t.dim),
        Span::styled(format!("{}{}", value, cursor), style),
    ];
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::todo::task::sample;

    fn at() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 2, 15)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap()
    }

    fn tags() -> Vec<Tag> {
        vec![
            Tag { id: 10, name: "home".into(), color: "#00ff00".into() },
            Tag { id: 20, name: "work".into(), color: "#0000ff".into() },
        ]
    }

    #[test]
    fn new_form_defaults_to_given_time() {
        let form = TodoFormState::new(at());
        assert_eq!(form.date, "2024-02-15");
        assert_eq!(form.time, "09:30");
        assert_eq!(form.priority, Priority::Medium);
    }

    #[test]
    fn validation_mirrors_required_fields() {
        let tags = tags();
        let mut form = TodoFormState::new(at());
        assert_eq!(form.to_request(&tags), Err("Title is required"));

        form.title = "  Buy milk ".into();
        assert_eq!(form.to_request(&tags), Err("Pick a tag"));

        form.date = "15/02/2024".into();
        assert_eq!(form.to_request(&tags), Err("Date must be YYYY-MM-DD"));
        form.date = "2024-02-15".into();

        form.time = "9h".into();
        assert_eq!(form.to_request(&tags), Err("Time must be HH:MM"));
        form.time = "09:30".into();

        form.next_tag(tags.len());
        form.next_tag(tags.len());
        let req = form.to_request(&tags).unwrap();
        assert_eq!(req.title, "Buy milk");
        assert_eq!(req.due_date, "2024-02-15T09:30:00");
        assert_eq!(req.tag_id, 20);
        assert_eq!(req.status, None);
    }

    #[test]
    fn edit_resolves_tag_by_name() {
        let mut todo = sample(3, "Report", "2024-03-01T17:00:00");
        todo.tag_name = Some("work".into());
        todo.status = Status::Done;
        let form = TodoFormState::edit(&todo, &tags(), at());
        assert_eq!(form.editing, Some(3));
        assert_eq!(form.tag_index, Some(1));
        assert_eq!(form.date, "2024-03-01");
        assert_eq!(form.time, "17:00");
        assert_eq!(form.to_request(&tags()).unwrap().status, Some(Status::Done));
    }

    #[test]
    fn edit_with_bad_due_date_uses_fallback() {
        let todo = sample(3, "Report", "garbage");
        let form = TodoFormState::edit(&todo, &tags(), at());
        assert_eq!(form.date, "2024-02-15");
        assert_eq!(form.tag_index, None);
    }

    #[test]
    fn space_cycles_choice_fields() {
        let mut form = TodoFormState::new(at());
        form.active_field = FormField::Priority;
        form.space(2);
        assert_eq!(form.priority, Priority::Low);
        form.active_field = FormField::Tag;
        form.space(2);
        form.space(2);
        form.space(2);
        assert_eq!(form.tag_index, Some(0));
        form.active_field = FormField::Title;
        form.space(2);
        assert_eq!(form.title, " ");
    }

    #[test]
    fn field_order_wraps() {
        assert_eq!(FormField::Tag.next(), FormField::Title);
        assert_eq!(FormField::Title.prev(), FormField::Tag);
    }
}
