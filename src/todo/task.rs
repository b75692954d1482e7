use std::fmt;

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Formats the server has been seen to emit for `dueDate`, tried in order
/// after RFC 3339.
const NAIVE_FORMATS: [&str; 3] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Status {
    #[default]
    #[serde(rename = "TODO", alias = "PENDING")]
    Pending,
    #[serde(rename = "DONE")]
    Done,
}

impl Status {
    pub fn as_query(&self) -> &'static str {
        match self {
            Status::Pending => "TODO",
            Status::Done => "DONE",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
}

impl Priority {
    pub fn as_query(&self) -> &'static str {
        match self {
            Priority::High => "HIGH",
            Priority::Medium => "MEDIUM",
            Priority::Low => "LOW",
        }
    }

    /// HIGH -> MEDIUM -> LOW -> HIGH
    pub fn next(&self) -> Self {
        match self {
            Priority::High => Priority::Medium,
            Priority::Medium => Priority::Low,
            Priority::Low => Priority::High,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
        };
        f.write_str(label)
    }
}

/// A task as returned by the `/todos` endpoints.
///
/// `due_date` is kept as the raw server string: one malformed timestamp must
/// not make the whole list undecodable. Use [`Todo::due`] to read it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default)]
    pub status: Status,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub tag_id: Option<i64>,
    #[serde(default)]
    pub tag_name: Option<String>,
    #[serde(default)]
    pub tag_color: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl Todo {
    /// Due timestamp in local wall-clock time, or `None` if absent or unparseable.
    pub fn due(&self) -> Option<NaiveDateTime> {
        self.due_date.as_deref().and_then(parse_timestamp)
    }

    /// Local calendar day the task is due on.
    pub fn due_day(&self) -> Option<NaiveDate> {
        self.due().map(|dt| dt.date())
    }

    pub fn is_done(&self) -> bool {
        self.status == Status::Done
    }

    pub fn due_display(&self) -> String {
        match self.due() {
            Some(dt) => dt.format("%Y-%m-%d %H:%M").to_string(),
            None => "no date".to_string(),
        }
    }
}

/// Parse a server timestamp into local wall-clock time.
///
/// Offset-carrying timestamps are converted into the local zone; naive ones
/// are already local. A bare date is taken as midnight.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Local).naive_local());
    }
    for fmt in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Body of `POST /todos` and `PUT /todos/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoRequest {
    pub title: String,
    pub content: String,
    pub due_date: String,
    pub priority: Priority,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,
    pub tag_id: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub struct TodoStats {
    pub total: u64,
    pub completed: u64,
    pub pending: u64,
}

#[cfg(test)]
pub(crate) fn sample(id: i64, title: &str, due: &str) -> Todo {
    Todo {
        id,
        title: title.to_string(),
        content: None,
        due_date: Some(due.to_string()),
        status: Status::Pending,
        priority: Priority::Medium,
        tag_id: None,
        tag_name: None,
        tag_color: None,
        created_at: None,
        updated_at: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    #[test]
    fn decodes_server_record() {
        let json = r##"{
            "id": 7,
            "title": "Write report",
            "content": "quarterly",
            "dueDate": "2024-02-15T09:00:00",
            "status": "TODO",
            "priority": "HIGH",
            "tagName": "work",
            "tagColor": "#ff0000",
            "createdAt": "2024-02-01T10:11:12.123456"
        }"##;
        let todo: Todo = serde_json::from_str(json).unwrap();
        assert_eq!(todo.id, 7);
        assert_eq!(todo.status, Status::Pending);
        assert_eq!(todo.priority, Priority::High);
        assert_eq!(todo.tag_id, None);
        assert_eq!(todo.due_day(), NaiveDate::from_ymd_opt(2024, 2, 15));
    }

    #[test]
    fn missing_optional_fields_use_defaults() {
        let todo: Todo = serde_json::from_str(r#"{"id": 1, "title": "x"}"#).unwrap();
        assert_eq!(todo.status, Status::Pending);
        assert_eq!(todo.priority, Priority::Medium);
        assert!(todo.due().is_none());
        assert_eq!(todo.due_display(), "no date");
    }

    #[test]
    fn pending_alias_is_accepted() {
        let todo: Todo =
            serde_json::from_str(r#"{"id": 1, "title": "x", "status": "PENDING"}"#).unwrap();
        assert_eq!(todo.status, Status::Pending);
    }

    #[test]
    fn malformed_due_date_still_decodes() {
        let todo: Todo =
            serde_json::from_str(r#"{"id": 1, "title": "x", "dueDate": "someday"}"#).unwrap();
        assert!(todo.due().is_none());
    }

    #[test]
    fn parses_naive_formats() {
        let nine = NaiveTime::from_hms_opt(9, 0, 0).unwrap();
        for raw in [
            "2024-02-15T09:00:00",
            "2024-02-15T09:00",
            "2024-02-15 09:00:00",
            "2024-02-15T09:00:00.000",
        ] {
            let dt = parse_timestamp(raw).unwrap();
            assert_eq!(dt.date(), NaiveDate::from_ymd_opt(2024, 2, 15).unwrap(), "{raw}");
            assert_eq!(dt.time(), nine, "{raw}");
        }
        let midnight = parse_timestamp("2024-02-15").unwrap();
        assert_eq!(midnight.time(), NaiveTime::MIN);
    }

    #[test]
    fn offset_timestamps_become_local() {
        let dt = parse_timestamp("2024-02-15T12:00:00Z").unwrap();
        let expected = DateTime::parse_from_rfc3339("2024-02-15T12:00:00Z")
            .unwrap()
            .with_timezone(&Local)
            .naive_local();
        assert_eq!(dt, expected);
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_timestamp("").is_none());
        assert!(parse_timestamp("2024-13-40T00:00:00").is_none());
        assert!(parse_timestamp("tomorrow").is_none());
    }

    #[test]
    fn request_serializes_camel_case() {
        let req = TodoRequest {
            title: "a".into(),
            content: String::new(),
            due_date: "2024-02-15T09:00:00".into(),
            priority: Priority::Low,
            status: None,
            tag_id: 3,
        };
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(value["dueDate"], "2024-02-15T09:00:00");
        assert_eq!(value["priority"], "LOW");
        assert_eq!(value["tagId"], 3);
        assert!(value.get("status").is_none());
    }

    #[test]
    fn priority_cycles() {
        assert_eq!(Priority::High.next(), Priority::Medium);
        assert_eq!(Priority::Low.next(), Priority::High);
    }
}
