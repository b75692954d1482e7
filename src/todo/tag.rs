use serde::{Deserialize, Serialize};

/// Color the server assigns when a tag is created without one.
pub const DEFAULT_TAG_COLOR: &str = "#6c757d";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Tag {
    pub id: i64,
    pub name: String,
    #[serde(default = "default_color")]
    pub color: String,
}

fn default_color() -> String {
    DEFAULT_TAG_COLOR.to_string()
}

/// Body of `POST /tags` and `PUT /tags/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TagRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagStats {
    pub tag: Tag,
    pub total_todos: u64,
    pub completed_todos: u64,
    pub pending_todos: u64,
    /// Percentage, already rounded by the server.
    pub completion_rate: u64,
}

/// Find the id of the tag called `name`. Task responses carry the tag's name
/// and color but not always its id.
pub fn id_by_name(tags: &[Tag], name: &str) -> Option<i64> {
    tags.iter().find(|t| t.name == name).map(|t| t.id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_defaults_when_missing() {
        let tag: Tag = serde_json::from_str(r#"{"id": 1, "name": "home"}"#).unwrap();
        assert_eq!(tag.color, DEFAULT_TAG_COLOR);
    }

    #[test]
    fn stats_decode() {
        let json = r##"{
            "tag": {"id": 2, "name": "work", "color": "#112233"},
            "totalTodos": 4, "completedTodos": 1, "pendingTodos": 3, "completionRate": 25
        }"##;
        let stats: TagStats = serde_json::from_str(json).unwrap();
        assert_eq!(stats.tag.name, "work");
        assert_eq!(stats.completion_rate, 25);
    }

    #[test]
    fn resolves_id_by_name() {
        let tags = vec![
            Tag { id: 1, name: "home".into(), color: default_color() },
            Tag { id: 2, name: "work".into(), color: default_color() },
        ];
        assert_eq!(id_by_name(&tags, "work"), Some(2));
        assert_eq!(id_by_name(&tags, "gym"), None);
    }
}
