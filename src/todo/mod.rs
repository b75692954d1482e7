pub mod api;
pub mod tag;
pub mod task;

pub use api::{ApiClient, ApiError, SortOrder, TodoQuery};
pub use tag::{Tag, TagRequest, TagStats};
pub use task::{Priority, Status, Todo, TodoRequest, TodoStats};
