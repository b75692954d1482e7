use std::future::Future;

use chrono::Local;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::calendar::{build_month_grid, CalendarCell};
use crate::components::{SidebarItem, TagFormState, TodoFormState};
use crate::todo::{ApiClient, ApiError, SortOrder, Tag, TagStats, Todo, TodoStats};
use crate::view::{View, ViewState};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Focus {
    Sidebar,
    Main,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SearchTarget {
    Tasks,
    Tags,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputMode {
    Normal,
    Search(SearchTarget),
    TodoForm,
    TagForm,
    Confirm,
}

/// A destructive action waiting for y/n.
#[derive(Debug, Clone, PartialEq)]
pub enum Confirm {
    DeleteTodo { id: i64, title: String },
    DeleteTag { id: i64, name: String },
}

impl Confirm {
    pub fn question(&self) -> String {
        match self {
            Confirm::DeleteTodo { title, .. } => format!("Delete task \"{}\"?", title),
            Confirm::DeleteTag { name, .. } => format!("Delete tag \"{}\"?", name),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatusMessage {
    pub text: String,
    pub is_error: bool,
}

/// Results of background requests, applied on the UI loop in arrival order.
#[derive(Debug)]
pub enum Message {
    Todos(Result<Vec<Todo>, ApiError>),
    Tags(Result<Vec<Tag>, ApiError>),
    Stats(Result<TodoStats, ApiError>),
    TagStats(Result<TagStats, ApiError>),
    Detail(Result<Todo, ApiError>),
    /// Fresh copy of a tag about to be edited.
    EditTag(Result<Tag, ApiError>),
    TagMatches(Result<Vec<Tag>, ApiError>),
    /// A mutation finished; on success the current view is reloaded.
    Changed {
        done: &'static str,
        reload_tags: bool,
        result: Result<(), ApiError>,
    },
}

pub struct App {
    pub running: bool,
    pub state: ViewState,
    pub todos: Vec<Todo>,
    pub tags: Vec<Tag>,
    pub stats: Option<TodoStats>,
    pub tag_stats: Option<TagStats>,
    /// Task fetched for the detail popup.
    pub detail: Option<Todo>,
    pub focus: Focus,
    pub input_mode: InputMode,
    /// Selection in the task list, or in the selected day's tasks.
    pub selected: usize,
    pub sidebar_index: usize,
    pub search_input: String,
    pub todo_form: Option<TodoFormState>,
    pub tag_form: Option<TagFormState>,
    pub confirm: Option<Confirm>,
    pub status: Option<StatusMessage>,
    pub show_help: bool,
    pub in_flight: usize,
    client: ApiClient,
    tx: UnboundedSender<Message>,
    rx: UnboundedReceiver<Message>,
}

impl App {
    pub fn new(client: ApiClient, sort: SortOrder) -> Self {
        let today = Local::now().date_naive();
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            running: true,
            state: ViewState::new(today, sort),
            todos: Vec::new(),
            tags: Vec::new(),
            stats: None,
            tag_stats: None,
            detail: None,
            focus: Focus::Main,
            input_mode: InputMode::Normal,
            selected: 0,
            sidebar_index: 0,
            search_input: String::new(),
            todo_form: None,
            tag_form: None,
            confirm: None,
            status: None,
            show_help: false,
            in_flight: 0,
            client,
            tx,
            rx,
        }
    }

    // ── Background requests ──

    /// Run `fut` on the runtime and queue its message for the UI loop.
    /// Nothing is cancelled: a slow response still lands after the user has
    /// moved on, and overwrites whatever the newer view loaded.
    fn spawn<F>(&mut self, fut: F)
    where
        F: Future<Output = Message> + Send + 'static,
    {
        self.in_flight += 1;
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let _ = tx.send(fut.await);
        });
    }

    pub fn load_tags(&mut self) {
        let client = self.client.clone();
        self.spawn(async move { Message::Tags(client.list_tags().await) });
    }

    /// Refetch the list behind the current view plus the counters.
    pub fn reload(&mut self) {
        let client = self.client.clone();
        let query = self.state.query();
        self.spawn(async move { Message::Todos(client.list_todos(&query).await) });

        let client = self.client.clone();
        self.spawn(async move { Message::Stats(client.stats().await) });

        self.tag_stats = None;
        if let View::Tag(id) = self.state.view {
            let client = self.client.clone();
            self.spawn(async move { Message::TagStats(client.tag_stats(id).await) });
        }
    }

    /// Apply every message that has arrived so far.
    pub fn drain_messages(&mut self) {
        while let Ok(msg) = self.rx.try_recv() {
            self.in_flight = self.in_flight.saturating_sub(1);
            self.apply(msg);
        }
    }

    pub fn apply(&mut self, msg: Message) {
        match msg {
            Message::Todos(Ok(todos)) => {
                log::debug!("loaded {} tasks", todos.len());
                self.todos = todos;
                self.clamp_selection();
            }
            Message::Tags(Ok(tags)) => {
                self.tags = tags;
                let max = SidebarItem::all(&self.tags).len().saturating_sub(1);
                self.sidebar_index = self.sidebar_index.min(max);
            }
            Message::Stats(Ok(stats)) => self.stats = Some(stats),
            Message::TagStats(Ok(stats)) => {
                if self.state.view == View::Tag(stats.tag.id) {
                    self.tag_stats = Some(stats);
                }
            }
            Message::Detail(Ok(todo)) => {
                if self.state.detail == Some(todo.id) {
                    self.detail = Some(todo);
                }
            }
            Message::EditTag(Ok(tag)) => {
                if self.input_mode == InputMode::Normal {
                    self.tag_form = Some(TagFormState::edit(&tag));
                    self.input_mode = InputMode::TagForm;
                }
            }
            Message::TagMatches(Ok(matches)) => match matches.first() {
                Some(tag) => {
                    if let Some(pos) = SidebarItem::all(&self.tags)
                        .iter()
                        .position(|item| *item == SidebarItem::Tag(tag.id))
                    {
                        self.sidebar_index = pos;
                        self.focus = Focus::Sidebar;
                    }
                    self.info(format!("{} matching tag(s)", matches.len()));
                }
                None => self.info("No matching tags"),
            },
            Message::Changed { done, reload_tags, result: Ok(()) } => {
                self.info(done);
                if reload_tags {
                    self.load_tags();
                }
                self.reload();
            }
            Message::Changed { result: Err(err), .. } => {
                let text = match err.code() {
                    Some("TAG_IN_USE") => "Tag is still used by tasks".to_string(),
                    Some("DUPLICATE_TAG_NAME") => "A tag with that name already exists".to_string(),
                    _ => err.to_string(),
                };
                log::error!("change failed: {}", err);
                self.error(text);
            }
            Message::Todos(Err(err))
            | Message::Tags(Err(err))
            | Message::Stats(Err(err))
            | Message::TagStats(Err(err))
            | Message::Detail(Err(err))
            | Message::EditTag(Err(err))
            | Message::TagMatches(Err(err)) => {
                log::error!("request failed: {}", err);
                self.error(format!("Could not reach the server: {}", err));
            }
        }
    }

    // ── Status line ──

    pub fn info(&mut self, text: impl Into<String>) {
        self.status = Some(StatusMessage { text: text.into(), is_error: false });
    }

    pub fn error(&mut self, text: impl Into<String>) {
        self.status = Some(StatusMessage { text: text.into(), is_error: true });
    }

    // ── View switching ──

    /// Replace the view state and reload when the list query changed.
    fn set_state(&mut self, next: ViewState) {
        let requery = next.query() != self.state.query();
        if next.view != self.state.view || next.selected_day != self.state.selected_day {
            self.selected = 0;
        }
        self.state = next;
        if requery {
            self.reload();
        }
    }

    pub fn switch_view(&mut self, f: impl FnOnce(ViewState) -> ViewState) {
        let next = f(self.state.clone());
        self.set_state(next);
    }

    pub fn activate_sidebar_item(&mut self) {
        let items = SidebarItem::all(&self.tags);
        match items.get(self.sidebar_index) {
            Some(SidebarItem::View(View::All)) => self.switch_view(ViewState::show_all),
            Some(SidebarItem::View(View::Pending)) => self.switch_view(ViewState::show_pending),
            Some(SidebarItem::View(View::Completed)) => self.switch_view(ViewState::show_completed),
            Some(SidebarItem::View(View::Calendar)) => self.switch_view(ViewState::show_calendar),
            Some(SidebarItem::Tag(id)) => {
                let id = *id;
                self.switch_view(|s| s.filter_by_tag(id));
            }
            Some(SidebarItem::View(_)) | None => {}
        }
        self.focus = Focus::Main;
    }

    pub fn sidebar_tag(&self) -> Option<&Tag> {
        match SidebarItem::all(&self.tags).get(self.sidebar_index) {
            Some(SidebarItem::Tag(id)) => self.tags.iter().find(|t| t.id == *id),
            _ => None,
        }
    }

    pub fn sidebar_down(&mut self) {
        let len = SidebarItem::all(&self.tags).len();
        if self.sidebar_index + 1 < len {
            self.sidebar_index += 1;
        }
    }

    pub fn sidebar_up(&mut self) {
        self.sidebar_index = self.sidebar_index.saturating_sub(1);
    }

    pub fn submit_search(&mut self, target: SearchTarget) {
        let term = std::mem::take(&mut self.search_input);
        self.input_mode = InputMode::Normal;
        match target {
            SearchTarget::Tasks => self.switch_view(|s| s.search(&term)),
            SearchTarget::Tags => {
                let term = term.trim().to_string();
                if term.is_empty() {
                    return;
                }
                let client = self.client.clone();
                self.spawn(async move { Message::TagMatches(client.search_tags(&term).await) });
            }
        }
    }

    // ── Calendar ──

    /// The grid for the displayed month, rebuilt from the loaded tasks.
    pub fn grid(&self) -> Vec<CalendarCell<'_>> {
        let month = self.state.month;
        build_month_grid(month.year, month.month0 as i32, &self.todos)
    }

    /// Tasks due on the selected calendar day.
    pub fn day_tasks(&self) -> Vec<&Todo> {
        self.grid()
            .into_iter()
            .find(|c| c.date == self.state.selected_day)
            .map(|c| c.tasks)
            .unwrap_or_default()
    }

    /// Move the calendar cursor; crossing a month edge shows that month.
    pub fn move_day(&mut self, delta: i64) {
        self.switch_view(|s| s.move_day(delta));
    }

    pub fn go_to_today(&mut self) {
        let today = Local::now().date_naive();
        self.switch_view(|s| s.go_to_today(today));
    }

    // ── Selection ──

    fn visible_len(&self) -> usize {
        if self.state.is_calendar() {
            self.day_tasks().len()
        } else {
            self.todos.len()
        }
    }

    pub fn selected_todo(&self) -> Option<&Todo> {
        if self.state.is_calendar() {
            self.day_tasks().get(self.selected).copied()
        } else {
            self.todos.get(self.selected)
        }
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.visible_len() {
            self.selected += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    fn clamp_selection(&mut self) {
        self.selected = self.selected.min(self.visible_len().saturating_sub(1));
    }

    // ── Task actions ──

    pub fn open_detail(&mut self) {
        let Some(id) = self.selected_todo().map(|t| t.id) else {
            return;
        };
        self.detail = self.selected_todo().cloned();
        self.state = self.state.clone().open_detail(id);
        let client = self.client.clone();
        self.spawn(async move { Message::Detail(client.get_todo(id).await) });
    }

    pub fn close_detail(&mut self) {
        self.state = self.state.clone().close_detail();
        self.detail = None;
    }

    /// Task the current action applies to: the open detail, else the selection.
    fn target_todo(&self) -> Option<Todo> {
        match (&self.detail, self.state.detail) {
            (Some(todo), Some(id)) if todo.id == id => Some(todo.clone()),
            _ => self.selected_todo().cloned(),
        }
    }

    pub fn toggle_selected(&mut self) {
        let Some(todo) = self.target_todo() else {
            return;
        };
        let client = self.client.clone();
        let done = if todo.is_done() { "Task reopened" } else { "Task completed" };
        self.spawn(async move {
            let result = client.toggle_todo(todo.id, todo.status).await.map(|_| ());
            Message::Changed { done, reload_tags: false, result }
        });
        self.close_detail();
    }

    pub fn cycle_priority(&mut self) {
        let Some(todo) = self.target_todo() else {
            return;
        };
        let client = self.client.clone();
        let next = todo.priority.next();
        self.spawn(async move {
            let result = client.change_priority(todo.id, next).await.map(|_| ());
            Message::Changed { done: "Priority changed", reload_tags: false, result }
        });
    }

    pub fn ask_delete_todo(&mut self) {
        if let Some(todo) = self.target_todo() {
            self.confirm = Some(Confirm::DeleteTodo { id: todo.id, title: todo.title });
            self.input_mode = InputMode::Confirm;
        }
    }

    pub fn ask_delete_tag(&mut self) {
        if let Some(tag) = self.sidebar_tag() {
            self.confirm = Some(Confirm::DeleteTag { id: tag.id, name: tag.name.clone() });
            self.input_mode = InputMode::Confirm;
        }
    }

    pub fn answer_confirm(&mut self, yes: bool) {
        self.input_mode = InputMode::Normal;
        let Some(confirm) = self.confirm.take() else {
            return;
        };
        if !yes {
            return;
        }
        let client = self.client.clone();
        match confirm {
            Confirm::DeleteTodo { id, .. } => {
                self.close_detail();
                self.spawn(async move {
                    let result = client.delete_todo(id).await;
                    Message::Changed { done: "Task deleted", reload_tags: false, result }
                });
            }
            Confirm::DeleteTag { id, .. } => {
                if self.state.view == View::Tag(id) {
                    self.switch_view(ViewState::show_all);
                }
                self.spawn(async move {
                    let result = client.delete_tag(id).await;
                    Message::Changed { done: "Tag deleted", reload_tags: true, result }
                });
            }
        }
    }

    // ── Forms ──

    /// New task, due now; in the calendar, due on the selected day.
    pub fn open_todo_form(&mut self) {
        let now = Local::now().naive_local();
        let at = if self.state.is_calendar() {
            self.state.selected_day.and_time(now.time())
        } else {
            now
        };
        self.todo_form = Some(TodoFormState::new(at));
        self.input_mode = InputMode::TodoForm;
    }

    pub fn open_edit_form(&mut self) {
        let Some(todo) = self.target_todo() else {
            return;
        };
        self.todo_form = Some(TodoFormState::edit(&todo, &self.tags, Local::now().naive_local()));
        self.close_detail();
        self.input_mode = InputMode::TodoForm;
    }

    pub fn close_todo_form(&mut self) {
        self.todo_form = None;
        self.input_mode = InputMode::Normal;
    }

    pub fn submit_todo_form(&mut self) {
        let Some(form) = &self.todo_form else {
            return;
        };
        let editing = form.editing;
        let body = match form.to_request(&self.tags) {
            Ok(body) => body,
            Err(msg) => {
                self.error(msg);
                return;
            }
        };
        let client = self.client.clone();
        self.spawn(async move {
            let result = match editing {
                Some(id) => client.update_todo(id, &body).await.map(|_| ()),
                None => client.create_todo(&body).await.map(|_| ()),
            };
            let done = if editing.is_some() { "Task updated" } else { "Task added" };
            Message::Changed { done, reload_tags: false, result }
        });
        self.close_todo_form();
    }

    pub fn open_tag_form(&mut self) {
        self.tag_form = Some(TagFormState::default());
        self.input_mode = InputMode::TagForm;
    }

    /// The form opens once the tag has been refetched.
    pub fn edit_sidebar_tag(&mut self) {
        let Some(id) = self.sidebar_tag().map(|t| t.id) else {
            return;
        };
        let client = self.client.clone();
        self.spawn(async move { Message::EditTag(client.get_tag(id).await) });
    }

    pub fn close_tag_form(&mut self) {
        self.tag_form = None;
        self.input_mode = InputMode::Normal;
    }

    pub fn submit_tag_form(&mut self) {
        let Some(form) = &self.tag_form else {
            return;
        };
        let editing = form.editing;
        let body = match form.to_request() {
            Ok(body) => body,
            Err(msg) => {
                self.error(msg);
                return;
            }
        };
        let client = self.client.clone();
        self.spawn(async move {
            let result = match editing {
                Some(id) => client.update_tag(id, &body).await.map(|_| ()),
                None => client.create_tag(&body).await.map(|_| ()),
            };
            let done = if editing.is_some() { "Tag updated" } else { "Tag created" };
            Message::Changed { done, reload_tags: true, result }
        });
        self.close_tag_form();
    }
}
