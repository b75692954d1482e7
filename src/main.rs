mod app;
mod calendar;
mod components;
mod config;
mod event;
mod logging;
mod theme;
mod todo;
mod tui;
mod view;

use std::time::Duration;

use app::{App, Focus, InputMode, SearchTarget};
use color_eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::Frame;

use config::Config;
use todo::ApiClient;
use view::{View, ViewState};

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let config = Config::load()?;
    let log_file = logging::init(&config.log);
    theme::init(&config.theme);

    let client = ApiClient::new(&config.api.base_url, config.api.timeout())?;
    log::info!("starting, API at {}", client.base_url());

    let mut app = App::new(client, config.view.default_sort);
    app.load_tags();
    app.reload();

    let mut terminal = tui::init()?;
    let result = run(&mut terminal, &mut app);
    tui::restore()?;

    if let Err(err) = &result {
        log::error!("exiting with error: {}", err);
        if let Some(path) = log_file {
            eprintln!("Log written to {}", path.display());
        }
    }
    result
}

fn run(terminal: &mut tui::Tui, app: &mut App) -> Result<()> {
    while app.running {
        app.drain_messages();

        terminal.draw(|frame| {
            let area = frame.area();
            let layout = Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).split(area);

            render_main(frame, layout[0], app);

            if let Some(form) = &app.todo_form {
                components::TodoForm::render(frame, area, form, &app.tags);
            }
            if let Some(form) = &app.tag_form {
                components::TagForm::render(frame, area, form);
            }
            if let Some(todo) = &app.detail {
                components::DetailPopup::render(frame, area, todo);
            }
            if let Some(confirm) = &app.confirm {
                components::ConfirmPrompt::render(frame, area, &confirm.question());
            }
            if app.show_help {
                components::HelpPopup::render(frame, area);
            }

            render_status_bar(frame, layout[1], app);
        })?;

        if let Some(key) = event::next_key_press(Duration::from_millis(100))? {
            if app.input_mode == InputMode::Normal {
                app.status = None;
            }

            if app.show_help {
                if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
                    app.show_help = false;
                }
                continue;
            }

            match app.input_mode {
                InputMode::Normal if app.detail.is_some() => handle_detail_input(app, key),
                InputMode::Normal => handle_normal_input(app, key),
                InputMode::Search(target) => handle_search_input(app, key, target),
                InputMode::TodoForm => handle_todo_form_input(app, key),
                InputMode::TagForm => handle_tag_form_input(app, key),
                InputMode::Confirm => handle_confirm_input(app, key),
            }
        }
    }

    log::info!("quit");
    Ok(())
}

fn handle_normal_input(app: &mut App, key: KeyEvent) {
    match (key.code, key.modifiers) {
        (KeyCode::Char('q'), _) | (KeyCode::Char('c'), KeyModifiers::CONTROL) => {
            app.running = false;
        }
        (KeyCode::Char('?'), _) => app.show_help = true,
        (KeyCode::Char('1'), _) => app.switch_view(ViewState::show_all),
        (KeyCode::Char('2'), _) => app.switch_view(ViewState::show_pending),
        (KeyCode::Char('3'), _) => app.switch_view(ViewState::show_completed),
        (KeyCode::Char('4'), _) => app.switch_view(ViewState::show_calendar),
        (KeyCode::Tab, _) | (KeyCode::BackTab, _) => {
            app.focus = match app.focus {
                Focus::Sidebar => Focus::Main,
                Focus::Main => Focus::Sidebar,
            };
        }
        (KeyCode::Char('r'), _) => {
            app.load_tags();
            app.reload();
        }
        (KeyCode::Char('s'), _) => app.switch_view(ViewState::cycle_sort),
        (KeyCode::Char('/'), _) => {
            app.search_input.clear();
            app.input_mode = InputMode::Search(SearchTarget::Tasks);
        }
        (KeyCode::Char('n'), _) => app.open_todo_form(),
        _ => match app.focus {
            Focus::Sidebar => handle_sidebar_input(app, key.code),
            Focus::Main if app.state.is_calendar() => handle_calendar_input(app, key.code),
            Focus::Main => handle_list_input(app, key.code),
        },
    }
}

fn handle_sidebar_input(app: &mut App, code: KeyCode) {
    match code {
        KeyCode::Down | KeyCode::Char('j') => app.sidebar_down(),
        KeyCode::Up | KeyCode::Char('k') => app.sidebar_up(),
        KeyCode::Enter | KeyCode::Char('l') => app.activate_sidebar_item(),
        KeyCode::Char('N') => app.open_tag_form(),
        KeyCode::Char('e') => app.edit_sidebar_tag(),
        KeyCode::Char('d') => app.ask_delete_tag(),
        KeyCode::Char('f') => {
            app.search_input.clear();
            app.input_mode = InputMode::Search(SearchTarget::Tags);
        }
        _ => {}
    }
}

fn handle_list_input(app: &mut App, code: KeyCode) {
    match code {
        KeyCode::Down | KeyCode::Char('j') => app.select_next(),
        KeyCode::Up | KeyCode::Char('k') => app.select_prev(),
        _ => handle_task_action(app, code),
    }
}

fn handle_calendar_input(app: &mut App, code: KeyCode) {
    match code {
        KeyCode::Left | KeyCode::Char('h') => app.move_day(-1),
        KeyCode::Right | KeyCode::Char('l') => app.move_day(1),
        KeyCode::Up | KeyCode::Char('k') => app.move_day(-7),
        KeyCode::Down | KeyCode::Char('j') => app.move_day(7),
        KeyCode::Char('[') => app.switch_view(ViewState::prev_month),
        KeyCode::Char(']') => app.switch_view(ViewState::next_month),
        KeyCode::Char('t') => app.go_to_today(),
        KeyCode::Char('J') => app.select_next(),
        KeyCode::Char('K') => app.select_prev(),
        _ => handle_task_action(app, code),
    }
}

/// Keys acting on the selected task, shared by the list and the calendar.
fn handle_task_action(app: &mut App, code: KeyCode) {
    match code {
        KeyCode::Enter => app.open_detail(),
        KeyCode::Char(' ') => app.toggle_selected(),
        KeyCode::Char('e') => app.open_edit_form(),
        KeyCode::Char('d') => app.ask_delete_todo(),
        KeyCode::Char('p') => app.cycle_priority(),
        _ => {}
    }
}

fn handle_detail_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') => app.close_detail(),
        KeyCode::Char(' ') => app.toggle_selected(),
        KeyCode::Char('e') => app.open_edit_form(),
        KeyCode::Char('d') => app.ask_delete_todo(),
        KeyCode::Char('p') => app.cycle_priority(),
        _ => {}
    }
}

fn handle_search_input(app: &mut App, key: KeyEvent, target: SearchTarget) {
    match key.code {
        KeyCode::Esc => {
            app.search_input.clear();
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Enter => app.submit_search(target),
        KeyCode::Backspace => {
            app.search_input.pop();
        }
        KeyCode::Char(c) => app.search_input.push(c),
        _ => {}
    }
}

fn handle_todo_form_input(app: &mut App, key: KeyEvent) {
    let tag_count = app.tags.len();
    let Some(form) = app.todo_form.as_mut() else {
        app.input_mode = InputMode::Normal;
        return;
    };
    match key.code {
        KeyCode::Esc => app.close_todo_form(),
        KeyCode::Enter => app.submit_todo_form(),
        KeyCode::Tab => form.active_field = form.active_field.next(),
        KeyCode::BackTab => form.active_field = form.active_field.prev(),
        KeyCode::Backspace => form.backspace(),
        KeyCode::Char(' ') => form.space(tag_count),
        KeyCode::Char(c) => form.input_char(c),
        _ => {}
    }
}

fn handle_tag_form_input(app: &mut App, key: KeyEvent) {
    let Some(form) = app.tag_form.as_mut() else {
        app.input_mode = InputMode::Normal;
        return;
    };
    match key.code {
        KeyCode::Esc => app.close_tag_form(),
        KeyCode::Enter => app.submit_tag_form(),
        KeyCode::Tab | KeyCode::BackTab => form.toggle_field(),
        KeyCode::Backspace => form.backspace(),
        KeyCode::Char(c) => form.input_char(c),
        _ => {}
    }
}

fn handle_confirm_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') => app.answer_confirm(true),
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => app.answer_confirm(false),
        _ => {}
    }
}

fn render_main(frame: &mut Frame, area: Rect, app: &App) {
    let main_area = if area.width >= 60 {
        let sidebar_w = if area.width >= 100 { 28 } else { 22 };
        let columns =
            Layout::horizontal([Constraint::Length(sidebar_w), Constraint::Min(20)]).split(area);
        components::Sidebar::render(
            frame,
            columns[0],
            &app.tags,
            &app.state.view,
            app.sidebar_index,
            app.focus == Focus::Sidebar,
            app.stats.as_ref(),
            app.tag_stats.as_ref(),
        );
        columns[1]
    } else {
        area
    };

    let focused = app.focus == Focus::Main || area.width < 60;
    if app.state.is_calendar() {
        render_calendar(frame, main_area, app, focused);
    } else {
        components::TodoList::render(
            frame,
            main_area,
            &app.state.title(&app.tags),
            &app.todos,
            app.selected,
            focused,
            app.state.sort,
        );
    }
}

fn render_calendar(frame: &mut Frame, area: Rect, app: &App, focused: bool) {
    let cells = app.grid();
    let day_tasks = app.day_tasks();

    let (month_area, day_area) = if area.width >= 100 {
        let columns = Layout::horizontal([Constraint::Min(60), Constraint::Length(36)]).split(area);
        (columns[0], columns[1])
    } else {
        let rows = Layout::vertical([Constraint::Percentage(65), Constraint::Min(5)]).split(area);
        (rows[0], rows[1])
    };

    components::MonthView::render(
        frame,
        month_area,
        app.state.month,
        &cells,
        app.state.selected_day,
        focused,
    );
    components::DayPanel::render(frame, day_area, app.state.selected_day, &day_tasks, app.selected);
}

fn render_status_bar(frame: &mut Frame, area: Rect, app: &App) {
    let mode = match (app.input_mode, &app.state.view) {
        (InputMode::Search(SearchTarget::Tasks), _) => format!("Search: {}_", app.search_input),
        (InputMode::Search(SearchTarget::Tags), _) => format!("Find tag: {}_", app.search_input),
        (InputMode::TodoForm, _) => "[Task]".to_string(),
        (InputMode::TagForm, _) => "[Tag]".to_string(),
        (InputMode::Confirm, _) => "[Confirm]".to_string(),
        (InputMode::Normal, View::Calendar) => "[4]Calendar".to_string(),
        (InputMode::Normal, View::Pending) => "[2]Upcoming".to_string(),
        (InputMode::Normal, View::Completed) => "[3]Completed".to_string(),
        (InputMode::Normal, View::All) => "[1]All".to_string(),
        (InputMode::Normal, View::Tag(_) | View::Search(_)) => app.state.title(&app.tags),
    };

    let hints: &[&str] = match (app.input_mode, app.focus) {
        (InputMode::Search(_), _) => &["Enter:Search Esc:Cancel", "Esc:Cancel"],
        (InputMode::TodoForm | InputMode::TagForm, _) => {
            &["Tab:Next Enter:Save Esc:Cancel", "Esc:Cancel"]
        }
        (InputMode::Confirm, _) => &["y:Yes n:No"],
        (InputMode::Normal, Focus::Sidebar) => &[
            "jk:Move Enter:Open N:New tag e:Edit d:Del f:Find Tab:Tasks ?:Help q:Quit",
            "Enter:Open N:New e:Edit d:Del q:Quit",
            "?:Help q:Quit",
        ],
        (InputMode::Normal, Focus::Main) if app.state.is_calendar() => &[
            "hjkl:Day [/]:Month t:Today JK:Task Enter:Detail Sp:Done n:New ?:Help q:Quit",
            "hjkl:Day [/]:Mon t:Today n:New q:Quit",
            "?:Help q:Quit",
        ],
        (InputMode::Normal, Focus::Main) => &[
            "jk:Move Enter:Detail Sp:Done n:New e:Edit d:Del p:Prio s:Sort /:Search ?:Help q:Quit",
            "jk:Move Sp:Done n:New /:Search q:Quit",
            "?:Help q:Quit",
        ],
    };

    let message = app.status.as_ref().map(|s| (s.text.as_str(), s.is_error));
    components::StatusBar::render(frame, area, &mode, message, hints, app.in_flight > 0);
}
