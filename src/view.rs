use chrono::{Datelike, Days, NaiveDate};

use crate::calendar::MonthRef;
use crate::todo::{SortOrder, Status, Tag, TodoQuery};

/// Which task list (or the calendar) is on screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View {
    All,
    Pending,
    Completed,
    Tag(i64),
    Search(String),
    Calendar,
}

/// Everything that decides what the main pane shows. Transitions take the
/// state by value and hand back the next one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    pub view: View,
    pub sort: SortOrder,
    pub month: MonthRef,
    pub selected_day: NaiveDate,
    /// Task whose detail popup is open.
    pub detail: Option<i64>,
}

impl ViewState {
    pub fn new(today: NaiveDate, sort: SortOrder) -> Self {
        Self {
            view: View::All,
            sort,
            month: MonthRef::containing(today),
            selected_day: today,
            detail: None,
        }
    }

    pub fn show_all(self) -> Self {
        Self { view: View::All, ..self }
    }

    pub fn show_pending(self) -> Self {
        Self { view: View::Pending, ..self }
    }

    pub fn show_completed(self) -> Self {
        Self { view: View::Completed, ..self }
    }

    pub fn filter_by_tag(self, tag_id: i64) -> Self {
        Self { view: View::Tag(tag_id), ..self }
    }

    /// A blank search term goes back to the full list.
    pub fn search(self, term: &str) -> Self {
        let term = term.trim();
        if term.is_empty() {
            self.show_all()
        } else {
            Self { view: View::Search(term.to_string()), ..self }
        }
    }

    pub fn show_calendar(self) -> Self {
        Self { view: View::Calendar, ..self }
    }

    pub fn cycle_sort(self) -> Self {
        Self { sort: self.sort.next(), ..self }
    }

    pub fn next_month(self) -> Self {
        let month = self.month.next();
        self.move_to_month(month)
    }

    pub fn prev_month(self) -> Self {
        let month = self.month.prev();
        self.move_to_month(month)
    }

    pub fn go_to_today(self, today: NaiveDate) -> Self {
        Self {
            month: MonthRef::containing(today),
            selected_day: today,
            ..self
        }
    }

    /// Select a calendar day; picking a lead/trail day switches to its month.
    pub fn select_day(self, date: NaiveDate) -> Self {
        Self {
            month: MonthRef::containing(date),
            selected_day: date,
            ..self
        }
    }

    /// Move the calendar cursor by `delta` days.
    pub fn move_day(self, delta: i64) -> Self {
        let days = Days::new(delta.unsigned_abs());
        let moved = if delta >= 0 {
            self.selected_day.checked_add_days(days)
        } else {
            self.selected_day.checked_sub_days(days)
        };
        match moved {
            Some(date) => self.select_day(date),
            None => self,
        }
    }

    pub fn open_detail(self, id: i64) -> Self {
        Self { detail: Some(id), ..self }
    }

    pub fn close_detail(self) -> Self {
        Self { detail: None, ..self }
    }

    pub fn is_calendar(&self) -> bool {
        self.view == View::Calendar
    }

    /// The list request that backs the current view.
    pub fn query(&self) -> TodoQuery {
        let base = TodoQuery {
            sort: self.sort,
            ..Default::default()
        };
        match &self.view {
            View::All | View::Calendar => base,
            View::Pending => TodoQuery { status: Some(Status::Pending), ..base },
            View::Completed => TodoQuery { status: Some(Status::Done), ..base },
            View::Tag(id) => TodoQuery { tag_id: Some(*id), ..base },
            View::Search(term) => TodoQuery { search: Some(term.clone()), ..base },
        }
    }

    pub fn title(&self, tags: &[Tag]) -> String {
        match &self.view {
            View::All => "All tasks".to_string(),
            View::Pending => "Upcoming".to_string(),
            View::Completed => "Completed".to_string(),
            View::Tag(id) => {
                let name = tags
                    .iter()
                    .find(|t| t.id == *id)
                    .map(|t| t.name.as_str())
                    .unwrap_or("tag");
                format!("#{}", name)
            }
            View::Search(term) => format!("\"{}\" results", term),
            View::Calendar => self.month.title(),
        }
    }

    fn move_to_month(self, month: MonthRef) -> Self {
        let selected_day = month
            .clamp_day(self.selected_day.day())
            .unwrap_or(self.selected_day);
        Self { month, selected_day, ..self }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn state() -> ViewState {
        ViewState::new(date(2024, 1, 31), SortOrder::DueDate)
    }

    #[test]
    fn list_views_map_to_queries() {
        let s = state();
        assert_eq!(s.query(), TodoQuery::default());

        let pending = s.clone().show_pending().query();
        assert_eq!(pending.status, Some(Status::Pending));
        assert_eq!(pending.sort, SortOrder::DueDate);

        let done = s.clone().show_completed().cycle_sort().query();
        assert_eq!(done.status, Some(Status::Done));
        assert_eq!(done.sort, SortOrder::Created);

        assert_eq!(s.clone().filter_by_tag(3).query().tag_id, Some(3));
        assert_eq!(
            s.clone().search("  milk ").query().search.as_deref(),
            Some("milk")
        );
        assert_eq!(s.show_calendar().query(), TodoQuery::default());
    }

    #[test]
    fn blank_search_returns_to_all() {
        let s = state().show_completed().search("   ");
        assert_eq!(s.view, View::All);
    }

    #[test]
    fn month_navigation_clamps_selected_day() {
        let s = state().show_calendar().next_month();
        assert_eq!(s.month, MonthRef::new(2024, 1));
        assert_eq!(s.selected_day, date(2024, 2, 29));

        let s = s.prev_month().prev_month();
        assert_eq!(s.month, MonthRef::new(2023, 11));
        assert_eq!(s.selected_day, date(2023, 12, 29));
    }

    #[test]
    fn moving_past_month_end_follows_the_cursor() {
        let s = state().move_day(1);
        assert_eq!(s.selected_day, date(2024, 2, 1));
        assert_eq!(s.month, MonthRef::new(2024, 1));

        let s = s.move_day(-7);
        assert_eq!(s.selected_day, date(2024, 1, 25));
        assert_eq!(s.month, MonthRef::new(2024, 0));
    }

    #[test]
    fn today_resets_month() {
        let s = state().next_month().next_month().go_to_today(date(2024, 1, 31));
        assert_eq!(s.month, MonthRef::new(2024, 0));
        assert_eq!(s.selected_day, date(2024, 1, 31));
    }

    #[test]
    fn detail_open_close() {
        let s = state().open_detail(4);
        assert_eq!(s.detail, Some(4));
        assert_eq!(s.close_detail().detail, None);
    }

    #[test]
    fn titles() {
        let tags = vec![Tag { id: 3, name: "work".into(), color: "#000000".into() }];
        assert_eq!(state().filter_by_tag(3).title(&tags), "#work");
        assert_eq!(state().filter_by_tag(9).title(&tags), "#tag");
        assert_eq!(state().search("milk").title(&tags), "\"milk\" results");
        assert_eq!(state().show_calendar().title(&tags), "January 2024");
    }
}
