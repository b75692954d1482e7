//! Month grid construction.
//!
//! A grid is a run of whole Sunday-to-Saturday weeks covering one month,
//! padded with days from the neighbouring months. Tasks are bucketed into
//! the cell of their local due day.

use chrono::{Datelike, Days, Local, NaiveDate};

use crate::todo::Todo;

/// How many tasks a month cell shows before collapsing the rest into `+N`.
pub const MAX_TASKS_PER_CELL: usize = 3;

/// A month with a 0-based month index, normalized so `month0` is in `0..12`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct MonthRef {
    pub year: i32,
    pub month0: u32,
}

impl MonthRef {
    /// Build from any year and 0-based month, carrying overflow into the year
    /// (`month = 12` is January of the next year, `-1` December of the previous).
    /// A carry past the `i32` range saturates the year.
    pub fn new(year: i32, month: i32) -> Self {
        let total = i64::from(year) * 12 + i64::from(month);
        let year = i32::try_from(total.div_euclid(12))
            .unwrap_or(if total < 0 { i32::MIN } else { i32::MAX });
        Self {
            year,
            month0: total.rem_euclid(12) as u32,
        }
    }

    pub fn containing(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month0: date.month0(),
        }
    }

    pub fn next(self) -> Self {
        Self::new(self.year, self.month0 as i32 + 1)
    }

    pub fn prev(self) -> Self {
        Self::new(self.year, self.month0 as i32 - 1)
    }

    /// 1-based month number, as chrono expects.
    pub fn month(&self) -> u32 {
        self.month0 + 1
    }

    pub fn first_day(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month(), 1)
    }

    pub fn last_day(&self) -> Option<NaiveDate> {
        if self.month0 == 11 {
            return NaiveDate::from_ymd_opt(self.year, 12, 31);
        }
        NaiveDate::from_ymd_opt(self.year, self.month() + 1, 1).and_then(|d| d.pred_opt())
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month0() == self.month0
    }

    pub fn title(&self) -> String {
        match self.first_day() {
            Some(d) => d.format("%B %Y").to_string(),
            None => format!("{}-{:02}", self.year, self.month()),
        }
    }

    /// A day in this month, clamped to the month's length.
    pub fn clamp_day(&self, day: u32) -> Option<NaiveDate> {
        let last = self.last_day()?;
        NaiveDate::from_ymd_opt(self.year, self.month(), day.clamp(1, last.day()))
    }
}

/// One day of a rendered month.
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarCell<'a> {
    pub date: NaiveDate,
    pub is_in_displayed_month: bool,
    pub is_today: bool,
    /// Tasks due this day, in the order they were supplied.
    pub tasks: Vec<&'a Todo>,
}

impl<'a> CalendarCell<'a> {
    /// Tasks to draw in the cell, capped at [`MAX_TASKS_PER_CELL`].
    pub fn visible_tasks(&self) -> &[&'a Todo] {
        &self.tasks[..self.tasks.len().min(MAX_TASKS_PER_CELL)]
    }

    /// Number of tasks hidden behind the overflow indicator.
    pub fn overflow(&self) -> usize {
        self.tasks.len().saturating_sub(MAX_TASKS_PER_CELL)
    }
}

/// Build the grid for `month` (0-based, carried into `year`), marking today
/// from the system clock.
pub fn build_month_grid(year: i32, month: i32, tasks: &[Todo]) -> Vec<CalendarCell<'_>> {
    build_month_grid_on(year, month, tasks, Local::now().date_naive())
}

/// Build the grid with an injected "today".
///
/// Tasks whose due date is missing or unparseable land in no cell.
pub fn build_month_grid_on(
    year: i32,
    month: i32,
    tasks: &[Todo],
    today: NaiveDate,
) -> Vec<CalendarCell<'_>> {
    let month = MonthRef::new(year, month);
    let (Some(first), Some(last)) = (month.first_day(), month.last_day()) else {
        log::warn!("month {:?} is outside the supported date range", month);
        return Vec::new();
    };

    let lead = u64::from(first.weekday().num_days_from_sunday());
    let trail = 6 - u64::from(last.weekday().num_days_from_sunday());
    let (Some(start), Some(end)) = (
        first.checked_sub_days(Days::new(lead)),
        last.checked_add_days(Days::new(trail)),
    ) else {
        return Vec::new();
    };

    let dated: Vec<(NaiveDate, &Todo)> = tasks
        .iter()
        .filter_map(|t| t.due_day().map(|day| (day, t)))
        .collect();

    start
        .iter_days()
        .take_while(|date| *date <= end)
        .map(|date| CalendarCell {
            date,
            is_in_displayed_month: month.contains(date),
            is_today: date == today,
            tasks: dated
                .iter()
                .filter(|(day, _)| *day == date)
                .map(|(_, t)| *t)
                .collect(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::todo::task::sample;
    use chrono::Weekday;

    fn days_in_month(year: i32, month0: i32) -> u32 {
        MonthRef::new(year, month0).last_day().unwrap().day()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn february_2024_layout() {
        let cells = build_month_grid_on(2024, 1, &[], date(2000, 1, 1));
        assert_eq!(cells.len(), 35);
        assert_eq!(cells.first().unwrap().date, date(2024, 1, 28));
        assert_eq!(cells.last().unwrap().date, date(2024, 3, 2));
        assert_eq!(cells.iter().filter(|c| c.is_in_displayed_month).count(), 29);
        assert!(cells.iter().all(|c| c.tasks.is_empty()));
    }

    #[test]
    fn every_month_is_whole_weeks() {
        let today = date(2024, 6, 15);
        for year in [1900, 1999, 2000, 2015, 2024, 2026, 2100] {
            for month in 0..12 {
                let cells = build_month_grid_on(year, month, &[], today);
                assert!(
                    matches!(cells.len(), 28 | 35 | 42),
                    "{year}-{month}: {} cells",
                    cells.len()
                );
                assert_eq!(cells[0].date.weekday(), Weekday::Sun);
                assert_eq!(cells[cells.len() - 1].date.weekday(), Weekday::Sat);
                let in_month = cells.iter().filter(|c| c.is_in_displayed_month).count() as u32;
                assert_eq!(in_month, days_in_month(year, month));
                assert!(cells.windows(2).all(|w| w[0].date.succ_opt() == Some(w[1].date)));
            }
        }
    }

    #[test]
    fn february_2015_fits_four_weeks() {
        // Starts on a Sunday, 28 days.
        let cells = build_month_grid_on(2015, 1, &[], date(2015, 2, 1));
        assert_eq!(cells.len(), 28);
        assert!(cells.iter().all(|c| c.is_in_displayed_month));
    }

    #[test]
    fn month_carry_matches_adjacent_year() {
        let today = date(2024, 1, 1);
        assert_eq!(
            build_month_grid_on(2023, 12, &[], today),
            build_month_grid_on(2024, 0, &[], today)
        );
        assert_eq!(
            build_month_grid_on(2024, -1, &[], today),
            build_month_grid_on(2023, 11, &[], today)
        );
        assert_eq!(MonthRef::new(2024, -13), MonthRef { year: 2022, month0: 11 });
        assert_eq!(MonthRef::new(2024, 25), MonthRef { year: 2026, month0: 1 });
    }

    #[test]
    fn today_marked_once_when_in_range() {
        let cells = build_month_grid_on(2024, 1, &[], date(2024, 3, 2));
        assert_eq!(cells.iter().filter(|c| c.is_today).count(), 1);
        assert!(cells.last().unwrap().is_today);

        let cells = build_month_grid_on(2024, 1, &[], date(2024, 3, 3));
        assert_eq!(cells.iter().filter(|c| c.is_today).count(), 0);
    }

    #[test]
    fn tasks_bucket_by_calendar_day() {
        let tasks = vec![
            sample(1, "morning", "2024-02-15T09:00:00"),
            sample(2, "late", "2024-02-15T23:59:59"),
            sample(3, "lead day", "2024-01-29T08:00:00"),
            sample(4, "outside", "2024-04-01T08:00:00"),
        ];
        let cells = build_month_grid_on(2024, 1, &tasks, date(2024, 2, 1));

        let feb15: Vec<_> = cells
            .iter()
            .filter(|c| c.tasks.iter().any(|t| t.id == 1))
            .collect();
        assert_eq!(feb15.len(), 1);
        assert_eq!(feb15[0].date, date(2024, 2, 15));
        assert_eq!(feb15[0].tasks.iter().map(|t| t.id).collect::<Vec<_>>(), vec![1, 2]);

        let jan29 = cells.iter().find(|c| c.date == date(2024, 1, 29)).unwrap();
        assert!(!jan29.is_in_displayed_month);
        assert_eq!(jan29.tasks[0].id, 3);

        let placed: usize = cells.iter().map(|c| c.tasks.len()).sum();
        assert_eq!(placed, 3);
    }

    #[test]
    fn source_order_is_kept() {
        let tasks = vec![
            sample(1, "b", "2024-02-10T18:00:00"),
            sample(2, "a", "2024-02-10T07:00:00"),
        ];
        let cells = build_month_grid_on(2024, 1, &tasks, date(2024, 2, 1));
        let cell = cells.iter().find(|c| c.date == date(2024, 2, 10)).unwrap();
        assert_eq!(cell.tasks.iter().map(|t| t.id).collect::<Vec<_>>(), vec![1, 2]);
    }

    #[test]
    fn unparseable_due_dates_are_skipped() {
        let mut dateless = sample(2, "no date", "");
        dateless.due_date = None;
        let tasks = vec![
            sample(1, "broken", "15/02/2024"),
            dateless,
            sample(3, "ok", "2024-02-01T00:00:00"),
        ];
        let cells = build_month_grid_on(2024, 1, &tasks, date(2024, 2, 1));
        let placed: Vec<i64> = cells.iter().flat_map(|c| c.tasks.iter().map(|t| t.id)).collect();
        assert_eq!(placed, vec![3]);
    }

    #[test]
    fn overflow_beyond_three() {
        let tasks: Vec<Todo> = (1..=5)
            .map(|i| sample(i, "t", "2024-02-20T10:00:00"))
            .collect();
        let cells = build_month_grid_on(2024, 1, &tasks, date(2024, 2, 1));
        let cell = cells.iter().find(|c| c.date == date(2024, 2, 20)).unwrap();
        assert_eq!(cell.visible_tasks().len(), MAX_TASKS_PER_CELL);
        assert_eq!(cell.overflow(), 2);

        let empty = cells.iter().find(|c| c.date == date(2024, 2, 21)).unwrap();
        assert!(empty.visible_tasks().is_empty());
        assert_eq!(empty.overflow(), 0);
    }

    #[test]
    fn month_ref_navigation() {
        let dec = MonthRef::new(2023, 11);
        assert_eq!(dec.next(), MonthRef { year: 2024, month0: 0 });
        assert_eq!(dec.next().prev(), dec);
        assert_eq!(dec.title(), "December 2023");
        assert_eq!(MonthRef::new(2024, 1).clamp_day(31), Some(date(2024, 2, 29)));
        assert_eq!(MonthRef::containing(date(2024, 7, 4)), MonthRef::new(2024, 6));
    }

    #[test]
    fn last_day_handles_leap_years() {
        assert_eq!(days_in_month(2024, 1), 29);
        assert_eq!(days_in_month(2023, 1), 28);
        assert_eq!(days_in_month(1900, 1), 28);
        assert_eq!(days_in_month(2000, 1), 29);
        assert_eq!(days_in_month(2024, 11), 31);
    }

    #[test]
    fn month_carry_saturates_instead_of_wrapping() {
        let m = MonthRef::new(i32::MAX, 12);
        assert_eq!(m.year, i32::MAX);
        assert_eq!(MonthRef::new(i32::MIN, -1).year, i32::MIN);
        assert!(m.first_day().is_none());
        assert!(build_month_grid_on(i32::MAX, 12, &[], date(2024, 1, 1)).is_empty());
    }

    #[test]
    fn last_representable_month_has_a_last_day() {
        let m = MonthRef::containing(NaiveDate::MAX);
        assert_eq!(m.last_day(), Some(NaiveDate::MAX));
        assert_eq!(m.clamp_day(40), Some(NaiveDate::MAX));
        assert!(m.contains(NaiveDate::MAX));
    }
}
