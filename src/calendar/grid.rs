use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::Deserialize;

/// First column of the week grid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeekStart {
    #[default]
    Sunday,
    Monday,
}

impl WeekStart {
    /// Zero-based column of `weekday` under this week start.
    pub fn column_of(self, weekday: Weekday) -> u32 {
        match self {
            WeekStart::Sunday => weekday.num_days_from_sunday(),
            WeekStart::Monday => weekday.num_days_from_monday(),
        }
    }

    pub fn day_labels(self) -> [&'static str; 7] {
        match self {
            WeekStart::Sunday => ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"],
            WeekStart::Monday => ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"],
        }
    }

    pub fn is_weekend_column(self, column: u32) -> bool {
        match self {
            WeekStart::Sunday => column == 0 || column == 6,
            WeekStart::Monday => column == 5 || column == 6,
        }
    }
}

/// Row and column of a day cell. Row 0 is the first week row, below the
/// weekday labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellPosition {
    pub row: u32,
    pub column: u32,
}

/// Layout of one month in a 7-column grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthLayout {
    pub year: i32,
    pub month: u32,
    pub first_weekday_offset: u32,
    pub day_count: u32,
    pub week_start: WeekStart,
}

impl MonthLayout {
    /// Returns `None` only when the first of the month is not a representable
    /// date.
    pub fn compute(year: i32, month: u32, week_start: WeekStart) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(|first| Self::for_date(first, week_start))
    }

    /// Layout of the month containing `date`. Only year and month are used.
    pub fn for_date(date: NaiveDate, week_start: WeekStart) -> Self {
        let first = first_of_month(date);
        Self {
            year: first.year(),
            month: first.month(),
            first_weekday_offset: week_start.column_of(first.weekday()),
            day_count: days_in_month(first.year(), first.month()),
            week_start,
        }
    }

    pub fn placement(&self, day: u32) -> Option<CellPosition> {
        if day == 0 || day > self.day_count {
            return None;
        }
        let slot = day - 1 + self.first_weekday_offset;
        Some(CellPosition {
            row: slot / 7,
            column: slot % 7,
        })
    }

    pub fn row_count(&self) -> u32 {
        (self.first_weekday_offset + self.day_count).div_ceil(7)
    }

    /// Week rows of day numbers; `None` marks cells outside the month.
    pub fn weeks(&self) -> Vec<[Option<u32>; 7]> {
        let mut weeks = vec![[None; 7]; self.row_count() as usize];
        for day in 1..=self.day_count {
            if let Some(pos) = self.placement(day) {
                weeks[pos.row as usize][pos.column as usize] = Some(day);
            }
        }
        weeks
    }

    pub fn date(&self, day: u32) -> Option<NaiveDate> {
        if day == 0 || day > self.day_count {
            return None;
        }
        NaiveDate::from_ymd_opt(self.year, self.month, day)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }
}

pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

pub fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => 0,
    }
}

/// Moves `(year, month)` by `delta` months, carrying into the year.
///
/// `None` when the resulting year does not fit in an `i32`.
pub fn normalize(year: i32, month: u32, delta: i32) -> Option<(i32, u32)> {
    let index = i64::from(year) * 12 + i64::from(month) - 1 + i64::from(delta);
    let year = i32::try_from(index.div_euclid(12)).ok()?;
    Some((year, index.rem_euclid(12) as u32 + 1))
}

pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.day0()))
}

/// Day 1 of the month `delta` months away from the month containing `date`.
pub fn shift_month(date: NaiveDate, delta: i32) -> Option<NaiveDate> {
    let (year, month) = normalize(date.year(), date.month(), delta)?;
    NaiveDate::from_ymd_opt(year, month, 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn day_counts_follow_gregorian_calendar() {
        assert_eq!(days_in_month(2024, 2), 29);
        assert_eq!(days_in_month(2023, 2), 28);
        assert_eq!(days_in_month(2023, 4), 30);
        assert_eq!(days_in_month(2023, 1), 31);
        assert_eq!(days_in_month(1900, 2), 28);
        assert_eq!(days_in_month(2000, 2), 29);
    }

    #[test]
    fn day_count_matches_distance_to_next_month() {
        for year in [1899, 1900, 1999, 2000, 2023, 2024, 2100] {
            for month in 1..=12 {
                let layout = MonthLayout::compute(year, month, WeekStart::Sunday).unwrap();
                let next = shift_month(ymd(year, month, 1), 1).unwrap();
                let span = next.signed_duration_since(ymd(year, month, 1)).num_days();
                assert_eq!(layout.day_count as i64, span, "{year}-{month}");
            }
        }
    }

    #[test]
    fn offset_counts_from_sunday_by_default() {
        // 2024-02-01 is a Thursday.
        let feb = MonthLayout::compute(2024, 2, WeekStart::default()).unwrap();
        assert_eq!(feb.first_weekday_offset, 4);
        assert_eq!(feb.day_count, 29);

        // 2023-01-01 is a Sunday, 2023-04-01 a Saturday.
        assert_eq!(
            MonthLayout::compute(2023, 1, WeekStart::Sunday).unwrap().first_weekday_offset,
            0
        );
        assert_eq!(
            MonthLayout::compute(2023, 4, WeekStart::Sunday).unwrap().first_weekday_offset,
            6
        );
    }

    #[test]
    fn monday_start_shifts_columns() {
        let feb = MonthLayout::compute(2024, 2, WeekStart::Monday).unwrap();
        assert_eq!(feb.first_weekday_offset, 3);
        let jan = MonthLayout::compute(2023, 1, WeekStart::Monday).unwrap();
        assert_eq!(jan.first_weekday_offset, 6);
        assert!(WeekStart::Monday.is_weekend_column(6));
        assert!(WeekStart::Sunday.is_weekend_column(0));
        assert!(!WeekStart::Monday.is_weekend_column(0));
    }

    #[test]
    fn for_date_ignores_day_of_month() {
        assert_eq!(
            MonthLayout::for_date(ymd(2024, 2, 29), WeekStart::Sunday),
            MonthLayout::compute(2024, 2, WeekStart::Sunday).unwrap()
        );
    }

    #[test]
    fn placement_wraps_after_saturday() {
        let april = MonthLayout::compute(2023, 4, WeekStart::Sunday).unwrap();
        assert_eq!(april.placement(1), Some(CellPosition { row: 0, column: 6 }));
        assert_eq!(april.placement(2), Some(CellPosition { row: 1, column: 0 }));
        assert_eq!(april.placement(30), Some(CellPosition { row: 5, column: 0 }));
        assert_eq!(april.placement(0), None);
        assert_eq!(april.placement(31), None);
        assert_eq!(april.row_count(), 6);
    }

    #[test]
    fn placement_is_weekly_periodic() {
        for month in 1..=12 {
            let layout = MonthLayout::compute(2024, month, WeekStart::Sunday).unwrap();
            for day in 1..=layout.day_count.saturating_sub(7) {
                let a = layout.placement(day).unwrap();
                let b = layout.placement(day + 7).unwrap();
                assert_eq!(a.column, b.column);
                assert_eq!(a.row + 1, b.row);
            }
        }
    }

    #[test]
    fn placement_column_matches_weekday() {
        let layout = MonthLayout::compute(2024, 9, WeekStart::Sunday).unwrap();
        for day in 1..=layout.day_count {
            let date = layout.date(day).unwrap();
            let pos = layout.placement(day).unwrap();
            assert_eq!(pos.column, date.weekday().num_days_from_sunday());
        }
    }

    #[test]
    fn weeks_hold_every_day_once() {
        let layout = MonthLayout::compute(2024, 2, WeekStart::Sunday).unwrap();
        let weeks = layout.weeks();
        assert_eq!(weeks.len(), 5);
        assert_eq!(weeks[0], [None, None, None, None, Some(1), Some(2), Some(3)]);
        let days: Vec<u32> = weeks.iter().flatten().flatten().copied().collect();
        assert_eq!(days, (1..=29).collect::<Vec<_>>());
    }

    #[test]
    fn normalize_crosses_year_boundaries() {
        assert_eq!(normalize(2023, 12, 1), Some((2024, 1)));
        assert_eq!(normalize(2024, 1, -1), Some((2023, 12)));
        assert_eq!(normalize(2024, 5, -13), Some((2023, 4)));
        assert_eq!(normalize(2024, 5, 0), Some((2024, 5)));
        assert_eq!(normalize(2024, 11, 26), Some((2027, 1)));
    }

    #[test]
    fn normalize_handles_extreme_years() {
        assert_eq!(normalize(200_000_000, 6, 1), Some((200_000_000, 7)));
        assert_eq!(normalize(-200_000_000, 1, -1), Some((-200_000_001, 12)));
        assert_eq!(normalize(i32::MAX, 12, 0), Some((i32::MAX, 12)));
        assert_eq!(normalize(i32::MAX, 12, 1), None);
        assert_eq!(normalize(i32::MIN, 1, -1), None);
        assert_eq!(normalize(i32::MIN, 1, i32::MIN), None);
    }

    #[test]
    fn shift_month_lands_on_first_day() {
        assert_eq!(shift_month(ymd(2024, 1, 31), 1), Some(ymd(2024, 2, 1)));
        assert_eq!(shift_month(ymd(2024, 3, 31), -1), Some(ymd(2024, 2, 1)));
        assert_eq!(shift_month(ymd(2023, 12, 15), 1), Some(ymd(2024, 1, 1)));
    }

    #[test]
    fn next_then_previous_returns_to_same_month() {
        let mut date = ymd(2022, 1, 17);
        for _ in 0..36 {
            let next = shift_month(date, 1).unwrap();
            let back = shift_month(next, -1).unwrap();
            assert_eq!(back, first_of_month(date));
            assert_eq!(back.day(), 1);
            date = next;
        }
    }
}
