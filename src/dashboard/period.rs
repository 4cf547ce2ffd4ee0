//! Calendar-period helpers for the dashboard's trailing comparison series.

use serde::Deserialize;
use time::{Date, Duration, Month};

/// The calendar period the dashboard compares across.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodKind {
    /// Monday through Sunday weeks.
    Weekly,
    /// Whole calendar months.
    Monthly,
    /// Whole calendar years.
    Yearly,
}

/// The first and last day of a calendar period, inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeriodRange {
    /// The first day of the period.
    pub start: Date,
    /// The last day of the period.
    pub end: Date,
}

impl PeriodKind {
    /// How many trailing periods the comparison series covers, including
    /// the current one.
    pub fn trailing_count(self) -> usize {
        match self {
            PeriodKind::Weekly => 4,
            PeriodKind::Monthly => 6,
            PeriodKind::Yearly => 3,
        }
    }

    /// The bounds of the period containing `anchor_date`.
    pub fn bounds(self, anchor_date: Date) -> PeriodRange {
        match self {
            PeriodKind::Weekly => week_bounds(anchor_date),
            PeriodKind::Monthly => month_bounds(anchor_date.year(), anchor_date.month()),
            PeriodKind::Yearly => year_bounds(anchor_date.year()),
        }
    }

    /// A short human-readable label for a period, e.g. "Jan 5" for a week,
    /// "Jan 2024" for a month, "2024" for a year.
    pub fn label(self, range: PeriodRange) -> String {
        match self {
            PeriodKind::Weekly => {
                format!("{} {}", month_abbrev(range.start.month()), range.start.day())
            }
            PeriodKind::Monthly => {
                format!("{} {}", month_abbrev(range.start.month()), range.start.year())
            }
            PeriodKind::Yearly => range.start.year().to_string(),
        }
    }
}

/// The trailing periods ending with the one containing `today`, oldest
/// first.
pub fn trailing_periods(kind: PeriodKind, today: Date) -> Vec<PeriodRange> {
    let mut periods = Vec::with_capacity(kind.trailing_count());
    let mut current = kind.bounds(today);

    for _ in 0..kind.trailing_count() {
        periods.push(current);
        current = kind.bounds(current.start - Duration::days(1));
    }

    periods.reverse();
    periods
}

fn week_bounds(anchor_date: Date) -> PeriodRange {
    let weekday_number = anchor_date.weekday().number_from_monday() as i64;
    let start = anchor_date - Duration::days(weekday_number - 1);
    let end = start + Duration::days(6);

    PeriodRange { start, end }
}

fn month_bounds(year: i32, month: Month) -> PeriodRange {
    let start = Date::from_calendar_date(year, month, 1).expect("invalid month start date");
    let end = Date::from_calendar_date(year, month, last_day_of_month(year, month))
        .expect("invalid month end date");

    PeriodRange { start, end }
}

fn year_bounds(year: i32) -> PeriodRange {
    PeriodRange {
        start: Date::from_calendar_date(year, Month::January, 1).expect("invalid year start date"),
        end: Date::from_calendar_date(year, Month::December, 31).expect("invalid year end date"),
    }
}

fn last_day_of_month(year: i32, month: Month) -> u8 {
    match month {
        Month::January
        | Month::March
        | Month::May
        | Month::July
        | Month::August
        | Month::October
        | Month::December => 31,
        Month::April | Month::June | Month::September | Month::November => 30,
        Month::February => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
    }
}

fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || (year % 400 == 0)
}

fn month_abbrev(month: Month) -> &'static str {
    match month {
        Month::January => "Jan",
        Month::February => "Feb",
        Month::March => "Mar",
        Month::April => "Apr",
        Month::May => "May",
        Month::June => "Jun",
        Month::July => "Jul",
        Month::August => "Aug",
        Month::September => "Sep",
        Month::October => "Oct",
        Month::November => "Nov",
        Month::December => "Dec",
    }
}

#[cfg(test)]
mod period_tests {
    use time::macros::date;

    use super::{PeriodKind, PeriodRange, trailing_periods};

    #[test]
    fn week_runs_monday_to_sunday() {
        // 2024-01-17 is a Wednesday.
        let range = PeriodKind::Weekly.bounds(date!(2024 - 01 - 17));

        assert_eq!(range.start, date!(2024 - 01 - 15));
        assert_eq!(range.end, date!(2024 - 01 - 21));
    }

    #[test]
    fn monday_anchors_its_own_week() {
        let range = PeriodKind::Weekly.bounds(date!(2024 - 01 - 15));

        assert_eq!(range.start, date!(2024 - 01 - 15));
        assert_eq!(range.end, date!(2024 - 01 - 21));
    }

    #[test]
    fn month_covers_whole_calendar_month() {
        let range = PeriodKind::Monthly.bounds(date!(2024 - 02 - 14));

        assert_eq!(range.start, date!(2024 - 02 - 01));
        assert_eq!(range.end, date!(2024 - 02 - 29));
    }

    #[test]
    fn non_leap_february_ends_on_the_28th() {
        let range = PeriodKind::Monthly.bounds(date!(2023 - 02 - 14));

        assert_eq!(range.end, date!(2023 - 02 - 28));
    }

    #[test]
    fn year_covers_whole_calendar_year() {
        let range = PeriodKind::Yearly.bounds(date!(2024 - 06 - 15));

        assert_eq!(range.start, date!(2024 - 01 - 01));
        assert_eq!(range.end, date!(2024 - 12 - 31));
    }

    #[test]
    fn trailing_weeks_are_contiguous_and_oldest_first() {
        let periods = trailing_periods(PeriodKind::Weekly, date!(2024 - 01 - 17));

        assert_eq!(periods.len(), 4);
        assert_eq!(
            periods[3],
            PeriodRange {
                start: date!(2024 - 01 - 15),
                end: date!(2024 - 01 - 21)
            }
        );
        assert_eq!(periods[0].start, date!(2023 - 12 - 25));
        for window in periods.windows(2) {
            assert_eq!(window[1].start, window[0].end.next_day().unwrap());
        }
    }

    #[test]
    fn trailing_months_cross_year_boundaries() {
        let periods = trailing_periods(PeriodKind::Monthly, date!(2024 - 02 - 14));

        assert_eq!(periods.len(), 6);
        assert_eq!(periods[0].start, date!(2023 - 09 - 01));
        assert_eq!(periods[5].end, date!(2024 - 02 - 29));
    }

    #[test]
    fn trailing_years_count_three() {
        let periods = trailing_periods(PeriodKind::Yearly, date!(2024 - 06 - 15));

        assert_eq!(periods.len(), 3);
        assert_eq!(periods[0].start, date!(2022 - 01 - 01));
        assert_eq!(periods[2].end, date!(2024 - 12 - 31));
    }

    #[test]
    fn labels_match_period_kind() {
        assert_eq!(
            PeriodKind::Weekly.label(PeriodKind::Weekly.bounds(date!(2024 - 01 - 05))),
            "Jan 1"
        );
        assert_eq!(
            PeriodKind::Monthly.label(PeriodKind::Monthly.bounds(date!(2024 - 01 - 05))),
            "Jan 2024"
        );
        assert_eq!(
            PeriodKind::Yearly.label(PeriodKind::Yearly.bounds(date!(2024 - 01 - 05))),
            "2024"
        );
    }
}
