use super::classify::Classifier;
use std::fmt;
use std::iter::successors;
use std::slice::ChunksExact;
use thiserror::Error;
use time::{Date, Month, Weekday};

pub(crate) const DAYS_IN_WEEK: usize = 7;

pub(crate) const GRID_ROWS: usize = 6;

pub(crate) const GRID_CELLS: usize = DAYS_IN_WEEK * GRID_ROWS;

/// Years for which the leading and trailing days of every month are
/// representable
const MIN_YEAR: i32 = -9998;
const MAX_YEAR: i32 = 9998;

pub(crate) trait WeekdayExt {
    fn index0(&self) -> usize;
}

impl WeekdayExt for Weekday {
    fn index0(&self) -> usize {
        usize::from(self.number_days_from_sunday())
    }
}

/// The month shown by a grid, stored as its first day
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub(crate) struct ReferenceMonth(Date);

impl ReferenceMonth {
    pub(crate) fn new(year: i32, month: Month) -> Result<ReferenceMonth, MonthRangeError> {
        if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
            return Err(MonthRangeError {
                year: i64::from(year),
            });
        }
        Date::from_calendar_date(year, month, 1)
            .map(ReferenceMonth)
            .map_err(|_| MonthRangeError {
                year: i64::from(year),
            })
    }

    pub(crate) fn containing(date: Date) -> Result<ReferenceMonth, MonthRangeError> {
        ReferenceMonth::new(date.year(), date.month())
    }

    /// Build a month from a zero-based month offset relative to January of
    /// `year`.  Offsets outside `0..12` carry into the year, so `(2024, 12)`
    /// is January 2025 and `(2024, -1)` is December 2023.
    pub(crate) fn normalized(year: i32, month0: i32) -> Result<ReferenceMonth, MonthRangeError> {
        let full_year = i64::from(year) + i64::from(month0.div_euclid(12));
        let year = i32::try_from(full_year).map_err(|_| MonthRangeError { year: full_year })?;
        let offset = u8::try_from(month0.rem_euclid(12))
            .expect("remainder of division by 12 should fit in a u8");
        ReferenceMonth::new(year, Month::January.nth_next(offset))
    }

    pub(crate) fn year(&self) -> i32 {
        self.0.year()
    }

    pub(crate) fn month(&self) -> Month {
        self.0.month()
    }

    pub(crate) fn first_day(&self) -> Date {
        self.0
    }

    /// Iterate over the days of the month in order
    pub(crate) fn days(&self) -> impl Iterator<Item = Date> {
        let month = self.month();
        successors(Some(self.0), |&d| d.next_day()).take_while(move |d| d.month() == month)
    }

    pub(crate) fn previous(&self) -> Result<ReferenceMonth, OutOfTimeError> {
        self.0
            .previous_day()
            .and_then(|d| ReferenceMonth::containing(d).ok())
            .ok_or(OutOfTimeError)
    }

    pub(crate) fn next(&self) -> Result<ReferenceMonth, OutOfTimeError> {
        self.days()
            .last()
            .and_then(|d| d.next_day())
            .and_then(|d| ReferenceMonth::containing(d).ok())
            .ok_or(OutOfTimeError)
    }

    pub(crate) fn contains(&self, date: Date) -> bool {
        date.year() == self.year() && date.month() == self.month()
    }
}

impl fmt::Display for ReferenceMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year(), u8::from(self.month()))
    }
}

#[derive(Copy, Clone, Debug, Eq, Error, PartialEq)]
#[error("year {year} is outside the supported range of {MIN_YEAR} through {MAX_YEAR}")]
pub(crate) struct MonthRangeError {
    year: i64,
}

#[derive(Copy, Clone, Debug, Eq, Error, PartialEq)]
#[error("reached the end of time")]
pub(crate) struct OutOfTimeError;

/// One day-slot of a month grid
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub(crate) struct DateCell {
    pub(crate) date: Date,
    /// `false` for the leading and trailing days borrowed from the adjacent
    /// months
    pub(crate) is_current_month: bool,
    pub(crate) is_today: bool,
    pub(crate) is_selected: bool,
    pub(crate) is_disabled: bool,
    pub(crate) is_holiday: bool,
}

impl DateCell {
    pub(crate) fn day(&self) -> u8 {
        self.date.day()
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
// Invariant: `cells` has exactly GRID_CELLS elements, the first of which is a
// Sunday
pub(crate) struct MonthGrid {
    month: ReferenceMonth,
    cells: Vec<DateCell>,
}

impl MonthGrid {
    /// Lay out the six weeks that show `month`, starting with the Sunday on or
    /// before its first day.  Days of the month are classified by
    /// `classifier`; days of the adjacent months are always disabled.
    pub(crate) fn generate(
        month: ReferenceMonth,
        selected: Option<Date>,
        classifier: &Classifier,
        today: Date,
    ) -> MonthGrid {
        let factory = CellFactory {
            today,
            selected,
            classifier,
        };
        let first = month.first_day();
        let offset = first.weekday().index0();
        let mut cells = Vec::with_capacity(GRID_CELLS);
        let mut leading = iter_days_before(first).take(offset).collect::<Vec<_>>();
        leading.reverse();
        cells.extend(leading.into_iter().map(|d| factory.padding(d)));
        cells.extend(month.days().map(|d| factory.current(d)));
        let remaining = GRID_CELLS.saturating_sub(cells.len());
        let last = cells.last().map_or(first, |cell| cell.date);
        cells.extend(
            iter_days_after(last)
                .take(remaining)
                .map(|d| factory.padding(d)),
        );
        MonthGrid { month, cells }
    }

    pub(crate) fn month(&self) -> ReferenceMonth {
        self.month
    }

    pub(crate) fn cells(&self) -> &[DateCell] {
        &self.cells
    }

    /// Iterate over the grid's weeks, each running Sunday through Saturday
    pub(crate) fn rows(&self) -> ChunksExact<'_, DateCell> {
        self.cells().chunks_exact(DAYS_IN_WEEK)
    }

    pub(crate) fn find(&self, date: Date) -> Option<&DateCell> {
        self.cells.iter().find(|cell| cell.date == date)
    }
}

#[derive(Clone, Copy, Debug)]
struct CellFactory<'a> {
    today: Date,
    selected: Option<Date>,
    classifier: &'a Classifier,
}

impl CellFactory<'_> {
    fn padding(&self, date: Date) -> DateCell {
        DateCell {
            date,
            is_current_month: false,
            is_today: date == self.today,
            is_selected: self.selected == Some(date),
            is_disabled: true,
            is_holiday: false,
        }
    }

    fn current(&self, date: Date) -> DateCell {
        DateCell {
            date,
            is_current_month: true,
            is_today: date == self.today,
            is_selected: self.selected == Some(date),
            is_disabled: self.classifier.is_disabled(date),
            is_holiday: self.classifier.is_holiday(date),
        }
    }
}

fn iter_days_after(date: Date) -> impl Iterator<Item = Date> {
    successors(Some(date), |&d| d.next_day()).skip(1)
}

fn iter_days_before(date: Date) -> impl Iterator<Item = Date> {
    successors(Some(date), |&d| d.previous_day()).skip(1)
}
