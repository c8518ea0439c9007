use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;
use time::{Date, OffsetDateTime, UtcOffset, Weekday};

/// Truncate a timestamp to the calendar day it falls on at the given local
/// offset.  All date-list comparisons happen at this granularity.
pub(crate) fn day_of(datetime: OffsetDateTime, local: UtcOffset) -> Date {
    datetime.to_offset(local).date()
}

/// A set of calendar days.  Insertion order and duplicates are irrelevant.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub(crate) struct DateSet(BTreeSet<Date>);

impl DateSet {
    pub(crate) fn new() -> DateSet {
        DateSet(BTreeSet::new())
    }

    pub(crate) fn contains(&self, date: Date) -> bool {
        self.0.contains(&date)
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub(crate) fn len(&self) -> usize {
        self.0.len()
    }
}

impl FromIterator<Date> for DateSet {
    fn from_iter<I: IntoIterator<Item = Date>>(iter: I) -> DateSet {
        DateSet(iter.into_iter().collect())
    }
}

impl Extend<Date> for DateSet {
    fn extend<I: IntoIterator<Item = Date>>(&mut self, iter: I) {
        self.0.extend(iter);
    }
}

/// A caller-supplied `(date) -> bool` test
#[derive(Clone)]
pub(crate) struct DatePredicate(Arc<dyn Fn(Date) -> bool + Send + Sync>);

impl DatePredicate {
    pub(crate) fn new<F>(func: F) -> DatePredicate
    where
        F: Fn(Date) -> bool + Send + Sync + 'static,
    {
        DatePredicate(Arc::new(func))
    }

    pub(crate) fn weekends() -> DatePredicate {
        DatePredicate::new(|date| matches!(date.weekday(), Weekday::Saturday | Weekday::Sunday))
    }

    pub(crate) fn test(&self, date: Date) -> bool {
        (self.0)(date)
    }
}

impl fmt::Debug for DatePredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("DatePredicate(..)")
    }
}

/// Decides which days of the reference month cannot be selected.  Exactly one
/// variant is active; `Any` is how the built-in list and range rules are
/// combined.
#[derive(Clone, Debug)]
pub(crate) enum DisabledRule {
    ExplicitList(DateSet),
    /// Inclusive bounds; days outside them are disabled
    Range {
        min: Option<Date>,
        max: Option<Date>,
    },
    Predicate(DatePredicate),
    Any(Vec<DisabledRule>),
}

impl DisabledRule {
    /// The list-or-range rule used when no predicate is supplied
    pub(crate) fn builtin(dates: DateSet, min: Option<Date>, max: Option<Date>) -> DisabledRule {
        if min.is_none() && max.is_none() {
            DisabledRule::ExplicitList(dates)
        } else if dates.is_empty() {
            DisabledRule::Range { min, max }
        } else {
            DisabledRule::Any(vec![
                DisabledRule::ExplicitList(dates),
                DisabledRule::Range { min, max },
            ])
        }
    }

    pub(crate) fn is_disabled(&self, date: Date) -> bool {
        match self {
            DisabledRule::ExplicitList(dates) => dates.contains(date),
            DisabledRule::Range { min, max } => {
                min.is_some_and(|min| date < min) || max.is_some_and(|max| date > max)
            }
            DisabledRule::Predicate(pred) => pred.test(date),
            DisabledRule::Any(rules) => rules.iter().any(|r| r.is_disabled(date)),
        }
    }
}

impl Default for DisabledRule {
    fn default() -> DisabledRule {
        DisabledRule::ExplicitList(DateSet::new())
    }
}

#[derive(Clone, Debug)]
pub(crate) enum HolidayRule {
    ExplicitList(DateSet),
    Predicate(DatePredicate),
}

impl HolidayRule {
    pub(crate) fn is_holiday(&self, date: Date) -> bool {
        match self {
            HolidayRule::ExplicitList(dates) => dates.contains(date),
            HolidayRule::Predicate(pred) => pred.test(date),
        }
    }
}

impl Default for HolidayRule {
    fn default() -> HolidayRule {
        HolidayRule::ExplicitList(DateSet::new())
    }
}

/// Disabled and holiday rules for the days of a month.  The two are
/// evaluated independently, so a day may be both.
#[derive(Clone, Debug, Default)]
pub(crate) struct Classifier {
    pub(crate) disabled: DisabledRule,
    pub(crate) holidays: HolidayRule,
}

impl Classifier {
    pub(crate) fn new(disabled: DisabledRule, holidays: HolidayRule) -> Classifier {
        Classifier { disabled, holidays }
    }

    pub(crate) fn is_disabled(&self, date: Date) -> bool {
        self.disabled.is_disabled(date)
    }

    pub(crate) fn is_holiday(&self, date: Date) -> bool {
        self.holidays.is_holiday(date)
    }
}
