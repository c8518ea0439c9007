use crate::calendar::classify::{
    day_of, Classifier, DatePredicate, DateSet, DisabledRule, HolidayRule,
};
use crate::calendar::clock::Clock;
use crate::calendar::{DatePicker, MonthRangeError};
use crate::labels::{Language, UnknownLanguage};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use time::{
    format_description::{well_known::Rfc3339, FormatItem},
    macros::format_description,
    Date, OffsetDateTime, PrimitiveDateTime, UtcOffset,
};

static YMD_FMT: &[FormatItem<'_>] = format_description!("[year]-[month]-[day]");

static YMD_HM_FMT: &[FormatItem<'_>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]");

static YMD_HMS_FMT: &[FormatItem<'_>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]");

/// Picker options as written in a config file or on the command line, before
/// any date has been parsed
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct RawOptions {
    pub(crate) language: Option<String>,
    pub(crate) default_date: Option<String>,
    /// Presence of a value makes the picker controlled
    pub(crate) value: Option<String>,
    pub(crate) disabled_dates: Vec<String>,
    pub(crate) holidays: Vec<String>,
    pub(crate) min_date: Option<String>,
    pub(crate) max_date: Option<String>,
    pub(crate) disable_weekends: bool,
    pub(crate) weekend_holidays: bool,
}

impl RawOptions {
    pub(crate) fn load(path: &Path) -> Result<RawOptions, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_owned(),
            source,
        })?;
        let options = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_owned(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "Loaded config file");
        Ok(options)
    }

    /// Layer `other` on top of `self`.  Scalars set in `other` win, date lists
    /// are concatenated, and flags are enabled if either side enables them.
    pub(crate) fn overridden_by(self, other: RawOptions) -> RawOptions {
        let mut disabled_dates = self.disabled_dates;
        disabled_dates.extend(other.disabled_dates);
        let mut holidays = self.holidays;
        holidays.extend(other.holidays);
        RawOptions {
            language: other.language.or(self.language),
            default_date: other.default_date.or(self.default_date),
            value: other.value.or(self.value),
            disabled_dates,
            holidays,
            min_date: other.min_date.or(self.min_date),
            max_date: other.max_date.or(self.max_date),
            disable_weekends: self.disable_weekends || other.disable_weekends,
            weekend_holidays: self.weekend_holidays || other.weekend_holidays,
        }
    }

    /// Parse every date and build the picker's rules.  `local` is used to
    /// bring timestamps with an explicit offset onto the local calendar.
    pub(crate) fn resolve(self, local: UtcOffset) -> Result<Settings, ConfigError> {
        let parse = |s: String| parse_day(&s, local);
        let language = self
            .language
            .as_deref()
            .map(str::parse::<Language>)
            .transpose()?
            .unwrap_or_default();
        let default_date = self.default_date.map(parse).transpose()?;
        let value = self.value.map(parse).transpose()?;
        let min_date = self.min_date.map(parse).transpose()?;
        let max_date = self.max_date.map(parse).transpose()?;
        if let (Some(min), Some(max)) = (min_date, max_date) {
            if min > max {
                return Err(ConfigError::EmptyRange { min, max });
            }
        }
        let disabled_dates = self
            .disabled_dates
            .into_iter()
            .map(parse)
            .collect::<Result<DateSet, _>>()?;
        let holiday_dates = self
            .holidays
            .into_iter()
            .map(parse)
            .collect::<Result<DateSet, _>>()?;
        let disabled = if self.disable_weekends {
            if !disabled_dates.is_empty() || min_date.is_some() || max_date.is_some() {
                tracing::warn!(
                    disabled_dates = disabled_dates.len(),
                    "Weekend rule replaces disabled dates and min/max bounds"
                );
            }
            DisabledRule::Predicate(DatePredicate::weekends())
        } else {
            DisabledRule::builtin(disabled_dates, min_date, max_date)
        };
        let holidays = if self.weekend_holidays {
            if !holiday_dates.is_empty() {
                tracing::warn!(
                    holidays = holiday_dates.len(),
                    "Weekend rule replaces listed holidays"
                );
            }
            HolidayRule::Predicate(DatePredicate::weekends())
        } else {
            HolidayRule::ExplicitList(holiday_dates)
        };
        Ok(Settings {
            language,
            default_date,
            value,
            classifier: Classifier::new(disabled, holidays),
        })
    }
}

/// Fully-parsed picker configuration
#[derive(Clone, Debug)]
pub(crate) struct Settings {
    pub(crate) language: Language,
    pub(crate) default_date: Option<Date>,
    pub(crate) value: Option<Date>,
    pub(crate) classifier: Classifier,
}

impl Settings {
    /// Build a controlled picker if a value was configured, otherwise an
    /// uncontrolled one starting at the default date
    pub(crate) fn into_picker<C: Clock>(self, clock: C) -> Result<DatePicker<C>, MonthRangeError> {
        let picker = match self.value {
            Some(value) => DatePicker::controlled(clock, Some(value))?,
            None => DatePicker::uncontrolled(clock, self.default_date)?,
        };
        Ok(picker.classifier(self.classifier))
    }
}

/// Parse `YYYY-MM-DD`, a local `YYYY-MM-DDTHH:MM[:SS]` timestamp, or an RFC
/// 3339 timestamp, keeping only the calendar day
pub(crate) fn parse_day(s: &str, local: UtcOffset) -> Result<Date, ConfigError> {
    let s = s.trim();
    if let Ok(date) = Date::parse(s, &YMD_FMT) {
        return Ok(date);
    }
    for fmt in [YMD_HM_FMT, YMD_HMS_FMT] {
        if let Ok(dt) = PrimitiveDateTime::parse(s, &fmt) {
            return Ok(dt.date());
        }
    }
    match OffsetDateTime::parse(s, &Rfc3339) {
        Ok(dt) => Ok(day_of(dt, local)),
        Err(_) => Err(ConfigError::InvalidDate {
            value: s.to_owned(),
        }),
    }
}

#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    #[error("invalid date {value:?}; expected YYYY-MM-DD")]
    InvalidDate { value: String },
    #[error(transparent)]
    Language(#[from] UnknownLanguage),
    #[error("min_date {min} is after max_date {max}")]
    EmptyRange { min: Date, max: Date },
    #[error("failed to read config file {}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config file {}", .path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::clock::FixedClock;
    use crate::calendar::Ownership;
    use time::macros::{date, offset};

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|&s| s.to_owned()).collect()
    }

    #[test]
    fn test_parse_day() {
        let utc = offset!(UTC);
        assert_eq!(parse_day("2024-04-10", utc).unwrap(), date!(2024 - 04 - 10));
        assert_eq!(parse_day(" 2024-04-10 ", utc).unwrap(), date!(2024 - 04 - 10));
        assert_eq!(
            parse_day("2024-04-10T23:45", utc).unwrap(),
            date!(2024 - 04 - 10)
        );
        assert_eq!(
            parse_day("2024-04-10T23:45:10", utc).unwrap(),
            date!(2024 - 04 - 10)
        );
        assert_eq!(
            parse_day("2024-04-10T23:45:00Z", offset!(+3)).unwrap(),
            date!(2024 - 04 - 11)
        );
        assert!(matches!(
            parse_day("April 10", utc),
            Err(ConfigError::InvalidDate { .. })
        ));
        assert!(parse_day("2024-02-30", utc).is_err());
    }

    #[test]
    fn test_parse_toml() {
        let options = toml::from_str::<RawOptions>(
            r#"
language = "es"
default_date = "2024-04-01"
disabled_dates = ["2024-04-10", "2024-04-11T09:00"]
holidays = ["2024-04-25"]
min_date = "2024-04-02"
"#,
        )
        .unwrap();
        assert_eq!(
            options,
            RawOptions {
                language: Some("es".into()),
                default_date: Some("2024-04-01".into()),
                disabled_dates: strings(&["2024-04-10", "2024-04-11T09:00"]),
                holidays: strings(&["2024-04-25"]),
                min_date: Some("2024-04-02".into()),
                ..RawOptions::default()
            }
        );
    }

    #[test]
    fn test_unknown_key() {
        assert!(toml::from_str::<RawOptions>("colour = \"red\"").is_err());
    }

    #[test]
    fn test_overridden_by() {
        let file = RawOptions {
            language: Some("fr".into()),
            min_date: Some("2024-01-01".into()),
            disabled_dates: strings(&["2024-04-10"]),
            ..RawOptions::default()
        };
        let cli = RawOptions {
            language: Some("en".into()),
            disabled_dates: strings(&["2024-04-11"]),
            disable_weekends: true,
            ..RawOptions::default()
        };
        let merged = file.overridden_by(cli);
        assert_eq!(merged.language.as_deref(), Some("en"));
        assert_eq!(merged.min_date.as_deref(), Some("2024-01-01"));
        assert_eq!(merged.disabled_dates, strings(&["2024-04-10", "2024-04-11"]));
        assert!(merged.disable_weekends);
    }

    #[test]
    fn test_resolve_builtin_rules() {
        let settings = RawOptions {
            disabled_dates: strings(&["2024-04-10"]),
            holidays: strings(&["2024-04-10", "2024-04-25"]),
            min_date: Some("2024-04-02".into()),
            max_date: Some("2024-04-20".into()),
            ..RawOptions::default()
        }
        .resolve(offset!(UTC))
        .unwrap();
        assert_eq!(settings.language, Language::English);
        let classifier = &settings.classifier;
        assert!(classifier.is_disabled(date!(2024 - 04 - 01)));
        assert!(!classifier.is_disabled(date!(2024 - 04 - 02)));
        assert!(classifier.is_disabled(date!(2024 - 04 - 10)));
        assert!(!classifier.is_disabled(date!(2024 - 04 - 20)));
        assert!(classifier.is_disabled(date!(2024 - 04 - 21)));
        assert!(classifier.is_holiday(date!(2024 - 04 - 10)));
        assert!(classifier.is_holiday(date!(2024 - 04 - 25)));
    }

    #[test]
    fn test_resolve_predicate_wins() {
        let settings = RawOptions {
            disabled_dates: strings(&["2024-04-10"]),
            max_date: Some("2024-04-05".into()),
            holidays: strings(&["2024-04-10"]),
            disable_weekends: true,
            weekend_holidays: true,
            ..RawOptions::default()
        }
        .resolve(offset!(UTC))
        .unwrap();
        let classifier = &settings.classifier;
        assert!(matches!(classifier.disabled, DisabledRule::Predicate(_)));
        assert!(!classifier.is_disabled(date!(2024 - 04 - 10)));
        assert!(!classifier.is_disabled(date!(2024 - 04 - 30)));
        assert!(classifier.is_disabled(date!(2024 - 04 - 13)));
        assert!(!classifier.is_holiday(date!(2024 - 04 - 10)));
        assert!(classifier.is_holiday(date!(2024 - 04 - 14)));
    }

    #[test]
    fn test_resolve_errors() {
        let err = RawOptions {
            min_date: Some("2024-05-01".into()),
            max_date: Some("2024-04-01".into()),
            ..RawOptions::default()
        }
        .resolve(offset!(UTC))
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "min_date 2024-05-01 is after max_date 2024-04-01"
        );
        let err = RawOptions {
            language: Some("klingon".into()),
            ..RawOptions::default()
        }
        .resolve(offset!(UTC))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Language(_)));
        let err = RawOptions {
            holidays: strings(&["someday"]),
            ..RawOptions::default()
        }
        .resolve(offset!(UTC))
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            r#"invalid date "someday"; expected YYYY-MM-DD"#
        );
    }

    #[test]
    fn test_into_picker() {
        let clock = FixedClock(date!(2024 - 04 - 22));
        let controlled = RawOptions {
            value: Some("2024-06-03".into()),
            ..RawOptions::default()
        }
        .resolve(offset!(UTC))
        .unwrap()
        .into_picker(clock)
        .unwrap();
        assert_eq!(controlled.ownership(), Ownership::External);
        assert_eq!(controlled.selected(), Some(date!(2024 - 06 - 03)));
        let uncontrolled = RawOptions {
            default_date: Some("2024-06-03".into()),
            ..RawOptions::default()
        }
        .resolve(offset!(UTC))
        .unwrap()
        .into_picker(clock)
        .unwrap();
        assert_eq!(uncontrolled.ownership(), Ownership::Internal);
        assert_eq!(uncontrolled.selected(), Some(date!(2024 - 06 - 03)));
    }

    #[test]
    fn test_load_missing_file() {
        let err = RawOptions::load(Path::new("/nonexistent/monthgrid.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
