use crate::calendar::WeekdayExt;
use std::str::FromStr;
use thiserror::Error;
use time::{Month, Weekday};

/// Language used for month names and weekday headers
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub(crate) enum Language {
    #[default]
    English,
    Spanish,
    French,
}

impl Language {
    pub(crate) fn month_name(self, month: Month) -> &'static str {
        let names = match self {
            Language::English => &ENGLISH_MONTHS,
            Language::Spanish => &SPANISH_MONTHS,
            Language::French => &FRENCH_MONTHS,
        };
        names[usize::from(u8::from(month) - 1)]
    }

    /// Two-character weekday heading
    pub(crate) fn weekday_abbrev(self, weekday: Weekday) -> &'static str {
        let names = match self {
            Language::English => &ENGLISH_WEEKDAYS,
            Language::Spanish => &SPANISH_WEEKDAYS,
            Language::French => &FRENCH_WEEKDAYS,
        };
        names[weekday.index0()]
    }

    pub(crate) fn selected_label(self) -> &'static str {
        match self {
            Language::English => "Selected",
            Language::Spanish => "Seleccionado",
            Language::French => "Sélectionné",
        }
    }

    pub(crate) fn none_label(self) -> &'static str {
        match self {
            Language::English => "none",
            Language::Spanish => "ninguno",
            Language::French => "aucune",
        }
    }
}

impl FromStr for Language {
    type Err = UnknownLanguage;

    fn from_str(s: &str) -> Result<Language, UnknownLanguage> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" | "english" => Ok(Language::English),
            "es" | "spanish" | "español" => Ok(Language::Spanish),
            "fr" | "french" | "français" => Ok(Language::French),
            _ => Err(UnknownLanguage(s.to_owned())),
        }
    }
}

#[derive(Clone, Debug, Eq, Error, PartialEq)]
#[error("unknown language {0:?}; expected one of: en, es, fr")]
pub(crate) struct UnknownLanguage(String);

// Indexed by month number minus one
static ENGLISH_MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

static SPANISH_MONTHS: [&str; 12] = [
    "enero",
    "febrero",
    "marzo",
    "abril",
    "mayo",
    "junio",
    "julio",
    "agosto",
    "septiembre",
    "octubre",
    "noviembre",
    "diciembre",
];

static FRENCH_MONTHS: [&str; 12] = [
    "janvier",
    "février",
    "mars",
    "avril",
    "mai",
    "juin",
    "juillet",
    "août",
    "septembre",
    "octobre",
    "novembre",
    "décembre",
];

// Indexed by days from Sunday
static ENGLISH_WEEKDAYS: [&str; 7] = ["Su", "Mo", "Tu", "We", "Th", "Fr", "Sa"];

static SPANISH_WEEKDAYS: [&str; 7] = ["Do", "Lu", "Ma", "Mi", "Ju", "Vi", "Sá"];

static FRENCH_WEEKDAYS: [&str; 7] = ["Di", "Lu", "Ma", "Me", "Je", "Ve", "Sa"];
