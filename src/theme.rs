use crate::calendar::DateCell;
use ratatui::style::{Color, Modifier, Style};

pub(crate) const BASE_STYLE: Style = Style::new().fg(Color::White).bg(Color::Black);

pub(crate) const TITLE_STYLE: Style = BASE_STYLE.add_modifier(Modifier::BOLD);

pub(crate) const WEEKDAY_STYLE: Style = BASE_STYLE.add_modifier(Modifier::BOLD);

pub(crate) const CHEVRON_STYLE: Style = BASE_STYLE.fg(Color::LightCyan);

pub(crate) const STATUS_STYLE: Style = BASE_STYLE.fg(Color::Gray);

/// Days borrowed from the adjacent months
pub(crate) const PADDING_STYLE: Style = BASE_STYLE.fg(Color::DarkGray);

pub(crate) const DISABLED_STYLE: Style = BASE_STYLE
    .fg(Color::DarkGray)
    .add_modifier(Modifier::CROSSED_OUT);

pub(crate) const HOLIDAY_STYLE: Style = BASE_STYLE.fg(Color::LightRed);

pub(crate) const TODAY_STYLE: Style = BASE_STYLE
    .fg(Color::LightYellow)
    .add_modifier(Modifier::BOLD);

pub(crate) const SELECTED_STYLE: Style = Style::new()
    .fg(Color::Black)
    .bg(Color::LightCyan)
    .add_modifier(Modifier::BOLD);

pub(crate) const HOVER_MODIFIER: Modifier = Modifier::UNDERLINED;

/// Style for a day of the grid.  Selection wins over "today", which wins over
/// holidays; disabled days keep their holiday color but are struck through.
pub(crate) fn cell_style(cell: &DateCell, hovered: bool) -> Style {
    let mut style = if !cell.is_current_month {
        PADDING_STYLE
    } else if cell.is_holiday {
        HOLIDAY_STYLE
    } else {
        BASE_STYLE
    };
    if cell.is_current_month && cell.is_disabled {
        style = style.add_modifier(Modifier::CROSSED_OUT);
        if !cell.is_holiday {
            style = style.patch(DISABLED_STYLE);
        }
    }
    if cell.is_today {
        style = style.patch(TODAY_STYLE);
    }
    if cell.is_selected {
        style = style.patch(SELECTED_STYLE);
    }
    if hovered {
        style = style.add_modifier(HOVER_MODIFIER);
    }
    style
}

pub(crate) mod jumpto {
    use super::*;

    pub(crate) const UNFILLED_CELL_STYLE: Style = BASE_STYLE.fg(Color::DarkGray);

    pub(crate) const READY_ENTER_STYLE: Style = BASE_STYLE.add_modifier(Modifier::UNDERLINED);
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    fn cell() -> DateCell {
        DateCell {
            date: date!(2024 - 04 - 10),
            is_current_month: true,
            is_today: false,
            is_selected: false,
            is_disabled: false,
            is_holiday: false,
        }
    }

    #[test]
    fn test_plain_day() {
        assert_eq!(cell_style(&cell(), false), BASE_STYLE);
    }

    #[test]
    fn test_padding_day() {
        let padding = DateCell {
            is_current_month: false,
            is_disabled: true,
            ..cell()
        };
        assert_eq!(cell_style(&padding, false), PADDING_STYLE);
    }

    #[test]
    fn test_disabled_holiday_keeps_color() {
        let day = DateCell {
            is_disabled: true,
            is_holiday: true,
            ..cell()
        };
        let style = cell_style(&day, false);
        assert_eq!(style.fg, Some(Color::LightRed));
        assert!(style.add_modifier.contains(Modifier::CROSSED_OUT));
    }

    #[test]
    fn test_selected_over_today() {
        let day = DateCell {
            is_today: true,
            is_selected: true,
            ..cell()
        };
        let style = cell_style(&day, true);
        assert_eq!(style.fg, Some(Color::Black));
        assert_eq!(style.bg, Some(Color::LightCyan));
        assert!(style.add_modifier.contains(Modifier::UNDERLINED));
    }
}
