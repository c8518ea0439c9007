use super::clock::Clock;
use super::grid::{DateCell, WeekdayExt, DAYS_IN_WEEK, GRID_ROWS};
use super::picker::DatePicker;
use crate::labels::Language;
use crate::theme::{cell_style, CHEVRON_STYLE, TITLE_STYLE, WEEKDAY_STYLE};
use ratatui::{layout::Flex, prelude::*, widgets::*};
use std::marker::PhantomData;
use time::Weekday;

/// Number of columns per day of week
const DAY_WIDTH: u16 = 4;

/// Width of the calendar in columns
pub(crate) const MAIN_WIDTH: u16 = DAY_WIDTH * 7;

/// Number of lines taken up by the title, the weekday header, and its rule
const HEADER_LINES: u16 = 3;

/// Height of the calendar in lines
pub(crate) const MAIN_HEIGHT: u16 = HEADER_LINES + 6;

const ACS_HLINE: char = '─';
const PREV_CHEVRON: char = '<';
const NEXT_CHEVRON: char = '>';

static WEEKDAYS: [Weekday; DAYS_IN_WEEK] = [
    Weekday::Sunday,
    Weekday::Monday,
    Weekday::Tuesday,
    Weekday::Wednesday,
    Weekday::Thursday,
    Weekday::Friday,
    Weekday::Saturday,
];

/// Renders the month grid of a [`DatePicker`]:
///
/// ```text
/// <        April 2024        >
///  Su  Mo  Tu  We  Th  Fr  Sa
/// ────────────────────────────
///  31   1   2   3   4   5   6
///   7   8   9  10  11  12  13
/// ```
///
/// Today is bracketed; everything else is conveyed by style.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) struct Calendar<C> {
    language: Language,
    _data: PhantomData<C>,
}

impl<C> Calendar<C> {
    pub(crate) fn new(language: Language) -> Calendar<C> {
        Calendar {
            language,
            _data: PhantomData,
        }
    }
}

impl<C: Clock> StatefulWidget for Calendar<C> {
    type State = DatePicker<C>;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        let [area] = Layout::horizontal([MAIN_WIDTH])
            .flex(Flex::Center)
            .areas(area);
        let [area] = Layout::vertical([MAIN_HEIGHT])
            .flex(Flex::Center)
            .areas(area);
        let grid = state.grid();
        let hovered = state.hovered();
        let mut canvas = BufferCanvas::new(area, buf);
        let month = grid.month();
        canvas.draw_title(format!(
            "{} {}",
            self.language.month_name(month.month()),
            month.year()
        ));
        canvas.draw_header(self.language);
        debug_assert_eq!(grid.rows().len(), GRID_ROWS);
        for (i, week) in std::iter::zip(0u16.., grid.rows()) {
            for cell in week {
                canvas.draw_day(i, cell, cell.date == hovered);
            }
        }
    }
}

#[derive(Debug, Eq, PartialEq)]
struct BufferCanvas<'a> {
    area: Rect,
    buf: &'a mut Buffer,
}

impl<'a> BufferCanvas<'a> {
    fn new(area: Rect, buf: &'a mut Buffer) -> Self {
        Self { area, buf }
    }

    fn draw_title(&mut self, title: String) {
        if self.area.height > 0 {
            Line::styled(title, TITLE_STYLE).centered().render(
                Rect {
                    height: 1,
                    ..self.area
                },
                self.buf,
            );
        }
        self.mvaddch(0, 0, PREV_CHEVRON, CHEVRON_STYLE);
        self.mvaddch(0, MAIN_WIDTH - 1, NEXT_CHEVRON, CHEVRON_STYLE);
    }

    fn draw_header(&mut self, language: Language) {
        for wd in WEEKDAYS {
            self.mvprint(
                1,
                x_for(wd) + 1,
                language.weekday_abbrev(wd),
                Some(WEEKDAY_STYLE),
            );
        }
        self.hline(2, 0, ACS_HLINE, MAIN_WIDTH);
    }

    fn draw_day(&mut self, week_no: u16, cell: &DateCell, hovered: bool) {
        let s = if cell.is_today {
            format!("[{:2}]", cell.day())
        } else {
            format!(" {:2} ", cell.day())
        };
        self.mvprint(
            week_no + HEADER_LINES,
            x_for(cell.date.weekday()),
            s,
            Some(cell_style(cell, hovered)),
        );
    }

    fn mvaddch(&mut self, y: u16, x: u16, ch: char, style: Style) {
        if y < self.area.height && x < self.area.width {
            if let Some(cell) = self.buf.cell_mut((x + self.area.x, y + self.area.y)) {
                cell.set_char(ch).set_style(style);
            }
        }
    }

    fn mvprint<S: AsRef<str>>(&mut self, y: u16, x: u16, s: S, style: Option<Style>) {
        if y < self.area.height && x < self.area.width {
            let text = Text::styled(s.as_ref(), style.unwrap_or_default());
            let width = u16::try_from(text.width()).unwrap_or(u16::MAX);
            // Using a Paragraph lets us truncate text that extends beyond the
            // calendar's area, though we need to be sure that the Rect passed
            // to the Paragraph is entirely within the frame lest a panic
            // result.
            Paragraph::new(text).render(
                Rect {
                    x: x + self.area.x,
                    y: y + self.area.y,
                    width: (self.area.width - x).min(width),
                    height: 1,
                },
                self.buf,
            );
        }
    }

    fn hline(&mut self, y: u16, x: u16, ch: char, length: u16) {
        self.mvprint(y, x, String::from(ch).repeat(length.into()), None);
    }
}

fn x_for(wd: Weekday) -> u16 {
    // index0() is always less than 7
    DAY_WIDTH * u16::try_from(wd.index0()).unwrap_or_default()
}
