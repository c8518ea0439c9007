use crate::calendar::clock::Clock;
use crate::calendar::{Calendar, DatePicker, Ownership, PickerEvent, MAIN_HEIGHT};
use crate::help::Help;
use crate::jumpto::{JumpTo, JumpToInput, JumpToOutput, JumpToState};
use crate::labels::Language;
use crate::theme::{BASE_STYLE, STATUS_STYLE};
use crossterm::event::{read, KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    backend::Backend,
    buffer::Buffer,
    layout::{Constraint, Flex, Layout, Rect},
    text::Line,
    widgets::{StatefulWidget, Widget},
    Terminal,
};
use std::io::{self, Write};
use time::Date;

#[derive(Clone, Debug)]
pub(crate) struct App<C> {
    picker: DatePicker<C>,
    language: Language,
    state: AppState,
}

impl<C: Clock> App<C> {
    pub(crate) fn new(picker: DatePicker<C>, language: Language) -> App<C> {
        App {
            picker,
            language,
            state: AppState::Calendar,
        }
    }

    /// Run until the user quits, returning the date selected at that point
    pub(crate) fn run<B: Backend>(mut self, terminal: &mut Terminal<B>) -> io::Result<Option<Date>> {
        while !self.quitting() {
            self.draw(terminal)?;
            self.handle_input()?;
        }
        Ok(self.picker.selected())
    }

    fn draw<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        terminal.draw(|frame| frame.render_widget(self, frame.area()))?;
        Ok(())
    }

    fn handle_input(&mut self) -> io::Result<()> {
        let normal_modifiers = KeyModifiers::NONE | KeyModifiers::SHIFT;
        if let Some(KeyEvent {
            code, modifiers, ..
        }) = read()?.as_key_press_event()
        {
            if modifiers == KeyModifiers::CONTROL && code == KeyCode::Char('c') {
                self.state = AppState::Quitting;
            } else if !normal_modifiers.contains(modifiers) || !self.handle_key(code) {
                self.beep()?;
            }
        }
        // else: Redraw on resize, and we might as well redraw on other stuff
        // too
        Ok(())
    }

    // Returns `false` if the user pressed an invalid key
    fn handle_key(&mut self, key: KeyCode) -> bool {
        match &mut self.state {
            AppState::Calendar => match key {
                KeyCode::Char('h') | KeyCode::Left => self.picker.move_hover(-1),
                KeyCode::Char('l') | KeyCode::Right => self.picker.move_hover(1),
                KeyCode::Char('k') | KeyCode::Up => self.picker.move_hover(-7),
                KeyCode::Char('j') | KeyCode::Down => self.picker.move_hover(7),
                KeyCode::Char('p') | KeyCode::PageUp => {
                    let r = self.picker.go_to_previous_month();
                    r.map(|ev| self.dispatch(ev)).is_ok()
                }
                KeyCode::Char('n') | KeyCode::PageDown => {
                    let r = self.picker.go_to_next_month();
                    r.map(|ev| self.dispatch(ev)).is_ok()
                }
                KeyCode::Enter | KeyCode::Char(' ') => match self.picker.select_hovered() {
                    Some(ev) => {
                        self.dispatch(ev);
                        true
                    }
                    None => false,
                },
                KeyCode::Char('t') | KeyCode::Home => match self.picker.go_to_today() {
                    Ok(ev) => {
                        if let Some(ev) = ev {
                            self.dispatch(ev);
                        }
                        true
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "Cannot show the current month");
                        false
                    }
                },
                KeyCode::Char('g') => {
                    self.state = AppState::Jumping(JumpToState::new());
                    true
                }
                KeyCode::Char('q') | KeyCode::Esc => {
                    self.state = AppState::Quitting;
                    true
                }
                KeyCode::Char('?') => {
                    self.state = AppState::Helping;
                    true
                }
                _ => false,
            },
            AppState::Helping => {
                self.state = AppState::Calendar;
                true
            }
            AppState::Jumping(state) => {
                if matches!(key, KeyCode::Char('q' | 'g') | KeyCode::Esc) {
                    self.state = AppState::Calendar;
                    true
                } else {
                    let output = match key {
                        KeyCode::Char('-') => state.handle_input(JumpToInput::Negative),
                        KeyCode::Char('+') => state.handle_input(JumpToInput::Positive),
                        KeyCode::Char(c) => match c.to_digit(10).map(u8::try_from) {
                            Some(Ok(d)) => state.handle_input(JumpToInput::Digit(d)),
                            _ => JumpToOutput::Invalid,
                        },
                        KeyCode::Backspace | KeyCode::Delete => {
                            state.handle_input(JumpToInput::Backspace)
                        }
                        KeyCode::Enter => state.handle_input(JumpToInput::Enter),
                        _ => JumpToOutput::Invalid,
                    };
                    match output {
                        JumpToOutput::Ok => true,
                        JumpToOutput::Invalid => false,
                        JumpToOutput::Jump(month) => {
                            self.state = AppState::Calendar;
                            if let Some(ev) = self.picker.go_to_month(month) {
                                self.dispatch(ev);
                            }
                            true
                        }
                    }
                }
            }
            AppState::Quitting => false,
        }
    }

    /// React to a picker notification.  As the owner of a controlled picker's
    /// value, the app feeds each selected date back in.
    fn dispatch(&mut self, event: PickerEvent) {
        match event {
            PickerEvent::DateSelected(date) => {
                tracing::info!(%date, "Date selected");
                if self.picker.ownership() == Ownership::External {
                    if let Err(e) = self.picker.set_value(Some(date)) {
                        tracing::warn!(error = %e, "Could not store selected date");
                    }
                }
            }
            PickerEvent::MonthChanged(month) => {
                tracing::info!(%month, "Month changed");
            }
        }
    }

    fn beep(&self) -> io::Result<()> {
        io::stdout().write_all(b"\x07")
    }

    fn quitting(&self) -> bool {
        self.state == AppState::Quitting
    }

    fn status_line(&self) -> Line<'static> {
        let selected = match self.picker.selected() {
            Some(date) => date.to_string(),
            None => self.language.none_label().to_owned(),
        };
        Line::styled(
            format!(
                "{}: {selected}    ? help",
                self.language.selected_label()
            ),
            STATUS_STYLE,
        )
        .centered()
    }
}

impl<C: Clock> Widget for &mut App<C> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        buf.set_style(area, BASE_STYLE);
        let [cal_area, status_area] =
            Layout::vertical([Constraint::Length(MAIN_HEIGHT), Constraint::Length(2)])
                .flex(Flex::Center)
                .areas(area);
        Calendar::<C>::new(self.language).render(cal_area, buf, &mut self.picker);
        let [_, status_area] =
            Layout::vertical([Constraint::Length(1), Constraint::Length(1)]).areas(status_area);
        self.status_line().render(status_area, buf);
        if self.state == AppState::Helping {
            Help(BASE_STYLE).render(area, buf);
        } else if let AppState::Jumping(ref mut state) = self.state {
            JumpTo.render(area, buf, state);
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum AppState {
    Calendar,
    Helping,
    Jumping(JumpToState),
    Quitting,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::classify::{Classifier, DateSet, DisabledRule, HolidayRule};
    use crate::calendar::clock::FixedClock;
    use crate::calendar::ReferenceMonth;
    use time::macros::date;
    use time::Month;

    const TODAY: Date = date!(2024 - 04 - 22);

    fn lines(buf: &Buffer) -> Vec<String> {
        buf.content
            .chunks(usize::from(buf.area.width))
            .map(|row| row.iter().map(|c| c.symbol()).collect())
            .collect()
    }

    fn uncontrolled() -> App<FixedClock> {
        let classifier = Classifier::new(
            DisabledRule::builtin(DateSet::from_iter([date!(2024 - 04 - 23)]), None, None),
            HolidayRule::default(),
        );
        let picker = DatePicker::uncontrolled(FixedClock(TODAY), None)
            .unwrap()
            .classifier(classifier);
        App::new(picker, Language::English)
    }

    #[test]
    fn test_render() {
        let mut app = uncontrolled();
        let area = Rect::new(0, 0, 40, 13);
        let mut buffer = Buffer::empty(area);
        app.render(area, &mut buffer);
        assert_eq!(
            lines(&buffer),
            [
                "                                        ",
                "      <        April 2024        >      ",
                "       Su  Mo  Tu  We  Th  Fr  Sa       ",
                "      ────────────────────────────      ",
                "       31   1   2   3   4   5   6       ",
                "        7   8   9  10  11  12  13       ",
                "       14  15  16  17  18  19  20       ",
                "       21 [22] 23  24  25  26  27       ",
                "       28  29  30   1   2   3   4       ",
                "        5   6   7   8   9  10  11       ",
                "                                        ",
                "     Selected: 2024-04-22    ? help     ",
                "                                        ",
            ]
        );
    }

    #[test]
    fn test_hover_and_select() {
        let mut app = uncontrolled();
        assert!(app.handle_key(KeyCode::Right));
        assert_eq!(app.picker.hovered(), date!(2024 - 04 - 23));
        // April 23 is disabled
        assert!(!app.handle_key(KeyCode::Enter));
        assert_eq!(app.picker.selected(), Some(TODAY));
        assert!(app.handle_key(KeyCode::Char('j')));
        assert!(app.handle_key(KeyCode::Enter));
        assert_eq!(app.picker.selected(), Some(date!(2024 - 04 - 30)));
    }

    #[test]
    fn test_month_navigation() {
        let mut app = uncontrolled();
        assert!(app.handle_key(KeyCode::PageDown));
        assert!(app.handle_key(KeyCode::Char('n')));
        assert_eq!(
            app.picker.reference_month(),
            ReferenceMonth::new(2024, Month::June).unwrap()
        );
        assert!(app.handle_key(KeyCode::Char('p')));
        assert_eq!(
            app.picker.reference_month(),
            ReferenceMonth::new(2024, Month::May).unwrap()
        );
        assert!(app.handle_key(KeyCode::Home));
        assert_eq!(
            app.picker.reference_month(),
            ReferenceMonth::new(2024, Month::April).unwrap()
        );
        assert_eq!(app.picker.hovered(), TODAY);
    }

    #[test]
    fn test_jump_to_month() {
        let mut app = uncontrolled();
        assert!(app.handle_key(KeyCode::Char('g')));
        for ch in "199912".chars() {
            assert!(app.handle_key(KeyCode::Char(ch)));
        }
        assert!(!app.handle_key(KeyCode::Char('x')));
        assert!(app.handle_key(KeyCode::Enter));
        assert_eq!(app.state, AppState::Calendar);
        assert_eq!(
            app.picker.reference_month(),
            ReferenceMonth::new(1999, Month::December).unwrap()
        );
    }

    #[test]
    fn test_controlled_app_stores_selection() {
        let picker = DatePicker::controlled(FixedClock(TODAY), None).unwrap();
        let mut app = App::new(picker, Language::English);
        assert_eq!(app.picker.selected(), None);
        assert!(app.handle_key(KeyCode::Char(' ')));
        assert_eq!(app.picker.selected(), Some(TODAY));
    }

    #[test]
    fn test_help_and_quit() {
        let mut app = uncontrolled();
        assert!(app.handle_key(KeyCode::Char('?')));
        assert_eq!(app.state, AppState::Helping);
        assert!(app.handle_key(KeyCode::Char('z')));
        assert_eq!(app.state, AppState::Calendar);
        assert!(!app.handle_key(KeyCode::Char('z')));
        assert!(app.handle_key(KeyCode::Esc));
        assert!(app.quitting());
    }
}
