use super::classify::Classifier;
use super::clock::Clock;
use super::grid::{DateCell, MonthGrid, MonthRangeError, OutOfTimeError, ReferenceMonth};
use time::{Date, Duration};

/// Who owns the selected date
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Ownership {
    /// The caller owns the selection and pushes it in with
    /// [`DatePicker::set_value`]; selecting only reports the new date.
    External,
    /// The picker stores the selection itself.
    Internal,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum PickerEvent {
    DateSelected(Date),
    MonthChanged(ReferenceMonth),
}

#[derive(Clone, Debug)]
pub(crate) struct DatePicker<C> {
    clock: C,
    month: ReferenceMonth,
    selected: Option<Date>,
    ownership: Ownership,
    // Presentation-only; never consulted when classifying days
    hovered: Date,
    classifier: Classifier,
}

impl<C: Clock> DatePicker<C> {
    /// A picker that manages its own selection, starting at `default_date`
    /// (or today)
    pub(crate) fn uncontrolled(
        clock: C,
        default_date: Option<Date>,
    ) -> Result<DatePicker<C>, MonthRangeError> {
        let initial = default_date.unwrap_or_else(|| clock.today());
        Ok(DatePicker {
            month: ReferenceMonth::containing(initial)?,
            selected: Some(initial),
            ownership: Ownership::Internal,
            hovered: initial,
            classifier: Classifier::default(),
            clock,
        })
    }

    /// A picker whose selection is owned by the caller.  The initial month is
    /// the one containing `value`, or the current month if there is no value.
    pub(crate) fn controlled(
        clock: C,
        value: Option<Date>,
    ) -> Result<DatePicker<C>, MonthRangeError> {
        let initial = value.unwrap_or_else(|| clock.today());
        Ok(DatePicker {
            month: ReferenceMonth::containing(initial)?,
            selected: value,
            ownership: Ownership::External,
            hovered: initial,
            classifier: Classifier::default(),
            clock,
        })
    }

    pub(crate) fn classifier(mut self, classifier: Classifier) -> Self {
        self.classifier = classifier;
        self
    }

    pub(crate) fn reference_month(&self) -> ReferenceMonth {
        self.month
    }

    pub(crate) fn selected(&self) -> Option<Date> {
        self.selected
    }

    pub(crate) fn ownership(&self) -> Ownership {
        self.ownership
    }

    pub(crate) fn hovered(&self) -> Date {
        self.hovered
    }

    /// Compute a fresh grid for the current month.  The clock is read anew
    /// on every call.
    pub(crate) fn grid(&self) -> MonthGrid {
        let grid = MonthGrid::generate(
            self.month,
            self.selected,
            &self.classifier,
            self.clock.today(),
        );
        tracing::trace!(month = %self.month, "Generated month grid");
        grid
    }

    pub(crate) fn go_to_previous_month(&mut self) -> Result<PickerEvent, OutOfTimeError> {
        let month = self.month.previous()?;
        Ok(self.set_month(month))
    }

    pub(crate) fn go_to_next_month(&mut self) -> Result<PickerEvent, OutOfTimeError> {
        let month = self.month.next()?;
        Ok(self.set_month(month))
    }

    /// Show `month`.  Returns `None` if it is already shown.
    pub(crate) fn go_to_month(&mut self, month: ReferenceMonth) -> Option<PickerEvent> {
        (month != self.month).then(|| self.set_month(month))
    }

    /// Show the current month and hover over today
    pub(crate) fn go_to_today(&mut self) -> Result<Option<PickerEvent>, MonthRangeError> {
        let today = self.clock.today();
        let event = self.go_to_month(ReferenceMonth::containing(today)?);
        self.hovered = today;
        Ok(event)
    }

    fn set_month(&mut self, month: ReferenceMonth) -> PickerEvent {
        self.month = month;
        self.hovered = month.first_day();
        tracing::debug!(month = %month, "Changed month");
        PickerEvent::MonthChanged(month)
    }

    /// Select the day shown in `cell`.  Disabled cells are ignored and
    /// produce no event.
    pub(crate) fn select_date(&mut self, cell: &DateCell) -> Option<PickerEvent> {
        if cell.is_disabled {
            tracing::trace!(date = %cell.date, "Ignoring selection of disabled date");
            return None;
        }
        if self.ownership == Ownership::Internal {
            self.selected = Some(cell.date);
        }
        tracing::debug!(date = %cell.date, ownership = ?self.ownership, "Selected date");
        Some(PickerEvent::DateSelected(cell.date))
    }

    /// Select `date` if it is visible in the current grid and not disabled
    pub(crate) fn select(&mut self, date: Date) -> Option<PickerEvent> {
        let cell = self.grid().find(date).copied()?;
        self.select_date(&cell)
    }

    pub(crate) fn select_hovered(&mut self) -> Option<PickerEvent> {
        self.select(self.hovered)
    }

    /// Synchronize the caller-owned selection.  A date outside the shown
    /// month moves the picker to that date's month.  Uncontrolled pickers
    /// ignore this.
    pub(crate) fn set_value(&mut self, value: Option<Date>) -> Result<(), MonthRangeError> {
        if self.ownership == Ownership::Internal {
            tracing::warn!("Ignoring external value for an uncontrolled date picker");
            return Ok(());
        }
        if let Some(date) = value {
            if !self.month.contains(date) {
                self.month = ReferenceMonth::containing(date)?;
            }
            self.hovered = date;
        }
        self.selected = value;
        Ok(())
    }

    pub(crate) fn hover(&mut self, date: Date) -> bool {
        if self.grid().find(date).is_some() {
            self.hovered = date;
            true
        } else {
            false
        }
    }

    /// Move the hover cursor by `days`, staying within the visible grid.
    /// Returns `false` if the target is not visible.
    pub(crate) fn move_hover(&mut self, days: i64) -> bool {
        self.hovered
            .checked_add(Duration::days(days))
            .is_some_and(|date| self.hover(date))
    }
}
