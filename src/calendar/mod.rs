pub(crate) mod classify;
pub(crate) mod clock;
mod grid;
mod picker;
mod widget;
pub(crate) use self::grid::{DateCell, MonthRangeError, ReferenceMonth, WeekdayExt};
pub(crate) use self::picker::{DatePicker, Ownership, PickerEvent};
pub(crate) use self::widget::{Calendar, MAIN_HEIGHT};
