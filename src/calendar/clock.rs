use time::{Date, OffsetDateTime, UtcOffset};

/// Source of "today" for marking the current day in a month grid
pub(crate) trait Clock {
    fn today(&self) -> Date;
}

impl<T: Clock + ?Sized> Clock for &T {
    fn today(&self) -> Date {
        (**self).today()
    }
}

/// Reads the system clock on every call and converts it to the local offset
/// that was in effect at startup
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct SystemClock {
    offset: UtcOffset,
}

impl SystemClock {
    pub(crate) fn new(offset: UtcOffset) -> SystemClock {
        SystemClock { offset }
    }
}

impl Clock for SystemClock {
    fn today(&self) -> Date {
        OffsetDateTime::now_utc().to_offset(self.offset).date()
    }
}

#[cfg(test)]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct FixedClock(pub(crate) Date);

#[cfg(test)]
impl Clock for FixedClock {
    fn today(&self) -> Date {
        self.0
    }
}
