use crate::error::{Error, Result};
use chrono::{naive::NaiveDateTime, NaiveDate};

/// An inclusive span of time a query covers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimeRange {
    start: NaiveDateTime,
    end: NaiveDateTime,
}

impl TimeRange {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Result<Self> {
        if end < start {
            log::error!("End before start: start - {} end - {}", start, end);
            return Err(Error::InvalidRange {
                start: start.to_string(),
                end: end.to_string(),
            });
        }

        Ok(TimeRange { start, end })
    }

    /// Range from midnight of `first` to midnight of `last`.
    pub fn from_dates(first: NaiveDate, last: NaiveDate) -> Result<Self> {
        Self::new(first.and_hms(0, 0, 0), last.and_hms(0, 0, 0))
    }

    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    pub fn end(&self) -> NaiveDateTime {
        self.end
    }
}
