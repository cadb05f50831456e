use chrono::{Datelike, Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};

/// Calendar bucket size for settlement periods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Granularity {
    Daily,
    Monthly,
    Yearly,
}

impl Granularity {
    /// Bucket key for a date: `YYYY-MM-DD`, `YYYY-MM` or `YYYY`.
    pub fn key(&self, date: NaiveDate) -> String {
        match self {
            Granularity::Daily => date.format("%Y-%m-%d").to_string(),
            Granularity::Monthly => date.format("%Y-%m").to_string(),
            Granularity::Yearly => date.format("%Y").to_string(),
        }
    }

    /// First day of the bucket containing `date`.
    fn bucket_start(&self, date: NaiveDate) -> NaiveDate {
        match self {
            Granularity::Daily => date,
            Granularity::Monthly => date.with_day(1).unwrap_or(date),
            Granularity::Yearly => NaiveDate::from_ymd_opt(date.year(), 1, 1).unwrap_or(date),
        }
    }

    fn step(&self, date: NaiveDate) -> Option<NaiveDate> {
        match self {
            Granularity::Daily => date.checked_add_days(Days::new(1)),
            Granularity::Monthly => date.checked_add_months(Months::new(1)),
            Granularity::Yearly => date.checked_add_months(Months::new(12)),
        }
    }
}

/// Inclusive calendar range. Cheap to copy and re-iterable: every call to
/// [`PeriodRange::iter`] walks the same ordered key sequence again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub granularity: Granularity,
}

impl PeriodRange {
    pub fn new(start: NaiveDate, end: NaiveDate, granularity: Granularity) -> Self {
        PeriodRange {
            start,
            end,
            granularity,
        }
    }

    /// Lazy walk over period keys, one bucket at a time, inclusive of the
    /// bucket containing `end`. Empty when `start > end`.
    pub fn iter(&self) -> PeriodIter {
        let current = if self.start > self.end {
            None
        } else {
            Some(self.granularity.bucket_start(self.start))
        };
        PeriodIter {
            current,
            end: self.end,
            granularity: self.granularity,
        }
    }
}

impl IntoIterator for &PeriodRange {
    type Item = String;
    type IntoIter = PeriodIter;

    fn into_iter(self) -> PeriodIter {
        self.iter()
    }
}

pub struct PeriodIter {
    current: Option<NaiveDate>,
    end: NaiveDate,
    granularity: Granularity,
}

impl Iterator for PeriodIter {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        let date = self.current?;
        if date > self.end {
            self.current = None;
            return None;
        }
        self.current = self.granularity.step(date);
        Some(self.granularity.key(date))
    }
}
