use chrono::{DateTime, Local, NaiveDate, Utc};

use sbudget_core::Clock;

/// Wall clock. Timestamps are UTC; the calendar day follows the local time zone
/// so entries made late in the evening land on the user's date.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}
