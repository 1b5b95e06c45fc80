use chrono::NaiveDate;

/// The set of dates flagged as valid working days.
///
/// Built from an externally maintained list (order and duplicates don't
/// matter). An empty calendar means no calendar is configured, in which case
/// every calendar day counts as a working day.
#[derive(Debug, Clone, Default)]
pub struct WorkingDayCalendar {
    days: Vec<NaiveDate>,
}

impl WorkingDayCalendar {
    /// Builds a calendar from an unordered list of dates.
    pub fn new(mut days: Vec<NaiveDate>) -> Self {
        days.sort();
        days.dedup();
        WorkingDayCalendar { days }
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.days.binary_search(&date).is_ok()
    }

    /// The sorted working days, earliest first.
    pub fn days(&self) -> &[NaiveDate] {
        &self.days
    }

    /// Moves a target date forward to the closest later working day.
    ///
    /// Returns the earliest working day >= `target`, or `None` when the
    /// calendar ends before the target. With no calendar configured every day
    /// is valid, so the target comes back unchanged.
    pub fn align(&self, target: NaiveDate) -> Option<NaiveDate> {
        if self.days.is_empty() {
            return Some(target);
        }
        match self.days.binary_search(&target) {
            Ok(_) => Some(target),
            Err(idx) => self.days.get(idx).copied(),
        }
    }

    /// Working days on or after `from`, earliest first.
    pub fn days_from(&self, from: NaiveDate) -> &[NaiveDate] {
        let start = match self.days.binary_search(&from) {
            Ok(idx) => idx,
            Err(idx) => idx,
        };
        &self.days[start..]
    }
}
