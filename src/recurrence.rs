//! The recurring-task date generator.
//!
//! Turns a [`TaskTemplate`] plus the working-day calendar into the concrete
//! list of dated task instances. Pure and deterministic: no I/O, no clock, no
//! shared state, so it is safe to call speculatively (e.g. for previews) and
//! re-call with the same inputs.

use chrono::{Datelike, Duration, Months, NaiveDate, Weekday};
use thiserror::Error;

use crate::builder::build_instance;
use crate::calendar::WorkingDayCalendar;
use crate::models::{Anchor, Frequency, TaskInstance, TaskTemplate, WeekOrdinal};

/// Cap on instances generated for a daily task (one year).
pub const DAILY_CAP: usize = 365;
/// Cap on the weekly walk when no working-day calendar is configured.
pub const WEEKLY_FALLBACK_CAP: usize = 52;

/// Why a generation request was refused.
///
/// All variants are validation failures the caller can fix by adjusting
/// input; nothing is persisted on failure.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GenerationError {
    #[error("delegator and assignee must be different people")]
    SameAssignee,

    #[error("missing required field: {0}")]
    MissingField(&'static str),

    #[error("no {ordinal} Saturday in {year}-{month:02}")]
    WeekNotFound {
        ordinal: WeekOrdinal,
        year: i32,
        month: u32,
    },

    #[error("no working day available on or after the anchor date")]
    NoValidDates,
}

/// Generates the full list of due-dated instances for a template.
///
/// Instances come back ordered ascending by due date, all in the initial
/// `Pending` state, with ids unassigned. Persisting them is the caller's
/// business.
pub fn generate(
    template: &TaskTemplate,
    calendar: &WorkingDayCalendar,
) -> Result<Vec<TaskInstance>, GenerationError> {
    validate(template)?;

    let due_dates = match template.frequency {
        Frequency::OneTime => one_time(anchor_date(template)?, calendar)?,
        Frequency::Daily => daily(anchor_date(template)?, calendar)?,
        Frequency::Weekly => weekly(anchor_date(template)?, calendar)?,
        Frequency::Monthly => month_offsets(anchor_date(template)?, calendar, 1, 12)?,
        Frequency::Quarterly => month_offsets(anchor_date(template)?, calendar, 3, 4)?,
        Frequency::Yearly => yearly(anchor_date(template)?, calendar)?,
        Frequency::EndOfWeek(ordinal) => end_of_week(template, ordinal)?,
    };

    Ok(due_dates
        .into_iter()
        .map(|due| build_instance(template, due))
        .collect())
}

/// Precondition checks shared by every frequency.
fn validate(template: &TaskTemplate) -> Result<(), GenerationError> {
    if template.delegator.trim().is_empty() {
        return Err(GenerationError::MissingField("delegator"));
    }
    if template.assignee.trim().is_empty() {
        return Err(GenerationError::MissingField("assignee"));
    }
    // Checked ahead of the remaining fields: a self-delegation is wrong no
    // matter what else is filled in.
    if template.delegator == template.assignee {
        return Err(GenerationError::SameAssignee);
    }
    if template.title.trim().is_empty() {
        return Err(GenerationError::MissingField("title"));
    }
    if template.description.trim().is_empty() {
        return Err(GenerationError::MissingField("description"));
    }
    if template.department.trim().is_empty() {
        return Err(GenerationError::MissingField("department"));
    }
    Ok(())
}

/// The concrete anchor date, for every frequency except the end-of-week
/// family (those carry a year+month and never reach here).
fn anchor_date(template: &TaskTemplate) -> Result<NaiveDate, GenerationError> {
    match template.anchor {
        Anchor::Date(d) => Ok(d),
        Anchor::Month { .. } => Err(GenerationError::MissingField("anchor date")),
    }
}

fn one_time(
    anchor: NaiveDate,
    calendar: &WorkingDayCalendar,
) -> Result<Vec<NaiveDate>, GenerationError> {
    let due = calendar.align(anchor).ok_or(GenerationError::NoValidDates)?;
    Ok(vec![due])
}

fn daily(
    anchor: NaiveDate,
    calendar: &WorkingDayCalendar,
) -> Result<Vec<NaiveDate>, GenerationError> {
    if calendar.is_empty() {
        // No calendar configured: one instance per calendar day for a year.
        return Ok((0..DAILY_CAP as i64)
            .map(|i| anchor + Duration::days(i))
            .collect());
    }
    let dates: Vec<NaiveDate> = calendar
        .days_from(anchor)
        .iter()
        .take(DAILY_CAP)
        .copied()
        .collect();
    if dates.is_empty() {
        return Err(GenerationError::NoValidDates);
    }
    Ok(dates)
}

fn weekly(
    anchor: NaiveDate,
    calendar: &WorkingDayCalendar,
) -> Result<Vec<NaiveDate>, GenerationError> {
    let start = calendar.align(anchor).ok_or(GenerationError::NoValidDates)?;
    if calendar.is_empty() {
        // Every day is valid, so the walk below would never stop.
        return Ok((0..WEEKLY_FALLBACK_CAP as i64)
            .map(|i| start + Duration::weeks(i))
            .collect());
    }
    let mut dates = vec![start];
    let mut current = start;
    loop {
        match calendar.align(current + Duration::days(7)) {
            // Calendar exhausted or the walk stopped advancing.
            None => break,
            Some(next) if next <= current => break,
            Some(next) => {
                dates.push(next);
                current = next;
            }
        }
    }
    Ok(dates)
}

/// Monthly and quarterly: `count` instances at `step`-month offsets from the
/// original anchor, each aligned independently. An instance whose alignment
/// fails is skipped rather than aborting the batch.
fn month_offsets(
    anchor: NaiveDate,
    calendar: &WorkingDayCalendar,
    step: u32,
    count: u32,
) -> Result<Vec<NaiveDate>, GenerationError> {
    let mut dates = Vec::with_capacity(count as usize);
    for i in 0..count {
        let target = match anchor.checked_add_months(Months::new(i * step)) {
            Some(t) => t,
            None => continue,
        };
        if let Some(due) = calendar.align(target) {
            dates.push(due);
        }
    }
    if dates.is_empty() {
        return Err(GenerationError::NoValidDates);
    }
    Ok(dates)
}

fn yearly(
    anchor: NaiveDate,
    calendar: &WorkingDayCalendar,
) -> Result<Vec<NaiveDate>, GenerationError> {
    let target = anchor
        .checked_add_months(Months::new(12))
        .ok_or(GenerationError::NoValidDates)?;
    let due = calendar.align(target).ok_or(GenerationError::NoValidDates)?;
    Ok(vec![due])
}

/// The Nth (or last) Saturday of the anchor month. Saturdays are used as
/// due-dates directly; the working-day calendar is not consulted.
fn end_of_week(
    template: &TaskTemplate,
    ordinal: WeekOrdinal,
) -> Result<Vec<NaiveDate>, GenerationError> {
    let (year, month) = match template.anchor {
        Anchor::Month { year, month } => (year, month),
        Anchor::Date(_) => return Err(GenerationError::MissingField("anchor month")),
    };
    let saturdays = saturdays_in_month(year, month)
        .ok_or(GenerationError::MissingField("anchor month"))?;
    let due = nth_saturday(&saturdays, ordinal).ok_or(GenerationError::WeekNotFound {
        ordinal,
        year,
        month,
    })?;
    Ok(vec![due])
}

/// Every Saturday falling within the given month, ascending.
///
/// `None` when year/month don't name a real month.
pub fn saturdays_in_month(year: i32, month: u32) -> Option<Vec<NaiveDate>> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let offset = (Weekday::Sat.num_days_from_monday() + 7
        - first.weekday().num_days_from_monday())
        % 7;
    let mut day = first + Duration::days(offset as i64);
    let mut saturdays = Vec::with_capacity(5);
    while day.month() == month && day.year() == year {
        saturdays.push(day);
        day = day + Duration::days(7);
    }
    Some(saturdays)
}

/// Picks the requested ordinal Saturday out of a month's Saturday list.
pub fn nth_saturday(saturdays: &[NaiveDate], ordinal: WeekOrdinal) -> Option<NaiveDate> {
    match ordinal.index() {
        Some(idx) => saturdays.get(idx).copied(),
        None => saturdays.last().copied(),
    }
}
