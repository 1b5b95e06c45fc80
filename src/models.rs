use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Which Saturday of the month an end-of-week task falls on.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum WeekOrdinal {
    First,
    Second,
    Third,
    Fourth,
    Last,
}

impl WeekOrdinal {
    /// Zero-based index into the month's Saturdays, or `None` for `Last`.
    pub fn index(&self) -> Option<usize> {
        match self {
            WeekOrdinal::First => Some(0),
            WeekOrdinal::Second => Some(1),
            WeekOrdinal::Third => Some(2),
            WeekOrdinal::Fourth => Some(3),
            WeekOrdinal::Last => None,
        }
    }
}

impl fmt::Display for WeekOrdinal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            WeekOrdinal::First => "1st",
            WeekOrdinal::Second => "2nd",
            WeekOrdinal::Third => "3rd",
            WeekOrdinal::Fourth => "4th",
            WeekOrdinal::Last => "last",
        };
        write!(f, "{}", s)
    }
}

/// How often a delegated task recurs.
///
/// Each variant maps to its own generation rule in [`crate::recurrence`].
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum Frequency {
    OneTime,
    Daily,
    Weekly,
    Monthly,
    Quarterly,
    Yearly,
    /// Due on the Nth (or last) Saturday of the anchor month.
    EndOfWeek(WeekOrdinal),
}

impl FromStr for Frequency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "once" | "one-time" => Ok(Frequency::OneTime),
            "daily" => Ok(Frequency::Daily),
            "weekly" => Ok(Frequency::Weekly),
            "monthly" => Ok(Frequency::Monthly),
            "quarterly" => Ok(Frequency::Quarterly),
            "yearly" => Ok(Frequency::Yearly),
            "1st-week" => Ok(Frequency::EndOfWeek(WeekOrdinal::First)),
            "2nd-week" => Ok(Frequency::EndOfWeek(WeekOrdinal::Second)),
            "3rd-week" => Ok(Frequency::EndOfWeek(WeekOrdinal::Third)),
            "4th-week" => Ok(Frequency::EndOfWeek(WeekOrdinal::Fourth)),
            "last-week" => Ok(Frequency::EndOfWeek(WeekOrdinal::Last)),
            other => Err(format!(
                "Unknown frequency '{}'. Supported: once, daily, weekly, monthly, quarterly, yearly, 1st-week, 2nd-week, 3rd-week, 4th-week, last-week.",
                other
            )),
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Frequency::OneTime => write!(f, "once"),
            Frequency::Daily => write!(f, "daily"),
            Frequency::Weekly => write!(f, "weekly"),
            Frequency::Monthly => write!(f, "monthly"),
            Frequency::Quarterly => write!(f, "quarterly"),
            Frequency::Yearly => write!(f, "yearly"),
            Frequency::EndOfWeek(ord) => write!(f, "{}-week", ord),
        }
    }
}

/// The user-chosen starting point for generation.
///
/// Most frequencies anchor on a concrete date; the end-of-week family anchors
/// on a year + month only.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    Date(NaiveDate),
    Month { year: i32, month: u32 },
}

/// A task delegation request, authored by the delegator.
///
/// Transient: lives only for the duration of one generation call, after which
/// the generated instances are persisted and the template is discarded.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct TaskTemplate {
    /// Short task title.
    pub title: String,
    /// What the assignee is expected to do.
    pub description: String,
    /// Department the task belongs to (validated against the configured list).
    pub department: String,
    /// Who assigned the task. Must differ from the assignee.
    pub delegator: String,
    /// Who carries the task out.
    pub assignee: String,
    /// Recurrence rule.
    pub frequency: Frequency,
    /// Starting date (or month, for end-of-week frequencies).
    pub anchor: Anchor,
    /// Whether the assignee should be reminded before the due date.
    #[serde(default)]
    pub reminders_enabled: bool,
    /// Whether completion requires photo/file evidence.
    #[serde(default)]
    pub attachment_required: bool,
}

/// Lifecycle state of a task instance.
///
/// `Pending -> PendingApproval -> {Completed | Rejected}`, and
/// `Rejected -> Pending` on reopen.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    PendingApproval,
    Completed,
    Rejected,
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TaskStatus::Pending => "Pending",
            TaskStatus::PendingApproval => "Awaiting approval",
            TaskStatus::Completed => "Completed",
            TaskStatus::Rejected => "Rejected",
        };
        write!(f, "{}", s)
    }
}

/// A disallowed status transition.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("cannot {action} a task that is {from}")]
pub struct StatusError {
    pub action: &'static str,
    pub from: TaskStatus,
}

/// One concrete, dated occurrence of a delegated task.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct TaskInstance {
    /// Unique identifier, assigned by storage on insert (0 until then).
    pub id: u64,
    pub title: String,
    pub description: String,
    pub department: String,
    pub delegator: String,
    pub assignee: String,
    /// The date the task is due.
    pub due_date: NaiveDate,
    #[serde(default)]
    pub reminders_enabled: bool,
    #[serde(default)]
    pub attachment_required: bool,
    pub status: TaskStatus,
    /// Assignee's notes, set on completion.
    #[serde(default)]
    pub remarks: Option<String>,
    /// Path or URL of the completion evidence.
    #[serde(default)]
    pub attachment: Option<String>,
    /// Timestamp of the completion submission (ISO 8601).
    #[serde(default)]
    pub completed_at: Option<String>,
    /// Timestamp when the instance was persisted (ISO 8601).
    #[serde(default)]
    pub created_at: Option<String>,
}

impl TaskInstance {
    /// Submits the task for approval. Pending -> PendingApproval.
    pub fn submit(
        &mut self,
        remarks: Option<String>,
        attachment: Option<String>,
        completed_at: String,
    ) -> Result<(), StatusError> {
        if self.status != TaskStatus::Pending {
            return Err(StatusError { action: "complete", from: self.status });
        }
        self.status = TaskStatus::PendingApproval;
        self.remarks = remarks;
        self.attachment = attachment;
        self.completed_at = Some(completed_at);
        Ok(())
    }

    /// Approves a submitted task. PendingApproval -> Completed.
    pub fn approve(&mut self) -> Result<(), StatusError> {
        if self.status != TaskStatus::PendingApproval {
            return Err(StatusError { action: "approve", from: self.status });
        }
        self.status = TaskStatus::Completed;
        Ok(())
    }

    /// Rejects a submitted task. PendingApproval -> Rejected.
    pub fn reject(&mut self, remarks: Option<String>) -> Result<(), StatusError> {
        if self.status != TaskStatus::PendingApproval {
            return Err(StatusError { action: "reject", from: self.status });
        }
        self.status = TaskStatus::Rejected;
        if remarks.is_some() {
            self.remarks = remarks;
        }
        Ok(())
    }

    /// Makes a rejected task re-submittable. Rejected -> Pending.
    pub fn reopen(&mut self) -> Result<(), StatusError> {
        if self.status != TaskStatus::Rejected {
            return Err(StatusError { action: "reopen", from: self.status });
        }
        self.status = TaskStatus::Pending;
        self.remarks = None;
        self.attachment = None;
        self.completed_at = None;
        Ok(())
    }
}
