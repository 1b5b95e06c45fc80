//! Delegust library: data model, working-day calendar, the recurring-task
//! date generator, and the JSON storage + command layer the CLI drives.

pub mod builder;
pub mod calendar;
pub mod commands;
pub mod models;
pub mod recurrence;
pub mod storage;
