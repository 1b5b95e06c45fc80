use std::io::{self, Write};

use chrono::{Datelike, Local, NaiveDate};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};

use crate::calendar::WorkingDayCalendar;
use crate::models::{Anchor, Frequency, TaskInstance, TaskStatus, TaskTemplate};
use crate::recurrence::generate;
use crate::storage::{
    delete_database, insert_instances, load_calendar, load_departments, load_instances,
    save_calendar, save_departments, save_instances,
};

/// Delegates a new task: builds the template from the arguments, generates
/// the dated instances, and either previews them or persists them.
///
/// With `preview`, nothing is written; the generated schedule is printed so
/// the delegator can adjust before submitting.
#[allow(clippy::too_many_arguments)]
pub fn cmd_delegate(
    title: String,
    description: String,
    department: String,
    from: String,
    to: String,
    freq: String,
    anchor: Option<String>,
    anchor_month: Option<String>,
    reminders: bool,
    attachment_required: bool,
    preview: bool,
    silent: bool,
) {
    let frequency: Frequency = match freq.parse() {
        Ok(f) => f,
        Err(e) => {
            if !silent { eprintln!("{}", e); }
            return;
        }
    };

    let anchor = match build_anchor(frequency, anchor, anchor_month) {
        Ok(a) => a,
        Err(e) => {
            if !silent { eprintln!("{}", e); }
            return;
        }
    };

    let departments = load_departments();
    if !departments.is_empty() && !departments.contains(&department) {
        if !silent {
            eprintln!(
                "Unknown department '{}'. Configured: {}.",
                department,
                departments.join(", ")
            );
        }
        return;
    }

    let template = TaskTemplate {
        title,
        description,
        department,
        delegator: from,
        assignee: to,
        frequency,
        anchor,
        reminders_enabled: reminders,
        attachment_required,
    };

    let calendar = WorkingDayCalendar::new(load_calendar());
    let instances = match generate(&template, &calendar) {
        Ok(instances) => instances,
        Err(e) => {
            if !silent { eprintln!("Cannot delegate: {}", e); }
            return;
        }
    };

    if preview {
        if !silent {
            println!(
                "Preview: {} instance(s) for '{}' ({}). Nothing saved.",
                instances.len(),
                template.title,
                template.frequency
            );
            print_instance_table(&instances);
        }
        return;
    }

    match insert_instances(instances) {
        Ok(ids) => {
            if !silent {
                match (ids.first(), ids.last()) {
                    (Some(first), Some(last)) if first != last => {
                        println!("Delegated {} task instances (ids {}..{}).", ids.len(), first, last)
                    }
                    (Some(first), _) => println!("Delegated 1 task instance (id = {}).", first),
                    _ => {}
                }
            }
        }
        Err(e) => {
            if !silent { eprintln!("Failed to save instances: {}", e); }
        }
    }
}

/// Resolves the anchor argument pair into the anchor kind the frequency
/// expects.
fn build_anchor(
    frequency: Frequency,
    anchor: Option<String>,
    anchor_month: Option<String>,
) -> Result<Anchor, String> {
    match frequency {
        Frequency::EndOfWeek(_) => {
            let raw = anchor_month
                .ok_or("End-of-week frequencies need --anchor-month YYYY-MM.".to_string())?;
            let first = NaiveDate::parse_from_str(&format!("{}-01", raw), "%Y-%m-%d")
                .map_err(|e| format!("Invalid anchor month '{}': {}. Use YYYY-MM.", raw, e))?;
            Ok(Anchor::Month { year: first.year(), month: first.month() })
        }
        _ => {
            let raw = anchor.ok_or("This frequency needs --anchor YYYY-MM-DD.".to_string())?;
            let date = NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
                .map_err(|e| format!("Invalid anchor date '{}': {}. Use YYYY-MM-DD.", raw, e))?;
            Ok(Anchor::Date(date))
        }
    }
}

/// Lists task instances in a formatted table, sorted by due date.
///
/// By default, hides completed tasks unless `all` is true.
pub fn cmd_list(
    all: bool,
    status: Option<String>,
    assignee: Option<String>,
    department: Option<String>,
) {
    let mut instances = load_instances();
    if !all {
        instances.retain(|t| t.status != TaskStatus::Completed);
    }
    if let Some(s) = status {
        let wanted = match parse_status(&s) {
            Ok(w) => w,
            Err(e) => {
                eprintln!("{}", e);
                return;
            }
        };
        instances.retain(|t| t.status == wanted);
    }
    if let Some(a) = assignee {
        instances.retain(|t| t.assignee == a);
    }
    if let Some(d) = department {
        instances.retain(|t| t.department == d);
    }
    if instances.is_empty() {
        println!("No task instances found.");
        return;
    }

    instances.sort_by_key(|t| t.due_date);

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("ID").add_attribute(Attribute::Bold),
            Cell::new("Title").add_attribute(Attribute::Bold),
            Cell::new("Department").add_attribute(Attribute::Bold),
            Cell::new("Assignee").add_attribute(Attribute::Bold),
            Cell::new("Due").add_attribute(Attribute::Bold),
            Cell::new("Time Left").add_attribute(Attribute::Bold),
            Cell::new("Evidence").add_attribute(Attribute::Bold),
            Cell::new("Status").add_attribute(Attribute::Bold),
        ]);

    let today = Local::now().date_naive();

    for t in instances {
        let days_left = (t.due_date - today).num_days();
        let time_left_str = if days_left < 0 {
            format!("{}d overdue", days_left.abs())
        } else if days_left == 0 {
            "Today".to_string()
        } else {
            format!("{}d", days_left)
        };
        let overdue = days_left < 0
            && matches!(t.status, TaskStatus::Pending | TaskStatus::Rejected);

        let evidence = if t.attachment.is_some() {
            "attached"
        } else if t.attachment_required {
            "required"
        } else {
            "-"
        };

        table.add_row(vec![
            Cell::new(t.id),
            Cell::new(&t.title),
            Cell::new(&t.department),
            Cell::new(&t.assignee),
            Cell::new(t.due_date),
            Cell::new(time_left_str).fg(if overdue { Color::Red } else { Color::Reset }),
            Cell::new(evidence),
            Cell::new(t.status.to_string()).fg(status_color(t.status)),
        ]);
    }

    println!("{table}");
}

fn status_color(status: TaskStatus) -> Color {
    match status {
        TaskStatus::Pending => Color::Yellow,
        TaskStatus::PendingApproval => Color::Cyan,
        TaskStatus::Completed => Color::Green,
        TaskStatus::Rejected => Color::Red,
    }
}

fn parse_status(s: &str) -> Result<TaskStatus, String> {
    match s.to_lowercase().as_str() {
        "pending" => Ok(TaskStatus::Pending),
        "pending-approval" | "pending_approval" | "submitted" => Ok(TaskStatus::PendingApproval),
        "completed" | "done" => Ok(TaskStatus::Completed),
        "rejected" => Ok(TaskStatus::Rejected),
        other => Err(format!(
            "Unknown status '{}'. Supported: pending, pending-approval, completed, rejected.",
            other
        )),
    }
}

/// Marks a task instance complete and submits it for approval.
///
/// Refused when the task requires attachment evidence and none is given.
pub fn cmd_complete(id: u64, remarks: Option<String>, attachment: Option<String>, silent: bool) {
    let mut instances = load_instances();
    let Some(t) = instances.iter_mut().find(|t| t.id == id) else {
        if !silent { eprintln!("Task instance {} not found.", id); }
        return;
    };

    if t.attachment_required && attachment.is_none() {
        if !silent {
            eprintln!("Task {} requires attachment evidence. Pass --attachment <path or URL>.", id);
        }
        return;
    }

    if let Err(e) = t.submit(remarks, attachment, Local::now().to_rfc3339()) {
        if !silent { eprintln!("{}", e); }
        return;
    }

    if let Err(e) = save_instances(&instances) {
        if !silent { eprintln!("Failed to save instances: {}", e); }
    } else if !silent {
        println!("Task {} submitted for approval.", id);
    }
}

/// Approves a submitted task instance.
pub fn cmd_approve(id: u64, silent: bool) {
    update_instance(id, silent, "approved", |t| t.approve());
}

/// Rejects a submitted task instance, sending it back to the assignee.
pub fn cmd_reject(id: u64, remarks: Option<String>, silent: bool) {
    update_instance(id, silent, "rejected", move |t| t.reject(remarks.clone()));
}

/// Reopens a rejected task instance so it can be completed again.
pub fn cmd_reopen(id: u64, silent: bool) {
    update_instance(id, silent, "reopened", |t| t.reopen());
}

fn update_instance<F>(id: u64, silent: bool, verb: &str, mut apply: F)
where
    F: FnMut(&mut TaskInstance) -> Result<(), crate::models::StatusError>,
{
    let mut instances = load_instances();
    let Some(t) = instances.iter_mut().find(|t| t.id == id) else {
        if !silent { eprintln!("Task instance {} not found.", id); }
        return;
    };
    if let Err(e) = apply(t) {
        if !silent { eprintln!("{}", e); }
        return;
    }
    if let Err(e) = save_instances(&instances) {
        if !silent { eprintln!("Failed to save instances: {}", e); }
    } else if !silent {
        println!("Task {} {}.", id, verb);
    }
}

/// Removes a task instance from the database by ID.
pub fn cmd_remove(id: u64, silent: bool) {
    let mut instances = load_instances();
    let len_before = instances.len();
    instances.retain(|t| t.id != id);
    if instances.len() == len_before {
        if !silent { eprintln!("Task instance {} not found.", id); }
    } else if let Err(e) = save_instances(&instances) {
        if !silent { eprintln!("Failed to save instances: {}", e); }
    } else if !silent {
        println!("Task instance {} removed.", id);
    }
}

/// Adds dates to the working-day calendar.
pub fn cmd_calendar_add(dates: Vec<String>, silent: bool) {
    let mut parsed = Vec::with_capacity(dates.len());
    for raw in &dates {
        match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
            Ok(d) => parsed.push(d),
            Err(e) => {
                if !silent { eprintln!("Invalid date '{}': {}. Use YYYY-MM-DD.", raw, e); }
                return;
            }
        }
    }
    let mut calendar = load_calendar();
    calendar.extend(parsed);
    calendar.sort();
    calendar.dedup();
    if let Err(e) = save_calendar(&calendar) {
        if !silent { eprintln!("Failed to save calendar: {}", e); }
    } else if !silent {
        println!("Calendar now has {} working day(s).", calendar.len());
    }
}

/// Removes a date from the working-day calendar.
pub fn cmd_calendar_remove(date: String, silent: bool) {
    let parsed = match NaiveDate::parse_from_str(&date, "%Y-%m-%d") {
        Ok(d) => d,
        Err(e) => {
            if !silent { eprintln!("Invalid date '{}': {}. Use YYYY-MM-DD.", date, e); }
            return;
        }
    };
    let mut calendar = load_calendar();
    let len_before = calendar.len();
    calendar.retain(|d| *d != parsed);
    if calendar.len() == len_before {
        if !silent { eprintln!("{} is not in the calendar.", parsed); }
    } else if let Err(e) = save_calendar(&calendar) {
        if !silent { eprintln!("Failed to save calendar: {}", e); }
    } else if !silent {
        println!("Removed {} from the calendar.", parsed);
    }
}

/// Lists the configured working days.
pub fn cmd_calendar_list() {
    let mut calendar = load_calendar();
    if calendar.is_empty() {
        println!("No working-day calendar configured; every day counts as a working day.");
        return;
    }
    calendar.sort();
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(vec!["Working Day", "Weekday"]);
    for d in calendar {
        table.add_row(vec![d.to_string(), d.weekday().to_string()]);
    }
    println!("{table}");
}

/// Clears the working-day calendar.
pub fn cmd_calendar_clear(silent: bool) {
    if let Err(e) = save_calendar(&[]) {
        if !silent { eprintln!("Failed to save calendar: {}", e); }
    } else if !silent {
        println!("Calendar cleared.");
    }
}

/// Adds a department to the configured list.
pub fn cmd_department_add(name: String, silent: bool) {
    let mut departments = load_departments();
    if departments.contains(&name) {
        if !silent { eprintln!("Department '{}' already exists.", name); }
        return;
    }
    departments.push(name.clone());
    departments.sort();
    if let Err(e) = save_departments(&departments) {
        if !silent { eprintln!("Failed to save departments: {}", e); }
    } else if !silent {
        println!("Department '{}' added.", name);
    }
}

/// Lists the configured departments.
pub fn cmd_department_list() {
    let departments = load_departments();
    if departments.is_empty() {
        println!("No departments configured; any department name is accepted.");
        return;
    }
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(vec!["Department"]);
    for d in departments {
        table.add_row(vec![d]);
    }
    println!("{table}");
}

/// Removes a department from the configured list.
///
/// Existing instances keep their department name for history.
pub fn cmd_department_remove(name: String, silent: bool) {
    let mut departments = load_departments();
    let len_before = departments.len();
    departments.retain(|d| *d != name);
    if departments.len() == len_before {
        if !silent { eprintln!("Department '{}' not found.", name); }
    } else if let Err(e) = save_departments(&departments) {
        if !silent { eprintln!("Failed to save departments: {}", e); }
    } else if !silent {
        println!("Department '{}' removed.", name);
    }
}

/// Prints per-department completion counts.
pub fn cmd_report() {
    let instances = load_instances();
    if instances.is_empty() {
        println!("No task instances found.");
        return;
    }

    let mut departments: Vec<String> =
        instances.iter().map(|t| t.department.clone()).collect();
    departments.sort();
    departments.dedup();

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec![
            Cell::new("Department").add_attribute(Attribute::Bold),
            Cell::new("Pending").add_attribute(Attribute::Bold),
            Cell::new("Awaiting").add_attribute(Attribute::Bold),
            Cell::new("Completed").add_attribute(Attribute::Bold),
            Cell::new("Rejected").add_attribute(Attribute::Bold),
            Cell::new("Total").add_attribute(Attribute::Bold),
        ]);

    for dept in departments {
        let in_dept: Vec<&TaskInstance> =
            instances.iter().filter(|t| t.department == dept).collect();
        let count = |s: TaskStatus| in_dept.iter().filter(|t| t.status == s).count();
        table.add_row(vec![
            Cell::new(dept),
            Cell::new(count(TaskStatus::Pending)),
            Cell::new(count(TaskStatus::PendingApproval)),
            Cell::new(count(TaskStatus::Completed)).fg(Color::Green),
            Cell::new(count(TaskStatus::Rejected)).fg(Color::Red),
            Cell::new(in_dept.len()),
        ]);
    }

    println!("{table}");
}

/// Resets the database by deleting all instances, the calendar, and the
/// department list.
pub fn cmd_reset(force: bool) {
    if !force {
        print!("Are you sure you want to delete all task instances, the calendar, and the departments? This cannot be undone. [y/N] ");
        io::stdout().flush().unwrap();
        let mut input = String::new();
        io::stdin().read_line(&mut input).unwrap();
        if input.trim().to_lowercase() != "y" {
            println!("Aborted.");
            return;
        }
    }

    if let Err(e) = delete_database() {
        eprintln!("Failed to reset database: {}", e);
    } else {
        println!("Database reset successfully.");
    }
}

fn print_instance_table(instances: &[TaskInstance]) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("#").add_attribute(Attribute::Bold),
            Cell::new("Due").add_attribute(Attribute::Bold),
            Cell::new("Weekday").add_attribute(Attribute::Bold),
            Cell::new("Assignee").add_attribute(Attribute::Bold),
            Cell::new("Status").add_attribute(Attribute::Bold),
        ]);
    for (i, t) in instances.iter().enumerate() {
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(t.due_date),
            Cell::new(t.due_date.weekday()),
            Cell::new(&t.assignee),
            Cell::new(t.status.to_string()).fg(status_color(t.status)),
        ]);
    }
    println!("{table}");
}
