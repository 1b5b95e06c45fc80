use chrono::NaiveDate;

use crate::models::{TaskInstance, TaskStatus, TaskTemplate};

/// Maps a template plus one generated due-date to a persistable instance.
///
/// Copies the template fields verbatim, starts the instance in `Pending`, and
/// leaves completion metadata unset. The id stays 0 until storage assigns a
/// real one on insert.
pub fn build_instance(template: &TaskTemplate, due_date: NaiveDate) -> TaskInstance {
    TaskInstance {
        id: 0,
        title: template.title.clone(),
        description: template.description.clone(),
        department: template.department.clone(),
        delegator: template.delegator.clone(),
        assignee: template.assignee.clone(),
        due_date,
        reminders_enabled: template.reminders_enabled,
        attachment_required: template.attachment_required,
        status: TaskStatus::Pending,
        remarks: None,
        attachment: None,
        completed_at: None,
        created_at: None,
    }
}
