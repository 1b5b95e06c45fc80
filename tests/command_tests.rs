use std::env;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

use delegust::commands::*;
use delegust::models::TaskStatus;
use delegust::storage::{load_calendar, load_departments, load_instances};

// Use a mutex to ensure tests run serially since they modify the environment
// variable.
static TEST_MUTEX: Mutex<()> = Mutex::new(());

fn with_test_db<F>(test_name: &str, f: F)
where
    F: FnOnce(PathBuf),
{
    let _guard = TEST_MUTEX.lock().unwrap();

    let mut dir = env::temp_dir();
    dir.push(format!("delegust_test_{}", test_name));
    if dir.exists() {
        fs::remove_dir_all(&dir).unwrap();
    }
    fs::create_dir_all(&dir).unwrap();

    let mut db_path = dir.clone();
    db_path.push("instances.json");
    env::set_var("DELEGUST_DB", db_path.to_str().unwrap());

    f(db_path);

    if dir.exists() {
        fs::remove_dir_all(&dir).unwrap();
    }
    env::remove_var("DELEGUST_DB");
}

fn delegate_once(title: &str, freq: &str, anchor: &str, attachment_required: bool) {
    cmd_delegate(
        title.into(),
        "Walk all exits".into(),
        "Safety".into(),
        "alice".into(),
        "bob".into(),
        freq.into(),
        Some(anchor.into()),
        None,
        false,
        attachment_required,
        false,
        true,
    );
}

#[test]
fn test_delegate_and_list() {
    with_test_db("delegate_list", |_path| {
        delegate_once("Fire-exit check", "once", "2025-09-01", false);

        let instances = load_instances();
        assert_eq!(instances.len(), 1);
        assert_eq!(instances[0].id, 1);
        assert_eq!(instances[0].title, "Fire-exit check");
        assert_eq!(instances[0].department, "Safety");
        assert_eq!(instances[0].status, TaskStatus::Pending);
        assert!(instances[0].created_at.is_some());
    });
}

#[test]
fn test_delegate_quarterly_assigns_ascending_ids() {
    with_test_db("quarterly_ids", |_path| {
        delegate_once("Deep clean", "quarterly", "2025-01-15", false);

        let instances = load_instances();
        assert_eq!(instances.len(), 4);
        let ids: Vec<u64> = instances.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);
        for pair in instances.windows(2) {
            assert!(pair[0].due_date <= pair[1].due_date);
        }
    });
}

#[test]
fn test_preview_persists_nothing() {
    with_test_db("preview", |_path| {
        cmd_delegate(
            "Stock take".into(),
            "Full inventory count".into(),
            "Store".into(),
            "alice".into(),
            "bob".into(),
            "monthly".into(),
            Some("2025-01-15".into()),
            None,
            false,
            false,
            true,
            true,
        );
        assert!(load_instances().is_empty());
    });
}

#[test]
fn test_delegate_same_assignee_commits_nothing() {
    with_test_db("same_assignee", |_path| {
        cmd_delegate(
            "Fire-exit check".into(),
            "Walk all exits".into(),
            "Safety".into(),
            "alice".into(),
            "alice".into(),
            "daily".into(),
            Some("2025-09-01".into()),
            None,
            false,
            false,
            false,
            true,
        );
        assert!(load_instances().is_empty());
    });
}

#[test]
fn test_delegate_end_of_week_uses_anchor_month() {
    with_test_db("end_of_week", |_path| {
        cmd_delegate(
            "Stock take".into(),
            "Full inventory count".into(),
            "Store".into(),
            "alice".into(),
            "bob".into(),
            "1st-week".into(),
            None,
            Some("2025-03".into()),
            false,
            false,
            false,
            true,
        );
        let instances = load_instances();
        assert_eq!(instances.len(), 1);
        assert_eq!(instances[0].due_date.to_string(), "2025-03-01");
    });
}

#[test]
fn test_approval_workflow() {
    with_test_db("workflow", |_path| {
        delegate_once("Fire-exit check", "once", "2025-09-01", false);
        let id = load_instances()[0].id;

        cmd_complete(id, Some("All clear".into()), None, true);
        let t = load_instances().into_iter().find(|t| t.id == id).unwrap();
        assert_eq!(t.status, TaskStatus::PendingApproval);
        assert_eq!(t.remarks, Some("All clear".into()));
        assert!(t.completed_at.is_some());

        cmd_approve(id, true);
        let t = load_instances().into_iter().find(|t| t.id == id).unwrap();
        assert_eq!(t.status, TaskStatus::Completed);
    });
}

#[test]
fn test_reject_and_reopen() {
    with_test_db("reject_reopen", |_path| {
        delegate_once("Fire-exit check", "once", "2025-09-01", false);
        let id = load_instances()[0].id;

        cmd_complete(id, None, None, true);
        cmd_reject(id, Some("Photo is blurry".into()), true);
        let t = load_instances().into_iter().find(|t| t.id == id).unwrap();
        assert_eq!(t.status, TaskStatus::Rejected);
        assert_eq!(t.remarks, Some("Photo is blurry".into()));

        cmd_reopen(id, true);
        let t = load_instances().into_iter().find(|t| t.id == id).unwrap();
        assert_eq!(t.status, TaskStatus::Pending);
        assert!(t.remarks.is_none());
        assert!(t.completed_at.is_none());

        // The loop closes: a reopened task can be submitted again.
        cmd_complete(id, None, None, true);
        let t = load_instances().into_iter().find(|t| t.id == id).unwrap();
        assert_eq!(t.status, TaskStatus::PendingApproval);
    });
}

#[test]
fn test_out_of_order_transitions_do_not_mutate() {
    with_test_db("bad_transitions", |_path| {
        delegate_once("Fire-exit check", "once", "2025-09-01", false);
        let id = load_instances()[0].id;

        // Approve before completion: still pending.
        cmd_approve(id, true);
        assert_eq!(load_instances()[0].status, TaskStatus::Pending);

        // Reopen a task that was never rejected: still pending.
        cmd_reopen(id, true);
        assert_eq!(load_instances()[0].status, TaskStatus::Pending);

        // Double completion: second submit is refused.
        cmd_complete(id, None, None, true);
        cmd_complete(id, Some("again".into()), None, true);
        let t = load_instances().into_iter().find(|t| t.id == id).unwrap();
        assert_eq!(t.status, TaskStatus::PendingApproval);
        assert!(t.remarks.is_none());
    });
}

#[test]
fn test_attachment_required_enforced() {
    with_test_db("attachment", |_path| {
        delegate_once("Fridge temperature log", "once", "2025-09-01", true);
        let id = load_instances()[0].id;

        cmd_complete(id, None, None, true);
        assert_eq!(load_instances()[0].status, TaskStatus::Pending);

        cmd_complete(id, None, Some("/photos/gauge.jpg".into()), true);
        let t = load_instances().into_iter().find(|t| t.id == id).unwrap();
        assert_eq!(t.status, TaskStatus::PendingApproval);
        assert_eq!(t.attachment, Some("/photos/gauge.jpg".into()));
    });
}

#[test]
fn test_calendar_management_and_alignment() {
    with_test_db("calendar", |_path| {
        cmd_calendar_add(
            vec!["2025-09-03".into(), "2025-09-01".into(), "2025-09-03".into()],
            true,
        );
        assert_eq!(load_calendar().len(), 2);

        // Anchor falls on a non-working day and snaps forward.
        delegate_once("Fire-exit check", "once", "2025-09-02", false);
        assert_eq!(load_instances()[0].due_date.to_string(), "2025-09-03");

        cmd_calendar_remove("2025-09-03".into(), true);
        assert_eq!(load_calendar().len(), 1);

        cmd_calendar_clear(true);
        assert!(load_calendar().is_empty());
    });
}

#[test]
fn test_department_list_gates_delegation() {
    with_test_db("departments", |_path| {
        cmd_department_add("Kitchen".into(), true);
        cmd_department_add("Safety".into(), true);
        assert_eq!(load_departments(), vec!["Kitchen".to_string(), "Safety".to_string()]);

        // "Safety" is configured, so this goes through.
        delegate_once("Fire-exit check", "once", "2025-09-01", false);
        assert_eq!(load_instances().len(), 1);

        cmd_department_remove("Safety".into(), true);
        delegate_once("Another check", "once", "2025-09-02", false);
        // Department no longer configured: refused.
        assert_eq!(load_instances().len(), 1);
    });
}

#[test]
fn test_remove_instance() {
    with_test_db("remove", |_path| {
        delegate_once("Fire-exit check", "once", "2025-09-01", false);
        let id = load_instances()[0].id;

        cmd_remove(id, true);
        assert!(load_instances().is_empty());
    });
}

#[test]
fn test_ids_continue_after_existing_instances() {
    with_test_db("id_sequence", |_path| {
        delegate_once("First", "once", "2025-09-01", false);
        delegate_once("Second", "once", "2025-09-02", false);

        let instances = load_instances();
        assert_eq!(instances.len(), 2);
        assert_eq!(instances[0].id, 1);
        assert_eq!(instances[1].id, 2);
    });
}
