use std::fs::{self, OpenOptions};
use std::io::{Read, Write};
use std::path::PathBuf;

use chrono::{Local, NaiveDate};

use crate::models::TaskInstance;

/// Returns the path to the instances database file (`instances.json`).
///
/// The path is determined in the following order:
/// 1. `DELEGUST_DB` environment variable.
/// 2. `~/.local/share/delegust/instances.json` (on Linux).
/// 3. `./instances.json` (fallback).
fn db_path() -> PathBuf {
    std::env::var("DELEGUST_DB").map(PathBuf::from).unwrap_or_else(|_| {
        let mut p = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
        p.push("delegust");
        if !p.exists() {
            let _ = fs::create_dir_all(&p);
        }
        p.push("instances.json");
        p
    })
}

/// Returns the path to the working-day calendar file (`calendar.json`).
///
/// Located in the same directory as the instances database.
fn calendar_path() -> PathBuf {
    let mut p = db_path();
    p.pop();
    p.push("calendar.json");
    p
}

/// Returns the path to the departments file (`departments.json`).
///
/// Located in the same directory as the instances database.
fn departments_path() -> PathBuf {
    let mut p = db_path();
    p.pop();
    p.push("departments.json");
    p
}

fn read_json<T: serde::de::DeserializeOwned>(path: &PathBuf) -> Option<T> {
    if !path.exists() {
        return None;
    }
    let mut f = OpenOptions::new().read(true).open(path).ok()?;
    let mut s = String::new();
    f.read_to_string(&mut s).ok()?;
    serde_json::from_str(&s).ok()
}

fn write_json<T: serde::Serialize>(path: &PathBuf, value: &T) -> std::io::Result<()> {
    let s = serde_json::to_string_pretty(value)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
    let mut f = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(path)?;
    f.write_all(s.as_bytes())?;
    Ok(())
}

/// Loads a single task instance by its ID.
///
/// Returns `None` if the instance is not found.
pub fn load_instance(id: u64) -> Option<TaskInstance> {
    load_instances().into_iter().find(|t| t.id == id)
}

/// Loads all task instances from the storage file.
///
/// Returns an empty vector if the file does not exist or cannot be read.
pub fn load_instances() -> Vec<TaskInstance> {
    read_json(&db_path()).unwrap_or_default()
}

/// Saves the given list of instances to the storage file.
///
/// Overwrites the existing file.
pub fn save_instances(instances: &[TaskInstance]) -> std::io::Result<()> {
    write_json(&db_path(), &instances)
}

/// Saves or updates a single instance in the storage file.
///
/// If an instance with the same ID exists, it is updated; otherwise it is
/// added.
pub fn save_instance(instance: &TaskInstance) -> std::io::Result<()> {
    let mut instances = load_instances();
    if let Some(t) = instances.iter_mut().find(|t| t.id == instance.id) {
        *t = instance.clone();
    } else {
        instances.push(instance.clone());
    }
    save_instances(&instances)
}

/// Inserts freshly generated instances, assigning sequential IDs and a
/// created-at stamp. Returns the IDs assigned.
pub fn insert_instances(mut new_instances: Vec<TaskInstance>) -> std::io::Result<Vec<u64>> {
    let mut instances = load_instances();
    let mut next_id = instances.iter().map(|t| t.id).max().unwrap_or(0) + 1;
    let now = Local::now().to_rfc3339();
    let mut assigned = Vec::with_capacity(new_instances.len());
    for inst in new_instances.iter_mut() {
        inst.id = next_id;
        inst.created_at = Some(now.clone());
        assigned.push(next_id);
        next_id += 1;
    }
    instances.extend(new_instances);
    save_instances(&instances)?;
    Ok(assigned)
}

/// Loads the working-day calendar dates.
pub fn load_calendar() -> Vec<NaiveDate> {
    read_json(&calendar_path()).unwrap_or_default()
}

/// Saves the working-day calendar dates.
pub fn save_calendar(dates: &[NaiveDate]) -> std::io::Result<()> {
    write_json(&calendar_path(), &dates)
}

/// Loads the configured department names.
pub fn load_departments() -> Vec<String> {
    read_json(&departments_path()).unwrap_or_default()
}

/// Saves the configured department names.
pub fn save_departments(departments: &[String]) -> std::io::Result<()> {
    write_json(&departments_path(), &departments)
}

/// Deletes the instances, calendar, and departments database files.
pub fn delete_database() -> std::io::Result<()> {
    for path in [db_path(), calendar_path(), departments_path()] {
        if path.exists() {
            fs::remove_file(path)?;
        }
    }
    Ok(())
}
