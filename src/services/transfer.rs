//! Moves records between the database and the flat JSON collection files.

use anyhow::Result;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{info, warn};

use crate::db::collections::{ASSIGNMENTS, COURSES, NOTES, USERS};
use crate::db::{JsonCollections, Store};
use crate::domain::{Assignment, Course, Note, UserRecord};

/// Per-collection outcome of an import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportCounts {
    pub imported: usize,
    pub skipped: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub users: ImportCounts,
    pub courses: ImportCounts,
    pub assignments: ImportCounts,
    pub notes: ImportCounts,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExportSummary {
    pub users: usize,
    pub courses: usize,
    pub assignments: usize,
    pub notes: usize,
}

/// Parses raw records, dropping owned records that carry no `userId`.
fn parse_records<T: DeserializeOwned>(
    collection: &str,
    raw: Vec<Value>,
    owned: bool,
    counts: &mut ImportCounts,
) -> Vec<T> {
    raw.into_iter()
        .filter_map(|value| {
            if owned && value.get("userId").is_none_or(Value::is_null) {
                warn!(collection, "Skipping record without userId");
                counts.skipped += 1;
                return None;
            }
            match serde_json::from_value(value) {
                Ok(record) => Some(record),
                Err(e) => {
                    warn!(collection, error = %e, "Skipping malformed record");
                    counts.skipped += 1;
                    None
                }
            }
        })
        .collect()
}

fn tally(counts: &mut ImportCounts, collection: &str, id: &str, outcome: Result<bool>) {
    match outcome {
        Ok(true) => counts.imported += 1,
        Ok(false) => counts.skipped += 1,
        Err(e) => {
            warn!(collection, id, error = %e, "Failed to import record");
            counts.skipped += 1;
        }
    }
}

/// Loads every collection in `source` into the database.
///
/// Records whose id already exists are left untouched.
pub async fn import_collections(store: &Store, source: &JsonCollections) -> Result<ImportSummary> {
    let mut summary = ImportSummary::default();

    let users: Vec<UserRecord> =
        parse_records(USERS, source.load(USERS).await?, false, &mut summary.users);
    for user in &users {
        let outcome = store.users().insert_record(user).await;
        tally(&mut summary.users, USERS, &user.id, outcome);
    }

    let courses: Vec<Course> =
        parse_records(COURSES, source.load(COURSES).await?, true, &mut summary.courses);
    for course in &courses {
        let outcome = store.courses().insert_record(course).await;
        tally(&mut summary.courses, COURSES, &course.id, outcome);
    }

    let assignments: Vec<Assignment> = parse_records(
        ASSIGNMENTS,
        source.load(ASSIGNMENTS).await?,
        true,
        &mut summary.assignments,
    );
    for assignment in &assignments {
        if !store
            .courses()
            .exists(&assignment.user_id, &assignment.course_id)
            .await?
        {
            warn!(
                id = %assignment.id,
                course_id = %assignment.course_id,
                "Skipping assignment whose course is missing"
            );
            summary.assignments.skipped += 1;
            continue;
        }
        let outcome = store.assignments().insert_record(assignment).await;
        tally(&mut summary.assignments, ASSIGNMENTS, &assignment.id, outcome);
    }

    let notes: Vec<Note> = parse_records(NOTES, source.load(NOTES).await?, true, &mut summary.notes);
    for mut note in notes {
        if let Some(course_id) = note.course_id.as_deref()
            && !store.courses().exists(&note.user_id, course_id).await?
        {
            note.course_id = None;
        }
        if let Some(assignment_id) = note.assignment_id.as_deref()
            && !store.assignments().exists(&note.user_id, assignment_id).await?
        {
            note.assignment_id = None;
        }
        let outcome = store.notes().insert_record(&note).await;
        tally(&mut summary.notes, NOTES, &note.id, outcome);
    }

    info!(
        users = summary.users.imported,
        courses = summary.courses.imported,
        assignments = summary.assignments.imported,
        notes = summary.notes.imported,
        "Import finished"
    );

    Ok(summary)
}

/// Writes every table to `target` as JSON collections.
pub async fn export_collections(store: &Store, target: &JsonCollections) -> Result<ExportSummary> {
    let users = store.users().list_records().await?;
    let courses = store.courses().list_all().await?;
    let assignments = store.assignments().list_all().await?;
    let notes = store.notes().list_all().await?;

    target.save(USERS, &users).await?;
    target.save(COURSES, &courses).await?;
    target.save(ASSIGNMENTS, &assignments).await?;
    target.save(NOTES, &notes).await?;

    info!(dir = %target.dir().display(), "Export finished");

    Ok(ExportSummary {
        users: users.len(),
        courses: courses.len(),
        assignments: assignments.len(),
        notes: notes.len(),
    })
}
