//! Domain types for the study tracker with strong typing.
//!
//! Records here double as the JSON wire format (camelCase, matching the
//! flat-file collections), so the API, the database layer and the
//! import/export commands all agree on one shape.

pub mod assignment;
pub mod course;
pub mod note;
pub mod progress;
pub mod stats;
pub mod user;

pub use assignment::{Assignment, AssignmentNote, Difficulty, Task, TaskStatus};
pub use course::Course;
pub use note::Note;
pub use progress::{compute_progress, percentage};
pub use stats::{UserStats, compute_stats};
pub use user::{UserProfile, UserRecord};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of the user that owns a record.
///
/// Every service and repository call takes one of these explicitly; there is
/// no ambient "current user".
///
/// # Examples
///
/// ```rust
/// use studydesk::domain::UserId;
///
/// let id = UserId::new("u-1");
/// assert_eq!(id.as_str(), "u-1");
/// assert_eq!(id.to_string(), "u-1");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for UserId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for UserId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Generates a new record id (uuid v4).
#[must_use]
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Current time as an RFC 3339 string, the timestamp format used in all records.
///
/// Fixed microsecond precision keeps the strings sortable.
#[must_use]
pub fn now_timestamp() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Micros, true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_id_conversions() {
        let id = UserId::from("abc");
        assert_eq!(id.as_str(), "abc");
        assert_eq!(id.to_string(), "abc");
        assert_eq!(id.clone().into_inner(), "abc".to_string());
        assert_eq!(UserId::from("abc".to_string()), id);
    }

    #[test]
    fn user_id_serializes_as_plain_string() {
        let id = UserId::new("42");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"42\"");
        let back: UserId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn generated_ids_are_distinct() {
        let ids: std::collections::HashSet<String> = (0..1000).map(|_| new_id()).collect();
        assert_eq!(ids.len(), 1000);
    }
}
