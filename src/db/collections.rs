//! Flat JSON collection files: one pretty-printed array per record type.
//!
//! The database is the live store. These files are the interchange format
//! read by `import` and written by `export`.

use anyhow::{Context, Result};
use serde::{Serialize, de::DeserializeOwned};
use std::path::{Path, PathBuf};

pub const USERS: &str = "users";
pub const COURSES: &str = "courses";
pub const ASSIGNMENTS: &str = "assignments";
pub const NOTES: &str = "notes";

#[derive(Debug, Clone)]
pub struct JsonCollections {
    dir: PathBuf,
}

impl JsonCollections {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    #[must_use]
    pub fn path_of(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.json"))
    }

    /// Reads a collection. A missing file is an empty collection.
    pub async fn load<T: DeserializeOwned>(&self, name: &str) -> Result<Vec<T>> {
        let path = self.path_of(name);

        let raw = match tokio::fs::read_to_string(&path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read {}", path.display()));
            }
        };

        if raw.trim().is_empty() {
            return Ok(Vec::new());
        }

        serde_json::from_str(&raw).with_context(|| format!("Failed to parse {}", path.display()))
    }

    /// Replaces a collection. Writes a sibling temp file first and renames it
    /// over the target so readers never see a half-written array.
    pub async fn save<T: Serialize + Sync>(&self, name: &str, records: &[T]) -> Result<()> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .with_context(|| format!("Failed to create {}", self.dir.display()))?;

        let path = self.path_of(name);
        let tmp = self.dir.join(format!(".{name}.json.tmp"));

        let body = serde_json::to_string_pretty(records)?;
        tokio::fs::write(&tmp, body)
            .await
            .with_context(|| format!("Failed to write {}", tmp.display()))?;
        tokio::fs::rename(&tmp, &path)
            .await
            .with_context(|| format!("Failed to replace {}", path.display()))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Course, UserId};

    fn temp_dir() -> PathBuf {
        std::env::temp_dir().join(format!("studydesk-collections-{}", uuid::Uuid::new_v4()))
    }

    #[tokio::test]
    async fn missing_collection_is_empty() {
        let store = JsonCollections::new(temp_dir());
        let courses: Vec<Course> = store.load(COURSES).await.unwrap();
        assert!(courses.is_empty());
    }

    #[tokio::test]
    async fn save_replaces_previous_contents() {
        let dir = temp_dir();
        let store = JsonCollections::new(&dir);

        let course = |id: &str| Course {
            id: id.to_string(),
            name: format!("Course {id}"),
            color: None,
            user_id: UserId::new("u1"),
            created_at: None,
            updated_at: None,
        };

        store.save(COURSES, &[course("a"), course("b")]).await.unwrap();
        store.save(COURSES, &[course("c")]).await.unwrap();

        let loaded: Vec<Course> = store.load(COURSES).await.unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].id, "c");
        assert!(!dir.join(".courses.json.tmp").exists());

        let _ = std::fs::remove_dir_all(dir);
    }

    #[tokio::test]
    async fn corrupt_collection_is_an_error() {
        let dir = temp_dir();
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("notes.json"), "[{").unwrap();

        let store = JsonCollections::new(&dir);
        let result: Result<Vec<crate::domain::Note>> = store.load(NOTES).await;
        assert!(result.is_err());

        let _ = std::fs::remove_dir_all(dir);
    }
}
