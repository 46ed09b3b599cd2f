use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::debug;

/// Saved data together with the time it was written.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot<T> {
    pub data: T,
    pub saved_at: DateTime<Utc>,
}

impl<T> Snapshot<T> {
    pub fn new(data: T) -> Self {
        Self {
            data,
            saved_at: Utc::now(),
        }
    }

    pub fn age_minutes(&self) -> i64 {
        (Utc::now() - self.saved_at).num_minutes()
    }

    pub fn age_display(&self) -> String {
        let minutes = self.age_minutes();
        if minutes < 1 {
            // Also covers clock skew
            "just now".to_string()
        } else if minutes < 60 {
            format!("{}m ago", minutes)
        } else if minutes < 1440 {
            let hours = minutes / 60;
            if minutes % 60 >= 30 {
                format!("{}h ago", hours + 1)
            } else {
                format!("{}h ago", hours)
            }
        } else {
            let days = minutes / 1440;
            if (minutes % 1440) / 60 >= 12 {
                format!("{}d ago", days + 1)
            } else {
                format!("{}d ago", days)
            }
        }
    }
}

/// Directory of named JSON snapshots.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    dir: PathBuf,
}

impl SnapshotStore {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create data directory {}", dir.display()))?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{}.json", name))
    }

    pub fn load<T: DeserializeOwned>(&self, name: &str) -> Result<Option<Snapshot<T>>> {
        let path = self.path(name);
        if !path.exists() {
            return Ok(None);
        }

        let contents = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read snapshot: {}", name))?;
        let snapshot: Snapshot<T> = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse snapshot: {}", name))?;

        debug!(name, saved_at = %snapshot.saved_at, "Loaded snapshot");
        Ok(Some(snapshot))
    }

    pub fn save<T: Serialize>(&self, name: &str, data: &T) -> Result<DateTime<Utc>> {
        let snapshot = Snapshot::new(data);
        let path = self.path(name);
        let tmp = self.dir.join(format!("{}.json.tmp", name));
        let contents = serde_json::to_string_pretty(&snapshot)?;
        std::fs::write(&tmp, contents)
            .with_context(|| format!("Failed to write snapshot: {}", name))?;
        std::fs::rename(&tmp, &path)
            .with_context(|| format!("Failed to replace snapshot: {}", name))?;
        debug!(name, "Saved snapshot");
        Ok(snapshot.saved_at)
    }

    pub fn remove(&self, name: &str) -> Result<()> {
        let path = self.path(name);
        if path.exists() {
            std::fs::remove_file(path)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_age_display() {
        let mut snap = Snapshot::new(1);
        assert_eq!(snap.age_display(), "just now");

        snap.saved_at = Utc::now() - Duration::minutes(5);
        assert_eq!(snap.age_display(), "5m ago");

        snap.saved_at = Utc::now() - Duration::minutes(95);
        assert_eq!(snap.age_display(), "2h ago");

        snap.saved_at = Utc::now() - Duration::hours(50);
        assert_eq!(snap.age_display(), "2d ago");

        snap.saved_at = Utc::now() + Duration::minutes(10);
        assert_eq!(snap.age_display(), "just now");
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::new(dir.path().join("nested")).unwrap();
        assert!(store.load::<Vec<i32>>("numbers").unwrap().is_none());

        store.save("numbers", &vec![1, 2, 3]).unwrap();
        let loaded = store.load::<Vec<i32>>("numbers").unwrap().unwrap();
        assert_eq!(loaded.data, vec![1, 2, 3]);
        assert_eq!(loaded.age_display(), "just now");
        assert!(!dir.path().join("nested/numbers.json.tmp").exists());

        store.remove("numbers").unwrap();
        assert!(store.load::<Vec<i32>>("numbers").unwrap().is_none());
    }

    #[test]
    fn test_load_corrupt_snapshot_fails() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::new(dir.path()).unwrap();
        std::fs::write(dir.path().join("bad.json"), "{not json").unwrap();
        assert!(store.load::<Vec<i32>>("bad").is_err());
    }
}
