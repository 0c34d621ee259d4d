//! File-backed document collections.
//!
//! Each collection is one JSON file under the data directory holding the
//! full record set. Subscribers get the whole set again after every change.

use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::watch;

use crate::error::{MomentsError, MomentsResult};

/// A record kept in a `Collection`.
pub trait Record: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// File stem of the collection, e.g. "desires"
    const COLLECTION: &'static str;

    fn id(&self) -> &str;
    fn set_id(&mut self, id: String);
}

pub struct Collection<T: Record> {
    path: PathBuf,
    records: watch::Sender<Vec<T>>,
}

impl<T: Record> Collection<T> {
    /// Open (or start) the collection stored under `data_dir`.
    pub fn open(data_dir: &Path) -> MomentsResult<Self> {
        let path = data_dir.join(format!("{}.json", T::COLLECTION));

        let records: Vec<T> = if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            serde_json::from_str(&content).map_err(|e| {
                MomentsError::Store(format!("Failed to parse {}: {}", path.display(), e))
            })?
        } else {
            Vec::new()
        };

        let (records, _) = watch::channel(records);
        Ok(Collection { path, records })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Store a new record under a fresh id and return the id.
    pub fn add(&self, mut record: T) -> MomentsResult<String> {
        let id = uuid::Uuid::new_v4().to_string();
        record.set_id(id.clone());

        let mut records = self.get_all();
        records.push(record);
        self.commit(records)?;

        tracing::debug!(collection = T::COLLECTION, %id, "record added");
        Ok(id)
    }

    pub fn get_all(&self) -> Vec<T> {
        self.records.borrow().clone()
    }

    pub fn get(&self, id: &str) -> Option<T> {
        self.records.borrow().iter().find(|r| r.id() == id).cloned()
    }

    /// Apply `change` to the record with `id`. The id itself can't change.
    pub fn update<F>(&self, id: &str, change: F) -> MomentsResult<()>
    where
        F: FnOnce(&mut T),
    {
        let mut records = self.get_all();
        let record = records
            .iter_mut()
            .find(|r| r.id() == id)
            .ok_or_else(|| MomentsError::NotFound(format!("{} record {}", T::COLLECTION, id)))?;

        change(record);
        record.set_id(id.to_string());

        self.commit(records)
    }

    pub fn delete(&self, id: &str) -> MomentsResult<()> {
        let mut records = self.get_all();
        let before = records.len();
        records.retain(|r| r.id() != id);

        if records.len() == before {
            return Err(MomentsError::NotFound(format!(
                "{} record {}",
                T::COLLECTION,
                id
            )));
        }

        self.commit(records)
    }

    pub fn clear(&self) -> MomentsResult<()> {
        self.commit(Vec::new())
    }

    /// Receive the full record set after every change.
    pub fn subscribe(&self) -> watch::Receiver<Vec<T>> {
        self.records.subscribe()
    }

    fn commit(&self, records: Vec<T>) -> MomentsResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(&records)?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, content)?;
        std::fs::rename(&tmp, &self.path)?;

        self.records.send_replace(records);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Note {
        #[serde(default)]
        id: String,
        text: String,
    }

    impl Record for Note {
        const COLLECTION: &'static str = "notes";

        fn id(&self) -> &str {
            &self.id
        }

        fn set_id(&mut self, id: String) {
            self.id = id;
        }
    }

    fn note(text: &str) -> Note {
        Note {
            id: String::new(),
            text: text.to_string(),
        }
    }

    #[test]
    fn add_assigns_ids_and_persists() {
        let dir = tempfile::tempdir().unwrap();
        let notes = Collection::<Note>::open(dir.path()).unwrap();

        let first = notes.add(note("first")).unwrap();
        let second = notes.add(note("second")).unwrap();
        assert_ne!(first, second);

        let reopened = Collection::<Note>::open(dir.path()).unwrap();
        let texts: Vec<_> = reopened.get_all().into_iter().map(|n| n.text).collect();
        assert_eq!(texts, vec!["first", "second"]);
        assert_eq!(reopened.get(&first).unwrap().text, "first");
    }

    #[test]
    fn update_and_delete_by_id() {
        let dir = tempfile::tempdir().unwrap();
        let notes = Collection::<Note>::open(dir.path()).unwrap();
        let id = notes.add(note("draft")).unwrap();

        notes
            .update(&id, |n| {
                n.text = "final".to_string();
                n.id = "hijacked".to_string();
            })
            .unwrap();
        assert_eq!(notes.get(&id).unwrap().text, "final");

        notes.delete(&id).unwrap();
        assert!(notes.get_all().is_empty());
    }

    #[test]
    fn unknown_ids_are_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let notes = Collection::<Note>::open(dir.path()).unwrap();

        assert!(matches!(notes.delete("missing"), Err(MomentsError::NotFound(_))));
        assert!(matches!(
            notes.update("missing", |_| {}),
            Err(MomentsError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn subscribers_receive_full_set_on_change() {
        let dir = tempfile::tempdir().unwrap();
        let notes = Collection::<Note>::open(dir.path()).unwrap();
        let mut rx = notes.subscribe();

        notes.add(note("one")).unwrap();
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update().len(), 1);

        notes.add(note("two")).unwrap();
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update().len(), 2);

        notes.clear().unwrap();
        rx.changed().await.unwrap();
        assert!(rx.borrow_and_update().is_empty());
    }

    #[test]
    fn corrupt_file_is_a_store_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("notes.json"), "not json").unwrap();

        assert!(matches!(
            Collection::<Note>::open(dir.path()),
            Err(MomentsError::Store(_))
        ));
    }
}
