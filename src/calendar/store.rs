use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use log::{debug, error, info};

use super::error::{StoreError, StoreResult};
use super::event::EventRecord;
use super::grid::shift_month;

/// Notes keyed by date, backed by a single JSON document.
///
/// The document is read once by [`EventStore::load`] and rewritten in full
/// after every [`upsert`](EventStore::upsert) and
/// [`delete`](EventStore::delete).
#[derive(Debug)]
pub struct EventStore {
    path: PathBuf,
    records: BTreeMap<NaiveDate, EventRecord>,
}

impl EventStore {
    /// A store with no records that has not touched the disk yet.
    pub fn empty(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            records: BTreeMap::new(),
        }
    }

    /// Reads the document at `path`. A missing document yields an empty
    /// store; an unreadable or malformed one is an error.
    pub fn load(path: impl Into<PathBuf>) -> StoreResult<Self> {
        let mut store = Self::empty(path);
        store.records = read_document(&store.path)?;
        info!(
            "event=store_load status=ok path={} entries={}",
            store.path.display(),
            store.records.len()
        );
        Ok(store)
    }

    /// Re-reads the document. The in-memory records are kept if reading fails.
    pub fn reload(&mut self) -> StoreResult<()> {
        self.records = read_document(&self.path)?;
        debug!(
            "event=store_reload status=ok entries={}",
            self.records.len()
        );
        Ok(())
    }

    /// Overwrites the document with every record.
    ///
    /// The body goes to a sibling `.tmp` file that is then renamed over the
    /// document, so a failed write leaves the previous document intact.
    pub fn save(&self) -> StoreResult<()> {
        let body = serde_json::to_string_pretty(&self.records).map_err(StoreError::Encode)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| self.write_error(source))?;
        }

        let temp = self.temp_path();
        let written = fs::write(&temp, body).and_then(|()| fs::rename(&temp, &self.path));
        if let Err(source) = written {
            let _ = fs::remove_file(&temp);
            return Err(self.write_error(source));
        }

        debug!(
            "event=store_save status=ok path={} entries={}",
            self.path.display(),
            self.records.len()
        );
        Ok(())
    }

    /// Inserts or replaces the record for `date` and persists.
    ///
    /// On a save error the record stays in memory so a later
    /// [`save`](EventStore::save) can retry.
    pub fn upsert(
        &mut self,
        date: NaiveDate,
        text: impl Into<String>,
        color: Option<String>,
    ) -> StoreResult<()> {
        let record = EventRecord::new(text, color);
        info!(
            "event=store_upsert date={} chars={} color={}",
            date,
            record.text.chars().count(),
            record.color.as_deref().unwrap_or("-")
        );
        self.records.insert(date, record);
        self.save()
    }

    /// Removes the record for `date`, if any, and persists.
    pub fn delete(&mut self, date: NaiveDate) -> StoreResult<Option<EventRecord>> {
        let removed = self.records.remove(&date);
        info!(
            "event=store_delete date={} existed={}",
            date,
            removed.is_some()
        );
        self.save()?;
        Ok(removed)
    }

    pub fn get(&self, date: NaiveDate) -> Option<&EventRecord> {
        self.records.get(&date)
    }

    /// Records dated within the month, ascending by date.
    pub fn list_for_month(&self, year: i32, month: u32) -> Vec<(NaiveDate, &EventRecord)> {
        let Some(start) = NaiveDate::from_ymd_opt(year, month, 1) else {
            return Vec::new();
        };
        let range = match shift_month(start, 1) {
            Some(end) => self.records.range(start..end),
            None => self.records.range(start..),
        };
        range.map(|(date, record)| (*date, record)).collect()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn write_error(&self, source: std::io::Error) -> StoreError {
        error!(
            "event=store_save status=error path={} error={}",
            self.path.display(),
            source
        );
        StoreError::Write {
            path: self.path.clone(),
            source,
        }
    }
}

fn read_document(path: &Path) -> StoreResult<BTreeMap<NaiveDate, EventRecord>> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            info!("event=store_load status=absent path={}", path.display());
            return Ok(BTreeMap::new());
        }
        Err(source) => {
            return Err(StoreError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    if content.trim().is_empty() {
        return Ok(BTreeMap::new());
    }

    serde_json::from_str(&content).map_err(|source| StoreError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn missing_document_loads_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("events.json");

        let store = EventStore::load(&path).unwrap();
        assert!(store.is_empty());
        assert!(!path.exists());
    }

    #[test]
    fn upsert_then_get_returns_record() {
        let dir = tempdir().unwrap();
        let mut store = EventStore::load(dir.path().join("events.json")).unwrap();
        let date = ymd(2024, 3, 9);

        store.upsert(date, "dentist", Some("#ff0000".into())).unwrap();
        assert_eq!(
            store.get(date),
            Some(&EventRecord::new("dentist", Some("#ff0000".into())))
        );

        store.upsert(date, "dentist 10:00", None).unwrap();
        assert_eq!(store.get(date), Some(&EventRecord::new("dentist 10:00", None)));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn delete_then_get_is_absent() {
        let dir = tempdir().unwrap();
        let mut store = EventStore::load(dir.path().join("events.json")).unwrap();
        let date = ymd(2024, 3, 9);

        store.upsert(date, "x", None).unwrap();
        let removed = store.delete(date).unwrap();
        assert_eq!(removed, Some(EventRecord::new("x", None)));
        assert_eq!(store.get(date), None);

        assert_eq!(store.delete(date).unwrap(), None);
    }

    #[test]
    fn list_for_month_filters_and_sorts() {
        let dir = tempdir().unwrap();
        let mut store = EventStore::load(dir.path().join("events.json")).unwrap();
        store.upsert(ymd(2024, 2, 20), "late", None).unwrap();
        store.upsert(ymd(2024, 1, 15), "january", None).unwrap();
        store.upsert(ymd(2024, 2, 1), "early", None).unwrap();
        store.upsert(ymd(2024, 3, 1), "march", None).unwrap();

        let dates: Vec<NaiveDate> = store
            .list_for_month(2024, 2)
            .into_iter()
            .map(|(date, _)| date)
            .collect();
        assert_eq!(dates, vec![ymd(2024, 2, 1), ymd(2024, 2, 20)]);

        let december = store.list_for_month(2023, 12);
        assert!(december.is_empty());
    }

    #[test]
    fn blank_records_are_still_listed() {
        let dir = tempdir().unwrap();
        let mut store = EventStore::load(dir.path().join("events.json")).unwrap();
        store.upsert(ymd(2024, 5, 4), "", None).unwrap();

        let listed = store.list_for_month(2024, 5);
        assert_eq!(listed.len(), 1);
        assert!(listed[0].1.is_blank());
    }

    #[test]
    fn reload_reproduces_saved_records() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("events.json");
        let mut store = EventStore::load(&path).unwrap();
        store.upsert(ymd(2024, 1, 15), "a", Some("blue".into())).unwrap();
        store.upsert(ymd(2024, 2, 1), "", None).unwrap();
        store.upsert(ymd(2025, 12, 31), "multi\nline", Some("#00ff00".into())).unwrap();
        store.save().unwrap();

        let reloaded = EventStore::load(&path).unwrap();
        assert_eq!(reloaded.records, store.records);

        let mut again = EventStore::empty(&path);
        again.reload().unwrap();
        assert_eq!(again.records, store.records);
    }

    #[test]
    fn document_uses_iso_date_keys() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("events.json");
        let mut store = EventStore::load(&path).unwrap();
        store.upsert(ymd(2024, 7, 4), "fireworks", Some("red".into())).unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json["2024-07-04"]["text"], "fireworks");
        assert_eq!(json["2024-07-04"]["color"], "red");
    }

    #[test]
    fn reads_documents_with_empty_colors() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("events.json");
        fs::write(
            &path,
            r#"{"2024-02-01": {"text": "rent", "color": ""}, "2024-02-03": {"text": ""}}"#,
        )
        .unwrap();

        let store = EventStore::load(&path).unwrap();
        assert_eq!(store.get(ymd(2024, 2, 1)), Some(&EventRecord::new("rent", None)));
        assert_eq!(store.list_for_month(2024, 2).len(), 2);
    }

    #[test]
    fn corrupt_document_fails_without_touching_it() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("events.json");
        fs::write(&path, "{ not json").unwrap();

        let err = EventStore::load(&path).unwrap_err();
        assert!(matches!(err, StoreError::Parse { .. }));
        assert!(err.is_load_failure());
        assert_eq!(fs::read_to_string(&path).unwrap(), "{ not json");
    }

    #[test]
    fn bad_date_key_is_a_parse_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("events.json");
        fs::write(&path, r#"{"2024-02-30": {"text": "nope"}}"#).unwrap();

        assert!(matches!(
            EventStore::load(&path),
            Err(StoreError::Parse { .. })
        ));
    }

    #[test]
    fn failed_reload_keeps_records() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("events.json");
        let mut store = EventStore::load(&path).unwrap();
        store.upsert(ymd(2024, 2, 1), "keep", None).unwrap();
        fs::write(&path, "[]").unwrap();

        assert!(store.reload().is_err());
        assert_eq!(store.get(ymd(2024, 2, 1)), Some(&EventRecord::new("keep", None)));
    }

    #[test]
    fn failed_save_keeps_change_in_memory() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("events.json");
        // A directory in the way of the temp file makes every write fail.
        fs::create_dir(dir.path().join("events.json.tmp")).unwrap();
        let mut store = EventStore::empty(&path);
        let date = ymd(2024, 2, 1);

        let err = store.upsert(date, "unsaved", None).unwrap_err();
        assert!(matches!(err, StoreError::Write { .. }));
        assert!(!err.is_load_failure());
        assert_eq!(store.get(date), Some(&EventRecord::new("unsaved", None)));
    }

    #[test]
    fn failed_save_leaves_previous_document_readable() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("events.json");
        let mut store = EventStore::load(&path).unwrap();
        for day in 1..=20 {
            store.upsert(ymd(2024, 3, day), format!("note {day}"), None).unwrap();
        }
        let before = fs::read_to_string(&path).unwrap();

        fs::create_dir(dir.path().join("events.json.tmp")).unwrap();
        let big = "x".repeat(20 * 1024);
        assert!(store.upsert(ymd(2024, 3, 21), big, None).is_err());

        assert_eq!(fs::read_to_string(&path).unwrap(), before);
        let reloaded = EventStore::load(&path).unwrap();
        assert_eq!(reloaded.len(), 20);
        assert_eq!(reloaded.get(ymd(2024, 3, 21)), None);
    }

    #[test]
    fn save_replaces_document_without_leftovers() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("events.json");
        let mut store = EventStore::load(&path).unwrap();
        store.upsert(ymd(2024, 3, 1), "a", None).unwrap();
        store.upsert(ymd(2024, 3, 2), "b", None).unwrap();

        assert!(!dir.path().join("events.json.tmp").exists());
        assert_eq!(EventStore::load(&path).unwrap().len(), 2);
    }
}
