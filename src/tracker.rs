// Tracker - the operations the form and the CLI drive
// form -> classify -> append, plus history / trend / clear by name.

use crate::error::Result;
use crate::record::{normalize_name, BmiRecord, Submission};
use crate::store::RecordStore;
use crate::trend::Trend;

pub struct Tracker<S: RecordStore> {
    store: S,
}

impl<S: RecordStore> Tracker<S> {
    pub fn new(store: S) -> Result<Self> {
        store.ensure_initialized()?;
        Ok(Tracker { store })
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Validate the raw form fields, classify, and persist. Nothing is stored on error.
    pub fn submit(&mut self, name: &str, weight: &str, height: &str) -> Result<BmiRecord> {
        let submission = Submission::parse(name, weight, height)?;
        let record = BmiRecord::from_submission(submission)?;
        self.store.append(record.clone())?;
        Ok(record)
    }

    pub fn history(&self, name: &str) -> Result<Vec<BmiRecord>> {
        self.store.query_by_name(name)
    }

    pub fn trend(&self, name: &str) -> Result<Trend> {
        Ok(Trend::from_records(&self.history(name)?))
    }

    /// Records a `clear` would remove; shown to the user before confirming
    pub fn pending_deletion(&self, name: &str) -> Result<usize> {
        Ok(self.history(name)?.len())
    }

    /// Irreversibly delete every record for `name`
    pub fn clear(&mut self, name: &str) -> Result<usize> {
        let name = normalize_name(name)?;
        self.store.delete_by_name(&name)
    }

    pub fn known_names(&self) -> Result<Vec<String>> {
        self.store.known_names()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::Category;
    use crate::error::BmiError;
    use crate::store::{CsvStore, MemoryStore};
    use tempfile::TempDir;

    #[test]
    fn test_submit_persists_classified_record() {
        let mut tracker = Tracker::new(MemoryStore::new()).unwrap();
        let rec = tracker.submit(" Ada ", "70", "1.75").unwrap();

        assert_eq!(rec.name(), "Ada");
        assert_eq!(rec.bmi(), 22.86);
        assert_eq!(rec.category(), Category::Normal);
        assert_eq!(tracker.history("ada").unwrap(), vec![rec]);
    }

    #[test]
    fn test_failed_submit_stores_nothing() {
        let mut tracker = Tracker::new(MemoryStore::new()).unwrap();

        assert!(matches!(tracker.submit("", "70", "1.75"), Err(BmiError::InvalidName)));
        assert!(matches!(
            tracker.submit("Ada", "seventy", "1.75"),
            Err(BmiError::InvalidMeasurement { field: "weight", .. })
        ));
        assert!(tracker.store().is_empty());
    }

    #[test]
    fn test_clear_then_history_is_empty() {
        let mut tracker = Tracker::new(MemoryStore::new()).unwrap();
        tracker.submit("Ada", "70", "1.75").unwrap();
        tracker.submit("ADA", "71", "1.75").unwrap();
        tracker.submit("Bob", "50", "1.80").unwrap();

        assert_eq!(tracker.pending_deletion("ada").unwrap(), 2);
        assert_eq!(tracker.clear("ada").unwrap(), 2);
        assert!(tracker.history("Ada").unwrap().is_empty());
        assert_eq!(tracker.known_names().unwrap(), vec!["Bob"]);
        assert_eq!(tracker.clear("ada").unwrap(), 0);
    }

    #[test]
    fn test_new_initializes_csv_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bmi_data.csv");

        let mut tracker = Tracker::new(CsvStore::new(&path)).unwrap();
        assert!(path.exists());

        tracker.submit("Ada", "90", "1.70").unwrap();
        let trend = tracker.trend("ada").unwrap();
        assert_eq!(trend.len(), 1);
        assert_eq!(trend.latest().unwrap().category, Category::Obese);
    }
}
