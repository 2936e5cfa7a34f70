// 🗄️ Record Store - append / query / delete BMI records by owner name
//
// CsvStore keeps every record in one CSV table and rewrites the whole file on
// each change. It assumes a single writer: there is no file locking, and two
// processes appending at once can lose a record.

use crate::error::{BmiError, Result};
use crate::record::{name_key, normalize_name, BmiRecord, COLUMNS};
use log::{debug, info, warn};
use std::collections::HashSet;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

// ============================================================================
// STORE INTERFACE
// ============================================================================

pub trait RecordStore {
    /// Create the backing table (header only) if it is missing or empty. Idempotent.
    fn ensure_initialized(&self) -> Result<()>;

    /// Add one record at the end of the store
    fn append(&mut self, record: BmiRecord) -> Result<()>;

    /// Every record in insertion order
    fn load_all(&self) -> Result<Vec<BmiRecord>>;

    /// Records whose name matches case-insensitively, in insertion order.
    /// No match is an empty Vec, not an error.
    fn query_by_name(&self, name: &str) -> Result<Vec<BmiRecord>> {
        let name = normalize_name(name)?;
        Ok(self
            .load_all()?
            .into_iter()
            .filter(|r| r.belongs_to(&name))
            .collect())
    }

    /// Remove EVERY record owned by `name` (case-insensitive) and return how
    /// many were removed. Irreversible; callers confirm with the user first.
    /// Returns 0 and leaves the store untouched when nothing matches.
    fn delete_by_name(&mut self, name: &str) -> Result<usize>;

    /// Distinct owner names, first spelling seen, in first-appearance order
    fn known_names(&self) -> Result<Vec<String>> {
        let mut seen = HashSet::new();
        Ok(self
            .load_all()?
            .into_iter()
            .filter(|r| seen.insert(name_key(r.name())))
            .map(|r| r.name().to_string())
            .collect())
    }
}

// ============================================================================
// CSV FILE STORE
// ============================================================================

#[derive(Debug, Clone)]
pub struct CsvStore {
    path: PathBuf,
}

impl CsvStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        CsvStore { path: path.into() }
    }

    /// Open and initialize in one step
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let store = Self::new(path);
        store.ensure_initialized()?;
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<Vec<BmiRecord>> {
        self.ensure_initialized()?;

        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_path(&self.path)
            .map_err(|e| BmiError::from_csv(&self.path, e))?;

        let mut records = Vec::new();
        for result in rdr.deserialize() {
            let record: BmiRecord = result.map_err(|e| BmiError::from_csv(&self.path, e))?;
            records.push(record);
        }

        Ok(records)
    }

    /// Serialize the full table in memory, then swap it in atomically
    fn write_all(&self, records: &[BmiRecord]) -> Result<()> {
        let mut wtr = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(Vec::new());

        wtr.write_record(COLUMNS)
            .map_err(|e| BmiError::from_csv(&self.path, e))?;
        for record in records {
            wtr.serialize(record)
                .map_err(|e| BmiError::from_csv(&self.path, e))?;
        }

        let data = wtr
            .into_inner()
            .map_err(|e| BmiError::io(&self.path, io::Error::new(io::ErrorKind::Other, e.to_string())))?;

        if let Err(e) = atomic_write(&self.path, &data) {
            warn!("Rewrite of {:?} failed, previous file kept: {}", self.path, e);
            return Err(BmiError::io(&self.path, e));
        }

        debug!("Wrote {} records to {:?}", records.len(), self.path);
        Ok(())
    }
}

/// `<file name>.tmp` next to `path`
fn temp_path(path: &Path) -> io::Result<PathBuf> {
    let mut name = path
        .file_name()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "data path has no file name"))?
        .to_os_string();
    name.push(".tmp");
    Ok(path.with_file_name(name))
}

/// Write `data` to a `.tmp` sibling, sync it, then rename over `path`
fn atomic_write(path: &Path, data: &[u8]) -> io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let tmp = temp_path(path)?;
    let result = File::create(&tmp)
        .and_then(|mut file| {
            file.write_all(data)?;
            file.sync_all()
        })
        .and_then(|_| fs::rename(&tmp, path));

    if result.is_err() {
        let _ = fs::remove_file(&tmp);
    }
    result
}

impl RecordStore for CsvStore {
    fn ensure_initialized(&self) -> Result<()> {
        match fs::metadata(&self.path) {
            Ok(meta) if meta.len() > 0 => return Ok(()),
            Ok(_) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(BmiError::io(&self.path, e)),
        }

        debug!("Initializing empty BMI table at {:?}", self.path);
        self.write_all(&[])
    }

    fn append(&mut self, record: BmiRecord) -> Result<()> {
        let mut records = self.read_all()?;
        debug!(
            "Appending record for '{}' (BMI {:.2}) as row {}",
            record.name(),
            record.bmi(),
            records.len() + 1
        );
        records.push(record);
        self.write_all(&records)
    }

    fn load_all(&self) -> Result<Vec<BmiRecord>> {
        self.read_all()
    }

    fn delete_by_name(&mut self, name: &str) -> Result<usize> {
        let name = normalize_name(name)?;
        let records = self.read_all()?;
        let total = records.len();

        let kept: Vec<BmiRecord> = records.into_iter().filter(|r| !r.belongs_to(&name)).collect();
        let removed = total - kept.len();

        if removed == 0 {
            return Ok(0);
        }

        self.write_all(&kept)?;
        info!("Deleted {} records for '{}' from {:?}", removed, name, self.path);
        Ok(removed)
    }
}

// ============================================================================
// IN-MEMORY STORE
// ============================================================================

/// Non-durable store with the same semantics as `CsvStore`
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    records: Vec<BmiRecord>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl RecordStore for MemoryStore {
    fn ensure_initialized(&self) -> Result<()> {
        Ok(())
    }

    fn append(&mut self, record: BmiRecord) -> Result<()> {
        self.records.push(record);
        Ok(())
    }

    fn load_all(&self) -> Result<Vec<BmiRecord>> {
        Ok(self.records.clone())
    }

    fn delete_by_name(&mut self, name: &str) -> Result<usize> {
        let name = normalize_name(name)?;
        let before = self.records.len();
        self.records.retain(|r| !r.belongs_to(&name));
        Ok(before - self.records.len())
    }
}
