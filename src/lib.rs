// BMI Tracker - Core Library
// Classifier and record store, used by the TUI and the CLI subcommands

pub mod error;
pub mod classifier;
pub mod record;
pub mod store;
pub mod trend;
pub mod config;
pub mod tracker;

// Re-export commonly used types
pub use error::{BmiError, Result};
pub use classifier::{classify, round2, Category, Classification};
pub use record::{BmiRecord, Submission, COLUMNS, DATE_FORMAT};
pub use store::{CsvStore, MemoryStore, RecordStore};
pub use trend::{Trend, TrendPoint};
pub use config::{Config, DATA_FILE_ENV, DEFAULT_DATA_FILE};
pub use tracker::Tracker;
