// Configuration - where the BMI table lives

use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Environment variable that overrides the data file location
pub const DATA_FILE_ENV: &str = "BMI_DATA_FILE";

/// Default table, relative to the working directory
pub const DEFAULT_DATA_FILE: &str = "bmi_data.csv";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub data_file: PathBuf,
}

impl Config {
    /// Explicit flag wins, then the environment, then the default file name
    pub fn resolve(flag: Option<PathBuf>, env_value: Option<OsString>) -> Self {
        let data_file = flag
            .or_else(|| env_value.filter(|v| !v.is_empty()).map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_FILE));

        Config { data_file }
    }

    /// `resolve` against the real process environment
    pub fn from_env(flag: Option<PathBuf>) -> Self {
        Self::resolve(flag, std::env::var_os(DATA_FILE_ENV))
    }

    pub fn data_file(&self) -> &Path {
        &self.data_file
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_file_name() {
        assert_eq!(Config::resolve(None, None).data_file, PathBuf::from("bmi_data.csv"));
    }

    #[test]
    fn test_env_overrides_default() {
        let cfg = Config::resolve(None, Some(OsString::from("/tmp/other.csv")));
        assert_eq!(cfg.data_file(), Path::new("/tmp/other.csv"));
    }

    #[test]
    fn test_empty_env_is_ignored() {
        let cfg = Config::resolve(None, Some(OsString::new()));
        assert_eq!(cfg.data_file(), Path::new("bmi_data.csv"));
    }

    #[test]
    fn test_flag_overrides_env() {
        let cfg = Config::resolve(
            Some(PathBuf::from("flag.csv")),
            Some(OsString::from("env.csv")),
        );
        assert_eq!(cfg.data_file(), Path::new("flag.csv"));
    }
}
