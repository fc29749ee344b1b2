//! Runtime configuration from environment variables and CLI flags

use crate::analytics_core::DEFAULT_TOP_N;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

pub const DEFAULT_CSV_PATH: &str = "ad_data.csv.zip";
pub const DEFAULT_EXPORT_DIR: &str = "export";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportBackend {
    Csv,
    Jsonl,
    Sqlite,
}

impl ExportBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportBackend::Csv => "csv",
            ExportBackend::Jsonl => "jsonl",
            ExportBackend::Sqlite => "sqlite",
        }
    }

}

impl FromStr for ExportBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "csv" => Ok(ExportBackend::Csv),
            "jsonl" => Ok(ExportBackend::Jsonl),
            "sqlite" => Ok(ExportBackend::Sqlite),
            _ => Err(invalid("backend", s)),
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing value for {0}")]
    MissingValue(String),

    #[error("Invalid value for {name}: '{value}'")]
    InvalidValue { name: String, value: String },

    #[error("Unsupported input file {0} (only .csv and .zip are supported)")]
    UnsupportedInput(PathBuf),
}

/// Configuration for one analysis run
///
/// Environment variables (a `.env` file is honoured by the binary):
/// - `ADS_CSV_PATH` (.csv or .zip, default: ad_data.csv.zip)
/// - `ADS_EXPORT_DIR` (default: export)
/// - `ADS_TOP_N` (default: 10)
/// - `ADS_SHARDS` (default: 1)
/// - `ADS_EXPORT_BACKEND` (csv | jsonl | sqlite, default: csv)
/// - `ADS_PRINT_REPORT` (default: true)
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyticsConfig {
    pub csv_path: PathBuf,
    pub export_dir: PathBuf,
    pub top_n: usize,
    pub shards: usize,
    pub backend: ExportBackend,
    pub print_report: bool,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            csv_path: PathBuf::from(DEFAULT_CSV_PATH),
            export_dir: PathBuf::from(DEFAULT_EXPORT_DIR),
            top_n: DEFAULT_TOP_N,
            shards: 1,
            backend: ExportBackend::Csv,
            print_report: true,
        }
    }
}

impl AnalyticsConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build from any variable lookup; unparsable values fall back to defaults
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let backend = match lookup("ADS_EXPORT_BACKEND") {
            Some(value) => value.parse::<ExportBackend>().unwrap_or_else(|_| {
                log::warn!("Invalid ADS_EXPORT_BACKEND '{}', defaulting to csv", value);
                ExportBackend::Csv
            }),
            None => defaults.backend,
        };

        Self {
            csv_path: lookup("ADS_CSV_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.csv_path),
            export_dir: lookup("ADS_EXPORT_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.export_dir),
            top_n: lookup("ADS_TOP_N")
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(defaults.top_n),
            shards: lookup("ADS_SHARDS")
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(defaults.shards),
            backend,
            print_report: lookup("ADS_PRINT_REPORT")
                .and_then(|s| s.trim().to_lowercase().parse().ok())
                .unwrap_or(defaults.print_report),
        }
    }

    /// Override values with CLI flags (program name already stripped)
    ///
    /// Flags: `--csv <path>`, `--export-dir <dir>`, `--backend <csv|jsonl|sqlite>`,
    /// `--top-n <n>`, `--shards <n>`, `--no-report`
    pub fn apply_args<I>(mut self, args: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = String>,
    {
        let mut args = args.into_iter();

        while let Some(flag) = args.next() {
            let mut value = || args.next().ok_or_else(|| ConfigError::MissingValue(flag.clone()));

            match flag.as_str() {
                "--csv" => self.csv_path = PathBuf::from(value()?),
                "--export-dir" => self.export_dir = PathBuf::from(value()?),
                "--backend" => {
                    let raw = value()?;
                    self.backend = raw.parse::<ExportBackend>().map_err(|_| invalid(&flag, &raw))?;
                }
                "--top-n" => {
                    let raw = value()?;
                    self.top_n = raw.parse().map_err(|_| invalid(&flag, &raw))?;
                }
                "--shards" => {
                    let raw = value()?;
                    self.shards = raw.parse().map_err(|_| invalid(&flag, &raw))?;
                }
                "--no-report" => self.print_report = false,
                other => log::warn!("Ignoring unknown argument: {}", other),
            }
        }

        Ok(self)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let supported = self
            .csv_path
            .extension()
            .and_then(|ext| ext.to_str())
            .map_or(false, |ext| {
                ext.eq_ignore_ascii_case("csv") || ext.eq_ignore_ascii_case("zip")
            });

        if !supported {
            return Err(ConfigError::UnsupportedInput(self.csv_path.clone()));
        }

        if self.shards == 0 {
            return Err(invalid("shards", "0"));
        }

        Ok(())
    }
}

fn invalid(name: &str, value: &str) -> ConfigError {
    ConfigError::InvalidValue {
        name: name.to_string(),
        value: value.to_string(),
    }
}
