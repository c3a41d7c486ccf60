use std::env;
use std::path::PathBuf;

use anyhow::Result;

pub const DEFAULT_LOG_FILTER: &str = "guardrail_ops=info";
pub const LOG_FILE: &str = "guardrail-ops.log";

/// Runtime configuration loaded from environment variables.
///
/// The .env file is loaded at startup via dotenvy; command-line flags are
/// applied on top by the binary.
#[derive(Debug, Clone)]
pub struct Config {
    /// Holds the preference file and the log file (GUARDRAIL_OPS_DATA_DIR)
    pub data_dir: PathBuf,
    /// Where result snapshots are written (GUARDRAIL_OPS_EXPORT_DIR, defaults to data_dir)
    pub export_dir: PathBuf,
    /// Optional JSON fixture file replacing the built-in requests (GUARDRAIL_OPS_FIXTURES)
    pub fixtures_path: Option<PathBuf>,
    /// tracing filter directive (RUST_LOG)
    pub log_filter: String,
}

impl Config {
    pub fn load() -> Result<Self> {
        let data_dir = env::var("GUARDRAIL_OPS_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_data_dir());

        let export_dir = env::var("GUARDRAIL_OPS_EXPORT_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| data_dir.clone());

        Ok(Self {
            data_dir,
            export_dir,
            fixtures_path: env::var("GUARDRAIL_OPS_FIXTURES")
                .ok()
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from),
            log_filter: env::var("RUST_LOG").unwrap_or_else(|_| DEFAULT_LOG_FILTER.to_string()),
        })
    }

    pub fn log_path(&self) -> PathBuf {
        self.data_dir.join(LOG_FILE)
    }

    /// Make sure the data and export directories exist.
    pub fn ensure_dirs(&self) -> Result<()> {
        std::fs::create_dir_all(&self.data_dir)?;
        std::fs::create_dir_all(&self.export_dir)?;
        Ok(())
    }
}

/// Platform data directory, or the working directory when there is none.
pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|d| d.join("guardrail-ops"))
        .unwrap_or_else(|| PathBuf::from(".guardrail-ops"))
}
