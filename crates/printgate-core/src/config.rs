// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Application configuration.
//
// Settings come from built-in defaults, then an optional JSON file, then a
// handful of `PRINTGATE_*` environment overrides.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{PrintgateError, Result};

/// Environment variable naming the config file.
pub const CONFIG_ENV: &str = "PRINTGATE_CONFIG";

/// Config file used when `PRINTGATE_CONFIG` is unset.
pub const DEFAULT_CONFIG_FILE: &str = "printgate.json";

/// Server settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Address the HTTP server listens on.
    pub bind_addr: SocketAddr,
    /// Directory holding uploaded and downloaded documents.
    pub upload_dir: PathBuf,
    /// Bundled silent-print helper (SumatraPDF-compatible command line).
    pub silent_print_helper: PathBuf,
    /// Upper bound for any external print or inventory process.
    pub process_timeout_secs: u64,
    /// Upper bound for fetching a remote document.
    pub download_timeout_secs: u64,
    /// Largest remote document accepted.
    pub max_download_bytes: u64,
    /// Largest multipart upload accepted.
    pub max_upload_bytes: usize,
    /// Refuse to print when no printer is named and none can be found.
    pub require_printer: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8081)),
            upload_dir: PathBuf::from("./uploads"),
            silent_print_helper: PathBuf::from("SumatraPDF.exe"),
            process_timeout_secs: 120,
            download_timeout_secs: 60,
            max_download_bytes: 256 * 1024 * 1024,
            max_upload_bytes: 64 * 1024 * 1024,
            require_printer: false,
        }
    }
}

impl AppConfig {
    /// Load the configuration the server starts with.
    ///
    /// Reads the file named by `PRINTGATE_CONFIG` (or `printgate.json` in the
    /// working directory), then applies environment overrides.
    pub fn load() -> Result<Self> {
        let path = std::env::var_os(CONFIG_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
        let mut config = Self::from_file(&path)?;
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Read a JSON config file. A missing file yields the defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let data = match std::fs::read_to_string(path) {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no config file, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(e.into()),
        };
        let config = serde_json::from_str(&data)
            .map_err(|e| PrintgateError::Config(format!("{}: {e}", path.display())))?;
        info!(path = %path.display(), "configuration loaded");
        Ok(config)
    }

    /// Apply `PRINTGATE_BIND`, `PRINTGATE_UPLOAD_DIR` and `PRINTGATE_HELPER`.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(bind) = lookup("PRINTGATE_BIND") {
            self.bind_addr = bind
                .parse()
                .map_err(|e| PrintgateError::Config(format!("PRINTGATE_BIND={bind}: {e}")))?;
        }
        if let Some(dir) = lookup("PRINTGATE_UPLOAD_DIR") {
            self.upload_dir = PathBuf::from(dir);
        }
        if let Some(helper) = lookup("PRINTGATE_HELPER") {
            self.silent_print_helper = PathBuf::from(helper);
        }
        Ok(())
    }

    pub fn process_timeout(&self) -> Duration {
        Duration::from_secs(self.process_timeout_secs)
    }

    pub fn download_timeout(&self) -> Duration {
        Duration::from_secs(self.download_timeout_secs)
    }
}
