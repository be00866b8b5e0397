// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Host lookups used while planning commands: environment variables (install
// roots) and file existence (browsers, the silent-print helper).

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

/// Read-only view of the host used by strategies.
pub trait HostProbe: Send + Sync {
    /// Value of an environment variable, `None` when unset or empty.
    fn env_var(&self, key: &str) -> Option<String>;

    /// Whether `path` names an existing regular file.
    fn is_file(&self, path: &Path) -> bool;
}

/// Probe backed by the real process environment and filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemProbe;

impl HostProbe for SystemProbe {
    fn env_var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok().filter(|value| !value.is_empty())
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }
}

/// Fixed probe for tests and dry runs.
#[derive(Debug, Clone, Default)]
pub struct StaticProbe {
    vars: HashMap<String, String>,
    files: HashSet<PathBuf>,
}

impl StaticProbe {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_var(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(key.into(), value.into());
        self
    }

    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.files.insert(path.into());
        self
    }
}

impl HostProbe for StaticProbe {
    fn env_var(&self, key: &str) -> Option<String> {
        self.vars.get(key).filter(|value| !value.is_empty()).cloned()
    }

    fn is_file(&self, path: &Path) -> bool {
        self.files.contains(path)
    }
}
