// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Printer catalog: native enumeration first, inventory command second.

use std::sync::Arc;

use tracing::{debug, info, warn};

use printgate_bridge::PlatformStrategy;
use printgate_core::error::{PrintgateError, Result};

use crate::executor::PrintBackend;

/// Enumerates printers on every call. Nothing is cached.
#[derive(Clone)]
pub struct PrinterCatalog {
    strategy: Arc<dyn PlatformStrategy>,
    backend: Arc<dyn PrintBackend>,
}

impl PrinterCatalog {
    pub fn new(strategy: Arc<dyn PlatformStrategy>, backend: Arc<dyn PrintBackend>) -> Self {
        Self { strategy, backend }
    }

    /// Printer names, unique, in the order first reported.
    ///
    /// Fails with `BackendUnavailable` only when the host cannot enumerate at
    /// all; if both strategies fail the result is an empty list.
    pub async fn printers(&self) -> Result<Vec<String>> {
        if !self.strategy.supports_enumeration() {
            return Err(PrintgateError::BackendUnavailable(format!(
                "printer listing is not supported on {}",
                self.strategy.host()
            )));
        }

        let strategy = Arc::clone(&self.strategy);
        let native = tokio::task::spawn_blocking(move || strategy.native_printers())
            .await
            .map_err(|e| PrintgateError::BackendUnavailable(format!("enumeration task: {e}")))
            .and_then(|r| r);

        let names = match native {
            Ok(names) => {
                debug!(count = names.len(), "native printer enumeration");
                names
            }
            Err(e) => {
                warn!(error = %e, "native enumeration failed, trying inventory command");
                self.inventory().await
            }
        };

        let names = dedupe(names);
        info!(count = names.len(), "printers enumerated");
        Ok(names)
    }

    async fn inventory(&self) -> Vec<String> {
        let Some(command) = self.strategy.inventory_command() else {
            return Vec::new();
        };
        match self.backend.run(&command).await {
            Ok(out) => self.strategy.parse_inventory(&out.output),
            Err(e) => {
                warn!(error = %e, "inventory command failed");
                Vec::new()
            }
        }
    }
}

/// Drop repeated and empty names, keeping first occurrences.
pub fn dedupe(names: Vec<String>) -> Vec<String> {
    let mut unique: Vec<String> = Vec::with_capacity(names.len());
    for name in names {
        if !name.is_empty() && !unique.contains(&name) {
            unique.push(name);
        }
    }
    unique
}
