// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Backend selection.
//
// Walks the platform's fallback chain in order and takes the first mechanism
// that applies to the file. Mechanisms that do not apply are skipped
// silently; only an exhausted chain is an error.

use std::sync::Arc;

use tracing::{debug, info, warn};

use printgate_bridge::{PlanContext, PlatformStrategy};
use printgate_core::error::{PrintgateError, Result};
use printgate_core::{Mechanism, PrintCommand, ResolvedFile};

use crate::catalog::PrinterCatalog;

/// The chosen mechanism and the command that drives it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub mechanism: Mechanism,
    pub command: PrintCommand,
    /// Printer the command addresses; `None` means the host default.
    pub printer: Option<String>,
}

pub struct BackendSelector {
    strategy: Arc<dyn PlatformStrategy>,
}

impl BackendSelector {
    pub fn new(strategy: Arc<dyn PlatformStrategy>) -> Self {
        Self { strategy }
    }

    /// Pick a mechanism for `file`.
    ///
    /// Without a requested printer the catalog's first entry is used where the
    /// host can enumerate; a failing catalog counts as empty.
    pub async fn select(
        &self,
        file: &ResolvedFile,
        requested: Option<&str>,
        catalog: &PrinterCatalog,
    ) -> Result<Selection> {
        self.ensure_supported()?;

        let printer = match requested {
            Some(name) => Some(name.to_owned()),
            None if self.strategy.supports_enumeration() => match catalog.printers().await {
                Ok(names) => names.into_iter().next(),
                Err(e) => {
                    warn!(error = %e, "printer catalog unavailable, treating as empty");
                    None
                }
            },
            None => None,
        };
        if requested.is_none() {
            debug!(printer = ?printer, "default printer from catalog");
        }

        self.choose(file, printer.as_deref())
    }

    /// Walk the chain with a printer already decided.
    pub fn choose(&self, file: &ResolvedFile, printer: Option<&str>) -> Result<Selection> {
        self.ensure_supported()?;
        let ctx = PlanContext { file, printer };

        for &mechanism in self.strategy.fallback_chain() {
            let Some(command) = self.strategy.plan(mechanism, &ctx) else {
                debug!(mechanism = mechanism.label(), ext = file.extension(), "mechanism not applicable");
                continue;
            };
            if printer.is_none() && self.strategy.requires_printer(mechanism) {
                return Err(PrintgateError::NoPrinterAvailable);
            }
            info!(mechanism = mechanism.label(), command = %command, "print mechanism selected");
            return Ok(Selection {
                mechanism,
                command,
                printer: printer.map(str::to_owned),
            });
        }

        Err(PrintgateError::BackendUnavailable(format!(
            "no printing mechanism available for {} files",
            if file.extension().is_empty() { "extensionless" } else { file.extension() }
        )))
    }

    fn ensure_supported(&self) -> Result<()> {
        if self.strategy.fallback_chain().is_empty() {
            return Err(PrintgateError::BackendUnavailable(format!(
                "printing is not supported on {}",
                self.strategy.host()
            )));
        }
        Ok(())
    }
}
