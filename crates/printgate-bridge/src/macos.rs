// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// macOS print strategy.
//
// There is no silent print path: the document is opened in its default
// application and the user finishes the job there.

use printgate_core::error::{PrintgateError, Result};
use printgate_core::{HostOs, Mechanism, PrintCommand};

use crate::traits::{PlanContext, PlatformStrategy};

const CHAIN: &[Mechanism] = &[Mechanism::OpenWithDefaultApp];

/// Opens documents with `open`. Printer selection is left to the user.
pub struct MacStrategy;

impl PlatformStrategy for MacStrategy {
    fn host(&self) -> HostOs {
        HostOs::MacOs
    }

    fn fallback_chain(&self) -> &'static [Mechanism] {
        CHAIN
    }

    fn plan(&self, mechanism: Mechanism, ctx: &PlanContext<'_>) -> Option<PrintCommand> {
        match mechanism {
            Mechanism::OpenWithDefaultApp => {
                Some(PrintCommand::new("open").arg(ctx.file.display_path()))
            }
            _ => None,
        }
    }

    fn supports_enumeration(&self) -> bool {
        false
    }

    fn native_printers(&self) -> Result<Vec<String>> {
        tracing::warn!("printer enumeration requested on macOS");
        Err(PrintgateError::BackendUnavailable(
            "printer enumeration is only supported on Windows".into(),
        ))
    }

    fn inventory_command(&self) -> Option<PrintCommand> {
        None
    }
}
