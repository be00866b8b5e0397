// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Strategy for hosts with no print mechanism (Linux, BSD, ...).
//
// The chain is empty, so every print request ends in `BackendUnavailable`.

use printgate_core::error::{PrintgateError, Result};
use printgate_core::{HostOs, Mechanism, PrintCommand};

use crate::traits::{PlanContext, PlatformStrategy};

/// No-op strategy returned on unsupported hosts.
pub struct UnsupportedStrategy {
    os: String,
}

impl UnsupportedStrategy {
    pub fn new(os: impl Into<String>) -> Self {
        Self { os: os.into() }
    }
}

impl PlatformStrategy for UnsupportedStrategy {
    fn host(&self) -> HostOs {
        HostOs::Other(self.os.clone())
    }

    fn fallback_chain(&self) -> &'static [Mechanism] {
        &[]
    }

    fn plan(&self, _mechanism: Mechanism, _ctx: &PlanContext<'_>) -> Option<PrintCommand> {
        None
    }

    fn supports_enumeration(&self) -> bool {
        false
    }

    fn native_printers(&self) -> Result<Vec<String>> {
        tracing::warn!(os = %self.os, "printer enumeration called on unsupported host");
        Err(PrintgateError::BackendUnavailable(format!(
            "printer enumeration is not supported on {}",
            self.os
        )))
    }

    fn inventory_command(&self) -> Option<PrintCommand> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_the_host_in_errors() {
        let strategy = UnsupportedStrategy::new("linux");
        assert_eq!(strategy.host(), HostOs::Other("linux".into()));
        let err = strategy.native_printers().unwrap_err();
        assert_eq!(err.to_string(), "printer enumeration is not supported on linux");
    }
}
