// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Platform-agnostic trait definitions for print dispatch.

use printgate_core::error::Result;
use printgate_core::{HostOs, Mechanism, PrintCommand, ResolvedFile};

/// Inputs available when planning a mechanism's command.
#[derive(Debug, Clone, Copy)]
pub struct PlanContext<'a> {
    /// The document to print.
    pub file: &'a ResolvedFile,
    /// Target printer: the requested one, or the catalog default.
    pub printer: Option<&'a str>,
}

/// One implementation per host OS.
///
/// The backend selector walks `fallback_chain()` in order and takes the first
/// mechanism for which `plan` returns a command. Returning `None` from `plan`
/// means "not applicable here", never an error.
pub trait PlatformStrategy: Send + Sync {
    /// Which host this strategy drives.
    fn host(&self) -> HostOs;

    /// Mechanisms in priority order. Empty when printing is unsupported.
    fn fallback_chain(&self) -> &'static [Mechanism];

    /// Build the command for `mechanism`, or `None` if it does not apply.
    fn plan(&self, mechanism: Mechanism, ctx: &PlanContext<'_>) -> Option<PrintCommand>;

    /// Whether `mechanism` refuses to run without a known printer.
    fn requires_printer(&self, _mechanism: Mechanism) -> bool {
        false
    }

    /// Whether this host can enumerate printers at all.
    fn supports_enumeration(&self) -> bool;

    /// Primary enumeration through the platform's native API.
    fn native_printers(&self) -> Result<Vec<String>>;

    /// Fallback enumeration command whose output `parse_inventory` reads.
    fn inventory_command(&self) -> Option<PrintCommand>;

    /// Extract printer names from the fallback command's output.
    fn parse_inventory(&self, _output: &str) -> Vec<String> {
        Vec::new()
    }
}
