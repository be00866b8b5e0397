// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Map dispatch outcomes onto `PrintResult`.

use printgate_core::error::PrintgateError;
use printgate_core::{Mechanism, PrintResult, ResolvedFile};

use crate::executor::CommandOutput;
use crate::selector::Selection;

/// Caller-facing message for a mechanism that ran successfully.
pub fn success_message(mechanism: Mechanism, printer: Option<&str>) -> &'static str {
    match (mechanism, printer) {
        (Mechanism::Browser, _) => "Print job sent via browser.",
        (Mechanism::SilentHelper, Some(_)) => "Print job sent to the specified printer.",
        (Mechanism::SilentHelper, None) => "Print job sent to the default printer.",
        (Mechanism::ShellVerb, _) => "Print job sent successfully via PowerShell.",
        (Mechanism::OpenWithDefaultApp, _) => {
            "File opened in the default application. Confirm printing manually."
        }
    }
}

pub fn success(selection: &Selection, file: &ResolvedFile, output: CommandOutput) -> PrintResult {
    let printer = selection.printer.as_deref();
    let details = format!(
        "File: {}, Printer: {}, Mechanism: {} ({})",
        file.display_path(),
        printer.unwrap_or("default"),
        selection.mechanism.label(),
        selection.command.executable,
    );
    PrintResult {
        succeeded: true,
        message: success_message(selection.mechanism, printer).to_owned(),
        details: Some(details),
        printer: selection.printer.clone(),
        captured_output: output.output,
        error_kind: None,
    }
}

/// The error text becomes the message; the error kind is kept as-is.
pub fn failure(error: &PrintgateError) -> PrintResult {
    PrintResult {
        succeeded: false,
        message: error.to_string(),
        details: None,
        printer: None,
        captured_output: error.captured_output().unwrap_or_default().to_owned(),
        error_kind: Some(error.kind()),
    }
}
