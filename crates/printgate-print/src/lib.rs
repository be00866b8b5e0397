// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Printgate Print — the print dispatch engine. Resolves the document,
// selects a printing mechanism through the host's platform strategy, runs it,
// and reports the outcome.

pub mod catalog;
pub mod engine;
pub mod executor;
pub mod reporter;
pub mod resolver;
pub mod selector;
pub mod uploads;
pub mod validator;

pub use catalog::PrinterCatalog;
pub use engine::PrintEngine;
pub use executor::{CommandOutput, PrintBackend, ProcessBackend, RecordingBackend};
pub use resolver::SourceResolver;
pub use selector::{BackendSelector, Selection};
pub use uploads::UploadDir;
