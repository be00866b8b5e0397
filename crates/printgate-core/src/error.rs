// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Printgate.
//
// Every failure is classified where it is detected and travels unchanged up
// to the HTTP layer, which maps the `ErrorKind` onto a status code.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Top-level error type for all Printgate operations.
#[derive(Debug, Error)]
pub enum PrintgateError {
    // -- Request / source errors --
    #[error("{0}")]
    Validation(String),

    #[error("file not found: {0}")]
    NotFound(String),

    #[error("failed to download file from URL: {0}")]
    Download(String),

    // -- Dispatch errors --
    #[error("{0}")]
    BackendUnavailable(String),

    #[error("no printer available: specify printerName or install a printer")]
    NoPrinterAvailable,

    #[error("printing failed: {message}\nOutput: {output}")]
    Process { message: String, output: String },

    // -- Internal --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("configuration error: {0}")]
    Config(String),
}

/// Coarse classification of a `PrintgateError`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ErrorKind {
    /// Malformed or contradictory request.
    Validation,
    /// The resolved file does not exist.
    NotFound,
    /// Fetching a remote source failed.
    Download,
    /// No printing mechanism applies, or the OS is unsupported.
    BackendUnavailable,
    /// A printer is required but none is known.
    NoPrinterAvailable,
    /// The external program failed, timed out, or could not start.
    Process,
    /// Anything else (I/O, configuration, serialization).
    Internal,
}

impl PrintgateError {
    /// Convenience constructor for process failures without captured output.
    pub fn process(message: impl Into<String>) -> Self {
        Self::Process {
            message: message.into(),
            output: String::new(),
        }
    }

    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Download(_) => ErrorKind::Download,
            Self::BackendUnavailable(_) => ErrorKind::BackendUnavailable,
            Self::NoPrinterAvailable => ErrorKind::NoPrinterAvailable,
            Self::Process { .. } => ErrorKind::Process,
            Self::Io(_) | Self::Serialization(_) | Self::Config(_) => ErrorKind::Internal,
        }
    }

    /// Output captured from an external program, if this error carries any.
    pub fn captured_output(&self) -> Option<&str> {
        match self {
            Self::Process { output, .. } if !output.is_empty() => Some(output),
            _ => None,
        }
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, PrintgateError>;
