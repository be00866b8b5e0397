// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the Printgate print dispatcher.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ErrorKind;

/// A print request as decoded from the `/print` request body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PrintJobRequest {
    /// Name of a file previously stored in the upload directory.
    pub file_name: Option<String>,
    /// Remote document to download before printing.
    pub url: Option<String>,
    /// Target printer; the host default is used when absent.
    pub printer_name: Option<String>,
}

impl PrintJobRequest {
    /// Request printing of an uploaded file.
    pub fn for_file(name: impl Into<String>) -> Self {
        Self {
            file_name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Request printing of a remote document.
    pub fn for_url(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            ..Self::default()
        }
    }

    /// Set the target printer.
    pub fn with_printer(mut self, printer: impl Into<String>) -> Self {
        self.printer_name = Some(printer.into());
        self
    }

    /// The requested printer, treating an empty string as absent.
    pub fn requested_printer(&self) -> Option<&str> {
        self.printer_name.as_deref().filter(|name| !name.is_empty())
    }
}

/// Where the document comes from, after validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrintSource {
    /// A file inside the upload directory.
    LocalFile(String),
    /// A URL to download into the upload directory.
    RemoteUrl(String),
}

/// The concrete local file handed to a printing mechanism.
///
/// Created once by the source resolver and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedFile {
    path: PathBuf,
    extension: String,
    digest: Option<String>,
}

impl ResolvedFile {
    /// Wrap an absolute path, deriving the lowercased extension.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let extension = dotted_extension(&path);
        Self {
            path,
            extension,
            digest: None,
        }
    }

    /// Attach the SHA-256 hex digest of the file contents.
    pub fn with_digest(mut self, digest: impl Into<String>) -> Self {
        self.digest = Some(digest.into());
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Lowercased extension including the leading dot, or `""`.
    pub fn extension(&self) -> &str {
        &self.extension
    }

    pub fn digest(&self) -> Option<&str> {
        self.digest.as_deref()
    }

    /// The path as a string argument for an external program.
    pub fn display_path(&self) -> String {
        self.path.to_string_lossy().into_owned()
    }
}

/// Lowercased suffix of the file name from its last dot, or an empty string.
///
/// A dot-file such as `.pdf` is all extension.
pub fn dotted_extension(path: &Path) -> String {
    let Some(name) = path.file_name() else {
        return String::new();
    };
    let name = name.to_string_lossy();
    name.rfind('.')
        .map(|dot| name[dot..].to_ascii_lowercase())
        .unwrap_or_default()
}

/// An external program invocation chosen by the backend selector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrintCommand {
    pub executable: String,
    pub arguments: Vec<String>,
}

impl PrintCommand {
    pub fn new(executable: impl Into<String>) -> Self {
        Self {
            executable: executable.into(),
            arguments: Vec::new(),
        }
    }

    /// Append one argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.arguments.push(arg.into());
        self
    }

    /// Append several arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.arguments.extend(args.into_iter().map(Into::into));
        self
    }
}

impl fmt::Display for PrintCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.executable)?;
        for arg in &self.arguments {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Printing mechanisms, across all platforms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Mechanism {
    /// A locally installed browser prints the document.
    Browser,
    /// The bundled silent-print helper prints PDFs and images.
    SilentHelper,
    /// The OS shell's generic `Print` / `PrintTo` verb.
    ShellVerb,
    /// Open with the default application; the user confirms printing.
    OpenWithDefaultApp,
}

impl Mechanism {
    /// Short label for logs and result details.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Browser => "browser",
            Self::SilentHelper => "silent print helper",
            Self::ShellVerb => "shell print verb",
            Self::OpenWithDefaultApp => "default application",
        }
    }

    /// Whether a human has to finish the job in a GUI.
    pub fn requires_manual_confirmation(&self) -> bool {
        matches!(self, Self::OpenWithDefaultApp)
    }
}

/// Host operating system, as far as dispatch is concerned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostOs {
    Windows,
    MacOs,
    Other(String),
}

impl HostOs {
    /// Detect the OS this process is running on.
    pub fn detect() -> Self {
        Self::from_name(std::env::consts::OS)
    }

    /// Map a `std::env::consts::OS` style name.
    pub fn from_name(name: &str) -> Self {
        match name {
            "windows" => Self::Windows,
            "macos" => Self::MacOs,
            other => Self::Other(other.to_owned()),
        }
    }
}

impl fmt::Display for HostOs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Windows => f.write_str("windows"),
            Self::MacOs => f.write_str("macos"),
            Self::Other(name) => f.write_str(name),
        }
    }
}

/// Structured outcome of a print request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrintResult {
    pub succeeded: bool,
    pub message: String,
    pub details: Option<String>,
    /// Printer the job was addressed to, if any.
    pub printer: Option<String>,
    pub captured_output: String,
    /// Set when `succeeded` is false.
    pub error_kind: Option<ErrorKind>,
}

/// A file stored in the upload directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredFile {
    /// Original (upload) or on-disk (listing) file name.
    pub name: String,
    /// Path relative to the upload directory, `/`-separated.
    pub path: String,
}
