// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Windows print strategy.
//
// Chain: Browser → Silent print helper → Shell print verb
//
// The shell verb hands the file to whatever application is registered for
// its type, so it applies to every file and always ends the chain.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info};

use printgate_core::error::{PrintgateError, Result};
use printgate_core::{HostOs, Mechanism, PrintCommand};

use crate::probe::HostProbe;
use crate::traits::{PlanContext, PlatformStrategy};

/// Extensions a browser can render and print.
pub const BROWSER_PRINTABLE: &[&str] = &[".pdf", ".png", ".jpg", ".jpeg", ".gif", ".webp", ".bmp"];

/// Extensions the silent print helper accepts.
pub const HELPER_PRINTABLE: &[&str] = &[
    ".pdf", ".jpg", ".jpeg", ".png", ".bmp", ".gif", ".tif", ".tiff",
];

/// Environment variables naming install roots, probed in this order.
pub const INSTALL_ROOTS: &[&str] = &["ProgramFiles", "ProgramFiles(x86)", "LOCALAPPDATA"];

const CHAIN: &[Mechanism] = &[
    Mechanism::Browser,
    Mechanism::SilentHelper,
    Mechanism::ShellVerb,
];

/// Browsers we know how to drive, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrowserKind {
    Edge,
    Chrome,
    Firefox,
}

impl BrowserKind {
    pub const PRIORITY: [BrowserKind; 3] = [Self::Edge, Self::Chrome, Self::Firefox];

    /// Location of the executable below an install root.
    pub fn install_subpath(&self) -> &'static [&'static str] {
        match self {
            Self::Edge => &["Microsoft", "Edge", "Application", "msedge.exe"],
            Self::Chrome => &["Google", "Chrome", "Application", "chrome.exe"],
            Self::Firefox => &["Mozilla Firefox", "firefox.exe"],
        }
    }

    fn is_chromium(&self) -> bool {
        matches!(self, Self::Edge | Self::Chrome)
    }
}

/// A browser located on this host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Browser {
    pub kind: BrowserKind,
    pub path: PathBuf,
}

/// Locate the first installed browser.
///
/// Browsers are checked in priority order; for each one every install root is
/// tried before moving on to the next browser.
pub fn find_browser(probe: &dyn HostProbe) -> Option<Browser> {
    for kind in BrowserKind::PRIORITY {
        for root_var in INSTALL_ROOTS {
            let Some(root) = probe.env_var(root_var) else {
                continue;
            };
            let path = kind
                .install_subpath()
                .iter()
                .fold(PathBuf::from(root), |acc, part| acc.join(part));
            if probe.is_file(&path) {
                info!(browser = %path.display(), "found browser");
                return Some(Browser { kind, path });
            }
        }
    }
    debug!("no supported browser found");
    None
}

/// Browser-specific print arguments.
///
/// Firefox: `-print <file> [-print-to <printer>]`.
/// Chromium family: `--kiosk-printing [--print-to="<printer>"] <file>`.
pub fn browser_command(browser: &Browser, file: &str, printer: Option<&str>) -> PrintCommand {
    let cmd = PrintCommand::new(browser.path.to_string_lossy());
    if browser.kind.is_chromium() {
        let cmd = cmd.arg("--kiosk-printing");
        let cmd = match printer {
            Some(name) => cmd.arg(format!("--print-to=\"{name}\"")),
            None => cmd,
        };
        cmd.arg(file)
    } else {
        let cmd = cmd.args(["-print", file]);
        match printer {
            Some(name) => cmd.args(["-print-to", name]),
            None => cmd,
        }
    }
}

/// Silent helper arguments (SumatraPDF command line).
pub fn helper_command(helper: &Path, file: &str, printer: Option<&str>) -> PrintCommand {
    let cmd = PrintCommand::new(helper.to_string_lossy());
    match printer {
        Some(name) => cmd.args(["-print-to", name, file, "-silent"]),
        None => cmd.args(["-print-to-default", file, "-silent"]),
    }
}

/// PowerShell `Start-Process` with the `PrintTo` or `Print` verb.
///
/// With a known printer the verb is `PrintTo` and the command waits for the
/// spawned application to exit.
pub fn shell_command(file: &str, printer: Option<&str>) -> PrintCommand {
    let script = match printer {
        Some(name) => format!(
            "Start-Process -FilePath {} -Verb PrintTo -ArgumentList {} -WindowStyle Hidden -PassThru | Wait-Process",
            ps_quote(file),
            ps_quote(&format!("\"{name}\"")),
        ),
        None => format!(
            "Start-Process -FilePath {} -Verb Print -WindowStyle Hidden",
            ps_quote(file)
        ),
    };
    PrintCommand::new("powershell").args(["-NoProfile", "-Command", &script])
}

/// PowerShell single-quoted literal; embedded quotes are doubled.
fn ps_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

/// The Windows strategy.
pub struct WindowsStrategy {
    helper: PathBuf,
    require_printer: bool,
    native_enumeration: bool,
    probe: Arc<dyn HostProbe>,
}

impl WindowsStrategy {
    /// `helper` is resolved against the working directory when relative.
    pub fn new(helper: &Path, probe: Arc<dyn HostProbe>) -> Self {
        let helper = std::path::absolute(helper).unwrap_or_else(|_| helper.to_path_buf());
        Self {
            helper,
            require_printer: false,
            native_enumeration: cfg!(target_os = "windows"),
            probe,
        }
    }

    /// Refuse every mechanism when no printer is known.
    pub fn require_printer(mut self, required: bool) -> Self {
        self.require_printer = required;
        self
    }

    /// Skip the winspool call and go straight to the inventory command.
    pub fn without_native_enumeration(mut self) -> Self {
        self.native_enumeration = false;
        self
    }

    pub fn helper_path(&self) -> &Path {
        &self.helper
    }
}

impl PlatformStrategy for WindowsStrategy {
    fn host(&self) -> HostOs {
        HostOs::Windows
    }

    fn fallback_chain(&self) -> &'static [Mechanism] {
        CHAIN
    }

    fn plan(&self, mechanism: Mechanism, ctx: &PlanContext<'_>) -> Option<PrintCommand> {
        let ext = ctx.file.extension();
        let file = ctx.file.display_path();
        match mechanism {
            Mechanism::Browser => {
                if !BROWSER_PRINTABLE.contains(&ext) {
                    return None;
                }
                let browser = find_browser(self.probe.as_ref())?;
                Some(browser_command(&browser, &file, ctx.printer))
            }
            Mechanism::SilentHelper => {
                if !HELPER_PRINTABLE.contains(&ext) || !self.probe.is_file(&self.helper) {
                    return None;
                }
                Some(helper_command(&self.helper, &file, ctx.printer))
            }
            Mechanism::ShellVerb => Some(shell_command(&file, ctx.printer)),
            Mechanism::OpenWithDefaultApp => None,
        }
    }

    fn requires_printer(&self, _mechanism: Mechanism) -> bool {
        self.require_printer
    }

    fn supports_enumeration(&self) -> bool {
        true
    }

    fn native_printers(&self) -> Result<Vec<String>> {
        if !self.native_enumeration {
            return Err(PrintgateError::BackendUnavailable(
                "native printer enumeration is disabled".into(),
            ));
        }
        #[cfg(target_os = "windows")]
        {
            crate::winspool::enumerate()
        }
        #[cfg(not(target_os = "windows"))]
        {
            Err(PrintgateError::BackendUnavailable(
                "native printer enumeration requires Windows".into(),
            ))
        }
    }

    /// `wmic` ships as an optional feature on recent Windows 11 builds. Where it
    /// is absent the command fails and the catalog is empty, so jobs without a
    /// `printerName` go to the host default.
    fn inventory_command(&self) -> Option<PrintCommand> {
        Some(PrintCommand::new("wmic").args(["printer", "get", "name", "/format:csv"]))
    }

    /// Parse `wmic ... /format:csv` output (`Node,Name` rows).
    fn parse_inventory(&self, output: &str) -> Vec<String> {
        output
            .lines()
            .map(|line| line.trim_matches(|c: char| c.is_whitespace() || c == '\0' || c == '\u{feff}'))
            .filter(|line| !line.is_empty())
            .map(|line| match line.split_once(',') {
                Some((_node, name)) => name.trim(),
                None => line,
            })
            .filter(|name| !name.is_empty() && !name.eq_ignore_ascii_case("name"))
            .map(str::to_owned)
            .collect()
    }
}
