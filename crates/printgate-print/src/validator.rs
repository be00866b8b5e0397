// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Request validation.

use printgate_core::error::{PrintgateError, Result};
use printgate_core::{PrintJobRequest, PrintSource};

pub const MUTUALLY_EXCLUSIVE: &str = "fileName and url are mutually exclusive";

/// Accept exactly one of `fileName` / `url`. Empty strings count as absent.
pub fn validate(request: &PrintJobRequest) -> Result<PrintSource> {
    let file_name = request.file_name.as_deref().filter(|s| !s.is_empty());
    let url = request.url.as_deref().filter(|s| !s.is_empty());
    match (file_name, url) {
        (Some(name), None) => Ok(PrintSource::LocalFile(name.to_owned())),
        (None, Some(url)) => Ok(PrintSource::RemoteUrl(url.to_owned())),
        _ => Err(PrintgateError::Validation(MUTUALLY_EXCLUSIVE.into())),
    }
}
