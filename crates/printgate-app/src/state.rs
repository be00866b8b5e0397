// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Shared state handed to every HTTP handler.

use std::sync::Arc;

use printgate_print::PrintEngine;

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<PrintEngine>,
}

impl AppState {
    pub fn new(engine: PrintEngine) -> Self {
        Self {
            engine: Arc::new(engine),
        }
    }
}
