// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// The print dispatch engine.
//
// Validator → Resolver → Selector (with Catalog) → Executor → Reporter.
// The engine holds no mutable state and is shared across requests.

use std::sync::Arc;

use tracing::{error, info, instrument};
use uuid::Uuid;

use printgate_bridge::PlatformStrategy;
use printgate_core::error::{PrintgateError, Result};
use printgate_core::{AppConfig, PrintJobRequest, PrintResult, StoredFile};

use crate::catalog::PrinterCatalog;
use crate::executor::PrintBackend;
use crate::reporter;
use crate::resolver::SourceResolver;
use crate::selector::BackendSelector;
use crate::uploads::UploadDir;
use crate::validator;

pub struct PrintEngine {
    resolver: SourceResolver,
    catalog: PrinterCatalog,
    selector: BackendSelector,
    backend: Arc<dyn PrintBackend>,
}

impl PrintEngine {
    pub fn new(
        config: &AppConfig,
        strategy: Arc<dyn PlatformStrategy>,
        backend: Arc<dyn PrintBackend>,
    ) -> Result<Self> {
        let uploads = UploadDir::new(&config.upload_dir);
        let resolver = SourceResolver::new(
            uploads,
            config.download_timeout(),
            config.max_download_bytes,
        )?;
        info!(
            host = %strategy.host(),
            upload_dir = %config.upload_dir.display(),
            "print engine ready"
        );
        Ok(Self {
            resolver,
            catalog: PrinterCatalog::new(Arc::clone(&strategy), Arc::clone(&backend)),
            selector: BackendSelector::new(strategy),
            backend,
        })
    }

    /// Run one print request end to end. Never fails; errors are reported.
    #[instrument(skip(self, request), fields(job_id = %Uuid::new_v4()))]
    pub async fn submit(&self, request: &PrintJobRequest) -> PrintResult {
        match self.dispatch(request).await {
            Ok(result) => {
                info!(message = %result.message, printer = ?result.printer, "print job dispatched");
                result
            }
            Err(e) => {
                error!(error = %e, kind = ?e.kind(), "print job failed");
                reporter::failure(&e)
            }
        }
    }

    async fn dispatch(&self, request: &PrintJobRequest) -> Result<PrintResult> {
        let source = validator::validate(request)?;
        let file = self.resolver.resolve(&source).await?;
        let selection = self
            .selector
            .select(&file, request.requested_printer(), &self.catalog)
            .await?;
        let output = self.backend.run(&selection.command).await?;
        if selection.mechanism.requires_manual_confirmation() {
            info!(path = %file.path().display(), "document opened, printing awaits manual confirmation");
        }
        Ok(reporter::success(&selection, &file, output))
    }

    /// Printers known to the host.
    pub async fn printers(&self) -> Result<Vec<String>> {
        self.catalog.printers().await
    }

    pub fn uploads(&self) -> &UploadDir {
        self.resolver.uploads()
    }

    /// Store an uploaded document.
    pub async fn save_upload(&self, original_name: &str, bytes: &[u8]) -> Result<StoredFile> {
        self.uploads().save(original_name, bytes).await
    }

    /// Everything currently in the upload directory.
    pub async fn list_files(&self) -> Result<Vec<StoredFile>> {
        let uploads = self.uploads().clone();
        tokio::task::spawn_blocking(move || uploads.list())
            .await
            .map_err(|e| PrintgateError::Io(std::io::Error::other(e)))?
    }
}
