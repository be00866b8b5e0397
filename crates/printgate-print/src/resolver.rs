// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Source resolution: turn a validated request into a local file.
//
// Remote documents are streamed into the upload directory under a generated
// name while their SHA-256 is computed. A download that fails part-way leaves
// nothing behind.

use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::{Client, Response, Url};
use sha2::{Digest, Sha256};
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, instrument, warn};

use printgate_core::error::{PrintgateError, Result};
use printgate_core::{PrintSource, ResolvedFile};

use crate::uploads::{UploadDir, normalize_extension};

/// Resolves print sources against the upload directory.
#[derive(Debug, Clone)]
pub struct SourceResolver {
    uploads: UploadDir,
    client: Client,
    max_bytes: u64,
}

impl SourceResolver {
    pub fn new(uploads: UploadDir, timeout: Duration, max_bytes: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PrintgateError::Config(format!("HTTP client: {e}")))?;
        Ok(Self {
            uploads,
            client,
            max_bytes,
        })
    }

    pub fn uploads(&self) -> &UploadDir {
        &self.uploads
    }

    /// Produce the local file for `source`, downloading it if remote.
    #[instrument(skip(self))]
    pub async fn resolve(&self, source: &PrintSource) -> Result<ResolvedFile> {
        let file = match source {
            PrintSource::LocalFile(name) => ResolvedFile::new(self.uploads.contain(name)?),
            PrintSource::RemoteUrl(url) => self.download(url).await?,
        };
        if !tokio::fs::try_exists(file.path()).await.unwrap_or(false) {
            return Err(PrintgateError::NotFound(file.display_path()));
        }
        debug!(path = %file.path().display(), ext = file.extension(), "source resolved");
        Ok(file)
    }

    async fn download(&self, raw: &str) -> Result<ResolvedFile> {
        let url = parse_url(raw)?;
        let name = UploadDir::generated_name(url_extension(&url).as_deref());
        let target = std::path::absolute(self.uploads.path().join(&name))?;

        info!(url = %url, target = %target.display(), "downloading remote document");
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| PrintgateError::Download(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(PrintgateError::Download(format!(
                "server returned {status}"
            )));
        }
        if let Some(len) = response.content_length() {
            if len > self.max_bytes {
                return Err(self.too_large());
            }
        }

        match self.stream_to(response, &target).await {
            Ok((digest, size)) => {
                info!(path = %target.display(), size, sha256 = %digest, "download complete");
                Ok(ResolvedFile::new(target).with_digest(digest))
            }
            Err(e) => {
                if let Err(rm) = tokio::fs::remove_file(&target).await {
                    warn!(path = %target.display(), error = %rm, "failed to remove partial download");
                }
                Err(e)
            }
        }
    }

    /// Write the body to `target`, returning its hex digest and size.
    async fn stream_to(&self, mut response: Response, target: &Path) -> Result<(String, u64)> {
        let mut file = tokio::fs::File::create(target)
            .await
            .map_err(|e| PrintgateError::Download(format!("{}: {e}", target.display())))?;
        let mut hasher = Sha256::new();
        let mut size: u64 = 0;

        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| PrintgateError::Download(e.to_string()))?
        {
            size += chunk.len() as u64;
            if size > self.max_bytes {
                return Err(self.too_large());
            }
            hasher.update(&chunk);
            file.write_all(&chunk)
                .await
                .map_err(|e| PrintgateError::Download(format!("write failed: {e}")))?;
        }
        file.flush()
            .await
            .map_err(|e| PrintgateError::Download(format!("write failed: {e}")))?;

        Ok((hex::encode(hasher.finalize()), size))
    }

    fn too_large(&self) -> PrintgateError {
        PrintgateError::Download(format!(
            "document exceeds the {} byte limit",
            self.max_bytes
        ))
    }
}

fn parse_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw).map_err(|e| PrintgateError::Validation(format!("invalid url {raw}: {e}")))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(PrintgateError::Validation(format!(
            "unsupported url scheme: {other}"
        ))),
    }
}

/// Extension of the last path segment, ignoring query and fragment.
fn url_extension(url: &Url) -> Option<String> {
    let segment = url.path().rsplit('/').next()?;
    let ext = PathBuf::from(segment)
        .extension()?
        .to_string_lossy()
        .into_owned();
    Some(normalize_extension(Some(&ext)))
}
