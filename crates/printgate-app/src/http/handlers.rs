// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Route handlers.

use axum::Json;
use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::rejection::JsonRejection;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use serde::Serialize;
use tracing::{info, warn};

use printgate_core::{ErrorKind, PrintJobRequest, StoredFile};

use super::error::ApiError;
use crate::state::AppState;

/// Multipart field carrying the uploaded document.
const UPLOAD_FIELD: &str = "file";

#[derive(Debug, Serialize)]
pub struct PrintResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub printer: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub message: String,
    pub file: StoredFile,
}

/// `POST /print`
pub async fn print(
    State(state): State<AppState>,
    payload: Result<Json<PrintJobRequest>, JsonRejection>,
) -> Result<Json<PrintResponse>, ApiError> {
    let Json(request) = payload.map_err(|rejection| {
        warn!(error = %rejection.body_text(), "invalid print request body");
        ApiError::bad_request("Invalid request body")
    })?;

    let result = state.engine.submit(&request).await;
    if !result.succeeded {
        let kind = result.error_kind.unwrap_or(ErrorKind::Internal);
        return Err(ApiError::from_kind(kind, result.message));
    }
    Ok(Json(PrintResponse {
        message: result.message,
        details: result.details,
        printer: result.printer,
    }))
}

/// `GET /printers`
pub async fn printers(State(state): State<AppState>) -> Result<Json<Vec<String>>, ApiError> {
    Ok(Json(state.engine.printers().await?))
}

/// `POST /upload`
pub async fn upload(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, ApiError> {
    let mut multipart = multipart.map_err(|rejection| {
        warn!(error = %rejection.body_text(), "upload is not multipart");
        ApiError::bad_request("Could not parse multipart form")
    })?;
    loop {
        let field = multipart
            .next_field()
            .await
            .map_err(|e| multipart_error(e, "Could not parse multipart form"))?;
        let Some(field) = field else {
            return Err(ApiError::bad_request("Could not retrieve file from form-data"));
        };
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let original = field.file_name().unwrap_or_default().to_owned();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| multipart_error(e, "Could not read uploaded file"))?;
        let file = state.engine.save_upload(&original, &bytes).await?;
        info!(original = %file.name, stored = %file.path, "upload stored");
        return Ok(Json(UploadResponse {
            message: "File uploaded successfully".into(),
            file,
        }));
    }
}

/// Body-limit overruns become 413; anything else is a malformed form.
fn multipart_error(err: MultipartError, message: &str) -> ApiError {
    warn!(error = %err.body_text(), "upload rejected");
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::new(StatusCode::PAYLOAD_TOO_LARGE, "Uploaded file exceeds the size limit")
    } else {
        ApiError::bad_request(message)
    }
}

/// `GET /files`
pub async fn files(State(state): State<AppState>) -> Result<Json<Vec<StoredFile>>, ApiError> {
    Ok(Json(state.engine.list_files().await?))
}

pub async fn not_found() -> ApiError {
    ApiError::not_found("Not found")
}

pub async fn method_not_allowed() -> ApiError {
    ApiError::method_not_allowed("Method not allowed")
}
