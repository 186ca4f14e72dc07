// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Lesson content upload (single multipart submission).
//!
//! No chunking and no progress: a failure midway looks the same as a
//! failure before the first byte.

use crate::error::{ClientError, Result};
use crate::flow::{AbortSignal, Flow};
use crate::models::{ApiResponse, ContentUpload};
use crate::notify::Notifier;
use crate::services::api::{ApiClient, RequestSpec};
use crate::services::courses::COURSES_PATH;
use reqwest::multipart::{Form, Part};
use serde_json::Value;
use std::sync::Arc;

const UPLOAD_FAILED: &str = "Upload failed";

/// Content upload service.
#[derive(Clone)]
pub struct ContentService {
    api: ApiClient,
    notifier: Arc<dyn Notifier>,
}

impl ContentService {
    pub fn new(api: ApiClient, notifier: Arc<dyn Notifier>) -> Self {
        Self { api, notifier }
    }

    /// Upload a lesson file with its metadata. Notifies on success and failure.
    pub async fn upload_content(
        &self,
        upload: ContentUpload,
        abort: &AbortSignal,
    ) -> Result<ApiResponse<Value>> {
        let course = upload.course.clone();
        let file_name = upload.file.name.clone();
        let size = upload.file.size();

        let result = match build_form(upload) {
            Ok(form) => {
                tracing::info!(course = %course, file = %file_name, size, "Uploading content");
                let spec = RequestSpec::post(COURSES_PATH)
                    .multipart(form)
                    .authenticated()
                    .fallback(UPLOAD_FAILED);
                self.api.send::<ApiResponse<Value>>(spec, abort).await
            }
            Err(e) => Err(e),
        };

        match &result {
            Ok(_) => self.notifier.success("Content uploaded successfully"),
            Err(e) => self.notifier.error(&e.message()),
        }
        result
    }
}

/// Multipart body with the field names the backend expects.
pub fn build_form(upload: ContentUpload) -> Result<Form> {
    let file = Part::bytes(upload.file.bytes)
        .file_name(upload.file.name)
        .mime_str(&upload.file.mime)
        .map_err(|e| ClientError::Validation(format!("Invalid file type: {}", e)))?;

    Ok(Form::new()
        .text("course", upload.course)
        .text("contentType", upload.content_type)
        .text("lessonTitle", upload.lesson_title)
        .text("order", upload.order)
        .text("saveToDraft", upload.save_to_draft.to_string())
        .part("file", file))
}

/// Content upload with observable state (`loading` is the "saving" flag).
pub struct UploadContentFlow {
    service: ContentService,
    flow: Flow<ApiResponse<Value>>,
}

impl UploadContentFlow {
    pub fn new(service: ContentService) -> Self {
        Self {
            service,
            flow: Flow::new("upload_content"),
        }
    }

    pub async fn upload(
        &self,
        upload: ContentUpload,
        abort: &AbortSignal,
    ) -> Option<ApiResponse<Value>> {
        self.flow.run(self.service.upload_content(upload, abort)).await
    }

    pub fn state(&self) -> &Flow<ApiResponse<Value>> {
        &self.flow
    }
}
