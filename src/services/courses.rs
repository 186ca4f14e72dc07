// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Course creation and listing.
//!
//! Creation is not idempotent: two identical calls create two records.

use crate::error::Result;
use crate::flow::{AbortSignal, Flow};
use crate::models::{ApiResponse, Course, NewCourse};
use crate::notify::Notifier;
use crate::services::api::{ApiClient, RequestSpec};
use serde_json::Value;
use std::sync::Arc;

pub const COURSES_PATH: &str = "/api/v1/courses";
const CREATE_FAILED: &str = "Course creation failed.";
const LIST_FAILED: &str = "Failed to fetch courses.";

/// Course service.
#[derive(Clone)]
pub struct CourseService {
    api: ApiClient,
    notifier: Arc<dyn Notifier>,
}

impl CourseService {
    pub fn new(api: ApiClient, notifier: Arc<dyn Notifier>) -> Self {
        Self { api, notifier }
    }

    /// Create a course. The caller is expected to have validated the payload.
    pub async fn create_course(
        &self,
        course: &NewCourse,
        abort: &AbortSignal,
    ) -> Result<ApiResponse<Value>> {
        let spec = RequestSpec::post(COURSES_PATH)
            .json(serde_json::json!({
                "title": course.title,
                "subject": course.subject,
                "syllabus": course.syllabus,
                "price": course.price,
            }))
            .authenticated()
            .fallback(CREATE_FAILED);

        let response: ApiResponse<Value> = self.api.send(spec, abort).await?;
        tracing::info!(title = %course.title, subject = %course.subject, "Course created");
        Ok(response)
    }

    /// List courses. A response without `data` yields an empty list.
    pub async fn list_courses(&self, abort: &AbortSignal) -> Result<Vec<Course>> {
        let spec = RequestSpec::get(COURSES_PATH)
            .authenticated()
            .fallback(LIST_FAILED);

        match self.api.send::<ApiResponse<Vec<Course>>>(spec, abort).await {
            Ok(response) => {
                let courses = response.data.unwrap_or_default();
                tracing::debug!(count = courses.len(), "Courses fetched");
                self.notifier.success("Courses fetched successfully");
                Ok(courses)
            }
            Err(e) => {
                self.notifier.error(&e.message());
                Err(e)
            }
        }
    }
}

/// Course creation with observable state.
pub struct CreateCourseFlow {
    service: CourseService,
    flow: Flow<ApiResponse<Value>>,
}

impl CreateCourseFlow {
    pub fn new(service: CourseService) -> Self {
        Self {
            service,
            flow: Flow::new("create_course"),
        }
    }

    pub async fn create_course(
        &self,
        course: &NewCourse,
        abort: &AbortSignal,
    ) -> Option<ApiResponse<Value>> {
        self.flow.run(self.service.create_course(course, abort)).await
    }

    pub fn state(&self) -> &Flow<ApiResponse<Value>> {
        &self.flow
    }
}

/// Course listing with observable state.
pub struct CourseListFlow {
    service: CourseService,
    flow: Flow<Vec<Course>>,
}

impl CourseListFlow {
    pub fn new(service: CourseService) -> Self {
        Self {
            service,
            flow: Flow::new("list_courses"),
        }
    }

    pub async fn fetch(&self, abort: &AbortSignal) -> Option<Vec<Course>> {
        self.flow.run(self.service.list_courses(abort)).await
    }

    pub fn state(&self) -> &Flow<Vec<Course>> {
        &self.flow
    }
}
