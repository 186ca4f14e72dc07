// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - one request flow per admin operation.

pub mod api;
pub mod auth;
pub mod content;
pub mod courses;

pub use api::{ApiClient, RequestBody, RequestSpec};
pub use auth::{AuthService, LoginFlow};
pub use content::{ContentService, UploadContentFlow};
pub use courses::{CourseListFlow, CourseService, CreateCourseFlow};
