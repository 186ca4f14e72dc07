// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Caller-side form checks run before a flow is invoked.
//!
//! The flows themselves never validate; a form that fails here produces a
//! `ClientError::Validation` and no request is made.

use crate::error::{ClientError, Result};
use crate::models::{ContentUpload, LoginRequest, NewCourse, UploadFile};
use validator::{Validate, ValidationErrors};

/// Subjects offered by the course form. The backend accepts any string.
pub const SUBJECTS: &[&str] = &[
    "Mathematics",
    "Science",
    "English",
    "History",
    "Computer Science",
];

/// Syllabus alignments offered by the course form.
pub const SYLLABI: &[&str] = &["CBSE", "ICSE", "State Board", "IB", "Cambridge"];

/// Course suggestions offered by the upload form. Any course name is accepted.
pub const COURSES: &[&str] = &[
    "Advanced Mathematics for JAMB",
    "Physics for WAEC",
    "Chemistry Fundamentals",
    "English Language Mastery",
];

/// Content types offered by the upload form.
pub const CONTENT_TYPES: &[&str] = &[
    "Video Lesson",
    "PDF Document",
    "Audio Lecture",
    "Quiz",
    "Assignment",
];

const REQUIRED_FIELDS: &str = "Please fill all required fields";

/// First message among `fields`, in the given order.
fn first_message(errors: &ValidationErrors, fields: &[&str]) -> String {
    let by_field = errors.field_errors();
    fields
        .iter()
        .filter_map(|name| by_field.get(*name))
        .flat_map(|errs| errs.iter())
        .find_map(|e| e.message.as_ref().map(|m| m.to_string()))
        .unwrap_or_else(|| REQUIRED_FIELDS.to_string())
}

// ─── Login ───────────────────────────────────────────────────

/// Credentials as typed. Format is left to the backend.
#[derive(Debug, Clone, Default, Validate)]
pub struct LoginForm {
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

impl LoginForm {
    pub fn into_request(self) -> Result<LoginRequest> {
        self.validate()
            .map_err(|e| ClientError::Validation(first_message(&e, &["email", "password"])))?;

        Ok(LoginRequest {
            email: self.email,
            password: self.password,
        })
    }
}

// ─── Course ──────────────────────────────────────────────────

/// New-course form. The title may be split over two inputs.
#[derive(Debug, Clone, Default, Validate)]
pub struct CourseForm {
    #[validate(length(min = 1, message = "Course title is required"))]
    pub title: String,
    pub title_suffix: String,
    #[validate(length(min = 1, message = "Subject is required"))]
    pub subject: String,
    #[validate(length(min = 1, message = "Syllabus is required"))]
    pub syllabus: String,
    /// Smallest currency unit
    #[validate(
        required(message = "Price is required"),
        range(min = 0, message = "Price cannot be negative")
    )]
    pub price: Option<i64>,
}

impl CourseForm {
    pub fn into_course(self) -> Result<NewCourse> {
        self.validate().map_err(|e| {
            ClientError::Validation(first_message(
                &e,
                &["title", "subject", "syllabus", "price"],
            ))
        })?;

        let title = format!("{} {}", self.title, self.title_suffix)
            .trim()
            .to_string();
        if title.is_empty() {
            return Err(ClientError::Validation("Course title is required".to_string()));
        }

        Ok(NewCourse {
            title,
            subject: self.subject,
            syllabus: self.syllabus,
            price: self.price.unwrap_or_default(),
        })
    }
}

// ─── Upload ──────────────────────────────────────────────────

/// Lesson upload form.
#[derive(Debug, Clone, Default, Validate)]
pub struct UploadForm {
    #[validate(length(min = 1, message = "Course is required"))]
    pub course: String,
    #[validate(length(min = 1, message = "Content type is required"))]
    pub content_type: String,
    #[validate(length(min = 1, message = "Lesson title is required"))]
    pub lesson_title: String,
    /// Passed through unvalidated
    pub order: String,
    pub save_to_draft: bool,
    /// Checked after the derived rules, so it is reported last
    pub file: Option<UploadFile>,
}

impl UploadForm {
    pub fn into_upload(self) -> Result<ContentUpload> {
        self.validate().map_err(|e| {
            ClientError::Validation(first_message(
                &e,
                &["course", "content_type", "lesson_title"],
            ))
        })?;

        let file = self
            .file
            .ok_or_else(|| ClientError::Validation("Please upload a file".to_string()))?;

        Ok(ContentUpload {
            course: self.course,
            content_type: self.content_type,
            lesson_title: self.lesson_title,
            order: self.order,
            save_to_draft: self.save_to_draft,
            file,
        })
    }
}
