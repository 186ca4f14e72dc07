// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Wire and session data models.

pub mod api;
pub mod content;
pub mod course;
pub mod login;
pub mod session;

pub use api::ApiResponse;
pub use content::{ContentUpload, UploadFile};
pub use course::{Course, NewCourse};
pub use login::{LoginData, LoginRequest, LoginResponse};
pub use session::{Profile, Session, SessionTokens};
