// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Course-Admin: administrative client for a course-management platform
//!
//! An admin logs in, creates course records and uploads lesson content
//! against them. This crate provides the session store those calls share
//! and one request flow per operation.

pub mod config;
pub mod error;
pub mod flow;
pub mod forms;
pub mod models;
pub mod notify;
pub mod services;
pub mod session;

use config::Config;
use error::Result;
use notify::{Notifier, TracingNotifier};
use services::{ApiClient, AuthService, ContentService, CourseService};
use session::{FileSessionStore, SessionStore};
use std::sync::Arc;

/// Shared client handles.
pub struct AdminClient {
    pub config: Config,
    pub session: Arc<dyn SessionStore>,
    pub auth: AuthService,
    pub courses: CourseService,
    pub content: ContentService,
}

impl AdminClient {
    /// Wire up services around an explicit session store and notifier.
    pub fn new(
        config: Config,
        session: Arc<dyn SessionStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self> {
        let api = ApiClient::new(&config, session.clone())?;

        Ok(Self {
            auth: AuthService::new(api.clone()),
            courses: CourseService::new(api.clone(), notifier.clone()),
            content: ContentService::new(api, notifier),
            session,
            config,
        })
    }

    /// File-backed session at `config.session_file`, notices to the log.
    pub fn from_config(config: Config) -> Result<Self> {
        let session = Arc::new(FileSessionStore::new(config.session_file.clone()));
        Self::new(config, session, Arc::new(TracingNotifier))
    }
}
