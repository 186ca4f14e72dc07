// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Admin login and session bookkeeping.

use crate::error::Result;
use crate::flow::{AbortSignal, Flow};
use crate::models::{LoginRequest, LoginResponse, Session, SessionTokens};
use crate::services::api::{ApiClient, RequestSpec};

pub const LOGIN_PATH: &str = "/api/v1/auth/admin-login";
const LOGIN_FAILED: &str = "Login failed. Please try again.";

/// Authentication service.
#[derive(Clone)]
pub struct AuthService {
    api: ApiClient,
}

impl AuthService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Log in and, if the backend hands out an access token, store the session.
    ///
    /// The full response body is returned either way.
    pub async fn login(&self, request: &LoginRequest, abort: &AbortSignal) -> Result<LoginResponse> {
        tracing::info!(email = %request.email, "Admin login");

        let spec = RequestSpec::post(LOGIN_PATH)
            .json(serde_json::json!({
                "email": request.email,
                "password": request.password,
            }))
            .fallback(LOGIN_FAILED);

        let response: LoginResponse = self.api.send(spec, abort).await?;

        if let Some(data) = &response.data {
            if data.has_access_token() {
                self.api.session().set(
                    SessionTokens {
                        access_token: data.access_token.clone().unwrap_or_default(),
                        refresh_token: data.refresh_token.clone(),
                    },
                    data.profile.clone(),
                )?;
                tracing::info!(
                    email = %request.email,
                    role = data.role.as_deref().unwrap_or("<none>"),
                    "Session stored"
                );
            } else {
                tracing::warn!(email = %request.email, "Login response carried no access token");
            }
        }

        Ok(response)
    }

    /// Drop the stored session.
    pub fn logout(&self) -> Result<()> {
        self.api.session().clear()?;
        tracing::info!("Session cleared");
        Ok(())
    }

    pub fn current_session(&self) -> Result<Option<Session>> {
        self.api.session().get()
    }
}

/// Login with observable loading/error/data state.
pub struct LoginFlow {
    service: AuthService,
    flow: Flow<LoginResponse>,
}

impl LoginFlow {
    pub fn new(service: AuthService) -> Self {
        Self {
            service,
            flow: Flow::new("login"),
        }
    }

    pub async fn login(&self, request: &LoginRequest, abort: &AbortSignal) -> Option<LoginResponse> {
        self.flow.run(self.service.login(request, abort)).await
    }

    pub fn state(&self) -> &Flow<LoginResponse> {
        &self.flow
    }
}
