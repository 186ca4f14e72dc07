// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Admin API client: the one request primitive every flow goes through.
//!
//! Handles:
//! - Bearer auth from the session store
//! - JSON and multipart bodies
//! - Abort signals
//! - Error message extraction for non-2xx responses

use crate::config::Config;
use crate::error::{extract_message, status_message, ClientError, Result};
use crate::flow::AbortSignal;
use crate::session::SessionStore;
use reqwest::header::AUTHORIZATION;
use reqwest::multipart::Form;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;

/// Request body variants accepted by the admin API.
#[derive(Debug)]
pub enum RequestBody {
    Empty,
    Json(Value),
    Multipart(Form),
}

/// Description of one API call.
#[derive(Debug)]
pub struct RequestSpec {
    pub method: Method,
    pub path: String,
    pub body: RequestBody,
    /// Attach `Authorization: Bearer <access token>`
    pub auth: bool,
    /// Message used when neither the server nor the transport gives one
    pub fallback: &'static str,
}

impl RequestSpec {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: RequestBody::Empty,
            auth: false,
            fallback: "Request failed.",
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn json(mut self, body: Value) -> Self {
        self.body = RequestBody::Json(body);
        self
    }

    pub fn multipart(mut self, form: Form) -> Self {
        self.body = RequestBody::Multipart(form);
        self
    }

    pub fn authenticated(mut self) -> Self {
        self.auth = true;
        self
    }

    pub fn fallback(mut self, message: &'static str) -> Self {
        self.fallback = message;
        self
    }
}

/// HTTP client bound to one backend and one session store.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    session: Arc<dyn SessionStore>,
}

impl ApiClient {
    /// Create a client for `config.api_url`.
    pub fn new(config: &Config, session: Arc<dyn SessionStore>) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| ClientError::Transport(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: config.api_url.clone(),
            session,
        })
    }

    pub fn session(&self) -> &Arc<dyn SessionStore> {
        &self.session
    }

    /// Issue a request and decode the JSON response body.
    ///
    /// An empty 2xx body decodes as `{}`.
    pub async fn send<T: DeserializeOwned>(
        &self,
        spec: RequestSpec,
        abort: &AbortSignal,
    ) -> Result<T> {
        if abort.is_aborted() {
            return Err(ClientError::Cancelled);
        }

        let url = format!("{}/{}", self.base_url, spec.path.trim_start_matches('/'));
        let mut request = self.http.request(spec.method.clone(), &url);

        if spec.auth {
            // No token is not an error here: the backend gets "Bearer null" and decides
            // An unreadable store is treated the same way
            let token = self.session.access_token().unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Session unreadable, sending request without a token");
                None
            });
            request = request.header(
                AUTHORIZATION,
                format!("Bearer {}", token.as_deref().unwrap_or("null")),
            );
        }

        request = match spec.body {
            RequestBody::Empty => request,
            RequestBody::Json(body) => request.json(&body),
            RequestBody::Multipart(form) => request.multipart(form),
        };

        let fallback = spec.fallback;
        let started = Instant::now();

        let exchange = async {
            let response = request
                .send()
                .await
                .map_err(|e| ClientError::Transport(extract_message(None, &e.to_string(), fallback)))?;
            let status = response.status();
            let bytes = response
                .bytes()
                .await
                .map_err(|e| ClientError::Transport(extract_message(None, &e.to_string(), fallback)))?;
            Ok::<_, ClientError>((status, bytes))
        };

        let (status, bytes) = tokio::select! {
            result = exchange => result?,
            _ = abort.aborted() => {
                tracing::info!(method = %spec.method, path = %spec.path, "Request aborted");
                return Err(ClientError::Cancelled);
            }
        };

        let elapsed_ms = started.elapsed().as_millis() as u64;
        tracing::debug!(
            method = %spec.method,
            path = %spec.path,
            status = status.as_u16(),
            elapsed_ms,
            "API response"
        );

        if !status.is_success() {
            let body: Option<Value> = serde_json::from_slice(&bytes).ok();
            let message = extract_message(body.as_ref(), &status_message(status.as_u16()), fallback);
            tracing::warn!(
                method = %spec.method,
                path = %spec.path,
                status = status.as_u16(),
                error = %message,
                "API request failed"
            );
            return Err(ClientError::Server {
                status: status.as_u16(),
                message,
            });
        }

        let body: &[u8] = if bytes.iter().all(u8::is_ascii_whitespace) {
            b"{}"
        } else {
            &bytes
        };

        serde_json::from_slice(body).map_err(|e| ClientError::Decode(e.to_string()))
    }
}
