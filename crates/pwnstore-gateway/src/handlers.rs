// SPDX-FileCopyrightText: 2026 Pwnstore Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers for the web store.
//!
//! Mutating endpoints answer with a `{success, message}` or
//! `{success: false, error}` envelope. Request bodies are parsed by hand so
//! that malformed JSON gets the envelope too.

use std::future::Future;
use std::time::Duration;

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Json,
};
use pwnstore_core::PwnstoreError;
use pwnstore_plugin::ConfigHint;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{error, info};

use crate::server::GatewayState;

const INDEX_HTML: &str = include_str!("../assets/index.html");

/// Body of install and uninstall requests.
#[derive(Debug, Default, Deserialize)]
pub struct PluginRequest {
    #[serde(default)]
    pub plugin: Option<String>,
}

/// Body of configure requests.
#[derive(Debug, Default, Deserialize)]
pub struct ConfigureRequest {
    #[serde(default)]
    pub plugin: Option<String>,
    #[serde(default)]
    pub config: serde_json::Map<String, Value>,
}

/// Success envelope for simple actions.
#[derive(Debug, Serialize)]
pub struct ActionResponse {
    pub success: bool,
    pub message: String,
}

/// Success envelope for installs.
#[derive(Debug, Serialize)]
pub struct InstallResponse {
    pub success: bool,
    pub message: String,
    pub reinstall: bool,
    pub config_required: bool,
    pub config_hints: Vec<ConfigHint>,
}

/// Error envelope.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorResponse {
            success: false,
            error: message.into(),
        }),
    )
        .into_response()
}

/// Maps engine errors onto HTTP statuses.
fn engine_error(err: &PwnstoreError) -> Response {
    let status = match err {
        PwnstoreError::Validation(_) => StatusCode::BAD_REQUEST,
        PwnstoreError::NotFound(_) => StatusCode::NOT_FOUND,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    error_response(status, err.to_string())
}

fn parse_body<T: serde::de::DeserializeOwned>(body: &Bytes) -> Result<T, Response> {
    serde_json::from_slice(body).map_err(|e| {
        error!(error = %e, "invalid request body");
        error_response(StatusCode::BAD_REQUEST, "Invalid request data")
    })
}

fn plugin_name(request: PluginRequest) -> Result<String, Response> {
    request
        .plugin
        .filter(|name| !name.is_empty())
        .ok_or_else(|| error_response(StatusCode::BAD_REQUEST, "No plugin name provided"))
}

/// Runs `action` within `budget`. Elapsed budgets map to a 500 with `timeout_message`.
async fn within<T>(
    budget: Duration,
    timeout_message: &str,
    action: impl Future<Output = Result<T, PwnstoreError>>,
) -> Result<T, Response> {
    match tokio::time::timeout(budget, action).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => {
            error!(error = %e, "request failed");
            Err(engine_error(&e))
        }
        Err(_) => {
            error!(budget_secs = budget.as_secs(), "{timeout_message}");
            Err(error_response(StatusCode::INTERNAL_SERVER_ERROR, timeout_message))
        }
    }
}

/// GET / - the store page.
pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// Unknown paths.
pub async fn not_found() -> (StatusCode, &'static str) {
    (StatusCode::NOT_FOUND, "Not found")
}

/// GET /api/plugins - the registry document as fetched.
pub async fn get_plugins(State(state): State<GatewayState>) -> Response {
    match state.engine.registry().await {
        Ok(registry) => Json(registry).into_response(),
        Err(e) => {
            error!(error = %e, "failed to fetch registry");
            engine_error(&e)
        }
    }
}

/// GET /api/installed - installed plugin names.
pub async fn get_installed(State(state): State<GatewayState>) -> Response {
    match state.engine.installed() {
        Ok(names) => Json(names).into_response(),
        Err(e) => {
            error!(error = %e, "failed to list installed plugins");
            engine_error(&e)
        }
    }
}

/// POST /api/install - `{plugin}`.
pub async fn post_install(State(state): State<GatewayState>, body: Bytes) -> Response {
    let name = match parse_body(&body).and_then(plugin_name) {
        Ok(name) => name,
        Err(response) => return response,
    };
    info!(plugin = %name, "web install requested");

    match within(
        state.install_timeout,
        "Installation timeout",
        state.engine.install(&name),
    )
    .await
    {
        Ok(outcome) => {
            let action = if outcome.reinstall { "reinstalled" } else { "installed" };
            Json(InstallResponse {
                success: true,
                message: format!("{name} {action}"),
                reinstall: outcome.reinstall,
                config_required: !outcome.hints.is_empty(),
                config_hints: outcome.hints,
            })
            .into_response()
        }
        Err(response) => response,
    }
}

/// POST /api/uninstall - `{plugin}`.
pub async fn post_uninstall(State(state): State<GatewayState>, body: Bytes) -> Response {
    let name = match parse_body(&body).and_then(plugin_name) {
        Ok(name) => name,
        Err(response) => return response,
    };
    info!(plugin = %name, "web uninstall requested");

    match within(
        state.uninstall_timeout,
        "Uninstall timeout",
        state.engine.uninstall(&name),
    )
    .await
    {
        Ok(_) => Json(ActionResponse {
            success: true,
            message: format!("{name} removed"),
        })
        .into_response(),
        Err(response) => response,
    }
}

/// POST /api/configure - `{plugin, config: {key: value}}`.
pub async fn post_configure(State(state): State<GatewayState>, body: Bytes) -> Response {
    let request: ConfigureRequest = match parse_body(&body) {
        Ok(request) => request,
        Err(response) => return response,
    };
    let name = match request.plugin.filter(|n| !n.is_empty()) {
        Some(name) if !request.config.is_empty() => name,
        _ => {
            return error_response(
                StatusCode::BAD_REQUEST,
                "Missing plugin name or config values",
            )
        }
    };

    let values: Vec<(String, String)> = request
        .config
        .into_iter()
        .map(|(key, value)| (key, value_text(value)))
        .collect();
    info!(plugin = %name, count = values.len(), "web configure requested");

    match within(
        state.configure_timeout,
        "Configuration timeout",
        state.engine.configure(&name, values),
    )
    .await
    {
        Ok(()) => Json(ActionResponse {
            success: true,
            message: format!("{name} configured successfully"),
        })
        .into_response(),
        Err(response) => response,
    }
}

/// Strings are taken as-is; anything else as its JSON text.
fn value_text(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn values_become_text() {
        assert_eq!(value_text(Value::String("a".into())), "a");
        assert_eq!(value_text(serde_json::json!(8080)), "8080");
        assert_eq!(value_text(serde_json::json!(true)), "true");
        assert_eq!(value_text(Value::Null), "");
    }

    #[test]
    fn empty_plugin_name_is_rejected() {
        let response = plugin_name(PluginRequest {
            plugin: Some(String::new()),
        })
        .unwrap_err();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn error_statuses_follow_error_kind() {
        let cases = [
            (PwnstoreError::Validation("x".into()), StatusCode::BAD_REQUEST),
            (PwnstoreError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (PwnstoreError::Permission("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(engine_error(&err).status(), status);
        }
    }
}
