use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use crate::bitbucket::BitbucketClient;
use crate::error::{Error, Result};
use crate::format;
use crate::tools;

/// Shared state for all routes: the one pooled upstream client.
#[derive(Clone)]
pub struct AppState {
    pub client: Arc<BitbucketClient>,
}

/// HTTP surface over the same operations the tool registry exposes. Each
/// route is a thin wrapper returning the tool's text as `text/plain`.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(welcome))
        .route("/health", get(health))
        .route(
            "/api/v1/:project/:repository/pull-requests",
            get(pull_requests),
        )
        .route(
            "/api/v1/:project/:repository/pull-requests/:pull_request_id/changes",
            get(changes),
        )
        .route(
            "/api/v1/:project/:repository/:pull_request_id/*path",
            get(file_diff),
        )
        .with_state(state)
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = match &self {
            Error::Upstream { .. } => StatusCode::BAD_GATEWAY,
            Error::Transport(_) => StatusCode::GATEWAY_TIMEOUT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, tools::describe_failure(&self)).into_response()
    }
}

async fn pull_requests(
    State(state): State<AppState>,
    Path((project, repository)): Path<(String, String)>,
) -> Result<String> {
    let prs = state
        .client
        .list_open_pull_requests(&project, &repository)
        .await?;
    Ok(format::pull_requests(&prs))
}

async fn changes(
    State(state): State<AppState>,
    Path((project, repository, pull_request_id)): Path<(String, String, u64)>,
) -> Result<String> {
    let changes = state
        .client
        .list_changes(&project, &repository, pull_request_id)
        .await?;
    Ok(format::changes(&changes))
}

async fn file_diff(
    State(state): State<AppState>,
    Path((project, repository, pull_request_id, path)): Path<(String, String, u64, String)>,
) -> Result<String> {
    state
        .client
        .file_diff(&project, &repository, pull_request_id, &path)
        .await
}

#[derive(Debug, Serialize)]
struct Welcome {
    name: String,
    version: String,
    message: String,
}

/// GET /
async fn welcome() -> Json<Welcome> {
    Json(Welcome {
        name: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        message: "Bitbucket pull request tools over HTTP".to_string(),
    })
}

#[derive(Debug, Serialize)]
struct Health {
    status: String,
    version: String,
}

/// GET /health
async fn health() -> Json<Health> {
    Json(Health {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
