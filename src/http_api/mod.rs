use std::{net::SocketAddr, sync::Arc};

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
};
use chrono::NaiveDate;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

use crate::{DatedPlan, ScheduleError, StoreError, StoredTask, TaskId, TaskStore};

#[derive(Clone)]
pub struct AppState {
    store: Arc<RwLock<TaskStore>>,
    project_start: Option<NaiveDate>,
}

impl AppState {
    pub fn new(store: TaskStore) -> Self {
        Self {
            store: Arc::new(RwLock::new(store)),
            project_start: None,
        }
    }

    pub fn with_shared(store: Arc<RwLock<TaskStore>>) -> Self {
        Self {
            store,
            project_start: None,
        }
    }

    /// Pins day zero of every dated plan instead of the earliest creation day.
    pub fn with_project_start(mut self, project_start: Option<NaiveDate>) -> Self {
        self.project_start = project_start;
        self
    }

    fn store(&self) -> Arc<RwLock<TaskStore>> {
        self.store.clone()
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    message: String,
}

#[derive(Debug)]
enum ApiError {
    NotFound(String),
    Conflict(String),
    Invalid(String),
    Internal(String),
}

impl From<StoreError> for ApiError {
    fn from(value: StoreError) -> Self {
        let message = value.to_string();
        match value {
            StoreError::TaskNotFound(_) | StoreError::DependencyNotFound(_) => {
                ApiError::NotFound(message)
            }
            StoreError::DuplicateDependency(_) | StoreError::IdSpaceExhausted => {
                ApiError::Conflict(message)
            }
            StoreError::EmptyTitle
            | StoreError::DurationTooLarge { .. }
            | StoreError::SelfDependency(_)
            | StoreError::WouldCreateCycle(_)
            | StoreError::DateOutOfRange(_) => ApiError::Invalid(message),
            StoreError::Schedule(err) => match err {
                ScheduleError::CycleDetected { .. } => ApiError::Invalid(message),
                ScheduleError::UnknownTaskReference { .. } => ApiError::NotFound(message),
                ScheduleError::DuplicateTaskId(_) => ApiError::Internal(message),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, message) = match self {
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, "not_found", message),
            ApiError::Conflict(message) => (StatusCode::CONFLICT, "conflict", message),
            ApiError::Invalid(message) => (StatusCode::BAD_REQUEST, "invalid_request", message),
            ApiError::Internal(message) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", message)
            }
        };
        (status, Json(ErrorBody { error, message })).into_response()
    }
}

#[derive(Debug, Deserialize)]
struct CreateTaskPayload {
    title: String,
    #[serde(default)]
    duration_days: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct DependencyPayload {
    from_id: TaskId,
    to_id: TaskId,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/tasks", get(list_tasks).post(create_task))
        .route("/tasks/:id", delete(delete_task))
        .route(
            "/dependencies",
            post(create_dependency).delete(delete_dependency),
        )
        .route("/dependencies/check", post(check_dependency))
        .route("/plan", get(get_plan))
        .with_state(state)
}

pub async fn serve(addr: SocketAddr, state: AppState) -> std::io::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "http api listening");
    axum::serve(listener, app).await
}

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

async fn list_tasks(State(state): State<AppState>) -> Json<Vec<StoredTask>> {
    let store = state.store();
    let tasks = {
        let guard = store.read();
        guard.list_tasks().to_vec()
    };
    Json(tasks)
}

async fn create_task(
    State(state): State<AppState>,
    Json(payload): Json<CreateTaskPayload>,
) -> Result<(StatusCode, Json<StoredTask>), ApiError> {
    let store = state.store();
    let created = {
        let mut guard = store.write();
        guard.create_task(&payload.title, payload.duration_days)?
    };
    Ok((StatusCode::CREATED, Json(created)))
}

async fn delete_task(
    State(state): State<AppState>,
    Path(task_id): Path<TaskId>,
) -> Result<StatusCode, ApiError> {
    let store = state.store();
    {
        let mut guard = store.write();
        guard.delete_task(task_id)?;
    }
    Ok(StatusCode::NO_CONTENT)
}

async fn create_dependency(
    State(state): State<AppState>,
    Json(payload): Json<DependencyPayload>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    let store = state.store();
    {
        // Prediction and insert share one write guard.
        let mut guard = store.write();
        guard.add_dependency(payload.from_id, payload.to_id)?;
    }
    Ok((StatusCode::CREATED, Json(json!({ "ok": true }))))
}

async fn delete_dependency(
    State(state): State<AppState>,
    Json(payload): Json<DependencyPayload>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let store = state.store();
    {
        let mut guard = store.write();
        guard.remove_dependency(payload.from_id, payload.to_id)?;
    }
    Ok(Json(json!({ "ok": true })))
}

async fn check_dependency(
    State(state): State<AppState>,
    Json(payload): Json<DependencyPayload>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let store = state.store();
    let would_create_cycle = {
        let guard = store.read();
        guard.check_dependency(payload.from_id, payload.to_id)?
    };
    Ok(Json(json!({ "would_create_cycle": would_create_cycle })))
}

async fn get_plan(State(state): State<AppState>) -> Result<Json<DatedPlan>, ApiError> {
    let store = state.store();
    let plan = {
        let guard = store.read();
        guard.plan(state.project_start)?
    };
    Ok(Json(plan))
}
