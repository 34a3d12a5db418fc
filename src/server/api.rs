use std::time::Instant;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::agent::{
    task_templates, AgentRequest, AgentResponse, TaskRequest, TaskResponse, UserId,
};
use crate::contacts::{Contact, ContactCreate, ContactId, ContactQuery, ContactStats, ContactUpdate};
use crate::{Opero, OperoError};

const API_VERSION: &str = "2.0.0";
const TAGLINE: &str = "Streamline. Automate. Excel.";

#[derive(Clone)]
struct AppState {
    opero: Opero,
    started: Instant,
}

impl IntoResponse for OperoError {
    fn into_response(self) -> Response {
        // No route yields the 422 variants today; they map for handlers built
        // on library calls such as `TaskKind::from_str` or `cli::parse_params`.
        let status = match &self {
            OperoError::ContactNotFound(_) => StatusCode::NOT_FOUND,
            OperoError::InvalidInput(_) | OperoError::UnknownTaskType(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        }
        (status, Json(json!({ "detail": self.to_string() }))).into_response()
    }
}

type ApiResult<T> = Result<Json<T>, OperoError>;

// ============================================================
// Service routes
// ============================================================

async fn root() -> Json<Value> {
    Json(json!({
        "message": "Welcome to Opero API v2.0 - AI-Powered Business Automation",
        "status": "operational",
        "endpoints": {
            "contacts": "/contacts",
            "agent": "/agent",
            "health": "/health"
        },
        "tagline": TAGLINE
    }))
}

async fn health() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": "opero-api",
        "version": API_VERSION
    }))
}

async fn info() -> Json<Value> {
    Json(json!({
        "name": "Opero",
        "version": API_VERSION,
        "crate_version": env!("CARGO_PKG_VERSION"),
        "description": "AI-powered business automation platform",
        "tagline": TAGLINE,
        "features": [
            "Intelligent Contact Management",
            "AI-Powered Task Automation",
            "Smart Email & Communication",
            "Advanced Analytics & Reporting"
        ],
        "endpoints": {
            "health": "/health",
            "auth": "/auth",
            "contacts": "/contacts",
            "agent": "/agent",
            "monitoring": "/monitoring"
        }
    }))
}

async fn auth_status() -> Json<Value> {
    Json(json!({
        "status": "available",
        "message": "Authentication system ready",
        "version": API_VERSION
    }))
}

async fn monitoring_health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": "opero-api",
        "version": API_VERSION,
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "uptime_secs": state.started.elapsed().as_secs(),
        "checks": {
            "api": "healthy",
            "contacts": { "status": "operational", "count": state.opero.contacts().len() },
            "context_store": { "status": "operational", "users": state.opero.agent().context_store().len() }
        }
    }))
}

// ============================================================
// Contact routes
// ============================================================

async fn list_contacts(State(state): State<AppState>) -> Json<Vec<Contact>> {
    Json(state.opero.contacts().list())
}

async fn create_contact(
    State(state): State<AppState>,
    Json(payload): Json<ContactCreate>,
) -> Json<Contact> {
    Json(state.opero.contacts().create(payload))
}

async fn get_contact(State(state): State<AppState>, Path(id): Path<ContactId>) -> ApiResult<Contact> {
    Ok(Json(state.opero.contacts().get(id)?))
}

async fn update_contact(
    State(state): State<AppState>,
    Path(id): Path<ContactId>,
    Json(payload): Json<ContactUpdate>,
) -> ApiResult<Contact> {
    Ok(Json(state.opero.contacts().update(id, payload)?))
}

async fn delete_contact(State(state): State<AppState>, Path(id): Path<ContactId>) -> ApiResult<Value> {
    state.opero.contacts().delete(id)?;
    Ok(Json(json!({ "message": "Contact deleted successfully" })))
}

async fn search_contacts(
    State(state): State<AppState>,
    Query(query): Query<ContactQuery>,
) -> Json<Vec<Contact>> {
    Json(state.opero.contacts().search(&query))
}

async fn contact_stats(State(state): State<AppState>) -> Json<ContactStats> {
    Json(state.opero.contacts().stats())
}

// ============================================================
// Agent routes
// ============================================================

async fn agent_chat(
    State(state): State<AppState>,
    Json(request): Json<AgentRequest>,
) -> Json<AgentResponse> {
    Json(state.opero.agent().chat(&request))
}

async fn agent_capabilities(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "capabilities": state.opero.agent().capabilities(),
        "description": "AI-powered business automation assistant",
        "supported_domains": state.opero.agent().capabilities()
    }))
}

async fn agent_context(State(state): State<AppState>, Path(user_id): Path<UserId>) -> Json<Value> {
    Json(json!({
        "user_id": user_id,
        "context": state.opero.agent().user_context(user_id)
    }))
}

async fn agent_demo(State(state): State<AppState>) -> Json<Value> {
    Json(json!({ "demo_conversation": state.opero.agent().demo_conversation() }))
}

async fn agent_task(
    State(state): State<AppState>,
    Json(request): Json<TaskRequest>,
) -> Json<TaskResponse> {
    Json(state.opero.agent().execute_task(&request))
}

async fn agent_task_templates() -> Json<Value> {
    Json(json!({ "templates": task_templates() }))
}

async fn agent_analytics() -> Json<Value> {
    Json(json!({
        "usage_stats": {
            "total_conversations": 147,
            "tasks_completed": 89,
            "success_rate": "94%",
            "avg_response_time": "1.2s"
        },
        "popular_features": [
            {"feature": "Contact Management", "usage": "35%"},
            {"feature": "Email Automation", "usage": "28%"},
            {"feature": "Meeting Scheduling", "usage": "22%"},
            {"feature": "Report Generation", "usage": "15%"}
        ],
        "user_satisfaction": 4.7,
        "efficiency_gains": {
            "time_saved": "12.5 hours/week",
            "automation_rate": "78%",
            "manual_tasks_reduced": "65%"
        }
    }))
}

/// Build the HTTP router over an Opero instance
pub fn router(opero: Opero) -> Router {
    let state = AppState {
        opero,
        started: Instant::now(),
    };

    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/info", get(info))
        .route("/auth/status", get(auth_status))
        .route("/monitoring/health", get(monitoring_health))
        .route("/contacts", get(list_contacts).post(create_contact))
        .route("/contacts/search", get(search_contacts))
        .route("/contacts/search/", get(search_contacts))
        .route("/contacts/stats/overview", get(contact_stats))
        .route(
            "/contacts/:id",
            get(get_contact).put(update_contact).delete(delete_contact),
        )
        .route("/agent/chat", post(agent_chat))
        .route("/agent/capabilities", get(agent_capabilities))
        .route("/agent/context/:user_id", get(agent_context))
        .route("/agent/demo", post(agent_demo))
        .route("/agent/task", post(agent_task))
        .route("/agent/tasks/templates", get(agent_task_templates))
        .route("/agent/analytics", get(agent_analytics))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Serve the API until Ctrl-C
pub async fn run_server(opero: Opero) -> anyhow::Result<()> {
    let addr = opero.config().bind_addr()?;
    let app = router(opero);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Opero API listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::warn!("Failed to listen for shutdown signal: {}", e);
            }
        })
        .await?;
    Ok(())
}
