// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]
#![allow(clippy::multiple_crate_versions)]

use axum::{
    Json, Router,
    extract::{Path as AxumPath, State as AxumState},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use clap::Parser;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use time::OffsetDateTime;
use tokio::sync::Mutex;
use tracing::info;

use gate_pass_api::{
    ApiError, ApiResponse, AuthenticatedOperator, BulkOutingStudentsResponse, BulkOutingView,
    CachedDirectory, DecideBulkOutingRequest, DirectoryError, DirectoryService, ErrorKind,
    IncomingScanRequest, LogOnlyGateway, OutgoingScanRequest, OutgoingScanResponse,
    PermissionLevel, PermissionService, RejectRequest, RequestSummary, RequestView,
    RevealOtpResponse, SetVerificationRequest, StaticPermissionService, StudentProfile,
    SubmitBulkOutingRequest, SubmitRequestRequest, UpdateDetailsRequest,
    VerificationUpdateResponse, VerifyOtpRequest, decide_bulk_outing, get_bulk_outing,
    get_bulk_outing_students, get_request, issue_otp, list_bulk_outings, list_requests,
    principal_approve, record_incoming_visit, record_outgoing_visit, reject_request, reveal_otp,
    set_verification_status, submit_bulk_outing, submit_request, update_request_details,
    verify_otp,
};
use gate_pass_audit::Cause;
use gate_pass_domain::GateConfig;
use gate_pass_persistence::Persistence;

/// How long resolved directory names stay cached.
const DIRECTORY_TTL: Duration = Duration::from_secs(300);

/// Header carrying the operator id on every request.
const OPERATOR_HEADER: &str = "x-operator-id";

/// Header carrying an optional client-supplied request id for audit
/// attribution.
const REQUEST_ID_HEADER: &str = "x-request-id";

/// Gate Pass Server - HTTP server for the hostel gate pass system
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long)]
    database: Option<String>,

    /// Port to bind the server to
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// Path to a JSON student roster file backing the directory
    #[arg(short, long)]
    roster: Option<String>,

    /// Path to a JSON file mapping operator ids to permission levels
    #[arg(short, long)]
    operators: Option<String>,

    /// Permission level for operator ids with no explicit grant
    #[arg(long, default_value = "full")]
    default_level: String,
}

/// Application state shared across handlers.
#[derive(Clone)]
struct AppState {
    /// The persistence layer for requests, visits, and audit events.
    persistence: Arc<Mutex<Persistence>>,
    /// The student directory behind the read-through cache.
    directory: Arc<Mutex<CachedDirectory<StudentRoster>>>,
    /// The notification gateway for guardian code dispatch.
    gateway: Arc<LogOnlyGateway>,
    /// The permission table resolving operator ids to levels.
    permissions: Arc<StaticPermissionService>,
    /// Gate policy knobs (visit ceilings, debounce, QR window, tz).
    config: GateConfig,
}

/// A student record in the roster file.
#[derive(Debug, Clone, Deserialize)]
struct RosterStudent {
    /// The student's display name.
    name: String,
    /// Guardian phone contact, if on file.
    #[serde(default)]
    guardian_contact: Option<String>,
    /// Course identifier or display name.
    #[serde(default)]
    course: String,
    /// Branch identifier or display name.
    #[serde(default)]
    branch: String,
}

/// File-backed student directory for single-node deployments.
///
/// An institutional directory service slots in behind the same
/// `DirectoryService` trait.
#[derive(Debug, Clone, Default, Deserialize)]
struct StudentRoster {
    /// Students keyed by their directory reference.
    #[serde(default)]
    students: HashMap<String, RosterStudent>,
    /// Course id to display name.
    #[serde(default)]
    courses: HashMap<String, String>,
    /// Branch id to display name.
    #[serde(default)]
    branches: HashMap<String, String>,
}

impl StudentRoster {
    /// Loads a roster from a JSON file.
    fn load<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let contents: String = std::fs::read_to_string(path)?;
        let roster: Self = serde_json::from_str(&contents)?;
        Ok(roster)
    }
}

impl DirectoryService for StudentRoster {
    fn get_student(&self, student_ref: &str) -> Result<Option<StudentProfile>, DirectoryError> {
        Ok(self.students.get(student_ref).map(|s| StudentProfile {
            student_ref: student_ref.to_string(),
            name: s.name.clone(),
            guardian_contact: s.guardian_contact.clone(),
            course: s.course.clone(),
            branch: s.branch.clone(),
        }))
    }

    fn get_course_name(&self, course_id: &str) -> Result<Option<String>, DirectoryError> {
        Ok(self.courses.get(course_id).cloned())
    }

    fn get_branch_name(&self, branch_id: &str) -> Result<Option<String>, DirectoryError> {
        Ok(self.branches.get(branch_id).cloned())
    }
}

/// HTTP error wrapper carrying the response envelope.
struct HttpError {
    /// The HTTP status code.
    status: StatusCode,
    /// The error envelope body.
    body: ApiResponse<serde_json::Value>,
}

impl HttpError {
    /// Error for a request without an operator header.
    fn missing_operator() -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            body: ApiResponse {
                success: false,
                data: None,
                error_kind: Some(ErrorKind::Forbidden.as_str()),
                message: format!("Missing {OPERATOR_HEADER} header"),
            },
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        let status: StatusCode = match err.kind() {
            ErrorKind::ValidationError => StatusCode::BAD_REQUEST,
            ErrorKind::NotFound | ErrorKind::NoActiveCode => StatusCode::NOT_FOUND,
            ErrorKind::Forbidden => StatusCode::FORBIDDEN,
            ErrorKind::InvalidStateTransition
            | ErrorKind::VisitLimitReached
            | ErrorKind::InvalidCode => StatusCode::UNPROCESSABLE_ENTITY,
            ErrorKind::Conflict => StatusCode::CONFLICT,
            ErrorKind::QrExpired => StatusCode::GONE,
            ErrorKind::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
        };
        Self {
            status,
            body: ApiResponse::err(&err),
        }
    }
}

/// Parses a permission level string.
fn parse_level(level: &str) -> Option<PermissionLevel> {
    match level.to_lowercase().as_str() {
        "none" => Some(PermissionLevel::None),
        "view" => Some(PermissionLevel::View),
        "full" => Some(PermissionLevel::Full),
        _ => None,
    }
}

/// Resolves the calling operator from the operator header and the
/// permission table.
fn resolve_operator(
    state: &AppState,
    headers: &HeaderMap,
) -> Result<AuthenticatedOperator, HttpError> {
    let operator_id: &str = headers
        .get(OPERATOR_HEADER)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(HttpError::missing_operator)?;

    let level: PermissionLevel = state.permissions.level_for(operator_id);
    Ok(AuthenticatedOperator::new(operator_id.to_string(), level))
}

/// Builds the audit cause for a request, honoring a client-supplied
/// request id when present.
fn request_cause(headers: &HeaderMap, description: &str) -> Cause {
    let cause_id: String = headers
        .get(REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map_or_else(|| String::from("http"), String::from);
    Cause::new(cause_id, String::from(description))
}

/// Handler for POST `/api/requests`.
async fn handle_submit_request(
    AxumState(state): AxumState<AppState>,
    headers: HeaderMap,
    Json(req): Json<SubmitRequestRequest>,
) -> Result<Json<ApiResponse<RequestView>>, HttpError> {
    let operator: AuthenticatedOperator = resolve_operator(&state, &headers)?;
    let cause: Cause = request_cause(&headers, "Submit request over HTTP");

    let mut persistence = state.persistence.lock().await;
    let view: RequestView = submit_request(&mut persistence, req, &operator, cause)?;
    drop(persistence);

    Ok(Json(ApiResponse::ok(view, String::from("Request submitted"))))
}

/// Handler for GET `/api/requests`.
async fn handle_list_requests(
    AxumState(state): AxumState<AppState>,
    headers: HeaderMap,
) -> Result<Json<ApiResponse<Vec<RequestSummary>>>, HttpError> {
    let operator: AuthenticatedOperator = resolve_operator(&state, &headers)?;
    let now: OffsetDateTime = OffsetDateTime::now_utc();

    let persistence = state.persistence.lock().await;
    let rows: Vec<RequestSummary> = list_requests(&persistence, &state.config, &operator, now)?;
    drop(persistence);

    let message: String = format!("{} requests", rows.len());
    Ok(Json(ApiResponse::ok(rows, message)))
}

/// Handler for GET `/api/requests/{id}`.
async fn handle_get_request(
    AxumState(state): AxumState<AppState>,
    AxumPath(public_id): AxumPath<String>,
    headers: HeaderMap,
) -> Result<Json<ApiResponse<RequestView>>, HttpError> {
    let operator: AuthenticatedOperator = resolve_operator(&state, &headers)?;

    let persistence = state.persistence.lock().await;
    let view: RequestView = get_request(&persistence, &public_id, &operator)?;
    drop(persistence);

    Ok(Json(ApiResponse::ok(view, String::from("Request retrieved"))))
}

/// Handler for POST `/api/requests/{id}/otp/issue`.
async fn handle_issue_otp(
    AxumState(state): AxumState<AppState>,
    AxumPath(public_id): AxumPath<String>,
    headers: HeaderMap,
) -> Result<Json<ApiResponse<RequestView>>, HttpError> {
    let operator: AuthenticatedOperator = resolve_operator(&state, &headers)?;
    let cause: Cause = request_cause(&headers, "Issue one-time code over HTTP");
    let now: OffsetDateTime = OffsetDateTime::now_utc();

    let mut persistence = state.persistence.lock().await;
    let directory = state.directory.lock().await;
    let view: RequestView = issue_otp(
        &mut persistence,
        &directory,
        state.gateway.as_ref(),
        &public_id,
        &state.config,
        &operator,
        cause,
        now,
    )?;
    drop(directory);
    drop(persistence);

    Ok(Json(ApiResponse::ok(
        view,
        String::from("One-time code issued"),
    )))
}

/// Handler for GET `/api/requests/{id}/otp`.
async fn handle_reveal_otp(
    AxumState(state): AxumState<AppState>,
    AxumPath(public_id): AxumPath<String>,
    headers: HeaderMap,
) -> Result<Json<ApiResponse<RevealOtpResponse>>, HttpError> {
    let operator: AuthenticatedOperator = resolve_operator(&state, &headers)?;

    let persistence = state.persistence.lock().await;
    let response: RevealOtpResponse = reveal_otp(&persistence, &public_id, &operator)?;
    drop(persistence);

    Ok(Json(ApiResponse::ok(
        response,
        String::from("One-time code revealed"),
    )))
}

/// Handler for POST `/api/requests/{id}/otp/verify`.
async fn handle_verify_otp(
    AxumState(state): AxumState<AppState>,
    AxumPath(public_id): AxumPath<String>,
    headers: HeaderMap,
    Json(req): Json<VerifyOtpRequest>,
) -> Result<Json<ApiResponse<RequestView>>, HttpError> {
    let operator: AuthenticatedOperator = resolve_operator(&state, &headers)?;
    let cause: Cause = request_cause(&headers, "Verify one-time code over HTTP");
    let now: OffsetDateTime = OffsetDateTime::now_utc();

    let mut persistence = state.persistence.lock().await;
    let view: RequestView = verify_otp(
        &mut persistence,
        &public_id,
        req,
        &state.config,
        &operator,
        cause,
        now,
    )?;
    drop(persistence);

    Ok(Json(ApiResponse::ok(
        view,
        String::from("One-time code verified"),
    )))
}

/// Handler for POST `/api/requests/{id}/approve`.
async fn handle_principal_approve(
    AxumState(state): AxumState<AppState>,
    AxumPath(public_id): AxumPath<String>,
    headers: HeaderMap,
) -> Result<Json<ApiResponse<RequestView>>, HttpError> {
    let operator: AuthenticatedOperator = resolve_operator(&state, &headers)?;
    let cause: Cause = request_cause(&headers, "Principal approval over HTTP");
    let now: OffsetDateTime = OffsetDateTime::now_utc();

    let mut persistence = state.persistence.lock().await;
    let view: RequestView = principal_approve(
        &mut persistence,
        &public_id,
        &state.config,
        &operator,
        cause,
        now,
    )?;
    drop(persistence);

    Ok(Json(ApiResponse::ok(view, String::from("Request approved"))))
}

/// Handler for POST `/api/requests/{id}/reject`.
async fn handle_reject_request(
    AxumState(state): AxumState<AppState>,
    AxumPath(public_id): AxumPath<String>,
    headers: HeaderMap,
    Json(req): Json<RejectRequest>,
) -> Result<Json<ApiResponse<RequestView>>, HttpError> {
    let operator: AuthenticatedOperator = resolve_operator(&state, &headers)?;
    let cause: Cause = request_cause(&headers, "Reject request over HTTP");
    let now: OffsetDateTime = OffsetDateTime::now_utc();

    let mut persistence = state.persistence.lock().await;
    let view: RequestView = reject_request(
        &mut persistence,
        &public_id,
        req,
        &state.config,
        &operator,
        cause,
        now,
    )?;
    drop(persistence);

    Ok(Json(ApiResponse::ok(view, String::from("Request rejected"))))
}

/// Handler for POST `/api/requests/{id}/gate/outgoing`.
async fn handle_record_outgoing(
    AxumState(state): AxumState<AppState>,
    AxumPath(public_id): AxumPath<String>,
    headers: HeaderMap,
    Json(req): Json<OutgoingScanRequest>,
) -> Result<Json<ApiResponse<OutgoingScanResponse>>, HttpError> {
    let operator: AuthenticatedOperator = resolve_operator(&state, &headers)?;
    let cause: Cause = request_cause(&headers, "Outgoing gate scan over HTTP");
    let now: OffsetDateTime = OffsetDateTime::now_utc();

    let mut persistence = state.persistence.lock().await;
    let response: OutgoingScanResponse = record_outgoing_visit(
        &mut persistence,
        &public_id,
        req,
        &state.config,
        &operator,
        cause,
        now,
    )?;
    drop(persistence);

    Ok(Json(ApiResponse::ok(
        response,
        String::from("Outgoing visit recorded"),
    )))
}

/// Handler for POST `/api/requests/{id}/gate/incoming`.
async fn handle_record_incoming(
    AxumState(state): AxumState<AppState>,
    AxumPath(public_id): AxumPath<String>,
    headers: HeaderMap,
    Json(req): Json<IncomingScanRequest>,
) -> Result<Json<ApiResponse<RequestView>>, HttpError> {
    let operator: AuthenticatedOperator = resolve_operator(&state, &headers)?;
    let cause: Cause = request_cause(&headers, "Incoming gate scan over HTTP");
    let now: OffsetDateTime = OffsetDateTime::now_utc();

    let mut persistence = state.persistence.lock().await;
    let view: RequestView = record_incoming_visit(
        &mut persistence,
        &public_id,
        req,
        &state.config,
        &operator,
        cause,
        now,
    )?;
    drop(persistence);

    Ok(Json(ApiResponse::ok(
        view,
        String::from("Incoming visit recorded"),
    )))
}

/// Handler for POST `/api/requests/{id}/verification`.
async fn handle_set_verification(
    AxumState(state): AxumState<AppState>,
    AxumPath(public_id): AxumPath<String>,
    headers: HeaderMap,
    Json(req): Json<SetVerificationRequest>,
) -> Result<Json<ApiResponse<VerificationUpdateResponse>>, HttpError> {
    let operator: AuthenticatedOperator = resolve_operator(&state, &headers)?;
    let cause: Cause = request_cause(&headers, "Set verification status over HTTP");
    let now: OffsetDateTime = OffsetDateTime::now_utc();

    let mut persistence = state.persistence.lock().await;
    let response: VerificationUpdateResponse = set_verification_status(
        &mut persistence,
        &public_id,
        req,
        &state.config,
        &operator,
        cause,
        now,
    )?;
    drop(persistence);

    Ok(Json(ApiResponse::ok(
        response,
        String::from("Verification status updated"),
    )))
}

/// Handler for PUT `/api/requests/{id}`.
async fn handle_update_request(
    AxumState(state): AxumState<AppState>,
    AxumPath(public_id): AxumPath<String>,
    headers: HeaderMap,
    Json(req): Json<UpdateDetailsRequest>,
) -> Result<Json<ApiResponse<RequestView>>, HttpError> {
    let operator: AuthenticatedOperator = resolve_operator(&state, &headers)?;
    let cause: Cause = request_cause(&headers, "Update request details over HTTP");

    let mut persistence = state.persistence.lock().await;
    let view: RequestView = update_request_details(
        &mut persistence,
        &public_id,
        req,
        &state.config,
        &operator,
        cause,
    )?;
    drop(persistence);

    Ok(Json(ApiResponse::ok(
        view,
        String::from("Request details updated"),
    )))
}

/// Handler for POST `/api/bulk-outings`.
async fn handle_submit_bulk_outing(
    AxumState(state): AxumState<AppState>,
    headers: HeaderMap,
    Json(req): Json<SubmitBulkOutingRequest>,
) -> Result<Json<ApiResponse<BulkOutingView>>, HttpError> {
    let operator: AuthenticatedOperator = resolve_operator(&state, &headers)?;
    let cause: Cause = request_cause(&headers, "Submit bulk outing over HTTP");

    let mut persistence = state.persistence.lock().await;
    let view: BulkOutingView = submit_bulk_outing(&mut persistence, req, &operator, cause)?;
    drop(persistence);

    Ok(Json(ApiResponse::ok(
        view,
        String::from("Bulk outing submitted"),
    )))
}

/// Handler for GET `/api/bulk-outings`.
async fn handle_list_bulk_outings(
    AxumState(state): AxumState<AppState>,
    headers: HeaderMap,
) -> Result<Json<ApiResponse<Vec<BulkOutingView>>>, HttpError> {
    let operator: AuthenticatedOperator = resolve_operator(&state, &headers)?;

    let persistence = state.persistence.lock().await;
    let outings: Vec<BulkOutingView> = list_bulk_outings(&persistence, &operator)?;
    drop(persistence);

    let message: String = format!("{} bulk outings", outings.len());
    Ok(Json(ApiResponse::ok(outings, message)))
}

/// Handler for GET `/api/bulk-outings/{id}`.
async fn handle_get_bulk_outing(
    AxumState(state): AxumState<AppState>,
    AxumPath(public_id): AxumPath<String>,
    headers: HeaderMap,
) -> Result<Json<ApiResponse<BulkOutingView>>, HttpError> {
    let operator: AuthenticatedOperator = resolve_operator(&state, &headers)?;

    let persistence = state.persistence.lock().await;
    let view: BulkOutingView = get_bulk_outing(&persistence, &public_id, &operator)?;
    drop(persistence);

    Ok(Json(ApiResponse::ok(
        view,
        String::from("Bulk outing retrieved"),
    )))
}

/// Handler for POST `/api/bulk-outings/{id}/decide`.
async fn handle_decide_bulk_outing(
    AxumState(state): AxumState<AppState>,
    AxumPath(public_id): AxumPath<String>,
    headers: HeaderMap,
    Json(req): Json<DecideBulkOutingRequest>,
) -> Result<Json<ApiResponse<BulkOutingView>>, HttpError> {
    let operator: AuthenticatedOperator = resolve_operator(&state, &headers)?;
    let cause: Cause = request_cause(&headers, "Decide bulk outing over HTTP");
    let now: OffsetDateTime = OffsetDateTime::now_utc();

    let mut persistence = state.persistence.lock().await;
    let view: BulkOutingView =
        decide_bulk_outing(&mut persistence, &public_id, req, &operator, cause, now)?;
    drop(persistence);

    Ok(Json(ApiResponse::ok(
        view,
        String::from("Bulk outing decided"),
    )))
}

/// Handler for GET `/api/bulk-outings/{id}/students`.
async fn handle_get_bulk_outing_students(
    AxumState(state): AxumState<AppState>,
    AxumPath(public_id): AxumPath<String>,
    headers: HeaderMap,
) -> Result<Json<ApiResponse<BulkOutingStudentsResponse>>, HttpError> {
    let operator: AuthenticatedOperator = resolve_operator(&state, &headers)?;

    let persistence = state.persistence.lock().await;
    let response: BulkOutingStudentsResponse =
        get_bulk_outing_students(&persistence, &public_id, &operator)?;
    drop(persistence);

    Ok(Json(ApiResponse::ok(
        response,
        String::from("Bulk outing roster retrieved"),
    )))
}

/// Handler for GET /health.
async fn handle_health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

/// Builds the application router with all endpoints.
fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/api/requests", post(handle_submit_request))
        .route("/api/requests", get(handle_list_requests))
        .route("/api/requests/{id}", get(handle_get_request))
        .route("/api/requests/{id}", put(handle_update_request))
        .route("/api/requests/{id}/otp", get(handle_reveal_otp))
        .route("/api/requests/{id}/otp/issue", post(handle_issue_otp))
        .route("/api/requests/{id}/otp/verify", post(handle_verify_otp))
        .route("/api/requests/{id}/approve", post(handle_principal_approve))
        .route("/api/requests/{id}/reject", post(handle_reject_request))
        .route("/api/requests/{id}/gate/outgoing", post(handle_record_outgoing))
        .route("/api/requests/{id}/gate/incoming", post(handle_record_incoming))
        .route("/api/requests/{id}/verification", post(handle_set_verification))
        .route("/api/bulk-outings", post(handle_submit_bulk_outing))
        .route("/api/bulk-outings", get(handle_list_bulk_outings))
        .route("/api/bulk-outings/{id}", get(handle_get_bulk_outing))
        .route("/api/bulk-outings/{id}/decide", post(handle_decide_bulk_outing))
        .route(
            "/api/bulk-outings/{id}/students",
            get(handle_get_bulk_outing_students),
        )
        .route("/health", get(handle_health))
        .with_state(app_state)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command-line arguments
    let args: Args = Args::parse();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing Gate Pass Server");

    // Initialize persistence (in-memory or file-based based on CLI argument)
    let persistence: Persistence = if let Some(db_path) = &args.database {
        info!("Using file-based database at: {}", db_path);
        Persistence::new_with_file(db_path)?
    } else {
        info!("Using in-memory database");
        Persistence::new_in_memory()?
    };

    // Load the student roster backing the directory, if provided
    let roster: StudentRoster = if let Some(roster_path) = &args.roster {
        info!("Loading student roster from: {}", roster_path);
        StudentRoster::load(roster_path)?
    } else {
        info!("No roster file provided; directory lookups will miss");
        StudentRoster::default()
    };

    // Build the permission table
    let default_level: PermissionLevel = parse_level(&args.default_level)
        .ok_or_else(|| format!("invalid default level '{}'", args.default_level))?;
    let mut permissions: StaticPermissionService = StaticPermissionService::new(default_level);
    if let Some(operators_path) = &args.operators {
        info!("Loading operator grants from: {}", operators_path);
        let contents: String = std::fs::read_to_string(operators_path)?;
        let grants: HashMap<String, String> = serde_json::from_str(&contents)?;
        for (operator_id, level_str) in &grants {
            let level: PermissionLevel = parse_level(level_str)
                .ok_or_else(|| format!("invalid level '{level_str}' for '{operator_id}'"))?;
            permissions.grant(operator_id, level);
        }
    }

    let app_state: AppState = AppState {
        persistence: Arc::new(Mutex::new(persistence)),
        directory: Arc::new(Mutex::new(CachedDirectory::new(roster, DIRECTORY_TTL))),
        gateway: Arc::new(LogOnlyGateway),
        permissions: Arc::new(permissions),
        config: GateConfig::default(),
    };

    // Build router
    let app: Router = build_router(app_state);

    // Bind to address
    let addr: std::net::SocketAddr = format!("127.0.0.1:{}", args.port).parse()?;
    info!("Server listening on {}", addr);

    // Run server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
