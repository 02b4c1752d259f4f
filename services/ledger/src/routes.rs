//! Ledger service routes

use auth::{middleware::session_middleware, models::Session};
use axum::{
    Extension, Json, Router,
    extract::{Query, State},
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::get,
};
use chrono::{NaiveDate, Utc};
use common::store::Table;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

use crate::{
    dashboard::{Analytics, OverviewMetrics, payment_reminders},
    error::{ApiError, ApiResult},
    middleware::{require_admin, require_viewer},
    models::{
        Client, Expense, NewProject, PaidStatus, Project, Salary, ScheduledPost, TableResponse,
    },
    reminders::{ClassifiedReminder, ReminderWindows, compute_reminders},
    state::AppState,
};

/// Query for the reminder listing
#[derive(Debug, Deserialize)]
pub struct ReminderQuery {
    /// Reference date, defaults to the current UTC date
    pub today: Option<NaiveDate>,
}

/// Response for the reminder listing
#[derive(Debug, Serialize, Deserialize)]
pub struct ReminderResponse {
    pub today: NaiveDate,
    pub windows: ReminderWindows,
    pub reminders: Vec<ClassifiedReminder>,
}

/// Create the router for the ledger service, including the auth routes
pub fn create_router(state: AppState) -> Router {
    let protected_routes = Router::new()
        .route("/dashboard/metrics", get(dashboard_metrics))
        .route("/dashboard/reminders", get(dashboard_reminders))
        .route("/dashboard/analytics", get(dashboard_analytics))
        .route("/clients", get(list_rows::<Client>).post(create_client))
        .route("/projects", get(list_rows::<Project>).post(create_project))
        .route("/salaries", get(list_rows::<Salary>).post(create_salary))
        .route("/expenses", get(list_rows::<Expense>).post(create_expense))
        .route("/schedule", get(list_rows::<ScheduledPost>).post(create_post))
        .route_layer(middleware::from_fn_with_state(
            state.auth.clone(),
            session_middleware,
        ));

    let auth_routes = auth::routes::create_router(state.auth.clone());

    Router::new()
        .route("/health", get(health_check))
        .merge(protected_routes)
        .with_state(state)
        .merge(auth_routes)
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "ledger"
    }))
}

/// Overview metrics
pub async fn dashboard_metrics(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
) -> ApiResult<Json<OverviewMetrics>> {
    require_viewer(&state, &session)?;

    let snapshot = state.ledger.snapshot().await?;
    Ok(Json(OverviewMetrics::compute(
        &snapshot.clients,
        &snapshot.salaries,
        &snapshot.expenses,
    )))
}

/// Upcoming payments classified by urgency
pub async fn dashboard_reminders(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Query(query): Query<ReminderQuery>,
) -> ApiResult<Json<ReminderResponse>> {
    require_viewer(&state, &session)?;

    let today = query.today.unwrap_or_else(|| Utc::now().date_naive());
    let snapshot = state.ledger.snapshot().await?;
    let records = payment_reminders(&snapshot.salaries, &snapshot.projects);
    let reminders = compute_reminders(&records, today, state.reminder_windows);

    info!(
        "Computed {} reminders out of {} payments for {}",
        reminders.len(),
        records.len(),
        today
    );

    Ok(Json(ReminderResponse {
        today,
        windows: state.reminder_windows,
        reminders,
    }))
}

/// Analytics aggregates
pub async fn dashboard_analytics(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
) -> ApiResult<Json<Analytics>> {
    require_viewer(&state, &session)?;

    let snapshot = state.ledger.snapshot().await?;
    Ok(Json(Analytics::compute(&snapshot)))
}

/// List every row of a table
pub async fn list_rows<T>(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
) -> ApiResult<Json<TableResponse<T>>>
where
    T: Table + Send + 'static,
{
    require_viewer(&state, &session)?;

    Ok(Json(TableResponse {
        table: T::NAME,
        rows: state.ledger.list::<T>().await?,
    }))
}

/// Add a client
pub async fn create_client(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Json(client): Json<Client>,
) -> ApiResult<impl IntoResponse> {
    require_admin(&state, &session)?;

    if client.name.trim().is_empty() {
        return Err(ApiError::BadRequest("Client name is required".to_string()));
    }
    non_negative(&[client.total_paid, client.total_due])?;

    info!("User {} adds client {}", session.identity, client.name);
    state.ledger.append(client.clone()).await?;

    Ok((StatusCode::CREATED, Json(client)))
}

/// Add a project; the client must exist
pub async fn create_project(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Json(payload): Json<NewProject>,
) -> ApiResult<impl IntoResponse> {
    require_admin(&state, &session)?;
    require_client(&state, &payload.client).await?;

    let project = payload.into_project().map_err(ApiError::BadRequest)?;

    info!(
        "User {} adds project {} for {}",
        session.identity, project.name, project.client
    );
    state.ledger.append(project.clone()).await?;

    Ok((StatusCode::CREATED, Json(project)))
}

/// Add a salary payment
pub async fn create_salary(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Json(salary): Json<Salary>,
) -> ApiResult<impl IntoResponse> {
    require_admin(&state, &session)?;

    if salary.employee.trim().is_empty() {
        return Err(ApiError::BadRequest("Employee name is required".to_string()));
    }
    if let PaidStatus::Other(value) = &salary.paid {
        return Err(ApiError::BadRequest(format!(
            "Paid must be Yes or No, got {:?}",
            value
        )));
    }
    non_negative(&[salary.amount])?;

    info!("User {} adds salary for {}", session.identity, salary.employee);
    state.ledger.append(salary.clone()).await?;

    Ok((StatusCode::CREATED, Json(salary)))
}

/// Add an expense
pub async fn create_expense(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Json(expense): Json<Expense>,
) -> ApiResult<impl IntoResponse> {
    require_admin(&state, &session)?;

    if expense.category.trim().is_empty() {
        return Err(ApiError::BadRequest("Category is required".to_string()));
    }
    non_negative(&[expense.amount])?;

    info!("User {} adds expense in {}", session.identity, expense.category);
    state.ledger.append(expense.clone()).await?;

    Ok((StatusCode::CREATED, Json(expense)))
}

/// Schedule a social-media post; the client must exist
pub async fn create_post(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Json(post): Json<ScheduledPost>,
) -> ApiResult<impl IntoResponse> {
    require_admin(&state, &session)?;
    if post.date.is_none() {
        return Err(ApiError::BadRequest("Post date is required".to_string()));
    }
    require_client(&state, &post.client).await?;

    info!(
        "User {} schedules {} post for {}",
        session.identity, post.platform, post.client
    );
    state.ledger.append(post.clone()).await?;

    Ok((StatusCode::CREATED, Json(post)))
}

async fn require_client(state: &AppState, name: &str) -> ApiResult<()> {
    if state.ledger.client_exists(name).await? {
        Ok(())
    } else {
        Err(ApiError::BadRequest(format!("Unknown client: {}", name)))
    }
}

fn non_negative(amounts: &[f64]) -> ApiResult<()> {
    if amounts.iter().all(|a| a.is_finite() && *a >= 0.0) {
        Ok(())
    } else {
        Err(ApiError::BadRequest(
            "Amounts must be non-negative".to_string(),
        ))
    }
}
