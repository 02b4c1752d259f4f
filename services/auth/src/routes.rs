//! Authentication service routes

use axum::{
    Extension, Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{get, post, put},
};
use chrono::Utc;
use common::store::run_blocking;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::{
    AuthState,
    error::{ApiError, ApiResult, AuthError, CredentialError},
    middleware::{require_role, session_middleware},
    models::{LoginCredentials, NewCredential, Role, Session, SessionInfo, UpdateCredential},
};

/// Response for user login
#[derive(Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: Uuid,
    pub token_type: String,
    pub session: SessionInfo,
}

/// Query for access checks
#[derive(Deserialize)]
pub struct AccessQuery {
    pub role: Role,
}

/// Response for access checks
#[derive(Serialize, Deserialize)]
pub struct AccessResponse {
    pub role: Role,
    pub granted: bool,
}

/// Create the router for login, session and credential management
pub fn create_router(state: AuthState) -> Router {
    let protected_routes = Router::new()
        .route("/auth/logout", post(logout))
        .route("/auth/session", get(current_session))
        .route("/auth/access", get(check_access))
        .route("/admin/users", get(list_users).post(create_user))
        .route("/admin/users/:username", put(update_user).delete(delete_user))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            session_middleware,
        ));

    Router::new()
        .route("/auth/health", get(health_check))
        .route("/auth/login", post(login))
        .merge(protected_routes)
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check(State(state): State<AuthState>) -> impl IntoResponse {
    let credentials = state.credentials().clone();
    let status = if run_blocking(move || credentials.load()).await.is_ok() {
        "ok"
    } else {
        "degraded"
    };

    Json(serde_json::json!({
        "status": status,
        "service": "auth",
        "active_sessions": state.registry.len().await,
    }))
}

/// User login endpoint
pub async fn login(
    State(state): State<AuthState>,
    Json(payload): Json<LoginCredentials>,
) -> ApiResult<impl IntoResponse> {
    info!("Login attempt for user: {}", payload.username);

    if let Some(throttle) = &state.login_throttle {
        if !throttle.is_allowed(&payload.username).await {
            return Err(ApiError::TooManyRequests);
        }
    }

    let authenticator = state.authenticator.clone();
    let username = payload.username.clone();
    let password = payload.password;
    let attempt =
        run_blocking(move || authenticator.authenticate(&username, &password, Utc::now())).await;

    let session = match attempt {
        Ok(session) => session,
        Err(AuthError::InvalidCredentials) => {
            if let Some(throttle) = &state.login_throttle {
                throttle.record_failure(&payload.username).await;
            }
            return Err(AuthError::InvalidCredentials.into());
        }
        Err(e) => return Err(e.into()),
    };

    if let Some(throttle) = &state.login_throttle {
        throttle.record_success(&payload.username).await;
    }

    let response = LoginResponse {
        token: session.token,
        token_type: "Bearer".to_string(),
        session: state.sessions.describe(&session),
    };
    state.registry.insert(session).await;

    Ok((StatusCode::OK, Json(response)))
}

/// Logout endpoint
pub async fn logout(
    State(state): State<AuthState>,
    Extension(session): Extension<Session>,
) -> ApiResult<impl IntoResponse> {
    info!("Logout request for user: {}", session.identity);

    state.registry.remove(session.token).await;

    Ok((
        StatusCode::OK,
        Json(serde_json::json!({"message": "Logged out successfully"})),
    ))
}

/// Describe the caller's session
pub async fn current_session(
    State(state): State<AuthState>,
    Extension(session): Extension<Session>,
) -> Json<SessionInfo> {
    Json(state.sessions.describe(&session))
}

/// Report whether the caller's session grants a role
pub async fn check_access(
    State(state): State<AuthState>,
    Extension(session): Extension<Session>,
    Query(query): Query<AccessQuery>,
) -> Json<AccessResponse> {
    let granted = state
        .sessions
        .check_access(Some(&session), query.role, Utc::now());

    Json(AccessResponse {
        role: query.role,
        granted,
    })
}

/// List credentials
pub async fn list_users(
    State(state): State<AuthState>,
    Extension(session): Extension<Session>,
) -> ApiResult<impl IntoResponse> {
    require_role(&state, &session, Role::Admin)?;

    let credentials = state.credentials().clone();
    let users = run_blocking(move || credentials.list().map_err(CredentialError::from)).await?;

    Ok(Json(users))
}

/// Create a credential
pub async fn create_user(
    State(state): State<AuthState>,
    Extension(session): Extension<Session>,
    Json(payload): Json<NewCredential>,
) -> ApiResult<impl IntoResponse> {
    require_role(&state, &session, Role::Admin)?;
    info!("User {} creates user {}", session.identity, payload.username);

    let credentials = state.credentials().clone();
    let user = run_blocking(move || credentials.create(&payload)).await?;

    Ok((StatusCode::CREATED, Json(user)))
}

/// Change a credential's password or role
///
/// Open sessions of the changed user are closed so the change applies on
/// the next login.
pub async fn update_user(
    State(state): State<AuthState>,
    Extension(session): Extension<Session>,
    Path(username): Path<String>,
    Json(payload): Json<UpdateCredential>,
) -> ApiResult<impl IntoResponse> {
    require_role(&state, &session, Role::Admin)?;
    info!("User {} updates user {}", session.identity, username);

    if payload.password.is_none() && payload.role.is_none() {
        return Err(ApiError::BadRequest("Nothing to update".to_string()));
    }

    let credentials = state.credentials().clone();
    let target = username.clone();
    let user = run_blocking(move || credentials.update(&target, &payload)).await?;
    state.registry.remove_identity(&username).await;

    Ok(Json(user))
}

/// Delete a credential
pub async fn delete_user(
    State(state): State<AuthState>,
    Extension(session): Extension<Session>,
    Path(username): Path<String>,
) -> ApiResult<impl IntoResponse> {
    require_role(&state, &session, Role::Admin)?;
    info!("User {} deletes user {}", session.identity, username);

    let credentials = state.credentials().clone();
    let target = username.clone();
    run_blocking(move || credentials.delete(&target)).await?;
    state.registry.remove_identity(&username).await;

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::AuthConfig, password::hash_password, rate_limiter::RateLimiterConfig,
    };
    use axum::body::Body;
    use axum::http::{Method, Request, header};
    use http_body_util::BodyExt;
    use std::fs;
    use tempfile::TempDir;
    use tower::ServiceExt;

    fn state(dir: &TempDir, login_throttle: Option<RateLimiterConfig>) -> AuthState {
        let credentials_file = dir.path().join("users.csv");
        fs::write(
            &credentials_file,
            format!(
                "Username,Password,Role\nalice,{},admin\nvic,{},viewer\n",
                hash_password("pw1"),
                hash_password("pw2")
            ),
        )
        .unwrap();

        AuthState::from_config(&AuthConfig {
            credentials_file,
            idle_timeout_seconds: 900,
            login_throttle,
        })
        .unwrap()
    }

    fn json_request(
        method: Method,
        uri: &str,
        token: Option<Uuid>,
        body: serde_json::Value,
    ) -> Request<Body> {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    fn get_request(uri: &str, token: Option<Uuid>) -> Request<Body> {
        let mut builder = Request::builder().uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        builder.body(Body::empty()).unwrap()
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn login_as(app: &Router, username: &str, password: &str) -> Uuid {
        let response = app
            .clone()
            .oneshot(json_request(
                Method::POST,
                "/auth/login",
                None,
                serde_json::json!({"username": username, "password": password}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body: LoginResponse = serde_json::from_value(body_json(response).await).unwrap();
        body.token
    }

    #[tokio::test]
    async fn test_login_returns_session() {
        let dir = TempDir::new().unwrap();
        let app = create_router(state(&dir, None));

        let token = login_as(&app, "alice", "pw1").await;

        let response = app
            .clone()
            .oneshot(get_request("/auth/session", Some(token)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["username"], "alice");
        assert_eq!(body["role"], "admin");
    }

    #[tokio::test]
    async fn test_failed_logins_share_one_error() {
        let dir = TempDir::new().unwrap();
        let app = create_router(state(&dir, None));

        let mut bodies = Vec::new();
        for (username, password) in [("alice", "wrong"), ("bob", "x")] {
            let response = app
                .clone()
                .oneshot(json_request(
                    Method::POST,
                    "/auth/login",
                    None,
                    serde_json::json!({"username": username, "password": password}),
                ))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
            bodies.push(body_json(response).await);
        }

        assert_eq!(bodies[0], bodies[1]);
        assert_eq!(bodies[0]["error"], "invalid_credentials");
    }

    #[tokio::test]
    async fn test_protected_routes_need_a_session() {
        let dir = TempDir::new().unwrap();
        let app = create_router(state(&dir, None));

        let response = app
            .clone()
            .oneshot(get_request("/auth/session", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = app
            .oneshot(get_request("/auth/session", Some(Uuid::new_v4())))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_logout_ends_session() {
        let dir = TempDir::new().unwrap();
        let app = create_router(state(&dir, None));
        let token = login_as(&app, "vic", "pw2").await;

        let response = app
            .clone()
            .oneshot(json_request(
                Method::POST,
                "/auth/logout",
                Some(token),
                serde_json::json!({}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .oneshot(get_request("/auth/session", Some(token)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_access_check_reports_role_capability() {
        let dir = TempDir::new().unwrap();
        let app = create_router(state(&dir, None));
        let token = login_as(&app, "vic", "pw2").await;

        let response = app
            .clone()
            .oneshot(get_request("/auth/access?role=viewer", Some(token)))
            .await
            .unwrap();
        assert_eq!(body_json(response).await["granted"], true);

        let response = app
            .oneshot(get_request("/auth/access?role=admin", Some(token)))
            .await
            .unwrap();
        assert_eq!(body_json(response).await["granted"], false);
    }

    #[tokio::test]
    async fn test_viewer_cannot_manage_users() {
        let dir = TempDir::new().unwrap();
        let app = create_router(state(&dir, None));
        let token = login_as(&app, "vic", "pw2").await;

        let response = app
            .oneshot(get_request("/admin/users", Some(token)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(body_json(response).await["error"], "permission_denied");
    }

    #[tokio::test]
    async fn test_admin_manages_users() {
        let dir = TempDir::new().unwrap();
        let app = create_router(state(&dir, None));
        let token = login_as(&app, "alice", "pw1").await;

        let response = app
            .clone()
            .oneshot(json_request(
                Method::POST,
                "/admin/users",
                Some(token),
                serde_json::json!({"username": "bob", "password": "bob-password", "role": "viewer"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let bob_token = login_as(&app, "bob", "bob-password").await;

        let response = app
            .clone()
            .oneshot(json_request(
                Method::PUT,
                "/admin/users/bob",
                Some(token),
                serde_json::json!({"role": "admin"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        // Role changes close the user's open sessions
        let response = app
            .clone()
            .oneshot(get_request("/auth/session", Some(bob_token)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = app
            .clone()
            .oneshot(get_request("/admin/users", Some(token)))
            .await
            .unwrap();
        let users = body_json(response).await;
        assert_eq!(users.as_array().unwrap().len(), 3);
        assert!(users[0].get("password_hash").is_none());

        let response = app
            .oneshot(
                Request::builder()
                    .method(Method::DELETE)
                    .uri("/admin/users/bob")
                    .header(header::AUTHORIZATION, format!("Bearer {}", token))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn test_login_throttle_blocks_repeated_failures() {
        let dir = TempDir::new().unwrap();
        let app = create_router(state(
            &dir,
            Some(RateLimiterConfig {
                max_attempts: 2,
                window_seconds: 300,
                ban_duration_seconds: 300,
            }),
        ));

        for _ in 0..2 {
            let response = app
                .clone()
                .oneshot(json_request(
                    Method::POST,
                    "/auth/login",
                    None,
                    serde_json::json!({"username": "alice", "password": "wrong"}),
                ))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        }

        let response = app
            .oneshot(json_request(
                Method::POST,
                "/auth/login",
                None,
                serde_json::json!({"username": "alice", "password": "pw1"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    }
}
