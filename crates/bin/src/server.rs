//! HTTP server: account endpoints and the gated store API.
//!
//! `/api/...` requests are resolved against the store API route table. Gated routes
//! pass through the access gate before anything else happens; the store views
//! themselves are served elsewhere, so allowed requests to them answer
//! `501 Not Implemented`.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, Method, StatusCode, Uri, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use storefront::{
    Storefront,
    access::{RequestContext, Requester, has_object_permission, has_permission},
    account::{Account, AccountStatus, NewAccount, Profile},
    routes::RouteTable,
};
use tower_cookies::{Cookie, CookieManagerLayer, Cookies};

use crate::error::{ApiError, ApiResult};
use crate::session::{SessionStore, SessionToken};

pub const SESSION_COOKIE: &str = "storefront_session";

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub storefront: Storefront,
    pub routes: Arc<RouteTable>,
    pub sessions: SessionStore,
}

impl AppState {
    pub fn new(storefront: Storefront, routes: RouteTable) -> Self {
        Self {
            storefront,
            routes: Arc::new(routes),
            sessions: SessionStore::new(),
        }
    }

    /// Session token from `Authorization: Bearer` or the session cookie.
    fn session_token(headers: &HeaderMap, cookies: &Cookies) -> Option<SessionToken> {
        let bearer = headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(|token| token.trim().to_string());

        bearer.or_else(|| cookies.get(SESSION_COOKIE).map(|c| c.value().to_string()))
    }

    /// Resolve the requester. Missing, malformed and expired credentials are anonymous.
    async fn requester(&self, headers: &HeaderMap, cookies: &Cookies) -> Requester {
        let Some(token) = Self::session_token(headers, cookies) else {
            return Requester::Anonymous;
        };
        Requester::from(self.sessions.get_account(&token).await)
    }
}

/// Build the application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handle_health))
        .route("/accounts/register", post(handle_register))
        .route("/accounts/login", post(handle_login))
        .route("/accounts/logout", post(handle_logout))
        .route("/accounts/me", get(handle_me).patch(handle_update_me))
        .fallback(handle_api)
        .layer(CookieManagerLayer::new())
        .with_state(state)
}

// ============================================================================
// Request and response bodies
// ============================================================================

#[derive(Deserialize)]
struct RegisterRequest {
    username: String,
    email: String,
    password: Option<String>,
}

#[derive(Deserialize)]
struct LoginRequest {
    username: String,
    password: Option<String>,
}

/// Fields that `PATCH /accounts/me` may change. Absent fields are left alone.
#[derive(Deserialize)]
struct UpdateAccountRequest {
    email: Option<String>,
    display_name: Option<String>,
    phone: Option<String>,
    bio: Option<String>,
    newsletter_opt_in: Option<bool>,
}

impl UpdateAccountRequest {
    fn touches_profile(&self) -> bool {
        self.display_name.is_some()
            || self.phone.is_some()
            || self.bio.is_some()
            || self.newsletter_opt_in.is_some()
    }
}

#[derive(Serialize)]
struct ProfileView {
    display_name: Option<String>,
    phone: Option<String>,
    bio: Option<String>,
    newsletter_opt_in: bool,
    created_at: i64,
    updated_at: i64,
}

impl From<&Profile> for ProfileView {
    fn from(profile: &Profile) -> Self {
        Self {
            display_name: profile.display_name.clone(),
            phone: profile.phone.clone(),
            bio: profile.bio.clone(),
            newsletter_opt_in: profile.newsletter_opt_in,
            created_at: profile.created_at(),
            updated_at: profile.updated_at(),
        }
    }
}

#[derive(Serialize)]
struct AccountView {
    id: String,
    username: String,
    email: String,
    status: AccountStatus,
    has_password: bool,
    created_at: i64,
    updated_at: i64,
    profile: Option<ProfileView>,
}

impl From<&Account> for AccountView {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id().to_string(),
            username: account.username().to_string(),
            email: account.email().to_string(),
            status: account.status(),
            has_password: account.has_password(),
            created_at: account.created_at(),
            updated_at: account.updated_at(),
            profile: account.profile().map(ProfileView::from),
        }
    }
}

#[derive(Serialize)]
struct SessionResponse {
    token: SessionToken,
    account: AccountView,
}

/// Health check response
#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    backend: &'static str,
}

// ============================================================================
// Account handlers
// ============================================================================

/// Missing and empty passwords are treated alike
fn non_empty(password: Option<String>) -> Option<String> {
    password.filter(|p| !p.is_empty())
}

fn invalid_credentials() -> ApiError {
    ApiError::Unauthorized("Invalid username or password".to_string())
}

/// Start a session and set the session cookie
async fn start_session(state: &AppState, cookies: &Cookies, account: &Account) -> SessionResponse {
    let token = state.sessions.create_session(account.id().clone()).await;

    let mut cookie = Cookie::new(SESSION_COOKIE, token.clone());
    cookie.set_http_only(true);
    cookie.set_path("/");
    cookies.add(cookie);

    SessionResponse {
        token,
        account: AccountView::from(account),
    }
}

/// Handler for POST /accounts/register
async fn handle_register(
    State(state): State<AppState>,
    cookies: Cookies,
    Json(request): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<SessionResponse>)> {
    let Some(password) = non_empty(request.password) else {
        return Err(ApiError::BadRequest("A password is required".to_string()));
    };
    let new = NewAccount::new(request.username, request.email).with_password(password);

    let account = state.storefront.create_account(new).await?;
    let session = start_session(&state, &cookies, &account).await;
    Ok((StatusCode::CREATED, Json(session)))
}

/// Handler for POST /accounts/login
async fn handle_login(
    State(state): State<AppState>,
    cookies: Cookies,
    Json(request): Json<LoginRequest>,
) -> ApiResult<Json<SessionResponse>> {
    // Passwordless accounts cannot start a session over HTTP
    let Some(password) = non_empty(request.password) else {
        tracing::debug!(username = %request.username, "Login rejected: no password given");
        return Err(invalid_credentials());
    };

    let account = state
        .storefront
        .login(&request.username, Some(&password))
        .await
        .map_err(|e| {
            if e.is_not_found() || e.is_authentication_error() {
                tracing::debug!(username = %request.username, error = %e, "Login rejected");
                invalid_credentials()
            } else {
                e.into()
            }
        })?;

    let session = start_session(&state, &cookies, &account).await;
    Ok(Json(session))
}

/// Handler for POST /accounts/logout
async fn handle_logout(
    State(state): State<AppState>,
    headers: HeaderMap,
    cookies: Cookies,
) -> StatusCode {
    if let Some(token) = AppState::session_token(&headers, &cookies) {
        state.sessions.destroy_session(&token).await;
    }
    if cookies.get(SESSION_COOKIE).is_some() {
        let mut removal = Cookie::from(SESSION_COOKIE);
        removal.set_path("/");
        cookies.remove(removal);
    }
    StatusCode::NO_CONTENT
}

/// Load the account behind the current session
async fn current_account(
    state: &AppState,
    headers: &HeaderMap,
    cookies: &Cookies,
) -> ApiResult<Account> {
    let requester = state.requester(headers, cookies).await;
    let Some(id) = requester.account_id() else {
        return Err(ApiError::Unauthorized("Login required".to_string()));
    };

    state.storefront.load_account(id).await.map_err(|e| {
        if e.is_not_found() {
            ApiError::Unauthorized("Session account no longer exists".to_string())
        } else {
            e.into()
        }
    })
}

/// Handler for GET /accounts/me
async fn handle_me(
    State(state): State<AppState>,
    headers: HeaderMap,
    cookies: Cookies,
) -> ApiResult<Json<AccountView>> {
    let account = current_account(&state, &headers, &cookies).await?;
    Ok(Json(AccountView::from(&account)))
}

/// Handler for PATCH /accounts/me
async fn handle_update_me(
    State(state): State<AppState>,
    headers: HeaderMap,
    cookies: Cookies,
    Json(request): Json<UpdateAccountRequest>,
) -> ApiResult<Json<AccountView>> {
    let mut account = current_account(&state, &headers, &cookies).await?;

    if request.touches_profile() {
        let Some(profile) = account.profile_mut() else {
            return Err(ApiError::Conflict(format!(
                "Account {} has no profile",
                account.username()
            )));
        };
        if let Some(display_name) = request.display_name {
            profile.display_name = Some(display_name);
        }
        if let Some(phone) = request.phone {
            profile.phone = Some(phone);
        }
        if let Some(bio) = request.bio {
            profile.bio = Some(bio);
        }
        if let Some(opt_in) = request.newsletter_opt_in {
            profile.newsletter_opt_in = opt_in;
        }
    }
    if let Some(email) = request.email {
        account.set_email(email);
    }

    state.storefront.save_account(&mut account).await?;
    Ok(Json(AccountView::from(&account)))
}

// ============================================================================
// Health and store API handlers
// ============================================================================

fn health(state: &AppState) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        backend: state.storefront.backend().backend_name(),
    })
}

/// Handler for GET /health - Health check endpoint
async fn handle_health(State(state): State<AppState>) -> Json<HealthResponse> {
    health(&state)
}

/// Fallback handler: dispatch through the store API route table
async fn handle_api(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    cookies: Cookies,
) -> ApiResult<Response> {
    let path = uri.path();
    let Some(matched) = state.routes.resolve(path) else {
        return Err(ApiError::NotFound(format!("No route for {path}")));
    };

    if matched.is_gated() {
        let requester = state.requester(&headers, &cookies).await;
        let ctx = RequestContext::from_method(&method, requester);

        has_permission(&ctx).into_result()?;
        if let Some(key) = matched.object_key() {
            has_object_permission(&ctx, &key).into_result()?;
        }
    }

    tracing::debug!(route = matched.name(), %method, "Dispatching store API request");

    match matched.name() {
        "health_check_api" => Ok(health(&state).into_response()),
        name => Err(ApiError::NotImplemented(format!(
            "{name} is not served by this server"
        ))),
    }
}
