use axum::{Json, extract::State};
use chrono::Utc;
use std::sync::Arc;
use tower_sessions::{Expiry, Session};

use super::validation::parse_role;
use super::{
    ApiError, ApiMessage, AppState, CredentialsRequest, LoginStatus, RoleInfo, UpdateRoleRequest,
};
use crate::constants::{messages, session::AUTH_KEY};
use crate::domain::{AuthSession, Role};
use crate::services::AuthError;

// ============================================================================
// Session helpers
// ============================================================================

/// Loads the authenticated session, if any.
///
/// Expired sessions and sessions whose account no longer exists (including
/// one replaced by a new account under the same username) are flushed and
/// reported as logged out. Roles are refreshed from the account so that
/// grants and revocations apply without logging in again.
pub async fn current_session(
    state: &AppState,
    session: &Session,
) -> Result<Option<AuthSession>, ApiError> {
    let Some(mut auth) = session
        .get::<AuthSession>(AUTH_KEY)
        .await
        .map_err(|e| ApiError::internal(format!("Session error: {e}")))?
    else {
        return Ok(None);
    };

    if auth.is_expired(Utc::now()) {
        tracing::info!(username = %auth.username, "Session expired");
        flush(session).await?;
        return Ok(None);
    }

    let account = match state.shared.auth_service.account(&auth.username).await {
        Ok(account) => account,
        Err(AuthError::AccountNotFound(_)) => {
            tracing::info!(username = %auth.username, "Session account no longer exists");
            flush(session).await?;
            return Ok(None);
        }
        Err(e) => return Err(e.into()),
    };

    if account.id != auth.account_id {
        tracing::info!(username = %auth.username, "Session belongs to a removed account");
        flush(session).await?;
        return Ok(None);
    }

    if account.roles != auth.roles {
        auth.sync_roles(account.roles);
        store_session(session, &auth).await?;
    }

    tracing::Span::current().record("user", auth.username.as_str());
    Ok(Some(auth))
}

/// Like [`current_session`] but answers 401 when nobody is logged in.
pub async fn require_session(state: &AppState, session: &Session) -> Result<AuthSession, ApiError> {
    current_session(state, session)
        .await?
        .ok_or_else(ApiError::not_logged_in)
}

/// Role used to project movie fields; anonymous callers read as Viewer.
pub async fn reader_role(state: &AppState, session: &Session) -> Result<Role, ApiError> {
    Ok(current_session(state, session)
        .await?
        .map(|auth| auth.current_role)
        .unwrap_or_default())
}

/// Requires a session acting as Content Editor.
pub async fn require_editor(state: &AppState, session: &Session) -> Result<AuthSession, ApiError> {
    let auth = require_session(state, session).await?;
    if !auth.current_role.can_edit_catalog() {
        tracing::warn!(username = %auth.username, role = %auth.current_role, "Catalog change refused");
        return Err(ApiError::Forbidden(messages::EDITOR_REQUIRED.to_string()));
    }
    Ok(auth)
}

async fn store_session(session: &Session, auth: &AuthSession) -> Result<(), ApiError> {
    session
        .insert(AUTH_KEY, auth)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to store session: {e}")))
}

async fn flush(session: &Session) -> Result<(), ApiError> {
    session
        .flush()
        .await
        .map_err(|e| ApiError::internal(format!("Failed to clear session: {e}")))
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /create
pub async fn create_account(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CredentialsRequest>,
) -> Result<Json<ApiMessage>, ApiError> {
    let account = state
        .shared
        .auth_service
        .register(&payload.username, &payload.password)
        .await?;

    tracing::info!(username = %account.username, "Account created");
    Ok(Json(ApiMessage::ok(messages::ACCOUNT_CREATED)))
}

/// POST /login
/// Starts a fresh session acting under the account's first role.
pub async fn login(
    State(state): State<Arc<AppState>>,
    session: Session,
    Json(payload): Json<CredentialsRequest>,
) -> Result<Json<ApiMessage>, ApiError> {
    let account = state
        .shared
        .auth_service
        .login(&payload.username, &payload.password)
        .await?;

    let auth = state.shared.auth_service.open_session(&account);

    session
        .cycle_id()
        .await
        .map_err(|e| ApiError::internal(format!("Failed to create session: {e}")))?;
    store_session(&session, &auth).await?;

    let expires_at = time::OffsetDateTime::from_unix_timestamp(auth.expires_at.timestamp())
        .map_err(|e| ApiError::internal(format!("Invalid session expiry: {e}")))?;
    session.set_expiry(Some(Expiry::AtDateTime(expires_at)));

    tracing::Span::current().record("user", account.username.as_str());
    Ok(Json(ApiMessage::ok(messages::LOGIN_SUCCESS)))
}

/// POST /logout
pub async fn logout(session: Session) -> Result<Json<ApiMessage>, ApiError> {
    if let Ok(Some(auth)) = session.get::<AuthSession>(AUTH_KEY).await {
        tracing::info!(username = %auth.username, "Logged out");
    }
    flush(&session).await?;
    Ok(Json(ApiMessage::ok(messages::LOGGED_OUT)))
}

/// GET /checkLogin
pub async fn check_login(
    State(state): State<Arc<AppState>>,
    session: Session,
) -> Result<Json<LoginStatus>, ApiError> {
    let status = if current_session(&state, &session).await?.is_some() {
        LoginStatus {
            logged_in: true,
            message: messages::ALREADY_LOGGED_IN.to_string(),
        }
    } else {
        LoginStatus {
            logged_in: false,
            message: messages::PLEASE_LOGIN.to_string(),
        }
    };

    Ok(Json(status))
}

/// GET /userRole
pub async fn user_role(
    State(state): State<Arc<AppState>>,
    session: Session,
) -> Result<Json<RoleInfo>, ApiError> {
    let auth = require_session(&state, &session).await?;

    Ok(Json(RoleInfo {
        success: true,
        role: auth.current_role,
        list: auth.roles,
    }))
}

/// POST /updateRole
/// Only roles granted to the account can be selected.
pub async fn update_role(
    State(state): State<Arc<AppState>>,
    session: Session,
    Json(payload): Json<UpdateRoleRequest>,
) -> Result<Json<ApiMessage>, ApiError> {
    let mut auth = require_session(&state, &session).await?;
    let role = parse_role(&payload.role)?;

    if let Err(e) = auth.select_role(role) {
        tracing::warn!(username = %auth.username, %role, "Role change refused");
        return Err(ApiError::Forbidden(e.to_string()));
    }
    store_session(&session, &auth).await?;

    tracing::info!(username = %auth.username, %role, "Active role changed");
    Ok(Json(ApiMessage::ok(format!("Role updated to {role}."))))
}
