use axum::{extract::State, http::StatusCode, Json};
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, instrument, warn};

use crate::{
    error::AppError,
    extract::{JsonMap, UserId},
    state::AppState,
};

use super::{
    dto::{UserEnvelope, UsersEnvelope},
    repo_types::{FieldUpdate, NewUser},
};

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex =
            Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern compiles");
    }
    EMAIL_RE.is_match(email)
}

fn normalize_email(raw: &str) -> Result<String, AppError> {
    let email = raw.trim().to_lowercase();
    if !is_valid_email(&email) {
        warn!(email = %email, "invalid email");
        return Err(AppError::bad_request("invalid email"));
    }
    Ok(email)
}

/// Answers any verb a route does not serve.
pub async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}

#[instrument(skip(state, body))]
pub async fn create_user(
    State(state): State<AppState>,
    body: JsonMap,
) -> Result<Json<UserEnvelope>, AppError> {
    let email = normalize_email(body.required("email")?)?;
    let password = body.required_raw("password")?;
    let confirm = body.required_raw("confirm_password")?;

    if password != confirm {
        warn!(email = %email, "password confirmation mismatch");
        return Err(AppError::bad_request("passwords do not match"));
    }

    let hash = state.hasher.hash(password)?;
    let user = state.users.create(NewUser::new(email, hash)).await?;

    info!(user_id = user.id, email = %user.email, "user created");
    Ok(Json(UserEnvelope { user }))
}

#[instrument(skip(state))]
pub async fn read_user(
    State(state): State<AppState>,
    UserId(id): UserId,
) -> Result<Json<UserEnvelope>, AppError> {
    let user = state.users.get_by_id(id).await?;
    Ok(Json(UserEnvelope { user }))
}

#[instrument(skip(state, body))]
pub async fn read_user_by_email(
    State(state): State<AppState>,
    body: JsonMap,
) -> Result<Json<UserEnvelope>, AppError> {
    let email = body.required("email")?.to_lowercase();
    let user = state.users.get_by_email(&email).await?;
    Ok(Json(UserEnvelope { user }))
}

#[instrument(skip(state))]
pub async fn list_users(State(state): State<AppState>) -> Result<Json<UsersEnvelope>, AppError> {
    let users = state.users.list().await?;
    Ok(Json(UsersEnvelope { users }))
}

#[instrument(skip(state, body))]
pub async fn update_email(
    State(state): State<AppState>,
    UserId(id): UserId,
    body: JsonMap,
) -> Result<Json<UserEnvelope>, AppError> {
    let email = normalize_email(body.required("email")?)?;
    apply(&state, id, FieldUpdate::Email(email)).await
}

#[instrument(skip(state, body))]
pub async fn update_password(
    State(state): State<AppState>,
    UserId(id): UserId,
    body: JsonMap,
) -> Result<Json<UserEnvelope>, AppError> {
    let hash = state.hasher.hash(body.required_raw("password")?)?;
    apply(&state, id, FieldUpdate::Password(hash)).await
}

#[instrument(skip(state, body))]
pub async fn update_active(
    State(state): State<AppState>,
    UserId(id): UserId,
    body: JsonMap,
) -> Result<Json<UserEnvelope>, AppError> {
    apply(&state, id, FieldUpdate::Active(body.flag("active")?)).await
}

#[instrument(skip(state, body))]
pub async fn update_staff(
    State(state): State<AppState>,
    UserId(id): UserId,
    body: JsonMap,
) -> Result<Json<UserEnvelope>, AppError> {
    apply(&state, id, FieldUpdate::Staff(body.flag("staff")?)).await
}

#[instrument(skip(state, body))]
pub async fn update_admin(
    State(state): State<AppState>,
    UserId(id): UserId,
    body: JsonMap,
) -> Result<Json<UserEnvelope>, AppError> {
    apply(&state, id, FieldUpdate::Admin(body.flag("admin")?)).await
}

#[instrument(skip(state))]
pub async fn delete_user(
    State(state): State<AppState>,
    UserId(id): UserId,
) -> Result<StatusCode, AppError> {
    state.users.delete(id).await?;
    info!(user_id = id, "user deleted");
    Ok(StatusCode::OK)
}

async fn apply(state: &AppState, id: i64, update: FieldUpdate) -> Result<Json<UserEnvelope>, AppError> {
    let column = update.column();
    let user = state.users.update_field(id, update).await?;
    info!(user_id = id, column, "user updated");
    Ok(Json(UserEnvelope { user }))
}
