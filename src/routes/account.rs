use actix_web::{web, HttpResponse};
use bson::oid::ObjectId;
use chrono::Utc;
use log::{error, info};

use crate::db::repository::{RepositoryError, UserRepository};
use crate::errors::ApiError;
use crate::middleware::auth::issue_token;
use crate::middleware::auth_context::AuthenticatedUser;
use crate::models::user::{Credentials, TokenResponse, UserAccount, UserSession};
use crate::state::AppState;

const MIN_PASSWORD_LENGTH: usize = 6;

fn token_response(state: &AppState, user: &UserAccount) -> Result<HttpResponse, ApiError> {
    let token = issue_token(&state.jwt_secret, &user.email, &user.id).map_err(|e| {
        error!("Token generation failed: {:?}", e);
        ApiError::Internal("Token generation failed".to_string())
    })?;
    Ok(HttpResponse::Ok().json(TokenResponse { auth_token: token }))
}

/*
    POST /api/auth/signup
*/
pub async fn signup(
    state: web::Data<AppState>,
    input: web::Json<Credentials>,
) -> Result<HttpResponse, ApiError> {
    let credentials = input.into_inner();
    let email = credentials.normalized_email();

    if !email.contains('@') {
        return Err(ApiError::BadRequest("A valid email is required".to_string()));
    }
    if credentials.password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(ApiError::BadRequest(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LENGTH
        )));
    }

    let password = credentials.password;
    let password_hash = web::block(move || bcrypt::hash(password, bcrypt::DEFAULT_COST))
        .await
        .map_err(|e| ApiError::Internal(format!("Failed to create account: {}", e)))?
        .map_err(|e| {
            error!("Password hashing failed: {:?}", e);
            ApiError::Internal("Failed to create account".to_string())
        })?;

    let user = UserAccount {
        id: ObjectId::new().to_hex(),
        email,
        password_hash,
        last_signin: None,
        failed_signins: 0,
        created_at: Utc::now(),
    };

    let user = match state.store.insert_user(user).await {
        Ok(user) => user,
        Err(RepositoryError::Duplicate(_)) => {
            return Err(ApiError::Conflict("An account with this email already exists".to_string()))
        }
        Err(e) => return Err(ApiError::persistence("Failed to create account", e)),
    };

    info!("Created account {}", user.id);
    token_response(&state, &user)
}

/*
    POST /api/auth/signin
*/
pub async fn signin(
    state: web::Data<AppState>,
    input: web::Json<Credentials>,
) -> Result<HttpResponse, ApiError> {
    let credentials = input.into_inner();
    let email = credentials.normalized_email();

    let user = state
        .store
        .find_user_by_email(&email)
        .await
        .map_err(|e| ApiError::persistence("Failed to process signin", e))?
        .ok_or_else(|| ApiError::Unauthorized("Invalid credentials".to_string()))?;

    let password = credentials.password;
    let hash = user.password_hash.clone();
    let verified = web::block(move || bcrypt::verify(password, &hash).unwrap_or(false))
        .await
        .map_err(|e| ApiError::Internal(format!("Failed to process signin: {}", e)))?;

    if !verified {
        state
            .store
            .record_failed_signin(&user.id)
            .await
            .map_err(|e| ApiError::persistence("Failed to process signin", e))?;
        return Err(ApiError::Unauthorized("Invalid credentials".to_string()));
    }

    state
        .store
        .record_signin(&user.id, Utc::now())
        .await
        .map_err(|e| ApiError::persistence("Failed to sign in", e))?;

    token_response(&state, &user)
}

/*
    GET /api/auth/session
*/
pub async fn user_session(
    user: AuthenticatedUser,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let account = state
        .store
        .find_user_by_id(&user.user_id)
        .await
        .map_err(|e| ApiError::persistence("Failed to fetch user", e))?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(HttpResponse::Ok().json(UserSession::from(account)))
}
