use argon2::{
    Argon2, PasswordHasher,
    password_hash::{PasswordHash, PasswordVerifier, SaltString},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use password_hash::rand_core::OsRng;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use sea_orm::ActiveValue::NotSet;
use uuid::Uuid;

use crate::{
    dto::auth::{Claims, LoginRequest, LoginResponse},
    entity::users::{ActiveModel as UserActive, Column as UserCol, Entity as Users},
    error::{AppError, AppResult},
    models::{Role, User},
    response::{ApiResponse, Meta},
    state::AppState,
};

const INVALID_CREDENTIALS: &str = "Invalid username or password";

pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?
        .to_string();
    Ok(password_hash)
}

/// Create the account, or reset the password and role of an existing one.
pub async fn upsert_user(
    state: &AppState,
    username: &str,
    password: &str,
    role: Role,
) -> AppResult<User> {
    let username = username.trim();
    if username.is_empty() || password.is_empty() {
        return Err(AppError::invalid("username and password are required"));
    }
    let password_hash = hash_password(password)?;

    let existing = Users::find()
        .filter(UserCol::Username.eq(username))
        .one(&state.orm)
        .await?;

    let user = match existing {
        Some(model) => {
            let mut active: UserActive = model.into();
            active.password_hash = Set(password_hash);
            active.role = Set(role.as_str().to_string());
            active.update(&state.orm).await?
        }
        None => {
            UserActive {
                id: NotSet,
                username: Set(username.to_string()),
                password_hash: Set(password_hash),
                role: Set(role.as_str().to_string()),
                created_at: Set(Utc::now()),
            }
            .insert(&state.orm)
            .await?
        }
    };

    tracing::info!(user = %user.username, role = %user.role, "staff account saved");
    User::try_from(user)
}

pub async fn login_user(
    state: &AppState,
    payload: LoginRequest,
) -> AppResult<ApiResponse<LoginResponse>> {
    let LoginRequest { username, password } = payload;
    let username = username.trim().to_string();

    let user = Users::find()
        .filter(UserCol::Username.eq(username.as_str()))
        .one(&state.orm)
        .await?;

    let user = match user {
        Some(u) => u,
        None => {
            tracing::info!(user = %username, "login rejected: unknown user");
            return Err(AppError::invalid(INVALID_CREDENTIALS));
        }
    };

    let parsed_hash = PasswordHash::new(&user.password_hash)
        .map_err(|_| AppError::Internal(anyhow::anyhow!("Invalid password hash")))?;

    let argon2 = Argon2::default();
    if argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_err()
    {
        tracing::info!(user = %username, "login rejected: wrong password");
        return Err(AppError::invalid(INVALID_CREDENTIALS));
    }

    let expiration = Utc::now()
        .checked_add_signed(Duration::hours(state.config.session_ttl_hours))
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to set expiration")))?;

    let session_id = Uuid::new_v4();
    let claims = Claims {
        sub: user.id.to_string(),
        username: user.username.clone(),
        role: user.role.clone(),
        sid: session_id.to_string(),
        exp: expiration.timestamp() as usize,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(state.config.secret_key.as_bytes()),
    )
    .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?;

    tracing::info!(user = %user.username, session = %session_id, "logged in");

    let resp = LoginResponse {
        token: format!("Bearer {}", token),
        user: User::try_from(user)?,
    };

    Ok(ApiResponse::success(
        "Logged in",
        resp,
        Some(Meta::empty()),
    ))
}
