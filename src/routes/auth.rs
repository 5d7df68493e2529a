/// Authentication Routes
///
/// Signup (admin or student) and login. Login issues a 24h bearer token
/// carrying the role stored on the user row.

use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::auth::{hash_password, issue_token, validate_password_strength, verify_password, Role};
use crate::configuration::JwtSettings;
use crate::error::{AppError, AuthError, ValidationError};
use crate::users::{find_credentials, insert_user, user_exists, NewUser};
use crate::validators::{is_valid_email, is_valid_phone, is_valid_username};

#[derive(Deserialize)]
pub struct SignupRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub phone: Option<String>,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Simple acknowledgement envelope
#[derive(Serialize)]
pub struct ApiResponse {
    pub message: String,
}

impl ApiResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub message: String,
    pub token: String,
}

/// POST /admin/signup
pub async fn admin_signup(
    form: web::Json<SignupRequest>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, AppError> {
    signup_with_role(form.into_inner(), pool.get_ref(), Role::Admin).await?;
    Ok(HttpResponse::Created().json(ApiResponse::new("Admin signup successful")))
}

/// POST /signup
pub async fn student_signup(
    form: web::Json<SignupRequest>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, AppError> {
    signup_with_role(form.into_inner(), pool.get_ref(), Role::Student).await?;
    Ok(HttpResponse::Created().json(ApiResponse::new("Signup successful")))
}

/// Registers a user with the given role.
///
/// # Errors
/// - 400: missing/invalid username, email, phone or weak password
/// - 409: email (or username) already registered; nothing is written
/// - 500: hashing or database failure
async fn signup_with_role(form: SignupRequest, pool: &PgPool, role: Role) -> Result<(), AppError> {
    let username = is_valid_username(&form.username)?;
    let email = is_valid_email(&form.email)?;
    let phone = is_valid_phone(form.phone.as_deref())?;
    validate_password_strength(&form.password)?;

    if user_exists(pool, &email).await? {
        tracing::info!(role = %role, "Signup rejected: email already registered");
        return Err(AppError::conflict("users_email_key"));
    }

    let password_hash = hash_password(&form.password)?;

    let user_id = insert_user(
        pool,
        &NewUser {
            username: &username,
            email: &email,
            phone: phone.as_deref(),
            password_hash: &password_hash,
            role,
        },
    )
    .await?;

    tracing::info!(
        user_id,
        role = %role,
        "User registered successfully"
    );

    Ok(())
}

/// POST /login, POST /admin/login
///
/// # Errors
/// - 400: missing fields or invalid email format
/// - 404: no user with this email
/// - 401: wrong password (or unusable stored hash)
/// - 500: signing key missing or database failure
pub async fn login(
    form: web::Json<LoginRequest>,
    pool: web::Data<PgPool>,
    jwt_config: web::Data<JwtSettings>,
) -> Result<HttpResponse, AppError> {
    let email = is_valid_email(&form.email)?;
    if form.password.is_empty() {
        return Err(ValidationError::EmptyField("password".to_string()).into());
    }

    let credentials = find_credentials(pool.get_ref(), &email)
        .await?
        .ok_or_else(|| AppError::not_found("User"))?;

    if !verify_password(&form.password, &credentials.password_hash) {
        return Err(AppError::Auth(AuthError::InvalidCredentials));
    }

    let token = issue_token(&email, credentials.role, jwt_config.get_ref())?;

    tracing::info!(
        role = %credentials.role,
        "User logged in successfully"
    );

    Ok(HttpResponse::Ok().json(LoginResponse {
        message: "Login successful".to_string(),
        token,
    }))
}
