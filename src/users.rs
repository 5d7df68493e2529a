/// Credential Store
///
/// Queries against the `users` table. Handlers borrow the pool per request;
/// nothing here holds rows across requests.

use sqlx::PgPool;

use crate::auth::Role;
use crate::error::AppError;

/// A user ready to be inserted; `password_hash` is already a bcrypt digest.
pub struct NewUser<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub phone: Option<&'a str>,
    pub password_hash: &'a str,
    pub role: Role,
}

/// Stored credentials fetched at login
#[derive(Debug)]
pub struct StoredCredentials {
    pub password_hash: String,
    pub role: Role,
}

pub async fn user_exists(pool: &PgPool, email: &str) -> Result<bool, AppError> {
    let exists = sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
        .bind(email)
        .fetch_one(pool)
        .await?;

    Ok(exists)
}

/// Inserts a user. A racing duplicate (email or username) surfaces as a
/// unique violation, which `AppError` maps to Conflict.
pub async fn insert_user(pool: &PgPool, user: &NewUser<'_>) -> Result<i64, AppError> {
    let id = sqlx::query_scalar::<_, i64>(
        r#"
        INSERT INTO users (username, email, phone, password_hash, role, created_at)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id
        "#,
    )
    .bind(user.username)
    .bind(user.email)
    .bind(user.phone)
    .bind(user.password_hash)
    .bind(user.role.as_str())
    .bind(chrono::Utc::now())
    .fetch_one(pool)
    .await?;

    Ok(id)
}

pub async fn find_credentials(
    pool: &PgPool,
    email: &str,
) -> Result<Option<StoredCredentials>, AppError> {
    let row = sqlx::query_as::<_, (String, String)>(
        "SELECT password_hash, role FROM users WHERE email = $1",
    )
    .bind(email)
    .fetch_optional(pool)
    .await?;

    row.map(|(password_hash, role)| {
        Ok(StoredCredentials {
            password_hash,
            role: Role::parse(&role)?,
        })
    })
    .transpose()
}
