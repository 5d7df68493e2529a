/// Application Error Handling
///
/// Every failure in the service maps onto one `AppError`, which in turn maps
/// onto an HTTP status and the JSON envelope `{message, error, error_id}`.
/// 1. Domain-specific error enums (validation, database, auth, config)
/// 2. A unified error type with `From` conversions for `?`
/// 3. HTTP response mapping and structured logging, done once per failure
///    with the same `error_id` the client receives

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use std::error::Error as StdError;
use std::fmt;

/// ============================================================================
/// 1. DOMAIN-SPECIFIC ERROR TYPES
/// ============================================================================

/// Validation errors for request payloads
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    EmptyField(String),
    TooShort(String, usize),
    TooLong(String, usize),
    InvalidFormat(String),
    OutOfRange(String),
    SuspiciousContent(String),
    MalformedBody(String),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::EmptyField(field) => write!(f, "{} is empty", field),
            ValidationError::TooShort(field, min) => {
                write!(f, "{} is too short (minimum {} characters)", field, min)
            }
            ValidationError::TooLong(field, max) => {
                write!(f, "{} is too long (maximum {} characters)", field, max)
            }
            ValidationError::InvalidFormat(field) => write!(f, "{} has invalid format", field),
            ValidationError::OutOfRange(msg) => write!(f, "{}", msg),
            ValidationError::SuspiciousContent(field) => {
                write!(f, "{} contains suspicious content", field)
            }
            ValidationError::MalformedBody(msg) => write!(f, "Invalid request body: {}", msg),
        }
    }
}

impl StdError for ValidationError {}

/// Database operation errors
#[derive(Debug)]
pub enum DatabaseError {
    UniqueConstraintViolation(String),
    NotFound(String),
    QueryExecution(String),
    ConnectionPool(String),
    Transaction(String),
    UnexpectedError(String),
}

impl fmt::Display for DatabaseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatabaseError::UniqueConstraintViolation(msg) => {
                write!(f, "Duplicate entry: {}", msg)
            }
            DatabaseError::NotFound(msg) => write!(f, "Not found: {}", msg),
            DatabaseError::QueryExecution(msg) => write!(f, "Query error: {}", msg),
            DatabaseError::ConnectionPool(msg) => write!(f, "Database connection error: {}", msg),
            DatabaseError::Transaction(msg) => write!(f, "Transaction error: {}", msg),
            DatabaseError::UnexpectedError(msg) => write!(f, "Database error: {}", msg),
        }
    }
}

impl StdError for DatabaseError {}

/// Configuration errors
#[derive(Debug)]
pub enum ConfigError {
    MissingRequired(String),
    InvalidValue(String),
    ParseError(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::MissingRequired(msg) => write!(f, "Missing required config: {}", msg),
            ConfigError::InvalidValue(msg) => write!(f, "Invalid config value: {}", msg),
            ConfigError::ParseError(msg) => write!(f, "Config parse error: {}", msg),
        }
    }
}

impl StdError for ConfigError {}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}

/// Authentication and authorization errors
#[derive(Debug, Clone, PartialEq)]
pub enum AuthError {
    InvalidCredentials,
    TokenInvalid,
    MissingToken,
    Forbidden,
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::InvalidCredentials => write!(f, "Invalid credentials"),
            AuthError::TokenInvalid => write!(f, "Invalid token"),
            AuthError::MissingToken => write!(f, "Missing authentication token"),
            AuthError::Forbidden => write!(f, "Insufficient role for this operation"),
        }
    }
}

impl StdError for AuthError {}

/// ============================================================================
/// 2. UNIFIED APPLICATION ERROR TYPE
/// ============================================================================

/// Central error type that all application errors map to
#[derive(Debug)]
pub enum AppError {
    Validation(ValidationError),
    Database(DatabaseError),
    Auth(AuthError),
    Config(ConfigError),
    Hashing(String),
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Validation(e) => write!(f, "{}", e),
            AppError::Database(e) => write!(f, "{}", e),
            AppError::Auth(e) => write!(f, "{}", e),
            AppError::Config(e) => write!(f, "{}", e),
            AppError::Hashing(msg) => write!(f, "Password hashing error: {}", msg),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl StdError for AppError {}

impl AppError {
    /// Shorthand for a `NotFound` database error.
    pub fn not_found(what: impl Into<String>) -> Self {
        AppError::Database(DatabaseError::NotFound(what.into()))
    }

    /// Shorthand for a duplicate-identity error.
    pub fn conflict(what: impl Into<String>) -> Self {
        AppError::Database(DatabaseError::UniqueConstraintViolation(what.into()))
    }
}

// ============================================================================
// FROM IMPLEMENTATIONS (Control Flow Error Conversion)
// ============================================================================

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::Validation(err)
    }
}

impl From<DatabaseError> for AppError {
    fn from(err: DatabaseError) -> Self {
        AppError::Database(err)
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        AppError::Auth(err)
    }
}

impl From<ConfigError> for AppError {
    fn from(err: ConfigError) -> Self {
        AppError::Config(err)
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => {
                return AppError::Database(DatabaseError::NotFound("Record".to_string()))
            }
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => {
                return AppError::Database(DatabaseError::ConnectionPool(err.to_string()))
            }
            sqlx::Error::Database(db_err) => {
                // 23505 = unique_violation
                if db_err.code().as_deref() == Some("23505") {
                    return AppError::Database(DatabaseError::UniqueConstraintViolation(
                        db_err
                            .constraint()
                            .unwrap_or("unique constraint")
                            .to_string(),
                    ));
                }
                return AppError::Database(DatabaseError::QueryExecution(db_err.to_string()));
            }
            _ => {}
        }
        AppError::Database(DatabaseError::UnexpectedError(err.to_string()))
    }
}

// ============================================================================
// 3. HTTP RESPONSE MAPPING
// ============================================================================

/// Error envelope returned to clients
#[derive(Debug, serde::Serialize)]
pub struct ErrorResponse {
    /// Human-readable error message
    pub message: String,
    /// Stable error code for client-side handling
    pub error: String,
    /// Unique error ID, also present in the server log line
    pub error_id: String,
}

impl ErrorResponse {
    pub fn new(error_id: String, message: String, code: String) -> Self {
        Self {
            message,
            error: code,
            error_id,
        }
    }
}

/// Trait for converting errors to HTTP responses with proper logging
pub trait ErrorHandler {
    fn error_response(&self, error_id: &str) -> (StatusCode, ErrorResponse);
    fn log_error(&self, error_id: &str);
}

impl ErrorHandler for AppError {
    fn error_response(&self, error_id: &str) -> (StatusCode, ErrorResponse) {
        let (status, code, message) = match self {
            AppError::Validation(e) => (
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                e.to_string(),
            ),

            AppError::Database(e) => match e {
                DatabaseError::UniqueConstraintViolation(_) => (
                    StatusCode::CONFLICT,
                    "DUPLICATE_ENTRY",
                    "Email or username already registered".to_string(),
                ),
                DatabaseError::NotFound(what) => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{} not found", what),
                ),
                _ => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DATABASE_ERROR",
                    "Database error occurred".to_string(),
                ),
            },

            // Token failures share one message so callers cannot tell which check failed
            AppError::Auth(e) => match e {
                AuthError::InvalidCredentials => (
                    StatusCode::UNAUTHORIZED,
                    "INVALID_CREDENTIALS",
                    "Invalid credentials".to_string(),
                ),
                AuthError::TokenInvalid | AuthError::MissingToken => (
                    StatusCode::UNAUTHORIZED,
                    "UNAUTHORIZED",
                    "Authorization failed".to_string(),
                ),
                AuthError::Forbidden => (
                    StatusCode::FORBIDDEN,
                    "FORBIDDEN",
                    "Insufficient permissions".to_string(),
                ),
            },

            AppError::Config(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "CONFIG_ERROR",
                "Server configuration error".to_string(),
            ),

            AppError::Hashing(_) | AppError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "Internal server error".to_string(),
            ),
        };

        let error_response =
            ErrorResponse::new(error_id.to_string(), message, code.to_string());

        (status, error_response)
    }

    fn log_error(&self, error_id: &str) {
        match self {
            AppError::Validation(e) => {
                tracing::warn!(error_id = error_id, error = %e, "Validation error");
            }
            AppError::Database(DatabaseError::UniqueConstraintViolation(_)) => {
                tracing::warn!(error_id = error_id, error = %self, "Duplicate entry attempt");
            }
            AppError::Database(DatabaseError::NotFound(_)) => {
                tracing::info!(error_id = error_id, error = %self, "Entity not found");
            }
            AppError::Database(e) => {
                tracing::error!(error_id = error_id, error = %e, "Database error");
            }
            AppError::Auth(e) => {
                tracing::warn!(error_id = error_id, error = %e, "Authentication error");
            }
            AppError::Config(e) => {
                tracing::error!(error_id = error_id, error = %e, "Configuration error");
            }
            AppError::Hashing(msg) => {
                tracing::error!(error_id = error_id, error = %msg, "Password hashing error");
            }
            AppError::Internal(msg) => {
                tracing::error!(error_id = error_id, error = %msg, "Internal error");
            }
        }
    }
}

/// Implement ResponseError for Actix-web integration
impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        let error_id = uuid::Uuid::new_v4().to_string();
        self.log_error(&error_id);

        let (status, error_response) = <Self as ErrorHandler>::error_response(self, &error_id);

        HttpResponse::build(status).json(error_response)
    }

    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Database(e) => match e {
                DatabaseError::UniqueConstraintViolation(_) => StatusCode::CONFLICT,
                DatabaseError::NotFound(_) => StatusCode::NOT_FOUND,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
            AppError::Auth(AuthError::Forbidden) => StatusCode::FORBIDDEN,
            AppError::Auth(_) => StatusCode::UNAUTHORIZED,
            AppError::Config(_) | AppError::Hashing(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}
