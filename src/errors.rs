use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use sea_orm::{error::DbErr, ConnAcquireErr, RuntimeErr};
use serde::{Deserialize, Serialize};

const CODE_CONNECTION_REFUSED: &str = "ECONNREFUSED";
const SQLSTATE_INVALID_AUTHORIZATION: &str = "28000";
const SQLSTATE_INVALID_PASSWORD: &str = "28P01";

/// A failure reported by the database layer, reduced to the two things the
/// classifier looks at: the driver/server code and the message.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct DbFailure {
    pub code: Option<String>,
    pub message: String,
}

impl DbFailure {
    pub fn new(code: Option<&str>, message: impl Into<String>) -> Self {
        Self {
            code: code.map(str::to_string),
            message: message.into(),
        }
    }
}

impl From<DbErr> for DbFailure {
    fn from(err: DbErr) -> Self {
        let code = match &err {
            DbErr::Conn(RuntimeErr::SqlxError(e))
            | DbErr::Exec(RuntimeErr::SqlxError(e))
            | DbErr::Query(RuntimeErr::SqlxError(e)) => sqlx_error_code(e),
            // The pool keeps retrying refused connects until the acquire
            // timeout, so a timeout here means the server never accepted.
            DbErr::ConnectionAcquire(ConnAcquireErr::Timeout) => {
                Some(CODE_CONNECTION_REFUSED.to_string())
            }
            _ => None,
        };

        Self {
            code,
            message: err.to_string(),
        }
    }
}

fn sqlx_error_code(err: &sea_orm::sqlx::Error) -> Option<String> {
    match err {
        sea_orm::sqlx::Error::Database(db) => db.code().map(|c| c.into_owned()),
        sea_orm::sqlx::Error::Io(io) if io.kind() == std::io::ErrorKind::ConnectionRefused => {
            Some(CODE_CONNECTION_REFUSED.to_string())
        }
        sea_orm::sqlx::Error::PoolTimedOut => Some(CODE_CONNECTION_REFUSED.to_string()),
        _ => None,
    }
}

/// Failure inside one seeding step, before classification
#[derive(Debug, thiserror::Error)]
pub enum StepError {
    #[error(transparent)]
    Database(#[from] DbFailure),

    #[error("Password hashing failed: {0}")]
    PasswordHash(#[from] bcrypt::BcryptError),

    #[error("Password hashing task failed: {0}")]
    HashTask(#[from] tokio::task::JoinError),
}

impl From<DbErr> for StepError {
    fn from(err: DbErr) -> Self {
        StepError::Database(err.into())
    }
}

/// Every way a seed request can fail. The variant decides the response code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SeedError {
    #[error("POSTGRES_URL environment variable is not set")]
    MissingEnvVar,

    #[error("Failed to create database connection: {message}")]
    Connection { code: String, message: String },

    #[error(
        "Database connection refused. Make sure the database server is running and that POSTGRES_URL points at it. ({message})"
    )]
    ConnectionRefused { message: String },

    #[error(
        "SSL connection to the database failed. Add sslmode=require to POSTGRES_URL or check the server's SSL settings. ({message})"
    )]
    Ssl { message: String },

    #[error(
        "Database authentication failed. Check the username and password in POSTGRES_URL. ({message})"
    )]
    Auth { message: String },

    #[error("{message}")]
    Database { code: String, message: String },

    #[error("Unexpected error while seeding: {message}")]
    Unknown { message: String },
}

impl SeedError {
    /// Failure while building the connection, before any round trip
    pub fn connection(failure: DbFailure) -> Self {
        SeedError::Connection {
            code: failure
                .code
                .unwrap_or_else(|| "CONNECTION_ERROR".to_string()),
            message: failure.message,
        }
    }

    /// Maps a database failure to its error kind. Checks run in priority
    /// order: refused, SSL, authentication, then pass-through.
    pub fn classify(failure: DbFailure) -> Self {
        let code = failure.code.as_deref();
        let lowered = failure.message.to_lowercase();

        if code == Some(CODE_CONNECTION_REFUSED)
            || failure.message.contains(CODE_CONNECTION_REFUSED)
            || lowered.contains("connection refused")
        {
            return SeedError::ConnectionRefused {
                message: failure.message,
            };
        }

        if code == Some(SQLSTATE_INVALID_AUTHORIZATION)
            || lowered.contains("ssl")
            || lowered.contains("tls")
        {
            return SeedError::Ssl {
                message: failure.message,
            };
        }

        if code == Some(SQLSTATE_INVALID_PASSWORD)
            || lowered.contains("password")
            || lowered.contains("authentication")
        {
            return SeedError::Auth {
                message: failure.message,
            };
        }

        SeedError::Database {
            code: failure
                .code
                .unwrap_or_else(|| "DATABASE_ERROR".to_string()),
            message: failure.message,
        }
    }

    /// Machine-readable code placed in the response body
    pub fn code(&self) -> &str {
        match self {
            Self::MissingEnvVar => "MISSING_ENV_VAR",
            Self::Connection { code, .. } => code,
            Self::ConnectionRefused { .. } => CODE_CONNECTION_REFUSED,
            Self::Ssl { .. } => "SSL_ERROR",
            Self::Auth { .. } => "AUTH_ERROR",
            Self::Database { code, .. } => code,
            Self::Unknown { .. } => "UNKNOWN_ERROR",
        }
    }

    /// Every seed failure is reported as a server error.
    pub fn status_code(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

impl From<StepError> for SeedError {
    fn from(err: StepError) -> Self {
        match err {
            StepError::Database(failure) => SeedError::classify(failure),
            other => SeedError::Unknown {
                message: other.to_string(),
            },
        }
    }
}

/// `{ "error": { "message": ..., "code": ... } }`
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetails,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetails {
    pub message: String,
    pub code: String,
}

impl From<&SeedError> for ErrorResponse {
    fn from(err: &SeedError) -> Self {
        Self {
            error: ErrorDetails {
                message: err.to_string(),
                code: err.code().to_string(),
            },
        }
    }
}

impl IntoResponse for SeedError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(ErrorResponse::from(&self))).into_response()
    }
}
