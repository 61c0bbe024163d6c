/**
 * Request Error Types
 *
 * This module defines the error enum used by every HTTP handler. Each
 * variant carries a human-readable message and maps to a stable `kind`
 * string and HTTP status code.
 *
 * # Error Categories
 *
 * ## Authentication vs authorization
 *
 * `Unauthenticated` (401) means the request carried no usable identity.
 * `Forbidden` (403) means the identity is valid but the authorization
 * engine denied the action. The two must never be conflated.
 *
 * ## Domain errors
 *
 * `Validation` rejects values outside a declared domain, `Conflict` rejects
 * uniqueness violations (duplicate email, already-member), and `Invariant`
 * rejects mutations that would break a structural rule (removing the
 * project owner, adding the owner as a member, removing a non-member).
 *
 * ## Infrastructure errors
 *
 * `Database` and `Serialization` wrap unexpected lower-level failures.
 * Their details are logged but only a generic message is returned to the
 * client.
 */

use axum::http::StatusCode;
use thiserror::Error;

/// Request-level error taxonomy
///
/// Every handler returns `Result<_, ApiError>`. The variant determines the
/// HTTP status code and the `kind` discriminator in the JSON error body.
#[derive(Debug, Error)]
pub enum ApiError {
    /// No bearer token, or the token did not verify
    #[error("{0}")]
    Unauthenticated(String),

    /// Authenticated, but the authorization engine denied the action
    #[error("{0}")]
    Forbidden(String),

    /// The resource id did not resolve
    #[error("{0} not found")]
    NotFound(&'static str),

    /// A field value fell outside its declared domain
    #[error("{0}")]
    Validation(String),

    /// A uniqueness rule was violated
    #[error("{0}")]
    Conflict(String),

    /// A domain invariant refused the mutation
    #[error("{0}")]
    Invariant(String),

    /// Unexpected persistence failure
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Unexpected serialization failure
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Anything else that should surface as a generic internal error
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn unauthenticated(message: impl Into<String>) -> Self {
        Self::Unauthenticated(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden(message.into())
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }

    pub fn invariant(message: impl Into<String>) -> Self {
        Self::Invariant(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Stable discriminator for the JSON error body
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Unauthenticated(_) => "unauthenticated",
            Self::Forbidden(_) => "forbidden",
            Self::NotFound(_) => "not_found",
            Self::Validation(_) => "validation",
            Self::Conflict(_) => "conflict",
            Self::Invariant(_) => "invariant",
            Self::Database(_) | Self::Serialization(_) | Self::Internal(_) => "internal",
        }
    }

    /// HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Validation(_) | Self::Invariant(_) => StatusCode::BAD_REQUEST,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Database(_) | Self::Serialization(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Message safe to return to the client
    ///
    /// Infrastructure errors are logged with full detail at the conversion
    /// site; the client only ever sees a generic line for them.
    pub fn public_message(&self) -> String {
        match self {
            Self::Database(_) | Self::Serialization(_) => "Internal server error".to_string(),
            other => other.to_string(),
        }
    }
}

/// True when a database error is a unique-constraint violation
///
/// Pre-checks (duplicate email, duplicate member) race with the schema's
/// constraints under concurrency; the loser of such a race is still a
/// `Conflict`, not an internal error.
pub fn is_unique_violation(error: &sqlx::Error) -> bool {
    matches!(error, sqlx::Error::Database(db) if db.is_unique_violation())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_status_code_mapping() {
        assert_eq!(
            ApiError::unauthenticated("no token").status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::forbidden("denied").status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            ApiError::NotFound("Project").status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::validation("bad status").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::conflict("duplicate").status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::invariant("owner").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::internal("boom").status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_forbidden_distinct_from_not_found() {
        let forbidden = ApiError::forbidden("Not authorized to view this project");
        let missing = ApiError::NotFound("Project");

        assert_ne!(forbidden.kind(), missing.kind());
        assert_ne!(forbidden.status_code(), missing.status_code());
    }

    #[test]
    fn test_database_error_is_masked() {
        let err = ApiError::from(sqlx::Error::RowNotFound);
        assert_eq!(err.kind(), "internal");
        assert_eq!(err.public_message(), "Internal server error");
    }

    #[test]
    fn test_not_found_message() {
        let err = ApiError::NotFound("Ticket");
        assert_eq!(err.public_message(), "Ticket not found");
    }

    #[test]
    fn test_from_sqlx_error() {
        let err: ApiError = sqlx::Error::PoolTimedOut.into();
        assert_matches!(err, ApiError::Database(_));
    }
}
