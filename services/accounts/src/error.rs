use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use ave_core::error::{AppError, error_body};

/// Accounts service error variants.
///
/// Validation errors are raised before any write. `ConstraintViolation`
/// carries the storage layer's message unmodified.
#[derive(Debug, thiserror::Error)]
pub enum AccountsServiceError {
    /// Only the empty string; whitespace is a non-empty address.
    #[error("the email must be set")]
    EmailRequired,
    #[error("the full name must be set")]
    FullNameRequired,
    #[error("the user type must be set")]
    UserTypeRequired,
    #[error("enter a valid username: letters, digits and @/./+/-/_ only")]
    InvalidUsername,
    #[error("{0} is too long")]
    FieldTooLong(&'static str),
    #[error("superuser must have is_staff=true")]
    SuperuserMustBeStaff,
    #[error("superuser must have is_superuser=true")]
    SuperuserMustBeSuperuser,
    #[error("the two password fields didn't match")]
    PasswordMismatch,
    #[error("invalid user type")]
    InvalidUserType,
    #[error("missing data")]
    MissingData,
    #[error("{0}")]
    ConstraintViolation(String),
    #[error("user not found")]
    UserNotFound,
    #[error("model not registered")]
    ModelNotRegistered,
    #[error("unauthorized")]
    Unauthorized,
    #[error("forbidden")]
    Forbidden,
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl AccountsServiceError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::EmailRequired => "EMAIL_REQUIRED",
            Self::FullNameRequired => "FULL_NAME_REQUIRED",
            Self::UserTypeRequired => "USER_TYPE_REQUIRED",
            Self::InvalidUsername => "INVALID_USERNAME",
            Self::FieldTooLong(_) => "FIELD_TOO_LONG",
            Self::SuperuserMustBeStaff => "SUPERUSER_MUST_BE_STAFF",
            Self::SuperuserMustBeSuperuser => "SUPERUSER_MUST_BE_SUPERUSER",
            Self::PasswordMismatch => "PASSWORD_MISMATCH",
            Self::InvalidUserType => "INVALID_USER_TYPE",
            Self::MissingData => "MISSING_DATA",
            Self::ConstraintViolation(_) => "CONSTRAINT_VIOLATION",
            Self::UserNotFound => "USER_NOT_FOUND",
            Self::ModelNotRegistered => "MODEL_NOT_REGISTERED",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::Forbidden => "FORBIDDEN",
            Self::Internal(_) => "INTERNAL",
        }
    }

    /// Rejected input that never reached storage.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::EmailRequired
                | Self::FullNameRequired
                | Self::UserTypeRequired
                | Self::InvalidUsername
                | Self::FieldTooLong(_)
                | Self::SuperuserMustBeStaff
                | Self::SuperuserMustBeSuperuser
                | Self::PasswordMismatch
                | Self::InvalidUserType
                | Self::MissingData
        )
    }
}

impl From<AppError> for AccountsServiceError {
    fn from(err: AppError) -> Self {
        match err {
            AppError::Unauthorized => Self::Unauthorized,
            AppError::Forbidden => Self::Forbidden,
            AppError::Internal(e) => Self::Internal(e),
        }
    }
}

impl IntoResponse for AccountsServiceError {
    fn into_response(self) -> Response {
        let status = if self.is_validation() {
            StatusCode::BAD_REQUEST
        } else {
            match &self {
                Self::ConstraintViolation(_) => StatusCode::CONFLICT,
                Self::Unauthorized => StatusCode::UNAUTHORIZED,
                Self::UserNotFound | Self::ModelNotRegistered => StatusCode::NOT_FOUND,
                Self::Forbidden => StatusCode::FORBIDDEN,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            }
        };
        if let Self::Internal(ref e) = self {
            tracing::error!(error = ?e, kind = "INTERNAL", "internal error");
        }
        error_body(status, self.kind(), self.to_string())
    }
}
