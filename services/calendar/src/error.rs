use crate::auth::AuthError;
use persistence::StoreError;
use thiserror::Error;
use tonic::Status;
use types::errors::ValidationError;

/// Central error type for the calendar service
///
/// Every variant ends the request. None of them tells the caller whether
/// the cache was touched before the failure.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Unauthenticated: {0}")]
    Unauthenticated(#[from] AuthError),

    #[error("Invalid argument: {0}")]
    InvalidArgument(#[from] ValidationError),

    #[error("Backend unavailable: {0}")]
    Unavailable(#[from] StoreError),
}

impl From<ServiceError> for Status {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Unauthenticated(e) => Status::unauthenticated(e.to_string()),
            ServiceError::InvalidArgument(e) => Status::invalid_argument(e.to_string()),
            // Backend detail is logged server-side, not returned.
            ServiceError::Unavailable(_) => Status::unavailable("storage backend unavailable"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tonic::Code;

    #[test]
    fn test_status_codes() {
        let status: Status = ServiceError::from(AuthError::Expired).into();
        assert_eq!(status.code(), Code::Unauthenticated);
        assert_eq!(status.message(), "token has expired");

        let status: Status = ServiceError::from(ValidationError::MissingDate).into();
        assert_eq!(status.code(), Code::InvalidArgument);

        let status: Status = ServiceError::from(StoreError::Store("connection refused".into())).into();
        assert_eq!(status.code(), Code::Unavailable);
        assert!(!status.message().contains("connection refused"));
    }
}
