use photos_auth::AuthError;
use serde::{Deserialize, Serialize};
use tower_api_client::{Error as ApiError, StatusCode};

#[derive(Debug)]
pub enum PhotosApiError {
    /// Live call attempted while only demo data is configured.
    Configuration(String),
    /// No usable access token could be obtained.
    Auth(AuthError),
    /// 403 caused by missing scopes; the user must revoke app access and
    /// sign in again with consent.
    InsufficientScope(ErrorDetail),
    Request {
        status: StatusCode,
        detail: ErrorDetail,
    },
    PageLimit {
        pages: usize,
    },
    Internal(ApiError),
}

impl PhotosApiError {
    pub(crate) fn from_status(status: StatusCode, body: &str) -> Self {
        let detail = ErrorDetail::parse(body);
        if status == StatusCode::FORBIDDEN && body.to_ascii_lowercase().contains("insufficient") {
            PhotosApiError::InsufficientScope(detail)
        } else {
            PhotosApiError::Request { status, detail }
        }
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            PhotosApiError::InsufficientScope(_) => Some(StatusCode::FORBIDDEN),
            PhotosApiError::Request { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// What the user can do about it, when there is something to do.
    pub fn remedy(&self) -> Option<&'static str> {
        match self {
            PhotosApiError::InsufficientScope(_) => Some(
                "Remove the app's access at https://myaccount.google.com/permissions, \
                 then sign in again so the photo library scope is requested.",
            ),
            PhotosApiError::Auth(_) => Some("Sign in again."),
            _ => None,
        }
    }
}

impl From<ApiError> for PhotosApiError {
    fn from(value: ApiError) -> Self {
        match value {
            ApiError::ClientError(status, detail) | ApiError::ServerError(status, detail) => {
                tracing::error!(status = %status, body = %detail, "Photo library HTTP error");
                PhotosApiError::from_status(status, &detail)
            }
            e => PhotosApiError::Internal(e),
        }
    }
}

impl From<AuthError> for PhotosApiError {
    fn from(value: AuthError) -> Self {
        PhotosApiError::Auth(value)
    }
}

impl std::fmt::Display for PhotosApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PhotosApiError::Configuration(msg) => write!(f, "Configuration error: {}", msg),
            PhotosApiError::Auth(e) => write!(f, "Authentication failed: {}", e),
            PhotosApiError::InsufficientScope(detail) => {
                write!(f, "HTTP 403, insufficient scopes: {}", detail.message)
            }
            PhotosApiError::Request { status, detail } => {
                write!(f, "HTTP {}: {}", status.as_u16(), detail.message)
            }
            PhotosApiError::PageLimit { pages } => {
                write!(f, "Gave up after {} pages of results", pages)
            }
            PhotosApiError::Internal(e) => write!(f, "Internal error: {}", e),
        }
    }
}

impl std::error::Error for PhotosApiError {}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub code: Option<u16>,
    #[serde(default)]
    pub message: String,
    pub status: Option<String>,
}

impl ErrorDetail {
    /// Parses the provider error envelope, keeping the raw body as the
    /// message when it is not one.
    pub fn parse(body: &str) -> Self {
        match serde_json::from_str::<ErrorResponse>(body) {
            Ok(response) => response.error,
            Err(_) => ErrorDetail {
                message: body.to_string(),
                ..Default::default()
            },
        }
    }
}
