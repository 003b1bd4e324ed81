use std::fmt;

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};

use uuid::Uuid;

pub type Result<T> = std::result::Result<T, Error>;
pub type RestResult<T> = std::result::Result<T, RestError>;

/// Required fields absent from a registration draft
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingFields(pub Vec<&'static str>);

impl std::error::Error for MissingFields {}

impl fmt::Display for MissingFields {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Please fill in all required fields: {}",
            self.0.join(", ")
        )
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    // Validation errors
    #[error(transparent)]
    Validation(#[from] MissingFields),
    #[error("{0}")]
    Parsing(String),
    // Server configuration errors
    #[error("Server configuration error: {0}")]
    Configuration(String),
    // Payment processor errors
    #[error("{0}")]
    PaymentIntent(String),
    #[error("Payment not completed")]
    PaymentNotCompleted { status: String },
    #[error("No registration found with id {0}")]
    RegistrationNotFound(Uuid),
    #[error("Payment API request failed: {0}")]
    PaymentApi(#[from] reqwest::Error),
    // Database errors
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// REST-facing error; always rendered as a JSON body `{"error": <message>}`
#[derive(Debug, thiserror::Error)]
pub enum RestError {
    #[error("{0}")]
    BadRequest(String),

    #[error("Internal Server Error: {0}")]
    Internal(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl RestError {
    /// Force any failure down to a client error, keeping its message.
    /// Used by the payment confirmation endpoint, where even store
    /// failures are reported to the caller as 400s.
    pub fn bad_request(e: impl fmt::Display) -> Self {
        Self::BadRequest(e.to_string())
    }
}

impl From<Error> for RestError {
    fn from(e: Error) -> Self {
        match e {
            Error::Validation(_)
            | Error::Parsing(_)
            | Error::PaymentIntent(_)
            | Error::PaymentNotCompleted { .. }
            | Error::RegistrationNotFound(_) => Self::BadRequest(e.to_string()),
            Error::Configuration(msg) => Self::Internal(msg),
            Error::PaymentApi(e) => {
                tracing::error!("Payment API transport failure: {}", e);
                Self::BadRequest("Payment processor unavailable".into())
            }
            Error::Database(e) => {
                tracing::error!("Database failure: {}", e);
                Self::Internal("Database error".into())
            }
        }
    }
}

impl ResponseError for RestError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) | Self::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "error": self.to_string(),
        }))
    }
}
