use reqwest::StatusCode;
use serde::Serialize;
use thiserror::Error;

/// What went wrong during a fetch.
///
/// The first group mirrors HTTP statuses reported by the provider, the second
/// covers transport failures before any status was received, and `OtherRequest`
/// also absorbs bodies that could not be interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ErrorKind {
    BadRequest,
    Unauthorized,
    Forbidden,
    NotFound,
    ServerError,
    BadGateway,
    ServiceUnavailable,
    GatewayTimeout,
    ConnectionFailure,
    Timeout,
    TooManyRedirects,
    OtherHttp,
    OtherRequest,
}

impl ErrorKind {
    pub const fn from_status(status: u16) -> Self {
        match status {
            400 => ErrorKind::BadRequest,
            401 => ErrorKind::Unauthorized,
            403 => ErrorKind::Forbidden,
            404 => ErrorKind::NotFound,
            500 => ErrorKind::ServerError,
            502 => ErrorKind::BadGateway,
            503 => ErrorKind::ServiceUnavailable,
            504 => ErrorKind::GatewayTimeout,
            _ => ErrorKind::OtherHttp,
        }
    }

    /// Fixed user-facing message. `None` for the kinds whose message carries detail.
    pub const fn fixed_message(&self) -> Option<&'static str> {
        match self {
            ErrorKind::BadRequest => Some("Bad request: Please check your input"),
            ErrorKind::Unauthorized => Some("Unauthorized: Invalid API key"),
            ErrorKind::Forbidden => Some("Forbidden: Access is denied"),
            ErrorKind::NotFound => Some("Not found: City not found"),
            ErrorKind::ServerError => Some("Internal server error: Please try again later"),
            ErrorKind::BadGateway => Some("Bad gateway: Invalid response from the server"),
            ErrorKind::ServiceUnavailable => Some("Service unavailable: Server is down"),
            ErrorKind::GatewayTimeout => Some("Gateway timeout: No response from the server"),
            ErrorKind::ConnectionFailure => {
                Some("Connection error: Check your internet connection")
            }
            ErrorKind::Timeout => Some("Timeout error: The request timed out"),
            ErrorKind::TooManyRedirects => Some("Too many redirects: Check the URL"),
            ErrorKind::OtherHttp | ErrorKind::OtherRequest => None,
        }
    }
}

/// Failed fetch, ready to be shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("{message}")]
pub struct WeatherError {
    kind: ErrorKind,
    message: String,
}

impl WeatherError {
    /// Error with the kind's fixed message, or a generic one for detail-carrying kinds.
    pub fn new(kind: ErrorKind) -> Self {
        let message = match kind.fixed_message() {
            Some(msg) => msg.to_string(),
            None if kind == ErrorKind::OtherHttp => "HTTP error occurred".to_string(),
            None => "Request error".to_string(),
        };
        Self { kind, message }
    }

    pub fn with_message(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Classify a non-success HTTP status.
    pub fn from_status(status: StatusCode) -> Self {
        match ErrorKind::from_status(status.as_u16()) {
            ErrorKind::OtherHttp => {
                Self::with_message(ErrorKind::OtherHttp, format!("HTTP error occurred: {status}"))
            }
            kind => Self::new(kind),
        }
    }

    /// Classify a failure that happened before (or while) a response was received.
    ///
    /// The URL is stripped first since it carries the API key.
    pub fn from_transport(err: reqwest::Error) -> Self {
        let err = err.without_url();

        if err.is_timeout() {
            Self::new(ErrorKind::Timeout)
        } else if err.is_connect() {
            Self::new(ErrorKind::ConnectionFailure)
        } else if err.is_redirect() {
            Self::new(ErrorKind::TooManyRedirects)
        } else {
            Self::request(err)
        }
    }

    /// `OtherRequest` carrying the underlying detail.
    pub fn request(detail: impl std::fmt::Display) -> Self {
        Self::with_message(ErrorKind::OtherRequest, format!("Request error: {detail}"))
    }

    /// The body arrived but could not be turned into a result.
    pub fn unexpected_response(detail: impl std::fmt::Display) -> Self {
        Self::with_message(
            ErrorKind::OtherRequest,
            format!("Request error: Unexpected response from the server ({detail})"),
        )
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}
