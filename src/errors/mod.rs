//! Error handling module for the storefront client.
//!
//! Provides a centralized error type classifying remote-call failures the way
//! the stores need to react to them (fallback, surface, or drop credentials).

/// Error codes as constants to avoid stringly-typed errors.
pub mod codes {
    pub const NETWORK_ERROR: &str = "NETWORK_ERROR";
    pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";
    pub const NOT_FOUND: &str = "NOT_FOUND";
    pub const UNAUTHORIZED: &str = "UNAUTHORIZED";
    pub const SERVER_ERROR: &str = "SERVER_ERROR";
    pub const DECODE_ERROR: &str = "DECODE_ERROR";
}

/// Client-side error taxonomy for remote calls.
#[derive(Debug, Clone)]
pub enum ApiError {
    /// Transport failure: no well-formed response arrived
    Network(String),
    /// Well-formed error payload with a human-readable message (HTTP 400/422)
    Validation(String),
    /// Category, subcategory or product absent (HTTP 404)
    NotFound(String),
    /// Missing or expired credential (HTTP 401/403)
    Unauthorized(String),
    /// Server-side failure (HTTP 5xx)
    Server(String),
    /// Response body did not match the expected shape
    Decode(String),
}

impl ApiError {
    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::Network(_) => codes::NETWORK_ERROR,
            ApiError::Validation(_) => codes::VALIDATION_ERROR,
            ApiError::NotFound(_) => codes::NOT_FOUND,
            ApiError::Unauthorized(_) => codes::UNAUTHORIZED,
            ApiError::Server(_) => codes::SERVER_ERROR,
            ApiError::Decode(_) => codes::DECODE_ERROR,
        }
    }

    /// Get the human-readable message.
    pub fn message(&self) -> &str {
        match self {
            ApiError::Network(msg)
            | ApiError::Validation(msg)
            | ApiError::NotFound(msg)
            | ApiError::Unauthorized(msg)
            | ApiError::Server(msg)
            | ApiError::Decode(msg) => msg,
        }
    }

    /// True for transport failures with no server response.
    pub fn is_network(&self) -> bool {
        matches!(self, ApiError::Network(_))
    }

    /// True when the referenced resource is absent.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound(_))
    }

    /// True when the credential is missing or expired.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized(_))
    }

    /// Whether a listing call hitting this error resolves to an empty page
    /// instead of surfacing (a category with zero products renders as an
    /// empty grid, not an error screen).
    pub fn is_empty_page_fallback(&self) -> bool {
        self.is_network() || self.is_not_found()
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error_code(), self.message())
    }
}

impl std::error::Error for ApiError {}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            tracing::error!("Response decode error: {:?}", err);
            ApiError::Decode(format!("Failed to decode response: {}", err))
        } else {
            tracing::warn!("Network error: {:?}", err);
            ApiError::Network(format!("Request failed: {}", err))
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        tracing::error!("JSON error: {:?}", err);
        ApiError::Decode(format!("JSON error: {}", err))
    }
}
