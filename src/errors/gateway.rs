use thiserror::Error;

/// Remote Gateway errors, one variant per failure class the sync core
/// reacts to differently.
#[derive(Error, Debug)]
pub enum GatewayError {
    /// Gateway unreachable: DNS, connect, timeout, or mid-body failure.
    /// Sync degrades to offline mode on this variant.
    #[error("Network error: {0}")]
    Network(String),

    /// HTTP 401. The universal session-expired signal; triggers a forced
    /// sign-out and is never retried.
    #[error("Session expired")]
    Unauthorized,

    /// Any other non-2xx status
    #[error("Unexpected status {0}")]
    Status(u16),

    /// Response parsed but `success` was false or an expected field was
    /// missing
    #[error("Malformed response: {0}")]
    Malformed(String),
}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            if status.as_u16() == 401 {
                return GatewayError::Unauthorized;
            }
            return GatewayError::Status(status.as_u16());
        }
        GatewayError::Network(err.to_string())
    }
}

impl GatewayError {
    /// Whether sync should degrade to offline mode rather than surface
    /// this error. Everything except a session expiry qualifies: the
    /// caller must still be able to read from the Local Store.
    pub fn is_offline_degradable(&self) -> bool {
        !matches!(self, GatewayError::Unauthorized)
    }

    pub fn is_session_expired(&self) -> bool {
        matches!(self, GatewayError::Unauthorized)
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            GatewayError::Network(_) => "NETWORK_ERROR",
            GatewayError::Unauthorized => "SESSION_EXPIRED",
            GatewayError::Status(_) => "UNEXPECTED_STATUS",
            GatewayError::Malformed(_) => "MALFORMED_RESPONSE",
        }
    }
}
