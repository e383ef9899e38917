/// Central error type for collview.
#[derive(Debug, thiserror::Error)]
pub enum CollviewError {
    #[error("network error: {message}")]
    Network { message: String },

    #[error("HTTP error ({status}): {message}")]
    Http { status: u16, message: String },

    #[error("invalid response body: {message}")]
    Decode { message: String },

    #[error("collection not found: {id}")]
    CollectionNotFound { id: String },

    #[error("config error: {message}")]
    Config { message: String },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("storage error: {message}")]
    Store { message: String },

    #[error("{0}")]
    Other(String),
}

impl CollviewError {
    /// HTTP status carried by the error, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            CollviewError::Http { status, .. } => Some(*status),
            CollviewError::CollectionNotFound { .. } => Some(404),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_error_display() {
        let err = CollviewError::Http {
            status: 500,
            message: "boom".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP error (500): boom");
        assert_eq!(err.status(), Some(500));
    }

    #[test]
    fn test_network_error_has_no_status() {
        let err = CollviewError::Network {
            message: "connection refused".to_string(),
        };
        assert_eq!(err.status(), None);
    }
}
