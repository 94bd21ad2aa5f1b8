//! Transit backend error types.

/// Errors from the bus-tracker backend client.
///
/// None of these reach the rider: the cascade logs them and degrades the
/// affected collection to an empty list.
#[derive(Debug, thiserror::Error)]
pub enum CtaError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend returned a non-success status code
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Body was not valid JSON, or a record had the wrong shape
    #[error("JSON parse error: {message}")]
    Json { message: String },

    /// The envelope or the expected field was absent
    #[error("response missing `{field}`")]
    MissingField { field: &'static str },

    /// The envelope carried an `error` list instead of data
    #[error("backend error: {0}")]
    Backend(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = CtaError::Api {
            status: 502,
            message: "Bad Gateway".into(),
        };
        assert_eq!(err.to_string(), "API error 502: Bad Gateway");

        let err = CtaError::MissingField { field: "vehicle" };
        assert_eq!(err.to_string(), "response missing `vehicle`");

        let err = CtaError::Backend("No data found for parameter".into());
        assert_eq!(err.to_string(), "backend error: No data found for parameter");
    }
}
