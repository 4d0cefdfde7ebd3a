use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

/// Error from a completion-API call. One request, one outcome: there is no
/// implicit retry, but every variant is recoverable by asking again.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The service answered with an error body; `kind` and `code` carry the
    /// service's own classification when it provided one.
    #[error("{message}")]
    Api {
        message: String,
        kind: Option<String>,
        code: Option<String>,
    },

    #[error("unexpected API response: {0}")]
    MalformedResponse(String),
}

impl ApiError {
    /// Build an [`ApiError::Api`] from a non-success response body, pulling
    /// the message/type/code triple out of the standard error envelope when
    /// the body parses.
    pub(crate) fn from_error_body(status: StatusCode, body: &str) -> Self {
        let detail = serde_json::from_str::<Value>(body)
            .ok()
            .and_then(|value| value.get("error").cloned());

        let field = |name: &str| {
            detail
                .as_ref()
                .and_then(|d| d.get(name))
                .and_then(Value::as_str)
                .map(str::to_string)
        };

        ApiError::Api {
            message: field("message").unwrap_or_else(|| format!("request failed ({status})")),
            kind: field("type"),
            code: field("code"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_body_triple_is_extracted() {
        let body = r#"{"error": {"message": "Invalid API key", "type": "invalid_request_error", "code": "invalid_api_key"}}"#;
        let err = ApiError::from_error_body(StatusCode::UNAUTHORIZED, body);

        let ApiError::Api { message, kind, code } = err else {
            panic!("expected Api variant");
        };
        assert_eq!(message, "Invalid API key");
        assert_eq!(kind.as_deref(), Some("invalid_request_error"));
        assert_eq!(code.as_deref(), Some("invalid_api_key"));
    }

    #[test]
    fn unparseable_body_falls_back_to_status() {
        let err = ApiError::from_error_body(StatusCode::BAD_GATEWAY, "<html>oops</html>");
        let ApiError::Api { message, kind, code } = err else {
            panic!("expected Api variant");
        };
        assert_eq!(message, "request failed (502 Bad Gateway)");
        assert_eq!(kind, None);
        assert_eq!(code, None);
    }
}
