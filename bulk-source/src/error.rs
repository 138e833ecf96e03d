// Copyright (c) James Kassemi, SC, US. All rights reserved.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("http status {status}{}", body_suffix(.body))]
    Transport { status: u16, body: Option<String> },
    #[error("request error: {0}")]
    Request(#[from] reqwest::Error),
    #[error("url parse error: {0}")]
    Url(#[from] url::ParseError),
}

impl FetchError {
    /// HTTP status for a non-success page, if that is what failed.
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::Transport { status, .. } => Some(*status),
            FetchError::Request(err) => err.status().map(|s| s.as_u16()),
            FetchError::Url(_) => None,
        }
    }
}

fn body_suffix(body: &Option<String>) -> String {
    body.as_deref()
        .map(|b| format!(" | {b}"))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_error_includes_body_preview() {
        let err = FetchError::Transport {
            status: 403,
            body: Some("{\"message\":\"forbidden\"}".to_string()),
        };
        assert_eq!(err.to_string(), "http status 403 | {\"message\":\"forbidden\"}");
        assert_eq!(err.status(), Some(403));

        let bare = FetchError::Transport {
            status: 500,
            body: None,
        };
        assert_eq!(bare.to_string(), "http status 500");
    }
}
