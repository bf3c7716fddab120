//! Shared HTTP response helpers for provider clients.
//!
//! Centralizes status-code checks (429 with `Retry-After`, 404, other
//! non-success statuses) so each client only maps a [`Rejection`] into its
//! own error type.

use scout_refresh::{ClassificationError, FetchError};

/// Why a response was not accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    RateLimited { retry_after_secs: Option<u64> },
    NotFound,
    Api { status: u16, message: String },
}

/// Return the response unchanged on success, or classify the failure.
pub async fn check_response(resp: reqwest::Response) -> Result<reqwest::Response, Rejection> {
    let status = resp.status();
    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        return Err(Rejection::RateLimited {
            retry_after_secs: parse_retry_after(&resp),
        });
    }
    if status == reqwest::StatusCode::NOT_FOUND {
        return Err(Rejection::NotFound);
    }
    if !status.is_success() {
        return Err(Rejection::Api {
            status: status.as_u16(),
            message: resp.text().await.unwrap_or_default(),
        });
    }
    Ok(resp)
}

/// `Retry-After` as whole seconds. HTTP-date values are ignored.
fn parse_retry_after(resp: &reqwest::Response) -> Option<u64> {
    resp.headers()
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
}

impl From<Rejection> for FetchError {
    fn from(rejection: Rejection) -> Self {
        match rejection {
            Rejection::RateLimited { retry_after_secs } => Self::RateLimited { retry_after_secs },
            Rejection::NotFound => Self::NotFound,
            Rejection::Api { status, message } => Self::Api { status, message },
        }
    }
}

impl From<Rejection> for ClassificationError {
    fn from(rejection: Rejection) -> Self {
        match rejection {
            Rejection::RateLimited { .. } => Self::Api {
                status: 429,
                message: "rate limited".into(),
            },
            Rejection::NotFound => Self::Api {
                status: 404,
                message: "endpoint or model not found".into(),
            },
            Rejection::Api { status, message } => Self::Api { status, message },
        }
    }
}
