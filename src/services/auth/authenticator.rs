use async_trait::async_trait;
use axum::http::{header::LOCATION, HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use tracing::warn;

use crate::middleware::RequestContext;

/// Identity claimed by the request, as extracted by the wrapped
/// authenticator. Verification is the surrounding pipeline's business.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientIdentity {
    pub login: String,
}

/// Result of the challenge hook: a status and header set, with the redirect
/// target (if any) carried in the `Location` header.
#[derive(Clone, Debug)]
pub struct Challenge {
    pub status: StatusCode,
    pub headers: HeaderMap,
}

impl Challenge {
    /// 302 redirect to `location`, carrying `headers` along.
    pub fn redirect(location: &str, mut headers: HeaderMap) -> Self {
        let value = HeaderValue::from_str(location).unwrap_or_else(|_| {
            warn!("Redirect target is not a valid header value, falling back to /");
            HeaderValue::from_static("/")
        });
        headers.insert(LOCATION, value);
        Self {
            status: StatusCode::FOUND,
            headers,
        }
    }

    pub fn location(&self) -> Option<String> {
        self.headers
            .get(LOCATION)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned)
    }

    /// The header set with any `Location` removed, ready to be re-targeted.
    pub fn without_location(&self) -> HeaderMap {
        let mut headers = self.headers.clone();
        headers.remove(LOCATION);
        headers
    }
}

impl IntoResponse for Challenge {
    fn into_response(self) -> Response {
        (self.status, self.headers).into_response()
    }
}

/// Hook points of the authentication pipeline. `FriendlyForm` wraps another
/// implementation and layers its redirect behavior on top by delegation.
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// Invoked once per request before any handler runs. May mutate the
    /// context (pending redirect, counter, hidden query string).
    async fn identify(&self, ctx: &mut RequestContext) -> Option<ClientIdentity>;

    /// Invoked when the pipeline decides the request must be challenged.
    /// Receives the pending response status plus the application and forget
    /// header sets from downstream.
    async fn challenge(
        &self,
        ctx: &mut RequestContext,
        status: StatusCode,
        app_headers: &HeaderMap,
        forget_headers: &HeaderMap,
    ) -> Option<Challenge>;
}
