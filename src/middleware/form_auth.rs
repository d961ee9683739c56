use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{header::HOST, uri::PathAndQuery, HeaderMap, Request, StatusCode, Uri},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::{debug, warn};

use crate::middleware::{LoginAttempts, RequestContext};
use crate::services::auth::{Authenticator, Challenge};

#[derive(Clone)]
pub struct FormAuthState {
    pub authenticator: Arc<dyn Authenticator>,
    pub script_name: String,
}

/// Drives the two authenticator hooks around the inner service: the
/// identity hook on the way in, the challenge hook when the request must be
/// answered with a challenge (logout, or a downstream 401).
pub async fn form_auth_middleware(
    State(state): State<FormAuthState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let mut ctx = context_from_request(&req, &state.script_name);

    let _identity = state.authenticator.identify(&mut ctx).await;

    if let Some(location) = ctx.pending_redirect.clone() {
        // The pipeline already chose where this request ends up (login
        // handler): answer the redirect without running the inner service.
        debug!("Answering pipeline redirect to {}", location);
        return Challenge::redirect(&location, HeaderMap::new()).into_response();
    }

    if ctx.challenge_required {
        // Logout handler: hand the request straight to the challenge hook.
        return run_challenge(&state, &mut ctx, StatusCode::UNAUTHORIZED, &HeaderMap::new()).await;
    }

    let mut req = req;
    if ctx.logins.is_some() {
        hide_counter(&mut req, &ctx);
        req.extensions_mut().insert(LoginAttempts(ctx.logins.unwrap_or(0)));
    }

    let response = next.run(req).await;

    if response.status() == StatusCode::UNAUTHORIZED {
        return run_challenge(&state, &mut ctx, response.status(), response.headers()).await;
    }

    response
}

async fn run_challenge(
    state: &FormAuthState,
    ctx: &mut RequestContext,
    status: StatusCode,
    app_headers: &HeaderMap,
) -> Response {
    match state
        .authenticator
        .challenge(ctx, status, app_headers, &HeaderMap::new())
        .await
    {
        Some(challenge) => challenge.into_response(),
        None => {
            warn!("Authenticator declined to challenge {}", ctx.path);
            StatusCode::UNAUTHORIZED.into_response()
        }
    }
}

fn context_from_request(req: &Request<Body>, script_name: &str) -> RequestContext {
    let uri = req.uri();
    let scheme = uri.scheme_str().unwrap_or("http").to_string();
    let host = uri
        .authority()
        .map(|authority| authority.to_string())
        .or_else(|| {
            req.headers()
                .get(HOST)
                .and_then(|value| value.to_str().ok())
                .map(str::to_owned)
        })
        .unwrap_or_default();
    let path = uri.path();
    let path = path.strip_prefix(script_name).unwrap_or(path).to_string();

    RequestContext {
        scheme,
        host,
        script_name: script_name.to_string(),
        path,
        query_string: uri.query().unwrap_or("").to_string(),
        ..Default::default()
    }
}

// Rewrite the request URI to the context's query string, which has the
// counter stripped out.
fn hide_counter(req: &mut Request<Body>, ctx: &RequestContext) {
    let path = req.uri().path().to_string();
    let path_and_query = if ctx.query_string.is_empty() {
        path
    } else {
        format!("{}?{}", path, ctx.query_string)
    };
    let mut parts = req.uri().clone().into_parts();
    match path_and_query.parse::<PathAndQuery>() {
        Ok(path_and_query) => {
            parts.path_and_query = Some(path_and_query);
            match Uri::from_parts(parts) {
                Ok(uri) => *req.uri_mut() = uri,
                Err(err) => warn!("Could not rebuild request URI: {}", err),
            }
        }
        Err(err) => warn!("Could not hide counter from query string: {}", err),
    }
}
