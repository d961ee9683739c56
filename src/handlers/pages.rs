use axum::{
    extract::Extension,
    http::{header::COOKIE, HeaderMap},
    response::Html,
};
use tracing::info;

use crate::errors::AppError;
use crate::middleware::LoginAttempts;

/// Login form page. The auth layer has already hidden the counter from the
/// query string; the number of failed attempts arrives as an extension.
#[axum::debug_handler]
pub async fn login_form(attempts: Option<Extension<LoginAttempts>>) -> Html<String> {
    let LoginAttempts(attempts) = attempts.map(|Extension(a)| a).unwrap_or_default();
    let notice = if attempts > 0 {
        format!("<p>{} failed attempt(s), please try again.</p>", attempts)
    } else {
        String::new()
    };
    Html(format!(
        "<form method=\"post\" action=\"/login_handler\">{notice}\
         <input name=\"login\">\
         <input name=\"password\" type=\"password\">\
         <button>Sign in</button>\
         </form>"
    ))
}

/// Protected page: answers 401 when no session cookie is present, which
/// hands the request over to the challenge hook.
#[axum::debug_handler]
pub async fn dashboard(headers: HeaderMap) -> Result<Html<String>, AppError> {
    let authenticated = headers
        .get(COOKIE)
        .and_then(|value| value.to_str().ok())
        .map(|cookies| cookies.split(';').any(|c| c.trim().starts_with("session=")))
        .unwrap_or(false);

    if !authenticated {
        return Err(AppError::Unauthorized("No active session".to_string()));
    }

    info!("Serving dashboard");
    Ok(Html("<h1>Dashboard</h1>".to_string()))
}
