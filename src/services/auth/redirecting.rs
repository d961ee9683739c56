use async_trait::async_trait;
use axum::http::{HeaderMap, StatusCode};
use tracing::debug;

use crate::config::auth::AuthSettings;
use crate::middleware::RequestContext;
use crate::services::urls::{full_path, query_var};

use super::{Authenticator, Challenge, ClientIdentity};

/// Plain redirecting form authenticator: unauthenticated requests get sent
/// to the login form with the current URL as `came_from`, and the login
/// handler picks the post-auth destination. Credential verification and
/// session storage live elsewhere in the pipeline.
pub struct RedirectingForm {
    login_form_path: String,
    login_handler_path: String,
    logout_handler_path: String,
    /// Name of the identifier the pipeline uses to remember the login.
    #[allow(dead_code)]
    rememberer: String,
}

impl RedirectingForm {
    pub fn new(settings: &AuthSettings) -> Self {
        Self {
            login_form_path: settings.login_form_path.clone(),
            login_handler_path: settings.login_handler_path.clone(),
            logout_handler_path: settings.logout_handler_path.clone(),
            rememberer: settings.rememberer.clone(),
        }
    }
}

#[async_trait]
impl Authenticator for RedirectingForm {
    async fn identify(&self, ctx: &mut RequestContext) -> Option<ClientIdentity> {
        if ctx.path == self.login_handler_path {
            // Post-auth destination: the referrer if the form carried one,
            // otherwise the mount prefix.
            let destination = query_var(&ctx.query_string, "came_from").unwrap_or_else(|| {
                if ctx.script_name.is_empty() {
                    "/".to_string()
                } else {
                    ctx.script_name.clone()
                }
            });
            debug!("Login handler, post-auth destination: {}", destination);
            ctx.pending_redirect = Some(destination);
        } else if ctx.path == self.logout_handler_path {
            if let Some(came_from) = query_var(&ctx.query_string, "came_from") {
                ctx.came_from = Some(came_from);
            }
            ctx.challenge_required = true;
        }
        None
    }

    async fn challenge(
        &self,
        ctx: &mut RequestContext,
        _status: StatusCode,
        app_headers: &HeaderMap,
        forget_headers: &HeaderMap,
    ) -> Option<Challenge> {
        let form = full_path(&self.login_form_path, &ctx.script_name);
        let destination = format!("{}?came_from={}", form, urlencoding::encode(&ctx.request_url()));
        debug!("Challenging, sending user to {}", destination);

        let mut headers = app_headers.clone();
        for (name, value) in forget_headers {
            headers.append(name, value.clone());
        }
        Some(Challenge::redirect(&destination, headers))
    }
}
