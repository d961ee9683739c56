use async_trait::async_trait;
use axum::http::{HeaderMap, StatusCode};
use tracing::info;

use crate::config::auth::AuthSettings;
use crate::middleware::RequestContext;
use crate::services::urls::{full_path, insert_query_var, query_var, strip_query_var};

use super::{Authenticator, Challenge, ClientIdentity};

/// Friendlier wrapper around a redirecting form authenticator.
///
/// It layers three behaviors on top of the wrapped one, by delegation:
///
/// * users are never challenged on logout;
/// * optional post-login and post-logout pages (which receive the referrer
///   as a `came_from` query variable);
/// * a failed-login counter threaded through the redirect URLs, so a login
///   form can tell the user how many attempts failed without needing a
///   post-login page.
pub struct FriendlyForm<A> {
    inner: A,
    login_form_path: String,
    login_handler_path: String,
    logout_handler_path: String,
    counter_name: String,
    post_login_url: Option<String>,
    post_logout_url: Option<String>,
}

impl<A> FriendlyForm<A> {
    pub fn new(inner: A, settings: &AuthSettings) -> Self {
        Self {
            inner,
            login_form_path: settings.login_form_path.clone(),
            login_handler_path: settings.login_handler_path.clone(),
            logout_handler_path: settings.logout_handler_path.clone(),
            counter_name: settings.counter_name().to_string(),
            post_login_url: settings.post_login_url.clone(),
            post_logout_url: settings.post_logout_url.clone(),
        }
    }

    /// Counter value from the query string, coerced to zero when absent or
    /// not a non-negative integer. The only failure mode here is a garbled
    /// user-facing redirect parameter, so it is never propagated.
    fn counter(&self, ctx: &RequestContext) -> u32 {
        query_var(&ctx.query_string, &self.counter_name)
            .and_then(|raw| raw.parse().ok())
            .unwrap_or(0)
    }

    fn counter_present(&self, ctx: &RequestContext) -> bool {
        query_var(&ctx.query_string, &self.counter_name).is_some()
    }
}

#[async_trait]
impl<A: Authenticator> Authenticator for FriendlyForm<A> {
    async fn identify(&self, ctx: &mut RequestContext) -> Option<ClientIdentity> {
        let identity = self.inner.identify(ctx).await;

        if ctx.path == self.login_handler_path {
            // The pipeline has already chosen where to send the user after
            // authentication; honor the post-login page if one is
            // configured and thread the counter through either way.
            let mut destination = match &self.post_login_url {
                Some(post_login) => {
                    let mut dest = full_path(post_login, &ctx.script_name);
                    if let Some(came_from) = query_var(&ctx.query_string, "came_from") {
                        dest = insert_query_var(&dest, "came_from", &came_from);
                    }
                    dest
                }
                None => ctx
                    .pending_redirect
                    .clone()
                    .unwrap_or_else(|| full_path("/", &ctx.script_name)),
            };
            destination =
                insert_query_var(&destination, &self.counter_name, &self.counter(ctx).to_string());
            info!("Post-login redirect: {}", destination);
            ctx.pending_redirect = Some(destination);
        } else if ctx.path == self.login_form_path || self.counter_present(ctx) {
            // Load the counter into the context and hide it from the query
            // string so downstream handlers never see the variable.
            ctx.logins = Some(self.counter(ctx));
            ctx.query_string = strip_query_var(&ctx.query_string, &self.counter_name);
        }

        identity
    }

    async fn challenge(
        &self,
        ctx: &mut RequestContext,
        status: StatusCode,
        app_headers: &HeaderMap,
        forget_headers: &HeaderMap,
    ) -> Option<Challenge> {
        let base = self.inner.challenge(ctx, status, app_headers, forget_headers).await?;
        let headers = base.without_location();

        if ctx.path == self.logout_handler_path {
            // Logging out: never challenge.
            let destination = match &self.post_logout_url {
                Some(post_logout) => {
                    let mut dest = full_path(post_logout, &ctx.script_name);
                    if let Some(came_from) = &ctx.came_from {
                        dest = insert_query_var(&dest, "came_from", came_from);
                    }
                    dest
                }
                None => ctx.came_from.clone().unwrap_or_else(|| {
                    if ctx.script_name.is_empty() {
                        "/".to_string()
                    } else {
                        ctx.script_name.clone()
                    }
                }),
            };
            info!("Post-logout redirect: {}", destination);
            return Some(Challenge::redirect(&destination, headers));
        }

        if let (Some(logins), Some(location)) = (ctx.logins, base.location()) {
            // Login failed: send the user back to the form with the counter
            // bumped by one.
            let attempts = logins + 1;
            ctx.logins = Some(attempts);
            let destination = insert_query_var(&location, &self.counter_name, &attempts.to_string());
            info!("Failed login attempt #{}, redirecting to {}", attempts, destination);
            return Some(Challenge::redirect(&destination, headers));
        }

        Some(base)
    }
}
