use std::sync::Arc;

use axum::{middleware, routing::get, Router};
use tokio::net::TcpListener;
use tracing::info;

use formgate::config::settings;
use formgate::handlers::pages;
use formgate::middleware::form_auth::{form_auth_middleware, FormAuthState};
use formgate::services::auth::{FriendlyForm, RedirectingForm};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let settings = settings::load()?;
    info!("Loaded settings: {:?}", settings);

    let authenticator = FriendlyForm::new(RedirectingForm::new(&settings.auth), &settings.auth);
    let state = FormAuthState {
        authenticator: Arc::new(authenticator),
        script_name: settings.script_name.clone(),
    };

    let app = Router::new()
        .route(&settings.auth.login_form_path, get(pages::login_form))
        .route("/dashboard", get(pages::dashboard))
        .layer(middleware::from_fn_with_state(state, form_auth_middleware));

    let addr = format!("0.0.0.0:{}", settings.app_port);
    info!("Listening on {}", addr);
    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
