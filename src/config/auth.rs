use serde::Deserialize;

/// Settings for the form-authentication layer. The three paths and the
/// rememberer name belong to the wrapped authenticator; the counter name and
/// the post-login/post-logout pages are the friendly layer's own.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthSettings {
    #[serde(default = "default_login_form_path")]
    pub login_form_path: String,
    #[serde(default = "default_login_handler_path")]
    pub login_handler_path: String,
    #[serde(default = "default_logout_handler_path")]
    pub logout_handler_path: String,
    /// Name of the identifier plugin that remembers the login.
    #[serde(default = "default_rememberer")]
    pub rememberer: String,
    /// Query-string key carrying the failed-login counter. Empty falls back
    /// to the default.
    #[serde(default = "default_login_counter_name")]
    pub login_counter_name: String,
    #[serde(default)]
    pub post_login_url: Option<String>,
    #[serde(default)]
    pub post_logout_url: Option<String>,
}

fn default_login_form_path() -> String {
    "/login".to_string()
}

fn default_login_handler_path() -> String {
    "/login_handler".to_string()
}

fn default_logout_handler_path() -> String {
    "/logout_handler".to_string()
}

fn default_rememberer() -> String {
    "cookie".to_string()
}

fn default_login_counter_name() -> String {
    "__logins".to_string()
}

impl AuthSettings {
    pub fn counter_name(&self) -> &str {
        if self.login_counter_name.is_empty() {
            "__logins"
        } else {
            &self.login_counter_name
        }
    }
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            login_form_path: default_login_form_path(),
            login_handler_path: default_login_handler_path(),
            logout_handler_path: default_logout_handler_path(),
            rememberer: default_rememberer(),
            login_counter_name: default_login_counter_name(),
            post_login_url: None,
            post_logout_url: None,
        }
    }
}
