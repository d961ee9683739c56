pub mod form_auth;

/// Per-request protocol metadata threaded through the auth hooks. Built by
/// the middleware from the incoming request, mutated in place by the hooks
/// and discarded once the response is produced.
#[derive(Clone, Debug, Default)]
pub struct RequestContext {
    pub scheme: String,               // "http" unless the request says otherwise
    pub host: String,                 // authority or Host header
    pub script_name: String,          // mount prefix, empty at the root
    pub path: String,                 // path below the mount prefix
    pub query_string: String,         // raw; rewritten when the counter is hidden
    pub came_from: Option<String>,    // referrer captured at logout
    pub logins: Option<u32>,          // failed-login counter, loaded on the form page
    pub pending_redirect: Option<String>, // post-auth destination chosen by the pipeline
    pub challenge_required: bool,     // set when the request must be challenged outright
}

impl RequestContext {
    /// Full URL of the current request, query string included.
    pub fn request_url(&self) -> String {
        let mut url = format!("{}://{}{}{}", self.scheme, self.host, self.script_name, self.path);
        if !self.query_string.is_empty() {
            url.push('?');
            url.push_str(&self.query_string);
        }
        url
    }
}

/// Failed-login count exposed to downstream handlers as a request extension
/// once the counter has been hidden from the query string.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LoginAttempts(pub u32);
