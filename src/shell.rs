use std::fmt;
use std::sync::Arc;

use tracing::warn;

use crate::backend::Backend;
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::models::Id;

pub const LOGIN_REQUIRED: &str = "Login required.";

/// Pages a controller can send the user to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Login,
    Signup,
    Posts,
    Post(Id),
    EditPost(Id),
    MakePost,
    EditProfile,
    EditPassword,
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::Login => f.write_str("./login.html"),
            Route::Signup => f.write_str("./signup.html"),
            Route::Posts => f.write_str("./posts.html"),
            Route::Post(id) => write!(f, "./post.html?postId={id}"),
            Route::EditPost(id) => write!(f, "./post-edit.html?postId={id}"),
            Route::MakePost => f.write_str("./make-post.html"),
            Route::EditProfile => f.write_str("./edit-profile.html"),
            Route::EditPassword => f.write_str("./edit-password.html"),
        }
    }
}

/// Presentation side of a page: blocking alerts, transient toasts, navigation.
pub trait Shell: Send + Sync {
    fn alert(&self, message: &str);
    fn toast(&self, message: &str);
    fn navigate(&self, route: Route);
}

/// Everything a page controller needs, built once per page load.
#[derive(Clone)]
pub struct PageContext {
    pub backend: Arc<dyn Backend>,
    pub shell: Arc<dyn Shell>,
    pub config: Arc<ClientConfig>,
}

impl PageContext {
    pub fn new(backend: Arc<dyn Backend>, shell: Arc<dyn Shell>, config: ClientConfig) -> Self {
        Self { backend, shell, config: Arc::new(config) }
    }

    /// Shared failure policy: 401 always sends the user to login, anything else
    /// surfaces `message` once.
    pub fn report_failure(&self, what: &str, err: &ApiError, message: &str) {
        warn!("{what} failed: {err}");
        if err.is_unauthorized() {
            self.shell.alert(LOGIN_REQUIRED);
            self.shell.navigate(Route::Login);
        } else {
            self.shell.alert(message);
        }
    }
}

/// Value of `key` in a `a=1&b=2` query string (leading `?` allowed), percent-decoded.
pub fn query_param(query: &str, key: &str) -> Option<String> {
    query
        .trim_start_matches('?')
        .split('&')
        .map(|pair| pair.split_once('=').unwrap_or((pair, "")))
        .find(|(k, _)| *k == key)
        .and_then(|(_, v)| urlencoding::decode(&v.replace('+', " ")).ok().map(|c| c.into_owned()))
        .filter(|v| !v.is_empty())
}

/// `postId` parsed as an id; absent or non-numeric yields `None`.
pub fn post_id_from_query(query: &str) -> Option<Id> {
    query_param(query, "postId").and_then(|v| v.trim().parse().ok())
}
