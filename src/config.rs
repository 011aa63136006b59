use tracing::{info, warn};

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080";
pub const DEFAULT_AVATAR: &str = "../image/profile-default.png";

/// Client-wide settings derived from env.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_base_url: String,
    pub page_size: u32,
    /// Distance from the document bottom (layout px) that triggers the next page.
    pub scroll_threshold_px: u32,
    pub default_avatar: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.into(),
            page_size: 10,
            scroll_threshold_px: 200,
            default_avatar: DEFAULT_AVATAR.into(),
        }
    }
}

impl ClientConfig {
    pub fn from_env() -> Self {
        fn string_env(name: &str, default: &str) -> String {
            match std::env::var(name) {
                Ok(v) if !v.trim().is_empty() => v.trim().to_string(),
                _ => default.to_string(),
            }
        }
        fn u32_env(name: &str, default: u32) -> u32 {
            match std::env::var(name) {
                Ok(v) => v.trim().parse().unwrap_or_else(|e| {
                    warn!("Invalid {name} value {v:?}: {e}, using default {default}");
                    default
                }),
                Err(_) => default,
            }
        }
        let d = Self::default();
        let cfg = Self {
            api_base_url: string_env("POSTBOARD_API_BASE_URL", &d.api_base_url)
                .trim_end_matches('/')
                .to_string(),
            page_size: u32_env("POSTBOARD_PAGE_SIZE", d.page_size).max(1),
            scroll_threshold_px: u32_env("POSTBOARD_SCROLL_THRESHOLD_PX", d.scroll_threshold_px),
            default_avatar: string_env("POSTBOARD_DEFAULT_AVATAR", &d.default_avatar),
        };
        info!("API base URL: {}", cfg.api_base_url);
        cfg
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into().trim_end_matches('/').to_string();
        self
    }
}
