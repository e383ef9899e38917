//! Capabilities a host may hand to the viewer.
//!
//! Each capability is optional and independent. A component only looks at
//! the ones it uses; when `api` is absent the viewer builds its own
//! transport.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use collview_api::Transport;
use collview_core::error::CollviewError;
use collview_core::models::theme::Theme;

pub type ListenerId = u64;

pub type ThemeListener = Box<dyn Fn(Theme) + Send + Sync>;

/// Current theme plus change notifications.
pub trait ThemeService: Send + Sync {
    fn current_theme(&self) -> Theme;

    /// Register a callback invoked with the new theme on every change.
    fn add_listener(&self, listener: ThemeListener) -> ListenerId;

    fn remove_listener(&self, id: ListenerId);
}

/// Host-persisted settings, keyed by name.
pub trait SettingsService: Send + Sync {
    fn get_setting(&self, key: &str) -> Option<Value>;

    fn set_setting(&self, key: &str, value: Value) -> Result<(), CollviewError>;
}

/// The host page the module is placed on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageContext {
    pub page_id: String,
    pub page_name: String,
    pub page_route: String,
    pub is_studio_page: bool,
}

pub trait PageContextService: Send + Sync {
    fn page_context(&self) -> Option<PageContext>;
}

#[derive(Clone, Default)]
pub struct HostServices {
    pub theme: Option<Arc<dyn ThemeService>>,
    pub api: Option<Arc<dyn Transport>>,
    pub settings: Option<Arc<dyn SettingsService>>,
    pub page_context: Option<Arc<dyn PageContextService>>,
}

impl HostServices {
    /// No host at all: the viewer manages everything itself.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn with_theme(mut self, theme: Arc<dyn ThemeService>) -> Self {
        self.theme = Some(theme);
        self
    }

    pub fn with_api(mut self, api: Arc<dyn Transport>) -> Self {
        self.api = Some(api);
        self
    }

    pub fn with_settings(mut self, settings: Arc<dyn SettingsService>) -> Self {
        self.settings = Some(settings);
        self
    }

    pub fn with_page_context(mut self, page_context: Arc<dyn PageContextService>) -> Self {
        self.page_context = Some(page_context);
        self
    }
}

impl std::fmt::Debug for HostServices {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostServices")
            .field("theme", &self.theme.is_some())
            .field("api", &self.api.is_some())
            .field("settings", &self.settings.is_some())
            .field("page_context", &self.page_context.is_some())
            .finish()
    }
}
