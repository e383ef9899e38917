//! Stand-ins for the host services, used when running outside a host.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use serde_json::Value;

use collview_core::error::CollviewError;
use collview_core::models::theme::Theme;
use collview_store::{LocalStore, THEME_KEY};

use crate::services::{
    HostServices, ListenerId, PageContext, PageContextService, SettingsService, ThemeListener,
    ThemeService,
};

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|e| e.into_inner())
}

/// Theme service whose preference lives in a [`LocalStore`].
pub struct DevThemeService {
    store: Arc<dyn LocalStore>,
    current: Mutex<Theme>,
    listeners: Mutex<BTreeMap<ListenerId, Arc<dyn Fn(Theme) + Send + Sync>>>,
    next_id: AtomicU64,
}

impl DevThemeService {
    /// Reads the stored preference; a missing or unreadable value means light.
    pub fn new(store: Arc<dyn LocalStore>) -> Self {
        let current = match store.get(THEME_KEY) {
            Ok(Some(saved)) => saved.parse().unwrap_or_else(|e: String| {
                tracing::warn!(error = %e, "ignoring stored theme preference");
                Theme::default()
            }),
            Ok(None) => Theme::default(),
            Err(e) => {
                tracing::warn!(error = %e, "could not read theme preference");
                Theme::default()
            }
        };

        Self {
            store,
            current: Mutex::new(current),
            listeners: Mutex::new(BTreeMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Persist `theme` and notify every listener.
    pub fn set_theme(&self, theme: Theme) -> Result<(), CollviewError> {
        self.store.store(THEME_KEY, &theme.to_string())?;
        *lock(&self.current) = theme;

        // Call outside the lock: listeners may call back into the service.
        let listeners: Vec<_> = lock(&self.listeners).values().cloned().collect();
        tracing::debug!(%theme, listeners = listeners.len(), "theme changed");
        for listener in listeners {
            listener(theme);
        }
        Ok(())
    }

    pub fn toggle(&self) -> Result<Theme, CollviewError> {
        let next = self.current_theme().toggled();
        self.set_theme(next)?;
        Ok(next)
    }

    pub fn listener_count(&self) -> usize {
        lock(&self.listeners).len()
    }
}

impl ThemeService for DevThemeService {
    fn current_theme(&self) -> Theme {
        *lock(&self.current)
    }

    fn add_listener(&self, listener: ThemeListener) -> ListenerId {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        lock(&self.listeners).insert(id, Arc::from(listener));
        id
    }

    fn remove_listener(&self, id: ListenerId) {
        lock(&self.listeners).remove(&id);
    }
}

/// Settings kept in memory for the life of the process.
#[derive(Default)]
pub struct DevSettingsService {
    values: Mutex<HashMap<String, Value>>,
}

impl DevSettingsService {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SettingsService for DevSettingsService {
    fn get_setting(&self, key: &str) -> Option<Value> {
        lock(&self.values).get(key).cloned()
    }

    fn set_setting(&self, key: &str, value: Value) -> Result<(), CollviewError> {
        lock(&self.values).insert(key.to_string(), value);
        Ok(())
    }
}

pub struct DevPageContext {
    context: PageContext,
}

impl Default for DevPageContext {
    fn default() -> Self {
        Self {
            context: PageContext {
                page_id: "dev-page".to_string(),
                page_name: "Development Page".to_string(),
                page_route: "/dev".to_string(),
                is_studio_page: false,
            },
        }
    }
}

impl PageContextService for DevPageContext {
    fn page_context(&self) -> Option<PageContext> {
        Some(self.context.clone())
    }
}

/// Development host: theme, settings and page context, but no `api`, so the
/// viewer owns its transport.
pub fn dev_services(store: Arc<dyn LocalStore>) -> HostServices {
    HostServices::none()
        .with_theme(Arc::new(DevThemeService::new(store)))
        .with_settings(Arc::new(DevSettingsService::new()))
        .with_page_context(Arc::new(DevPageContext::default()))
}
