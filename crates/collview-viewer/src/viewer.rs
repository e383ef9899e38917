use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::watch;
use tokio::task::JoinHandle;

use collview_api::{create_transport, CollectionRepository, Transport};
use collview_core::config::CollviewConfig;
use collview_core::error::CollviewError;
use collview_core::models::theme::Theme;
use collview_store::LocalStore;

use crate::render::{self, RenderOptions};
use crate::services::{HostServices, ListenerId, ThemeService};
use crate::state::FetchState;

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|e| e.into_inner())
}

/// A live mount: the in-flight fetch and the theme subscription.
///
/// `alive` is checked and written under its lock, so once
/// [`CollectionViewer::unmount`] returns no callback from this mount can
/// touch the viewer's state.
struct Mount {
    alive: Arc<Mutex<bool>>,
    task: JoinHandle<()>,
    listener: Option<ListenerId>,
}

/// Loads all collections once per mount and exposes the result as a
/// [`FetchState`].
pub struct CollectionViewer {
    repository: CollectionRepository,
    theme_service: Option<Arc<dyn ThemeService>>,
    state: Arc<watch::Sender<FetchState>>,
    theme: Arc<Mutex<Theme>>,
    mount: Option<Mount>,
}

impl CollectionViewer {
    /// Build a viewer from whatever the host provides. Without an `api`
    /// capability the viewer talks HTTP to the configured base URL itself.
    pub fn new(
        services: &HostServices,
        config: &CollviewConfig,
        tokens: Arc<dyn LocalStore>,
    ) -> Result<Self, CollviewError> {
        let transport = match &services.api {
            Some(api) => api.clone(),
            None => create_transport(config, tokens)?,
        };
        Ok(Self::with_transport(
            transport,
            services.theme.clone(),
            config.theme,
        ))
    }

    pub fn with_transport(
        transport: Arc<dyn Transport>,
        theme_service: Option<Arc<dyn ThemeService>>,
        fallback_theme: Theme,
    ) -> Self {
        let theme = theme_service
            .as_ref()
            .map(|svc| svc.current_theme())
            .unwrap_or(fallback_theme);
        let (state, _) = watch::channel(FetchState::Pending);

        Self {
            repository: CollectionRepository::new(transport),
            theme_service,
            state: Arc::new(state),
            theme: Arc::new(Mutex::new(theme)),
            mount: None,
        }
    }

    /// Start the one fetch for this mount. Must be called inside a tokio
    /// runtime. Does nothing if already mounted.
    pub fn mount(&mut self) {
        if self.mount.is_some() {
            return;
        }

        self.state.send_replace(FetchState::Pending);
        let alive = Arc::new(Mutex::new(true));

        let listener = self.theme_service.as_ref().map(|svc| {
            *lock(&self.theme) = svc.current_theme();
            let theme = self.theme.clone();
            let alive = alive.clone();
            svc.add_listener(Box::new(move |next: Theme| {
                if *lock(&alive) {
                    *lock(&theme) = next;
                }
            }))
        });

        let repository = self.repository.clone();
        let state = self.state.clone();
        let task_alive = alive.clone();
        let task = tokio::spawn(async move {
            let result = repository.find_all().await;
            match &result {
                Ok(items) => tracing::info!(count = items.len(), "collections loaded"),
                Err(e) => tracing::warn!(error = %e, "failed to load collections"),
            }

            let alive = lock(&task_alive);
            if *alive {
                state.send_replace(FetchState::from_result(result));
            } else {
                tracing::debug!("viewer unmounted before fetch finished, dropping result");
            }
        });

        tracing::debug!("collection viewer mounted");
        self.mount = Some(Mount {
            alive,
            task,
            listener,
        });
    }

    /// Stop the in-flight fetch and theme subscription. Any result that
    /// arrives afterwards is discarded.
    pub fn unmount(&mut self) {
        let Some(mount) = self.mount.take() else {
            return;
        };

        *lock(&mount.alive) = false;
        mount.task.abort();
        if let (Some(svc), Some(id)) = (&self.theme_service, mount.listener) {
            svc.remove_listener(id);
        }
        tracing::debug!("collection viewer unmounted");
    }

    /// User-initiated recovery: start a fresh fetch cycle.
    pub fn reload(&mut self) {
        tracing::info!("reloading collections");
        self.unmount();
        self.mount();
    }

    pub fn is_mounted(&self) -> bool {
        self.mount.is_some()
    }

    pub fn state(&self) -> FetchState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<FetchState> {
        self.state.subscribe()
    }

    /// Wait until the current fetch has finished and return its outcome.
    ///
    /// Returns immediately when not pending. Waits forever on a pending,
    /// unmounted viewer; only call this after [`CollectionViewer::mount`].
    pub async fn settled(&self) -> FetchState {
        let mut rx = self.state.subscribe();
        let settled = match rx.wait_for(|s| !s.is_pending()).await {
            Ok(state) => state.clone(),
            Err(_) => self.state(),
        };
        settled
    }

    pub fn theme(&self) -> Theme {
        *lock(&self.theme)
    }

    /// Render the current state with the viewer's theme.
    pub fn render(&self, options: &RenderOptions) -> String {
        let options = RenderOptions {
            theme: self.theme(),
            ..options.clone()
        };
        let state = self.state.borrow();
        render::render(&state.view(), &options)
    }
}

impl Drop for CollectionViewer {
    fn drop(&mut self) {
        self.unmount();
    }
}
