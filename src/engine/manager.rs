//! Single shared engine-client handle with guarded construction.
//!
//! The connection manager owns the only cross-request mutable resource in
//! the gateway: one lazily built engine client. The handle is keyed by what
//! it was built for (a provider identity, or a pinned socket override) and
//! is rebuilt if and only if that key changes. Construction happens under
//! an async mutex, so concurrent first calls collapse to a single build and
//! no caller ever observes a half-built handle.
//!
//! Engine-call failures never invalidate the handle: a correctly
//! provisioned handle against a temporarily erroring daemon is still the
//! right handle to reuse on the next call.

use std::sync::Arc;

use tokio::sync::Mutex;

use super::client::{ClientFactory, EngineClient, LogByteStream};
use super::fallback::CliFallback;
use super::settings::ProviderStore;
use super::types::{Container, ContainerAction, EngineInfo, Image};
use crate::error::Result;
use crate::provider::{Endpoint, Provider, ProviderResolver};

/// What the cached handle was built for.
#[derive(Debug, Clone, PartialEq, Eq)]
enum HandleKey {
    /// Endpoint pinned by configuration, bypassing provider resolution.
    Fixed(String),
    /// Endpoint resolved from a provider identity.
    Provider(Provider),
}

/// The cached client together with its build key.
struct CachedHandle {
    key: HandleKey,
    client: Arc<dyn EngineClient>,
}

/// Owns the process-wide engine client handle and fronts all engine
/// operations for the REST surface.
pub struct ConnectionManager {
    resolver: ProviderResolver,
    store: Arc<dyn ProviderStore>,
    factory: Arc<dyn ClientFactory>,
    default_provider: Provider,
    socket_override: Option<String>,
    fallback: Option<CliFallback>,
    state: Mutex<Option<CachedHandle>>,
}

impl ConnectionManager {
    /// Create a manager with the given resolution, preference, and
    /// construction seams.
    #[must_use]
    pub fn new(
        resolver: ProviderResolver,
        store: Arc<dyn ProviderStore>,
        factory: Arc<dyn ClientFactory>,
    ) -> Self {
        Self {
            resolver,
            store,
            factory,
            default_provider: Provider::default(),
            socket_override: None,
            fallback: None,
            state: Mutex::new(None),
        }
    }

    /// Replace the provider used when no preference has been persisted.
    #[must_use]
    pub fn with_default_provider(mut self, provider: Provider) -> Self {
        self.default_provider = provider;
        self
    }

    /// Pin the endpoint to an explicit socket, bypassing provider
    /// resolution. The override participates in the handle key, so the
    /// rebuild-iff-changed invariant is unchanged.
    #[must_use]
    pub fn with_socket_override(mut self, socket: Option<String>) -> Self {
        self.socket_override = socket.filter(|s| !s.is_empty());
        self
    }

    /// Attach a CLI fallback used when client-library listing calls fail.
    #[must_use]
    pub fn with_cli_fallback(mut self, fallback: CliFallback) -> Self {
        self.fallback = Some(fallback);
        self
    }

    /// Obtain the current engine client, building it if needed.
    ///
    /// Reads the persisted provider preference on every call; a changed
    /// preference (or socket override) rebuilds the handle. The lock is
    /// held across construction so overlapping first calls perform exactly
    /// one build.
    ///
    /// # Errors
    ///
    /// Returns an engine error when a new handle cannot be constructed. The
    /// cached state is left empty in that case, so the next call retries.
    pub async fn handle(&self) -> Result<Arc<dyn EngineClient>> {
        let mut state = self.state.lock().await;
        let key = self.effective_key();

        if let Some(cached) = state.as_ref() {
            if cached.key == key {
                return Ok(Arc::clone(&cached.client));
            }
            tracing::info!(?key, "configured provider changed, rebuilding engine handle");
            *state = None;
        }

        let endpoint = match &key {
            HandleKey::Fixed(socket) => Endpoint::from(socket.as_str()),
            HandleKey::Provider(provider) => self.resolver.resolve(*provider).await,
        };
        tracing::debug!(?key, %endpoint, "constructing engine client");
        let client = self.factory.connect(&endpoint).await?;
        *state = Some(CachedHandle {
            key,
            client: Arc::clone(&client),
        });
        Ok(client)
    }

    /// Discard the cached handle and its recorded key.
    ///
    /// Used when the user switches providers; the next engine call
    /// re-resolves and rebuilds.
    pub async fn invalidate(&self) {
        *self.state.lock().await = None;
    }

    /// The provider the manager would currently resolve against.
    ///
    /// Lenient: an unrecognised or unreadable preference degrades to the
    /// default provider.
    #[must_use]
    pub fn configured_provider(&self) -> Provider {
        let preference = match self.store.current() {
            Ok(preference) => preference,
            Err(error) => {
                tracing::warn!(%error, "failed to read provider preference, using default");
                None
            }
        };
        Provider::parse_or(preference.as_deref(), self.default_provider)
    }

    fn effective_key(&self) -> HandleKey {
        self.socket_override.as_ref().map_or_else(
            || HandleKey::Provider(self.configured_provider()),
            |socket| HandleKey::Fixed(socket.clone()),
        )
    }

    /// List containers; falls back to the CLI adapter when the client path
    /// fails and the CLI is available.
    ///
    /// # Errors
    ///
    /// Returns the original engine error when no fallback can serve.
    pub async fn list_containers(&self, all: bool) -> Result<Vec<Container>> {
        let client = self.handle().await?;
        match client.list_containers(all).await {
            Ok(containers) => Ok(containers),
            Err(error) => {
                if let Some(fallback) = &self.fallback {
                    if fallback.available().await {
                        tracing::warn!(%error, "container listing failed, serving CLI fallback");
                        return Ok(fallback.list_containers().await?);
                    }
                }
                Err(error.into())
            }
        }
    }

    /// Query engine version and counters.
    ///
    /// # Errors
    ///
    /// Returns an engine error when the daemon is unreachable.
    pub async fn engine_info(&self) -> Result<EngineInfo> {
        Ok(self.handle().await?.engine_info().await?)
    }

    /// List images; falls back to the CLI adapter when the client path
    /// fails and the CLI is available.
    ///
    /// # Errors
    ///
    /// Returns the original engine error when no fallback can serve.
    pub async fn list_images(&self, all: bool) -> Result<Vec<Image>> {
        let client = self.handle().await?;
        match client.list_images(all).await {
            Ok(images) => Ok(images),
            Err(error) => {
                if let Some(fallback) = &self.fallback {
                    if fallback.available().await {
                        tracing::warn!(%error, "image listing failed, serving CLI fallback");
                        return Ok(fallback.list_images().await?);
                    }
                }
                Err(error.into())
            }
        }
    }

    /// Remove an image by ID or reference.
    ///
    /// # Errors
    ///
    /// Returns an engine error when removal fails.
    pub async fn remove_image(&self, image_id: &str) -> Result<()> {
        Ok(self.handle().await?.remove_image(image_id).await?)
    }

    /// Apply a lifecycle action to a container.
    ///
    /// The action name is validated before any engine call; only start,
    /// stop, and restart are accepted. Returns the parsed action so callers
    /// can phrase success messages.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::InvalidAction` for unsupported actions and a
    /// tagged `ActionFailed` when the engine rejects the call.
    pub async fn perform_action(&self, container_id: &str, action: &str) -> Result<ContainerAction> {
        let action = ContainerAction::parse(action)?;
        let client = self.handle().await?;
        client.container_action(container_id, action).await?;
        Ok(action)
    }

    /// Open a following raw log stream for a container.
    ///
    /// # Errors
    ///
    /// Returns an engine error when the stream cannot be opened.
    pub async fn container_logs(&self, container_id: &str) -> Result<LogByteStream> {
        Ok(self.handle().await?.container_logs(container_id).await?)
    }
}
