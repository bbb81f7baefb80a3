//! Candidate provider validation.
//!
//! Used by the settings flow before a provider switch is committed: parse
//! strictly, resolve an endpoint, open a throwaway connection, and issue a
//! lightweight health query under a timeout. The verdict is a plain
//! boolean; every failure mode (unknown kind, connect failure, query error,
//! timeout) maps to `false`.

use std::sync::Arc;
use std::time::Duration;

use super::{Provider, ProviderResolver};
use crate::engine::ClientFactory;
use crate::error::EngineError;

/// Timeout in seconds for the validation health query.
const VALIDATION_TIMEOUT_SECS: u64 = 10;

/// Validates candidate providers with throwaway connections.
///
/// Owns its own resolver and factory seams and holds no connection state,
/// so validation can never mutate the connection manager's cached handle.
pub struct ProviderValidator {
    resolver: ProviderResolver,
    factory: Arc<dyn ClientFactory>,
}

impl ProviderValidator {
    /// Create a validator with the given resolution and construction seams.
    #[must_use]
    pub fn new(resolver: ProviderResolver, factory: Arc<dyn ClientFactory>) -> Self {
        Self { resolver, factory }
    }

    /// Report whether a provider name denotes a live, reachable engine.
    ///
    /// Unknown provider kinds are a hard failure here (unlike the lenient
    /// resolution path): validating a brand-new provider must not silently
    /// test the default one instead.
    pub async fn validate(&self, name: &str) -> bool {
        let provider = match Provider::parse(name) {
            Ok(provider) => provider,
            Err(error) => {
                tracing::warn!(%error, "provider validation rejected unknown kind");
                return false;
            }
        };
        match self.probe(provider).await {
            Ok(()) => true,
            Err(error) => {
                tracing::debug!(%provider, %error, "provider validation failed");
                false
            }
        }
    }

    /// Connect and run the health query under a timeout.
    async fn probe(&self, provider: Provider) -> Result<(), EngineError> {
        let endpoint = self.resolver.resolve(provider).await;
        let client = self.factory.connect(&endpoint).await?;
        tokio::time::timeout(
            Duration::from_secs(VALIDATION_TIMEOUT_SECS),
            client.engine_info(),
        )
        .await
        .map_err(|_| EngineError::HealthCheckTimeout {
            seconds: VALIDATION_TIMEOUT_SECS,
        })??;
        Ok(())
    }
}
