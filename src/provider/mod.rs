//! Provider identity and endpoint resolution.
//!
//! A provider is the container-engine backend the gateway talks to (Docker
//! Desktop, Colima, Podman, Lima). This module parses provider names,
//! resolves each provider to its control-socket endpoint, and validates
//! candidate providers with a throwaway connection.
//!
//! Parsing comes in two strengths. The validation flow uses
//! [`Provider::parse`], which rejects unrecognised names with
//! [`crate::error::ProviderError::UnknownKind`]. The normal resolution flow
//! uses [`Provider::parse_lenient`], which degrades to the default provider
//! with a warning so an unrecognised persisted preference never takes the
//! gateway down.

mod resolver;
mod validate;

#[cfg(test)]
mod tests;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ProviderError;

pub use resolver::{CommandFuture, CommandRunner, ProviderResolver, SystemCommandRunner};
pub use validate::ProviderValidator;

/// A supported container-engine backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Provider {
    /// Docker Desktop.
    DockerDesktop,
    /// Plain Docker daemon.
    Docker,
    /// Colima.
    #[default]
    Colima,
    /// Podman machine.
    Podman,
    /// Lima.
    Lima,
}

impl Provider {
    /// Parse a provider name, rejecting unrecognised values.
    ///
    /// Matching is case-insensitive. This is the strict parse used by the
    /// provider validation flow; the connection manager uses
    /// [`Self::parse_lenient`] instead.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::UnknownKind` when the name is not one of the
    /// supported providers.
    pub fn parse(name: &str) -> Result<Self, ProviderError> {
        match name.trim().to_ascii_lowercase().as_str() {
            "docker-desktop" => Ok(Self::DockerDesktop),
            "docker" => Ok(Self::Docker),
            "colima" => Ok(Self::Colima),
            "podman" => Ok(Self::Podman),
            "lima" => Ok(Self::Lima),
            _ => Err(ProviderError::UnknownKind {
                name: name.to_owned(),
            }),
        }
    }

    /// Parse a persisted provider preference, degrading to the default.
    ///
    /// `None` (no preference persisted) silently selects the default
    /// provider. An unrecognised name also selects the default, but logs a
    /// warning: the preference is untrusted free text and service
    /// availability wins over strictness on this path.
    #[must_use]
    pub fn parse_lenient(name: Option<&str>) -> Self {
        Self::parse_or(name, Self::default())
    }

    /// Like [`Self::parse_lenient`], but degrading to an explicit default.
    #[must_use]
    pub fn parse_or(name: Option<&str>, default: Self) -> Self {
        let Some(name) = name else {
            return default;
        };
        Self::parse(name).unwrap_or_else(|_| {
            tracing::warn!(
                provider = name,
                fallback = %default,
                "unrecognised provider preference, using default"
            );
            default
        })
    }

    /// The canonical kebab-case name of the provider.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DockerDesktop => "docker-desktop",
            Self::Docker => "docker",
            Self::Colima => "colima",
            Self::Podman => "podman",
            Self::Lima => "lima",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Provider {
    type Err = ProviderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// An opaque control-socket address resolved from a provider identity.
///
/// Holds either a bare filesystem path (`/var/run/docker.sock`) or a
/// scheme-prefixed URI; the engine connector normalises the shape when
/// establishing a connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint(String);

impl Endpoint {
    /// The endpoint address as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for Endpoint {
    fn from(address: String) -> Self {
        Self(address)
    }
}

impl From<&str> for Endpoint {
    fn from(address: &str) -> Self {
        Self(address.to_owned())
    }
}
