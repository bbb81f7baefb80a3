//! Socket endpoint resolution for container providers.
//!
//! Each provider maps to a control-socket path. Colima and Podman expose
//! their sockets through CLI inspection commands; those commands are
//! best-effort hints, so any failure (CLI not installed, machine not
//! running) degrades to the conventional static path instead of
//! propagating. The real health check happens at the connection attempt,
//! not at path resolution.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use camino::Utf8PathBuf;
use tokio::process::Command;

use super::{Endpoint, Provider};
use crate::error::ProviderError;

/// Default socket path for Docker and Docker Desktop.
const DOCKER_SOCKET: &str = "/var/run/docker.sock";

/// Colima's context-inspection command, printing the configured docker host.
const COLIMA_DISCOVERY: (&str, &[&str]) = (
    "docker",
    &[
        "context",
        "inspect",
        "colima",
        "--format",
        "{{.Endpoints.docker.Host}}",
    ],
);

/// Podman's machine-inspection command, printing the machine socket path.
const PODMAN_DISCOVERY: (&str, &[&str]) = (
    "podman",
    &[
        "machine",
        "inspect",
        "--format",
        "{{.ConnectionInfo.PodmanSocket.Path}}",
    ],
);

/// Boxed future type returned by [`CommandRunner::run`].
pub type CommandFuture<'a> =
    Pin<Box<dyn Future<Output = Result<String, ProviderError>> + Send + 'a>>;

/// Behaviour required to run a provider discovery command.
///
/// This abstraction keeps endpoint resolution testable without the provider
/// CLIs installed.
pub trait CommandRunner: Send + Sync {
    /// Run a command and capture its standard output.
    fn run(&self, program: &str, args: &[&str]) -> CommandFuture<'_>;
}

/// Command runner backed by `tokio::process`.
///
/// Captures standard output on success; a spawn failure or non-zero exit
/// status is reported as `ProviderError::DiscoveryFailed`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemCommandRunner;

impl CommandRunner for SystemCommandRunner {
    fn run(&self, program: &str, args: &[&str]) -> CommandFuture<'_> {
        let program = program.to_owned();
        let args: Vec<String> = args.iter().map(|&arg| arg.to_owned()).collect();
        Box::pin(async move {
            let command_line = format!("{program} {}", args.join(" "));
            let output = Command::new(&program)
                .args(&args)
                .output()
                .await
                .map_err(|e| ProviderError::DiscoveryFailed {
                    command: command_line.clone(),
                    message: e.to_string(),
                })?;

            if !output.status.success() {
                return Err(ProviderError::DiscoveryFailed {
                    command: command_line,
                    message: output.status.to_string(),
                });
            }

            Ok(String::from_utf8_lossy(&output.stdout).into_owned())
        })
    }
}

/// Resolves a provider identity to a control-socket endpoint.
///
/// Resolution never fails for a parsed [`Provider`]: discovery commands are
/// hints, and every provider has a conventional fallback path rooted at the
/// invoking user's home directory.
pub struct ProviderResolver {
    home: Utf8PathBuf,
    runner: Arc<dyn CommandRunner>,
}

impl ProviderResolver {
    /// Create a resolver with explicit environment and command seams.
    ///
    /// The home directory is captured from the environment up front; a
    /// missing `HOME` degrades to a rootless fallback path, and the connect
    /// attempt is the real check.
    #[must_use]
    pub fn new<E: mockable::Env>(env: &E, runner: Arc<dyn CommandRunner>) -> Self {
        let home = Utf8PathBuf::from(env.string("HOME").unwrap_or_default());
        Self { home, runner }
    }

    /// Create a resolver backed by the real environment and `tokio::process`.
    #[must_use]
    pub fn system() -> Self {
        Self::new(&mockable::DefaultEnv::new(), Arc::new(SystemCommandRunner))
    }

    /// Resolve the control-socket endpoint for a provider.
    ///
    /// Always returns a candidate endpoint. Discovery failures are logged
    /// at debug level and absorbed by the static fallback; whether the
    /// endpoint actually accepts connections is decided at connect time.
    pub async fn resolve(&self, provider: Provider) -> Endpoint {
        match provider {
            Provider::Docker | Provider::DockerDesktop => Endpoint::from(DOCKER_SOCKET),
            Provider::Colima => self
                .discover(provider, COLIMA_DISCOVERY)
                .await
                .unwrap_or_else(|| Endpoint::from(self.colima_fallback().into_string())),
            Provider::Podman => self
                .discover(provider, PODMAN_DISCOVERY)
                .await
                .unwrap_or_else(|| Endpoint::from(self.podman_fallback().into_string())),
            Provider::Lima => Endpoint::from(self.lima_socket().into_string()),
        }
    }

    /// The conventional Colima socket path.
    #[must_use]
    pub fn colima_fallback(&self) -> Utf8PathBuf {
        self.home_dir().join(".colima/default/docker.sock")
    }

    /// The conventional Podman machine socket path.
    #[must_use]
    pub fn podman_fallback(&self) -> Utf8PathBuf {
        self.home_dir()
            .join(".local/share/containers/podman/machine/podman-machine-default/podman.sock")
    }

    /// The conventional Lima socket path. Lima has no discovery command.
    #[must_use]
    pub fn lima_socket(&self) -> Utf8PathBuf {
        self.home_dir().join(".lima/default/sock/docker.sock")
    }

    /// Run a provider's discovery command and extract the socket address.
    ///
    /// Returns `None` when the command fails or prints nothing useful; the
    /// caller then falls back to the conventional path.
    async fn discover(&self, provider: Provider, (program, args): (&str, &[&str])) -> Option<Endpoint> {
        match self.runner.run(program, args).await {
            Ok(stdout) => {
                let address = stdout.trim();
                let address = address.strip_prefix("unix://").unwrap_or(address);
                if address.is_empty() {
                    tracing::debug!(%provider, "discovery command printed no socket, using fallback");
                    None
                } else {
                    Some(Endpoint::from(address))
                }
            }
            Err(error) => {
                tracing::debug!(%provider, %error, "discovery command failed, using fallback");
                None
            }
        }
    }

    /// The invoking user's home directory, as captured at construction.
    fn home_dir(&self) -> &Utf8PathBuf {
        &self.home
    }
}
