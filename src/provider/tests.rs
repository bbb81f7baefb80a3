//! Unit tests for provider parsing, endpoint resolution, and validation.
//!
//! Resolution is exercised through stub command runners and a mock
//! environment, covering the degrade-to-fallback policy for every
//! provider, and validation is checked for strictness and for leaving the
//! connection manager untouched.

use std::sync::{Arc, Mutex};

use futures_util::stream;
use mockable::MockEnv;
use rstest::{fixture, rstest};

use super::*;
use crate::engine::{
    ClientFactory, ConnectClientFuture, ConnectionManager, ContainersFuture, EngineClient,
    EngineInfo, ImagesFuture, InfoFuture, LogByteStream, LogsFuture, MemoryProviderStore,
    UnitFuture,
};
use crate::error::{EngineError, ProviderError};

// =============================================================================
// Fixtures and stubs
// =============================================================================

/// Fixture providing a `MockEnv` with a home directory and nothing else.
#[fixture]
fn home_env() -> MockEnv {
    let mut env = MockEnv::new();
    env.expect_string().returning(|key| {
        if key == "HOME" {
            Some(String::from("/home/tester"))
        } else {
            None
        }
    });
    env
}

/// Command runner that fails every invocation, recording what was asked.
#[derive(Default)]
struct FailingRunner {
    invocations: Mutex<Vec<String>>,
}

impl CommandRunner for FailingRunner {
    fn run(&self, program: &str, args: &[&str]) -> CommandFuture<'_> {
        let command = format!("{program} {}", args.join(" "));
        self.invocations
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(command.clone());
        Box::pin(async move {
            Err(ProviderError::DiscoveryFailed {
                command,
                message: String::from("command not found"),
            })
        })
    }
}

/// Command runner that answers every invocation with a fixed stdout.
struct FixedOutputRunner {
    stdout: &'static str,
}

impl CommandRunner for FixedOutputRunner {
    fn run(&self, _program: &str, _args: &[&str]) -> CommandFuture<'_> {
        let stdout = self.stdout;
        Box::pin(async move { Ok(String::from(stdout)) })
    }
}

fn resolver_with(env: &MockEnv, runner: Arc<dyn CommandRunner>) -> ProviderResolver {
    ProviderResolver::new(env, runner)
}

/// Minimal engine client whose health query always succeeds.
struct HealthyClient;

impl EngineClient for HealthyClient {
    fn list_containers(&self, _all: bool) -> ContainersFuture<'_> {
        Box::pin(async move { Ok(Vec::new()) })
    }

    fn engine_info(&self) -> InfoFuture<'_> {
        Box::pin(async move { Ok(EngineInfo::default()) })
    }

    fn list_images(&self, _all: bool) -> ImagesFuture<'_> {
        Box::pin(async move { Ok(Vec::new()) })
    }

    fn remove_image(&self, _image_id: &str) -> UnitFuture<'_> {
        Box::pin(async move { Ok(()) })
    }

    fn container_action(
        &self,
        _container_id: &str,
        _action: crate::engine::ContainerAction,
    ) -> UnitFuture<'_> {
        Box::pin(async move { Ok(()) })
    }

    fn container_logs(&self, _container_id: &str) -> LogsFuture<'_> {
        Box::pin(async move { Ok(Box::pin(stream::empty()) as LogByteStream) })
    }
}

/// Factory counting constructions; optionally refusing to connect.
#[derive(Default)]
struct ProbeFactory {
    constructions: Mutex<usize>,
    refuse: bool,
}

impl ClientFactory for ProbeFactory {
    fn connect(&self, _endpoint: &Endpoint) -> ConnectClientFuture<'_> {
        *self
            .constructions
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner) += 1;
        let refuse = self.refuse;
        Box::pin(async move {
            if refuse {
                Err(EngineError::ConnectionFailed {
                    message: String::from("connection refused"),
                })
            } else {
                Ok(Arc::new(HealthyClient) as Arc<dyn EngineClient>)
            }
        })
    }
}

impl ProbeFactory {
    fn construction_count(&self) -> usize {
        *self
            .constructions
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

// =============================================================================
// Provider parsing
// =============================================================================

#[rstest]
#[case("colima", Provider::Colima)]
#[case("docker", Provider::Docker)]
#[case("docker-desktop", Provider::DockerDesktop)]
#[case("podman", Provider::Podman)]
#[case("lima", Provider::Lima)]
#[case("Podman", Provider::Podman)]
#[case("  LIMA  ", Provider::Lima)]
fn parse_accepts_supported_names_case_insensitively(
    #[case] name: &str,
    #[case] expected: Provider,
) {
    assert!(matches!(Provider::parse(name), Ok(provider) if provider == expected));
}

#[rstest]
#[case("orbstack")]
#[case("dockerd")]
#[case("")]
fn parse_rejects_unknown_names(#[case] name: &str) {
    let error = Provider::parse(name).expect_err("name must be rejected");
    assert!(matches!(error, ProviderError::UnknownKind { name: n } if n == name));
}

#[rstest]
fn lenient_parse_defaults_unknown_names_to_colima() {
    assert_eq!(Provider::parse_lenient(Some("orbstack")), Provider::Colima);
    assert_eq!(Provider::parse_lenient(None), Provider::Colima);
    assert_eq!(Provider::parse_lenient(Some("lima")), Provider::Lima);
}

// =============================================================================
// Endpoint resolution
// =============================================================================

#[rstest]
#[case(Provider::Colima, "/home/tester/.colima/default/docker.sock")]
#[case(
    Provider::Podman,
    "/home/tester/.local/share/containers/podman/machine/podman-machine-default/podman.sock"
)]
#[case(Provider::Docker, "/var/run/docker.sock")]
#[case(Provider::DockerDesktop, "/var/run/docker.sock")]
#[case(Provider::Lima, "/home/tester/.lima/default/sock/docker.sock")]
#[tokio::test]
async fn every_provider_resolves_when_discovery_is_unavailable(
    home_env: MockEnv,
    #[case] provider: Provider,
    #[case] expected: &str,
) {
    let resolver = resolver_with(&home_env, Arc::new(FailingRunner::default()));
    let endpoint = resolver.resolve(provider).await;
    assert_eq!(endpoint.as_str(), expected);
    assert!(!endpoint.as_str().is_empty());
}

#[rstest]
#[tokio::test]
async fn colima_discovery_output_is_trimmed_and_unprefixed(home_env: MockEnv) {
    let runner = FixedOutputRunner {
        stdout: "unix:///tmp/colima/docker.sock\n",
    };
    let resolver = resolver_with(&home_env, Arc::new(runner));
    let endpoint = resolver.resolve(Provider::Colima).await;
    assert_eq!(endpoint.as_str(), "/tmp/colima/docker.sock");
}

#[rstest]
#[tokio::test]
async fn podman_discovery_output_is_used_verbatim(home_env: MockEnv) {
    let runner = FixedOutputRunner {
        stdout: "/tmp/podman/podman.sock\n",
    };
    let resolver = resolver_with(&home_env, Arc::new(runner));
    let endpoint = resolver.resolve(Provider::Podman).await;
    assert_eq!(endpoint.as_str(), "/tmp/podman/podman.sock");
}

#[rstest]
#[tokio::test]
async fn empty_discovery_output_falls_back_to_the_conventional_path(home_env: MockEnv) {
    let runner = FixedOutputRunner { stdout: "\n" };
    let resolver = resolver_with(&home_env, Arc::new(runner));
    let endpoint = resolver.resolve(Provider::Colima).await;
    assert_eq!(endpoint.as_str(), "/home/tester/.colima/default/docker.sock");
}

#[rstest]
#[tokio::test]
async fn static_providers_never_run_discovery_commands(home_env: MockEnv) {
    let runner = Arc::new(FailingRunner::default());
    let resolver = resolver_with(&home_env, Arc::clone(&runner) as Arc<dyn CommandRunner>);

    resolver.resolve(Provider::Docker).await;
    resolver.resolve(Provider::Lima).await;

    let invocations = runner
        .invocations
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner);
    assert!(invocations.is_empty());
}

// =============================================================================
// Validation
// =============================================================================

#[rstest]
#[tokio::test]
async fn unknown_provider_fails_validation_without_a_connection(home_env: MockEnv) {
    let factory = Arc::new(ProbeFactory::default());
    let resolver = resolver_with(&home_env, Arc::new(FailingRunner::default()));
    let validator = ProviderValidator::new(resolver, Arc::clone(&factory) as Arc<dyn ClientFactory>);

    assert!(!validator.validate("orbstack").await);
    assert_eq!(factory.construction_count(), 0);
}

#[rstest]
#[tokio::test]
async fn reachable_provider_passes_validation(home_env: MockEnv) {
    let factory = Arc::new(ProbeFactory::default());
    let resolver = resolver_with(&home_env, Arc::new(FailingRunner::default()));
    let validator = ProviderValidator::new(resolver, Arc::clone(&factory) as Arc<dyn ClientFactory>);

    assert!(validator.validate("podman").await);
    assert_eq!(factory.construction_count(), 1);
}

#[rstest]
#[tokio::test]
async fn unreachable_provider_fails_validation(home_env: MockEnv) {
    let factory = Arc::new(ProbeFactory {
        refuse: true,
        ..ProbeFactory::default()
    });
    let resolver = resolver_with(&home_env, Arc::new(FailingRunner::default()));
    let validator = ProviderValidator::new(resolver, Arc::clone(&factory) as Arc<dyn ClientFactory>);

    assert!(!validator.validate("docker").await);
}

#[rstest]
#[tokio::test]
async fn validation_never_mutates_the_connection_manager(
    #[from(home_env)] manager_env: MockEnv,
    home_env: MockEnv,
) {
    let store = Arc::new(MemoryProviderStore::with_provider("colima"));
    let manager = ConnectionManager::new(
        resolver_with(&manager_env, Arc::new(FailingRunner::default())),
        Arc::clone(&store) as Arc<dyn crate::engine::ProviderStore>,
        Arc::new(ProbeFactory::default()),
    );
    let before = manager.handle().await.expect("handle builds");

    let validator = ProviderValidator::new(
        resolver_with(&home_env, Arc::new(FailingRunner::default())),
        Arc::new(ProbeFactory::default()),
    );
    assert!(validator.validate("podman").await);

    assert_eq!(manager.configured_provider(), Provider::Colima);
    let after = manager.handle().await.expect("handle still cached");
    assert!(Arc::ptr_eq(&before, &after));
}
