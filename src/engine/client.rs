//! Narrow engine-client capability trait and its bollard adapter.
//!
//! The gateway depends only on [`EngineClient`]: the exact set of engine
//! operations the REST surface needs. Wrapping bollard behind a small trait
//! seam keeps the connection manager and handlers unit-testable without a
//! live daemon.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use bollard::Docker;
use bollard::query_parameters::{
    ListContainersOptionsBuilder, ListImagesOptionsBuilder, LogsOptionsBuilder,
    RemoveImageOptions, RestartContainerOptions, StartContainerOptions, StopContainerOptions,
};
use bytes::Bytes;
use futures_util::{Stream, StreamExt};

use super::connect::EngineConnector;
use super::types::{Container, ContainerAction, EngineInfo, Image};
use crate::error::EngineError;
use crate::provider::Endpoint;

/// Raw byte stream of a container's log output.
///
/// Chunks may or may not carry the engine's multiplexing frame headers;
/// the log demultiplexer tolerates both shapes.
pub type LogByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, EngineError>> + Send>>;

/// Boxed future type returned by [`EngineClient::list_containers`].
pub type ContainersFuture<'a> =
    Pin<Box<dyn Future<Output = Result<Vec<Container>, EngineError>> + Send + 'a>>;

/// Boxed future type returned by [`EngineClient::engine_info`].
pub type InfoFuture<'a> = Pin<Box<dyn Future<Output = Result<EngineInfo, EngineError>> + Send + 'a>>;

/// Boxed future type returned by [`EngineClient::list_images`].
pub type ImagesFuture<'a> =
    Pin<Box<dyn Future<Output = Result<Vec<Image>, EngineError>> + Send + 'a>>;

/// Boxed future type returned by unit-valued engine operations.
pub type UnitFuture<'a> = Pin<Box<dyn Future<Output = Result<(), EngineError>> + Send + 'a>>;

/// Boxed future type returned by [`EngineClient::container_logs`].
pub type LogsFuture<'a> =
    Pin<Box<dyn Future<Output = Result<LogByteStream, EngineError>> + Send + 'a>>;

/// The engine operations the gateway needs.
///
/// Implemented by [`BollardClient`] for real engines and by mocks in tests.
pub trait EngineClient: Send + Sync {
    /// List containers, optionally including stopped ones.
    fn list_containers(&self, all: bool) -> ContainersFuture<'_>;

    /// Query engine version and container/image counters.
    fn engine_info(&self) -> InfoFuture<'_>;

    /// List images.
    fn list_images(&self, all: bool) -> ImagesFuture<'_>;

    /// Remove an image by ID or reference.
    fn remove_image(&self, image_id: &str) -> UnitFuture<'_>;

    /// Apply a lifecycle action to a container.
    fn container_action(&self, container_id: &str, action: ContainerAction) -> UnitFuture<'_>;

    /// Open a following log stream for a container.
    fn container_logs(&self, container_id: &str) -> LogsFuture<'_>;
}

/// [`EngineClient`] adapter over a bollard [`Docker`] handle.
#[derive(Debug, Clone)]
pub struct BollardClient {
    docker: Docker,
}

impl BollardClient {
    /// Wrap an established bollard handle.
    #[must_use]
    pub const fn new(docker: Docker) -> Self {
        Self { docker }
    }
}

impl EngineClient for BollardClient {
    fn list_containers(&self, all: bool) -> ContainersFuture<'_> {
        Box::pin(async move {
            let options = ListContainersOptionsBuilder::default().all(all).build();
            let summaries = self
                .docker
                .list_containers(Some(options))
                .await
                .map_err(|e| EngineError::ListFailed {
                    subject: String::from("containers"),
                    message: e.to_string(),
                })?;
            Ok(summaries.into_iter().map(Container::from).collect())
        })
    }

    fn engine_info(&self) -> InfoFuture<'_> {
        Box::pin(async move {
            let info = self
                .docker
                .info()
                .await
                .map_err(|e| EngineError::InfoFailed {
                    message: e.to_string(),
                })?;
            Ok(EngineInfo::from(info))
        })
    }

    fn list_images(&self, all: bool) -> ImagesFuture<'_> {
        Box::pin(async move {
            let options = ListImagesOptionsBuilder::default().all(all).build();
            let summaries = self
                .docker
                .list_images(Some(options))
                .await
                .map_err(|e| EngineError::ListFailed {
                    subject: String::from("images"),
                    message: e.to_string(),
                })?;
            Ok(summaries.into_iter().map(Image::from).collect())
        })
    }

    fn remove_image(&self, image_id: &str) -> UnitFuture<'_> {
        let image_id = image_id.to_owned();
        Box::pin(async move {
            self.docker
                .remove_image(&image_id, None::<RemoveImageOptions>, None)
                .await
                .map_err(|e| EngineError::RemoveImageFailed {
                    image_id: image_id.clone(),
                    message: e.to_string(),
                })?;
            Ok(())
        })
    }

    fn container_action(&self, container_id: &str, action: ContainerAction) -> UnitFuture<'_> {
        let container_id = container_id.to_owned();
        Box::pin(async move {
            let result = match action {
                ContainerAction::Start => {
                    self.docker
                        .start_container(&container_id, None::<StartContainerOptions>)
                        .await
                }
                ContainerAction::Stop => {
                    self.docker
                        .stop_container(&container_id, None::<StopContainerOptions>)
                        .await
                }
                ContainerAction::Restart => {
                    self.docker
                        .restart_container(&container_id, None::<RestartContainerOptions>)
                        .await
                }
            };
            result.map_err(|e| EngineError::ActionFailed {
                container_id: container_id.clone(),
                action: String::from(action.as_str()),
                message: e.to_string(),
            })
        })
    }

    fn container_logs(&self, container_id: &str) -> LogsFuture<'_> {
        let container_id = container_id.to_owned();
        let docker = self.docker.clone();
        Box::pin(async move {
            let options = LogsOptionsBuilder::default()
                .follow(true)
                .stdout(true)
                .stderr(true)
                .timestamps(true)
                .build();
            let raw = docker.logs(&container_id, Some(options));
            let bytes = raw.map(move |item| match item {
                Ok(output) => Ok(output.into_bytes()),
                Err(e) => Err(EngineError::LogStreamFailed {
                    container_id: container_id.clone(),
                    message: e.to_string(),
                }),
            });
            Ok(Box::pin(bytes) as LogByteStream)
        })
    }
}

/// Boxed future type returned by [`ClientFactory::connect`].
pub type ConnectClientFuture<'a> =
    Pin<Box<dyn Future<Output = Result<Arc<dyn EngineClient>, EngineError>> + Send + 'a>>;

/// Factory seam for building engine clients from endpoints.
///
/// The connection manager and provider validator construct clients through
/// this trait so tests can count constructions and substitute stubs.
pub trait ClientFactory: Send + Sync {
    /// Build a client bound to the given endpoint.
    ///
    /// Construction itself is lazy with respect to the daemon: the first
    /// engine call decides whether the endpoint is actually reachable.
    fn connect(&self, endpoint: &Endpoint) -> ConnectClientFuture<'_>;
}

/// [`ClientFactory`] producing [`BollardClient`] handles.
#[derive(Debug, Clone, Copy, Default)]
pub struct BollardFactory;

impl ClientFactory for BollardFactory {
    fn connect(&self, endpoint: &Endpoint) -> ConnectClientFuture<'_> {
        let endpoint = endpoint.clone();
        Box::pin(async move {
            let docker = EngineConnector::connect(endpoint.as_str())?;
            Ok(Arc::new(BollardClient::new(docker)) as Arc<dyn EngineClient>)
        })
    }
}
