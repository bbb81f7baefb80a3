//! Container engine access.
//!
//! This module owns everything between the REST surface and the engine's
//! native protocol: the narrow client capability trait and its bollard
//! adapter, connection establishment and error classification, the single
//! shared connection handle, the persisted provider preference, and the
//! last-resort CLI listing fallback.

mod client;
mod connect;
mod fallback;
mod manager;
mod settings;
mod types;

pub use client::{
    BollardClient, BollardFactory, ClientFactory, ConnectClientFuture, ContainersFuture,
    EngineClient, ImagesFuture, InfoFuture, LogByteStream, LogsFuture, UnitFuture,
};
pub use connect::EngineConnector;
pub use fallback::CliFallback;
pub use manager::ConnectionManager;
pub use settings::{FileProviderStore, MemoryProviderStore, ProviderStore};
pub use types::{Container, ContainerAction, EngineInfo, Image, PortBinding};
