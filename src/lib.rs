//! Browser-facing HTTP gateway for a local container engine.
//!
//! `gangway` fronts a local container engine (Docker Desktop, Colima,
//! Podman, Lima) with a small REST surface: list, start, stop and restart
//! containers, list and remove images, report engine status, and tail live
//! container logs over Server-Sent Events.
//!
//! # Architecture
//!
//! The gateway keeps exactly one lazily constructed engine client handle,
//! keyed by the provider it was resolved from; the handle is rebuilt only
//! when the configured provider changes. Provider CLIs are consulted for
//! socket discovery but never trusted: any discovery failure degrades to
//! the conventional socket path, and the connection attempt itself is the
//! real health check.
//!
//! # Modules
//!
//! - [`api`]: axum router, request handlers, and the SSE log publisher
//! - [`config`]: configuration system with layered precedence (CLI > env > file > defaults)
//! - [`engine`]: engine client seam, connection manager, and CLI fallback
//! - [`error`]: semantic error types for the application
//! - [`logs`]: log stream demultiplexing
//! - [`provider`]: provider identity, endpoint resolution, and validation

pub mod api;
pub mod config;
pub mod engine;
pub mod error;
pub mod logs;
pub mod provider;
