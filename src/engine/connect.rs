//! Container engine connection establishment.
//!
//! Endpoints arrive from provider resolution as bare socket paths or
//! scheme-prefixed URIs; this module normalises the shape, connects with
//! bollard, and classifies connection failures into semantic errors.

use std::path::Path;

use bollard::Docker;

use crate::error::EngineError;

/// Connection timeout in seconds for engine API connections.
const CONNECTION_TIMEOUT_SECS: u64 = 120;

/// Classifies socket endpoint shapes for connection handling.
enum SocketType {
    /// Unix socket with explicit scheme.
    Socket,
    /// HTTP, HTTPS, or TCP endpoint (TCP is rewritten to HTTP).
    Http,
    /// Bare path without scheme prefix.
    BarePath,
}

impl SocketType {
    fn classify(socket: &str) -> Self {
        if socket.starts_with("unix://") {
            Self::Socket
        } else if socket.starts_with("tcp://")
            || socket.starts_with("http://")
            || socket.starts_with("https://")
        {
            Self::Http
        } else {
            Self::BarePath
        }
    }
}

/// Provides methods to connect to a container engine.
pub struct EngineConnector;

impl EngineConnector {
    /// Connect to the container engine at the specified endpoint.
    ///
    /// Supports Unix sockets (`unix:///path/to/socket`), TCP/HTTP endpoints
    /// (`tcp://host:port`, `http://host:port`), and bare paths, which are
    /// treated as Unix sockets.
    ///
    /// # Errors
    ///
    /// Returns a classified [`EngineError`] (`SocketNotFound`,
    /// `PermissionDenied`, or `ConnectionFailed`) if the connection cannot
    /// be established.
    pub fn connect(socket: &str) -> Result<Docker, EngineError> {
        match SocketType::classify(socket) {
            SocketType::Socket => Docker::connect_with_socket(
                socket,
                CONNECTION_TIMEOUT_SECS,
                bollard::API_DEFAULT_VERSION,
            ),
            SocketType::Http => {
                // Rewrite tcp:// to http:// for bollard compatibility.
                let http_socket = if socket.starts_with("tcp://") {
                    socket.replacen("tcp://", "http://", 1)
                } else {
                    socket.to_owned()
                };
                Docker::connect_with_http(
                    &http_socket,
                    CONNECTION_TIMEOUT_SECS,
                    bollard::API_DEFAULT_VERSION,
                )
            }
            SocketType::BarePath => {
                let socket_uri = format!("unix://{socket}");
                Docker::connect_with_socket(
                    &socket_uri,
                    CONNECTION_TIMEOUT_SECS,
                    bollard::API_DEFAULT_VERSION,
                )
            }
        }
        .map_err(|e| classify_connection_error(&e, socket))
    }
}

/// Extract the filesystem path from a socket endpoint.
///
/// Accepts both `unix://`-prefixed URIs and bare paths; HTTP endpoints have
/// no filesystem path and return `None`.
fn socket_file_path(socket: &str) -> Option<&Path> {
    if let Some(path) = socket.strip_prefix("unix://") {
        return Some(Path::new(path));
    }
    if socket.contains("://") {
        return None;
    }
    Some(Path::new(socket))
}

/// Classify a bollard connection error into a semantic [`EngineError`].
///
/// Walks the error source chain looking for an `io::Error` so permission
/// and missing-socket failures carry the socket path; everything else maps
/// to `ConnectionFailed`.
fn classify_connection_error(bollard_error: &bollard::errors::Error, socket: &str) -> EngineError {
    let socket_path = socket_file_path(socket);
    let error_msg = bollard_error.to_string();

    if let bollard::errors::Error::SocketNotFoundError(_) = bollard_error {
        if let Some(path) = socket_path {
            return EngineError::SocketNotFound {
                path: path.to_path_buf(),
            };
        }
    }

    if let Some(kind) = io_error_kind_in_chain(bollard_error) {
        return classify_io_error_kind(kind, socket_path, &error_msg);
    }

    EngineError::ConnectionFailed { message: error_msg }
}

/// Classify an I/O error kind into a semantic [`EngineError`].
fn classify_io_error_kind(
    kind: std::io::ErrorKind,
    socket_path: Option<&Path>,
    error_msg: &str,
) -> EngineError {
    match (kind, socket_path) {
        (std::io::ErrorKind::PermissionDenied, Some(path)) => EngineError::PermissionDenied {
            path: path.to_path_buf(),
        },
        (std::io::ErrorKind::NotFound, Some(path)) => EngineError::SocketNotFound {
            path: path.to_path_buf(),
        },
        _ => EngineError::ConnectionFailed {
            message: error_msg.to_owned(),
        },
    }
}

/// Walk the error source chain looking for an `io::Error` kind.
fn io_error_kind_in_chain(error: &dyn std::error::Error) -> Option<std::io::ErrorKind> {
    let mut current: Option<&(dyn std::error::Error + 'static)> = error.source();
    while let Some(err) = current {
        if let Some(io_err) = err.downcast_ref::<std::io::Error>() {
            return Some(io_err.kind());
        }
        current = err.source();
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("unix:///var/run/docker.sock", Some("/var/run/docker.sock"))]
    #[case("/var/run/docker.sock", Some("/var/run/docker.sock"))]
    #[case("http://localhost:2375", None)]
    #[case("tcp://localhost:2375", None)]
    fn socket_file_path_extracts_unix_paths(
        #[case] socket: &str,
        #[case] expected: Option<&str>,
    ) {
        assert_eq!(socket_file_path(socket), expected.map(Path::new));
    }

    #[rstest]
    fn permission_denied_is_classified_with_path() {
        let error = classify_io_error_kind(
            std::io::ErrorKind::PermissionDenied,
            Some(Path::new("/var/run/docker.sock")),
            "denied",
        );
        assert!(matches!(
            error,
            EngineError::PermissionDenied { path } if path == Path::new("/var/run/docker.sock")
        ));
    }

    #[rstest]
    fn unknown_io_kind_falls_back_to_connection_failed() {
        let error = classify_io_error_kind(
            std::io::ErrorKind::ConnectionRefused,
            Some(Path::new("/var/run/docker.sock")),
            "refused",
        );
        assert!(matches!(
            error,
            EngineError::ConnectionFailed { message } if message == "refused"
        ));
    }

    #[rstest]
    fn io_error_kind_is_found_through_the_chain() {
        #[derive(Debug)]
        struct Wrapper {
            source: std::io::Error,
        }

        impl std::fmt::Display for Wrapper {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "wrapper")
            }
        }

        impl std::error::Error for Wrapper {
            fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
                Some(&self.source)
            }
        }

        let wrapped = Wrapper {
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        };
        assert_eq!(
            io_error_kind_in_chain(&wrapped),
            Some(std::io::ErrorKind::NotFound)
        );
    }
}
