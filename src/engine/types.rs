//! Engine-facing record types shared by the client and CLI fallback paths.
//!
//! Field names serialise in the engine API's wire casing so the browser
//! sees the same JSON shape regardless of which path produced a record.

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// A container lifecycle action accepted by the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerAction {
    /// Start a stopped container.
    Start,
    /// Stop a running container.
    Stop,
    /// Restart a container.
    Restart,
}

impl ContainerAction {
    /// Parse an action name, rejecting anything outside start/stop/restart.
    ///
    /// The gateway calls this before touching the engine so unsupported
    /// actions never cost an engine round-trip.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::InvalidAction` for any other value.
    pub fn parse(action: &str) -> Result<Self, EngineError> {
        match action {
            "start" => Ok(Self::Start),
            "stop" => Ok(Self::Stop),
            "restart" => Ok(Self::Restart),
            other => Err(EngineError::InvalidAction {
                action: other.to_owned(),
            }),
        }
    }

    /// The action's verb, as accepted by [`Self::parse`].
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Stop => "stop",
            Self::Restart => "restart",
        }
    }

    /// Past-tense form for user-facing success messages.
    #[must_use]
    pub const fn past_tense(self) -> &'static str {
        match self {
            Self::Start => "started",
            Self::Stop => "stopped",
            Self::Restart => "restarted",
        }
    }
}

impl std::fmt::Display for ContainerAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A published or exposed container port.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortBinding {
    /// Host address the port is bound to, when published.
    #[serde(rename = "IP", skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,

    /// Port inside the container.
    #[serde(rename = "PrivatePort")]
    pub private_port: i64,

    /// Host port, when published.
    #[serde(rename = "PublicPort", skip_serializing_if = "Option::is_none")]
    pub public_port: Option<i64>,

    /// Transport protocol (`tcp`, `udp`, `sctp`).
    #[serde(rename = "Type")]
    pub protocol: String,
}

/// A container as reported by the engine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Container {
    /// Engine-assigned container ID.
    pub id: String,

    /// Container names, as reported by the engine (leading slashes kept).
    pub names: Vec<String>,

    /// Image reference the container was created from.
    pub image: String,

    /// Coarse lifecycle state (`running`, `exited`, ...).
    pub state: String,

    /// Human-readable status line (`Up 2 hours`, ...).
    pub status: String,

    /// Published and exposed ports.
    pub ports: Vec<PortBinding>,
}

/// An image as reported by the engine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Image {
    /// Engine-assigned image ID.
    pub id: String,

    /// Repository tags (`repo:tag`), possibly empty for dangling images.
    pub repo_tags: Vec<String>,

    /// Image size in bytes. Approximate when served by the CLI fallback.
    pub size: i64,

    /// Creation time as a Unix timestamp; unknown on the CLI fallback path.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created: Option<i64>,
}

/// Summary counters and version reported by the engine's info query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineInfo {
    /// Engine server version string.
    pub server_version: Option<String>,

    /// Total number of containers.
    pub containers: Option<i64>,

    /// Number of running containers.
    pub containers_running: Option<i64>,

    /// Number of paused containers.
    pub containers_paused: Option<i64>,

    /// Number of stopped containers.
    pub containers_stopped: Option<i64>,

    /// Total number of images.
    pub images: Option<i64>,
}

impl From<bollard::models::ContainerSummary> for Container {
    fn from(summary: bollard::models::ContainerSummary) -> Self {
        Self {
            id: summary.id.unwrap_or_default(),
            names: summary.names.unwrap_or_default(),
            image: summary.image.unwrap_or_default(),
            state: summary.state.map(|s| s.to_string()).unwrap_or_default(),
            status: summary.status.unwrap_or_default(),
            ports: summary
                .ports
                .unwrap_or_default()
                .into_iter()
                .map(PortBinding::from)
                .collect(),
        }
    }
}

impl From<bollard::models::PortSummary> for PortBinding {
    fn from(port: bollard::models::PortSummary) -> Self {
        Self {
            ip: port.ip,
            private_port: i64::from(port.private_port),
            public_port: port.public_port.map(i64::from),
            protocol: port.typ.map(|t| t.to_string()).unwrap_or_default(),
        }
    }
}

impl From<bollard::models::ImageSummary> for Image {
    fn from(summary: bollard::models::ImageSummary) -> Self {
        Self {
            id: summary.id,
            repo_tags: summary.repo_tags,
            size: summary.size,
            created: Some(summary.created),
        }
    }
}

impl From<bollard::models::SystemInfo> for EngineInfo {
    fn from(info: bollard::models::SystemInfo) -> Self {
        Self {
            server_version: info.server_version,
            containers: info.containers,
            containers_running: info.containers_running,
            containers_paused: info.containers_paused,
            containers_stopped: info.containers_stopped,
            images: info.images,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("start", ContainerAction::Start)]
    #[case("stop", ContainerAction::Stop)]
    #[case("restart", ContainerAction::Restart)]
    fn parse_accepts_supported_actions(#[case] name: &str, #[case] expected: ContainerAction) {
        assert!(matches!(ContainerAction::parse(name), Ok(action) if action == expected));
    }

    #[rstest]
    #[case("delete")]
    #[case("pause")]
    #[case("Start")]
    #[case("")]
    fn parse_rejects_unsupported_actions(#[case] name: &str) {
        let error = ContainerAction::parse(name).expect_err("action must be rejected");
        assert!(matches!(error, EngineError::InvalidAction { action } if action == name));
    }

    #[rstest]
    fn container_serialises_in_engine_casing() {
        let container = Container {
            id: String::from("abc123"),
            names: vec![String::from("/web")],
            image: String::from("nginx:latest"),
            state: String::from("running"),
            status: String::from("Up 2 hours"),
            ports: vec![PortBinding {
                ip: Some(String::from("0.0.0.0")),
                private_port: 80,
                public_port: Some(8080),
                protocol: String::from("tcp"),
            }],
        };
        let json = serde_json::to_value(&container).expect("container serialises");
        assert_eq!(json["Id"], "abc123");
        assert_eq!(json["Names"][0], "/web");
        assert_eq!(json["State"], "running");
        assert_eq!(json["Ports"][0]["IP"], "0.0.0.0");
        assert_eq!(json["Ports"][0]["PrivatePort"], 80);
        assert_eq!(json["Ports"][0]["Type"], "tcp");
    }

    #[rstest]
    fn image_omits_unknown_creation_time() {
        let image = Image {
            id: String::from("sha256:feed"),
            repo_tags: vec![String::from("redis:7")],
            size: 117_000_000,
            created: None,
        };
        let json = serde_json::to_value(&image).expect("image serialises");
        assert_eq!(json["Id"], "sha256:feed");
        assert!(json.get("Created").is_none());
    }
}
