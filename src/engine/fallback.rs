//! Last-resort CLI listing adapter.
//!
//! When the client-library listing path fails, the gateway can still answer
//! list queries by parsing `docker ps` / `docker images` delimiter output,
//! provided the CLI is actually present (capability probe). The parsed
//! output is shaped into the same [`Container`]/[`Image`] records as the
//! primary path so callers never observe which path served the data.

use std::sync::Arc;

use super::types::{Container, Image};
use crate::error::EngineError;
use crate::provider::CommandRunner;

/// `docker ps` output template matching [`parse_container_line`].
const PS_FORMAT: &str = "{{.ID}}|{{.Names}}|{{.State}}|{{.Status}}|{{.Image}}";

/// `docker images` output template matching [`parse_image_line`].
const IMAGES_FORMAT: &str = "{{.Repository}}|{{.Tag}}|{{.ID}}|{{.Size}}";

/// Best-effort listing via the `docker` CLI.
pub struct CliFallback {
    runner: Arc<dyn CommandRunner>,
}

impl CliFallback {
    /// Create a fallback adapter using the given command seam.
    #[must_use]
    pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
        Self { runner }
    }

    /// Capability probe: is a `docker` CLI available at all?
    ///
    /// The fallback is only attempted when this returns true, so a host
    /// without the CLI sees the original engine error rather than a
    /// confusing command-not-found.
    pub async fn available(&self) -> bool {
        self.runner.run("docker", &["--version"]).await.is_ok()
    }

    /// List running containers by parsing `docker ps` output.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::ListFailed` when the CLI invocation fails.
    pub async fn list_containers(&self) -> Result<Vec<Container>, EngineError> {
        let stdout = self
            .runner
            .run("docker", &["ps", "--format", PS_FORMAT])
            .await
            .map_err(|e| EngineError::ListFailed {
                subject: String::from("containers"),
                message: e.to_string(),
            })?;
        Ok(stdout.lines().filter_map(parse_container_line).collect())
    }

    /// List images by parsing `docker images` output.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::ListFailed` when the CLI invocation fails.
    pub async fn list_images(&self) -> Result<Vec<Image>, EngineError> {
        let stdout = self
            .runner
            .run("docker", &["images", "--format", IMAGES_FORMAT])
            .await
            .map_err(|e| EngineError::ListFailed {
                subject: String::from("images"),
                message: e.to_string(),
            })?;
        Ok(stdout.lines().filter_map(parse_image_line).collect())
    }
}

/// Parse one `docker ps` line in [`PS_FORMAT`]. Malformed lines are skipped.
fn parse_container_line(line: &str) -> Option<Container> {
    let mut fields = line.trim().split('|');
    let id = fields.next()?.trim();
    let names = fields.next()?.trim();
    let state = fields.next()?.trim();
    let status = fields.next()?.trim();
    let image = fields.next()?.trim();
    if id.is_empty() {
        return None;
    }
    Some(Container {
        id: id.to_owned(),
        names: names.split(',').map(str::to_owned).collect(),
        image: image.to_owned(),
        state: state.to_owned(),
        status: status.to_owned(),
        ports: Vec::new(),
    })
}

/// Parse one `docker images` line in [`IMAGES_FORMAT`].
///
/// The CLI reports humanised sizes and relative dates; sizes are parsed to
/// approximate bytes and the creation time is left unset rather than
/// fabricated.
fn parse_image_line(line: &str) -> Option<Image> {
    let mut fields = line.trim().split('|');
    let repository = fields.next()?.trim();
    let tag = fields.next()?.trim();
    let id = fields.next()?.trim();
    let size = fields.next()?.trim();
    if id.is_empty() {
        return None;
    }
    let repo_tags = if repository == "<none>" {
        Vec::new()
    } else {
        vec![format!("{repository}:{tag}")]
    };
    Some(Image {
        id: id.to_owned(),
        repo_tags,
        size: parse_human_size(size).unwrap_or(0),
        created: None,
    })
}

/// Parse a humanised size string (`117MB`, `5.51kB`, `1.2GB`) into bytes.
///
/// Uses the decimal multipliers the docker CLI prints with. Returns `None`
/// for unparseable input.
fn parse_human_size(size: &str) -> Option<i64> {
    let size = size.trim();
    let unit_start = size.find(|c: char| c.is_ascii_alphabetic()).unwrap_or(size.len());
    let (number, unit) = size.split_at(unit_start);
    let value: f64 = number.trim().parse().ok()?;
    let multiplier = match unit.trim().to_ascii_lowercase().as_str() {
        "" | "b" => 1.0,
        "kb" => 1e3,
        "mb" => 1e6,
        "gb" => 1e9,
        "tb" => 1e12,
        _ => return None,
    };
    let bytes = value * multiplier;
    if bytes.is_finite() && bytes >= 0.0 {
        #[expect(
            clippy::cast_possible_truncation,
            reason = "sizes from the docker CLI are far below i64::MAX"
        )]
        let bytes = bytes as i64;
        Some(bytes)
    } else {
        None
    }
}
