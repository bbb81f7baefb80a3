//! Persisted provider preference.
//!
//! The gateway stores exactly one piece of state: the name of the provider
//! the user last selected, written by the settings UI and read by the
//! connection manager before every handle acquisition. The value is
//! untrusted free text; interpretation (including the lenient default) is
//! the manager's concern.

use std::sync::Mutex;

use camino::Utf8PathBuf;
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;

use crate::error::ConfigError;

/// Access to the persisted provider preference.
pub trait ProviderStore: Send + Sync {
    /// Read the persisted preference, if any.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::StateAccess` when the backing store exists but
    /// cannot be read.
    fn current(&self) -> Result<Option<String>, ConfigError>;

    /// Replace the persisted preference.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::StateAccess` when the backing store cannot be
    /// written.
    fn set_current(&self, provider: &str) -> Result<(), ConfigError>;
}

/// File-backed provider store holding one trimmed line.
///
/// A missing file means "no preference"; the connection manager then uses
/// the default provider. Reads and writes go through `cap_std::fs_utf8`,
/// scoped to the file's parent directory.
#[derive(Debug, Clone)]
pub struct FileProviderStore {
    path: Utf8PathBuf,
}

impl FileProviderStore {
    /// Create a store backed by the given file path.
    #[must_use]
    pub const fn new(path: Utf8PathBuf) -> Self {
        Self { path }
    }

    /// Split the backing path into parent directory and file name.
    fn location(&self) -> (Utf8PathBuf, &str) {
        let parent = self
            .path
            .parent()
            .map_or_else(|| Utf8PathBuf::from("."), Utf8PathBuf::from);
        let file_name = self.path.file_name().unwrap_or(self.path.as_str());
        (parent, file_name)
    }

    fn access_error(&self, message: String) -> ConfigError {
        ConfigError::StateAccess {
            path: self.path.clone().into_std_path_buf(),
            message,
        }
    }
}

impl ProviderStore for FileProviderStore {
    fn current(&self) -> Result<Option<String>, ConfigError> {
        let (parent, file_name) = self.location();
        let dir = match Dir::open_ambient_dir(&parent, ambient_authority()) {
            Ok(dir) => dir,
            // No parent directory yet means no preference has been written.
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(self.access_error(e.to_string())),
        };
        match dir.read_to_string(file_name) {
            Ok(contents) => {
                let trimmed = contents.trim();
                if trimmed.is_empty() {
                    Ok(None)
                } else {
                    Ok(Some(trimmed.to_owned()))
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(self.access_error(e.to_string())),
        }
    }

    fn set_current(&self, provider: &str) -> Result<(), ConfigError> {
        let (parent, file_name) = self.location();
        std::fs::create_dir_all(&parent).map_err(|e| self.access_error(e.to_string()))?;
        let dir = Dir::open_ambient_dir(&parent, ambient_authority())
            .map_err(|e| self.access_error(e.to_string()))?;
        dir.write(file_name, format!("{}\n", provider.trim()))
            .map_err(|e| self.access_error(e.to_string()))
    }
}

/// In-memory provider store.
///
/// Useful when no state path is configured and in tests.
#[derive(Debug, Default)]
pub struct MemoryProviderStore {
    value: Mutex<Option<String>>,
}

impl MemoryProviderStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-seeded with a preference.
    #[must_use]
    pub fn with_provider(provider: &str) -> Self {
        Self {
            value: Mutex::new(Some(provider.to_owned())),
        }
    }
}

impl ProviderStore for MemoryProviderStore {
    fn current(&self) -> Result<Option<String>, ConfigError> {
        Ok(self
            .value
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone())
    }

    fn set_current(&self, provider: &str) -> Result<(), ConfigError> {
        *self
            .value
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner) = Some(provider.trim().to_owned());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn store_in(dir: &tempfile::TempDir) -> FileProviderStore {
        let path = Utf8PathBuf::from_path_buf(dir.path().join("provider"))
            .expect("temp path is valid UTF-8");
        FileProviderStore::new(path)
    }

    #[rstest]
    fn missing_file_means_no_preference() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let store = store_in(&dir);
        assert_eq!(store.current().expect("read succeeds"), None);
    }

    #[rstest]
    fn missing_parent_directory_means_no_preference() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = Utf8PathBuf::from_path_buf(dir.path().join("nested/deeper/provider"))
            .expect("temp path is valid UTF-8");
        let store = FileProviderStore::new(path);
        assert_eq!(store.current().expect("read succeeds"), None);
    }

    #[rstest]
    fn preference_round_trips_trimmed() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let store = store_in(&dir);
        store.set_current("  podman  ").expect("write succeeds");
        assert_eq!(
            store.current().expect("read succeeds"),
            Some(String::from("podman"))
        );
    }

    #[rstest]
    fn write_creates_missing_parent_directories() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = Utf8PathBuf::from_path_buf(dir.path().join("state/provider"))
            .expect("temp path is valid UTF-8");
        let store = FileProviderStore::new(path);
        store.set_current("colima").expect("write succeeds");
        assert_eq!(
            store.current().expect("read succeeds"),
            Some(String::from("colima"))
        );
    }

    #[rstest]
    fn blank_file_means_no_preference() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let store = store_in(&dir);
        store.set_current("   ").expect("write succeeds");
        assert_eq!(store.current().expect("read succeeds"), None);
    }

    #[rstest]
    fn memory_store_round_trips() {
        let store = MemoryProviderStore::new();
        assert_eq!(store.current().expect("read succeeds"), None);
        store.set_current("lima").expect("write succeeds");
        assert_eq!(
            store.current().expect("read succeeds"),
            Some(String::from("lima"))
        );
    }
}
