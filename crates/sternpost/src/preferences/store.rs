//! Key/value preference storage

use std::collections::BTreeMap;

use crate::core::DiagramError;

/// Key holding the explicit theme choice ("light" or "dark")
pub const THEME_KEY: &str = "theme";

/// Key holding the navigation collapsed flag ("true" or "false")
pub const NAV_COLLAPSED_KEY: &str = "navCollapsed";

/// String key/value store that survives page loads
pub trait PreferenceStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), DiagramError>;
    fn remove(&mut self, key: &str) -> Result<(), DiagramError>;
}

/// In-memory store
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryStore {
    values: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, value: &str) -> Self {
        self.values.insert(key.to_string(), value.to_string());
        self
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl PreferenceStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), DiagramError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), DiagramError> {
        self.values.remove(key);
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub use file::FileStore;

#[cfg(not(target_arch = "wasm32"))]
mod file {
    use std::collections::BTreeMap;
    use std::fs;
    use std::io::Write;
    use std::path::{Path, PathBuf};

    use tracing::debug;

    use super::PreferenceStore;
    use crate::core::DiagramError;

    /// Store persisted as a flat JSON object
    ///
    /// Every write replaces the file atomically through a temporary file in
    /// the same directory.
    #[derive(Debug, Clone)]
    pub struct FileStore {
        path: PathBuf,
        values: BTreeMap<String, String>,
    }

    impl FileStore {
        /// Open `path`, starting empty when the file does not exist yet
        pub fn open(path: impl Into<PathBuf>) -> Result<Self, DiagramError> {
            let path = path.into();
            let values = if path.exists() {
                let raw = fs::read_to_string(&path)?;
                if raw.trim().is_empty() {
                    BTreeMap::new()
                } else {
                    serde_json::from_str(&raw).map_err(|e| {
                        DiagramError::preference_error(format!(
                            "{} is not a preference file: {}",
                            path.display(),
                            e
                        ))
                    })?
                }
            } else {
                BTreeMap::new()
            };
            debug!(path = %path.display(), entries = values.len(), "Opened preference file");
            Ok(Self { path, values })
        }

        pub fn path(&self) -> &Path {
            &self.path
        }

        pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
            self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
        }

        fn save(&self) -> Result<(), DiagramError> {
            let dir = match self.path.parent() {
                Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
                _ => PathBuf::from("."),
            };
            fs::create_dir_all(&dir)?;
            let mut file = tempfile::NamedTempFile::new_in(&dir)?;
            file.write_all(serde_json::to_string_pretty(&self.values)?.as_bytes())?;
            file.write_all(b"\n")?;
            file.persist(&self.path).map_err(|e| e.error)?;
            Ok(())
        }
    }

    impl PreferenceStore for FileStore {
        fn get(&self, key: &str) -> Option<String> {
            self.values.get(key).cloned()
        }

        fn set(&mut self, key: &str, value: &str) -> Result<(), DiagramError> {
            self.values.insert(key.to_string(), value.to_string());
            self.save()
        }

        fn remove(&mut self, key: &str) -> Result<(), DiagramError> {
            if self.values.remove(key).is_some() {
                self.save()?;
            }
            Ok(())
        }
    }
}
