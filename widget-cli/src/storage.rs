//! JSON-file widget storage.
//!
//! One pretty-printed [`WidgetDocument`] per file, `<name>.json`, inside a
//! data directory. Names are used verbatim as file stems, so only
//! alphanumerics, `-` and `_` are accepted; anything else is
//! [`StorageError::InvalidName`] rather than a lossy rewrite.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use widget_core::storage::check_name;
use widget_core::{StorageError, WidgetDocument, WidgetStorage};

/// Stores widgets as JSON files in a directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    data_dir: PathBuf,
}

impl FileStorage {
    /// Open a storage rooted at `data_dir`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Io`] if the directory cannot be created.
    pub fn open(data_dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let data_dir = data_dir.into();
        std::fs::create_dir_all(&data_dir)?;
        tracing::debug!("Widget storage at {}", data_dir.display());
        Ok(Self { data_dir })
    }

    /// The data directory.
    #[must_use]
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Path of the file backing `name`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::InvalidName`] if `name` is not a safe file stem.
    pub fn path_for(&self, name: &str) -> Result<PathBuf, StorageError> {
        check_name(name)?;
        if !is_safe_file_stem(name) {
            return Err(StorageError::InvalidName(name.to_string()));
        }
        Ok(self.data_dir.join(format!("{name}.json")))
    }

    /// Whether a widget is stored under `name`.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.path_for(name).is_ok_and(|path| path.is_file())
    }
}

impl WidgetStorage for FileStorage {
    fn save(&self, name: &str, widget: &WidgetDocument) -> Result<(), StorageError> {
        let path = self.path_for(name)?;
        let json = serde_json::to_string_pretty(widget)?;
        // Write a sibling file, then rename it over the target.
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, &path)?;
        tracing::debug!("Saved widget {name} to {}", path.display());
        Ok(())
    }

    fn load(&self, name: &str) -> Result<WidgetDocument, StorageError> {
        let path = self.path_for(name)?;
        let contents = std::fs::read_to_string(&path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => StorageError::NotFound(name.to_string()),
            _ => StorageError::Io(e),
        })?;
        Ok(serde_json::from_str(&contents)?)
    }

    fn list(&self) -> Result<Vec<String>, StorageError> {
        let mut names = Vec::new();
        for entry in std::fs::read_dir(&self.data_dir)? {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                if let Some(stem) = path
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .filter(|s| is_safe_file_stem(s))
                {
                    names.push(stem.to_string());
                }
            }
        }
        names.sort();
        Ok(names)
    }

    fn delete(&self, name: &str) -> Result<(), StorageError> {
        let path = self.path_for(name)?;
        std::fs::remove_file(&path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => StorageError::NotFound(name.to_string()),
            _ => StorageError::Io(e),
        })
    }
}

/// Only alphanumerics, `-` and `_`.
fn is_safe_file_stem(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
}
