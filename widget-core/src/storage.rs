//! The storage contract for named widgets.
//!
//! The engine does no I/O itself. Hosts implement [`WidgetStorage`] over
//! whatever medium they have; [`MemoryStorage`] is an in-process
//! implementation for tests and embedding.

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use crate::schema::WidgetDocument;

/// Errors raised by storage implementations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// No widget is stored under this name.
    #[error("Widget not found: {0}")]
    NotFound(String),
    /// The name cannot be used as a storage key.
    #[error("Invalid widget name: {0:?}")]
    InvalidName(String),
    /// An I/O error occurred.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// The stored bytes are not a valid widget document.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Persists widgets by name.
pub trait WidgetStorage {
    /// Store a widget, replacing any previous one with the same name.
    ///
    /// # Errors
    ///
    /// Returns an error if the widget cannot be written.
    fn save(&self, name: &str, widget: &WidgetDocument) -> Result<(), StorageError>;

    /// Read a widget back.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::NotFound`] if nothing is stored under `name`.
    fn load(&self, name: &str) -> Result<WidgetDocument, StorageError>;

    /// Names of every stored widget, sorted.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing medium cannot be enumerated.
    fn list(&self) -> Result<Vec<String>, StorageError>;

    /// Remove a widget.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::NotFound`] if nothing is stored under `name`.
    fn delete(&self, name: &str) -> Result<(), StorageError>;
}

/// Validate a widget name: non-empty, no surrounding whitespace.
///
/// # Errors
///
/// Returns [`StorageError::InvalidName`] otherwise.
pub fn check_name(name: &str) -> Result<(), StorageError> {
    if name.is_empty() || name.trim() != name {
        return Err(StorageError::InvalidName(name.to_string()));
    }
    Ok(())
}

/// Thread-safe in-memory storage holding serialized widgets.
///
/// Widgets are kept as JSON text so every load goes through the same
/// deserialization path a file-backed store would.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    widgets: Arc<RwLock<BTreeMap<String, String>>>,
}

impl MemoryStorage {
    /// Create an empty storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl WidgetStorage for MemoryStorage {
    fn save(&self, name: &str, widget: &WidgetDocument) -> Result<(), StorageError> {
        check_name(name)?;
        let json = serde_json::to_string_pretty(widget)?;
        self.widgets
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .insert(name.to_string(), json);
        tracing::debug!("Saved widget {name}");
        Ok(())
    }

    fn load(&self, name: &str) -> Result<WidgetDocument, StorageError> {
        let widgets = self
            .widgets
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let json = widgets
            .get(name)
            .ok_or_else(|| StorageError::NotFound(name.to_string()))?;
        Ok(serde_json::from_str(json)?)
    }

    fn list(&self) -> Result<Vec<String>, StorageError> {
        Ok(self
            .widgets
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .keys()
            .cloned()
            .collect())
    }

    fn delete(&self, name: &str) -> Result<(), StorageError> {
        self.widgets
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| StorageError::NotFound(name.to_string()))
    }
}
