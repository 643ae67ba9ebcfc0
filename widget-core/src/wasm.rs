//! WebAssembly bindings for widget-core.
//!
//! Exposes a [`DocumentStore`] to JavaScript. Actions and documents cross the
//! boundary as JSON strings.

use wasm_bindgen::prelude::*;

use crate::{Action, DocumentStore, EditorConfig, Template, WidgetDocument};

/// Initialize the WASM module.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// Widget editor store for WASM.
#[wasm_bindgen]
pub struct WasmWidgetStore {
    store: DocumentStore,
    on_change: Option<js_sys::Function>,
}

#[wasm_bindgen]
impl WasmWidgetStore {
    /// Create a store with an empty default canvas.
    #[wasm_bindgen(constructor)]
    #[must_use]
    pub fn new() -> Self {
        Self {
            store: DocumentStore::new(EditorConfig::default()),
            on_change: None,
        }
    }

    /// Create a store from a named template such as `digital-clock`.
    ///
    /// # Errors
    ///
    /// Returns an error string for unknown template names.
    #[wasm_bindgen(js_name = fromTemplate)]
    pub fn from_template(name: &str) -> Result<WasmWidgetStore, String> {
        let template: Template = name.parse().map_err(|e: crate::CanvasError| e.to_string())?;
        Ok(Self {
            store: DocumentStore::from_template(template, EditorConfig::default()),
            on_change: None,
        })
    }

    /// Dispatch one action given as JSON. Returns whether a history entry was
    /// recorded.
    ///
    /// # Errors
    ///
    /// Returns an error string if the action JSON is malformed.
    pub fn dispatch(&mut self, action_json: &str) -> Result<bool, String> {
        let action: Action = serde_json::from_str(action_json).map_err(|e| e.to_string())?;
        let change = self.store.dispatch(action);
        if let Some(callback) = &self.on_change {
            let payload = JsValue::from_str(change.action);
            if let Err(e) = callback.call1(&JsValue::NULL, &payload) {
                tracing::warn!("Change callback failed: {e:?}");
            }
        }
        Ok(change.recorded)
    }

    /// Register a JavaScript callback called with the action name after each
    /// dispatch. Replaces any previous callback.
    #[wasm_bindgen(js_name = onChange)]
    pub fn on_change(&mut self, callback: js_sys::Function) {
        self.on_change = Some(callback);
    }

    /// Remove the change callback.
    #[wasm_bindgen(js_name = clearOnChange)]
    pub fn clear_on_change(&mut self) {
        self.on_change = None;
    }

    /// The persisted form of the current document as JSON.
    ///
    /// # Errors
    ///
    /// Returns an error string if serialization fails.
    #[wasm_bindgen(js_name = getDocumentJson)]
    pub fn get_document_json(&self) -> Result<String, String> {
        self.store.to_widget().to_json().map_err(|e| e.to_string())
    }

    /// Currently selected ids as a JSON array.
    ///
    /// # Errors
    ///
    /// Returns an error string if serialization fails.
    #[wasm_bindgen(js_name = getSelectionJson)]
    pub fn get_selection_json(&self) -> Result<String, String> {
        serde_json::to_string(self.store.document().selected_ids()).map_err(|e| e.to_string())
    }

    /// Replace the document with a persisted widget, repairing it if needed.
    ///
    /// # Errors
    ///
    /// Returns an error string if the JSON is not a widget document.
    #[wasm_bindgen(js_name = loadDocumentJson)]
    pub fn load_document_json(&mut self, json: &str) -> Result<(), String> {
        let widget = WidgetDocument::from_json(json).map_err(|e| e.to_string())?;
        self.store.load(widget);
        Ok(())
    }

    /// Check if undo is available.
    #[wasm_bindgen(js_name = canUndo)]
    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.store.can_undo()
    }

    /// Check if redo is available.
    #[wasm_bindgen(js_name = canRedo)]
    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.store.can_redo()
    }
}

impl Default for WasmWidgetStore {
    fn default() -> Self {
        Self::new()
    }
}
