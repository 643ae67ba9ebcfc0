//! # Widget Core
//!
//! Document engine for composing small fixed-size widgets from typed
//! elements. Compiles to WASM for use inside a browser editor.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │                DocumentStore                │
//! │   dispatch(Action) -> Change, subscribers   │
//! ├──────────────────────┬──────────────────────┤
//! │  History             │  Document            │
//! │  - snapshots         │  - elements          │
//! │  - undo / redo       │  - paint order       │
//! │                      │  - selection         │
//! ├──────────────────────┴──────────────────────┤
//! │  Edits │ Layering │ Grouping │ Selection    │
//! ├─────────────────────────────────────────────┤
//! │  Boundaries: bindings, scripts, storage     │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! Every mutation goes through [`DocumentStore::dispatch`]. Actions that
//! reference unknown or locked elements do nothing instead of failing.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod action;
pub mod binding;
pub mod config;
pub mod document;
pub mod edit;
pub mod element;
pub mod error;
pub mod grouping;
pub mod history;
pub mod layering;
pub mod patch;
pub mod payload;
pub mod schema;
pub mod script;
pub mod selection;
pub mod storage;
pub mod store;
pub mod style;
pub mod template;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use action::Action;
pub use binding::{BindingToken, DataProvider};
pub use config::EditorConfig;
pub use document::{CanvasSize, Document};
pub use edit::scaled_font_size;
pub use element::{Element, ElementDraft, ElementId, ElementKind, ElementType, Transform};
pub use error::{CanvasError, CanvasResult, IntegrityError};
pub use grouping::bounding_box;
pub use history::{History, Snapshot};
pub use layering::Direction;
pub use patch::{ContentPatch, ElementPatch, StylePatch, TextStylePatch, TransformPatch};
pub use payload::{
    ClockConfig, CurvedTextConfig, GradientConfig, GradientKind, GradientStop, ImageFilterConfig,
    PathData, PathPoint, TextAlign, TextStyle,
};
pub use schema::{WidgetDocument, WIDGET_FORMAT_VERSION};
pub use script::{RefreshKind, RefreshTarget, ScriptError, ScriptOutput, ScriptRuntime};
pub use storage::{MemoryStorage, StorageError, WidgetStorage};
pub use store::{Change, DocumentStore, SharedDocumentStore, SubscriptionId};
pub use style::{CornerFamily, Shadow, Stroke, Style};
pub use template::Template;

/// Widget core version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
