//! Error types for document operations.
//!
//! Dispatching an action never fails; these errors surface only at the
//! boundaries where untrusted data enters the engine (strict document
//! loading, configuration parsing, storage collaborators).

use thiserror::Error;

use crate::ElementId;

/// Result type for canvas operations.
pub type CanvasResult<T> = Result<T, CanvasError>;

/// Errors that can occur at the document boundary.
#[derive(Debug, Error)]
pub enum CanvasError {
    /// Document serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The document violates a structural invariant.
    #[error("Integrity violation: {0}")]
    Integrity(#[from] IntegrityError),

    /// The persisted document was written by an unknown format version.
    #[error("Unsupported widget format version: {0}")]
    UnsupportedVersion(u32),

    /// Configuration value out of range.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// No built-in template has this name.
    #[error("Unknown template: {0}")]
    UnknownTemplate(String),
}

/// A broken structural invariant found while validating a document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IntegrityError {
    /// An element is stored under a key different from its own id.
    #[error("Element {id} stored under key {key}")]
    IdMismatch {
        /// Map key the element was found under.
        key: ElementId,
        /// Id recorded on the element itself.
        id: ElementId,
    },

    /// The paint order names an id with no element.
    #[error("Paint order references missing element {0}")]
    OrderWithoutElement(ElementId),

    /// The same id appears twice in the paint order.
    #[error("Element {0} appears more than once in paint order")]
    DuplicateInOrder(ElementId),

    /// A top-level element is missing from the paint order.
    #[error("Element {0} is neither in paint order nor owned by a group")]
    Unplaced(ElementId),

    /// A group lists a child that does not exist.
    #[error("Group {group} references missing child {child}")]
    MissingChild {
        /// Owning group.
        group: ElementId,
        /// Missing child id.
        child: ElementId,
    },

    /// A group child is also listed in the top-level paint order.
    #[error("Group child {0} is also listed at top level")]
    ChildAtTopLevel(ElementId),

    /// A group contains another group (or itself).
    #[error("Group {group} contains group {child}")]
    NestedGroup {
        /// Outer group.
        group: ElementId,
        /// Nested group id.
        child: ElementId,
    },

    /// A child is owned by more than one group.
    #[error("Element {0} is owned by more than one group")]
    SharedChild(ElementId),

    /// A group child carries its own lock flag.
    #[error("Group child {0} is locked")]
    LockedChild(ElementId),

    /// The selection names an id that is not a top-level element.
    #[error("Selection references non top-level element {0}")]
    DanglingSelection(ElementId),

    /// An element has a non-positive or non-finite size.
    #[error("Element {0} has a degenerate size")]
    DegenerateSize(ElementId),

    /// An element's position, rotation or scale is not a finite number.
    #[error("Element {0} has a non-finite transform")]
    NonFiniteTransform(ElementId),
}
