use alloc::string::String;

use thiserror::Error;

use crate::class::ClassId;

// -----------------------------------------------------------------------------
// Error

/// Errors raised while describing classes.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SchemaError {
    #[error("class `{0}` is already registered")]
    DuplicateClass(String),

    #[error("class id {0} is not registered")]
    UnknownClass(ClassId),

    #[error("class `{class}` cannot extend `{parent}`: only object classes can be extended")]
    InvalidParent { class: String, parent: String },

    #[error("class `{class}` declares field `{field}` twice")]
    DuplicateField { class: String, field: String },
}
