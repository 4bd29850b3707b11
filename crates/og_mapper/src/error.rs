use alloc::string::String;

use og_doc::DocError;
use og_schema::ClassId;
use thiserror::Error;

use crate::converter::ConversionError;

// -----------------------------------------------------------------------------
// ConfigError

/// Errors raised while configuring a [`MapperBuilder`](crate::MapperBuilder).
///
/// A failing call leaves the earlier configuration untouched.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("field `{field}` of `{class}` declares no collection")]
    NotACollection { class: String, field: String },

    #[error("field `{field}` of `{class}` declares no map")]
    NotAMap { class: String, field: String },

    #[error("implicit map `{field}` of `{class}` needs a key field")]
    MissingKeyField { class: String, field: String },

    #[error("class {0} is not registered")]
    UnknownClass(ClassId),

    #[error("`{class}` has no field `{field}`")]
    InvalidSlot { class: String, field: String },

    #[error("`{class}` already maps item name `{item}` to field `{existing}`")]
    ConflictingDeclaration {
        class: String,
        item: String,
        existing: String,
    },

    #[error("`{concrete}` cannot be the default implementation of `{target}`")]
    InvalidDefaultImplementation { concrete: String, target: String },

    #[error("`{0}` is not a leaf class")]
    NotALeaf(String),
}

// -----------------------------------------------------------------------------
// MappingError

/// Errors raised by a single marshal or unmarshal call.
#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum MappingError {
    #[error("element `{tag}` in `{class}` matches several implicit collections")]
    AmbiguousMapping { class: String, tag: String },

    #[error("cycle through `{class}` at `{path}`")]
    CyclicReference { class: String, path: String },

    #[error("element `{tag}` matches no field of `{class}`")]
    UnresolvedSlot { class: String, tag: String },

    #[error("no class is known as `{0}`")]
    UnknownType(String),

    #[error("`{0}` is abstract and has no default implementation")]
    AbstractType(String),

    #[error("`{class}` has no field slot `{field}`")]
    InvalidSlot { class: String, field: String },

    #[error("reference `{0}` does not resolve to an object")]
    InvalidReference(String),

    #[error("cannot convert `{class}`: {source}")]
    Conversion {
        class: String,
        #[source]
        source: ConversionError,
    },

    #[error("expected {expected}, found `{class}`")]
    UnexpectedKind {
        class: String,
        expected: &'static str,
    },

    #[error(transparent)]
    Document(#[from] DocError),
}

// -----------------------------------------------------------------------------
// Error

/// Any error of this crate.
#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum Error {
    #[error("configuration failed: {0}")]
    Config(#[from] ConfigError),

    #[error("mapping failed: {0}")]
    Mapping(#[from] MappingError),
}

impl From<DocError> for Error {
    #[inline]
    fn from(value: DocError) -> Self {
        Self::Mapping(MappingError::Document(value))
    }
}
