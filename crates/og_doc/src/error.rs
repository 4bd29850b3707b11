use alloc::string::String;

use thiserror::Error;

// -----------------------------------------------------------------------------
// Error

/// Errors raised by document writers and readers.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum DocError {
    #[error("no node is open")]
    NoOpenNode,

    #[error("attribute `{0}` written after the content of its node")]
    AttributeAfterContent(String),

    #[error("document already has a root node; cannot open `{0}`")]
    MultipleRoots(String),

    #[error("{0} node(s) were left open")]
    Unclosed(usize),

    #[error("document is empty")]
    Empty,

    #[error("malformed xml: {0}")]
    Xml(String),
}
