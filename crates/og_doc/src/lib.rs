#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

//! Tree-shaped documents and the streaming primitives used to produce
//! and consume them.
//!
//! The mapper only talks to [`NodeWriter`] and [`NodeReader`]. The
//! in-memory [`TreeWriter`] and [`TreeReader`] implement them over a
//! [`Node`] tree; with the `xml` feature the [`xml`] module renders and
//! parses the same trees as indented XML text.

// -----------------------------------------------------------------------------
// no_std support

#[cfg(feature = "std")]
extern crate std;

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod error;
mod node;
mod stream;
mod tree;

#[cfg(feature = "xml")]
pub mod xml;

// -----------------------------------------------------------------------------
// Top-Level exports

pub use error::DocError;
pub use node::Node;
pub use stream::{NodeReader, NodeWriter};
pub use tree::{TreeReader, TreeWriter};
