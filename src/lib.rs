//! Object-graph to tree-document mapping.
//!
//! The crates are re-exported under short names:
//!
//! - [`schema`]: the class universe and the object-graph arena.
//! - [`doc`]: document nodes, streaming reader/writer traits and the XML binding.
//! - [`mapper`]: aliases, field resolution, implicit collections,
//!   reference tracking, marshalling and unmarshalling.
//! - [`utils`]: hash containers shared by the other crates.
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

pub use og_doc as doc;
pub use og_mapper as mapper;
pub use og_schema as schema;
pub use og_utils as utils;
