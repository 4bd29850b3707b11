#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

//! The class universe and the object-graph arena.
//!
//! Rust has no runtime class hierarchy, so every type the mapper can
//! handle is described up front in a [`ClassRegistry`]:
//!
//! ```
//! use og_schema::{ClassBuilder, ClassId, ClassRegistry};
//!
//! let mut classes = ClassRegistry::new();
//! let animal = classes
//!     .register(ClassBuilder::new("Animal").field("name", ClassId::STRING))
//!     .unwrap();
//! let farm = classes
//!     .register(
//!         ClassBuilder::new("Farm")
//!             .field("size", ClassId::INT)
//!             .collection_field("animals", ClassId::LIST, animal),
//!     )
//!     .unwrap();
//!
//! assert_eq!(classes.get(farm).unwrap().fields().len(), 2);
//! assert_eq!(classes.nearest_declarer(farm, "size"), Some(farm));
//! ```
//!
//! Object graphs are stored in a [`Graph`], an arena addressed by
//! [`ObjectId`]. Identity is the id, never value equality.

// -----------------------------------------------------------------------------
// no_std support

#[cfg(feature = "std")]
extern crate std;

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod error;
mod registry;

pub mod class;
pub mod graph;

// -----------------------------------------------------------------------------
// Top-Level exports

pub use class::{ClassBuilder, ClassFlags, ClassId, ClassInfo, ClassKind};
pub use class::{CollectionKind, FieldFlags, FieldInfo, LeafKind};
pub use error::SchemaError;
pub use graph::{FieldKey, Graph, Leaf, Object, ObjectData, ObjectId, Scalar, Value};
pub use registry::ClassRegistry;
