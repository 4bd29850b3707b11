#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

//! Maps object graphs to tree-shaped documents and back.
//!
//! A [`MapperBuilder`] collects aliases, default implementations and
//! implicit collections for the classes of a
//! [`ClassRegistry`](og_schema::ClassRegistry), then freezes them into a
//! [`Mapper`]:
//!
//! ```
//! use og_mapper::MapperBuilder;
//! use og_schema::{ClassBuilder, ClassId, ClassRegistry, Graph, Value};
//!
//! # fn main() -> Result<(), og_mapper::Error> {
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
//! let mut builder = MapperBuilder::new(classes);
//! builder
//!     .alias("farm", farm)?
//!     .alias("animal", animal)?
//!     .implicit_collection(farm, "animals")?;
//! let mapper = builder.build()?;
//!
//! let mut graph = Graph::new();
//! let cow = graph.new_fields(animal);
//! graph.set_field(cow, mapper.field_key(animal, "name")?, Value::text("Cow"));
//! let animals = graph.new_items(ClassId::VEC);
//! graph.push_item(animals, cow.into());
//! let root = graph.new_fields(farm);
//! graph.set_field(root, mapper.field_key(farm, "size")?, Value::int(100));
//! graph.set_field(root, mapper.field_key(farm, "animals")?, animals.into());
//!
//! let xml = mapper.to_xml(&graph, &root.into())?;
//! assert_eq!(
//!     xml,
//!     "<farm>\n  <size>100</size>\n  <animal>\n    <name>Cow</name>\n  </animal>\n</farm>"
//! );
//!
//! let (copy, copy_root) = mapper.from_xml(&xml)?;
//! assert!(graph.isomorphic(&root.into(), &copy, &copy_root));
//! # Ok(())
//! # }
//! ```
//!
//! Fields are addressed by slot, the declaring class plus the field name,
//! so a field hidden by a subclass keeps its own storage and its own
//! implicit collection declaration.

// -----------------------------------------------------------------------------
// no_std support

#[cfg(feature = "std")]
extern crate std;

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod alias;
mod config;
mod converter;
mod error;
mod fields;
mod implicit;
mod mapper;
mod marshal;
mod reference;
mod unmarshal;

pub mod path;

#[cfg(all(test, feature = "xml"))]
mod acceptance;

// -----------------------------------------------------------------------------
// Top-Level exports

pub use alias::AliasRegistry;
pub use config::{CyclePolicy, MapperConfig, ReferenceMode, SystemAttributes};
pub use converter::{ConversionError, ConverterRegistry, DefaultConverter, ValueConverter};
pub use error::{ConfigError, Error, MappingError};
pub use fields::{ClassDescriptor, FieldResolver, FieldSlot};
pub use implicit::{ImplicitCollection, ImplicitCollectionRegistry};
pub use mapper::{Mapper, MapperBuilder};
pub use reference::{ReferenceResolver, ReferenceTracker, Visit};
