use alloc::format;
use alloc::string::{String, ToString};

use og_doc::NodeWriter;
use og_schema::{ClassId, ClassKind, Graph, ObjectData, ObjectId, Value};

use crate::config::{CyclePolicy, ReferenceMode};
use crate::error::MappingError;
use crate::fields::{ClassDescriptor, FieldSlot};
use crate::implicit::ImplicitCollection;
use crate::mapper::Mapper;
use crate::path::PathTracker;
use crate::reference::{ReferenceTracker, Visit};

/// Name of the node holding one map entry.
pub(crate) const ENTRY: &str = "entry";

// -----------------------------------------------------------------------------
// Marshaller

/// Writes one object graph into a [`NodeWriter`].
///
/// A marshaller lives for a single call; its reference tracker is never
/// shared with another call.
pub(crate) struct Marshaller<'m, W: NodeWriter + ?Sized> {
    mapper: &'m Mapper,
    graph: &'m Graph,
    writer: &'m mut W,
    tracker: ReferenceTracker,
    path: PathTracker,
}

impl<'m, W: NodeWriter + ?Sized> Marshaller<'m, W> {
    pub fn new(mapper: &'m Mapper, graph: &'m Graph, writer: &'m mut W) -> Self {
        Self {
            mapper,
            graph,
            writer,
            tracker: ReferenceTracker::new(mapper.config().reference_mode),
            path: PathTracker::new(),
        }
    }

    /// Writes `root` as the document root, named after its runtime class.
    pub fn run(mut self, root: &Value) -> Result<(), MappingError> {
        let name = self.name_for_value(root);
        self.write_node(&name, root, None, None)
    }

    fn name_for_value(&self, value: &Value) -> String {
        self.mapper
            .aliases()
            .name_for_value(self.mapper.classes(), self.graph, value)
    }

    /// Writes `value` as a node named `name`.
    ///
    /// `expected` is the type the reader will assume for the node. It is
    /// `None` when the name itself is the runtime class alias.
    fn write_node(
        &mut self,
        name: &str,
        value: &Value,
        expected: Option<ClassId>,
        defined_in: Option<ClassId>,
    ) -> Result<(), MappingError> {
        let mapper = self.mapper;
        self.path.push(name);
        self.writer.open_node(name)?;
        log::trace!("write {}", self.path.current());

        if let Some(declaring) = defined_in {
            let alias = mapper.aliases().name_for_class(mapper.classes(), declaring);
            self.writer
                .write_attribute(&mapper.config().attributes.defined_in, &alias)?;
        }

        match value {
            Value::Null => {}
            Value::Leaf(leaf) => {
                self.write_class(leaf.class, expected)?;
                let text = mapper.converters().to_text(mapper.classes(), leaf)?;
                if !text.is_empty() {
                    self.writer.write_text(&text)?;
                }
            }
            Value::Object(id) => self.write_object(*id, expected)?,
        }

        self.writer.close_node()?;
        self.path.pop();
        Ok(())
    }

    fn write_class(&mut self, runtime: ClassId, expected: Option<ClassId>) -> Result<(), MappingError> {
        let mapper = self.mapper;
        let Some(expected) = expected else {
            return Ok(());
        };
        if runtime == mapper.aliases().default_implementation(expected) {
            return Ok(());
        }
        let alias = mapper.aliases().name_for_class(mapper.classes(), runtime);
        self.writer
            .write_attribute(&mapper.config().attributes.class, &alias)?;
        Ok(())
    }

    fn write_reference(&mut self, reference: &str) -> Result<(), MappingError> {
        let mapper = self.mapper;
        let attribute = &mapper.config().attributes.reference;
        log::trace!("{} refers to `{reference}`", self.path.current());
        self.writer.write_attribute(attribute, reference)?;
        Ok(())
    }

    fn write_object(&mut self, id: ObjectId, expected: Option<ClassId>) -> Result<(), MappingError> {
        let mapper = self.mapper;
        let graph = self.graph;
        let config = mapper.config();
        let object = graph
            .get(id)
            .ok_or_else(|| MappingError::InvalidReference(format!("{id:?}")))?;

        match self.tracker.visit(id, self.path.current()) {
            Visit::First => {}
            Visit::Seen(reference) => return self.write_reference(&reference),
            Visit::InProgress(reference) => {
                if config.reference_mode == ReferenceMode::Disabled
                    || config.cycle_policy == CyclePolicy::Error
                {
                    return Err(MappingError::CyclicReference {
                        class: String::from(mapper.classes().name_of(object.class)),
                        path: self.path.current().to_string(),
                    });
                }
                return self.write_reference(&reference);
            }
        }

        self.write_class(object.class, expected)?;
        if config.reference_mode == ReferenceMode::Id
            && let Some(number) = self.tracker.id_of(id)
        {
            self.writer
                .write_attribute(&config.attributes.id, &number.to_string())?;
        }

        match (mapper.classes().kind_of(object.class), &object.data) {
            (Some(ClassKind::Object), ObjectData::Fields(_)) => self.write_fields(id, object.class)?,
            (Some(ClassKind::Collection(_) | ClassKind::Array { .. }), ObjectData::Items(items)) => {
                for item in items {
                    let name = self.name_for_value(item);
                    self.write_node(&name, item, None, None)?;
                }
            }
            (Some(ClassKind::Map), ObjectData::Entries(entries)) => {
                for (key, value) in entries {
                    self.write_entry(key, value)?;
                }
            }
            _ => {
                return Err(MappingError::UnexpectedKind {
                    class: String::from(mapper.classes().name_of(object.class)),
                    expected: "an object, collection or map",
                });
            }
        }

        self.tracker.finish(id);
        Ok(())
    }

    fn write_entry(&mut self, key: &Value, value: &Value) -> Result<(), MappingError> {
        self.path.push(ENTRY);
        self.writer.open_node(ENTRY)?;
        let name = self.name_for_value(key);
        self.write_node(&name, key, None, None)?;
        let name = self.name_for_value(value);
        self.write_node(&name, value, None, None)?;
        self.writer.close_node()?;
        self.path.pop();
        Ok(())
    }

    /// Writes the slots of an object base class first, each implicit
    /// collection at the position of its field.
    fn write_fields(&mut self, id: ObjectId, class: ClassId) -> Result<(), MappingError> {
        let graph = self.graph;
        let mapper = self.mapper;
        let descriptor = mapper.descriptor(class)?;
        // Implicit slot of the last written element, as the reader sees it.
        let mut previous = None;

        for (index, slot) in descriptor.slots().iter().enumerate() {
            let Some(value) = graph.field(id, slot.key()) else {
                continue;
            };
            match slot.implicit() {
                Some(decl) => {
                    let at = SlotAt {
                        descriptor,
                        index,
                        slot,
                        decl,
                    };
                    self.write_implicit(&at, value, &mut previous)?;
                }
                None if value.is_null() => {}
                None => {
                    let defined_in = slot.is_shadowed().then(|| slot.declaring());
                    self.write_node(slot.external_name(), value, Some(slot.declared_type()), defined_in)?;
                    previous = None;
                }
            }
        }
        Ok(())
    }

    fn write_implicit(
        &mut self,
        at: &SlotAt<'_>,
        container: &Value,
        previous: &mut Option<usize>,
    ) -> Result<(), MappingError> {
        let mapper = self.mapper;
        let graph = self.graph;
        let slot = at.slot;
        let decl = at.decl;
        let container = match container {
            Value::Null => return Ok(()),
            Value::Object(id) => graph.get(*id),
            Value::Leaf(_) => None,
        };

        let defined_in = slot.is_shadowed().then(|| slot.declaring());
        let item_type = slot.item_type_for(decl);
        let mut write_item = |this: &mut Self, item: &Value| {
            if item.is_null() {
                this.check_null_placement(at, defined_in, *previous)?;
            }
            *previous = Some(at.index);
            match decl.item_name() {
                Some(name) if !item.is_null() => this.write_node(name, item, Some(item_type), defined_in),
                _ => {
                    let name = this.name_for_value(item);
                    this.write_node(&name, item, None, defined_in)
                }
            }
        };

        match container.map(|object| &object.data) {
            Some(ObjectData::Items(items)) => {
                for item in items {
                    write_item(self, item)?;
                }
            }
            Some(ObjectData::Entries(entries)) if decl.key_field().is_some() => {
                for (_, value) in entries {
                    write_item(self, value)?;
                }
            }
            _ => {
                return Err(MappingError::UnexpectedKind {
                    class: String::from(mapper.classes().name_of(slot.declared_type())),
                    expected: "a collection",
                });
            }
        }
        Ok(())
    }

    /// Fails unless a null marker written here would be read back into
    /// the slot it came from.
    fn check_null_placement(
        &self,
        at: &SlotAt<'_>,
        defined_in: Option<ClassId>,
        previous: Option<usize>,
    ) -> Result<(), MappingError> {
        let mapper = self.mapper;
        let target = mapper.implicits().resolve_null_for_unmarshal(
            mapper.classes(),
            at.descriptor,
            defined_in,
            previous,
        )?;
        if target == Some(at.index) {
            return Ok(());
        }
        log::trace!("null in {} would be read into another slot", at.slot.key());
        Err(MappingError::AmbiguousMapping {
            class: String::from(mapper.classes().name_of(at.descriptor.class())),
            tag: mapper.aliases().name_for_class(mapper.classes(), ClassId::NULL),
        })
    }
}

/// An implicit slot of the object being written.
struct SlotAt<'a> {
    descriptor: &'a ClassDescriptor,
    index: usize,
    slot: &'a FieldSlot,
    decl: &'a ImplicitCollection,
}
