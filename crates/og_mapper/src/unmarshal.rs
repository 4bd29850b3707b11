use alloc::string::String;

use og_doc::{DocError, NodeReader};
use og_schema::{ClassId, ClassKind, CollectionKind, Graph, ObjectId, Value};

use crate::error::MappingError;
use crate::fields::FieldSlot;
use crate::implicit::ImplicitCollection;
use crate::mapper::Mapper;
use crate::path::PathTracker;
use crate::reference::ReferenceResolver;

// -----------------------------------------------------------------------------
// Unmarshaller

/// Builds one object graph from a [`NodeReader`].
pub(crate) struct Unmarshaller<'m, R: NodeReader + ?Sized> {
    mapper: &'m Mapper,
    reader: &'m mut R,
    graph: Graph,
    resolver: ReferenceResolver,
    path: PathTracker,
    null_name: String,
}

impl<'m, R: NodeReader + ?Sized> Unmarshaller<'m, R> {
    pub fn new(mapper: &'m Mapper, reader: &'m mut R) -> Self {
        Self {
            mapper,
            reader,
            graph: Graph::new(),
            resolver: ReferenceResolver::new(mapper.config().reference_mode),
            path: PathTracker::new(),
            null_name: mapper.aliases().name_for_class(mapper.classes(), ClassId::NULL),
        }
    }

    /// Reads the document root. The root node names its own class.
    pub fn run(mut self) -> Result<(Graph, Value), MappingError> {
        let name = self.reader.next_node()?.ok_or(DocError::Empty)?;
        let root = self.read_node(&name, None)?;
        Ok((self.graph, root))
    }

    /// Reads the node the cursor was just moved onto, then leaves it.
    ///
    /// Without a `class` attribute the node is an instance of the default
    /// implementation of `declared`, or of the class named `name` when
    /// nothing is declared.
    fn read_node(&mut self, name: &str, declared: Option<ClassId>) -> Result<Value, MappingError> {
        self.path.push(name);
        log::trace!("read {}", self.path.current());
        let value = self.read_content(name, declared)?;
        self.reader.leave_node()?;
        self.path.pop();
        Ok(value)
    }

    fn read_content(&mut self, name: &str, declared: Option<ClassId>) -> Result<Value, MappingError> {
        let mapper = self.mapper;
        let classes = mapper.classes();
        let attributes = &mapper.config().attributes;

        if let Some(reference) = self.reader.attribute(&attributes.reference) {
            return self.resolver.resolve(self.path.current(), reference);
        }

        let class = match (self.reader.attribute(&attributes.class), declared) {
            (Some(alias), _) => mapper.aliases().type_for_name(classes, alias)?,
            (None, Some(declared)) => mapper.aliases().default_implementation(declared),
            (None, None) => mapper.aliases().type_for_name(classes, name)?,
        };
        let info = classes
            .get(class)
            .ok_or_else(|| MappingError::UnknownType(String::from(name)))?;
        if info.is_abstract() {
            return Err(MappingError::AbstractType(String::from(info.name())));
        }

        let value = match info.kind() {
            ClassKind::Null => Value::Null,
            ClassKind::Leaf(_) => {
                let text = self.reader.text().unwrap_or_default();
                mapper.converters().from_text(classes, class, text)?
            }
            ClassKind::Object => {
                let id = self.instantiate(Graph::new_fields, class);
                self.read_fields(id, class)?;
                id.into()
            }
            ClassKind::Collection(kind) => {
                let id = self.instantiate(Graph::new_items, class);
                self.read_items(id, kind == CollectionKind::Set)?;
                id.into()
            }
            ClassKind::Array { .. } => {
                let id = self.instantiate(Graph::new_items, class);
                self.read_items(id, false)?;
                id.into()
            }
            ClassKind::Map => {
                let id = self.instantiate(Graph::new_entries, class);
                self.read_entries(id)?;
                id.into()
            }
        };
        Ok(value)
    }

    /// Creates an object and makes it addressable by later references
    /// before any of its children are read.
    fn instantiate(&mut self, create: fn(&mut Graph, ClassId) -> ObjectId, class: ClassId) -> ObjectId {
        let id = create(&mut self.graph, class);
        let attribute = &self.mapper.config().attributes.id;
        let number = self.reader.attribute(attribute);
        self.resolver.register(self.path.current(), number, id.into());
        id
    }

    fn read_items(&mut self, id: ObjectId, unique: bool) -> Result<(), MappingError> {
        while let Some(name) = self.reader.next_node()? {
            let item = self.read_node(&name, None)?;
            if unique {
                self.graph.push_unique(id, item);
            } else {
                self.graph.push_item(id, item);
            }
        }
        Ok(())
    }

    fn read_entries(&mut self, id: ObjectId) -> Result<(), MappingError> {
        while let Some(entry) = self.reader.next_node()? {
            self.path.push(&entry);
            let key = self.read_child()?;
            let value = self.read_child()?;
            self.reader.leave_node()?;
            self.path.pop();
            self.graph.insert_entry(id, key, value);
        }
        Ok(())
    }

    fn read_child(&mut self) -> Result<Value, MappingError> {
        match self.reader.next_node()? {
            Some(name) => self.read_node(&name, None),
            None => Ok(Value::Null),
        }
    }

    /// Reads the children of an object node into the field slots of `id`.
    ///
    /// Ordinary slots are matched by name first. Anything else goes to an
    /// implicit collection, or is skipped when unknown elements are
    /// ignored.
    fn read_fields(&mut self, id: ObjectId, class: ClassId) -> Result<(), MappingError> {
        let mapper = self.mapper;
        let classes = mapper.classes();
        let descriptor = mapper.descriptor(class)?;
        let mut previous = None;

        while let Some(name) = self.reader.next_node()? {
            let defined_in = match self.reader.attribute(&mapper.config().attributes.defined_in) {
                Some(alias) => Some(mapper.aliases().type_for_name(classes, alias)?),
                None => None,
            };

            if let Some(index) = descriptor.find_ordinary(&name, defined_in) {
                let slot = &descriptor.slots()[index];
                let value = self.read_node(&name, Some(slot.declared_type()))?;
                self.graph.set_field(id, slot.key().clone(), value);
                previous = None;
                continue;
            }

            let implicit = if name == self.null_name {
                mapper
                    .implicits()
                    .resolve_null_for_unmarshal(classes, descriptor, defined_in, previous)?
            } else {
                mapper.implicits().resolve_for_unmarshal(
                    classes,
                    mapper.aliases(),
                    descriptor,
                    &name,
                    defined_in,
                )?
            };

            match implicit {
                Some(index) => {
                    let slot = &descriptor.slots()[index];
                    if let Some(decl) = slot.implicit() {
                        self.read_implicit_item(id, slot, decl, &name)?;
                    }
                    previous = Some(index);
                }
                None if mapper.config().ignore_unknown_elements => {
                    log::warn!("skipping unknown element `{name}` in `{}`", classes.name_of(class));
                    self.path.push(&name);
                    self.reader.leave_node()?;
                    self.path.pop();
                }
                None => {
                    return Err(MappingError::UnresolvedSlot {
                        class: String::from(classes.name_of(class)),
                        tag: name,
                    });
                }
            }
        }
        Ok(())
    }

    fn read_implicit_item(
        &mut self,
        owner: ObjectId,
        slot: &FieldSlot,
        decl: &ImplicitCollection,
        name: &str,
    ) -> Result<(), MappingError> {
        let container = self.implicit_container(owner, slot)?;
        let declared = (decl.item_name() == Some(name) && name != self.null_name)
            .then(|| slot.item_type_for(decl));
        let item = self.read_node(name, declared)?;

        if self.graph.entries(container).is_some() {
            let key = self.key_of(&item, decl)?;
            self.graph.insert_entry(container, key, item);
            return Ok(());
        }
        let unique = matches!(
            self.graph
                .class_of(container)
                .and_then(|class| self.mapper.classes().kind_of(class)),
            Some(ClassKind::Collection(CollectionKind::Set))
        );
        if unique {
            self.graph.push_unique(container, item);
        } else {
            self.graph.push_item(container, item);
        }
        Ok(())
    }

    /// Returns the container of an implicit slot, creating it on first use
    /// from the default implementation of the declared field type.
    fn implicit_container(&mut self, owner: ObjectId, slot: &FieldSlot) -> Result<ObjectId, MappingError> {
        if let Some(Value::Object(existing)) = self.graph.field(owner, slot.key()) {
            return Ok(*existing);
        }

        let mapper = self.mapper;
        let classes = mapper.classes();
        let class = mapper.aliases().default_implementation(slot.declared_type());
        let info = classes
            .get(class)
            .ok_or_else(|| MappingError::UnknownType(String::from(classes.name_of(class))))?;
        if info.is_abstract() {
            return Err(MappingError::AbstractType(String::from(info.name())));
        }

        let container = match info.kind() {
            ClassKind::Collection(_) | ClassKind::Array { .. } => self.graph.new_items(class),
            ClassKind::Map => self.graph.new_entries(class),
            _ => {
                return Err(MappingError::UnexpectedKind {
                    class: String::from(info.name()),
                    expected: "a collection",
                });
            }
        };
        log::trace!("implicit {} created as `{}`", slot.key(), info.name());
        self.graph.set_field(owner, slot.key().clone(), container.into());
        Ok(container)
    }

    /// Reads the map key of an implicit map item from its key field.
    fn key_of(&self, item: &Value, decl: &ImplicitCollection) -> Result<Value, MappingError> {
        let (Some(id), Some(key_field)) = (item.as_object(), decl.key_field()) else {
            return Ok(Value::Null);
        };
        let class = self.graph.class_of(id).unwrap_or(ClassId::OBJECT);
        let key = self.mapper.field_key(class, key_field)?;
        Ok(self.graph.field(id, &key).cloned().unwrap_or_default())
    }
}
