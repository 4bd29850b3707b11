use alloc::format;
use alloc::string::String;

use og_doc::{Node, NodeReader, NodeWriter, TreeReader, TreeWriter};
use og_schema::{ClassId, ClassRegistry, FieldKey, Graph, Value};
use og_utils::hash::IdMap;

use crate::alias::AliasRegistry;
use crate::config::MapperConfig;
use crate::converter::{ConverterRegistry, ValueConverter};
use crate::error::{ConfigError, MappingError};
use crate::fields::{ClassDescriptor, FieldResolver};
use crate::implicit::ImplicitCollectionRegistry;
use crate::marshal::Marshaller;
use crate::unmarshal::Unmarshaller;

// -----------------------------------------------------------------------------
// MapperBuilder

/// Collects the configuration of a [`Mapper`].
///
/// Every configuration call checks its arguments against the class
/// registry. A failing call changes nothing.
///
/// # Examples
///
/// ```
/// use og_mapper::MapperBuilder;
/// use og_schema::{ClassBuilder, ClassId, ClassRegistry};
///
/// let mut classes = ClassRegistry::new();
/// let farm = classes
///     .register(
///         ClassBuilder::new("Farm")
///             .field("size", ClassId::INT)
///             .collection_field("animals", ClassId::LIST, ClassId::STRING),
///     )
///     .unwrap();
///
/// let mut builder = MapperBuilder::new(classes);
/// builder
///     .alias("farm", farm)
///     .unwrap()
///     .implicit_collection_named(farm, "animals", "animal", None)
///     .unwrap();
/// assert!(builder.implicit_collection(farm, "size").is_err());
///
/// let mapper = builder.build().unwrap();
/// assert_eq!(mapper.descriptor(farm).unwrap().slots().len(), 2);
/// ```
#[derive(Debug)]
pub struct MapperBuilder {
    classes: ClassRegistry,
    aliases: AliasRegistry,
    implicits: ImplicitCollectionRegistry,
    converters: ConverterRegistry,
    config: MapperConfig,
}

impl MapperBuilder {
    /// Creates a builder over `classes` with the default configuration.
    pub fn new(classes: ClassRegistry) -> Self {
        Self {
            classes,
            aliases: AliasRegistry::new(),
            implicits: ImplicitCollectionRegistry::new(),
            converters: ConverterRegistry::new(),
            config: MapperConfig::default(),
        }
    }

    /// Replaces the behavior switches.
    #[inline]
    pub fn with_config(mut self, config: MapperConfig) -> Self {
        self.config = config;
        self
    }

    #[inline]
    pub fn config_mut(&mut self) -> &mut MapperConfig {
        &mut self.config
    }

    #[inline]
    pub fn classes(&self) -> &ClassRegistry {
        &self.classes
    }

    /// Skips unknown child elements instead of failing.
    pub fn ignore_unknown_elements(&mut self, ignore: bool) -> &mut Self {
        self.config.ignore_unknown_elements = ignore;
        self
    }

    fn check_class(&self, class: ClassId) -> Result<(), ConfigError> {
        self.classes
            .get(class)
            .map(|_| ())
            .ok_or(ConfigError::UnknownClass(class))
    }

    fn slot(&self, class: ClassId, field: &str) -> Result<FieldKey, ConfigError> {
        self.check_class(class)?;
        self.classes
            .nearest_declarer(class, field)
            .map(|declaring| FieldKey::new(declaring, field))
            .ok_or_else(|| ConfigError::InvalidSlot {
                class: String::from(self.classes.name_of(class)),
                field: String::from(field),
            })
    }

    /// Writes `class` as `name`. The last alias of a class wins.
    pub fn alias(&mut self, name: &str, class: ClassId) -> Result<&mut Self, ConfigError> {
        self.check_class(class)?;
        self.aliases.alias(name, class);
        Ok(self)
    }

    /// Writes the field `field`, as seen from `class`, as `name`.
    pub fn alias_field(&mut self, name: &str, class: ClassId, field: &str) -> Result<&mut Self, ConfigError> {
        let key = self.slot(class, field)?;
        self.aliases.alias_field(key, name);
        Ok(self)
    }

    /// Leaves the field `field`, as seen from `class`, out of every
    /// document.
    pub fn omit_field(&mut self, class: ClassId, field: &str) -> Result<&mut Self, ConfigError> {
        let key = self.slot(class, field)?;
        self.aliases.omit_field(key);
        Ok(self)
    }

    /// Instantiates `concrete` wherever `target` is declared.
    pub fn add_default_implementation(
        &mut self,
        concrete: ClassId,
        target: ClassId,
    ) -> Result<&mut Self, ConfigError> {
        self.aliases
            .add_default_implementation(&self.classes, concrete, target)?;
        Ok(self)
    }

    /// Writes the items of `field` without a wrapping node, each named
    /// after its runtime class.
    pub fn implicit_collection(&mut self, owner: ClassId, field: &str) -> Result<&mut Self, ConfigError> {
        self.implicits
            .declare(&self.classes, owner, field, None, None)?;
        Ok(self)
    }

    /// Like [`implicit_collection`](Self::implicit_collection), reading
    /// only elements of `item_type` into the field.
    pub fn implicit_collection_of(
        &mut self,
        owner: ClassId,
        field: &str,
        item_type: ClassId,
    ) -> Result<&mut Self, ConfigError> {
        self.implicits
            .declare(&self.classes, owner, field, None, Some(item_type))?;
        Ok(self)
    }

    /// Writes the items of `field` without a wrapping node, each named
    /// `item_name`.
    pub fn implicit_collection_named(
        &mut self,
        owner: ClassId,
        field: &str,
        item_name: &str,
        item_type: Option<ClassId>,
    ) -> Result<&mut Self, ConfigError> {
        self.implicits
            .declare(&self.classes, owner, field, Some(item_name), item_type)?;
        Ok(self)
    }

    /// Writes the values of the map `field` without a wrapping node. The
    /// key of each value is its field `key_field`.
    pub fn implicit_map(
        &mut self,
        owner: ClassId,
        field: &str,
        item_name: Option<&str>,
        item_type: Option<ClassId>,
        key_field: &str,
    ) -> Result<&mut Self, ConfigError> {
        self.implicits
            .declare_map(&self.classes, owner, field, item_name, item_type, key_field)?;
        Ok(self)
    }

    /// Converts the leaf class `class` with `converter`.
    pub fn register_converter(
        &mut self,
        class: ClassId,
        converter: impl ValueConverter + 'static,
    ) -> Result<&mut Self, ConfigError> {
        self.converters.register(&self.classes, class, converter)?;
        Ok(self)
    }

    /// Freezes the configuration and describes every registered class.
    pub fn build(self) -> Result<Mapper, ConfigError> {
        let mut descriptors = IdMap::default();
        {
            let resolver = FieldResolver::new(&self.classes, &self.aliases, &self.implicits);
            for info in self.classes.iter() {
                descriptors.insert(info.id(), resolver.describe(info.id())?);
            }
        }
        log::debug!("mapper built for {} classes", descriptors.len());

        Ok(Mapper {
            classes: self.classes,
            aliases: self.aliases,
            implicits: self.implicits,
            converters: self.converters,
            config: self.config,
            descriptors,
        })
    }
}

// -----------------------------------------------------------------------------
// Mapper

/// A frozen configuration that maps object graphs to documents and back.
///
/// A `Mapper` is never mutated after [`MapperBuilder::build`], so it can
/// be shared by any number of threads. Each call keeps its own reference
/// state.
#[derive(Debug)]
pub struct Mapper {
    classes: ClassRegistry,
    aliases: AliasRegistry,
    implicits: ImplicitCollectionRegistry,
    converters: ConverterRegistry,
    config: MapperConfig,
    descriptors: IdMap<ClassId, ClassDescriptor>,
}

impl Mapper {
    #[inline]
    pub fn classes(&self) -> &ClassRegistry {
        &self.classes
    }

    #[inline]
    pub fn aliases(&self) -> &AliasRegistry {
        &self.aliases
    }

    #[inline]
    pub fn implicits(&self) -> &ImplicitCollectionRegistry {
        &self.implicits
    }

    #[inline]
    pub fn converters(&self) -> &ConverterRegistry {
        &self.converters
    }

    #[inline]
    pub fn config(&self) -> &MapperConfig {
        &self.config
    }

    /// Returns the field slots of `class`.
    pub fn descriptor(&self, class: ClassId) -> Result<&ClassDescriptor, MappingError> {
        self.descriptors
            .get(&class)
            .ok_or_else(|| MappingError::UnknownType(format!("{class}")))
    }

    /// Returns the slot `field` as seen from `class`.
    pub fn field_key(&self, class: ClassId, field: &str) -> Result<FieldKey, MappingError> {
        FieldResolver::new(&self.classes, &self.aliases, &self.implicits).resolve_slot(class, field)
    }

    /// Writes the graph reachable from `root` into `writer`.
    pub fn marshal<W>(&self, graph: &Graph, root: &Value, writer: &mut W) -> Result<(), MappingError>
    where
        W: NodeWriter + ?Sized,
    {
        Marshaller::new(self, graph, writer).run(root)
    }

    /// Reads a graph from `reader`, returning it with its root value.
    pub fn unmarshal<R>(&self, reader: &mut R) -> Result<(Graph, Value), MappingError>
    where
        R: NodeReader + ?Sized,
    {
        Unmarshaller::new(self, reader).run()
    }

    /// Writes the graph reachable from `root` as an in-memory tree.
    pub fn to_document(&self, graph: &Graph, root: &Value) -> Result<Node, MappingError> {
        let mut writer = TreeWriter::new();
        self.marshal(graph, root, &mut writer)?;
        Ok(writer.finish()?)
    }

    /// Reads a graph from an in-memory tree.
    pub fn from_document(&self, document: &Node) -> Result<(Graph, Value), MappingError> {
        self.unmarshal(&mut TreeReader::new(document))
    }

    /// Renders the graph reachable from `root` as XML text.
    #[cfg(feature = "xml")]
    pub fn to_xml(&self, graph: &Graph, root: &Value) -> Result<String, crate::Error> {
        let document = self.to_document(graph, root)?;
        Ok(og_doc::xml::to_xml(&document)?)
    }

    /// Reads a graph from XML text.
    #[cfg(feature = "xml")]
    pub fn from_xml(&self, text: &str) -> Result<(Graph, Value), crate::Error> {
        let document = og_doc::xml::parse_xml(text)?;
        Ok(self.from_document(&document)?)
    }
}

// -----------------------------------------------------------------------------
// Tests
