use alloc::format;
use alloc::string::String;

use og_schema::{ClassId, ClassRegistry, FieldKey, Graph, Value};
use og_utils::hash::{HashMap, HashSet, IdMap};

use crate::error::{ConfigError, MappingError};

const ARRAY_SUFFIX: &str = "-array";

// -----------------------------------------------------------------------------
// AliasRegistry

/// External names of classes and field slots, omitted slots and the
/// default implementations of abstract classes.
///
/// Writing a name for a class replaces the previous one, but every name
/// ever given to a class keeps resolving to it when reading.
#[derive(Debug, Clone)]
pub struct AliasRegistry {
    class_names: IdMap<ClassId, String>,
    classes_by_name: HashMap<String, ClassId>,
    field_names: HashMap<FieldKey, String>,
    omitted: HashSet<FieldKey>,
    defaults: IdMap<ClassId, ClassId>,
}

impl Default for AliasRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl AliasRegistry {
    /// Creates a registry with the built-in aliases and default
    /// implementations (`List` to `Vec`, `Set` to `HashSet`, `Map` to
    /// `HashMap`).
    pub fn new() -> Self {
        let mut aliases = Self {
            class_names: IdMap::default(),
            classes_by_name: HashMap::default(),
            field_names: HashMap::default(),
            omitted: HashSet::default(),
            defaults: IdMap::default(),
        };

        let builtin = [
            ("null", ClassId::NULL),
            ("bool", ClassId::BOOL),
            ("int", ClassId::INT),
            ("float", ClassId::FLOAT),
            ("char", ClassId::CHAR),
            ("string", ClassId::STRING),
            ("list", ClassId::VEC),
            ("linked-list", ClassId::VEC_DEQUE),
            ("set", ClassId::HASH_SET),
            ("linked-set", ClassId::INDEX_SET),
            ("map", ClassId::HASH_MAP),
            ("linked-map", ClassId::INDEX_MAP),
        ];
        for (name, class) in builtin {
            aliases.alias(name, class);
        }

        aliases.defaults.insert(ClassId::LIST, ClassId::VEC);
        aliases.defaults.insert(ClassId::SET, ClassId::HASH_SET);
        aliases.defaults.insert(ClassId::MAP, ClassId::HASH_MAP);
        aliases
    }

    /// Names `class` as `name`.
    pub fn alias(&mut self, name: impl Into<String>, class: ClassId) {
        let name = name.into();
        if let Some(old) = self.class_names.insert(class, name.clone()) {
            log::debug!("alias of {class} changes from `{old}` to `{name}`");
        }
        self.classes_by_name.insert(name, class);
    }

    /// Names the field slot `key` as `name`.
    pub fn alias_field(&mut self, key: FieldKey, name: impl Into<String>) {
        self.field_names.insert(key, name.into());
    }

    /// Excludes the field slot `key` from mapping.
    pub fn omit_field(&mut self, key: FieldKey) {
        self.omitted.insert(key);
    }

    #[inline]
    pub fn is_omitted(&self, key: &FieldKey) -> bool {
        self.omitted.contains(key)
    }

    /// Makes `concrete` the class instantiated where `target` is expected.
    ///
    /// `concrete` must be assignable to `target` and must not be abstract.
    pub fn add_default_implementation(
        &mut self,
        classes: &ClassRegistry,
        concrete: ClassId,
        target: ClassId,
    ) -> Result<(), ConfigError> {
        let info = classes.get(concrete).ok_or(ConfigError::UnknownClass(concrete))?;
        classes.get(target).ok_or(ConfigError::UnknownClass(target))?;

        if info.is_abstract() || !classes.is_assignable(concrete, target) {
            return Err(ConfigError::InvalidDefaultImplementation {
                concrete: String::from(info.name()),
                target: String::from(classes.name_of(target)),
            });
        }
        if let Some(old) = self.defaults.insert(target, concrete) {
            log::debug!(
                "default implementation of `{}` changes from `{}` to `{}`",
                classes.name_of(target),
                classes.name_of(old),
                info.name(),
            );
        }
        Ok(())
    }

    /// Returns the class to instantiate where `class` is expected.
    #[inline]
    pub fn default_implementation(&self, class: ClassId) -> ClassId {
        self.defaults.get(&class).copied().unwrap_or(class)
    }

    /// Returns the external name of `class`.
    ///
    /// Unaliased arrays are named after their item (`int-array`), any
    /// other unaliased class by its runtime name.
    pub fn name_for_class(&self, classes: &ClassRegistry, class: ClassId) -> String {
        if let Some(name) = self.class_names.get(&class) {
            return name.clone();
        }
        match classes.array_item(class) {
            Some(item) => format!("{}{ARRAY_SUFFIX}", self.name_for_class(classes, item)),
            None => String::from(classes.name_of(class)),
        }
    }

    /// Returns the external name of the runtime class of `value`.
    pub fn name_for_value(&self, classes: &ClassRegistry, graph: &Graph, value: &Value) -> String {
        let class = graph.value_class(value).unwrap_or(ClassId::NULL);
        self.name_for_class(classes, class)
    }

    /// Returns the external name of the field slot `key`.
    pub fn name_for_field<'a>(&'a self, key: &'a FieldKey) -> &'a str {
        self.field_names.get(key).map_or(key.name.as_str(), String::as_str)
    }

    /// Resolves an external class name.
    ///
    /// Aliases win over runtime names. `<item>-array` resolves to the array
    /// of `<item>` when that array class exists.
    pub fn type_for_name(&self, classes: &ClassRegistry, name: &str) -> Result<ClassId, MappingError> {
        if let Some(class) = self.classes_by_name.get(name) {
            return Ok(*class);
        }
        if let Some(class) = classes.by_name(name) {
            return Ok(class);
        }
        name.strip_suffix(ARRAY_SUFFIX)
            .and_then(|item| self.type_for_name(classes, item).ok())
            .and_then(|item| classes.find_array(item))
            .ok_or_else(|| MappingError::UnknownType(String::from(name)))
    }
}

// -----------------------------------------------------------------------------
// Tests
