use alloc::string::String;
use alloc::vec::Vec;

use crate::class::{ClassFlags, ClassId, ClassKind, CollectionKind, FieldFlags, FieldInfo, LeafKind};

// -----------------------------------------------------------------------------
// ClassBuilder

/// Describes a class before it is added to a [`ClassRegistry`].
///
/// Fields keep the order in which they are added.
///
/// # Examples
///
/// ```
/// use og_schema::{ClassBuilder, ClassId, ClassRegistry};
///
/// let mut classes = ClassRegistry::new();
/// let farm = classes
///     .register(ClassBuilder::new("Farm").field("size", ClassId::INT))
///     .unwrap();
/// let mega = classes
///     .register(
///         ClassBuilder::new("MegaFarm")
///             .extends(farm)
///             .field("separator", ClassId::STRING),
///     )
///     .unwrap();
///
/// assert_eq!(classes.lineage(mega), [farm, mega]);
/// ```
///
/// [`ClassRegistry`]: crate::ClassRegistry
#[derive(Debug, Clone)]
pub struct ClassBuilder {
    pub(crate) name: String,
    pub(crate) kind: ClassKind,
    pub(crate) parent: Option<ClassId>,
    pub(crate) interfaces: Vec<ClassId>,
    pub(crate) fields: Vec<FieldInfo>,
    pub(crate) flags: ClassFlags,
}

impl ClassBuilder {
    /// Starts an object class.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_kind(name, ClassKind::Object)
    }

    /// Starts a leaf class stored as `kind`.
    pub fn leaf(name: impl Into<String>, kind: LeafKind) -> Self {
        Self::with_kind(name, ClassKind::Leaf(kind))
    }

    /// Starts a concrete collection class.
    pub fn collection(name: impl Into<String>, kind: CollectionKind) -> Self {
        Self::with_kind(name, ClassKind::Collection(kind))
    }

    /// Starts a concrete map class.
    pub fn map(name: impl Into<String>) -> Self {
        Self::with_kind(name, ClassKind::Map)
    }

    fn with_kind(name: impl Into<String>, kind: ClassKind) -> Self {
        Self {
            name: name.into(),
            kind,
            parent: None,
            interfaces: Vec::new(),
            fields: Vec::new(),
            flags: ClassFlags::empty(),
        }
    }

    /// Sets the parent class.
    pub fn extends(mut self, parent: ClassId) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Adds an implemented interface, e.g. [`ClassId::LIST`].
    pub fn implements(mut self, interface: ClassId) -> Self {
        self.interfaces.push(interface);
        self
    }

    /// Marks the class abstract.
    pub fn abstract_class(mut self) -> Self {
        self.flags |= ClassFlags::ABSTRACT;
        self
    }

    /// Adds a plain field.
    pub fn field(self, name: impl Into<String>, ty: ClassId) -> Self {
        self.push(name, ty, None, None, FieldFlags::empty())
    }

    /// Adds a collection or array field holding `item`.
    pub fn collection_field(self, name: impl Into<String>, ty: ClassId, item: ClassId) -> Self {
        self.push(name, ty, Some(item), None, FieldFlags::empty())
    }

    /// Adds a map field from `key` to `value`.
    pub fn map_field(
        self,
        name: impl Into<String>,
        ty: ClassId,
        key: ClassId,
        value: ClassId,
    ) -> Self {
        self.push(name, ty, Some(value), Some(key), FieldFlags::empty())
    }

    /// Adds a field with explicit modifiers.
    pub fn field_with_flags(self, name: impl Into<String>, ty: ClassId, flags: FieldFlags) -> Self {
        self.push(name, ty, None, None, flags)
    }

    fn push(
        mut self,
        name: impl Into<String>,
        ty: ClassId,
        item: Option<ClassId>,
        key: Option<ClassId>,
        flags: FieldFlags,
    ) -> Self {
        self.fields.push(FieldInfo {
            name: name.into(),
            ty,
            item,
            key,
            flags,
        });
        self
    }
}
