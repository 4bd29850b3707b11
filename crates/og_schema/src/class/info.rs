use alloc::string::String;
use alloc::vec::Vec;

use crate::class::{ClassFlags, ClassId, ClassKind, FieldFlags};

// -----------------------------------------------------------------------------
// FieldInfo

/// A field declared by a class.
///
/// `ty` is the declared type. For collections and arrays `item` is the
/// element type, for maps it is the value type and `key` the key type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldInfo {
    pub(crate) name: String,
    pub(crate) ty: ClassId,
    pub(crate) item: Option<ClassId>,
    pub(crate) key: Option<ClassId>,
    pub(crate) flags: FieldFlags,
}

impl FieldInfo {
    /// Returns the field name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the declared type.
    #[inline]
    pub const fn ty(&self) -> ClassId {
        self.ty
    }

    /// Returns the declared element (or map value) type.
    #[inline]
    pub const fn item(&self) -> Option<ClassId> {
        self.item
    }

    /// Returns the declared map key type.
    #[inline]
    pub const fn key(&self) -> Option<ClassId> {
        self.key
    }

    #[inline]
    pub const fn flags(&self) -> FieldFlags {
        self.flags
    }

    /// Transient and static fields never take part in mapping.
    #[inline]
    pub fn is_serializable(&self) -> bool {
        !self
            .flags
            .intersects(FieldFlags::TRANSIENT | FieldFlags::STATIC)
    }
}

// -----------------------------------------------------------------------------
// ClassInfo

/// A registered class.
///
/// Only the fields the class declares itself are stored here, in
/// declaration order. Inherited fields live on the ancestors.
#[derive(Debug, Clone)]
pub struct ClassInfo {
    pub(crate) id: ClassId,
    pub(crate) name: String,
    pub(crate) kind: ClassKind,
    pub(crate) parent: Option<ClassId>,
    pub(crate) interfaces: Vec<ClassId>,
    pub(crate) fields: Vec<FieldInfo>,
    pub(crate) flags: ClassFlags,
}

impl ClassInfo {
    #[inline]
    pub const fn id(&self) -> ClassId {
        self.id
    }

    /// Returns the unique runtime name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub const fn kind(&self) -> ClassKind {
        self.kind
    }

    #[inline]
    pub const fn parent(&self) -> Option<ClassId> {
        self.parent
    }

    #[inline]
    pub fn interfaces(&self) -> &[ClassId] {
        &self.interfaces
    }

    /// Returns the own fields in declaration order.
    #[inline]
    pub fn fields(&self) -> &[FieldInfo] {
        &self.fields
    }

    /// Returns the own field named `name`, if declared.
    pub fn field(&self, name: &str) -> Option<&FieldInfo> {
        self.fields.iter().find(|f| f.name == name)
    }

    #[inline]
    pub const fn flags(&self) -> ClassFlags {
        self.flags
    }

    #[inline]
    pub fn is_abstract(&self) -> bool {
        self.flags.contains(ClassFlags::ABSTRACT)
    }
}
