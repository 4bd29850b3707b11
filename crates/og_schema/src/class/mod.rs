//! Class descriptions: ids, kinds, fields and the builder.

// -----------------------------------------------------------------------------
// Modules

mod builder;
mod info;

// -----------------------------------------------------------------------------
// Exports

pub use builder::ClassBuilder;
pub use info::{ClassInfo, FieldInfo};

use core::fmt;

use bitflags::bitflags;

// -----------------------------------------------------------------------------
// ClassId

/// Index of a class inside a [`ClassRegistry`](crate::ClassRegistry).
///
/// Built-in classes have fixed ids, exposed as associated constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClassId(pub(crate) u32);

impl ClassId {
    /// Abstract root of every class.
    pub const OBJECT: ClassId = ClassId(0);
    /// Class of the null marker.
    pub const NULL: ClassId = ClassId(1);
    pub const BOOL: ClassId = ClassId(2);
    pub const INT: ClassId = ClassId(3);
    pub const FLOAT: ClassId = ClassId(4);
    pub const CHAR: ClassId = ClassId(5);
    pub const STRING: ClassId = ClassId(6);
    /// Abstract ordered collection.
    pub const LIST: ClassId = ClassId(7);
    /// Abstract collection without duplicates.
    pub const SET: ClassId = ClassId(8);
    /// Abstract key-value container.
    pub const MAP: ClassId = ClassId(9);
    pub const VEC: ClassId = ClassId(10);
    pub const VEC_DEQUE: ClassId = ClassId(11);
    pub const HASH_SET: ClassId = ClassId(12);
    pub const INDEX_SET: ClassId = ClassId(13);
    pub const HASH_MAP: ClassId = ClassId(14);
    pub const INDEX_MAP: ClassId = ClassId(15);

    pub(crate) const BUILTIN_COUNT: u32 = 16;

    /// Returns the raw index.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ClassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// -----------------------------------------------------------------------------
// Kinds

/// Storage used by a leaf class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LeafKind {
    Bool,
    Int,
    Float,
    Char,
    Text,
}

/// Semantics of a collection class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollectionKind {
    /// Ordered, duplicates allowed.
    List,
    /// Insertion ordered, an item already present is not added again.
    Set,
}

/// The structural kind of a class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClassKind {
    /// A class with fields and an optional parent class.
    Object,
    /// The type of the null marker.
    Null,
    /// A scalar read and written by a value converter.
    Leaf(LeafKind),
    Collection(CollectionKind),
    Map,
    /// A fixed sequence of `item`.
    Array { item: ClassId },
}

impl ClassKind {
    /// Returns `true` for kinds that can back an implicit collection.
    #[inline]
    pub const fn is_container(self) -> bool {
        matches!(self, Self::Collection(_) | Self::Map | Self::Array { .. })
    }
}

impl fmt::Display for ClassKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Object => f.pad("Object"),
            Self::Null => f.pad("Null"),
            Self::Leaf(_) => f.pad("Leaf"),
            Self::Collection(CollectionKind::List) => f.pad("List"),
            Self::Collection(CollectionKind::Set) => f.pad("Set"),
            Self::Map => f.pad("Map"),
            Self::Array { .. } => f.pad("Array"),
        }
    }
}

// -----------------------------------------------------------------------------
// Flags

bitflags! {
    /// Modifiers of a class.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ClassFlags: u8 {
        /// Cannot be instantiated; needs a default implementation.
        const ABSTRACT = 1 << 0;
    }
}

bitflags! {
    /// Modifiers of a field.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct FieldFlags: u8 {
        /// Never serialized.
        const TRANSIENT = 1 << 0;
        /// Belongs to the class, not the instance. Never serialized.
        const STATIC    = 1 << 1;
    }
}
