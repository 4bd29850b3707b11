use alloc::string::String;
use core::fmt;

use crate::class::{ClassId, LeafKind};
use crate::graph::ObjectId;

// -----------------------------------------------------------------------------
// Scalar

/// The payload of a leaf value.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Bool(bool),
    Int(i64),
    Float(f64),
    Char(char),
    Text(String),
}

impl Scalar {
    /// Returns the storage kind.
    pub const fn kind(&self) -> LeafKind {
        match self {
            Self::Bool(_) => LeafKind::Bool,
            Self::Int(_) => LeafKind::Int,
            Self::Float(_) => LeafKind::Float,
            Self::Char(_) => LeafKind::Char,
            Self::Text(_) => LeafKind::Text,
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(v) => fmt::Display::fmt(v, f),
            Self::Int(v) => fmt::Display::fmt(v, f),
            Self::Float(v) => fmt::Display::fmt(v, f),
            Self::Char(v) => fmt::Display::fmt(v, f),
            Self::Text(v) => f.pad(v),
        }
    }
}

// -----------------------------------------------------------------------------
// Leaf

/// A scalar tagged with its leaf class.
///
/// Leaves have no identity: two equal leaves are interchangeable.
#[derive(Debug, Clone, PartialEq)]
pub struct Leaf {
    pub class: ClassId,
    pub scalar: Scalar,
}

// -----------------------------------------------------------------------------
// Value

/// A field value, collection item or map key/value.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Leaf(Leaf),
    Object(ObjectId),
}

impl Value {
    /// Creates a leaf of the given class.
    #[inline]
    pub const fn leaf(class: ClassId, scalar: Scalar) -> Self {
        Self::Leaf(Leaf { class, scalar })
    }

    #[inline]
    pub const fn bool(v: bool) -> Self {
        Self::leaf(ClassId::BOOL, Scalar::Bool(v))
    }

    #[inline]
    pub const fn int(v: i64) -> Self {
        Self::leaf(ClassId::INT, Scalar::Int(v))
    }

    #[inline]
    pub const fn float(v: f64) -> Self {
        Self::leaf(ClassId::FLOAT, Scalar::Float(v))
    }

    #[inline]
    pub const fn char(v: char) -> Self {
        Self::leaf(ClassId::CHAR, Scalar::Char(v))
    }

    /// Creates a `String` leaf.
    #[inline]
    pub fn text(v: impl Into<String>) -> Self {
        Self::leaf(ClassId::STRING, Scalar::Text(v.into()))
    }

    #[inline]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns the object id, if this value is an object.
    #[inline]
    pub const fn as_object(&self) -> Option<ObjectId> {
        match self {
            Self::Object(id) => Some(*id),
            _ => None,
        }
    }

    /// Returns the scalar, if this value is a leaf.
    #[inline]
    pub const fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            Self::Leaf(leaf) => Some(&leaf.scalar),
            _ => None,
        }
    }

    /// Returns the text of a text leaf.
    pub fn as_text(&self) -> Option<&str> {
        match self.as_scalar()? {
            Scalar::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the integer of an int leaf.
    pub fn as_int(&self) -> Option<i64> {
        match self.as_scalar()? {
            Scalar::Int(v) => Some(*v),
            _ => None,
        }
    }
}

impl From<ObjectId> for Value {
    #[inline]
    fn from(id: ObjectId) -> Self {
        Self::Object(id)
    }
}

// -----------------------------------------------------------------------------
// FieldKey

/// Identity of a field slot: the declaring class plus the field name.
///
/// Two keys with the same name but different declaring classes address
/// different storage, which is how hidden (shadowed) fields are kept apart.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldKey {
    pub declaring: ClassId,
    pub name: String,
}

impl FieldKey {
    #[inline]
    pub fn new(declaring: ClassId, name: impl Into<String>) -> Self {
        Self {
            declaring,
            name: name.into(),
        }
    }
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.declaring, self.name)
    }
}
