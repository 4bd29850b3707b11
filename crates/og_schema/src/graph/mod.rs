//! The object-graph arena.
//!
//! Every non-leaf value lives in a [`Graph`] and is addressed by an
//! [`ObjectId`]. Sharing an object means storing the same id twice;
//! cycles are just ids pointing back up the graph.

// -----------------------------------------------------------------------------
// Modules

mod compare;
mod value;

// -----------------------------------------------------------------------------
// Exports

pub use value::{FieldKey, Leaf, Scalar, Value};

use alloc::vec::Vec;

use slotmap::{SlotMap, new_key_type};

use crate::class::ClassId;

new_key_type! {
    /// Identity of an object inside a [`Graph`].
    pub struct ObjectId;
}

// -----------------------------------------------------------------------------
// Object

/// The contents of an object.
#[derive(Debug, Clone, PartialEq)]
pub enum ObjectData {
    /// Field storage of an object class, in assignment order.
    /// A missing key reads as [`Value::Null`].
    Fields(Vec<(FieldKey, Value)>),
    /// Items of a collection or array.
    Items(Vec<Value>),
    /// Entries of a map, in insertion order.
    Entries(Vec<(Value, Value)>),
}

/// An object: its runtime class and its contents.
#[derive(Debug, Clone, PartialEq)]
pub struct Object {
    pub class: ClassId,
    pub data: ObjectData,
}

// -----------------------------------------------------------------------------
// Graph

/// Arena of objects.
///
/// # Examples
///
/// ```
/// use og_schema::{ClassId, FieldKey, Graph, Value};
/// # let farm = ClassId::OBJECT;
///
/// let mut graph = Graph::new();
/// let cow = Value::text("Cow");
/// let animals = graph.new_items(ClassId::VEC);
/// graph.push_item(animals, cow.clone());
///
/// let obj = graph.new_fields(farm);
/// graph.set_field(obj, FieldKey::new(farm, "animals"), animals.into());
///
/// assert_eq!(graph.items(animals), Some(&[cow][..]));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Graph {
    objects: SlotMap<ObjectId, Object>,
}

impl Graph {
    /// Creates an empty graph.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of objects.
    #[inline]
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Inserts an object and returns its id.
    pub fn insert(&mut self, object: Object) -> ObjectId {
        self.objects.insert(object)
    }

    /// Creates an instance of an object class with every field unset.
    pub fn new_fields(&mut self, class: ClassId) -> ObjectId {
        self.insert(Object {
            class,
            data: ObjectData::Fields(Vec::new()),
        })
    }

    /// Creates an empty collection or array.
    pub fn new_items(&mut self, class: ClassId) -> ObjectId {
        self.insert(Object {
            class,
            data: ObjectData::Items(Vec::new()),
        })
    }

    /// Creates an empty map.
    pub fn new_entries(&mut self, class: ClassId) -> ObjectId {
        self.insert(Object {
            class,
            data: ObjectData::Entries(Vec::new()),
        })
    }

    #[inline]
    pub fn get(&self, id: ObjectId) -> Option<&Object> {
        self.objects.get(id)
    }

    #[inline]
    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut Object> {
        self.objects.get_mut(id)
    }

    /// Returns the runtime class of `id`.
    #[inline]
    pub fn class_of(&self, id: ObjectId) -> Option<ClassId> {
        self.objects.get(id).map(|o| o.class)
    }

    /// Returns the runtime class of a value, [`ClassId::NULL`] for null.
    pub fn value_class(&self, value: &Value) -> Option<ClassId> {
        match value {
            Value::Null => Some(ClassId::NULL),
            Value::Leaf(leaf) => Some(leaf.class),
            Value::Object(id) => self.class_of(*id),
        }
    }

    /// Returns the value stored under `key`.
    ///
    /// Unset fields and ids that are not field objects read as `None`.
    pub fn field(&self, id: ObjectId, key: &FieldKey) -> Option<&Value> {
        match &self.objects.get(id)?.data {
            ObjectData::Fields(fields) => fields.iter().find(|(k, _)| k == key).map(|(_, v)| v),
            _ => None,
        }
    }

    /// Stores `value` under `key`, returning the previous value.
    ///
    /// Does nothing and returns `None` if `id` is not a field object.
    pub fn set_field(&mut self, id: ObjectId, key: FieldKey, value: Value) -> Option<Value> {
        let Some(Object {
            data: ObjectData::Fields(fields),
            ..
        }) = self.objects.get_mut(id)
        else {
            return None;
        };
        match fields.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => Some(core::mem::replace(slot, value)),
            None => {
                fields.push((key, value));
                None
            }
        }
    }

    /// Returns the items of a collection or array.
    pub fn items(&self, id: ObjectId) -> Option<&[Value]> {
        match &self.objects.get(id)?.data {
            ObjectData::Items(items) => Some(items),
            _ => None,
        }
    }

    /// Appends an item. Returns `false` if `id` is not a collection.
    pub fn push_item(&mut self, id: ObjectId, value: Value) -> bool {
        match self.objects.get_mut(id).map(|o| &mut o.data) {
            Some(ObjectData::Items(items)) => {
                items.push(value);
                true
            }
            _ => false,
        }
    }

    /// Appends an item unless an identical one is present.
    ///
    /// Objects compare by identity, leaves by value. Returns `true` if
    /// the item was added.
    pub fn push_unique(&mut self, id: ObjectId, value: Value) -> bool {
        match self.objects.get_mut(id).map(|o| &mut o.data) {
            Some(ObjectData::Items(items)) if !items.contains(&value) => {
                items.push(value);
                true
            }
            _ => false,
        }
    }

    /// Returns the entries of a map.
    pub fn entries(&self, id: ObjectId) -> Option<&[(Value, Value)]> {
        match &self.objects.get(id)?.data {
            ObjectData::Entries(entries) => Some(entries),
            _ => None,
        }
    }

    /// Inserts or replaces the entry for `key`, returning the old value.
    pub fn insert_entry(&mut self, id: ObjectId, key: Value, value: Value) -> Option<Value> {
        let Some(Object {
            data: ObjectData::Entries(entries),
            ..
        }) = self.objects.get_mut(id)
        else {
            return None;
        };
        match entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => Some(core::mem::replace(slot, value)),
            None => {
                entries.push((key, value));
                None
            }
        }
    }

    /// Compares two rooted graphs structurally.
    ///
    /// Classes, field values, item order and map entries must match, and
    /// the sharing pattern must be the same: two positions hold the same
    /// object in `self` exactly when they hold the same object in `other`.
    pub fn isomorphic(&self, root: &Value, other: &Graph, other_root: &Value) -> bool {
        compare::Isomorphism::new(self, other).values(root, other_root)
    }
}

// -----------------------------------------------------------------------------
// Tests
