use alloc::format;
use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;

use og_utils::hash::{HashMap, IdMap};

use crate::class::{ClassBuilder, ClassFlags, ClassId, ClassInfo, ClassKind};
use crate::class::{CollectionKind, FieldInfo, LeafKind};
use crate::error::SchemaError;

// -----------------------------------------------------------------------------
// ClassRegistry

/// The central store of class descriptions.
///
/// A new registry already contains the built-in classes, whose ids are
/// the associated constants of [`ClassId`]:
///
/// - `Object` (abstract root) and `null`
/// - leaves `bool` `i64` `f64` `char` `String`
/// - abstract `List` `Set` `Map`
/// - `Vec` `VecDeque` (List), `HashSet` `IndexSet` (Set), `HashMap` `IndexMap` (Map)
///
/// Classes are never removed, so a [`ClassId`] stays valid for the
/// lifetime of the registry.
#[derive(Debug, Clone)]
pub struct ClassRegistry {
    classes: Vec<ClassInfo>,
    by_name: HashMap<String, ClassId>,
    arrays: IdMap<ClassId, ClassId>,
}

impl Default for ClassRegistry {
    /// See [`ClassRegistry::new`] .
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl ClassRegistry {
    /// Create a registry with the built-in classes.
    pub fn new() -> Self {
        let mut registry = Self {
            classes: Vec::new(),
            by_name: HashMap::default(),
            arrays: IdMap::default(),
        };

        let abs = ClassFlags::ABSTRACT;
        let builtin: [(&str, ClassKind, ClassFlags, &[ClassId]); ClassId::BUILTIN_COUNT as usize] = [
            ("Object", ClassKind::Object, abs, &[]),
            ("null", ClassKind::Null, ClassFlags::empty(), &[]),
            ("bool", ClassKind::Leaf(LeafKind::Bool), ClassFlags::empty(), &[]),
            ("i64", ClassKind::Leaf(LeafKind::Int), ClassFlags::empty(), &[]),
            ("f64", ClassKind::Leaf(LeafKind::Float), ClassFlags::empty(), &[]),
            ("char", ClassKind::Leaf(LeafKind::Char), ClassFlags::empty(), &[]),
            ("String", ClassKind::Leaf(LeafKind::Text), ClassFlags::empty(), &[]),
            ("List", ClassKind::Collection(CollectionKind::List), abs, &[]),
            ("Set", ClassKind::Collection(CollectionKind::Set), abs, &[]),
            ("Map", ClassKind::Map, abs, &[]),
            ("Vec", ClassKind::Collection(CollectionKind::List), ClassFlags::empty(), &[ClassId::LIST]),
            ("VecDeque", ClassKind::Collection(CollectionKind::List), ClassFlags::empty(), &[ClassId::LIST]),
            ("HashSet", ClassKind::Collection(CollectionKind::Set), ClassFlags::empty(), &[ClassId::SET]),
            ("IndexSet", ClassKind::Collection(CollectionKind::Set), ClassFlags::empty(), &[ClassId::SET]),
            ("HashMap", ClassKind::Map, ClassFlags::empty(), &[ClassId::MAP]),
            ("IndexMap", ClassKind::Map, ClassFlags::empty(), &[ClassId::MAP]),
        ];

        for (name, kind, flags, interfaces) in builtin {
            registry.push(ClassInfo {
                id: ClassId(0),
                name: String::from(name),
                kind,
                parent: None,
                interfaces: interfaces.to_vec(),
                fields: Vec::new(),
                flags,
            });
        }

        debug_assert_eq!(registry.by_name.get("IndexMap"), Some(&ClassId::INDEX_MAP));
        registry
    }

    fn push(&mut self, mut info: ClassInfo) -> ClassId {
        let id = ClassId(self.classes.len() as u32);
        info.id = id;
        self.by_name.insert(info.name.clone(), id);
        self.classes.push(info);
        id
    }

    /// Adds a class described by `builder`.
    ///
    /// Fails when the name is taken, when a referenced class is unknown,
    /// when the parent is not an object class, or when a field name is
    /// declared twice by the same class. Redeclaring a field of an
    /// ancestor is allowed; it creates a second, independent field.
    pub fn register(&mut self, builder: ClassBuilder) -> Result<ClassId, SchemaError> {
        if self.by_name.contains_key(&builder.name) {
            return Err(SchemaError::DuplicateClass(builder.name));
        }

        if let Some(parent) = builder.parent {
            let info = self.get(parent).ok_or(SchemaError::UnknownClass(parent))?;
            if info.kind != ClassKind::Object || builder.kind != ClassKind::Object {
                return Err(SchemaError::InvalidParent {
                    class: builder.name,
                    parent: String::from(info.name()),
                });
            }
        }

        for &interface in &builder.interfaces {
            self.get(interface).ok_or(SchemaError::UnknownClass(interface))?;
        }

        for (index, field) in builder.fields.iter().enumerate() {
            for ty in [Some(field.ty), field.item, field.key].into_iter().flatten() {
                self.get(ty).ok_or(SchemaError::UnknownClass(ty))?;
            }
            if builder.fields[..index].iter().any(|f| f.name == field.name) {
                return Err(SchemaError::DuplicateField {
                    class: builder.name,
                    field: field.name.clone(),
                });
            }
        }

        let id = self.push(ClassInfo {
            id: ClassId(0),
            name: builder.name,
            kind: builder.kind,
            parent: builder.parent,
            interfaces: builder.interfaces,
            fields: builder.fields,
            flags: builder.flags,
        });

        log::debug!("registered class `{}` as {id}", self.classes[id.index()].name);
        Ok(id)
    }

    /// Returns the array class of `item`, creating it on first use.
    ///
    /// Array classes are named `<item>[]`.
    pub fn array_of(&mut self, item: ClassId) -> Result<ClassId, SchemaError> {
        if let Some(&id) = self.arrays.get(&item) {
            return Ok(id);
        }
        let item_name = self.get(item).ok_or(SchemaError::UnknownClass(item))?.name();
        let name = format!("{item_name}[]");
        let id = self.push(ClassInfo {
            id: ClassId(0),
            name,
            kind: ClassKind::Array { item },
            parent: None,
            interfaces: Vec::new(),
            fields: Vec::new(),
            flags: ClassFlags::empty(),
        });
        self.arrays.insert(item, id);
        Ok(id)
    }

    /// Returns the array class of `item`, if one was created.
    #[inline]
    pub fn find_array(&self, item: ClassId) -> Option<ClassId> {
        self.arrays.get(&item).copied()
    }

    /// Returns the class with the given id.
    #[inline]
    pub fn get(&self, id: ClassId) -> Option<&ClassInfo> {
        self.classes.get(id.index())
    }

    /// Returns the class registered under the runtime `name`.
    pub fn by_name(&self, name: &str) -> Option<ClassId> {
        self.by_name.get(name).copied()
    }

    /// Returns the runtime name, or `"?"` for an unknown id.
    pub fn name_of(&self, id: ClassId) -> &str {
        self.get(id).map(ClassInfo::name).unwrap_or("?")
    }

    /// Returns the kind of the class, if registered.
    #[inline]
    pub fn kind_of(&self, id: ClassId) -> Option<ClassKind> {
        self.get(id).map(ClassInfo::kind)
    }

    /// Iterates every registered class in registration order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &ClassInfo> {
        self.classes.iter()
    }

    /// Returns the number of registered classes.
    #[inline]
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// Returns the parent chain of `id`, root ancestor first, `id` last.
    ///
    /// Returns an empty list for an unknown id.
    pub fn lineage(&self, id: ClassId) -> Vec<ClassId> {
        let mut chain = Vec::new();
        let mut current = self.get(id).map(|_| id);
        while let Some(class) = current {
            chain.push(class);
            current = self.classes[class.index()].parent;
        }
        chain.reverse();
        chain
    }

    /// Returns `true` if a value of class `sub` can be stored where `sup`
    /// is expected.
    ///
    /// Reflexive. Walks parents and interfaces; every class is assignable
    /// to [`ClassId::OBJECT`].
    pub fn is_assignable(&self, sub: ClassId, sup: ClassId) -> bool {
        if sub == sup || sup == ClassId::OBJECT {
            return true;
        }
        let mut pending = vec![sub];
        while let Some(class) = pending.pop() {
            let Some(info) = self.get(class) else {
                continue;
            };
            for next in info.parent.iter().chain(info.interfaces.iter()) {
                if *next == sup {
                    return true;
                }
                pending.push(*next);
            }
        }
        false
    }

    /// Returns the field `name` declared by `class` itself.
    pub fn own_field(&self, class: ClassId, name: &str) -> Option<&FieldInfo> {
        self.get(class)?.field(name)
    }

    /// Returns the closest class, starting at `class` and walking up the
    /// parents, that declares a field named `name`.
    pub fn nearest_declarer(&self, class: ClassId, name: &str) -> Option<ClassId> {
        let mut current = self.get(class).map(|_| class);
        while let Some(id) = current {
            let info = &self.classes[id.index()];
            if info.field(name).is_some() {
                return Some(id);
            }
            current = info.parent;
        }
        None
    }

    /// Returns the element type of an array class.
    pub fn array_item(&self, id: ClassId) -> Option<ClassId> {
        match self.kind_of(id)? {
            ClassKind::Array { item } => Some(item),
            _ => None,
        }
    }
}

// -----------------------------------------------------------------------------
// Tests
