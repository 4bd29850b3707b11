use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use og_schema::{ClassId, ClassKind, ClassRegistry, FieldKey};
use og_utils::hash::HashSet;

use crate::alias::AliasRegistry;
use crate::error::{ConfigError, MappingError};
use crate::implicit::{ImplicitCollection, ImplicitCollectionRegistry};

// -----------------------------------------------------------------------------
// FieldSlot

/// A serializable field of a class, identified by its declaring class and
/// its name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSlot {
    key: FieldKey,
    declared_type: ClassId,
    item_type: Option<ClassId>,
    key_type: Option<ClassId>,
    external_name: String,
    shadowed: bool,
    shadows: bool,
    implicit: Option<ImplicitCollection>,
}

impl FieldSlot {
    #[inline]
    pub fn key(&self) -> &FieldKey {
        &self.key
    }

    #[inline]
    pub const fn declaring(&self) -> ClassId {
        self.key.declaring
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.key.name
    }

    #[inline]
    pub const fn declared_type(&self) -> ClassId {
        self.declared_type
    }

    /// Returns the declared element type, or map value type.
    #[inline]
    pub const fn item_type(&self) -> Option<ClassId> {
        self.item_type
    }

    #[inline]
    pub const fn key_type(&self) -> Option<ClassId> {
        self.key_type
    }

    /// Returns the node name of the field.
    #[inline]
    pub fn external_name(&self) -> &str {
        &self.external_name
    }

    /// Returns `true` if a more derived class declares a field of the
    /// same name. Such slots are written with a `defined-in` attribute.
    #[inline]
    pub const fn is_shadowed(&self) -> bool {
        self.shadowed
    }

    /// Returns `true` if an ancestor declares a field of the same name.
    #[inline]
    pub const fn shadows(&self) -> bool {
        self.shadows
    }

    /// Returns the implicit collection declaration in effect for this slot
    /// in the described class.
    #[inline]
    pub fn implicit(&self) -> Option<&ImplicitCollection> {
        self.implicit.as_ref()
    }

    /// Returns the type of the items of `decl` on this slot.
    pub fn item_type_for(&self, decl: &ImplicitCollection) -> ClassId {
        decl.item_type()
            .or(self.item_type)
            .unwrap_or(ClassId::OBJECT)
    }
}

// -----------------------------------------------------------------------------
// ClassDescriptor

/// The ordered field slots of a class, inherited ones included.
///
/// Slots are ordered base class first; within a class they keep the
/// declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassDescriptor {
    class: ClassId,
    slots: Vec<FieldSlot>,
}

impl ClassDescriptor {
    #[inline]
    pub const fn class(&self) -> ClassId {
        self.class
    }

    #[inline]
    pub fn slots(&self) -> &[FieldSlot] {
        &self.slots
    }

    /// Returns the slot `key`. Fails if the class has no such slot.
    pub fn slot(&self, key: &FieldKey) -> Result<&FieldSlot, MappingError> {
        self.slots
            .iter()
            .find(|slot| slot.key == *key)
            .ok_or_else(|| MappingError::InvalidSlot {
                class: format!("{}", self.class),
                field: format!("{key}"),
            })
    }

    /// Finds the ordinary (not implicit) slot written as `name`.
    ///
    /// With `defined_in` only the slot of that class matches, otherwise the
    /// most derived one.
    pub fn find_ordinary(&self, name: &str, defined_in: Option<ClassId>) -> Option<usize> {
        self.slots
            .iter()
            .enumerate()
            .rev()
            .filter(|(_, slot)| slot.implicit.is_none() && slot.external_name == name)
            .find(|(_, slot)| defined_in.is_none_or(|class| slot.declaring() == class))
            .map(|(index, _)| index)
    }
}

// -----------------------------------------------------------------------------
// FieldResolver

/// Collects the slots of classes from a [`ClassRegistry`].
///
/// Transient, static and omitted fields produce no slot.
pub struct FieldResolver<'a> {
    classes: &'a ClassRegistry,
    aliases: &'a AliasRegistry,
    implicits: &'a ImplicitCollectionRegistry,
}

impl<'a> FieldResolver<'a> {
    pub fn new(
        classes: &'a ClassRegistry,
        aliases: &'a AliasRegistry,
        implicits: &'a ImplicitCollectionRegistry,
    ) -> Self {
        Self {
            classes,
            aliases,
            implicits,
        }
    }

    /// Describes `class`. Classes other than object classes have no slots.
    pub fn describe(&self, class: ClassId) -> Result<ClassDescriptor, ConfigError> {
        let info = self.classes.get(class).ok_or(ConfigError::UnknownClass(class))?;
        if info.kind() != ClassKind::Object {
            return Ok(ClassDescriptor {
                class,
                slots: Vec::new(),
            });
        }

        let lineage = self.classes.lineage(class);
        let mut slots = Vec::new();
        let mut seen: HashSet<&str> = HashSet::default();

        for (level, &owner) in lineage.iter().enumerate() {
            let Some(owner_info) = self.classes.get(owner) else {
                continue;
            };
            for field in owner_info.fields() {
                let shadows = !seen.insert(field.name());
                let key = FieldKey::new(owner, field.name());
                if !field.is_serializable() || self.aliases.is_omitted(&key) {
                    continue;
                }

                let shadowed = lineage[level + 1..]
                    .iter()
                    .any(|&derived| self.classes.own_field(derived, field.name()).is_some());
                let implicit = self
                    .implicits
                    .resolve_for_marshal(self.classes, class, &key)
                    .cloned();

                slots.push(FieldSlot {
                    external_name: String::from(self.aliases.name_for_field(&key)),
                    key,
                    declared_type: field.ty(),
                    item_type: field.item().or_else(|| self.classes.array_item(field.ty())),
                    key_type: field.key(),
                    shadowed,
                    shadows,
                    implicit,
                });
            }
        }

        log::trace!("`{}` has {} field slot(s)", info.name(), slots.len());
        Ok(ClassDescriptor { class, slots })
    }

    /// Returns the slot `field` as seen from `class`.
    ///
    /// Fails with [`MappingError::InvalidSlot`] when neither `class` nor an
    /// ancestor declares the field.
    pub fn resolve_slot(&self, class: ClassId, field: &str) -> Result<FieldKey, MappingError> {
        self.classes
            .nearest_declarer(class, field)
            .map(|declaring| FieldKey::new(declaring, field))
            .ok_or_else(|| MappingError::InvalidSlot {
                class: String::from(self.classes.name_of(class)),
                field: String::from(field),
            })
    }
}

// -----------------------------------------------------------------------------
// Tests
