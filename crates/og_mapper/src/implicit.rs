use alloc::string::String;
use alloc::vec::Vec;

use og_schema::{ClassId, ClassInfo, ClassKind, ClassRegistry, FieldKey};
use og_utils::hash::IdMap;

use crate::alias::AliasRegistry;
use crate::error::{ConfigError, MappingError};
use crate::fields::ClassDescriptor;

// -----------------------------------------------------------------------------
// ImplicitCollection

/// A field slot whose items are written as bare siblings, without a node
/// for the collection itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImplicitCollection {
    owner: ClassId,
    slot: FieldKey,
    item_name: Option<String>,
    item_type: Option<ClassId>,
    key_field: Option<String>,
}

impl ImplicitCollection {
    /// Returns the class the declaration was made on.
    ///
    /// This is the slot's declaring class or one of its subclasses.
    #[inline]
    pub const fn owner(&self) -> ClassId {
        self.owner
    }

    #[inline]
    pub fn slot(&self) -> &FieldKey {
        &self.slot
    }

    /// Returns the fixed name of the item nodes.
    ///
    /// Without one, each item is named after its runtime class.
    #[inline]
    pub fn item_name(&self) -> Option<&str> {
        self.item_name.as_deref()
    }

    #[inline]
    pub const fn item_type(&self) -> Option<ClassId> {
        self.item_type
    }

    /// Returns the item field that holds the map key of an implicit map.
    #[inline]
    pub fn key_field(&self) -> Option<&str> {
        self.key_field.as_deref()
    }
}

// -----------------------------------------------------------------------------
// ImplicitCollectionRegistry

/// Declarations of implicit collections, grouped by owner class.
#[derive(Debug, Clone, Default)]
pub struct ImplicitCollectionRegistry {
    by_owner: IdMap<ClassId, Vec<ImplicitCollection>>,
}

impl ImplicitCollectionRegistry {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.by_owner.is_empty()
    }

    /// Iterates the declarations made on `owner`.
    pub fn declared_on(&self, owner: ClassId) -> impl Iterator<Item = &ImplicitCollection> {
        self.by_owner.get(&owner).into_iter().flatten()
    }

    /// Declares the collection or array field `field`, as seen from
    /// `owner`, implicit for `owner` and its subclasses.
    ///
    /// Redeclaring the same slot on the same owner replaces the earlier
    /// declaration.
    pub fn declare(
        &mut self,
        classes: &ClassRegistry,
        owner: ClassId,
        field: &str,
        item_name: Option<&str>,
        item_type: Option<ClassId>,
    ) -> Result<(), ConfigError> {
        let (slot, kind) = Self::lookup(classes, owner, field)?;
        match kind {
            Some(ClassKind::Collection(_) | ClassKind::Array { .. }) => {}
            Some(ClassKind::Map) => {
                return Err(ConfigError::MissingKeyField {
                    class: String::from(classes.name_of(owner)),
                    field: String::from(field),
                });
            }
            _ => {
                return Err(ConfigError::NotACollection {
                    class: String::from(classes.name_of(owner)),
                    field: String::from(field),
                });
            }
        }
        self.insert(classes, owner, slot, item_name, item_type, None)
    }

    /// Declares the map field `field` implicit. Items are the map values;
    /// reading an item takes its key from the item's `key_field`.
    pub fn declare_map(
        &mut self,
        classes: &ClassRegistry,
        owner: ClassId,
        field: &str,
        item_name: Option<&str>,
        item_type: Option<ClassId>,
        key_field: &str,
    ) -> Result<(), ConfigError> {
        let (slot, kind) = Self::lookup(classes, owner, field)?;
        if kind != Some(ClassKind::Map) {
            return Err(ConfigError::NotAMap {
                class: String::from(classes.name_of(owner)),
                field: String::from(field),
            });
        }
        self.insert(classes, owner, slot, item_name, item_type, Some(key_field))
    }

    fn lookup(
        classes: &ClassRegistry,
        owner: ClassId,
        field: &str,
    ) -> Result<(FieldKey, Option<ClassKind>), ConfigError> {
        classes.get(owner).ok_or(ConfigError::UnknownClass(owner))?;
        let declaring = classes
            .nearest_declarer(owner, field)
            .ok_or_else(|| ConfigError::InvalidSlot {
                class: String::from(classes.name_of(owner)),
                field: String::from(field),
            })?;
        let kind = classes
            .own_field(declaring, field)
            .and_then(|info| classes.kind_of(info.ty()));
        Ok((FieldKey::new(declaring, field), kind))
    }

    fn insert(
        &mut self,
        classes: &ClassRegistry,
        owner: ClassId,
        slot: FieldKey,
        item_name: Option<&str>,
        item_type: Option<ClassId>,
        key_field: Option<&str>,
    ) -> Result<(), ConfigError> {
        if let Some(ty) = item_type {
            classes.get(ty).ok_or(ConfigError::UnknownClass(ty))?;
        }

        if let Some(name) = item_name
            && let Some(other) = self
                .declared_on(owner)
                .find(|d| d.slot != slot && d.item_name() == Some(name))
        {
            return Err(ConfigError::ConflictingDeclaration {
                class: String::from(classes.name_of(owner)),
                item: String::from(name),
                existing: other.slot.name.clone(),
            });
        }

        let decl = ImplicitCollection {
            owner,
            slot,
            item_name: item_name.map(String::from),
            item_type,
            key_field: key_field.map(String::from),
        };
        let declared = self.by_owner.entry(owner).or_default();
        match declared.iter_mut().find(|d| d.slot == decl.slot) {
            Some(old) => {
                log::debug!("implicit collection {} on `{}` redeclared", decl.slot, classes.name_of(owner));
                *old = decl;
            }
            None => {
                log::debug!("implicit collection {} on `{}`", decl.slot, classes.name_of(owner));
                declared.push(decl);
            }
        }
        Ok(())
    }

    /// Returns the declaration that applies to `slot` in an instance of
    /// `runtime`.
    ///
    /// Walks from `runtime` up to the slot's declaring class and takes the
    /// first owner that declared this exact slot. A class that hides the
    /// field name owns a different slot, so declarations never cross a
    /// shadowing boundary in either direction.
    pub fn resolve_for_marshal(
        &self,
        classes: &ClassRegistry,
        runtime: ClassId,
        slot: &FieldKey,
    ) -> Option<&ImplicitCollection> {
        let mut current = Some(runtime);
        while let Some(class) = current {
            if let Some(found) = self.declared_on(class).find(|d| d.slot == *slot) {
                return Some(found);
            }
            if class == slot.declaring {
                break;
            }
            current = classes.get(class).and_then(ClassInfo::parent);
        }
        None
    }

    /// Picks the implicit slot of `descriptor` that receives an element
    /// named `tag`, returning its index.
    ///
    /// An explicit item name equal to `tag` beats a match of the class
    /// named `tag` against the item type. Among the matches the slot of the
    /// most derived declaring class wins. `defined_in` restricts the search
    /// to the slots of that class.
    pub fn resolve_for_unmarshal(
        &self,
        classes: &ClassRegistry,
        aliases: &AliasRegistry,
        descriptor: &ClassDescriptor,
        tag: &str,
        defined_in: Option<ClassId>,
    ) -> Result<Option<usize>, MappingError> {
        if self.is_empty() {
            return Ok(None);
        }
        let candidates = implicit_slots(descriptor, defined_in);

        let named: Vec<usize> = candidates
            .iter()
            .filter(|(_, decl)| decl.item_name() == Some(tag))
            .map(|(index, _)| *index)
            .collect();
        if !named.is_empty() {
            return most_derived(classes, descriptor, &named, tag).map(Some);
        }

        let Ok(tag_type) = aliases.type_for_name(classes, tag) else {
            return Ok(None);
        };
        let typed: Vec<usize> = candidates
            .iter()
            .filter(|(index, decl)| {
                decl.item_name().is_none()
                    && classes.is_assignable(tag_type, descriptor.slots()[*index].item_type_for(decl))
            })
            .map(|(index, _)| *index)
            .collect();
        if typed.is_empty() {
            return Ok(None);
        }
        most_derived(classes, descriptor, &typed, tag).map(Some)
    }

    /// Picks the implicit slot that receives a null marker.
    ///
    /// The implicit slot that took the previous sibling element wins if
    /// the marker could have been written for it: same `defined_in` class,
    /// or no `defined_in` and a slot that is not shadowed. Otherwise the
    /// single implicit slot of the most derived declaring class among those
    /// of `defined_in`.
    pub fn resolve_null_for_unmarshal(
        &self,
        classes: &ClassRegistry,
        descriptor: &ClassDescriptor,
        defined_in: Option<ClassId>,
        previous: Option<usize>,
    ) -> Result<Option<usize>, MappingError> {
        if self.is_empty() {
            return Ok(None);
        }
        if let Some(index) = previous
            && let Some(slot) = descriptor.slots().get(index)
            && match defined_in {
                Some(class) => slot.declaring() == class,
                None => !slot.is_shadowed(),
            }
        {
            return Ok(Some(index));
        }
        let candidates: Vec<usize> = implicit_slots(descriptor, defined_in)
            .into_iter()
            .map(|(index, _)| index)
            .collect();
        if candidates.is_empty() {
            return Ok(None);
        }
        most_derived(classes, descriptor, &candidates, og_doc::Node::NULL).map(Some)
    }
}

fn implicit_slots(
    descriptor: &ClassDescriptor,
    defined_in: Option<ClassId>,
) -> Vec<(usize, &ImplicitCollection)> {
    descriptor
        .slots()
        .iter()
        .enumerate()
        .filter(|(_, slot)| defined_in.is_none_or(|class| slot.key().declaring == class))
        .filter_map(|(index, slot)| Some((index, slot.implicit()?)))
        .collect()
}

fn depth(classes: &ClassRegistry, class: ClassId) -> usize {
    let mut depth = 0;
    let mut current = classes.get(class).and_then(ClassInfo::parent);
    while let Some(parent) = current {
        depth += 1;
        current = classes.get(parent).and_then(ClassInfo::parent);
    }
    depth
}

fn most_derived(
    classes: &ClassRegistry,
    descriptor: &ClassDescriptor,
    matches: &[usize],
    tag: &str,
) -> Result<usize, MappingError> {
    let level = |i: usize| depth(classes, descriptor.slots()[i].key().declaring);
    let deepest = matches.iter().map(|&i| level(i)).max().unwrap_or_default();
    let mut best = matches.iter().copied().filter(|&i| level(i) == deepest);
    match (best.next(), best.next()) {
        (Some(index), None) => Ok(index),
        _ => Err(MappingError::AmbiguousMapping {
            class: String::from(classes.name_of(descriptor.class())),
            tag: String::from(tag),
        }),
    }
}

// -----------------------------------------------------------------------------
// Tests
