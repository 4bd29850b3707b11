use alloc::string::String;

use serde::{Deserialize, Serialize};

// -----------------------------------------------------------------------------
// ReferenceMode

/// How repeated objects are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceMode {
    /// `reference` holds a path relative to the referencing node,
    /// e.g. `../farm/animal[2]`.
    #[default]
    Relative,
    /// `reference` holds a path from the document root, e.g.
    /// `/list/farm/animal[2]`.
    Absolute,
    /// Every object node gets an `id`; `reference` holds that id.
    Id,
    /// No tracking. Repeated objects are written again and a cycle is
    /// always an error.
    Disabled,
}

// -----------------------------------------------------------------------------
// CyclePolicy

/// What to do when an object contains itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CyclePolicy {
    /// Write a reference to the enclosing node.
    #[default]
    Reference,
    /// Fail with [`MappingError::CyclicReference`](crate::MappingError::CyclicReference).
    Error,
}

// -----------------------------------------------------------------------------
// SystemAttributes

/// Names of the attributes the mapper writes for itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemAttributes {
    pub reference: String,
    pub defined_in: String,
    pub class: String,
    pub id: String,
}

impl Default for SystemAttributes {
    fn default() -> Self {
        Self {
            reference: String::from("reference"),
            defined_in: String::from("defined-in"),
            class: String::from("class"),
            id: String::from("id"),
        }
    }
}

// -----------------------------------------------------------------------------
// MapperConfig

/// Behavior switches of a [`Mapper`](crate::Mapper).
///
/// Every field has a default, so partial documents deserialize:
///
/// ```
/// use og_mapper::{MapperConfig, ReferenceMode};
///
/// let config: MapperConfig = serde_json::from_str(r#"{ "reference_mode": "id" }"#).unwrap();
/// assert_eq!(config.reference_mode, ReferenceMode::Id);
/// assert!(!config.ignore_unknown_elements);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MapperConfig {
    pub reference_mode: ReferenceMode,
    pub cycle_policy: CyclePolicy,
    /// Skip child elements that match no field instead of failing.
    pub ignore_unknown_elements: bool,
    pub attributes: SystemAttributes,
}

// -----------------------------------------------------------------------------
// Tests
