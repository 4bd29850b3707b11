use alloc::boxed::Box;
use alloc::string::{String, ToString};
use core::fmt;

use og_schema::{ClassId, ClassKind, ClassRegistry, Leaf, LeafKind, Scalar, Value};
use og_utils::hash::IdMap;
use thiserror::Error;

use crate::error::{ConfigError, MappingError};

// -----------------------------------------------------------------------------
// ConversionError

/// A leaf value that has no text form, or a text that is no valid leaf.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("`{text}` is not a valid {expected}")]
pub struct ConversionError {
    text: String,
    expected: &'static str,
}

impl ConversionError {
    #[inline]
    pub fn new(text: impl Into<String>, expected: &'static str) -> Self {
        Self {
            text: text.into(),
            expected,
        }
    }

    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[inline]
    pub const fn expected(&self) -> &'static str {
        self.expected
    }
}

// -----------------------------------------------------------------------------
// ValueConverter

/// Reads and writes the text form of a leaf class.
pub trait ValueConverter: Send + Sync {
    fn to_text(&self, scalar: &Scalar) -> Result<String, ConversionError>;

    fn from_text(&self, text: &str) -> Result<Scalar, ConversionError>;
}

/// The converter used for a leaf class without a registered one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DefaultConverter(pub LeafKind);

impl DefaultConverter {
    const fn expected(self) -> &'static str {
        match self.0 {
            LeafKind::Bool => "bool",
            LeafKind::Int => "integer",
            LeafKind::Float => "float",
            LeafKind::Char => "char",
            LeafKind::Text => "string",
        }
    }
}

impl ValueConverter for DefaultConverter {
    fn to_text(&self, scalar: &Scalar) -> Result<String, ConversionError> {
        if scalar.kind() != self.0 {
            return Err(ConversionError::new(scalar.to_string(), self.expected()));
        }
        Ok(scalar.to_string())
    }

    fn from_text(&self, text: &str) -> Result<Scalar, ConversionError> {
        let error = || ConversionError::new(text, self.expected());
        Ok(match self.0 {
            LeafKind::Bool => Scalar::Bool(text.trim().parse().map_err(|_| error())?),
            LeafKind::Int => Scalar::Int(text.trim().parse().map_err(|_| error())?),
            LeafKind::Float => Scalar::Float(text.trim().parse().map_err(|_| error())?),
            LeafKind::Char => {
                let mut chars = text.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Scalar::Char(c),
                    _ => return Err(error()),
                }
            }
            LeafKind::Text => Scalar::Text(String::from(text)),
        })
    }
}

static BOOL: DefaultConverter = DefaultConverter(LeafKind::Bool);
static INT: DefaultConverter = DefaultConverter(LeafKind::Int);
static FLOAT: DefaultConverter = DefaultConverter(LeafKind::Float);
static CHAR: DefaultConverter = DefaultConverter(LeafKind::Char);
static TEXT: DefaultConverter = DefaultConverter(LeafKind::Text);

// -----------------------------------------------------------------------------
// ConverterRegistry

/// Converters of leaf classes, by class.
#[derive(Default)]
pub struct ConverterRegistry {
    custom: IdMap<ClassId, Box<dyn ValueConverter>>,
}

impl fmt::Debug for ConverterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConverterRegistry")
            .field("custom", &self.custom.keys())
            .finish()
    }
}

impl ConverterRegistry {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses `converter` for the leaf class `class`, replacing any earlier
    /// one.
    pub fn register(
        &mut self,
        classes: &ClassRegistry,
        class: ClassId,
        converter: impl ValueConverter + 'static,
    ) -> Result<(), ConfigError> {
        let info = classes.get(class).ok_or(ConfigError::UnknownClass(class))?;
        if !matches!(info.kind(), ClassKind::Leaf(_)) {
            return Err(ConfigError::NotALeaf(String::from(info.name())));
        }
        if self.custom.insert(class, Box::new(converter)).is_some() {
            log::debug!("converter of `{}` replaced", info.name());
        }
        Ok(())
    }

    /// Returns the converter of `class`, `None` if it is no leaf class.
    pub fn get(&self, classes: &ClassRegistry, class: ClassId) -> Option<&dyn ValueConverter> {
        if let Some(converter) = self.custom.get(&class) {
            return Some(converter.as_ref());
        }
        let ClassKind::Leaf(kind) = classes.kind_of(class)? else {
            return None;
        };
        Some(match kind {
            LeafKind::Bool => &BOOL,
            LeafKind::Int => &INT,
            LeafKind::Float => &FLOAT,
            LeafKind::Char => &CHAR,
            LeafKind::Text => &TEXT,
        })
    }

    /// Writes `leaf` as text.
    pub fn to_text(&self, classes: &ClassRegistry, leaf: &Leaf) -> Result<String, MappingError> {
        let converter = self.require(classes, leaf.class)?;
        converter
            .to_text(&leaf.scalar)
            .map_err(|source| MappingError::Conversion {
                class: String::from(classes.name_of(leaf.class)),
                source,
            })
    }

    /// Reads a leaf of class `class` from `text`.
    pub fn from_text(
        &self,
        classes: &ClassRegistry,
        class: ClassId,
        text: &str,
    ) -> Result<Value, MappingError> {
        let converter = self.require(classes, class)?;
        let scalar = converter
            .from_text(text)
            .map_err(|source| MappingError::Conversion {
                class: String::from(classes.name_of(class)),
                source,
            })?;
        Ok(Value::leaf(class, scalar))
    }

    fn require(&self, classes: &ClassRegistry, class: ClassId) -> Result<&dyn ValueConverter, MappingError> {
        self.get(classes, class).ok_or_else(|| MappingError::UnexpectedKind {
            class: String::from(classes.name_of(class)),
            expected: "a leaf class",
        })
    }
}

// -----------------------------------------------------------------------------
// Tests
