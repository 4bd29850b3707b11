use alloc::format;
use alloc::string::{String, ToString};

use og_schema::{ObjectId, Value};
use og_utils::hash::HashMap;

use crate::config::ReferenceMode;
use crate::error::MappingError;
use crate::path::Path;

// -----------------------------------------------------------------------------
// Visit

/// Outcome of [`ReferenceTracker::visit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Visit {
    /// The object was not seen before and must be written in full.
    First,
    /// The object was written completely; the payload is the value of the
    /// `reference` attribute that points to it.
    Seen(String),
    /// The object is still being written, so this is a cycle.
    InProgress(String),
}

// -----------------------------------------------------------------------------
// ReferenceTracker

#[derive(Debug)]
struct Entry {
    path: Path,
    id: usize,
    done: bool,
}

/// Per-call record of the objects written so far.
///
/// Paths are stored when an object is first seen; the reference
/// expression is only built when a repeat shows up.
#[derive(Debug)]
pub struct ReferenceTracker {
    mode: ReferenceMode,
    entries: HashMap<ObjectId, Entry>,
    next_id: usize,
}

impl ReferenceTracker {
    pub fn new(mode: ReferenceMode) -> Self {
        Self {
            mode,
            entries: HashMap::default(),
            next_id: 1,
        }
    }

    /// Records that `object` is about to be written at `at`.
    pub fn visit(&mut self, object: ObjectId, at: &Path) -> Visit {
        if let Some(entry) = self.entries.get(&object) {
            let reference = match self.mode {
                ReferenceMode::Relative => entry.path.relative_to(at),
                ReferenceMode::Absolute | ReferenceMode::Disabled => entry.path.to_string(),
                ReferenceMode::Id => entry.id.to_string(),
            };
            return if entry.done {
                Visit::Seen(reference)
            } else {
                Visit::InProgress(reference)
            };
        }

        self.entries.insert(
            object,
            Entry {
                path: at.clone(),
                id: self.next_id,
                done: false,
            },
        );
        self.next_id += 1;
        Visit::First
    }

    /// Returns the id given to `object` by its first visit.
    pub fn id_of(&self, object: ObjectId) -> Option<usize> {
        self.entries.get(&object).map(|entry| entry.id)
    }

    /// Records that `object` is written completely.
    ///
    /// Without tracking the object is forgotten, so a later occurrence is
    /// written again.
    pub fn finish(&mut self, object: ObjectId) {
        if self.mode == ReferenceMode::Disabled {
            self.entries.remove(&object);
        } else if let Some(entry) = self.entries.get_mut(&object) {
            entry.done = true;
        }
    }
}

// -----------------------------------------------------------------------------
// ReferenceResolver

/// Per-call index of the objects read so far, by path and by id.
#[derive(Debug)]
pub struct ReferenceResolver {
    mode: ReferenceMode,
    by_path: HashMap<Path, Value>,
    by_id: HashMap<String, Value>,
}

impl ReferenceResolver {
    pub fn new(mode: ReferenceMode) -> Self {
        Self {
            mode,
            by_path: HashMap::default(),
            by_id: HashMap::default(),
        }
    }

    /// Records that `value` was read at `at`, with an optional `id`.
    pub fn register(&mut self, at: &Path, id: Option<&str>, value: Value) {
        if let Some(id) = id {
            self.by_id.insert(String::from(id), value.clone());
        }
        self.by_path.insert(at.clone(), value);
    }

    /// Resolves the `reference` attribute of the node at `at`.
    pub fn resolve(&self, at: &Path, reference: &str) -> Result<Value, MappingError> {
        let found = match self.mode {
            ReferenceMode::Id => self.by_id.get(reference),
            _ => at.resolve(reference).and_then(|target| self.by_path.get(&target)),
        };
        found
            .cloned()
            .ok_or_else(|| MappingError::InvalidReference(format!("{reference} (from {at})")))
    }
}

// -----------------------------------------------------------------------------
// Tests
