use alloc::string::{String, ToString};
use alloc::vec;
use alloc::vec::Vec;
use core::fmt;

use og_utils::hash::HashMap;

// -----------------------------------------------------------------------------
// PathSegment

/// One step of a [`Path`]: a node name and its 1-based position among the
/// preceding siblings of the same name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PathSegment {
    name: String,
    index: usize,
}

impl PathSegment {
    #[inline]
    pub fn new(name: impl Into<String>, index: usize) -> Self {
        Self {
            name: name.into(),
            index,
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub const fn index(&self) -> usize {
        self.index
    }

    fn parse(text: &str) -> Option<Self> {
        let Some(open) = text.find('[') else {
            return (!text.is_empty()).then(|| Self::new(text, 1));
        };
        let index = text[open + 1..].strip_suffix(']')?.parse().ok()?;
        (index > 0 && open > 0).then(|| Self::new(&text[..open], index))
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if self.index > 1 {
            write!(f, "[{}]", self.index)?;
        }
        Ok(())
    }
}

// -----------------------------------------------------------------------------
// Path

/// Absolute location of a node in a document.
///
/// Displayed as `/list/farm/animal[2]`; the position is left out when it
/// is 1.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Path {
    segments: Vec<PathSegment>,
}

impl Path {
    #[inline]
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    #[inline]
    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    /// Returns the expression that leads from `from` to `self`.
    ///
    /// ```
    /// use og_mapper::path::{Path, PathSegment};
    ///
    /// let cow = Path::from_iter([PathSegment::new("list", 1), PathSegment::new("animal", 1)]);
    /// let here = Path::from_iter([
    ///     PathSegment::new("list", 1),
    ///     PathSegment::new("farm", 1),
    ///     PathSegment::new("animal", 1),
    /// ]);
    /// assert_eq!(cow.relative_to(&here), "../../animal");
    /// ```
    pub fn relative_to(&self, from: &Path) -> String {
        let common = self
            .segments
            .iter()
            .zip(from.segments.iter())
            .take_while(|(a, b)| a == b)
            .count();

        let mut parts: Vec<String> = vec![String::from(".."); from.depth() - common];
        parts.extend(self.segments[common..].iter().map(ToString::to_string));

        if parts.is_empty() {
            String::from(".")
        } else {
            parts.join("/")
        }
    }

    /// Applies `expression` to this path.
    ///
    /// Expressions starting with `/` are absolute. Returns `None` for a
    /// malformed expression or one that climbs above the root.
    pub fn resolve(&self, expression: &str) -> Option<Path> {
        let (mut path, rest) = match expression.strip_prefix('/') {
            Some(rest) => (Path::default(), rest),
            None => (self.clone(), expression),
        };
        for part in rest.split('/') {
            match part {
                "" | "." => {}
                ".." => {
                    path.segments.pop()?;
                }
                _ => path.segments.push(PathSegment::parse(part)?),
            }
        }
        Some(path)
    }
}

impl FromIterator<PathSegment> for Path {
    fn from_iter<T: IntoIterator<Item = PathSegment>>(iter: T) -> Self {
        Self {
            segments: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return f.write_str("/");
        }
        for segment in &self.segments {
            write!(f, "/{segment}")?;
        }
        Ok(())
    }
}

// -----------------------------------------------------------------------------
// PathTracker

/// Follows the position of a writer or reader in the document.
///
/// Each level counts the names of the children seen so far, which yields
/// the positional index of the next child.
#[derive(Debug, Clone)]
pub struct PathTracker {
    path: Path,
    counters: Vec<HashMap<String, usize>>,
}

impl Default for PathTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl PathTracker {
    pub fn new() -> Self {
        Self {
            path: Path::default(),
            counters: vec![HashMap::default()],
        }
    }

    /// Enters a child node named `name`.
    pub fn push(&mut self, name: &str) {
        let index = match self.counters.last_mut() {
            Some(counts) => {
                let count = counts.entry_ref(name).or_insert(0);
                *count += 1;
                *count
            }
            None => 1,
        };
        self.path.segments.push(PathSegment::new(name, index));
        self.counters.push(HashMap::default());
    }

    /// Leaves the current node.
    pub fn pop(&mut self) {
        self.path.segments.pop();
        if self.counters.len() > 1 {
            self.counters.pop();
        }
    }

    #[inline]
    pub fn current(&self) -> &Path {
        &self.path
    }
}

// -----------------------------------------------------------------------------
// Tests
