use alloc::string::String;
use alloc::vec::Vec;

// -----------------------------------------------------------------------------
// Node

/// A document node.
///
/// A node has a name, ordered attributes, optional text and ordered
/// children. The node named `null` with no content is the null marker.
///
/// # Examples
///
/// ```
/// use og_doc::Node;
///
/// let farm = Node::new("farm")
///     .with_child(Node::new("size").with_text("100"))
///     .with_child(Node::null());
///
/// assert_eq!(farm.children().len(), 2);
/// assert!(farm.children()[1].is_null_marker());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Node {
    name: String,
    attributes: Vec<(String, String)>,
    text: Option<String>,
    children: Vec<Node>,
}

impl Node {
    /// The name of the null marker.
    pub const NULL: &'static str = "null";

    /// Creates an empty node.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Creates the null marker.
    pub fn null() -> Self {
        Self::new(Self::NULL)
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attribute(key, value);
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn attributes(&self) -> &[(String, String)] {
        &self.attributes
    }

    /// Returns the value of attribute `key`.
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Sets attribute `key`, keeping its position if already present.
    pub fn set_attribute(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(k, _)| *k == key) {
            Some((_, v)) => *v = value,
            None => self.attributes.push((key, value)),
        }
    }

    #[inline]
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Appends `text` to the node's text.
    pub fn push_text(&mut self, text: &str) {
        self.text.get_or_insert_with(String::new).push_str(text);
    }

    #[inline]
    pub fn children(&self) -> &[Node] {
        &self.children
    }

    pub fn push_child(&mut self, child: Node) {
        self.children.push(child);
    }

    /// Returns the first child named `name`.
    pub fn child(&self, name: &str) -> Option<&Node> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Returns `true` for a childless, textless node named `null`.
    pub fn is_null_marker(&self) -> bool {
        self.name == Self::NULL && self.children.is_empty() && self.text.is_none()
    }
}
