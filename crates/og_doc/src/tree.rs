use alloc::string::String;
use alloc::vec::Vec;

use crate::error::DocError;
use crate::node::Node;
use crate::stream::{NodeReader, NodeWriter};

// -----------------------------------------------------------------------------
// TreeWriter

/// A [`NodeWriter`] that builds a [`Node`] tree in memory.
///
/// # Examples
///
/// ```
/// use og_doc::{NodeWriter, TreeWriter};
///
/// let mut writer = TreeWriter::new();
/// writer.open_node("farm").unwrap();
/// writer.open_node("size").unwrap();
/// writer.write_text("100").unwrap();
/// writer.close_node().unwrap();
/// writer.close_node().unwrap();
///
/// let root = writer.finish().unwrap();
/// assert_eq!(root.child("size").unwrap().text(), Some("100"));
/// ```
#[derive(Debug, Default)]
pub struct TreeWriter {
    stack: Vec<Node>,
    root: Option<Node>,
}

impl TreeWriter {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the finished root node.
    pub fn finish(self) -> Result<Node, DocError> {
        if !self.stack.is_empty() {
            return Err(DocError::Unclosed(self.stack.len()));
        }
        self.root.ok_or(DocError::Empty)
    }
}

impl NodeWriter for TreeWriter {
    fn open_node(&mut self, name: &str) -> Result<(), DocError> {
        if self.stack.is_empty() && self.root.is_some() {
            return Err(DocError::MultipleRoots(String::from(name)));
        }
        self.stack.push(Node::new(name));
        Ok(())
    }

    fn write_attribute(&mut self, key: &str, value: &str) -> Result<(), DocError> {
        let node = self.stack.last_mut().ok_or(DocError::NoOpenNode)?;
        if node.text().is_some() || !node.children().is_empty() {
            return Err(DocError::AttributeAfterContent(String::from(key)));
        }
        node.set_attribute(key, value);
        Ok(())
    }

    fn write_text(&mut self, text: &str) -> Result<(), DocError> {
        let node = self.stack.last_mut().ok_or(DocError::NoOpenNode)?;
        node.push_text(text);
        Ok(())
    }

    fn close_node(&mut self) -> Result<(), DocError> {
        let node = self.stack.pop().ok_or(DocError::NoOpenNode)?;
        match self.stack.last_mut() {
            Some(parent) => parent.push_child(node),
            None => self.root = Some(node),
        }
        Ok(())
    }
}

// -----------------------------------------------------------------------------
// TreeReader

/// A [`NodeReader`] over a borrowed [`Node`] tree.
#[derive(Debug)]
pub struct TreeReader<'a> {
    root: &'a Node,
    started: bool,
    // Each entry is a node and the index of its next unread child.
    stack: Vec<(&'a Node, usize)>,
}

impl<'a> TreeReader<'a> {
    #[inline]
    pub fn new(root: &'a Node) -> Self {
        Self {
            root,
            started: false,
            stack: Vec::new(),
        }
    }

    /// Returns the node the cursor is on.
    #[inline]
    pub fn current(&self) -> Option<&'a Node> {
        self.stack.last().map(|(node, _)| *node)
    }

    /// Returns how many nodes are entered.
    #[inline]
    pub fn depth(&self) -> usize {
        self.stack.len()
    }
}

impl<'a> NodeReader for TreeReader<'a> {
    fn next_node(&mut self) -> Result<Option<String>, DocError> {
        let Some((node, next)) = self.stack.last_mut() else {
            if self.started {
                return Ok(None);
            }
            self.started = true;
            self.stack.push((self.root, 0));
            return Ok(Some(String::from(self.root.name())));
        };
        let node: &'a Node = *node;
        match node.children().get(*next) {
            Some(child) => {
                *next += 1;
                self.stack.push((child, 0));
                Ok(Some(String::from(child.name())))
            }
            None => Ok(None),
        }
    }

    fn attribute(&self, key: &str) -> Option<&str> {
        self.current()?.attribute(key)
    }

    fn text(&self) -> Option<&str> {
        self.current()?.text()
    }

    fn leave_node(&mut self) -> Result<(), DocError> {
        self.stack.pop().map(|_| ()).ok_or(DocError::NoOpenNode)
    }
}

// -----------------------------------------------------------------------------
// Tests
