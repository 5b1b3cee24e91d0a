//! Arena-backed syntax tree.
//!
//! Nodes live in a single `Vec` and refer to each other by [`NodeId`], so
//! ancestry checks never depend on object identity. Leaves carry source
//! text; composite nodes carry only their children, and their text is the
//! concatenation of their leaves.
//!
//! The mutation API is deliberately narrow: leaf text can be replaced and new
//! leaves can be inserted, but structural nodes are never removed or moved.
//! A traversal holding `NodeId`s therefore stays valid while fixes are
//! applied.

use std::ops::Range;

use crate::kind::NodeKind;
use thiserror::Error;

/// Stable handle to a node inside a [`SyntaxTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone)]
struct NodeData {
    kind: NodeKind,
    text: String,
    parent: Option<NodeId>,
    /// Position among the parent's children.
    slot: usize,
    children: Vec<NodeId>,
}

/// Errors raised while assembling a tree with [`TreeBuilder`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    /// `finish` was called before any node was started.
    #[error("tree has no root node")]
    Empty,
    /// `finish` was called while nodes were still open.
    #[error("{0} node(s) were never finished")]
    Unclosed(usize),
    /// `finish_node` was called with no open node.
    #[error("finish_node called without a matching start_node")]
    Unbalanced,
    /// A second top-level node was started.
    #[error("tree already has a root node")]
    MultipleRoots,
    /// A token was added outside of any node.
    #[error("token added outside of any node")]
    TokenOutsideNode,
}

/// A syntax tree owned by a single traversal at a time.
#[derive(Debug, Clone)]
pub struct SyntaxTree {
    nodes: Vec<NodeData>,
    root: NodeId,
}

impl SyntaxTree {
    /// Returns the root node.
    #[must_use]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Number of nodes in the arena.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if the arena holds no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn data(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.index()]
    }

    /// Kind of `id`.
    #[must_use]
    pub fn kind(&self, id: NodeId) -> NodeKind {
        self.data(id).kind
    }

    /// Parent of `id`, `None` for the root.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.data(id).parent
    }

    /// Children of `id` in source order.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.data(id).children
    }

    /// First child of `id`.
    #[must_use]
    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.children(id).first().copied()
    }

    /// Last child of `id`.
    #[must_use]
    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.children(id).last().copied()
    }

    fn index_in_parent(&self, id: NodeId) -> Option<(NodeId, usize)> {
        let data = self.data(id);
        Some((data.parent?, data.slot))
    }

    /// Sibling immediately before `id`.
    #[must_use]
    pub fn prev_sibling(&self, id: NodeId) -> Option<NodeId> {
        let (parent, index) = self.index_in_parent(id)?;
        index
            .checked_sub(1)
            .map(|i| self.children(parent)[i])
    }

    /// Sibling immediately after `id`.
    #[must_use]
    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        let (parent, index) = self.index_in_parent(id)?;
        self.children(parent).get(index + 1).copied()
    }

    /// Returns `true` if `id` has no children.
    #[must_use]
    pub fn is_leaf(&self, id: NodeId) -> bool {
        self.children(id).is_empty()
    }

    /// Text stored on a leaf; empty for composite nodes.
    #[must_use]
    pub fn leaf_text(&self, id: NodeId) -> &str {
        &self.data(id).text
    }

    /// Full source text covered by `id`.
    #[must_use]
    pub fn text(&self, id: NodeId) -> String {
        let mut out = String::new();
        for leaf in self.leaves(id) {
            out.push_str(self.leaf_text(leaf));
        }
        out
    }

    /// Length in bytes of the text covered by `id`.
    #[must_use]
    pub fn text_len(&self, id: NodeId) -> usize {
        self.leaves(id)
            .into_iter()
            .map(|leaf| self.leaf_text(leaf).len())
            .sum()
    }

    /// Returns `true` if the text covered by `id` contains a line break.
    #[must_use]
    pub fn contains_newline(&self, id: NodeId) -> bool {
        self.leaves(id)
            .into_iter()
            .any(|leaf| self.leaf_text(leaf).contains('\n'))
    }

    /// Returns `true` if `id` is a whitespace leaf containing a line break.
    #[must_use]
    pub fn is_line_break(&self, id: NodeId) -> bool {
        self.kind(id).is_whitespace() && self.leaf_text(id).contains('\n')
    }

    /// Byte spans of every node in the current file text.
    ///
    /// One pass over the tree. The table is a snapshot: later fixes do not
    /// move the spans it reports.
    #[must_use]
    pub fn spans(&self) -> SpanTable {
        let order = self.descendants(self.root);
        let mut spans = vec![0..0; self.nodes.len()];
        let mut offset = 0;
        for &id in &order {
            let start = offset;
            offset += self.leaf_text(id).len();
            spans[id.index()] = start..offset;
        }
        // Children follow their parent in pre-order, so walking backwards
        // settles every child before its parent.
        for &id in order.iter().rev() {
            if let Some(last) = self.last_child(id) {
                spans[id.index()].end = spans[last.index()].end;
            }
        }
        SpanTable { spans, len: offset }
    }

    /// Previous leaf in source order, crossing node boundaries.
    #[must_use]
    pub fn prev_leaf(&self, id: NodeId) -> Option<NodeId> {
        let mut current = id;
        loop {
            if let Some(prev) = self.prev_sibling(current) {
                return Some(self.last_leaf(prev));
            }
            current = self.parent(current)?;
        }
    }

    /// Proper ancestors of `id`, innermost first.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent(id), move |&n| self.parent(n))
    }

    /// Returns `true` if `ancestor` is `node` or one of its ancestors.
    #[must_use]
    pub fn is_ancestor_or_self(&self, ancestor: NodeId, node: NodeId) -> bool {
        node == ancestor || self.ancestors(node).any(|a| a == ancestor)
    }

    /// Innermost proper ancestor of `id` with the given kind.
    #[must_use]
    pub fn find_ancestor(&self, id: NodeId, kind: NodeKind) -> Option<NodeId> {
        self.ancestors(id).find(|&a| self.kind(a) == kind)
    }

    /// All nodes of the subtree rooted at `id`, in pre-order.
    #[must_use]
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(node) = stack.pop() {
            out.push(node);
            stack.extend(self.children(node).iter().rev().copied());
        }
        out
    }

    /// Leaves of the subtree rooted at `id`, in source order.
    #[must_use]
    pub fn leaves(&self, id: NodeId) -> Vec<NodeId> {
        self.descendants(id)
            .into_iter()
            .filter(|&n| self.is_leaf(n))
            .collect()
    }

    /// First leaf of the subtree rooted at `id`.
    #[must_use]
    pub fn first_leaf(&self, id: NodeId) -> NodeId {
        let mut current = id;
        while let Some(child) = self.first_child(current) {
            current = child;
        }
        current
    }

    /// Last leaf of the subtree rooted at `id`.
    #[must_use]
    pub fn last_leaf(&self, id: NodeId) -> NodeId {
        let mut current = id;
        while let Some(child) = self.last_child(current) {
            current = child;
        }
        current
    }

    /// Replaces the text of a leaf.
    pub fn set_leaf_text(&mut self, id: NodeId, text: impl Into<String>) {
        debug_assert!(self.is_leaf(id), "only leaves carry text");
        self.nodes[id.index()].text = text.into();
    }

    /// Inserts a new leaf as child number `index` of `parent`.
    ///
    /// `index` is clamped to the number of children, so `usize::MAX` appends.
    pub fn insert_leaf(
        &mut self,
        parent: NodeId,
        index: usize,
        kind: NodeKind,
        text: impl Into<String>,
    ) -> NodeId {
        let id = alloc(&mut self.nodes, kind, text.into(), Some(parent));
        let children = &mut self.nodes[parent.index()].children;
        // `alloc` appended the new id; move it into place.
        children.pop();
        let index = index.min(children.len());
        children.insert(index, id);
        let moved = children[index..].to_vec();
        for (slot, child) in (index..).zip(moved) {
            self.nodes[child.index()].slot = slot;
        }
        id
    }
}

/// Byte spans of the nodes of a [`SyntaxTree`], taken by [`SyntaxTree::spans`].
#[derive(Debug, Clone)]
pub struct SpanTable {
    spans: Vec<Range<usize>>,
    len: usize,
}

impl SpanTable {
    /// Span of `id`. Nodes created after the snapshot sit at the end of the text.
    #[must_use]
    pub fn span(&self, id: NodeId) -> Range<usize> {
        self.spans
            .get(id.index())
            .cloned()
            .unwrap_or(self.len..self.len)
    }

    /// Start offset of `id`.
    #[must_use]
    pub fn start(&self, id: NodeId) -> usize {
        self.span(id).start
    }

    /// Length of the text the snapshot was taken from.
    #[must_use]
    pub fn text_len(&self) -> usize {
        self.len
    }
}

fn alloc(nodes: &mut Vec<NodeData>, kind: NodeKind, text: String, parent: Option<NodeId>) -> NodeId {
    let id = NodeId(u32::try_from(nodes.len()).unwrap_or(u32::MAX));
    let slot = parent.map_or(0, |p| nodes[p.index()].children.len());
    nodes.push(NodeData {
        kind,
        text,
        parent,
        slot,
        children: Vec::new(),
    });
    if let Some(parent) = parent {
        nodes[parent.index()].children.push(id);
    }
    id
}

/// Incremental builder for [`SyntaxTree`].
///
/// ```ignore
/// let mut builder = TreeBuilder::new();
/// builder
///     .start_node(NodeKind::File)
///     .token(NodeKind::Identifier, "x")
///     .token(NodeKind::WhiteSpace, "\n")
///     .finish_node();
/// let tree = builder.finish()?;
/// ```
#[derive(Debug, Default)]
pub struct TreeBuilder {
    nodes: Vec<NodeData>,
    open: Vec<NodeId>,
    root: Option<NodeId>,
    error: Option<TreeError>,
}

impl TreeBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn fail(&mut self, error: TreeError) {
        if self.error.is_none() {
            self.error = Some(error);
        }
    }

    /// Opens a composite node; subsequent nodes become its children.
    pub fn start_node(&mut self, kind: NodeKind) -> &mut Self {
        let parent = self.open.last().copied();
        if parent.is_none() && self.root.is_some() {
            self.fail(TreeError::MultipleRoots);
            return self;
        }
        let id = alloc(&mut self.nodes, kind, String::new(), parent);
        if parent.is_none() {
            self.root = Some(id);
        }
        self.open.push(id);
        self
    }

    /// Adds a leaf to the innermost open node.
    pub fn token(&mut self, kind: NodeKind, text: impl Into<String>) -> &mut Self {
        match self.open.last().copied() {
            Some(parent) => {
                alloc(&mut self.nodes, kind, text.into(), Some(parent));
            }
            None => self.fail(TreeError::TokenOutsideNode),
        }
        self
    }

    /// Closes the innermost open node.
    pub fn finish_node(&mut self) -> &mut Self {
        if self.open.pop().is_none() {
            self.fail(TreeError::Unbalanced);
        }
        self
    }

    /// Finishes building.
    ///
    /// # Errors
    ///
    /// Returns an error if nodes are unbalanced or no root was started.
    pub fn finish(self) -> Result<SyntaxTree, TreeError> {
        if let Some(error) = self.error {
            return Err(error);
        }
        if !self.open.is_empty() {
            return Err(TreeError::Unclosed(self.open.len()));
        }
        let root = self.root.ok_or(TreeError::Empty)?;
        Ok(SyntaxTree {
            nodes: self.nodes,
            root,
        })
    }
}
