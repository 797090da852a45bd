use std::{fmt, ops::Index};

use crate::error::TreeError;

/// Stable identifier of a node inside a [`Tree`].
///
/// Ids are handed out in creation order by the tree that owns the node and are
/// never reused, not even after the node has been released. Children are
/// located among their parent's children by comparing ids.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// Returns the arena slot of this id.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The role of a node.
///
/// The role decides which attributes a node carries and which effect the
/// interpreter fires for it.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// The document root; parent of every statement.
    Root,
    /// `number <name>`; carries `TYPE` and `NAME`.
    VariableDeclaration,
    /// `<target> = <expr>`; carries `TARGET` and owns one expression.
    VariableAssignment,
    /// A name used as an operand; carries `TARGET`.
    VariableReference,
    /// One operand, or left operand, operation and right operand.
    Expression,
    /// An integer literal; carries `VALUE`.
    Literal,
    /// A binary operator; carries `TYPE`.
    Operation,
    /// `<name>(...)`; carries `TARGET`. Recognized but never evaluated.
    FunctionCall,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Root => "ROOT_DOCUMENT",
            Self::VariableDeclaration => "VARIABLE_DECLARATION",
            Self::VariableAssignment => "VARIABLE_ASSIGNMENT",
            Self::VariableReference => "VARIABLE_REFERENCE",
            Self::Expression => "EXPRESSION",
            Self::Literal => "LITERAL",
            Self::Operation => "OPERATION",
            Self::FunctionCall => "FUNCTION_CALL",
        };
        write!(f, "{name}")
    }
}

/// Keys of the attribute pairs attached to a node.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Attribute {
    /// Operator symbol of an operation, or declared type of a declaration.
    Type,
    /// Declared variable name.
    Name,
    /// Literal text.
    Value,
    /// Assignment target, referenced variable or called function.
    Target,
    /// Marks an expression synthesized to regroup a tighter operator.
    ImplicitParen,
}

impl Attribute {
    /// The key as it appears in the tree dump.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Type => "TYPE",
            Self::Name => "NAME",
            Self::Value => "VALUE",
            Self::Target => "TARGET",
            Self::ImplicitParen => "IMPLICIT_PAREN",
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Represents a binary operator.
///
/// Operators come in two tiers: `*` and `/` bind tighter than `+` and `-`.
/// Within a tier operators associate to the left.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BinaryOperator {
    /// Addition (`+`)
    Add,
    /// Subtraction (`-`)
    Sub,
    /// Multiplication (`*`)
    Mul,
    /// Truncating division (`/`)
    Div,
}

impl BinaryOperator {
    /// Parses the `TYPE` attribute of an operation node.
    #[must_use]
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "+" => Some(Self::Add),
            "-" => Some(Self::Sub),
            "*" => Some(Self::Mul),
            "/" => Some(Self::Div),
            _ => None,
        }
    }

    /// The operator's source symbol.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
        }
    }

    /// The operator's tier; higher binds tighter.
    #[must_use]
    pub const fn precedence(self) -> u8 {
        match self {
            Self::Add | Self::Sub => 1,
            Self::Mul | Self::Div => 2,
        }
    }

    /// Returns `true` if `self` binds tighter than `other`.
    ///
    /// ## Example
    /// ```
    /// use arbor::ast::BinaryOperator;
    ///
    /// assert!(BinaryOperator::Mul.binds_tighter_than(BinaryOperator::Sub));
    /// assert!(!BinaryOperator::Div.binds_tighter_than(BinaryOperator::Mul));
    /// assert!(!BinaryOperator::Add.binds_tighter_than(BinaryOperator::Div));
    /// ```
    #[must_use]
    pub const fn binds_tighter_than(self, other: Self) -> bool {
        self.precedence() > other.precedence()
    }
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// A single node of the tree.
///
/// Nodes only ever exist inside a [`Tree`]; relations to other nodes are
/// stored as [`NodeId`]s and kept consistent by the tree's mutation methods.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    id:         NodeId,
    kind:       NodeKind,
    parent:     Option<NodeId>,
    children:   Vec<NodeId>,
    attributes: Vec<(Attribute, String)>,
    line:       usize,
}

impl Node {
    const fn new(id: NodeId, kind: NodeKind, line: usize) -> Self {
        Self { id,
               kind,
               parent: None,
               children: Vec::new(),
               attributes: Vec::new(),
               line }
    }

    /// The node's id.
    #[must_use]
    pub const fn id(&self) -> NodeId {
        self.id
    }

    /// The node's role.
    #[must_use]
    pub const fn kind(&self) -> NodeKind {
        self.kind
    }

    /// The node's parent, `None` for the root and for detached nodes.
    #[must_use]
    pub const fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// The node's children in order.
    #[must_use]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// The attribute pairs in insertion order.
    #[must_use]
    pub fn attributes(&self) -> &[(Attribute, String)] {
        &self.attributes
    }

    /// Looks up an attribute by key.
    #[must_use]
    pub fn attribute(&self, key: Attribute) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    /// The source line the node was created from.
    #[must_use]
    pub const fn line(&self) -> usize {
        self.line
    }
}

/// An arena of nodes forming one document tree.
///
/// The tree owns every node it ever created. Slot `0` is the root. Released
/// nodes leave an empty slot behind so that ids stay unique for the lifetime of
/// the tree.
///
/// ## Example
/// ```
/// use arbor::ast::{Attribute, NodeKind, Tree};
///
/// let mut tree = Tree::new();
/// let decl = tree.create(NodeKind::VariableDeclaration, 1);
/// tree.set_attribute(decl, Attribute::Name, "x").unwrap();
/// tree.add_child(tree.root(), decl).unwrap();
///
/// assert_eq!(tree.child(tree.root(), 0), Some(decl));
/// assert_eq!(tree.attribute(decl, Attribute::Name), Some("x"));
/// assert!(tree.detached_nodes().is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tree {
    slots: Vec<Option<Node>>,
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

impl Tree {
    /// Creates a tree holding only the root node.
    #[must_use]
    pub fn new() -> Self {
        Self { slots: vec![Some(Node::new(NodeId(0), NodeKind::Root, 0))] }
    }

    /// The root node's id.
    #[must_use]
    pub const fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Allocates a new, detached node.
    pub fn create(&mut self, kind: NodeKind, line: usize) -> NodeId {
        let id = NodeId(self.slots.len());
        self.slots.push(Some(Node::new(id, kind, line)));
        id
    }

    /// Returns the node, or `None` if it has been released.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.slots.get(id.0).and_then(Option::as_ref)
    }

    fn get_mut(&mut self, id: NodeId) -> Result<&mut Node, TreeError> {
        self.slots
            .get_mut(id.0)
            .and_then(Option::as_mut)
            .ok_or(TreeError::Released { node: id })
    }

    /// Attaches `child` as the last child of `parent`.
    ///
    /// # Errors
    /// Fails if either node is released, if `child` already has a parent, or
    /// if `child` is an ancestor of `parent`.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), TreeError> {
        self.check_attachable(parent, child)?;
        self.get_mut(child)?.parent = Some(parent);
        self.get_mut(parent)?.children.push(child);
        Ok(())
    }

    /// Puts `new` into the slot of `old` among `parent`'s children.
    ///
    /// `old` is detached and its id handed back; the caller must either attach
    /// it somewhere else or [`release`](Self::release) it.
    ///
    /// # Errors
    /// Fails if `old` is not a child of `parent` or `new` cannot be attached.
    pub fn replace_child(&mut self,
                         parent: NodeId,
                         old: NodeId,
                         new: NodeId)
                         -> Result<NodeId, TreeError> {
        self.check_attachable(parent, new)?;
        let position = self.position(parent, old)
                           .ok_or(TreeError::NotAChild { parent, child: old })?;

        self.get_mut(parent)?.children[position] = new;
        self.get_mut(new)?.parent = Some(parent);
        self.get_mut(old)?.parent = None;
        Ok(old)
    }

    fn check_attachable(&self, parent: NodeId, child: NodeId) -> Result<(), TreeError> {
        let node = self.get(child).ok_or(TreeError::Released { node: child })?;
        if let Some(current) = node.parent {
            return Err(TreeError::AlreadyAttached { node:   child,
                                                    parent: current, });
        }
        self.get(parent).ok_or(TreeError::Released { node: parent })?;

        let mut ancestor = Some(parent);
        while let Some(id) = ancestor {
            if id == child {
                return Err(TreeError::CreatesCycle { node: child, parent });
            }
            ancestor = self.parent(id);
        }
        Ok(())
    }

    fn position(&self, parent: NodeId, child: NodeId) -> Option<usize> {
        self.get(parent)?.children.iter().position(|c| *c == child)
    }

    /// Returns the child following `child` under `parent`.
    ///
    /// `None` if `child` is the last child or not a child of `parent` at all.
    #[must_use]
    pub fn next_sibling(&self, parent: NodeId, child: NodeId) -> Option<NodeId> {
        let position = self.position(parent, child)?;
        self.child(parent, position + 1)
    }

    /// Returns the child at `index`, `None` when out of bounds.
    #[must_use]
    pub fn child(&self, id: NodeId, index: usize) -> Option<NodeId> {
        self.get(id)?.children.get(index).copied()
    }

    /// Returns the children of a node; empty for released nodes.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map_or(&[], Node::children)
    }

    /// Returns the parent of a node.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id)?.parent
    }

    /// Looks up an attribute of a node.
    #[must_use]
    pub fn attribute(&self, id: NodeId, key: Attribute) -> Option<&str> {
        self.get(id)?.attribute(key)
    }

    /// Sets an attribute, overwriting an existing value for the same key.
    ///
    /// # Errors
    /// Fails if the node has been released.
    pub fn set_attribute(&mut self,
                         id: NodeId,
                         key: Attribute,
                         value: impl Into<String>)
                         -> Result<(), TreeError> {
        let node = self.get_mut(id)?;
        let value = value.into();
        match node.attributes.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = value,
            None => node.attributes.push((key, value)),
        }
        Ok(())
    }

    /// Releases a detached node together with its whole subtree.
    ///
    /// The root is owned by the tree itself and counts as attached.
    ///
    /// # Errors
    /// Fails if the node is released already or still attached.
    pub fn release(&mut self, id: NodeId) -> Result<(), TreeError> {
        let node = self.get(id).ok_or(TreeError::Released { node: id })?;
        if node.parent.is_some() || id == self.root() {
            return Err(TreeError::StillAttached { node: id });
        }

        let mut pending = vec![id];
        while let Some(next) = pending.pop() {
            if let Some(node) = self.slots.get_mut(next.0).and_then(Option::take) {
                pending.extend(node.children);
            }
        }
        Ok(())
    }

    /// Returns the id the next created node will receive.
    ///
    /// Pass it to [`rollback`](Self::rollback) to undo everything created
    /// afterwards.
    #[must_use]
    pub fn mark(&self) -> usize {
        self.slots.len()
    }

    /// Releases every node created at or after `mark`.
    ///
    /// Surviving nodes lose any link to the released ones, so the tree stays
    /// consistent whether the released nodes were attached or not.
    pub fn rollback(&mut self, mark: usize) {
        for node in self.slots.iter_mut().take(mark).flatten() {
            node.children.retain(|child| child.0 < mark);
            if node.parent.is_some_and(|parent| parent.0 >= mark) {
                node.parent = None;
            }
        }
        for slot in self.slots.iter_mut().skip(mark) {
            *slot = None;
        }
    }

    /// Number of live nodes, the root included.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.slots.iter().flatten().count()
    }

    /// Upper bound of all ids handed out so far.
    #[must_use]
    pub fn id_bound(&self) -> usize {
        self.slots.len()
    }

    /// Live nodes that cannot be reached from the root.
    ///
    /// Empty whenever every detached node has been reattached or released.
    #[must_use]
    pub fn detached_nodes(&self) -> Vec<NodeId> {
        let mut reachable = vec![false; self.slots.len()];
        for (id, _) in self.preorder(self.root()) {
            reachable[id.0] = true;
        }
        self.slots
            .iter()
            .flatten()
            .map(Node::id)
            .filter(|id| !reachable[id.0])
            .collect()
    }

    /// Walks the subtree below `start` depth-first, parents before children.
    ///
    /// Yields each node with its depth relative to `start`.
    #[must_use]
    pub fn preorder(&self, start: NodeId) -> Preorder<'_> {
        let stack = if self.get(start).is_some() { vec![(start, 0)] } else { Vec::new() };
        Preorder { tree: self,
                   stack }
    }
}

impl Index<NodeId> for Tree {
    type Output = Node;

    /// # Panics
    /// Panics if the node has been released.
    fn index(&self, id: NodeId) -> &Node {
        match self.get(id) {
            Some(node) => node,
            None => panic!("node {id} has been released"),
        }
    }
}

/// Depth-first iterator created by [`Tree::preorder`].
pub struct Preorder<'t> {
    tree:  &'t Tree,
    stack: Vec<(NodeId, usize)>,
}

impl Iterator for Preorder<'_> {
    type Item = (NodeId, usize);

    fn next(&mut self) -> Option<Self::Item> {
        let (id, depth) = self.stack.pop()?;
        let children = self.tree.children(id);
        self.stack.extend(children.iter().rev().map(|child| (*child, depth + 1)));
        Some((id, depth))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expression_with(tree: &mut Tree, values: &[&str]) -> (NodeId, Vec<NodeId>) {
        let expr = tree.create(NodeKind::Expression, 1);
        let mut leaves = Vec::new();
        for value in values {
            let leaf = tree.create(NodeKind::Literal, 1);
            tree.set_attribute(leaf, Attribute::Value, *value).unwrap();
            tree.add_child(expr, leaf).unwrap();
            leaves.push(leaf);
        }
        (expr, leaves)
    }

    #[test]
    fn ids_are_assigned_in_creation_order() {
        let mut tree = Tree::new();
        let a = tree.create(NodeKind::Literal, 1);
        let b = tree.create(NodeKind::Literal, 1);
        assert_eq!(tree.root().index(), 0);
        assert_eq!(a.index(), 1);
        assert_eq!(b.index(), 2);
    }

    #[test]
    fn add_child_links_both_directions() {
        let mut tree = Tree::new();
        let (expr, leaves) = expression_with(&mut tree, &["1", "2"]);
        assert_eq!(tree.children(expr), leaves.as_slice());
        for leaf in leaves {
            assert_eq!(tree.parent(leaf), Some(expr));
        }
    }

    #[test]
    fn attaching_twice_is_rejected() {
        let mut tree = Tree::new();
        let (expr, leaves) = expression_with(&mut tree, &["1"]);
        let other = tree.create(NodeKind::Expression, 1);
        assert_eq!(tree.add_child(other, leaves[0]),
                   Err(TreeError::AlreadyAttached { node:   leaves[0],
                                                    parent: expr, }));
    }

    #[test]
    fn attaching_an_ancestor_is_rejected() {
        let mut tree = Tree::new();
        let outer = tree.create(NodeKind::Expression, 1);
        let inner = tree.create(NodeKind::Expression, 1);
        tree.add_child(outer, inner).unwrap();
        assert_eq!(tree.add_child(inner, outer),
                   Err(TreeError::CreatesCycle { node:   outer,
                                                 parent: inner, }));
    }

    #[test]
    fn replace_child_detaches_and_returns_old_node() {
        let mut tree = Tree::new();
        let (expr, leaves) = expression_with(&mut tree, &["1", "2", "3"]);
        let wrapper = tree.create(NodeKind::Expression, 1);

        let old = tree.replace_child(expr, leaves[2], wrapper).unwrap();

        assert_eq!(old, leaves[2]);
        assert_eq!(tree.parent(old), None);
        assert_eq!(tree.parent(wrapper), Some(expr));
        assert_eq!(tree.child(expr, 2), Some(wrapper));
        assert_eq!(tree.detached_nodes(), vec![expr, leaves[0], leaves[1], old, wrapper]);

        tree.add_child(wrapper, old).unwrap();
        assert_eq!(tree.parent(old), Some(wrapper));
    }

    #[test]
    fn replace_child_of_stranger_fails() {
        let mut tree = Tree::new();
        let (expr, _) = expression_with(&mut tree, &["1"]);
        let stranger = tree.create(NodeKind::Literal, 1);
        let new = tree.create(NodeKind::Literal, 1);
        assert_eq!(tree.replace_child(expr, stranger, new),
                   Err(TreeError::NotAChild { parent: expr,
                                              child:  stranger, }));
    }

    #[test]
    fn next_sibling_and_child_lookup() {
        let mut tree = Tree::new();
        let (expr, leaves) = expression_with(&mut tree, &["1", "2"]);
        assert_eq!(tree.next_sibling(expr, leaves[0]), Some(leaves[1]));
        assert_eq!(tree.next_sibling(expr, leaves[1]), None);
        assert_eq!(tree.next_sibling(expr, expr), None);
        assert_eq!(tree.child(expr, 1), Some(leaves[1]));
        assert_eq!(tree.child(expr, 2), None);
    }

    #[test]
    fn attributes_are_looked_up_by_key() {
        let mut tree = Tree::new();
        let op = tree.create(NodeKind::Operation, 1);
        tree.set_attribute(op, Attribute::Type, "+").unwrap();
        tree.set_attribute(op, Attribute::Type, "*").unwrap();
        assert_eq!(tree.attribute(op, Attribute::Type), Some("*"));
        assert_eq!(tree.attribute(op, Attribute::Value), None);
        assert_eq!(tree[op].attributes().len(), 1);
    }

    #[test]
    fn release_requires_detached_subtree() {
        let mut tree = Tree::new();
        let (expr, leaves) = expression_with(&mut tree, &["1", "2"]);
        assert_eq!(tree.release(leaves[0]),
                   Err(TreeError::StillAttached { node: leaves[0] }));
        assert_eq!(tree.release(tree.root()),
                   Err(TreeError::StillAttached { node: tree.root() }));

        tree.release(expr).unwrap();
        assert!(tree.get(expr).is_none());
        assert!(tree.get(leaves[1]).is_none());
        assert_eq!(tree.node_count(), 1);
        assert_eq!(tree.release(expr), Err(TreeError::Released { node: expr }));
    }

    #[test]
    fn rollback_unlinks_and_releases_later_nodes() {
        let mut tree = Tree::new();
        let kept = tree.create(NodeKind::VariableDeclaration, 1);
        tree.add_child(tree.root(), kept).unwrap();

        let mark = tree.mark();
        let dropped = tree.create(NodeKind::VariableAssignment, 2);
        tree.add_child(tree.root(), dropped).unwrap();
        let (stray, _) = expression_with(&mut tree, &["4"]);

        tree.rollback(mark);

        assert_eq!(tree.children(tree.root()), &[kept]);
        assert!(tree.get(dropped).is_none());
        assert!(tree.get(stray).is_none());
        assert!(tree.detached_nodes().is_empty());
        assert_eq!(tree.create(NodeKind::Literal, 3).index(), mark + 3);
    }

    #[test]
    fn preorder_visits_parents_first() {
        let mut tree = Tree::new();
        let (expr, leaves) = expression_with(&mut tree, &["1", "2"]);
        tree.add_child(tree.root(), expr).unwrap();
        let order: Vec<_> = tree.preorder(tree.root()).collect();
        assert_eq!(order,
                   vec![(tree.root(), 0), (expr, 1), (leaves[0], 2), (leaves[1], 2)]);
    }
}
