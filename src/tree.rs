// Copyright 2023 Christian Jaeger <ch@christianjaeger.ch>. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! In-memory representation of a named S-expression.

//! A [Tree](Tree) owns all of its [Node](Node)s in a vector; nodes
//! refer to their child nodes and their parent via [NodeId](NodeId)
//! handles into it. Parameters of a node are either a
//! [StringLeaf](StringLeaf) or a child node, see [Param](Param).

use crate::{number::{Number, parse_number}, pos::Pos};
use std::any::Any;
use std::fmt::Write;
use kstring::KString;
use thiserror::Error;

/// Handle to a node in a [Tree](Tree). Only meaningful for the tree
/// that handed it out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>)
           -> Result<(), std::fmt::Error> {
        f.write_fmt(format_args!("#{}", self.0))
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    #[error("parameter value must be a string leaf or a node")]
    InvalidParameterType,
    #[error("index {index} out of range for {len} parameters")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("node {0} does not belong to this tree")]
    UnknownNode(NodeId),
    #[error("node {0} is already attached")]
    AlreadyAttached(NodeId),
    #[error("attaching node {0} would create a cycle")]
    WouldCycle(NodeId),
    #[error("a node name must not be empty")]
    EmptyName,
}

/// Whether `s` can't be written as a bare token.
pub fn needs_quoting(s: &str) -> bool {
    s.is_empty() || s.chars().any(|c| c == '(' || c == ')' || c.is_whitespace())
}

/// A string-valued parameter. `pos` is only known for leaves coming
/// from the parser.
#[derive(Debug, Clone, PartialEq)]
pub struct StringLeaf {
    value: KString,
    quoted: bool,
    parent: Option<NodeId>,
    pos: Option<Pos>,
}

impl StringLeaf {
    /// A leaf that is quoted iff `value` requires it.
    pub fn new(value: &str) -> StringLeaf {
        StringLeaf::quoted(value, needs_quoting(value))
    }

    pub fn quoted(value: &str, quoted: bool) -> StringLeaf {
        StringLeaf {
            value: KString::from_ref(value),
            quoted,
            parent: None,
            pos: None,
        }
    }

    pub(crate) fn at(mut self, pos: Pos) -> StringLeaf {
        self.pos = Some(pos);
        self
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// The stored flag; see also `renders_quoted`.
    pub fn is_quoted(&self) -> bool {
        self.quoted
    }

    pub fn renders_quoted(&self) -> bool {
        self.quoted || needs_quoting(&self.value)
    }

    /// Replace the value, recomputing whether it is quoted.
    pub fn set(&mut self, value: &str) {
        self.value = KString::from_ref(value);
        self.quoted = needs_quoting(value);
    }

    pub fn set_quoted(&mut self, value: &str, quoted: bool) {
        self.value = KString::from_ref(value);
        self.quoted = quoted;
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn pos(&self) -> Option<Pos> {
        self.pos
    }

    /// Interpret the value as a number, if it looks like one.
    pub fn as_number(&self) -> Option<Number> {
        parse_number(&self.value)
    }
}

impl std::fmt::Display for StringLeaf {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>)
           -> Result<(), std::fmt::Error> {
        if self.renders_quoted() {
            f.write_char('"')?;
            f.write_str(&self.value)?;
            f.write_char('"')
        } else {
            f.write_str(&self.value)
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Param {
    Leaf(StringLeaf),
    Node(NodeId),
}

impl Param {
    pub fn as_leaf(&self) -> Option<&StringLeaf> {
        match self {
            Param::Leaf(l) => Some(l),
            Param::Node(_) => None,
        }
    }

    pub fn as_node(&self) -> Option<NodeId> {
        match self {
            Param::Leaf(_) => None,
            Param::Node(id) => Some(*id),
        }
    }
}

impl From<StringLeaf> for Param {
    fn from(l: StringLeaf) -> Param {
        Param::Leaf(l)
    }
}

impl From<NodeId> for Param {
    fn from(id: NodeId) -> Param {
        Param::Node(id)
    }
}

/// For callers holding type-erased values: only a `StringLeaf` or a
/// `NodeId` can become a parameter.
impl TryFrom<Box<dyn Any>> for Param {
    type Error = TreeError;
    fn try_from(v: Box<dyn Any>) -> Result<Param, TreeError> {
        let v = match v.downcast::<StringLeaf>() {
            Ok(l) => return Ok(Param::Leaf(*l)),
            Err(v) => v
        };
        match v.downcast::<NodeId>() {
            Ok(id) => Ok(Param::Node(*id)),
            Err(_) => Err(TreeError::InvalidParameterType)
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    name: KString,
    params: Vec<Param>,
    parent: Option<NodeId>,
    pos: Option<Pos>,
}

impl Node {
    fn new(name: KString, parent: Option<NodeId>, pos: Option<Pos>) -> Node {
        Node {
            name,
            params: Vec::new(),
            parent,
            pos,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn params(&self) -> &[Param] {
        &self.params
    }

    pub fn param(&self, index: usize) -> Option<&Param> {
        self.params.get(index)
    }

    pub fn leaf(&self, index: usize) -> Option<&StringLeaf> {
        self.params.get(index).and_then(Param::as_leaf)
    }

    /// The child nodes in parameter order, skipping leaves.
    pub fn child_nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.params.iter().filter_map(Param::as_node)
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Position of the opening paren, for nodes from the parser.
    pub fn pos(&self) -> Option<Pos> {
        self.pos
    }
}

#[derive(Debug, Clone)]
pub struct Tree {
    nodes: Vec<Node>,
    root: NodeId,
}

impl Tree {
    pub fn new(name: &str) -> Result<Tree, TreeError> {
        if name.is_empty() {
            return Err(TreeError::EmptyName)
        }
        Ok(Tree {
            nodes: vec![Node::new(KString::from_ref(name), None, None)],
            root: NodeId(0),
        })
    }

    // The parser names nodes after creating them.
    pub(crate) fn unnamed(pos: Pos) -> Tree {
        Tree {
            nodes: vec![Node::new(KString::from_static(""), None, Some(pos))],
            root: NodeId(0),
        }
    }

    pub(crate) fn push_unnamed_child(&mut self, parent: NodeId, pos: Pos) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node::new(KString::from_static(""), Some(parent), Some(pos)));
        self.nodes[parent.0].params.push(Param::Node(id));
        id
    }

    pub(crate) fn push_leaf(&mut self, parent: NodeId, mut leaf: StringLeaf) {
        leaf.parent = Some(parent);
        self.nodes[parent.0].params.push(Param::Leaf(leaf));
    }

    pub(crate) fn name_node(&mut self, id: NodeId, name: &str) {
        self.nodes[id.0].name = KString::from_ref(name);
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// The number of nodes in the tree, including detached ones.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// Panics if `id` was not handed out by this tree.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn root_node(&self) -> &Node {
        self.node(self.root)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent)
    }

    /// Where `id` sits in its parent's parameter list.
    pub fn index_in_parent(&self, id: NodeId) -> Option<usize> {
        let parent = self.parent(id)?;
        self.node(parent).params.iter().position(|p| *p == Param::Node(id))
    }

    fn check(&self, id: NodeId) -> Result<(), TreeError> {
        if id.0 < self.nodes.len() {
            Ok(())
        } else {
            Err(TreeError::UnknownNode(id))
        }
    }

    /// Create a node that is not attached anywhere yet; attach it via
    /// `add_param` and friends.
    pub fn new_node(&mut self, name: &str) -> Result<NodeId, TreeError> {
        if name.is_empty() {
            return Err(TreeError::EmptyName)
        }
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node::new(KString::from_ref(name), None, None));
        tracing::trace!(%id, name, "new node");
        Ok(id)
    }

    pub fn set_name(&mut self, id: NodeId, name: &str) -> Result<(), TreeError> {
        self.check(id)?;
        if name.is_empty() {
            return Err(TreeError::EmptyName)
        }
        self.name_node(id, name);
        Ok(())
    }

    pub fn leaf_mut(&mut self, id: NodeId, index: usize) -> Option<&mut StringLeaf> {
        match self.nodes.get_mut(id.0)?.params.get_mut(index)? {
            Param::Leaf(l) => Some(l),
            Param::Node(_) => None,
        }
    }

    // Validate `param` for use as a parameter of `parent` and set its
    // parent link.
    fn attach(&mut self, parent: NodeId, param: Param) -> Result<Param, TreeError> {
        self.check(parent)?;
        match param {
            Param::Leaf(mut leaf) => {
                leaf.parent = Some(parent);
                Ok(Param::Leaf(leaf))
            }
            Param::Node(child) => {
                self.check(child)?;
                if child == self.root || self.nodes[child.0].parent.is_some() {
                    return Err(TreeError::AlreadyAttached(child))
                }
                let mut cursor = Some(parent);
                while let Some(id) = cursor {
                    if id == child {
                        return Err(TreeError::WouldCycle(child))
                    }
                    cursor = self.nodes[id.0].parent;
                }
                self.nodes[child.0].parent = Some(parent);
                Ok(Param::Node(child))
            }
        }
    }

    fn detach(&mut self, param: Param) -> Param {
        match param {
            Param::Leaf(mut leaf) => {
                leaf.parent = None;
                Param::Leaf(leaf)
            }
            Param::Node(child) => {
                self.nodes[child.0].parent = None;
                Param::Node(child)
            }
        }
    }

    fn check_index(&self, id: NodeId, index: usize, inclusive: bool)
                   -> Result<(), TreeError> {
        self.check(id)?;
        let len = self.nodes[id.0].params.len();
        if index < len || (inclusive && index == len) {
            Ok(())
        } else {
            Err(TreeError::IndexOutOfRange { index, len })
        }
    }

    /// Append a parameter to node `id`.
    pub fn add_param(&mut self, id: NodeId, param: impl Into<Param>)
                     -> Result<(), TreeError> {
        let param = self.attach(id, param.into())?;
        tracing::trace!(%id, "add param");
        self.nodes[id.0].params.push(param);
        Ok(())
    }

    /// Insert a parameter before `index` (which may be the length, to
    /// append).
    pub fn insert_param(&mut self, id: NodeId, index: usize, param: impl Into<Param>)
                        -> Result<(), TreeError> {
        self.check_index(id, index, true)?;
        let param = self.attach(id, param.into())?;
        tracing::trace!(%id, index, "insert param");
        self.nodes[id.0].params.insert(index, param);
        Ok(())
    }

    /// Replace the parameter at `index`, returning the old one
    /// (detached).
    pub fn set_param(&mut self, id: NodeId, index: usize, param: impl Into<Param>)
                     -> Result<Param, TreeError> {
        self.check_index(id, index, false)?;
        let param = self.attach(id, param.into())?;
        tracing::trace!(%id, index, "set param");
        let old = std::mem::replace(&mut self.nodes[id.0].params[index], param);
        Ok(self.detach(old))
    }

    /// Remove the parameter at `index`, returning it (detached). A
    /// removed node stays in the arena and can be attached again.
    pub fn remove_param(&mut self, id: NodeId, index: usize)
                        -> Result<Param, TreeError> {
        self.check_index(id, index, false)?;
        tracing::trace!(%id, index, "remove param");
        let old = self.nodes[id.0].params.remove(index);
        Ok(self.detach(old))
    }
}
