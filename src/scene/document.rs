use std::collections::{HashMap, HashSet};

use crate::foundation::core::to_base36;
use crate::scene::events::Listener;
use crate::scene::events::EventKind;
use crate::scene::node::{NodeData, NodeId, NodeKind};

/// In-memory node arena standing in for a rendered document.
///
/// The document owns a `body` root. A node is *connected* when its ancestor
/// chain reaches `body`; everything else is a detached subtree that can still be
/// queried, mutated and measured.
pub struct Document {
    pub(crate) nodes: Vec<NodeData>,
    pub(crate) listeners: HashMap<NodeId, Vec<(EventKind, Listener)>>,
    body: NodeId,
    /// Paper root `<svg>` -> its `<defs>` node.
    pub(crate) papers: HashMap<NodeId, NodeId>,
    pub(crate) measure_canvas: Option<NodeId>,
    /// `<path>` nodes created under some defs to back a raw text path.
    pub(crate) generated_defs: HashSet<NodeId>,
    pub(crate) next_def: u64,
    next_uid: u64,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document")
            .field("nodes", &self.nodes.len())
            .field("papers", &self.papers.len())
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl Document {
    /// Empty document holding only `body`.
    pub fn new() -> Self {
        let mut doc = Self {
            nodes: Vec::new(),
            listeners: HashMap::new(),
            body: NodeId(0),
            papers: HashMap::new(),
            measure_canvas: None,
            generated_defs: HashSet::new(),
            next_def: 0,
            next_uid: 0,
        };
        doc.body = doc.create_element("body");
        doc
    }

    /// Root every connected node descends from.
    pub fn body(&self) -> NodeId {
        self.body
    }

    pub(crate) fn node(&self, id: NodeId) -> Option<&NodeData> {
        self.nodes.get(id.index())
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> Option<&mut NodeData> {
        self.nodes.get_mut(id.index())
    }

    fn push(&mut self, data: NodeData) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(data);
        id
    }

    fn next_uid(&mut self) -> String {
        let uid = format!("e{}", to_base36(self.next_uid));
        self.next_uid += 1;
        uid
    }

    /// Create a detached element.
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        let uid = self.next_uid();
        self.push(NodeData::element(tag, uid))
    }

    /// Create a detached text node.
    pub fn create_text(&mut self, content: &str) -> NodeId {
        let uid = self.next_uid();
        self.push(NodeData::text(content, uid))
    }

    /// Tag name; `None` for text nodes and unknown ids.
    pub fn tag(&self, id: NodeId) -> Option<&str> {
        self.node(id).and_then(NodeData::tag)
    }

    /// Whether `id` is an element node.
    pub fn is_element(&self, id: NodeId) -> bool {
        self.node(id).is_some_and(NodeData::is_element)
    }

    /// The `id` attribute when present, else the node's generated identity.
    pub fn element_id(&self, id: NodeId) -> Option<&str> {
        let node = self.node(id)?;
        Some(node.get_attr("id").unwrap_or(&node.uid))
    }

    /// Parent node, if attached to one.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id)?.parent
    }

    /// Element children in document order.
    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        self.child_nodes(id)
            .iter()
            .copied()
            .filter(|&c| self.is_element(c))
            .collect()
    }

    /// All children, text nodes included.
    pub fn child_nodes(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// Parent chain from the nearest ancestor upwards.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent(id), move |&p| self.parent(p))
    }

    /// Topmost ancestor of `id` (itself when it has no parent).
    pub fn subtree_root(&self, id: NodeId) -> NodeId {
        self.ancestors(id).last().unwrap_or(id)
    }

    /// Whether `id` descends from `body`.
    pub fn is_connected(&self, id: NodeId) -> bool {
        id == self.body || self.ancestors(id).any(|a| a == self.body)
    }

    /// `true` when `ancestor` is `id` or one of its ancestors.
    pub fn contains(&self, ancestor: NodeId, id: NodeId) -> bool {
        id == ancestor || self.ancestors(id).any(|a| a == ancestor)
    }

    /// Pre-order traversal of the subtree below `id`, excluding `id`.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.child_nodes(id).iter().rev().copied().collect();
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.child_nodes(next).iter().rev().copied());
        }
        out
    }

    /// Append `child` as the last child of `parent`, detaching it from its
    /// current parent first. Appending a node under itself or one of its
    /// descendants is ignored.
    pub fn append(&mut self, parent: NodeId, child: NodeId) {
        if self.node(child).is_none() || !self.is_element(parent) {
            tracing::warn!(%parent, %child, "append target is not an element");
            return;
        }
        if self.contains(child, parent) {
            tracing::warn!(%parent, %child, "append would create a cycle");
            return;
        }
        self.detach(child);
        if let Some(p) = self.node_mut(parent) {
            p.children.push(child);
        }
        if let Some(c) = self.node_mut(child) {
            c.parent = Some(parent);
        }
    }

    /// Remove `id` from its parent; the subtree stays intact and reusable.
    pub fn detach(&mut self, id: NodeId) {
        let Some(parent) = self.parent(id) else {
            return;
        };
        if let Some(p) = self.node_mut(parent) {
            p.children.retain(|&c| c != id);
        }
        if let Some(c) = self.node_mut(id) {
            c.parent = None;
        }
    }

    /// Detach every child of `id`.
    pub fn clear(&mut self, id: NodeId) {
        let children = self.child_nodes(id).to_vec();
        for child in children {
            if let Some(c) = self.node_mut(child) {
                c.parent = None;
            }
        }
        if let Some(n) = self.node_mut(id) {
            n.children.clear();
        }
    }

    /// Concatenated text of every text node in the subtree.
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        let mut nodes = vec![id];
        nodes.extend(self.descendants(id));
        for n in nodes {
            if let Some(NodeKind::Text(t)) = self.node(n).map(|d| &d.kind) {
                out.push_str(t);
            }
        }
        out
    }

    /// Replace all children of `id` with a single text node.
    pub fn set_text_content(&mut self, id: NodeId, content: &str) {
        if let Some(NodeData {
            kind: NodeKind::Text(t),
            ..
        }) = self.node_mut(id)
        {
            *t = content.to_string();
            return;
        }
        self.clear(id);
        if !content.is_empty() {
            let text = self.create_text(content);
            self.append(id, text);
        }
    }

    /// Deep copy of `id`: fresh identities, same paper, no listeners, detached.
    pub fn clone_node(&mut self, id: NodeId) -> Option<NodeId> {
        let src = self.node(id)?.clone();
        let uid = self.next_uid();
        let copy = self.push(NodeData {
            parent: None,
            children: Vec::new(),
            uid,
            ..src
        });
        for child in src.children {
            if let Some(c) = self.clone_node(child) {
                self.append(copy, c);
            }
        }
        Some(copy)
    }

    /// Owning paper root: the node's own paper or the nearest ancestor that is
    /// a paper root.
    pub fn paper_of(&self, id: NodeId) -> Option<NodeId> {
        if let Some(p) = self.node(id)?.paper {
            return Some(p);
        }
        std::iter::once(id)
            .chain(self.ancestors(id))
            .find(|n| self.papers.contains_key(n))
    }

    pub(crate) fn set_paper(&mut self, id: NodeId, paper: NodeId) {
        if let Some(n) = self.node_mut(id) {
            n.paper = Some(paper);
        }
    }

    /// First element in the subtree of `root` (inclusive) whose `id` attribute
    /// equals `value`.
    pub fn element_by_id(&self, root: NodeId, value: &str) -> Option<NodeId> {
        std::iter::once(root)
            .chain(self.descendants(root))
            .find(|&n| self.node(n).and_then(|d| d.get_attr("id")) == Some(value))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/document.rs"]
mod tests;
