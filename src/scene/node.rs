#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
/// Arena index of a node inside one [`Document`](crate::Document).
///
/// Ids are never reused: a detached node keeps its id and can be re-attached.
pub struct NodeId(pub(crate) u32);

impl NodeId {
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum NodeKind {
    Element(String),
    Text(String),
}

#[derive(Clone, Debug)]
pub(crate) struct NodeData {
    pub(crate) kind: NodeKind,
    /// Attributes in insertion order; names are unique.
    pub(crate) attrs: Vec<(String, String)>,
    /// Inline style declarations in insertion order.
    pub(crate) style: Vec<(String, String)>,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    /// Root `<svg>` of the owning paper, when the node was created through one.
    pub(crate) paper: Option<NodeId>,
    pub(crate) uid: String,
}

impl NodeData {
    pub(crate) fn element(tag: &str, uid: String) -> Self {
        Self::with_kind(NodeKind::Element(tag.to_string()), uid)
    }

    pub(crate) fn text(content: &str, uid: String) -> Self {
        Self::with_kind(NodeKind::Text(content.to_string()), uid)
    }

    fn with_kind(kind: NodeKind, uid: String) -> Self {
        Self {
            kind,
            attrs: Vec::new(),
            style: Vec::new(),
            parent: None,
            children: Vec::new(),
            paper: None,
            uid,
        }
    }

    pub(crate) fn tag(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Element(tag) => Some(tag),
            NodeKind::Text(_) => None,
        }
    }

    pub(crate) fn is_element(&self) -> bool {
        matches!(self.kind, NodeKind::Element(_))
    }

    pub(crate) fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub(crate) fn put_attr(&mut self, name: &str, value: String) {
        match self.attrs.iter_mut().find(|(k, _)| k == name) {
            Some((_, v)) => *v = value,
            None => self.attrs.push((name.to_string(), value)),
        }
    }

    pub(crate) fn drop_attr(&mut self, name: &str) {
        self.attrs.retain(|(k, _)| k != name);
    }
}
