use crate::foundation::core::Num;
use crate::scene::document::Document;
use crate::scene::node::NodeId;
use crate::scene::select::parse_or_warn;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Root `<svg>` canvas plus the `<defs>` node it owns.
///
/// Factories create the element, append it to the root and record the paper
/// as its owner in one step.
pub struct Paper {
    /// The `<svg>` element.
    pub root: NodeId,
    /// Its `<defs>` child.
    pub defs: NodeId,
}

impl Paper {
    /// Adopt an existing `<svg>` node, discovering or creating its defs.
    pub fn new(doc: &mut Document, svg: NodeId) -> Self {
        if let Some(&defs) = doc.papers.get(&svg) {
            return Self { root: svg, defs };
        }
        let defs = match doc.select(svg, "defs") {
            Some(defs) => defs,
            None => {
                let defs = doc.create_element("defs");
                doc.append(svg, defs);
                defs
            }
        };
        doc.papers.insert(svg, defs);
        doc.set_paper(svg, svg);
        doc.set_paper(defs, svg);
        Self { root: svg, defs }
    }

    /// Create a detached `<svg>` and adopt it.
    pub fn create(doc: &mut Document) -> Self {
        let svg = doc.create_element("svg");
        Self::new(doc, svg)
    }

    fn make(&self, doc: &mut Document, tag: &str) -> NodeId {
        let id = doc.create_element(tag);
        doc.append(self.root, id);
        doc.set_paper(id, self.root);
        id
    }

    /// Group holding `children`, which are moved into it in order.
    pub fn g(&self, doc: &mut Document, children: &[NodeId]) -> NodeId {
        let g = self.make(doc, "g");
        for &child in children {
            doc.append(g, child);
        }
        g
    }

    /// `<path>` with data `d`; empty data leaves `d` unset.
    pub fn path(&self, doc: &mut Document, d: &str) -> NodeId {
        let path = self.make(doc, "path");
        if !d.is_empty() {
            doc.set_plain(path, "d", d);
        }
        path
    }

    /// `<circle>` centred on `(cx, cy)`.
    pub fn circle(&self, doc: &mut Document, cx: f64, cy: f64, r: f64) -> NodeId {
        let circle = self.make(doc, "circle");
        doc.set_plain(circle, "cx", Num(cx));
        doc.set_plain(circle, "cy", Num(cy));
        doc.set_plain(circle, "r", Num(r));
        circle
    }

    /// `<text>` at `(x, y)` holding `content`.
    pub fn text(&self, doc: &mut Document, x: f64, y: f64, content: &str) -> NodeId {
        let text = self.make(doc, "text");
        doc.set_plain(text, "x", Num(x));
        doc.set_plain(text, "y", Num(y));
        doc.set_text_content(text, content);
        text
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
/// Detached subtree roots, e.g. a parsed icon sprite. Query-only.
pub struct Fragment {
    roots: Vec<NodeId>,
}

impl Fragment {
    pub(crate) fn new(roots: Vec<NodeId>) -> Self {
        Self { roots }
    }

    /// Top-level nodes of the fragment.
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    fn nodes<'a>(&'a self, doc: &'a Document) -> impl Iterator<Item = NodeId> + 'a {
        self.roots
            .iter()
            .flat_map(move |&r| std::iter::once(r).chain(doc.descendants(r)))
    }

    /// Root or root descendant whose `id` attribute is `id`.
    pub fn get_by_id(&self, doc: &Document, id: &str) -> Option<NodeId> {
        self.roots.iter().find_map(|&r| doc.element_by_id(r, id))
    }

    /// First root or root descendant matching `selector`.
    pub fn select(&self, doc: &Document, selector: &str) -> Option<NodeId> {
        let sel = parse_or_warn(selector)?;
        self.nodes(doc).find(|&n| sel.matches(doc, n))
    }

    /// Every root or root descendant matching `selector`.
    pub fn select_all(&self, doc: &Document, selector: &str) -> Vec<NodeId> {
        let Some(sel) = parse_or_warn(selector) else {
            return Vec::new();
        };
        self.nodes(doc).filter(|&n| sel.matches(doc, n)).collect()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/paper.rs"]
mod tests;
