use crate::foundation::core::{Num, to_base36};
use crate::foundation::error::{MenuError, MenuResult};
use crate::scene::document::Document;
use crate::scene::node::{NodeId, NodeKind};
use crate::transform::{Matrix, transform_to_matrix};

#[derive(Clone, Debug, PartialEq)]
/// Path a `<textPath>` follows.
pub enum PathRef {
    /// Reference to an existing path, `#id`.
    Href(String),
    /// Raw path data hosted under the owning paper's defs.
    Raw(String),
}

impl PathRef {
    /// `#id` strings become [`PathRef::Href`], anything else is path data.
    pub fn parse(value: &str) -> Self {
        if value.starts_with('#') {
            Self::Href(value.to_string())
        } else {
            Self::Raw(value.to_string())
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
/// Settable node property.
pub enum Attr {
    /// Ordinary attribute.
    Plain {
        /// Attribute name, possibly prefixed (`xlink:href`).
        name: String,
        /// Attribute value as written.
        value: String,
    },
    /// Text content; targets an existing `<textPath>` child when present.
    Text(String),
    /// Bind the element's text to a path.
    TextPath(PathRef),
}

impl Attr {
    /// Plain attribute with a stringified value.
    pub fn plain(name: impl Into<String>, value: impl ToString) -> Self {
        Self::Plain {
            name: name.into(),
            value: value.to_string(),
        }
    }
}

fn classes(list: &str) -> impl Iterator<Item = &str> {
    list.split_whitespace()
}

impl Document {
    /// Attribute value, if set.
    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.node(id)?.get_attr(name)
    }

    /// Numeric attribute; unparsable or missing values yield `None`.
    pub fn attr_f64(&self, id: NodeId, name: &str) -> Option<f64> {
        self.attr(id, name)
            .and_then(|v| v.trim().trim_end_matches("px").parse().ok())
    }

    /// All attributes in insertion order.
    pub fn attrs(&self, id: NodeId) -> &[(String, String)] {
        self.node(id).map(|n| n.attrs.as_slice()).unwrap_or(&[])
    }

    /// Set an attribute without interpretation.
    pub fn set_plain(&mut self, id: NodeId, name: &str, value: impl ToString) {
        if let Some(n) = self.node_mut(id) {
            n.put_attr(name, value.to_string());
        }
    }

    /// Number-valued attribute written in SVG number form.
    pub fn set_num(&mut self, id: NodeId, name: &str, value: f64) {
        self.set_plain(id, name, Num(value));
    }

    /// Remove an attribute if present.
    pub fn remove_attr(&mut self, id: NodeId, name: &str) {
        if let Some(n) = self.node_mut(id) {
            n.drop_attr(name);
        }
    }

    /// Apply one [`Attr`]. Raw text paths need the node to belong to a paper.
    pub fn set_attr(&mut self, id: NodeId, attr: Attr) -> MenuResult<()> {
        match attr {
            Attr::Plain { name, value } => {
                self.set_plain(id, &name, value);
                Ok(())
            }
            Attr::Text(content) => {
                self.set_text(id, &content);
                Ok(())
            }
            Attr::TextPath(path) => self.set_text_path(id, path),
        }
    }

    /// Apply several attributes in order, stopping at the first error.
    pub fn set_attrs(&mut self, id: NodeId, attrs: impl IntoIterator<Item = Attr>) -> MenuResult<()> {
        for attr in attrs {
            self.set_attr(id, attr)?;
        }
        Ok(())
    }

    fn text_path_child(&self, id: NodeId) -> Option<NodeId> {
        self.children(id)
            .into_iter()
            .find(|&c| self.tag(c) == Some("textPath"))
    }

    fn set_text(&mut self, id: NodeId, content: &str) {
        let target = self.text_path_child(id).unwrap_or(id);
        self.set_text_content(target, content);
    }

    fn set_text_path(&mut self, id: NodeId, path: PathRef) -> MenuResult<()> {
        if self.tag(id) != Some("text") {
            tracing::debug!(node = %id, "text path ignored on non-text element");
            return Ok(());
        }

        // Resolve the href first so a missing paper leaves the node untouched.
        let existing = self.text_path_child(id);
        let href = match path {
            PathRef::Href(href) => href,
            PathRef::Raw(d) => self.host_raw_path(id, existing, &d)?,
        };

        let text_path = match existing {
            Some(tp) => tp,
            None => {
                let text: String = self
                    .child_nodes(id)
                    .iter()
                    .filter_map(|&c| match self.node(c).map(|n| &n.kind) {
                        Some(NodeKind::Text(t)) => Some(t.clone()),
                        _ => None,
                    })
                    .collect();
                self.clear(id);
                let tp = self.create_element("textPath");
                self.append(id, tp);
                self.remove_attr(id, "x");
                self.remove_attr(id, "y");
                if !text.is_empty() {
                    self.set_text_content(tp, &text);
                }
                if let Some(paper) = self.paper_of(id) {
                    self.set_paper(tp, paper);
                }
                tp
            }
        };
        self.set_plain(text_path, "xlink:href", href);
        Ok(())
    }

    /// Return an href for raw path data `d`, reusing the defs path a previous
    /// raw binding created for this element.
    fn host_raw_path(&mut self, id: NodeId, existing: Option<NodeId>, d: &str) -> MenuResult<String> {
        let paper = self.paper_of(id).ok_or_else(|| {
            MenuError::config("no paper reference for creating defs of a raw text path")
        })?;
        let defs = self
            .papers
            .get(&paper)
            .copied()
            .ok_or_else(|| MenuError::config("paper has no defs node"))?;

        let reusable = existing
            .and_then(|tp| self.attr(tp, "xlink:href"))
            .and_then(|href| href.strip_prefix('#'))
            .and_then(|pid| self.element_by_id(defs, pid))
            .filter(|p| self.generated_defs.contains(p));
        if let Some(path) = reusable {
            self.set_plain(path, "d", d);
            return Ok(format!("#{}", self.attr(path, "id").unwrap_or_default()));
        }

        let seq = self.next_def;
        self.next_def += 1;
        let owner = self.element_id(paper).unwrap_or_default().to_string();
        let path_id = format!("p{}{}", to_base36(seq), owner);
        let path = self.create_element("path");
        self.set_plain(path, "d", d);
        self.set_plain(path, "id", &path_id);
        self.set_paper(path, paper);
        self.append(defs, path);
        self.generated_defs.insert(path);
        Ok(format!("#{path_id}"))
    }

    /// Whether `class` is in the class list.
    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.attr(id, "class")
            .is_some_and(|list| classes(list).any(|c| c == class))
    }

    /// Add every whitespace-separated class in `names`.
    pub fn add_class(&mut self, id: NodeId, names: &str) {
        let mut list: Vec<String> = self
            .attr(id, "class")
            .map(|l| classes(l).map(str::to_string).collect())
            .unwrap_or_default();
        for name in classes(names) {
            if !list.iter().any(|c| c == name) {
                list.push(name.to_string());
            }
        }
        self.set_plain(id, "class", list.join(" "));
    }

    /// Remove every whitespace-separated class in `names`.
    pub fn remove_class(&mut self, id: NodeId, names: &str) {
        let Some(current) = self.attr(id, "class") else {
            return;
        };
        let removed: Vec<&str> = classes(names).collect();
        let list: Vec<String> = classes(current)
            .filter(|c| !removed.contains(c))
            .map(str::to_string)
            .collect();
        self.set_plain(id, "class", list.join(" "));
    }

    /// Inline style property value.
    pub fn style(&self, id: NodeId, property: &str) -> Option<&str> {
        self.node(id)?
            .style
            .iter()
            .find(|(k, _)| k == property)
            .map(|(_, v)| v.as_str())
    }

    /// Set or replace one inline style property.
    pub fn set_style(&mut self, id: NodeId, property: &str, value: impl ToString) {
        let Some(n) = self.node_mut(id) else {
            return;
        };
        let value = value.to_string();
        match n.style.iter_mut().find(|(k, _)| k == property) {
            Some((_, v)) => *v = value,
            None => n.style.push((property.to_string(), value)),
        }
    }

    /// Inline style serialized as a `style` attribute value.
    pub fn style_text(&self, id: NodeId) -> String {
        self.node(id)
            .map(|n| {
                n.style
                    .iter()
                    .map(|(k, v)| format!("{k}:{v};"))
                    .collect::<String>()
            })
            .unwrap_or_default()
    }

    /// Store `m` as the `transform` attribute.
    pub fn transform(&mut self, id: NodeId, m: &Matrix) {
        self.set_plain(id, "transform", m);
    }

    /// Parse either transform grammar and store the canonical matrix form.
    pub fn transform_str(&mut self, id: NodeId, transform: &str) -> MenuResult<()> {
        let m = transform_to_matrix(transform)?;
        self.transform(id, &m);
        Ok(())
    }

    /// Current `transform` attribute as a matrix; identity when absent.
    pub fn matrix(&self, id: NodeId) -> Matrix {
        self.attr(id, "transform")
            .and_then(|t| transform_to_matrix(t).ok())
            .unwrap_or_default()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/attrs.rs"]
mod tests;
