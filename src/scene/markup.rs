use crate::foundation::error::{MenuError, MenuResult};
use crate::scene::document::Document;
use crate::scene::node::{NodeId, NodeKind};
use crate::scene::paper::Fragment;

/// SVG namespace URI.
pub const SVG_NS: &str = "http://www.w3.org/2000/svg";
/// XLink namespace URI, used for `xlink:href`.
pub const XLINK_NS: &str = "http://www.w3.org/1999/xlink";

fn parse_xml(text: &str) -> Result<roxmltree::Document<'_>, roxmltree::Error> {
    let opts = roxmltree::ParsingOptions {
        allow_dtd: true,
        ..roxmltree::ParsingOptions::default()
    };
    roxmltree::Document::parse_with_options(text, opts)
}

fn qualified_attr_name(attr: &roxmltree::Attribute<'_, '_>) -> String {
    match attr.namespace() {
        Some(XLINK_NS) => format!("xlink:{}", attr.name()),
        Some("http://www.w3.org/XML/1998/namespace") => format!("xml:{}", attr.name()),
        _ => attr.name().to_string(),
    }
}

fn parse_style(decls: &str) -> Vec<(String, String)> {
    decls
        .split(';')
        .filter_map(|d| {
            let (k, v) = d.split_once(':')?;
            let (k, v) = (k.trim(), v.trim());
            (!k.is_empty()).then(|| (k.to_string(), v.to_string()))
        })
        .collect()
}

impl Document {
    fn import(&mut self, node: roxmltree::Node<'_, '_>) -> Option<NodeId> {
        if node.is_text() {
            let text = node.text()?;
            if text.trim().is_empty() {
                return None;
            }
            return Some(self.create_text(text));
        }
        if !node.is_element() {
            return None;
        }

        let id = self.create_element(node.tag_name().name());
        for attr in node.attributes() {
            let name = qualified_attr_name(&attr);
            if name == "style" {
                for (k, v) in parse_style(attr.value()) {
                    self.set_style(id, &k, v);
                }
            } else {
                self.set_plain(id, &name, attr.value());
            }
        }
        for child in node.children() {
            if let Some(c) = self.import(child) {
                self.append(id, c);
            }
        }
        Some(id)
    }

    /// Parse SVG markup into detached nodes.
    ///
    /// The children of the root `<svg>` become the fragment's roots. Markup
    /// without an `<svg>` root is wrapped in one first.
    pub fn parse_fragment(&mut self, markup: &str) -> MenuResult<Fragment> {
        let wrapped;
        let direct = parse_xml(markup)
            .ok()
            .filter(|d| d.root_element().tag_name().name().eq_ignore_ascii_case("svg"));
        let xml = match direct {
            Some(doc) => doc,
            None => {
                wrapped = format!(
                    r#"<svg xmlns="{SVG_NS}" xmlns:xlink="{XLINK_NS}">{}</svg>"#,
                    markup.trim()
                );
                parse_xml(&wrapped).map_err(|err| MenuError::parse(format!("svg markup: {err}")))?
            }
        };

        let roots = xml
            .root_element()
            .children()
            .filter_map(|child| self.import(child))
            .collect();
        Ok(Fragment::new(roots))
    }

    /// Serialize the subtree at `id` as markup.
    pub fn to_markup(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.write_markup(id, &mut out);
        out
    }

    fn write_markup(&self, id: NodeId, out: &mut String) {
        let Some(node) = self.node(id) else {
            return;
        };
        let tag = match &node.kind {
            NodeKind::Text(t) => {
                escape_into(t, false, out);
                return;
            }
            NodeKind::Element(tag) => tag,
        };

        out.push('<');
        out.push_str(tag);
        for (k, v) in &node.attrs {
            out.push(' ');
            out.push_str(k);
            out.push_str("=\"");
            escape_into(v, true, out);
            out.push('"');
        }
        if !node.style.is_empty() {
            out.push_str(" style=\"");
            escape_into(&self.style_text(id), true, out);
            out.push('"');
        }
        if node.children.is_empty() {
            out.push_str("/>");
            return;
        }
        out.push('>');
        for &child in &node.children {
            self.write_markup(child, out);
        }
        out.push_str("</");
        out.push_str(tag);
        out.push('>');
    }
}

fn escape_into(s: &str, attr: bool, out: &mut String) {
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if attr => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/markup.rs"]
mod tests;
