//! Structural queries over a [`Document`].
//!
//! Supported grammar: type selectors, `*`, `#id`, `.class`, `[attr]`,
//! `[attr=value]` (value optionally quoted), compound selectors, the
//! descendant and `>` child combinators, and `,` separated groups.
//!
//! Queries are scoped to the descendants of a node, but combinators are
//! matched against the full ancestor chain, like `Element.querySelector`.

use crate::foundation::error::{MenuError, MenuResult};
use crate::scene::document::Document;
use crate::scene::node::NodeId;

#[derive(Clone, Debug, Default, PartialEq)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attrs: Vec<(String, Option<String>)>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Combinator {
    Descendant,
    Child,
}

#[derive(Clone, Debug, PartialEq)]
struct Complex {
    /// Right-most compound last; `combinators[i]` joins `parts[i]` and `parts[i + 1]`.
    parts: Vec<Compound>,
    combinators: Vec<Combinator>,
}

#[derive(Clone, Debug, PartialEq)]
/// Parsed selector list: type, `#id`, `.class`, `[attr]` and `[attr=value]`
/// compounds joined by descendant or child combinators.
pub struct Selector {
    groups: Vec<Complex>,
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_'
}

struct SelectorParser<'a> {
    chars: Vec<char>,
    pos: usize,
    src: &'a str,
}

impl<'a> SelectorParser<'a> {
    fn new(src: &'a str) -> Self {
        Self {
            chars: src.chars().collect(),
            pos: 0,
            src,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn err(&self, msg: &str) -> MenuError {
        MenuError::parse(format!("selector '{}': {msg} at {}", self.src, self.pos))
    }

    fn skip_ws(&mut self) -> bool {
        let start = self.pos;
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
        self.pos > start
    }

    fn ident(&mut self) -> MenuResult<String> {
        let start = self.pos;
        while self.peek().is_some_and(is_ident_char) {
            self.pos += 1;
        }
        if self.pos == start {
            return Err(self.err("expected identifier"));
        }
        Ok(self.chars[start..self.pos].iter().collect())
    }

    fn attr_value(&mut self) -> MenuResult<String> {
        match self.peek() {
            Some(q @ ('"' | '\'')) => {
                self.pos += 1;
                let start = self.pos;
                while self.peek().is_some_and(|c| c != q) {
                    self.pos += 1;
                }
                if self.peek() != Some(q) {
                    return Err(self.err("unterminated string"));
                }
                let value = self.chars[start..self.pos].iter().collect();
                self.pos += 1;
                Ok(value)
            }
            _ => self.ident(),
        }
    }

    fn compound(&mut self) -> MenuResult<Compound> {
        let mut out = Compound::default();
        let start = self.pos;
        match self.peek() {
            Some('*') => self.pos += 1,
            Some(c) if is_ident_char(c) => out.tag = Some(self.ident()?),
            _ => {}
        }
        loop {
            match self.peek() {
                Some('#') => {
                    self.pos += 1;
                    out.id = Some(self.ident()?);
                }
                Some('.') => {
                    self.pos += 1;
                    out.classes.push(self.ident()?);
                }
                Some('[') => {
                    self.pos += 1;
                    self.skip_ws();
                    let name = self.ident_with_colon()?;
                    self.skip_ws();
                    let value = if self.peek() == Some('=') {
                        self.pos += 1;
                        self.skip_ws();
                        Some(self.attr_value()?)
                    } else {
                        None
                    };
                    self.skip_ws();
                    if self.peek() != Some(']') {
                        return Err(self.err("expected ']'"));
                    }
                    self.pos += 1;
                    out.attrs.push((name, value));
                }
                _ => break,
            }
        }
        if self.pos == start {
            return Err(self.err("expected selector"));
        }
        Ok(out)
    }

    /// Attribute names may carry a namespace prefix such as `xlink:href`.
    fn ident_with_colon(&mut self) -> MenuResult<String> {
        let mut name = self.ident()?;
        if self.peek() == Some(':') {
            self.pos += 1;
            name.push(':');
            name.push_str(&self.ident()?);
        }
        Ok(name)
    }

    fn complex(&mut self) -> MenuResult<Complex> {
        self.skip_ws();
        let mut parts = vec![self.compound()?];
        let mut combinators = Vec::new();
        loop {
            let had_ws = self.skip_ws();
            match self.peek() {
                None | Some(',') => break,
                Some('>') => {
                    self.pos += 1;
                    self.skip_ws();
                    combinators.push(Combinator::Child);
                }
                Some(_) if had_ws => combinators.push(Combinator::Descendant),
                Some(_) => return Err(self.err("unexpected character")),
            }
            parts.push(self.compound()?);
        }
        Ok(Complex { parts, combinators })
    }

    fn selector(mut self) -> MenuResult<Selector> {
        let mut groups = vec![self.complex()?];
        while self.peek() == Some(',') {
            self.pos += 1;
            groups.push(self.complex()?);
        }
        if self.pos != self.chars.len() {
            return Err(self.err("trailing input"));
        }
        Ok(Selector { groups })
    }
}

impl Selector {
    /// Parse a comma-separated selector list.
    pub fn parse(src: &str) -> MenuResult<Self> {
        SelectorParser::new(src).selector()
    }

    /// Whether `node` matches any selector in the list.
    pub fn matches(&self, doc: &Document, node: NodeId) -> bool {
        self.groups.iter().any(|g| g.matches(doc, node))
    }
}

impl std::str::FromStr for Selector {
    type Err = MenuError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Compound {
    fn matches(&self, doc: &Document, node: NodeId) -> bool {
        let Some(tag) = doc.tag(node) else {
            return false;
        };
        if self.tag.as_deref().is_some_and(|t| !t.eq_ignore_ascii_case(tag)) {
            return false;
        }
        if self
            .id
            .as_deref()
            .is_some_and(|id| doc.attr(node, "id") != Some(id))
        {
            return false;
        }
        if !self.classes.iter().all(|c| doc.has_class(node, c)) {
            return false;
        }
        self.attrs.iter().all(|(name, value)| match (doc.attr(node, name), value) {
            (Some(_), None) => true,
            (Some(actual), Some(expected)) => actual == expected,
            (None, _) => false,
        })
    }
}

impl Complex {
    fn matches(&self, doc: &Document, node: NodeId) -> bool {
        let last = self.parts.len() - 1;
        self.parts[last].matches(doc, node) && self.matches_left(doc, node, last)
    }

    /// Match `parts[..idx]` against the ancestors of `node`, which already
    /// matched `parts[idx]`.
    fn matches_left(&self, doc: &Document, node: NodeId, idx: usize) -> bool {
        if idx == 0 {
            return true;
        }
        let part = &self.parts[idx - 1];
        match self.combinators[idx - 1] {
            Combinator::Child => doc
                .parent(node)
                .is_some_and(|p| part.matches(doc, p) && self.matches_left(doc, p, idx - 1)),
            Combinator::Descendant => doc
                .ancestors(node)
                .any(|a| part.matches(doc, a) && self.matches_left(doc, a, idx - 1)),
        }
    }
}

pub(crate) fn parse_or_warn(selector: &str) -> Option<Selector> {
    match Selector::parse(selector) {
        Ok(sel) => Some(sel),
        Err(err) => {
            tracing::warn!(%err, "invalid selector matches nothing");
            None
        }
    }
}

impl Document {
    /// First descendant of `scope` matching `selector`, in document order.
    pub fn select(&self, scope: NodeId, selector: &str) -> Option<NodeId> {
        let sel = parse_or_warn(selector)?;
        self.descendants(scope)
            .into_iter()
            .find(|&n| sel.matches(self, n))
    }

    /// Every descendant of `scope` matching `selector`, in document order.
    pub fn select_all(&self, scope: NodeId, selector: &str) -> Vec<NodeId> {
        let Some(sel) = parse_or_warn(selector) else {
            return Vec::new();
        };
        self.descendants(scope)
            .into_iter()
            .filter(|&n| sel.matches(self, n))
            .collect()
    }

    /// `node` itself or its nearest ancestor matching `selector`.
    pub fn closest(&self, node: NodeId, selector: &str) -> Option<NodeId> {
        let sel = parse_or_warn(selector)?;
        std::iter::once(node)
            .chain(self.ancestors(node))
            .find(|&n| sel.matches(self, n))
    }

    /// Whether `node` matches `selector`; invalid selectors never match.
    pub fn matches(&self, node: NodeId, selector: &str) -> bool {
        parse_or_warn(selector).is_some_and(|sel| sel.matches(self, node))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/select.rs"]
mod tests;
