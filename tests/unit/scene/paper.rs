use super::*;

#[test]
fn paper_discovers_or_creates_defs() {
    let mut doc = Document::new();
    let paper = Paper::create(&mut doc);
    assert_eq!(doc.tag(paper.defs), Some("defs"));
    assert_eq!(doc.parent(paper.defs), Some(paper.root));

    let again = Paper::new(&mut doc, paper.root);
    assert_eq!(again, paper);

    let svg = doc.create_element("svg");
    let defs = doc.create_element("defs");
    doc.append(svg, defs);
    assert_eq!(Paper::new(&mut doc, svg).defs, defs);
}

#[test]
fn factories_append_and_own() {
    let mut doc = Document::new();
    let paper = Paper::create(&mut doc);
    let path = paper.path(&mut doc, "M0 0");
    let circle = paper.circle(&mut doc, 10.0, 10.0, 4.5);
    let text = paper.text(&mut doc, 1.0, 2.0, "x");
    let g = paper.g(&mut doc, &[path, circle]);

    assert_eq!(doc.children(g), vec![path, circle]);
    assert_eq!(doc.parent(text), Some(paper.root));
    assert_eq!(doc.attr(circle, "r"), Some("4.5"));
    assert_eq!(doc.attr(text, "x"), Some("1"));
    for n in [path, circle, text, g] {
        assert_eq!(doc.paper_of(n), Some(paper.root));
    }
}

#[test]
fn paper_is_inherited_through_ancestors() {
    let mut doc = Document::new();
    let paper = Paper::create(&mut doc);
    let g = paper.g(&mut doc, &[]);
    let foreign = doc.create_element("text");
    assert_eq!(doc.paper_of(foreign), None);
    doc.append(g, foreign);
    assert_eq!(doc.paper_of(foreign), Some(paper.root));
}

#[test]
fn fragment_queries_include_roots() {
    let mut doc = Document::new();
    let a = doc.create_element("g");
    doc.set_plain(a, "id", "a");
    let b = doc.create_element("g");
    let inner = doc.create_element("path");
    doc.add_class(inner, "x");
    doc.append(b, inner);
    let frag = Fragment::new(vec![a, b]);

    assert_eq!(frag.select(&doc, "#a"), Some(a));
    assert_eq!(frag.select_all(&doc, "g"), vec![a, b]);
    assert_eq!(frag.select(&doc, ".x"), Some(inner));
    assert_eq!(frag.select(&doc, "#missing"), None);
}

#[test]
fn fragment_lookup_by_raw_id() {
    let mut doc = Document::new();
    let frag = doc
        .parse_fragment(r#"<svg><g id="a.b"><path id="leaf" d="M0 0"/></g></svg>"#)
        .unwrap();
    assert!(frag.get_by_id(&doc, "a.b").is_some());
    assert_eq!(frag.get_by_id(&doc, "leaf"), frag.select(&doc, "#leaf"));
    assert_eq!(frag.get_by_id(&doc, "nope"), None);
}
