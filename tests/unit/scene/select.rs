use super::*;

struct Fixture {
    doc: Document,
    svg: NodeId,
    group: NodeId,
    sector: NodeId,
    hint: NodeId,
    bg: NodeId,
}

fn fixture() -> Fixture {
    let mut doc = Document::new();
    let svg = doc.create_element("svg");
    let group = doc.create_element("g");
    doc.set_plain(group, "transform", "matrix(1,0,0,1,0,0)");
    let sector = doc.create_element("path");
    doc.add_class(sector, "radial-sector");
    let hint_group = doc.create_element("g");
    doc.add_class(hint_group, "hint-group");
    let bg = doc.create_element("path");
    doc.add_class(bg, "radial-hint-bg active");
    let hint = doc.create_element("text");
    doc.add_class(hint, "radial-hint");
    doc.set_plain(hint, "id", "new");

    doc.append(svg, group);
    doc.append(group, sector);
    doc.append(group, hint_group);
    doc.append(hint_group, bg);
    doc.append(hint_group, hint);
    Fixture {
        doc,
        svg,
        group,
        sector,
        hint,
        bg,
    }
}

#[test]
fn simple_selectors() {
    let f = fixture();
    assert_eq!(f.doc.select(f.svg, ".radial-sector"), Some(f.sector));
    assert_eq!(f.doc.select(f.svg, "#new"), Some(f.hint));
    assert_eq!(f.doc.select(f.svg, "text"), Some(f.hint));
    assert_eq!(f.doc.select(f.svg, "g[transform]"), Some(f.group));
    assert_eq!(f.doc.select(f.svg, "[id=new]"), Some(f.hint));
    assert_eq!(f.doc.select(f.svg, "[id='new']"), Some(f.hint));
    assert_eq!(f.doc.select(f.svg, "circle"), None);
}

#[test]
fn compound_and_combinators() {
    let f = fixture();
    assert_eq!(f.doc.select(f.svg, ".radial-hint-bg.active"), Some(f.bg));
    assert_eq!(f.doc.select(f.svg, "g .radial-hint"), Some(f.hint));
    assert_eq!(f.doc.select(f.svg, "g > .radial-sector"), Some(f.sector));
    assert_eq!(f.doc.select(f.svg, "svg > .radial-hint"), None);
    assert_eq!(f.doc.select_all(f.svg, "path").len(), 2);
    assert_eq!(
        f.doc.select_all(f.svg, "#new, .radial-sector"),
        vec![f.sector, f.hint]
    );
}

#[test]
fn scope_excludes_the_node_itself() {
    let f = fixture();
    assert_eq!(f.doc.select(f.group, "g"), f.doc.select(f.svg, ".hint-group"));
    assert_ne!(f.doc.select(f.group, "g"), Some(f.group));
}

#[test]
fn closest_includes_self() {
    let f = fixture();
    assert_eq!(f.doc.closest(f.hint, "g[transform]"), Some(f.group));
    assert_eq!(f.doc.closest(f.group, "g[transform]"), Some(f.group));
    assert_eq!(f.doc.closest(f.hint, "circle"), None);
}

#[test]
fn invalid_selectors_match_nothing() {
    let f = fixture();
    assert_eq!(f.doc.select(f.svg, "g >"), None);
    assert!(f.doc.select_all(f.svg, "[unterminated").is_empty());
    assert!(Selector::parse("a..b").is_err());
    assert!(Selector::parse("path.radial-sector").is_ok());
}
