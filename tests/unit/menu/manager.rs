use std::cell::RefCell;

use super::*;
use crate::assets::metrics::FixedTextMetrics;
use crate::assets::sprite::InlineSprite;
use crate::menu::config::Sector;

fn config() -> MenuConfig {
    MenuConfig {
        sectors: vec![Sector::new("a", "A"), Sector::new("b", "B")],
        ..MenuConfig::default()
    }
}

fn manager(config: MenuConfig) -> Manager {
    let sprite = InlineSprite(r#"<g id="a"><rect width="4" height="4"/></g><g id="b"><rect width="4" height="4"/></g>"#.to_string());
    Manager::new(config, &sprite, Rc::new(FixedTextMetrics::default())).unwrap()
}

#[test]
fn new_mounts_under_body() {
    let m = manager(config());
    let doc = m.document();
    assert_eq!(doc.parent(m.builder().element()), Some(doc.body()));
    assert!(doc.is_connected(m.builder().svg()));
    assert!(!m.shown());
}

#[test]
fn attach_moves_the_element() {
    let mut m = manager(config());
    let body = m.document().body();
    let host = m.document_mut().create_element("div");
    m.document_mut().append(body, host);
    m.attach(host);
    assert_eq!(m.document().parent(m.builder().element()), Some(host));
    assert_eq!(m.document().children(body), vec![host]);
}

#[test]
fn window_context_menu_opens_when_bound() {
    let mut m = manager(config());
    assert!(!m.on_window_context_menu(&PointerEvent::click()).unwrap());
    assert!(m.on_window_context_menu(&PointerEvent::context_menu(300.0, 300.0)).unwrap());
    assert!(m.shown());

    m.tick(5000.0);
    assert_eq!(m.builder().state(), MenuState::Opening);
    m.tick(7400.0);
    assert_eq!(m.builder().state(), MenuState::Open);
    m.hide().unwrap();
    assert!(!m.shown());
}

#[test]
fn unbound_manager_ignores_window_events() {
    let mut m = manager(MenuConfig {
        auto_bind_context_menu: false,
        ..config()
    });
    assert!(!m.on_window_context_menu(&PointerEvent::context_menu(0.0, 0.0)).unwrap());
    assert!(!m.shown());

    m.show(&PointerEvent::context_menu(0.0, 0.0)).unwrap();
    assert!(m.shown());
}

#[test]
fn toggle_and_click_pass_through() {
    let mut m = manager(config());
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    m.on("click", move |e| sink.borrow_mut().push(e.icon.clone()));

    let at = PointerEvent::context_menu(100.0, 100.0);
    m.toggle(&at).unwrap();
    assert!(m.shown());

    let group = m.builder().button_groups()[1];
    m.dispatch(group, &PointerEvent::mouse_up(0)).unwrap();
    assert_eq!(*seen.borrow(), vec!["b".to_string()]);

    m.toggle(&at).unwrap();
    assert!(!m.shown());
    m.builder_mut().run_to_completion(16.0, 1000.0);
    assert_eq!(m.builder().state(), MenuState::Closed);
}
