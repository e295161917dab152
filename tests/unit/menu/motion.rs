use std::cell::RefCell;
use std::collections::HashMap;

use super::*;
use crate::assets::metrics::{FixedTextMetrics, FontMetrics, TextMetrics};
use crate::assets::sprite::InlineSprite;
use crate::menu::config::{CentralButton, MenuConfig, Sector};
use crate::scene::events::EventKind;
use crate::transform::Matrix;

const SPRITE: &str = r#"<svg xmlns="http://www.w3.org/2000/svg">
  <g id="new"><rect width="20" height="10"/></g>
  <g id="open"><rect width="10" height="10"/></g>
  <g id="link"><rect width="10" height="10"/></g>
  <g id="match"><rect width="10" height="10"/></g>
</svg>"#;

fn config() -> MenuConfig {
    MenuConfig {
        inner_radius: 75.0,
        outer_radius: 150.0,
        opacity: 0.5,
        hint_padding: Some(2.0),
        sectors: vec![
            Sector::new("new", "New"),
            Sector::new("open", "Open"),
            Sector::new("link", "Link"),
        ],
        central_button: Some(CentralButton::new("match", "Home")),
        ..MenuConfig::default()
    }
}

fn build(config: MenuConfig) -> Builder {
    let metrics: Rc<dyn TextMetrics> = Rc::new(FixedTextMetrics::new(10.0, FontMetrics::new(5.0, 2.0)));
    Builder::with_seed(config, &InlineSprite(SPRITE.to_string()), metrics, 42).unwrap()
}

fn opened() -> Builder {
    let mut menu = build(config());
    menu.show(&PointerEvent::context_menu(400.0, 300.0)).unwrap();
    menu.run_to_completion(16.0, 10_000.0);
    menu
}

/// Start whatever was just scheduled, then advance `ms` past it.
fn settle(menu: &mut Builder, ms: f64) {
    let now = menu.now();
    menu.tick(now);
    menu.tick(now + ms);
}

fn rest_matrices(menu: &Builder) -> HashMap<NodeId, Matrix> {
    menu.button_groups()
        .into_iter()
        .map(|g| (g, menu.document().matrix(g)))
        .collect()
}

fn near(m: Matrix, expected: Matrix) -> bool {
    [(m.a, expected.a), (m.b, expected.b), (m.e, expected.e), (m.f, expected.f)]
        .iter()
        .all(|(a, b)| (a - b).abs() < 1e-6)
}

fn hover(menu: &mut Builder, target: NodeId, kind: EventKind) {
    menu.dispatch(target, &PointerEvent::new(kind)).unwrap();
}

fn hint_path_d(menu: &Builder, hint: NodeId) -> String {
    let doc = menu.document();
    let text_path = doc.select(hint, "textPath").unwrap();
    let href = doc.attr(text_path, "xlink:href").unwrap();
    let path = doc.element_by_id(menu.paper.defs, &href[1..]).unwrap();
    doc.attr(path, "d").unwrap().to_string()
}

#[test]
fn show_positions_and_reveals() {
    let mut menu = build(config());
    let placed: Vec<Matrix> = menu
        .button_groups()
        .iter()
        .map(|&g| menu.document().matrix(g))
        .collect();

    menu.show(&PointerEvent::context_menu(200.0, 220.0)).unwrap();
    let doc = menu.document();
    assert!(!doc.has_class(menu.element(), "hidden"));
    assert_eq!(doc.style(menu.svg(), "left"), Some("50px"));
    assert_eq!(doc.style(menu.svg(), "top"), Some("70px"));
    assert_eq!(menu.state(), MenuState::Opening);
    assert!(menu.is_animating());

    // Every reveal finishes within eight base durations.
    settle(&mut menu, 2400.0);
    assert!(!menu.is_animating());
    assert_eq!(menu.state(), MenuState::Open);
    assert_eq!(menu.document().matrix(menu.container()), Matrix::identity());
    for (group, expected) in menu.button_groups().into_iter().zip(placed) {
        let m = menu.document().matrix(group);
        for (a, b) in [(m.a, expected.a), (m.b, expected.b), (m.e, expected.e), (m.f, expected.f)] {
            assert!((a - b).abs() < 1e-6);
        }
    }
}

#[test]
fn hide_collapses_then_hides() {
    let mut menu = opened();
    menu.hide().unwrap();
    assert_eq!(menu.state(), MenuState::Closing);
    assert!(!menu.document().has_class(menu.element(), "hidden"));

    settle(&mut menu, 300.0);
    assert_eq!(menu.state(), MenuState::Closed);
    assert!(menu.document().has_class(menu.element(), "hidden"));
    // Collapsed onto the centre point.
    let m = menu.document().matrix(menu.container());
    assert!([m.a, m.b, m.c, m.d].iter().all(|v| v.abs() < 1e-9));
    assert!((m.e - 150.0).abs() < 1e-9 && (m.f - 150.0).abs() < 1e-9);
}

#[test]
fn hide_while_closed_does_nothing() {
    let mut menu = build(config());
    menu.hide().unwrap();
    assert!(!menu.is_animating());
    assert_eq!(menu.state(), MenuState::Closed);
}

#[test]
fn hide_during_opening_wins() {
    let mut menu = build(config());
    menu.show(&PointerEvent::context_menu(0.0, 0.0)).unwrap();
    menu.tick(100.0);
    menu.hide().unwrap();
    // One reveal tween per button and the container, never stacked.
    assert_eq!(menu.animator.active_count(), menu.button_groups().len() + 1);

    menu.run_to_completion(16.0, 10_000.0);
    assert_eq!(menu.state(), MenuState::Closed);
    assert!(menu.document().has_class(menu.element(), "hidden"));
}

#[test]
fn show_before_first_tick_animates_from_host_clock() {
    let mut menu = build(config());
    menu.show(&PointerEvent::context_menu(200.0, 220.0)).unwrap();

    // Host clocks rarely start at zero.
    menu.tick(123_456.0);
    menu.tick(123_472.0);
    assert!(menu.is_animating());
    assert_eq!(menu.state(), MenuState::Opening);
    assert_ne!(menu.document().matrix(menu.container()), Matrix::identity());

    menu.tick(123_456.0 + 2400.0);
    assert_eq!(menu.state(), MenuState::Open);
    assert_eq!(menu.document().matrix(menu.container()), Matrix::identity());
}

#[test]
fn show_after_idle_gap_still_animates() {
    let mut menu = build(config());
    menu.tick(1000.0);
    assert!(!menu.is_animating());

    menu.show(&PointerEvent::context_menu(200.0, 220.0)).unwrap();
    menu.tick(31_000.0);
    menu.tick(31_016.0);
    assert!(menu.is_animating());
    assert_eq!(menu.state(), MenuState::Opening);
    assert_ne!(menu.document().matrix(menu.container()), Matrix::identity());
}

#[test]
fn reveal_durations_are_staggered_per_button() {
    let mut menu = build(config());
    let rest = rest_matrices(&menu);
    let base = menu.config().duration;
    menu.show(&PointerEvent::context_menu(200.0, 220.0)).unwrap();

    let mut sectors: Vec<(NodeId, f64)> = menu
        .buttons
        .iter()
        .filter(|b| matches!(b.kind, ButtonKind::Sector(_)))
        .map(|b| (b.group, menu.reveal_ms[&b.group]))
        .collect();
    assert_eq!(sectors.len(), 3);
    for &(_, ms) in &sectors {
        assert!((base..=8.0 * base).contains(&ms), "reveal of {ms}ms out of range");
    }
    sectors.sort_by(|a, b| a.1.total_cmp(&b.1));
    let (fast, fast_ms) = sectors[0];
    let (slow, slow_ms) = sectors[sectors.len() - 1];
    assert!(slow_ms > fast_ms);

    menu.tick(0.0);
    menu.tick(base - 1.0);
    for &(group, _) in &sectors {
        assert!(menu.slots[&(group, Slot::Reveal)].is_active());
        assert_ne!(menu.document().matrix(group), rest[&group]);
    }

    menu.tick(fast_ms);
    assert!(near(menu.document().matrix(fast), rest[&fast]));
    assert!(!menu.slots.contains_key(&(fast, Slot::Reveal)));
    assert!(menu.slots[&(slow, Slot::Reveal)].is_active());
    assert_ne!(menu.document().matrix(slow), rest[&slow]);
    assert_eq!(menu.state(), MenuState::Opening);
}

#[test]
fn toggle_alternates() {
    let mut menu = build(config());
    let at = PointerEvent::context_menu(10.0, 10.0);
    menu.toggle(&at).unwrap();
    assert_eq!(menu.state(), MenuState::Opening);
    menu.toggle(&at).unwrap();
    assert_eq!(menu.state(), MenuState::Closing);
    menu.toggle(&at).unwrap();
    assert_eq!(menu.state(), MenuState::Opening);
}

#[test]
fn sector_hover_pulls_wedge_icon_and_hint_inwards() {
    let mut menu = opened();
    let button = menu.buttons[0];
    let angle = menu.layout.angle;
    let hint = button.hint.unwrap();
    let bg = button.hint_bg.unwrap();
    let icon = button.icon.unwrap();
    let hint_data = menu.hint_data[&button.hint_group.unwrap()];
    let rest = menu.document().attr(button.shape, "d").unwrap().to_string();

    hover(&mut menu, button.shape, EventKind::MouseOver);
    assert!(menu.document().has_class(hint, "active"));
    assert!(menu.document().has_class(bg, "active"));
    assert_eq!(menu.document().style(bg, "opacity"), Some("0.5"));

    settle(&mut menu, 200.0);
    let doc = menu.document();
    assert_eq!(
        doc.attr(button.shape, "d"),
        Some(describe_sector(150.0, 150.0, 140.0, 75.0, 0.0, angle).as_str())
    );
    let arc = hint_arc(150.0, hint_data.base_radius - 10.0, hint_data.text_length, hint_data.sector_mid_angle);
    assert_eq!(hint_path_d(&menu, hint), arc);
    assert_eq!(doc.attr(bg, "d"), Some(arc.as_str()));

    let init = menu.icon_data[&icon];
    let pos = polar_to_cartesian(150.0, 150.0, init.mid_radius - 10.0, angle / 2.0);
    let expected = icon_matrix(pos, init.scale * 0.9, init.rotation, &init.bbox);
    assert_eq!(doc.matrix(icon).to_string(), expected.to_string());

    hover(&mut menu, button.shape, EventKind::MouseOut);
    assert!(!menu.document().has_class(hint, "active"));
    assert_eq!(menu.document().style(bg, "opacity"), Some("0"));
    settle(&mut menu, 2000.0);
    assert_eq!(menu.document().attr(button.shape, "d"), Some(rest.as_str()));
}

#[test]
fn hover_reentry_replaces_running_tween() {
    let mut menu = opened();
    let shape = menu.buttons[1].shape;
    hover(&mut menu, shape, EventKind::MouseOver);
    assert_eq!(menu.animator.active_count(), 1);
    hover(&mut menu, shape, EventKind::MouseOut);
    hover(&mut menu, shape, EventKind::MouseOver);
    assert_eq!(menu.animator.active_count(), 1);
}

#[test]
fn central_hover_shrinks_radius() {
    let mut menu = opened();
    let central = menu.buttons[3];
    assert_eq!(central.kind, ButtonKind::Central);
    let data = menu.central_hint_data[&central.hint.unwrap()];

    hover(&mut menu, central.shape, EventKind::MouseOver);
    settle(&mut menu, 200.0);
    assert_eq!(menu.document().attr(central.shape, "r"), Some("37"));
    let arc = describe_arc(150.0, 150.0, 37.0 + data.offset, data.start_angle, data.end_angle, false, data.alter);
    assert_eq!(hint_path_d(&menu, central.hint.unwrap()), arc);

    hover(&mut menu, central.shape, EventKind::MouseOut);
    settle(&mut menu, 200.0);
    assert_eq!(menu.document().attr(central.shape, "r"), Some("45"));
}

#[test]
fn wheel_steps_opacity() {
    let mut menu = opened();
    let svg = menu.svg();

    menu.dispatch(svg, &PointerEvent::wheel(100.0)).unwrap();
    assert_eq!(menu.opacity(), 0.47);
    for sector in menu.document().select_all(svg, ".radial-sector") {
        assert_eq!(menu.document().attr(sector, "opacity"), Some("0.47"));
    }

    menu.dispatch(svg, &PointerEvent::wheel(-3.0)).unwrap();
    assert_eq!(menu.opacity(), 0.5);
    menu.dispatch(svg, &PointerEvent::wheel(0.0)).unwrap();
    assert_eq!(menu.opacity(), 0.5);
}

#[test]
fn wheel_updates_active_hint_background_and_clamps() {
    let mut menu = opened();
    let button = menu.buttons[0];
    hover(&mut menu, button.shape, EventKind::MouseOver);

    for _ in 0..10 {
        menu.dispatch(button.shape, &PointerEvent::wheel(1.0)).unwrap();
    }
    assert_eq!(menu.opacity(), 0.4);
    let bg = button.hint_bg.unwrap();
    assert_eq!(menu.document().style(bg, "opacity"), Some("0.4"));
    let other_bg = menu.buttons[1].hint_bg.unwrap();
    assert_eq!(menu.document().style(other_bg, "opacity"), Some("0"));

    for _ in 0..30 {
        menu.dispatch(button.shape, &PointerEvent::wheel(-1.0)).unwrap();
    }
    assert_eq!(menu.opacity(), 1.0);
}

#[test]
fn primary_release_emits_click_and_runs_onclick() {
    let fired = Rc::new(RefCell::new(0));
    let mut cfg = config();
    let counter = Rc::clone(&fired);
    cfg.sectors[1] = Sector::new("open", "Open").with_onclick(move || *counter.borrow_mut() += 1);
    let mut menu = build(cfg);

    let clicks = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&clicks);
    menu.on("click", move |e| sink.borrow_mut().push(e.clone()));

    let (wedge, central) = (menu.buttons[1].shape, menu.buttons[3].shape);
    menu.dispatch(wedge, &PointerEvent::mouse_up(2)).unwrap();
    assert!(clicks.borrow().is_empty());

    menu.dispatch(wedge, &PointerEvent::mouse_up(0)).unwrap();
    menu.dispatch(central, &PointerEvent::mouse_up(0)).unwrap();
    assert_eq!(
        *clicks.borrow(),
        vec![
            ClickEvent {
                icon: "open".to_string(),
                hint: "Open".to_string()
            },
            ClickEvent {
                icon: "match".to_string(),
                hint: "Home".to_string()
            },
        ]
    );
    assert_eq!(*fired.borrow(), 1);
}

#[test]
fn canvas_click_and_context_menu_close() {
    let mut menu = opened();
    let wedge = menu.buttons[0].shape;
    let flow = menu.dispatch(wedge, &PointerEvent::click()).unwrap();
    assert_eq!(flow, EventFlow::Stop);
    assert_eq!(menu.state(), MenuState::Closing);

    let mut menu = opened();
    let flow = menu.dispatch(menu.svg(), &PointerEvent::context_menu(1.0, 1.0)).unwrap();
    assert_eq!(flow, EventFlow::Stop);
    assert_eq!(menu.state(), MenuState::Closing);
}

#[test]
fn backdrop_click_closes_only_when_targeted() {
    let mut menu = opened();
    let element = menu.element();
    let extra = menu.document_mut().create_element("span");
    menu.document_mut().append(element, extra);

    menu.dispatch(extra, &PointerEvent::click()).unwrap();
    assert_eq!(menu.state(), MenuState::Open);

    menu.dispatch(element, &PointerEvent::click()).unwrap();
    assert_eq!(menu.state(), MenuState::Closing);
}
