//! Show/hide, hover, wheel and click behaviour of a built menu.

use std::rc::Rc;

use rand::Rng;

use crate::animation::animator::{AnimationHandle, Animator};
use crate::animation::ease::Ease;
use crate::foundation::core::{Num, Point, round_to};
use crate::foundation::error::MenuResult;
use crate::menu::builder::{
    Builder, Button, ButtonKind, ClickEvent, Layout, MenuAction, MenuScene, MenuState, Slot,
};
use crate::menu::geometry::{describe_arc, describe_sector, hint_arc, icon_matrix, polar_to_cartesian};
use crate::scene::attrs::{Attr, PathRef};
use crate::scene::document::Document;
use crate::scene::events::{EventFlow, PointerEvent};
use crate::scene::node::NodeId;
use crate::transform::{TransformCommand, commands_to_matrix};

const HOVER_IN_MS: f64 = 200.0;
const HOVER_OUT_MS: f64 = 2000.0;
const CENTRAL_HOVER_MS: f64 = 200.0;
/// Pixels the wedge pulls back at full hover.
const HOVER_OUTWARD: f64 = 10.0;
const CENTRAL_SHRINK: f64 = 8.0;
const OPACITY_STEP: f64 = 0.03;
const OPACITY_MIN: f64 = 0.4;
const OPACITY_MAX: f64 = 1.0;

/// Spin-and-scale about the centre: `r{90-90v},c,c s{v},{v},c,c`.
fn reveal_matrix(rotate: f64, v: f64, c: f64) -> crate::transform::Matrix {
    commands_to_matrix(&[
        TransformCommand::Rotate {
            angle: rotate,
            cx: c,
            cy: c,
        },
        TransformCommand::Scale {
            sx: v,
            sy: v,
            cx: c,
            cy: c,
        },
    ])
}

/// Point a hint's text path and its background pill at `arc`.
fn set_hint_arc(doc: &mut Document, hint: NodeId, bg: Option<NodeId>, arc: String) {
    if let Some(bg) = bg {
        doc.set_plain(bg, "d", &arc);
    }
    if let Err(err) = doc.set_attr(hint, Attr::TextPath(PathRef::Raw(arc))) {
        tracing::error!(%err, "failed to update hint arc");
    }
}

impl Builder {
    /// Register `callback` for `event`. Only `click` is emitted.
    pub fn on(&mut self, event: &str, callback: impl Fn(&ClickEvent) + 'static) {
        self.listeners
            .entry(event.to_string())
            .or_default()
            .push(Rc::new(callback));
    }

    fn emit(&self, event: &str, payload: &ClickEvent) {
        for listener in self.listeners.get(event).into_iter().flatten() {
            listener(payload);
        }
    }

    fn set_state(&mut self, state: MenuState) {
        tracing::debug!(from = ?self.scene.state, to = ?state, "menu state");
        self.scene.state = state;
    }

    /// Advance all running animations to `now_ms`.
    pub fn tick(&mut self, now_ms: f64) {
        self.animator.tick(now_ms, &mut self.scene);
        self.slots.retain(|_, handle| handle.is_active());
    }

    /// Tick every `frame_ms` until no animation runs, for at most `max_ms`.
    /// Returns the clock value reached.
    pub fn run_to_completion(&mut self, frame_ms: f64, max_ms: f64) -> f64 {
        let now = self.animator.run_to_completion(&mut self.scene, frame_ms, max_ms);
        self.slots.retain(|_, handle| handle.is_active());
        now
    }

    /// Animator clock in milliseconds.
    pub fn now(&self) -> f64 {
        self.animator.now()
    }

    /// Whether any tween is still scheduled.
    pub fn is_animating(&self) -> bool {
        !self.animator.is_idle()
    }

    /// Route a host input event through the scene, then apply what the
    /// listeners requested.
    pub fn dispatch(&mut self, target: NodeId, event: &PointerEvent) -> MenuResult<EventFlow> {
        let flow = self.scene.doc.dispatch(target, event);
        loop {
            let next = self.actions.borrow_mut().pop_front();
            let Some(action) = next else {
                break;
            };
            match action {
                MenuAction::Close => self.hide()?,
                MenuAction::Wheel(delta_y) => self.transform_opacity(delta_y),
                MenuAction::HoverIn(group) => self.hover(group, true)?,
                MenuAction::HoverOut(group) => self.hover(group, false)?,
                MenuAction::Activate(group) => self.activate(group),
            }
        }
        Ok(flow)
    }

    /// Stop whatever occupies `key`, then start the new tween there.
    fn run_in_slot<F>(&mut self, key: (NodeId, Slot), schedule: F) -> MenuResult<()>
    where
        F: FnOnce(&mut Animator<MenuScene>) -> MenuResult<AnimationHandle>,
    {
        if let Some(previous) = self.slots.remove(&key) {
            previous.stop();
        }
        let handle = schedule(&mut self.animator)?;
        self.slots.insert(key, handle);
        Ok(())
    }

    /// Open the menu centred on the event's cursor position.
    pub fn show(&mut self, event: &PointerEvent) -> MenuResult<()> {
        let c = self.layout.c;
        let doc = &mut self.scene.doc;
        doc.remove_class(self.element, "hidden");
        doc.set_style(self.svg, "left", format!("{}px", Num(event.client_x - c)));
        doc.set_style(self.svg, "top", format!("{}px", Num(event.client_y - c)));
        self.set_state(MenuState::Opening);

        let base = self.config.duration;
        self.animate_container(0.0, 1.0, base * 8.0, Ease::Elastic, |scene| {
            if scene.state == MenuState::Opening {
                scene.state = MenuState::Open;
                tracing::debug!("menu open");
            }
        })?;
        self.animate_buttons(0.0, 1.0, base, base * 8.0, Ease::Elastic)
    }

    /// Shrink the menu away and hide it once the container animation ends.
    pub fn hide(&mut self) -> MenuResult<()> {
        if self.scene.state == MenuState::Closed {
            tracing::debug!("hide ignored; menu already closed");
            return Ok(());
        }
        self.set_state(MenuState::Closing);

        let base = self.config.duration;
        let element = self.element;
        self.animate_container(1.0, 0.0, base, Ease::EaseInOut, move |scene| {
            scene.doc.add_class(element, "hidden");
            scene.state = MenuState::Closed;
            tracing::debug!("menu closed");
        })?;
        self.animate_buttons(1.0, 0.0, base, base, Ease::EaseInOut)
    }

    /// Open when closed or closing, close otherwise.
    pub fn toggle(&mut self, event: &PointerEvent) -> MenuResult<()> {
        match self.scene.state {
            MenuState::Closed | MenuState::Closing => self.show(event),
            MenuState::Opening | MenuState::Open => self.hide(),
        }
    }

    fn animate_container<D>(&mut self, from: f64, to: f64, duration: f64, ease: Ease, on_done: D) -> MenuResult<()>
    where
        D: FnOnce(&mut MenuScene) + 'static,
    {
        let (container, c) = (self.container, self.layout.c);
        self.run_in_slot((container, Slot::Reveal), |animator| {
            animator.animate_with_callback(
                from,
                to,
                move |scene: &mut MenuScene, v: f64| {
                    scene.doc.transform(container, &reveal_matrix(90.0 - 90.0 * v, v, c));
                },
                duration,
                ease,
                on_done,
            )
        })
    }

    /// Scale every button with its own duration drawn from `[min, max]`.
    fn animate_buttons(&mut self, from: f64, to: f64, min: f64, max: f64, ease: Ease) -> MenuResult<()> {
        let Layout { c, angle, .. } = self.layout;
        for i in 0..self.buttons.len() {
            let button = self.buttons[i];
            let duration = if max > min {
                self.rng.gen_range(min..=max)
            } else {
                min
            };
            let group = button.group;
            self.reveal_ms.insert(group, duration);
            let rotate = match button.kind {
                ButtonKind::Sector(index) => Some(angle * index as f64),
                ButtonKind::Central => None,
            };

            self.run_in_slot((group, Slot::Reveal), |animator| {
                animator.animate(
                    from,
                    to,
                    move |scene: &mut MenuScene, v: f64| {
                        let m = match rotate {
                            Some(r) => reveal_matrix(r, v, c),
                            None => commands_to_matrix(&[TransformCommand::Scale {
                                sx: v,
                                sy: v,
                                cx: c,
                                cy: c,
                            }]),
                        };
                        scene.doc.transform(group, &m);
                    },
                    duration,
                    ease,
                )
            })?;
        }
        Ok(())
    }

    fn hover(&mut self, group: NodeId, active: bool) -> MenuResult<()> {
        let Some(button) = self.buttons.iter().find(|b| b.group == group).copied() else {
            return Ok(());
        };

        let opacity = self.config.opacity;
        let doc = &mut self.scene.doc;
        if let Some(hint) = button.hint {
            if active {
                doc.add_class(hint, "active");
            } else {
                doc.remove_class(hint, "active");
            }
        }
        if let Some(bg) = button.hint_bg {
            if active {
                doc.add_class(bg, "active");
                doc.set_style(bg, "opacity", Num(opacity));
            } else {
                doc.remove_class(bg, "active");
                doc.set_style(bg, "opacity", 0);
            }
        }

        match (button.kind, active) {
            (ButtonKind::Sector(_), true) => {
                self.animate_sector_hover(&button, 0.0, 1.0, HOVER_IN_MS, Ease::EaseInOut)
            }
            (ButtonKind::Sector(_), false) => {
                self.animate_sector_hover(&button, 1.0, 0.0, HOVER_OUT_MS, Ease::Elastic)
            }
            (ButtonKind::Central, _) => self.animate_central_hover(&button, active),
        }
    }

    /// Pull the wedge, icon and hint inwards by `10 * v` pixels, in lockstep.
    fn animate_sector_hover(&mut self, button: &Button, from: f64, to: f64, duration: f64, ease: Ease) -> MenuResult<()> {
        let Layout { c, angle, .. } = self.layout;
        let (outer, inner) = (self.config.outer_radius, self.config.inner_radius);
        let shape = button.shape;
        let icon = button
            .icon
            .and_then(|id| self.icon_data.get(&id).map(|data| (id, *data)));
        let hint = button
            .hint_group
            .and_then(|g| self.hint_data.get(&g).copied())
            .zip(button.hint);
        let bg = button.hint_bg;

        self.run_in_slot((button.group, Slot::Hover), |animator| {
            animator.animate(
                from,
                to,
                move |scene: &mut MenuScene, v: f64| {
                    let outward = v * HOVER_OUTWARD;
                    let doc = &mut scene.doc;
                    doc.set_plain(
                        shape,
                        "d",
                        describe_sector(c, c, outer - outward, inner, 0.0, angle),
                    );

                    if let Some((icon, init)) = icon {
                        let pos = polar_to_cartesian(c, c, init.mid_radius - outward, angle / 2.0);
                        let scale = init.scale * (1.0 - v * 0.1);
                        doc.transform(icon, &icon_matrix(pos, scale, init.rotation, &init.bbox));
                    }

                    if let Some((data, hint)) = hint {
                        let arc = hint_arc(
                            c,
                            data.base_radius - outward,
                            data.text_length,
                            data.sector_mid_angle,
                        );
                        set_hint_arc(doc, hint, bg, arc);
                    }
                },
                duration,
                ease,
            )
        })
    }

    /// Shrink the central circle by 8px (or restore it), rescaling the icon
    /// and moving the hint arc with the radius.
    fn animate_central_hover(&mut self, button: &Button, active: bool) -> MenuResult<()> {
        let circle = button.shape;
        let Some(initial) = self.central_radius.get(&circle).copied() else {
            return Ok(());
        };
        let current = self.scene.doc.attr_f64(circle, "r").unwrap_or(initial);
        let target = if active {
            (initial - CENTRAL_SHRINK).max(0.0)
        } else {
            initial
        };

        let c = self.layout.c;
        let icon = button
            .icon
            .and_then(|id| self.icon_data.get(&id).map(|data| (id, *data)));
        let hint = button
            .hint
            .and_then(|id| self.central_hint_data.get(&id).map(|data| (id, *data)));
        let bg = button.hint_bg;

        self.run_in_slot((button.group, Slot::Hover), |animator| {
            animator.animate(
                current,
                target,
                move |scene: &mut MenuScene, r: f64| {
                    let doc = &mut scene.doc;
                    doc.set_num(circle, "r", r);

                    if let Some((icon, init)) = icon {
                        let scale = init.scale * (r / initial);
                        doc.transform(icon, &icon_matrix(Point::new(c, c), scale, 0.0, &init.bbox));
                    }

                    if let Some((hint, data)) = hint {
                        let arc = describe_arc(
                            data.center.x,
                            data.center.y,
                            r + data.offset,
                            data.start_angle,
                            data.end_angle,
                            false,
                            data.alter,
                        );
                        set_hint_arc(doc, hint, bg, arc);
                    }
                },
                CENTRAL_HOVER_MS,
                Ease::EaseInOut,
            )
        })
    }

    /// Wheel down fades the wedges by one step, wheel up brightens them.
    fn transform_opacity(&mut self, delta_y: f64) {
        let step = if delta_y > 0.0 {
            -OPACITY_STEP
        } else if delta_y < 0.0 {
            OPACITY_STEP
        } else {
            return;
        };
        let opacity = round_to(self.config.opacity + step, 6).clamp(OPACITY_MIN, OPACITY_MAX);
        self.config.opacity = opacity;

        let doc = &mut self.scene.doc;
        for sector in doc.select_all(self.svg, ".radial-sector") {
            doc.set_num(sector, "opacity", opacity);
        }
        for bg in doc.select_all(self.svg, ".radial-hint-bg.active") {
            doc.set_style(bg, "opacity", Num(opacity));
        }
        tracing::debug!(opacity, "menu opacity changed");
    }

    fn activate(&self, group: NodeId) {
        let Some(button) = self.buttons.iter().find(|b| b.group == group) else {
            return;
        };
        let (payload, onclick) = match button.kind {
            ButtonKind::Sector(i) => {
                let Some(sector) = self.config.sectors.get(i) else {
                    return;
                };
                (
                    ClickEvent {
                        icon: sector.icon.clone(),
                        hint: sector.hint.clone(),
                    },
                    sector.onclick.clone(),
                )
            }
            ButtonKind::Central => {
                let Some(central) = self.config.central_button.as_ref() else {
                    return;
                };
                (
                    ClickEvent {
                        icon: central.icon.clone(),
                        hint: central.hint.clone().unwrap_or_default(),
                    },
                    central.onclick.clone(),
                )
            }
        };

        tracing::debug!(icon = %payload.icon, "menu item activated");
        self.emit("click", &payload);
        if let Some(callback) = onclick {
            callback.call();
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/menu/motion.rs"]
mod tests;
