use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::animation::animator::{AnimationHandle, Animator};
use crate::assets::metrics::TextMetrics;
use crate::assets::sprite::SpriteSource;
use crate::foundation::core::{BBox, Num, Point};
use crate::foundation::error::MenuResult;
use crate::menu::config::{CentralButton, HintPosition, MenuConfig, Sector};
use crate::menu::geometry::{describe_arc, describe_sector, hint_arc, icon_matrix, polar_to_cartesian};
use crate::scene::attrs::{Attr, PathRef};
use crate::scene::document::Document;
use crate::scene::events::{EventFlow, EventKind};
use crate::scene::markup::{SVG_NS, XLINK_NS};
use crate::scene::node::NodeId;
use crate::scene::paper::{Fragment, Paper};
use crate::transform::{Matrix, TransformCommand, commands_to_matrix};

/// Space between the wedge edge and a padded hint pill.
const HINT_GAP: f64 = 2.0;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
/// Lifecycle of the menu between `show` and `hide`.
#[serde(rename_all = "lowercase")]
pub enum MenuState {
    /// Hidden; the container is collapsed.
    #[default]
    Closed,
    /// Reveal animation running.
    Opening,
    /// Fully revealed.
    Open,
    /// Collapse animation running.
    Closing,
}

#[derive(Debug)]
/// State every tween setter may mutate.
pub struct MenuScene {
    /// Scene graph holding the menu element.
    pub doc: Document,
    /// Current lifecycle state.
    pub state: MenuState,
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
/// Payload of the `click` event.
pub struct ClickEvent {
    /// Icon id of the activated button.
    pub icon: String,
    /// Visible label of the activated button.
    pub hint: String,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct IconInitial {
    pub(crate) mid_radius: f64,
    pub(crate) scale: f64,
    pub(crate) rotation: f64,
    pub(crate) bbox: BBox,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct HintData {
    pub(crate) base_radius: f64,
    pub(crate) text_length: f64,
    pub(crate) sector_mid_angle: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct CentralHintData {
    pub(crate) offset: f64,
    pub(crate) start_angle: f64,
    pub(crate) end_angle: f64,
    pub(crate) alter: bool,
    pub(crate) center: Point,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Layout {
    /// Width and height of the SVG viewport.
    pub(crate) size: f64,
    /// Centre coordinate on both axes.
    pub(crate) c: f64,
    /// Wedge angle in degrees.
    pub(crate) angle: f64,
}

impl Layout {
    fn new(config: &MenuConfig) -> Self {
        let size = 2.0 * config.outer_radius;
        Self {
            size,
            c: size / 2.0,
            angle: config.sector_angle(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) enum Slot {
    Reveal,
    Hover,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ButtonKind {
    Sector(usize),
    Central,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Button {
    pub(crate) kind: ButtonKind,
    pub(crate) group: NodeId,
    /// Wedge path, or the circle of the central button.
    pub(crate) shape: NodeId,
    pub(crate) icon: Option<NodeId>,
    pub(crate) hint_group: Option<NodeId>,
    pub(crate) hint: Option<NodeId>,
    pub(crate) hint_bg: Option<NodeId>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
/// Work queued by scene listeners, applied once dispatch returns.
pub(crate) enum MenuAction {
    Close,
    Wheel(f64),
    HoverIn(NodeId),
    HoverOut(NodeId),
    Activate(NodeId),
}

pub(crate) type ActionQueue = Rc<RefCell<VecDeque<MenuAction>>>;
pub(crate) type ClickListener = Rc<dyn Fn(&ClickEvent)>;

/// Radial menu: builds the scene from a [`MenuConfig`] and drives its
/// animations from [`Builder::tick`].
pub struct Builder {
    pub(crate) config: MenuConfig,
    pub(crate) scene: MenuScene,
    pub(crate) animator: Animator<MenuScene>,
    metrics: Rc<dyn TextMetrics>,
    pub(crate) layout: Layout,
    pub(crate) element: NodeId,
    pub(crate) svg: NodeId,
    pub(crate) paper: Paper,
    pub(crate) container: NodeId,
    icons: Option<Fragment>,
    pub(crate) icon_data: HashMap<NodeId, IconInitial>,
    pub(crate) hint_data: HashMap<NodeId, HintData>,
    pub(crate) central_hint_data: HashMap<NodeId, CentralHintData>,
    pub(crate) central_radius: HashMap<NodeId, f64>,
    pub(crate) buttons: Vec<Button>,
    pub(crate) slots: HashMap<(NodeId, Slot), AnimationHandle>,
    // Duration of the latest scale tween per button group.
    pub(crate) reveal_ms: HashMap<NodeId, f64>,
    pub(crate) listeners: HashMap<String, Vec<ClickListener>>,
    pub(crate) actions: ActionQueue,
    pub(crate) rng: StdRng,
}

impl std::fmt::Debug for Builder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Builder")
            .field("state", &self.scene.state)
            .field("buttons", &self.buttons.len())
            .field("icons", &self.icons.is_some())
            .field("animator", &self.animator)
            .finish()
    }
}

impl Builder {
    /// Build the menu scene. The sprite is fetched once; if that fails the
    /// menu is built without icons.
    pub fn new(
        config: MenuConfig,
        sprite: &dyn SpriteSource,
        metrics: Rc<dyn TextMetrics>,
    ) -> MenuResult<Self> {
        Self::build(config, sprite, metrics, StdRng::from_entropy())
    }

    /// [`Builder::new`] with a deterministic reveal stagger.
    pub fn with_seed(
        config: MenuConfig,
        sprite: &dyn SpriteSource,
        metrics: Rc<dyn TextMetrics>,
        seed: u64,
    ) -> MenuResult<Self> {
        Self::build(config, sprite, metrics, StdRng::seed_from_u64(seed))
    }

    #[tracing::instrument(skip_all, fields(sectors = config.sectors.len()))]
    fn build(
        mut config: MenuConfig,
        sprite: &dyn SpriteSource,
        metrics: Rc<dyn TextMetrics>,
        rng: StdRng,
    ) -> MenuResult<Self> {
        config.validate()?;
        let opacity = config.opacity.clamp(0.4, 1.0);
        if opacity != config.opacity {
            tracing::warn!(configured = config.opacity, opacity, "opacity clamped to [0.4, 1]");
            config.opacity = opacity;
        }

        let layout = Layout::new(&config);
        let mut doc = Document::new();
        let (element, svg) = create_menu_element(&mut doc, &config, &layout);
        let paper = Paper::new(&mut doc, svg);
        let container = paper.g(&mut doc, &[]);
        doc.transform_str(container, "s0")?;

        let mut builder = Self {
            config,
            scene: MenuScene {
                doc,
                state: MenuState::Closed,
            },
            animator: Animator::new(),
            metrics,
            layout,
            element,
            svg,
            paper,
            container,
            icons: None,
            icon_data: HashMap::new(),
            hint_data: HashMap::new(),
            central_hint_data: HashMap::new(),
            central_radius: HashMap::new(),
            buttons: Vec::new(),
            slots: HashMap::new(),
            reveal_ms: HashMap::new(),
            listeners: HashMap::new(),
            actions: Rc::default(),
            rng,
        };
        builder.install_listeners();
        builder.load_icons(sprite);
        builder.rebuild()?;
        Ok(builder)
    }

    fn install_listeners(&mut self) {
        let doc = &mut self.scene.doc;

        let queue = Rc::clone(&self.actions);
        doc.on(self.svg, EventKind::Wheel, move |d| {
            queue.borrow_mut().push_back(MenuAction::Wheel(d.event.delta_y));
            EventFlow::Continue
        });
        for kind in [EventKind::ContextMenu, EventKind::Click] {
            let queue = Rc::clone(&self.actions);
            doc.on(self.svg, kind, move |_| {
                queue.borrow_mut().push_back(MenuAction::Close);
                EventFlow::Stop
            });
        }
        let queue = Rc::clone(&self.actions);
        doc.on(self.element, EventKind::Click, move |d| {
            if d.target == d.current_target {
                queue.borrow_mut().push_back(MenuAction::Close);
            }
            EventFlow::Continue
        });
    }

    fn wire_button(&mut self, group: NodeId) {
        let (enter, leave, up) = (
            Rc::clone(&self.actions),
            Rc::clone(&self.actions),
            Rc::clone(&self.actions),
        );
        let doc = &mut self.scene.doc;
        doc.hover(
            group,
            move |_| enter.borrow_mut().push_back(MenuAction::HoverIn(group)),
            move |_| leave.borrow_mut().push_back(MenuAction::HoverOut(group)),
        );
        doc.mouseup(group, move |d| {
            if d.event.button == 0 {
                up.borrow_mut().push_back(MenuAction::Activate(group));
            }
        });
    }

    /// Fetch and parse the icon sprite unless one is already loaded.
    /// Failures are logged and leave the menu icon-less.
    pub fn load_icons(&mut self, sprite: &dyn SpriteSource) -> bool {
        if self.icons.is_some() {
            return true;
        }
        let url = self.config.sprite.clone();
        let markup = match sprite.fetch(&url) {
            Ok(markup) => markup,
            Err(err) => {
                tracing::error!(sprite = %url, error = ?err, "failed to load icons");
                return false;
            }
        };
        match self.scene.doc.parse_fragment(&markup) {
            Ok(fragment) => {
                tracing::debug!(sprite = %url, roots = fragment.roots().len(), "icon sprite loaded");
                self.icons = Some(fragment);
                true
            }
            Err(err) => {
                tracing::error!(sprite = %url, %err, "failed to parse icon sprite");
                false
            }
        }
    }

    /// Whether the icon sprite loaded.
    pub fn has_icons(&self) -> bool {
        self.icons.is_some()
    }

    /// Regenerate every button from the configuration, e.g. after a late
    /// sprite load. In-flight button animations are stopped.
    pub fn rebuild(&mut self) -> MenuResult<()> {
        let container = self.container;
        self.slots.retain(|(node, _), handle| {
            if *node == container {
                return true;
            }
            handle.stop();
            false
        });
        for old in self.scene.doc.children(container) {
            self.scene.doc.remove_listeners(old);
        }
        self.scene.doc.clear(container);
        self.buttons.clear();
        self.reveal_ms.clear();
        self.icon_data.clear();
        self.hint_data.clear();
        self.central_hint_data.clear();
        self.central_radius.clear();

        for i in 0..self.config.sectors.len() {
            let sector = self.config.sectors[i].clone();
            let button = self.create_sector_button(i, &sector)?;
            self.scene.doc.append(container, button.group);
            self.buttons.push(button);
        }
        if let Some(central) = self.config.central_button.clone() {
            let button = self.create_central_button(&central)?;
            self.scene.doc.append(container, button.group);
            self.buttons.push(button);
        }
        tracing::debug!(buttons = self.buttons.len(), icons = self.icons.is_some(), "menu buttons built");
        Ok(())
    }

    fn create_sector_button(&mut self, index: usize, btn: &Sector) -> MenuResult<Button> {
        let shape = self.create_wedge();
        let icon = self.create_icon(btn);
        let (hint_group, hint, hint_bg) = self.create_hint(btn)?;

        let mut members = vec![shape];
        members.extend(icon);
        members.push(hint_group);
        let group = self.paper.g(&mut self.scene.doc, &members);

        let Layout { c, angle, .. } = self.layout;
        let placed = commands_to_matrix(&[
            TransformCommand::Rotate {
                angle: angle * index as f64,
                cx: c,
                cy: c,
            },
            TransformCommand::Scale {
                sx: 1.0,
                sy: 1.0,
                cx: c,
                cy: c,
            },
        ]);
        self.scene.doc.transform(group, &placed);
        self.wire_button(group);

        Ok(Button {
            kind: ButtonKind::Sector(index),
            group,
            shape,
            icon,
            hint_group: Some(hint_group),
            hint: Some(hint),
            hint_bg,
        })
    }

    fn create_wedge(&mut self) -> NodeId {
        let Layout { c, angle, .. } = self.layout;
        let d = describe_sector(c, c, self.config.outer_radius, self.config.inner_radius, 0.0, angle);
        let doc = &mut self.scene.doc;
        let wedge = self.paper.path(doc, &d);
        let color = self.config.color();
        doc.set_plain(wedge, "fill", color);
        doc.set_plain(wedge, "stroke", color);
        doc.set_num(wedge, "opacity", self.config.opacity);
        doc.add_class(wedge, "radial-sector");
        wedge
    }

    /// Detached clone of the sprite element with id `icon`, and its bbox.
    fn clone_icon(&mut self, icon: &str) -> Option<(NodeId, BBox)> {
        let icons = self.icons.as_ref()?;
        let Some(template) = icons.get_by_id(&self.scene.doc, icon) else {
            tracing::error!(icon, "icon not found in sprite");
            return None;
        };
        let copy = self.scene.doc.clone_node(template)?;
        let bbox = self.scene.doc.bbox(copy);
        Some((copy, bbox))
    }

    fn create_icon(&mut self, btn: &Sector) -> Option<NodeId> {
        let (icon, bbox) = self.clone_icon(&btn.icon)?;
        let (inner, outer) = (self.config.inner_radius, self.config.outer_radius);
        let Layout { c, angle, .. } = self.layout;

        let mid_radius = btn
            .icon_radius
            .or(self.config.icon_radius)
            .unwrap_or((inner + outer) / 2.0);
        let scale = match btn.icon_scale.or(self.config.icon_scale) {
            Some(scale) => scale,
            None => fit_scale(&btn.icon, (outer - inner) * 0.5, bbox.height),
        };
        let target_angle = angle / 2.0;
        let rotation = target_angle + btn.rotate.unwrap_or(0.0);

        self.icon_data.insert(
            icon,
            IconInitial {
                mid_radius,
                scale,
                rotation,
                bbox,
            },
        );

        let pos = polar_to_cartesian(c, c, mid_radius, target_angle);
        let doc = &mut self.scene.doc;
        doc.transform(icon, &icon_matrix(pos, scale, rotation, &bbox));
        doc.add_class(icon, "radial-icon");
        Some(icon)
    }

    fn create_hint(&mut self, btn: &Sector) -> MenuResult<(NodeId, NodeId, Option<NodeId>)> {
        let group = self.paper.g(&mut self.scene.doc, &[]);
        self.scene.doc.add_class(group, "hint-group");

        let padding = btn.hint_padding.or(self.config.hint_padding);
        let font = self.metrics.hint_font_metrics();
        let text = btn.label();
        let text_length = self.metrics.text_length(text);

        let (base_radius, bg_height) = match padding {
            Some(p) => {
                let h = font.height + 2.0 * p;
                (self.config.outer_radius + h / 2.0 + HINT_GAP, h)
            }
            None => (self.config.outer_radius + font.height * 0.75, 0.0),
        };
        let sector_mid_angle = self.layout.angle / 2.0;
        let arc = hint_arc(self.layout.c, base_radius, text_length, sector_mid_angle);

        let bg = padding.map(|_| self.create_hint_bg(&arc, bg_height));
        if let Some(bg) = bg {
            self.scene.doc.append(group, bg);
        }
        let hint = self.create_hint_text(text, &arc, "radial-hint")?;
        self.scene.doc.append(group, hint);

        self.hint_data.insert(
            group,
            HintData {
                base_radius,
                text_length,
                sector_mid_angle,
            },
        );
        Ok((group, hint, bg))
    }

    fn create_hint_bg(&mut self, arc: &str, height: f64) -> NodeId {
        let doc = &mut self.scene.doc;
        let bg = self.paper.path(doc, arc);
        doc.set_plain(bg, "stroke", self.config.color());
        doc.set_num(bg, "stroke-width", height);
        doc.set_plain(bg, "stroke-linecap", "round");
        doc.set_plain(bg, "fill", "none");
        doc.set_plain(bg, "vector-effect", "non-scaling-stroke");
        doc.add_class(bg, "radial-hint-bg");
        doc.set_style(bg, "opacity", 0);
        bg
    }

    fn create_hint_text(&mut self, text: &str, arc: &str, class: &str) -> MenuResult<NodeId> {
        let doc = &mut self.scene.doc;
        let hint = self.paper.text(doc, 0.0, 0.0, text);
        doc.add_class(hint, class);
        doc.set_attrs(
            hint,
            [
                Attr::plain("fill", self.config.theme.hint_fill()),
                Attr::TextPath(PathRef::Raw(arc.to_string())),
            ],
        )?;
        if let Some(text_path) = doc.select(hint, "textPath") {
            doc.set_plain(text_path, "dominant-baseline", "central");
            doc.set_plain(text_path, "startOffset", "50%");
        }
        Ok(hint)
    }

    fn create_central_button(&mut self, btn: &CentralButton) -> MenuResult<Button> {
        let c = self.layout.c;
        let radius = btn
            .icon_radius
            .or(self.config.icon_radius)
            .unwrap_or(self.config.inner_radius * 0.6);

        let doc = &mut self.scene.doc;
        let circle = self.paper.circle(doc, c, c, radius);
        let color = self.config.color();
        doc.set_plain(circle, "fill", color);
        doc.set_plain(circle, "stroke", color);
        doc.set_num(circle, "opacity", self.config.opacity);
        doc.add_class(circle, "radial-sector central-sector");
        self.central_radius.insert(circle, radius);

        let icon = if btn.icon.is_empty() {
            None
        } else {
            self.create_central_icon(btn, radius)
        };
        let hint = match btn.hint.as_deref() {
            Some(text) if !text.is_empty() => Some(self.create_central_hint(btn, text, radius)?),
            _ => None,
        };

        let mut members = vec![circle];
        members.extend(icon);
        members.extend(hint.map(|(group, _, _)| group));
        let group = self.paper.g(&mut self.scene.doc, &members);
        self.scene.doc.add_class(group, "central-button");
        self.scene.doc.transform(group, &Matrix::identity());
        self.wire_button(group);

        Ok(Button {
            kind: ButtonKind::Central,
            group,
            shape: circle,
            icon,
            hint_group: hint.map(|(g, _, _)| g),
            hint: hint.map(|(_, t, _)| t),
            hint_bg: hint.and_then(|(_, _, bg)| bg),
        })
    }

    fn create_central_icon(&mut self, btn: &CentralButton, radius: f64) -> Option<NodeId> {
        let (icon, bbox) = self.clone_icon(&btn.icon)?;
        let c = self.layout.c;
        let scale = match btn.icon_scale.or(self.config.icon_scale) {
            Some(scale) => scale,
            None => fit_scale(&btn.icon, radius * 0.8, bbox.width.max(bbox.height)),
        };

        let doc = &mut self.scene.doc;
        doc.transform(icon, &icon_matrix(Point::new(c, c), scale, 0.0, &bbox));
        doc.add_class(icon, "radial-icon central-icon");
        self.icon_data.insert(
            icon,
            IconInitial {
                mid_radius: 0.0,
                scale,
                rotation: 0.0,
                bbox,
            },
        );
        Some(icon)
    }

    fn create_central_hint(
        &mut self,
        btn: &CentralButton,
        text: &str,
        radius: f64,
    ) -> MenuResult<(NodeId, NodeId, Option<NodeId>)> {
        let group = self.paper.g(&mut self.scene.doc, &[]);
        let padding = btn.hint_padding.or(self.config.hint_padding);
        let font = self.metrics.hint_font_metrics();

        let (offset, bg_height) = match padding {
            Some(p) => {
                let h = font.height + 2.0 * p;
                (btn.hint_offset.unwrap_or(h / 2.0 + HINT_GAP), h)
            }
            None => (btn.hint_offset.or(btn.hint_distance).unwrap_or(8.0), 0.0),
        };

        let (start_angle, end_angle, alter) = match (btn.hint_start_angle, btn.hint_end_angle) {
            (Some(start), Some(end)) => (start, end, start > end),
            _ => {
                let half = btn.hint_span.unwrap_or(120.0) / 2.0;
                match btn.hint_position.unwrap_or_default() {
                    HintPosition::Bottom => (180.0 + half, 180.0 - half, true),
                    HintPosition::Top => (360.0 - half, half, false),
                }
            }
        };

        let c = self.layout.c;
        let arc = describe_arc(c, c, radius + offset, start_angle, end_angle, false, alter);
        let bg = padding.map(|_| self.create_hint_bg(&arc, bg_height));
        if let Some(bg) = bg {
            self.scene.doc.append(group, bg);
        }
        let hint = self.create_hint_text(text, &arc, "radial-hint central-hint")?;
        self.scene.doc.append(group, hint);

        self.central_hint_data.insert(
            hint,
            CentralHintData {
                offset,
                start_angle,
                end_angle,
                alter,
                center: Point::new(c, c),
            },
        );
        Ok((group, hint, bg))
    }

    /// Root container (`div.context`) the host attaches and renders.
    pub fn element(&self) -> NodeId {
        self.element
    }

    /// Menu `<svg>` element, positioned on `show`.
    pub fn svg(&self) -> NodeId {
        self.svg
    }

    /// Group scaled and rotated by the reveal animation.
    pub fn container(&self) -> NodeId {
        self.container
    }

    /// Scene graph holding the menu.
    pub fn document(&self) -> &Document {
        &self.scene.doc
    }

    /// Mutable access for hosts building their own nodes around the menu.
    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.scene.doc
    }

    /// Current lifecycle state.
    pub fn state(&self) -> MenuState {
        self.scene.state
    }

    /// Configuration the menu was built from.
    pub fn config(&self) -> &MenuConfig {
        &self.config
    }

    /// Current wedge opacity.
    pub fn opacity(&self) -> f64 {
        self.config.opacity
    }

    /// Button groups in container order: sectors, then the central button.
    pub fn button_groups(&self) -> Vec<NodeId> {
        self.buttons.iter().map(|b| b.group).collect()
    }

    /// Serialize the menu element and its subtree.
    pub fn to_markup(&self) -> String {
        self.scene.doc.to_markup(self.element)
    }
}

/// Scale fitting `extent` into `target`; degenerate icons keep their size.
fn fit_scale(icon: &str, target: f64, extent: f64) -> f64 {
    if extent > 0.0 && extent.is_finite() {
        return target / extent;
    }
    tracing::warn!(icon, extent, "icon has no measurable extent; using scale 1");
    1.0
}

fn create_menu_element(doc: &mut Document, config: &MenuConfig, layout: &Layout) -> (NodeId, NodeId) {
    let div = doc.create_element("div");
    doc.set_plain(div, "class", format!("context {} hidden", config.theme.class()));
    for (k, v) in [
        ("position", "fixed"),
        ("top", "0"),
        ("left", "0"),
        ("width", "100vw"),
        ("height", "100vh"),
        ("overflow", "visible"),
        ("pointer-events", "auto"),
    ] {
        doc.set_style(div, k, v);
    }
    if let Some(z) = config.z_index {
        doc.set_style(div, "z-index", z);
    }

    let svg = doc.create_element("svg");
    let size = Num(layout.size).to_string();
    doc.set_plain(svg, "xmlns", SVG_NS);
    doc.set_plain(svg, "xmlns:xlink", XLINK_NS);
    doc.set_plain(svg, "width", &size);
    doc.set_plain(svg, "height", &size);
    doc.set_plain(svg, "viewBox", format!("0 0 {size} {size}"));
    for (k, v) in [
        ("position", "absolute"),
        ("display", "block"),
        ("overflow", "visible"),
        ("pointer-events", "auto"),
    ] {
        doc.set_style(svg, k, v);
    }
    doc.add_class(svg, "radial-menu-svg");
    doc.append(div, svg);
    (div, svg)
}

#[cfg(test)]
#[path = "../../tests/unit/menu/builder.rs"]
mod tests;
