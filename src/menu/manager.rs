use std::rc::Rc;

use crate::assets::metrics::TextMetrics;
use crate::assets::sprite::SpriteSource;
use crate::foundation::error::MenuResult;
use crate::menu::builder::{Builder, ClickEvent, MenuState};
use crate::menu::config::MenuConfig;
use crate::scene::document::Document;
use crate::scene::events::{EventFlow, EventKind, PointerEvent};
use crate::scene::node::NodeId;

/// Host-facing wrapper: owns a [`Builder`], mounts its element and routes
/// window-level context menu requests to it.
#[derive(Debug)]
pub struct Manager {
    menu: Builder,
    auto_bind: bool,
}

impl Manager {
    /// Build the menu and mount it under the document body.
    pub fn new(config: MenuConfig, sprite: &dyn SpriteSource, metrics: Rc<dyn TextMetrics>) -> MenuResult<Self> {
        Ok(Self::from_builder(Builder::new(config, sprite, metrics)?))
    }

    /// Wrap an existing builder, mounting it under the body.
    pub fn from_builder(mut menu: Builder) -> Self {
        let auto_bind = menu.config().auto_bind_context_menu;
        let (body, element) = (menu.document().body(), menu.element());
        menu.document_mut().append(body, element);
        Self { menu, auto_bind }
    }

    /// Move the menu element under `container`.
    pub fn attach(&mut self, container: NodeId) {
        let element = self.menu.element();
        self.menu.document_mut().append(container, element);
    }

    /// Window-level `contextmenu` handler. Returns `true` when the menu took
    /// the event, i.e. the host should suppress its native menu.
    pub fn on_window_context_menu(&mut self, event: &PointerEvent) -> MenuResult<bool> {
        if !self.auto_bind || event.kind != EventKind::ContextMenu {
            return Ok(false);
        }
        self.menu.show(event)?;
        Ok(true)
    }

    /// See [`Builder::on`].
    pub fn on(&mut self, event: &str, callback: impl Fn(&ClickEvent) + 'static) {
        self.menu.on(event, callback);
    }

    /// Open the menu at the event position.
    pub fn show(&mut self, event: &PointerEvent) -> MenuResult<()> {
        self.menu.show(event)
    }

    /// Close the menu.
    pub fn hide(&mut self) -> MenuResult<()> {
        self.menu.hide()
    }

    /// Open when closed or closing, close otherwise.
    pub fn toggle(&mut self, event: &PointerEvent) -> MenuResult<()> {
        self.menu.toggle(event)
    }

    /// Whether the menu is open or on its way there.
    pub fn shown(&self) -> bool {
        matches!(self.menu.state(), MenuState::Opening | MenuState::Open)
    }

    /// Advance animations to the host clock `now_ms`.
    pub fn tick(&mut self, now_ms: f64) {
        self.menu.tick(now_ms);
    }

    /// Route a host event at `target` through the scene.
    pub fn dispatch(&mut self, target: NodeId, event: &PointerEvent) -> MenuResult<EventFlow> {
        self.menu.dispatch(target, event)
    }

    /// Scene graph holding the menu.
    pub fn document(&self) -> &Document {
        self.menu.document()
    }

    /// Mutable scene graph.
    pub fn document_mut(&mut self) -> &mut Document {
        self.menu.document_mut()
    }

    /// Wrapped menu.
    pub fn builder(&self) -> &Builder {
        &self.menu
    }

    /// Mutable wrapped menu.
    pub fn builder_mut(&mut self) -> &mut Builder {
        &mut self.menu
    }
}

#[cfg(test)]
#[path = "../../tests/unit/menu/manager.rs"]
mod tests;
