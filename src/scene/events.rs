use std::rc::Rc;

use crate::scene::document::Document;
use crate::scene::node::NodeId;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
/// Pointer and wheel event kinds routed through the scene.
pub enum EventKind {
    /// Pointer entered the node.
    MouseOver,
    /// Pointer left the node.
    MouseOut,
    /// Button released over the node.
    MouseUp,
    /// Press and release on the same node.
    Click,
    /// Secondary-button request for a context menu.
    ContextMenu,
    /// Scroll wheel movement.
    Wheel,
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Host-provided input event.
pub struct PointerEvent {
    /// What happened.
    pub kind: EventKind,
    /// Mouse button, `0` for primary.
    pub button: i16,
    /// Viewport x in pixels.
    pub client_x: f64,
    /// Viewport y in pixels.
    pub client_y: f64,
    /// Wheel delta; positive scrolls down.
    pub delta_y: f64,
}

impl PointerEvent {
    /// Event at the origin with the primary button and no wheel delta.
    pub fn new(kind: EventKind) -> Self {
        Self {
            kind,
            button: 0,
            client_x: 0.0,
            client_y: 0.0,
            delta_y: 0.0,
        }
    }

    /// Event at a viewport position.
    pub fn at(kind: EventKind, client_x: f64, client_y: f64) -> Self {
        Self {
            client_x,
            client_y,
            ..Self::new(kind)
        }
    }

    /// Secondary-button context menu request at a viewport position.
    pub fn context_menu(client_x: f64, client_y: f64) -> Self {
        Self {
            button: 2,
            ..Self::at(EventKind::ContextMenu, client_x, client_y)
        }
    }

    /// Release of `button`.
    pub fn mouse_up(button: i16) -> Self {
        Self {
            button,
            ..Self::new(EventKind::MouseUp)
        }
    }

    /// Primary click.
    pub fn click() -> Self {
        Self::new(EventKind::Click)
    }

    /// Wheel movement by `delta_y`.
    pub fn wheel(delta_y: f64) -> Self {
        Self {
            delta_y,
            ..Self::new(EventKind::Wheel)
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
/// One listener invocation during bubbling.
pub struct Dispatch {
    /// Event being dispatched.
    pub event: PointerEvent,
    /// Node the event was dispatched at.
    pub target: NodeId,
    /// Node whose listener is running.
    pub current_target: NodeId,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// Whether an event keeps bubbling after a listener.
pub enum EventFlow {
    /// Keep bubbling.
    #[default]
    Continue,
    /// Stop bubbling after the current node's listeners.
    Stop,
}

/// Shared listener callback.
pub type Listener = Rc<dyn Fn(&Dispatch) -> EventFlow>;

impl Document {
    /// Register `listener` for `kind` events reaching `node`.
    pub fn on<F>(&mut self, node: NodeId, kind: EventKind, listener: F)
    where
        F: Fn(&Dispatch) -> EventFlow + 'static,
    {
        self.listeners
            .entry(node)
            .or_default()
            .push((kind, Rc::new(listener)));
    }

    /// Pair of pointer-enter / pointer-leave listeners.
    pub fn hover<In, Out>(&mut self, node: NodeId, on_enter: In, on_leave: Out)
    where
        In: Fn(&Dispatch) + 'static,
        Out: Fn(&Dispatch) + 'static,
    {
        self.on(node, EventKind::MouseOver, move |d| {
            on_enter(d);
            EventFlow::Continue
        });
        self.on(node, EventKind::MouseOut, move |d| {
            on_leave(d);
            EventFlow::Continue
        });
    }

    /// Listener for button release that never stops bubbling.
    pub fn mouseup<F>(&mut self, node: NodeId, handler: F)
    where
        F: Fn(&Dispatch) + 'static,
    {
        self.on(node, EventKind::MouseUp, move |d| {
            handler(d);
            EventFlow::Continue
        });
    }

    /// Drop every listener on `node`.
    pub fn remove_listeners(&mut self, node: NodeId) {
        self.listeners.remove(&node);
    }

    /// Listeners registered on `node`.
    pub fn listener_count(&self, node: NodeId) -> usize {
        self.listeners.get(&node).map_or(0, Vec::len)
    }

    /// Run listeners for `event` on `target`, then on each ancestor in turn.
    ///
    /// Every listener on a node runs even when one of them stops propagation;
    /// the ancestors above it are skipped. Returns [`EventFlow::Stop`] when
    /// propagation was stopped.
    pub fn dispatch(&self, target: NodeId, event: &PointerEvent) -> EventFlow {
        let path: Vec<NodeId> = std::iter::once(target).chain(self.ancestors(target)).collect();
        for current in path {
            let Some(registered) = self.listeners.get(&current) else {
                continue;
            };
            let matching: Vec<Listener> = registered
                .iter()
                .filter(|(kind, _)| *kind == event.kind)
                .map(|(_, l)| Rc::clone(l))
                .collect();

            let info = Dispatch {
                event: *event,
                target,
                current_target: current,
            };
            let mut flow = EventFlow::Continue;
            for listener in matching {
                if listener(&info) == EventFlow::Stop {
                    flow = EventFlow::Stop;
                }
            }
            if flow == EventFlow::Stop {
                return EventFlow::Stop;
            }
        }
        EventFlow::Continue
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/events.rs"]
mod tests;
