//! Animated radial context menu engine.
//!
//! A menu is a ring of wedge-shaped sectors around an optional central
//! button, each with an icon cloned from an SVG sprite and a label set on a
//! curved text path. Everything lives in an in-memory SVG scene graph
//! ([`Document`]) that a host renders and feeds input events into.
//!
//! # Pipeline overview
//!
//! 1. **Configure**: [`MenuConfig`] (JSON via serde, defaults for every field)
//! 2. **Build**: [`Builder::new`] lays out sectors, clones icons from the
//!    [`SpriteSource`], measures hints with [`TextMetrics`]
//! 3. **Drive**: host events go through [`Builder::dispatch`]; animations
//!    advance on [`Builder::tick`] with the host's clock in milliseconds
//!
//! Transforms are plain SVG affine matrices ([`Matrix`]); the compact
//! `t/r/s/m` notation and the standard `translate(..)` notation both parse
//! through [`transform::transform_to_matrix`].
//!
//! The engine is single-threaded: handles and listeners use `Rc`/`Cell`.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod animation;
mod assets;
mod foundation;
mod menu;
mod scene;

pub mod transform;

pub use animation::animator::{AnimationHandle, Animator};
pub use animation::ease::Ease;
pub use animation::lerp::Lerp;
pub use assets::metrics::{FixedTextMetrics, FontMetrics, ParleyTextMetrics, TextMetrics};
pub use assets::sprite::{FsSpriteSource, InlineSprite, SpriteSource, resolve_url_path};
pub use foundation::core::{BBox, Point, Rect};
pub use foundation::error::{MenuError, MenuResult};
pub use menu::builder::{Builder, ClickEvent, MenuScene, MenuState};
pub use menu::config::{
    Callback, CentralButton, DEFAULT_COLOR, HintPosition, MenuConfig, Sector, Theme,
};
pub use menu::geometry::{describe_arc, describe_sector, hint_arc, icon_matrix, polar_to_cartesian};
pub use menu::manager::Manager;
pub use scene::attrs::{Attr, PathRef};
pub use scene::document::Document;
pub use scene::events::{Dispatch, EventFlow, EventKind, Listener, PointerEvent};
pub use scene::markup::{SVG_NS, XLINK_NS};
pub use scene::node::NodeId;
pub use scene::paper::{Fragment, Paper};
pub use scene::select::Selector;
pub use transform::{Matrix, TransformCommand};
