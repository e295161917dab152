pub(crate) mod attrs;
pub(crate) mod bbox;
pub(crate) mod document;
pub(crate) mod events;
pub(crate) mod markup;
pub(crate) mod node;
pub(crate) mod paper;
pub(crate) mod select;
