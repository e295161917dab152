/// Convenience result type used across the menu engine.
pub type MenuResult<T> = Result<T, MenuError>;

/// Top-level error taxonomy used by engine APIs.
#[derive(thiserror::Error, Debug)]
pub enum MenuError {
    /// Invalid menu configuration or a missing owner (paper, defs) for an operation.
    #[error("configuration error: {0}")]
    Config(String),

    /// Degenerate geometry, e.g. inverting a singular matrix.
    #[error("geometry error: {0}")]
    Geometry(String),

    /// Misuse of the animation scheduler.
    #[error("animation error: {0}")]
    Animation(String),

    /// Malformed transform strings, selectors or markup.
    #[error("parse error: {0}")]
    Parse(String),

    /// Sprite or font resources that could not be loaded.
    #[error("resource error: {0}")]
    Resource(String),

    /// Errors when serializing or deserializing configuration.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl MenuError {
    /// Build a [`MenuError::Config`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Build a [`MenuError::Geometry`] value.
    pub fn geometry(msg: impl Into<String>) -> Self {
        Self::Geometry(msg.into())
    }

    /// Build a [`MenuError::Animation`] value.
    pub fn animation(msg: impl Into<String>) -> Self {
        Self::Animation(msg.into())
    }

    /// Build a [`MenuError::Parse`] value.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Build a [`MenuError::Resource`] value.
    pub fn resource(msg: impl Into<String>) -> Self {
        Self::Resource(msg.into())
    }

    /// Build a [`MenuError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

impl From<serde_json::Error> for MenuError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serde(err.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
