use std::path::{Path, PathBuf};

use anyhow::Context;

/// Transport for the icon sprite: given a URL, return its markup.
pub trait SpriteSource {
    /// Markup of the sprite at `url`.
    fn fetch(&self, url: &str) -> anyhow::Result<String>;
}

impl<F> SpriteSource for F
where
    F: Fn(&str) -> anyhow::Result<String>,
{
    fn fetch(&self, url: &str) -> anyhow::Result<String> {
        self(url)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// Fixed sprite markup, whatever the URL.
pub struct InlineSprite(pub String);

impl SpriteSource for InlineSprite {
    fn fetch(&self, _url: &str) -> anyhow::Result<String> {
        Ok(self.0.clone())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// Sprite files served from a directory, addressed like URL paths.
pub struct FsSpriteSource {
    root: PathBuf,
}

impl FsSpriteSource {
    /// Serve sprites from files below `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory that URL paths resolve against.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Filesystem path `url` resolves to under the root.
    pub fn resolve(&self, url: &str) -> anyhow::Result<PathBuf> {
        Ok(self.root.join(resolve_url_path(url)?))
    }
}

impl SpriteSource for FsSpriteSource {
    fn fetch(&self, url: &str) -> anyhow::Result<String> {
        let path = self.resolve(url)?;
        std::fs::read_to_string(&path)
            .with_context(|| format!("read sprite '{}' from {}", url, path.display()))
    }
}

/// Resolve a URL path against the source root.
///
/// Uses `/` separators and drops `.` segments. `..` pops a segment and is
/// clamped at the root the way URL resolution clamps at `/`, so the result
/// never escapes it. Query strings and fragments are ignored.
pub fn resolve_url_path(url: &str) -> anyhow::Result<String> {
    if url.contains("://") {
        anyhow::bail!("sprite url '{url}' is not a path");
    }
    let path = url.split(['?', '#']).next().unwrap_or_default();
    let path = path.replace('\\', "/");

    let mut out = Vec::<&str>::new();
    for part in path.split('/') {
        match part {
            "" | "." => {}
            ".." => {
                out.pop();
            }
            _ => out.push(part),
        }
    }
    if out.is_empty() {
        anyhow::bail!("sprite url '{url}' must name a file");
    }
    Ok(out.join("/"))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/sprite.rs"]
mod tests;
