use crate::colors::Color;
use std::collections::HashMap;

/// Resolves a color by class name, e.g. `"cpu-sys-color"`.
pub trait StyleLookup {
    fn lookup_color(&self, name: &str) -> Option<Color>;
}

/// Per-widget cache of resolved colors.
///
/// A hit never consults the lookup again until [`ColorCache::invalidate`] is
/// called (on a style change). Misses are not cached, so a class added to the
/// palette later is picked up on the next resolve.
#[derive(Debug, Clone, Default)]
pub struct ColorCache {
    colors: HashMap<String, Color>,
}

impl ColorCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached color for `name`, resolving it through `lookup` on a miss.
    pub fn resolve(&mut self, lookup: &dyn StyleLookup, name: &str, fallback: Color) -> Color {
        if let Some(color) = self.colors.get(name) {
            return *color;
        }

        match lookup.lookup_color(name) {
            Some(color) => {
                tracing::debug!("lookupColor name:{name} -> {color:?}");
                self.colors.insert(name.to_string(), color);
                color
            }
            None => {
                tracing::debug!("lookupColor name:{name} not found, using {fallback:?}");
                fallback
            }
        }
    }

    /// Cached color without touching the lookup.
    pub fn get(&self, name: &str) -> Option<Color> {
        self.colors.get(name).copied()
    }

    pub fn color_or(&self, name: &str, fallback: Color) -> Color {
        self.get(name).unwrap_or(fallback)
    }

    pub fn invalidate(&mut self) {
        self.colors.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}
