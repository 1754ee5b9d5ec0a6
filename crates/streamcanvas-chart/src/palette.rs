//! Category to colour lookup.

use std::sync::Arc;

use streamcanvas_core::alloc::HashMap;
use streamcanvas_render::Color;

/// Series colour used when a point has no category or an unmapped one.
pub const DEFAULT_SERIES_COLOR: Color = Color::rgb(0.1675, 0.4225, 0.9325);

/// Maps point categories to fill colours, with an explicit fallback.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryPalette {
    colors: HashMap<Arc<str>, Color>,
    fallback: Color,
}

impl CategoryPalette {
    /// An empty palette: every point gets `fallback`.
    pub fn new(fallback: Color) -> Self {
        Self {
            colors: HashMap::new(),
            fallback,
        }
    }

    /// Builder-style insert.
    pub fn with(mut self, category: &str, color: Color) -> Self {
        self.insert(category, color);
        self
    }

    pub fn insert(&mut self, category: &str, color: Color) -> Option<Color> {
        self.colors.insert(Arc::from(category), color)
    }

    pub fn set_fallback(&mut self, color: Color) {
        self.fallback = color;
    }

    pub fn fallback(&self) -> Color {
        self.fallback
    }

    /// Overlay `other`'s mappings on top of this palette.
    pub fn merge(&mut self, other: &CategoryPalette) {
        for (category, color) in other.colors.iter() {
            self.colors.insert(category.clone(), *color);
        }
    }

    pub fn color_for(&self, category: Option<&str>) -> Color {
        category
            .and_then(|c| self.colors.get(c))
            .copied()
            .unwrap_or(self.fallback)
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}

impl Default for CategoryPalette {
    /// Blue, emerald, amber, red and violet for categories A to E.
    fn default() -> Self {
        Self::new(DEFAULT_SERIES_COLOR)
            .with("A", Color::from_hex(0x3b82f6))
            .with("B", Color::from_hex(0x10b981))
            .with("C", Color::from_hex(0xf59e0b))
            .with("D", Color::from_hex(0xef4444))
            .with("E", Color::from_hex(0x8b5cf6))
    }
}
