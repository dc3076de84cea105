use std::collections::BTreeMap;

use serde::{Serialize, Serializer};

use crate::types::Rect;

const FNV_OFFSET: u32 = 0x811c_9dc5;
const FNV_PRIME: u32 = 0x0100_0193;

/// A 24-bit RGB color used to tag occupied cells for rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color(u32);

impl Color {
    /// Derives the color from the `LxW` key of the declared dimensions, so the
    /// same piece size always gets the same color across runs.
    pub fn for_dimensions(rect: Rect) -> Self {
        let key = dimension_key(rect);
        let hash = key
            .bytes()
            .fold(FNV_OFFSET, |h, b| (h ^ b as u32).wrapping_mul(FNV_PRIME));
        Color(hash & 0x00ff_ffff)
    }

    pub fn rgb(&self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:06x}", self.0)
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

pub fn dimension_key(rect: Rect) -> String {
    format!("{}x{}", rect.length, rect.width)
}

/// Colors handed out so far in one optimization run, keyed by `LxW`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ColorMap {
    colors: BTreeMap<String, Color>,
}

impl ColorMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the color for `rect`, registering it on first use.
    pub fn color_for(&mut self, rect: Rect) -> Color {
        *self
            .colors
            .entry(dimension_key(rect))
            .or_insert_with(|| Color::for_dimensions(rect))
    }

    pub fn get(&self, key: &str) -> Option<Color> {
        self.colors.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Color)> {
        self.colors.iter().map(|(k, c)| (k.as_str(), *c))
    }
}
