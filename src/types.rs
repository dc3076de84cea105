use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

use crate::color::Color;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    #[serde(deserialize_with = "deserialize_u32_from_number")]
    pub length: u32,
    #[serde(deserialize_with = "deserialize_u32_from_number")]
    pub width: u32,
}

impl Rect {
    pub fn new(length: u32, width: u32) -> Self {
        Self { length, width }
    }

    pub fn area(&self) -> u64 {
        self.length as u64 * self.width as u64
    }

    pub fn rotated(&self) -> Self {
        Self {
            length: self.width,
            width: self.length,
        }
    }

    pub fn fits_in(&self, other: &Rect) -> bool {
        self.length <= other.length && self.width <= other.width
    }

    pub fn min_side(&self) -> u32 {
        self.length.min(self.width)
    }
}

impl std::fmt::Display for Rect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.length, self.width)
    }
}

/// A requested piece size together with how many units of it are needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PieceSpec {
    #[serde(deserialize_with = "deserialize_u32_from_number")]
    pub length: u32,
    #[serde(deserialize_with = "deserialize_u32_from_number")]
    pub width: u32,
    #[serde(deserialize_with = "deserialize_u32_from_number")]
    pub quantity: u32,
}

impl PieceSpec {
    pub fn new(length: u32, width: u32, quantity: u32) -> Self {
        Self {
            length,
            width,
            quantity,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.length, self.width)
    }
}

/// Where a single unit ended up. `rect` is the footprint as placed, so it is
/// already swapped when `rotated` is set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Placement {
    pub sheet: usize,
    pub x: u32,
    pub y: u32,
    pub rect: Rect,
    pub rotated: bool,
    pub color: Color,
}

impl Placement {
    /// Declared dimensions of the piece, undoing any rotation.
    pub fn declared(&self) -> Rect {
        if self.rotated {
            self.rect.rotated()
        } else {
            self.rect
        }
    }
}

/// Accepts any JSON number with no fractional part, so `4` and `4.0` both
/// parse. Browser clients tend to send the latter.
pub fn deserialize_u32_from_number<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let n = f64::deserialize(deserializer)?;
    number_to_u32(n).map_err(D::Error::custom)
}

/// Like [`deserialize_u32_from_number`] but `null` maps to `None`.
pub fn deserialize_opt_u32_from_number<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<f64>::deserialize(deserializer)? {
        Some(n) => number_to_u32(n).map(Some).map_err(D::Error::custom),
        None => Ok(None),
    }
}

fn number_to_u32(n: f64) -> Result<u32, String> {
    if !n.is_finite() || n.fract() != 0.0 || n < 0.0 || n > u32::MAX as f64 {
        return Err(format!("expected a non-negative integer, got {n}"));
    }
    Ok(n as u32)
}
