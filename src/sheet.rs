use std::num::NonZeroU32;

use serde::ser::SerializeSeq;
use serde::{Serialize, Serializer};

use crate::color::Color;
use crate::types::Rect;

/// A candidate position found by [`Sheet::find_anchor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Anchor {
    pub x: u32,
    pub y: u32,
    pub rotated: bool,
}

/// Occupancy grid of one stock sheet. Cell `(x, y)` has `x < length` and
/// `y < width`; an occupied cell carries the color of the piece covering it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sheet {
    dims: Rect,
    cells: Vec<Option<Color>>,
}

impl Sheet {
    pub fn new(dims: Rect) -> Self {
        Self {
            dims,
            cells: vec![None; dims.area() as usize],
        }
    }

    pub fn dims(&self) -> Rect {
        self.dims
    }

    fn index(&self, x: u32, y: u32) -> usize {
        x as usize * self.dims.width as usize + y as usize
    }

    pub fn cell(&self, x: u32, y: u32) -> Option<Color> {
        if x >= self.dims.length || y >= self.dims.width {
            return None;
        }
        self.cells[self.index(x, y)]
    }

    pub fn occupied_area(&self) -> u64 {
        self.cells.iter().filter(|c| c.is_some()).count() as u64
    }

    /// True when the footprint anchored at `(x, y)` stays in bounds and every
    /// cell under it is free.
    pub fn can_place(&self, x: u32, y: u32, footprint: Rect) -> bool {
        let in_bounds = x as u64 + footprint.length as u64 <= self.dims.length as u64
            && y as u64 + footprint.width as u64 <= self.dims.width as u64;
        if !in_bounds {
            return false;
        }
        (x..x + footprint.length).all(|i| {
            let row = self.index(i, y);
            self.cells[row..row + footprint.width as usize]
                .iter()
                .all(Option::is_none)
        })
    }

    /// Marks the footprint occupied. Callers check [`Sheet::can_place`] first.
    pub fn fill(&mut self, x: u32, y: u32, footprint: Rect, color: Color) {
        for i in x..x + footprint.length {
            let row = self.index(i, y);
            self.cells[row..row + footprint.width as usize].fill(Some(color));
        }
    }

    /// First-fit scan: anchors in row-major order (`x` outer, `y` inner), the
    /// declared orientation tried before the rotated one at each anchor.
    pub fn find_anchor(&self, piece: Rect, allow_rotate: bool) -> Option<Anchor> {
        let min_side = piece.min_side();
        if min_side > self.dims.length || min_side > self.dims.width {
            return None;
        }
        let try_rotated = allow_rotate && piece.length != piece.width;
        for x in 0..=self.dims.length - min_side {
            for y in 0..=self.dims.width - min_side {
                if self.can_place(x, y, piece) {
                    return Some(Anchor {
                        x,
                        y,
                        rotated: false,
                    });
                }
                if try_rotated && self.can_place(x, y, piece.rotated()) {
                    return Some(Anchor {
                        x,
                        y,
                        rotated: true,
                    });
                }
            }
        }
        None
    }

    /// Rows of cells, `length` rows of `width` cells each.
    pub fn rows(&self) -> impl Iterator<Item = &[Option<Color>]> {
        self.cells.chunks(self.dims.width.max(1) as usize)
    }
}

struct CellValue(Option<Color>);

impl Serialize for CellValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.0 {
            Some(color) => color.serialize(serializer),
            None => serializer.serialize_bool(false),
        }
    }
}

struct RowValue<'a>(&'a [Option<Color>]);

impl Serialize for RowValue<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.0.len()))?;
        for cell in self.0 {
            seq.serialize_element(&CellValue(*cell))?;
        }
        seq.end()
    }
}

/// Serialized as the occupancy grid: an array of rows, each cell `false` or a
/// color string.
impl Serialize for Sheet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.dims.length as usize))?;
        for row in self.rows() {
            seq.serialize_element(&RowValue(row))?;
        }
        seq.end()
    }
}

/// Ordered sheets for one optimization run.
///
/// A capped pool is filled with exactly `cap` sheets up front and never grows.
/// An uncapped pool starts with one sheet and grows one sheet at a time.
#[derive(Debug, Clone)]
pub struct SheetPool {
    dims: Rect,
    cap: Option<NonZeroU32>,
    sheets: Vec<Sheet>,
}

impl SheetPool {
    pub fn new(dims: Rect, cap: Option<NonZeroU32>) -> Self {
        let sheets = match cap {
            Some(n) => (0..n.get()).map(|_| Sheet::new(dims)).collect(),
            None => vec![Sheet::new(dims)],
        };
        Self { dims, cap, sheets }
    }

    pub fn can_grow(&self) -> bool {
        self.cap.is_none()
    }

    /// Appends an empty sheet. Returns `None` once the pool is capped.
    pub fn create_sheet(&mut self) -> Option<&mut Sheet> {
        if !self.can_grow() {
            return None;
        }
        self.sheets.push(Sheet::new(self.dims));
        self.sheets.last_mut()
    }

    pub fn sheets(&self) -> &[Sheet] {
        &self.sheets
    }

    pub fn sheets_mut(&mut self) -> &mut [Sheet] {
        &mut self.sheets
    }

    pub fn len(&self) -> usize {
        self.sheets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }

    pub fn total_area(&self) -> u64 {
        self.sheets.len() as u64 * self.dims.area()
    }

    pub fn into_sheets(self) -> Vec<Sheet> {
        self.sheets
    }
}
