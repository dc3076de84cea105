use serde::Serialize;

use crate::types::Rect;

/// Running area totals for one optimization run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Accountant {
    placed_area: u64,
    unplaced_area: u64,
}

/// Final area figures once placement is done.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AreaReport {
    pub total_sheet_area: u64,
    pub total_piece_area: u64,
    pub placed_area: u64,
    pub unplaced_area: u64,
    /// Unused sheet area plus the area of pieces that found no room.
    pub waste: u64,
}

impl Accountant {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_placed(&mut self, piece: Rect) {
        self.placed_area += piece.area();
    }

    /// Pieces turned away because a capped pool is full still count once,
    /// as waste.
    pub fn record_unplaced(&mut self, piece: Rect) {
        self.unplaced_area += piece.area();
    }

    pub fn total_piece_area(&self) -> u64 {
        self.placed_area + self.unplaced_area
    }

    pub fn finish(&self, total_sheet_area: u64) -> AreaReport {
        AreaReport {
            total_sheet_area,
            total_piece_area: self.total_piece_area(),
            placed_area: self.placed_area,
            unplaced_area: self.unplaced_area,
            waste: total_sheet_area.saturating_sub(self.placed_area) + self.unplaced_area,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_placed() {
        let mut acc = Accountant::new();
        acc.record_placed(Rect::new(2, 2));
        acc.record_placed(Rect::new(3, 1));
        let report = acc.finish(16);
        assert_eq!(report.total_piece_area, 7);
        assert_eq!(report.waste, 9);
        assert_eq!(report.waste, report.total_sheet_area - report.total_piece_area);
    }

    #[test]
    fn test_unplaced_counts_as_waste() {
        let mut acc = Accountant::new();
        acc.record_placed(Rect::new(10, 10));
        acc.record_unplaced(Rect::new(10, 10));
        let report = acc.finish(100);
        assert_eq!(report.total_piece_area, 200);
        assert_eq!(report.unplaced_area, 100);
        assert_eq!(report.waste, 100);
    }

    #[test]
    fn test_empty() {
        let report = Accountant::new().finish(0);
        assert_eq!(report.waste, 0);
        assert_eq!(report.total_piece_area, 0);
    }
}
