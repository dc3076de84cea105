//! End-to-end checks of the packing pipeline through the public API.

use std::num::NonZeroU32;

use pretty_assertions::assert_eq;
use sheet_optimizer::{Error, OptimizeConfig, PieceSpec, Rect, Solution, optimize};

fn assert_no_overlap(sol: &Solution) {
    for (si, sheet) in sol.sheets.iter().enumerate() {
        let placed: u64 = sol.placements_on(si).map(|p| p.rect.area()).sum();
        // every placed cell is marked once, so a clash would show up as fewer marked cells
        assert_eq!(sheet.occupied_area(), placed, "sheet {si} has overlaps");
        for p in sol.placements_on(si) {
            assert!(p.x + p.rect.length <= sol.stock.length);
            assert!(p.y + p.rect.width <= sol.stock.width);
        }
    }
}

#[test]
fn full_sheet_of_squares() {
    let config = OptimizeConfig::new(Rect::new(4, 4));
    let sol = optimize(&config, &[PieceSpec::new(2, 2, 4)]).unwrap();
    assert_no_overlap(&sol);
    assert_eq!(sol.sheet_count(), 1);
    assert_eq!(sol.sheets[0].occupied_area(), 16);
    assert_eq!(sol.waste(), 0);
}

#[test]
fn piece_longer_than_sheet_both_ways() {
    let config = OptimizeConfig::new(Rect::new(3, 3));
    let err = optimize(&config, &[PieceSpec::new(4, 1, 1)]).unwrap_err();
    assert_eq!(
        err,
        Error::InfeasiblePiece {
            piece: Rect::new(4, 1),
            sheet: Rect::new(3, 3),
        }
    );
}

#[test]
fn demand_beyond_capped_capacity() {
    let config =
        OptimizeConfig::new(Rect::new(10, 10)).with_sheet_quantity(NonZeroU32::new(1));
    let sol = optimize(&config, &[PieceSpec::new(10, 10, 2)]).unwrap();
    assert_no_overlap(&sol);
    assert_eq!(sol.sheet_count(), 1);
    assert_eq!(sol.total_sheet_area(), 100);
    assert_eq!(sol.total_piece_area(), 200);
    assert_eq!(sol.unplaced.len(), 1);
    assert_eq!(sol.waste(), 100);
}

#[test]
fn uncapped_waste_matches_area_difference() {
    let config = OptimizeConfig::new(Rect::new(50, 30));
    let pieces = [
        PieceSpec::new(20, 10, 7),
        PieceSpec::new(25, 15, 3),
        PieceSpec::new(5, 30, 4),
        PieceSpec::new(7, 3, 11),
    ];
    let sol = optimize(&config, &pieces).unwrap();
    assert_no_overlap(&sol);
    assert!(sol.unplaced.is_empty());
    assert_eq!(sol.placements.len(), 25);
    assert_eq!(sol.waste(), sol.total_sheet_area() - sol.total_piece_area());
}

#[test]
fn cap_never_exceeded() {
    let config =
        OptimizeConfig::new(Rect::new(10, 10)).with_sheet_quantity(NonZeroU32::new(2));
    let sol = optimize(&config, &[PieceSpec::new(6, 6, 5)]).unwrap();
    assert_no_overlap(&sol);
    assert_eq!(sol.sheet_count(), 2);
    assert_eq!(sol.placements.len(), 2);
    assert_eq!(sol.unplaced.len(), 3);
    assert_eq!(sol.waste(), 200 - 72 + 108);
}

#[test]
fn empty_request_reports_one_sheet() {
    let sol = optimize(&OptimizeConfig::new(Rect::new(4, 4)), &[]).unwrap();
    assert_eq!(sol.sheet_count(), 1);
    assert_eq!(sol.waste(), 16);
}

#[test]
fn repeated_runs_agree() {
    let config = OptimizeConfig::new(Rect::new(40, 25));
    let pieces = [
        PieceSpec::new(12, 7, 9),
        PieceSpec::new(7, 12, 4),
        PieceSpec::new(3, 3, 20),
    ];
    let a = optimize(&config, &pieces).unwrap();
    let b = optimize(&config, &pieces).unwrap();
    assert_eq!(a.waste(), b.waste());
    assert_eq!(a.sheet_count(), b.sheet_count());
    assert_eq!(a.sheets, b.sheets);
}
