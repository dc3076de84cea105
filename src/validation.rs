use crate::config::{OptimizeConfig, ValidationPolicy};
use crate::error::{Error, Result};
use crate::types::{PieceSpec, Rect};

/// Checks every piece against the sheet before any placement work starts.
///
/// Zero dimensions or quantities are rejected as invalid input. A piece is
/// infeasible when it fits neither its declared orientation nor, if the policy
/// and `allow_rotate` permit it, the rotated one. The first offending piece
/// aborts the whole check.
pub fn validate_pieces(
    pieces: &[PieceSpec],
    sheet: Rect,
    policy: ValidationPolicy,
    allow_rotate: bool,
) -> Result<()> {
    if sheet.length == 0 || sheet.width == 0 {
        return Err(Error::InvalidInput(
            "sheet dimensions must be non-zero".to_string(),
        ));
    }
    for spec in pieces {
        if spec.length == 0 || spec.width == 0 {
            return Err(Error::InvalidInput(format!(
                "piece dimensions must be non-zero, got {}",
                spec.rect()
            )));
        }
        if spec.quantity == 0 {
            return Err(Error::InvalidInput(format!(
                "piece quantity must be non-zero for {}",
                spec.rect()
            )));
        }
        if !fits_sheet(spec.rect(), sheet, policy, allow_rotate) {
            tracing::debug!(piece = %spec.rect(), sheet = %sheet, "infeasible piece");
            return Err(Error::InfeasiblePiece {
                piece: spec.rect(),
                sheet,
            });
        }
    }
    Ok(())
}

/// Rejects requests whose grids or unit lists would outgrow `config.limits`.
/// Runs before anything is allocated.
pub fn check_limits(config: &OptimizeConfig, pieces: &[PieceSpec]) -> Result<()> {
    let limits = &config.limits;
    let cells = config.sheet.area();
    if cells > limits.max_sheet_cells || cells > limits.max_total_cells {
        return Err(Error::InvalidInput(format!(
            "sheet {} has {} cells, at most {} allowed",
            config.sheet,
            cells,
            limits.max_sheet_cells.min(limits.max_total_cells)
        )));
    }
    if let Some(cap) = config.sheet_quantity {
        let budget = limits.sheet_budget(config.sheet);
        if cap.get() > limits.max_sheets || u64::from(cap.get()) > budget {
            return Err(Error::InvalidInput(format!(
                "sheet quantity {} exceeds the limit of {} sheets of {}",
                cap,
                budget.min(u64::from(limits.max_sheets)),
                config.sheet
            )));
        }
    }
    let units: u64 = pieces.iter().map(|p| u64::from(p.quantity)).sum();
    if units > limits.max_units {
        return Err(Error::InvalidInput(format!(
            "{} piece units requested, at most {} allowed",
            units, limits.max_units
        )));
    }
    Ok(())
}

pub fn fits_sheet(
    piece: Rect,
    sheet: Rect,
    policy: ValidationPolicy,
    allow_rotate: bool,
) -> bool {
    let fits_normal = piece.fits_in(&sheet);
    let fits_rotated = policy == ValidationPolicy::RotationAware
        && allow_rotate
        && piece.rotated().fits_in(&sheet);
    fits_normal || fits_rotated
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Limits;
    use std::num::NonZeroU32;

    const AWARE: ValidationPolicy = ValidationPolicy::RotationAware;
    const STRICT: ValidationPolicy = ValidationPolicy::DeclaredOnly;

    #[test]
    fn test_fits_declared() {
        let pieces = [PieceSpec::new(2, 2, 4)];
        assert!(validate_pieces(&pieces, Rect::new(4, 4), AWARE, true).is_ok());
        assert!(validate_pieces(&pieces, Rect::new(4, 4), STRICT, true).is_ok());
    }

    #[test]
    fn test_too_long_both_ways() {
        let pieces = [PieceSpec::new(4, 1, 1)];
        let err = validate_pieces(&pieces, Rect::new(3, 3), AWARE, true).unwrap_err();
        assert_eq!(
            err,
            Error::InfeasiblePiece {
                piece: Rect::new(4, 1),
                sheet: Rect::new(3, 3),
            }
        );
    }

    #[test]
    fn test_rotation_only_fit_depends_on_policy() {
        // 2x5 only fits a 5x2 sheet when rotated
        let pieces = [PieceSpec::new(2, 5, 1)];
        let sheet = Rect::new(5, 2);
        assert!(validate_pieces(&pieces, sheet, AWARE, true).is_ok());
        assert!(validate_pieces(&pieces, sheet, AWARE, false).is_err());
        assert!(validate_pieces(&pieces, sheet, STRICT, true).is_err());
    }

    #[test]
    fn test_square_piece_wider_than_narrow_side() {
        // neither side exceeds both sheet sides, yet 4x4 cannot fit 3x5
        let pieces = [PieceSpec::new(4, 4, 1)];
        assert!(validate_pieces(&pieces, Rect::new(3, 5), AWARE, true).is_err());
    }

    #[test]
    fn test_first_offender_reported() {
        let pieces = [
            PieceSpec::new(1, 1, 1),
            PieceSpec::new(9, 9, 1),
            PieceSpec::new(8, 8, 1),
        ];
        let err = validate_pieces(&pieces, Rect::new(5, 5), AWARE, true).unwrap_err();
        assert!(matches!(err, Error::InfeasiblePiece { piece, .. } if piece == Rect::new(9, 9)));
    }

    fn small_limits() -> Limits {
        Limits {
            max_sheet_cells: 100,
            max_sheets: 5,
            max_units: 10,
            max_total_cells: 300,
        }
    }

    #[test]
    fn test_limits_accept_normal_request() {
        let config = OptimizeConfig::new(Rect::new(10, 10))
            .with_sheet_quantity(NonZeroU32::new(3))
            .with_limits(small_limits());
        assert!(check_limits(&config, &[PieceSpec::new(2, 2, 10)]).is_ok());
        assert!(check_limits(&OptimizeConfig::new(Rect::new(2440, 1220)), &[]).is_ok());
    }

    #[test]
    fn test_limits_reject_huge_sheet() {
        let config = OptimizeConfig::new(Rect::new(11, 10)).with_limits(small_limits());
        assert!(matches!(check_limits(&config, &[]), Err(Error::InvalidInput(_))));
        let config = OptimizeConfig::new(Rect::new(u32::MAX, u32::MAX));
        assert!(matches!(check_limits(&config, &[]), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_limits_reject_huge_cap() {
        // 4 sheets of 100 cells exceed the 300-cell budget
        let config = OptimizeConfig::new(Rect::new(10, 10))
            .with_sheet_quantity(NonZeroU32::new(4))
            .with_limits(small_limits());
        assert!(matches!(check_limits(&config, &[]), Err(Error::InvalidInput(_))));

        let config = OptimizeConfig::new(Rect::new(1, 1))
            .with_sheet_quantity(NonZeroU32::new(4_000_000_000));
        assert!(matches!(check_limits(&config, &[]), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_limits_reject_too_many_units() {
        let config = OptimizeConfig::new(Rect::new(10, 10)).with_limits(small_limits());
        let pieces = [PieceSpec::new(1, 1, 6), PieceSpec::new(2, 2, 5)];
        assert!(matches!(check_limits(&config, &pieces), Err(Error::InvalidInput(_))));

        let pieces = [PieceSpec::new(1, 1, u32::MAX), PieceSpec::new(1, 1, u32::MAX)];
        let config = OptimizeConfig::new(Rect::new(10, 10));
        assert!(matches!(check_limits(&config, &pieces), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_zero_values_rejected() {
        let sheet = Rect::new(5, 5);
        assert!(matches!(
            validate_pieces(&[PieceSpec::new(0, 1, 1)], sheet, AWARE, true),
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            validate_pieces(&[PieceSpec::new(1, 1, 0)], sheet, AWARE, true),
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            validate_pieces(&[], Rect::new(0, 5), AWARE, true),
            Err(Error::InvalidInput(_))
        ));
    }
}
