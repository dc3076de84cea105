use crate::accounting::{Accountant, AreaReport};
use crate::color::ColorMap;
use crate::config::OptimizeConfig;
use crate::error::{Error, Result};
use crate::sheet::{Anchor, Sheet, SheetPool};
use crate::types::{PieceSpec, Placement, Rect};
use crate::validation::{check_limits, validate_pieces};

/// Greedy first-fit packer over occupancy grids.
///
/// Pieces are expanded to one entry per unit, sorted largest area first and
/// placed one at a time on the earliest sheet with room. There is no
/// backtracking: the result is deterministic for a given input.
pub struct Solver {
    config: OptimizeConfig,
    pieces: Vec<PieceSpec>,
}

#[derive(Debug, Clone)]
pub struct Solution {
    pub stock: Rect,
    pub sheets: Vec<Sheet>,
    pub placements: Vec<Placement>,
    /// Units that found no room because the sheet cap was reached.
    pub unplaced: Vec<Rect>,
    pub colors: ColorMap,
    pub area: AreaReport,
}

impl Solution {
    pub fn sheet_count(&self) -> usize {
        self.sheets.len()
    }

    pub fn waste(&self) -> u64 {
        self.area.waste
    }

    pub fn total_piece_area(&self) -> u64 {
        self.area.total_piece_area
    }

    pub fn total_sheet_area(&self) -> u64 {
        self.area.total_sheet_area
    }

    /// Unused share of the sheets that were handed out, ignoring unplaced pieces.
    pub fn waste_percent(&self) -> f64 {
        let total = self.area.total_sheet_area;
        if total == 0 {
            return 0.0;
        }
        (total - self.area.placed_area) as f64 / total as f64 * 100.0
    }

    pub fn placements_on(&self, sheet: usize) -> impl Iterator<Item = &Placement> {
        self.placements.iter().filter(move |p| p.sheet == sheet)
    }
}

impl Solver {
    pub fn new(config: OptimizeConfig, pieces: Vec<PieceSpec>) -> Self {
        Self { config, pieces }
    }

    pub fn solve(&self) -> Result<Solution> {
        let cfg = &self.config;
        check_limits(cfg, &self.pieces)?;
        validate_pieces(&self.pieces, cfg.sheet, cfg.validation, cfg.allow_rotate)?;

        let mut pieces = expand_pieces(&self.pieces);
        sort_by_area_desc(&mut pieces);

        let mut pool = SheetPool::new(cfg.sheet, cfg.sheet_quantity);
        let mut colors = ColorMap::new();
        let mut accountant = Accountant::new();
        let mut placements = Vec::with_capacity(pieces.len());
        let mut unplaced = Vec::new();

        for piece in pieces {
            match self.place(&mut pool, &mut colors, piece)? {
                Some(placement) => {
                    accountant.record_placed(piece);
                    placements.push(placement);
                }
                None => {
                    tracing::debug!(piece = %piece, "no room left, counted as waste");
                    accountant.record_unplaced(piece);
                    unplaced.push(piece);
                }
            }
        }

        let area = accountant.finish(pool.total_area());
        tracing::info!(
            sheets = pool.len(),
            placed = placements.len(),
            unplaced = unplaced.len(),
            waste = area.waste,
            "optimization finished"
        );

        Ok(Solution {
            stock: cfg.sheet,
            sheets: pool.into_sheets(),
            placements,
            unplaced,
            colors,
            area,
        })
    }

    /// Tries existing sheets in order, then a fresh sheet if the pool may grow.
    /// Growing past the cell budget aborts the run.
    fn place(
        &self,
        pool: &mut SheetPool,
        colors: &mut ColorMap,
        piece: Rect,
    ) -> Result<Option<Placement>> {
        let allow_rotate = self.config.allow_rotate;

        for (idx, sheet) in pool.sheets_mut().iter_mut().enumerate() {
            if let Some(anchor) = sheet.find_anchor(piece, allow_rotate) {
                return Ok(Some(commit(sheet, idx, colors, piece, anchor)));
            }
        }

        let idx = pool.len();
        let budget = self.config.limits.sheet_budget(self.config.sheet);
        if pool.can_grow() && idx as u64 >= budget {
            return Err(Error::InvalidInput(format!(
                "layout needs more than {} sheets of {}",
                budget, self.config.sheet
            )));
        }
        let Some(sheet) = pool.create_sheet() else {
            return Ok(None);
        };
        tracing::debug!(sheet = idx, piece = %piece, "opened new sheet");
        match sheet.find_anchor(piece, allow_rotate) {
            Some(anchor) => Ok(Some(commit(sheet, idx, colors, piece, anchor))),
            None => {
                // validation rules this out; the empty sheet still counts towards area
                tracing::warn!(piece = %piece, "piece does not fit an empty sheet");
                Ok(None)
            }
        }
    }
}

fn commit(
    sheet: &mut Sheet,
    idx: usize,
    colors: &mut ColorMap,
    piece: Rect,
    anchor: Anchor,
) -> Placement {
    let footprint = if anchor.rotated {
        piece.rotated()
    } else {
        piece
    };
    let color = colors.color_for(piece);
    sheet.fill(anchor.x, anchor.y, footprint, color);
    tracing::debug!(
        sheet = idx,
        x = anchor.x,
        y = anchor.y,
        piece = %piece,
        rotated = anchor.rotated,
        "placed"
    );
    Placement {
        sheet: idx,
        x: anchor.x,
        y: anchor.y,
        rect: footprint,
        rotated: anchor.rotated,
        color,
    }
}

/// One entry per required unit.
pub fn expand_pieces(specs: &[PieceSpec]) -> Vec<Rect> {
    specs
        .iter()
        .flat_map(|s| std::iter::repeat_n(s.rect(), s.quantity as usize))
        .collect()
}

/// Largest area first. The sort is stable, so equal areas keep input order.
pub fn sort_by_area_desc(pieces: &mut [Rect]) {
    pieces.sort_by(|a, b| b.area().cmp(&a.area()));
}

/// Convenience wrapper around [`Solver`].
pub fn optimize(config: &OptimizeConfig, pieces: &[PieceSpec]) -> Result<Solution> {
    Solver::new(*config, pieces.to_vec()).solve()
}
