use crate::color::{Color, ColorMap};
use crate::sheet::Sheet;

const MAX_WIDTH: f64 = 80.0;
const MAX_HEIGHT: f64 = 40.0;
const EMPTY: char = '.';
const SYMBOLS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Draws the occupancy grid as text, one symbol per piece size. Sheet length
/// runs across, width runs down. Large sheets are sampled down to fit the
/// terminal; small ones are drawn one character per cell.
pub fn render_sheet(sheet: &Sheet, colors: &ColorMap) -> String {
    let dims = sheet.dims();
    if dims.length == 0 || dims.width == 0 {
        return String::new();
    }
    let scale = f64::min(
        MAX_WIDTH / dims.length as f64,
        MAX_HEIGHT / dims.width as f64,
    )
    .min(1.0);
    let cols = ((dims.length as f64 * scale).round() as u32).max(1);
    let rows = ((dims.width as f64 * scale).round() as u32).max(1);

    let mut out = String::new();
    for r in 0..rows {
        let y = sample(r, rows, dims.width);
        let line: String = (0..cols)
            .map(|c| {
                let x = sample(c, cols, dims.length);
                sheet
                    .cell(x, y)
                    .map_or(EMPTY, |color| symbol_for(color, colors))
            })
            .collect();
        out.push_str(&line);
        out.push('\n');
    }
    out
}

/// `SYMBOL = LxW` lines for every size in the map.
pub fn render_legend(colors: &ColorMap) -> String {
    colors
        .iter()
        .map(|(key, color)| format!("  {} = {} ({})\n", symbol_for(color, colors), key, color))
        .collect()
}

fn sample(i: u32, steps: u32, extent: u32) -> u32 {
    ((i as u64 * extent as u64) / steps as u64).min(extent as u64 - 1) as u32
}

fn symbol_for(color: Color, colors: &ColorMap) -> char {
    colors
        .iter()
        .position(|(_, c)| c == color)
        .and_then(|i| SYMBOLS.get(i))
        .map_or('#', |&b| b as char)
}
