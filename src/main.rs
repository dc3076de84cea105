use std::num::NonZeroU32;

use clap::Parser;
use sheet_optimizer::api::OptimizeResponse;
use sheet_optimizer::render;
use sheet_optimizer::{OptimizeConfig, PieceSpec, Rect, Solver, ValidationPolicy};
use tracing::Level;

#[derive(Parser)]
#[command(
    name = "sheet_optimizer",
    about = "Greedy first-fit sheet cutting optimizer"
)]
struct Cli {
    /// Sheet dimensions (LxW, e.g. 2440x1220)
    #[arg(long)]
    sheet: String,

    /// Pieces as LxW:qty (e.g. 800x600:3 400x300:5)
    #[arg(long = "pieces", num_args = 1..)]
    pieces: Vec<String>,

    /// Hard cap on the number of sheets (default: unlimited)
    #[arg(long)]
    sheet_quantity: Option<NonZeroU32>,

    /// Disable piece rotation
    #[arg(long)]
    no_rotate: bool,

    /// Only accept pieces that fit the sheet in their declared orientation
    #[arg(long)]
    strict: bool,

    /// Show ASCII layout of each sheet
    #[arg(long)]
    layout: bool,

    /// Print the result as JSON, in the same shape the server returns
    #[arg(long)]
    json: bool,

    /// Log placement decisions to stderr
    #[arg(long)]
    verbose: bool,
}

fn parse_dimensions(s: &str) -> Result<Rect, String> {
    let (length, width) = s
        .split_once('x')
        .ok_or_else(|| format!("invalid dimensions '{}', expected LxW", s))?;
    let length = length
        .parse::<u32>()
        .map_err(|_| format!("invalid length in '{}'", s))?;
    let width = width
        .parse::<u32>()
        .map_err(|_| format!("invalid width in '{}'", s))?;
    if length == 0 || width == 0 {
        return Err(format!("dimensions must be non-zero in '{}'", s));
    }
    Ok(Rect::new(length, width))
}

fn parse_piece(s: &str) -> Result<PieceSpec, String> {
    let (dims, qty) = s
        .split_once(':')
        .ok_or_else(|| format!("invalid piece '{}', expected LxW:qty", s))?;
    let rect = parse_dimensions(dims)?;
    let qty = qty
        .parse::<u32>()
        .map_err(|_| format!("invalid quantity in '{}'", s))?;
    if qty == 0 {
        return Err(format!("quantity must be non-zero in '{}'", s));
    }
    Ok(PieceSpec::new(rect.length, rect.width, qty))
}

fn fail(msg: impl std::fmt::Display) -> ! {
    eprintln!("Error: {}", msg);
    std::process::exit(1);
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::WARN })
        .init();

    let sheet = parse_dimensions(&cli.sheet).unwrap_or_else(|e| fail(e));
    let pieces: Vec<PieceSpec> = cli
        .pieces
        .iter()
        .map(|p| parse_piece(p))
        .collect::<Result<Vec<_>, _>>()
        .unwrap_or_else(|e| fail(e));

    let config = OptimizeConfig::new(sheet)
        .with_sheet_quantity(cli.sheet_quantity)
        .with_rotation(!cli.no_rotate)
        .with_validation(if cli.strict {
            ValidationPolicy::DeclaredOnly
        } else {
            ValidationPolicy::RotationAware
        });

    let solution = Solver::new(config, pieces)
        .solve()
        .unwrap_or_else(|e| fail(e));

    if cli.json {
        let response = OptimizeResponse::from(solution);
        match serde_json::to_string(&response) {
            Ok(json) => println!("{}", json),
            Err(e) => fail(e),
        }
        return;
    }

    for (i, grid) in solution.sheets.iter().enumerate() {
        println!("Sheet {}:", i + 1);
        for p in solution.placements_on(i) {
            let rot = if p.rotated { " [rotated]" } else { "" };
            println!("  {} @ ({}, {}){}", p.declared(), p.x, p.y, rot);
        }
        if cli.layout {
            print!("{}", render::render_sheet(grid, &solution.colors));
        }
        println!();
    }
    if cli.layout && !solution.colors.is_empty() {
        println!("Legend:");
        print!("{}", render::render_legend(&solution.colors));
        println!();
    }

    if !solution.unplaced.is_empty() {
        println!("Unplaced (no sheet capacity left):");
        for rect in &solution.unplaced {
            println!("  {}", rect);
        }
        println!();
    }

    println!(
        "Summary: {} sheet{} used, waste {} ({:.1}% of sheet area unused)",
        solution.sheet_count(),
        if solution.sheet_count() == 1 { "" } else { "s" },
        solution.waste(),
        solution.waste_percent(),
    );
}
