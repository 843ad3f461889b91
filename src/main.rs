use chest_cutlist::carcass::{CarcassDimensions, CarcassWarning, compute_carcass};
use chest_cutlist::config::ChestConfig;
use chest_cutlist::cutlist::{aggregate, total_area};
use chest_cutlist::drawer::{DrawerBoxDimensions, DrawerWarning, compute_drawer_boxes};
use chest_cutlist::optimizer::{CutlistPlan, default_sheets, optimize};
use chest_cutlist::render;
use chest_cutlist::types::{CutPiece, Rect, StockSheet};
use clap::Parser;
use serde::Serialize;
use tracing::Level;

#[derive(Parser)]
#[command(
    name = "chest_cutlist",
    about = "Chest-of-drawers dimension calculator and sheet cutlist optimizer"
)]
struct Cli {
    /// Chest configuration JSON file (built-in example chest when omitted)
    #[arg(long)]
    config: Option<String>,

    /// Stock sheet size as WxH in the chest's unit (default: a 4x8 sheet)
    #[arg(long, value_parser = parse_dimensions)]
    sheet: Option<Rect>,

    /// Blade kerf, overriding the configuration
    #[arg(long)]
    kerf: Option<f64>,

    /// Disable piece rotation
    #[arg(long)]
    no_rotate: bool,

    /// Show ASCII layout of each sheet
    #[arg(long)]
    layout: bool,

    /// Print the full result as JSON
    #[arg(long)]
    json: bool,

    /// Debug logging on stderr
    #[arg(long, short)]
    verbose: bool,
}

fn parse_dimensions(s: &str) -> Result<Rect, String> {
    let parts: Vec<&str> = s.split('x').collect();
    if parts.len() != 2 {
        return Err(format!("invalid dimensions '{}', expected WxH", s));
    }
    let w = parts[0]
        .parse::<f64>()
        .map_err(|_| format!("invalid width in '{}'", s))?;
    let h = parts[1]
        .parse::<f64>()
        .map_err(|_| format!("invalid height in '{}'", s))?;
    if !(w > 0.0 && h > 0.0) {
        return Err(format!("dimensions must be positive in '{}'", s));
    }
    Ok(Rect::new(w, h))
}

#[derive(Serialize)]
struct Report<'a> {
    carcass: &'a CarcassDimensions,
    drawers: &'a [DrawerBoxDimensions],
    cutlist: &'a [CutPiece],
    plan: &'a CutlistPlan,
    sheet_count: usize,
    waste_percent: f64,
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::ERROR })
        .init();

    let mut config = match &cli.config {
        Some(path) => ChestConfig::load(path).unwrap_or_else(|e| {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }),
        None => ChestConfig::default(),
    };
    if let Some(kerf) = cli.kerf {
        if kerf < 0.0 {
            eprintln!("Error: kerf must not be negative");
            std::process::exit(1);
        }
        config.tolerances.kerf = kerf;
    }

    let sheets: Vec<StockSheet> = default_sheets(&config)
        .into_iter()
        .map(|s| match cli.sheet {
            Some(size) => StockSheet {
                name: format!("{} {}", size, s.material.nominal),
                width: size.w,
                height: size.h,
                ..s
            },
            None => s,
        })
        .collect();

    let carcass = compute_carcass(&config);
    let drawers = compute_drawer_boxes(&config);
    let cutlist = aggregate(&config);
    let plan = optimize(&config, &sheets, !cli.no_rotate);

    if cli.json {
        let report = Report {
            carcass: &carcass,
            drawers: &drawers,
            cutlist: &cutlist,
            plan: &plan,
            sheet_count: plan.sheet_count(),
            waste_percent: plan.total_waste_percent(),
        };
        match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
        return;
    }

    let unit = config.unit;
    println!(
        "Carcass: {:.4} W x {:.4} H x {:.4} D {unit}",
        carcass.outer_width, carcass.outer_height, carcass.outer_depth
    );
    println!(
        "  inner: {:.4} W x {:.4} H x {:.4} D {unit}",
        carcass.inner_width, carcass.inner_height, carcass.inner_depth
    );
    for v in &carcass.violations {
        println!("  ! {:?} {:.4} exceeds max {:.4}", v.dimension, v.actual, v.max);
    }
    for w in &carcass.warnings {
        match w {
            CarcassWarning::DeadSpace { column, height } => {
                println!("  ! column {} leaves {:.4} {unit} unused", column + 1, height)
            }
            CarcassWarning::NegativeDimension { dimension, value } => {
                println!("  ! {} is {:.4}", dimension, value)
            }
        }
    }
    if carcass.rails_recommended && !config.rails.enabled {
        println!("  ! horizontal rails recommended");
    }
    println!();

    for d in &drawers {
        println!(
            "Drawer C{}R{} ({:?}): box {:.4} x {:.4} x {:.4}, interior {:.4} x {:.4} x {:.4}, face {}",
            d.position.column + 1,
            d.position.row + 1,
            d.construction,
            d.box_outer_width,
            d.box_outer_height,
            d.box_outer_depth,
            d.interior_width,
            d.interior_height,
            d.interior_depth,
            Rect::new(d.face_width, d.face_height),
        );
        for w in &d.warnings {
            match w {
                DrawerWarning::SlideHeight { opening_height, minimum } => println!(
                    "  ! opening {:.4} is below slide minimum {:.4}",
                    opening_height, minimum
                ),
                DrawerWarning::SlideLength { box_depth, slide_length } => println!(
                    "  ! box depth {:.4} exceeds slide length {:.4}",
                    box_depth, slide_length
                ),
                DrawerWarning::NegativeDimension { dimension, value } => {
                    println!("  ! {} is {:.4}", dimension, value)
                }
            }
        }
    }
    println!();

    println!("Cut list:");
    for p in &cutlist {
        println!(
            "  {:>3} x {:<12} {:<14} {}",
            p.quantity,
            Rect::new(p.width, p.height).to_string(),
            p.material.nominal,
            p.name
        );
    }
    println!();

    for group in &plan.groups {
        let Some(sheet) = &group.sheet else {
            println!("{}: no stock sheet configured", group.material.nominal);
            continue;
        };
        println!(
            "{} on {} sheets ({:.1} sq {unit} of parts):",
            group.material.nominal,
            sheet.rect(),
            total_area(&group.pieces)
        );
        for (i, layout) in group.result.layouts.iter().enumerate() {
            println!("  Sheet {} ({:.1}% waste):", i + 1, layout.waste_percent);
            for p in &layout.placements {
                let rot = if p.rotated { " [rotated]" } else { "" };
                println!("    {} {} @ ({}, {}){}", p.name, p.rect, p.x, p.y, rot);
            }
            if cli.layout {
                print!("{}", render::render_sheet(layout));
            }
        }
        for o in &group.result.oversized {
            println!("  ! {} ({}) does not fit the stock sheet", o.name, o.rect);
        }
        for p in &group.result.invalid {
            println!("  ! {} ({}) has no positive area, not cut", p.name, p.rect);
        }
        println!();
    }

    println!(
        "Summary: {} sheet{} used, {:.1}% waste",
        plan.sheet_count(),
        if plan.sheet_count() == 1 { "" } else { "s" },
        plan.total_waste_percent(),
    );
}
