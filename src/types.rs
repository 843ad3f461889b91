use serde::{Deserialize, Serialize};

use crate::config::MaterialThickness;
use crate::units::{LengthUnit, convert};

/// Tolerance for comparing derived lengths.
pub const EPS: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub w: f64,
    pub h: f64,
}

impl Rect {
    pub fn new(w: f64, h: f64) -> Self {
        Self { w, h }
    }

    pub fn area(&self) -> f64 {
        self.w * self.h
    }

    pub fn rotated(&self) -> Self {
        Self {
            w: self.h,
            h: self.w,
        }
    }

    pub fn fits_in(&self, other: &Rect) -> bool {
        self.w <= other.w + EPS && self.h <= other.h + EPS
    }

    /// Both sides strictly positive.
    pub fn is_valid(&self) -> bool {
        self.w > EPS && self.h > EPS
    }

    pub fn same_size(&self, other: &Rect) -> bool {
        (self.w - other.w).abs() < EPS && (self.h - other.h).abs() < EPS
    }
}

impl std::fmt::Display for Rect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", trim(self.w), trim(self.h))
    }
}

fn trim(v: f64) -> String {
    let s = format!("{:.4}", v);
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}

/// A named, quantified rectangle of one material thickness.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CutPiece {
    pub name: String,
    pub width: f64,
    pub height: f64,
    pub quantity: u32,
    pub material: MaterialThickness,
}

impl CutPiece {
    pub fn new(
        name: impl Into<String>,
        width: f64,
        height: f64,
        quantity: u32,
        material: &MaterialThickness,
    ) -> Self {
        Self {
            name: name.into(),
            width,
            height,
            quantity,
            material: material.clone(),
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.width, self.height)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockSheet {
    pub name: String,
    pub width: f64,
    pub height: f64,
    pub material: MaterialThickness,
}

impl StockSheet {
    /// A 4' x 8' sheet expressed in `unit`.
    pub fn standard(material: &MaterialThickness, unit: LengthUnit) -> Self {
        Self {
            name: format!("4x8 {}", material.nominal),
            width: convert(48.0, LengthUnit::Inches, unit),
            height: convert(96.0, LengthUnit::Inches, unit),
            material: material.clone(),
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.width, self.height)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Placement {
    pub name: String,
    /// Footprint on the sheet, already swapped when `rotated`.
    pub rect: Rect,
    pub x: f64,
    pub y: f64,
    pub rotated: bool,
}

/// One physically used stock sheet.
#[derive(Debug, Clone, Serialize)]
pub struct SheetLayout {
    pub sheet: StockSheet,
    pub placements: Vec<Placement>,
    pub used_area: f64,
    pub total_area: f64,
    /// Area still available in free rectangles after packing.
    pub free_area: f64,
    pub waste_percent: f64,
}

/// A piece that fits no sheet in any allowed orientation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OversizedPiece {
    pub name: String,
    pub rect: Rect,
}

/// A piece with a zero or negative side, left out of packing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvalidPiece {
    pub name: String,
    pub rect: Rect,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct PackResult {
    pub layouts: Vec<SheetLayout>,
    pub oversized: Vec<OversizedPiece>,
    pub invalid: Vec<InvalidPiece>,
}

impl PackResult {
    pub fn sheet_count(&self) -> usize {
        self.layouts.len()
    }

    pub fn total_waste_percent(&self) -> f64 {
        let total: f64 = self.layouts.iter().map(|l| l.total_area).sum();
        let used: f64 = self.layouts.iter().map(|l| l.used_area).sum();
        if total <= 0.0 {
            return 0.0;
        }
        (total - used) / total * 100.0
    }
}
