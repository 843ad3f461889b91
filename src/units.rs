use serde::{Deserialize, Serialize};

pub const CM_PER_INCH: f64 = 2.54;
const MM_PER_CM: f64 = 10.0;
const EPS: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LengthUnit {
    #[default]
    Inches,
    Centimeters,
}

impl LengthUnit {
    pub fn suffix(&self) -> &'static str {
        match self {
            LengthUnit::Inches => "in",
            LengthUnit::Centimeters => "cm",
        }
    }
}

impl std::fmt::Display for LengthUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.suffix())
    }
}

/// Linear mapping from a grid-unit count to millimetres:
/// `units * cell_size_mm * scale + offset_mm`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridFormula {
    pub scale: f64,
    pub offset_mm: f64,
}

pub fn convert(value: f64, from: LengthUnit, to: LengthUnit) -> f64 {
    match (from, to) {
        (LengthUnit::Inches, LengthUnit::Centimeters) => value * CM_PER_INCH,
        (LengthUnit::Centimeters, LengthUnit::Inches) => value / CM_PER_INCH,
        _ => value,
    }
}

/// Rounds up to the next 1/8 of the working unit. Values already on an eighth
/// (within floating-point noise) are left alone.
pub fn round_up_to_eighth(value: f64) -> f64 {
    (value * 8.0 - EPS).ceil() / 8.0
}

/// Maps a grid-unit count to an opening length in `unit`, rounded up so the
/// opening never comes out smaller than the modules it must hold.
pub fn grid_units_to_length(
    units: u32,
    cell_size_mm: f64,
    formula: GridFormula,
    unit: LengthUnit,
) -> f64 {
    let mm = units as f64 * cell_size_mm * formula.scale + formula.offset_mm;
    let length = convert(mm / MM_PER_CM, LengthUnit::Centimeters, unit);
    round_up_to_eighth(length)
}

/// How many whole grid units fit in `length`.
pub fn length_to_grid_units(
    length: f64,
    cell_size_mm: f64,
    formula: GridFormula,
    unit: LengthUnit,
) -> u32 {
    let mm = convert(length, unit, LengthUnit::Centimeters) * MM_PER_CM;
    let per_unit = cell_size_mm * formula.scale;
    if per_unit <= 0.0 {
        return 0;
    }
    let units = ((mm - formula.offset_mm) / per_unit + EPS).floor();
    if units <= 0.0 { 0 } else { units as u32 }
}
