//! Declarative chest configuration.
//!
//! Everything the dimension engine needs is carried here. The configuration is
//! the only persisted state; every dimension and cut list is derived from it on
//! demand.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::units::{GridFormula, LengthUnit, grid_units_to_length};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MaterialCategory {
    #[default]
    Plywood,
    Hardwood,
    Mdf,
    Custom,
}

/// A sheet-good thickness. `actual` is what the panel really measures and is
/// the value every calculation uses; `nominal` is only a label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialThickness {
    pub id: String,
    pub nominal: String,
    pub actual: f64,
    pub category: MaterialCategory,
}

impl MaterialThickness {
    pub fn new(id: &str, nominal: &str, actual: f64, category: MaterialCategory) -> Self {
        Self {
            id: id.to_string(),
            nominal: nominal.to_string(),
            actual,
            category,
        }
    }

    pub fn plywood_3_4() -> Self {
        Self::new("ply-3/4", "3/4\" plywood", 23.0 / 32.0, MaterialCategory::Plywood)
    }

    pub fn plywood_1_2() -> Self {
        Self::new("ply-1/2", "1/2\" plywood", 15.0 / 32.0, MaterialCategory::Plywood)
    }

    pub fn mdf_1_4() -> Self {
        Self::new("mdf-1/4", "1/4\" MDF", 0.25, MaterialCategory::Mdf)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlideSpec {
    pub length: f64,
    pub clearance_per_side: f64,
    pub min_mounting_height: f64,
    /// Drawer box depth when it should differ from the slide length.
    pub box_depth: Option<f64>,
}

impl Default for SlideSpec {
    fn default() -> Self {
        Self {
            length: 18.0,
            clearance_per_side: 0.5,
            min_mounting_height: 1.75,
            box_depth: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConstructionMethod {
    #[default]
    Dado,
    ButtThroughSides,
    ButtThroughBottom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DrawerStyle {
    #[default]
    Overlay,
    Inset,
}

/// An opening dimension, either counted in grid units or given directly.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpeningSize {
    Units(u32),
    Length(f64),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawerMaterials {
    pub side: MaterialThickness,
    pub front_back: MaterialThickness,
    pub bottom: MaterialThickness,
    pub face: MaterialThickness,
}

impl Default for DrawerMaterials {
    fn default() -> Self {
        Self {
            side: MaterialThickness::plywood_1_2(),
            front_back: MaterialThickness::plywood_1_2(),
            bottom: MaterialThickness::mdf_1_4(),
            face: MaterialThickness::plywood_3_4(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarcassMaterials {
    pub side: MaterialThickness,
    pub top_bottom: MaterialThickness,
    pub divider: MaterialThickness,
    pub back: MaterialThickness,
    pub rail: MaterialThickness,
}

impl Default for CarcassMaterials {
    fn default() -> Self {
        Self {
            side: MaterialThickness::plywood_3_4(),
            top_bottom: MaterialThickness::plywood_3_4(),
            divider: MaterialThickness::plywood_3_4(),
            back: MaterialThickness::mdf_1_4(),
            rail: MaterialThickness::plywood_3_4(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Materials {
    pub carcass: CarcassMaterials,
    pub drawer: DrawerMaterials,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Row {
    pub height: OpeningSize,
    #[serde(default)]
    pub construction: ConstructionMethod,
    /// Only honoured when `ChestConfig::advanced_materials` is set.
    #[serde(default)]
    pub materials: Option<DrawerMaterials>,
}

impl Row {
    pub fn new(height: OpeningSize) -> Self {
        Self {
            height,
            construction: ConstructionMethod::default(),
            materials: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub width: OpeningSize,
    pub rows: Vec<Row>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RailConfig {
    pub enabled: bool,
    /// Front-to-back depth of each rail.
    pub width: f64,
}

impl Default for RailConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            width: 3.0,
        }
    }
}

/// Size limits above which horizontal rails are recommended.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RailThresholds {
    pub max_width: f64,
    pub max_height: f64,
    pub max_rows: usize,
}

impl Default for RailThresholds {
    fn default() -> Self {
        Self::for_unit(LengthUnit::Inches)
    }
}

impl RailThresholds {
    pub fn for_unit(unit: LengthUnit) -> Self {
        Self {
            max_width: crate::units::convert(36.0, LengthUnit::Inches, unit),
            max_height: crate::units::convert(48.0, LengthUnit::Inches, unit),
            max_rows: 5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tolerances {
    pub kerf: f64,
    pub dado_depth: f64,
    /// Distance from the bottom edge of a drawer side to its bottom groove.
    pub dado_offset: f64,
    /// Reveal between neighbouring overlay faces.
    pub overlay_gap: f64,
    /// Reveal around each inset face.
    pub inset_reveal: f64,
    pub vertical_clearance: f64,
    pub back_clearance: f64,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            kerf: 0.125,
            dado_depth: 0.25,
            dado_offset: 0.5,
            overlay_gap: 0.125,
            inset_reveal: 0.0625,
            vertical_clearance: 0.5,
            back_clearance: 0.5,
        }
    }
}

/// Modular bin grid used to size openings from unit counts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub width_cell_mm: f64,
    pub width_formula: GridFormula,
    pub height_cell_mm: f64,
    pub height_formula: GridFormula,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            width_cell_mm: 42.0,
            width_formula: GridFormula {
                scale: 1.0,
                offset_mm: 2.0,
            },
            height_cell_mm: 7.0,
            height_formula: GridFormula {
                scale: 1.0,
                offset_mm: 12.0,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MaxDimensions {
    pub width: f64,
    pub height: f64,
    pub depth: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChestConfig {
    pub unit: LengthUnit,
    pub columns: Vec<Column>,
    pub materials: Materials,
    pub advanced_materials: bool,
    pub drawer_style: DrawerStyle,
    pub slide: SlideSpec,
    pub rails: RailConfig,
    pub rail_thresholds: RailThresholds,
    pub tolerances: Tolerances,
    pub grid: GridConfig,
    pub max_dimensions: Option<MaxDimensions>,
}

impl Default for ChestConfig {
    fn default() -> Self {
        let column = || Column {
            width: OpeningSize::Units(7),
            rows: vec![
                Row::new(OpeningSize::Units(12)),
                Row::new(OpeningSize::Units(18)),
                Row::new(OpeningSize::Units(24)),
            ],
        };
        Self {
            unit: LengthUnit::Inches,
            columns: vec![column(), column()],
            materials: Materials::default(),
            advanced_materials: false,
            drawer_style: DrawerStyle::default(),
            slide: SlideSpec::default(),
            rails: RailConfig::default(),
            rail_thresholds: RailThresholds::default(),
            tolerances: Tolerances::default(),
            grid: GridConfig::default(),
            max_dimensions: None,
        }
    }
}

impl ChestConfig {
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let config: ChestConfig = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Structural checks only; range checks belong to whoever builds the
    /// configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.columns.is_empty() {
            return Err(ConfigError::Invalid("chest has no columns".to_string()));
        }
        for (ci, column) in self.columns.iter().enumerate() {
            if column.rows.is_empty() {
                return Err(ConfigError::Invalid(format!("column {} has no rows", ci + 1)));
            }
        }
        let t = &self.tolerances;
        let numbers = [
            self.slide.length,
            self.slide.clearance_per_side,
            self.slide.min_mounting_height,
            self.rails.width,
            t.kerf,
            t.dado_depth,
            t.dado_offset,
            t.overlay_gap,
            t.inset_reveal,
            t.vertical_clearance,
            t.back_clearance,
        ];
        if numbers.iter().any(|n| !n.is_finite()) {
            return Err(ConfigError::Invalid("non-finite length".to_string()));
        }
        Ok(())
    }

    pub fn column_width(&self, column: &Column) -> f64 {
        match column.width {
            OpeningSize::Units(n) => grid_units_to_length(
                n,
                self.grid.width_cell_mm,
                self.grid.width_formula,
                self.unit,
            ),
            OpeningSize::Length(len) => len,
        }
    }

    pub fn row_height(&self, row: &Row) -> f64 {
        match row.height {
            OpeningSize::Units(n) => grid_units_to_length(
                n,
                self.grid.height_cell_mm,
                self.grid.height_formula,
                self.unit,
            ),
            OpeningSize::Length(len) => len,
        }
    }

    /// Materials for one drawer, honouring per-row overrides in advanced mode.
    pub fn drawer_materials<'a>(&'a self, row: &'a Row) -> &'a DrawerMaterials {
        match (&row.materials, self.advanced_materials) {
            (Some(materials), true) => materials,
            _ => &self.materials.drawer,
        }
    }

    /// Thickness of the horizontal member between two rows, zero without rails.
    pub fn rail_thickness(&self) -> f64 {
        if self.rails.enabled {
            self.materials.carcass.rail.actual
        } else {
            0.0
        }
    }
}
