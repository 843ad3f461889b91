//! Whole-chest cutlist optimisation: aggregate, bucket by thickness, pack
//! each bucket onto its matching stock sheet.

use serde::Serialize;

use crate::config::{ChestConfig, MaterialThickness};
use crate::cutlist::{aggregate, group_by_thickness};
use crate::solver::pack;
use crate::types::{CutPiece, PackResult, StockSheet};

#[derive(Debug, Clone, Serialize)]
pub struct ThicknessPlan {
    pub material: MaterialThickness,
    pub pieces: Vec<CutPiece>,
    /// `None` when no stock sheet was supplied for this thickness.
    pub sheet: Option<StockSheet>,
    pub result: PackResult,
}

#[derive(Debug, Clone, Serialize)]
pub struct CutlistPlan {
    pub groups: Vec<ThicknessPlan>,
}

impl CutlistPlan {
    pub fn sheet_count(&self) -> usize {
        self.groups.iter().map(|g| g.result.sheet_count()).sum()
    }

    pub fn total_waste_percent(&self) -> f64 {
        let layouts = self.groups.iter().flat_map(|g| &g.result.layouts);
        let (total, used) = layouts.fold((0.0, 0.0), |(t, u), l| (t + l.total_area, u + l.used_area));
        if total <= 0.0 {
            return 0.0;
        }
        (total - used) / total * 100.0
    }

    pub fn missing_stock(&self) -> Vec<&MaterialThickness> {
        self.groups
            .iter()
            .filter(|g| g.sheet.is_none())
            .map(|g| &g.material)
            .collect()
    }

    pub fn oversized_count(&self) -> usize {
        self.groups.iter().map(|g| g.result.oversized.len()).sum()
    }

    pub fn invalid_count(&self) -> usize {
        self.groups.iter().map(|g| g.result.invalid.len()).sum()
    }
}

/// A standard 4x8 sheet for every thickness the chest uses.
pub fn default_sheets(config: &ChestConfig) -> Vec<StockSheet> {
    group_by_thickness(&aggregate(config))
        .iter()
        .map(|g| StockSheet::standard(&g.material, config.unit))
        .collect()
}

pub fn optimize(config: &ChestConfig, sheets: &[StockSheet], allow_rotate: bool) -> CutlistPlan {
    let pieces = aggregate(config);
    let groups = group_by_thickness(&pieces)
        .into_iter()
        .map(|group| {
            let sheet = sheets
                .iter()
                .find(|s| s.material.id == group.material.id)
                .cloned();
            let result = match &sheet {
                Some(sheet) => pack(&group.pieces, sheet, config.tolerances.kerf, allow_rotate),
                None => {
                    tracing::warn!(material = %group.material.id, "no stock sheet for thickness");
                    PackResult::default()
                }
            };
            ThicknessPlan {
                material: group.material,
                pieces: group.pieces,
                sheet,
                result,
            }
        })
        .collect();

    CutlistPlan { groups }
}
