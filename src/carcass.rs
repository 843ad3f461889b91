//! Carcass sizing: the outer shell every column shares.

use serde::Serialize;

use crate::config::ChestConfig;
use crate::types::{CutPiece, EPS};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Dimension {
    Width,
    Height,
    Depth,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConstraintViolation {
    pub dimension: Dimension,
    pub actual: f64,
    pub max: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum CarcassWarning {
    /// A column shorter than the carcass leaves unused space above it.
    DeadSpace { column: usize, height: f64 },
    NegativeDimension { dimension: String, value: f64 },
}

#[derive(Debug, Clone, Serialize)]
pub struct CarcassDimensions {
    pub outer_width: f64,
    pub outer_height: f64,
    pub outer_depth: f64,
    pub inner_width: f64,
    pub inner_height: f64,
    pub inner_depth: f64,
    pub column_widths: Vec<f64>,
    pub column_inner_heights: Vec<f64>,
    pub violations: Vec<ConstraintViolation>,
    pub warnings: Vec<CarcassWarning>,
    pub rails_recommended: bool,
}

impl CarcassDimensions {
    /// Height of the sides and dividers, which sit between top and bottom.
    pub fn vertical_panel_height(&self, config: &ChestConfig) -> f64 {
        self.outer_height - 2.0 * config.materials.carcass.top_bottom.actual
    }
}

pub fn compute_carcass(config: &ChestConfig) -> CarcassDimensions {
    let m = &config.materials.carcass;
    let side = m.side.actual;
    let top_bottom = m.top_bottom.actual;
    let mut warnings = Vec::new();

    let column_widths: Vec<f64> = config
        .columns
        .iter()
        .map(|c| config.column_width(c))
        .collect();

    let rail = m.rail.actual;
    let column_inner_heights: Vec<f64> = config
        .columns
        .iter()
        .enumerate()
        .map(|(ci, column)| {
            let mut height = 0.0;
            for (ri, row) in column.rows.iter().enumerate() {
                let h = config.row_height(row);
                if h <= 0.0 {
                    warnings.push(CarcassWarning::NegativeDimension {
                        dimension: format!("column {} row {} opening height", ci + 1, ri + 1),
                        value: h,
                    });
                }
                height += h;
            }
            if config.rails.enabled && column.rows.len() > 1 {
                height += (column.rows.len() - 1) as f64 * rail;
            }
            height
        })
        .collect();

    for (ci, &w) in column_widths.iter().enumerate() {
        if w <= 0.0 {
            warnings.push(CarcassWarning::NegativeDimension {
                dimension: format!("column {} opening width", ci + 1),
                value: w,
            });
        }
    }

    let dividers = config.columns.len().saturating_sub(1) as f64;
    let outer_width =
        2.0 * side + column_widths.iter().sum::<f64>() + dividers * m.divider.actual;
    let inner_height = column_inner_heights
        .iter()
        .cloned()
        .reduce(f64::max)
        .unwrap_or(0.0);
    let outer_height = 2.0 * top_bottom + inner_height;
    let inner_depth = config.slide.length + config.tolerances.back_clearance;
    let outer_depth = inner_depth + m.back.actual;

    for (ci, &h) in column_inner_heights.iter().enumerate() {
        if h + EPS < inner_height {
            warnings.push(CarcassWarning::DeadSpace {
                column: ci,
                height: inner_height - h,
            });
        }
    }

    let mut violations = Vec::new();
    if let Some(max) = config.max_dimensions {
        for (dimension, actual, limit) in [
            (Dimension::Width, outer_width, max.width),
            (Dimension::Height, outer_height, max.height),
            (Dimension::Depth, outer_depth, max.depth),
        ] {
            if actual > limit {
                violations.push(ConstraintViolation {
                    dimension,
                    actual,
                    max: limit,
                });
            }
        }
    }

    let t = &config.rail_thresholds;
    let rails_recommended = outer_width > t.max_width
        || outer_height > t.max_height
        || config.columns.iter().any(|c| c.rows.len() > t.max_rows);

    CarcassDimensions {
        outer_width,
        outer_height,
        outer_depth,
        inner_width: outer_width - 2.0 * side,
        inner_height,
        inner_depth,
        column_widths,
        column_inner_heights,
        violations,
        warnings,
        rails_recommended,
    }
}

pub fn carcass_pieces(config: &ChestConfig, carcass: &CarcassDimensions) -> Vec<CutPiece> {
    let m = &config.materials.carcass;
    let panel_height = carcass.vertical_panel_height(config);
    let mut pieces = vec![
        CutPiece::new("Top", carcass.inner_width, carcass.inner_depth, 1, &m.top_bottom),
        CutPiece::new("Bottom", carcass.inner_width, carcass.inner_depth, 1, &m.top_bottom),
        CutPiece::new("Side", carcass.inner_depth, panel_height, 2, &m.side),
    ];

    let dividers = config.columns.len().saturating_sub(1) as u32;
    if dividers > 0 {
        pieces.push(CutPiece::new(
            "Divider",
            carcass.inner_depth,
            panel_height,
            dividers,
            &m.divider,
        ));
    }

    pieces.push(CutPiece::new(
        "Back",
        carcass.outer_width,
        carcass.outer_height,
        1,
        &m.back,
    ));

    if config.rails.enabled {
        for (ci, column) in config.columns.iter().enumerate() {
            let rails = column.rows.len().saturating_sub(1) as u32;
            if rails > 0 {
                pieces.push(CutPiece::new(
                    format!("Rail (column {})", ci + 1),
                    carcass.column_widths[ci],
                    config.rails.width,
                    rails,
                    &m.rail,
                ));
            }
        }
    }

    pieces
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Column, MaxDimensions, OpeningSize, Row};

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn single_column() -> ChestConfig {
        ChestConfig {
            columns: vec![Column {
                width: OpeningSize::Length(14.0),
                rows: vec![Row::new(OpeningSize::Length(6.0)); 3],
            }],
            ..ChestConfig::default()
        }
    }

    #[test]
    fn test_single_column_scenario() {
        let c = compute_carcass(&single_column());
        assert!(approx(c.outer_width, 15.4375));
        assert!(approx(c.outer_depth, 18.75));
        assert!(approx(c.inner_depth, 18.5));
        assert!(approx(c.inner_height, 18.0));
        assert!(approx(c.outer_height, 18.0 + 2.0 * 0.71875));
        assert!(c.violations.is_empty());
        assert!(c.warnings.is_empty());
        assert!(!c.rails_recommended);
    }

    #[test]
    fn test_dividers_and_rails_in_width_and_height() {
        let mut config = single_column();
        config.columns.push(Column {
            width: OpeningSize::Length(10.0),
            rows: vec![Row::new(OpeningSize::Length(9.0)); 2],
        });
        config.rails.enabled = true;
        let c = compute_carcass(&config);
        assert!(approx(c.outer_width, 2.0 * 0.71875 + 24.0 + 0.71875));
        // 3 x 6 + 2 rails vs 2 x 9 + 1 rail
        assert!(approx(c.column_inner_heights[0], 18.0 + 2.0 * 0.71875));
        assert!(approx(c.column_inner_heights[1], 18.0 + 0.71875));
        assert!(approx(c.inner_height, c.column_inner_heights[0]));
        assert_eq!(
            c.warnings,
            vec![CarcassWarning::DeadSpace {
                column: 1,
                height: c.column_inner_heights[0] - c.column_inner_heights[1],
            }]
        );
    }

    #[test]
    fn test_negative_inner_height_is_not_clamped() {
        let mut config = single_column();
        config.columns[0].rows = vec![Row::new(OpeningSize::Length(-2.0))];
        let c = compute_carcass(&config);
        assert!(approx(c.inner_height, -2.0));
        assert!(approx(c.outer_height, -2.0 + 2.0 * 0.71875));
        assert!(c.warnings.iter().all(|w| !matches!(w, CarcassWarning::DeadSpace { .. })));
    }

    #[test]
    fn test_constraint_equality_is_not_violation() {
        let mut config = single_column();
        let c = compute_carcass(&config);
        config.max_dimensions = Some(MaxDimensions {
            width: c.outer_width,
            height: c.outer_height,
            depth: c.outer_depth,
        });
        assert!(compute_carcass(&config).violations.is_empty());

        config.max_dimensions = Some(MaxDimensions {
            width: c.outer_width - 1e-6,
            height: c.outer_height,
            depth: c.outer_depth - 1.0,
        });
        let v = compute_carcass(&config).violations;
        assert_eq!(v.len(), 2);
        assert_eq!(v[0].dimension, Dimension::Width);
        assert_eq!(v[1].dimension, Dimension::Depth);
        assert!(approx(v[1].max, c.outer_depth - 1.0));
    }

    #[test]
    fn test_rail_recommendation() {
        let mut config = single_column();
        config.columns[0].rows = vec![Row::new(OpeningSize::Length(4.0)); 6];
        assert!(compute_carcass(&config).rails_recommended);

        let mut wide = single_column();
        wide.columns[0].width = OpeningSize::Length(36.0);
        assert!(compute_carcass(&wide).rails_recommended);
    }

    #[test]
    fn test_negative_opening_is_flagged_not_clamped() {
        let mut config = single_column();
        config.columns[0].width = OpeningSize::Length(-2.0);
        let c = compute_carcass(&config);
        assert!(approx(c.outer_width, -2.0 + 2.0 * 0.71875));
        assert!(matches!(
            c.warnings[0],
            CarcassWarning::NegativeDimension { value, .. } if value == -2.0
        ));
    }

    #[test]
    fn test_piece_list() {
        let mut config = single_column();
        config.columns.push(config.columns[0].clone());
        config.columns.push(Column {
            width: OpeningSize::Length(8.0),
            rows: vec![Row::new(OpeningSize::Length(18.0))],
        });
        config.rails.enabled = true;
        let c = compute_carcass(&config);
        let pieces = carcass_pieces(&config, &c);
        let names: Vec<&str> = pieces.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["Top", "Bottom", "Side", "Divider", "Back", "Rail (column 1)", "Rail (column 2)"]
        );
        let divider = &pieces[3];
        assert_eq!(divider.quantity, 2);
        assert!(approx(divider.height, c.inner_height));
        let rail = &pieces[5];
        assert_eq!(rail.quantity, 2);
        assert!(approx(rail.width, 14.0));
        assert!(approx(rail.height, config.rails.width));
        let back = &pieces[4];
        assert!(approx(back.width, c.outer_width));
        assert_eq!(back.material.id, "mdf-1/4");
    }

    #[test]
    fn test_no_rails_when_disabled() {
        let config = single_column();
        let pieces = carcass_pieces(&config, &compute_carcass(&config));
        assert!(pieces.iter().all(|p| !p.name.starts_with("Rail")));
        assert!(pieces.iter().all(|p| p.name != "Divider"));
    }
}
