//! Drawer box and face sizing.
//!
//! Each construction method trades box height against how the bottom is
//! captured. The three strategies are plain functions selected by
//! [`ConstructionMethod`]; they share one set of box inputs.

use serde::Serialize;

use crate::config::{ChestConfig, Column, ConstructionMethod, DrawerMaterials, DrawerStyle, Row};
use crate::types::{CutPiece, EPS};
use crate::units::round_up_to_eighth;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum DrawerWarning {
    /// Opening is shorter than the slide's minimum mounting height.
    SlideHeight { opening_height: f64, minimum: f64 },
    /// Box is deeper than the slide; a longer slide is needed.
    SlideLength { box_depth: f64, slide_length: f64 },
    NegativeDimension { dimension: &'static str, value: f64 },
}

/// Where a drawer sits in the chest grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DrawerPosition {
    pub column: usize,
    pub row: usize,
    pub columns: usize,
    pub rows: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct DrawerBoxDimensions {
    pub position: DrawerPosition,
    pub construction: ConstructionMethod,
    pub opening_width: f64,
    pub opening_height: f64,
    pub box_outer_width: f64,
    pub box_outer_height: f64,
    pub box_outer_depth: f64,
    pub side_height: f64,
    pub front_back_length: f64,
    pub front_back_height: f64,
    pub bottom_width: f64,
    pub bottom_depth: f64,
    pub interior_width: f64,
    pub interior_height: f64,
    pub interior_depth: f64,
    pub face_width: f64,
    pub face_height: f64,
    pub materials: DrawerMaterials,
    pub warnings: Vec<DrawerWarning>,
}

#[derive(Debug, Clone, Copy)]
struct BoxInputs {
    opening_height: f64,
    outer_width: f64,
    outer_depth: f64,
    front_back_length: f64,
    side_thickness: f64,
    front_back_thickness: f64,
    bottom_thickness: f64,
    vertical_clearance: f64,
    groove_depth: f64,
    groove_offset: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct BoxSizing {
    side_height: f64,
    outer_height: f64,
    bottom_width: f64,
    bottom_depth: f64,
    interior_height: f64,
}

/// Bottom rides in grooves cut into all four walls.
fn size_dado(i: &BoxInputs) -> BoxSizing {
    let side_height = i.opening_height - i.vertical_clearance;
    BoxSizing {
        side_height,
        outer_height: side_height,
        bottom_width: i.front_back_length + 2.0 * i.groove_depth,
        bottom_depth: i.outer_depth - 2.0 * i.front_back_thickness + 2.0 * i.groove_depth,
        interior_height: side_height - i.groove_offset - i.bottom_thickness,
    }
}

/// Bottom fits between the walls and is fastened through the sides.
fn size_butt_through_sides(i: &BoxInputs) -> BoxSizing {
    let side_height = i.opening_height - i.vertical_clearance;
    BoxSizing {
        side_height,
        outer_height: side_height,
        bottom_width: i.outer_width - 2.0 * i.side_thickness,
        bottom_depth: i.outer_depth - 2.0 * i.front_back_thickness,
        interior_height: side_height - i.bottom_thickness,
    }
}

/// Walls stand on a full-size bottom fastened up into them.
fn size_butt_through_bottom(i: &BoxInputs) -> BoxSizing {
    let side_height = i.opening_height - i.vertical_clearance - i.bottom_thickness;
    BoxSizing {
        side_height,
        outer_height: side_height + i.bottom_thickness,
        bottom_width: i.outer_width,
        bottom_depth: i.outer_depth,
        interior_height: side_height,
    }
}

fn size_box(method: ConstructionMethod, inputs: &BoxInputs) -> BoxSizing {
    match method {
        ConstructionMethod::Dado => size_dado(inputs),
        ConstructionMethod::ButtThroughSides => size_butt_through_sides(inputs),
        ConstructionMethod::ButtThroughBottom => size_butt_through_bottom(inputs),
    }
}

/// Face extent along one axis. `outer` is the carcass panel at the chest edge
/// on that axis, `inner` the member between neighbouring openings.
#[allow(clippy::too_many_arguments)]
fn face_extent(
    style: DrawerStyle,
    opening: f64,
    index: usize,
    count: usize,
    outer: f64,
    inner: f64,
    overlay_gap: f64,
    inset_reveal: f64,
) -> f64 {
    let extent = match style {
        DrawerStyle::Inset => opening - 2.0 * inset_reveal,
        DrawerStyle::Overlay if count <= 1 => opening + 2.0 * outer - overlay_gap,
        DrawerStyle::Overlay if index == 0 || index + 1 == count => {
            opening + outer + inner / 2.0 - overlay_gap / 2.0
        }
        DrawerStyle::Overlay => opening + inner - overlay_gap,
    };
    round_up_to_eighth(extent)
}

pub fn compute_drawer_box(
    row: &Row,
    column: &Column,
    position: DrawerPosition,
    config: &ChestConfig,
) -> DrawerBoxDimensions {
    let t = &config.tolerances;
    let carcass = &config.materials.carcass;
    let materials = config.drawer_materials(row).clone();
    let side_thickness = materials.side.actual;
    let front_back_thickness = materials.front_back.actual;

    let opening_width = config.column_width(column);
    let opening_height = config.row_height(row);
    let outer_width = opening_width - 2.0 * config.slide.clearance_per_side;
    let outer_depth = config.slide.box_depth.unwrap_or(config.slide.length);
    let front_back_length = outer_width - 2.0 * side_thickness;

    let inputs = BoxInputs {
        opening_height,
        outer_width,
        outer_depth,
        front_back_length,
        side_thickness,
        front_back_thickness,
        bottom_thickness: materials.bottom.actual,
        vertical_clearance: t.vertical_clearance,
        groove_depth: t.dado_depth,
        groove_offset: t.dado_offset,
    };
    let sizing = size_box(row.construction, &inputs);

    let face_width = face_extent(
        config.drawer_style,
        opening_width,
        position.column,
        position.columns,
        carcass.side.actual,
        carcass.divider.actual,
        t.overlay_gap,
        t.inset_reveal,
    );
    let face_height = face_extent(
        config.drawer_style,
        opening_height,
        position.row,
        position.rows,
        carcass.top_bottom.actual,
        config.rail_thickness(),
        t.overlay_gap,
        t.inset_reveal,
    );

    let mut dims = DrawerBoxDimensions {
        position,
        construction: row.construction,
        opening_width,
        opening_height,
        box_outer_width: outer_width,
        box_outer_height: sizing.outer_height,
        box_outer_depth: outer_depth,
        side_height: sizing.side_height,
        front_back_length,
        front_back_height: sizing.side_height,
        bottom_width: round_up_to_eighth(sizing.bottom_width),
        bottom_depth: round_up_to_eighth(sizing.bottom_depth),
        interior_width: outer_width - 2.0 * side_thickness,
        interior_height: sizing.interior_height,
        interior_depth: outer_depth - 2.0 * front_back_thickness,
        face_width,
        face_height,
        materials,
        warnings: Vec::new(),
    };
    dims.warnings = drawer_warnings(&dims, config);
    dims
}

fn drawer_warnings(d: &DrawerBoxDimensions, config: &ChestConfig) -> Vec<DrawerWarning> {
    let mut warnings = Vec::new();
    if d.opening_height < config.slide.min_mounting_height {
        warnings.push(DrawerWarning::SlideHeight {
            opening_height: d.opening_height,
            minimum: config.slide.min_mounting_height,
        });
    }
    if d.box_outer_depth > config.slide.length + EPS {
        warnings.push(DrawerWarning::SlideLength {
            box_depth: d.box_outer_depth,
            slide_length: config.slide.length,
        });
    }
    let checked = [
        ("box outer width", d.box_outer_width),
        ("box outer height", d.box_outer_height),
        ("box outer depth", d.box_outer_depth),
        ("side height", d.side_height),
        ("bottom width", d.bottom_width),
        ("bottom depth", d.bottom_depth),
        ("interior width", d.interior_width),
        ("interior height", d.interior_height),
        ("interior depth", d.interior_depth),
    ];
    for (dimension, value) in checked {
        if value <= 0.0 {
            warnings.push(DrawerWarning::NegativeDimension { dimension, value });
        }
    }
    warnings
}

/// Every drawer in the chest, column by column.
pub fn compute_drawer_boxes(config: &ChestConfig) -> Vec<DrawerBoxDimensions> {
    let columns = config.columns.len();
    config
        .columns
        .iter()
        .enumerate()
        .flat_map(|(ci, column)| {
            let rows = column.rows.len();
            column.rows.iter().enumerate().map(move |(ri, row)| {
                let position = DrawerPosition {
                    column: ci,
                    row: ri,
                    columns,
                    rows,
                };
                compute_drawer_box(row, column, position, config)
            })
        })
        .collect()
}

pub fn drawer_pieces(d: &DrawerBoxDimensions) -> Vec<CutPiece> {
    let m = &d.materials;
    vec![
        CutPiece::new("Drawer side", d.box_outer_depth, d.side_height, 2, &m.side),
        CutPiece::new("Drawer front", d.front_back_length, d.front_back_height, 1, &m.front_back),
        CutPiece::new("Drawer back", d.front_back_length, d.front_back_height, 1, &m.front_back),
        CutPiece::new("Drawer bottom", d.bottom_width, d.bottom_depth, 1, &m.bottom),
        CutPiece::new("Drawer face", d.face_width, d.face_height, 1, &m.face),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{OpeningSize, Row};

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn chest(columns: usize, rows: usize) -> ChestConfig {
        ChestConfig {
            columns: vec![
                Column {
                    width: OpeningSize::Length(14.0),
                    rows: vec![Row::new(OpeningSize::Length(6.0)); rows],
                };
                columns
            ],
            ..ChestConfig::default()
        }
    }

    fn first_box(config: &ChestConfig, method: ConstructionMethod) -> DrawerBoxDimensions {
        let mut row = config.columns[0].rows[0].clone();
        row.construction = method;
        let position = DrawerPosition {
            column: 0,
            row: 0,
            columns: config.columns.len(),
            rows: config.columns[0].rows.len(),
        };
        compute_drawer_box(&row, &config.columns[0], position, config)
    }

    #[test]
    fn test_dado_box() {
        let config = chest(1, 3);
        let d = first_box(&config, ConstructionMethod::Dado);
        // 1/2" ply at 15/32, 1/4" MDF bottom
        assert!(approx(d.box_outer_width, 13.0));
        assert!(approx(d.box_outer_depth, 18.0));
        assert!(approx(d.side_height, 5.5));
        assert!(approx(d.box_outer_height, 5.5));
        assert!(approx(d.front_back_length, 13.0 - 15.0 / 16.0));
        // 12.0625 + 0.5 = 12.5625 -> 12.625
        assert!(approx(d.bottom_width, 12.625));
        // 18 - 15/16 + 0.5 = 17.5625 -> 17.625
        assert!(approx(d.bottom_depth, 17.625));
        assert!(approx(d.interior_height, 5.5 - 0.5 - 0.25));
        assert!(d.warnings.is_empty());
    }

    #[test]
    fn test_butt_through_sides_box() {
        let config = chest(1, 3);
        let d = first_box(&config, ConstructionMethod::ButtThroughSides);
        assert!(approx(d.side_height, 5.5));
        assert!(approx(d.box_outer_height, 5.5));
        // 13 - 2 * 15/32 = 12.0625 -> 12.125
        assert!(approx(d.bottom_width, 12.125));
        // 18 - 2 * 15/32 = 17.0625 -> 17.125
        assert!(approx(d.bottom_depth, 17.125));
        assert!(approx(d.interior_height, 5.5 - 0.25));
        assert!(approx(d.interior_depth, 18.0 - 15.0 / 16.0));
        assert!(d.warnings.is_empty());
    }

    #[test]
    fn test_butt_through_bottom_box() {
        let config = chest(1, 3);
        let d = first_box(&config, ConstructionMethod::ButtThroughBottom);
        assert!(approx(d.side_height, 5.25));
        assert!(approx(d.box_outer_height, 5.5));
        assert!(approx(d.bottom_width, 13.0));
        assert!(approx(d.bottom_depth, 18.0));
        assert!(approx(d.interior_height, 5.25));
    }

    #[test]
    fn test_interior_ordering_across_methods() {
        let config = chest(2, 3);
        let dado = first_box(&config, ConstructionMethod::Dado);
        let sides = first_box(&config, ConstructionMethod::ButtThroughSides);
        let bottom = first_box(&config, ConstructionMethod::ButtThroughBottom);
        assert!(approx(dado.interior_width, sides.interior_width));
        assert!(approx(sides.interior_width, bottom.interior_width));
        assert!(bottom.interior_height >= sides.interior_height);
        assert!(sides.interior_height >= dado.interior_height);
        assert!(approx(sides.bottom_width, 12.125));
        assert!(approx(sides.bottom_width, round_up_to_eighth(sides.interior_width)));
    }

    #[test]
    fn test_inset_faces() {
        let mut config = chest(2, 3);
        config.drawer_style = DrawerStyle::Inset;
        let d = first_box(&config, ConstructionMethod::Dado);
        // 14 - 0.125 and 6 - 0.125
        assert!(approx(d.face_width, 13.875));
        assert!(approx(d.face_height, 5.875));
    }

    #[test]
    fn test_overlay_faces_by_position() {
        let face = |index, count| {
            face_extent(DrawerStyle::Overlay, 14.0, index, count, 0.75, 0.5, 0.125, 0.0625)
        };
        // single: 14 + 1.5 - 0.125
        assert!(approx(face(0, 1), 15.375));
        // edge: 14 + 0.75 + 0.25 - 0.0625 = 14.9375 -> 15
        assert!(approx(face(0, 3), 15.0));
        assert!(approx(face(2, 3), 15.0));
        // interior: 14 + 0.5 - 0.125
        assert!(approx(face(1, 3), 14.375));
    }

    fn row_box(config: &ChestConfig, row: usize) -> DrawerBoxDimensions {
        let column = &config.columns[0];
        let position = DrawerPosition {
            column: 0,
            row,
            columns: config.columns.len(),
            rows: column.rows.len(),
        };
        compute_drawer_box(&column.rows[row], column, position, config)
    }

    #[test]
    fn test_overlay_face_heights_with_rails() {
        let mut config = chest(1, 3);
        config.rails.enabled = true;
        // edge: 6 + 23/32 + 23/64 - 1/16 = 7.015625 -> 7.125
        assert!(approx(row_box(&config, 0).face_height, 7.125));
        // interior: 6 + 23/32 - 1/8 = 6.59375 -> 6.625
        assert!(approx(row_box(&config, 1).face_height, 6.625));
        assert!(approx(row_box(&config, 2).face_height, 7.125));
    }

    #[test]
    fn test_overlay_face_heights_without_rails() {
        let config = chest(1, 3);
        assert_eq!(config.rail_thickness(), 0.0);
        // edge: 6 + 23/32 - 1/16 = 6.65625 -> 6.75
        assert!(approx(row_box(&config, 0).face_height, 6.75));
        // interior: 6 - 1/8
        assert!(approx(row_box(&config, 1).face_height, 5.875));
        assert!(approx(row_box(&config, 2).face_height, 6.75));
    }

    #[test]
    fn test_overlay_face_rounds_up_odd_thickness() {
        let config = chest(1, 1);
        let d = first_box(&config, ConstructionMethod::Dado);
        // 14 + 2 * 23/32 - 1/8 = 15.3125 -> 15.375
        assert!(approx(d.face_width, 15.375));
        // 6 + 2 * 23/32 - 1/8 = 7.3125 -> 7.375
        assert!(approx(d.face_height, 7.375));
    }

    #[test]
    fn test_slide_warnings() {
        let mut config = chest(1, 1);
        config.columns[0].rows[0].height = OpeningSize::Length(1.5);
        config.slide.box_depth = Some(20.0);
        let d = first_box(&config, ConstructionMethod::Dado);
        assert!(d.warnings.contains(&DrawerWarning::SlideHeight {
            opening_height: 1.5,
            minimum: 1.75,
        }));
        assert!(d.warnings.contains(&DrawerWarning::SlideLength {
            box_depth: 20.0,
            slide_length: 18.0,
        }));
    }

    #[test]
    fn test_negative_dimension_warning() {
        let mut config = chest(1, 1);
        config.columns[0].rows[0].height = OpeningSize::Length(0.75);
        let d = first_box(&config, ConstructionMethod::Dado);
        assert!(d.warnings.iter().any(|w| matches!(
            w,
            DrawerWarning::NegativeDimension { dimension: "interior height", .. }
        )));
    }

    #[test]
    fn test_compute_all_boxes_and_pieces() {
        let config = chest(2, 3);
        let boxes = compute_drawer_boxes(&config);
        assert_eq!(boxes.len(), 6);
        assert_eq!(boxes[4].position.column, 1);
        assert_eq!(boxes[4].position.row, 1);

        let pieces = drawer_pieces(&boxes[0]);
        assert_eq!(pieces.len(), 5);
        assert_eq!(pieces[0].quantity, 2);
        assert!(approx(pieces[0].width, boxes[0].box_outer_depth));
        assert_eq!(pieces[3].material.id, "mdf-1/4");
        assert_eq!(pieces[4].material.id, "ply-3/4");
    }
}
