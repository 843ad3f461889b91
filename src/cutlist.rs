use serde::Serialize;

use crate::carcass::{carcass_pieces, compute_carcass};
use crate::config::{ChestConfig, MaterialThickness};
use crate::drawer::{compute_drawer_boxes, drawer_pieces};
use crate::types::{CutPiece, Rect};

/// All pieces cut from one material thickness.
#[derive(Debug, Clone, Serialize)]
pub struct ThicknessGroup {
    pub material: MaterialThickness,
    pub pieces: Vec<CutPiece>,
}

/// Merges pieces with the same thickness id and the same width and height, in
/// that order. Quantities are summed and distinct names joined.
pub fn merge_pieces(pieces: impl IntoIterator<Item = CutPiece>) -> Vec<CutPiece> {
    let mut merged: Vec<CutPiece> = Vec::new();
    for piece in pieces {
        let existing = merged.iter_mut().find(|m| {
            m.material.id == piece.material.id && m.rect().same_size(&piece.rect())
        });
        match existing {
            Some(m) => {
                m.quantity += piece.quantity;
                if !m.name.split(" / ").any(|n| n == piece.name) {
                    m.name = format!("{} / {}", m.name, piece.name);
                }
            }
            None => merged.push(piece),
        }
    }
    merged
}

/// Carcass and drawer pieces for the whole chest.
pub fn aggregate(config: &ChestConfig) -> Vec<CutPiece> {
    let carcass = compute_carcass(config);
    let drawers = compute_drawer_boxes(config);
    let all = carcass_pieces(config, &carcass)
        .into_iter()
        .chain(drawers.iter().flat_map(drawer_pieces));
    merge_pieces(all)
}

/// Buckets pieces by thickness id, in order of first appearance.
pub fn group_by_thickness(pieces: &[CutPiece]) -> Vec<ThicknessGroup> {
    let mut groups: Vec<ThicknessGroup> = Vec::new();
    for piece in pieces {
        match groups.iter_mut().find(|g| g.material.id == piece.material.id) {
            Some(g) => g.pieces.push(piece.clone()),
            None => groups.push(ThicknessGroup {
                material: piece.material.clone(),
                pieces: vec![piece.clone()],
            }),
        }
    }
    groups
}

pub fn total_area(pieces: &[CutPiece]) -> f64 {
    pieces
        .iter()
        .map(|p| Rect::new(p.width, p.height).area() * p.quantity as f64)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Column, OpeningSize, Row};

    #[test]
    fn test_merge_same_size_same_material() {
        let ply = MaterialThickness::plywood_3_4();
        let merged = merge_pieces(vec![
            CutPiece::new("Top", 10.0, 20.0, 1, &ply),
            CutPiece::new("Bottom", 10.0, 20.0, 1, &ply),
            CutPiece::new("Top", 10.0, 20.0, 1, &ply),
        ]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].quantity, 3);
        assert_eq!(merged[0].name, "Top / Bottom");
    }

    #[test]
    fn test_merge_is_orientation_sensitive() {
        let ply = MaterialThickness::plywood_3_4();
        let merged = merge_pieces(vec![
            CutPiece::new("A", 10.0, 20.0, 1, &ply),
            CutPiece::new("B", 20.0, 10.0, 1, &ply),
        ]);
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn test_different_thickness_never_merges() {
        let merged = merge_pieces(vec![
            CutPiece::new("A", 10.0, 20.0, 1, &MaterialThickness::plywood_3_4()),
            CutPiece::new("A", 10.0, 20.0, 1, &MaterialThickness::plywood_1_2()),
        ]);
        assert_eq!(merged.len(), 2);
        assert_eq!(group_by_thickness(&merged).len(), 2);
    }

    #[test]
    fn test_aggregate_counts_every_panel() {
        let config = ChestConfig {
            columns: vec![Column {
                width: OpeningSize::Length(14.0),
                rows: vec![Row::new(OpeningSize::Length(6.0)); 3],
            }],
            ..ChestConfig::default()
        };
        let pieces = aggregate(&config);
        let count = |name: &str| -> u32 {
            pieces
                .iter()
                .filter(|p| p.name.split(" / ").any(|n| n == name))
                .map(|p| p.quantity)
                .sum()
        };
        assert_eq!(count("Top"), 2);
        assert_eq!(count("Side"), 2);
        assert_eq!(count("Back"), 1);
        assert_eq!(count("Drawer side"), 6);
        assert_eq!(count("Drawer front"), 6);
        assert_eq!(count("Drawer bottom"), 3);
        assert_eq!(count("Drawer face"), 3);

        // identical drawers collapse into single entries
        let sides: Vec<_> = pieces.iter().filter(|p| p.name == "Drawer side").collect();
        assert_eq!(sides.len(), 1);
        assert_eq!(sides[0].quantity, 6);
    }

    #[test]
    fn test_groups_keep_first_appearance_order() {
        let config = ChestConfig::default();
        let groups = group_by_thickness(&aggregate(&config));
        let ids: Vec<&str> = groups.iter().map(|g| g.material.id.as_str()).collect();
        assert_eq!(ids, vec!["ply-3/4", "mdf-1/4", "ply-1/2"]);
        let total: f64 = groups.iter().map(|g| total_area(&g.pieces)).sum();
        assert!((total - total_area(&aggregate(&config))).abs() < 1e-6);
    }
}
