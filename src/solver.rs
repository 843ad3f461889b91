use crate::guillotine::GuillotineBin;
use crate::types::{
    CutPiece, InvalidPiece, OversizedPiece, PackResult, Rect, SheetLayout, StockSheet,
};

/// Packs cut pieces onto copies of one stock sheet, one sheet at a time.
pub struct Solver {
    sheet: StockSheet,
    kerf: f64,
    allow_rotate: bool,
    pieces: Vec<CutPiece>,
}

impl Solver {
    pub fn new(sheet: StockSheet, kerf: f64, allow_rotate: bool, pieces: Vec<CutPiece>) -> Self {
        Self {
            sheet,
            kerf,
            allow_rotate,
            pieces,
        }
    }

    pub fn solve(&self) -> PackResult {
        let mut result = PackResult::default();
        let mut remaining = self.expand_pieces(&mut result.invalid);

        while !remaining.is_empty() {
            let mut bin = GuillotineBin::new(self.sheet.rect(), self.kerf);
            let mut deferred = Vec::new();

            for (rect, name) in remaining {
                match bin.find_best(rect, self.allow_rotate) {
                    Some(scored) => {
                        bin.place(scored, rect, &name);
                    }
                    None => deferred.push((rect, name)),
                }
            }

            if bin.placements.is_empty() {
                for (rect, name) in deferred {
                    tracing::warn!(piece = %name, size = %rect, sheet = %self.sheet.name, "piece does not fit stock sheet");
                    result.oversized.push(OversizedPiece { name, rect });
                }
                break;
            }

            tracing::debug!(
                sheet = result.layouts.len() + 1,
                placed = bin.placements.len(),
                deferred = deferred.len(),
                "sheet packed"
            );
            result.layouts.push(self.layout(bin));
            remaining = deferred;
        }

        result
    }

    /// One instance per physical piece, largest area first. Pieces with a
    /// zero or negative side go to `invalid` instead.
    fn expand_pieces(&self, invalid: &mut Vec<InvalidPiece>) -> Vec<(Rect, String)> {
        let mut instances = Vec::new();
        for p in &self.pieces {
            if !p.rect().is_valid() {
                tracing::warn!(piece = %p.name, size = %p.rect(), "piece has no positive area");
                invalid.extend((0..p.quantity).map(|_| InvalidPiece {
                    name: p.name.clone(),
                    rect: p.rect(),
                }));
                continue;
            }
            for _ in 0..p.quantity {
                instances.push((p.rect(), p.name.clone()));
            }
        }
        instances.sort_by(|a, b| b.0.area().total_cmp(&a.0.area()));
        instances
    }

    fn layout(&self, bin: GuillotineBin) -> SheetLayout {
        let total_area = bin.stock().area();
        let used_area = bin.used_area();
        let free_area = bin.free_area();
        let waste_percent = if total_area > 0.0 {
            (total_area - used_area) / total_area * 100.0
        } else {
            0.0
        };
        SheetLayout {
            sheet: self.sheet.clone(),
            placements: bin.placements,
            used_area,
            total_area,
            free_area,
            waste_percent,
        }
    }
}

pub fn pack(pieces: &[CutPiece], sheet: &StockSheet, kerf: f64, allow_rotate: bool) -> PackResult {
    Solver::new(sheet.clone(), kerf, allow_rotate, pieces.to_vec()).solve()
}
