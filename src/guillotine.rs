use crate::types::{EPS, Placement, Rect};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FreeRect {
    pub x: f64,
    pub y: f64,
    pub rect: Rect,
}

/// One stock sheet being filled with guillotine cuts.
#[derive(Debug, Clone)]
pub struct GuillotineBin {
    stock: Rect,
    kerf: f64,
    pub free_rects: Vec<FreeRect>,
    pub placements: Vec<Placement>,
}

#[derive(Debug, Clone, Copy)]
pub struct ScoredPlacement {
    pub free_idx: usize,
    pub rotated: bool,
    /// Free-rectangle area left over after placing the piece.
    pub leftover: f64,
}

impl GuillotineBin {
    pub fn new(stock: Rect, kerf: f64) -> Self {
        Self {
            stock,
            kerf,
            free_rects: vec![FreeRect {
                x: 0.0,
                y: 0.0,
                rect: stock,
            }],
            placements: Vec::new(),
        }
    }

    pub fn stock(&self) -> Rect {
        self.stock
    }

    pub fn used_area(&self) -> f64 {
        self.placements.iter().map(|p| p.rect.area()).sum()
    }

    pub fn free_area(&self) -> f64 {
        self.free_rects.iter().map(|f| f.rect.area()).sum()
    }

    /// Best-area fit over every free rectangle. Ties keep the first candidate
    /// seen: free-list order, upright before rotated.
    pub fn find_best(&self, piece: Rect, allow_rotate: bool) -> Option<ScoredPlacement> {
        let mut best: Option<ScoredPlacement> = None;

        for (idx, free) in self.free_rects.iter().enumerate() {
            let orientations: &[bool] = if allow_rotate { &[false, true] } else { &[false] };
            for &rotated in orientations {
                let candidate = if rotated { piece.rotated() } else { piece };
                if !candidate.fits_in(&free.rect) {
                    continue;
                }
                let leftover = free.rect.area() - candidate.area();
                if best.is_none_or(|b| leftover + EPS < b.leftover) {
                    best = Some(ScoredPlacement {
                        free_idx: idx,
                        rotated,
                        leftover,
                    });
                }
            }
        }

        best
    }

    pub fn place(&mut self, scored: ScoredPlacement, piece: Rect, name: &str) -> Placement {
        let free = self.free_rects[scored.free_idx];
        let placed = if scored.rotated {
            piece.rotated()
        } else {
            piece
        };

        let placement = Placement {
            name: name.to_string(),
            rect: placed,
            x: free.x,
            y: free.y,
            rotated: scored.rotated,
        };

        let remainders = self.split(free, placed);
        self.free_rects
            .splice(scored.free_idx..=scored.free_idx, remainders);
        self.placements.push(placement.clone());

        placement
    }

    /// Remainders of `free` after cutting `placed` from its corner. Kerf is
    /// charged on both cuts even when a remainder would be empty.
    fn split(&self, free: FreeRect, placed: Rect) -> Vec<FreeRect> {
        let right_w = free.rect.w - placed.w - self.kerf;
        let bottom_h = free.rect.h - placed.h - self.kerf;
        let right_x = free.x + placed.w + self.kerf;
        let bottom_y = free.y + placed.h + self.kerf;

        let has_right = right_w > EPS;
        let has_bottom = bottom_h > EPS;

        match (has_right, has_bottom) {
            (false, false) => vec![],
            (true, false) => vec![FreeRect {
                x: right_x,
                y: free.y,
                rect: Rect::new(right_w, free.rect.h),
            }],
            (false, true) => vec![FreeRect {
                x: free.x,
                y: bottom_y,
                rect: Rect::new(free.rect.w, bottom_h),
            }],
            (true, true) => {
                // Horizontal cut first: the bottom strip spans the full width.
                let horizontal = [
                    FreeRect {
                        x: right_x,
                        y: free.y,
                        rect: Rect::new(right_w, placed.h),
                    },
                    FreeRect {
                        x: free.x,
                        y: bottom_y,
                        rect: Rect::new(free.rect.w, bottom_h),
                    },
                ];
                // Vertical cut first: the right strip spans the full height.
                let vertical = [
                    FreeRect {
                        x: right_x,
                        y: free.y,
                        rect: Rect::new(right_w, free.rect.h),
                    },
                    FreeRect {
                        x: free.x,
                        y: bottom_y,
                        rect: Rect::new(placed.w, bottom_h),
                    },
                ];
                let largest = |rs: &[FreeRect; 2]| rs[0].rect.area().max(rs[1].rect.area());
                if largest(&vertical) > largest(&horizontal) + EPS {
                    vertical.to_vec()
                } else {
                    horizontal.to_vec()
                }
            }
        }
    }
}
