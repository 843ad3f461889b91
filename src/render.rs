use crate::types::SheetLayout;

const MAX_WIDTH: f64 = 80.0;
const MAX_HEIGHT: f64 = 40.0;

/// ASCII diagram of one sheet. Character cells are roughly twice as tall as
/// they are wide, so the vertical axis is squashed by half.
pub fn render_sheet(layout: &SheetLayout) -> String {
    let stock = layout.sheet.rect();
    if stock.w <= 0.0 || stock.h <= 0.0 {
        return String::new();
    }
    let scale = f64::min(MAX_WIDTH / stock.w, 2.0 * MAX_HEIGHT / stock.h);
    let sx = |v: f64| (v * scale).round() as usize;
    let sy = |v: f64| (v * scale / 2.0).round() as usize;
    let grid_w = sx(stock.w);
    let grid_h = sy(stock.h);

    if grid_w == 0 || grid_h == 0 {
        return String::new();
    }

    let mut grid = vec![vec![' '; grid_w + 1]; grid_h + 1];

    draw_rect(&mut grid, 0, 0, grid_w, grid_h);

    for p in &layout.placements {
        if !p.rect.is_valid() {
            continue;
        }
        let x = sx(p.x);
        let y = sy(p.y);
        let w = sx(p.x + p.rect.w).saturating_sub(x);
        let h = sy(p.y + p.rect.h).saturating_sub(y);

        if w == 0 || h == 0 {
            continue;
        }

        draw_rect(&mut grid, x, y, w, h);

        let label: Vec<char> = p.rect.to_string().chars().collect();
        if w > 2 && h > 1 {
            let cy = y + h / 2;
            let start_x = (x + w / 2).saturating_sub(label.len() / 2);
            for (i, &ch) in label.iter().enumerate() {
                let cx = start_x + i;
                if cx > x && cx < x + w {
                    grid[cy][cx] = ch;
                }
            }
        }
    }

    let mut result = String::new();
    for row in &grid {
        let line: String = row.iter().collect();
        result.push_str(line.trim_end());
        result.push('\n');
    }
    result
}

fn edge(current: char, line: char) -> char {
    let crossing = if line == '-' { '|' } else { '-' };
    if current == crossing || current == '+' {
        '+'
    } else {
        line
    }
}

#[allow(clippy::needless_range_loop)]
fn draw_rect(grid: &mut [Vec<char>], x: usize, y: usize, w: usize, h: usize) {
    let rows = grid.len();
    let cols = if rows > 0 { grid[0].len() } else { return };

    for i in x..=x + w {
        if i >= cols {
            break;
        }
        for j in [y, y + h] {
            if j < rows {
                grid[j][i] = edge(grid[j][i], '-');
            }
        }
    }

    for j in y..=y + h {
        if j >= rows {
            break;
        }
        for i in [x, x + w] {
            if i < cols {
                grid[j][i] = edge(grid[j][i], '|');
            }
        }
    }

    for cx in [x, x + w] {
        for cy in [y, y + h] {
            if cy < rows && cx < cols {
                grid[cy][cx] = '+';
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MaterialThickness;
    use crate::types::{Placement, Rect, StockSheet};

    fn layout(placements: Vec<Placement>) -> SheetLayout {
        SheetLayout {
            sheet: StockSheet::standard(
                &MaterialThickness::plywood_3_4(),
                crate::units::LengthUnit::Inches,
            ),
            placements,
            used_area: 0.0,
            total_area: 48.0 * 96.0,
            free_area: 0.0,
            waste_percent: 0.0,
        }
    }

    fn placed(w: f64, h: f64, x: f64, y: f64) -> Placement {
        Placement {
            name: "piece".to_string(),
            rect: Rect::new(w, h),
            x,
            y,
            rotated: false,
        }
    }

    #[test]
    fn test_render_single_piece() {
        let output = render_sheet(&layout(vec![placed(48.0, 96.0, 0.0, 0.0)]));
        assert!(output.contains('+'));
        assert!(output.contains('-'));
        assert!(output.contains('|'));
        assert!(output.contains("48x96"));
    }

    #[test]
    fn test_render_two_pieces() {
        let output = render_sheet(&layout(vec![
            placed(24.0, 96.0, 0.0, 0.0),
            placed(23.875, 96.0, 24.125, 0.0),
        ]));
        assert!(output.contains("24x96"));
        assert!(output.contains("23.875x96"));
    }

    #[test]
    fn test_render_skips_non_positive_footprints() {
        let output = render_sheet(&layout(vec![
            placed(20.0, 96.0, 0.0, 0.0),
            placed(-2.0, 5.0, 20.125, 0.0),
            placed(18.0, -0.25, 20.125, 10.0),
        ]));
        assert!(output.contains("20x96"));
        assert!(!output.contains("-2x5"));
        assert_eq!(output.lines().count(), 41);
    }

    #[test]
    fn test_render_empty() {
        let output = render_sheet(&layout(vec![]));
        assert!(output.contains('+'));
        assert_eq!(output.lines().count(), 41);
    }
}
