//! Two-column grid arrangement of a participant's pages.
//!
//! Pages are deduplicated by position (first occurrence wins), ordered by
//! ascending position and laid out row-major. Every cell shares the footprint
//! of the largest page, so the grid is regular regardless of page sizes.

use std::collections::HashSet;

use foundation::{Page, Position, Rect};
use serde::Serialize;

/// Pixel-to-viewport scale applied to every page dimension.
pub const VIEWPORT_SCALE: f64 = 0.001;

/// Gap between neighbouring cells, in viewport units.
pub const SPACING: f64 = VIEWPORT_SCALE * 100.0;

/// Hard cap on grid columns.
pub const MAX_COLUMNS: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridConfig {
    pub viewport_scale: f64,
    pub spacing: f64,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            viewport_scale: VIEWPORT_SCALE,
            spacing: SPACING,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GridLayout {
    pub columns: usize,
    pub rows: usize,
    pub cell_width: f64,
    pub cell_height: f64,
    pub spacing: f64,
    /// Reference rectangle used to fit and reset the view.
    pub bounds: Rect,
}

impl GridLayout {
    /// Layout for `count` cells of the given (already scaled) size.
    ///
    /// Returns `None` when there is nothing to lay out.
    pub fn new(count: usize, cell_width: f64, cell_height: f64, spacing: f64) -> Option<Self> {
        if count == 0 {
            return None;
        }
        let columns = count.min(MAX_COLUMNS);
        let rows = count.div_ceil(columns);

        let total_width = columns as f64 * cell_width + (columns - 1) as f64 * spacing;
        let total_height = rows as f64 * cell_height + (rows - 1) as f64 * spacing;

        Some(Self {
            columns,
            rows,
            cell_width,
            cell_height,
            spacing,
            bounds: Rect::from_size(total_width, total_height),
        })
    }

    /// Column, row and viewport offset of the cell at row-major `index`.
    pub fn cell(&self, index: usize) -> (usize, usize, f64, f64) {
        let column = index % self.columns;
        let row = index / self.columns;
        let x = column as f64 * (self.cell_width + self.spacing);
        let y = row as f64 * (self.cell_height + self.spacing);
        (column, row, x, y)
    }
}

/// Where one page lands in the grid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Placement {
    pub index: usize,
    pub page: Page,
    pub column: usize,
    pub row: usize,
    pub x: f64,
    pub y: f64,
    /// Width the page is drawn at; height follows from its aspect ratio.
    pub width: f64,
}

impl Placement {
    pub fn position(&self) -> Position {
        self.page.position
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Grid {
    pub layout: GridLayout,
    pub placements: Vec<Placement>,
}

/// Distinct pages by position, first occurrence wins, sorted ascending.
pub fn distinct_pages(pages: &[Page]) -> Vec<Page> {
    let mut seen: HashSet<Position> = HashSet::with_capacity(pages.len());
    let mut out: Vec<Page> = pages
        .iter()
        .filter(|page| seen.insert(page.position))
        .copied()
        .collect();
    // Stable sort; positions are unique at this point anyway.
    out.sort_by_key(|page| page.position);
    out
}

/// Lays out `pages` with the default scale and spacing.
pub fn compute_grid(pages: &[Page]) -> Option<Grid> {
    compute_grid_with(pages, GridConfig::default())
}

pub fn compute_grid_with(pages: &[Page], config: GridConfig) -> Option<Grid> {
    let distinct = distinct_pages(pages);

    let max_width = distinct.iter().map(|p| p.width).max()?;
    let max_height = distinct.iter().map(|p| p.height).max()?;

    let layout = GridLayout::new(
        distinct.len(),
        max_width as f64 * config.viewport_scale,
        max_height as f64 * config.viewport_scale,
        config.spacing,
    )?;

    let placements = distinct
        .into_iter()
        .enumerate()
        .map(|(index, page)| {
            let (column, row, x, y) = layout.cell(index);
            Placement {
                index,
                page,
                column,
                row,
                x,
                y,
                width: layout.cell_width,
            }
        })
        .collect();

    Some(Grid { layout, placements })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn pages(n: u32) -> Vec<Page> {
        (1..=n).map(|i| Page::new(i64::from(i), 1000, 1400)).collect()
    }

    #[test]
    fn columns_and_rows_follow_page_count() {
        for (n, columns, rows) in [(1, 1, 1), (2, 2, 1), (3, 2, 2), (4, 2, 2), (5, 2, 3), (9, 2, 5)] {
            let grid = compute_grid(&pages(n)).unwrap();
            assert_eq!((grid.layout.columns, grid.layout.rows), (columns, rows), "n={n}");
            assert_eq!(grid.placements.len(), n as usize);
        }
    }

    #[test]
    fn no_pages_no_grid() {
        assert!(compute_grid(&[]).is_none());
        assert!(GridLayout::new(0, 1.0, 1.0, 0.1).is_none());
    }

    #[test]
    fn duplicate_positions_keep_first_seen() {
        let input = vec![
            Page::new(2, 800, 600),
            Page::new(1, 500, 500),
            Page::new(2, 3000, 3000),
        ];
        let grid = compute_grid(&input).unwrap();
        let placed: Vec<Page> = grid.placements.iter().map(|p| p.page).collect();
        assert_eq!(placed, vec![Page::new(1, 500, 500), Page::new(2, 800, 600)]);
        // The discarded duplicate does not widen the cells.
        assert!(approx(grid.layout.cell_width, 0.8));
        assert!(approx(grid.layout.cell_height, 0.6));
    }

    #[test]
    fn single_position_degenerates_to_one_cell() {
        let input = vec![Page::new(5, 100, 100), Page::new(5, 200, 200), Page::new(5, 300, 300)];
        let grid = compute_grid(&input).unwrap();
        assert_eq!((grid.layout.columns, grid.layout.rows), (1, 1));
        assert_eq!(grid.placements.len(), 1);
        assert!(approx(grid.layout.bounds.width, 0.1));
    }

    #[test]
    fn positions_sort_numerically() {
        let input = vec![Page::new(10, 1, 1), Page::new(9, 1, 1), Page::new(100, 1, 1), Page::new(2, 1, 1)];
        let order: Vec<i64> = compute_grid(&input)
            .unwrap()
            .placements
            .iter()
            .map(|p| p.position().0)
            .collect();
        assert_eq!(order, vec![2, 9, 10, 100]);
    }

    #[test]
    fn cells_share_the_largest_footprint() {
        let input = vec![Page::new(1, 1000, 500), Page::new(2, 400, 2000), Page::new(3, 10, 10)];
        let grid = compute_grid(&input).unwrap();
        assert!(approx(grid.layout.cell_width, 1.0));
        assert!(approx(grid.layout.cell_height, 2.0));
        assert!(grid.placements.iter().all(|p| approx(p.width, 1.0)));
    }

    #[test]
    fn placements_are_row_major_with_spacing() {
        let grid = compute_grid(&pages(3)).unwrap();
        let cells: Vec<(usize, usize)> = grid.placements.iter().map(|p| (p.column, p.row)).collect();
        assert_eq!(cells, vec![(0, 0), (1, 0), (0, 1)]);

        let third = grid.placements[2];
        assert!(approx(third.x, 0.0));
        assert!(approx(third.y, 1.4 + SPACING));
        let second = grid.placements[1];
        assert!(approx(second.x, 1.0 + SPACING));
        assert!(approx(second.y, 0.0));
    }

    #[test]
    fn bounds_cover_every_cell() {
        let grid = compute_grid(&pages(5)).unwrap();
        let b = grid.layout.bounds;
        assert!(approx(b.width, 2.0 * 1.0 + SPACING));
        assert!(approx(b.height, 3.0 * 1.4 + 2.0 * SPACING));
        for p in &grid.placements {
            assert!(p.x >= 0.0 && p.y >= 0.0);
            assert!(p.x + grid.layout.cell_width <= b.width + 1e-9, "cell {} too far right", p.index);
            assert!(p.y + grid.layout.cell_height <= b.height + 1e-9, "cell {} too far down", p.index);
        }
    }

    #[test]
    fn bounds_scale_linearly_with_page_size() {
        let small = compute_grid_with(
            &[Page::new(1, 100, 200), Page::new(2, 100, 200)],
            GridConfig { viewport_scale: 0.001, spacing: 0.0 },
        )
        .unwrap();
        let large = compute_grid_with(
            &[Page::new(1, 300, 600), Page::new(2, 300, 600)],
            GridConfig { viewport_scale: 0.001, spacing: 0.0 },
        )
        .unwrap();
        assert!(approx(large.layout.bounds.width, 3.0 * small.layout.bounds.width));
        assert!(approx(large.layout.bounds.height, 3.0 * small.layout.bounds.height));
    }
}
