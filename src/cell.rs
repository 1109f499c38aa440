//! Cell store and line-to-cell rasterization
//!
//! Edges are decomposed into per-pixel `(cover, area)` deltas. `cover` is
//! the signed sub-pixel vertical travel of the edge within the pixel row;
//! `area` is twice the signed trapezoid area between the edge and the
//! pixel's left boundary. Summing the cells of a closed polygon and
//! sweeping a running cover left to right reconstructs exact coverage.

use crate::POLY_SUBPIXEL_MASK;
use crate::POLY_SUBPIXEL_SCALE;
use crate::POLY_SUBPIXEL_SHIFT;

use std::cmp::max;
use std::cmp::min;

/// Accumulation cell shared by the plain and the styled rasterizer
///
/// A cell is keyed by pixel position plus a style payload (unit for the
/// plain rasterizer). Duplicate keys are merged by summing, never
/// overwritten.
pub trait CellKind: Copy {
    /// Style payload carried by every cell
    type Style: Copy + Default + PartialEq + std::fmt::Debug;

    /// Fresh empty cell at a pixel position
    fn at(x: i64, y: i64, style: Self::Style) -> Self;
    fn x(&self) -> i64;
    fn y(&self) -> i64;
    fn cover(&self) -> i64;
    fn area(&self) -> i64;
    fn style(&self) -> Self::Style;
    /// Accumulate a delta into the cell
    fn add(&mut self, cover: i64, area: i64);
    fn is_empty(&self) -> bool {
        self.cover() == 0 && self.area() == 0
    }
    fn same_cell(&self, other: &Self) -> bool {
        self.x() == other.x() && self.y() == other.y() && self.style() == other.style()
    }
}

/// Cell of the plain (single style) rasterizer
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct Cell {
    pub x: i64,
    pub y: i64,
    pub cover: i64,
    pub area: i64,
}

impl Cell {
    pub fn new() -> Self {
        Cell::at(std::i64::MAX, std::i64::MAX, ())
    }
}

impl CellKind for Cell {
    type Style = ();

    fn at(x: i64, y: i64, _style: ()) -> Self {
        Cell { x, y, cover: 0, area: 0 }
    }
    fn x(&self) -> i64 {
        self.x
    }
    fn y(&self) -> i64 {
        self.y
    }
    fn cover(&self) -> i64 {
        self.cover
    }
    fn area(&self) -> i64 {
        self.area
    }
    fn style(&self) {}
    fn add(&mut self, cover: i64, area: i64) {
        self.cover += cover;
        self.area += area;
    }
}

/// Arena of accumulation cells, grouped by scanline row
///
/// Cells are appended in submission order while edges stream in; the first
/// sweep triggers a single stable sort into a flat row-major arena with a
/// per-row index table. Storage is retained across `reset` calls so
/// repeated passes do not reallocate.
#[derive(Debug)]
pub struct CellStore<C: CellKind> {
    /// Cells in submission order, merged only with the trailing cell
    cells: Vec<C>,
    /// Accumulating cell for the pixel currently being walked
    curr: C,
    /// Style stamped onto newly created cells
    style: C::Style,
    /// Row-major sorted arena, valid when `sorted` is set
    ordered: Vec<C>,
    /// Per-row `(start, len)` ranges into `ordered`, indexed by `y - row_min_y`
    rows: Vec<(u32, u32)>,
    row_min_y: i64,
    sorted: bool,
    pub min_x: i64,
    pub min_y: i64,
    pub max_x: i64,
    pub max_y: i64,
}

impl<C: CellKind> Default for CellStore<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: CellKind> CellStore<C> {
    pub fn new() -> Self {
        Self {
            cells: vec![],
            curr: C::at(std::i64::MAX, std::i64::MAX, C::Style::default()),
            style: C::Style::default(),
            ordered: vec![],
            rows: vec![],
            row_min_y: 0,
            sorted: false,
            min_x: std::i64::MAX,
            min_y: std::i64::MAX,
            max_x: std::i64::MIN,
            max_y: std::i64::MIN,
        }
    }

    /// Discard all cells, keeping allocated capacity for the next pass
    pub fn reset(&mut self) {
        self.cells.clear();
        self.ordered.clear();
        self.rows.clear();
        self.curr = C::at(std::i64::MAX, std::i64::MAX, C::Style::default());
        self.sorted = false;
        self.min_x = std::i64::MAX;
        self.min_y = std::i64::MAX;
        self.max_x = std::i64::MIN;
        self.max_y = std::i64::MIN;
    }

    /// Style stamped onto cells created from now on
    pub fn set_style(&mut self, style: C::Style) {
        self.style = style;
    }

    pub fn sorted(&self) -> bool {
        self.sorted
    }

    /// Number of cells after sorting; only meaningful once sorted
    pub fn total_cells(&self) -> usize {
        if self.sorted {
            self.ordered.len()
        } else {
            self.cells.len()
        }
    }

    fn flush_curr(&mut self) {
        if !self.curr.is_empty() {
            self.cells.push(self.curr);
        }
    }

    /// Switch accumulation to the cell at `(x, y)` with the current style
    fn set_curr_cell(&mut self, x: i64, y: i64) {
        let moved = self.curr.x() != x || self.curr.y() != y || self.curr.style() != self.style;
        if moved {
            self.flush_curr();
            self.curr = C::at(x, y, self.style);
        }
    }

    /// Sort and merge cells into per-row runs; idempotent
    pub fn sort_cells(&mut self) {
        if self.sorted {
            return;
        }
        self.flush_curr();
        self.curr = C::at(std::i64::MAX, std::i64::MAX, C::Style::default());
        self.sorted = true;
        self.ordered.clear();
        self.rows.clear();
        if self.cells.is_empty() {
            return;
        }
        log::debug!(
            "sorting {} cells, rows {}..={}",
            self.cells.len(),
            self.min_y,
            self.max_y
        );
        self.ordered.extend_from_slice(&self.cells);
        // Stable: equal positions keep submission order, so duplicate
        // merging is deterministic across runs
        self.ordered.sort_by_key(|c| (c.y(), c.x()));
        let mut out = 0;
        for i in 1..self.ordered.len() {
            if self.ordered[i].same_cell(&self.ordered[out]) {
                let (cover, area) = (self.ordered[i].cover(), self.ordered[i].area());
                self.ordered[out].add(cover, area);
            } else {
                out += 1;
                self.ordered[out] = self.ordered[i];
            }
        }
        self.ordered.truncate(out + 1);

        self.row_min_y = self.ordered[0].y();
        let row_max_y = self.ordered[self.ordered.len() - 1].y();
        self.rows = vec![(0, 0); (row_max_y - self.row_min_y + 1) as usize];
        let mut start = 0;
        for i in 0..=self.ordered.len() {
            let row_done = i == self.ordered.len() || self.ordered[i].y() != self.ordered[start].y();
            if row_done {
                let y = (self.ordered[start].y() - self.row_min_y) as usize;
                self.rows[y] = (start as u32, (i - start) as u32);
                start = i;
            }
        }
    }

    /// Sorted, merged cells of one row; empty for rows without cells
    pub fn scanline_cells(&self, y: i64) -> &[C] {
        let idx = y - self.row_min_y;
        if !self.sorted || idx < 0 || idx as usize >= self.rows.len() {
            return &[];
        }
        let (start, len) = self.rows[idx as usize];
        &self.ordered[start as usize..(start + len) as usize]
    }

    /// Render the sub-span of a line confined to the pixel row `ey`
    ///
    /// `y1` and `y2` are sub-pixel fractions within the row.
    fn render_hline(&mut self, ey: i64, x1: i64, y1: i64, x2: i64, y2: i64) {
        let ex1 = x1 >> POLY_SUBPIXEL_SHIFT;
        let ex2 = x2 >> POLY_SUBPIXEL_SHIFT;
        let fx1 = x1 & POLY_SUBPIXEL_MASK;
        let fx2 = x2 & POLY_SUBPIXEL_MASK;

        // Horizontal edge: no vertical travel, nothing to accumulate
        if y1 == y2 {
            self.set_curr_cell(ex2, ey);
            return;
        }

        // Confined to a single cell
        if ex1 == ex2 {
            self.curr.add(y2 - y1, (fx1 + fx2) * (y2 - y1));
            return;
        }

        // Run of adjacent cells on the same row
        let (mut p, first, incr, dx) = if x2 - x1 < 0 {
            (fx1 * (y2 - y1), 0, -1, x1 - x2)
        } else {
            ((POLY_SUBPIXEL_SCALE - fx1) * (y2 - y1), POLY_SUBPIXEL_SCALE, 1, x2 - x1)
        };
        let mut delta = p / dx;
        let mut xmod = p % dx;
        if xmod < 0 {
            delta -= 1;
            xmod += dx;
        }
        self.curr.add(delta, (fx1 + first) * delta);

        let mut ex1 = ex1 + incr;
        self.set_curr_cell(ex1, ey);
        let mut y1 = y1 + delta;

        if ex1 != ex2 {
            p = POLY_SUBPIXEL_SCALE * (y2 - y1 + delta);
            let mut lift = p / dx;
            let mut rem = p % dx;
            if rem < 0 {
                lift -= 1;
                rem += dx;
            }
            xmod -= dx;

            while ex1 != ex2 {
                delta = lift;
                xmod += rem;
                if xmod >= 0 {
                    xmod -= dx;
                    delta += 1;
                }
                self.curr.add(delta, POLY_SUBPIXEL_SCALE * delta);
                y1 += delta;
                ex1 += incr;
                self.set_curr_cell(ex1, ey);
            }
        }
        delta = y2 - y1;
        self.curr.add(delta, (fx2 + POLY_SUBPIXEL_SCALE - first) * delta);
    }

    /// Rasterize one straight edge in sub-pixel coordinates
    pub fn line(&mut self, x1: i64, y1: i64, x2: i64, y2: i64) {
        let dx_limit = 16384 << POLY_SUBPIXEL_SHIFT;
        let dx = x2 - x1;
        // Split long edges in half to keep the DDA products in range
        if dx >= dx_limit || dx <= -dx_limit {
            let cx = (x1 + x2) / 2;
            let cy = (y1 + y2) / 2;
            self.line(x1, y1, cx, cy);
            self.line(cx, cy, x2, y2);
            return;
        }
        let dy = y2 - y1;
        let ex1 = x1 >> POLY_SUBPIXEL_SHIFT;
        let ex2 = x2 >> POLY_SUBPIXEL_SHIFT;
        let ey1 = y1 >> POLY_SUBPIXEL_SHIFT;
        let ey2 = y2 >> POLY_SUBPIXEL_SHIFT;
        let fy1 = y1 & POLY_SUBPIXEL_MASK;
        let fy2 = y2 & POLY_SUBPIXEL_MASK;

        self.min_x = min(ex2, min(ex1, self.min_x));
        self.min_y = min(ey2, min(ey1, self.min_y));
        self.max_x = max(ex2, max(ex1, self.max_x));
        self.max_y = max(ey2, max(ey1, self.max_y));

        self.set_curr_cell(ex1, ey1);

        // Confined to a single row
        if ey1 == ey2 {
            self.render_hline(ey1, x1, fy1, x2, fy2);
            return;
        }

        // Vertical edge: every row gets the same two-cell contribution
        if dx == 0 {
            let two_fx = (x1 - (ex1 << POLY_SUBPIXEL_SHIFT)) << 1;
            let (first, incr) = if dy < 0 { (0, -1) } else { (POLY_SUBPIXEL_SCALE, 1) };

            let delta = first - fy1;
            self.curr.add(delta, two_fx * delta);

            let mut ey1 = ey1 + incr;
            self.set_curr_cell(ex1, ey1);
            let delta = first + first - POLY_SUBPIXEL_SCALE;
            while ey1 != ey2 {
                self.curr.add(delta, two_fx * delta);
                ey1 += incr;
                self.set_curr_cell(ex1, ey1);
            }
            let delta = fy2 - POLY_SUBPIXEL_SCALE + first;
            self.curr.add(delta, two_fx * delta);
            return;
        }

        // General case: walk row by row, one hline sub-span each
        let (p, first, incr, dy) = if dy < 0 {
            (fy1 * dx, 0, -1, -dy)
        } else {
            ((POLY_SUBPIXEL_SCALE - fy1) * dx, POLY_SUBPIXEL_SCALE, 1, dy)
        };
        let mut delta = p / dy;
        let mut xmod = p % dy;
        if xmod < 0 {
            delta -= 1;
            xmod += dy;
        }
        let mut x_from = x1 + delta;
        self.render_hline(ey1, x1, fy1, x_from, first);
        let mut ey1 = ey1 + incr;
        self.set_curr_cell(x_from >> POLY_SUBPIXEL_SHIFT, ey1);

        if ey1 != ey2 {
            let p = POLY_SUBPIXEL_SCALE * dx;
            let mut lift = p / dy;
            let mut rem = p % dy;
            if rem < 0 {
                lift -= 1;
                rem += dy;
            }
            xmod -= dy;

            while ey1 != ey2 {
                delta = lift;
                xmod += rem;
                if xmod >= 0 {
                    xmod -= dy;
                    delta += 1;
                }
                let x_to = x_from + delta;
                self.render_hline(ey1, x_from, POLY_SUBPIXEL_SCALE - first, x_to, first);
                x_from = x_to;
                ey1 += incr;
                self.set_curr_cell(x_from >> POLY_SUBPIXEL_SHIFT, ey1);
            }
        }
        self.render_hline(ey1, x_from, POLY_SUBPIXEL_SCALE - first, x2, fy2);
    }
}
