//! Compound rasterizer for multi-style fills
//!
//! Edges carry the style ids of the areas on their left and right. One
//! geometry pass then yields one coverage scanline per active style per
//! row, letting overlapping fills of different styles composite without
//! re-rasterizing.

use crate::cell::Cell;
use crate::cell::CellKind;
use crate::cell::CellStore;
use crate::clip::Clip;
use crate::path::PathCommand;
use crate::path::VertexSource;
use crate::raster::gamma_identity;
use crate::raster::gamma_table;
use crate::raster::sweep_row;
use crate::raster::FillingRule;
use crate::raster::PathStatus;
use crate::scan::Scanline;
use crate::to_fixed;

use std::cmp::max;
use std::cmp::min;

/// Style ids of the areas left and right of an edge, in travel direction
///
/// Negative ids mean "no style" (the outside of the figure).
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct StylePair {
    pub left: i64,
    pub right: i64,
}

impl Default for StylePair {
    fn default() -> StylePair {
        StylePair { left: -1, right: -1 }
    }
}

/// Accumulation cell tagged with the styles it separates
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct StyledCell {
    pub x: i64,
    pub y: i64,
    pub cover: i64,
    pub area: i64,
    pub style: StylePair,
}

impl CellKind for StyledCell {
    type Style = StylePair;

    fn at(x: i64, y: i64, style: StylePair) -> Self {
        StyledCell { x, y, cover: 0, area: 0, style }
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
    fn style(&self) -> StylePair {
        self.style
    }
    fn add(&mut self, cover: i64, area: i64) {
        self.cover += cover;
        self.area += area;
    }
}

/// One style's share of the current row, lowered to plain cells
#[derive(Debug)]
pub struct StyleRun {
    pub style: i64,
    pub cells: Vec<Cell>,
    pub min_x: i64,
    pub max_x: i64,
}

fn add_to_run(runs: &mut Vec<StyleRun>, y: i64, style: i64, x: i64, cover: i64, area: i64) {
    if style < 0 || (cover == 0 && area == 0) {
        return;
    }
    let idx = match runs.binary_search_by_key(&style, |r| r.style) {
        Ok(i) => i,
        Err(i) => {
            runs.insert(i, StyleRun { style, cells: vec![], min_x: x, max_x: x });
            i
        }
    };
    let run = &mut runs[idx];
    run.min_x = min(run.min_x, x);
    run.max_x = max(run.max_x, x);
    if let Some(last) = run.cells.last_mut() {
        if last.x == x {
            last.cover += cover;
            last.area += area;
            return;
        }
    }
    run.cells.push(Cell { x, y, cover, area });
}

/// Polygon rasterizer producing per-style coverage scanlines
///
/// Usage mirrors the plain rasterizer, with two differences: `styles`
/// declares the left/right style ids stamped onto subsequent edges, and
/// sweeping is two-level: `sweep_styles` advances to the next non-empty
/// row and reports how many styles are active there, then
/// `sweep_scanline` extracts each style's scanline in ascending style-id
/// order.
#[derive(Debug)]
pub struct RasterizerCompound {
    pub clipper: Clip,
    pub outline: CellStore<StyledCell>,
    status: PathStatus,
    x0: i64,
    y0: i64,
    scan_y: i64,
    sweep_y: i64,
    filling_rule: FillingRule,
    gamma: [u64; 256],
    runs: Vec<StyleRun>,
}

impl Default for RasterizerCompound {
    fn default() -> Self {
        Self::new()
    }
}

impl RasterizerCompound {
    pub fn new() -> Self {
        Self {
            clipper: Clip::new(),
            outline: CellStore::new(),
            status: PathStatus::Initial,
            x0: 0,
            y0: 0,
            scan_y: 0,
            sweep_y: 0,
            filling_rule: FillingRule::NonZero,
            gamma: gamma_identity(),
            runs: vec![],
        }
    }

    /// Discard all accumulated cells and styles
    pub fn reset(&mut self) {
        self.outline.reset();
        self.runs.clear();
        self.status = PathStatus::Initial;
    }

    /// Style ids stamped onto edges submitted from now on
    pub fn styles(&mut self, left: i64, right: i64) {
        self.outline.set_style(StylePair { left, right });
    }

    /// Select the active fill rule
    pub fn filling_rule(&mut self, filling_rule: FillingRule) {
        self.filling_rule = filling_rule;
    }

    /// Replace the gamma mapping applied to swept coverage
    pub fn gamma<F>(&mut self, gfunc: F)
    where
        F: Fn(f64) -> f64,
    {
        self.gamma = gamma_table(gfunc);
    }

    /// Define the clip box in real coordinates
    pub fn clip_box(&mut self, x1: f64, y1: f64, x2: f64, y2: f64) {
        self.clipper
            .clip_box(to_fixed(x1), to_fixed(y1), to_fixed(x2), to_fixed(y2));
    }

    pub fn move_to_d(&mut self, x: f64, y: f64) {
        self.x0 = to_fixed(x);
        self.y0 = to_fixed(y);
        self.clipper.move_to(self.x0, self.y0);
        self.status = PathStatus::MoveTo;
    }

    pub fn line_to_d(&mut self, x: f64, y: f64) {
        let x = to_fixed(x);
        let y = to_fixed(y);
        self.clipper.line_to(&mut self.outline, x, y);
        self.status = PathStatus::LineTo;
    }

    pub fn close_polygon(&mut self) {
        if self.status == PathStatus::LineTo {
            self.clipper.line_to(&mut self.outline, self.x0, self.y0);
            self.status = PathStatus::Closed;
        }
    }

    /// Feed every vertex of a source through the clipper into cells
    pub fn add_path<VS: VertexSource>(&mut self, path: &VS) {
        if self.outline.sorted() {
            self.reset();
        }
        for seg in path.vertices() {
            match seg.cmd {
                PathCommand::MoveTo => {
                    if seg.x.is_finite() && seg.y.is_finite() {
                        self.close_polygon();
                        self.move_to_d(seg.x, seg.y);
                    }
                }
                PathCommand::LineTo => {
                    if seg.x.is_finite() && seg.y.is_finite() {
                        self.line_to_d(seg.x, seg.y);
                    }
                }
                PathCommand::EndPolyClose => self.close_polygon(),
                PathCommand::EndPolyNoClose => {}
                PathCommand::Stop => break,
            }
        }
    }

    /// Prepare for sweeping; false when no cells were produced
    pub fn rewind_scanlines(&mut self) -> bool {
        self.close_polygon();
        self.outline.sort_cells();
        self.runs.clear();
        if self.outline.total_cells() == 0 {
            false
        } else {
            self.scan_y = self.outline.min_y;
            true
        }
    }

    /// Advance to the next row with active styles
    ///
    /// Lowers the row's styled cells into per-style runs: an edge
    /// contributes positively to its left style and negatively to its
    /// right style, so each run is an ordinary cell row for that style.
    /// Returns the number of active styles, 0 once all rows are swept.
    pub fn sweep_styles(&mut self) -> usize {
        loop {
            if self.scan_y > self.outline.max_y {
                return 0;
            }
            let y = self.scan_y;
            self.scan_y += 1;
            let cells = self.outline.scanline_cells(y);
            if cells.is_empty() {
                continue;
            }
            self.sweep_y = y;
            self.runs.clear();
            for c in cells {
                add_to_run(&mut self.runs, y, c.style.left, c.x, c.cover, c.area);
                add_to_run(&mut self.runs, y, c.style.right, c.x, -c.cover, -c.area);
            }
            if !self.runs.is_empty() {
                log::trace!("row {}: {} active styles", y, self.runs.len());
                return self.runs.len();
            }
        }
    }

    /// Style id of the `idx`-th active style of the current row
    pub fn style(&self, idx: usize) -> i64 {
        self.runs[idx].style
    }

    /// Row the most recent `sweep_styles` call settled on
    pub fn sweep_y(&self) -> i64 {
        self.sweep_y
    }

    /// Sweep one active style of the current row into `sl`
    ///
    /// False when the style's contributions cancel to nothing.
    pub fn sweep_scanline<S: Scanline>(&mut self, sl: &mut S, style_idx: usize) -> bool {
        let run = match self.runs.get(style_idx) {
            None => return false,
            Some(run) => run,
        };
        sl.reset_spans();
        sweep_row(sl, &run.cells, self.filling_rule, &self.gamma);
        if sl.num_spans() == 0 {
            return false;
        }
        sl.finalize(self.sweep_y);
        true
    }

    pub fn min_x(&self) -> i64 {
        self.outline.min_x
    }
    pub fn max_x(&self) -> i64 {
        self.outline.max_x
    }
    pub fn min_y(&self) -> i64 {
        self.outline.min_y
    }
    pub fn max_y(&self) -> i64 {
        self.outline.max_y
    }
}
