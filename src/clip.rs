//! Clip-box line clipping
//!
//! Segments are clipped against an axis-aligned box before cell
//! generation. A segment leaving the box is not simply dropped: its
//! out-of-box portion is slid along the violated boundary so the signed
//! area on the inside stays correct.

use crate::cell::CellKind;
use crate::cell::CellStore;

/// Rectangle
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct Rectangle<T: PartialOrd + Copy> {
    /// Minimum x value
    pub x1: T,
    /// Minimum y value
    pub y1: T,
    /// Maximum x value
    pub x2: T,
    /// Maximum y value
    pub y2: T,
}

impl<T> Rectangle<T>
where
    T: PartialOrd + Copy,
{
    /// Create a new rectangle; values are normalized before storing
    pub fn new(x1: T, y1: T, x2: T, y2: T) -> Self {
        let (x1, x2) = if x1 > x2 { (x2, x1) } else { (x1, x2) };
        let (y1, y2) = if y1 > y2 { (y2, y1) } else { (y1, y2) };
        Self { x1, y1, x2, y2 }
    }
    /// Location of a point relative to the rectangle as outcode bits
    pub fn clip_flags(&self, x: T, y: T) -> u8 {
        clip_flags(&x, &y, &self.x1, &self.y1, &self.x2, &self.y2)
    }
    /// Expand to include the point `(x, y)`
    pub fn expand(&mut self, x: T, y: T) {
        if x < self.x1 {
            self.x1 = x;
        }
        if x > self.x2 {
            self.x2 = x;
        }
        if y < self.y1 {
            self.y1 = y;
        }
        if y > self.y2 {
            self.y2 = y;
        }
    }
    /// Expand to include another rectangle
    pub fn expand_rect(&mut self, r: &Rectangle<T>) {
        self.expand(r.x1, r.y1);
        self.expand(r.x2, r.y2);
    }
}

/// Inside the region
pub const INSIDE: u8 = 0b0000;
/// Left of the region
pub const LEFT: u8 = 0b0001;
/// Right of the region
pub const RIGHT: u8 = 0b0010;
/// Below the region
pub const BOTTOM: u8 = 0b0100;
/// Above the region
pub const TOP: u8 = 0b1000;

/// Outcode of a point against a broken-down rectangle
fn clip_flags<T: PartialOrd>(x: &T, y: &T, x1: &T, y1: &T, x2: &T, y2: &T) -> u8 {
    let mut code = INSIDE;
    if x < x1 {
        code |= LEFT;
    }
    if x > x2 {
        code |= RIGHT;
    }
    if y < y1 {
        code |= BOTTOM;
    }
    if y > y2 {
        code |= TOP;
    }
    code
}

fn mul_div(a: i64, b: i64, c: i64) -> i64 {
    let (a, b, c) = (a as f64, b as f64, c as f64);
    (a * b / c).round() as i64
}

/// Clipper feeding a cell store
///
/// Holds the current point and its outcode between segments, so a path is
/// clipped edge by edge without recomputing endpoint classifications.
#[derive(Debug, Default)]
pub struct Clip {
    /// Current x point
    x1: i64,
    /// Current y point
    y1: i64,
    /// Rectangle to clip on, in sub-pixel coordinates
    clip_box: Option<Rectangle<i64>>,
    /// Outcode of the current point
    clip_flag: u8,
}

impl Clip {
    pub fn new() -> Self {
        Self { x1: 0, y1: 0, clip_box: None, clip_flag: INSIDE }
    }

    /// Clip a segment against the top and bottom of the region
    fn line_clip_y<C: CellKind>(
        &self,
        ras: &mut CellStore<C>,
        x1: i64,
        y1: i64,
        x2: i64,
        y2: i64,
        f1: u8,
        f2: u8,
    ) {
        let b = match self.clip_box {
            None => return,
            Some(ref b) => b,
        };
        let f1 = f1 & (TOP | BOTTOM);
        let f2 = f2 & (TOP | BOTTOM);
        // Fully visible in y
        if f1 == INSIDE && f2 == INSIDE {
            ras.line(x1, y1, x2, y2);
            return;
        }
        // Both endpoints above or both below: nothing inside
        if f1 == f2 {
            return;
        }
        let (mut tx1, mut ty1, mut tx2, mut ty2) = (x1, y1, x2, y2);
        if f1 == BOTTOM {
            tx1 = x1 + mul_div(b.y1 - y1, x2 - x1, y2 - y1);
            ty1 = b.y1;
        }
        if f1 == TOP {
            tx1 = x1 + mul_div(b.y2 - y1, x2 - x1, y2 - y1);
            ty1 = b.y2;
        }
        if f2 == BOTTOM {
            tx2 = x1 + mul_div(b.y1 - y1, x2 - x1, y2 - y1);
            ty2 = b.y1;
        }
        if f2 == TOP {
            tx2 = x1 + mul_div(b.y2 - y1, x2 - x1, y2 - y1);
            ty2 = b.y2;
        }
        ras.line(tx1, ty1, tx2, ty2);
    }

    /// Clip the segment from the current point to `(x2, y2)` into cells
    ///
    /// The endpoint becomes the new current point. Portions outside the
    /// box in x are rendered as boundary-following edges; the eight
    /// outcode cases below enumerate how a segment crosses the vertical
    /// boundaries.
    pub fn line_to<C: CellKind>(&mut self, ras: &mut CellStore<C>, x2: i64, y2: i64) {
        if let Some(ref b) = self.clip_box {
            let f2 = b.clip_flags(x2, y2);
            // Both endpoints above or both below the box: discard early,
            // keeping the directional state current
            let fy1 = (TOP | BOTTOM) & self.clip_flag;
            let fy2 = (TOP | BOTTOM) & f2;
            if fy1 != INSIDE && fy1 == fy2 {
                self.x1 = x2;
                self.y1 = y2;
                self.clip_flag = f2;
                return;
            }
            let (x1, y1, f1) = (self.x1, self.y1, self.clip_flag);
            match (f1 & (LEFT | RIGHT), f2 & (LEFT | RIGHT)) {
                (INSIDE, INSIDE) => self.line_clip_y(ras, x1, y1, x2, y2, f1, f2),
                (INSIDE, RIGHT) => {
                    let y3 = y1 + mul_div(b.x2 - x1, y2 - y1, x2 - x1);
                    let f3 = b.clip_flags(b.x2, y3);
                    self.line_clip_y(ras, x1, y1, b.x2, y3, f1, f3);
                    self.line_clip_y(ras, b.x2, y3, b.x2, y2, f3, f2);
                }
                (RIGHT, INSIDE) => {
                    let y3 = y1 + mul_div(b.x2 - x1, y2 - y1, x2 - x1);
                    let f3 = b.clip_flags(b.x2, y3);
                    self.line_clip_y(ras, b.x2, y1, b.x2, y3, f1, f3);
                    self.line_clip_y(ras, b.x2, y3, x2, y2, f3, f2);
                }
                (INSIDE, LEFT) => {
                    let y3 = y1 + mul_div(b.x1 - x1, y2 - y1, x2 - x1);
                    let f3 = b.clip_flags(b.x1, y3);
                    self.line_clip_y(ras, x1, y1, b.x1, y3, f1, f3);
                    self.line_clip_y(ras, b.x1, y3, b.x1, y2, f3, f2);
                }
                (RIGHT, LEFT) => {
                    let y3 = y1 + mul_div(b.x2 - x1, y2 - y1, x2 - x1);
                    let y4 = y1 + mul_div(b.x1 - x1, y2 - y1, x2 - x1);
                    let f3 = b.clip_flags(b.x2, y3);
                    let f4 = b.clip_flags(b.x1, y4);
                    self.line_clip_y(ras, b.x2, y1, b.x2, y3, f1, f3);
                    self.line_clip_y(ras, b.x2, y3, b.x1, y4, f3, f4);
                    self.line_clip_y(ras, b.x1, y4, b.x1, y2, f4, f2);
                }
                (LEFT, INSIDE) => {
                    let y3 = y1 + mul_div(b.x1 - x1, y2 - y1, x2 - x1);
                    let f3 = b.clip_flags(b.x1, y3);
                    self.line_clip_y(ras, b.x1, y1, b.x1, y3, f1, f3);
                    self.line_clip_y(ras, b.x1, y3, x2, y2, f3, f2);
                }
                (LEFT, RIGHT) => {
                    let y3 = y1 + mul_div(b.x1 - x1, y2 - y1, x2 - x1);
                    let y4 = y1 + mul_div(b.x2 - x1, y2 - y1, x2 - x1);
                    let f3 = b.clip_flags(b.x1, y3);
                    let f4 = b.clip_flags(b.x2, y4);
                    self.line_clip_y(ras, b.x1, y1, b.x1, y3, f1, f3);
                    self.line_clip_y(ras, b.x1, y3, b.x2, y4, f3, f4);
                    self.line_clip_y(ras, b.x2, y4, b.x2, y2, f4, f2);
                }
                (LEFT, LEFT) => self.line_clip_y(ras, b.x1, y1, b.x1, y2, f1, f2),
                (RIGHT, RIGHT) => self.line_clip_y(ras, b.x2, y1, b.x2, y2, f1, f2),
                (_, _) => unreachable!("bad outcode pair {:02b} {:02b}", f1, f2),
            }
            self.clip_flag = f2;
        } else {
            ras.line(self.x1, self.y1, x2, y2);
        }
        self.x1 = x2;
        self.y1 = y2;
    }

    /// Move the current point without producing cells
    pub fn move_to(&mut self, x2: i64, y2: i64) {
        self.x1 = x2;
        self.y1 = y2;
        if let Some(ref b) = self.clip_box {
            self.clip_flag = b.clip_flags(x2, y2);
        }
    }

    /// Define the clipping region in sub-pixel coordinates
    pub fn clip_box(&mut self, x1: i64, y1: i64, x2: i64, y2: i64) {
        self.clip_box = Some(Rectangle::new(x1, y1, x2, y2));
    }

    /// Remove the clipping region
    pub fn reset_clipping(&mut self) {
        self.clip_box = None;
        self.clip_flag = INSIDE;
    }
}
