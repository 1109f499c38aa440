//! Clip-box correctness
//!
//! Clipping must preserve the interior area sum: portions outside the box
//! slide along the boundary instead of disappearing, and geometry wholly
//! outside contributes nothing.

mod util;

use scanline_aa::Rasterize;
use scanline_aa::RasterizerScanline;

use util::collect_scanlines;
use util::polygon;
use util::render_to_buffer;

#[test]
fn segment_left_of_box_yields_no_scanlines() {
    let mut ras = RasterizerScanline::new();
    ras.clip_box(10.0, 0.0, 20.0, 20.0);
    ras.add_path(&polygon(&[(5.0, 5.0), (6.0, 6.0)]));
    assert!(collect_scanlines(&mut ras).is_empty());
}

#[test]
fn polygon_fully_outside_yields_no_scanlines() {
    let mut ras = RasterizerScanline::new();
    ras.clip_box(10.0, 0.0, 20.0, 20.0);
    ras.add_path(&polygon(&[(2.0, 2.0), (8.0, 2.0), (8.0, 8.0), (2.0, 8.0)]));
    assert!(collect_scanlines(&mut ras).is_empty());
}

#[test]
fn polygon_tangent_to_boundary_yields_no_scanlines() {
    // Right side exactly on the clip edge; everything collapses onto it
    let mut ras = RasterizerScanline::new();
    ras.clip_box(10.0, 0.0, 20.0, 20.0);
    ras.add_path(&polygon(&[(5.0, 5.0), (10.0, 5.0), (10.0, 15.0), (5.0, 15.0)]));
    assert!(collect_scanlines(&mut ras).is_empty());
}

#[test]
fn crossing_segment_produces_one_visible_subsegment() {
    // Triangle with one edge entering the box at (10, 10); clipping must
    // produce the same cells as the analytically clipped polygon
    let mut clipped = RasterizerScanline::new();
    clipped.clip_box(10.0, 0.0, 20.0, 20.0);
    clipped.add_path(&polygon(&[(5.0, 5.0), (15.0, 15.0), (15.0, 5.0)]));

    let mut reference = RasterizerScanline::new();
    reference.add_path(&polygon(&[
        (10.0, 10.0),
        (15.0, 15.0),
        (15.0, 5.0),
        (10.0, 5.0),
    ]));

    let a = collect_scanlines(&mut clipped);
    let b = collect_scanlines(&mut reference);
    assert!(!a.is_empty());
    assert_eq!(a, b);
}

#[test]
fn covering_polygon_fills_the_whole_box() {
    // A polygon much larger than the box: every pixel inside the box is
    // fully covered, nothing leaks outside. Dropping the
    // boundary-following connector edges would break this.
    let mut ras = RasterizerScanline::new();
    ras.clip_box(10.0, 5.0, 20.0, 15.0);
    ras.add_path(&polygon(&[(-80.0, -90.0), (100.0, -90.0), (100.0, 100.0), (-80.0, 100.0)]));
    let buf = render_to_buffer(&mut ras, 30, 20);
    for y in 0..20 {
        for x in 0..30 {
            let expected = if (10..20).contains(&x) && (5..15).contains(&y) {
                255
            } else {
                0
            };
            assert_eq!(buf.cover(x, y), expected, "pixel ({}, {})", x, y);
        }
    }
}

#[test]
fn misordered_clip_box_is_normalized() {
    let shape = [(5.0, 5.0), (15.0, 15.0), (15.0, 5.0)];
    let mut a = RasterizerScanline::new();
    a.clip_box(10.0, 0.0, 20.0, 20.0);
    a.add_path(&polygon(&shape));
    let mut b = RasterizerScanline::new();
    b.clip_box(20.0, 20.0, 10.0, 0.0);
    b.add_path(&polygon(&shape));
    assert_eq!(collect_scanlines(&mut a), collect_scanlines(&mut b));
}

#[test]
fn clip_applies_per_pass_not_retroactively() {
    // The box set before submission governs the whole pass
    let shape = [(5.0, 5.0), (15.0, 15.0), (15.0, 5.0)];
    let mut unclipped = RasterizerScanline::new();
    unclipped.add_path(&polygon(&shape));
    let plain = collect_scanlines(&mut unclipped);

    let mut ras = RasterizerScanline::new();
    ras.clip_box(10.0, 0.0, 20.0, 20.0);
    ras.add_path(&polygon(&shape));
    let clipped = collect_scanlines(&mut ras);
    assert_ne!(plain, clipped);

    ras.reset_clipping();
    ras.add_path(&polygon(&shape));
    assert_eq!(plain, collect_scanlines(&mut ras));
}
