//! Shared helpers for the integration tests
#![allow(dead_code)]

use scanline_aa::CoverageBuffer;
use scanline_aa::Path;
use scanline_aa::Rasterize;
use scanline_aa::RasterizerScanline;
use scanline_aa::ScanlineU8;

/// Closed polygon from a list of points
pub fn polygon(pts: &[(f64, f64)]) -> Path {
    let mut path = Path::new();
    path.move_to(pts[0].0, pts[0].1);
    for &(x, y) in &pts[1..] {
        path.line_to(x, y);
    }
    path.close_polygon();
    path
}

/// Every swept scanline as `(y, spans)` with spans as `(x, len, covers)`
pub fn collect_scanlines(ras: &mut RasterizerScanline) -> Vec<(i64, Vec<(i64, i64, Vec<u64>)>)> {
    let mut out = vec![];
    let mut sl = ScanlineU8::new();
    if ras.rewind_scanlines() {
        sl.reset(ras.min_x(), ras.max_x());
        while ras.sweep_scanline(&mut sl) {
            let spans = sl
                .spans
                .iter()
                .map(|s| (s.x, s.len, s.covers.clone()))
                .collect();
            out.push((sl.y, spans));
        }
    }
    out
}

/// Sweep a rasterizer into a fresh coverage buffer
pub fn render_to_buffer(ras: &mut RasterizerScanline, width: usize, height: usize) -> CoverageBuffer {
    let mut buf = CoverageBuffer::new(width, height);
    scanline_aa::render_scanlines(ras, &mut buf);
    buf
}

/// Render one closed polygon with default settings
pub fn rasterize_polygon(pts: &[(f64, f64)], width: usize, height: usize) -> CoverageBuffer {
    let mut ras = RasterizerScanline::new();
    ras.add_path(&polygon(pts));
    render_to_buffer(&mut ras, width, height)
}

/// Scratch file path unique to the calling test
pub fn temp_file(name: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!("scanline_aa_{}_{}", std::process::id(), name))
}
