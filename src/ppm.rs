//! Reading and writing of coverage images
//!
//! Grayscale PNG or PNM depending on the file extension. Used by the
//! test suite for golden comparisons of swept coverage.

use std::path::Path;

/// Image I/O failures surfaced by this module
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
}

/// Read an image file as 8-bit grayscale, returning `(data, width, height)`
pub fn read_file<P: AsRef<Path>>(filename: P) -> Result<(Vec<u8>, usize, usize), Error> {
    let img = image::open(filename)?.to_luma8();
    let (w, h) = img.dimensions();
    Ok((img.into_raw(), w as usize, h as usize))
}

/// Write 8-bit grayscale data as an image file
pub fn write_file<P: AsRef<Path>>(
    buf: &[u8],
    width: usize,
    height: usize,
    filename: P,
) -> Result<(), Error> {
    image::save_buffer(
        filename,
        buf,
        width as u32,
        height as u32,
        image::ColorType::L8,
    )?;
    Ok(())
}

/// Compare two image files pixel for pixel
pub fn img_diff<P: AsRef<Path>>(f1: P, f2: P) -> Result<bool, Error> {
    let (d1, w1, h1) = read_file(f1)?;
    let (d2, w2, h2) = read_file(f2)?;
    if w1 != w2 || h1 != h2 {
        log::warn!("image dimensions differ: {}x{} vs {}x{}", w1, h1, w2, h2);
        return Ok(false);
    }
    for (i, (v1, v2)) in d1.iter().zip(d2.iter()).enumerate() {
        if v1 != v2 {
            log::warn!("first mismatch at ({}, {}): {} vs {}", i % w1, i / w1, v1, v2);
            return Ok(false);
        }
    }
    Ok(true)
}
