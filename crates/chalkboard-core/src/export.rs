//! PNG export of canvas snapshots.

use crate::canvas::Snapshot;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use thiserror::Error;

/// Export errors.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("PNG encoding error: {0}")]
    Encoding(#[from] png::EncodingError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Encode a snapshot as an 8-bit RGBA PNG into `writer`.
pub fn write_png_to<W: Write>(snapshot: &Snapshot, writer: W) -> Result<(), ExportError> {
    let mut encoder = png::Encoder::new(writer, snapshot.width(), snapshot.height());
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder.write_header()?;
    writer.write_image_data(snapshot.pixels())?;
    writer.finish()?;
    Ok(())
}

/// Encode a snapshot as PNG bytes.
pub fn encode_png(snapshot: &Snapshot) -> Result<Vec<u8>, ExportError> {
    let mut png_data = Vec::new();
    write_png_to(snapshot, &mut png_data)?;
    Ok(png_data)
}

/// Write a snapshot to a PNG file.
pub fn write_png(snapshot: &Snapshot, path: impl AsRef<Path>) -> Result<(), ExportError> {
    let path = path.as_ref();
    let file = File::create(path)?;
    write_png_to(snapshot, BufWriter::new(file))?;
    log::info!(
        "Exported {}x{} PNG to: {:?}",
        snapshot.width(),
        snapshot.height(),
        path
    );
    Ok(())
}
