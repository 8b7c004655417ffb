// ABOUTME: Loads image files and converts them to the PNG bitmaps the preview protocols carry
// ABOUTME: PNG input passes through untouched; other formats are decoded and re-encoded

use anyhow::{Context, Result, anyhow};
use image::ImageFormat;
use std::io::Cursor;
use std::path::Path;
use termpreview::Bitmap;

/// Read an image file and return it as a PNG bitmap
pub fn load_bitmap<P: AsRef<Path>>(path: P) -> Result<Bitmap> {
    let path = path.as_ref();
    let data = std::fs::read(path)
        .with_context(|| format!("Failed to read image file: {}", path.display()))?;

    let png = to_png(&data).with_context(|| format!("Failed to convert {}", path.display()))?;
    Ok(Bitmap::png(png))
}

/// Convert encoded image bytes of any supported format to PNG
pub fn to_png(data: &[u8]) -> Result<Vec<u8>> {
    if data.is_empty() {
        return Err(anyhow!("Image file is empty"));
    }

    let detected = image::guess_format(data).ok();
    if detected == Some(ImageFormat::Png) {
        log::debug!("image is already PNG ({}), no conversion needed", format_size(data.len()));
        return Ok(data.to_vec());
    }

    let img = image::load_from_memory(data)
        .map_err(|e| anyhow!("Failed to decode image: {}", e))?;

    let mut buffer = Vec::new();
    img.write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)
        .map_err(|e| anyhow!("Failed to encode PNG: {}", e))?;

    log::debug!(
        "converted {} {}x{} to PNG ({})",
        detected.map(format_name).unwrap_or("unknown"),
        img.width(),
        img.height(),
        format_size(buffer.len())
    );

    Ok(buffer)
}

fn format_name(format: ImageFormat) -> &'static str {
    match format {
        ImageFormat::Png => "PNG",
        ImageFormat::Jpeg => "JPEG",
        ImageFormat::Gif => "GIF",
        ImageFormat::WebP => "WebP",
        ImageFormat::Tiff => "TIFF",
        ImageFormat::Bmp => "BMP",
        _ => "other",
    }
}

pub fn format_size(bytes: usize) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}
