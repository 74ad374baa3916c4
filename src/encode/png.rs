use std::path::Path;

use anyhow::Context;
use tracing::debug;

use crate::foundation::error::{PlatenError, PlatenResult};

/// Write a finished raster as PNG, atomically.
///
/// The image is encoded to a temporary file in the destination directory and
/// renamed into place, so a crash mid-write never leaves a partial file
/// visible under the final name.
pub fn write_png_atomic(image: &image::RgbImage, path: impl AsRef<Path>) -> PlatenResult<()> {
    let path = path.as_ref();
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| PlatenError::render("output path has no file name"))?;

    let tmp = dir.join(format!(".{file_name}.tmp"));
    image
        .save_with_format(&tmp, image::ImageFormat::Png)
        .with_context(|| format!("encode png to '{}'", tmp.display()))?;
    std::fs::rename(&tmp, path)
        .with_context(|| format!("rename '{}' into place", path.display()))?;

    debug!(path = %path.display(), "spread written");
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/encode/png.rs"]
mod tests;
