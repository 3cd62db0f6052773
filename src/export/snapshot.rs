use std::{io::Cursor, path::Path};

use crate::{
    config::scroll::SizeConfig,
    export::paint::{FrameImage, SnapshotOptions, paint_frame},
    foundation::error::{WallError, WallResult},
    store::items::ItemStore,
};

/// Encode a frame as PNG bytes.
pub fn encode_png(frame: &FrameImage) -> WallResult<Vec<u8>> {
    let img = image::RgbaImage::from_raw(frame.width, frame.height, frame.data.clone())
        .ok_or_else(|| WallError::export("frame buffer does not match its dimensions"))?;
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .map_err(|e| WallError::export(format!("encode png: {e}")))?;
    Ok(buf)
}

/// Paint the current frame and write it to `path` as PNG.
#[tracing::instrument(skip(store, sizes), fields(path = %path.display()))]
pub fn export_png(
    store: &ItemStore,
    sizes: &SizeConfig,
    opts: &SnapshotOptions,
    path: &Path,
) -> WallResult<FrameImage> {
    if !store.is_paused() {
        tracing::warn!("exporting while running; the frame may not match what is on screen");
    }
    let frame = paint_frame(store, sizes, opts)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .map_err(|e| WallError::export(format!("create dir '{}': {e}", parent.display())))?;
    }
    image::save_buffer_with_format(
        path,
        &frame.data,
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .map_err(|e| WallError::export(format!("write png '{}': {e}", path.display())))?;

    tracing::debug!(width = frame.width, height = frame.height, "snapshot written");
    Ok(frame)
}

#[cfg(test)]
#[path = "../../tests/unit/export/snapshot.rs"]
mod tests;
