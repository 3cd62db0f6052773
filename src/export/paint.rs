use vello_cpu::kurbo::{Affine, Rect};

use crate::{
    config::scroll::SizeConfig,
    foundation::error::{WallError, WallResult},
    model::item::{ItemContent, ScrollItem, TextColor},
    store::items::ItemStore,
};

/// Largest edge of an exported frame, in pixels.
pub const MAX_FRAME_EDGE: u32 = 16_384;

const IMAGE_TILE_RGBA: [u8; 4] = [196, 198, 204, 255];
const TEXT_OPACITY: f32 = 0.9;

/// Export settings.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SnapshotOptions {
    /// Output pixels per board pixel.
    pub scale: f64,
    /// Background color (straight alpha).
    pub background: [u8; 4],
}

impl Default for SnapshotOptions {
    fn default() -> Self {
        Self {
            scale: 2.0,
            background: [34, 48, 40, 255],
        }
    }
}

/// Painted RGBA8 frame with straight alpha.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Row-major RGBA8 pixels.
    pub data: Vec<u8>,
}

impl FrameImage {
    /// Pixel at `(x, y)`, if inside the frame.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        Some([self.data[i], self.data[i + 1], self.data[i + 2], self.data[i + 3]])
    }
}

/// Chalk color used to paint a text item.
pub fn chalk_rgba(color: TextColor) -> [u8; 4] {
    match color {
        TextColor::Yellow => [255, 241, 118, 255],
        TextColor::Pink => [248, 187, 208, 255],
        TextColor::Blue => [144, 202, 249, 255],
        TextColor::Green => [165, 214, 167, 255],
        TextColor::White => [250, 250, 250, 255],
    }
}

/// The x an item is painted at: the pause cache while paused, the live position otherwise.
pub fn painted_x(store: &ItemStore, item: &ScrollItem) -> f64 {
    if store.is_paused() {
        store.paused_position_x(&item.id).unwrap_or(item.position.x)
    } else {
        item.position.x
    }
}

/// Paint the store's visible items in z-order.
///
/// Each item is a rectangle of its estimated size, rotated about its center by
/// `item.rotation` degrees.
pub fn paint_frame(
    store: &ItemStore,
    sizes: &SizeConfig,
    opts: &SnapshotOptions,
) -> WallResult<FrameImage> {
    if !opts.scale.is_finite() || opts.scale <= 0.0 {
        return Err(WallError::export(format!("scale must be > 0, got {}", opts.scale)));
    }
    let board = store.board_dimensions();
    let width = frame_edge(board.width, opts.scale)?;
    let height = frame_edge(board.height, opts.scale)?;

    let mut ctx = vello_cpu::RenderContext::new(width, height);
    ctx.set_transform(Affine::IDENTITY);
    set_color(&mut ctx, opts.background);
    ctx.fill_rect(&Rect::new(0.0, 0.0, f64::from(width), f64::from(height)));

    let mut items = store.visible_items();
    items.sort_by_key(|i| i.z_index);
    for item in items {
        let (color, opacity) = match &item.content {
            ItemContent::Image(_) => (IMAGE_TILE_RGBA, 1.0),
            ItemContent::Text(t) => (chalk_rgba(t.color), TEXT_OPACITY),
        };
        let size = item.estimated_size(sizes);
        let (hw, hh) = (size.width / 2.0, size.height / 2.0);
        let center = (painted_x(store, item) + hw, item.position.y + hh);

        ctx.set_transform(
            Affine::scale(opts.scale)
                * Affine::translate(center)
                * Affine::rotate(item.rotation.to_radians()),
        );
        set_color(&mut ctx, color);
        if opacity < 1.0 {
            ctx.push_opacity_layer(opacity);
        }
        ctx.fill_rect(&Rect::new(-hw, -hh, hw, hh));
        if opacity < 1.0 {
            ctx.pop_layer();
        }
    }
    ctx.flush();

    let mut pixmap = vello_cpu::Pixmap::new(width, height);
    ctx.render_to_pixmap(&mut pixmap);
    let mut data = pixmap.data_as_u8_slice().to_vec();
    unpremultiply_rgba8_in_place(&mut data);

    Ok(FrameImage {
        width: u32::from(width),
        height: u32::from(height),
        data,
    })
}

fn set_color(ctx: &mut vello_cpu::RenderContext, [r, g, b, a]: [u8; 4]) {
    ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(r, g, b, a));
}

fn frame_edge(board_px: f64, scale: f64) -> WallResult<u16> {
    let edge = (board_px * scale).round();
    if !(1.0..=f64::from(MAX_FRAME_EDGE)).contains(&edge) {
        return Err(WallError::export(format!(
            "frame edge {edge} outside 1..={MAX_FRAME_EDGE}"
        )));
    }
    Ok(edge as u16)
}

fn unpremultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 || a == 255 {
            continue;
        }
        for c in &mut px[..3] {
            *c = ((*c as u16 * 255 + a / 2) / a).min(255) as u8;
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/export/paint.rs"]
mod tests;
