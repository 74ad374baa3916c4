use std::sync::Arc;

use crate::assets::store::PreparedFragment;
use crate::canvas::surface::Surface;
use crate::foundation::core::{Affine, Point, Rgba8Premul};
use crate::foundation::error::{PlatenError, PlatenResult};
use crate::foundation::math::mul_div255_u8;
use crate::scene::model::{BorderSpec, ShadowSpec};

/// A rasterized element ready to layer onto the canvas.
#[derive(Clone, Debug)]
pub struct RenderedAsset {
    pub surface: Surface,
    /// Offset of the element's nominal top-left point inside the buffer.
    ///
    /// Rotation expansion and shadow offsets grow the buffer around the
    /// nominal content; the compositor subtracts this anchor so the content
    /// itself lands where the layout asked.
    pub anchor: (i32, i32),
}

impl RenderedAsset {
    /// Wrap a surface whose top-left already is the nominal point.
    pub fn plain(surface: Surface) -> Self {
        Self {
            surface,
            anchor: (0, 0),
        }
    }
}

/// Resize a prepared fragment to the element's nominal dimensions.
///
/// Lanczos3 keeps edges crisp; the result is re-clamped to valid
/// premultiplied form since windowed-sinc filters overshoot.
pub fn resize_fragment(
    fragment: &PreparedFragment,
    width: u32,
    height: u32,
) -> PlatenResult<Surface> {
    if width == 0 || height == 0 {
        return Err(PlatenError::invalid_layout(
            "fragment target size must be > 0",
        ));
    }

    let src: image::RgbaImage = image::ImageBuffer::from_raw(
        fragment.width,
        fragment.height,
        fragment.rgba8_premul.as_ref().clone(),
    )
    .ok_or_else(|| PlatenError::render("fragment buffer does not match its dimensions"))?;

    let mut resized =
        image::imageops::resize(&src, width, height, image::imageops::FilterType::Lanczos3)
            .into_raw();
    for px in resized.chunks_exact_mut(4) {
        let a = px[3];
        px[0] = px[0].min(a);
        px[1] = px[1].min(a);
        px[2] = px[2].min(a);
    }

    Surface::from_premul_bytes(width, height, resized)
}

/// Apply the shared post-raster pipeline: border stamp, rotation, hard shadow.
///
/// The border is stamped before rotation so the stroke tracks the content
/// quad instead of boxing the expanded transparent corners.
pub fn compose_asset(
    mut base: Surface,
    rotation_deg: f64,
    border: Option<&BorderSpec>,
    shadow: Option<&ShadowSpec>,
) -> PlatenResult<RenderedAsset> {
    if let Some(b) = border {
        stamp_border(&mut base, b)?;
    }

    let (rotated, expand) = if rotation_deg.abs() > f64::EPSILON {
        rotate_surface(&base, rotation_deg)?
    } else {
        (base, (0, 0))
    };

    let (surface, shadow_off) = match shadow {
        Some(s) => add_hard_shadow(&rotated, s)?,
        None => (rotated, (0, 0)),
    };

    Ok(RenderedAsset {
        surface,
        anchor: (expand.0 + shadow_off.0, expand.1 + shadow_off.1),
    })
}

/// Solid rectangular stroke of fixed width along the surface edges.
///
/// Painted as straight pixel runs: hard edges, no antialiasing.
fn stamp_border(surface: &mut Surface, border: &BorderSpec) -> PlatenResult<()> {
    let (w, h) = (surface.width(), surface.height());
    let bw = border.width_px;
    if bw * 2 > w || bw * 2 > h {
        return Err(PlatenError::invalid_layout(
            "border width exceeds half the asset extent",
        ));
    }
    let [r, g, b, a] = border.color;
    let px = Rgba8Premul::from_straight_rgba(r, g, b, a);

    for y in 0..h {
        for x in 0..w {
            let edge = x < bw || y < bw || x >= w - bw || y >= h - bw;
            if edge {
                surface.put(x, y, px);
            }
        }
    }
    Ok(())
}

/// Rotate about the surface center, expanding to the rotated extents.
///
/// Resampling goes through a `vello_cpu` affine image pass. Returns the
/// rotated surface and the offset of the original top-left inside it.
fn rotate_surface(base: &Surface, rotation_deg: f64) -> PlatenResult<(Surface, (i32, i32))> {
    let theta = rotation_deg.to_radians();
    let (w, h) = (f64::from(base.width()), f64::from(base.height()));
    let (sin, cos) = (theta.sin().abs(), theta.cos().abs());
    let rw = (w * cos + h * sin).ceil() as u32;
    let rh = (w * sin + h * cos).ceil() as u32;

    let rw16: u16 = rw
        .try_into()
        .map_err(|_| PlatenError::geometry("rotated asset width exceeds raster limit"))?;
    let rh16: u16 = rh
        .try_into()
        .map_err(|_| PlatenError::geometry("rotated asset height exceeds raster limit"))?;

    let expand_x = (f64::from(rw) - w) / 2.0;
    let expand_y = (f64::from(rh) - h) / 2.0;
    let transform = Affine::translate((expand_x, expand_y))
        * Affine::rotate_about(theta, Point::new(w / 2.0, h / 2.0));

    let paint = premul_surface_to_image(base)?;
    let mut ctx = vello_cpu::RenderContext::new(rw16, rh16);
    ctx.set_transform(affine_to_cpu(transform));
    ctx.set_paint(paint);
    ctx.fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, w, h));
    ctx.flush();

    let mut pixmap = vello_cpu::Pixmap::new(rw16, rh16);
    ctx.render_to_pixmap(&mut pixmap);

    let surface = Surface::from_premul_bytes(rw, rh, pixmap.data_as_u8_slice().to_vec())?;
    Ok((surface, (expand_x.round() as i32, expand_y.round() as i32)))
}

/// Composite a zero-blur silhouette under the asset at an integer offset.
///
/// The silhouette alpha follows the asset alpha scaled by the shadow color's
/// alpha; there is deliberately no blur kernel anywhere in this path.
fn add_hard_shadow(asset: &Surface, shadow: &ShadowSpec) -> PlatenResult<(Surface, (i32, i32))> {
    let [dx, dy] = shadow.offset;
    let (w, h) = (asset.width(), asset.height());

    let out_w = w + dx.unsigned_abs();
    let out_h = h + dy.unsigned_abs();
    let asset_off = (dx.min(0).unsigned_abs() as i32, dy.min(0).unsigned_abs() as i32);
    let shadow_off = (asset_off.0 + dx, asset_off.1 + dy);

    let mut out = Surface::new(out_w, out_h)?;
    let [sr, sg, sb, sa] = shadow.color;

    // Shadow layer first.
    let mut silhouette = Surface::new(w, h)?;
    for y in 0..h {
        for x in 0..w {
            let a = asset.get(x, y).a;
            if a == 0 {
                continue;
            }
            let alpha = mul_div255_u8(u16::from(a), u16::from(sa));
            silhouette.put(x, y, Rgba8Premul::from_straight_rgba(sr, sg, sb, alpha));
        }
    }
    out.blit_over(&silhouette, shadow_off.0, shadow_off.1);

    // Asset above its own shadow.
    out.blit_over(asset, asset_off.0, asset_off.1);

    Ok((out, (asset_off.0, asset_off.1)))
}

/// `vello_cpu` vendors its own kurbo; convert at the boundary.
fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

pub(crate) fn premul_surface_to_image(surface: &Surface) -> PlatenResult<vello_cpu::Image> {
    let w: u16 = surface
        .width()
        .try_into()
        .map_err(|_| PlatenError::render("pixmap width exceeds u16"))?;
    let h: u16 = surface
        .height()
        .try_into()
        .map_err(|_| PlatenError::render("pixmap height exceeds u16"))?;

    let mut pixels = Vec::<vello_cpu::peniko::color::PremulRgba8>::with_capacity(
        (surface.width() as usize) * (surface.height() as usize),
    );
    for px in surface.data().chunks_exact(4) {
        pixels.push(vello_cpu::peniko::color::PremulRgba8::from_u8_array([
            px[0], px[1], px[2], px[3],
        ]));
    }
    let pixmap = vello_cpu::Pixmap::from_parts_with_opacity(pixels, w, h, true);

    Ok(vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/assets/transform.rs"]
mod tests;
