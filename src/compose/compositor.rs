use rayon::prelude::*;
use smallvec::SmallVec;
use tracing::{debug, warn};

use crate::assets::store::{FontStore, FragmentStore};
use crate::assets::transform::{RenderedAsset, compose_asset, resize_fragment};
use crate::canvas::factory::base_spread;
use crate::canvas::surface::Surface;
use crate::compose::fingerprint::{SpreadFingerprint, fingerprint_rgb};
use crate::compose::rotation::chaos_rotation;
use crate::compose::spine::{GuardOutcome, SpineBand};
use crate::compose::warning::Warning;
use crate::foundation::core::RectPx;
use crate::foundation::error::{PlatenError, PlatenResult};
use crate::press::pipeline::PressPipeline;
use crate::scene::model::{Element, ElementKind, LayoutSpec, PrintConfig};
use crate::text::layout::TextEngine;

/// A composed spread before press-artifact simulation.
#[derive(Clone, Debug)]
pub struct ComposedSpread {
    pub spread_id: String,
    pub surface: Surface,
    pub warnings: SmallVec<[Warning; 4]>,
    /// Resolution tag for downstream packaging; carried as data, the PNG
    /// encoder does not write it.
    pub dpi: u32,
}

/// A finished spread after the press pipeline.
#[derive(Clone, Debug)]
pub struct FinishedSpread {
    pub spread_id: String,
    pub image: image::RgbImage,
    pub warnings: SmallVec<[Warning; 4]>,
    pub dpi: u32,
    pub fingerprint: SpreadFingerprint,
}

/// Compose one spread: canvas, then every element in declaration order.
///
/// Declaration order is paint order. Any fatal sub-error aborts the whole
/// call; a partially painted canvas never escapes. Non-fatal corrections
/// accumulate in the returned warnings.
#[tracing::instrument(skip_all, fields(spread = %layout.spread_id))]
pub fn compose_spread(
    layout: &LayoutSpec,
    config: &PrintConfig,
    fragments: &FragmentStore,
    fonts: &FontStore,
) -> PlatenResult<ComposedSpread> {
    config.validate()?;
    layout.validate(config)?;

    let mut canvas = base_spread(config)?;
    let band = SpineBand::from_config(config);
    let mut warnings: SmallVec<[Warning; 4]> = SmallVec::new();
    let mut text_engine = TextEngine::new();

    for el in &layout.elements {
        let rotation = resolve_rotation(el, config)?;
        let asset = render_element(el, rotation, config, fragments, fonts, &mut text_engine, &mut warnings)?;

        let bbox = RectPx::new(
            el.x - asset.anchor.0,
            el.y - asset.anchor.1,
            asset.surface.width(),
            asset.surface.height(),
        )?;

        let bbox = clamp_to_page(bbox, el, config, &mut warnings)?;

        let (bbox, outcome) = band.guard(bbox, el.half);
        if let GuardOutcome::Shifted { dx } = outcome {
            warn!(element = %el.id, dx, "spine intrusion corrected");
            warnings.push(Warning::SpineShift {
                element_id: el.id.clone(),
                dx,
            });
        }

        // A spine shift must not push the element off the page.
        if bbox.x < 0 || bbox.right() > config.canvas_width as i32 {
            return Err(PlatenError::geometry(format!(
                "element '{}' cannot clear the spine band within the page",
                el.id
            )));
        }

        canvas.blit_over(&asset.surface, bbox.x, bbox.y);
        debug!(element = %el.id, kind = el.kind_name(), x = bbox.x, y = bbox.y, "layered");
    }

    Ok(ComposedSpread {
        spread_id: layout.spread_id.clone(),
        surface: canvas,
        warnings,
        dpi: config.output_dpi,
    })
}

/// Compose and run the full press chain, yielding the final raster.
pub fn produce_spread(
    layout: &LayoutSpec,
    config: &PrintConfig,
    fragments: &FragmentStore,
    fonts: &FontStore,
) -> PlatenResult<FinishedSpread> {
    let composed = compose_spread(layout, config, fragments, fonts)?;
    let mut image = flatten_to_rgb(&composed.surface, config.background_rgb);
    PressPipeline::from_config(config).process(&mut image);
    let fingerprint = fingerprint_rgb(&image);

    Ok(FinishedSpread {
        spread_id: composed.spread_id,
        image,
        warnings: composed.warnings,
        dpi: composed.dpi,
        fingerprint,
    })
}

/// Compose independent spreads in parallel.
///
/// Spreads share only the read-only stores, so this is a plain data-parallel
/// map; each call owns its own canvas and text engine.
pub fn compose_batch(
    layouts: &[LayoutSpec],
    config: &PrintConfig,
    fragments: &FragmentStore,
    fonts: &FontStore,
) -> Vec<PlatenResult<FinishedSpread>> {
    layouts
        .par_iter()
        .map(|layout| produce_spread(layout, config, fragments, fonts))
        .collect()
}

/// Flatten premultiplied RGBA over the paper color into an alpha-free RGB
/// raster.
pub fn flatten_to_rgb(surface: &Surface, background_rgb: [u8; 3]) -> image::RgbImage {
    let (w, h) = (surface.width(), surface.height());
    let mut out = image::RgbImage::new(w, h);
    for y in 0..h {
        for x in 0..w {
            let px = surface.get(x, y);
            let rgb = if px.a == 255 {
                [px.r, px.g, px.b]
            } else {
                let inv = 255 - u16::from(px.a);
                let blend = |s: u8, b: u8| -> u8 {
                    (u16::from(s) + (u16::from(b) * inv + 127) / 255).min(255) as u8
                };
                [
                    blend(px.r, background_rgb[0]),
                    blend(px.g, background_rgb[1]),
                    blend(px.b, background_rgb[2]),
                ]
            };
            out.put_pixel(x, y, image::Rgb(rgb));
        }
    }
    out
}

fn resolve_rotation(el: &Element, config: &PrintConfig) -> PlatenResult<f64> {
    if let Some(deg) = el.rotation_deg {
        return Ok(deg);
    }
    let ceiling = match el.kind {
        ElementKind::Fragment { .. } => config.fragment_max_tilt_deg,
        ElementKind::Text { .. } => config.text_max_tilt_deg,
    };
    chaos_rotation(&el.id, ceiling)
}

fn render_element(
    el: &Element,
    rotation: f64,
    config: &PrintConfig,
    fragments: &FragmentStore,
    fonts: &FontStore,
    text_engine: &mut TextEngine,
    warnings: &mut SmallVec<[Warning; 4]>,
) -> PlatenResult<RenderedAsset> {
    match &el.kind {
        ElementKind::Fragment { source } => {
            let fragment = fragments.get(source)?;
            let base = resize_fragment(fragment, el.width, el.height)?;
            compose_asset(base, rotation, el.border.as_ref(), el.shadow.as_ref())
        }
        ElementKind::Text {
            content,
            font,
            size_px,
            leading_px,
            color,
        } => {
            let font_bytes = fonts.get(font)?;
            let block = text_engine.render_block(
                content,
                &font_bytes,
                *size_px,
                *color,
                el.width,
                el.height,
                *leading_px,
                config.text_overflow,
            )?;
            if block.wide_word {
                let w = Warning::WideWord {
                    element_id: el.id.clone(),
                };
                warn!(element = %el.id, "{w}");
                warnings.push(w);
            }
            if let Some(w) = Warning::from_overflow(&el.id, block.overflow) {
                warn!(element = %el.id, "{w}");
                warnings.push(w);
            }
            compose_asset(block.surface, rotation, el.border.as_ref(), el.shadow.as_ref())
        }
    }
}

/// Nudge the expanded bounding box back inside the safe zone.
///
/// Assets wider than the safe span but still inside the canvas are clamped
/// to the canvas edge instead; only an asset larger than the canvas itself
/// is unplaceable.
fn clamp_to_page(
    bbox: RectPx,
    el: &Element,
    config: &PrintConfig,
    warnings: &mut SmallVec<[Warning; 4]>,
) -> PlatenResult<RectPx> {
    let (cw, ch) = (config.canvas_width as i32, config.canvas_height as i32);
    if bbox.width as i32 > cw || bbox.height as i32 > ch {
        return Err(PlatenError::geometry(format!(
            "element '{}' expands to {}x{}, larger than the canvas",
            el.id, bbox.width, bbox.height
        )));
    }

    let margin = config.safe_margin as i32;
    let clamp_axis = |pos: i32, extent: i32, limit: i32| -> i32 {
        let (lo, hi) = if extent <= limit - 2 * margin {
            (margin, limit - margin - extent)
        } else {
            (0, limit - extent)
        };
        pos.clamp(lo, hi)
    };

    let nx = clamp_axis(bbox.x, bbox.width as i32, cw);
    let ny = clamp_axis(bbox.y, bbox.height as i32, ch);
    if nx != bbox.x || ny != bbox.y {
        warnings.push(Warning::SafeZoneClamp {
            element_id: el.id.clone(),
            dx: nx - bbox.x,
            dy: ny - bbox.y,
        });
    }

    Ok(RectPx {
        x: nx,
        y: ny,
        ..bbox
    })
}

#[cfg(test)]
#[path = "../../tests/unit/compose/compositor.rs"]
mod tests;
