use tracing::debug;

use crate::canvas::surface::Surface;
use crate::foundation::core::Rgba8Premul;
use crate::foundation::error::PlatenResult;
use crate::foundation::math::{hash_cell, lerp_u8};
use crate::scene::model::PrintConfig;

/// Build the base spread surface: flat fill, paper grain, binding geometry.
///
/// The grain field is generated once per canvas and never regenerated per
/// element, so layering later content cannot disturb the paper.
pub fn base_spread(config: &PrintConfig) -> PlatenResult<Surface> {
    config.validate()?;

    let (w, h) = (config.canvas_width, config.canvas_height);
    let mut surface = Surface::new(w, h)?;
    let [br, bg, bb] = config.background_rgb;
    surface.fill(Rgba8Premul::opaque(br, bg, bb));

    apply_grain(&mut surface, config);
    apply_spine_shadow(&mut surface, config);
    // Holes last: a punch goes through the paper, curvature shade and all.
    punch_binding_holes(&mut surface, config);

    debug!(width = w, height = h, "base spread built");
    Ok(surface)
}

/// Smoothed value noise blended at low opacity to read as uncoated fiber.
///
/// Corner values come from a seeded FNV hash of the cell coordinates and are
/// bilinearly interpolated, so the field is deterministic for a given seed.
fn apply_grain(surface: &mut Surface, config: &PrintConfig) {
    if config.grain_opacity <= 0.0 {
        return;
    }
    let cell = config.grain_cell_px.max(1);
    let opacity = config.grain_opacity.clamp(0.0, 1.0);

    let corner = |cx: u32, cy: u32| -> f32 {
        (hash_cell(config.grain_seed, cx, cy) & 0xff) as f32 / 255.0
    };

    for y in 0..surface.height() {
        let cy = y / cell;
        let fy = (y % cell) as f32 / cell as f32;
        for x in 0..surface.width() {
            let cx = x / cell;
            let fx = (x % cell) as f32 / cell as f32;

            let top = corner(cx, cy) * (1.0 - fx) + corner(cx + 1, cy) * fx;
            let bottom = corner(cx, cy + 1) * (1.0 - fx) + corner(cx + 1, cy + 1) * fx;
            let noise = (top * (1.0 - fy) + bottom * fy).clamp(0.0, 1.0);
            let target = (noise * 255.0).round() as u8;

            let px = surface.get(x, y);
            surface.put(
                x,
                y,
                Rgba8Premul::opaque(
                    lerp_u8(px.r, target, opacity),
                    lerp_u8(px.g, target, opacity),
                    lerp_u8(px.b, target, opacity),
                ),
            );
        }
    }
}

/// Vertical column of circular holes at fixed pitch, centered on the spine.
///
/// Edges are a hard radius test; ring binding punches do not feather.
fn punch_binding_holes(surface: &mut Surface, config: &PrintConfig) {
    let cx = config.spine_center;
    let radius = f64::from(config.hole_diameter) / 2.0;
    let pitch = f64::from(config.hole_pitch);
    let [hr, hg, hb] = config.hole_rgb;
    let hole = Rgba8Premul::opaque(hr, hg, hb);

    let mut cy = pitch / 2.0;
    while cy < f64::from(surface.height()) {
        let x0 = ((cx - radius).floor().max(0.0)) as u32;
        let x1 = ((cx + radius).ceil().min(f64::from(surface.width()) - 1.0)) as u32;
        let y0 = ((cy - radius).floor().max(0.0)) as u32;
        let y1 = ((cy + radius).ceil().min(f64::from(surface.height()) - 1.0)) as u32;

        for y in y0..=y1 {
            for x in x0..=x1 {
                let dx = (f64::from(x) + 0.5) - cx;
                let dy = (f64::from(y) + 0.5) - cy;
                if dx * dx + dy * dy <= radius * radius {
                    surface.put(x, y, hole);
                }
            }
        }
        cy += pitch;
    }
}

/// Multiplicative darkening that falls off linearly with distance from the
/// spine column, emulating page curvature toward the binding.
fn apply_spine_shadow(surface: &mut Surface, config: &PrintConfig) {
    if config.binding_shadow_depth <= 0.0 || config.binding_shadow_width == 0 {
        return;
    }
    let reach = f64::from(config.binding_shadow_width);
    let depth = f64::from(config.binding_shadow_depth);

    // Per-column factor; the shadow is constant down each column.
    let mut factors = Vec::with_capacity(surface.width() as usize);
    for x in 0..surface.width() {
        let dist = ((f64::from(x) + 0.5) - config.spine_center).abs();
        let t = (1.0 - dist / reach).max(0.0);
        factors.push(1.0 - depth * t);
    }

    for y in 0..surface.height() {
        for x in 0..surface.width() {
            let f = factors[x as usize];
            if f >= 1.0 {
                continue;
            }
            let px = surface.get(x, y);
            let scale = |c: u8| -> u8 { (f64::from(c) * f).round() as u8 };
            surface.put(
                x,
                y,
                Rgba8Premul {
                    r: scale(px.r),
                    g: scale(px.g),
                    b: scale(px.b),
                    a: px.a,
                },
            );
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/canvas/factory.rs"]
mod tests;
