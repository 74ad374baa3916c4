use super::*;

fn solid_fragment(w: u32, h: u32, rgba: [u8; 4]) -> PreparedFragment {
    let px = Rgba8Premul::from_straight_rgba(rgba[0], rgba[1], rgba[2], rgba[3]);
    let mut data = Vec::with_capacity((w * h * 4) as usize);
    for _ in 0..w * h {
        data.extend_from_slice(&px.to_array());
    }
    PreparedFragment {
        width: w,
        height: h,
        rgba8_premul: Arc::new(data),
    }
}

fn solid_surface(w: u32, h: u32, rgba: [u8; 4]) -> Surface {
    let mut s = Surface::new(w, h).unwrap();
    s.fill(Rgba8Premul::from_straight_rgba(
        rgba[0], rgba[1], rgba[2], rgba[3],
    ));
    s
}

#[test]
fn resize_changes_dimensions() {
    let frag = solid_fragment(8, 8, [200, 40, 40, 255]);
    let out = resize_fragment(&frag, 16, 12).unwrap();
    assert_eq!((out.width(), out.height()), (16, 12));
    // Interior of a solid fill survives resampling within rounding.
    let px = out.get(8, 6);
    assert!(px.a == 255 && px.r.abs_diff(200) <= 1 && px.g.abs_diff(40) <= 1);
}

#[test]
fn resize_rejects_zero_target() {
    let frag = solid_fragment(8, 8, [0, 0, 0, 255]);
    assert!(resize_fragment(&frag, 0, 4).is_err());
}

#[test]
fn zero_rotation_without_decoration_is_a_passthrough() {
    let base = solid_surface(10, 6, [10, 20, 30, 255]);
    let out = compose_asset(base.clone(), 0.0, None, None).unwrap();
    assert_eq!(out.anchor, (0, 0));
    assert_eq!(out.surface, base);
}

#[test]
fn border_stamps_hard_edges() {
    let base = solid_surface(10, 10, [0, 128, 0, 255]);
    let border = BorderSpec {
        color: [255, 255, 255, 255],
        width_px: 2,
    };
    let out = compose_asset(base, 0.0, Some(&border), None).unwrap();

    let white = Rgba8Premul::opaque(255, 255, 255);
    assert_eq!(out.surface.get(0, 0), white);
    assert_eq!(out.surface.get(1, 5), white);
    assert_eq!(out.surface.get(9, 9), white);
    // Interior untouched.
    assert_eq!(out.surface.get(5, 5), Rgba8Premul::opaque(0, 128, 0));
}

#[test]
fn border_wider_than_asset_is_rejected() {
    let base = solid_surface(6, 6, [0, 0, 0, 255]);
    let border = BorderSpec {
        color: [255, 255, 255, 255],
        width_px: 4,
    };
    assert!(compose_asset(base, 0.0, Some(&border), None).is_err());
}

#[test]
fn rotation_expands_the_bounding_box() {
    let base = solid_surface(40, 20, [50, 50, 50, 255]);
    let out = compose_asset(base, 30.0, None, None).unwrap();

    // 40x20 at 30°: ~44.6 x 39.3.
    assert!(out.surface.width() > 40);
    assert!(out.surface.height() > 20);
    assert!(out.anchor.0 > 0 && out.anchor.1 > 0);

    // Expansion corners stay transparent.
    assert_eq!(out.surface.get(0, 0).a, 0);
    // Center keeps the fill.
    let c = out
        .surface
        .get(out.surface.width() / 2, out.surface.height() / 2);
    assert_eq!(c.a, 255);
}

#[test]
fn rotation_is_deterministic() {
    let base = solid_surface(30, 18, [90, 60, 30, 255]);
    let a = compose_asset(base.clone(), -7.3, None, None).unwrap();
    let b = compose_asset(base, -7.3, None, None).unwrap();
    assert_eq!(a.surface, b.surface);
    assert_eq!(a.anchor, b.anchor);
}

#[test]
fn hard_shadow_offsets_without_blur() {
    let base = solid_surface(10, 10, [200, 0, 0, 255]);
    let shadow = ShadowSpec {
        color: [0, 0, 0, 255],
        offset: [4, 4],
    };
    let out = compose_asset(base, 0.0, None, Some(&shadow)).unwrap();

    assert_eq!((out.surface.width(), out.surface.height()), (14, 14));
    assert_eq!(out.anchor, (0, 0));

    // Asset at origin, shadow peeking out bottom-right.
    assert_eq!(out.surface.get(0, 0), Rgba8Premul::opaque(200, 0, 0));
    assert_eq!(out.surface.get(13, 13), Rgba8Premul::opaque(0, 0, 0));
    // Shadow edge is hard: directly outside it, fully transparent.
    assert_eq!(out.surface.get(13, 2).a, 0);
}

#[test]
fn negative_shadow_offset_shifts_the_anchor() {
    let base = solid_surface(10, 10, [0, 0, 200, 255]);
    let shadow = ShadowSpec {
        color: [30, 30, 30, 255],
        offset: [-3, -2],
    };
    let out = compose_asset(base, 0.0, None, Some(&shadow)).unwrap();

    assert_eq!((out.surface.width(), out.surface.height()), (13, 12));
    // The asset content sits at (3, 2) inside the buffer.
    assert_eq!(out.anchor, (3, 2));
    assert_eq!(out.surface.get(3, 2), Rgba8Premul::opaque(0, 0, 200));
    // Shadow occupies the top-left corner.
    assert_eq!(out.surface.get(0, 0), Rgba8Premul::opaque(30, 30, 30));
}
