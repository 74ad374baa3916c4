use super::*;
use crate::foundation::core::{PageHalf, Rgba8Premul};
use crate::scene::model::{CanvasDef, Element, ElementKind, LayoutSpec, PrintConfig};

/// Small flat-paper config: no grain, no curvature shade, band at 300..500.
fn test_config() -> PrintConfig {
    PrintConfig {
        canvas_width: 800,
        canvas_height: 520,
        grain_opacity: 0.0,
        binding_shadow_depth: 0.0,
        spine_center: 400.0,
        spine_width: 200.0,
        spine_buffer: 0.0,
        safe_margin: 10,
        fragment_max_tilt_deg: 0.0,
        text_max_tilt_deg: 0.0,
        channel_shift_r: [0, 0],
        channel_shift_g: [0, 0],
        channel_shift_b: [0, 0],
        dot_gain_gamma: 1.0,
        vignette_intensity: 0.0,
        ..PrintConfig::default()
    }
}

fn fragment_element(id: &str, source: &str, half: PageHalf, x: i32, y: i32, w: u32, h: u32) -> Element {
    Element {
        id: id.to_string(),
        half,
        kind: ElementKind::Fragment {
            source: source.to_string(),
        },
        x,
        y,
        width: w,
        height: h,
        rotation_deg: Some(0.0),
        border: None,
        shadow: None,
    }
}

fn layout_with(config: &PrintConfig, elements: Vec<Element>) -> LayoutSpec {
    LayoutSpec {
        spread_id: "spread-1".to_string(),
        canvas: CanvasDef {
            width: config.canvas_width,
            height: config.canvas_height,
        },
        elements,
    }
}

/// Write solid-color PNGs under a tempdir and prepare a store against it.
fn store_with_fragments(
    layouts: &[&LayoutSpec],
    colors: &[(&str, [u8; 4], u32, u32)],
) -> (tempfile::TempDir, FragmentStore) {
    let dir = tempfile::tempdir().unwrap();
    for (name, rgba, w, h) in colors {
        let img = image::RgbaImage::from_pixel(*w, *h, image::Rgba(*rgba));
        img.save(dir.path().join(name)).unwrap();
    }
    let store = FragmentStore::prepare(dir.path(), layouts).unwrap();
    (dir, store)
}

#[test]
fn solid_fragment_lands_where_placed() {
    let config = test_config();
    let layout = layout_with(
        &config,
        vec![fragment_element("frag", "red.png", PageHalf::Left, 50, 50, 100, 100)],
    );
    let (_dir, store) = store_with_fragments(&[&layout], &[("red.png", [200, 30, 30, 255], 100, 100)]);

    let composed = compose_spread(&layout, &config, &store, &FontStore::default()).unwrap();

    assert!(composed.warnings.is_empty());
    assert_eq!(composed.surface.get(100, 100), Rgba8Premul::opaque(200, 30, 30));
    // Just outside the placed rect the flat paper shows through.
    assert_eq!(composed.surface.get(160, 100), Rgba8Premul::opaque(0xea, 0xe1, 0xcd));
}

#[test]
fn same_inputs_compose_byte_identical_spreads() {
    let config = test_config();
    let layout = layout_with(
        &config,
        vec![fragment_element("frag", "red.png", PageHalf::Left, 50, 50, 100, 100)],
    );
    let (_dir, store) = store_with_fragments(&[&layout], &[("red.png", [200, 30, 30, 255], 100, 100)]);
    let fonts = FontStore::default();

    let a = produce_spread(&layout, &config, &store, &fonts).unwrap();
    let b = produce_spread(&layout, &config, &store, &fonts).unwrap();
    assert_eq!(a.fingerprint, b.fingerprint);
    assert_eq!(a.image.as_raw(), b.image.as_raw());
}

#[test]
fn later_elements_paint_over_earlier_ones() {
    let config = test_config();
    let layout = layout_with(
        &config,
        vec![
            fragment_element("under", "red.png", PageHalf::Left, 50, 50, 100, 100),
            fragment_element("over", "blue.png", PageHalf::Left, 50, 50, 100, 100),
        ],
    );
    let (_dir, store) = store_with_fragments(
        &[&layout],
        &[
            ("red.png", [200, 30, 30, 255], 100, 100),
            ("blue.png", [30, 30, 200, 255], 100, 100),
        ],
    );

    let composed = compose_spread(&layout, &config, &store, &FontStore::default()).unwrap();
    assert_eq!(composed.surface.get(100, 100), Rgba8Premul::opaque(30, 30, 200));
}

#[test]
fn spine_intruder_is_shifted_and_reported() {
    let config = test_config();
    // Right edge 380 reaches into the 300..500 band; a left-half element
    // escapes left, landing at x = 200.
    let layout = layout_with(
        &config,
        vec![fragment_element("frag", "red.png", PageHalf::Left, 280, 50, 100, 100)],
    );
    let (_dir, store) = store_with_fragments(&[&layout], &[("red.png", [200, 30, 30, 255], 100, 100)]);

    let composed = compose_spread(&layout, &config, &store, &FontStore::default()).unwrap();

    assert_eq!(
        composed.warnings.as_slice(),
        &[Warning::SpineShift {
            element_id: "frag".to_string(),
            dx: -80,
        }]
    );
    assert_eq!(composed.surface.get(250, 100), Rgba8Premul::opaque(200, 30, 30));
    // The band itself stays untouched paper.
    assert_eq!(composed.surface.get(310, 100), Rgba8Premul::opaque(0xea, 0xe1, 0xcd));
}

#[test]
fn element_outside_safe_margin_is_clamped() {
    let config = test_config();
    let layout = layout_with(
        &config,
        vec![fragment_element("frag", "red.png", PageHalf::Left, 0, 0, 100, 100)],
    );
    let (_dir, store) = store_with_fragments(&[&layout], &[("red.png", [200, 30, 30, 255], 100, 100)]);

    let composed = compose_spread(&layout, &config, &store, &FontStore::default()).unwrap();
    assert_eq!(
        composed.warnings.as_slice(),
        &[Warning::SafeZoneClamp {
            element_id: "frag".to_string(),
            dx: 10,
            dy: 10,
        }]
    );
    assert_eq!(composed.surface.get(15, 15), Rgba8Premul::opaque(200, 30, 30));
}

#[test]
fn unescapable_spine_intruder_is_fatal() {
    let config = test_config();
    // Width 400 cannot fit left of the band start at x = 300.
    let layout = layout_with(
        &config,
        vec![fragment_element("frag", "red.png", PageHalf::Left, 250, 50, 400, 100)],
    );
    let (_dir, store) = store_with_fragments(&[&layout], &[("red.png", [200, 30, 30, 255], 400, 100)]);

    let err = compose_spread(&layout, &config, &store, &FontStore::default()).unwrap_err();
    assert!(matches!(err, PlatenError::GeometryViolation(_)));
}

#[test]
fn unprepared_fragment_is_asset_not_found() {
    let config = test_config();
    let layout = layout_with(
        &config,
        vec![fragment_element("frag", "red.png", PageHalf::Left, 50, 50, 100, 100)],
    );
    // Store prepared for no layouts at all.
    let dir = tempfile::tempdir().unwrap();
    let store = FragmentStore::prepare(dir.path(), &[]).unwrap();

    let err = compose_spread(&layout, &config, &store, &FontStore::default()).unwrap_err();
    assert!(matches!(err, PlatenError::AssetNotFound(_)));
}

#[test]
fn canvas_mismatch_is_rejected() {
    let config = test_config();
    let mut layout = layout_with(&config, vec![]);
    layout.canvas.width = 640;

    let dir = tempfile::tempdir().unwrap();
    let store = FragmentStore::prepare(dir.path(), &[]).unwrap();
    let err = compose_spread(&layout, &config, &store, &FontStore::default()).unwrap_err();
    assert!(matches!(err, PlatenError::InvalidLayout(_)));
}

#[test]
fn batch_matches_single_spread_output() {
    let config = test_config();
    let layout_a = layout_with(
        &config,
        vec![fragment_element("frag", "red.png", PageHalf::Left, 50, 50, 100, 100)],
    );
    let mut layout_b = layout_a.clone();
    layout_b.spread_id = "spread-2".to_string();
    layout_b.elements[0].x = 600;
    layout_b.elements[0].half = PageHalf::Right;

    let (_dir, store) =
        store_with_fragments(&[&layout_a, &layout_b], &[("red.png", [200, 30, 30, 255], 100, 100)]);
    let fonts = FontStore::default();

    let batch = compose_batch(
        &[layout_a.clone(), layout_b.clone()],
        &config,
        &store,
        &fonts,
    );
    assert_eq!(batch.len(), 2);
    let single_a = produce_spread(&layout_a, &config, &store, &fonts).unwrap();
    let single_b = produce_spread(&layout_b, &config, &store, &fonts).unwrap();
    assert_eq!(batch[0].as_ref().unwrap().fingerprint, single_a.fingerprint);
    assert_eq!(batch[1].as_ref().unwrap().fingerprint, single_b.fingerprint);
}

#[test]
fn wide_text_word_is_reported_as_a_warning() {
    let config = test_config();
    let layout = layout_with(
        &config,
        vec![Element {
            id: "caption".to_string(),
            half: PageHalf::Left,
            kind: ElementKind::Text {
                content: "incomprehensibilities".to_string(),
                font: "mono".to_string(),
                size_px: 20.0,
                leading_px: 30.0,
                color: [0, 0, 0, 255],
            },
            x: 50,
            y: 50,
            width: 150,
            height: 60,
            rotation_deg: Some(0.0),
            border: None,
            shadow: None,
        }],
    );

    let dir = tempfile::tempdir().unwrap();
    let store = FragmentStore::prepare(dir.path(), &[]).unwrap();
    let mut fonts = FontStore::default();
    fonts.insert(
        "mono",
        std::fs::read("tests/data/fonts/DejaVuSansMono.ttf").unwrap(),
    );

    let composed = compose_spread(&layout, &config, &store, &fonts).unwrap();
    assert!(
        composed
            .warnings
            .iter()
            .any(|w| matches!(w, Warning::WideWord { element_id } if element_id == "caption")),
        "{:?}",
        composed.warnings
    );
}

#[test]
fn flatten_blends_partial_alpha_over_paper() {
    let mut surface = Surface::new(2, 1).unwrap();
    surface.put(0, 0, Rgba8Premul::opaque(10, 20, 30));
    // Premultiplied half-transparent black darkens the paper by half.
    surface.put(
        1,
        0,
        Rgba8Premul {
            r: 0,
            g: 0,
            b: 0,
            a: 128,
        },
    );

    let rgb = flatten_to_rgb(&surface, [200, 100, 50]);
    assert_eq!(rgb.get_pixel(0, 0).0, [10, 20, 30]);
    let [r, g, b] = rgb.get_pixel(1, 0).0;
    assert!(r.abs_diff(100) <= 1, "r {r}");
    assert!(g.abs_diff(50) <= 1, "g {g}");
    assert!(b.abs_diff(25) <= 1, "b {b}");
}
