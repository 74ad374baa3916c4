use super::*;
use crate::foundation::core::PageHalf;

fn fragment(id: &str, x: i32, y: i32, w: u32, h: u32) -> Element {
    Element {
        id: id.to_string(),
        half: PageHalf::Left,
        kind: ElementKind::Fragment {
            source: "frag.png".to_string(),
        },
        x,
        y,
        width: w,
        height: h,
        rotation_deg: None,
        border: None,
        shadow: None,
    }
}

fn layout(elements: Vec<Element>, config: &PrintConfig) -> LayoutSpec {
    LayoutSpec {
        spread_id: "issue-01-p04".to_string(),
        canvas: CanvasDef {
            width: config.canvas_width,
            height: config.canvas_height,
        },
        elements,
    }
}

#[test]
fn default_config_validates() {
    PrintConfig::default().validate().unwrap();
}

#[test]
fn zero_canvas_is_rejected() {
    let mut config = PrintConfig::default();
    config.canvas_width = 0;
    assert!(matches!(
        config.validate(),
        Err(crate::PlatenError::InvalidLayout(_))
    ));
}

#[test]
fn spine_outside_canvas_is_rejected() {
    let mut config = PrintConfig::default();
    config.spine_center = f64::from(config.canvas_width) + 10.0;
    assert!(config.validate().is_err());
}

#[test]
fn neutral_press_parameters_are_legal() {
    let mut config = PrintConfig::default();
    config.channel_shift_r = [0, 0];
    config.channel_shift_g = [0, 0];
    config.channel_shift_b = [0, 0];
    config.dot_gain_gamma = 1.0;
    config.vignette_intensity = 0.0;
    config.validate().unwrap();
}

#[test]
fn duplicate_element_ids_are_rejected() {
    let config = PrintConfig::default();
    let spec = layout(
        vec![fragment("a", 0, 0, 10, 10), fragment("a", 50, 50, 10, 10)],
        &config,
    );
    assert!(matches!(
        spec.validate(&config),
        Err(crate::PlatenError::InvalidLayout(_))
    ));
}

#[test]
fn empty_element_id_is_rejected() {
    let config = PrintConfig::default();
    let spec = layout(vec![fragment("", 0, 0, 10, 10)], &config);
    assert!(spec.validate(&config).is_err());
}

#[test]
fn canvas_mismatch_is_rejected() {
    let config = PrintConfig::default();
    let mut spec = layout(vec![], &config);
    spec.canvas.width += 1;
    assert!(spec.validate(&config).is_err());
}

#[test]
fn oversized_element_is_a_geometry_violation() {
    let config = PrintConfig::default();
    let spec = layout(
        vec![fragment("huge", 0, 0, config.canvas_width + 1, 10)],
        &config,
    );
    assert!(matches!(
        spec.validate(&config),
        Err(crate::PlatenError::GeometryViolation(_))
    ));
}

#[test]
fn extreme_rotation_override_is_rejected() {
    let config = PrintConfig::default();
    let mut el = fragment("tilted", 0, 0, 10, 10);
    el.rotation_deg = Some(120.0);
    let spec = layout(vec![el], &config);
    assert!(spec.validate(&config).is_err());
}

#[test]
fn layout_round_trips_through_json() {
    let config = PrintConfig::default();
    let mut el = fragment("photo-1", 120, 300, 600, 400);
    el.rotation_deg = Some(-2.5);
    el.border = Some(BorderSpec {
        color: [255, 255, 255, 255],
        width_px: 6,
    });
    let spec = layout(vec![el], &config);

    let json = serde_json::to_string(&spec).unwrap();
    let back: LayoutSpec = serde_json::from_str(&json).unwrap();
    back.validate(&config).unwrap();
    assert_eq!(back.elements.len(), 1);
    assert_eq!(back.elements[0].id, "photo-1");
}

#[test]
fn layout_loads_from_a_json_file() {
    let config = PrintConfig::default();
    let spec = layout(vec![fragment("photo-1", 120, 300, 600, 400)], &config);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("layout.json");
    std::fs::write(&path, serde_json::to_vec(&spec).unwrap()).unwrap();

    let loaded = LayoutSpec::from_path(&path).unwrap();
    assert_eq!(loaded.spread_id, spec.spread_id);
    assert_eq!(loaded.elements.len(), 1);
}

#[test]
fn malformed_layout_json_is_invalid_layout() {
    let err = LayoutSpec::from_reader("{ not json".as_bytes()).unwrap_err();
    assert!(matches!(err, crate::PlatenError::InvalidLayout(_)));
}

#[test]
fn missing_layout_file_is_invalid_layout() {
    let dir = tempfile::tempdir().unwrap();
    let err = LayoutSpec::from_path(dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, crate::PlatenError::InvalidLayout(_)));
}

#[test]
fn config_round_trips_through_json_with_defaults() {
    let json = r#"{ "canvas_width": 2000, "canvas_height": 1400, "spine_center": 1000.0 }"#;
    let config: PrintConfig = serde_json::from_str(json).unwrap();
    assert_eq!(config.canvas_width, 2000);
    assert_eq!(config.spine_center, 1000.0);
    // Unlisted fields fall back to defaults.
    assert_eq!(config.text_overflow, OverflowPolicy::Truncate);
    config.validate().unwrap();
}

#[test]
fn config_loads_from_a_reader() {
    let json = r#"{ "dot_gain_gamma": 1.3 }"#;
    let config = PrintConfig::from_reader(json.as_bytes()).unwrap();
    assert_eq!(config.dot_gain_gamma, 1.3);
    assert_eq!(config.canvas_width, PrintConfig::default().canvas_width);
}
