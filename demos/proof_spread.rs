use std::fs;
use std::path::Path;

use platen::{FontStore, FragmentStore, LayoutSpec, PrintConfig, produce_spread, write_png_atomic};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let config = PrintConfig::from_reader(
        r#"
{
  "canvas_width": 1700,
  "canvas_height": 1100,
  "spine_center": 850.0,
  "spine_width": 220.0,
  "safe_margin": 48,
  "binding_shadow_width": 75,
  "hole_pitch": 180,
  "hole_diameter": 26
}
"#
        .as_bytes(),
    )?;

    let layout: LayoutSpec = LayoutSpec::from_reader(
        r#"
{
  "spread_id": "demo-proof",
  "canvas": { "width": 1700, "height": 1100 },
  "elements": [
    {
      "id": "photo-left",
      "half": "left",
      "kind": "fragment",
      "source": "gradient.png",
      "x": 120, "y": 160, "width": 420, "height": 300,
      "border": { "color": [250, 248, 240, 255], "width_px": 10 },
      "shadow": { "color": [30, 25, 20, 160], "offset": [7, 9] }
    },
    {
      "id": "photo-spine",
      "half": "right",
      "kind": "fragment",
      "source": "gradient.png",
      "x": 700, "y": 560, "width": 420, "height": 300
    }
  ]
}
"#
        .as_bytes(),
    )?;

    // Procedural stand-in for scanned clippings.
    let asset_dir = Path::new("target/platen_demos/assets");
    fs::create_dir_all(asset_dir)?;
    let gradient = image::RgbaImage::from_fn(420, 300, |x, y| {
        image::Rgba([((x * 255) / 420) as u8, ((y * 255) / 300) as u8, 96, 255])
    });
    gradient.save(asset_dir.join("gradient.png"))?;

    let fragments = FragmentStore::prepare(asset_dir, &[&layout])?;
    let fonts = FontStore::default();

    let finished = produce_spread(&layout, &config, &fragments, &fonts)?;
    for warning in &finished.warnings {
        eprintln!("warning: {warning}");
    }

    let out_path = Path::new("target/platen_demos/demo-proof.png");
    write_png_atomic(&finished.image, out_path)?;
    eprintln!("wrote {} ({})", out_path.display(), finished.fingerprint);
    Ok(())
}
