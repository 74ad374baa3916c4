use std::{
    collections::HashSet,
    fs::File,
    io::BufReader,
    path::Path,
};

use serde::{Deserialize, Serialize};

use crate::foundation::core::PageHalf;
use crate::foundation::error::{PlatenError, PlatenResult};

/// Canvas dimensions for one spread, in pixels.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CanvasDef {
    pub width: u32,
    pub height: u32,
}

/// Hard-edged rectangular stroke stamped around a fragment.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BorderSpec {
    /// Straight-alpha RGBA stroke color.
    pub color: [u8; 4],
    /// Stroke width in pixels.
    pub width_px: u32,
}

/// Offset, unblurred, solid-color silhouette placed under an asset.
///
/// Zero blur is a period-style constraint: a soft shadow is wrong output,
/// not an approximation of this one.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ShadowSpec {
    /// Straight-alpha RGBA shadow color.
    pub color: [u8; 4],
    /// Integer pixel offset `[dx, dy]`.
    pub offset: [i32; 2],
}

/// Kind-specific payload of an element.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ElementKind {
    /// Pre-rendered RGBA fragment, keyed into the fragment store.
    Fragment { source: String },
    /// Programmatically rendered text block.
    Text {
        content: String,
        /// Logical font name resolved through the font store.
        font: String,
        size_px: f32,
        /// Baseline-to-baseline distance for stacked lines.
        leading_px: f32,
        /// Straight-alpha RGBA text color.
        #[serde(default = "default_text_color")]
        color: [u8; 4],
    },
}

fn default_text_color() -> [u8; 4] {
    [20, 18, 16, 255]
}

/// One placed element of a spread.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Element {
    /// Unique within the spread; drives the chaos-rotation oracle.
    pub id: String,
    pub half: PageHalf,
    #[serde(flatten)]
    pub kind: ElementKind,
    /// Nominal top-left placement in canvas space.
    pub x: i32,
    pub y: i32,
    /// Nominal content size before rotation expansion.
    pub width: u32,
    pub height: u32,
    /// Explicit rotation override in degrees; bypasses the oracle.
    #[serde(default)]
    pub rotation_deg: Option<f64>,
    #[serde(default)]
    pub border: Option<BorderSpec>,
    #[serde(default)]
    pub shadow: Option<ShadowSpec>,
}

/// Declarative description of one two-page spread.
///
/// Declaration order is paint order: later elements draw above earlier ones.
/// That is a documented invariant, not an iteration accident; changing the
/// traversal strategy must not change visual output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutSpec {
    pub spread_id: String,
    pub canvas: CanvasDef,
    pub elements: Vec<Element>,
}

/// What to do when wrapped text exceeds its box height.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverflowPolicy {
    /// Drop trailing lines and report a warning.
    #[default]
    Truncate,
    /// Draw past the box bottom and report a warning.
    Overflow,
    /// Treat overflow as a fatal geometry violation.
    Error,
}

/// Global numeric parameters of the simulated press run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PrintConfig {
    pub canvas_width: u32,
    pub canvas_height: u32,
    /// Flat base fill, straight RGB (uncoated paper stock).
    pub background_rgb: [u8; 3],

    /// Paper grain blend opacity in `[0, 1]`.
    pub grain_opacity: f32,
    /// Noise cell size in pixels; larger cells read as coarser fiber.
    pub grain_cell_px: u32,
    /// Seed for the procedural grain field.
    pub grain_seed: u64,

    /// Horizontal center of the binding band.
    pub spine_center: f64,
    /// Full width of the binding band.
    pub spine_width: f64,
    /// Extra clearance added on both sides of the band.
    pub spine_buffer: f64,
    /// Margin kept clear along the outer page edges.
    pub safe_margin: u32,

    /// Vertical distance between binding hole centers.
    pub hole_pitch: u32,
    pub hole_diameter: u32,
    /// Straight RGB of the punched holes.
    pub hole_rgb: [u8; 3],
    /// Peak darkening of the page-curvature shadow, `[0, 1]`.
    pub binding_shadow_depth: f32,
    /// Horizontal reach of the curvature shadow from the spine center.
    pub binding_shadow_width: u32,

    /// Oracle ceiling for fragment elements, degrees.
    pub fragment_max_tilt_deg: f64,
    /// Oracle ceiling for text elements, degrees.
    pub text_max_tilt_deg: f64,

    /// Per-channel plate shift `[dx, dy]` for R, G, B.
    pub channel_shift_r: [i32; 2],
    pub channel_shift_g: [i32; 2],
    pub channel_shift_b: [i32; 2],
    /// Dot-gain curve exponent; `1.0` is neutral.
    pub dot_gain_gamma: f32,
    /// Vignette intensity in `[0, 1]`; `0.0` is neutral.
    pub vignette_intensity: f32,

    pub text_overflow: OverflowPolicy,
    /// Resolution tag carried alongside the finished raster.
    pub output_dpi: u32,
}

impl Default for PrintConfig {
    fn default() -> Self {
        Self {
            canvas_width: 3400,
            canvas_height: 2200,
            background_rgb: [0xea, 0xe1, 0xcd],
            grain_opacity: 0.08,
            grain_cell_px: 3,
            grain_seed: 0x70ab_3d11_9c42_e6f5,
            spine_center: 1700.0,
            spine_width: 440.0,
            spine_buffer: 24.0,
            safe_margin: 96,
            hole_pitch: 260,
            hole_diameter: 44,
            hole_rgb: [0x5a, 0x52, 0x44],
            binding_shadow_depth: 0.32,
            binding_shadow_width: 150,
            fragment_max_tilt_deg: 4.0,
            text_max_tilt_deg: 2.5,
            channel_shift_r: [1, 0],
            channel_shift_g: [0, 0],
            channel_shift_b: [0, -1],
            dot_gain_gamma: 1.12,
            vignette_intensity: 0.18,
            text_overflow: OverflowPolicy::Truncate,
            output_dpi: 200,
        }
    }
}

impl PrintConfig {
    /// Parse a configuration from JSON; absent fields take their defaults.
    pub fn from_reader<R: std::io::Read>(r: R) -> PlatenResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| PlatenError::invalid_layout(format!("parse print config JSON: {e}")))
    }

    /// Parse a configuration from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> PlatenResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            PlatenError::invalid_layout(format!("open print config JSON '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Validate numeric parameters before any pixel work.
    pub fn validate(&self) -> PlatenResult<()> {
        if self.canvas_width == 0 || self.canvas_height == 0 {
            return Err(PlatenError::invalid_layout(
                "canvas dimensions must be > 0",
            ));
        }
        // vello_cpu surfaces are u16-dimensioned.
        if self.canvas_width > u32::from(u16::MAX) || self.canvas_height > u32::from(u16::MAX) {
            return Err(PlatenError::invalid_layout(
                "canvas dimensions exceed u16 raster limit",
            ));
        }
        if !self.spine_center.is_finite()
            || !self.spine_width.is_finite()
            || !self.spine_buffer.is_finite()
            || self.spine_width <= 0.0
            || self.spine_buffer < 0.0
        {
            return Err(PlatenError::invalid_layout(
                "spine geometry must be finite, width > 0, buffer >= 0",
            ));
        }
        if self.spine_center < 0.0 || self.spine_center > f64::from(self.canvas_width) {
            return Err(PlatenError::invalid_layout(
                "spine center must lie inside the canvas",
            ));
        }
        if !(0.0..=1.0).contains(&self.grain_opacity) {
            return Err(PlatenError::invalid_layout(
                "grain opacity must be within [0, 1]",
            ));
        }
        if self.grain_cell_px == 0 {
            return Err(PlatenError::invalid_layout("grain cell must be > 0"));
        }
        if self.hole_pitch == 0 || self.hole_diameter == 0 {
            return Err(PlatenError::invalid_layout(
                "binding hole pitch and diameter must be > 0",
            ));
        }
        if !(0.0..=1.0).contains(&self.binding_shadow_depth) {
            return Err(PlatenError::invalid_layout(
                "binding shadow depth must be within [0, 1]",
            ));
        }
        if !self.fragment_max_tilt_deg.is_finite()
            || !self.text_max_tilt_deg.is_finite()
            || self.fragment_max_tilt_deg < 0.0
            || self.text_max_tilt_deg < 0.0
        {
            return Err(PlatenError::invalid_layout(
                "rotation ceilings must be finite and >= 0",
            ));
        }
        if !self.dot_gain_gamma.is_finite() || self.dot_gain_gamma <= 0.0 {
            return Err(PlatenError::invalid_layout(
                "dot gain gamma must be finite and > 0",
            ));
        }
        if !(0.0..=1.0).contains(&self.vignette_intensity) {
            return Err(PlatenError::invalid_layout(
                "vignette intensity must be within [0, 1]",
            ));
        }
        Ok(())
    }
}

impl Element {
    /// Logical name of the kind, for diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self.kind {
            ElementKind::Fragment { .. } => "fragment",
            ElementKind::Text { .. } => "text",
        }
    }
}

impl LayoutSpec {
    /// Parse a layout from JSON.
    pub fn from_reader<R: std::io::Read>(r: R) -> PlatenResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| PlatenError::invalid_layout(format!("parse layout JSON: {e}")))
    }

    /// Parse a layout from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> PlatenResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            PlatenError::invalid_layout(format!("open layout JSON '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Structural validation against a print configuration.
    ///
    /// Rejects contradictory geometry up front so composition never has to
    /// back out of a half-painted canvas.
    pub fn validate(&self, config: &PrintConfig) -> PlatenResult<()> {
        if self.spread_id.is_empty() {
            return Err(PlatenError::invalid_layout("spread_id must be non-empty"));
        }
        if self.canvas.width != config.canvas_width || self.canvas.height != config.canvas_height {
            return Err(PlatenError::invalid_layout(format!(
                "layout canvas {}x{} does not match configured {}x{}",
                self.canvas.width, self.canvas.height, config.canvas_width, config.canvas_height
            )));
        }

        let mut seen = HashSet::new();
        for el in &self.elements {
            if el.id.is_empty() {
                return Err(PlatenError::invalid_layout(
                    "element id must be non-empty",
                ));
            }
            if !seen.insert(el.id.as_str()) {
                return Err(PlatenError::invalid_layout(format!(
                    "duplicate element id '{}'",
                    el.id
                )));
            }
            if el.width == 0 || el.height == 0 {
                return Err(PlatenError::invalid_layout(format!(
                    "element '{}' has zero extent",
                    el.id
                )));
            }
            if let Some(deg) = el.rotation_deg
                && (!deg.is_finite() || deg.abs() > 90.0)
            {
                return Err(PlatenError::invalid_layout(format!(
                    "element '{}' rotation override must be finite and within ±90°",
                    el.id
                )));
            }
            if let Some(b) = &el.border
                && b.width_px == 0
            {
                return Err(PlatenError::invalid_layout(format!(
                    "element '{}' border width must be > 0",
                    el.id
                )));
            }
            if let ElementKind::Text {
                size_px,
                leading_px,
                content,
                font,
                ..
            } = &el.kind
            {
                if content.is_empty() {
                    return Err(PlatenError::invalid_layout(format!(
                        "element '{}' text content must be non-empty",
                        el.id
                    )));
                }
                if font.is_empty() {
                    return Err(PlatenError::invalid_layout(format!(
                        "element '{}' font name must be non-empty",
                        el.id
                    )));
                }
                if !size_px.is_finite() || *size_px <= 0.0 {
                    return Err(PlatenError::invalid_layout(format!(
                        "element '{}' text size must be finite and > 0",
                        el.id
                    )));
                }
                if !leading_px.is_finite() || *leading_px <= 0.0 {
                    return Err(PlatenError::invalid_layout(format!(
                        "element '{}' leading must be finite and > 0",
                        el.id
                    )));
                }
            }

            // An element wider or taller than the canvas can never be placed,
            // even before spine and margin corrections.
            if el.width > config.canvas_width || el.height > config.canvas_height {
                return Err(PlatenError::geometry(format!(
                    "element '{}' ({}x{}) exceeds the canvas",
                    el.id, el.width, el.height
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/model.rs"]
mod tests;
